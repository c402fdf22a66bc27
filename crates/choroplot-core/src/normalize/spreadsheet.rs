use crate::model::{MapDataset, MapDomain, RegionRecord, StylingConfig};
use crate::{Error, Result};
use std::io::Read;
use std::path::Path;

/// Header aliases, highest priority first. The first alias present in the
/// header row selects the column.
const NAME_ALIASES: &[&str] = &["COUNTRY", "Country", "country", "NAME", "name", "state", "State"];
const CODE_ALIASES: &[&str] = &["CODE", "Code", "code", "ISO", "iso"];
const VALUE_ALIASES: &[&str] = &[
    "GDP",
    "gdp",
    "GDP_PER_CAPITA",
    "gdp_per_capita",
    "sales",
    "Sales",
    "Value",
    "value",
];

/// Reads `.csv`, `.xlsx` or `.xls` (first sheet only) into a dataset.
pub fn from_path(path: impl AsRef<Path>) -> Result<MapDataset> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => from_csv_reader(std::fs::File::open(path)?),
        "xlsx" | "xls" => from_workbook(path),
        other => Err(Error::input(format!(
            "unsupported spreadsheet extension {other:?} (expected csv, xlsx or xls)"
        ))),
    }
}

pub fn from_csv_reader<R: Read>(reader: R) -> Result<MapDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|err| Error::Spreadsheet {
            message: err.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|err| Error::Spreadsheet {
            message: err.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    dataset_from_rows(&headers, &rows)
}

pub fn from_workbook(path: &Path) -> Result<MapDataset> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path).map_err(|err| Error::Spreadsheet {
        message: err.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Spreadsheet {
            message: "workbook has no sheets".to_string(),
        })?
        .map_err(|err| Error::Spreadsheet {
            message: err.to_string(),
        })?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = row_iter
        .next()
        .ok_or(Error::EmptyDataset)?
        .iter()
        .map(cell_text)
        .map(Option::unwrap_or_default)
        .collect();

    let rows: Vec<Vec<String>> = row_iter
        .map(|row| {
            row.iter()
                .map(|cell| cell_text(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    fn cell_text(cell: &Data) -> Option<String> {
        match cell {
            Data::String(s) => {
                let t = s.trim();
                (!t.is_empty()).then(|| t.to_string())
            }
            Data::Float(f) => Some(f.to_string()),
            Data::Int(i) => Some(i.to_string()),
            Data::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    dataset_from_rows(&headers, &rows)
}

fn dataset_from_rows(headers: &[String], rows: &[Vec<String>]) -> Result<MapDataset> {
    let name_col = find_column(headers, NAME_ALIASES).ok_or_else(|| {
        Error::input(format!(
            "no region-name column found (expected one of {})",
            NAME_ALIASES.join(", ")
        ))
    })?;
    let value_col = find_column(headers, VALUE_ALIASES).ok_or_else(|| {
        Error::input(format!(
            "no numeric-value column found (expected one of {})",
            VALUE_ALIASES.join(", ")
        ))
    })?;
    let code_col = find_column(headers, CODE_ALIASES);

    // A `state` column means US states; everything else is a country sheet.
    let domain = if headers[name_col].eq_ignore_ascii_case("state") {
        MapDomain::Us
    } else {
        MapDomain::World
    };

    let mut regions: Vec<RegionRecord> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for (index, row) in rows.iter().enumerate() {
        let name = row.get(name_col).map(|s| s.trim()).unwrap_or_default();
        let value = row
            .get(value_col)
            .and_then(|s| s.trim().replace(',', "").parse::<f64>().ok());
        let Some(value) = value else {
            tracing::debug!(row = index + 2, "dropped row: unparsable value");
            continue;
        };
        if name.is_empty() || !value.is_finite() || value <= 0.0 {
            tracing::debug!(row = index + 2, "dropped row: missing name or non-positive value");
            continue;
        }
        let code = code_col
            .and_then(|c| row.get(c))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(name)
            .to_string();
        if !seen.insert(code.clone()) {
            tracing::debug!(row = index + 2, code = %code, "dropped row: duplicate region code");
            continue;
        }
        regions.push(RegionRecord {
            name: name.to_string(),
            code,
            label: name.to_string(),
            value,
        });
    }

    MapDataset::from_regions(domain, regions, StylingConfig::default())
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_filtered_and_min_max_derived() {
        let csv = "COUNTRY,GDP\nFrance,40000\nGermany,45000\nNowhere,\n,100\nAtlantis,-5\n";
        let ds = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.domain, MapDomain::World);
        assert_eq!(ds.regions.len(), 2);
        assert_eq!(ds.min_value, 40000.0);
        assert_eq!(ds.max_value, 45000.0);
        assert_eq!(ds.regions[0].name, "France");
        assert_eq!(ds.regions[1].value, 45000.0);
    }

    #[test]
    fn csv_state_header_selects_us_domain() {
        let csv = "state,sales\nCalifornia,1200\nTexas,900\n";
        let ds = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.domain, MapDomain::Us);
        assert_eq!(ds.regions.len(), 2);
    }

    #[test]
    fn csv_code_column_used_when_present() {
        let csv = "COUNTRY,CODE,Value\nFrance,FRA,1\n";
        let ds = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.regions[0].code, "FRA");
    }

    #[test]
    fn csv_duplicate_codes_keep_first_row() {
        let csv = "COUNTRY,GDP\nFrance,40000\nFrance,99999\n";
        let ds = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.regions.len(), 1);
        assert_eq!(ds.regions[0].value, 40000.0);
    }

    #[test]
    fn csv_without_surviving_rows_is_empty_dataset() {
        let csv = "COUNTRY,GDP\nNowhere,0\n,5\n";
        let err = from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
    }

    #[test]
    fn csv_without_name_column_is_input_error() {
        let csv = "Region,GDP\nFrance,40000\n";
        let err = from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
    }

    #[test]
    fn csv_value_accepts_thousands_separators() {
        let csv = "COUNTRY,GDP\nFrance,\"40,000\"\n";
        let ds = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.regions[0].value, 40000.0);
    }
}
