use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Logical canvas size shared by every render. Export re-targets this to a
/// print-area size, preserving the aspect ratio.
pub const CANVAS_WIDTH: f64 = 960.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

pub const DEFAULT_FILL: &str = "#f3f3f3";
pub const DEFAULT_BORDER_COLOR: &str = "#ffffff";

/// Which boundary dataset (and therefore projection and code format) a
/// request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapDomain {
    #[serde(rename = "us")]
    Us,
    #[serde(rename = "world")]
    World,
}

impl MapDomain {
    /// Region identifier format for this domain: 2-letter postal codes for
    /// US states, 3-letter ISO codes for countries.
    pub fn code_pattern(self) -> &'static str {
        match self {
            MapDomain::Us => r"^[A-Z]{2}$",
            MapDomain::World => r"^[A-Z]{3}$",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MapDomain::Us => "us",
            MapDomain::World => "world",
        }
    }
}

impl std::fmt::Display for MapDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One region of a request. Immutable once produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub name: String,
    pub code: String,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylingConfig {
    #[serde(rename = "defaultFill")]
    pub default_fill: String,
    #[serde(rename = "highlightColors", default)]
    pub highlight_colors: IndexMap<String, String>,
    #[serde(rename = "borderColor")]
    pub border_color: String,
    #[serde(rename = "showLabels")]
    pub show_labels: bool,
    #[serde(rename = "labelColor", default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(rename = "labelSize", default, skip_serializing_if = "Option::is_none")]
    pub label_size: Option<String>,
}

impl Default for StylingConfig {
    fn default() -> Self {
        Self {
            default_fill: DEFAULT_FILL.to_string(),
            highlight_colors: IndexMap::new(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            show_labels: false,
            label_color: None,
            label_size: None,
        }
    }
}

/// A fully normalized map request: one per user request, discarded on the
/// next. `regions` are unique by `code` and every value lies inside
/// `[min_value, max_value]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDataset {
    pub domain: MapDomain,
    pub regions: Vec<RegionRecord>,
    #[serde(rename = "minValue")]
    pub min_value: f64,
    #[serde(rename = "maxValue")]
    pub max_value: f64,
    pub styling: StylingConfig,
}

impl MapDataset {
    /// Builds a dataset from normalized regions, deriving `min_value` and
    /// `max_value` from the region values.
    pub fn from_regions(
        domain: MapDomain,
        regions: Vec<RegionRecord>,
        styling: StylingConfig,
    ) -> Result<Self> {
        if regions.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let min_value = regions.iter().map(|r| r.value).fold(f64::INFINITY, f64::min);
        let max_value = regions
            .iter()
            .map(|r| r.value)
            .fold(f64::NEG_INFINITY, f64::max);
        let dataset = Self {
            domain,
            regions,
            min_value,
            max_value,
            styling,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Checks the dataset invariants: unique codes, values within the
    /// declared range, valid hex colors.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for region in &self.regions {
            if region.code.is_empty() {
                return Err(Error::input(format!(
                    "region {:?} has an empty code",
                    region.name
                )));
            }
            if !seen.insert(region.code.as_str()) {
                return Err(Error::input(format!(
                    "duplicate region code {:?}",
                    region.code
                )));
            }
            if !region.value.is_finite()
                || region.value < self.min_value
                || region.value > self.max_value
            {
                return Err(Error::input(format!(
                    "region {:?} value {} outside [{}, {}]",
                    region.code, region.value, self.min_value, self.max_value
                )));
            }
        }
        for color in std::iter::once(self.styling.default_fill.as_str())
            .chain(std::iter::once(self.styling.border_color.as_str()))
            .chain(self.styling.highlight_colors.values().map(String::as_str))
        {
            if !is_css_color(color) {
                return Err(Error::input(format!("invalid color {color:?}")));
            }
        }
        Ok(())
    }

    pub fn region_by_code(&self, code: &str) -> Option<&RegionRecord> {
        self.regions.iter().find(|r| r.code == code)
    }
}

/// Accepts `#rgb`/`#rrggbb` hex colors and a small set of CSS keywords the
/// upstream styling configs actually use.
pub fn is_css_color(text: &str) -> bool {
    let t = text.trim();
    if let Some(hex) = t.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    matches!(
        t.to_ascii_lowercase().as_str(),
        "white" | "black" | "red" | "green" | "blue" | "orange" | "purple" | "yellow" | "gray"
    )
}

/// Currency-style tooltip formatting: `$1,234,567` (0 decimal places).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let negative = value < 0.0;
    let whole = value.abs().round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
