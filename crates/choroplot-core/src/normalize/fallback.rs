use crate::model::{MapDataset, MapDomain, RegionRecord, StylingConfig};
use crate::normalize::completion::PLACEHOLDER_VALUE;
use crate::resolve::{is_us_state_code, us_state_name};
use crate::{Error, Result};
use std::sync::OnceLock;

/// Color keywords the local parser understands, mapped to the palette the
/// hosted variant used.
const COLOR_WORDS: &[(&str, &str)] = &[
    ("red", "#ef4444"),
    ("green", "#22c55e"),
    ("blue", "#3b82f6"),
    ("orange", "#f97316"),
    ("purple", "#a855f7"),
    ("yellow", "#eab308"),
];

const DEFAULT_HIGHLIGHT: &str = "#22c55e";

fn code_token_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"\b[A-Z]{2}\b").unwrap())
}

/// Credential-free interpretation of a free-text request. The text is
/// uppercased, then standalone 2-letter tokens that are US postal codes
/// become highlighted states with a placeholder value; a color word picks
/// the highlight color; "label" turns labels on.
pub fn parse_description(text: &str) -> Result<MapDataset> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::input("empty map description"));
    }

    let uppercased = trimmed.to_uppercase();
    let mut codes: Vec<&str> = Vec::new();
    for token in code_token_regex().find_iter(&uppercased) {
        let token = token.as_str();
        // Tokens that aren't state codes ("TV", "QQ"-lookalikes from prose)
        // would only ever render as misses; drop them up front.
        if is_us_state_code(token) && !codes.contains(&token) {
            codes.push(token);
        }
    }

    let lowercased = trimmed.to_lowercase();
    let color = COLOR_WORDS
        .iter()
        .find(|(word, _)| lowercased.contains(word))
        .map(|(_, hex)| *hex);

    let mut styling = StylingConfig {
        show_labels: lowercased.contains("label"),
        ..StylingConfig::default()
    };
    if codes.is_empty() {
        // No regions to highlight: a color request recolors the whole map.
        if let Some(color) = color {
            styling.default_fill = color.to_string();
        }
    } else {
        let highlight = color.unwrap_or(DEFAULT_HIGHLIGHT);
        for code in &codes {
            styling
                .highlight_colors
                .insert((*code).to_string(), highlight.to_string());
        }
    }

    let regions = codes
        .iter()
        .map(|code| {
            let name = us_state_name(code).unwrap_or(code).to_string();
            RegionRecord {
                name: name.clone(),
                code: (*code).to_string(),
                label: name,
                value: PLACEHOLDER_VALUE,
            }
        })
        .collect();

    let dataset = MapDataset {
        domain: MapDomain::Us,
        regions,
        min_value: 0.0,
        max_value: PLACEHOLDER_VALUE,
        styling,
    };
    dataset.validate()?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_state_codes_with_color_and_labels() {
        let ds = parse_description("USA map, label CA NY MT red").unwrap();
        assert_eq!(ds.domain, MapDomain::Us);
        let codes: Vec<&str> = ds.regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["CA", "NY", "MT"]);
        assert!(ds.styling.show_labels);
        for code in codes {
            assert_eq!(ds.styling.highlight_colors.get(code).unwrap(), "#ef4444");
        }
        assert_eq!(ds.styling.default_fill, "#f3f3f3");
        assert!(ds.regions.iter().all(|r| r.value == PLACEHOLDER_VALUE));
    }

    #[test]
    fn lowercase_codes_are_extracted_after_uppercasing() {
        let ds = parse_description("a map of ca and ny please, red").unwrap();
        let codes: Vec<&str> = ds.regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["CA", "NY"]);
        assert_eq!(ds.styling.highlight_colors.get("CA").unwrap(), "#ef4444");
    }

    #[test]
    fn color_without_codes_recolors_the_whole_map() {
        let ds = parse_description("paint the whole country green").unwrap();
        assert!(ds.regions.is_empty());
        assert_eq!(ds.styling.default_fill, "#22c55e");
    }

    #[test]
    fn duplicate_codes_collapse() {
        let ds = parse_description("CA CA NY").unwrap();
        assert_eq!(ds.regions.len(), 2);
    }

    #[test]
    fn non_state_tokens_are_dropped() {
        let ds = parse_description("TV QQ CA").unwrap();
        assert_eq!(ds.regions.len(), 1);
        assert_eq!(ds.regions[0].code, "CA");
    }

    #[test]
    fn empty_description_is_input_error() {
        assert!(matches!(
            parse_description("   ").unwrap_err(),
            Error::Input { .. }
        ));
    }
}
