use crate::model::{
    DEFAULT_BORDER_COLOR, MapDataset, MapDomain, RegionRecord, StylingConfig,
};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::OnceLock;

/// Regions produced by the completion service carry no numeric series; they
/// get a fixed placeholder value inside a fixed `[0, 100]` range so the
/// renderer's scale stays well-defined.
pub const PLACEHOLDER_VALUE: f64 = 100.0;

/// Fixed instruction set sent with every description. The reply must be a
/// single JSON object matching [`CompletionMap`].
pub const SYSTEM_PROMPT: &str = r##"You are a map visualization expert. Convert the user's map request into specific visualization instructions.
For world maps (when countries are mentioned), use 3-letter ISO country codes.
For US maps (when US states are mentioned), use 2-letter postal codes.

RESPOND ONLY WITH A VALID JSON OBJECT. NO OTHER TEXT OR FORMATTING.

The JSON must follow this format:
{
  "mapType": "world" | "us",
  "states": [
    {
      "state": "regionName",
      "postalCode": "stateCode | ISO3",
      "label": "Display Name"
    }
  ],
  "defaultFill": "#hexColor",
  "highlightColors": {
    "stateCode | ISO3": "#hexColor"
  },
  "showLabels": true
}"##;

#[derive(Debug, Deserialize)]
struct CompletionRegion {
    state: String,
    #[serde(rename = "postalCode")]
    postal_code: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct CompletionMap {
    #[serde(rename = "mapType")]
    map_type: String,
    states: Vec<CompletionRegion>,
    #[serde(rename = "defaultFill")]
    default_fill: String,
    #[serde(rename = "highlightColors")]
    highlight_colors: IndexMap<String, String>,
    #[serde(rename = "borderColor")]
    border_color: Option<String>,
    #[serde(rename = "showLabels")]
    show_labels: bool,
}

fn code_regex(domain: MapDomain) -> &'static regex::Regex {
    static US: OnceLock<regex::Regex> = OnceLock::new();
    static WORLD: OnceLock<regex::Regex> = OnceLock::new();
    let cell = match domain {
        MapDomain::Us => &US,
        MapDomain::World => &WORLD,
    };
    cell.get_or_init(|| regex::Regex::new(domain.code_pattern()).unwrap())
}

/// Parses and structurally validates one completion reply, producing a
/// dataset with placeholder values. Any parse or schema failure is a hard
/// failure for the request; nothing gets rendered from a partial reply.
pub fn dataset_from_reply(content: &str) -> Result<MapDataset> {
    let parsed: CompletionMap = serde_json::from_str(content.trim())
        .map_err(|err| Error::model_response(format!("reply is not the expected JSON: {err}")))?;

    let domain = match parsed.map_type.as_str() {
        "us" => MapDomain::Us,
        "world" => MapDomain::World,
        other => {
            return Err(Error::model_response(format!(
                "invalid mapType {other:?} (expected \"us\" or \"world\")"
            )));
        }
    };

    if parsed.states.is_empty() {
        return Err(Error::model_response("empty states array"));
    }

    let pattern = code_regex(domain);
    let mut regions = Vec::with_capacity(parsed.states.len());
    for region in &parsed.states {
        if region.state.trim().is_empty()
            || region.postal_code.trim().is_empty()
            || region.label.trim().is_empty()
        {
            return Err(Error::model_response("region entry with empty field"));
        }
        if !pattern.is_match(&region.postal_code) {
            return Err(Error::model_response(format!(
                "region code {:?} does not match the {} format",
                region.postal_code, domain
            )));
        }
        regions.push(RegionRecord {
            name: region.state.clone(),
            code: region.postal_code.clone(),
            label: region.label.clone(),
            value: PLACEHOLDER_VALUE,
        });
    }

    let styling = StylingConfig {
        default_fill: parsed.default_fill,
        highlight_colors: parsed.highlight_colors,
        border_color: parsed
            .border_color
            .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()),
        show_labels: parsed.show_labels,
        label_color: None,
        label_size: None,
    };

    let dataset = MapDataset {
        domain,
        regions,
        min_value: 0.0,
        max_value: PLACEHOLDER_VALUE,
        styling,
    };
    dataset
        .validate()
        .map_err(|err| Error::model_response(err.to_string()))?;
    Ok(dataset)
}
