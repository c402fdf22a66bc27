use crate::color::{ColorRamp, ColorScale};
use crate::path::{centroid, geometry_path};
use crate::projection::Projection;
use crate::{Error, Result};
use choroplot_core::boundaries::{BoundarySet, feature_name};
use choroplot_core::{CANVAS_HEIGHT, CANVAS_WIDTH, MapDataset, MapDomain, Resolver, format_value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// One fill-layer shape: projected path, resolved fill color, hover
/// metadata, optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub path: String,
    pub fill: String,
    pub name: String,
    /// Formatted value for matched regions; unmatched regions hover with
    /// the name alone.
    pub value_text: Option<String>,
    pub label: Option<Label>,
}

/// Layered vector scene at the fixed logical canvas size. Layout is a pure
/// function of `(dataset, boundaries)`; rendering it twice yields identical
/// scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub width: f64,
    pub height: f64,
    pub regions: Vec<RegionShape>,
    pub boundary_path: String,
    pub border_color: String,
    pub label_color: String,
    pub label_size: String,
}

pub fn layout_scene(dataset: &MapDataset, boundaries: &BoundarySet) -> Result<MapScene> {
    if dataset.domain != boundaries.domain {
        return Err(Error::DomainMismatch {
            dataset: dataset.domain,
            boundaries: boundaries.domain,
        });
    }

    let projection = Projection::for_domain(dataset.domain, CANVAS_WIDTH, CANVAS_HEIGHT);
    let resolver = Resolver::new(dataset.domain);
    let features = &boundaries.fills.features;

    // record index keyed by resolved feature index; misses simply stay out.
    let mut matched: HashMap<usize, usize> = HashMap::new();
    for (record_index, record) in dataset.regions.iter().enumerate() {
        if let Some(feature_index) = resolver.resolve_index(record, features) {
            matched.entry(feature_index).or_insert(record_index);
        }
    }

    let scale = ColorScale::new(dataset.min_value, dataset.max_value, ColorRamp::greens());
    let styling = &dataset.styling;

    let mut regions = Vec::with_capacity(features.len());
    for (feature_index, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.geometry.as_ref() else {
            tracing::debug!(feature = feature_index, "skipping feature without geometry");
            continue;
        };
        let path = geometry_path(geometry, &projection);
        if path.is_empty() {
            tracing::debug!(feature = feature_index, "skipping feature with no drawable outline");
            continue;
        }

        let record = matched
            .get(&feature_index)
            .map(|&record_index| &dataset.regions[record_index]);

        let fill = match record {
            Some(record) => styling
                .highlight_colors
                .get(&record.code)
                .cloned()
                .unwrap_or_else(|| scale.color(record.value)),
            None => styling.default_fill.clone(),
        };

        let name = record
            .map(|r| r.name.clone())
            .or_else(|| feature_name(feature).map(str::to_string))
            .unwrap_or_else(|| "Unknown".to_string());

        // Labels go only on matched regions, at the projected centroid; a
        // degenerate centroid suppresses that one label.
        let label = match record {
            Some(record) if styling.show_labels => {
                centroid(geometry, &projection).map(|(x, y)| Label {
                    text: match dataset.domain {
                        MapDomain::Us => record.code.clone(),
                        MapDomain::World => record.label.clone(),
                    },
                    x,
                    y,
                })
            }
            _ => None,
        };

        regions.push(RegionShape {
            path,
            fill,
            name,
            value_text: record.map(|r| format_value(r.value)),
            label,
        });
    }

    let mut boundary_path = String::new();
    for feature in &boundaries.outline.features {
        if let Some(geometry) = feature.geometry.as_ref() {
            boundary_path.push_str(&geometry_path(geometry, &projection));
        }
    }

    Ok(MapScene {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        regions,
        boundary_path,
        border_color: styling.border_color.clone(),
        label_color: styling
            .label_color
            .clone()
            .unwrap_or_else(|| "#000000".to_string()),
        label_size: styling
            .label_size
            .clone()
            .unwrap_or_else(|| "12px".to_string()),
    })
}
