//! Small synthetic boundary sets used by the unit tests: axis-aligned
//! quadrilaterals standing in for real country/state polygons.

use choroplot_core::MapDomain;
use choroplot_core::boundaries::BoundarySet;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::json;

fn square_feature(
    properties: serde_json::Value,
    lon0: f64,
    lat0: f64,
    lon1: f64,
    lat1: f64,
) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![vec![
            vec![lon0, lat0],
            vec![lon1, lat0],
            vec![lon1, lat1],
            vec![lon0, lat1],
            vec![lon0, lat0],
        ]]))),
        id: None,
        properties: match properties {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        },
        foreign_members: None,
    }
}

fn outline(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::MultiLineString(vec![vec![
                vec![lon0, lat0],
                vec![lon1, lat0],
                vec![lon1, lat1],
                vec![lon0, lat1],
                vec![lon0, lat0],
            ]]))),
            id: None,
            properties: None,
            foreign_members: None,
        }],
        foreign_members: None,
    }
}

pub fn world_boundaries() -> BoundarySet {
    BoundarySet {
        domain: MapDomain::World,
        fills: FeatureCollection {
            bbox: None,
            features: vec![
                square_feature(
                    json!({ "ISO_A3": "FRA", "NAME": "France" }),
                    0.0,
                    42.0,
                    8.0,
                    50.0,
                ),
                square_feature(
                    json!({ "ISO_A3": "DEU", "NAME": "Germany" }),
                    8.0,
                    47.0,
                    16.0,
                    55.0,
                ),
                square_feature(
                    json!({ "ISO_A3": "ESP", "NAME": "Spain" }),
                    -8.0,
                    36.0,
                    0.0,
                    43.0,
                ),
            ],
            foreign_members: None,
        },
        outline: outline(-8.0, 36.0, 16.0, 55.0),
    }
}

pub fn us_boundaries() -> BoundarySet {
    BoundarySet {
        domain: MapDomain::Us,
        fills: FeatureCollection {
            bbox: None,
            features: vec![
                square_feature(
                    json!({ "postal": "CA", "NAME": "California" }),
                    -124.0,
                    33.0,
                    -114.0,
                    42.0,
                ),
                square_feature(
                    json!({ "postal": "MT", "NAME": "Montana" }),
                    -116.0,
                    44.0,
                    -104.0,
                    49.0,
                ),
                square_feature(
                    json!({ "postal": "NY", "NAME": "New York" }),
                    -79.0,
                    40.0,
                    -72.0,
                    45.0,
                ),
            ],
            foreign_members: None,
        },
        outline: outline(-124.0, 33.0, -72.0, 49.0),
    }
}
