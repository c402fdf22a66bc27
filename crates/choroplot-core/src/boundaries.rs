use crate::model::MapDomain;
use crate::{Error, Result};
use geojson::{Feature, FeatureCollection, GeoJson};
use std::path::{Path, PathBuf};

/// On-disk locations of the two boundary dataset pairs. Each domain ships a
/// "fill" collection (one feature per region) and a separate outline-only
/// dataset used for the stroked boundary layer.
#[derive(Debug, Clone)]
pub struct BoundaryPaths {
    pub us_fills: PathBuf,
    pub us_outline: PathBuf,
    pub world_fills: PathBuf,
    pub world_outline: PathBuf,
}

impl Default for BoundaryPaths {
    fn default() -> Self {
        Self {
            us_fills: PathBuf::from("geojson/US_states.geojson"),
            us_outline: PathBuf::from("geojson/US_bounds.geojson"),
            world_fills: PathBuf::from("geojson/countries.geojson"),
            world_outline: PathBuf::from("geojson/country_bounds.geojson"),
        }
    }
}

impl BoundaryPaths {
    /// Conventional file names resolved against a dataset directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            us_fills: dir.join("US_states.geojson"),
            us_outline: dir.join("US_bounds.geojson"),
            world_fills: dir.join("countries.geojson"),
            world_outline: dir.join("country_bounds.geojson"),
        }
    }

    pub fn load(&self, domain: MapDomain) -> Result<BoundarySet> {
        let (fills, outline) = match domain {
            MapDomain::Us => (&self.us_fills, &self.us_outline),
            MapDomain::World => (&self.world_fills, &self.world_outline),
        };
        Ok(BoundarySet {
            domain,
            fills: read_feature_collection(fills)?,
            outline: read_feature_collection(outline)?,
        })
    }
}

/// Boundary data for one domain, read-only once loaded.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    pub domain: MapDomain,
    pub fills: FeatureCollection,
    pub outline: FeatureCollection,
}

fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let file = std::fs::File::open(path).map_err(|err| Error::Boundary {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let geojson =
        GeoJson::from_reader(std::io::BufReader::new(file)).map_err(|err| Error::Boundary {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
    collection_from_geojson(geojson).ok_or_else(|| Error::Boundary {
        path: path.display().to_string(),
        message: "expected a FeatureCollection, Feature or Geometry".to_string(),
    })
}

/// Accepts any of the three GeoJSON top-level shapes and normalizes to a
/// FeatureCollection; outline datasets in the wild use all of them.
pub fn collection_from_geojson(geojson: GeoJson) -> Option<FeatureCollection> {
    match geojson {
        GeoJson::FeatureCollection(fc) => Some(fc),
        GeoJson::Feature(feature) => Some(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        GeoJson::Geometry(geometry) => Some(FeatureCollection {
            bbox: None,
            features: vec![Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            }],
            foreign_members: None,
        }),
    }
}

/// The code-like property of a boundary feature. The property name is
/// dataset-dependent: US states carry `postal`, country datasets disagree on
/// the ISO column's casing.
pub fn feature_code(feature: &Feature, domain: MapDomain) -> Option<&str> {
    let keys: &[&str] = match domain {
        MapDomain::Us => &["postal", "STUSPS"],
        MapDomain::World => &["ISO_A3", "iso_a3", "ADM0_A3", "adm0_a3"],
    };
    property_str(feature, keys)
}

pub fn feature_name(feature: &Feature) -> Option<&str> {
    property_str(feature, &["NAME", "name", "ADMIN", "admin"])
}

fn property_str<'a>(feature: &'a Feature, keys: &[&str]) -> Option<&'a str> {
    let properties = feature.properties.as_ref()?;
    keys.iter()
        .find_map(|key| properties.get(*key).and_then(|v| v.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(properties: serde_json::Value) -> Feature {
        Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: match properties {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            },
            foreign_members: None,
        }
    }

    #[test]
    fn feature_code_prefers_postal_for_us() {
        let f = feature(json!({ "postal": "CA", "NAME": "California" }));
        assert_eq!(feature_code(&f, MapDomain::Us), Some("CA"));
        assert_eq!(feature_code(&f, MapDomain::World), None);
    }

    #[test]
    fn feature_code_accepts_iso_spellings() {
        let upper = feature(json!({ "ISO_A3": "FRA" }));
        let lower = feature(json!({ "iso_a3": "FRA" }));
        assert_eq!(feature_code(&upper, MapDomain::World), Some("FRA"));
        assert_eq!(feature_code(&lower, MapDomain::World), Some("FRA"));
    }

    #[test]
    fn geometry_document_normalizes_to_collection() {
        let geojson = GeoJson::Geometry(geojson::Geometry::new(geojson::Value::LineString(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        ])));
        let fc = collection_from_geojson(geojson).unwrap();
        assert_eq!(fc.features.len(), 1);
    }
}
