use crate::projection::Projection;
use geojson::{Geometry, Value};
use std::fmt::Write as _;

/// SVG path data for one boundary geometry under a projection. Pure
/// function: identical inputs always produce identical output text.
pub fn geometry_path(geometry: &Geometry, projection: &Projection) -> String {
    let mut out = String::new();
    write_value(&mut out, &geometry.value, projection);
    out
}

fn write_value(out: &mut String, value: &Value, projection: &Projection) {
    match value {
        Value::Polygon(rings) => {
            for ring in rings {
                write_ring(out, ring, projection, true);
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                for ring in rings {
                    write_ring(out, ring, projection, true);
                }
            }
        }
        Value::LineString(line) => write_ring(out, line, projection, false),
        Value::MultiLineString(lines) => {
            for line in lines {
                write_ring(out, line, projection, false);
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                write_value(out, &geometry.value, projection);
            }
        }
        // Point data has no outline to draw.
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

fn write_ring(out: &mut String, ring: &[Vec<f64>], projection: &Projection, close: bool) {
    let points = project_ring(ring, projection);
    if points.len() < 2 {
        return;
    }
    for (i, (x, y)) in points.iter().enumerate() {
        let _ = write!(out, "{}{},{}", if i == 0 { 'M' } else { 'L' }, fmt(*x), fmt(*y));
    }
    if close {
        out.push('Z');
    }
}

fn project_ring(ring: &[Vec<f64>], projection: &Projection) -> Vec<(f64, f64)> {
    ring.iter()
        .filter_map(|position| {
            let lon = *position.first()?;
            let lat = *position.get(1)?;
            projection.project(lon, lat)
        })
        .collect()
}

/// Area-weighted centroid of the projected polygon rings, in canvas
/// coordinates. `None` for degenerate or non-areal geometry — callers
/// suppress that label and keep rendering.
pub fn centroid(geometry: &Geometry, projection: &Projection) -> Option<(f64, f64)> {
    let mut acc = CentroidAccumulator::default();
    accumulate(&mut acc, &geometry.value, projection);
    acc.finish()
}

#[derive(Default)]
struct CentroidAccumulator {
    area2: f64,
    cx: f64,
    cy: f64,
}

impl CentroidAccumulator {
    fn add_ring(&mut self, points: &[(f64, f64)]) {
        if points.len() < 3 {
            return;
        }
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            let cross = x0 * y1 - x1 * y0;
            self.area2 += cross;
            self.cx += (x0 + x1) * cross;
            self.cy += (y0 + y1) * cross;
        }
    }

    fn finish(self) -> Option<(f64, f64)> {
        if self.area2.abs() < 1e-9 {
            return None;
        }
        let x = self.cx / (3.0 * self.area2);
        let y = self.cy / (3.0 * self.area2);
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }
}

fn accumulate(acc: &mut CentroidAccumulator, value: &Value, projection: &Projection) {
    match value {
        Value::Polygon(rings) => {
            for ring in rings {
                acc.add_ring(&project_ring(ring, projection));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                for ring in rings {
                    acc.add_ring(&project_ring(ring, projection));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                accumulate(acc, &geometry.value, projection);
            }
        }
        _ => {}
    }
}

/// Coordinate formatting: 2 decimal places with trailing zeros trimmed.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let r = (v * 100.0).round() / 100.0;
    let mut s = format!("{r:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choroplot_core::MapDomain;

    fn square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Geometry {
        Geometry::new(Value::Polygon(vec![vec![
            vec![lon0, lat0],
            vec![lon1, lat0],
            vec![lon1, lat1],
            vec![lon0, lat1],
            vec![lon0, lat0],
        ]]))
    }

    fn world() -> Projection {
        Projection::for_domain(MapDomain::World, 960.0, 600.0)
    }

    #[test]
    fn polygon_path_is_closed_and_deterministic() {
        let geometry = square(0.0, 0.0, 10.0, 10.0);
        let p = world();
        let a = geometry_path(&geometry, &p);
        let b = geometry_path(&geometry, &p);
        assert_eq!(a, b);
        assert!(a.starts_with('M'));
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn linestring_path_is_open() {
        let geometry = Geometry::new(Value::LineString(vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
        ]));
        let path = geometry_path(&geometry, &world());
        assert!(path.starts_with('M'));
        assert!(!path.ends_with('Z'));
    }

    #[test]
    fn centroid_of_equatorial_square_sits_near_its_middle() {
        let geometry = square(-10.0, -10.0, 10.0, 10.0);
        let (x, y) = centroid(&geometry, &world()).unwrap();
        assert!((x - 480.0).abs() < 2.0, "x was {x}");
        assert!((y - 300.0).abs() < 2.0, "y was {y}");
    }

    #[test]
    fn centroid_of_degenerate_geometry_is_none() {
        let geometry = Geometry::new(Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        ]]));
        assert!(centroid(&geometry, &world()).is_none());
        let point = Geometry::new(Value::Point(vec![0.0, 0.0]));
        assert!(centroid(&point, &world()).is_none());
    }

    #[test]
    fn out_of_projection_points_are_skipped_not_nan() {
        let p = Projection::for_domain(MapDomain::Us, 960.0, 600.0);
        // A ring straddling the composite's coverage: foreign points drop out.
        let geometry = Geometry::new(Value::Polygon(vec![vec![
            vec![-100.0, 40.0],
            vec![2.35, 48.85],
            vec![-101.0, 41.0],
            vec![-100.0, 40.0],
        ]]));
        let path = geometry_path(&geometry, &p);
        assert!(!path.contains("NaN"));
    }

    #[test]
    fn fmt_trims_trailing_zeros() {
        assert_eq!(fmt(480.0), "480");
        assert_eq!(fmt(12.345), "12.35");
        assert_eq!(fmt(12.10), "12.1");
        assert_eq!(fmt(f64::NAN), "0");
    }
}
