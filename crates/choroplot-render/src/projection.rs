use choroplot_core::MapDomain;

/// Equal Earth polynomial coefficients (Šavrič, Patterson, Jenny 2018).
const A1: f64 = 1.340264;
const A2: f64 = -0.081106;
const A3: f64 = 0.000893;
const A4: f64 = 0.003796;

/// Deterministic geographic-to-canvas mapping. Constructed once per render
/// from the domain and canvas size; holds no mutable state, so identical
/// inputs always project identically.
#[derive(Debug, Clone)]
pub enum Projection {
    EqualEarth(EqualEarth),
    AlbersUsa(AlbersUsa),
}

impl Projection {
    pub fn for_domain(domain: MapDomain, width: f64, height: f64) -> Self {
        match domain {
            // Scales follow the hosted defaults for a 960x600 canvas: the
            // continental US fills ~90% of the height, the world map spans
            // dateline to dateline.
            MapDomain::Us => Self::AlbersUsa(AlbersUsa::new(1000.0, width / 2.0, height / 2.0)),
            MapDomain::World => {
                Self::EqualEarth(EqualEarth::new(180.0, width / 2.0, height / 2.0))
            }
        }
    }

    /// Projects a lon/lat degree pair to canvas coordinates. `None` means the
    /// point falls outside every piece of a composite projection.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        match self {
            Self::EqualEarth(p) => p.project(lon, lat),
            Self::AlbersUsa(p) => p.project(lon, lat),
        }
    }
}

/// Equal-area pseudo-cylindrical projection for world maps.
#[derive(Debug, Clone, Copy)]
pub struct EqualEarth {
    scale: f64,
    tx: f64,
    ty: f64,
}

impl EqualEarth {
    pub fn new(scale: f64, tx: f64, ty: f64) -> Self {
        Self { scale, tx, ty }
    }

    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(lon.is_finite() && lat.is_finite()) {
            return None;
        }
        let lambda = lon.to_radians();
        let phi = lat.to_radians();
        let m = 3.0_f64.sqrt() / 2.0;
        let l = (m * phi.sin()).asin();
        let l2 = l * l;
        let l6 = l2 * l2 * l2;
        let x = lambda * l.cos() / (m * (A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2)));
        let y = l * (A1 + A2 * l2 + l6 * (A3 + A4 * l2));
        Some((self.tx + self.scale * x, self.ty - self.scale * y))
    }
}

/// One Albers equal-area conic piece of the US composite, with its screen
/// placement and the clip rectangle that decides whether a projected point
/// belongs to this piece.
#[derive(Debug, Clone, Copy)]
struct ConicPiece {
    n: f64,
    c: f64,
    rho0: f64,
    /// Central meridian, radians.
    lambda0: f64,
    /// Raw projection of the piece's center, subtracted before scaling.
    center: (f64, f64),
    scale: f64,
    tx: f64,
    ty: f64,
    clip: (f64, f64, f64, f64),
}

impl ConicPiece {
    #[allow(clippy::too_many_arguments)]
    fn new(
        parallels: (f64, f64),
        center_lon: f64,
        center_lat: f64,
        scale: f64,
        tx: f64,
        ty: f64,
        clip: (f64, f64, f64, f64),
    ) -> Self {
        let phi1 = parallels.0.to_radians();
        let phi2 = parallels.1.to_radians();
        let n = (phi1.sin() + phi2.sin()) / 2.0;
        let c = phi1.cos().powi(2) + 2.0 * n * phi1.sin();
        let phi0 = center_lat.to_radians();
        let rho0 = (c - 2.0 * n * phi0.sin()).sqrt() / n;
        let mut piece = Self {
            n,
            c,
            rho0,
            lambda0: center_lon.to_radians(),
            center: (0.0, 0.0),
            scale,
            tx,
            ty,
            clip,
        };
        piece.center = piece.raw(center_lon.to_radians(), phi0);
        piece
    }

    fn raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let theta = self.n * (lambda - self.lambda0);
        let rho = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let (rx, ry) = self.raw(lon.to_radians(), lat.to_radians());
        let x = self.tx + self.scale * (rx - self.center.0);
        let y = self.ty - self.scale * (ry - self.center.1);
        let (x0, y0, x1, y1) = self.clip;
        (x.is_finite() && y.is_finite() && x >= x0 && x <= x1 && y >= y0 && y <= y1)
            .then_some((x, y))
    }
}

/// Composite projection for US maps: an Albers conic for the lower 48 with
/// offset insets for Alaska and Hawaii, each claiming a screen rectangle.
/// Points are offered to each piece in order; the first accepting piece wins.
#[derive(Debug, Clone)]
pub struct AlbersUsa {
    lower48: ConicPiece,
    alaska: ConicPiece,
    hawaii: ConicPiece,
}

impl AlbersUsa {
    pub fn new(scale: f64, tx: f64, ty: f64) -> Self {
        let k = scale;
        let lower48 = ConicPiece::new(
            (29.5, 45.5),
            -96.6,
            38.7,
            k,
            tx,
            ty,
            (tx - 0.455 * k, ty - 0.238 * k, tx + 0.455 * k, ty + 0.238 * k),
        );
        let alaska = ConicPiece::new(
            (55.0, 65.0),
            -156.0,
            58.5,
            k * 0.35,
            tx - 0.307 * k,
            ty + 0.201 * k,
            (tx - 0.425 * k, ty + 0.120 * k, tx - 0.214 * k, ty + 0.234 * k),
        );
        let hawaii = ConicPiece::new(
            (8.0, 18.0),
            -160.0,
            19.9,
            k,
            tx - 0.205 * k,
            ty + 0.212 * k,
            (tx - 0.214 * k, ty + 0.166 * k, tx - 0.115 * k, ty + 0.234 * k),
        );
        Self {
            lower48,
            alaska,
            hawaii,
        }
    }

    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !(lon.is_finite() && lat.is_finite()) {
            return None;
        }
        self.lower48
            .project(lon, lat)
            .or_else(|| self.alaska.project(lon, lat))
            .or_else(|| self.hawaii.project(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choroplot_core::{CANVAS_HEIGHT, CANVAS_WIDTH};

    fn world() -> Projection {
        Projection::for_domain(MapDomain::World, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    fn us() -> Projection {
        Projection::for_domain(MapDomain::Us, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    #[test]
    fn equal_earth_centers_origin() {
        let (x, y) = world().project(0.0, 0.0).unwrap();
        assert!((x - 480.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn equal_earth_spans_roughly_the_canvas_width() {
        let (left, _) = world().project(-180.0, 0.0).unwrap();
        let (right, _) = world().project(180.0, 0.0).unwrap();
        let span = right - left;
        assert!(span > 900.0 && span < 1000.0, "span was {span}");
    }

    #[test]
    fn equal_earth_north_is_up() {
        let (_, y_north) = world().project(0.0, 45.0).unwrap();
        let (_, y_south) = world().project(0.0, -45.0).unwrap();
        assert!(y_north < 300.0 && y_south > 300.0);
    }

    #[test]
    fn albers_usa_keeps_the_lower48_on_canvas() {
        let p = us();
        for (lon, lat) in [(-122.4, 37.8), (-74.0, 40.7), (-87.6, 41.9), (-95.4, 29.8)] {
            let (x, y) = p.project(lon, lat).unwrap();
            assert!(x > 0.0 && x < CANVAS_WIDTH, "x {x} for {lon},{lat}");
            assert!(y > 0.0 && y < CANVAS_HEIGHT, "y {y} for {lon},{lat}");
        }
    }

    #[test]
    fn albers_usa_insets_land_bottom_left() {
        let p = us();
        let (ax, ay) = p.project(-149.9, 61.2).unwrap(); // Anchorage
        let (hx, hy) = p.project(-157.8, 21.3).unwrap(); // Honolulu
        assert!(ax < 480.0 && ay > 300.0, "alaska at {ax},{ay}");
        assert!(hx < 480.0 && hy > 300.0, "hawaii at {hx},{hy}");
    }

    #[test]
    fn albers_usa_rejects_points_outside_every_piece() {
        assert!(us().project(2.35, 48.85).is_none()); // Paris
        assert!(us().project(151.2, -33.9).is_none()); // Sydney
    }

    #[test]
    fn projection_is_deterministic() {
        let p = us();
        assert_eq!(p.project(-100.0, 40.0), p.project(-100.0, 40.0));
    }
}
