#![forbid(unsafe_code)]

//! Projection, scene layout and SVG rendering for choropleth maps.
//!
//! The pipeline is deliberately pure: `layout_scene` and `render_svg` are
//! functions of their inputs with no global state, so re-rendering the same
//! dataset reproduces the same document byte for byte.

pub mod color;
pub mod path;
pub mod projection;
pub mod scene;
pub mod svg;

#[cfg(test)]
pub(crate) mod test_fixtures;

use choroplot_core::MapDomain;
use choroplot_core::boundaries::BoundarySet;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dataset domain {dataset} does not match boundary domain {boundaries}")]
    DomainMismatch {
        dataset: MapDomain,
        boundaries: MapDomain,
    },
    #[error("invalid color: {color}")]
    InvalidColor { color: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub use color::{ColorRamp, ColorScale};
pub use projection::Projection;
pub use scene::{Label, MapScene, RegionShape, layout_scene};
pub use svg::render_svg;

/// Lays out and serializes in one step.
pub fn render_dataset_svg(
    dataset: &choroplot_core::MapDataset,
    boundaries: &BoundarySet,
) -> Result<String> {
    Ok(render_svg(&layout_scene(dataset, boundaries)?))
}
