#![forbid(unsafe_code)]

//! `choroplot` turns a natural-language description or a spreadsheet into a
//! choropleth map rendered as standalone SVG, exportable as PNG/JPG/PDF or a
//! self-contained interactive HTML page.
//!
//! # Features
//!
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization

pub use choroplot_core::*;

pub mod export;

use choroplot_core::boundaries::BoundarySet;

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Core(#[from] choroplot_core::Error),
    #[error(transparent)]
    Render(#[from] choroplot_render::Error),
    #[error(transparent)]
    Export(#[from] export::ExportError),
}

pub type Result<T> = std::result::Result<T, HeadlessError>;

/// Convenience wrapper bundling boundary locations and proxy configuration
/// for the whole generate-resolve-render pipeline.
///
/// Intended for UI integrations where passing 3-4 separate parameters per
/// call is noisy. Rendering itself is CPU-bound; the only I/O is the boundary
/// file read and, in description mode, one proxy round-trip.
#[derive(Debug, Clone, Default)]
pub struct MapGenerator {
    pub boundaries: BoundaryPaths,
    pub proxy: Option<ProxyConfig>,
}

impl MapGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boundary_dir(mut self, dir: impl AsRef<std::path::Path>) -> Self {
        self.boundaries = BoundaryPaths::in_dir(dir);
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Normalizes an uploaded spreadsheet (`.csv`, `.xlsx`, `.xls`).
    pub fn generate_from_spreadsheet_sync(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<MapDataset> {
        Ok(normalize::spreadsheet::from_path(path)?)
    }

    /// Normalizes CSV data from an in-memory reader (uploads that never
    /// touch disk).
    pub fn generate_from_csv_reader_sync(
        &self,
        reader: impl std::io::Read,
    ) -> Result<MapDataset> {
        Ok(normalize::spreadsheet::from_csv_reader(reader)?)
    }

    /// Normalizes a free-text description. With a configured proxy the
    /// description goes to the completion service; without one the local
    /// pattern parser takes over (no external call).
    pub fn generate_from_description_sync(&self, description: &str) -> Result<MapDataset> {
        match &self.proxy {
            Some(config) => {
                let client = CompletionProxy::new(config.clone())?;
                Ok(normalize::describe(&client, description)?)
            }
            None => {
                tracing::debug!("no proxy configured, using the local description parser");
                Ok(normalize::fallback::parse_description(description)?)
            }
        }
    }

    /// Description mode with a caller-provided completion client.
    pub fn generate_with_client_sync(
        &self,
        client: &dyn CompletionClient,
        description: &str,
    ) -> Result<MapDataset> {
        Ok(normalize::describe(client, description)?)
    }

    pub fn load_boundaries(&self, domain: MapDomain) -> Result<BoundarySet> {
        Ok(self.boundaries.load(domain)?)
    }

    /// Renders a dataset to a standalone SVG document, loading the domain's
    /// boundary datasets from disk.
    pub fn render_svg_sync(&self, dataset: &MapDataset) -> Result<String> {
        let boundaries = self.load_boundaries(dataset.domain)?;
        self.render_svg_with(dataset, &boundaries)
    }

    /// Renders against already-loaded boundaries (no I/O).
    pub fn render_svg_with(
        &self,
        dataset: &MapDataset,
        boundaries: &BoundarySet,
    ) -> Result<String> {
        Ok(choroplot_render::render_dataset_svg(dataset, boundaries)?)
    }

    pub async fn generate_from_description(&self, description: &str) -> Result<MapDataset> {
        self.generate_from_description_sync(description)
    }

    pub async fn render_svg(&self, dataset: &MapDataset) -> Result<String> {
        self.render_svg_sync(dataset)
    }
}
