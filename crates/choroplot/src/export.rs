//! Serializes rendered scenes to downloadable artifacts.
//!
//! Every exporter takes an already-rendered SVG string, so the render step
//! has necessarily settled before anything is read. The byte-size guard
//! catches the remaining failure mode: being handed a scene that rendered
//! empty.

use choroplot_core::MapDataset;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialized scene is too small ({size} bytes); the render has not settled")]
    TooSmall { size: usize },
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Scenes below this size are rejected: a populated 960x600 map never
/// serializes this small, an empty or half-rendered one does.
pub const MIN_SVG_EXPORT_BYTES: usize = 1024;

pub const DEFAULT_FILE_STEM: &str = "world-sales-map";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Jpeg,
    Pdf,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }
}

pub fn default_file_name(format: ExportFormat) -> String {
    format!("{DEFAULT_FILE_STEM}.{}", format.extension())
}

fn guard_size(svg: &str) -> Result<()> {
    let size = svg.len();
    if size < MIN_SVG_EXPORT_BYTES {
        tracing::warn!(size, "refusing to export an undersized scene");
        return Err(ExportError::TooSmall { size });
    }
    Ok(())
}

/// Vector export: the rendered document already carries explicit namespace,
/// dimensions and inline styles, so this is the guard plus bytes.
pub fn export_svg(svg: &str) -> Result<Vec<u8>> {
    guard_size(svg)?;
    Ok(svg.as_bytes().to_vec())
}

/// Self-contained interactive page: the SVG inline, a tooltip overlay that
/// follows the pointer, and teardown of any previous overlay before a new
/// one is created.
pub fn export_html(dataset: &MapDataset, svg: &str) -> Result<String> {
    guard_size(svg)?;
    let title = format!("Choropleth map ({})", dataset.domain);
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{
  background-color: #F9F5F1;
  font-family: ui-sans-serif, system-ui, -apple-system, "Segoe UI", Roboto, Arial, sans-serif;
  margin: 0;
  padding: 20px;
}}
#map {{
  max-width: 960px;
  margin: 0 auto;
}}
.tooltip {{
  position: absolute;
  visibility: hidden;
  background-color: #ffffff;
  padding: 10px;
  border-radius: 5px;
  box-shadow: 0 2px 4px rgba(0,0,0,0.1);
  font-size: 14px;
  pointer-events: none;
}}
</style>
</head>
<body>
<div id="map">
{svg}
</div>
<script>
(function () {{
  // One overlay per render: drop leftovers before creating a fresh one.
  document.querySelectorAll('.tooltip').forEach(function (el) {{ el.remove(); }});
  var tooltip = document.createElement('div');
  tooltip.className = 'tooltip';
  document.body.appendChild(tooltip);
  document.querySelectorAll('path[data-name]').forEach(function (region) {{
    region.addEventListener('mouseover', function () {{
      tooltip.textContent = region.dataset.value
        ? region.dataset.name + ': ' + region.dataset.value
        : region.dataset.name;
      tooltip.style.visibility = 'visible';
    }});
    region.addEventListener('mousemove', function (event) {{
      tooltip.style.top = (event.pageY - 10) + 'px';
      tooltip.style.left = (event.pageX + 10) + 'px';
    }});
    region.addEventListener('mouseout', function () {{
      tooltip.style.visibility = 'hidden';
    }});
  }});
}})();
</script>
</body>
</html>
"#
    ))
}

#[cfg(feature = "raster")]
mod raster {
    use super::{ExportError, Result, guard_size};

    #[derive(Debug, Clone)]
    pub struct RasterOptions {
        pub scale: f32,
        pub background: Option<String>,
        pub jpeg_quality: u8,
    }

    impl Default for RasterOptions {
        fn default() -> Self {
            Self {
                scale: 1.0,
                background: None,
                jpeg_quality: 90,
            }
        }
    }

    /// Letter landscape in points, with the scene fitted inside a margin.
    const PDF_PAGE_WIDTH: f64 = 792.0;
    const PDF_PAGE_HEIGHT: f64 = 612.0;
    const PDF_MARGIN: f64 = 36.0;

    /// Upscale factor applied before embedding the raster in the page.
    const PDF_RASTER_SCALE: f32 = 2.0;

    pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
        guard_size(svg)?;
        let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
        pixmap.encode_png().map_err(|_| ExportError::PngEncode)
    }

    pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
        guard_size(svg)?;
        let bg = options.background.as_deref().unwrap_or("#ffffff");
        let pixmap = svg_to_pixmap(svg, options.scale, Some(bg))?;
        encode_jpeg(&pixmap, options.jpeg_quality)
    }

    /// Document export: rasterize at a fixed 2x upscale, embed the result in
    /// a letter-landscape page, convert the page to PDF.
    pub fn export_pdf(svg: &str) -> Result<Vec<u8>> {
        guard_size(svg)?;
        let pixmap = svg_to_pixmap(svg, PDF_RASTER_SCALE, Some("#ffffff"))?;
        let jpeg = encode_jpeg(&pixmap, 95)?;

        use base64::Engine as _;
        let data = base64::engine::general_purpose::STANDARD.encode(&jpeg);

        let avail_w = PDF_PAGE_WIDTH - 2.0 * PDF_MARGIN;
        let avail_h = PDF_PAGE_HEIGHT - 2.0 * PDF_MARGIN;
        let aspect = f64::from(pixmap.width()) / f64::from(pixmap.height());
        let (w, h) = if avail_w / aspect <= avail_h {
            (avail_w, avail_w / aspect)
        } else {
            (avail_h * aspect, avail_h)
        };
        let x = (PDF_PAGE_WIDTH - w) / 2.0;
        let y = (PDF_PAGE_HEIGHT - h) / 2.0;

        let page = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{PDF_PAGE_WIDTH}" height="{PDF_PAGE_HEIGHT}" viewBox="0 0 {PDF_PAGE_WIDTH} {PDF_PAGE_HEIGHT}"><image x="{x}" y="{y}" width="{w}" height="{h}" xlink:href="data:image/jpeg;base64,{data}"/></svg>"#
        );

        let mut opt = svg2pdf::usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();
        opt.font_family = "Arial".to_string();
        let tree =
            svg2pdf::usvg::Tree::from_str(&page, &opt).map_err(|_| ExportError::SvgParse)?;
        svg2pdf::to_pdf(
            &tree,
            svg2pdf::ConversionOptions::default(),
            svg2pdf::PageOptions::default(),
        )
        .map_err(|_| ExportError::PdfConvert)
    }

    fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        // Region labels are <text> elements; without a font database they
        // silently drop out of the raster.
        opt.fontdb_mut().load_system_fonts();
        opt.font_family = "Arial".to_string();
        let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| ExportError::SvgParse)?;
        let size = tree.size();
        let width_px = (size.width() * scale).ceil().max(1.0) as u32;
        let height_px = (size.height() * scale).ceil().max(1.0) as u32;

        let mut pixmap =
            tiny_skia::Pixmap::new(width_px, height_px).ok_or(ExportError::PixmapAlloc)?;
        if let Some(bg) = background {
            if let Ok([r, g, b]) = choroplot_render::color::parse_hex(bg) {
                pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
            }
        }
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap)
    }

    fn encode_jpeg(pixmap: &tiny_skia::Pixmap, quality: u8) -> Result<Vec<u8>> {
        let (w, h) = (pixmap.width(), pixmap.height());
        // The pixmap buffer is RGBA8; with an opaque background the alpha
        // channel is constant 255 and can be dropped.
        let rgba = pixmap.data();
        let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
        for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
            dst[0] = src[0];
            dst[1] = src[1];
            dst[2] = src[2];
        }
        let mut out = Vec::new();
        let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
        enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
            .map_err(|_| ExportError::JpegEncode)?;
        Ok(out)
    }
}

#[cfg(feature = "raster")]
pub use raster::{RasterOptions, export_pdf, svg_to_jpeg, svg_to_png};
