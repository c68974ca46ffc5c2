//! Raster export of a rendered surface.
//!
//! Pipeline: size the target, duplicate the drawing with its stylesheet
//! inlined, wrap it in a `data:` URI, rasterize the decoded vector onto a
//! white supersampled canvas and encode the result as PNG.

use crate::surface::{DiagramSurface, Size};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, RgbaImage};
use mindmap_core::config::ExportConfig;
use mindmap_core::error::{MindmapError, Result};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// A finished PNG export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub file_name: String,
    /// Pixel size of the PNG (target size times the supersample factor).
    pub width: u32,
    pub height: u32,
    pub target: Size,
    pub bytes: Vec<u8>,
}

/// Fits `natural` into `max_width` x `max_height`.
///
/// The aspect ratio comes from `view_box`. Width is clamped first; height is
/// clamped after, so a very tall drawing ends up bounded by height.
pub fn target_size(natural: Size, view_box: Size, max_width: f64, max_height: f64) -> Result<Size> {
    let aspect = view_box.width / view_box.height;
    if !aspect.is_finite() || aspect <= 0.0 || natural.width <= 0.0 || natural.height <= 0.0 {
        return Err(MindmapError::export(format!(
            "Degenerate drawing size {}x{} (view box {}x{})",
            natural.width, natural.height, view_box.width, view_box.height
        )));
    }

    let mut width = natural.width;
    let mut height = natural.height;
    if width > max_width {
        width = max_width;
        height = width / aspect;
    }
    if height > max_height {
        height = max_height;
        width = height * aspect;
    }
    Ok(Size::new(width, height))
}

pub fn to_data_uri(svg: &str) -> String {
    format!("{SVG_DATA_URI_PREFIX}{}", STANDARD.encode(svg.as_bytes()))
}

pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let payload = uri
        .strip_prefix(SVG_DATA_URI_PREFIX)
        .ok_or_else(|| MindmapError::export("Not an SVG data URI"))?;
    STANDARD
        .decode(payload)
        .map_err(|e| MindmapError::export(format!("Failed to decode SVG data URI: {e}")))
}

/// Exports surfaces to PNG, one at a time.
pub struct DiagramExporter {
    config: ExportConfig,
    busy: AtomicBool,
    fontdb: OnceLock<Arc<fontdb::Database>>,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MindmapError::ExportBusy)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for DiagramExporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl DiagramExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            busy: AtomicBool::new(false),
            fontdb: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Rasterizes the surface's current drawing.
    ///
    /// Blocking and CPU-bound. Fails with [`MindmapError::ExportBusy`] while
    /// another export holds this exporter; the surface is never modified.
    pub fn export_raster(&self, surface: &DiagramSurface) -> Result<ExportedImage> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        tracing::info!("[Export] Starting mind map export");

        let document = surface
            .document()
            .ok_or_else(|| MindmapError::export("Nothing has been rendered yet"))?;
        let view_box = document.view_box();
        let view_box_size = Size::new(view_box.width, view_box.height);
        let natural = surface.natural_bounds().unwrap_or(view_box_size);
        let target = target_size(
            natural,
            view_box_size,
            self.config.max_width,
            self.config.max_height,
        )?;
        tracing::debug!(
            "[Export] Natural {:.1}x{:.1}, target {:.1}x{:.1}",
            natural.width,
            natural.height,
            target.width,
            target.height
        );

        let mut standalone = document.clone();
        standalone.prepend_style(surface.stylesheet());
        standalone.set_size(target.width, target.height);
        let uri = to_data_uri(&standalone.to_xml());

        let pixmap = self.rasterize(&uri, target)?;
        let (width, height) = (pixmap.width(), pixmap.height());
        let bytes = encode_png(pixmap)?;
        tracing::info!(
            "[Export] Exported {} ({}x{}, {} bytes)",
            self.config.file_name,
            width,
            height,
            bytes.len()
        );

        Ok(ExportedImage {
            file_name: self.config.file_name.clone(),
            width,
            height,
            target,
            bytes,
        })
    }

    fn fontdb(&self) -> Arc<fontdb::Database> {
        self.fontdb
            .get_or_init(|| {
                let mut db = fontdb::Database::new();
                db.load_system_fonts();
                tracing::debug!("[Export] Loaded {} font faces", db.len());
                Arc::new(db)
            })
            .clone()
    }

    fn rasterize(&self, uri: &str, target: Size) -> Result<Pixmap> {
        let data = decode_data_uri(uri)?;
        let options = usvg::Options {
            fontdb: self.fontdb(),
            shape_rendering: usvg::ShapeRendering::GeometricPrecision,
            text_rendering: usvg::TextRendering::OptimizeLegibility,
            image_rendering: usvg::ImageRendering::OptimizeQuality,
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_data(&data, &options)
            .map_err(|e| MindmapError::export(format!("Failed to load SVG image: {e}")))?;

        let scale = self.config.supersample;
        let pixel_width = (target.width * scale).round().max(1.0) as u32;
        let pixel_height = (target.height * scale).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(pixel_width, pixel_height).ok_or_else(|| {
            MindmapError::export(format!(
                "Failed to allocate {pixel_width}x{pixel_height} canvas"
            ))
        })?;
        pixmap.fill(Color::WHITE);

        let size = tree.size();
        let transform = Transform::from_scale(
            pixel_width as f32 / size.width(),
            pixel_height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

fn encode_png(pixmap: Pixmap) -> Result<Vec<u8>> {
    let (width, height) = (pixmap.width(), pixmap.height());
    // Opaque background: premultiplied and straight RGBA coincide.
    let rgba = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| MindmapError::export("Canvas buffer has unexpected length"))?;
    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut bytes = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| MindmapError::export(format!("Failed to encode PNG: {e}")))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DiagramRenderer;
    use mindmap_core::outline::Outline;

    fn rendered(surface: DiagramSurface, markdown: &str) -> DiagramSurface {
        let mut surface = surface;
        DiagramRenderer::default()
            .render(&mut surface, &Outline::from_markdown(markdown))
            .unwrap();
        surface
    }

    #[test]
    fn test_target_size_wide_drawing() {
        let size = Size::new(5000.0, 2000.0);
        let target = target_size(size, size, 3840.0, 2160.0).unwrap();
        assert_eq!(target, Size::new(3840.0, 1536.0));
    }

    #[test]
    fn test_target_size_tall_drawing_clamps_height() {
        let size = Size::new(1000.0, 5000.0);
        let target = target_size(size, size, 3840.0, 2160.0).unwrap();
        assert_eq!(target.height, 2160.0);
        assert!((target.width - 432.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_size_never_exceeds_limits() {
        for (w, h) in [
            (100.0, 50.0),
            (3840.0, 2160.0),
            (8000.0, 8000.0),
            (4000.0, 100.0),
            (50.0, 9000.0),
            (3900.0, 2200.0),
        ] {
            let size = Size::new(w, h);
            let target = target_size(size, size, 3840.0, 2160.0).unwrap();
            assert!(target.width <= 3840.0 + 1e-9, "{w}x{h} -> {target:?}");
            assert!(target.height <= 2160.0 + 1e-9, "{w}x{h} -> {target:?}");
            let aspect = w / h;
            assert!(((target.width / target.height) - aspect).abs() / aspect < 1e-6);
        }
    }

    #[test]
    fn test_target_size_keeps_small_drawings() {
        let size = Size::new(640.0, 480.0);
        assert_eq!(target_size(size, size, 3840.0, 2160.0).unwrap(), size);
    }

    #[test]
    fn test_target_size_rejects_degenerate() {
        let zero = Size::new(0.0, 0.0);
        assert!(matches!(
            target_size(zero, zero, 3840.0, 2160.0),
            Err(MindmapError::ExportFailure(_))
        ));
    }

    #[test]
    fn test_data_uri_round_trip() {
        let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\"><text>思维导图</text></svg>";
        let uri = to_data_uri(svg);
        assert!(uri.starts_with(SVG_DATA_URI_PREFIX));
        assert_eq!(decode_data_uri(&uri).unwrap(), svg.as_bytes());
        assert!(decode_data_uri("data:text/plain;base64,AAAA").is_err());
    }

    #[test]
    fn test_export_without_drawing_fails() {
        let exporter = DiagramExporter::default();
        let err = exporter.export_raster(&DiagramSurface::new()).unwrap_err();
        assert!(matches!(err, MindmapError::ExportFailure(_)));
        assert!(!exporter.is_busy());
    }

    #[test]
    fn test_export_is_supersampled_png() {
        let surface = rendered(DiagramSurface::new(), "# 对话分析\n## 背景\n## 结论");
        let exporter = DiagramExporter::default();

        let image = exporter.export_raster(&surface).unwrap();

        assert_eq!(image.file_name, "mindmap.png");
        assert_eq!(image.width, (image.target.width * 2.0).round() as u32);
        assert_eq!(image.height, (image.target.height * 2.0).round() as u32);
        assert_eq!(&image.bytes[1..4], b"PNG");
        assert!(!exporter.is_busy());
    }

    #[test]
    fn test_export_uses_display_size() {
        let surface = rendered(DiagramSurface::with_display_size(400.0, 300.0), "# R\n## A");
        let image = DiagramExporter::default().export_raster(&surface).unwrap();

        assert_eq!(image.target, Size::new(400.0, 300.0));
        assert_eq!((image.width, image.height), (800, 600));
    }

    #[test]
    fn test_export_while_busy_is_rejected() {
        let surface = rendered(DiagramSurface::new(), "# R");
        let exporter = DiagramExporter::default();

        {
            let _held = BusyGuard::acquire(&exporter.busy).unwrap();
            assert!(exporter.is_busy());
            assert_eq!(
                exporter.export_raster(&surface).unwrap_err(),
                MindmapError::ExportBusy
            );
        }

        assert!(!exporter.is_busy());
        assert!(exporter.export_raster(&surface).is_ok());
    }

    #[test]
    fn test_export_leaves_surface_untouched() {
        let surface = rendered(DiagramSurface::new(), "# R\n## A");
        let before = surface.document().cloned();

        DiagramExporter::default().export_raster(&surface).unwrap();

        assert_eq!(surface.document().cloned(), before);
    }
}
