//! The drawing target a renderer paints into.

use crate::renderer::DiagramHandle;
use crate::svg::{SvgDocument, ViewBox};
use mindmap_core::config::RenderConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Holds the current drawing, its stylesheet and an optional display size.
///
/// A surface holds at most one drawing; rendering replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct DiagramSurface {
    display_size: Option<Size>,
    document: Option<SvgDocument>,
    stylesheet: String,
    handle: Option<DiagramHandle>,
}

impl DiagramSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface with a fixed on-screen size, like an embedded viewer.
    pub fn with_display_size(width: f64, height: f64) -> Self {
        Self {
            display_size: Some(Size::new(width, height)),
            ..Self::default()
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        match (config.surface_width, config.surface_height) {
            (Some(width), Some(height)) => Self::with_display_size(width, height),
            _ => Self::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_none()
    }

    pub fn document(&self) -> Option<&SvgDocument> {
        self.document.as_ref()
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn handle(&self) -> Option<&DiagramHandle> {
        self.handle.as_ref()
    }

    pub fn display_size(&self) -> Option<Size> {
        self.display_size
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        self.document.as_ref().map(SvgDocument::view_box)
    }

    /// Display size when one is set, otherwise the drawing's view box size.
    pub fn natural_bounds(&self) -> Option<Size> {
        self.display_size.or_else(|| {
            self.view_box()
                .map(|view_box| Size::new(view_box.width, view_box.height))
        })
    }

    pub(crate) fn replace(
        &mut self,
        document: SvgDocument,
        stylesheet: String,
        handle: DiagramHandle,
    ) {
        self.document = Some(document);
        self.stylesheet = stylesheet;
        self.handle = Some(handle);
    }

    pub fn clear(&mut self) {
        self.document = None;
        self.stylesheet.clear();
        self.handle = None;
    }

    /// The drawing as a self-contained SVG file with its stylesheet inlined.
    pub fn standalone_svg(&self) -> Option<String> {
        self.document.as_ref().map(|document| {
            let mut document = document.clone();
            document.prepend_style(&self.stylesheet);
            let view_box = document.view_box();
            let size = self
                .display_size
                .unwrap_or(Size::new(view_box.width, view_box.height));
            document.set_size(size.width, size.height);
            document.to_xml()
        })
    }
}
