//! Mind-map rendering: outline parsing, tidy-tree layout, SVG drawing and
//! PNG export.

pub mod export;
pub mod layout;
pub mod node;
pub mod renderer;
pub mod style;
pub mod surface;
pub mod svg;

pub use export::{DiagramExporter, ExportedImage, PNG_CONTENT_TYPE, target_size};
pub use layout::{DiagramLayout, LayoutOptions};
pub use node::{DiagramNode, NodeKind};
pub use renderer::{DiagramHandle, DiagramRenderer};
pub use surface::{DiagramSurface, Size};
pub use svg::{SvgDocument, ViewBox};
