pub mod banner;
pub mod color;
pub mod document;
pub mod dot;
pub mod layout;
pub mod svg;

pub use banner::print_banner;
pub use color::{CATEGORY_PALETTE, ColorScale};
pub use document::{ColorTable, DocumentError, GraphDocument, GraphLink, GraphNode, NodeRef};
pub use layout::{LayoutOptions, Point, layout};
pub use svg::{RenderError, RenderOptions, render_svg};
