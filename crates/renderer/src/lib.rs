//! Raster rendering primitives for quicklook figures.
//!
//! This crate draws time-height pseudocolor plots onto an in-memory RGBA
//! canvas and encodes the result as PNG. Text is set in an embedded
//! TrueType font via `rusttype` and `imageproc`, and PNG output is
//! hand-assembled over flate2 and crc32fast.

pub mod canvas;
pub mod colormap;
pub mod error;
pub mod legend;
pub mod mesh;
pub mod png;
pub mod text;

pub use canvas::{Canvas, Rect};
pub use colormap::{by_name, interpolate_color, Color, Colormap, LogScale};
pub use error::{RenderError, RenderResult};
pub use legend::draw_colorbar;
pub use mesh::{edges_from_centers, rasterize_mesh};
pub use png::{encode_auto, encode_canvas, encode_indexed, encode_rgba};
pub use text::TextRenderer;
