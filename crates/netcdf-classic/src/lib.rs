//! Pure-Rust access to NetCDF classic (CDF-1/CDF-2) files.
//!
//! Ceilometer product files are written in the classic format, which is a
//! small self-describing binary layout: one header (dimensions, attributes,
//! variables) followed by the variable data, everything big-endian. This
//! crate parses that layout directly, widens values to `f64`, and layers the
//! CF conventions the product files rely on (fill-value masking,
//! scale/offset, `units`-string time decoding) on top. A minimal CDF-1
//! writer is included for producing synthetic datasets.

pub mod cf;
pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use cf::CfTimeUnits;
pub use error::{Error, Result};
pub use reader::Dataset;
pub use types::{AttrValue, Attribute, Dimension, NcType, Variable};
pub use writer::{DimId, FileBuilder, VarId};
