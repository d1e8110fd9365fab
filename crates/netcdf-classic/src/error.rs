//! Error types for classic-format reading and writing.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a NetCDF classic file (bad magic)")]
    BadMagic,

    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),

    #[error("unknown external type code: {0}")]
    UnknownType(u32),

    #[error("corrupt header: {0}")]
    Corrupt(String),

    #[error("missing variable: {0}")]
    MissingVariable(String),

    #[error("missing attribute '{attribute}' on variable '{variable}'")]
    MissingAttribute {
        variable: String,
        attribute: String,
    },

    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("invalid time units string: {0}")]
    InvalidTimeUnits(String),
}
