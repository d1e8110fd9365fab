//! Error type for quicklook generation. Every failure is fatal: a figure is
//! either produced whole or not at all.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuicklookError>;

#[derive(Debug, Error)]
pub enum QuicklookError {
    #[error("dataset error: {0}")]
    Dataset(#[from] netcdf_classic::Error),

    #[error("render error: {0}")]
    Render(#[from] renderer::RenderError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("variable '{variable}' has {actual} values, expected {expected} ({times} times x {gates} gates)")]
    ShapeMismatch {
        variable: String,
        actual: usize,
        expected: usize,
        times: usize,
        gates: usize,
    },

    #[error("dataset {0} contains no profiles")]
    EmptyDataset(PathBuf),
}
