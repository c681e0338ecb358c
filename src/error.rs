// src/error.rs
// ============================================================================
// ERRORES - Errores tipados de la librería
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Errores del visor
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Path '{0}' not found in file")]
    NotFound(String),

    #[error("'{0}' is not a dataset")]
    NotDataset(String),

    #[error("Unsupported data: {0}")]
    Unsupported(String),

    #[error("Invalid slice: axis {axis}, index {index} for shape {shape:?}")]
    InvalidSlice {
        axis: usize,
        index: usize,
        shape: Vec<usize>,
    },

    #[error("Input must be hdf, nxs, or h5 format!")]
    InvalidInput(PathBuf),

    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
