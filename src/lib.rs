// src/lib.rs
// ============================================================================
// H5VIEW - Visor de archivos HDF5/NeXus
// ============================================================================
//
// Recorre la jerarquía, clasifica cada dataset y decide cómo mostrarlo:
// texto, gráfico, tabla o imagen (con cortes y contraste para 3D).
// Exporta lo mostrado a CSV/TIFF/PNG/JPEG.
//
// ============================================================================

pub mod error;
pub mod config;
pub mod source;
pub mod tree;
pub mod number;
pub mod classify;
pub mod slice;
pub mod contrast;
pub mod table;
pub mod plot;
pub mod colormap;
pub mod export;
pub mod display;
pub mod browser;

// Re-exports principales
pub use error::{Result, ViewerError};
pub use config::ViewerConfig;
pub use source::{HdfSource, Hdf5Source, MemorySource, ElementKind, EntryInfo, EntryKind};
pub use tree::{TreeNode, hdf_tree, hdf_subtree, open_tree};
pub use classify::{classify, DataValue};
pub use number::{Number, NumericArray};
pub use colormap::Colormap;
pub use export::SaveOutcome;
pub use display::{Controls, DisplayState, DisplayType, Frame, Viewer, Widgets};
pub use browser::{Activation, BrowseError, BrowseMode, DirectoryBrowser};
