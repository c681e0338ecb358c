// src/source/hdf.rs
// ============================================================================
// HDF5 SOURCE - Lectura de archivos .hdf/.h5/.nxs vía crate hdf5
// ============================================================================

use std::path::{Path, PathBuf};

use half::f16;
use hdf5::types::{
    FixedAscii, FixedUnicode, FloatSize, TypeDescriptor, VarLenAscii, VarLenUnicode,
};
use hdf5::{Dataset, File, H5Type};
use ndarray::{s, Array2, ArrayD};

use super::{normalize_path, ElementKind, EntryInfo, EntryKind, HdfSource};
use crate::error::{Result, ViewerError};
use crate::number::NumericArray;

/// Capacidad máxima (bytes) al leer cadenas de longitud fija.
/// Cadenas más largas se truncan.
pub const STRING_CAPACITY: usize = 1024;

/// Archivo HDF5 abierto en modo lectura
pub struct Hdf5Source {
    path: PathBuf,
    file: File,
}

impl Hdf5Source {
    /// Abre un archivo HDF5 (solo lectura)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        log::info!("Opened {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dataset(&self, path: &str) -> Result<Dataset> {
        match self.lookup(path)? {
            None => Err(ViewerError::NotFound(path.to_string())),
            Some(info) if info.is_group() => Err(ViewerError::NotDataset(path.to_string())),
            Some(info) => Ok(self.file.dataset(&info.path)?),
        }
    }
}

/// Lee un plano 2D en el tipo T
fn read_plane<T: H5Type>(ds: &Dataset, axis: usize, index: usize) -> Result<Array2<T>> {
    let plane = match axis {
        0 => ds.read_slice_2d::<T, _>(s![index, .., ..])?,
        1 => ds.read_slice_2d::<T, _>(s![.., index, ..])?,
        _ => ds.read_slice_2d::<T, _>(s![.., .., index])?,
    };
    Ok(plane)
}

/// Traduce el descriptor de la librería a nuestro ElementKind
pub fn element_kind(desc: &TypeDescriptor) -> ElementKind {
    match desc {
        TypeDescriptor::Integer(_) => ElementKind::Integer,
        TypeDescriptor::Unsigned(_) => ElementKind::Unsigned,
        TypeDescriptor::Float(FloatSize::U2) => ElementKind::Float16,
        TypeDescriptor::Float(FloatSize::U4) => ElementKind::Float32,
        TypeDescriptor::Float(_) => ElementKind::Float,
        TypeDescriptor::Boolean => ElementKind::Boolean,
        TypeDescriptor::FixedAscii(_) => ElementKind::FixedAscii,
        TypeDescriptor::FixedUnicode(_) => ElementKind::FixedUnicode,
        TypeDescriptor::VarLenAscii | TypeDescriptor::VarLenUnicode => ElementKind::VarLenString,
        _ => ElementKind::Other,
    }
}

impl HdfSource for Hdf5Source {
    fn root_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn lookup(&self, path: &str) -> Result<Option<EntryInfo>> {
        let p = normalize_path(path);
        if p.is_empty() {
            return Ok(Some(EntryInfo { path: "/".to_string(), kind: EntryKind::Group }));
        }

        // Primero dataset, luego grupo; si ninguno abre, la ruta no existe
        if let Ok(ds) = self.file.dataset(&p) {
            // Tipos que la librería no sabe describir quedan como Other
            let dtype = ds
                .dtype()
                .and_then(|t| t.to_descriptor())
                .map(|d| element_kind(&d))
                .unwrap_or(ElementKind::Other);
            return Ok(Some(EntryInfo {
                path: p,
                kind: EntryKind::Dataset { dtype, shape: ds.shape() },
            }));
        }

        if self.file.group(&p).is_ok() {
            return Ok(Some(EntryInfo { path: p, kind: EntryKind::Group }));
        }

        Ok(None)
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        let p = normalize_path(path);
        let mut names = if p.is_empty() {
            self.file.member_names()?
        } else {
            self.file.group(&p)?.member_names()?
        };
        names.sort();
        Ok(names)
    }

    fn read_array(&self, path: &str) -> Result<ArrayD<f64>> {
        Ok(self.read_numeric(path)?.to_f64())
    }

    fn read_slice(&self, path: &str, axis: usize, index: usize) -> Result<Array2<f64>> {
        let ds = self.dataset(path)?;
        let shape = ds.shape();
        if shape.len() != 3 || axis > 2 || index >= shape[axis] {
            return Err(ViewerError::InvalidSlice { axis, index, shape });
        }

        log::debug!("Reading plane {} along axis {} of {}", index, axis, path);
        // f16 no tiene conversión nativa a f64 en todas las versiones de libhdf5
        match self.lookup(path)?.map(|info| info.kind) {
            Some(EntryKind::Dataset { dtype: ElementKind::Float16, .. }) => {
                Ok(read_plane::<f16>(&ds, axis, index)?.mapv(|v| v.to_f64()))
            }
            _ => read_plane::<f64>(&ds, axis, index),
        }
    }

    fn read_strings(&self, path: &str) -> Result<Vec<String>> {
        let ds = self.dataset(path)?;
        let desc = ds.dtype()?.to_descriptor()?;

        let strings = match desc {
            TypeDescriptor::VarLenUnicode => ds
                .read_raw::<VarLenUnicode>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            TypeDescriptor::VarLenAscii => ds
                .read_raw::<VarLenAscii>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            TypeDescriptor::FixedAscii(_) => ds
                .read_raw::<FixedAscii<STRING_CAPACITY>>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            TypeDescriptor::FixedUnicode(_) => ds
                .read_raw::<FixedUnicode<STRING_CAPACITY>>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            other => {
                return Err(ViewerError::Unsupported(format!(
                    "{} is not a string dataset ({:?})",
                    path, other
                )))
            }
        };
        Ok(strings)
    }

    fn read_bools(&self, path: &str) -> Result<Vec<bool>> {
        let ds = self.dataset(path)?;
        Ok(ds.read_raw::<bool>()?)
    }

    fn read_numeric(&self, path: &str) -> Result<NumericArray> {
        let ds = self.dataset(path)?;
        let kind = self
            .lookup(path)?
            .and_then(|info| match info.kind {
                EntryKind::Dataset { dtype, .. } => Some(dtype),
                EntryKind::Group => None,
            })
            .unwrap_or(ElementKind::Other);

        // Cada tipo se lee en su ancho nativo
        let array = match kind {
            ElementKind::Integer => NumericArray::Int(ds.read_dyn::<i64>()?),
            ElementKind::Unsigned => NumericArray::UInt(ds.read_dyn::<u64>()?),
            ElementKind::Float16 => NumericArray::Half(ds.read_dyn::<f16>()?),
            ElementKind::Float32 => NumericArray::Float32(ds.read_dyn::<f32>()?),
            ElementKind::Float => NumericArray::Float(ds.read_dyn::<f64>()?),
            other => {
                return Err(ViewerError::Unsupported(format!(
                    "{} is not numeric ({})",
                    path,
                    other.name()
                )))
            }
        };
        Ok(array)
    }
}
