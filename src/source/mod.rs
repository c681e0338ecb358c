// src/source/mod.rs
// ============================================================================
// SOURCE - Acceso a archivos jerárquicos (HDF5 / NeXus)
// ============================================================================
//
// El trait es la costura entre la lógica del visor y la librería HDF5:
// - Hdf5Source: archivo real vía crate hdf5
// - MemorySource: árbol en memoria (tests, demos)
//
// ============================================================================

pub mod hdf;
pub mod memory;

use ndarray::{Array2, ArrayD};

use crate::error::Result;
use crate::number::NumericArray;

pub use hdf::Hdf5Source;
pub use memory::MemorySource;

/// Tipo de elemento de un dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Integer,
    Unsigned,
    /// IEEE half (2 bytes)
    Float16,
    /// IEEE single (4 bytes)
    Float32,
    /// IEEE double y cualquier otro ancho
    Float,
    Boolean,
    /// Bytes de longitud fija
    FixedAscii,
    /// UTF-8 de longitud fija
    FixedUnicode,
    /// Cadenas de longitud variable (ASCII o UTF-8)
    VarLenString,
    /// Compound, enum, referencias, arrays anidados...
    Other,
}

impl ElementKind {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Unsigned | Self::Float16 | Self::Float32 | Self::Float
        )
    }

    pub fn is_fixed_string(&self) -> bool {
        matches!(self, Self::FixedAscii | Self::FixedUnicode)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Unsigned => "uint",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float => "float",
            Self::Boolean => "bool",
            Self::FixedAscii => "bytes",
            Self::FixedUnicode => "unicode",
            Self::VarLenString => "vlen-str",
            Self::Other => "other",
        }
    }
}

/// Tipo de entrada en el árbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Group,
    Dataset { dtype: ElementKind, shape: Vec<usize> },
}

/// Entrada resuelta por ruta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: String,
    pub kind: EntryKind,
}

impl EntryInfo {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, EntryKind::Group)
    }

    /// Número de elementos (1 para escalares, 0 para grupos)
    pub fn size(&self) -> usize {
        match &self.kind {
            EntryKind::Group => 0,
            EntryKind::Dataset { shape, .. } => shape.iter().product(),
        }
    }
}

/// Archivo jerárquico legible.
///
/// Las rutas son absolutas o relativas a la raíz ("/entry/data" == "entry/data").
pub trait HdfSource {
    /// Nombre base del archivo (etiqueta del nodo raíz)
    fn root_name(&self) -> String;

    /// Resuelve una ruta. None si no existe.
    fn lookup(&self, path: &str) -> Result<Option<EntryInfo>>;

    /// Nombres de los miembros de un grupo, ordenados
    fn children(&self, path: &str) -> Result<Vec<String>>;

    /// Dataset numérico completo como f64 (gráficos, imágenes)
    fn read_array(&self, path: &str) -> Result<ArrayD<f64>>;

    /// Un plano 2D de un dataset 3D
    fn read_slice(&self, path: &str, axis: usize, index: usize) -> Result<Array2<f64>>;

    /// Dataset de cadenas, decodificado como UTF-8
    fn read_strings(&self, path: &str) -> Result<Vec<String>>;

    /// Dataset booleano
    fn read_bools(&self, path: &str) -> Result<Vec<bool>>;

    /// Dataset numérico en su tipo nativo (enteros exactos, f16/f32 sin
    /// pasar por f64). Por defecto convierte read_array al tipo declarado.
    fn read_numeric(&self, path: &str) -> Result<NumericArray> {
        let kind = match self.lookup(path)? {
            Some(EntryInfo { kind: EntryKind::Dataset { dtype, .. }, .. }) => dtype,
            _ => ElementKind::Float,
        };
        Ok(NumericArray::from_f64(kind, self.read_array(path)?))
    }
}

/// Normaliza una ruta: sin '/' inicial ni final, sin segmentos vacíos
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Une una ruta padre con un nombre de miembro
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
