// src/source/memory.rs
// ============================================================================
// MEMORY SOURCE - Árbol jerárquico en memoria
// ============================================================================

use std::cell::Cell;
use std::collections::BTreeMap;

use ndarray::{Array2, ArrayD, Ix3, IxDyn};

use super::{join_path, normalize_path, ElementKind, EntryInfo, EntryKind, HdfSource};
use crate::error::{Result, ViewerError};
use crate::number::NumericArray;
use crate::slice::slice_plane;

#[derive(Debug, Clone)]
enum MemNode {
    Group,
    Numeric(NumericArray),
    Strings { dtype: ElementKind, shape: Vec<usize>, values: Vec<String> },
    Bools { shape: Vec<usize>, values: Vec<bool> },
    Opaque { shape: Vec<usize> },
}

/// Archivo en memoria con la misma semántica que un HDF5 real
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    nodes: BTreeMap<String, MemNode>,
    slice_reads: Cell<usize>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(String::new(), MemNode::Group);
        Self { name: name.into(), nodes, slice_reads: Cell::new(0) }
    }

    /// Número de planos leídos con read_slice
    pub fn slice_reads(&self) -> usize {
        self.slice_reads.get()
    }

    fn insert(&mut self, path: &str, node: MemNode) {
        let p = normalize_path(path);
        // Crear grupos intermedios
        let mut parent = String::new();
        let segments: Vec<&str> = p.split('/').collect();
        for seg in &segments[..segments.len().saturating_sub(1)] {
            parent = join_path(&parent, seg);
            self.nodes.entry(parent.clone()).or_insert(MemNode::Group);
        }
        self.nodes.insert(p, node);
    }

    pub fn with_group(mut self, path: &str) -> Self {
        self.insert(path, MemNode::Group);
        self
    }

    /// Dataset de punto flotante
    pub fn with_array(self, path: &str, data: ArrayD<f64>) -> Self {
        self.with_numeric(path, ElementKind::Float, data)
    }

    /// Dataset numérico del tipo indicado, construido desde f64
    pub fn with_numeric(self, path: &str, dtype: ElementKind, data: ArrayD<f64>) -> Self {
        self.with_values(path, NumericArray::from_f64(dtype, data))
    }

    /// Dataset numérico con valores en su tipo nativo
    pub fn with_values(mut self, path: &str, data: NumericArray) -> Self {
        self.insert(path, MemNode::Numeric(data));
        self
    }

    /// Escalar (shape vacío)
    pub fn with_scalar(self, path: &str, dtype: ElementKind, value: f64) -> Self {
        self.with_numeric(path, dtype, ArrayD::from_elem(IxDyn(&[]), value))
    }

    pub fn with_strings(
        mut self,
        path: &str,
        dtype: ElementKind,
        shape: &[usize],
        values: Vec<String>,
    ) -> Self {
        self.insert(path, MemNode::Strings { dtype, shape: shape.to_vec(), values });
        self
    }

    pub fn with_bools(mut self, path: &str, shape: &[usize], values: Vec<bool>) -> Self {
        self.insert(path, MemNode::Bools { shape: shape.to_vec(), values });
        self
    }

    /// Dataset de un tipo que el visor no interpreta (compound, enum...)
    pub fn with_opaque(mut self, path: &str, shape: &[usize]) -> Self {
        self.insert(path, MemNode::Opaque { shape: shape.to_vec() });
        self
    }

    fn node(&self, path: &str) -> Result<&MemNode> {
        self.nodes
            .get(&normalize_path(path))
            .ok_or_else(|| ViewerError::NotFound(path.to_string()))
    }

    fn numeric(&self, path: &str) -> Result<&NumericArray> {
        match self.node(path)? {
            MemNode::Numeric(data) => Ok(data),
            MemNode::Group => Err(ViewerError::NotDataset(path.to_string())),
            _ => Err(ViewerError::Unsupported(format!("{} is not numeric", path))),
        }
    }
}

impl HdfSource for MemorySource {
    fn root_name(&self) -> String {
        self.name.clone()
    }

    fn lookup(&self, path: &str) -> Result<Option<EntryInfo>> {
        let p = normalize_path(path);
        let kind = match self.nodes.get(&p) {
            None => return Ok(None),
            Some(MemNode::Group) => EntryKind::Group,
            Some(MemNode::Numeric(data)) => {
                EntryKind::Dataset { dtype: data.kind(), shape: data.shape().to_vec() }
            }
            Some(MemNode::Strings { dtype, shape, .. }) => {
                EntryKind::Dataset { dtype: *dtype, shape: shape.clone() }
            }
            Some(MemNode::Bools { shape, .. }) => {
                EntryKind::Dataset { dtype: ElementKind::Boolean, shape: shape.clone() }
            }
            Some(MemNode::Opaque { shape }) => {
                EntryKind::Dataset { dtype: ElementKind::Other, shape: shape.clone() }
            }
        };
        let path = if p.is_empty() { "/".to_string() } else { p };
        Ok(Some(EntryInfo { path, kind }))
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        let p = normalize_path(path);
        match self.node(&p)? {
            MemNode::Group => {}
            _ => return Err(ViewerError::Unsupported(format!("{} is not a group", path))),
        }

        let prefix = if p.is_empty() { String::new() } else { format!("{}/", p) };
        // BTreeMap ya devuelve las claves ordenadas
        Ok(self
            .nodes
            .keys()
            .filter(|k| !k.is_empty())
            .filter_map(|k| k.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(|rest| rest.to_string())
            .collect())
    }

    fn read_array(&self, path: &str) -> Result<ArrayD<f64>> {
        Ok(self.numeric(path)?.to_f64())
    }

    fn read_numeric(&self, path: &str) -> Result<NumericArray> {
        Ok(self.numeric(path)?.clone())
    }

    fn read_slice(&self, path: &str, axis: usize, index: usize) -> Result<Array2<f64>> {
        let data = self.numeric(path)?.to_f64();
        let volume = data.view().into_dimensionality::<Ix3>().map_err(|_| {
            ViewerError::InvalidSlice { axis, index, shape: data.shape().to_vec() }
        })?;
        let plane = slice_plane(volume, axis, index)?;
        self.slice_reads.set(self.slice_reads.get() + 1);
        Ok(plane)
    }

    fn read_strings(&self, path: &str) -> Result<Vec<String>> {
        match self.node(path)? {
            MemNode::Strings { values, .. } => Ok(values.clone()),
            _ => Err(ViewerError::Unsupported(format!("{} is not a string dataset", path))),
        }
    }

    fn read_bools(&self, path: &str) -> Result<Vec<bool>> {
        match self.node(path)? {
            MemNode::Bools { values, .. } => Ok(values.clone()),
            _ => Err(ViewerError::Unsupported(format!("{} is not a boolean dataset", path))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn sample() -> MemorySource {
        MemorySource::new("scan.nxs")
            .with_array("entry/data/data", Array3::<f64>::zeros((2, 3, 4)).into_dyn())
            .with_scalar("entry/count", ElementKind::Integer, 7.0)
            .with_group("entry/empty")
    }

    #[test]
    fn test_intermediate_groups() {
        let src = sample();
        let info = src.lookup("/entry/data").unwrap().unwrap();
        assert!(info.is_group());
        assert!(src.lookup("entry/missing").unwrap().is_none());
    }

    #[test]
    fn test_children_sorted() {
        let src = sample();
        assert_eq!(src.children("/").unwrap(), vec!["entry"]);
        assert_eq!(src.children("entry").unwrap(), vec!["count", "data", "empty"]);
        assert!(src.children("entry/count").is_err());
    }

    #[test]
    fn test_read_slice_axes() {
        let src = sample();
        assert_eq!(src.read_slice("entry/data/data", 0, 1).unwrap().dim(), (3, 4));
        assert_eq!(src.read_slice("entry/data/data", 1, 2).unwrap().dim(), (2, 4));
        assert_eq!(src.read_slice("entry/data/data", 2, 3).unwrap().dim(), (2, 3));
        assert!(src.read_slice("entry/data/data", 2, 4).is_err());
        assert_eq!(src.slice_reads(), 3);
    }

    #[test]
    fn test_numeric_keeps_native_type() {
        let big = 9_007_199_254_740_993u64;
        let src = sample()
            .with_values("entry/ids", NumericArray::UInt(ndarray::arr1(&[big, 1]).into_dyn()))
            .with_numeric("entry/gain", ElementKind::Float32, ndarray::arr0(0.5).into_dyn());

        match src.read_numeric("entry/ids").unwrap() {
            NumericArray::UInt(ids) => assert_eq!(ids[[0]], big),
            other => panic!("expected u64 data, got {:?}", other.kind()),
        }
        let info = src.lookup("entry/gain").unwrap().unwrap();
        assert_eq!(
            info.kind,
            EntryKind::Dataset { dtype: ElementKind::Float32, shape: vec![] }
        );
        assert_eq!(src.read_array("entry/count").unwrap()[[]], 7.0);
    }
}
