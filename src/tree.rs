// src/tree.rs
// ============================================================================
// TREE - Jerarquía de grupos/datasets como árbol anidado
// ============================================================================

use std::path::Path;

use serde::Serialize;

use crate::config::has_extension;
use crate::error::{Result, ViewerError};
use crate::source::{join_path, normalize_path, Hdf5Source, HdfSource};

/// Nodo del árbol.
///
/// `id` es el nombre del miembro y `label` la ruta completa (clave única).
/// Solo los grupos llevan `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    /// Número total de nodos (incluido este)
    pub fn count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|c| c.count())
            .sum::<usize>()
    }

    /// Busca un nodo por label
    pub fn find(&self, label: &str) -> Option<&TreeNode> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().flatten().find_map(|c| c.find(label))
    }

    /// Representación indentada, un nodo por línea
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.id);
        out.push('\n');
        if let Some(children) = &self.children {
            render_children(children, "", &mut out);
        }
        out
    }
}

fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, next) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&child.id);
        if child.is_group() {
            out.push('/');
        }
        out.push('\n');
        if let Some(grand) = &child.children {
            render_children(grand, &format!("{}{}", prefix, next), out);
        }
    }
}

fn recurse<S: HdfSource + ?Sized>(source: &S, parent: &str, name: &str) -> Result<TreeNode> {
    let current = join_path(parent, name);
    let info = source
        .lookup(&current)?
        .ok_or_else(|| ViewerError::NotFound(current.clone()))?;

    if !info.is_group() {
        return Ok(TreeNode { id: name.to_string(), label: current, children: None });
    }

    let children = source
        .children(&current)?
        .iter()
        .map(|child| recurse(source, &current, child))
        .collect::<Result<Vec<_>>>()?;

    Ok(TreeNode { id: name.to_string(), label: current, children: Some(children) })
}

/// Convierte la jerarquía completa en un árbol.
/// La raíz se etiqueta con el nombre del archivo (id) y "/" (label).
pub fn hdf_tree<S: HdfSource + ?Sized>(source: &S) -> Result<TreeNode> {
    let mut root = recurse(source, "", "")?;
    root.id = source.root_name();
    root.label = "/".to_string();
    Ok(root)
}

/// Subárbol a partir de una ruta
pub fn hdf_subtree<S: HdfSource + ?Sized>(source: &S, path: &str) -> Result<TreeNode> {
    let p = normalize_path(path);
    if p.is_empty() {
        return hdf_tree(source);
    }
    let (parent, name) = match p.rsplit_once('/') {
        Some((parent, name)) => (parent.to_string(), name.to_string()),
        None => (String::new(), p.clone()),
    };
    recurse(source, &parent, &name)
}

/// Abre un archivo de disco y construye su árbol.
///
/// Extensiones fuera de `allowed` o archivos ilegibles se reportan como
/// entrada inválida.
pub fn open_tree(path: &Path, allowed: &[String]) -> Result<(Hdf5Source, TreeNode)> {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    if !has_extension(&name, allowed) {
        return Err(ViewerError::InvalidInput(path.to_path_buf()));
    }

    let source = Hdf5Source::open(path).map_err(|e| {
        log::warn!("Cannot open {}: {}", path.display(), e);
        ViewerError::InvalidInput(path.to_path_buf())
    })?;
    let tree = hdf_tree(&source)?;
    log::info!("{}: {} nodes", name, tree.count());
    Ok((source, tree))
}
