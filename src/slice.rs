// src/slice.rs
// ============================================================================
// SLICE - Planos 2D de datos 3D
// ============================================================================
//
// Eje 0 -> a[i, :, :]   (rápido, contiguo)
// Eje 1 -> a[:, i, :]   (lento en volúmenes grandes)
// Eje 2 -> a[:, :, i]   (muy lento: se rechaza por encima del umbral)
//
// ============================================================================

use ndarray::{Array2, ArrayView3, Axis};

use crate::error::{Result, ViewerError};

/// Corte resuelto: eje, índice acotado y máximo del slider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    pub axis: usize,
    pub index: usize,
    /// Último índice válido en el eje elegido
    pub max_index: usize,
    pub notice: Option<String>,
}

/// Decide qué plano leer de un volumen `[depth, height, width]`.
///
/// El índice se acota al tamaño del eje. Cortar por el eje 2 cuando
/// depth y height superan `limit` se rechaza y vuelve al plano 0 del eje 0;
/// el eje 1 con depth y width por encima solo avisa.
pub fn plan_slice(shape: [usize; 3], axis: usize, index: usize, limit: usize) -> SlicePlan {
    let [depth, height, width] = shape;

    if axis == 2 && depth > limit && height > limit {
        log::warn!("Refusing axis-2 slice of {}x{}x{}", depth, height, width);
        return SlicePlan {
            axis: 0,
            index: 0,
            max_index: depth.saturating_sub(1),
            notice: Some("Slicing along axis 2 is very time consuming!".to_string()),
        };
    }

    let axis = axis.min(2);
    let max_index = shape[axis].saturating_sub(1);
    let notice = if axis == 1 && depth > limit && width > limit {
        Some("Slicing along axis 1 can take time !".to_string())
    } else {
        None
    };

    SlicePlan { axis, index: index.min(max_index), max_index, notice }
}

/// Extrae el plano `index` a lo largo de `axis`
pub fn slice_plane(volume: ArrayView3<f64>, axis: usize, index: usize) -> Result<Array2<f64>> {
    let shape = volume.shape().to_vec();
    if axis > 2 || index >= shape[axis] {
        return Err(ViewerError::InvalidSlice { axis, index, shape });
    }
    Ok(volume.index_axis(Axis(axis), index).to_owned())
}
