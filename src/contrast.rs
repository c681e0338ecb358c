// src/contrast.rs
// ============================================================================
// CONTRAST - Estiramiento a rango de bytes y recorte min/max
// ============================================================================
//
// 1. Rango real del plano [vmin, vmax] (ignorando NaN)
// 2. Normalización a u8: 255 * (v - vmin) / (vmax - vmin), truncado
// 3. Recorte a [min, max] elegidos por el usuario
//
// Un plano plano (vmin == vmax) queda en ceros.
//
// ============================================================================

use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayView2, Zip};

/// Niveles por defecto (sin ajuste)
pub const LEVEL_MIN: u8 = 0;
pub const LEVEL_MAX: u8 = 255;

/// Resultado de aplicar contraste
#[derive(Debug, Clone, PartialEq)]
pub struct Contrast {
    pub image: Array2<f64>,
    /// Niveles efectivos (min puede haberse corregido)
    pub min: u8,
    pub max: u8,
    /// false si se mostró el plano sin modificar
    pub adjusted: bool,
}

/// Rango de valores finitos-o-infinitos no NaN. None si no hay ninguno.
pub fn value_range(plane: ArrayView2<f64>) -> Option<(f64, f64)> {
    let (lo, hi) = plane
        .par_iter()
        .map(|&v| v)
        .filter(|v| !v.is_nan())
        .fold(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        )
        .reduce(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );

    if lo > hi {
        None
    } else {
        Some((lo, hi))
    }
}

/// Normaliza a u8 con el rango propio del plano
pub fn normalize_u8(plane: ArrayView2<f64>) -> Array2<u8> {
    let mut out = Array2::<u8>::zeros(plane.raw_dim());

    if let Some((lo, hi)) = value_range(plane) {
        let span = hi - lo;
        if span > 0.0 && span.is_finite() {
            Zip::from(&mut out).and(plane).par_for_each(|o, &v| {
                // `as u8` satura y lleva NaN a 0
                *o = (255.0 * (v - lo) / span) as u8;
            });
        }
    }

    out
}

/// Corrige min >= max: min pasa a max - 1, acotado a [0, 254]
pub fn correct_levels(min: u8, max: u8) -> (u8, u8) {
    if min >= max {
        ((max as i32 - 1).clamp(0, 254) as u8, max)
    } else {
        (min, max)
    }
}

/// Aplica los niveles `min`/`max` a un plano.
///
/// Con niveles completos (0, 255) el plano se devuelve tal cual.
pub fn apply_contrast(plane: ArrayView2<f64>, min: u8, max: u8) -> Contrast {
    if min == LEVEL_MIN && max == LEVEL_MAX {
        return Contrast { image: plane.to_owned(), min, max, adjusted: false };
    }

    let (min, max) = correct_levels(min, max);

    let image = match value_range(plane) {
        Some((lo, hi)) if hi > lo => {
            normalize_u8(plane).mapv(|v| v.clamp(min, max) as f64)
        }
        _ => Array2::<f64>::zeros(plane.raw_dim()),
    };

    Contrast { image, min, max, adjusted: true }
}
