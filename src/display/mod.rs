// src/display/mod.rs
// ============================================================================
// DISPLAY - Controles, estado de widgets y frames del visor
// ============================================================================
//
// Un frame por refresco, con modos mutuamente excluyentes:
//
//   Empty    -> nada seleccionado o dato no mostrable
//   Scalar   -> texto (string, número, booleano, unknown)
//   Plot     -> línea 1D/2D
//   Table    -> tabla 1D/2D
//   Image2d  -> 2D en modo plot sin forma (2, n)/(n, 2)
//   Image3d  -> plano de un volumen, con contraste
//
// ============================================================================

pub mod viewer;

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::Serialize;

use crate::colormap::Colormap;
use crate::contrast::{LEVEL_MAX, LEVEL_MIN};
use crate::plot::LineSeries;
use crate::table::Table;

pub use viewer::Viewer;

/// Modo pedido para datos 1D/2D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Plot,
    Table,
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plot => f.write_str("plot"),
            Self::Table => f.write_str("table"),
        }
    }
}

impl FromStr for DisplayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plot" => Ok(Self::Plot),
            "table" => Ok(Self::Table),
            other => Err(format!("Unknown display type: {}", other)),
        }
    }
}

pub const DEFAULT_MARKER: &str = ",";

/// Valores de los controles de la interfaz
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub file: String,
    pub key: String,
    pub slice: usize,
    pub axis: usize,
    pub cmap: Colormap,
    pub display: DisplayType,
    pub marker: String,
    pub min: u8,
    pub max: u8,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            file: String::new(),
            key: String::new(),
            slice: 0,
            axis: 0,
            cmap: Colormap::default(),
            display: DisplayType::default(),
            marker: DEFAULT_MARKER.to_string(),
            min: LEVEL_MIN,
            max: LEVEL_MAX,
        }
    }
}

impl Controls {
    /// Controles apuntando a `key` dentro de `file`
    pub fn select(file: impl Into<String>, key: impl Into<String>) -> Self {
        Self { file: file.into(), key: key.into(), ..Self::default() }
    }

    /// Vuelve a los valores por defecto sin tocar archivo ni clave
    pub fn reset_view(&mut self) {
        let selection = (std::mem::take(&mut self.file), std::mem::take(&mut self.key));
        *self = Self { file: selection.0, key: selection.1, ..Self::default() };
    }

    pub fn has_selection(&self) -> bool {
        !self.file.is_empty() && !self.key.is_empty()
    }
}

/// Widgets habilitados/visibles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Widgets {
    pub slice: bool,
    pub min: bool,
    pub max: bool,
    pub axis: bool,
    pub cmap: bool,
    pub display: bool,
    pub marker: bool,
    pub save_image: bool,
    pub save_data: bool,
    pub table_visible: bool,
    pub plot_visible: bool,
    /// Máximo del slider de cortes
    pub slice_max: usize,
}

impl Widgets {
    /// Estado tras un reset: todo deshabilitado, el gráfico visible
    pub fn idle() -> Self {
        Self { plot_visible: true, ..Self::default() }
    }

    /// Volumen 3D: sliders, eje, paleta y guardar imagen
    pub fn volume(slice_max: usize) -> Self {
        Self {
            slice: true,
            min: true,
            max: true,
            axis: true,
            cmap: true,
            save_image: true,
            plot_visible: true,
            slice_max,
            ..Self::default()
        }
    }

    /// Datos 1D/2D: tipo de vista, marcador y guardar datos
    pub fn series(display: DisplayType) -> Self {
        Self {
            display: true,
            marker: true,
            save_data: true,
            table_visible: display == DisplayType::Table,
            plot_visible: display == DisplayType::Plot,
            ..Self::default()
        }
    }
}

/// Modo de visualización resultante
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayState {
    Empty,
    Scalar,
    Array1d,
    Array2dTable,
    Array2dPlot,
    Array2dImage,
    Array3dImage,
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Scalar => "scalar",
            Self::Array1d => "array-1d",
            Self::Array2dTable => "array-2d-table",
            Self::Array2dPlot => "array-2d-plot",
            Self::Array2dImage => "array-2d-image",
            Self::Array3dImage => "array-3d-image",
        };
        f.write_str(name)
    }
}

/// Lo que se dibuja tras un refresco
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Frame {
    #[default]
    Empty,
    Scalar {
        text: String,
    },
    Plot {
        rank: usize,
        series: LineSeries,
        marker: String,
        color: String,
    },
    /// `table` es None si el array supera el límite en ambas dimensiones
    Table {
        rank: usize,
        table: Option<Table>,
    },
    Image2d {
        image: Array2<f64>,
        cmap: Colormap,
    },
    Image3d {
        image: Array2<f64>,
        cmap: Colormap,
        axis: usize,
        index: usize,
        slice_max: usize,
        min: u8,
        max: u8,
    },
}

impl Frame {
    pub fn state(&self) -> DisplayState {
        match self {
            Self::Empty => DisplayState::Empty,
            Self::Scalar { .. } => DisplayState::Scalar,
            Self::Plot { rank: 1, .. } | Self::Table { rank: 1, .. } => DisplayState::Array1d,
            Self::Plot { .. } => DisplayState::Array2dPlot,
            Self::Table { .. } => DisplayState::Array2dTable,
            Self::Image2d { .. } => DisplayState::Array2dImage,
            Self::Image3d { .. } => DisplayState::Array3dImage,
        }
    }

    /// Imagen mostrada, si la hay
    pub fn image(&self) -> Option<(&Array2<f64>, Colormap)> {
        match self {
            Self::Image2d { image, cmap } | Self::Image3d { image, cmap, .. } => {
                Some((image, *cmap))
            }
            _ => None,
        }
    }

    /// Resumen de una línea para la CLI y los logs
    pub fn summary(&self) -> String {
        match self {
            Self::Empty => "empty".to_string(),
            Self::Scalar { text } => format!("scalar: {}", text),
            Self::Plot { series, marker, .. } => {
                let range = series
                    .y_range()
                    .map(|(lo, hi)| format!(", y in [{}, {}]", lo, hi))
                    .unwrap_or_default();
                format!(
                    "{}: '{}' {} points, marker '{}'{}",
                    self.state(),
                    series.title,
                    series.len(),
                    marker,
                    range
                )
            }
            Self::Table { table: Some(t), .. } => {
                format!("{}: {} rows x {} columns", self.state(), t.height(), t.width())
            }
            Self::Table { table: None, .. } => format!("{}: too large to tabulate", self.state()),
            Self::Image2d { image, cmap } => {
                let (h, w) = image.dim();
                format!("{}: {}x{} ({})", self.state(), h, w, cmap)
            }
            Self::Image3d { image, cmap, axis, index, slice_max, min, max } => {
                let (h, w) = image.dim();
                format!(
                    "{}: {}x{} plane, axis {} slice {}/{}, levels [{}, {}] ({})",
                    self.state(),
                    h,
                    w,
                    axis,
                    index,
                    slice_max,
                    min,
                    max,
                    cmap
                )
            }
        }
    }
}
