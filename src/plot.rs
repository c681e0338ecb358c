// src/plot.rs
// ============================================================================
// PLOT - Qué dibujar para datos 1D/2D en modo "plot"
// ============================================================================
//
// 1D            -> línea: x = 0..n, y = datos
// 2D (2, n)     -> línea: x = fila 0, y = fila 1
// 2D (n, 2)     -> línea: x = columna 0, y = columna 1
// 2D resto      -> imagen (aspecto automático)
//
// ============================================================================

use ndarray::{Array2, ArrayD, Axis, Ix2};

use crate::error::{Result, ViewerError};

/// Serie x/y para un gráfico de línea
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl LineSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Rango de y (min, max), None si no hay valores
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.y
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Resultado del modo plot
#[derive(Debug, Clone, PartialEq)]
pub enum PlotKind {
    Line(LineSeries),
    Image(Array2<f64>),
}

/// Título: último segmento de la ruta, primera letra en mayúscula y el
/// resto en minúsculas
pub fn plot_title(key: &str) -> String {
    let last = key.rsplit('/').next().unwrap_or("");
    let mut chars = last.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
    }
}

/// Decide línea o imagen para `data`
pub fn plot_series(data: &ArrayD<f64>, key: &str) -> Result<PlotKind> {
    let title = plot_title(key);

    match data.ndim() {
        1 => {
            let y = data.iter().copied().collect::<Vec<_>>();
            let x = (0..y.len()).map(|i| i as f64).collect();
            Ok(PlotKind::Line(LineSeries { title, x, y }))
        }
        2 => {
            let data = data.view().into_dimensionality::<Ix2>()?;
            let (height, width) = data.dim();
            if height == 2 {
                Ok(PlotKind::Line(LineSeries {
                    title,
                    x: data.index_axis(Axis(0), 0).to_vec(),
                    y: data.index_axis(Axis(0), 1).to_vec(),
                }))
            } else if width == 2 {
                Ok(PlotKind::Line(LineSeries {
                    title,
                    x: data.index_axis(Axis(1), 0).to_vec(),
                    y: data.index_axis(Axis(1), 1).to_vec(),
                }))
            } else {
                Ok(PlotKind::Image(data.to_owned()))
            }
        }
        n => Err(ViewerError::Unsupported(format!("Can't plot {}-d array", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_plot_title() {
        assert_eq!(plot_title("entry/data/TEMPERATURE"), "Temperature");
        assert_eq!(plot_title("counts"), "Counts");
        assert_eq!(plot_title("entry/"), "");
    }

    #[test]
    fn test_line_1d() {
        let data = array![3.0, 1.0, 2.0].into_dyn();
        match plot_series(&data, "entry/y").unwrap() {
            PlotKind::Line(s) => {
                assert_eq!(s.x, vec![0.0, 1.0, 2.0]);
                assert_eq!(s.y, vec![3.0, 1.0, 2.0]);
                assert_eq!(s.title, "Y");
                assert_eq!(s.y_range(), Some((1.0, 3.0)));
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_line_from_rows() {
        let data = array![[0.0, 1.0, 2.0], [5.0, 6.0, 7.0]].into_dyn();
        match plot_series(&data, "xy").unwrap() {
            PlotKind::Line(s) => {
                assert_eq!(s.x, vec![0.0, 1.0, 2.0]);
                assert_eq!(s.y, vec![5.0, 6.0, 7.0]);
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_line_from_columns() {
        let data = array![[0.0, 9.0], [1.0, 8.0], [2.0, 7.0]].into_dyn();
        match plot_series(&data, "xy").unwrap() {
            PlotKind::Line(s) => {
                assert_eq!(s.x, vec![0.0, 1.0, 2.0]);
                assert_eq!(s.y, vec![9.0, 8.0, 7.0]);
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_image_fallback() {
        let data = ndarray::Array2::<f64>::ones((3, 4)).into_dyn();
        assert!(matches!(plot_series(&data, "img").unwrap(), PlotKind::Image(_)));
    }
}
