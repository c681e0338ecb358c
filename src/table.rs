// src/table.rs
// ============================================================================
// TABLE - Array 1D/2D a filas y columnas
// ============================================================================

use ndarray::{Array2, ArrayD, Axis, Ix1, Ix2};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ViewerError};
use crate::number::{Number, NumericArray};

pub const INDEX_COLUMN: &str = "Index";

/// Definición de columna (name/label/field coinciden)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub label: String,
    pub field: String,
}

impl Column {
    fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self { label: name.clone(), field: name.clone(), name }
    }
}

/// Fila: índice + valores en el tipo del dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub values: Vec<Number>,
}

/// Tabla lista para mostrar
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Incluye la columna "Index" en primera posición
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Número de columnas de datos (sin "Index")
    pub fn width(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Filas como objetos JSON {"Index": i, "Column 0": v, ...}
    pub fn rows_json(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                obj.insert(INDEX_COLUMN.to_string(), Value::from(row.index));
                for (col, v) in self.columns[1..].iter().zip(&row.values) {
                    obj.insert(col.name.clone(), v.to_json());
                }
                Value::Object(obj)
            })
            .collect()
    }

    /// Texto alineado con las primeras `max_rows` filas
    pub fn render(&self, max_rows: usize) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.columns.iter().map(|c| format!("{:>12}", c.label)).collect();
        out.push_str(&header.join(" "));
        out.push('\n');

        for row in self.rows.iter().take(max_rows) {
            let mut cells = vec![format!("{:>12}", row.index)];
            cells.extend(row.values.iter().map(|v| format!("{:>12}", v)));
            out.push_str(&cells.join(" "));
            out.push('\n');
        }

        if self.rows.len() > max_rows {
            out.push_str(&format!("... ({} more rows)\n", self.rows.len() - max_rows));
        }
        out
    }
}

/// Lleva un array 1D/2D a 2D: un vector pasa a ser una columna
pub fn as_2d<T: Clone>(data: &ArrayD<T>) -> Result<Array2<T>> {
    match data.ndim() {
        1 => {
            let column = data.clone().into_dimensionality::<Ix1>()?;
            Ok(column.insert_axis(Axis(1)))
        }
        2 => Ok(data.clone().into_dimensionality::<Ix2>()?),
        n => Err(ViewerError::Unsupported(format!("{}-d array has no table form", n))),
    }
}

/// Construye la tabla. None si alto y ancho superan `limit`.
pub fn format_table(data: &NumericArray, limit: usize) -> Result<Option<Table>> {
    let data = as_2d(&data.numbers())?;
    let (height, width) = data.dim();

    if height > limit && width > limit {
        log::debug!("Table {}x{} over limit {}", height, width, limit);
        return Ok(None);
    }

    let mut columns = Vec::with_capacity(width + 1);
    columns.push(Column::new(INDEX_COLUMN));
    columns.extend((0..width).map(|j| Column::new(format!("Column {}", j))));

    let rows = data
        .outer_iter()
        .enumerate()
        .map(|(index, row)| Row { index, values: row.to_vec() })
        .collect();

    Ok(Some(Table { columns, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn float(data: ArrayD<f64>) -> NumericArray {
        NumericArray::Float(data)
    }

    #[test]
    fn test_table_1d() {
        let data = float(array![1.5, 2.5, 3.5].into_dyn());
        let table = format_table(&data, 1000).unwrap().unwrap();
        assert_eq!(table.width(), 1);
        assert_eq!(table.height(), 3);
        assert_eq!(table.columns[0].name, "Index");
        assert_eq!(table.columns[1].field, "Column 0");
        assert_eq!(table.rows[2], Row { index: 2, values: vec![Number::Float(3.5)] });
    }

    #[test]
    fn test_table_2d_json() {
        let data = float(array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
        let table = format_table(&data, 1000).unwrap().unwrap();
        let rows = table.rows_json();
        assert_eq!(rows[1]["Index"], 1);
        assert_eq!(rows[1]["Column 1"], 4.0);
    }

    #[test]
    fn test_table_keeps_large_integers() {
        let big = 9_007_199_254_740_993i64;
        let data = NumericArray::Int(array![[big, -1]].into_dyn());
        let table = format_table(&data, 1000).unwrap().unwrap();
        assert_eq!(table.rows[0].values[0], Number::Int(big));
        assert_eq!(table.rows_json()[0]["Column 0"], serde_json::json!(big));
        assert!(table.render(10).contains("9007199254740993"));
    }

    #[test]
    fn test_table_limit_needs_both_dims() {
        let wide = float(Array2::<f64>::zeros((3, 20)).into_dyn());
        assert!(format_table(&wide, 10).unwrap().is_some());

        let big = float(Array2::<f64>::zeros((11, 11)).into_dyn());
        assert!(format_table(&big, 10).unwrap().is_none());
    }

    #[test]
    fn test_table_rejects_3d() {
        let cube = float(ndarray::Array3::<f64>::zeros((2, 2, 2)).into_dyn());
        assert!(format_table(&cube, 1000).is_err());
    }

    #[test]
    fn test_render_truncates() {
        let data = float(array![[1.0], [2.0], [3.0]].into_dyn());
        let text = format_table(&data, 1000).unwrap().unwrap().render(2);
        assert!(text.contains("Column 0"));
        assert!(text.ends_with("... (1 more rows)\n"));
    }
}
