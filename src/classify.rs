// src/classify.rs
// ============================================================================
// CLASSIFY - Tipo y valor de una entrada del archivo
// ============================================================================
//
// Decide qué es una ruta antes de mostrarla:
//   grupo / no existe / cadena / número / booleano / array / desconocido
//
// Solo los arrays numéricos pasan al despachador de visualización; el resto
// se muestra como texto.
//
// ============================================================================

use crate::error::{Result, ViewerError};
use crate::source::{ElementKind, EntryKind, HdfSource};

pub use crate::number::Number;

/// Resultado de clasificar una ruta
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    NotFound,
    Group,
    String(String),
    Number(Number),
    Boolean(bool),
    /// Cadenas de longitud fija con más de un elemento
    StringArray(Vec<String>),
    /// Booleanos con más de un elemento
    BooleanArray(Vec<bool>),
    /// Array numérico: solo tipo y shape, los datos se leen al mostrar
    Array { dtype: ElementKind, shape: Vec<usize> },
    Unknown,
}

impl DataValue {
    /// Nombre corto del tipo
    pub fn kind_name(&self) -> &'static str {
        match self {
            DataValue::NotFound => "not path",
            DataValue::Group => "group",
            DataValue::String(_) => "string",
            DataValue::Number(_) => "number",
            DataValue::Boolean(_) => "boolean",
            DataValue::StringArray(_) | DataValue::BooleanArray(_) | DataValue::Array { .. } => "array",
            DataValue::Unknown => "unknown",
        }
    }

    /// Texto para el campo "Value"
    pub fn value_text(&self) -> String {
        match self {
            DataValue::String(s) => s.clone(),
            DataValue::Number(n) => n.to_string(),
            DataValue::Boolean(b) => (*b as u8).to_string(),
            DataValue::Array { shape, .. } => format!("Array shape: {}", shape_text(shape)),
            DataValue::StringArray(values) => {
                let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
                format!("[{}]", quoted.join(", "))
            }
            DataValue::BooleanArray(values) => {
                let bits: Vec<String> = values.iter().map(|b| (*b as u8).to_string()).collect();
                format!("[{}]", bits.join(", "))
            }
            other => other.kind_name().to_string(),
        }
    }

    /// Shape si es un array numérico
    pub fn array_shape(&self) -> Option<&[usize]> {
        match self {
            DataValue::Array { shape, .. } => Some(shape),
            _ => None,
        }
    }
}

/// Shape con formato de tupla: "(5,)", "(2, 3)", "()"
pub fn shape_text(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Clasifica una ruta de `source`
pub fn classify<S: HdfSource + ?Sized>(source: &S, path: &str) -> Result<DataValue> {
    let info = match source.lookup(path)? {
        None => return Ok(DataValue::NotFound),
        Some(info) => info,
    };

    let size = info.size();
    let (dtype, shape) = match info.kind {
        EntryKind::Group => return Ok(DataValue::Group),
        EntryKind::Dataset { dtype, shape } => (dtype, shape),
    };

    let value = match dtype {
        ElementKind::FixedAscii | ElementKind::FixedUnicode => {
            let values = source.read_strings(path)?;
            if size == 1 {
                DataValue::String(values.into_iter().next().unwrap_or_default())
            } else {
                DataValue::StringArray(values)
            }
        }
        ElementKind::VarLenString => {
            // Un array de longitud variable se concatena en una sola cadena
            DataValue::String(source.read_strings(path)?.concat())
        }
        kind if kind.is_numeric() => {
            if shape.is_empty() || size == 1 {
                let number = source
                    .read_numeric(path)?
                    .first()
                    .ok_or_else(|| ViewerError::Unsupported(format!("{} is empty", path)))?;
                DataValue::Number(number)
            } else {
                DataValue::Array { dtype, shape }
            }
        }
        ElementKind::Boolean => {
            let values = source.read_bools(path)?;
            if size == 1 {
                DataValue::Boolean(values.first().copied().unwrap_or(false))
            } else {
                DataValue::BooleanArray(values)
            }
        }
        _ => DataValue::Unknown,
    };

    log::debug!("{} -> {}", path, value.kind_name());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use ndarray::{Array1, Array2};

    fn sample() -> MemorySource {
        MemorySource::new("t.h5")
            .with_strings("title", ElementKind::FixedAscii, &[], vec!["scan 42".into()])
            .with_strings("one", ElementKind::FixedAscii, &[1], vec!["only".into()])
            .with_strings("names", ElementKind::FixedAscii, &[2], vec!["a".into(), "b".into()])
            .with_strings("note", ElementKind::VarLenString, &[], vec!["hello".into()])
            .with_strings(
                "parts",
                ElementKind::VarLenString,
                &[3],
                vec!["ab".into(), "c".into(), "d".into()],
            )
            .with_scalar("count", ElementKind::Integer, -3.0)
            .with_scalar("energy", ElementKind::Float, 8.0)
            .with_scalar("gain", ElementKind::Float32, 0.1)
            .with_scalar("tiny", ElementKind::Float, 1e-5)
            .with_scalar("id", ElementKind::Float, 1e16)
            .with_numeric("single", ElementKind::Unsigned, Array1::from_elem(1, 9.0).into_dyn())
            .with_array("image", Array2::<f64>::zeros((4, 5)).into_dyn())
            .with_bools("flag", &[], vec![true])
            .with_bools("mask", &[3], vec![true, false, true])
            .with_opaque("table", &[10])
            .with_group("entry")
    }

    #[test]
    fn test_strings() {
        let src = sample();
        assert_eq!(classify(&src, "title").unwrap(), DataValue::String("scan 42".into()));
        assert_eq!(classify(&src, "one").unwrap(), DataValue::String("only".into()));
        assert_eq!(
            classify(&src, "names").unwrap(),
            DataValue::StringArray(vec!["a".into(), "b".into()])
        );
        assert_eq!(classify(&src, "note").unwrap(), DataValue::String("hello".into()));
        assert_eq!(classify(&src, "parts").unwrap(), DataValue::String("abcd".into()));
    }

    #[test]
    fn test_numbers() {
        let src = sample();
        assert_eq!(classify(&src, "count").unwrap(), DataValue::Number(Number::Int(-3)));
        assert_eq!(classify(&src, "single").unwrap(), DataValue::Number(Number::UInt(9)));
        let energy = classify(&src, "energy").unwrap();
        assert_eq!(energy.value_text(), "8.0");
        assert_eq!(
            classify(&src, "image").unwrap(),
            DataValue::Array { dtype: ElementKind::Float, shape: vec![4, 5] }
        );
    }

    #[test]
    fn test_other_kinds() {
        let src = sample();
        assert_eq!(classify(&src, "flag").unwrap().value_text(), "1");
        assert_eq!(classify(&src, "mask").unwrap().value_text(), "[1, 0, 1]");
        assert_eq!(classify(&src, "table").unwrap(), DataValue::Unknown);
        assert_eq!(classify(&src, "entry").unwrap(), DataValue::Group);
        assert_eq!(classify(&src, "missing").unwrap(), DataValue::NotFound);
        assert_eq!(DataValue::NotFound.value_text(), "not path");
    }

    #[test]
    fn test_shape_text() {
        assert_eq!(shape_text(&[5]), "(5,)");
        assert_eq!(shape_text(&[2, 3, 4]), "(2, 3, 4)");
        let value = DataValue::Array { dtype: ElementKind::Integer, shape: vec![100, 2] };
        assert_eq!(value.value_text(), "Array shape: (100, 2)");
    }

    #[test]
    fn test_number_text() {
        let src = sample();
        assert_eq!(classify(&src, "gain").unwrap(), DataValue::Number(Number::Float32(0.1)));
        assert_eq!(classify(&src, "gain").unwrap().value_text(), "0.1");
        assert_eq!(classify(&src, "tiny").unwrap().value_text(), "1e-05");
        assert_eq!(classify(&src, "id").unwrap().value_text(), "1e+16");
    }
}
