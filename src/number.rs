// src/number.rs
// ============================================================================
// NUMBER - Valores numéricos con su tipo de origen
// ============================================================================
//
// Los datasets se leen en su tipo nativo (i64, u64, f16, f32, f64) y solo
// se pasan a f64 para gráficos e imágenes. Tablas, CSV y el texto del valor
// usan el tipo original:
//
//   u64 9007199254740993 -> "9007199254740993"  (sin redondeo a f64)
//   f32 0.1              -> "0.1"               (no "0.10000000149011612")
//
// Los floats siguen el formato de numpy: posicional en [1e-4, 1e16),
// exponencial fuera ("1e-05", "1e+16"), enteros con ".0".
//
// ============================================================================

use std::fmt;

use half::f16;
use ndarray::ArrayD;
use serde_json::Value;

use crate::source::ElementKind;

/// Valor numérico escalar, conservando el tipo de origen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Half(f16),
    Float32(f32),
    Float(f64),
}

impl Number {
    /// Valor aproximado para cálculos (gráficos, contraste)
    pub fn to_f64(&self) -> f64 {
        match *self {
            Number::Int(v) => v as f64,
            Number::UInt(v) => v as f64,
            Number::Half(v) => v.to_f64(),
            Number::Float32(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Valor JSON: enteros exactos, floats con sus dígitos más cortos
    pub fn to_json(&self) -> Value {
        match *self {
            Number::Int(v) => Value::from(v),
            Number::UInt(v) => Value::from(v),
            Number::Half(v) => Value::from(shortest_f16(v)),
            Number::Float32(v) => Value::from(v.to_string().parse::<f64>().unwrap_or(v as f64)),
            Number::Float(v) => Value::from(v),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(v) => write!(f, "{}", v),
            Number::UInt(v) => write!(f, "{}", v),
            Number::Half(v) => f.write_str(&float_text(shortest_f16(v))),
            Number::Float32(v) => f.write_str(&float_text(v)),
            Number::Float(v) => f.write_str(&float_text(v)),
        }
    }
}

/// f16 no tiene formato "más corto" propio: se busca el decimal con menos
/// dígitos que vuelve al mismo f16
fn shortest_f16(v: f16) -> f64 {
    let exact = v.to_f64();
    if !exact.is_finite() {
        return exact;
    }
    (0..=5)
        .filter_map(|digits| format!("{:.*e}", digits, exact).parse::<f64>().ok())
        .find(|candidate| f16::from_f64(*candidate) == v)
        .unwrap_or(exact)
}

/// Texto de un float al estilo numpy
fn float_text<T>(v: T) -> String
where
    T: Copy + fmt::Display + fmt::LowerExp + Into<f64>,
{
    let x: f64 = v.into();
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let abs = x.abs();
    if abs == 0.0 || (1e-4..1e16).contains(&abs) {
        let text = v.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        // "1.5e-7" -> "1.5e-07", "1e16" -> "1e+16"
        let text = format!("{:e}", v);
        match text.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => text,
        }
    }
}

/// Dataset numérico en su tipo nativo
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Int(ArrayD<i64>),
    UInt(ArrayD<u64>),
    Half(ArrayD<f16>),
    Float32(ArrayD<f32>),
    Float(ArrayD<f64>),
}

impl NumericArray {
    /// Construye desde f64 con el tipo indicado (datos en memoria, planos)
    pub fn from_f64(kind: ElementKind, data: ArrayD<f64>) -> Self {
        match kind {
            ElementKind::Integer => Self::Int(data.mapv(|v| v as i64)),
            ElementKind::Unsigned => Self::UInt(data.mapv(|v| v as u64)),
            ElementKind::Float16 => Self::Half(data.mapv(f16::from_f64)),
            ElementKind::Float32 => Self::Float32(data.mapv(|v| v as f32)),
            _ => Self::Float(data),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Int(_) => ElementKind::Integer,
            Self::UInt(_) => ElementKind::Unsigned,
            Self::Half(_) => ElementKind::Float16,
            Self::Float32(_) => ElementKind::Float32,
            Self::Float(_) => ElementKind::Float,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Int(a) => a.shape(),
            Self::UInt(a) => a.shape(),
            Self::Half(a) => a.shape(),
            Self::Float32(a) => a.shape(),
            Self::Float(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Copia en f64 para gráficos e imágenes
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            Self::Int(a) => a.mapv(|v| v as f64),
            Self::UInt(a) => a.mapv(|v| v as f64),
            Self::Half(a) => a.mapv(|v| v.to_f64()),
            Self::Float32(a) => a.mapv(f64::from),
            Self::Float(a) => a.clone(),
        }
    }

    /// Cada elemento como Number (tablas, CSV)
    pub fn numbers(&self) -> ArrayD<Number> {
        match self {
            Self::Int(a) => a.mapv(Number::Int),
            Self::UInt(a) => a.mapv(Number::UInt),
            Self::Half(a) => a.mapv(Number::Half),
            Self::Float32(a) => a.mapv(Number::Float32),
            Self::Float(a) => a.mapv(Number::Float),
        }
    }

    /// Primer elemento (escalares y arrays de tamaño 1)
    pub fn first(&self) -> Option<Number> {
        match self {
            Self::Int(a) => a.iter().next().map(|&v| Number::Int(v)),
            Self::UInt(a) => a.iter().next().map(|&v| Number::UInt(v)),
            Self::Half(a) => a.iter().next().map(|&v| Number::Half(v)),
            Self::Float32(a) => a.iter().next().map(|&v| Number::Float32(v)),
            Self::Float(a) => a.iter().next().map(|&v| Number::Float(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, array};

    #[test]
    fn test_float_positional() {
        assert_eq!(Number::Float(0.25).to_string(), "0.25");
        assert_eq!(Number::Float(-2.0).to_string(), "-2.0");
        assert_eq!(Number::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Number::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Number::Float(0.0).to_string(), "0.0");
    }

    #[test]
    fn test_float_exponent() {
        assert_eq!(Number::Float(1e-5).to_string(), "1e-05");
        assert_eq!(Number::Float(1e16).to_string(), "1e+16");
        assert_eq!(Number::Float(-1.5e-7).to_string(), "-1.5e-07");
        assert_eq!(Number::Float(2.5e300).to_string(), "2.5e+300");
        assert_eq!(Number::Float32(3e-6).to_string(), "3e-06");
    }

    #[test]
    fn test_float_special() {
        assert_eq!(Number::Float(f64::NAN).to_string(), "nan");
        assert_eq!(Number::Float(f64::NEG_INFINITY).to_string(), "-inf");
    }

    #[test]
    fn test_narrow_floats_shortest() {
        assert_eq!(Number::Float32(0.1).to_string(), "0.1");
        assert_eq!(Number::Float32(12.5).to_string(), "12.5");
        assert_eq!(Number::Half(f16::from_f64(0.1)).to_string(), "0.1");
        assert_eq!(Number::Half(f16::from_f64(2.0)).to_string(), "2.0");
        assert_eq!(Number::Float32(0.1).to_json(), serde_json::json!(0.1));
    }

    #[test]
    fn test_integers_exact() {
        let big = 9_007_199_254_740_993u64;
        assert_eq!(Number::UInt(big).to_string(), "9007199254740993");
        assert_eq!(Number::UInt(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Number::Int(big as i64).to_json(), serde_json::json!(9_007_199_254_740_993i64));
    }

    #[test]
    fn test_numeric_array() {
        let ints = NumericArray::Int(array![1i64, 2, 3].into_dyn());
        assert_eq!(ints.kind(), ElementKind::Integer);
        assert_eq!(ints.shape(), &[3]);
        assert_eq!(ints.first(), Some(Number::Int(1)));
        assert_eq!(ints.to_f64(), array![1.0, 2.0, 3.0].into_dyn());

        let single = NumericArray::from_f64(ElementKind::Float32, arr0(0.5).into_dyn());
        assert_eq!(single.first(), Some(Number::Float32(0.5)));
        assert_eq!(single.ndim(), 0);

        let empty = NumericArray::Float(ndarray::Array1::<f64>::zeros(0).into_dyn());
        assert_eq!(empty.first(), None);
    }
}
