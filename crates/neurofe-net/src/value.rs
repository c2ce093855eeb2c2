//! Scalar and weight values with their text rules.

use std::fmt::{Display, Formatter};

/// Scalar parameter value (thresholds, biases, custom neuron parameters)
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean, written `True`/`False`
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point, written in shortest form with a trailing `.0` when integral
    Float(f64),
    /// Free-form text, written verbatim
    Text(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Connection weight: numeric or symbolic
#[derive(Debug, Clone, PartialEq)]
pub enum Weight {
    /// Floating weight; edge records use fixed scientific notation
    Float(f64),
    /// Integer weight, written as is
    Int(i64),
    /// Symbolic weight, written verbatim
    Symbolic(String),
}

impl Weight {
    /// Text used in `e` records: `1.0` → `1.00000e+00`
    pub fn edge_text(&self) -> String {
        match self {
            Weight::Float(v) => format_sci5(*v),
            other => other.to_string(),
        }
    }

    /// Read a weight field back. Integer text becomes [`Weight::Int`], other
    /// numeric text [`Weight::Float`], anything else [`Weight::Symbolic`].
    pub fn parse(s: &str) -> Self {
        if let Ok(v) = s.parse::<i64>() {
            return Weight::Int(v);
        }
        match s.parse::<f64>() {
            Ok(v) => Weight::Float(v),
            Err(_) => Weight::Symbolic(s.to_string()),
        }
    }

    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Weight::Float(v) => Some(*v),
            Weight::Int(v) => Some(*v as f64),
            Weight::Symbolic(_) => None,
        }
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Weight::Float(v) => f.write_str(&format_float(*v)),
            Weight::Int(v) => write!(f, "{}", v),
            Weight::Symbolic(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Weight {
    fn from(v: f64) -> Self {
        Weight::Float(v)
    }
}

impl From<i64> for Weight {
    fn from(v: i64) -> Self {
        Weight::Int(v)
    }
}

impl From<&str> for Weight {
    fn from(v: &str) -> Self {
        Weight::Symbolic(v.to_string())
    }
}

impl From<String> for Weight {
    fn from(v: String) -> Self {
        Weight::Symbolic(v)
    }
}

fn non_finite(v: f64) -> Option<&'static str> {
    if v.is_nan() {
        Some("nan")
    } else if v.is_infinite() {
        Some(if v > 0.0 { "inf" } else { "-inf" })
    } else {
        None
    }
}

// Rust prints exponents as `e-7`; the kernel's readers expect `e-07`.
fn pad_exponent(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s.to_string(),
    }
}

/// Shortest round-trip text for a float, exponent form outside `[1e-4, 1e16)`
pub fn format_float(v: f64) -> String {
    if let Some(s) = non_finite(v) {
        return s.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let exp = v.abs().log10().floor() as i32;
    if !(-4..16).contains(&exp) {
        return pad_exponent(&format!("{:e}", v));
    }
    let s = format!("{}", v);
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Fixed scientific notation with five fractional digits: `5.00000e-01`
pub fn format_sci5(v: f64) -> String {
    if let Some(s) = non_finite(v) {
        return s.to_string();
    }
    pad_exponent(&format!("{:.5e}", v))
}
