//! Attribute rendering: ordered `key=value` suffixes for instruction lines.

use serde_json::{Map, Value};

/// Ordered attribute list with values already rendered to text
pub type Attributes = Vec<(String, String)>;

/// Render a scalar attribute value to text.
///
/// Strings are written verbatim. Integers keep their JSON text; floats use
/// shortest text with `.0` on integral values and a signed two-digit
/// exponent outside `[1e-4, 1e16)` (`1e-9` becomes `1e-09`). Booleans are written `True`/`False` and null as
/// `None`, which is what the simulation kernel compares against. Nested
/// arrays and objects fall back to compact JSON.
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(v) if n.is_f64() => float_text(v),
            _ => n.to_string(),
        },
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn float_text(v: f64) -> String {
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }
    let exp = v.abs().log10().floor() as i32;
    if !(-4..16).contains(&exp) {
        let s = format!("{:e}", v);
        return match s.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => s,
        };
    }
    let s = format!("{}", v);
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Collect an optional attribute mapping into rendered pairs, preserving key order
pub fn collect_attributes(map: Option<&Map<String, Value>>) -> Attributes {
    map.map(|m| {
        m.iter()
            .map(|(k, v)| (k.clone(), render_scalar(v)))
            .collect()
    })
    .unwrap_or_default()
}

/// Concatenate ` key=value` for every pair, in order
pub fn format_attributes(attrs: &[(String, String)]) -> String {
    let mut line = String::new();
    for (key, value) in attrs {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(value);
    }
    line
}

/// Format an optional mapping directly; absent is treated as empty
pub fn format_mapping(map: Option<&Map<String, Value>>) -> String {
    format_attributes(&collect_attributes(map))
}
