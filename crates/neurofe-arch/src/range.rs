//! Repetition suffixes on tile/core names: `base[min..max]`, both bounds inclusive.

use std::fmt::{Display, Formatter};

use crate::error::{ArchError, Result};

/// Inclusive instance range parsed from a name field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRange {
    /// Name without the repetition suffix
    pub base: String,
    /// First instance index
    pub min: u32,
    /// Last instance index (inclusive)
    pub max: u32,
}

impl InstanceRange {
    /// A name without suffix has exactly one instance, numbered 0
    pub fn single(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            min: 0,
            max: 0,
        }
    }

    /// Number of instances described by the range
    pub fn count(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    /// Decorated per-instance names `base[i]`. Informational only.
    pub fn instance_names(&self) -> impl Iterator<Item = String> + '_ {
        (self.min..=self.max).map(move |i| format!("{}[{}]", self.base, i))
    }
}

impl Display for InstanceRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}..{}]", self.base, self.min, self.max)
    }
}

/// True if the name carries a repetition suffix
pub fn has_range(name: &str) -> bool {
    name.contains('[')
}

/// Parse a name field, expanding an optional `base[min..max]` suffix.
pub fn parse_range(name: &str) -> Result<InstanceRange> {
    let open = match name.find('[') {
        Some(pos) => pos,
        None => {
            if name.contains(']') {
                return Err(ArchError::malformed_range(name, "unbalanced ']'"));
            }
            return Ok(InstanceRange::single(name));
        }
    };

    let body = name[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| ArchError::malformed_range(name, "missing closing ']'"))?;
    if body.contains('[') || body.contains(']') {
        return Err(ArchError::malformed_range(name, "unbalanced brackets"));
    }

    let (lo, hi) = body
        .split_once("..")
        .ok_or_else(|| ArchError::malformed_range(name, "expected 'min..max'"))?;
    let min: u32 = lo
        .trim()
        .parse()
        .map_err(|_| ArchError::malformed_range(name, format!("bad range min '{}'", lo)))?;
    let max: u32 = hi
        .trim()
        .parse()
        .map_err(|_| ArchError::malformed_range(name, format!("bad range max '{}'", hi)))?;
    if min > max {
        return Err(ArchError::malformed_range(name, "min > max"));
    }

    Ok(InstanceRange {
        base: name[..open].to_string(),
        min,
        max,
    })
}

/// Number of instances a name field expands to
pub fn instance_count(name: &str) -> Result<usize> {
    Ok(parse_range(name)?.count())
}
