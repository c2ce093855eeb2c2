//! Error types for architecture elaboration

use thiserror::Error;

/// Result type for elaboration operations
pub type Result<T> = std::result::Result<T, ArchError>;

/// Errors raised while elaborating or reading back an architecture
#[derive(Error, Debug)]
pub enum ArchError {
    /// Required element missing or illegal structure in the description
    #[error("Structural error: {0}")]
    Structural(String),

    /// Repetition suffix could not be parsed
    #[error("Malformed range in '{name}': {reason}")]
    MalformedRange {
        /// Offending name field
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// A line of an elaborated listing could not be parsed
    #[error("Malformed instruction at line {line}: {reason}")]
    MalformedInstruction {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// I/O error while streaming the listing
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Source I/O error
        source: std::io::Error,
    },
}

impl ArchError {
    /// Create a structural error
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Create a malformed range error
    pub fn malformed_range(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRange {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed instruction error
    pub fn malformed_instruction(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInstruction {
            line,
            reason: reason.into(),
        }
    }
}
