//! Error types for the network model

use thiserror::Error;

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors that can occur while building, saving, loading or placing a network
#[derive(Error, Debug)]
pub enum NetError {
    /// A network file referenced a group or neuron that does not exist yet
    #[error("Lookup failed at line {line}: no neuron or group at '{address}'")]
    Lookup {
        /// 1-based line number
        line: usize,
        /// Offending address
        address: String,
    },

    /// A network file record could not be parsed
    #[error("Parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// Group index not present in the network
    #[error("Group {group} not found")]
    UnknownGroup {
        /// Group index
        group: usize,
    },

    /// Neuron address not present in the network
    #[error("Neuron {address} not found")]
    UnknownNeuron {
        /// Dotted `group.neuron` address
        address: String,
    },

    /// Input index not present in the network
    #[error("Input {input} not found")]
    UnknownInput {
        /// Input index
        input: usize,
    },

    /// Every compartment of every core is already taken
    #[error("No free compartments left ({tiles} tiles x {cores} cores)")]
    NoCapacity {
        /// Tiles in the capacity table
        tiles: usize,
        /// Cores per tile in the capacity table
        cores: usize,
    },

    /// Explicit placement list does not cover the layer exactly
    #[error("Mapping list has {actual} entries, expected one per neuron ({expected})")]
    MappingSizeMismatch {
        /// Neurons in the layer
        expected: usize,
        /// Entries supplied
        actual: usize,
    },

    /// Placement persistence requested for a neuron that was never placed
    #[error("Neuron {address} has no tile/core placement")]
    Unplaced {
        /// Dotted `group.neuron` address
        address: String,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Source I/O error
        source: std::io::Error,
    },
}

impl NetError {
    /// Create a parse error
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Create a lookup error
    pub fn lookup(line: usize, address: impl Into<String>) -> Self {
        Self::Lookup {
            line,
            address: address.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NetError::lookup(7, "3.14");
        let msg = err.to_string();
        assert!(msg.contains("line 7") && msg.contains("3.14"));

        let err = NetError::MappingSizeMismatch { expected: 4, actual: 3 };
        assert!(err.to_string().contains("expected one per neuron (4)"));
    }
}
