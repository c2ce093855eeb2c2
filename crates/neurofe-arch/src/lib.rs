//! Architecture elaboration for the neuromorphic simulation kernel
//!
//! Turns a hierarchical hardware description (tiles, cores and the five
//! functional blocks of each core) into the flat, line-oriented instruction
//! listing the kernel reads positionally.
//!
//! Responsibilities:
//! - [`range`]: `base[min..max]` repetition suffixes on tile/core names
//! - [`attrs`]: ordered ` key=value` attribute suffixes
//! - [`instruction`]: typed records, text printer and parser, streaming sinks
//! - [`elaborate`]: verification and the tile → core → sub-element walk
//!
//! The description is consumed as a generic nested key/value tree
//! ([`serde_json::Value`]); callers decide how it was parsed.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod attrs;
pub mod elaborate;
pub mod error;
pub mod instruction;
pub mod range;

pub use elaborate::{
    architecture_of, elaborate, elaborate_into, elaborate_to_writer, emit, verify_architecture,
    ArchSpec, ElaborationSummary,
};
pub use error::{ArchError, Result};
pub use instruction::{parse_instructions, to_text, Instruction, InstructionKind, InstructionSink, TextSink};
pub use range::{instance_count, parse_range, InstanceRange};
