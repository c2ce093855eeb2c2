//! neurofe CLI crate
//!
//! Purpose:
//! - Command-line front end for the neurofe libraries: elaborate architecture
//!   descriptions for the simulation kernel and produce or inspect network files.
//!
//! Major commands (see [commands]):
//! - arch: elaborate (JSON/TOML description → instruction listing file),
//!         check (elaborate in memory and report per-record counts).
//! - net: inspect (load a network file and report sizes),
//!        generate (synthetic fully connected or random benchmark networks).
//!
//! Integration points:
//! - neurofe_arch: architecture_of, elaborate, elaborate_to_writer.
//! - neurofe_net: Network save/load, CompartmentTable, create_layer.
//!
//! Notes:
//! - The binary (src/main.rs) wires up logging and argument parsing, calling NeurofeCli::execute().
//! - Running the simulation kernel itself is not part of this tool.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::NeurofeCli;
