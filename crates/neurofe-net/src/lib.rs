//! Spiking network model for the neuromorphic simulation kernel
//!
//! Build networks of neuron groups and external inputs, write them in the
//! kernel's line-oriented network format, read group sizes and edges back,
//! and place neurons onto hardware compartments.
//!
//! Responsibilities:
//! - [`network`]: groups, neurons, inputs and their connections
//! - [`value`]: scalar and weight variants with their text rules
//! - [`save`] / [`load`]: the `x`/`g`/`n`/`e`/`&`/`<` record format
//! - [`mapping`]: greedy first-fit compartment placement and layer creation

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod load;
pub mod mapping;
pub mod network;
pub mod save;
pub mod value;

pub use error::{NetError, Result};
pub use mapping::{create_layer, CompartmentTable, Placement};
pub use network::{
    Connection, GroupId, GroupParams, Input, InputId, Network, Neuron, NeuronAddress, NeuronFlags,
    NeuronGroup, NeuronParams,
};
pub use value::{format_float, format_sci5, Value, Weight};
