//! In-memory spiking network: groups own neurons, neurons and inputs own
//! their outgoing connections.
//!
//! Group, neuron and input indices are dense, zero-based and fixed at
//! creation; nothing is ever renumbered or removed. Handles are plain
//! indices ([`GroupId`], [`NeuronAddress`], [`InputId`]) and stay valid for
//! the lifetime of the [`Network`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{NetError, Result};
use crate::mapping::Placement;
use crate::value::{Value, Weight};

/// Index of a group within its network
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub usize);

impl GroupId {
    /// Get the raw index
    pub const fn raw(&self) -> usize {
        self.0
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an external input within its network
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InputId(pub usize);

impl InputId {
    /// Get the raw index
    pub const fn raw(&self) -> usize {
        self.0
    }
}

/// Dotted `group.neuron` address of a neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronAddress {
    /// Owning group index
    pub group: usize,
    /// Index within the group
    pub neuron: usize,
}

impl NeuronAddress {
    /// Create an address
    pub const fn new(group: usize, neuron: usize) -> Self {
        Self { group, neuron }
    }
}

impl Display for NeuronAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group, self.neuron)
    }
}

impl FromStr for NeuronAddress {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (g, n) = s
            .split_once('.')
            .ok_or_else(|| format!("expected 'group.neuron', got '{}'", s))?;
        let group = g.parse().map_err(|_| format!("bad group index in '{}'", s))?;
        let neuron = n.parse().map_err(|_| format!("bad neuron index in '{}'", s))?;
        Ok(Self { group, neuron })
    }
}

/// Weighted outgoing connection
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Destination neuron
    pub dest: NeuronAddress,
    /// Connection weight
    pub weight: Weight,
}

/// Per-neuron logging and update flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeuronFlags {
    /// Trace spikes of this neuron
    pub log_spikes: Option<bool>,
    /// Trace membrane potential of this neuron
    pub log_v: Option<bool>,
    /// Update every timestep even without input
    pub force_update: Option<bool>,
}

/// The two mutually exclusive ways a neuron is parameterized
#[derive(Debug, Clone, PartialEq)]
pub enum NeuronParams {
    /// Flag fields, plus the automatic `connections_out` override on save
    Flags(NeuronFlags),
    /// Free-form parameters written in insertion order
    Custom(Vec<(String, Value)>),
}

/// A neuron owned by exactly one group
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    address: NeuronAddress,
    kind: Option<String>,
    bias: Option<Value>,
    params: NeuronParams,
    connections: Vec<Connection>,
    placement: Option<Placement>,
}

impl Neuron {
    fn new(address: NeuronAddress, kind: Option<String>, params: NeuronParams) -> Self {
        Self {
            address,
            kind,
            bias: None,
            params,
            connections: Vec::new(),
            placement: None,
        }
    }

    /// Address of this neuron
    pub fn address(&self) -> NeuronAddress {
        self.address
    }

    /// Neuron type tag
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Bias, if one was added
    pub fn bias(&self) -> Option<&Value> {
        self.bias.as_ref()
    }

    /// Parameter style
    pub fn params(&self) -> &NeuronParams {
        &self.params
    }

    /// Outgoing connections in creation order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Hardware placement, unset until placed
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Append an outgoing connection. Duplicates are kept.
    pub fn add_connection(&mut self, dest: NeuronAddress, weight: impl Into<Weight>) {
        self.connections.push(Connection {
            dest,
            weight: weight.into(),
        });
    }

    /// Set the bias
    pub fn add_bias(&mut self, bias: impl Into<Value>) {
        self.bias = Some(bias.into());
    }

    /// Place the neuron on a tile/core
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }
}

/// Dynamics parameters and flags shared by a group's neurons
#[derive(Debug, Clone, PartialEq)]
pub struct GroupParams {
    /// Spiking threshold
    pub threshold: Option<Value>,
    /// Reset potential
    pub reset: Option<Value>,
    /// Negative threshold
    pub reverse_threshold: Option<Value>,
    /// Reset applied at the negative threshold
    pub reverse_reset: Option<Value>,
    /// Leak decay
    pub leak_decay: Option<Value>,
    /// Reset mode name
    pub reset_mode: Option<String>,
    /// Reverse reset mode name
    pub reverse_reset_mode: Option<String>,
    /// Trace spikes
    pub log_spikes: Option<bool>,
    /// Trace membrane potentials
    pub log_v: Option<bool>,
    /// Update every timestep
    pub force_update: Option<bool>,
    /// Declared per-neuron fan-out cap
    pub connections_out: Option<usize>,
}

impl GroupParams {
    /// Threshold, reset and leak; logging flags default to off
    pub fn new(threshold: impl Into<Value>, reset: impl Into<Value>, leak: impl Into<Value>) -> Self {
        Self {
            threshold: Some(threshold.into()),
            reset: Some(reset.into()),
            reverse_threshold: None,
            reverse_reset: None,
            leak_decay: Some(leak.into()),
            reset_mode: None,
            reverse_reset_mode: None,
            log_spikes: Some(false),
            log_v: Some(false),
            force_update: Some(false),
            connections_out: None,
        }
    }

    /// Set spike logging
    pub fn log_spikes(mut self, on: bool) -> Self {
        self.log_spikes = Some(on);
        self
    }

    /// Set potential logging
    pub fn log_potential(mut self, on: bool) -> Self {
        self.log_v = Some(on);
        self
    }

    /// Set forced updates
    pub fn force_update(mut self, on: bool) -> Self {
        self.force_update = Some(on);
        self
    }

    /// Set the per-neuron fan-out cap
    pub fn connections_out(mut self, cap: usize) -> Self {
        self.connections_out = Some(cap);
        self
    }

    /// Set the reverse threshold
    pub fn reverse_threshold(mut self, v: impl Into<Value>) -> Self {
        self.reverse_threshold = Some(v.into());
        self
    }

    /// Set the reverse reset
    pub fn reverse_reset(mut self, v: impl Into<Value>) -> Self {
        self.reverse_reset = Some(v.into());
        self
    }

    /// Set the reset mode
    pub fn reset_mode(mut self, mode: impl Into<String>) -> Self {
        self.reset_mode = Some(mode.into());
        self
    }

    /// Set the reverse reset mode
    pub fn reverse_reset_mode(mut self, mode: impl Into<String>) -> Self {
        self.reverse_reset_mode = Some(mode.into());
        self
    }
}

/// A group of neurons sharing dynamics parameters
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronGroup {
    id: GroupId,
    params: GroupParams,
    neurons: Vec<Neuron>,
}

impl NeuronGroup {
    /// Group handle
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Group parameters
    pub fn params(&self) -> &GroupParams {
        &self.params
    }

    /// Neurons in creation order
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Number of neurons
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// True if the group has no neurons
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Neuron by index
    pub fn neuron(&self, index: usize) -> Option<&Neuron> {
        self.neurons.get(index)
    }

    /// Mutable neuron by index
    pub fn neuron_mut(&mut self, index: usize) -> Option<&mut Neuron> {
        self.neurons.get_mut(index)
    }

    fn next_address(&self) -> NeuronAddress {
        NeuronAddress::new(self.id.0, self.neurons.len())
    }

    /// Create a flag-style neuron (type `lif`)
    pub fn create_neuron(&mut self, flags: NeuronFlags) -> NeuronAddress {
        let address = self.next_address();
        self.neurons
            .push(Neuron::new(address, Some("lif".to_string()), NeuronParams::Flags(flags)));
        address
    }

    /// Create a neuron with a type tag and free-form parameters
    pub fn create_typed_neuron(&mut self, kind: impl Into<String>, params: Vec<(String, Value)>) -> NeuronAddress {
        let address = self.next_address();
        self.neurons
            .push(Neuron::new(address, Some(kind.into()), NeuronParams::Custom(params)));
        address
    }
}

/// External spike source
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    id: InputId,
    connections: Vec<Connection>,
}

impl Input {
    /// Input handle
    pub fn id(&self) -> InputId {
        self.id
    }

    /// Outgoing connections in creation order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Append an outgoing connection
    pub fn add_connection(&mut self, dest: NeuronAddress, weight: impl Into<Weight>) {
        self.connections.push(Connection {
            dest,
            weight: weight.into(),
        });
    }
}

/// A spiking network description
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Network {
    external_inputs: usize,
    save_mappings: bool,
    groups: Vec<NeuronGroup>,
    inputs: Vec<Input>,
}

impl Network {
    /// Empty network without external inputs or placement persistence
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a count of rate-coded external inputs (`x` record)
    pub fn with_external_inputs(mut self, count: usize) -> Self {
        self.external_inputs = count;
        self
    }

    /// Write `&` placement records on save
    pub fn with_save_mappings(mut self, on: bool) -> Self {
        self.save_mappings = on;
        self
    }

    /// Declared external input count
    pub fn external_inputs(&self) -> usize {
        self.external_inputs
    }

    /// Whether placements are written on save
    pub fn save_mappings(&self) -> bool {
        self.save_mappings
    }

    /// Create a group
    pub fn create_group(&mut self, params: GroupParams) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(NeuronGroup {
            id,
            params,
            neurons: Vec::new(),
        });
        id
    }

    /// Create an external input
    pub fn create_input(&mut self) -> InputId {
        let id = InputId(self.inputs.len());
        self.inputs.push(Input {
            id,
            connections: Vec::new(),
        });
        id
    }

    /// Groups in creation order
    pub fn groups(&self) -> &[NeuronGroup] {
        &self.groups
    }

    /// Inputs in creation order
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// Group by handle
    pub fn group(&self, id: GroupId) -> Result<&NeuronGroup> {
        self.groups
            .get(id.0)
            .ok_or(NetError::UnknownGroup { group: id.0 })
    }

    /// Mutable group by handle
    pub fn group_mut(&mut self, id: GroupId) -> Result<&mut NeuronGroup> {
        self.groups
            .get_mut(id.0)
            .ok_or(NetError::UnknownGroup { group: id.0 })
    }

    /// Neuron by address
    pub fn neuron(&self, address: NeuronAddress) -> Result<&Neuron> {
        self.groups
            .get(address.group)
            .and_then(|g| g.neuron(address.neuron))
            .ok_or_else(|| NetError::UnknownNeuron {
                address: address.to_string(),
            })
    }

    /// Mutable neuron by address
    pub fn neuron_mut(&mut self, address: NeuronAddress) -> Result<&mut Neuron> {
        self.groups
            .get_mut(address.group)
            .and_then(|g| g.neuron_mut(address.neuron))
            .ok_or_else(|| NetError::UnknownNeuron {
                address: address.to_string(),
            })
    }

    /// Input by handle
    pub fn input_mut(&mut self, id: InputId) -> Result<&mut Input> {
        self.inputs
            .get_mut(id.0)
            .ok_or(NetError::UnknownInput { input: id.0 })
    }

    /// Connect two existing neurons
    pub fn connect(&mut self, src: NeuronAddress, dest: NeuronAddress, weight: impl Into<Weight>) -> Result<()> {
        self.neuron(dest)?;
        self.neuron_mut(src)?.add_connection(dest, weight);
        Ok(())
    }

    /// Connect an input to an existing neuron
    pub fn connect_input(&mut self, input: InputId, dest: NeuronAddress, weight: impl Into<Weight>) -> Result<()> {
        self.neuron(dest)?;
        self.input_mut(input)?.add_connection(dest, weight);
        Ok(())
    }

    /// Total neurons across all groups
    pub fn neuron_count(&self) -> usize {
        self.groups.iter().map(NeuronGroup::len).sum()
    }

    /// Total neuron-to-neuron connections
    pub fn connection_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.neurons.iter())
            .map(|n| n.connections.len())
            .sum()
    }
}
