//! Network file commands: inspect (load and summarize) and generate
//! (synthetic benchmark networks).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use neurofe_net::{
    create_layer, CompartmentTable, GroupParams, Network, NeuronAddress, Placement,
};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Network file commands
#[derive(Args, Debug)]
pub struct NetCommand {
    #[command(subcommand)]
    pub sub: NetSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NetSubcommand {
    /// Load a network file and print its size
    Inspect(NetInspect),
    /// Build a synthetic network and save it
    Generate(NetGenerate),
}

/// Summarize a network file
#[derive(Args, Debug)]
pub struct NetInspect {
    /// Network file
    pub input: PathBuf,
}

/// Generate a synthetic network file
#[derive(Args, Debug)]
pub struct NetGenerate {
    /// Output network file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Topology
    #[arg(long, default_value = "fully-connected")]
    pub topology: TopologyType,

    /// Hardware shape used for placement
    #[arg(long, default_value = "32")]
    pub tiles: usize,
    #[arg(long, default_value = "4")]
    pub cores_per_tile: usize,
    #[arg(long, default_value = "1024")]
    pub capacity: usize,

    /// Neurons per layer (fully-connected)
    #[arg(long, default_value = "64")]
    pub neurons: usize,

    /// Probability of each layer-to-layer connection (fully-connected)
    #[arg(long, default_value = "1.0")]
    pub connection_probability: f64,

    /// Use an unreachable threshold so no neuron fires (fully-connected)
    #[arg(long)]
    pub silent: bool,

    /// Cores populated (random)
    #[arg(long, default_value = "4")]
    pub cores: usize,

    /// Neurons on each populated core (random)
    #[arg(long, default_value = "8")]
    pub neurons_per_core: usize,

    /// Distinct destination cores per neuron (random)
    #[arg(long, default_value = "1")]
    pub messages_per_neuron: usize,

    /// Destination neurons per destination core (random)
    #[arg(long, default_value = "1")]
    pub spikes_per_message: usize,

    /// Random seed
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Write `&` placement records
    #[arg(long)]
    pub save_mappings: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopologyType {
    /// Two layers, every neuron of the first connected to the second
    FullyConnected,
    /// One population with per-core random fan-out
    Random,
}

impl NetCommand {
    pub fn execute(self, config: &CliConfig) -> CliResult<()> {
        match self.sub {
            NetSubcommand::Inspect(cmd) => cmd.execute(),
            NetSubcommand::Generate(cmd) => cmd.execute(config),
        }
    }
}

impl NetInspect {
    pub fn execute(self) -> CliResult<()> {
        if !self.input.exists() {
            return Err(CliError::missing_resource(format!(
                "network file {} not found",
                self.input.display()
            )));
        }
        let net = Network::load_file(&self.input)?;

        println!("{}", self.input.display());
        println!("  groups:      {}", net.groups().len());
        println!("  neurons:     {}", net.neuron_count());
        println!("  connections: {}", net.connection_count());
        for group in net.groups() {
            let edges: usize = group.neurons().iter().map(|n| n.connections().len()).sum();
            println!("  - group {}: {} neurons, {} connections", group.id(), group.len(), edges);
        }
        Ok(())
    }
}

impl NetGenerate {
    pub fn execute(self, config: &CliConfig) -> CliResult<()> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let save_mappings = self.save_mappings || config.save_mappings;
        let mut net = Network::new().with_save_mappings(save_mappings);
        let mut table = CompartmentTable::new(self.tiles, self.cores_per_tile, self.capacity);

        match self.topology {
            TopologyType::FullyConnected => self.fully_connected(&mut net, &mut table, &mut rng)?,
            TopologyType::Random => self.random(&mut net, &mut table, &mut rng)?,
        }

        if let Some(parent) = self.output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        net.save_file(&self.output)?;
        info!(
            "Generated {} neurons, {} connections into {}",
            net.neuron_count(),
            net.connection_count(),
            self.output.display()
        );
        Ok(())
    }

    fn fully_connected(&self, net: &mut Network, table: &mut CompartmentTable, rng: &mut StdRng) -> CliResult<()> {
        if !(0.0..=1.0).contains(&self.connection_probability) {
            return Err(CliError::invalid_args("--connection-probability must be within [0, 1]"));
        }
        let threshold = if self.silent { 2.0 * self.neurons as f64 } else { -1.0 };
        let params = GroupParams::new(threshold, 0, 1.0);

        let first = create_layer(net, self.neurons, table, params.clone(), None)?;
        let second = create_layer(net, self.neurons, table, params, None)?;

        for src in 0..self.neurons {
            for dest in 0..self.neurons {
                if rng.gen_bool(self.connection_probability) {
                    net.connect(
                        NeuronAddress::new(first.raw(), src),
                        NeuronAddress::new(second.raw(), dest),
                        1.0,
                    )?;
                }
            }
        }
        Ok(())
    }

    fn random(&self, net: &mut Network, table: &mut CompartmentTable, rng: &mut StdRng) -> CliResult<()> {
        let available = self.tiles * self.cores_per_tile;
        if self.cores == 0 || self.cores > available {
            return Err(CliError::invalid_args(format!(
                "--cores must be between 1 and {} ({} tiles x {} cores)",
                available, self.tiles, self.cores_per_tile
            )));
        }
        if self.messages_per_neuron > self.cores {
            return Err(CliError::invalid_args("--messages-per-neuron cannot exceed --cores"));
        }
        if self.spikes_per_message > self.neurons_per_core {
            return Err(CliError::invalid_args(
                "--spikes-per-message cannot exceed --neurons-per-core",
            ));
        }

        let mappings: Vec<Placement> = (0..self.cores)
            .flat_map(|core| {
                let placement = Placement::new(core / self.cores_per_tile, core % self.cores_per_tile);
                std::iter::repeat(placement).take(self.neurons_per_core)
            })
            .collect();
        let neurons = mappings.len();
        let params = GroupParams::new(0.0, 0.0, 0.0).force_update(true);
        let group = create_layer(net, neurons, table, params, Some(mappings.as_slice()))?;

        for n in 0..neurons {
            if n % 1024 == 0 {
                debug!("Generating connections for neuron {}", n);
            }
            let src = NeuronAddress::new(group.raw(), n);
            net.neuron_mut(src)?.add_bias(1.0);
            for core in sample(rng, self.cores, self.messages_per_neuron).iter() {
                for d in sample(rng, self.neurons_per_core, self.spikes_per_message).iter() {
                    let dest = NeuronAddress::new(group.raw(), core * self.neurons_per_core + d);
                    net.connect(src, dest, 1.0)?;
                }
            }
        }
        Ok(())
    }
}
