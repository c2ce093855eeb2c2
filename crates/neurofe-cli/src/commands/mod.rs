//! CLI command implementations for neurofe

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CliConfig;
use crate::error::CliResult;

pub mod arch;
pub mod net;

/// neurofe - front end for the neuromorphic simulation kernel
#[derive(Parser, Debug)]
#[command(
    name = "neurofe",
    version,
    about = "Elaborate neuromorphic architectures and build spiking network files",
    long_about = "neurofe expands hierarchical architecture descriptions into the flat \
                  instruction listing read by the simulation kernel, and builds, saves \
                  and inspects spiking network files in the kernel's text format."
)]
pub struct NeurofeCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NEUROFE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Architecture description commands (elaborate, check)
    Arch(arch::ArchCommand),

    /// Network file commands (inspect, generate)
    Net(net::NetCommand),
}

impl NeurofeCli {
    /// Load the configuration this invocation points at
    pub fn load_config(&self) -> CliResult<CliConfig> {
        CliConfig::resolve(self.config.as_deref())
    }

    /// Execute the CLI command
    pub fn execute(self, config: &CliConfig) -> CliResult<()> {
        match self.command {
            Commands::Arch(cmd) => cmd.execute(config),
            Commands::Net(cmd) => cmd.execute(config),
        }
    }
}
