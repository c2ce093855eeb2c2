//! # neurofe - front end for the neuromorphic simulation kernel
//!
//! Elaborates architecture descriptions into instruction listings and
//! builds or inspects spiking network files.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use neurofe_cli::config::CliConfig;
use neurofe_cli::NeurofeCli;

fn init_logging(verbose: bool, config: &CliConfig) {
    let default_level = if verbose {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = NeurofeCli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            init_logging(cli.verbose, &CliConfig::default());
            error!("Command failed: {}", err);
            std::process::exit(1);
        }
    };
    init_logging(cli.verbose, &config);

    if let Err(err) = cli.execute(&config) {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }
}
