//! Architecture commands: elaborate (description → instruction listing file)
//! and check (elaborate in memory, report counts).

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use serde_json::Value;
use tracing::info;

use neurofe_arch::{architecture_of, elaborate, emit, verify_architecture, TextSink};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Architecture description commands
#[derive(Args, Debug)]
pub struct ArchCommand {
    #[command(subcommand)]
    pub sub: ArchSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ArchSubcommand {
    /// Elaborate a description into the kernel's instruction listing
    Elaborate(ArchElaborate),
    /// Elaborate in memory and print record counts
    Check(ArchCheck),
}

/// Elaborate an architecture description to a file
#[derive(Args, Debug)]
pub struct ArchElaborate {
    /// Architecture description (.json, .toml, or .yaml/.yml/.arch)
    pub input: PathBuf,

    /// Output listing path (defaults to <run_dir>/<input file name>.parsed)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Check an architecture description without writing anything
#[derive(Args, Debug)]
pub struct ArchCheck {
    /// Architecture description (.json, .toml, or .yaml/.yml/.arch)
    pub input: PathBuf,
}

impl ArchCommand {
    pub fn execute(self, config: &CliConfig) -> CliResult<()> {
        match self.sub {
            ArchSubcommand::Elaborate(cmd) => cmd.execute(config),
            ArchSubcommand::Check(cmd) => cmd.execute(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Toml,
    Yaml,
}

impl DocumentFormat {
    fn of(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => Self::Toml,
            "yaml" | "yml" | "arch" => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Read a description document into one tree shape. `.toml` and
/// `.yaml`/`.yml`/`.arch` files are converted into the same tree JSON input
/// produces; everything else is parsed as JSON.
pub fn read_document(path: &Path) -> CliResult<Value> {
    if !path.exists() {
        return Err(CliError::missing_resource(format!(
            "architecture file {} not found",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading architecture file {}", path.display()))?;
    match DocumentFormat::of(path) {
        DocumentFormat::Toml => {
            let doc: toml::Value = toml::from_str(&text)?;
            Ok(serde_json::to_value(doc)?)
        }
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(&text)?),
        DocumentFormat::Json => Ok(serde_json::from_str(&text)?),
    }
}

/// Listing path used when no `-o` is given
pub fn default_listing_path(input: &Path, run_dir: &Path) -> CliResult<PathBuf> {
    let name = input
        .file_name()
        .ok_or_else(|| CliError::invalid_args(format!("{} has no file name", input.display())))?;
    let mut file = name.to_os_string();
    file.push(".parsed");
    Ok(run_dir.join(file))
}

impl ArchElaborate {
    pub fn execute(self, config: &CliConfig) -> CliResult<()> {
        let document = read_document(&self.input)?;
        let spec = verify_architecture(architecture_of(&document)?)?;

        let output = match self.output {
            Some(path) => path,
            None => default_listing_path(&self.input, &config.run_dir)?,
        };
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }

        info!("Elaborating {} into {}", self.input.display(), output.display());
        let file = File::create(&output)
            .with_context(|| format!("creating listing file {}", output.display()))?;
        let mut sink = TextSink::new(BufWriter::new(file));
        let summary = emit(&spec, &mut sink)?;
        sink.into_inner()?;
        info!(
            "Wrote {} records ({} tiles, {} cores) to {}",
            summary.records,
            summary.tiles,
            summary.cores,
            output.display()
        );
        Ok(())
    }
}

impl ArchCheck {
    pub fn execute(self) -> CliResult<()> {
        let document = read_document(&self.input)?;
        let listing = elaborate(architecture_of(&document)?)?;

        let mut counts: BTreeMap<char, usize> = BTreeMap::new();
        for instruction in &listing {
            *counts.entry(instruction.kind.symbol()).or_default() += 1;
        }
        let count = |c: char| counts.get(&c).copied().unwrap_or(0);

        println!("{}: ok", self.input.display());
        println!("  tiles:    {}", count('t'));
        println!("  cores:    {}", count('c'));
        println!("  axon_in:  {}", count('i'));
        println!("  synapse:  {}", count('s'));
        println!("  dendrite: {}", count('d'));
        println!("  soma:     {}", count('+'));
        println!("  axon_out: {}", count('o'));
        println!("  noc:      {}", count('@'));
        println!("  records:  {}", listing.len());
        Ok(())
    }
}
