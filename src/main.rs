//! wavekit CLI
//!
//! Command-line front end for the wave-buffer engine and container codecs.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use wavekit::cli::commands::{self, ConvertOptions};
use wavekit::cli::{Cli, Commands};
use wavekit::config::CodecConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("wavekit v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => CodecConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CodecConfig::default(),
    };

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("wavekit v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &CodecConfig) -> anyhow::Result<()> {
    match cmd {
        Commands::Sniff { files } => commands::sniff(&files)?,
        Commands::Scan { dir } => {
            commands::scan(&dir).with_context(|| format!("scanning {}", dir.display()))?;
        }
        Commands::Info { path } => {
            commands::info(&path, config).with_context(|| format!("reading {}", path.display()))?
        }
        Commands::Convert {
            input,
            output,
            mono,
            stereo,
            reverse,
        } => {
            let options = ConvertOptions {
                mono,
                stereo,
                reverse,
            };
            commands::convert(&input, &output, options, config)
                .with_context(|| format!("converting {}", input.display()))?
        }
    }
    Ok(())
}
