//! CLI Module
//!
//! Command-line interface for inspecting and converting wave files.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// wavekit - PCM wave buffer inspection and conversion
#[derive(Parser, Debug)]
#[command(name = "wavekit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Codec configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the container type of one or more files
    #[command(name = "sniff")]
    Sniff {
        /// Files to classify
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Classify every file under a directory
    #[command(name = "scan")]
    Scan {
        /// Directory to walk
        dir: PathBuf,
    },

    /// Print format, duration and a PCM checksum
    #[command(name = "info")]
    Info {
        /// Audio file
        path: PathBuf,
    },

    /// Decode, transform and write a PCM WAV file
    #[command(name = "convert")]
    Convert {
        /// Input file (WAV, AIFF or AIFF-C)
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Downmix stereo to mono
        #[arg(long, conflicts_with = "stereo")]
        mono: bool,

        /// Expand mono to stereo
        #[arg(long)]
        stereo: bool,

        /// Reverse the audio
        #[arg(long)]
        reverse: bool,
    },
}
