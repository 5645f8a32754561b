use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "soundshelf")]
#[command(version)]
#[command(about = "Browse and play a hosted music library from the terminal")]
pub struct Cli {
    /// Path to the config TOML file (defaults to the XDG config location)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the library player (the default)
    Play,
    /// Upload an audio file to the media host
    Upload {
        /// MP3, WAV or OGG file to upload
        file: PathBuf,
    },
}
