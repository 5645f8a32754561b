use clap::Parser;

mod app;
mod audio;
mod catalog;
mod cli;
mod config;
mod error;
mod runtime;
mod session;
mod ui;
mod upload;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run(cli::Cli::parse())
}
