//! CLI for the sequence gateway
//!
//! Subcommands:
//! - `serve`: run the API server

pub mod serve;

use clap::{Parser, Subcommand};

/// Secuencia Gateway - generation service for didactic sequences
#[derive(Parser)]
#[command(name = "secuencia-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
