//! CLI commands and argument parsing.

pub mod cloudformation;
pub mod registry;

use clap::{Parser, Subcommand};

/// Fenceline - connect registries and cloud accounts to the console
#[derive(Parser)]
#[command(name = "fenceline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and add registry connectors
    Registry(registry::RegistryArgs),

    /// Build CloudFormation deploy links
    Cloudformation(cloudformation::CloudFormationArgs),

    /// Print version information
    Version,
}

/// Output format shared by listing commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
