//! Command-line arguments for the quote CLI.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use quote_store::StoreArgs;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Storage and remote settings.
    #[command(flatten)]
    pub store: StoreArgs,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// One-shot operations against the store.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one random quote from the selected category.
    Random {
        /// Category to pick from (`all` for every category); remembered for later runs.
        #[arg(long)]
        category: Option<String>,
    },
    /// List quotes in the selected category.
    List {
        /// Category to list (`all` for every category); remembered for later runs.
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the category options.
    Categories,
    /// Add a quote and mirror it to the remote.
    Add {
        /// Quote text.
        #[arg(long)]
        text: String,
        /// Quote category.
        #[arg(long)]
        category: String,
    },
    /// Append the valid quotes of a JSON file.
    Import {
        /// Path to a JSON array of `{text, category}` objects.
        path: PathBuf,
    },
    /// Write all quotes as a JSON array (to stdout when no path is given).
    Export {
        /// Destination file.
        path: Option<PathBuf>,
    },
    /// Run one sync pass against the remote.
    Sync,
    /// Revert the last remote overwrite from the backup.
    KeepLocal,
    /// Keep the remote data applied by the last sync.
    UseServer,
    /// Show the last sync time, the last viewed quote, and the filter.
    Status,
}
