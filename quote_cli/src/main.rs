//! Quote CLI — one-shot commands against the local quote store.
//!
//! Every run opens the file-backed store in `--data-dir`, performs a single
//! operation, and exits. Mutations are persisted before the command returns.
//!
//! Usage example (CLI):
//! ```bash
//! quote_cli random --category Motivation
//! quote_cli add --text "Stay hungry." --category Motivation
//! quote_cli import ./quotes.json
//! quote_cli sync
//! quote_cli keep-local
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::{Args, Command};
use clap::Parser;
use log::{info, warn};
use quote_store::{
    CategoryFilter, FileStore, HttpRemoteSource, QuoteError, QuoteStore, Result, SyncConfig,
    SyncOutcome,
};
use std::io::Write;
use std::sync::Arc;

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let config = SyncConfig::from(&args.store);
    let remote = Arc::new(HttpRemoteSource::new(config)?);
    let storage = FileStore::open(&args.store.data_dir)?;
    let mut store = QuoteStore::open(storage, remote);

    run(&mut store, args.command)
}

fn run(store: &mut QuoteStore<FileStore>, command: Command) -> Result<(), QuoteError> {
    match command {
        Command::Random { category } => {
            apply_category(store, category)?;
            match store.random_quote(&mut rand::rng()) {
                Some(quote) => println!("\"{}\"\nCategory: {}", quote.text, quote.category),
                None => println!("No quotes found for this category yet."),
            }
        }
        Command::List { category } => {
            apply_category(store, category)?;
            let quotes = store.filtered();
            if quotes.is_empty() {
                println!("No quotes found for this category yet.");
            }
            for quote in quotes {
                println!("\"{}\" [{}]", quote.text, quote.category);
            }
        }
        Command::Categories => {
            for option in store.category_options() {
                println!("{option}");
            }
        }
        Command::Add { text, category } => {
            let quote = store.add_quote(&text, &category)?;
            println!("Added \"{}\" to {}.", quote.text, quote.category);
            report_status(store);
        }
        Command::Import { path } => match store.import_file(&path) {
            Ok(count) => println!("Quotes imported successfully! ({count} added)"),
            Err(QuoteError::NoValidQuotes) => println!("No valid quotes found in the file."),
            Err(e @ QuoteError::InvalidImport(_)) => {
                println!("Unable to import quotes. Please check the file format.");
                return Err(e);
            }
            Err(e) => return Err(e),
        },
        Command::Export { path } => match path {
            Some(path) => {
                store.export_file(&path)?;
                info!("Exported {} quotes to {}", store.len(), path.display());
            }
            None => {
                let json = store.export_json()?;
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
            }
        },
        Command::Sync => {
            match store.sync(true) {
                Ok(SyncOutcome::ConflictApplied { replaced, applied }) => {
                    println!(
                        "Replaced {replaced} local quotes with {applied} from the server. \
                         Run `keep-local` to revert."
                    );
                }
                Ok(SyncOutcome::UpToDate) => {}
                Err(e) => warn!("{}", e),
            }
            report_status(store);
        }
        Command::KeepLocal => {
            if let Err(e) = store.keep_local_data() {
                warn!("{}", e);
            }
            report_status(store);
        }
        Command::UseServer => {
            store.use_server_data()?;
            report_status(store);
        }
        Command::Status => {
            match store.last_sync() {
                Some(at) => println!("Last sync: {}", at.to_rfc3339()),
                None => println!("Last sync: never"),
            }
            println!("Quotes: {}", store.len());
            println!("Filter: {}", store.filter());
            if let Some(quote) = store.last_viewed() {
                println!("Last viewed: \"{}\" [{}]", quote.text, quote.category);
            }
        }
    }
    Ok(())
}

/// Applies and remembers `--category`, or keeps the stored selection.
fn apply_category(
    store: &mut QuoteStore<FileStore>,
    category: Option<String>,
) -> Result<(), QuoteError> {
    if let Some(raw) = category {
        let Ok(filter) = raw.parse::<CategoryFilter>();
        store.set_filter(filter)?;
    }
    Ok(())
}

fn report_status(store: &QuoteStore<FileStore>) {
    let status = store.status();
    if status.message.is_empty() {
        return;
    }
    if status.is_warning {
        eprintln!("{status}");
    } else {
        println!("{status}");
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
