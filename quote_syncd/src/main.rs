//! Quote sync daemon.
//!
//! This binary keeps a local quote store reconciled with the remote endpoint.
//! It wires together two building blocks from `quote_store`:
//!
//! - `QuoteStore` — owns the collection persisted under `--data-dir`.
//! - `SyncScheduler` — a worker thread that runs one sync pass at start-up
//!   and one per `--sync-interval-secs`, publishing a `SyncEvent` per pass.
//!
//! Concurrency and shutdown:
//! - Crossbeam `select!` multiplexes scheduler events, operator commands from
//!   stdin, and the Ctrl+C signal.
//! - On Ctrl+C the scheduler is stopped; an in-flight fetch finishes first.
//! - Sync failures are logged and retried on the next tick only.
//!
//! Conflicts are applied remote-wins by the store. The operator answers them
//! on stdin with `keep-local` or `use-server`; see `console`.
#![warn(missing_docs)]
mod console;

use crate::console::{Console, ConsoleCommand};
use clap::Parser;
use crossbeam_channel::{select, unbounded};
use log::{error, info, warn};
use quote_store::{
    FileStore, HttpRemoteSource, QuoteError, QuoteStore, Result, StoreArgs, SyncConfig,
    SyncEvent, SyncOutcome, SyncScheduler,
};
use std::sync::Arc;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    store: StoreArgs,
}

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let config = SyncConfig::from(&args.store);
    let interval = config.interval;
    let remote = Arc::new(HttpRemoteSource::new(config)?);
    let storage = FileStore::open(&args.store.data_dir)?;
    info!("Data directory: {}", storage.dir().display());

    let store = QuoteStore::open(storage, remote).into_shared();
    {
        let guard = store.lock()?;
        if !guard.status().message.is_empty() {
            info!("{}", guard.status());
        }
    }

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down sync daemon...");
        let _ = shutdown_tx.send(());
    })
    .expect("Error setting Ctrl+C handler");

    let scheduler = SyncScheduler::start(Arc::clone(&store), interval)?;
    let console = Console::spawn();
    info!("Sync daemon running. Type `help` for commands, Ctrl+C to exit.");

    loop {
        select! {
            recv(shutdown_rx) -> _ => break,
            recv(console.commands()) -> msg => match msg {
                Ok(ConsoleCommand::Quit) | Err(_) => break,
                Ok(command) => {
                    if let Err(e) = console::handle(command, &store, &scheduler) {
                        warn!("{}", e);
                    }
                }
            },
            recv(scheduler.events()) -> msg => match msg {
                Ok(event) => report(&event),
                Err(e) => {
                    error!("Sync worker stopped unexpectedly: {}", e);
                    break;
                }
            },
        }
    }

    scheduler.stop();
    let guard = store.lock()?;
    info!("Stopped with {} quotes", guard.len());
    Ok(())
}

fn report(event: &SyncEvent) {
    match event {
        SyncEvent::Completed {
            outcome: SyncOutcome::UpToDate,
            ..
        } => info!("Synced."),
        SyncEvent::Completed {
            outcome: SyncOutcome::ConflictApplied { replaced, applied },
            ..
        } => warn!(
            "Server data applied: {} local quotes replaced by {}. Type `keep-local` to revert or `use-server` to confirm.",
            replaced, applied
        ),
        SyncEvent::Failed { message, .. } => {
            warn!("Sync failed ({}). Retrying on the next tick.", message)
        }
    }
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
