//! Operator commands read from stdin.
//!
//! A background thread reads one command per line and forwards it over a
//! channel, so the main loop can `select!` on it next to scheduler events.
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};
use quote_store::{FileStore, QuoteError, Result, SharedStore, SyncScheduler};
use std::io::BufRead;
use std::thread;
use strum_macros::EnumString;

/// A command typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ConsoleCommand {
    /// Run a sync pass now.
    Sync,
    /// Revert the last remote overwrite.
    KeepLocal,
    /// Confirm the remote data.
    UseServer,
    /// Print the store status.
    Status,
    /// List the commands.
    Help,
    /// Stop the daemon.
    Quit,
}

/// Stdin reader handle.
pub struct Console {
    commands: Receiver<ConsoleCommand>,
    // Keeps the channel open after stdin closes, so the main loop simply
    // stops receiving commands instead of seeing a disconnect.
    _keep_open: Sender<ConsoleCommand>,
}

impl Console {
    /// Spawns the stdin reader thread.
    pub fn spawn() -> Self {
        let (tx, rx) = unbounded::<ConsoleCommand>();
        let reader_tx = tx.clone();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match trimmed.parse::<ConsoleCommand>() {
                    Ok(command) => {
                        if reader_tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(_) => warn!("Unknown command `{}`; type `help`", trimmed),
                }
            }
            debug!("Console reader stopping...");
        });
        Self {
            commands: rx,
            _keep_open: tx,
        }
    }

    /// Commands typed by the operator.
    pub fn commands(&self) -> &Receiver<ConsoleCommand> {
        &self.commands
    }
}

/// Runs one operator command against the shared store.
pub fn handle(
    command: ConsoleCommand,
    store: &SharedStore<FileStore>,
    scheduler: &SyncScheduler,
) -> Result<(), QuoteError> {
    match command {
        ConsoleCommand::Sync => scheduler.sync_now()?,
        ConsoleCommand::KeepLocal => {
            let mut guard = store.lock()?;
            guard.keep_local_data()?;
            info!("{} ({} quotes)", guard.status(), guard.len());
        }
        ConsoleCommand::UseServer => {
            let mut guard = store.lock()?;
            guard.use_server_data()?;
            info!("{} ({} quotes)", guard.status(), guard.len());
        }
        ConsoleCommand::Status => {
            let guard = store.lock()?;
            info!(
                "state={} quotes={} categories={} status=\"{}\"",
                guard.sync_state(),
                guard.len(),
                guard.categories().join(","),
                guard.status()
            );
        }
        ConsoleCommand::Help => {
            info!("Commands: sync, keep-local, use-server, status, help, quit");
        }
        ConsoleCommand::Quit => {}
    }
    Ok(())
}
