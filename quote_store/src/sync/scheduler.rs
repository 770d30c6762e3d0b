//! Background sync worker.
//!
//! `SyncScheduler::start` spawns one thread that runs a sync pass right away,
//! then once per tick of a fixed-period `crossbeam_channel::tick`, and once
//! per `sync_now` request. The host stops it explicitly with `stop`, or
//! implicitly by dropping the handle.
//!
//! Each pass fetches without holding the store lock and only locks to begin
//! and to apply, so readers of the store are never blocked on the network.
//! Passes inside the worker run one after another; a host that also calls
//! `QuoteStore::sync` directly can overlap with the worker, and whichever
//! pass finishes last decides the data.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select, tick, unbounded};
use log::{debug, error, info, warn};

use crate::Result;
use crate::error::QuoteError;
use crate::remote::RemoteSource;
use crate::storage::KeyValueStore;
use crate::store::SharedStore;
use crate::sync::reconcile::SyncOutcome;

/// Capacity of the event channel; older events are kept, newer ones dropped
/// when the host does not drain it.
const EVENT_CAPACITY: usize = 64;

/// Result of one pass, published to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The pass finished.
    Completed {
        /// What the pass did.
        outcome: SyncOutcome,
        /// True when triggered by `sync_now`.
        manual: bool,
    },
    /// The pass failed; the collection is unchanged.
    Failed {
        /// Error description.
        message: String,
        /// True when triggered by `sync_now`.
        manual: bool,
    },
}

/// Handle to a running sync worker.
pub struct SyncScheduler {
    trigger_tx: Sender<()>,
    stop_tx: Sender<()>,
    events_rx: Receiver<SyncEvent>,
    handle: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Starts the worker. The first pass runs immediately.
    pub fn start<S>(store: SharedStore<S>, interval: Duration) -> Result<Self>
    where
        S: KeyValueStore + Send + 'static,
    {
        let remote = store.lock()?.remote();
        let (trigger_tx, trigger_rx) = unbounded::<()>();
        let (stop_tx, stop_rx) = unbounded::<()>();
        let (events_tx, events_rx) = bounded::<SyncEvent>(EVENT_CAPACITY);

        let handle = thread::Builder::new()
            .name("quote-sync".to_string())
            .spawn(move || {
                info!("Sync worker started, interval={:?}", interval);
                let ticker = tick(interval);
                run_pass(&store, &remote, false, &events_tx);

                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(trigger_rx) -> msg => match msg {
                            Ok(()) => run_pass(&store, &remote, true, &events_tx),
                            Err(_) => break,
                        },
                        recv(ticker) -> _ => run_pass(&store, &remote, false, &events_tx),
                    }
                }
                info!("Sync worker stopping...");
            })?;

        Ok(Self {
            trigger_tx,
            stop_tx,
            events_rx,
            handle: Some(handle),
        })
    }

    /// Requests an extra pass as soon as the worker is free.
    pub fn sync_now(&self) -> Result<()> {
        self.trigger_tx
            .send(())
            .map_err(|e| QuoteError::ChannelSend(e.to_string()))
    }

    /// Events published by the worker.
    pub fn events(&self) -> &Receiver<SyncEvent> {
        &self.events_rx
    }

    /// Stops the worker and waits for an in-flight pass to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.stop_tx.send(());
        if handle.join().is_err() {
            error!("Sync worker panicked");
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_pass<S: KeyValueStore>(
    store: &SharedStore<S>,
    remote: &Arc<dyn RemoteSource>,
    manual: bool,
    events: &Sender<SyncEvent>,
) {
    match store.lock() {
        Ok(mut guard) => guard.begin_sync(),
        Err(e) => {
            error!("Store lock poisoned, skipping sync pass: {}", e);
            return;
        }
    }

    let fetched = remote.fetch_remote_quotes();

    let result = store
        .lock()
        .map_err(QuoteError::from)
        .and_then(|mut guard| guard.complete_sync(fetched, manual));

    let event = match result {
        Ok(outcome) => {
            debug!("Sync pass finished: {:?}", outcome);
            SyncEvent::Completed { outcome, manual }
        }
        Err(e) => SyncEvent::Failed {
            message: e.to_string(),
            manual,
        },
    };

    match events.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => warn!("Sync event dropped, channel full: {:?}", event),
        Err(TrySendError::Disconnected(_)) => {}
    }
}
