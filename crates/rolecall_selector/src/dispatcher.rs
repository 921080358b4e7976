//! Per-guild ordered reaction handling.

use crate::ReactionReconciler;
use rolecall_core::{GuildId, ReactionEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

struct Worker {
    tx: mpsc::Sender<ReactionEvent>,
    handle: JoinHandle<()>,
}

/// Routes reaction events to one worker task per guild.
///
/// Each worker drains a bounded queue in arrival order, so two reactions in the
/// same guild never toggle concurrently while different guilds run in parallel.
/// When a queue is full, `dispatch` waits for room. Events for guilds without a
/// published selector are dropped before any worker starts.
pub struct ReactionDispatcher {
    reconciler: Arc<ReactionReconciler>,
    capacity: usize,
    workers: Mutex<HashMap<GuildId, Worker>>,
}

impl ReactionDispatcher {
    /// Create a dispatcher whose per-guild queues hold `capacity` events.
    pub fn new(reconciler: Arc<ReactionReconciler>, capacity: usize) -> Self {
        Self {
            reconciler,
            capacity: capacity.max(1),
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Queue an event for its guild's worker, starting the worker if needed.
    #[instrument(skip(self, event), fields(guild_id = %event.guild_id))]
    pub async fn dispatch(&self, event: ReactionEvent) {
        let guild_id = event.guild_id;
        if !self.reconciler.watches(guild_id).await {
            debug!("No published selector, reaction dropped");
            return;
        }

        let tx = {
            let mut workers = self.workers.lock().await;
            let stale = workers
                .get(&guild_id)
                .is_some_and(|worker| worker.tx.is_closed());
            if stale {
                warn!("Reaction worker stopped, restarting");
                workers.remove(&guild_id);
            }
            workers
                .entry(guild_id)
                .or_insert_with(|| self.spawn_worker(guild_id))
                .tx
                .clone()
        };

        if tx.send(event).await.is_err() {
            error!("Reaction worker closed before accepting event");
        }
    }

    /// Number of guilds with a running worker.
    pub async fn active_workers(&self) -> usize {
        self.workers.lock().await.len()
    }

    /// Close every queue and wait for the workers to drain.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        let workers: Vec<_> = self.workers.lock().await.drain().collect();
        info!(count = workers.len(), "Stopping reaction workers");

        for (guild_id, worker) in workers {
            drop(worker.tx);
            if let Err(e) = worker.handle.await {
                error!(%guild_id, error = ?e, "Reaction worker panicked");
            }
        }
    }

    fn spawn_worker(&self, guild_id: GuildId) -> Worker {
        let (tx, rx) = mpsc::channel(self.capacity);
        let reconciler = self.reconciler.clone();
        let handle = tokio::spawn(run_worker(guild_id, reconciler, rx));
        debug!(%guild_id, "Started reaction worker");
        Worker { tx, handle }
    }
}

async fn run_worker(
    guild_id: GuildId,
    reconciler: Arc<ReactionReconciler>,
    mut rx: mpsc::Receiver<ReactionEvent>,
) {
    while let Some(event) = rx.recv().await {
        match reconciler.handle(&event).await {
            Ok(outcome) => debug!(%guild_id, ?outcome, "Reaction reconciled"),
            Err(e) => error!(%guild_id, error = %e, "Reaction handling failed"),
        }
    }
    debug!(%guild_id, "Reaction worker finished");
}
