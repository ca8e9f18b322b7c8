// SPDX-License-Identifier: MPL-2.0
//! Engine thread spawning and task dispatch.
//!
//! The engine runs on a dedicated OS thread driving a current-thread Tokio
//! runtime. Its loop multiplexes three sources:
//!
//! - tasks posted by the presentation side
//! - events raised by the native player through its [`EngineEventSink`]
//! - the position polling timer
//!
//! Tasks and player events share one queue, so they are handled in the order
//! they were sent.

use super::cache::SharedPositionCache;
use super::notification::Notification;
use super::worker::EngineWorker;
use crate::application::port::{EngineEventSink, MediaPlayer, PlayerEvent};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Unit of work executed on the engine thread.
pub type EngineTask = Box<dyn FnOnce(&mut EngineWorker) + Send>;

/// Messages accepted by the engine loop.
pub(crate) enum EngineMessage {
    Task(EngineTask),
    Event(PlayerEvent),
    Shutdown,
}

/// Engine thread parameters.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub thread_name: String,
    pub poll_interval: Duration,
    /// Fail construction when the player has no seeking capability.
    pub require_seeking: bool,
}

/// Presentation-side handle to the engine thread.
///
/// Posting never blocks. Once shutdown has begun every post is skipped.
pub struct EngineDispatcher {
    tx: mpsc::UnboundedSender<EngineMessage>,
    shutting_down: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EngineDispatcher {
    /// Spawns the engine thread and creates the player on it.
    ///
    /// Returns once the factory has run, so a failed construction is
    /// reported synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineConstruction`] if the thread cannot be spawned,
    /// the factory yields no player, or seeking is required but unsupported.
    pub(crate) fn spawn<F>(
        factory: F,
        options: EngineOptions,
        cache: SharedPositionCache,
        notify: mpsc::UnboundedSender<Notification>,
    ) -> Result<Self>
    where
        F: FnOnce() -> Option<Box<dyn MediaPlayer>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutting_down = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = std_mpsc::sync_channel::<Result<()>>(1);

        let sink_tx = tx.clone();
        let sink = EngineEventSink::new(move |event| sink_tx.send(EngineMessage::Event(event)).is_ok());
        let thread_flag = Arc::clone(&shutting_down);
        let EngineOptions {
            thread_name,
            poll_interval,
            require_seeking,
        } = options;

        let thread = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let span = tracing::debug_span!("engine", thread = %thread_name);
                let _entered = span.enter();

                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        let _ = ready_tx.send(Err(Error::EngineConstruction(err.to_string())));
                        return;
                    }
                };

                let Some(mut player) = factory() else {
                    let _ = ready_tx.send(Err(Error::EngineConstruction(
                        "player factory returned no instance".into(),
                    )));
                    return;
                };
                if require_seeking && player.seeking().is_none() {
                    let _ = ready_tx.send(Err(Error::EngineConstruction(
                        "player has no seeking capability".into(),
                    )));
                    return;
                }
                player.attach(sink);

                let worker = EngineWorker::new(player, cache, notify, require_seeking);
                if ready_tx.send(Ok(())).is_err() {
                    return;
                }
                tracing::debug!("engine thread started");
                runtime.block_on(run(worker, rx, poll_interval));
                thread_flag.store(true, Ordering::SeqCst);
                tracing::debug!("engine thread exited");
            })
            .map_err(|err| Error::EngineConstruction(err.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                shutting_down,
                thread: Some(thread),
            }),
            Ok(Err(err)) => {
                let _ = thread.join();
                Err(err)
            }
            Err(_) => {
                let _ = thread.join();
                Err(Error::EngineConstruction(
                    "engine thread terminated during construction".into(),
                ))
            }
        }
    }

    /// Queues `task` for the engine thread.
    ///
    /// Returns `false` (and drops the task) once shutdown has begun.
    pub fn post(&self, task: impl FnOnce(&mut EngineWorker) + Send + 'static) -> bool {
        if self.is_shutting_down() {
            tracing::debug!("engine shutting down, task skipped");
            return false;
        }
        if self.tx.send(EngineMessage::Task(Box::new(task))).is_err() {
            tracing::debug!("engine thread gone, task skipped");
            return false;
        }
        true
    }

    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Stops accepting work and asks the engine loop to exit.
    ///
    /// Work already queued still runs; the loop exits when it reaches the
    /// shutdown marker.
    pub fn begin_shutdown(&self) {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("engine shutdown requested");
        let _ = self.tx.send(EngineMessage::Shutdown);
    }

    /// Begins shutdown and waits for the engine thread to exit.
    pub fn shutdown(&mut self) {
        self.begin_shutdown();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("engine thread panicked");
            }
        }
    }
}

impl Drop for EngineDispatcher {
    fn drop(&mut self) {
        self.begin_shutdown();
    }
}

async fn run(
    mut worker: EngineWorker,
    mut rx: mpsc::UnboundedReceiver<EngineMessage>,
    poll_interval: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            message = rx.recv() => match message {
                Some(EngineMessage::Task(task)) => task(&mut worker),
                Some(EngineMessage::Event(event)) => worker.handle_event(event),
                Some(EngineMessage::Shutdown) | None => break,
            },
            _ = ticker.tick() => worker.poll_position(),
        }
    }
    worker.teardown();
}
