//! Drives a [`Session`] on a tokio runtime: a ticker for the timer and a
//! poller for the clipboard.
//!
//! The ticker is replaced, never shared. Resetting the timer aborts the old
//! task before zeroing the session and spawning a new one, so the next tick
//! lands a full period later. A tick the old task was already delivering
//! carries a stale epoch and is dropped by the session.

use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::session::{RefreshOutcome, Session};

pub struct Scheduler {
    runtime: Handle,
    session: Arc<Session>,
    tick_interval: Duration,
    poll_interval: Duration,
    ticker: Mutex<Option<JoinHandle<()>>>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Scheduler {
    pub fn new(
        runtime: Handle,
        session: Arc<Session>,
        tick_interval: Duration,
        poll_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            runtime,
            session,
            tick_interval,
            poll_interval,
            ticker: Mutex::new(None),
            poller: Mutex::new(None),
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn start(self: &Arc<Self>) {
        self.reset_timer();
        self.rearm_polling();
    }

    pub fn reset_timer(&self) {
        let mut slot = lock(&self.ticker);
        if let Some(old) = slot.take() {
            old.abort();
        }
        let epoch = self.session.reset_timer();
        let session = self.session.clone();
        let period = self.tick_interval;
        *slot = Some(self.runtime.spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if !session.tick(epoch) {
                    break;
                }
            }
        }));
        debug!("timer restarted at epoch {}", epoch);
    }

    /// Refreshes right away and restarts the poll cadence from now.
    pub fn rearm_polling(self: &Arc<Self>) {
        let mut slot = lock(&self.poller);
        if let Some(old) = slot.take() {
            old.abort();
        }
        let this = Arc::downgrade(self);
        let period = self.poll_interval;
        *slot = Some(self.runtime.spawn(async move {
            let mut polls = time::interval(period);
            loop {
                polls.tick().await;
                let Some(scheduler) = this.upgrade() else {
                    break;
                };
                scheduler.refresh_now().await;
            }
        }));
        debug!("polling rearmed");
    }

    /// Refreshes in the background.
    pub fn request_refresh(self: &Arc<Self>) {
        let this = self.clone();
        self.runtime.spawn(async move {
            this.refresh_now().await;
        });
    }

    /// The clipboard changed: resample, and restart the timer if it holds an image.
    pub fn clipboard_changed(self: &Arc<Self>) {
        let this = self.clone();
        self.runtime.spawn(async move {
            let outcome = this.refresh_now().await;
            if outcome != (RefreshOutcome::Changed { has_image: true }) && this.session.has_image() {
                this.reset_timer();
            }
        });
    }

    pub async fn refresh_now(&self) -> RefreshOutcome {
        let session = self.session.clone();
        match tokio::task::spawn_blocking(move || session.refresh()).await {
            Ok(outcome) => {
                if outcome == (RefreshOutcome::Changed { has_image: true }) {
                    self.reset_timer();
                }
                outcome
            }
            Err(e) => {
                warn!("clipboard refresh did not finish: {}", e);
                RefreshOutcome::Skipped
            }
        }
    }

    pub fn shutdown(&self) {
        for slot in [&self.ticker, &self.poller] {
            if let Some(task) = lock(slot).take() {
                task.abort();
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
