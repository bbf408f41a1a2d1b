//! Shared state of one preview window.
//!
//! The poll thread, the timer ticker and the UI thread all go through
//! [`Session`]. Everything they share sits behind one lock; clipboard reads and
//! file writes happen outside of it.

use image::RgbaImage;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::bitmap::Bitmap;
use crate::clipboard::{Availability, ImageSource};
use crate::diff::differs;
use crate::preview::PreviewSurface;
use crate::save::{SaveController, SaveError, SavedFile};
use crate::selector::DateHourSelector;
use crate::status::Status;

type Notify = Box<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh was already running.
    Skipped,
    Unchanged,
    Changed { has_image: bool },
}

struct SessionState {
    status: Status,
    surface: PreviewSurface,
    /// Bumped on every timer reset; ticks from an older epoch are dropped.
    epoch: u64,
}

pub struct Session {
    state: Mutex<SessionState>,
    refreshing: AtomicBool,
    source: Arc<dyn ImageSource>,
    notify: Notify,
}

/// Clears the busy flag when the refresh ends, however it ends.
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(source: Arc<dyn ImageSource>, viewport: (u32, u32)) -> Self {
        Self::with_notify(source, viewport, Box::new(|| {}))
    }

    /// `notify` runs after every change the UI should repaint for.
    pub fn with_notify(source: Arc<dyn ImageSource>, viewport: (u32, u32), notify: Notify) -> Self {
        Self {
            state: Mutex::new(SessionState {
                status: Status::default(),
                surface: PreviewSurface::new(viewport.0, viewport.1),
                epoch: 0,
            }),
            refreshing: AtomicBool::new(false),
            source,
            notify,
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn source(&self) -> &Arc<dyn ImageSource> {
        &self.source
    }

    pub fn status(&self) -> Status {
        self.state().status.clone()
    }

    pub fn set_status(&self, status: Status) {
        self.state().status = status;
        (self.notify)();
    }

    pub fn availability(&self) -> Availability {
        Availability::of(self.state().surface.bitmap().map(Arc::as_ref))
    }

    pub fn has_image(&self) -> bool {
        self.availability() == Availability::Available
    }

    pub fn seconds(&self) -> u32 {
        self.state().surface.timer().seconds()
    }

    /// The current timer epoch, as handed to [`Session::tick`].
    pub fn epoch(&self) -> u64 {
        self.state().epoch
    }

    /// Samples the clipboard and swaps in the new image if it changed.
    /// Dropped when a refresh is already in flight.
    pub fn refresh(&self) -> RefreshOutcome {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("refresh already running, skipping");
            return RefreshOutcome::Skipped;
        }
        let _guard = RefreshGuard(&self.refreshing);

        let from = Instant::now();
        let sample = self.source.sample();
        let outcome = {
            let mut state = self.state();
            let outcome = if differs(state.surface.bitmap().map(Arc::as_ref), sample.as_ref()) {
                let has_image = sample.is_some();
                debug!("get clipboard time: {} ms", from.elapsed().as_millis());
                if let Some(bitmap) = &sample {
                    info!("new clipboard image {}x{}", bitmap.width(), bitmap.height());
                    state.epoch += 1;
                    state.surface.reset_timer();
                }
                state.surface.set_bitmap(sample.map(Arc::new));
                state.status = Status::not_saved();
                RefreshOutcome::Changed { has_image }
            } else {
                RefreshOutcome::Unchanged
            };
            if state.surface.bitmap().is_none() {
                state.status = Status::no_image();
            }
            state.surface.paint();
            outcome
        };
        (self.notify)();
        outcome
    }

    /// One second of the timer, counted only if no reset happened since
    /// `epoch` was read.
    pub fn tick(&self, epoch: u64) -> bool {
        {
            let mut state = self.state();
            if state.epoch != epoch {
                debug!("dropping tick from timer epoch {}", epoch);
                return false;
            }
            state.surface.tick();
        }
        (self.notify)();
        true
    }

    /// Zeroes the timer and starts a new epoch, which is returned.
    pub fn reset_timer(&self) -> u64 {
        let epoch = {
            let mut state = self.state();
            state.epoch += 1;
            state.surface.reset_timer();
            state.surface.paint();
            state.epoch
        };
        (self.notify)();
        epoch
    }

    /// Matches the framebuffer to the canvas size in pixels.
    pub fn resize(&self, width: u32, height: u32) {
        let mut state = self.state();
        if state.surface.resize(width, height) {
            state.surface.paint();
        }
    }

    /// The framebuffer, if it changed since `seen` generation.
    pub fn frame_since(&self, seen: Option<u64>) -> Option<(u64, RgbaImage)> {
        let mut state = self.state();
        state.surface.paint();
        let generation = state.surface.generation();
        if seen == Some(generation) {
            return None;
        }
        Some((generation, state.surface.frame().clone()))
    }

    /// The image currently previewed.
    pub fn preview(&self) -> Option<Arc<Bitmap>> {
        self.state().surface.bitmap().cloned()
    }

    /// Saves the current clipboard image and reports the outcome in the status.
    pub fn save(
        &self,
        saver: &SaveController,
        selector: &mut DateHourSelector,
    ) -> Result<Option<SavedFile>, SaveError> {
        match saver.save(self.source.as_ref(), selector) {
            Ok(Some(saved)) => {
                self.set_status(Status::saved(&saved.file_name));
                Ok(Some(saved))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                error!("{}", e);
                self.set_status(Status::save_failed(&e.reason(), e.file_name()));
                Err(e)
            }
        }
    }
}
