use clipboard_rs::{ClipboardHandler, ClipboardWatcher, ClipboardWatcherContext, WatcherShutdown};
use log::{debug, info};
use std::io;
use std::sync::{Arc, Weak};
use thiserror::Error;

use crate::scheduler::Scheduler;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("clipboard change notifications unavailable: {0}")]
    Unavailable(String),
    #[error("failed to spawn clipboard watcher thread: {0}")]
    Thread(#[from] io::Error),
}

struct ChangeHandler {
    scheduler: Weak<Scheduler>,
}

impl ClipboardHandler for ChangeHandler {
    fn on_clipboard_change(&mut self) {
        if let Some(scheduler) = self.scheduler.upgrade() {
            debug!("clipboard changed");
            scheduler.clipboard_changed();
        }
    }
}

/// Forwards OS clipboard-change notifications to a [`Scheduler`] until dropped.
pub struct ClipboardWatch {
    shutdown: Option<WatcherShutdown>,
}

impl ClipboardWatch {
    pub fn start(scheduler: &Arc<Scheduler>) -> Result<Self, WatchError> {
        let mut watcher =
            ClipboardWatcherContext::new().map_err(|e| WatchError::Unavailable(e.to_string()))?;
        watcher.add_handler(ChangeHandler {
            scheduler: Arc::downgrade(scheduler),
        });
        let shutdown = watcher.get_shutdown_channel();

        std::thread::Builder::new()
            .name("clipboard-watcher".into())
            .spawn(move || {
                info!("clipboard watcher started");
                watcher.start_watch();
                info!("clipboard watcher stopped");
            })?;

        Ok(Self {
            shutdown: Some(shutdown),
        })
    }
}

impl Drop for ClipboardWatch {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.stop();
        }
    }
}
