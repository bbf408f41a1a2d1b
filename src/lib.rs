pub mod bitmap;
pub mod clipboard;
pub mod config;
pub mod diff;
pub mod preview;
pub mod save;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod status;
pub mod timer;
pub mod ui;
pub mod watcher;
