use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use log::info;
use saverabbit_rs::clipboard::SystemClipboard;
use saverabbit_rs::config::{Cli, Settings};
use saverabbit_rs::ui::SaveRabbitApp;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let settings = Settings::from(Cli::parse());
    info!(
        "saving {} images to {}",
        settings.kind,
        settings.directory.display()
    );

    // the window owns the main thread, so the scheduler gets its own runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("saverabbit-scheduler")
        .build()
        .context("failed to start the scheduler runtime")?;
    let handle = runtime.handle().clone();

    let title = settings.title();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size(settings.window_size),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            Box::new(SaveRabbitApp::new(
                cc,
                &settings,
                handle,
                Arc::new(SystemClipboard::new()),
            ))
        }),
    )
    .map_err(|e| anyhow!("failed to open the window: {}", e))?;

    runtime.shutdown_background();
    Ok(())
}
