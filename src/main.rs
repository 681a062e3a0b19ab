#![deny(unsafe_code)]

mod app;
mod clipboard;
mod color;
mod config;
mod constants;
mod hotkeys;
mod icon;
mod startup;
mod tray;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use tracing::Level as TraceLevel;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::app::AppContext;
use crate::config::Config;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(TraceLevel::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = Config::load()?;
    let app = Arc::new(AppContext::new(config));

    hotkeys::start(app.clone())?;
    info!(
        hotkeys = hotkeys::HOTKEY_TABLE.len(),
        "Global hotkeys registered"
    );

    // The tray owns the main thread until quit
    tray::run(app)
}
