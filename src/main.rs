// notehub: terminal client for the NoteHub notes API.
// Loads configuration, starts logging, and runs the TUI until the user quits.

mod app;
mod cache;
mod config;
mod debounce;
mod error;
mod logging;
mod notehub;
mod query;
mod state;
mod ui;
mod validation;

use std::process::ExitCode;

use log::{error, info};

use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::notehub::NoteHubClient;

#[tokio::main]
async fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("exiting: {}", e);
            eprintln!("notehub: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;

    let log_dir = logging::cache_dir().unwrap_or_else(std::env::temp_dir);
    let log_path = logging::init(&log_dir)?;
    info!(
        "notehub {} starting, api={}, log={}",
        env!("CARGO_PKG_VERSION"),
        config.api_url,
        log_path.display()
    );

    let client = NoteHubClient::new(&config)?;
    let mut app = App::new(client, &config);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    info!("notehub exiting");
    Ok(result?)
}
