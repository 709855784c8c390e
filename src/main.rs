//! Pomobar status - a Pomodoro timer for status bars like Waybar.
//!
//! Every invocation loads the saved timer, lets the time that passed since
//! the last invocation run off, applies at most one command, saves, and
//! prints one JSON status line for the bar.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod app;
mod models;
mod notifications;
mod persistence;
mod timer;

use app::{Action, App};
use persistence::{LoadOutcome, StateStore};

#[derive(Parser)]
#[command(name = "pomobar-status")]
#[command(about = "Pomodoro Timer for Waybar", long_about = None)]
struct Cli {
    /// Action to perform
    #[arg(value_enum, default_value_t = Action::Status)]
    action: Action,

    /// State file to use instead of the per-user default
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Settings file to use instead of the per-user default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// True when `DEBUG` is set to 1/true; also silences notifications.
fn debug_env() -> bool {
    std::env::var("DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pomobar_status={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let debug_mode = debug_env();
    init_tracing(cli.verbose || debug_mode);

    let settings = match cli.config.or_else(persistence::default_config_path) {
        Some(path) => persistence::load_settings(&path),
        None => Default::default(),
    };

    let store = match cli.state_file {
        Some(path) => StateStore::new(path),
        None => StateStore::open_default(),
    };
    debug!(path = %store.path().display(), action = ?cli.action, "loading state");

    let outcome = store.load();
    if let LoadOutcome::Fresh { reason, .. } = &outcome {
        debug!(?reason, "using fresh state");
    }

    let now = Utc::now();
    let mut app = App::new(outcome.into_record(), settings);
    if let Some(event) = app.advance(now) {
        if app.settings.notifications_enabled && !debug_mode {
            notifications::notify(event);
        }
    }
    app.apply(cli.action);
    debug!(record = ?app.record, "state after action");

    let observed_at = app.accounted_until(now);
    store
        .save(&mut app.record, observed_at)
        .with_context(|| format!("Failed to save state to {}", store.path().display()))?;

    let output = timer::render(&app.record)
        .to_json()
        .context("Failed to encode status")?;
    println!("{}", output);

    Ok(())
}
