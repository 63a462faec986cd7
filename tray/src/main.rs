//! watson-tray - menu bar status agent for the watson time tracker.
//!
//! This binary runs the poll loop and logs the resulting UI events; a
//! host presentation layer (tray icon, menu, notification banners)
//! consumes the same event stream when embedded.
//!
//! # Commands
//!
//! - `watson-tray run`: Start the tray agent
//! - `watson-tray status`: Query watson once and print the parsed snapshot
//!
//! # Environment Variables
//!
//! See the [`config`] module for available configuration options.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use watson_tray::config::Config;
use watson_tray::parser;
use watson_tray::reminder::AlwaysActive;
use watson_tray::scheduler::{Scheduler, SystemClock};
use watson_tray::types::{SchedulerAction, UiEvent};
use watson_tray::watson::{TrackerCli, WatsonCli};

/// Capacity of the UI event channel.
const UI_CHANNEL_CAPACITY: usize = 64;

/// Capacity of the host action channel.
const ACTION_CHANNEL_CAPACITY: usize = 8;

/// watson-tray - menu bar status agent for the watson time tracker.
///
/// Polls watson on fixed intervals, reflects tracking state in the tray,
/// and reminds you when you forget to start a frame.
#[derive(Parser, Debug)]
#[command(name = "watson-tray")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    WATSON_TRAY_WATSON_BIN               Path to the watson binary (default: autodetected)
    WATSON_TRAY_POLL_INTERVAL_SECS       Seconds between status polls (default: 5)
    WATSON_TRAY_REMINDER_INTERVAL_SECS   Seconds between reminder checks (default: 30)
    WATSON_TRAY_IDLE_THRESHOLD_SECS      Idle time before a reminder is due (default: 300)
    WATSON_TRAY_COOLDOWN_SECS            Minimum spacing between reminders (default: 300)

EXAMPLES:
    # Start the agent
    watson-tray run

    # One-shot status check
    watson-tray status
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the tray agent.
    ///
    /// Polls watson status and log output, publishes display/menu/reminder
    /// events, and keeps running until interrupted.
    Run,

    /// Query watson once and print the parsed snapshot.
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    match cli.command {
        Command::Run => runtime.block_on(run_agent()),
        Command::Status => runtime.block_on(print_status()),
    }
}

/// Runs the tray agent until a shutdown signal arrives.
async fn run_agent() -> Result<()> {
    init_logging();

    info!("Starting watson-tray");

    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        watson_bin = %config.watson_bin.display(),
        poll_interval_secs = config.poll_interval.as_secs(),
        reminder_interval_secs = config.reminder_interval.as_secs(),
        "Configuration loaded"
    );

    let (ui_tx, mut ui_rx) = mpsc::channel::<UiEvent>(UI_CHANNEL_CAPACITY);

    // A host presentation layer holds the sender half of this channel and
    // feeds menu clicks and sleep notices back into the scheduler. The
    // standalone binary has no UI, so the sender stays idle here.
    let (_actions_tx, actions_rx) = mpsc::channel::<SchedulerAction>(ACTION_CHANNEL_CAPACITY);

    let watson = WatsonCli::new(config.watson_bin.clone());
    let scheduler = Scheduler::new(&config, watson, AlwaysActive, SystemClock, ui_tx);

    let presenter = tokio::spawn(async move {
        while let Some(event) = ui_rx.recv().await {
            present(event);
        }
    });

    info!("Agent running. Press Ctrl+C to stop.");

    let result = scheduler.run(actions_rx, wait_for_shutdown()).await;

    // The scheduler owned the UI sender, so the presenter drains and ends.
    presenter.await.context("Presenter task panicked")?;

    info!("watson-tray stopped");
    result.map_err(Into::into)
}

/// Queries watson once and prints the parsed snapshot to stdout.
async fn print_status() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let watson = WatsonCli::new(config.watson_bin.clone());

    let status_raw = watson.status().await;
    let log_raw = watson.log_json().await;
    let snapshot = parser::parse_snapshot(&status_raw, &log_raw, chrono::Local::now());

    match &snapshot.tracking {
        Some(status) => println!("Tracking {} ({})", status.project, status.elapsed),
        None => println!("Not tracking"),
    }

    if !snapshot.recent.is_empty() {
        println!();
        println!("Recent projects:");
        for entry in &snapshot.recent {
            println!("  {}", entry.label());
        }
    }

    Ok(())
}

/// Logs a UI event in place of a real presentation layer.
fn present(event: UiEvent) {
    match event {
        UiEvent::Display(update) => {
            info!(text = %update.text, is_active = update.is_active, "display update");
        }
        UiEvent::Menu(entries) => {
            debug!(entries = entries.len(), "menu rebuilt");
        }
        UiEvent::Reminder(reminder) => {
            info!(title = %reminder.title, body = %reminder.body, "reminder");
        }
        UiEvent::Stats(report) => {
            info!(%report, "today's stats");
        }
    }
}

/// Initializes the logging subsystem.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
