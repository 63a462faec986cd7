//! watson-tray - menu bar status agent for the watson time tracker.
//!
//! This crate polls the [watson](https://tailordev.github.io/Watson/)
//! command-line tool on fixed intervals, parses its status and log
//! output into snapshots, and drives a host presentation layer (the
//! actual tray icon, menu, and notification banners) through a channel
//! of [`types::UiEvent`]s. When tracking stops and the user stays at the
//! keyboard, an idle reminder nags them to start a new frame.
//!
//! # Architecture
//!
//! All mutable state lives in a single scheduler task; the only awaited
//! operations are the interval timers and the watson subprocess calls.
//! External failures (missing binary, malformed output) degrade to a
//! "not tracking" snapshot and never stop the loop.
//!
//! # Modules
//!
//! - [`types`]: snapshot, menu, and UI event data model
//! - [`parser`]: watson status text and log JSON parsing
//! - [`reminder`]: idle detection and reminder cooldown state machine
//! - [`watson`]: subprocess invocation of the watson binary
//! - [`menu`]: tray menu model builder
//! - [`scheduler`]: the poll loop tying it all together
//! - [`config`]: configuration from environment variables
//! - [`error`]: error types for tray operations

pub mod config;
pub mod error;
pub mod menu;
pub mod parser;
pub mod reminder;
pub mod scheduler;
pub mod types;
pub mod watson;

pub use config::Config;
pub use error::{Result, TrayError};
pub use menu::build_menu;
pub use reminder::{ActivityProbe, AlwaysActive, IdleReminder, ReminderPolicy};
pub use scheduler::{Clock, Scheduler, SystemClock};
pub use types::{
    DisplayUpdate, MenuAction, MenuEntry, RecentProject, Reminder, SchedulerAction,
    StatusSnapshot, TrackingStatus, UiEvent,
};
pub use watson::{default_watson_bin, start_args, TrackerCli, WatsonCli};
