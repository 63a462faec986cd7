//! Core data types shared across the tray agent.
//!
//! These types form the contract between the poll loop and the host
//! presentation layer: a [`StatusSnapshot`] describes what watson reported,
//! a [`UiEvent`] tells the host what to render, and a [`SchedulerAction`]
//! carries menu clicks (and system notices) back into the scheduler.

use serde::{Deserialize, Serialize};

/// Tray button title shown while no frame is running.
const IDLE_TITLE: &str = "⏸ Watson";

/// A project/tags pair taken from `watson log --json` output.
///
/// Pairs are deduplicated by the (project, tags) combination, so the same
/// project can appear more than once with different tag sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    /// The watson project name.
    pub project: String,

    /// Tags recorded on the frame, in watson's order.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecentProject {
    /// Menu label for this pair: `project` alone, or `project [tag, tag]`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.tags.is_empty() {
            self.project.clone()
        } else {
            format!("{} [{}]", self.project, self.tags.join(", "))
        }
    }
}

/// The frame currently being tracked, as reported by `watson status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingStatus {
    /// Project name with any bracketed tag annotation stripped.
    pub project: String,

    /// Human-readable elapsed time (e.g. `2h`, `1h5m`, or `?` when the
    /// start timestamp could not be parsed).
    pub elapsed: String,
}

/// A point-in-time read of watson's tracking state.
///
/// `tracking` is `Some` iff a frame is running; project and elapsed label
/// exist only inside that variant, so the "defined only when tracking"
/// invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    /// The running frame, or `None` when watson reports nothing.
    pub tracking: Option<TrackingStatus>,

    /// Up to ten unique (project, tags) pairs, most recent first.
    pub recent: Vec<RecentProject>,
}

impl StatusSnapshot {
    /// Whether a frame is currently running.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }
}

/// Text and visual treatment for the tray button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUpdate {
    /// Title text for the tray button.
    pub text: String,

    /// Selects the "tracking" color treatment when true, "idle" otherwise.
    pub is_active: bool,
}

impl DisplayUpdate {
    /// Renders the tray title for a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        match &snapshot.tracking {
            Some(status) => Self {
                text: format!("⏱ {} ({})", status.project, status.elapsed),
                is_active: true,
            },
            None => Self {
                text: IDLE_TITLE.to_string(),
                is_active: false,
            },
        }
    }
}

/// Actions bound to menu entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Stop the running frame.
    StopTracking,

    /// Start tracking a (project, tags) pair from the recents list.
    StartProject {
        project: String,
        tags: Vec<String>,
    },

    /// Show today's report.
    ShowStats,

    /// Quit the agent.
    Quit,
}

/// One entry in the tray menu model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// An actionable (or informational) row.
    Item {
        label: String,
        /// Action to dispatch when clicked; `None` for informational rows.
        action: Option<MenuAction>,
        enabled: bool,
    },

    /// A visual separator.
    Separator,
}

impl MenuEntry {
    /// Creates an enabled, actionable entry.
    #[must_use]
    pub fn item(label: impl Into<String>, action: MenuAction) -> Self {
        Self::Item {
            label: label.into(),
            action: Some(action),
            enabled: true,
        }
    }

    /// Creates a disabled, informational entry.
    #[must_use]
    pub fn disabled(label: impl Into<String>) -> Self {
        Self::Item {
            label: label.into(),
            action: None,
            enabled: false,
        }
    }
}

/// A notification request emitted when the idle reminder fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
}

impl Reminder {
    /// The standard "you stopped tracking" nag.
    #[must_use]
    pub fn not_tracking() -> Self {
        Self {
            title: "Watson".to_string(),
            body: "You're not tracking any time right now!".to_string(),
        }
    }
}

/// Events delivered to the host presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Replace the tray button title.
    Display(DisplayUpdate),

    /// Replace the tray menu.
    Menu(Vec<MenuEntry>),

    /// Show a notification banner.
    Reminder(Reminder),

    /// Show today's report text.
    Stats(String),
}

/// Messages the host pushes into the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerAction {
    /// A menu entry was clicked.
    Menu(MenuAction),

    /// The machine is about to sleep; stop tracking if a frame is running.
    SystemWillSleep,
}
