//! Idle detection and reminder scheduling.
//!
//! [`IdleReminder`] is the one piece of mutable state in the agent. It is
//! fed a tracking flag on every status poll ([`IdleReminder::observe`])
//! and asked on every reminder tick whether a nag is due
//! ([`IdleReminder::check`]). The clock is always injected; nothing in
//! this module reads the system time, which keeps the transition rules
//! fully deterministic under test.
//!
//! # Transition rules
//!
//! - A tracking observation clears the idle clock.
//! - The idle clock is armed only on the tracking-to-idle edge; further
//!   idle observations never re-arm it.
//! - A reminder fires when the idle clock has run past the threshold, the
//!   user is present at the keyboard, and the cooldown since the previous
//!   reminder has elapsed. The idle clock is left running after a fire,
//!   so reminders repeat once per cooldown window during a long idle
//!   stretch.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Gate reporting whether the user has recently touched an input device.
///
/// Idle-from-tracking reminders are pointless when nobody is at the
/// machine, so the tracker consults this before nagging. Detection itself
/// is the host's problem; implementations must be cheap, they are polled
/// on every reminder tick.
pub trait ActivityProbe {
    /// True when the user has interacted with input devices recently.
    fn is_active(&self) -> bool;
}

/// Probe for hosts without an input-idle source; always reports presence.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysActive;

impl ActivityProbe for AlwaysActive {
    fn is_active(&self) -> bool {
        true
    }
}

/// Idle threshold and reminder cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    /// How long tracking must have been stopped before a reminder is due.
    pub idle_threshold: Duration,

    /// Minimum spacing between consecutive reminders.
    pub cooldown: Duration,
}

impl ReminderPolicy {
    /// Builds a policy from whole seconds.
    #[must_use]
    pub fn from_secs(idle_threshold: u64, cooldown: u64) -> Self {
        Self {
            idle_threshold: Duration::seconds(idle_threshold as i64),
            cooldown: Duration::seconds(cooldown as i64),
        }
    }
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self::from_secs(300, 300)
    }
}

/// The idle/reminder state machine.
///
/// Created empty at startup and owned by the scheduler task for the
/// process lifetime; nothing is persisted across restarts.
#[derive(Debug)]
pub struct IdleReminder {
    policy: ReminderPolicy,

    /// Tracking status as of the previous observation.
    last_tracking: bool,

    /// When tracking stopped; `None` while tracking or before the first
    /// tracking-to-idle edge.
    idle_since: Option<DateTime<Utc>>,

    /// When the previous reminder fired.
    last_fired: Option<DateTime<Utc>>,
}

impl IdleReminder {
    /// Creates an empty state machine.
    #[must_use]
    pub fn new(policy: ReminderPolicy) -> Self {
        Self {
            policy,
            last_tracking: false,
            idle_since: None,
            last_fired: None,
        }
    }

    /// Feeds one status observation into the state machine.
    ///
    /// Arms the idle clock exactly at the tracking-to-idle edge and clears
    /// it the moment tracking resumes.
    pub fn observe(&mut self, tracking: bool, now: DateTime<Utc>) {
        if tracking {
            self.idle_since = None;
            self.last_tracking = true;
            return;
        }

        if self.last_tracking && self.idle_since.is_none() {
            debug!(%now, "tracking stopped, idle clock armed");
            self.idle_since = Some(now);
        }
        self.last_tracking = false;
    }

    /// Returns whether a reminder is due, recording the fire time if so.
    ///
    /// Fires iff the idle clock is armed and past the threshold, the user
    /// is present (`system_active`), and the cooldown since the previous
    /// fire has elapsed.
    pub fn check(&mut self, system_active: bool, now: DateTime<Utc>) -> bool {
        if self.last_tracking {
            return false;
        }
        let Some(idle_since) = self.idle_since else {
            return false;
        };

        if now - idle_since < self.policy.idle_threshold {
            return false;
        }
        if !system_active {
            return false;
        }
        if let Some(last) = self.last_fired {
            if now - last < self.policy.cooldown {
                return false;
            }
        }

        self.last_fired = Some(now);
        true
    }

    /// Tracking status as of the previous observation.
    #[must_use]
    pub fn last_tracking(&self) -> bool {
        self.last_tracking
    }

    /// When tracking stopped, if the idle clock is armed.
    #[must_use]
    pub fn idle_since(&self) -> Option<DateTime<Utc>> {
        self.idle_since
    }
}
