//! Poll loop driving the tray.
//!
//! The scheduler multiplexes everything that can touch shared state onto
//! one task: the status poll (default every 5 s), the reminder check
//! (default every 30 s), and host actions (menu clicks, sleep notices).
//! Because a `tokio::select!` loop runs one branch to completion before
//! taking the next, no two ticks can ever interleave mid-update and the
//! [`IdleReminder`] state needs no lock.
//!
//! The reminder ticker is deliberately independent of the status poll:
//! it re-evaluates the last known tracking state without invoking watson,
//! so idle detection stays responsive even when a status poll is slow or
//! skipped. A slow poll simply means the next completed poll's snapshot
//! overwrites the display.
//!
//! The wall clock is injected through the [`Clock`] trait so the tick
//! logic can be driven deterministically under test.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, TrayError};
use crate::menu::build_menu;
use crate::parser;
use crate::reminder::{ActivityProbe, IdleReminder};
use crate::types::{
    DisplayUpdate, MenuAction, Reminder, SchedulerAction, StatusSnapshot, UiEvent,
};
use crate::watson::TrackerCli;

/// Wall-clock source for the scheduler.
pub trait Clock {
    /// Current instant, UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant in the local timezone (used for status parsing).
    fn now_local(&self) -> DateTime<Local>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// The tray's poll loop and single owner of all mutable state.
pub struct Scheduler<C, P, K> {
    poll_interval: Duration,
    reminder_interval: Duration,
    cli: C,
    probe: P,
    clock: K,
    reminder: IdleReminder,
    ui_tx: mpsc::Sender<UiEvent>,

    /// Last completed snapshot; reminder ticks and sleep handling read
    /// this instead of querying watson again.
    snapshot: StatusSnapshot,
}

impl<C, P, K> Scheduler<C, P, K>
where
    C: TrackerCli,
    P: ActivityProbe,
    K: Clock,
{
    /// Creates a scheduler that publishes UI events to `ui_tx`.
    pub fn new(config: &Config, cli: C, probe: P, clock: K, ui_tx: mpsc::Sender<UiEvent>) -> Self {
        Self {
            poll_interval: config.poll_interval,
            reminder_interval: config.reminder_interval,
            cli,
            probe,
            clock,
            reminder: IdleReminder::new(config.reminder_policy),
            ui_tx,
            snapshot: StatusSnapshot::default(),
        }
    }

    /// Runs the poll loop until `shutdown` completes or a Quit action
    /// arrives.
    ///
    /// # Errors
    ///
    /// Returns [`TrayError::ChannelClosed`] when the presentation side of
    /// the UI channel has gone away; every other failure mode is absorbed
    /// at the invoker/parser boundary.
    pub async fn run(
        mut self,
        mut actions: mpsc::Receiver<SchedulerAction>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        let mut status_ticks = time::interval(self.poll_interval);
        status_ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut reminder_ticks = time::interval(self.reminder_interval);
        reminder_ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut actions_open = true;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }

                _ = status_ticks.tick() => {
                    self.poll_status().await?;
                }

                _ = reminder_ticks.tick() => {
                    self.fire_reminder_if_due().await?;
                }

                action = actions.recv(), if actions_open => {
                    match action {
                        Some(action) => {
                            if self.handle_action(action).await? {
                                break;
                            }
                        }
                        // The host dropped its action sender; keep polling.
                        None => actions_open = false,
                    }
                }
            }
        }

        Ok(())
    }

    /// One status tick: query watson, publish the snapshot, advance the
    /// reminder state machine.
    async fn poll_status(&mut self) -> Result<()> {
        let status_raw = self.cli.status().await;
        let log_raw = self.cli.log_json().await;

        let snapshot = parser::parse_snapshot(&status_raw, &log_raw, self.clock.now_local());
        self.publish_snapshot(&snapshot).await?;

        self.reminder.observe(snapshot.is_tracking(), self.clock.now());
        self.snapshot = snapshot;

        self.fire_reminder_if_due().await
    }

    /// Publishes display and menu updates for a snapshot.
    async fn publish_snapshot(&self, snapshot: &StatusSnapshot) -> Result<()> {
        self.send(UiEvent::Display(DisplayUpdate::from_snapshot(snapshot)))
            .await?;
        self.send(UiEvent::Menu(build_menu(snapshot))).await
    }

    /// Emits a reminder when the idle state machine says one is due.
    async fn fire_reminder_if_due(&mut self) -> Result<()> {
        let due = self.reminder.check(self.probe.is_active(), self.clock.now());
        if due {
            info!("idle reminder fired");
            self.send(UiEvent::Reminder(Reminder::not_tracking())).await?;
        }
        Ok(())
    }

    /// Dispatches one host action. Returns `true` when the agent should
    /// quit.
    async fn handle_action(&mut self, action: SchedulerAction) -> Result<bool> {
        match action {
            SchedulerAction::Menu(MenuAction::StopTracking) => {
                debug!("stop tracking requested");
                self.cli.stop().await;
                self.poll_status().await?;
            }

            SchedulerAction::Menu(MenuAction::StartProject { project, tags }) => {
                debug!(%project, ?tags, "start tracking requested");
                self.cli.start(&project, &tags).await;
                self.poll_status().await?;
            }

            SchedulerAction::Menu(MenuAction::ShowStats) => {
                let report = self.cli.report_day().await;
                self.send(UiEvent::Stats(report)).await?;
            }

            SchedulerAction::Menu(MenuAction::Quit) => {
                info!("quit requested");
                return Ok(true);
            }

            SchedulerAction::SystemWillSleep => {
                if self.snapshot.is_tracking() {
                    info!("system going to sleep, stopping tracking");
                    self.cli.stop().await;
                    self.poll_status().await?;
                }
            }
        }
        Ok(false)
    }

    async fn send(&self, event: UiEvent) -> Result<()> {
        self.ui_tx
            .send(event)
            .await
            .map_err(|_| TrayError::ChannelClosed)
    }
}
