//! Tray menu model.
//!
//! Builds the ordered list of menu entries for a snapshot. Rendering is
//! the host's job; this module only decides what the menu contains and
//! which [`MenuAction`] each entry dispatches.

use crate::types::{MenuAction, MenuEntry, StatusSnapshot};

/// Builds the tray menu for a snapshot.
///
/// Layout: stop-tracking toggle (a disabled "Not tracking" row when no
/// frame is running), the recent-projects quick-start list when there is
/// one, the stats view, and quit, separated into groups.
#[must_use]
pub fn build_menu(snapshot: &StatusSnapshot) -> Vec<MenuEntry> {
    let mut menu = Vec::new();

    if snapshot.is_tracking() {
        menu.push(MenuEntry::item("Stop Tracking", MenuAction::StopTracking));
    } else {
        menu.push(MenuEntry::disabled("Not tracking"));
    }
    menu.push(MenuEntry::Separator);

    if !snapshot.recent.is_empty() {
        for entry in &snapshot.recent {
            menu.push(MenuEntry::item(
                entry.label(),
                MenuAction::StartProject {
                    project: entry.project.clone(),
                    tags: entry.tags.clone(),
                },
            ));
        }
        menu.push(MenuEntry::Separator);
    }

    menu.push(MenuEntry::item("Today's Stats", MenuAction::ShowStats));
    menu.push(MenuEntry::Separator);
    menu.push(MenuEntry::item("Quit", MenuAction::Quit));

    menu
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RecentProject, TrackingStatus};

    fn labels(menu: &[MenuEntry]) -> Vec<String> {
        menu.iter()
            .map(|entry| match entry {
                MenuEntry::Item { label, .. } => label.clone(),
                MenuEntry::Separator => "---".to_string(),
            })
            .collect()
    }

    #[test]
    fn tracking_menu_offers_stop() {
        let snapshot = StatusSnapshot {
            tracking: Some(TrackingStatus {
                project: "demo".to_string(),
                elapsed: "2h".to_string(),
            }),
            recent: Vec::new(),
        };

        let menu = build_menu(&snapshot);
        assert_eq!(
            labels(&menu),
            vec!["Stop Tracking", "---", "Today's Stats", "---", "Quit"]
        );
        assert!(matches!(
            &menu[0],
            MenuEntry::Item { action: Some(MenuAction::StopTracking), enabled: true, .. }
        ));
    }

    #[test]
    fn idle_menu_shows_disabled_placeholder() {
        let menu = build_menu(&StatusSnapshot::default());
        assert!(matches!(
            &menu[0],
            MenuEntry::Item { action: None, enabled: false, .. }
        ));
    }

    #[test]
    fn recent_projects_become_start_entries() {
        let snapshot = StatusSnapshot {
            tracking: None,
            recent: vec![
                RecentProject {
                    project: "demo".to_string(),
                    tags: vec!["work".to_string()],
                },
                RecentProject {
                    project: "other".to_string(),
                    tags: Vec::new(),
                },
            ],
        };

        let menu = build_menu(&snapshot);
        assert_eq!(
            labels(&menu),
            vec![
                "Not tracking",
                "---",
                "demo [work]",
                "other",
                "---",
                "Today's Stats",
                "---",
                "Quit"
            ]
        );
        assert!(matches!(
            &menu[2],
            MenuEntry::Item {
                action: Some(MenuAction::StartProject { project, tags }),
                ..
            } if project == "demo" && tags == &vec!["work".to_string()]
        ));
    }

    #[test]
    fn empty_recents_omit_quick_start_section() {
        let menu = build_menu(&StatusSnapshot::default());
        assert_eq!(menu.len(), 5);
    }
}
