//! Parsers for watson's command-line output.
//!
//! watson has no machine-readable status interface, so the tray scrapes the
//! human-readable `watson status` line and decodes `watson log --json`.
//! Both parsers absorb every failure mode: output that does not match the
//! expected shape (including error text from a missing or broken binary)
//! degrades to "not tracking" / "no recent projects" rather than surfacing
//! an error, because the tray must keep running regardless of what the
//! external tool prints.
//!
//! # Status dialects
//!
//! watson's status phrasing has two observed dialects:
//!
//! - `Project demo [work personal] started 2h ago`: a relative phrase;
//!   the text before ` ago` is used verbatim as the elapsed label.
//! - `Project demo started at 2025.01.01 10:00:00`: an embedded start
//!   timestamp; the elapsed label is computed against the supplied clock
//!   and rendered as `<H>h<M>m` (or `<M>m` under an hour).
//!
//! One rule covers both: the ` ago` form wins when present, the timestamp
//! form is the fallback, and an unparseable phrase yields `?` while still
//! reporting the frame as active.

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::debug;

use crate::types::{RecentProject, StatusSnapshot, TrackingStatus};

/// Literal prefix of a tracking status line.
const TRACKING_PREFIX: &str = "Project ";

/// Marker separating the project name from the start phrase.
const STARTED_MARKER: &str = " started ";

/// Marker terminating a relative elapsed phrase.
const AGO_MARKER: &str = " ago";

/// Format of an embedded start timestamp.
const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Byte length of a timestamp matching [`TIMESTAMP_FORMAT`].
const TIMESTAMP_LEN: usize = 19;

/// Maximum number of unique (project, tags) pairs kept from the log.
const RECENT_LIMIT: usize = 10;

/// Parses `watson status` output into the running frame, if any.
///
/// Returns `None` for anything that does not look like a tracking line:
/// empty output, error text, or a line missing the ` started ` marker.
/// A single trailing bracketed tag annotation is stripped from the
/// project name.
///
/// `now` is the wall-clock reference used when the status line embeds a
/// start timestamp instead of a relative phrase.
#[must_use]
pub fn parse_status(raw: &str, now: DateTime<Local>) -> Option<TrackingStatus> {
    let text = raw.trim();
    let rest = text.strip_prefix(TRACKING_PREFIX)?;
    let (name, phrase) = rest.split_once(STARTED_MARKER)?;

    Some(TrackingStatus {
        project: strip_tag_suffix(name).to_string(),
        elapsed: elapsed_label(phrase, now),
    })
}

/// Strips a trailing ` [...]` tag annotation from a project name.
fn strip_tag_suffix(name: &str) -> &str {
    if name.ends_with(']') {
        if let Some(idx) = name.find(" [") {
            return &name[..idx];
        }
    }
    name
}

/// Derives the elapsed label from the start phrase.
fn elapsed_label(phrase: &str, now: DateTime<Local>) -> String {
    if let Some(idx) = phrase.find(AGO_MARKER) {
        return phrase[..idx].to_string();
    }

    if let Some(started) = embedded_start_time(phrase) {
        let secs = (now.naive_local() - started).num_seconds().max(0);
        return format_elapsed(secs);
    }

    debug!(phrase, "could not derive elapsed time from status phrase");
    "?".to_string()
}

/// Scans a phrase for an embedded `YYYY.MM.DD HH:MM:SS` timestamp.
fn embedded_start_time(phrase: &str) -> Option<NaiveDateTime> {
    let bytes = phrase.as_bytes();
    if bytes.len() < TIMESTAMP_LEN {
        return None;
    }

    for i in 0..=bytes.len() - TIMESTAMP_LEN {
        if !bytes[i].is_ascii_digit() {
            continue;
        }
        let Some(window) = phrase.get(i..i + TIMESTAMP_LEN) else {
            continue;
        };
        if let Ok(started) = NaiveDateTime::parse_from_str(window, TIMESTAMP_FORMAT) {
            return Some(started);
        }
    }
    None
}

/// Formats whole seconds as `<H>h<M>m`, or `<M>m` under an hour.
fn format_elapsed(secs: i64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h{minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Parses `watson log --json` output into the recent-projects list.
///
/// Entries are read in input order, entries without a `project` field are
/// skipped, missing `tags` count as empty, and pairs are deduplicated by
/// the (project, tags) combination until [`RECENT_LIMIT`] unique pairs
/// have been collected. Malformed JSON yields an empty list.
#[must_use]
pub fn parse_log(raw: &str) -> Vec<RecentProject> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(error = %e, "watson log output is not a JSON array");
            return Vec::new();
        }
    };

    let mut seen = std::collections::HashSet::new();
    let mut recent = Vec::new();

    for entry in entries {
        let Some(project) = entry.get("project").and_then(|p| p.as_str()) else {
            continue;
        };
        let tags: Vec<String> = entry
            .get("tags")
            .and_then(|t| t.as_array())
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        let key = format!("{}|{}", project, tags.join(","));
        if seen.insert(key) {
            recent.push(RecentProject {
                project: project.to_string(),
                tags,
            });
            if recent.len() >= RECENT_LIMIT {
                break;
            }
        }
    }

    recent
}

/// Combines both parses into a full snapshot.
#[must_use]
pub fn parse_snapshot(status_raw: &str, log_raw: &str, now: DateTime<Local>) -> StatusSnapshot {
    StatusSnapshot {
        tracking: parse_status(status_raw, now),
        recent: parse_log(log_raw),
    }
}
