//! Invocation of the external watson command-line tool.
//!
//! Every interaction with watson is a short-lived subprocess whose stdout
//! is captured and handed to [`crate::parser`]. Failures never propagate:
//! a missing binary, a spawn error, or a non-zero exit all degrade to
//! empty output, which the parser reads as "not tracking". The tray keeps
//! polling and recovers on its own once watson is back.
//!
//! The [`TrackerCli`] trait is the seam between the scheduler and the
//! real tool, so tests can substitute a scripted implementation.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

/// Well-known Homebrew install locations, probed in order.
const WATSON_CANDIDATES: &[&str] = &["/opt/homebrew/bin/watson", "/usr/local/bin/watson"];

/// Returns the watson binary to use when none is configured.
///
/// Probes the usual Homebrew locations and falls back to `watson` on
/// `PATH`.
#[must_use]
pub fn default_watson_bin() -> PathBuf {
    for candidate in WATSON_CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            return path.to_path_buf();
        }
    }
    PathBuf::from("watson")
}

/// Builds the argument vector for `watson start`.
///
/// Tags are `+`-prefixed and appended after the project; no tag arguments
/// are emitted when the tag list is empty.
#[must_use]
pub fn start_args(project: &str, tags: &[String]) -> Vec<String> {
    let mut args = vec!["start".to_string(), project.to_string()];
    args.extend(tags.iter().map(|tag| format!("+{tag}")));
    args
}

/// The external time-tracking tool, seen from the scheduler.
///
/// All methods are infallible by contract: implementations absorb their
/// own failures and return empty output instead (see [`crate::parser`]
/// for how empty output is interpreted).
pub trait TrackerCli {
    /// Raw `status` output; empty when the tool is unavailable.
    fn status(&self) -> impl Future<Output = String> + Send;

    /// Raw `log --json` output; empty when the tool is unavailable.
    fn log_json(&self) -> impl Future<Output = String> + Send;

    /// Starts tracking a (project, tags) pair. Fire-and-forget.
    fn start(&self, project: &str, tags: &[String]) -> impl Future<Output = ()> + Send;

    /// Stops the running frame. Fire-and-forget.
    fn stop(&self) -> impl Future<Output = ()> + Send;

    /// Captured `report --day` output for the stats view.
    fn report_day(&self) -> impl Future<Output = String> + Send;
}

/// [`TrackerCli`] implementation that shells out to a real watson binary.
#[derive(Debug, Clone)]
pub struct WatsonCli {
    bin: PathBuf,
}

impl WatsonCli {
    /// Creates an invoker for the given watson binary.
    #[must_use]
    pub fn new(bin: PathBuf) -> Self {
        Self { bin }
    }

    /// The binary this invoker runs.
    #[must_use]
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Runs watson with the given arguments and captures trimmed stdout.
    ///
    /// Spawn failures are logged and yield an empty string. A non-zero
    /// exit keeps whatever was printed; the parser decides what it means.
    async fn capture(&self, args: &[&str]) -> String {
        match Command::new(&self.bin).args(args).output().await {
            Ok(output) => {
                if !output.status.success() {
                    debug!(status = %output.status, ?args, "watson exited with failure");
                }
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Err(e) => {
                warn!(error = %e, bin = %self.bin.display(), ?args, "failed to invoke watson");
                String::new()
            }
        }
    }
}

impl TrackerCli for WatsonCli {
    async fn status(&self) -> String {
        self.capture(&["status"]).await
    }

    async fn log_json(&self) -> String {
        self.capture(&["log", "--json"]).await
    }

    async fn start(&self, project: &str, tags: &[String]) {
        let args = start_args(project, tags);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.capture(&args).await;
    }

    async fn stop(&self) {
        self.capture(&["stop"]).await;
    }

    async fn report_day(&self) -> String {
        self.capture(&["report", "--day"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_args_with_tags() {
        let args = start_args("demo", &["work".to_string(), "personal".to_string()]);
        assert_eq!(args, vec!["start", "demo", "+work", "+personal"]);
    }

    #[test]
    fn start_args_without_tags() {
        let args = start_args("demo", &[]);
        assert_eq!(args, vec!["start", "demo"]);
    }

    #[test]
    fn default_bin_is_never_empty() {
        assert!(!default_watson_bin().as_os_str().is_empty());
    }

    #[cfg(unix)]
    mod invocation {
        use super::*;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        /// Writes an executable shell script standing in for watson.
        fn fake_watson(dir: &tempfile::TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("watson");
            {
                let mut file = std::fs::File::create(&path).unwrap();
                writeln!(file, "#!/bin/sh").unwrap();
                writeln!(file, "{body}").unwrap();
            }
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[tokio::test]
        async fn status_captures_trimmed_stdout() {
            let dir = tempfile::tempdir().unwrap();
            let bin = fake_watson(&dir, r#"echo "Project demo started 2h ago""#);

            let cli = WatsonCli::new(bin);
            assert_eq!(cli.status().await, "Project demo started 2h ago");
        }

        #[tokio::test]
        async fn missing_binary_degrades_to_empty() {
            let cli = WatsonCli::new(PathBuf::from("/nonexistent/watson-bin"));
            assert_eq!(cli.status().await, "");
        }

        #[tokio::test]
        async fn failing_exit_still_returns_stdout() {
            let dir = tempfile::tempdir().unwrap();
            let bin = fake_watson(&dir, "echo partial; exit 3");

            let cli = WatsonCli::new(bin);
            assert_eq!(cli.status().await, "partial");
        }

        #[tokio::test]
        async fn start_passes_tag_arguments() {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("args.log");
            let bin = fake_watson(&dir, &format!(r#"echo "$@" > {}"#, log.display()));

            let cli = WatsonCli::new(bin);
            cli.start("demo", &["work".to_string()]).await;

            let recorded = std::fs::read_to_string(&log).unwrap();
            assert_eq!(recorded.trim(), "start demo +work");
        }
    }
}
