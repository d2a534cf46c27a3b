//! Progress extraction from a run log.
//!
//! A scrape run logs one `[current/total]` marker per fetch. The monitor only
//! needs the most recent one, found in the tail of the file.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)/(\d+)\]").expect("valid progress marker regex"));

/// How many trailing log lines are searched for a marker.
pub(crate) const TAIL_LINES: usize = 100;

/// The last `[current/total]` marker within the final [`TAIL_LINES`] lines.
pub(crate) fn latest_marker<S: AsRef<str>>(lines: &[S]) -> Option<(u64, u64)> {
    lines.iter().rev().take(TAIL_LINES).find_map(|line| {
        MARKER_RE
            .captures_iter(line.as_ref())
            .filter_map(|caps| {
                let current: u64 = caps[1].parse().ok()?;
                let total: u64 = caps[2].parse().ok()?;
                Some((current, total))
            })
            .last()
    })
}

/// Current position read from `path`, or `(0, fallback_total)` when the file
/// is unreadable or has no marker yet.
pub(crate) fn read_progress(path: &Path, fallback_total: u64) -> (u64, u64) {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let lines: Vec<&str> = text.lines().collect();
            latest_marker(&lines).unwrap_or((0, fallback_total))
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "log not readable");
            (0, fallback_total)
        }
    }
}

/// One observation of the run's progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProgressSnapshot {
    pub current: u64,
    pub total: u64,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    pub(crate) fn is_complete(&self) -> bool {
        self.current > 0 && self.current >= self.total
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64 * 100.0).min(100.0)
        }
    }

    /// Profiles per second since monitoring started.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.current as f64 / secs
        } else {
            0.0
        }
    }

    /// Time left at the current throughput. `None` until there is a rate to
    /// extrapolate from.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn eta(&self) -> Option<Duration> {
        let rate = self.throughput();
        if rate <= 0.0 {
            return None;
        }
        let left = self.total.saturating_sub(self.current) as f64;
        Some(Duration::from_secs_f64(left / rate))
    }
}

/// Formats a duration as `1h 02m 03s`, `2m 03s` or `3s`.
pub(crate) fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_marker_takes_last_line_with_a_marker() {
        let lines = [
            "INFO [1/10] fetching @a",
            "INFO [2/10] fetching @b",
            "WARN profile fetch failed",
        ];
        assert_eq!(latest_marker(&lines), Some((2, 10)));
    }

    #[test]
    fn latest_marker_takes_last_marker_on_a_line() {
        assert_eq!(latest_marker(&["[3/9] then [4/9]"]), Some((4, 9)));
    }

    #[test]
    fn markers_outside_the_tail_are_ignored() {
        let mut lines = vec!["[7/50] fetching @x".to_string()];
        lines.extend((0..TAIL_LINES).map(|i| format!("noise {i}")));
        assert_eq!(latest_marker(&lines), None);
    }

    #[test]
    fn malformed_markers_are_skipped() {
        let huge = format!("[{}/5]", "9".repeat(40));
        assert_eq!(latest_marker(&["[1/5]", huge.as_str()]), Some((1, 5)));
        assert_eq!(latest_marker(&["[a/5]", "[/5]"]), None);
    }

    #[test]
    fn missing_file_reports_fallback_total() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_progress(&dir.path().join("nope.log"), 5339), (0, 5339));
    }

    #[test]
    fn read_progress_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, b"\xff\xfe junk\n[12/40] fetching @z\n").unwrap();
        assert_eq!(read_progress(&path, 1), (12, 40));
    }

    #[test]
    fn snapshot_rates() {
        let snap = ProgressSnapshot {
            current: 50,
            total: 150,
            elapsed: Duration::from_secs(10),
        };
        assert!((snap.throughput() - 5.0).abs() < 1e-9);
        assert_eq!(snap.eta(), Some(Duration::from_secs(20)));
        assert!((snap.percent() - 100.0 / 3.0).abs() < 1e-9);
        assert!(!snap.is_complete());
    }

    #[test]
    fn zero_progress_is_never_complete() {
        let snap = ProgressSnapshot {
            current: 0,
            total: 0,
            elapsed: Duration::ZERO,
        };
        assert!(!snap.is_complete());
        assert_eq!(snap.eta(), None);
        assert!((snap.percent() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn durations_format_compactly() {
        assert_eq!(format_duration(Duration::from_secs(7)), "7s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 05s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 02m 03s");
    }
}
