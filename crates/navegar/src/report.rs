//! Run reporting: records, state machine, and HTML rendering.
//!
//! A [`Reporter`] owns the report directory for one run and collects a
//! [`ReportRecord`] per test. The run moves through an explicit state
//! machine (not started, running, ended); recording outside a run is an
//! error rather than silently lost output. Ending the run renders a
//! single HTML page with a Description and a Time column and embeds a
//! thumbnail of the failure screenshot next to each failed test.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::driver::Driver;
use crate::result::{NavegarError, NavegarResult};

/// Timestamp format used for per-run report folders
const RUN_FOLDER_FORMAT: &str = "%y-%m-%d-%H-%M-%S";

/// Where and how the report is written
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory reports are written under
    pub report_dir: PathBuf,
    /// Title rendered at the top of the report
    pub title: String,
    /// Give each run its own timestamped subfolder
    pub individual_report: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("results/reports"),
            title: "UI Test Report".to_string(),
            individual_report: false,
        }
    }
}

/// Lifecycle of one reported run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Reporter created, run not started
    NotStarted,
    /// Accepting records
    Running,
    /// Report written, no further records accepted
    Ended,
}

/// Outcome of one test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    /// Test completed without error
    Passed,
    /// Test returned an error
    Failed,
    /// Test was not run
    Skipped,
}

impl TestStatus {
    /// Lowercase name, used as a CSS class in the report
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// One row of the report
#[derive(Debug, Clone)]
pub struct ReportRecord {
    /// Test name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Human-readable description, shown in its own column
    pub description: String,
    /// Wall-clock duration of the test
    pub duration: Duration,
    /// When the test finished
    pub timestamp: DateTime<Local>,
    /// Failure screenshot on disk, if one was captured
    pub screenshot: Option<PathBuf>,
    /// Error text for failed tests
    pub error: Option<String>,
}

impl ReportRecord {
    fn new(name: impl Into<String>, status: TestStatus, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status,
            description: String::new(),
            duration,
            timestamp: Local::now(),
            screenshot: None,
            error: None,
        }
    }

    /// Record a passing test
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self::new(name, TestStatus::Passed, duration)
    }

    /// Record a failing test with its error text
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        let mut record = Self::new(name, TestStatus::Failed, duration);
        record.error = Some(error.into());
        record
    }

    /// Record a skipped test
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self::new(name, TestStatus::Skipped, Duration::ZERO)
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: PathBuf) -> Self {
        self.screenshot = Some(path);
        self
    }
}

/// Collects records for one run and renders the HTML report
#[derive(Debug)]
pub struct Reporter {
    run_dir: PathBuf,
    title: String,
    state: RunState,
    records: Vec<ReportRecord>,
}

impl Reporter {
    /// Create the run directory and a reporter over it.
    ///
    /// With `individual_report` set, each run gets a timestamped
    /// subfolder under the report directory; otherwise runs share the
    /// report directory and overwrite the previous report.
    pub fn new(config: &ReportConfig) -> NavegarResult<Self> {
        let run_dir = if config.individual_report {
            config
                .report_dir
                .join(Local::now().format(RUN_FOLDER_FORMAT).to_string())
        } else {
            config.report_dir.clone()
        };
        std::fs::create_dir_all(&run_dir)?;
        Ok(Self {
            run_dir,
            title: config.title.clone(),
            state: RunState::NotStarted,
            records: Vec::new(),
        })
    }

    /// Directory this run's report and screenshots live in
    #[must_use]
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Current run state
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Records collected so far
    #[must_use]
    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    /// Begin accepting records
    pub fn start_run(&mut self) -> NavegarResult<()> {
        if self.state != RunState::NotStarted {
            return Err(NavegarError::InvalidState {
                message: format!("cannot start a run in state {:?}", self.state),
            });
        }
        self.state = RunState::Running;
        info!(dir = %self.run_dir.display(), "run started");
        Ok(())
    }

    /// Add a record to the running report
    pub fn record(&mut self, record: ReportRecord) -> NavegarResult<()> {
        if self.state != RunState::Running {
            return Err(NavegarError::InvalidState {
                message: format!("cannot record in state {:?}", self.state),
            });
        }
        info!(test = %record.name, status = record.status.as_str(), "recorded");
        self.records.push(record);
        Ok(())
    }

    /// End the run and write `report.html` into the run directory
    pub fn end_run(&mut self) -> NavegarResult<PathBuf> {
        if self.state != RunState::Running {
            return Err(NavegarError::InvalidState {
                message: format!("cannot end a run in state {:?}", self.state),
            });
        }
        self.state = RunState::Ended;
        let path = self.run_dir.join("report.html");
        std::fs::write(&path, self.render_html())?;
        let (passed, failed, skipped) = self.counts();
        info!(passed, failed, skipped, report = %path.display(), "run ended");
        Ok(path)
    }

    /// (passed, failed, skipped) counts
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for record in &self.records {
            match record.status {
                TestStatus::Passed => counts.0 += 1,
                TestStatus::Failed => counts.1 += 1,
                TestStatus::Skipped => counts.2 += 1,
            }
        }
        counts
    }

    /// Fraction of executed tests that passed, 1.0 for an empty run
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let (passed, failed, _) = self.counts();
        let executed = passed + failed;
        if executed == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            passed as f64 / executed as f64
        }
    }

    /// Capture a failure screenshot into `run_dir/tests/`.
    ///
    /// Best effort: any failure along the way is logged and swallowed,
    /// returning `None`, so a broken capture never masks the test
    /// failure it was meant to illustrate.
    pub fn capture_screenshot<D: Driver>(&self, driver: &mut D, test_name: &str) -> Option<PathBuf> {
        let dir = self.run_dir.join("tests");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(error = %e, "could not create screenshot directory");
            return None;
        }
        let bytes = match driver.screenshot() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(test = test_name, error = %e, "screenshot capture failed");
                return None;
            }
        };
        let file_name = format!("{}.png", sanitize(test_name));
        let path = dir.join(file_name);
        if let Err(e) = std::fs::write(&path, bytes) {
            warn!(test = test_name, error = %e, "could not write screenshot");
            return None;
        }
        Some(path)
    }

    fn render_html(&self) -> String {
        let (passed, failed, skipped) = self.counts();
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        html.push_str("<style>\n");
        html.push_str("body { font-family: sans-serif; margin: 2em; }\n");
        html.push_str("table { border-collapse: collapse; width: 100%; }\n");
        html.push_str("th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; vertical-align: top; }\n");
        html.push_str("tr.passed td.status { color: #1a7f37; }\n");
        html.push_str("tr.failed td.status { color: #cf222e; }\n");
        html.push_str("tr.skipped td.status { color: #9a6700; }\n");
        html.push_str("pre { white-space: pre-wrap; margin: 4px 0; }\n");
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        html.push_str(&format!(
            "<p>{passed} passed, {failed} failed, {skipped} skipped</p>\n"
        ));
        html.push_str("<table>\n<tr><th>Test</th><th>Description</th><th>Time</th><th>Status</th><th>Duration</th><th>Details</th></tr>\n");
        for record in &self.records {
            html.push_str(&self.render_row(record));
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }

    fn render_row(&self, record: &ReportRecord) -> String {
        let mut details = String::new();
        if let Some(error) = &record.error {
            details.push_str(&format!("<pre>{}</pre>", escape_html(error)));
        }
        if let Some(screenshot) = &record.screenshot {
            let shown = screenshot
                .strip_prefix(&self.run_dir)
                .unwrap_or(screenshot.as_path());
            details.push_str(&format!(
                "<img src=\"{}\" style=\"width:304px;height:228px;\" onclick=\"window.open(this.src)\">",
                escape_html(&shown.display().to_string())
            ));
        }
        format!(
            "<tr class=\"{status}\"><td>{name}</td><td>{description}</td><td>{time}</td><td class=\"status\">{status}</td><td>{duration_ms}ms</td><td>{details}</td></tr>\n",
            status = record.status.as_str(),
            name = escape_html(&record.name),
            description = escape_html(&record.description),
            time = record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            duration_ms = record.duration.as_millis(),
        )
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;

    fn reporter(individual: bool) -> (tempfile::TempDir, Reporter) {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig {
            report_dir: dir.path().to_path_buf(),
            title: "Suite".to_string(),
            individual_report: individual,
        };
        let reporter = Reporter::new(&config).unwrap();
        (dir, reporter)
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_lifecycle() {
            let (_dir, mut reporter) = reporter(false);
            assert_eq!(reporter.state(), RunState::NotStarted);
            reporter.start_run().unwrap();
            reporter
                .record(ReportRecord::passed("login", Duration::from_millis(10)))
                .unwrap();
            let report = reporter.end_run().unwrap();
            assert_eq!(reporter.state(), RunState::Ended);
            assert!(report.exists());
        }

        #[test]
        fn test_record_before_start_is_rejected() {
            let (_dir, mut reporter) = reporter(false);
            let err = reporter
                .record(ReportRecord::skipped("early"))
                .unwrap_err();
            assert!(matches!(err, NavegarError::InvalidState { .. }));
        }

        #[test]
        fn test_double_start_is_rejected() {
            let (_dir, mut reporter) = reporter(false);
            reporter.start_run().unwrap();
            assert!(reporter.start_run().is_err());
        }

        #[test]
        fn test_record_after_end_is_rejected() {
            let (_dir, mut reporter) = reporter(false);
            reporter.start_run().unwrap();
            reporter.end_run().unwrap();
            assert!(reporter.record(ReportRecord::skipped("late")).is_err());
        }
    }

    mod directory_tests {
        use super::*;

        #[test]
        fn test_shared_run_dir_without_individual_reports() {
            let (dir, reporter) = reporter(false);
            assert_eq!(reporter.run_dir(), dir.path());
        }

        #[test]
        fn test_individual_report_gets_timestamped_subfolder() {
            let (dir, reporter) = reporter(true);
            assert_ne!(reporter.run_dir(), dir.path());
            assert_eq!(reporter.run_dir().parent(), Some(dir.path()));
            assert!(reporter.run_dir().exists());
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_report_has_description_and_time_columns() {
            let (_dir, mut reporter) = reporter(false);
            reporter.start_run().unwrap();
            reporter
                .record(
                    ReportRecord::passed("checkout", Duration::from_millis(42))
                        .with_description("adds an item and pays"),
                )
                .unwrap();
            let report = reporter.end_run().unwrap();
            let html = std::fs::read_to_string(report).unwrap();
            assert!(html.contains("<th>Description</th>"));
            assert!(html.contains("<th>Time</th>"));
            assert!(html.contains("adds an item and pays"));
            assert!(html.contains("42ms"));
        }

        #[test]
        fn test_failed_row_embeds_screenshot_thumbnail() {
            let (_dir, mut reporter) = reporter(false);
            let mut driver = MockDriver::new();
            let shot = reporter.capture_screenshot(&mut driver, "suite::checkout").unwrap();
            reporter.start_run().unwrap();
            reporter
                .record(
                    ReportRecord::failed("checkout", Duration::from_millis(5), "boom")
                        .with_screenshot(shot),
                )
                .unwrap();
            reporter
                .record(ReportRecord::passed("login", Duration::from_millis(3)))
                .unwrap();
            let report = reporter.end_run().unwrap();
            let html = std::fs::read_to_string(report).unwrap();
            assert_eq!(html.matches("<img").count(), 1);
            assert!(html.contains("width:304px;height:228px;"));
            assert!(html.contains("tests/suite__checkout.png"));
        }

        #[test]
        fn test_passing_run_has_no_screenshots() {
            let (_dir, mut reporter) = reporter(false);
            reporter.start_run().unwrap();
            reporter
                .record(ReportRecord::passed("login", Duration::from_millis(3)))
                .unwrap();
            let report = reporter.end_run().unwrap();
            let html = std::fs::read_to_string(report).unwrap();
            assert_eq!(html.matches("<img").count(), 0);
        }

        #[test]
        fn test_error_text_is_escaped() {
            let (_dir, mut reporter) = reporter(false);
            reporter.start_run().unwrap();
            reporter
                .record(ReportRecord::failed(
                    "xss",
                    Duration::ZERO,
                    "<script>alert(1)</script>",
                ))
                .unwrap();
            let report = reporter.end_run().unwrap();
            let html = std::fs::read_to_string(report).unwrap();
            assert!(!html.contains("<script>alert"));
            assert!(html.contains("&lt;script&gt;"));
        }
    }

    mod screenshot_tests {
        use super::*;

        #[test]
        fn test_capture_writes_png_under_tests_dir() {
            let (_dir, reporter) = reporter(false);
            let mut driver = MockDriver::new();
            let path = reporter.capture_screenshot(&mut driver, "mod::case").unwrap();
            assert!(path.starts_with(reporter.run_dir().join("tests")));
            let bytes = std::fs::read(path).unwrap();
            assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        }

        #[test]
        fn test_capture_failure_is_swallowed() {
            let (_dir, reporter) = reporter(false);
            let mut driver = MockDriver::new();
            driver.fail_screenshots();
            assert!(reporter.capture_screenshot(&mut driver, "case").is_none());
        }
    }

    mod count_tests {
        use super::*;

        #[test]
        fn test_counts_and_pass_rate() {
            let (_dir, mut reporter) = reporter(false);
            reporter.start_run().unwrap();
            reporter
                .record(ReportRecord::passed("a", Duration::ZERO))
                .unwrap();
            reporter
                .record(ReportRecord::failed("b", Duration::ZERO, "boom"))
                .unwrap();
            reporter.record(ReportRecord::skipped("c")).unwrap();
            assert_eq!(reporter.counts(), (1, 1, 1));
            assert!((reporter.pass_rate() - 0.5).abs() < f64::EPSILON);
        }
    }
}
