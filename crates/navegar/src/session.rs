//! Test session: browser choice and the run harness.
//!
//! [`Harness`] ties one driver, one page, and one reporter into a
//! sequential run. Each test body receives the page, and a failure is
//! recorded (with a best-effort screenshot) rather than propagated, so
//! the rest of the suite still runs and the report shows every outcome.

use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::TestConfig;
use crate::db::DbHelper;
use crate::driver::Driver;
use crate::page::Page;
use crate::report::{ReportRecord, Reporter};
use crate::result::{NavegarError, NavegarResult};

/// Browsers a suite can target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome
    #[default]
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Internet Explorer
    Ie,
}

impl BrowserKind {
    /// Lowercase name, as used on the command line
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Ie => "ie",
        }
    }

    /// File name of this browser's driver binary
    #[must_use]
    pub const fn driver_binary(&self) -> &'static str {
        match self {
            Self::Chrome => "chromedriver",
            Self::Firefox => "geckodriver",
            Self::Ie => "IEDriverServer",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = NavegarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "ie" => Ok(Self::Ie),
            _ => Err(NavegarError::UnsupportedOption {
                kind: "browser name",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sequential test run over one browser session
#[derive(Debug)]
pub struct Harness<D: Driver> {
    page: Page<D>,
    reporter: Reporter,
}

impl<D: Driver> Harness<D> {
    /// Build a harness from a driver and the suite configuration.
    ///
    /// The reporter's run directory is created and the run started; if
    /// the configuration names a database it is opened and attached to
    /// the page.
    pub fn new(driver: D, config: &TestConfig) -> NavegarResult<Self> {
        let mut page = Page::new(driver);
        if let Some(db_config) = &config.db {
            page = page.with_db(DbHelper::open(&db_config.path)?);
        }
        let mut reporter = Reporter::new(&config.report_config())?;
        reporter.start_run()?;
        info!(browser = %config.browser, base_url = %config.base_url, "session started");
        Ok(Self { page, reporter })
    }

    /// Replace the page's wait policy
    #[must_use]
    pub fn with_policy(mut self, policy: crate::wait::WaitPolicy) -> Self {
        self.page = self.page.with_policy(policy);
        self
    }

    /// The page under this harness
    pub fn page(&mut self) -> &mut Page<D> {
        &mut self.page
    }

    /// The reporter for this run
    #[must_use]
    pub const fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Run one test body and record its outcome.
    ///
    /// A failing body is recorded with its error text and a
    /// best-effort screenshot; the error itself is not propagated, so
    /// later tests still run. Errors from the reporter do propagate.
    pub fn run_test<F>(&mut self, name: &str, description: &str, body: F) -> NavegarResult<()>
    where
        F: FnOnce(&mut Page<D>) -> NavegarResult<()>,
    {
        info!(test = name, "running");
        let started = Instant::now();
        let outcome = body(&mut self.page);
        let duration = started.elapsed();

        let record = match outcome {
            Ok(()) => ReportRecord::passed(name, duration),
            Err(e) => {
                warn!(test = name, error = %e, "test failed");
                let mut record = ReportRecord::failed(name, duration, e.to_string());
                if let Some(shot) = self
                    .reporter
                    .capture_screenshot(self.page.driver_mut(), name)
                {
                    record = record.with_screenshot(shot);
                }
                record
            }
        };
        self.reporter.record(record.with_description(description))
    }

    /// Record a test as skipped without running anything
    pub fn skip_test(&mut self, name: &str, description: &str) -> NavegarResult<()> {
        self.reporter
            .record(ReportRecord::skipped(name).with_description(description))
    }

    /// End the run: write the report, close the browser, and return
    /// the report path
    pub fn finish(mut self) -> NavegarResult<std::path::PathBuf> {
        let report = self.reporter.end_run()?;
        self.page.driver_mut().close()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use crate::mock::{MockDriver, MockElement};
    use crate::report::TestStatus;

    fn config(dir: &tempfile::TempDir) -> TestConfig {
        TestConfig::default().with_report_dir(dir.path())
    }

    mod browser_kind_tests {
        use super::*;

        #[test]
        fn test_parse_is_case_insensitive() {
            assert_eq!(BrowserKind::from_str("Chrome").unwrap(), BrowserKind::Chrome);
            assert_eq!(
                BrowserKind::from_str("FIREFOX").unwrap(),
                BrowserKind::Firefox
            );
            assert_eq!(BrowserKind::from_str("ie").unwrap(), BrowserKind::Ie);
        }

        #[test]
        fn test_parse_rejects_unknown_browser() {
            let err = BrowserKind::from_str("opera").unwrap_err();
            assert_eq!(err.to_string(), "unsupported browser name: \"opera\"");
        }

        #[test]
        fn test_default_is_chrome() {
            assert_eq!(BrowserKind::default(), BrowserKind::Chrome);
        }

        #[test]
        fn test_driver_binaries() {
            assert_eq!(BrowserKind::Chrome.driver_binary(), "chromedriver");
            assert_eq!(BrowserKind::Firefox.driver_binary(), "geckodriver");
            assert_eq!(BrowserKind::Ie.driver_binary(), "IEDriverServer");
        }
    }

    mod harness_tests {
        use super::*;

        #[test]
        fn test_passing_test_is_recorded() {
            let dir = tempfile::tempdir().unwrap();
            let mut harness = Harness::new(MockDriver::new(), &config(&dir)).unwrap();
            harness
                .run_test("visits home", "opens the landing page", |page| {
                    page.open("https://example.test")
                })
                .unwrap();
            assert_eq!(harness.reporter().counts(), (1, 0, 0));
            let report = harness.finish().unwrap();
            assert!(report.exists());
        }

        #[test]
        fn test_failure_is_recorded_not_propagated() {
            let dir = tempfile::tempdir().unwrap();
            let mut harness = Harness::new(MockDriver::new(), &config(&dir)).unwrap();
            harness
                .run_test("boom", "always fails", |_| {
                    Err(NavegarError::AssertionFailed {
                        message: "nope".to_string(),
                    })
                })
                .unwrap();
            harness
                .run_test("still runs", "runs after a failure", |_| Ok(()))
                .unwrap();
            assert_eq!(harness.reporter().counts(), (1, 1, 0));
            let failed = &harness.reporter().records()[0];
            assert_eq!(failed.status, TestStatus::Failed);
            assert!(failed.screenshot.is_some());
            assert!(failed.error.as_deref().unwrap().contains("nope"));
        }

        #[test]
        fn test_screenshot_failure_still_records_the_test() {
            let dir = tempfile::tempdir().unwrap();
            let mut driver = MockDriver::new();
            driver.fail_screenshots();
            let mut harness = Harness::new(driver, &config(&dir)).unwrap();
            harness
                .run_test("boom", "", |_| {
                    Err(NavegarError::AssertionFailed {
                        message: "nope".to_string(),
                    })
                })
                .unwrap();
            let failed = &harness.reporter().records()[0];
            assert!(failed.screenshot.is_none());
            assert_eq!(failed.status, TestStatus::Failed);
        }

        #[test]
        fn test_finish_closes_the_driver() {
            let dir = tempfile::tempdir().unwrap();
            let mut driver = MockDriver::new();
            driver.add_element(Locator::id("go"), MockElement::button("Go"));
            let harness = Harness::new(driver, &config(&dir)).unwrap();
            // the driver is consumed by finish, so closing is observable
            // only through the report having been written
            let report = harness.finish().unwrap();
            let html = std::fs::read_to_string(report).unwrap();
            assert!(html.contains("UI Test Report"));
        }

        #[test]
        fn test_skip_test() {
            let dir = tempfile::tempdir().unwrap();
            let mut harness = Harness::new(MockDriver::new(), &config(&dir)).unwrap();
            harness.skip_test("flaky", "quarantined").unwrap();
            assert_eq!(harness.reporter().counts(), (0, 0, 1));
        }
    }
}
