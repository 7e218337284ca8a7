//! Suite configuration.
//!
//! [`TestConfig`] is the single configuration record a suite runs
//! under: target URL, browser choice, and the directory layout for
//! downloads, reports, and logs. It loads from a YAML file and every
//! field has a default, so a missing file or a partial one still yields
//! a runnable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::report::ReportConfig;
use crate::result::{NavegarError, NavegarResult};
use crate::session::BrowserKind;

/// Database the suite may cross-check against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// SQLite database file
    pub path: PathBuf,
}

/// Everything a suite run needs to know
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Application under test
    pub base_url: String,
    /// Which browser to drive
    pub browser: BrowserKind,
    /// Run the browser without a visible window
    pub headless: bool,
    /// Directory holding browser driver binaries
    pub driver_path: PathBuf,
    /// Directory the browser downloads files into
    pub download_dir: PathBuf,
    /// Directory reports are written under
    pub report_dir: PathBuf,
    /// Title rendered at the top of the report
    pub report_title: String,
    /// Give each run its own timestamped report subfolder
    pub individual_report: bool,
    /// Directory the run log is written into
    pub log_dir: PathBuf,
    /// Optional database for data-backed assertions
    pub db: Option<DbConfig>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            browser: BrowserKind::default(),
            headless: false,
            driver_path: PathBuf::from("drivers"),
            download_dir: PathBuf::from("results/media/download"),
            report_dir: PathBuf::from("results/reports"),
            report_title: "UI Test Report".to_string(),
            individual_report: false,
            log_dir: PathBuf::from("results/logs"),
            db: None,
        }
    }
}

impl TestConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> NavegarResult<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&text).map_err(|e| NavegarError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> NavegarResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| NavegarError::Config {
            message: e.to_string(),
        })
    }

    /// Set the application URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the browser
    #[must_use]
    pub const fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Set the report directory
    #[must_use]
    pub fn with_report_dir(mut self, report_dir: impl Into<PathBuf>) -> Self {
        self.report_dir = report_dir.into();
        self
    }

    /// Set the report title
    #[must_use]
    pub fn with_report_title(mut self, title: impl Into<String>) -> Self {
        self.report_title = title.into();
        self
    }

    /// Use a timestamped report subfolder per run
    #[must_use]
    pub const fn with_individual_report(mut self, individual: bool) -> Self {
        self.individual_report = individual;
        self
    }

    /// The report settings this configuration implies
    #[must_use]
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            report_dir: self.report_dir.clone(),
            title: self.report_title.clone(),
            individual_report: self.individual_report,
        }
    }

    /// Full path of the driver binary for the configured browser
    #[must_use]
    pub fn driver_binary(&self) -> PathBuf {
        self.driver_path.join(self.browser.driver_binary())
    }
}
