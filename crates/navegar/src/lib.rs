//! # Navegar
//!
//! Page-object UI test automation: wait policies, a driver seam, HTML
//! run reports, and a REST helper for API-level assertions.
//!
//! Suites compose three layers:
//!
//! - [`driver::Driver`] abstracts the browser; [`mock::MockDriver`]
//!   implements it in memory for fast, deterministic harness tests.
//! - [`page::Page`] wraps a driver with a [`wait::WaitPolicy`] and the
//!   wait-then-act vocabulary page objects are written in.
//! - [`session::Harness`] runs test bodies sequentially, records each
//!   outcome (screenshot on failure), and writes the HTML report.
//!
//! ## Quick start
//!
//! ```
//! use navegar::config::TestConfig;
//! use navegar::locator::Locator;
//! use navegar::mock::{MockDriver, MockElement};
//! use navegar::session::Harness;
//!
//! # fn main() -> navegar::result::NavegarResult<()> {
//! let mut driver = MockDriver::new();
//! driver.add_element(Locator::id("go"), MockElement::button("Go"));
//!
//! let report_dir = tempfile::tempdir()?;
//! let config = TestConfig::default().with_report_dir(report_dir.path());
//! let mut harness = Harness::new(driver, &config)?;
//! harness.run_test("clicks go", "presses the Go button", |page| {
//!     page.open("https://example.test")?;
//!     page.click(&Locator::id("go"))
//! })?;
//! let report = harness.finish()?;
//! assert!(report.exists());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod driver;
pub mod http;
pub mod locator;
pub mod logging;
pub mod mock;
pub mod page;
pub mod pages;
pub mod report;
pub mod result;
pub mod session;
pub mod util;
pub mod wait;

pub use config::{DbConfig, TestConfig};
pub use db::DbHelper;
pub use driver::{Driver, ElementHandle, SelectChoice, SelectMode, SelectOption};
pub use http::{assert_json_equal, ApiClient, ApiResponse, HttpMethod};
pub use locator::{Locator, Strategy};
pub use logging::init_logging;
pub use mock::{MockDriver, MockElement};
pub use page::{ActionChain, CsvDownload, Page};
pub use report::{ReportConfig, ReportRecord, Reporter, RunState, TestStatus};
pub use result::{NavegarError, NavegarResult, TransientError};
pub use session::{BrowserKind, Harness};
pub use util::{current_date, DateFormat};
pub use wait::WaitPolicy;
