//! Page base: the wait-then-act layer every page object composes.
//!
//! [`Page`] wraps a [`Driver`] together with a [`WaitPolicy`] and
//! exposes the interaction vocabulary page objects are written in:
//! waits, clicks, form filling, dropdowns, grids, alerts, file
//! transfer. Page objects embed a `Page` rather than inheriting from
//! it; see [`crate::pages`] for the pattern.
//!
//! Every action waits for its target first under the page's policy.
//! Presence checks (`is_present`, `is_displayed`) return `bool` and
//! absorb the timeout; everything else propagates errors.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::db::DbHelper;
use crate::driver::{Driver, ElementHandle, SelectChoice, SelectMode};
use crate::locator::Locator;
use crate::result::{NavegarError, NavegarResult, TransientError};
use crate::wait::{self, WaitPolicy};

/// A parsed CSV download
#[derive(Debug, Clone)]
pub struct CsvDownload {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

impl CsvDownload {
    /// Header row of the file
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows, excluding the header
    #[must_use]
    pub fn rows(&self) -> &[csv::StringRecord] {
        &self.rows
    }

    /// All values of one named column, `None` when the header is absent
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<String>> {
        let index = self.headers.iter().position(|header| header == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).unwrap_or_default().to_string())
                .collect(),
        )
    }
}

/// One step of an [`ActionChain`]
#[derive(Debug, Clone)]
enum Action {
    MoveTo(Locator),
    Click(Locator),
    DoubleClick(Locator),
    ContextClick(Locator),
}

/// A recorded sequence of pointer actions, executed by [`Page::perform`]
#[derive(Debug, Clone, Default)]
pub struct ActionChain {
    steps: Vec<Action>,
}

impl ActionChain {
    /// Empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the pointer over an element
    #[must_use]
    pub fn move_to(mut self, locator: Locator) -> Self {
        self.steps.push(Action::MoveTo(locator));
        self
    }

    /// Click an element
    #[must_use]
    pub fn click(mut self, locator: Locator) -> Self {
        self.steps.push(Action::Click(locator));
        self
    }

    /// Double-click an element
    #[must_use]
    pub fn double_click(mut self, locator: Locator) -> Self {
        self.steps.push(Action::DoubleClick(locator));
        self
    }

    /// Right-click an element
    #[must_use]
    pub fn context_click(mut self, locator: Locator) -> Self {
        self.steps.push(Action::ContextClick(locator));
        self
    }
}

/// Driver plus wait policy plus optional database handle
#[derive(Debug)]
pub struct Page<D: Driver> {
    driver: D,
    policy: WaitPolicy,
    db: Option<DbHelper>,
}

impl<D: Driver> Page<D> {
    /// Wrap a driver with the standard wait policy
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            policy: WaitPolicy::standard(),
            db: None,
        }
    }

    /// Replace the wait policy
    #[must_use]
    pub fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a database handle for data-backed assertions
    #[must_use]
    pub fn with_db(mut self, db: DbHelper) -> Self {
        self.db = Some(db);
        self
    }

    /// The active wait policy
    #[must_use]
    pub const fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Shared access to the driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Exclusive access to the driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Unwrap the driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to a URL
    pub fn open(&mut self, url: &str) -> NavegarResult<()> {
        info!(url, "navigating");
        self.driver.navigate(url)
    }

    /// URL of the current page
    pub fn current_url(&self) -> NavegarResult<String> {
        self.driver.current_url()
    }

    /// Full HTML source of the current page
    pub fn page_source(&self) -> NavegarResult<String> {
        self.driver.page_source()
    }

    /// Check the page source for a substring and log the outcome
    pub fn page_source_contains(&self, needle: &str) -> NavegarResult<bool> {
        let found = self.driver.page_source()?.contains(needle);
        debug!(needle, found, "page source check");
        Ok(found)
    }

    /// Execute a JavaScript expression
    pub fn execute_script(&mut self, script: &str) -> NavegarResult<serde_json::Value> {
        self.driver.execute_script(script)
    }

    // ========================================================================
    // Waits
    // ========================================================================

    /// Wait until the locator matches an element
    pub fn wait_for_present(&self, locator: &Locator) -> NavegarResult<ElementHandle> {
        let policy = self.policy.clone().ignoring(TransientError::ElementNotFound);
        wait::until(&policy, &format!("presence of {locator}"), || {
            self.driver.find(locator).map(Some)
        })
    }

    /// Wait until the locator matches a visible element
    pub fn wait_for_visible(&self, locator: &Locator) -> NavegarResult<ElementHandle> {
        let policy = self
            .policy
            .clone()
            .ignoring(TransientError::ElementNotFound)
            .ignoring(TransientError::ElementNotVisible);
        wait::until(&policy, &format!("visibility of {locator}"), || {
            let handle = self.driver.find(locator)?;
            if self.driver.is_displayed(&handle)? {
                Ok(Some(handle))
            } else {
                Err(NavegarError::ElementNotVisible {
                    selector: locator.to_string(),
                })
            }
        })
    }

    /// Wait until the locator matches a visible, enabled element
    pub fn wait_for_clickable(&self, locator: &Locator) -> NavegarResult<ElementHandle> {
        let policy = self
            .policy
            .clone()
            .ignoring(TransientError::ElementNotFound)
            .ignoring(TransientError::ElementNotVisible);
        wait::until(&policy, &format!("clickability of {locator}"), || {
            let handle = self.driver.find(locator)?;
            if !self.driver.is_displayed(&handle)? {
                return Err(NavegarError::ElementNotVisible {
                    selector: locator.to_string(),
                });
            }
            Ok(self.driver.is_enabled(&handle)?.then_some(handle))
        })
    }

    /// Wait until the locator matches nothing visible
    pub fn wait_for_invisible(&self, locator: &Locator) -> NavegarResult<()> {
        wait::until(&self.policy, &format!("invisibility of {locator}"), || {
            match self.driver.find(locator) {
                Ok(handle) => Ok((!self.driver.is_displayed(&handle)?).then_some(())),
                Err(e) if e.transient_kind() == Some(TransientError::ElementNotFound) => {
                    Ok(Some(()))
                }
                Err(e) => Err(e),
            }
        })
    }

    /// Wait until the element's text equals `expected`
    pub fn wait_for_text(&self, locator: &Locator, expected: &str) -> NavegarResult<()> {
        let policy = self.policy.clone().ignoring(TransientError::ElementNotFound);
        wait::until(
            &policy,
            &format!("text {expected:?} in {locator}"),
            || {
                let handle = self.driver.find(locator)?;
                Ok((self.driver.text(&handle)? == expected).then_some(()))
            },
        )
    }

    /// Wait until the document body is attached
    pub fn wait_for_page_load(&self) -> NavegarResult<()> {
        self.wait_for_present(&Locator::tag("body")).map(|_| ())
    }

    // ========================================================================
    // Presence checks (bool, timeout absorbed)
    // ========================================================================

    /// Whether the locator matches within the wait ceiling
    pub fn is_present(&self, locator: &Locator) -> bool {
        self.wait_for_present(locator).is_ok()
    }

    /// Whether the locator matches a visible element within the wait ceiling
    pub fn is_displayed(&self, locator: &Locator) -> bool {
        self.wait_for_visible(locator).is_ok()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Wait for clickability, then click
    pub fn click(&mut self, locator: &Locator) -> NavegarResult<()> {
        let handle = self.wait_for_clickable(locator)?;
        debug!(%locator, "click");
        self.driver.click(&handle)
    }

    /// Click through JavaScript, bypassing pointer event plumbing
    pub fn click_js(&mut self, locator: &Locator) -> NavegarResult<()> {
        self.wait_for_present(locator)?;
        let script = format!("{}.click();", locator.to_query());
        self.driver.execute_script(&script).map(|_| ())
    }

    /// Clear the field, then type
    pub fn fill(&mut self, locator: &Locator, text: &str) -> NavegarResult<()> {
        let handle = self.wait_for_clickable(locator)?;
        self.driver.clear(&handle)?;
        self.driver.type_text(&handle, text)
    }

    /// Clear the field
    pub fn clear(&mut self, locator: &Locator) -> NavegarResult<()> {
        let handle = self.wait_for_clickable(locator)?;
        self.driver.clear(&handle)
    }

    /// Wait for visibility, then read the element's text
    pub fn get_text(&self, locator: &Locator) -> NavegarResult<String> {
        let handle = self.wait_for_visible(locator)?;
        self.driver.text(&handle)
    }

    /// Wait until the locator matches at least one element, then read
    /// every match's text in document order
    pub fn get_all_text(&self, locator: &Locator) -> NavegarResult<Vec<String>> {
        let policy = self.policy.clone().ignoring(TransientError::ElementNotFound);
        let handles = wait::until(&policy, &format!("any match of {locator}"), || {
            let handles = self.driver.find_all(locator)?;
            Ok((!handles.is_empty()).then_some(handles))
        })?;
        handles
            .iter()
            .map(|handle| self.driver.text(handle))
            .collect()
    }

    /// Wait for presence, then read an attribute
    pub fn get_attribute(&self, locator: &Locator, name: &str) -> NavegarResult<Option<String>> {
        let handle = self.wait_for_present(locator)?;
        self.driver.attribute(&handle, name)
    }

    // ========================================================================
    // Dropdowns
    // ========================================================================

    /// Select a dropdown option with a typed choice
    pub fn select(&mut self, locator: &Locator, choice: &SelectChoice) -> NavegarResult<()> {
        let handle = self.wait_for_clickable(locator)?;
        self.driver.select_option(&handle, choice)
    }

    /// Select a dropdown option from string mode and value.
    ///
    /// `mode` is one of `"text"`, `"value"`, `"index"` (case
    /// insensitive); in index mode `option` must parse as a zero-based
    /// position.
    ///
    /// # Errors
    ///
    /// [`NavegarError::UnsupportedOption`] for an unknown mode or a
    /// non-numeric index.
    pub fn select_dropdown_option(
        &mut self,
        locator: &Locator,
        option: &str,
        mode: &str,
    ) -> NavegarResult<()> {
        let choice = match mode.parse::<SelectMode>()? {
            SelectMode::Text => SelectChoice::Text(option.to_string()),
            SelectMode::Value => SelectChoice::Value(option.to_string()),
            SelectMode::Index => {
                let index =
                    option
                        .parse::<usize>()
                        .map_err(|_| NavegarError::UnsupportedOption {
                            kind: "dropdown index",
                            value: option.to_string(),
                        })?;
                SelectChoice::Index(index)
            }
        };
        self.select(locator, &choice)
    }

    /// Visible texts of a dropdown's options
    pub fn dropdown_options(&self, locator: &Locator) -> NavegarResult<Vec<String>> {
        let handle = self.wait_for_present(locator)?;
        Ok(self
            .driver
            .select_options(&handle)?
            .into_iter()
            .map(|option| option.text)
            .collect())
    }

    // ========================================================================
    // Pointer gestures
    // ========================================================================

    /// Hover over the element, then read its text
    pub fn hover_and_get_text(&mut self, locator: &Locator) -> NavegarResult<String> {
        let handle = self.wait_for_visible(locator)?;
        self.driver.hover(&handle)?;
        self.driver.text(&handle)
    }

    /// Wait for clickability, then double-click
    pub fn double_click(&mut self, locator: &Locator) -> NavegarResult<()> {
        let handle = self.wait_for_clickable(locator)?;
        self.driver.double_click(&handle)
    }

    /// Wait for clickability, then right-click
    pub fn context_click(&mut self, locator: &Locator) -> NavegarResult<()> {
        let handle = self.wait_for_clickable(locator)?;
        self.driver.context_click(&handle)
    }

    /// Drag one element onto another
    pub fn drag_and_drop(&mut self, source: &Locator, target: &Locator) -> NavegarResult<()> {
        let from = self.wait_for_present(source)?;
        let to = self.wait_for_present(target)?;
        self.driver.drag_and_drop(&from, &to)
    }

    /// Scroll the element into view
    pub fn scroll_to(&mut self, locator: &Locator) -> NavegarResult<()> {
        self.wait_for_present(locator)?;
        let script = format!("{}.scrollIntoView(true);", locator.to_query());
        self.driver.execute_script(&script).map(|_| ())
    }

    /// Run a recorded chain of pointer actions in order
    pub fn perform(&mut self, chain: &ActionChain) -> NavegarResult<()> {
        for step in &chain.steps {
            match step {
                Action::MoveTo(locator) => {
                    let handle = self.wait_for_visible(locator)?;
                    self.driver.hover(&handle)?;
                }
                Action::Click(locator) => self.click(locator)?,
                Action::DoubleClick(locator) => self.double_click(locator)?,
                Action::ContextClick(locator) => self.context_click(locator)?,
            }
        }
        Ok(())
    }

    // ========================================================================
    // Alerts and file transfer
    // ========================================================================

    /// Wait for an alert to open, then accept or dismiss it
    pub fn handle_alert(&mut self, accept: bool) -> NavegarResult<()> {
        wait::until_true(&self.policy, "alert to open", || {
            self.driver.alert_present()
        })?;
        if accept {
            self.driver.accept_alert()
        } else {
            self.driver.dismiss_alert()
        }
    }

    /// Send a local file path to a file input
    pub fn upload_file(&mut self, locator: &Locator, path: &Path) -> NavegarResult<()> {
        let handle = self.wait_for_present(locator)?;
        self.driver.upload_file(&handle, path)
    }

    // ========================================================================
    // Grids
    // ========================================================================

    /// Materialize a `<table>` grid as rows of cell text.
    ///
    /// The grid is resolved once; all rows and cells come from the same
    /// snapshot, so a mid-read re-render cannot interleave stale and
    /// fresh cells.
    pub fn read_grid(&self, grid: &Locator) -> NavegarResult<Vec<Vec<String>>> {
        let table = self.wait_for_present(grid)?;
        let rows = self.driver.find_within(&table, &Locator::tag("tr"))?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let cells = self.driver.find_within(row, &Locator::tag("td"))?;
            let mut texts = Vec::with_capacity(cells.len());
            for cell in &cells {
                texts.push(self.driver.text(cell)?);
            }
            out.push(texts);
        }
        Ok(out)
    }

    /// Log every grid cell with 1-based row and column coordinates
    pub fn log_grid(&self, grid: &Locator) -> NavegarResult<()> {
        for (r, row) in self.read_grid(grid)?.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                info!(row = r + 1, column = c + 1, text = %text, "grid cell");
            }
        }
        Ok(())
    }

    /// Compare a grid against expected rows of cell text.
    ///
    /// # Errors
    ///
    /// [`NavegarError::AssertionFailed`] on a dimension mismatch,
    /// [`NavegarError::GridMismatch`] naming the first differing cell
    /// with 1-based coordinates.
    pub fn validate_grid(&self, grid: &Locator, expected: &[&[&str]]) -> NavegarResult<()> {
        let actual = self.read_grid(grid)?;
        if actual.len() != expected.len() {
            return Err(NavegarError::AssertionFailed {
                message: format!(
                    "grid has {} rows, expected {}",
                    actual.len(),
                    expected.len()
                ),
            });
        }
        for (r, (actual_row, expected_row)) in actual.iter().zip(expected).enumerate() {
            if actual_row.len() != expected_row.len() {
                return Err(NavegarError::AssertionFailed {
                    message: format!(
                        "grid row {} has {} columns, expected {}",
                        r + 1,
                        actual_row.len(),
                        expected_row.len()
                    ),
                });
            }
            for (c, (actual_cell, expected_cell)) in
                actual_row.iter().zip(*expected_row).enumerate()
            {
                if actual_cell != expected_cell {
                    return Err(NavegarError::GridMismatch {
                        row: r + 1,
                        column: c + 1,
                        expected: (*expected_cell).to_string(),
                        actual: actual_cell.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Compare a grid against expected cell text in row-major order
    pub fn validate_grid_flat(&self, grid: &Locator, expected: &[&str]) -> NavegarResult<()> {
        let actual = self.read_grid(grid)?;
        let total: usize = actual.iter().map(Vec::len).sum();
        if total != expected.len() {
            return Err(NavegarError::AssertionFailed {
                message: format!("grid has {} cells, expected {}", total, expected.len()),
            });
        }
        let mut expected_cells = expected.iter();
        for (r, row) in actual.iter().enumerate() {
            for (c, actual_cell) in row.iter().enumerate() {
                // total count matched, so the iterator cannot run dry
                let expected_cell = expected_cells.next().unwrap_or(&"");
                if actual_cell != expected_cell {
                    return Err(NavegarError::GridMismatch {
                        row: r + 1,
                        column: c + 1,
                        expected: (*expected_cell).to_string(),
                        actual: actual_cell.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Downloads
    // ========================================================================

    /// Trigger a CSV download and parse the resulting file.
    ///
    /// A stale file of the same name is deleted first. The download is
    /// polled for under the page's wait policy; an absent or unparsable
    /// file is logged and reported as `Ok(None)` rather than an error,
    /// so callers can assert on the outcome.
    pub fn download_csv<F>(
        &mut self,
        download_dir: &Path,
        file_name: &str,
        trigger: F,
    ) -> NavegarResult<Option<CsvDownload>>
    where
        F: FnOnce(&mut Self) -> NavegarResult<()>,
    {
        let path: PathBuf = download_dir.join(file_name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }

        trigger(self)?;

        let waiting_for = format!("download of {file_name}");
        if wait::until_true(&self.policy, &waiting_for, || path.exists()).is_err() {
            warn!(file = file_name, "download did not appear");
            return Ok(None);
        }

        let mut reader = match csv::Reader::from_path(&path) {
            Ok(reader) => reader,
            Err(e) => {
                warn!(file = file_name, error = %e, "could not open download");
                return Ok(None);
            }
        };
        let headers = match reader.headers() {
            Ok(headers) => headers.iter().map(str::to_string).collect(),
            Err(e) => {
                warn!(file = file_name, error = %e, "could not parse download header");
                return Ok(None);
            }
        };
        let mut rows = Vec::new();
        for record in reader.records() {
            match record {
                Ok(record) => rows.push(record),
                Err(e) => {
                    warn!(file = file_name, error = %e, "could not parse download row");
                    return Ok(None);
                }
            }
        }
        Ok(Some(CsvDownload { headers, rows }))
    }

    // ========================================================================
    // Database passthrough
    // ========================================================================

    /// Run a query on the attached database
    ///
    /// # Errors
    ///
    /// [`NavegarError::InvalidState`] when no database is attached.
    pub fn query_rows(
        &self,
        sql: &str,
    ) -> NavegarResult<Vec<std::collections::HashMap<String, serde_json::Value>>> {
        self.db
            .as_ref()
            .ok_or_else(|| NavegarError::InvalidState {
                message: "no database attached to this page".to_string(),
            })?
            .query_rows(sql)
    }

    /// Run a statement on the attached database, returning affected rows
    pub fn execute_sql(&self, sql: &str) -> NavegarResult<usize> {
        self.db
            .as_ref()
            .ok_or_else(|| NavegarError::InvalidState {
                message: "no database attached to this page".to_string(),
            })?
            .execute(sql)
    }
}
