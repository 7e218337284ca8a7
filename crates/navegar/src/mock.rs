//! In-memory mock driver.
//!
//! [`MockDriver`] implements [`Driver`] over a hand-built DOM of
//! [`MockElement`]s. Suites register elements under the locators their
//! page objects use, run the flow, then inspect interaction counters.
//! No browser process is involved, so harness tests stay fast and
//! deterministic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::driver::{Driver, ElementHandle, SelectChoice, SelectOption};
use crate::locator::Locator;
use crate::result::{NavegarError, NavegarResult};

/// PNG file signature, returned as the default screenshot payload
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// One element of the mock DOM
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Lowercase tag name
    pub tag_name: String,
    /// Visible text content
    pub text: String,
    /// Current input value
    pub value: String,
    /// Whether the element is rendered visible
    pub visible: bool,
    /// Whether the element accepts interaction
    pub enabled: bool,
    /// Attribute map
    pub attributes: HashMap<String, String>,
    /// Options, when the element is a `<select>`
    pub options: Vec<SelectOption>,
    /// Index of the selected option
    pub selected: Option<usize>,
    /// Number of clicks received
    pub click_count: usize,
    /// Number of double-clicks received
    pub double_click_count: usize,
    /// Number of right-clicks received
    pub context_click_count: usize,
    /// Number of hovers received
    pub hover_count: usize,
}

impl MockElement {
    /// Element with the given tag, visible and enabled
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            text: String::new(),
            value: String::new(),
            visible: true,
            enabled: true,
            attributes: HashMap::new(),
            options: Vec::new(),
            selected: None,
            click_count: 0,
            double_click_count: 0,
            context_click_count: 0,
            hover_count: 0,
        }
    }

    /// Shorthand for an `<input>` element
    #[must_use]
    pub fn input() -> Self {
        Self::new("input")
    }

    /// Shorthand for a `<button>` element
    #[must_use]
    pub fn button(text: impl Into<String>) -> Self {
        Self::new("button").with_text(text)
    }

    /// Set the visible text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Turn the element into a `<select>` with `(text, value)` options
    #[must_use]
    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.tag_name = "select".to_string();
        self.options = options
            .iter()
            .map(|(text, value)| SelectOption {
                text: (*text).to_string(),
                value: (*value).to_string(),
            })
            .collect();
        self
    }

    /// Mark the element hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark the element disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// In-memory [`Driver`] implementation
#[derive(Debug, Default)]
pub struct MockDriver {
    url: String,
    page_source: String,
    elements: HashMap<String, MockElement>,
    by_locator: HashMap<Locator, Vec<String>>,
    children: HashMap<String, Vec<String>>,
    next_id: usize,
    executed_scripts: Vec<String>,
    script_results: HashMap<String, Value>,
    alert: Option<String>,
    accepted_alerts: Vec<String>,
    dismissed_alerts: Vec<String>,
    uploads: Vec<(String, PathBuf)>,
    drags: Vec<(String, String)>,
    screenshots_fail: bool,
    closed: bool,
    visited: Vec<String>,
}

impl MockDriver {
    /// Empty mock with no elements registered
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, element: MockElement) -> ElementHandle {
        self.next_id += 1;
        let id = format!("mock-{}", self.next_id);
        let handle = ElementHandle::new(id.clone(), element.tag_name.clone());
        self.elements.insert(id, element);
        handle
    }

    /// Register an element resolvable through `locator`
    pub fn add_element(&mut self, locator: Locator, element: MockElement) -> ElementHandle {
        let handle = self.register(element);
        self.by_locator.entry(locator).or_default().push(handle.id.clone());
        handle
    }

    /// Register several elements under one locator, in document order
    pub fn add_elements(
        &mut self,
        locator: Locator,
        elements: Vec<MockElement>,
    ) -> Vec<ElementHandle> {
        elements
            .into_iter()
            .map(|element| self.add_element(locator.clone(), element))
            .collect()
    }

    /// Register an element as a child of `parent`
    pub fn add_child(&mut self, parent: &ElementHandle, element: MockElement) -> ElementHandle {
        let handle = self.register(element);
        self.children
            .entry(parent.id.clone())
            .or_default()
            .push(handle.id.clone());
        handle
    }

    /// Build a `<table>` of `<tr>`/`<td>` elements from cell text
    pub fn add_table(&mut self, locator: Locator, rows: &[&[&str]]) -> ElementHandle {
        let table = self.add_element(locator, MockElement::new("table"));
        for row in rows {
            let tr = self.add_child(&table, MockElement::new("tr"));
            for cell in *row {
                self.add_child(&tr, MockElement::new("td").with_text(*cell));
            }
        }
        table
    }

    /// Set the HTML source returned by [`Driver::page_source`]
    pub fn set_page_source(&mut self, source: impl Into<String>) {
        self.page_source = source.into();
    }

    /// Open a JavaScript alert with the given message
    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    /// Canned result for an exact script string
    pub fn set_script_result(&mut self, script: impl Into<String>, result: Value) {
        self.script_results.insert(script.into(), result);
    }

    /// Make [`Driver::screenshot`] fail from now on
    pub fn fail_screenshots(&mut self) {
        self.screenshots_fail = true;
    }

    /// Toggle an element's visibility after registration
    pub fn set_visible(&mut self, handle: &ElementHandle, visible: bool) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            element.visible = visible;
        }
    }

    /// Replace an element's text after registration
    pub fn set_text(&mut self, handle: &ElementHandle, text: impl Into<String>) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            element.text = text.into();
        }
    }

    /// Inspect a registered element
    #[must_use]
    pub fn element(&self, handle: &ElementHandle) -> Option<&MockElement> {
        self.elements.get(&handle.id)
    }

    /// Scripts executed so far, in order
    #[must_use]
    pub fn executed_scripts(&self) -> &[String] {
        &self.executed_scripts
    }

    /// URLs navigated to so far, in order
    #[must_use]
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// Alert messages accepted so far
    #[must_use]
    pub fn accepted_alerts(&self) -> &[String] {
        &self.accepted_alerts
    }

    /// Alert messages dismissed so far
    #[must_use]
    pub fn dismissed_alerts(&self) -> &[String] {
        &self.dismissed_alerts
    }

    /// File uploads received so far, as (element id, path) pairs
    #[must_use]
    pub fn uploads(&self) -> &[(String, PathBuf)] {
        &self.uploads
    }

    /// Drag-and-drop operations received so far, as (source, target) id pairs
    #[must_use]
    pub fn drags(&self) -> &[(String, String)] {
        &self.drags
    }

    /// Whether [`Driver::close`] has been called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn get(&self, handle: &ElementHandle) -> NavegarResult<&MockElement> {
        self.elements
            .get(&handle.id)
            .ok_or_else(|| NavegarError::ElementNotFound {
                selector: handle.id.clone(),
            })
    }

    fn get_mut(&mut self, handle: &ElementHandle) -> NavegarResult<&mut MockElement> {
        self.elements
            .get_mut(&handle.id)
            .ok_or_else(|| NavegarError::ElementNotFound {
                selector: handle.id.clone(),
            })
    }

    fn interactable(&mut self, handle: &ElementHandle) -> NavegarResult<&mut MockElement> {
        let element = self.get_mut(handle)?;
        if !element.visible {
            return Err(NavegarError::ElementNotVisible {
                selector: handle.id.clone(),
            });
        }
        if !element.enabled {
            return Err(NavegarError::Driver {
                message: format!("element {} is disabled", handle.id),
            });
        }
        Ok(element)
    }

    fn check_open(&self) -> NavegarResult<()> {
        if self.closed {
            return Err(NavegarError::Driver {
                message: "session is closed".to_string(),
            });
        }
        Ok(())
    }

    fn handle_for(&self, id: &str) -> Option<ElementHandle> {
        self.elements
            .get(id)
            .map(|element| ElementHandle::new(id, element.tag_name.clone()))
    }
}

impl Driver for MockDriver {
    fn navigate(&mut self, url: &str) -> NavegarResult<()> {
        self.check_open()?;
        self.url = url.to_string();
        self.visited.push(url.to_string());
        Ok(())
    }

    fn current_url(&self) -> NavegarResult<String> {
        self.check_open()?;
        Ok(self.url.clone())
    }

    fn page_source(&self) -> NavegarResult<String> {
        self.check_open()?;
        Ok(self.page_source.clone())
    }

    fn execute_script(&mut self, script: &str) -> NavegarResult<Value> {
        self.check_open()?;
        self.executed_scripts.push(script.to_string());
        Ok(self.script_results.get(script).cloned().unwrap_or(Value::Null))
    }

    fn find(&self, locator: &Locator) -> NavegarResult<ElementHandle> {
        self.by_locator
            .get(locator)
            .and_then(|ids| ids.first())
            .and_then(|id| self.handle_for(id))
            .ok_or_else(|| NavegarError::ElementNotFound {
                selector: locator.to_string(),
            })
    }

    fn find_all(&self, locator: &Locator) -> NavegarResult<Vec<ElementHandle>> {
        Ok(self
            .by_locator
            .get(locator)
            .map(|ids| ids.iter().filter_map(|id| self.handle_for(id)).collect())
            .unwrap_or_default())
    }

    fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> NavegarResult<Vec<ElementHandle>> {
        let child_ids = self.children.get(&parent.id).cloned().unwrap_or_default();
        let matches = child_ids
            .iter()
            .filter_map(|id| self.handle_for(id))
            .filter(|handle| match locator.strategy() {
                crate::locator::Strategy::TagName => handle.tag_name == locator.value(),
                _ => self
                    .by_locator
                    .get(locator)
                    .is_some_and(|ids| ids.contains(&handle.id)),
            })
            .collect();
        Ok(matches)
    }

    fn text(&self, element: &ElementHandle) -> NavegarResult<String> {
        Ok(self.get(element)?.text.clone())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> NavegarResult<Option<String>> {
        let element = self.get(element)?;
        if name == "value" {
            return Ok(Some(element.value.clone()));
        }
        Ok(element.attributes.get(name).cloned())
    }

    fn is_displayed(&self, element: &ElementHandle) -> NavegarResult<bool> {
        Ok(self.get(element)?.visible)
    }

    fn is_enabled(&self, element: &ElementHandle) -> NavegarResult<bool> {
        Ok(self.get(element)?.enabled)
    }

    fn click(&mut self, element: &ElementHandle) -> NavegarResult<()> {
        self.interactable(element)?.click_count += 1;
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> NavegarResult<()> {
        self.interactable(element)?.value.clear();
        Ok(())
    }

    fn type_text(&mut self, element: &ElementHandle, text: &str) -> NavegarResult<()> {
        self.interactable(element)?.value.push_str(text);
        Ok(())
    }

    fn select_options(&self, element: &ElementHandle) -> NavegarResult<Vec<SelectOption>> {
        let element = self.get(element)?;
        if element.tag_name != "select" {
            return Err(NavegarError::Driver {
                message: format!("cannot list options of <{}>", element.tag_name),
            });
        }
        Ok(element.options.clone())
    }

    fn select_option(
        &mut self,
        element: &ElementHandle,
        choice: &SelectChoice,
    ) -> NavegarResult<()> {
        let target = self.interactable(element)?;
        if target.tag_name != "select" {
            return Err(NavegarError::Driver {
                message: format!("cannot select within <{}>", target.tag_name),
            });
        }
        let index = match choice {
            SelectChoice::Text(text) => target
                .options
                .iter()
                .position(|option| option.text == *text)
                .ok_or_else(|| NavegarError::ElementNotFound {
                    selector: format!("option with text {text:?}"),
                })?,
            SelectChoice::Value(value) => target
                .options
                .iter()
                .position(|option| option.value == *value)
                .ok_or_else(|| NavegarError::ElementNotFound {
                    selector: format!("option with value {value:?}"),
                })?,
            SelectChoice::Index(index) => {
                if *index >= target.options.len() {
                    return Err(NavegarError::Driver {
                        message: format!(
                            "option index {} out of range ({} options)",
                            index,
                            target.options.len()
                        ),
                    });
                }
                *index
            }
        };
        target.selected = Some(index);
        Ok(())
    }

    fn hover(&mut self, element: &ElementHandle) -> NavegarResult<()> {
        self.interactable(element)?.hover_count += 1;
        Ok(())
    }

    fn double_click(&mut self, element: &ElementHandle) -> NavegarResult<()> {
        self.interactable(element)?.double_click_count += 1;
        Ok(())
    }

    fn context_click(&mut self, element: &ElementHandle) -> NavegarResult<()> {
        self.interactable(element)?.context_click_count += 1;
        Ok(())
    }

    fn drag_and_drop(
        &mut self,
        source: &ElementHandle,
        target: &ElementHandle,
    ) -> NavegarResult<()> {
        self.get(source)?;
        self.get(target)?;
        self.drags.push((source.id.clone(), target.id.clone()));
        Ok(())
    }

    fn alert_present(&self) -> bool {
        self.alert.is_some()
    }

    fn accept_alert(&mut self) -> NavegarResult<()> {
        match self.alert.take() {
            Some(message) => {
                self.accepted_alerts.push(message);
                Ok(())
            }
            None => Err(NavegarError::Driver {
                message: "no alert open".to_string(),
            }),
        }
    }

    fn dismiss_alert(&mut self) -> NavegarResult<()> {
        match self.alert.take() {
            Some(message) => {
                self.dismissed_alerts.push(message);
                Ok(())
            }
            None => Err(NavegarError::Driver {
                message: "no alert open".to_string(),
            }),
        }
    }

    fn upload_file(&mut self, element: &ElementHandle, path: &Path) -> NavegarResult<()> {
        let target = self.get(element)?;
        if target.tag_name != "input" {
            return Err(NavegarError::Driver {
                message: format!("cannot upload to <{}>", target.tag_name),
            });
        }
        self.uploads.push((element.id.clone(), path.to_path_buf()));
        Ok(())
    }

    fn screenshot(&mut self) -> NavegarResult<Vec<u8>> {
        self.check_open()?;
        if self.screenshots_fail {
            return Err(NavegarError::Screenshot {
                message: "capture unavailable".to_string(),
            });
        }
        Ok(PNG_MAGIC.to_vec())
    }

    fn close(&mut self) -> NavegarResult<()> {
        self.closed = true;
        Ok(())
    }
}
