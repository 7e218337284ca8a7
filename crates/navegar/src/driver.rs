//! Browser driver abstraction.
//!
//! [`Driver`] is the seam between page objects and whatever actually
//! drives a browser. Page objects never talk to a browser directly;
//! they go through this trait, so tests run against [`crate::mock::MockDriver`]
//! and production suites can plug in a WebDriver-backed implementation
//! without touching page code.
//!
//! The trait is synchronous. Test flows in Navegar are sequential and
//! blocking by design, so a driver implementation wrapping an async
//! client is expected to block internally.

use std::path::Path;

use serde_json::Value;

use crate::locator::Locator;
use crate::result::{NavegarError, NavegarResult};

/// Opaque handle to an element the driver has resolved.
///
/// Handles are only meaningful to the driver that produced them and
/// become stale when the page re-renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Driver-assigned element identifier
    pub id: String,
    /// Lowercase tag name of the element
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a handle from a driver id and tag name
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
        }
    }
}

/// One `<option>` of a `<select>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Visible option text
    pub text: String,
    /// `value` attribute
    pub value: String,
}

/// How to pick an option from a dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectChoice {
    /// Match the visible option text exactly
    Text(String),
    /// Match the `value` attribute exactly
    Value(String),
    /// Pick by zero-based position
    Index(usize),
}

/// Dropdown selection mode as named in string form ("text", "value", "index")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Select by visible text
    Text,
    /// Select by `value` attribute
    Value,
    /// Select by zero-based index
    Index,
}

impl std::str::FromStr for SelectMode {
    type Err = NavegarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "value" => Ok(Self::Value),
            "index" => Ok(Self::Index),
            _ => Err(NavegarError::UnsupportedOption {
                kind: "select mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Synchronous browser driver interface.
///
/// Lookup methods take `&self`; anything that mutates page or browser
/// state takes `&mut self`. Errors use [`NavegarError::ElementNotFound`]
/// and [`NavegarError::ElementNotVisible`] for the two conditions wait
/// policies can poll through, and [`NavegarError::Driver`] for
/// everything else.
pub trait Driver {
    /// Navigate to a URL
    fn navigate(&mut self, url: &str) -> NavegarResult<()>;

    /// URL of the current page
    fn current_url(&self) -> NavegarResult<String>;

    /// Full HTML source of the current page
    fn page_source(&self) -> NavegarResult<String>;

    /// Execute a JavaScript expression and return its result
    fn execute_script(&mut self, script: &str) -> NavegarResult<Value>;

    /// Resolve a locator to the first matching element
    ///
    /// # Errors
    ///
    /// [`NavegarError::ElementNotFound`] when nothing matches.
    fn find(&self, locator: &Locator) -> NavegarResult<ElementHandle>;

    /// Resolve a locator to every matching element, in document order
    fn find_all(&self, locator: &Locator) -> NavegarResult<Vec<ElementHandle>>;

    /// Resolve a locator among the descendants of `parent`
    fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> NavegarResult<Vec<ElementHandle>>;

    /// Visible text content of an element
    fn text(&self, element: &ElementHandle) -> NavegarResult<String>;

    /// Attribute value, `None` when the attribute is absent
    fn attribute(&self, element: &ElementHandle, name: &str) -> NavegarResult<Option<String>>;

    /// Whether the element is rendered visible
    fn is_displayed(&self, element: &ElementHandle) -> NavegarResult<bool>;

    /// Whether the element accepts interaction
    fn is_enabled(&self, element: &ElementHandle) -> NavegarResult<bool>;

    /// Click an element
    fn click(&mut self, element: &ElementHandle) -> NavegarResult<()>;

    /// Clear an input element's value
    fn clear(&mut self, element: &ElementHandle) -> NavegarResult<()>;

    /// Type text into an input element
    fn type_text(&mut self, element: &ElementHandle, text: &str) -> NavegarResult<()>;

    /// Options of a `<select>` element, in document order
    fn select_options(&self, element: &ElementHandle) -> NavegarResult<Vec<SelectOption>>;

    /// Select one option of a `<select>` element
    fn select_option(
        &mut self,
        element: &ElementHandle,
        choice: &SelectChoice,
    ) -> NavegarResult<()>;

    /// Move the pointer over an element
    fn hover(&mut self, element: &ElementHandle) -> NavegarResult<()>;

    /// Double-click an element
    fn double_click(&mut self, element: &ElementHandle) -> NavegarResult<()>;

    /// Right-click an element
    fn context_click(&mut self, element: &ElementHandle) -> NavegarResult<()>;

    /// Drag `source` onto `target`
    fn drag_and_drop(
        &mut self,
        source: &ElementHandle,
        target: &ElementHandle,
    ) -> NavegarResult<()>;

    /// Whether a JavaScript alert is currently open
    fn alert_present(&self) -> bool;

    /// Accept the open alert
    fn accept_alert(&mut self) -> NavegarResult<()>;

    /// Dismiss the open alert
    fn dismiss_alert(&mut self) -> NavegarResult<()>;

    /// Send a local file path to a file input element
    fn upload_file(&mut self, element: &ElementHandle, path: &Path) -> NavegarResult<()>;

    /// Capture a PNG screenshot of the current page
    fn screenshot(&mut self) -> NavegarResult<Vec<u8>>;

    /// Close the browser session
    fn close(&mut self) -> NavegarResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    mod select_mode_tests {
        use super::*;

        #[test]
        fn test_parse_is_case_insensitive() {
            assert_eq!(SelectMode::from_str("text").unwrap(), SelectMode::Text);
            assert_eq!(SelectMode::from_str("VALUE").unwrap(), SelectMode::Value);
            assert_eq!(SelectMode::from_str("Index").unwrap(), SelectMode::Index);
        }

        #[test]
        fn test_parse_rejects_unknown_mode() {
            let err = SelectMode::from_str("bogus").unwrap_err();
            assert_eq!(err.to_string(), "unsupported select mode: \"bogus\"");
        }
    }

    mod handle_tests {
        use super::*;

        #[test]
        fn test_handle_construction() {
            let handle = ElementHandle::new("e-7", "button");
            assert_eq!(handle.id, "e-7");
            assert_eq!(handle.tag_name, "button");
        }
    }
}
