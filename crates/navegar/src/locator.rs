//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a (strategy, value) pair identifying a page element.
//! Locators are cheap to clone, consumed rather than mutated, and scoped
//! to the page object that declares them.

use serde::{Deserialize, Serialize};

/// How the driver should look an element up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// CSS selector (e.g. `button.primary`)
    Css,
    /// XPath expression
    XPath,
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// Tag name (e.g. `tr`, `td`)
    TagName,
    /// Anchor text
    LinkText,
    /// `data-testid` attribute
    TestId,
}

impl Strategy {
    /// Short name used in `Display` output and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
            Self::TagName => "tag",
            Self::LinkText => "link-text",
            Self::TestId => "test-id",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A (strategy, value) pair identifying a page element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator from an explicit strategy and value
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// CSS selector locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expression)
    }

    /// Locator by `id` attribute
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// Locator by `name` attribute
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Locator by tag name
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, tag)
    }

    /// Locator by anchor text
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    /// Locator by `data-testid` attribute
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::new(Strategy::TestId, id)
    }

    /// The lookup strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The selector value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Equivalent CSS selector where one exists
    ///
    /// XPath and link-text have no CSS equivalent and fall through to
    /// [`Self::to_query`] callers that need a JS expression instead.
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self.strategy {
            Strategy::Css => Some(self.value.clone()),
            Strategy::Id => Some(format!("#{}", self.value)),
            Strategy::Name => Some(format!("[name={:?}]", self.value)),
            Strategy::TagName => Some(self.value.clone()),
            Strategy::TestId => Some(format!("[data-testid={:?}]", self.value)),
            Strategy::XPath | Strategy::LinkText => None,
        }
    }

    /// JavaScript expression resolving to the first matching element
    #[must_use]
    pub fn to_query(&self) -> String {
        match self.strategy {
            Strategy::XPath => format!(
                "document.evaluate({:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                self.value
            ),
            Strategy::LinkText => format!(
                "Array.from(document.querySelectorAll('a')).find(el => el.textContent.trim() === {:?})",
                self.value
            ),
            _ => format!(
                "document.querySelector({:?})",
                self.as_css().unwrap_or_default()
            ),
        }
    }

    /// JavaScript expression resolving to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self.strategy {
            Strategy::XPath => format!(
                "document.evaluate({:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
                self.value
            ),
            Strategy::LinkText => format!(
                "Array.from(document.querySelectorAll('a')).filter(el => el.textContent.trim() === {:?}).length",
                self.value
            ),
            _ => format!(
                "document.querySelectorAll({:?}).length",
                self.as_css().unwrap_or_default()
            ),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod constructor_tests {
        use super::*;

        #[test]
        fn test_css_locator() {
            let locator = Locator::css("button.primary");
            assert_eq!(locator.strategy(), Strategy::Css);
            assert_eq!(locator.value(), "button.primary");
        }

        #[test]
        fn test_id_locator() {
            let locator = Locator::id("username");
            assert_eq!(locator.strategy(), Strategy::Id);
            assert_eq!(locator.as_css(), Some("#username".to_string()));
        }

        #[test]
        fn test_xpath_locator_has_no_css() {
            let locator = Locator::xpath("//div[@class='x']//li/a");
            assert_eq!(locator.as_css(), None);
        }

        #[test]
        fn test_test_id_locator() {
            let locator = Locator::test_id("score");
            assert_eq!(locator.as_css(), Some("[data-testid=\"score\"]".to_string()));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let query = Locator::css("button").to_query();
            assert!(query.contains("querySelector"));
            assert!(query.contains("button"));
        }

        #[test]
        fn test_xpath_query() {
            let query = Locator::xpath("//button[@id='go']").to_query();
            assert!(query.contains("evaluate"));
            assert!(query.contains("XPathResult"));
        }

        #[test]
        fn test_link_text_query() {
            let query = Locator::link_text("Sign in").to_query();
            assert!(query.contains("textContent"));
            assert!(query.contains("Sign in"));
        }

        #[test]
        fn test_count_query() {
            let query = Locator::tag("tr").to_count_query();
            assert!(query.contains("querySelectorAll"));
            assert!(query.contains(".length"));
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_display() {
            assert_eq!(Locator::css("#grid").to_string(), "css=#grid");
            assert_eq!(Locator::name("q").to_string(), "name=q");
            assert_eq!(Locator::link_text("Home").to_string(), "link-text=Home");
        }
    }
}
