//! Browser capability consumed by the diary session.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::UiError;

/// Snapshot of a DOM element at lookup time.
///
/// `selector` and `index` address the element again for later actions
/// (`document.querySelectorAll(selector)[index]`). The remaining fields are
/// what the page reported when the element was found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub selector: String,
    pub index: usize,
    pub tag: String,
    pub text: String,
    pub value: Option<String>,
    pub checked: bool,
}

impl Element {
    /// Visible text with surrounding whitespace removed.
    pub fn label(&self) -> &str {
        self.text.trim()
    }
}

/// A dropdown option as scraped from the live page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableOption {
    pub label: String,
    pub value: Option<String>,
}

impl From<&Element> for AvailableOption {
    fn from(element: &Element) -> Self {
        Self {
            label: element.label().to_string(),
            value: element.value.clone().filter(|v| !v.is_empty()),
        }
    }
}

/// Browser automation capability.
///
/// One implementation drives Chrome over CDP; tests use an in-memory page.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), UiError>;

    async fn current_url(&self) -> Result<String, UiError>;

    /// First element matching a CSS selector.
    async fn find_element(&self, selector: &str) -> Result<Element, UiError>;

    /// All elements matching a CSS selector, possibly none.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Element>, UiError>;

    /// Current value of an input or select.
    async fn get_value(&self, element: &Element) -> Result<String, UiError>;

    /// Replace the value of an input, textarea or select and fire change events.
    async fn set_value(&self, element: &Element, text: &str) -> Result<(), UiError>;

    async fn click(&self, element: &Element) -> Result<(), UiError>;

    /// Wait until an element matching `selector` is present.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element, UiError>;

    /// Accept a pending `alert`/`confirm`. `Ok(false)` when none is open.
    async fn accept_pending_dialog(&self) -> Result<bool, UiError>;

    /// Release the page. Further calls fail with [`UiError::SessionClosed`].
    async fn close(&self) -> Result<(), UiError>;
}
