//! [`UiDriver`] over a CDP page session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use diary_core::{Element, UiDriver, UiError};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::cdp::{CdpClient, CdpError, PageSession};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Drives one Chrome tab.
///
/// Elements are addressed as `document.querySelectorAll(selector)[index]`,
/// so an [`Element`] handed out earlier is looked up again on every action.
pub struct CdpDriver {
    client: CdpClient,
    page: PageSession,
    /// Whether the tab was opened by us and should be closed on exit.
    owns_page: bool,
    closed: AtomicBool,
}

impl CdpDriver {
    /// Connect to Chrome and attach to its first open tab, opening one if
    /// there is none.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let client = CdpClient::connect(endpoint).await?;
        let pages = client.list_pages().await?;

        let (page, owns_page) = match pages.iter().find(|p| p.is_page()) {
            Some(existing) => {
                info!("Attaching to open tab: {}", existing.url);
                (client.attach_page(&existing.id).await?, false)
            }
            None => {
                info!("No open tab, creating one");
                (client.new_page(None).await?, true)
            }
        };

        Ok(Self {
            client,
            page,
            owns_page,
            closed: AtomicBool::new(false),
        })
    }

    pub fn page(&self) -> &PageSession {
        &self.page
    }

    fn ensure_open(&self) -> Result<(), UiError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(UiError::SessionClosed)
        } else {
            Ok(())
        }
    }

    async fn snapshot(&self, selector: &str) -> Result<Vec<Element>, CdpError> {
        let raw: Vec<RawElement> = self.page.evaluate_as(&snapshot_script(selector)).await?;
        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(index, r)| Element {
                selector: selector.to_string(),
                index,
                tag: r.tag,
                text: r.text,
                value: r.value,
                checked: r.checked,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct RawElement {
    tag: String,
    #[serde(default)]
    text: String,
    value: Option<String>,
    #[serde(default)]
    checked: bool,
}

/// JS string literal for `s`.
fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn nth_expr(selector: &str, index: usize) -> String {
    format!("document.querySelectorAll({})[{}]", js_string(selector), index)
}

fn snapshot_script(selector: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll({})).map(el => ({{\
tag: el.tagName.toLowerCase(), \
text: (el.textContent || '').trim(), \
value: ('value' in el) ? String(el.value) : null, \
checked: !!el.checked}}))",
        js_string(selector)
    )
}

fn value_script(selector: &str, index: usize) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return null; \
return ('value' in el) ? String(el.value) : (el.textContent || '').trim(); }})()",
        nth_expr(selector, index)
    )
}

fn set_value_script(selector: &str, index: usize, text: &str) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; \
if (el.focus) el.focus(); \
el.value = {}; \
el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
if (el.blur) el.blur(); \
return true; }})()",
        nth_expr(selector, index),
        js_string(text)
    )
}

/// Click from a timer so a dialog opened by the handler does not block the
/// evaluation.
fn deferred_click_script(selector: &str, index: usize) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; setTimeout(() => el.click(), 0); return true; }})()",
        nth_expr(selector, index)
    )
}

fn detached(element: &Element) -> CdpError {
    CdpError::Detached(format!("{} [{}]", element.selector, element.index))
}

#[async_trait]
impl UiDriver for CdpDriver {
    async fn navigate(&self, url: &str) -> Result<(), UiError> {
        self.ensure_open()?;
        self.page.navigate(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, UiError> {
        self.ensure_open()?;
        Ok(self.page.get_url().await?)
    }

    async fn find_element(&self, selector: &str) -> Result<Element, UiError> {
        self.ensure_open()?;
        self.snapshot(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| UiError::ElementNotFound(selector.to_string()))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Element>, UiError> {
        self.ensure_open()?;
        Ok(self.snapshot(selector).await?)
    }

    async fn get_value(&self, element: &Element) -> Result<String, UiError> {
        self.ensure_open()?;
        let value = self
            .page
            .evaluate(&value_script(&element.selector, element.index))
            .await?;
        match value {
            Value::String(s) => Ok(s),
            _ => Err(detached(element).into()),
        }
    }

    async fn set_value(&self, element: &Element, text: &str) -> Result<(), UiError> {
        self.ensure_open()?;
        let done = self
            .page
            .evaluate(&set_value_script(&element.selector, element.index, text))
            .await?;
        if done.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(detached(element).into())
        }
    }

    async fn click(&self, element: &Element) -> Result<(), UiError> {
        self.ensure_open()?;
        let node_id = self.page.query_nth(&element.selector, element.index).await?;

        if let Err(e) = self.page.scroll_into_view(node_id).await {
            debug!("Scroll into view failed for {}: {}", element.selector, e);
        }

        match self.page.node_center(node_id).await? {
            Some((x, y)) => self.page.click(x, y).await?,
            None => {
                debug!("{} is not rendered, clicking from script", element.selector);
                let done = self
                    .page
                    .evaluate(&deferred_click_script(&element.selector, element.index))
                    .await?;
                if done.as_bool() != Some(true) {
                    return Err(detached(element).into());
                }
            }
        }
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element, UiError> {
        let start = Instant::now();
        loop {
            self.ensure_open()?;
            if let Some(element) = self.snapshot(selector).await?.into_iter().next() {
                return Ok(element);
            }
            if start.elapsed() > timeout {
                return Err(UiError::Timeout(selector.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn accept_pending_dialog(&self) -> Result<bool, UiError> {
        self.ensure_open()?;
        if let Some(message) = self.page.open_dialog() {
            info!("Accepting dialog: {}", message);
        }
        self.page
            .handle_dialog(true)
            .await
            .map_err(|e| UiError::Dialog(e.to_string()))
    }

    async fn close(&self) -> Result<(), UiError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let result = if self.owns_page {
            self.client.close_page(self.page.target_id()).await
        } else {
            self.client.detach_page(self.page.session_id()).await
        };
        debug!("Browser page released");
        result.map_err(UiError::from)
    }
}
