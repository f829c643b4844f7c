//! Core session struct and CDP command dispatch.

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::cdp::client::Transport;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::{CdpResponse, DialogOpening};

/// A session attached to a single page/target.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    pub(super) transport: Transport,
    /// Message of the JavaScript dialog currently open, if any.
    pub(super) dialog: watch::Receiver<Option<String>>,
    event_task: tokio::task::JoinHandle<()>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        transport: Transport,
        event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        let (dialog_tx, dialog) = watch::channel(None);
        let event_task = tokio::spawn(Self::event_loop(event_rx, dialog_tx));

        Self {
            target_id,
            session_id,
            transport,
            dialog,
            event_task,
        }
    }

    /// Tracks dialog events for this page.
    async fn event_loop(
        mut event_rx: mpsc::UnboundedReceiver<CdpResponse>,
        dialog_tx: watch::Sender<Option<String>>,
    ) {
        while let Some(event) = event_rx.recv().await {
            match event.method.as_deref() {
                Some("Page.javascriptDialogOpening") => {
                    let opening = event
                        .params
                        .and_then(|p| serde_json::from_value::<DialogOpening>(p).ok());
                    let message = opening.map(|d| d.message).unwrap_or_default();
                    debug!("JavaScript dialog opened: {}", message);
                    dialog_tx.send_replace(Some(message));
                }
                Some("Page.javascriptDialogClosed") => {
                    dialog_tx.send_replace(None);
                }
                Some(other) => trace!("CDP event: {}", other),
                None => {}
            }
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.event_task.abort();
    }
}
