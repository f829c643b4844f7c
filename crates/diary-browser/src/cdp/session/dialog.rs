//! JavaScript dialogs (`alert`, `confirm`).

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Message of the dialog currently open, as last reported by the page.
    pub fn open_dialog(&self) -> Option<String> {
        self.dialog.borrow().clone()
    }

    /// Accept or dismiss the open dialog. `Ok(false)` when none is showing.
    pub async fn handle_dialog(&self, accept: bool) -> Result<bool, CdpError> {
        let result = self
            .call("Page.handleJavaScriptDialog", Some(json!({"accept": accept})))
            .await;

        match result {
            Ok(_) => {
                debug!("Dialog handled (accept: {})", accept);
                Ok(true)
            }
            // "No dialog is showing"
            Err(CdpError::Protocol { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Resolves once a dialog opens. Never resolves if the page goes away.
    pub(super) async fn dialog_opened(&self) {
        let mut dialog = self.dialog.clone();
        let opened = dialog.wait_for(|d| d.is_some()).await.is_ok();
        if !opened {
            std::future::pending::<()>().await;
        }
    }
}
