//! Mouse input for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Click at coordinates.
    ///
    /// A click that opens a JavaScript dialog blocks the release event until
    /// the dialog is handled, so the click counts as done once a dialog
    /// shows up. Fails without pressing while an earlier dialog is still
    /// open, so the button is never left held down.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        if let Some(message) = self.open_dialog() {
            return Err(CdpError::DialogOpen(message));
        }
        self.mouse_move(x, y).await?;

        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MousePressed,
                "x": x,
                "y": y,
                "button": MouseButton::Left,
                "clickCount": 1,
            })),
        )
        .await?;

        let release = self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseReleased,
                "x": x,
                "y": y,
                "button": MouseButton::Left,
                "clickCount": 1,
            })),
        );

        tokio::select! {
            result = release => {
                result?;
            }
            _ = self.dialog_opened() => {
                debug!("Click at ({}, {}) opened a dialog", x, y);
            }
        }

        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    /// Move mouse to coordinates.
    pub async fn mouse_move(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
                "button": MouseButton::None,
            })),
        )
        .await?;
        Ok(())
    }
}
