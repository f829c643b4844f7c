//! # Diary Browser
//!
//! Drives a running Chrome over the DevTools Protocol.
//!
//! Start Chrome with remote debugging before a run:
//!
//! ```bash
//! chrome --remote-debugging-port=9222
//! ```
//!
//! [`CdpDriver`] attaches to the first open tab (or opens one) and exposes it
//! as a [`diary_core::UiDriver`].

pub mod cdp;
mod driver;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use driver::CdpDriver;
