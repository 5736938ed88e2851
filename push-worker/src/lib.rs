//! Push notification service worker.
//!
//! Shows a notification for every push message and, when one is clicked,
//! focuses an open tab on the same site or opens a new one. The browser
//! runtime is reached only through the traits in [`host`], so the agent runs
//! unchanged under test; the `wasm32` build wires those traits to `web-sys`
//! and exports the event entry points used by `service-worker.js`.

pub mod agent;
pub mod config;
pub mod host;
pub mod payload;
pub mod routing;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(test)]
mod testing;

pub use agent::{Capabilities, NotificationAgent};
pub use config::AgentConfig;
pub use payload::{NotificationRecord, PushPayload};
pub use routing::{ClickOutcome, ClickTarget};
