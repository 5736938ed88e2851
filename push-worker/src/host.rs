//! Capabilities the service-worker host provides to the agent.
//!
//! The browser runtime hands these out as globals (`self.registration`,
//! `self.clients`, `event.waitUntil`). The agent only sees the traits below;
//! `crate::web` implements them over `web-sys`, tests implement them with
//! in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::payload::NotificationRecord;

/// Work the host must finish before it may suspend the worker
pub type PendingTask = LocalBoxFuture<'static, Result<()>>;

/// An extendable event (`event.waitUntil`)
pub trait PendingWork {
    /// Register `task`; the event stays alive until it settles.
    fn wait_until(&self, task: PendingTask) -> Result<()>;
}

/// `registration.showNotification`
#[async_trait(?Send)]
pub trait NotificationSurface {
    async fn show_notification(&self, record: &NotificationRecord) -> Result<()>;
}

/// The notification carried by a `notificationclick` event
pub trait ClickedNotification {
    fn close(&self);

    /// `notification.data.url`, if the notification carries one
    fn target_url(&self) -> Option<String>;
}

/// An open tab controlled by (or visible to) this worker
#[async_trait(?Send)]
pub trait WindowClient {
    /// Current URL of the tab
    fn url(&self) -> String;

    /// Whether the client exposes `focus`
    fn can_focus(&self) -> bool;

    async fn navigate(&self, url: &str) -> Result<()>;

    async fn focus(&self) -> Result<()>;
}

/// `self.clients`
#[async_trait(?Send)]
pub trait ClientRegistry {
    /// All window clients, in the host's enumeration order
    async fn match_all_windows(&self) -> Result<Vec<Box<dyn WindowClient>>>;

    async fn open_window(&self, url: &str) -> Result<()>;

    async fn claim(&self) -> Result<()>;
}

/// Worker lifecycle controls
#[async_trait(?Send)]
pub trait WorkerLifecycle {
    async fn skip_waiting(&self) -> Result<()>;
}
