//! The notification agent: reacts to service-worker events.
//!
//! Every handler registers its asynchronous work with [`PendingWork::wait_until`]
//! and returns. Nothing is remembered between events except the configuration.

use std::rc::Rc;

use anyhow::{Context, Result};

use crate::config::AgentConfig;
use crate::host::{
    ClickedNotification, ClientRegistry, NotificationSurface, PendingWork, WorkerLifecycle,
};
use crate::payload::{NotificationRecord, PushPayload};
use crate::routing::{focus_or_open, ClickTarget};

/// Message a page posts to activate a waiting worker
pub const SKIP_WAITING: &str = "SKIP_WAITING";

/// Host capabilities the agent is built from
#[derive(Clone)]
pub struct Capabilities {
    pub notifications: Rc<dyn NotificationSurface>,
    pub clients: Rc<dyn ClientRegistry>,
    pub lifecycle: Rc<dyn WorkerLifecycle>,
}

pub struct NotificationAgent {
    config: AgentConfig,
    /// `self.location.origin` of the worker, without trailing slash
    origin: String,
    host: Capabilities,
}

impl NotificationAgent {
    pub fn new(config: AgentConfig, origin: impl Into<String>, host: Capabilities) -> Self {
        Self {
            config,
            origin: origin.into(),
            host,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `push`: show a notification for the message.
    pub fn handle_push(&self, event: &dyn PendingWork, data: Option<&str>) -> Result<()> {
        let payload = PushPayload::parse_or_fallback(data, &self.config);
        let record = NotificationRecord::from_payload(payload, &self.origin);

        log::info!("Showing notification {:?} -> {}", record.title, record.url());

        let notifications = Rc::clone(&self.host.notifications);
        event.wait_until(Box::pin(async move {
            notifications
                .show_notification(&record)
                .await
                .context("Failed to show notification")
        }))
    }

    /// `notificationclick`: close the notification, then focus a tab on the
    /// same host or open a new one.
    pub fn handle_notification_click(
        &self,
        event: &dyn PendingWork,
        notification: &dyn ClickedNotification,
    ) -> Result<()> {
        notification.close();

        let Some(stored) = notification.target_url() else {
            log::debug!("Clicked notification carries no url");
            return Ok(());
        };

        let target = match ClickTarget::parse(&stored) {
            Ok(target) => target,
            Err(e) => {
                log::warn!("Ignoring click: {:#}", e);
                return Ok(());
            }
        };

        let clients = Rc::clone(&self.host.clients);
        event.wait_until(Box::pin(async move {
            let outcome = focus_or_open(clients.as_ref(), &target).await?;
            log::debug!("Click handled: {:?}", outcome);
            Ok(())
        }))
    }

    /// `install`
    pub fn handle_install(&self, event: &dyn PendingWork) -> Result<()> {
        log::info!("Push worker installed");
        if !self.config.skip_waiting {
            return Ok(());
        }
        self.skip_waiting(event)
    }

    /// `activate`
    pub fn handle_activate(&self, event: &dyn PendingWork) -> Result<()> {
        log::info!("Push worker activated");
        if !self.config.claim_clients {
            return Ok(());
        }

        let clients = Rc::clone(&self.host.clients);
        event.wait_until(Box::pin(async move {
            clients.claim().await.context("Failed to claim clients")
        }))
    }

    /// `message`: only `SKIP_WAITING` is understood.
    pub fn handle_message(&self, event: &dyn PendingWork, data: Option<&str>) -> Result<()> {
        match data {
            Some(SKIP_WAITING) => {
                log::info!("Page requested skip waiting");
                self.skip_waiting(event)
            }
            other => {
                log::warn!("Ignoring unexpected message: {:?}", other);
                Ok(())
            }
        }
    }

    fn skip_waiting(&self, event: &dyn PendingWork) -> Result<()> {
        let lifecycle = Rc::clone(&self.host.lifecycle);
        event.wait_until(Box::pin(async move {
            lifecycle.skip_waiting().await.context("skipWaiting failed")
        }))
    }
}
