// web-sys implementations of the host capabilities

use std::rc::Rc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{
    Client, ClientQueryOptions, ClientType, Clients, ExtendableEvent, Notification,
    ServiceWorkerGlobalScope, ServiceWorkerRegistration,
};

use crate::agent::Capabilities;
use crate::config::AgentConfig;
use crate::host::{
    ClickedNotification, ClientRegistry, NotificationSurface, PendingTask, PendingWork,
    WindowClient, WorkerLifecycle,
};
use crate::payload::NotificationRecord;

/// Turn a rejected promise value into an error message
pub(crate) fn js_error(value: JsValue) -> anyhow::Error {
    if let Some(message) = value.as_string() {
        return anyhow!(message);
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return anyhow!(String::from(err.message()));
    }
    anyhow!("{:?}", value)
}

async fn settle(promise: js_sys::Promise) -> Result<JsValue> {
    JsFuture::from(promise).await.map_err(js_error)
}

pub fn capabilities(scope: &ServiceWorkerGlobalScope, config: &AgentConfig) -> Capabilities {
    Capabilities {
        notifications: Rc::new(Registration(scope.registration())),
        clients: Rc::new(BrowserClients {
            clients: scope.clients(),
            include_uncontrolled: config.include_uncontrolled,
        }),
        lifecycle: Rc::new(ScopeLifecycle(scope.clone())),
    }
}

/// `event.waitUntil`
pub struct Extendable<'a>(&'a ExtendableEvent);

impl<'a> Extendable<'a> {
    pub fn new(event: &'a ExtendableEvent) -> Self {
        Self(event)
    }
}

impl PendingWork for Extendable<'_> {
    fn wait_until(&self, task: PendingTask) -> Result<()> {
        let promise = future_to_promise(async move {
            match task.await {
                Ok(()) => Ok(JsValue::UNDEFINED),
                Err(e) => {
                    log::error!("{:#}", e);
                    Err(JsValue::from_str(&format!("{:#}", e)))
                }
            }
        });

        self.0.wait_until(&promise).map_err(js_error)
    }
}

struct Registration(ServiceWorkerRegistration);

#[async_trait(?Send)]
impl NotificationSurface for Registration {
    async fn show_notification(&self, record: &NotificationRecord) -> Result<()> {
        let data = js_sys::Object::new();
        js_sys::Reflect::set(&data, &"url".into(), &record.url().into()).map_err(js_error)?;

        let options = web_sys::NotificationOptions::new();
        options.set_body(&record.options.body);
        options.set_icon(&record.options.icon);
        options.set_data(&data);

        let promise = self
            .0
            .show_notification_with_options(&record.title, &options)
            .map_err(js_error)?;
        settle(promise).await?;
        Ok(())
    }
}

/// Notification attached to a `notificationclick` event
pub struct ShownNotification(pub Notification);

impl ClickedNotification for ShownNotification {
    fn close(&self) {
        self.0.close();
    }

    fn target_url(&self) -> Option<String> {
        // Reflect::get throws on undefined/null data
        js_sys::Reflect::get(&self.0.data(), &"url".into())
            .ok()?
            .as_string()
    }
}

struct BrowserWindow(Client);

#[async_trait(?Send)]
impl WindowClient for BrowserWindow {
    fn url(&self) -> String {
        self.0.url()
    }

    fn can_focus(&self) -> bool {
        js_sys::Reflect::has(&self.0, &"focus".into()).unwrap_or(false)
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        let window = self.0.unchecked_ref::<web_sys::WindowClient>();
        settle(window.navigate(url).map_err(js_error)?).await?;
        Ok(())
    }

    async fn focus(&self) -> Result<()> {
        let window = self.0.unchecked_ref::<web_sys::WindowClient>();
        settle(window.focus().map_err(js_error)?).await?;
        Ok(())
    }
}

struct BrowserClients {
    clients: Clients,
    include_uncontrolled: bool,
}

#[async_trait(?Send)]
impl ClientRegistry for BrowserClients {
    async fn match_all_windows(&self) -> Result<Vec<Box<dyn WindowClient>>> {
        let options = ClientQueryOptions::new();
        options.set_type(ClientType::Window);
        options.set_include_uncontrolled(self.include_uncontrolled);

        let list = settle(self.clients.match_all_with_options(&options)).await?;
        let list: js_sys::Array = list
            .dyn_into()
            .map_err(|_| anyhow!("clients.matchAll did not resolve to an array"))?;

        Ok(list
            .iter()
            .map(|client| Box::new(BrowserWindow(client.unchecked_into())) as Box<dyn WindowClient>)
            .collect())
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        settle(self.clients.open_window(url)).await?;
        Ok(())
    }

    async fn claim(&self) -> Result<()> {
        settle(self.clients.claim()).await?;
        Ok(())
    }
}

struct ScopeLifecycle(ServiceWorkerGlobalScope);

#[async_trait(?Send)]
impl WorkerLifecycle for ScopeLifecycle {
    async fn skip_waiting(&self) -> Result<()> {
        settle(self.0.skip_waiting().map_err(js_error)?).await?;
        Ok(())
    }
}
