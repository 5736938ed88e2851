// Service-worker entry points
// The JS glue (service-worker.js) only forwards events; all logic lives in Rust

mod host;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use wasm_bindgen::prelude::*;
use web_sys::{
    ExtendableEvent, ExtendableMessageEvent, NotificationEvent, PushEvent, ServiceWorkerGlobalScope,
};

use crate::agent::NotificationAgent;
use crate::config::AgentConfig;
use host::{capabilities, Extendable, ShownNotification};

thread_local! {
    static AGENT: RefCell<Option<Rc<NotificationAgent>>> = const { RefCell::new(None) };
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

fn with_agent(f: impl FnOnce(&NotificationAgent) -> Result<()>) -> Result<(), JsValue> {
    let agent = AGENT
        .with(|slot| slot.borrow().clone())
        .ok_or_else(|| JsValue::from_str("push worker not initialized, call init_worker first"))?;

    f(&agent).map_err(to_js)
}

/// Initialize the agent. `config_json` is an `AgentConfig` as JSON; absent
/// means defaults.
#[wasm_bindgen]
pub fn init_worker(
    scope: ServiceWorkerGlobalScope,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = match config_json {
        Some(json) => AgentConfig::from_json(&json).map_err(to_js)?,
        None => AgentConfig::default(),
    };
    wasm_logger::init(wasm_logger::Config::new(config.level().map_err(to_js)?));

    let origin = scope.location().origin();
    let host = capabilities(&scope, &config);
    let agent = NotificationAgent::new(config, origin, host);

    log::info!("Push worker initialized for {}", agent.origin());
    AGENT.with(|slot| *slot.borrow_mut() = Some(Rc::new(agent)));

    Ok(())
}

#[wasm_bindgen]
pub fn on_push(event: PushEvent) -> Result<(), JsValue> {
    let data = event.data().map(|data| data.text());
    with_agent(|agent| agent.handle_push(&Extendable::new(&event), data.as_deref()))
}

#[wasm_bindgen]
pub fn on_notification_click(event: NotificationEvent) -> Result<(), JsValue> {
    let notification = ShownNotification(event.notification());
    with_agent(|agent| agent.handle_notification_click(&Extendable::new(&event), &notification))
}

#[wasm_bindgen]
pub fn on_install(event: ExtendableEvent) -> Result<(), JsValue> {
    with_agent(|agent| agent.handle_install(&Extendable::new(&event)))
}

#[wasm_bindgen]
pub fn on_activate(event: ExtendableEvent) -> Result<(), JsValue> {
    with_agent(|agent| agent.handle_activate(&Extendable::new(&event)))
}

#[wasm_bindgen]
pub fn on_message(event: ExtendableMessageEvent) -> Result<(), JsValue> {
    let data = event.data().as_string();
    with_agent(|agent| agent.handle_message(&Extendable::new(&event), data.as_deref()))
}
