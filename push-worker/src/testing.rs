// In-memory host fakes shared by the unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use futures::executor::block_on;

use crate::host::{
    ClickedNotification, ClientRegistry, NotificationSurface, PendingTask, PendingWork,
    WindowClient, WorkerLifecycle,
};
use crate::payload::NotificationRecord;

type CallLog = Rc<RefCell<Vec<String>>>;

/// Extendable event that keeps registered tasks until `run_pending`
#[derive(Default)]
pub struct RecordingEvent {
    tasks: RefCell<Vec<PendingTask>>,
}

impl RecordingEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Drive every registered task to completion, like the host would
    pub fn run_pending(&self) -> Vec<Result<()>> {
        let tasks: Vec<PendingTask> = self.tasks.borrow_mut().drain(..).collect();
        tasks.into_iter().map(block_on).collect()
    }
}

impl PendingWork for RecordingEvent {
    fn wait_until(&self, task: PendingTask) -> Result<()> {
        self.tasks.borrow_mut().push(task);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSurface {
    shown: RefCell<Vec<NotificationRecord>>,
}

impl FakeSurface {
    pub fn shown(&self) -> Vec<NotificationRecord> {
        self.shown.borrow().clone()
    }
}

#[async_trait(?Send)]
impl NotificationSurface for FakeSurface {
    async fn show_notification(&self, record: &NotificationRecord) -> Result<()> {
        self.shown.borrow_mut().push(record.clone());
        Ok(())
    }
}

pub struct FakeNotification {
    url: Option<String>,
    closed: Cell<bool>,
}

impl FakeNotification {
    pub fn new(url: Option<&str>) -> Self {
        Self {
            url: url.map(str::to_string),
            closed: Cell::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl ClickedNotification for FakeNotification {
    fn close(&self) {
        self.closed.set(true);
    }

    fn target_url(&self) -> Option<String> {
        self.url.clone()
    }
}

#[derive(Clone)]
pub struct FakeWindow {
    url: String,
    focusable: bool,
    fail_navigate: bool,
    calls: CallLog,
}

impl FakeWindow {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            focusable: true,
            fail_navigate: false,
            calls: CallLog::default(),
        }
    }

    pub fn without_focus(mut self) -> Self {
        self.focusable = false;
        self
    }

    pub fn failing_navigate(mut self) -> Self {
        self.fail_navigate = true;
        self
    }
}

#[async_trait(?Send)]
impl WindowClient for FakeWindow {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn can_focus(&self) -> bool {
        self.focusable
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        if self.fail_navigate {
            bail!("navigation rejected");
        }
        self.calls
            .borrow_mut()
            .push(format!("navigate {} -> {}", self.url, url));
        Ok(())
    }

    async fn focus(&self) -> Result<()> {
        self.calls.borrow_mut().push(format!("focus {}", self.url));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeClients {
    windows: Vec<FakeWindow>,
    calls: CallLog,
    opened: RefCell<Vec<String>>,
    claims: Cell<usize>,
}

impl FakeClients {
    pub fn new(windows: Vec<FakeWindow>) -> Self {
        let calls = CallLog::default();
        let windows = windows
            .into_iter()
            .map(|mut w| {
                w.calls = Rc::clone(&calls);
                w
            })
            .collect();

        Self {
            windows,
            calls,
            ..Self::default()
        }
    }

    /// navigate/focus calls on enumerated windows, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }

    pub fn claims(&self) -> usize {
        self.claims.get()
    }
}

#[async_trait(?Send)]
impl ClientRegistry for FakeClients {
    async fn match_all_windows(&self) -> Result<Vec<Box<dyn WindowClient>>> {
        Ok(self
            .windows
            .iter()
            .cloned()
            .map(|w| Box::new(w) as Box<dyn WindowClient>)
            .collect())
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn claim(&self) -> Result<()> {
        self.claims.set(self.claims.get() + 1);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLifecycle {
    skips: Cell<usize>,
}

impl FakeLifecycle {
    pub fn skips(&self) -> usize {
        self.skips.get()
    }
}

#[async_trait(?Send)]
impl WorkerLifecycle for FakeLifecycle {
    async fn skip_waiting(&self) -> Result<()> {
        self.skips.set(self.skips.get() + 1);
        Ok(())
    }
}
