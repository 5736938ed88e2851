// Notification click routing: reuse a tab on the same host or open a new one

use anyhow::{Context, Result};
use url::Url;

use crate::host::ClientRegistry;

/// Where a click should lead
#[derive(Debug, Clone, PartialEq)]
pub struct ClickTarget {
    /// URL exactly as stored on the notification
    url: String,
    host: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// An existing tab was navigated and focused
    Focused { client_url: String },
    /// No tab matched; a new window was opened
    Opened,
}

/// `host[:port]`, matching what the browser reports as `URL.host`.
/// Default ports are omitted by the `url` crate, as in the browser.
pub fn url_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

impl ClickTarget {
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw).with_context(|| format!("Invalid target URL: {}", raw))?;
        let host =
            url_host(&parsed).with_context(|| format!("Target URL has no host: {}", raw))?;

        Ok(Self {
            url: raw.to_string(),
            host,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn matches(&self, client_url: &str) -> bool {
        match Url::parse(client_url) {
            Ok(parsed) => url_host(&parsed).as_deref() == Some(self.host.as_str()),
            Err(e) => {
                log::debug!("Skipping client with unparseable url {:?}: {}", client_url, e);
                false
            }
        }
    }
}

/// Navigate and focus the first focusable tab on the target's host, in
/// enumeration order. Open a new window only if there is none.
pub async fn focus_or_open(
    clients: &dyn ClientRegistry,
    target: &ClickTarget,
) -> Result<ClickOutcome> {
    let windows = clients
        .match_all_windows()
        .await
        .context("Failed to enumerate window clients")?;

    log::debug!("{} window client(s) open", windows.len());

    for client in &windows {
        let client_url = client.url();
        if !target.matches(&client_url) || !client.can_focus() {
            continue;
        }

        log::info!("Reusing tab {} for {}", client_url, target.url());
        client
            .navigate(target.url())
            .await
            .with_context(|| format!("Failed to navigate client to {}", target.url()))?;
        client.focus().await.context("Failed to focus client")?;

        return Ok(ClickOutcome::Focused { client_url });
    }

    log::info!("No open tab on {}, opening {}", target.host(), target.url());
    clients
        .open_window(target.url())
        .await
        .with_context(|| format!("Failed to open window at {}", target.url()))?;

    Ok(ClickOutcome::Opened)
}
