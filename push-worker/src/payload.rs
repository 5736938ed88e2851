// Push message payload and the notification built from it

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::config::AgentConfig;
use crate::routing::url_host;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Message sent by the push backend: `{"head", "body", "icon", "url"?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    pub head: String,
    pub body: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub icon: String,
    /// Path relative to the worker origin, e.g. `/news/42`
    #[serde(default)]
    pub url: Option<String>,
}

impl PushPayload {
    /// Payload shown when the push carried nothing usable
    pub fn fallback(config: &AgentConfig) -> Self {
        Self {
            head: config.fallback_title.clone(),
            body: config.fallback_body.clone(),
            icon: config.fallback_icon.clone(),
            url: None,
        }
    }

    /// Parse the push data text. Never fails: absent or malformed data
    /// yields the fallback payload.
    pub fn parse_or_fallback(data: Option<&str>, config: &AgentConfig) -> Self {
        let Some(text) = data else {
            log::debug!("Push event without data, using fallback payload");
            return Self::fallback(config);
        };

        match serde_json::from_str::<PushPayload>(text) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Malformed push payload ({}), using fallback", e);
                Self::fallback(config)
            }
        }
    }

    /// Absolute URL the notification points at.
    ///
    /// `origin + url` when a non-empty url is present, else the origin.
    /// A url that moves the target off the origin's host is dropped.
    pub fn target_url(&self, origin: &str) -> String {
        match self.url.as_deref() {
            Some(path) if !path.is_empty() => {
                let target = format!("{}{}", origin, path);
                if same_host(origin, &target) {
                    target
                } else {
                    log::warn!("Push url {:?} does not stay on {}", path, origin);
                    origin.to_string()
                }
            }
            _ => origin.to_string(),
        }
    }
}

fn same_host(origin: &str, target: &str) -> bool {
    match (Url::parse(origin), Url::parse(target)) {
        (Ok(origin), Ok(target)) => {
            url_host(&origin).is_some() && url_host(&origin) == url_host(&target)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub data: NotificationData,
}

/// Arguments of `registration.showNotification(title, options)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub title: String,
    pub options: NotificationOptions,
}

impl NotificationRecord {
    pub fn from_payload(payload: PushPayload, origin: &str) -> Self {
        let url = payload.target_url(origin);
        Self {
            title: payload.head,
            options: NotificationOptions {
                body: payload.body,
                icon: payload.icon,
                data: NotificationData { url },
            },
        }
    }

    pub fn url(&self) -> &str {
        &self.options.data.url
    }
}
