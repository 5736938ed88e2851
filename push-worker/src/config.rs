use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const NO_CONTENT: &str = "No Content";

/// Worker configuration.
///
/// The glue script hands it to `init_worker` as JSON; `xtask bundle` reads
/// the same structure from `push-worker.toml` and embeds it into the glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Title shown when push data is absent or unreadable
    pub fallback_title: String,
    pub fallback_body: String,
    pub fallback_icon: String,
    /// Also enumerate tabs this worker does not control yet
    pub include_uncontrolled: bool,
    /// Activate a new worker version right after install
    pub skip_waiting: bool,
    /// Take control of already open tabs on activate
    pub claim_clients: bool,
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            fallback_title: NO_CONTENT.to_string(),
            fallback_body: NO_CONTENT.to_string(),
            fallback_icon: String::new(),
            include_uncontrolled: false,
            skip_waiting: false,
            claim_clients: false,
            log_level: "info".to_string(),
        }
    }
}

impl AgentConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        let config: AgentConfig =
            serde_json::from_str(content).context("Failed to parse worker config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize worker config")
    }

    pub fn validate(&self) -> Result<()> {
        self.level()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn level(&self) -> Result<log::Level> {
        self.log_level
            .parse::<log::Level>()
            .with_context(|| format!("Invalid log level: {}", self.log_level))
    }
}
