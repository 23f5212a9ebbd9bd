use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SlopError};

/// Top-level configuration for the SlopGPT services.
///
/// Loaded from `~/.slopgpt/config.toml` by default, then overlaid with
/// environment variables (see [`SlopConfig::apply_env`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlopConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub lead: LeadConfig,
}

impl SlopConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SlopConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SlopError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ANTHROPIC_API_KEY") {
            self.chat.api_key = v;
        }
        if let Some(v) = get("ANTHROPIC_MODEL") {
            self.chat.model = v;
        }
        if let Some(v) = get("SLACK_WEBHOOK_URL") {
            self.lead.chatops_webhook_url = Some(v);
        }
        if let Some(v) = get("WORKFLOW_WEBHOOK_URL") {
            self.lead.workflow_webhook_url = Some(v);
        }
        if let Some(v) = get("LEAD_WEBHOOK_URL") {
            self.lead.generic_webhook_url = Some(v);
        }
        if let Some(v) = get("RESEND_API_KEY") {
            self.lead.email_api_key = Some(v);
        }
        if let Some(v) = get("LEAD_EMAIL") {
            self.lead.email_to = v;
        }
        if let Some(v) = get("LEAD_DEAD_LETTER_PATH") {
            self.lead.dead_letter_path = Some(v);
        }
        if let Some(v) = get("SLOPGPT_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("SLOPGPT_PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %v, "Ignoring invalid SLOPGPT_PORT"),
            }
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Requests per second accepted on the `/api` routes.
    pub rate_limit_per_sec: u64,
    /// Maximum request body size in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
            allowed_origins: Vec::new(),
            rate_limit_per_sec: 20,
            body_limit_bytes: 64 * 1024,
        }
    }
}

/// Text-generation backend and chat widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the Messages API.
    pub api_base: String,
    /// API key. Usually supplied through `ANTHROPIC_API_KEY`.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Output token cap per reply.
    pub max_tokens: u32,
    /// Replies longer than this many characters are truncated.
    pub max_reply_chars: usize,
    /// Timeout for a single generation request.
    pub request_timeout_secs: u64,
    /// Address shown to visitors when the assistant is unreachable.
    pub contact_email: String,
    /// Delay before the contact form opens once contact details are requested.
    pub contact_form_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 500,
            max_reply_chars: 4000,
            request_timeout_secs: 60,
            contact_email: "hello@slopgpt.com".to_string(),
            contact_form_delay_ms: 1000,
        }
    }
}

/// Lead delivery channel settings. Unset URLs/keys disable the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadConfig {
    /// Chat-ops incoming webhook (Slack-compatible).
    pub chatops_webhook_url: Option<String>,
    /// Workflow-automation webhook that stores the lead.
    pub workflow_webhook_url: Option<String>,
    /// Generic outbound webhook, fire-and-forget.
    pub generic_webhook_url: Option<String>,
    /// Transactional email API key (Resend-compatible).
    pub email_api_key: Option<String>,
    /// Transactional email API base URL.
    pub email_api_base: String,
    /// Sender shown on lead emails.
    pub email_from: String,
    /// Recipient of lead emails.
    pub email_to: String,
    /// Source tag attached to generic webhook payloads.
    pub source_tag: String,
    /// Timeout for each channel attempt.
    pub channel_timeout_secs: u64,
    /// JSON-lines spool for leads no channel accepted.
    pub dead_letter_path: Option<String>,
    /// Default acknowledgment returned to the visitor.
    pub acknowledgment: String,
}

impl Default for LeadConfig {
    fn default() -> Self {
        Self {
            chatops_webhook_url: None,
            workflow_webhook_url: None,
            generic_webhook_url: None,
            email_api_key: None,
            email_api_base: "https://api.resend.com".to_string(),
            email_from: "SlopGPT <noreply@slopgpt.com>".to_string(),
            email_to: "hello@slopgpt.com".to_string(),
            source_tag: "slopgpt-chat".to_string(),
            channel_timeout_secs: 10,
            dead_letter_path: None,
            acknowledgment: "Thank you! Our team will be in touch within 24 hours.".to_string(),
        }
    }
}
