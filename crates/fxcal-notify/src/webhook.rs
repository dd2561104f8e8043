//! Webhook notifier.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NotifyError, NotifyResult};
use crate::key::SendKey;

/// Placeholder replaced by the send key in `url_template`.
const KEY_PLACEHOLDER: &str = "{key}";

/// Webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Endpoint URL with a `{key}` placeholder.
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// Environment variable holding the send key.
    #[serde(default = "default_key_env")]
    pub key_env: String,
    /// Inline key, used only when `key_env` is unset. Prefer the env var.
    #[serde(default)]
    pub key: Option<String>,
}

fn default_url_template() -> String {
    "https://sctapi.ftqq.com/{key}.send".to_string()
}

fn default_key_env() -> String {
    "FXCAL_SENDKEY".to_string()
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            key_env: default_key_env(),
            key: None,
        }
    }
}

impl NotifierConfig {
    /// Resolve the send key from the environment or the inline fallback.
    pub fn send_key(&self) -> NotifyResult<SendKey> {
        SendKey::resolve(&self.key_env, self.key.as_deref())
    }
}

/// Double every newline; the push service renders `desp` as Markdown,
/// where a single newline does not break the line.
pub fn double_newlines(body: &str) -> String {
    body.replace('\n', "\n\n")
}

/// Posts notifications to the webhook.
#[derive(Debug)]
pub struct WebhookNotifier {
    client: Client,
    url_template: String,
    key: SendKey,
}

impl WebhookNotifier {
    /// Create a notifier.
    ///
    /// # Errors
    /// Returns `NotifyError::InvalidTemplate` if the template has no `{key}`.
    pub fn new(client: Client, config: &NotifierConfig, key: SendKey) -> NotifyResult<Self> {
        if !config.url_template.contains(KEY_PLACEHOLDER) {
            return Err(NotifyError::InvalidTemplate(format!(
                "{} (missing {KEY_PLACEHOLDER})",
                config.url_template
            )));
        }
        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            key,
        })
    }

    fn endpoint(&self) -> String {
        self.url_template.replace(KEY_PLACEHOLDER, self.key.expose())
    }

    /// Send `title` and `body`.
    ///
    /// Fire-and-forget: failures are logged, never returned. The result
    /// only reports whether the webhook answered with a success status.
    pub async fn notify(&self, title: &str, body: &str) -> bool {
        let desp = double_newlines(body);
        let form = [("title", title), ("desp", desp.as_str())];

        debug!(template = %self.url_template, title = %title, body_len = body.len(), "Posting notification");

        match self.client.post(self.endpoint()).form(&form).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!(status = status.as_u16(), title = %title, "Notification posted");
                } else {
                    warn!(status = status.as_u16(), title = %title, "Webhook answered with non-success status");
                }
                status.is_success()
            }
            // reqwest errors carry the URL, which embeds the key.
            Err(e) => {
                warn!(error = %e.without_url(), "Notification delivery failed");
                false
            }
        }
    }
}
