use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub handoff: HandoffConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub notice: NoticeConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

/// Where accepted reservations are sent: `https://{host}/{recipient}?text=...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_recipient")]
    pub recipient: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Offered time slots. Empty (the default) accepts any non-empty value.
    #[serde(default)]
    pub time_slots: Vec<String>,
    /// Offered party sizes. Empty (the default) accepts any non-empty value.
    #[serde(default)]
    pub guest_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    #[serde(default = "default_notice_text")]
    pub text: String,
    #[serde(default = "default_visible_ms")]
    pub visible_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            recipient: default_recipient(),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            text: default_notice_text(),
            visible_ms: default_visible_ms(),
            fade_ms: default_fade_ms(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "wa.me".to_string()
}

fn default_recipient() -> String {
    "393343576688".to_string()
}

fn default_notice_text() -> String {
    "✅ Prenotazione inviata! Conferma su WhatsApp.".to_string()
}

fn default_visible_ms() -> u64 {
    4000
}

fn default_fade_ms() -> u64 {
    400
}

fn default_log_level() -> String {
    "info".to_string()
}
