use serde::{Deserialize, Serialize};

use crate::capabilities::{Notification, Severity};

pub const ACTIVE_DEVICES_KEY: &str = "TrackIt Active Devices";
pub const TOKEN_SESSION_KEY: &str = "currentToken";
pub const CREDENTIAL_PREFIX: &str = "FlespiToken ";
pub const TRACKING_ATTRIBUTE: &str = "messages_ttl";

pub const ERROR_NOTIFICATION_ICON: &str = "warning";
pub const ERROR_NOTIFICATION_TIMEOUT_MS: u32 = 1000;
pub const SUCCESS_NOTIFICATION_ICON: &str = "alarm_add";
pub const SUCCESS_NOTIFICATION_TIMEOUT_MS: u32 = 2500;

/// Presentation preset for one notification severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStyle {
    pub icon: String,
    pub timeout_ms: u32,
}

impl NotificationStyle {
    #[must_use]
    pub fn build(&self, message: impl Into<String>, severity: Severity) -> Notification {
        Notification {
            message: message.into(),
            severity,
            icon: self.icon.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Tunables of the client core.
///
/// Every field has a default, so a shell only needs to send the keys it wants
/// to override (`{"credential_prefix": "Bearer "}` is a valid config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Durable storage key holding the JSON array of active device IDs.
    pub active_devices_key: String,
    /// Session storage key holding the raw token.
    pub token_session_key: String,
    /// Prefix stripped from incoming tokens and prepended to the transport credential.
    pub credential_prefix: String,
    /// Device attribute that must be truthy for a device to be selectable.
    pub tracking_attribute: String,
    pub error_notification: NotificationStyle,
    pub success_notification: NotificationStyle,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            active_devices_key: ACTIVE_DEVICES_KEY.to_string(),
            token_session_key: TOKEN_SESSION_KEY.to_string(),
            credential_prefix: CREDENTIAL_PREFIX.to_string(),
            tracking_attribute: TRACKING_ATTRIBUTE.to_string(),
            error_notification: NotificationStyle {
                icon: ERROR_NOTIFICATION_ICON.to_string(),
                timeout_ms: ERROR_NOTIFICATION_TIMEOUT_MS,
            },
            success_notification: NotificationStyle {
                icon: SUCCESS_NOTIFICATION_ICON.to_string(),
                timeout_ms: SUCCESS_NOTIFICATION_TIMEOUT_MS,
            },
        }
    }
}

impl ClientConfig {
    /// Transport credential for an already validated raw token.
    #[must_use]
    pub fn authorization_for(&self, raw: &str) -> String {
        format!("{}{raw}", self.credential_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"token_session_key":"tok"}"#).unwrap();
        assert_eq!(config.token_session_key, "tok");
        assert_eq!(config.active_devices_key, ACTIVE_DEVICES_KEY);
        assert_eq!(config.error_notification.timeout_ms, 1000);
    }

    #[test]
    fn authorization_uses_prefix() {
        let config = ClientConfig::default();
        assert_eq!(config.authorization_for("abc123"), "FlespiToken abc123");
    }
}
