use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capabilities::StorageOutput;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::model::{is_truthy, Device, DeviceDelta, DeviceId, DeviceSnapshot};

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

// --- Request lifecycle ---

/// Which logical resource a successful request fetched.
///
/// Every field of the model a request may overwrite has its own kind; other
/// tags land in [`Model::resources`](crate::model::Model::resources).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A message was posted to devices; the result is the targeted id list.
    PostMessage,
    Devices,
    ActiveDevicesId,
    HasDevicesInit,
    /// Only `SetToken` may change the token, so results for it are refused.
    Token,
    Offline,
    SocketOffline,
    Errors,
    NewNotificationCounter,
    Named(String),
}

impl ResourceKind {
    /// Maps the transport's string tag onto a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "postMessage" => Self::PostMessage,
            "devices" => Self::Devices,
            "activeDevicesID" => Self::ActiveDevicesId,
            "hasDevicesInit" => Self::HasDevicesInit,
            "token" => Self::Token,
            "offline" => Self::Offline,
            "socketOffline" => Self::SocketOffline,
            "errors" => Self::Errors,
            "newNotificationCounter" => Self::NewNotificationCounter,
            other => Self::Named(other.to_string()),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::PostMessage => "postMessage",
            Self::Devices => "devices",
            Self::ActiveDevicesId => "activeDevicesID",
            Self::HasDevicesInit => "hasDevicesInit",
            Self::Token => "token",
            Self::Offline => "offline",
            Self::SocketOffline => "socketOffline",
            Self::Errors => "errors",
            Self::NewNotificationCounter => "newNotificationCounter",
            Self::Named(name) => name,
        }
    }
}

// --- Failures ---

/// One entry of a structured server error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    pub reason: String,
}

/// Every shape of failure the transport can report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Failure {
    /// REST-style failure carrying an HTTP status (0 means the request never left).
    Http {
        status: u16,
        #[serde(default)]
        errors: Vec<ServerError>,
    },
    /// Realtime-protocol failure.
    Protocol { code: i64, message: String },
    Generic { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpFailureKind {
    NetworkLoss,
    Unauthorized,
    Server(u16),
}

impl HttpFailureKind {
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            0 => Self::NetworkLoss,
            401 => Self::Unauthorized,
            other => Self::Server(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFailureKind {
    CredentialRejected,
    /// Logged only, never shown to the user.
    Unclassified(i64),
}

impl ProtocolFailureKind {
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            2 => Self::CredentialRejected,
            other => Self::Unclassified(other),
        }
    }
}

impl Failure {
    /// Sorts an untyped transport payload by its shape.
    ///
    /// * `{ response: { status, data?: { errors?: [{ reason }] } } }` is HTTP,
    /// * `{ code, message }` with a non-zero code and a non-empty message is protocol,
    /// * anything else is generic, using `message` when there is one.
    #[must_use]
    pub fn classify(payload: &Value) -> Self {
        if let Some(response) = payload.get("response") {
            if let Some(status) = response.get("status").and_then(Value::as_u64) {
                let errors = response
                    .pointer("/data/errors")
                    .and_then(Value::as_array)
                    .map(|list| {
                        list.iter()
                            .map(|e| ServerError {
                                reason: e
                                    .get("reason")
                                    .map(value_to_message)
                                    .unwrap_or_default(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                return Self::Http {
                    status: u16::try_from(status).unwrap_or(u16::MAX),
                    errors,
                };
            }
        }

        let message = payload.get("message").filter(|m| !m.is_null());
        let code = payload
            .get("code")
            .filter(|c| is_truthy(c))
            .and_then(Value::as_i64);
        if let (Some(code), Some(text)) = (code, message.filter(|m| is_truthy(m))) {
            return Self::Protocol {
                code,
                message: value_to_message(text),
            };
        }

        Self::Generic {
            message: message
                .map(value_to_message)
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
        }
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// --- Events ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Configure(Box<ClientConfig>),
    /// Session start: loads the stored selection before any listing arrives.
    Start,
    PersistedSelectionLoaded(StorageOutput),

    // Request lifecycle
    RequestStarted,
    RequestSucceeded { kind: ResourceKind, result: Value },
    RequestFailed(Failure),

    // Fleet
    DevicesLoaded(Vec<Device>),
    DevicesUpdated(DeviceDelta),

    // Selection
    SetActiveDevice(DeviceId),
    UnsetActiveDevice(DeviceId),
    SetDevicesInit,
    UnsetDevicesInit,

    // Auth
    SetToken(String),
    ClearToken,

    // Notifications
    AddError(String),
    ClearErrors,
    ClearNotificationCounter,

    // Connectivity
    SetOffline(bool),
    SetSocketOffline(bool),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Start => "start",
            Self::PersistedSelectionLoaded(_) => "persisted_selection_loaded",
            Self::RequestStarted => "request_started",
            Self::RequestSucceeded { .. } => "request_succeeded",
            Self::RequestFailed(_) => "request_failed",
            Self::DevicesLoaded(_) => "devices_loaded",
            Self::DevicesUpdated(_) => "devices_updated",
            Self::SetActiveDevice(_) => "set_active_device",
            Self::UnsetActiveDevice(_) => "unset_active_device",
            Self::SetDevicesInit => "set_devices_init",
            Self::UnsetDevicesInit => "unset_devices_init",
            Self::SetToken(_) => "set_token",
            Self::ClearToken => "clear_token",
            Self::AddError(_) => "add_error",
            Self::ClearErrors => "clear_errors",
            Self::ClearNotificationCounter => "clear_notification_counter",
            Self::SetOffline(_) => "set_offline",
            Self::SetSocketOffline(_) => "set_socket_offline",
        }
    }

    /// Builds the success event from the transport's string tag.
    #[must_use]
    pub fn succeeded(tag: &str, result: Value) -> Self {
        Self::RequestSucceeded {
            kind: ResourceKind::from_tag(tag),
            result,
        }
    }

    /// Builds the failure event from an untyped transport payload.
    #[must_use]
    pub fn failed(payload: &Value) -> Self {
        Self::RequestFailed(Failure::classify(payload))
    }

    /// Unwraps a `{ "result": [...] }` listing into `DevicesLoaded`.
    pub fn devices_loaded(envelope: Value) -> ClientResult<Self> {
        DeviceSnapshot::from_json(envelope)
            .map(|snapshot| Self::DevicesLoaded(snapshot.result))
            .map_err(ClientError::DevicePayload)
    }
}
