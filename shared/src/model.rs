use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroize;

use crate::config::ClientConfig;
use crate::error::TokenError;

// --- Device identity ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u64);

impl DeviceId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DeviceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// --- Device record ---

/// A device as reported by the server: an `id` plus whatever else the server sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Device {
    #[must_use]
    pub fn new(id: impl Into<DeviceId>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Truthiness of attribute `name`; an absent attribute is false.
    #[must_use]
    pub fn is_truthy(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(is_truthy)
    }

    /// Shallow merge: every field of `patch` overwrites the same field here.
    pub fn merge(&mut self, patch: Device) {
        self.id = patch.id;
        self.attributes.extend(patch.attributes);
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are false, everything else is true.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Server envelope around a device listing: `{ "result": [...] }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub result: Vec<Device>,
}

impl DeviceSnapshot {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// One realtime change to the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "device", rename_all = "snake_case")]
pub enum DeviceDelta {
    Created(Device),
    Updated(Device),
    Deleted(Device),
}

impl DeviceDelta {
    #[must_use]
    pub const fn device(&self) -> &Device {
        match self {
            Self::Created(d) | Self::Updated(d) | Self::Deleted(d) => d,
        }
    }
}

// --- Auth token ---

/// A validated bearer token.
///
/// Construction goes through [`AuthToken::parse`], so a value of this type
/// always matches `^[a-z0-9]+$` (case-insensitive). Debug output is redacted
/// and the bytes are wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Strips `prefix` if present, then validates what is left.
    pub fn parse(raw: &str, prefix: &str) -> Result<Self, TokenError> {
        let token = raw.replacen(prefix, "", 1);
        if token.is_empty() {
            return Err(TokenError::Empty);
        }
        if !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TokenError::InvalidCharacters);
        }
        Ok(Self(token))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for AuthToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    Unauthenticated,
    Authenticated,
}

// --- Fleet ---

/// Locally cached device list plus the tracked selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    pub devices: Vec<Device>,
    pub active_device_ids: Vec<DeviceId>,
    pub has_devices_init: bool,
}

impl Fleet {
    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: DeviceId) -> bool {
        self.device(id).is_some()
    }

    #[must_use]
    pub fn is_active(&self, id: DeviceId) -> bool {
        self.active_device_ids.contains(&id)
    }

    /// Replaces the device list unless it is already equal. Returns whether it changed.
    pub fn replace_devices(&mut self, devices: Vec<Device>) -> bool {
        if self.devices == devices {
            return false;
        }
        self.devices = devices;
        true
    }

    pub fn apply_delta(&mut self, delta: DeviceDelta) {
        match delta {
            DeviceDelta::Created(device) => self.devices.push(device),
            DeviceDelta::Updated(device) => {
                if let Some(existing) = self.devices.iter_mut().find(|d| d.id == device.id) {
                    existing.merge(device);
                }
            }
            DeviceDelta::Deleted(device) => {
                if let Some(index) = self.devices.iter().position(|d| d.id == device.id) {
                    self.devices.remove(index);
                }
            }
        }
    }

    /// Whether `id` may join the selection. Before initialization every id is accepted.
    #[must_use]
    pub fn is_selectable(&self, id: DeviceId, tracking_attribute: &str) -> bool {
        !self.has_devices_init
            || self
                .device(id)
                .is_some_and(|d| d.is_truthy(tracking_attribute))
    }

    /// Appends `id` to the selection. Returns `false` if it was already there.
    pub fn activate(&mut self, id: DeviceId) -> bool {
        if self.is_active(id) {
            return false;
        }
        self.active_device_ids.push(id);
        true
    }

    /// Removes the first occurrence of `id`. Returns whether anything was removed.
    pub fn deactivate(&mut self, id: DeviceId) -> bool {
        match self.active_device_ids.iter().position(|a| *a == id) {
            Some(index) => {
                self.active_device_ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Active ids whose device is gone or cannot be tracked.
    #[must_use]
    pub fn stale_selection(&self, tracking_attribute: &str) -> Vec<DeviceId> {
        self.active_device_ids
            .iter()
            .copied()
            .filter(|id| {
                !self
                    .device(*id)
                    .is_some_and(|d| d.is_truthy(tracking_attribute))
            })
            .collect()
    }

    /// Full teardown: not initialized, no devices, nothing selected.
    pub fn reset(&mut self) {
        self.has_devices_init = false;
        self.devices.clear();
        self.active_device_ids.clear();
    }
}

// --- Root model ---

#[derive(Debug, Default)]
pub struct Model {
    pub config: ClientConfig,
    pub fleet: Fleet,
    pub token: Option<AuthToken>,
    pub offline: bool,
    pub socket_offline: bool,
    pub errors: Vec<String>,
    pub new_notification_counter: u32,
    /// Selection last written to durable storage, loaded once at session start.
    pub persisted_selection: Vec<DeviceId>,
    /// Named slots written by successful requests that have no field of their own.
    pub resources: BTreeMap<String, Value>,
}

impl Model {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.fleet.devices
    }

    #[must_use]
    pub fn active_device_ids(&self) -> &[DeviceId] {
        &self.fleet.active_device_ids
    }

    #[must_use]
    pub const fn has_devices_init(&self) -> bool {
        self.fleet.has_devices_init
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(AuthToken::expose)
    }

    #[must_use]
    pub const fn token_state(&self) -> TokenState {
        if self.token.is_some() {
            TokenState::Authenticated
        } else {
            TokenState::Unauthenticated
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.new_notification_counter = self.new_notification_counter.saturating_add(1);
        self.errors.push(message.into());
    }

    /// Replaces a named slot unless it already holds an equal value.
    pub fn replace_resource(&mut self, name: &str, value: Value) -> bool {
        if self.resources.get(name) == Some(&value) {
            return false;
        }
        self.resources.insert(name.to_string(), value);
        true
    }
}
