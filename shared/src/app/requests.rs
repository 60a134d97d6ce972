use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::selection;
use crate::capabilities::{Capabilities, Severity};
use crate::error::ClientError;
use crate::event::ResourceKind;
use crate::model::{Device, DeviceId, Model};

pub(super) fn started() {
    debug!("request started");
}

pub(super) fn succeeded(model: &mut Model, caps: &Capabilities, kind: ResourceKind, result: Value) {
    let changed = match &kind {
        ResourceKind::PostMessage => {
            let message = format!(
                "Post message to devices with IDs {} success",
                join_ids(&result)
            );
            info!(%message, "message delivered");
            caps.notify.show(
                model
                    .config
                    .success_notification
                    .build(message, Severity::Positive),
            );
            return;
        }
        ResourceKind::Devices => decode(&kind, result)
            .is_some_and(|devices: Vec<Device>| model.fleet.replace_devices(devices)),
        ResourceKind::ActiveDevicesId => decode(&kind, result)
            .is_some_and(|ids: Vec<DeviceId>| replace_selection(model, caps, ids)),
        ResourceKind::HasDevicesInit => {
            replace(&mut model.fleet.has_devices_init, &kind, result)
        }
        ResourceKind::Token => {
            warn!("token result refused, tokens only change through SetToken");
            false
        }
        ResourceKind::Offline => replace(&mut model.offline, &kind, result),
        ResourceKind::SocketOffline => replace(&mut model.socket_offline, &kind, result),
        ResourceKind::Errors => replace(&mut model.errors, &kind, result),
        ResourceKind::NewNotificationCounter => {
            replace(&mut model.new_notification_counter, &kind, result)
        }
        ResourceKind::Named(name) => model.replace_resource(name, result),
    };

    if changed {
        debug!(slot = kind.tag(), "slot replaced");
    }
}

fn decode<T: DeserializeOwned>(kind: &ResourceKind, result: Value) -> Option<T> {
    match serde_json::from_value(result) {
        Ok(value) => Some(value),
        Err(source) => {
            let error = ClientError::SlotPayload {
                slot: kind.tag().to_string(),
                source,
            };
            warn!(%error, "request result dropped");
            None
        }
    }
}

/// Overwrites `field` with the decoded result unless they are already equal.
fn replace<T: DeserializeOwned + PartialEq>(field: &mut T, kind: &ResourceKind, result: Value) -> bool {
    match decode::<T>(kind, result) {
        Some(value) if *field != value => {
            *field = value;
            true
        }
        _ => false,
    }
}

/// Takes over a selection wholesale, keeping it free of duplicates and, once
/// the fleet is known, of devices that cannot be tracked. Persisted like any
/// other selection change.
fn replace_selection(model: &mut Model, caps: &Capabilities, ids: Vec<DeviceId>) -> bool {
    let mut selection = Vec::with_capacity(ids.len());
    for id in ids {
        if !selection.contains(&id)
            && model
                .fleet
                .is_selectable(id, &model.config.tracking_attribute)
        {
            selection.push(id);
        }
    }
    if model.fleet.active_device_ids == selection {
        return false;
    }
    model.fleet.active_device_ids = selection;
    selection::persist(model, caps);
    true
}

/// Renders the targeted ids the way the transport reports them: `1,2,3`.
fn join_ids(result: &Value) -> String {
    match result {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
