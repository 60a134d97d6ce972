use tracing::{debug, info, warn};

use super::selection;
use crate::capabilities::{Capabilities, StorageOutput, StorageScope};
use crate::error::{ClientError, ClientResult};
use crate::event::Event;
use crate::model::{Device, DeviceDelta, DeviceId, Model};

/// Asks the shell for the selection of the previous session.
///
/// Sent once when the session starts, before the transport delivers the first
/// device listing, so that listing can restore the selection in place.
pub(super) fn start(model: &Model, caps: &Capabilities) {
    caps.storage.read(
        StorageScope::Durable,
        model.config.active_devices_key.as_str(),
        Event::PersistedSelectionLoaded,
    );
}

/// Keeps the stored selection in the model until the first listing arrives.
pub(super) fn selection_loaded(model: &mut Model, output: StorageOutput) {
    if model.fleet.has_devices_init {
        debug!("stored selection arrived after initialization, ignored");
        return;
    }

    match decode_selection(&model.config.active_devices_key, output) {
        Ok(ids) => {
            debug!(count = ids.len(), "stored selection loaded");
            model.persisted_selection = ids;
        }
        Err(e) => warn!(error = %e, "stored selection ignored"),
    }
}

/// Reconciles a full device listing from the server.
///
/// The first listing of a session also settles the selection: ids picked
/// before the fleet was known are pruned against it, or, when nothing was
/// picked yet, the stored selection of the previous session is restored.
pub(super) fn devices_loaded(model: &mut Model, caps: &Capabilities, devices: Vec<Device>) {
    if model.fleet.replace_devices(devices) {
        debug!(count = model.fleet.devices.len(), "device list replaced");
    }

    if model.fleet.has_devices_init {
        return;
    }

    if model.fleet.active_device_ids.is_empty() {
        selection::mark_initialized(model);
        restore_selection(model, caps);
    } else {
        for id in model.fleet.stale_selection(&model.config.tracking_attribute) {
            selection::unset_active(model, caps, id);
        }
        selection::mark_initialized(model);
    }
    info!(
        devices = model.fleet.devices.len(),
        active = model.fleet.active_device_ids.len(),
        "fleet initialized"
    );
}

pub(super) fn devices_updated(model: &mut Model, delta: DeviceDelta) {
    debug!(id = %delta.device().id, "device delta");
    model.fleet.apply_delta(delta);
}

/// Re-selects the stored ids that still exist in the fleet.
fn restore_selection(model: &mut Model, caps: &Capabilities) {
    for id in model.persisted_selection.clone() {
        if model.fleet.contains(id) && !model.fleet.is_active(id) {
            selection::set_active(model, caps, id);
        }
    }
}

fn decode_selection(key: &str, output: StorageOutput) -> ClientResult<Vec<DeviceId>> {
    match output {
        StorageOutput::Value(None) => Ok(Vec::new()),
        StorageOutput::Value(Some(raw)) => {
            serde_json::from_str(&raw).map_err(|source| ClientError::CorruptSelection {
                key: key.to_string(),
                source,
            })
        }
        other @ StorageOutput::Done => Err(ClientError::UnexpectedStorageOutput {
            key: key.to_string(),
            output: other,
        }),
    }
}
