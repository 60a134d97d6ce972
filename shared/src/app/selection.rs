use tracing::{debug, warn};

use crate::capabilities::{devices_path, Capabilities, StorageScope};
use crate::model::{DeviceId, Model};

/// Adds `id` to the tracked set.
///
/// Once the fleet is initialized only devices with a truthy tracking
/// attribute are accepted; anything else is dropped silently.
pub(super) fn set_active(model: &mut Model, caps: &Capabilities, id: DeviceId) {
    if !model
        .fleet
        .is_selectable(id, &model.config.tracking_attribute)
    {
        debug!(%id, "device cannot be tracked, selection ignored");
        return;
    }
    if !model.fleet.activate(id) {
        debug!(%id, "device already tracked");
        return;
    }

    persist(model, caps);
    if model.fleet.has_devices_init {
        caps.navigate
            .push(devices_path(&model.fleet.active_device_ids));
    }
}

pub(super) fn unset_active(model: &mut Model, caps: &Capabilities, id: DeviceId) {
    if !model.fleet.deactivate(id) {
        debug!(%id, "device was not tracked");
    }
    persist(model, caps);
    caps.navigate
        .push(devices_path(&model.fleet.active_device_ids));
}

pub(super) fn mark_initialized(model: &mut Model) {
    model.fleet.has_devices_init = true;
}

/// Drops devices and selection from memory. The persisted selection is left
/// alone so the next initialization can restore it.
pub(super) fn mark_uninitialized(model: &mut Model) {
    model.fleet.reset();
}

/// Writes the whole selection to durable storage and mirrors it in the model.
pub(super) fn persist(model: &mut Model, caps: &Capabilities) {
    match serde_json::to_string(&model.fleet.active_device_ids) {
        Ok(json) => {
            caps.storage.write(
                StorageScope::Durable,
                model.config.active_devices_key.as_str(),
                json,
            );
            model
                .persisted_selection
                .clone_from(&model.fleet.active_device_ids);
        }
        Err(e) => warn!(error = %e, "active selection not persisted"),
    }
}
