mod common;

use crux_core::testing::AppTester;
use serde_json::json;
use shared::capabilities::{StorageOperation, StorageOutput, StorageScope};
use shared::CruxApp as _;
use shared::{App, Device, DeviceDelta, DeviceId, Effect, Event, Model};

use common::{navigations, notifications, renders, storage_ops, trackable, untrackable};

const SELECTION_KEY: &str = "TrackIt Active Devices";

fn durable_writes(effects: &[Effect]) -> Vec<String> {
    storage_ops(effects)
        .into_iter()
        .filter_map(|op| match op {
            StorageOperation::Write {
                scope: StorageScope::Durable,
                key,
                value,
            } if key == SELECTION_KEY => Some(value),
            _ => None,
        })
        .collect()
}

/// Starts a session whose durable storage holds `persisted` under the selection key.
fn started(persisted: Option<&str>) -> (AppTester<App, Effect>, Model) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::Start, &mut model);
    assert!(!renders(&update.effects));
    let mut request = update
        .effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Storage(request) => Some(request),
            _ => None,
        })
        .expect("start should read the stored selection");
    assert_eq!(
        request.operation,
        StorageOperation::Read {
            scope: StorageScope::Durable,
            key: SELECTION_KEY.into(),
        }
    );

    let loaded = app
        .resolve(&mut request, StorageOutput::Value(persisted.map(String::from)))
        .expect("read should resolve");
    for event in loaded.events {
        app.update(event, &mut model);
    }

    (app, model)
}

/// Starts a session and delivers the first listing.
fn initialized(devices: Vec<Device>, persisted: Option<&str>) -> (AppTester<App, Effect>, Model) {
    let (app, mut model) = started(persisted);
    app.update(Event::DevicesLoaded(devices), &mut model);
    (app, model)
}

#[test]
fn first_snapshot_restores_persisted_selection() {
    let (_, model) = initialized(
        vec![trackable(1), trackable(2), untrackable(3)],
        Some("[2,9,3,1]"),
    );

    assert!(model.has_devices_init());
    // 9 is gone from the fleet and 3 cannot be tracked.
    assert_eq!(model.active_device_ids(), &[DeviceId(2), DeviceId(1)]);
}

#[test]
fn restore_happens_within_the_first_listing() {
    let (app, mut model) = started(Some("[5,4]"));
    assert!(model.active_device_ids().is_empty());

    let update = app.update(Event::DevicesLoaded(vec![trackable(4), trackable(5)]), &mut model);

    assert_eq!(model.active_device_ids(), &[DeviceId(5), DeviceId(4)]);
    assert_eq!(
        App.view(&model).active_device_ids,
        vec![DeviceId(5), DeviceId(4)]
    );
    assert_eq!(durable_writes(&update.effects), vec!["[5]", "[5,4]"]);
    assert_eq!(navigations(&update.effects), vec!["/devices/5", "/devices/5,4"]);
    assert!(!storage_ops(&update.effects)
        .iter()
        .any(|op| matches!(op, StorageOperation::Read { .. })));
}

#[test]
fn absent_or_corrupt_selection_restores_nothing() {
    let (_, model) = initialized(vec![trackable(1)], None);
    assert!(model.active_device_ids().is_empty());

    let (_, model) = initialized(vec![trackable(1)], Some("not json"));
    assert!(model.active_device_ids().is_empty());
    assert!(model.errors.is_empty());
}

#[test]
fn stored_selection_arriving_late_is_ignored() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::DevicesLoaded(vec![trackable(1)]), &mut model);
    app.update(Event::SetActiveDevice(DeviceId(1)), &mut model);

    let update = app.update(
        Event::PersistedSelectionLoaded(StorageOutput::Value(Some("[7]".into()))),
        &mut model,
    );

    assert_eq!(model.active_device_ids(), &[DeviceId(1)]);
    assert_eq!(model.persisted_selection, vec![DeviceId(1)]);
    assert!(storage_ops(&update.effects).is_empty());
}

#[test]
fn reinitialization_restores_the_latest_selection() {
    let (app, mut model) = initialized(vec![trackable(1), trackable(2)], Some("[1]"));
    app.update(Event::SetActiveDevice(DeviceId(2)), &mut model);

    app.update(Event::UnsetDevicesInit, &mut model);
    assert!(model.active_device_ids().is_empty());

    let update = app.update(
        Event::DevicesLoaded(vec![trackable(1), trackable(2)]),
        &mut model,
    );

    assert_eq!(model.active_device_ids(), &[DeviceId(1), DeviceId(2)]);
    assert_eq!(durable_writes(&update.effects), vec!["[1]", "[1,2]"]);
}

#[test]
fn early_selection_is_pruned_against_first_snapshot() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    // Before the fleet is known every id is accepted and no navigation happens.
    let update = app.update(Event::SetActiveDevice(DeviceId(7)), &mut model);
    assert_eq!(durable_writes(&update.effects), vec!["[7]"]);
    assert!(navigations(&update.effects).is_empty());
    app.update(Event::SetActiveDevice(DeviceId(1)), &mut model);

    let update = app.update(
        Event::DevicesLoaded(vec![trackable(1), trackable(2)]),
        &mut model,
    );

    assert!(model.has_devices_init());
    assert_eq!(model.active_device_ids(), &[DeviceId(1)]);
    assert_eq!(durable_writes(&update.effects), vec!["[1]"]);
    assert_eq!(navigations(&update.effects), vec!["/devices/1"]);
    assert!(
        !storage_ops(&update.effects)
            .iter()
            .any(|op| matches!(op, StorageOperation::Read { .. })),
        "an existing selection is never replaced by the stored one"
    );
}

#[test]
fn early_untrackable_selection_is_pruned_against_first_snapshot() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::SetActiveDevice(DeviceId(2)), &mut model);
    app.update(Event::SetActiveDevice(DeviceId(1)), &mut model);

    let update = app.update(
        Event::DevicesLoaded(vec![trackable(1), untrackable(2)]),
        &mut model,
    );

    assert_eq!(model.active_device_ids(), &[DeviceId(1)]);
    assert_eq!(durable_writes(&update.effects), vec!["[1]"]);
}

#[test]
fn identical_snapshot_is_a_noop() {
    let devices = vec![trackable(1), trackable(2)];
    let (app, mut model) = initialized(devices.clone(), None);

    let update = app.update(Event::DevicesLoaded(devices.clone()), &mut model);

    assert_eq!(model.devices(), devices.as_slice());
    assert!(storage_ops(&update.effects).is_empty());
    assert!(navigations(&update.effects).is_empty());
}

#[test]
fn later_snapshots_only_replace_devices() {
    let (app, mut model) = initialized(vec![trackable(1), trackable(2)], Some("[1,2]"));

    let update = app.update(Event::DevicesLoaded(vec![trackable(2)]), &mut model);

    assert_eq!(model.devices(), &[trackable(2)]);
    // Pruning only happens on the first snapshot; deltas carry the rest.
    assert_eq!(model.active_device_ids(), &[DeviceId(1), DeviceId(2)]);
    assert!(storage_ops(&update.effects).is_empty());
}

#[test]
fn selecting_untrackable_device_is_ignored() {
    let (app, mut model) = initialized(vec![trackable(1), untrackable(2)], None);

    let update = app.update(Event::SetActiveDevice(DeviceId(2)), &mut model);
    assert!(model.active_device_ids().is_empty());
    assert!(storage_ops(&update.effects).is_empty());
    assert!(navigations(&update.effects).is_empty());
    assert!(notifications(&update.effects).is_empty());

    let update = app.update(Event::SetActiveDevice(DeviceId(99)), &mut model);
    assert!(model.active_device_ids().is_empty());
    assert!(storage_ops(&update.effects).is_empty());
}

#[test]
fn selecting_twice_keeps_one_entry() {
    let (app, mut model) = initialized(vec![trackable(1)], None);

    app.update(Event::SetActiveDevice(DeviceId(1)), &mut model);
    let update = app.update(Event::SetActiveDevice(DeviceId(1)), &mut model);

    assert_eq!(model.active_device_ids(), &[DeviceId(1)]);
    assert!(durable_writes(&update.effects).is_empty());
}

#[test]
fn unset_navigates_to_remaining_or_root() {
    let (app, mut model) = initialized(vec![trackable(1), trackable(2)], Some("[1,2]"));

    let update = app.update(Event::UnsetActiveDevice(DeviceId(1)), &mut model);
    assert_eq!(model.active_device_ids(), &[DeviceId(2)]);
    assert_eq!(durable_writes(&update.effects), vec!["[2]"]);
    assert_eq!(navigations(&update.effects), vec!["/devices/2"]);

    let update = app.update(Event::UnsetActiveDevice(DeviceId(2)), &mut model);
    assert!(model.active_device_ids().is_empty());
    assert_eq!(durable_writes(&update.effects), vec!["[]"]);
    assert_eq!(navigations(&update.effects), vec!["/"]);
}

#[test]
fn unset_devices_init_clears_memory_but_not_storage() {
    let (app, mut model) = initialized(vec![trackable(1)], Some("[1]"));

    let update = app.update(Event::UnsetDevicesInit, &mut model);

    assert!(!model.has_devices_init());
    assert!(model.devices().is_empty());
    assert!(model.active_device_ids().is_empty());
    assert!(storage_ops(&update.effects).is_empty());
}

#[test]
fn set_devices_init_marks_initialized() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::SetDevicesInit, &mut model);

    assert!(model.has_devices_init());
    assert!(renders(&update.effects));
}

#[test]
fn created_then_updated_yields_one_merged_record() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::DevicesUpdated(DeviceDelta::Created(Device::new(5))),
        &mut model,
    );
    app.update(
        Event::DevicesUpdated(DeviceDelta::Updated(
            Device::new(5).with_attribute("name", "X"),
        )),
        &mut model,
    );

    assert_eq!(model.devices().len(), 1);
    assert_eq!(model.devices()[0].id, DeviceId(5));
    assert_eq!(model.devices()[0].attribute("name"), Some(&json!("X")));
}

#[test]
fn deleted_delta_removes_record() {
    let (app, mut model) = initialized(vec![trackable(1), trackable(2)], None);

    app.update(
        Event::DevicesUpdated(DeviceDelta::Deleted(Device::new(1))),
        &mut model,
    );

    assert_eq!(model.devices(), &[trackable(2)]);
}

#[test]
fn devices_success_slot_replaces_on_difference() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::succeeded("devices", json!([{"id": 1, "messages_ttl": 10}])),
        &mut model,
    );
    assert_eq!(model.devices(), &[Device::new(1).with_attribute("messages_ttl", 10)]);
    // The generic success path never touches initialization.
    assert!(!model.has_devices_init());

    app.update(Event::succeeded("devices", json!({"broken": true})), &mut model);
    assert_eq!(model.devices().len(), 1);
}
