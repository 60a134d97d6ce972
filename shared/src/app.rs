mod auth;
mod connectivity;
mod fleet;
mod notifications;
mod requests;
mod selection;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::capabilities::Capabilities;
use crate::event::Event;
use crate::model::{Device, DeviceId, Model, TokenState};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub devices: Vec<Device>,
    pub active_device_ids: Vec<DeviceId>,
    pub has_devices_init: bool,
    pub token_state: TokenState,
    pub offline: bool,
    pub socket_offline: bool,
    pub errors: Vec<String>,
    pub new_notification_counter: u32,
    pub resources: BTreeMap<String, Value>,
}

/// The client core: the only place where [`Model`] is mutated.
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[instrument(skip_all, fields(event = event.name()))]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::Configure(config) => model.config = *config,
            Event::Start => {
                fleet::start(model, caps);
                return;
            }
            Event::PersistedSelectionLoaded(output) => fleet::selection_loaded(model, output),

            Event::RequestStarted => {
                requests::started();
                return;
            }
            Event::RequestSucceeded { kind, result } => {
                requests::succeeded(model, caps, kind, result);
            }
            Event::RequestFailed(failure) => connectivity::failed(model, caps, failure),

            Event::DevicesLoaded(devices) => fleet::devices_loaded(model, caps, devices),
            Event::DevicesUpdated(delta) => fleet::devices_updated(model, delta),

            Event::SetActiveDevice(id) => selection::set_active(model, caps, id),
            Event::UnsetActiveDevice(id) => selection::unset_active(model, caps, id),
            Event::SetDevicesInit => selection::mark_initialized(model),
            Event::UnsetDevicesInit => selection::mark_uninitialized(model),

            Event::SetToken(raw) => auth::set_token(model, caps, &raw),
            Event::ClearToken => auth::clear_token(model, caps),

            Event::AddError(message) => notifications::add_error(model, caps, message),
            Event::ClearErrors => notifications::clear_errors(model),
            Event::ClearNotificationCounter => notifications::clear_counter(model),

            Event::SetOffline(flag) => connectivity::set_offline(model, flag),
            Event::SetSocketOffline(flag) => connectivity::set_socket_offline(model, flag),
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            devices: model.fleet.devices.clone(),
            active_device_ids: model.fleet.active_device_ids.clone(),
            has_devices_init: model.fleet.has_devices_init,
            token_state: model.token_state(),
            offline: model.offline,
            socket_offline: model.socket_offline,
            errors: model.errors.clone(),
            new_notification_counter: model.new_notification_counter,
            resources: model.resources.clone(),
        }
    }
}
