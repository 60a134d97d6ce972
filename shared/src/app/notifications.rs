use tracing::debug;

use crate::capabilities::{Capabilities, Severity};
use crate::model::Model;

pub(super) fn add_error(model: &mut Model, caps: &Capabilities, message: String) {
    caps.notify.show(
        model
            .config
            .error_notification
            .build(message.clone(), Severity::Negative),
    );
    model.record_error(message);
    debug!(
        unseen = model.new_notification_counter,
        logged = model.errors.len(),
        "error recorded"
    );
}

pub(super) fn clear_errors(model: &mut Model) {
    model.errors.clear();
}

pub(super) fn clear_counter(model: &mut Model) {
    model.new_notification_counter = 0;
}
