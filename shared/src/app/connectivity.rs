use tracing::{debug, info, warn};

use super::{auth, notifications, selection};
use crate::capabilities::Capabilities;
use crate::event::{Failure, HttpFailureKind, ProtocolFailureKind};
use crate::model::Model;

/// Absorbs a transport failure into state changes and notifications.
pub(super) fn failed(model: &mut Model, caps: &Capabilities, failure: Failure) {
    debug!(?failure, "request failed");

    match failure {
        Failure::Http { status, errors } => match HttpFailureKind::from_status(status) {
            HttpFailureKind::NetworkLoss => {
                warn!("network unreachable, dropping session state");
                set_offline(model, true);
                selection::mark_uninitialized(model);
                auth::clear_token(model, caps);
            }
            HttpFailureKind::Unauthorized => {
                info!("credential rejected by server");
                auth::clear_token(model, caps);
            }
            HttpFailureKind::Server(status) => {
                debug!(status, reasons = errors.len(), "server error");
                for error in errors {
                    notifications::add_error(model, caps, error.reason);
                }
            }
        },
        Failure::Protocol { code, message } => match ProtocolFailureKind::from_code(code) {
            ProtocolFailureKind::CredentialRejected => {
                if model.is_authenticated() {
                    auth::clear_token(model, caps);
                }
                notifications::add_error(model, caps, message);
            }
            ProtocolFailureKind::Unclassified(code) => {
                warn!(code, %message, "unclassified protocol failure dropped");
            }
        },
        Failure::Generic { message } => notifications::add_error(model, caps, message),
    }
}

pub(super) fn set_offline(model: &mut Model, flag: bool) {
    model.offline = flag;
}

pub(super) fn set_socket_offline(model: &mut Model, flag: bool) {
    model.socket_offline = flag;
}
