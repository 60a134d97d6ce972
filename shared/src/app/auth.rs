use tracing::{info, warn};

use crate::capabilities::{Capabilities, StorageScope};
use crate::error::ClientError;
use crate::model::{AuthToken, Model};

pub(super) fn set_token(model: &mut Model, caps: &Capabilities, raw: &str) {
    match AuthToken::parse(raw, &model.config.credential_prefix) {
        Ok(token) => {
            caps.credential
                .install(model.config.authorization_for(token.expose()));
            caps.storage.write(
                StorageScope::Session,
                model.config.token_session_key.as_str(),
                token.expose(),
            );
            model.token = Some(token);
            info!("token accepted");
        }
        Err(e) => {
            warn!(error = %ClientError::from(e), "token rejected");
            clear_token(model, caps);
        }
    }
}

/// Forgets the token everywhere: session storage, transport and model.
///
/// Without a token the realtime channel cannot be meaningfully connected, so
/// a pending socket-offline flag is dropped as well.
pub(super) fn clear_token(model: &mut Model, caps: &Capabilities) {
    caps.storage.remove(
        StorageScope::Session,
        model.config.token_session_key.as_str(),
    );
    caps.credential.revoke();
    model.socket_offline = false;
    model.token = None;
}
