use thiserror::Error;

use crate::capabilities::StorageOutput;

/// Rejection reasons for an incoming token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("token contains characters outside [A-Za-z0-9]")]
    InvalidCharacters,
}

/// Internal failures of the client core.
///
/// None of these leave `update`: they are logged and the offending input is
/// dropped.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("persisted selection under '{key}' is not a list of device ids: {source}")]
    CorruptSelection {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("device payload could not be decoded: {0}")]
    DevicePayload(#[source] serde_json::Error),

    #[error("result for '{slot}' does not fit the field: {source}")]
    SlotPayload {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected storage answer for '{key}': {output:?}")]
    UnexpectedStorageOutput { key: String, output: StorageOutput },

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type ClientResult<T> = Result<T, ClientError>;
