mod credential;
mod navigate;
mod notify;
mod storage;

pub use self::credential::{Credential, CredentialOperation};
pub use self::navigate::{devices_path, Navigate, NavigateOperation, ROOT_PATH};
pub use self::notify::{Notification, Notify, NotifyOperation, Severity};
pub use self::storage::{Storage, StorageOperation, StorageOutput, StorageScope};

// Crux's built-in Render capability covers view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

/// Everything the core asks of the shell.
///
/// The derived `Effect` enum is the outbox: each variant carries one request
/// the shell has to carry out after `update` returns.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub storage: Storage<Event>,
    pub credential: Credential<Event>,
    pub navigate: Navigate<Event>,
    pub notify: Notify<Event>,
    pub render: Render<Event>,
}
