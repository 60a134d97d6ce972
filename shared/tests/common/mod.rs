#![allow(dead_code)]

use shared::capabilities::{CredentialOperation, NavigateOperation, Notification, StorageOperation};
use shared::{Device, Effect};

pub const TTL: &str = "messages_ttl";

pub fn trackable(id: u64) -> Device {
    Device::new(id)
        .with_attribute("name", format!("device-{id}"))
        .with_attribute(TTL, 86_400)
}

pub fn untrackable(id: u64) -> Device {
    Device::new(id)
        .with_attribute("name", format!("device-{id}"))
        .with_attribute(TTL, 0)
}

pub fn storage_ops(effects: &[Effect]) -> Vec<StorageOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Storage(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

pub fn navigations(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Navigate(request) => match &request.operation {
                NavigateOperation::Push { path } => Some(path.clone()),
            },
            _ => None,
        })
        .collect()
}

pub fn notifications(effects: &[Effect]) -> Vec<Notification> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Notify(request) => Some(request.operation.0.clone()),
            _ => None,
        })
        .collect()
}

pub fn credentials(effects: &[Effect]) -> Vec<CredentialOperation> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Credential(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

pub fn renders(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Render(_)))
}
