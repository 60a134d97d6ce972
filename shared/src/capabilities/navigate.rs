use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NavigateOperation {
    Push { path: String },
}

impl Operation for NavigateOperation {
    type Output = ();
}

/// Route for a set of tracked devices: `/devices/1,2,3`, or `/` when empty.
#[must_use]
pub fn devices_path<T: std::fmt::Display>(ids: &[T]) -> String {
    if ids.is_empty() {
        return ROOT_PATH.to_string();
    }
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("/devices/{joined}")
}

/// Navigation requests for the shell's router.
pub struct Navigate<Ev> {
    context: CapabilityContext<NavigateOperation, Ev>,
}

impl<Ev> Capability<Ev> for Navigate<Ev> {
    type Operation = NavigateOperation;
    type MappedSelf<MappedEv> = Navigate<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigate::new(self.context.map_event(f))
    }
}

impl<Ev> Navigate<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<NavigateOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn push(&self, path: impl Into<String>) {
        let ctx = self.context.clone();
        let operation = NavigateOperation::Push { path: path.into() };
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
