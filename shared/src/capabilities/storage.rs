use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Where a value lives on the shell side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageScope {
    /// Survives restarts (browser `localStorage`, app preferences).
    Durable,
    /// Dropped when the session ends.
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StorageOperation {
    Read {
        scope: StorageScope,
        key: String,
    },
    Write {
        scope: StorageScope,
        key: String,
        value: String,
    },
    Remove {
        scope: StorageScope,
        key: String,
    },
}

impl StorageOperation {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. } | Self::Write { key, .. } | Self::Remove { key, .. } => key,
        }
    }

    #[must_use]
    pub const fn scope(&self) -> StorageScope {
        match self {
            Self::Read { scope, .. } | Self::Write { scope, .. } | Self::Remove { scope, .. } => {
                *scope
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageOutput {
    /// Answer to `Read`; `None` when the key is absent.
    Value(Option<String>),
    /// Writes and removals are never answered; kept so a shell can ack them anyway.
    Done,
}

impl Operation for StorageOperation {
    type Output = StorageOutput;
}

/// Key/value storage owned by the shell.
///
/// Writes and removals are fire-and-forget. Reads round-trip through the shell
/// and come back as an event built by the caller's closure.
pub struct Storage<Ev> {
    context: CapabilityContext<StorageOperation, Ev>,
}

impl<Ev> Capability<Ev> for Storage<Ev> {
    type Operation = StorageOperation;
    type MappedSelf<MappedEv> = Storage<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Storage::new(self.context.map_event(f))
    }
}

impl<Ev> Storage<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<StorageOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn read<F>(&self, scope: StorageScope, key: impl Into<String>, make_event: F)
    where
        F: FnOnce(StorageOutput) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        let operation = StorageOperation::Read {
            scope,
            key: key.into(),
        };
        self.context.spawn(async move {
            let output = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(output));
        });
    }

    pub fn write(&self, scope: StorageScope, key: impl Into<String>, value: impl Into<String>) {
        self.notify(StorageOperation::Write {
            scope,
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn remove(&self, scope: StorageScope, key: impl Into<String>) {
        self.notify(StorageOperation::Remove {
            scope,
            key: key.into(),
        });
    }

    fn notify(&self, operation: StorageOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
