use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Updates to the credential the transport attaches to outgoing requests.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CredentialOperation {
    Install { authorization: String },
    Revoke,
}

// Keep the header value out of logs.
impl std::fmt::Debug for CredentialOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Install { .. } => f
                .debug_struct("Install")
                .field("authorization", &"[REDACTED]")
                .finish(),
            Self::Revoke => f.write_str("Revoke"),
        }
    }
}

impl Operation for CredentialOperation {
    type Output = ();
}

pub struct Credential<Ev> {
    context: CapabilityContext<CredentialOperation, Ev>,
}

impl<Ev> Capability<Ev> for Credential<Ev> {
    type Operation = CredentialOperation;
    type MappedSelf<MappedEv> = Credential<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Credential::new(self.context.map_event(f))
    }
}

impl<Ev> Credential<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<CredentialOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn install(&self, authorization: String) {
        self.send(CredentialOperation::Install { authorization });
    }

    pub fn revoke(&self) {
        self.send(CredentialOperation::Revoke);
    }

    fn send(&self, operation: CredentialOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
