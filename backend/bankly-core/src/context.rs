//! Per-call context: cancellation and correlation id.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Carried through every pipeline operation.
///
/// Cancelling the token aborts the token exchange and the API call it
/// guards. The correlation id, when set, is sent as `x-correlation-id` so
/// upstream logs can be joined with the caller's.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
    correlation_id: Option<Uuid>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context cancelled together with `token`.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation: token,
            correlation_id: None,
        }
    }

    #[must_use]
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Attach a fresh random correlation id.
    #[must_use]
    pub fn with_new_correlation_id(self) -> Self {
        self.with_correlation_id(Uuid::new_v4())
    }

    /// A context cancelled when this one is, but cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            correlation_id: self.correlation_id,
        }
    }

    pub fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub(crate) async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}
