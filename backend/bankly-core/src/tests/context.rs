use crate::context::RequestContext;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// **VALUE**: Verifies that a fresh context is neither cancelled nor correlated.
#[test]
fn given_new_context_when_inspected_then_clean() {
    let ctx = RequestContext::new();

    assert!(!ctx.is_cancelled());
    assert_eq!(ctx.correlation_id(), None);
}

/// **VALUE**: Verifies that cancelling the parent cancels the child but not the
/// other way around.
///
/// **WHY THIS MATTERS**: A caller-wide shutdown must stop every call, while a
/// single call's timeout must not stop its siblings.
#[test]
fn given_child_context_when_parent_or_child_cancelled_then_propagates_downward_only() {
    // GIVEN: A parent with two children
    let parent = RequestContext::new().with_new_correlation_id();
    let first = parent.child();
    let second = parent.child();

    // WHEN: Cancelling one child
    first.cancel();

    // THEN: Parent and sibling keep running
    assert!(first.is_cancelled());
    assert!(!parent.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(second.correlation_id(), parent.correlation_id());

    // WHEN: Cancelling the parent
    parent.cancel();

    // THEN: The remaining child is cancelled too
    assert!(second.is_cancelled());
}

/// **VALUE**: Verifies that an external token drives the context.
#[tokio::test]
async fn given_external_token_when_cancelled_then_context_resolves() {
    let token = CancellationToken::new();
    let ctx = RequestContext::with_cancellation(token.clone());

    token.cancel();
    ctx.cancelled().await;

    assert!(ctx.is_cancelled());
    assert!(ctx.cancellation_token().is_cancelled());
}

/// **VALUE**: Verifies that an explicit correlation id is kept as given.
#[test]
fn given_correlation_id_when_set_then_returned() {
    let id = Uuid::new_v4();

    let ctx = RequestContext::new().with_correlation_id(id);

    assert_eq!(ctx.correlation_id(), Some(id));
}
