use plaza_core::ServerEvent;

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::TestParticipant;

#[tokio::test]
async fn test_leave_is_idempotent() {
    init_tracing();

    let registry = create_test_registry();
    let leaver = TestParticipant::join(&registry, "Leaver").await.unwrap();
    let mut watcher = TestParticipant::join(&registry, "Watcher").await.unwrap();

    assert!(registry.leave(leaver.id).await.unwrap());
    assert!(!registry.leave(leaver.id).await.unwrap());

    let removals: Vec<_> = watcher
        .drain()
        .into_iter()
        .filter(|e| matches!(e, ServerEvent::PlayerDisconnected(id) if *id == leaver.id))
        .collect();
    assert_eq!(removals.len(), 1);
    assert_eq!(registry.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_leave_of_unknown_id_is_silent() {
    init_tracing();

    let registry = create_test_registry();
    let mut watcher = TestParticipant::join(&registry, "Watcher").await.unwrap();

    assert!(!registry.leave(plaza_core::ParticipantId::new()).await.unwrap());
    watcher.assert_no_event();
}
