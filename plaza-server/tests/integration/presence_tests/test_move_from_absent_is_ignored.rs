use plaza_core::{ParticipantId, Position};

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::TestParticipant;

#[tokio::test]
async fn test_move_from_absent_is_ignored() {
    init_tracing();

    let registry = create_test_registry();
    let mut watcher = TestParticipant::join(&registry, "Watcher").await.unwrap();
    let before = registry.snapshot().await.unwrap();

    let moved = registry
        .move_to(ParticipantId::new(), Position::new(10, 10))
        .await
        .expect("Move on an absent id must not fail");

    assert!(!moved);
    watcher.assert_no_event();
    assert_eq!(registry.snapshot().await.unwrap(), before);
}
