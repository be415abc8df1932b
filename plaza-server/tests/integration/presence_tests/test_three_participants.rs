use plaza_core::{Position, ServerEvent};
use plaza_server::{SPAWN_X, SPAWN_Y, SignalingRouter};
use serde_json::value::RawValue;

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::TestParticipant;

#[tokio::test]
async fn test_three_participants() {
    init_tracing();

    let registry = create_test_registry();
    let mut x = TestParticipant::join(&registry, "X").await.unwrap();
    let mut y = TestParticipant::join(&registry, "Y").await.unwrap();
    x.drain();
    let mut z = TestParticipant::join(&registry, "Z").await.unwrap();

    // Z sees everyone once, itself included
    assert_eq!(z.roster.len(), 3);
    for id in [x.id, y.id, z.id] {
        assert!(z.roster.contains_key(&id));
    }

    // X and Y each get one newPlayer(Z) with a spawn inside the room
    for watcher in [&mut x, &mut y] {
        match watcher.next_event().unwrap() {
            ServerEvent::NewPlayer(p) => {
                assert_eq!(p.id, z.id);
                assert!(SPAWN_X.contains(&p.position.x));
                assert!(SPAWN_Y.contains(&p.position.y));
            }
            other => panic!("Expected newPlayer, got {:?}", other),
        }
        watcher.assert_no_event();
    }

    // X moves: Y and Z are told once, X is not
    assert!(registry.move_to(x.id, Position::new(300, 400)).await.unwrap());
    for watcher in [&mut y, &mut z] {
        match watcher.next_event().unwrap() {
            ServerEvent::PlayerMoved(p) => {
                assert_eq!(p.id, x.id);
                assert_eq!(p.position, Position::new(300, 400));
            }
            other => panic!("Expected playerMoved, got {:?}", other),
        }
        watcher.assert_no_event();
    }
    x.assert_no_event();

    // X leaves: Y and Z are told once, later relays to X go nowhere
    let x_id = x.id;
    drop(x);
    assert!(registry.leave(x_id).await.unwrap());
    for watcher in [&mut y, &mut z] {
        match watcher.next_event().unwrap() {
            ServerEvent::PlayerDisconnected(id) => assert_eq!(id, x_id),
            other => panic!("Expected playerDisconnected, got {:?}", other),
        }
        watcher.assert_no_event();
    }

    let router = SignalingRouter::new(registry.clone());
    let candidate = RawValue::from_string(r#"{"candidate":"c"}"#.to_owned()).unwrap();
    let relayed = router
        .relay_ice_candidate(y.id, x_id, candidate)
        .await
        .expect("Relay to a departed peer must not fail");
    assert!(!relayed);
    y.assert_no_event();
    z.assert_no_event();
}
