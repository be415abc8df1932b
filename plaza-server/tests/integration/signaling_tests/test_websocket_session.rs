use plaza_core::{ClientMessage, ServerEvent, SignalEnvelope, SignalKind};
use serde_json::value::RawValue;

use crate::integration::{init_tracing, spawn_test_server};
use crate::utils::TestClient;

/// Two browsers meet, move, chat, negotiate a peer connection and part.
#[tokio::test]
async fn test_websocket_session() {
    init_tracing();

    let (addr, _state) = spawn_test_server().await.expect("Failed to start server");

    let mut alice = TestClient::connect(addr, "Alice").await.unwrap();
    let mut bob = TestClient::connect(addr, "Bob").await.unwrap();
    assert!(matches!(
        alice.next_event().await.unwrap(),
        ServerEvent::NewPlayer(p) if p.id == bob.id
    ));

    // movement goes to others only
    alice.move_to(640, 480).await.unwrap();
    match bob.next_event().await.unwrap() {
        ServerEvent::PlayerMoved(p) => {
            assert_eq!(p.id, alice.id);
            assert_eq!((p.position.x, p.position.y), (640, 480));
        }
        other => panic!("Expected playerMoved, got {:?}", other),
    }

    // chat comes back to the sender too
    alice.chat("hi bob").await.unwrap();
    for client in [&mut alice, &mut bob] {
        match client.next_event().await.unwrap() {
            ServerEvent::Chat(line) => {
                assert_eq!(line.sender, "Alice");
                assert_eq!(line.text, "hi bob");
            }
            other => panic!("Expected chatMessage, got {:?}", other),
        }
    }

    // older clients send `message` and a sender name the server ignores
    bob.send_raw(r#"{"event":"chatMessage","data":{"sender":"spoofed","message":"hey"}}"#)
        .await
        .unwrap();
    for client in [&mut alice, &mut bob] {
        match client.next_event().await.unwrap() {
            ServerEvent::Chat(line) => {
                assert_eq!(line.sender, "Bob");
                assert_eq!(line.text, "hey");
            }
            other => panic!("Expected chatMessage, got {:?}", other),
        }
    }

    // offer, answer and candidate are relayed verbatim with the sender stamped
    let steps = [
        (SignalKind::Offer, r#"{"type":"offer","sdp":"v=0"}"#),
        (SignalKind::Answer, r#"{"type":"answer","sdp":"v=0"}"#),
        (SignalKind::IceCandidate, r#"{"candidate":"candidate:1 1 udp 1 10.0.0.1 9 typ host","sdpMid":"0"}"#),
    ];
    for (kind, blob) in steps {
        let (from, to) = match kind {
            SignalKind::Answer => (&mut bob, &mut alice),
            _ => (&mut alice, &mut bob),
        };
        let payload = RawValue::from_string(blob.to_owned()).unwrap();
        let msg = ClientMessage::Signal(SignalEnvelope::new(to.id, kind, payload));
        from.send(&msg).await.unwrap();

        match to.next_event().await.unwrap() {
            ServerEvent::Signal {
                kind: got,
                from: sender,
                payload,
            } => {
                assert_eq!(got, kind);
                assert_eq!(sender, from.id);
                assert_eq!(payload.get(), blob);
            }
            other => panic!("Expected {}, got {:?}", kind.event_name(), other),
        }
        from.expect_silence().await.unwrap();
    }

    let bob_id = bob.id;
    bob.close().await.unwrap();
    match alice.next_event().await.unwrap() {
        ServerEvent::PlayerDisconnected(id) => assert_eq!(id, bob_id),
        other => panic!("Expected playerDisconnected, got {:?}", other),
    }
}
