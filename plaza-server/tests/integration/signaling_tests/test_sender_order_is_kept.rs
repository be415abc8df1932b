use plaza_core::ServerEvent;

use crate::integration::{init_tracing, spawn_test_server};
use crate::utils::TestClient;

/// A burst of moves with a chat line in the middle reaches the other side
/// in the order it was sent.
#[tokio::test]
async fn test_sender_order_is_kept() {
    init_tracing();

    let (addr, state) = spawn_test_server().await.expect("Failed to start server");

    let mut walker = TestClient::connect(addr, "Walker").await.unwrap();
    let mut watcher = TestClient::connect(addr, "Watcher").await.unwrap();
    walker.next_event().await.unwrap();

    for step in 0..5 {
        walker.move_to(200 + step, 300).await.unwrap();
    }
    walker.chat("halfway").await.unwrap();
    for step in 5..10 {
        walker.move_to(200 + step, 300).await.unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..11 {
        match watcher.next_event().await.expect("Event went missing") {
            ServerEvent::PlayerMoved(p) => {
                assert_eq!(p.id, walker.id);
                seen.push(format!("move {}", p.position.x));
            }
            ServerEvent::Chat(line) => {
                assert_eq!(line.from, walker.id);
                seen.push(format!("chat {}", line.text));
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    let mut expected: Vec<String> = (200..205).map(|x| format!("move {}", x)).collect();
    expected.push("chat halfway".to_owned());
    expected.extend((205..210).map(|x| format!("move {}", x)));
    assert_eq!(seen, expected);
    watcher.expect_silence().await.unwrap();

    // last write wins
    let roster = state.registry.snapshot().await.unwrap();
    assert_eq!(roster[&walker.id].position.x, 209);
}
