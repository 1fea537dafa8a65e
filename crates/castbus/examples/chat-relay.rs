//! Chat relay example — two contexts exchanging named messages on one topic.
//!
//! Run with:
//!   cargo run --example chat-relay

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use castbus::hub::{BusConfig, Hooks, Hub};

#[derive(Debug, Serialize, Deserialize)]
struct ChatLine {
    from: String,
    text: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let hub = Hub::new();

    let alice = hub.attach("chat")?;
    let hooks = Hooks {
        on_error: Some(Arc::new(|envelope| {
            eprintln!("[bob] nobody listening for '{}'", envelope.message);
        })),
        ..Hooks::default()
    };
    let bob = hub.attach_with("chat", hooks, BusConfig::default())?;

    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    bob.on_message_typed::<ChatLine, _>("chat.line", move |line| {
        eprintln!("[bob] {}: {}", line.from, line.text);
        let _ = done_tx.send(());
    })?;

    alice.post(
        "chat.line",
        &ChatLine {
            from: "alice".to_string(),
            text: "hello over the topic".to_string(),
        },
    )?;
    done_rx.recv().await;

    // A name nobody registered lands in bob's error hook instead.
    alice.post("chat.typing", &serde_json::json!(true))?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    alice.close();
    bob.close();
    Ok(())
}
