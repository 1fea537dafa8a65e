//! Multi-topic example — independent topics under one hub, plus
//! cross-context callback removal.
//!
//! Run with:
//!   cargo run --example multi-topic

use std::time::Duration;

use serde_json::json;

use castbus::hub::Hub;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let hub = Hub::new();

    let metrics_writer = hub.attach("metrics")?;
    let metrics_reader = hub.attach("metrics")?;
    let audit_writer = hub.attach("audit")?;
    let audit_reader = hub.attach("audit")?;

    metrics_reader.on_message("metrics.sample", |envelope| {
        eprintln!("[metrics] sample = {}", envelope.data);
    })?;
    audit_reader.on_message("audit.event", |envelope| {
        eprintln!("[audit] {}", envelope.data);
    })?;

    // Topics are isolated: each post only reaches its own topic's buses.
    metrics_writer.post("metrics.sample", &json!({"cpu": 0.42}))?;
    audit_writer.post("audit.event", &json!("login accepted"))?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Cross-context removal: the writer retires the name, the reader's
    // registration disappears once the control message is dispatched.
    metrics_writer.remove_message("metrics.sample")?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    eprintln!(
        "[metrics] reader still listening? {}",
        metrics_reader.has_listeners("metrics.sample")
    );

    eprintln!("[hub] topics: {:?}", hub.topic_names());
    Ok(())
}
