use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{Result, TransportError};

/// Default number of in-flight transmissions a topic buffers per endpoint.
pub const DEFAULT_TOPIC_CAPACITY: usize = 1024;

/// One payload in flight: originating endpoint id plus the serialized text.
type Transmission = (u64, Arc<str>);

/// A named broadcast lane shared by any number of endpoints.
///
/// Delivery contract: a payload sent through one endpoint reaches every
/// other endpoint attached to the topic, in send order per sender. The
/// sending endpoint never receives its own payloads.
///
/// `Topic` is cheap to clone; clones share the same lane.
#[derive(Debug, Clone)]
pub struct Topic {
    tx: broadcast::Sender<Transmission>,
    next_endpoint_id: Arc<AtomicU64>,
}

impl Topic {
    /// Create a topic buffering up to `capacity` in-flight transmissions
    /// per endpoint. An endpoint that falls further behind observes
    /// [`TransportError::Lagged`] and resumes from the oldest retained
    /// transmission.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            next_endpoint_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Attach a new endpoint to this topic.
    pub fn endpoint(&self) -> Endpoint {
        let id = self.next_endpoint_id.fetch_add(1, Ordering::Relaxed);
        let rx = self.tx.subscribe();
        tracing::debug!(endpoint = id, "endpoint attached to topic");
        Endpoint {
            sender: EndpointSender {
                id,
                tx: self.tx.clone(),
            },
            receiver: EndpointReceiver { id, rx },
        }
    }

    /// Number of live endpoint receivers attached to this topic.
    pub fn endpoint_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Topic {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_CAPACITY)
    }
}

/// One context's attachment to a topic. Split into halves so the sending
/// side can live on the caller while the receiving side is consumed by a
/// delivery loop.
#[derive(Debug)]
pub struct Endpoint {
    sender: EndpointSender,
    receiver: EndpointReceiver,
}

impl Endpoint {
    /// Identifier of this endpoint, unique within its topic.
    pub fn id(&self) -> u64 {
        self.sender.id
    }

    /// Split into independently owned send and receive halves.
    pub fn split(self) -> (EndpointSender, EndpointReceiver) {
        (self.sender, self.receiver)
    }
}

/// Sending half of an endpoint.
#[derive(Debug, Clone)]
pub struct EndpointSender {
    id: u64,
    tx: broadcast::Sender<Transmission>,
}

impl EndpointSender {
    /// Queue a payload for delivery to every other endpoint on the topic.
    ///
    /// Returns immediately after enqueueing; there is no delivery
    /// confirmation. Fails with [`TransportError::Closed`] only when no
    /// endpoint receiver is left on the topic.
    pub fn send(&self, payload: impl Into<Arc<str>>) -> Result<()> {
        self.tx
            .send((self.id, payload.into()))
            .map(|_| ())
            .map_err(|_| TransportError::Closed)
    }

    /// Identifier of the endpoint this half belongs to.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Receiving half of an endpoint.
#[derive(Debug)]
pub struct EndpointReceiver {
    id: u64,
    rx: broadcast::Receiver<Transmission>,
}

impl EndpointReceiver {
    /// Wait for the next payload from another endpoint.
    ///
    /// Payloads this endpoint sent itself are filtered out. A receiver that
    /// fell behind the topic buffer reports [`TransportError::Lagged`] once,
    /// then resumes from the oldest retained transmission on the next call.
    pub async fn recv(&mut self) -> Result<Arc<str>> {
        loop {
            match self.rx.recv().await {
                Ok((origin, _)) if origin == self.id => continue,
                Ok((_, payload)) => return Ok(payload),
                Err(RecvError::Lagged(skipped)) => {
                    return Err(TransportError::Lagged { skipped })
                }
                Err(RecvError::Closed) => return Err(TransportError::Closed),
            }
        }
    }

    /// Identifier of the endpoint this half belongs to.
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_other_endpoint() {
        let topic = Topic::default();
        let (a_tx, _a_rx) = topic.endpoint().split();
        let (_b_tx, mut b_rx) = topic.endpoint().split();

        a_tx.send("hello").expect("send should succeed");
        let payload = b_rx.recv().await.expect("recv should succeed");
        assert_eq!(payload.as_ref(), "hello");
    }

    #[tokio::test]
    async fn never_echoes_to_sender() {
        let topic = Topic::default();
        let (a_tx, mut a_rx) = topic.endpoint().split();
        let (b_tx, _b_rx) = topic.endpoint().split();

        a_tx.send("from-a").expect("send should succeed");
        b_tx.send("from-b").expect("send should succeed");

        // a must see only b's payload, its own send is filtered.
        let payload = a_rx.recv().await.expect("recv should succeed");
        assert_eq!(payload.as_ref(), "from-b");
    }

    #[tokio::test]
    async fn fans_out_to_every_other_endpoint() {
        let topic = Topic::default();
        let (tx, _rx) = topic.endpoint().split();
        let mut receivers: Vec<EndpointReceiver> =
            (0..3).map(|_| topic.endpoint().split().1).collect();

        tx.send("fan-out").expect("send should succeed");

        for rx in &mut receivers {
            let payload = rx.recv().await.expect("recv should succeed");
            assert_eq!(payload.as_ref(), "fan-out");
        }
    }

    #[tokio::test]
    async fn preserves_per_sender_order() {
        let topic = Topic::default();
        let (tx, _rx) = topic.endpoint().split();
        let (_other_tx, mut rx) = topic.endpoint().split();

        for i in 0..16 {
            tx.send(format!("msg-{i}")).expect("send should succeed");
        }
        for i in 0..16 {
            let payload = rx.recv().await.expect("recv should succeed");
            assert_eq!(payload.as_ref(), format!("msg-{i}"));
        }
    }

    #[tokio::test]
    async fn lagged_receiver_reports_then_resumes() {
        let topic = Topic::new(2);
        let (tx, _rx) = topic.endpoint().split();
        let (_other_tx, mut rx) = topic.endpoint().split();

        for i in 0..5 {
            tx.send(format!("burst-{i}")).expect("send should succeed");
        }

        let err = rx.recv().await.expect_err("receiver should have lagged");
        assert!(matches!(err, TransportError::Lagged { skipped } if skipped > 0));

        // Oldest retained transmissions are still delivered afterwards.
        let payload = rx.recv().await.expect("recv should succeed after lag");
        assert!(payload.starts_with("burst-"));
    }

    #[tokio::test]
    async fn send_fails_once_all_receivers_are_gone() {
        let topic = Topic::default();
        let (a_tx, a_rx) = topic.endpoint().split();
        let (_b_tx, b_rx) = topic.endpoint().split();

        drop(a_rx);
        drop(b_rx);
        let err = a_tx.send("nobody-home").expect_err("send should fail");
        assert!(matches!(err, TransportError::Closed));
    }

    #[tokio::test]
    async fn endpoint_count_tracks_receivers() {
        let topic = Topic::default();
        assert_eq!(topic.endpoint_count(), 0);

        let a = topic.endpoint();
        let b = topic.endpoint();
        assert_eq!(topic.endpoint_count(), 2);
        assert_ne!(a.id(), b.id());

        drop(a);
        assert_eq!(topic.endpoint_count(), 1);
        drop(b);
    }
}
