use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use castbus_transport::{EndpointReceiver, EndpointSender, Topic, TransportError};
use castbus_wire::{decode_envelope, encode_envelope, Envelope, WireError};

use crate::config::BusConfig;
use crate::control;
use crate::error::{BusError, Result};
use crate::hooks::Hooks;

/// Receive handler registered for one message name.
pub type MessageCallback = Arc<dyn Fn(Envelope) + Send + Sync>;

/// Message-name-keyed callback registry. Last registration for a name wins.
pub(crate) type Registry = DashMap<String, MessageCallback>;

struct BusShared {
    channel: String,
    registry: Registry,
    hooks: RwLock<Arc<Hooks>>,
    config: BusConfig,
    closed: AtomicBool,
    shutdown: CancellationToken,
}

impl BusShared {
    fn hooks(&self) -> Arc<Hooks> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// One context's handle onto a named topic.
///
/// A bus posts named JSON messages to every other bus on the same topic and
/// dispatches incoming messages to callbacks registered per message name.
/// Each bus runs a single dispatch task installed at attach time;
/// registration calls only mutate the registry that task reads.
pub struct Bus {
    shared: Arc<BusShared>,
    sender: EndpointSender,
}

impl Bus {
    /// Attach to a topic and install the dispatch loop.
    ///
    /// Requires an ambient tokio runtime; [`crate::Hub`] probes for one
    /// before calling this.
    pub(crate) fn attach(channel: &str, topic: &Topic, hooks: Hooks, config: BusConfig) -> Self {
        let (sender, receiver) = topic.endpoint().split();
        let shared = Arc::new(BusShared {
            channel: channel.to_string(),
            registry: DashMap::new(),
            hooks: RwLock::new(Arc::new(hooks)),
            config,
            closed: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });
        tokio::spawn(dispatch_loop(Arc::clone(&shared), receiver));
        Self { shared, sender }
    }

    /// Name of the topic this bus is attached to.
    pub fn channel(&self) -> &str {
        &self.shared.channel
    }

    /// Capability probe: whether the current thread can host a bus.
    /// No side effects.
    pub fn can_support() -> bool {
        castbus_transport::runtime_available()
    }

    /// Post a named message to every other bus on the topic.
    ///
    /// Returns once the envelope is enqueued with the transport; there is
    /// no delivery confirmation and no local echo.
    pub fn post<T: Serialize>(&self, message: &str, data: &T) -> Result<()> {
        self.ensure_open()?;
        let data = serde_json::to_value(data).map_err(WireError::Encode)?;
        let envelope = Envelope::new(message, data);
        let text = encode_envelope(&envelope, self.shared.config.max_payload_size)?;

        let hooks = self.shared.hooks();
        if let Some(hook) = &hooks.before_post {
            hook(&envelope);
        }
        self.sender.send(text)?;
        if let Some(hook) = &hooks.after_post {
            hook(&envelope);
        }
        Ok(())
    }

    /// Register `callback` for `message`, replacing any prior registration
    /// under that name.
    pub fn on_message<F>(&self, message: &str, callback: F) -> Result<()>
    where
        F: Fn(Envelope) + Send + Sync + 'static,
    {
        self.ensure_open()?;
        self.shared
            .registry
            .insert(message.to_string(), Arc::new(callback));
        Ok(())
    }

    /// Register a typed callback for `message`.
    ///
    /// Incoming payloads that do not deserialize as `T` are dropped with a
    /// diagnostic instead of reaching the callback.
    pub fn on_message_typed<T, F>(&self, message: &str, callback: F) -> Result<()>
    where
        T: DeserializeOwned,
        F: Fn(T) + Send + Sync + 'static,
    {
        self.on_message(message, move |envelope: Envelope| {
            match serde_json::from_value::<T>(envelope.data) {
                Ok(data) => callback(data),
                Err(err) => warn!(
                    message = %envelope.message,
                    %err,
                    "dropping payload that does not match the registered type"
                ),
            }
        })
    }

    /// Remove the local registration for `message`, then broadcast a
    /// control envelope asking every peer on the topic to do the same.
    ///
    /// Peers apply the removal whenever their dispatch loop next runs;
    /// this is best-effort invalidation, not a synchronous confirmation.
    pub fn remove_message(&self, message: &str) -> Result<()> {
        self.ensure_open()?;
        self.shared.registry.remove(message);

        let envelope = Envelope::control(
            self.shared.config.remove_control_name.clone(),
            Value::String(message.to_string()),
        );
        let text = encode_envelope(&envelope, self.shared.config.max_payload_size)?;
        // Control traffic bypasses the post hooks.
        self.sender.send(text)?;
        Ok(())
    }

    /// Whether a callback is currently registered for `message`.
    pub fn has_listeners(&self, message: &str) -> bool {
        self.shared.registry.contains_key(message)
    }

    /// Close the bus: stop the dispatch loop, clear the registry, reset the
    /// hook bundle to empty. Idempotent.
    ///
    /// Hooks fire from the snapshot captured on entry, so `after_close`
    /// still runs after the bundle reset.
    pub fn close(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let hooks = self.shared.hooks();
        if let Some(hook) = &hooks.before_close {
            hook();
        }
        self.shared.shutdown.cancel();
        self.shared.registry.clear();
        *self
            .shared
            .hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(Hooks::default());
        if let Some(hook) = &hooks.after_close {
            hook();
        }
        debug!(channel = %self.shared.channel, "bus closed");
    }

    /// Whether [`Bus::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(BusError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Drop for Bus {
    fn drop(&mut self) {
        // Stop the dispatch task; hook/registry teardown only happens
        // through `close`.
        self.shared.shutdown.cancel();
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("channel", &self.shared.channel)
            .field("closed", &self.is_closed())
            .field("registered", &self.shared.registry.len())
            .finish()
    }
}

async fn dispatch_loop(shared: Arc<BusShared>, mut receiver: EndpointReceiver) {
    loop {
        let incoming = tokio::select! {
            _ = shared.shutdown.cancelled() => break,
            incoming = receiver.recv() => incoming,
        };
        match incoming {
            Ok(text) => dispatch(&shared, &text),
            Err(TransportError::Lagged { skipped }) => {
                warn!(
                    channel = %shared.channel,
                    skipped,
                    "dispatch fell behind, transmissions dropped"
                );
            }
            Err(_) => break,
        }
    }
}

/// Handle one incoming wire payload.
fn dispatch(shared: &BusShared, text: &str) {
    let envelope = match decode_envelope(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            // Fail closed: a payload we cannot parse is dropped, never
            // propagated into caller code.
            warn!(channel = %shared.channel, %err, "dropping undecodable payload");
            return;
        }
    };

    if envelope.is_internal {
        let recognized = control::apply(
            &shared.registry,
            &shared.config.remove_control_name,
            &envelope,
        );
        if !recognized {
            debug!(
                channel = %shared.channel,
                message = %envelope.message,
                "ignoring unrecognized control message"
            );
        }
        return;
    }

    // Clone the callback handle out of the registry before running user
    // code, so a callback may re-enter on_message/remove_message freely.
    let callback = shared
        .registry
        .get(&envelope.message)
        .map(|entry| Arc::clone(entry.value()));
    let hooks = shared.hooks();

    let Some(callback) = callback else {
        if let Some(hook) = &hooks.on_error {
            hook(&envelope);
        }
        warn!(
            channel = %shared.channel,
            message = %envelope.message,
            "no callback registered for message"
        );
        return;
    };

    if let Some(hook) = &hooks.before_dispatch {
        hook(&envelope);
    }
    match &hooks.after_dispatch {
        Some(after) => {
            callback(envelope.clone());
            after(&envelope);
        }
        None => callback(envelope),
    }
}
