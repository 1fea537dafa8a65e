use dashmap::DashMap;

use castbus_transport::{runtime_available, Topic, TransportError};

use crate::bus::Bus;
use crate::config::{BusConfig, HubConfig};
use crate::error::{BusError, Result};
use crate::hooks::Hooks;

/// Explicit registry of named topics, owned by the caller's composition
/// root.
///
/// A hub replaces process-global channel state: attach twice under the same
/// name and both buses share one topic; attach under different names and
/// the topics are fully independent. Topics outlive the buses attached to
/// them: closing a bus leaves the topic available for later attaches.
#[derive(Debug, Default)]
pub struct Hub {
    topics: DashMap<String, Topic>,
    config: HubConfig,
}

impl Hub {
    /// Create a hub with default configuration.
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with explicit configuration.
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            topics: DashMap::new(),
            config,
        }
    }

    /// Attach a bus to the named topic with no hooks and the hub's default
    /// bus configuration.
    ///
    /// Opens the topic on first use; later attaches under the same name
    /// reuse it. Fails with [`TransportError::RuntimeUnavailable`] when no
    /// tokio runtime is available to host the bus's dispatch loop.
    pub fn attach(&self, channel: &str) -> Result<Bus> {
        self.attach_with(channel, Hooks::default(), self.config.bus.clone())
    }

    /// Attach with an explicit hook bundle and per-bus configuration.
    pub fn attach_with(&self, channel: &str, hooks: Hooks, config: BusConfig) -> Result<Bus> {
        if channel.is_empty() {
            return Err(BusError::EmptyChannelName);
        }
        if !runtime_available() {
            return Err(TransportError::RuntimeUnavailable.into());
        }

        let topic = self
            .topics
            .entry(channel.to_string())
            .or_insert_with(|| Topic::new(self.config.topic_capacity))
            .clone();
        tracing::debug!(channel, "bus attached");
        Ok(Bus::attach(channel, &topic, hooks, config))
    }

    /// Whether a topic has been opened under `channel`.
    pub fn has_topic(&self, channel: &str) -> bool {
        self.topics.contains_key(channel)
    }

    /// Names of all topics opened so far, sorted.
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.iter().map(|entry| entry.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Hub configuration.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }
}
