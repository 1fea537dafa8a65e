use castbus_transport::DEFAULT_TOPIC_CAPACITY;
use castbus_wire::DEFAULT_MAX_PAYLOAD;

use crate::control;

/// Per-bus behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Control-message identifier used for cross-context callback removal.
    ///
    /// Buses sharing a topic must agree on this value. Defaults to
    /// [`control::REMOVE_MESSAGE`].
    pub remove_control_name: String,

    /// Maximum encoded envelope size accepted for outgoing posts, in bytes.
    pub max_payload_size: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            remove_control_name: control::REMOVE_MESSAGE.to_string(),
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

/// Hub-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// In-flight transmissions buffered per topic endpoint.
    pub topic_capacity: usize,

    /// Per-bus configuration applied by [`crate::Hub::attach`].
    pub bus: BusConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            topic_capacity: DEFAULT_TOPIC_CAPACITY,
            bus: BusConfig::default(),
        }
    }
}
