//! Player configuration.
//!
//! Built in code with `const fn` builders, or loaded from JSON.
//!
//! # Example
//!
//! ```ignore
//! use tether_core::PlayerConfig;
//!
//! const CONFIG: PlayerConfig = PlayerConfig::new()
//!     .with_double_precision(true)
//!     .with_midi_queue_capacity(4096);
//!
//! let loaded = PlayerConfig::from_json(r#"{ "double_precision": true }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, PlayerResult};

/// Default capacity of the incoming MIDI queue, in messages.
pub const DEFAULT_MIDI_QUEUE_CAPACITY: usize = 2048;

/// Settings a player is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Request double precision processing from processors that support it.
    pub double_precision: bool,

    /// Maximum number of incoming MIDI messages held between two blocks.
    ///
    /// Messages arriving while the queue is full are dropped.
    pub midi_queue_capacity: usize,
}

impl PlayerConfig {
    /// Default configuration: single precision, default MIDI queue.
    pub const fn new() -> Self {
        Self {
            double_precision: false,
            midi_queue_capacity: DEFAULT_MIDI_QUEUE_CAPACITY,
        }
    }

    /// Set whether double precision is requested.
    pub const fn with_double_precision(mut self, enabled: bool) -> Self {
        self.double_precision = enabled;
        self
    }

    /// Set the incoming MIDI queue capacity.
    pub const fn with_midi_queue_capacity(mut self, capacity: usize) -> Self {
        self.midi_queue_capacity = capacity;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> PlayerResult<()> {
        if self.midi_queue_capacity == 0 {
            return Err(PlayerError::InvalidConfiguration(
                "midi_queue_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> PlayerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> PlayerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new()
    }
}
