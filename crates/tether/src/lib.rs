//! # Tether
//!
//! Real-time bridge between an audio device and a hosted processor.
//!
//! ## Architecture
//!
//! ```text
//! Device driver (calls AudioDeviceCallback)
//!        ↓
//! ProcessorPlayer (routing, precision, position, MIDI)
//!        ↓
//! Your processor (implements AudioProcessor)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tether::prelude::*;
//!
//! struct Gain {
//!     precision: Precision,
//!     position: Option<Arc<dyn PositionSource>>,
//! }
//!
//! impl AudioProcessor for Gain {
//!     fn declared_channels(&self) -> ChannelCount { ChannelCount::stereo() }
//!     fn configure(&mut self, _: ChannelCount, _: f64, _: usize) {}
//!     fn set_precision(&mut self, p: Precision) { self.precision = p; }
//!     fn precision(&self) -> Precision { self.precision }
//!     fn prepare(&mut self, _: f64, _: usize) {}
//!     fn release(&mut self) {}
//!     fn process(&mut self, buffer: &mut AudioBuffer<'_, f32>, _midi: &mut MidiBuffer) {
//!         for ch in 0..buffer.num_channels() {
//!             for s in buffer.channel_mut(ch) { *s *= 0.5; }
//!         }
//!     }
//!     fn set_position_source(&mut self, s: Option<Arc<dyn PositionSource>>) { self.position = s; }
//!     fn position_source(&self) -> Option<&Arc<dyn PositionSource>> { self.position.as_ref() }
//! }
//!
//! let player = Arc::new(ProcessorPlayer::new(false));
//! player.set_processor(Some(shared(Gain { precision: Precision::Single, position: None })));
//! // Hand `player` to the device driver as its AudioDeviceCallback.
//! ```

// Re-export sub-crates
pub use tether_core as core;
pub use tether_player as player;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tether::prelude::*;
/// ```
pub mod prelude {
    pub use tether_core::{
        // Buffers and samples
        AudioBuffer, MidiBuffer, MidiEvent, MidiMessage, Sample,
        // Processor side
        shared, AudioProcessor, PositionInfo, PositionSource, SharedProcessor,
        // Device side
        AudioDevice, AudioDeviceCallback, CallbackContext, MidiInputCallback, MidiOutput,
        // Layout and precision
        ChannelCount, ExecutionContext, Precision,
        // Configuration
        PlayerConfig, PlayerError, PlayerResult,
    };
    pub use tether_player::{MidiMessageCollector, ProcessorPlayer};
}
