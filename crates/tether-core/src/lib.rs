//! # tether-core
//!
//! Core types and traits for the Tether device-to-processor player.
//!
//! This crate defines both sides of the player's boundaries without any
//! player logic: the processor contract, the device and MIDI output
//! interfaces, and the buffer and MIDI types passed between them.
//!
//! ## Main Traits
//!
//! - [`AudioProcessor`] - The hosted processing unit
//! - [`AudioDevice`] - A running audio device
//! - [`AudioDeviceCallback`] / [`MidiInputCallback`] - Driver callbacks into the player
//! - [`MidiOutput`] - Destination for generated MIDI
//! - [`PositionSource`] - Timing queries from the processor
//! - [`Sample`] - f32/f64 abstraction
//!
//! ## Types
//!
//! - [`AudioBuffer`] - In-place channel buffer handed to the processor
//! - [`ChannelBufferSet`] / [`ScratchBuffer`] - Pre-sized channel storage
//! - [`ChannelCount`] - Input/output channel layout
//! - [`MidiBuffer`] - Fixed-capacity per-block MIDI buffer
//! - [`PositionInfo`] - Per-block timing snapshot
//! - [`PlayerConfig`] - Player settings
//! - [`PlayerError`] - Error types

pub mod buffer;
pub mod config;
pub mod device;
pub mod error;
pub mod midi;
pub mod position;
pub mod processor;
pub mod sample;
pub mod types;

// Re-exports for convenience
pub use buffer::{AudioBuffer, ChannelBufferSet, ScratchBuffer};
pub use config::{PlayerConfig, DEFAULT_MIDI_QUEUE_CAPACITY};
pub use device::{AudioDevice, AudioDeviceCallback, CallbackContext, MidiInputCallback, MidiOutput};
pub use error::{PlayerError, PlayerResult};
pub use midi::{MidiBuffer, MidiEvent, MidiMessage, MAX_MIDI_EVENTS};
pub use position::{PositionInfo, PositionSource};
pub use processor::{shared, AudioProcessor, SharedProcessor};
pub use sample::Sample;
pub use types::{ChannelCount, ExecutionContext, Precision, MAX_CHANNELS};
