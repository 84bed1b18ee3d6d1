//! # tether-player
//!
//! Plays one hosted processor through one audio device.
//!
//! The device driver calls [`ProcessorPlayer`] once per block. The player
//! routes the device's channels into the layout the processor was prepared
//! with, converts to double precision when the processor runs at f64, gives
//! the processor a position source, and forwards its MIDI output. When the
//! device or the processor changes, the player renegotiates the layout and
//! precision and prepares the processor again.
//!
//! ## Modules
//!
//! - [`router`] - Device channels to processor buffer, per block
//! - [`precision`] - f32/f64 bridging with persistent storage
//! - [`collector`] - Incoming MIDI queue and block fitting
//! - [`position`] - The player's position source and per-block lease
//! - [`lifecycle`] - Attach, detach, layout negotiation, device start/stop
//! - `engine` - The per-block callback, run through [`ProcessorPlayer`]

pub mod collector;
mod engine;
pub mod lifecycle;
pub mod player;
pub mod position;
pub mod precision;
pub mod router;

#[cfg(test)]
mod testing;

pub use collector::MidiMessageCollector;
pub use lifecycle::find_most_suitable_layout;
pub use player::ProcessorPlayer;
pub use position::{HostPosition, PositionLease};
pub use precision::PrecisionBridge;
pub use router::initialise_io_buffers;
