//! Device-side interfaces.
//!
//! The player sits between a device driver and a processor. These traits are
//! the driver's side of that boundary: what the player asks of a running
//! device, the callbacks the driver makes into the player, and where the
//! processor's MIDI output goes.

use std::sync::Arc;

use crate::midi::{MidiBuffer, MidiMessage};
use crate::types::ExecutionContext;

// =============================================================================
// Device
// =============================================================================

/// A running audio device, as seen from its callback.
pub trait AudioDevice: Send + Sync {
    /// Current sample rate in Hz.
    fn sample_rate(&self) -> f64;

    /// Current maximum block size in samples.
    fn block_size(&self) -> usize;

    /// Number of active input channels.
    fn active_input_channels(&self) -> usize;

    /// Number of active output channels.
    fn active_output_channels(&self) -> usize;

    /// The scheduling context the device's callback runs in, if any.
    fn execution_context(&self) -> Option<ExecutionContext> {
        None
    }
}

/// Extra information the driver passes with each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallbackContext {
    /// Host timestamp for the first sample of the block, in nanoseconds.
    pub host_time_ns: Option<u64>,
}

impl CallbackContext {
    /// Context carrying a host timestamp.
    pub const fn with_host_time(host_time_ns: u64) -> Self {
        Self {
            host_time_ns: Some(host_time_ns),
        }
    }
}

// =============================================================================
// Callbacks
// =============================================================================

/// Receiver of audio device callbacks.
pub trait AudioDeviceCallback: Send + Sync {
    /// Process one block.
    ///
    /// Called on the real-time thread. `inputs` holds one slice per active
    /// input channel, `outputs` one per active output channel; every slice
    /// holds at least `num_samples` samples. Outputs must be fully written.
    fn audio_device_io_callback(
        &self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        num_samples: usize,
        context: &CallbackContext,
    );

    /// The device is about to start calling back with a new configuration.
    fn audio_device_about_to_start(&self, device: Arc<dyn AudioDevice>);

    /// The device has stopped calling back.
    fn audio_device_stopped(&self);
}

/// Receiver of incoming MIDI from an input port.
pub trait MidiInputCallback: Send + Sync {
    /// A message arrived. `timestamp` is in seconds on the receiver's clock.
    fn handle_incoming_midi_message(&self, message: MidiMessage, timestamp: f64);
}

// =============================================================================
// MIDI Output
// =============================================================================

/// Destination for the processor's MIDI output.
pub trait MidiOutput: Send + Sync {
    /// True if the output delivers queued messages from its own thread.
    fn is_background_thread_running(&self) -> bool;

    /// Queue a block for timed delivery by the background thread.
    ///
    /// Event offsets are samples relative to `start_time_ms` at `sample_rate`.
    fn send_block_of_messages(&self, buffer: &MidiBuffer, start_time_ms: f64, sample_rate: f64);

    /// Send a block immediately, ignoring event offsets.
    fn send_block_of_messages_now(&self, buffer: &MidiBuffer);
}
