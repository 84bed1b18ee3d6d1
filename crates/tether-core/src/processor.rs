//! The processor contract.
//!
//! A processor is the unit of audio/MIDI work the player hosts. The player
//! negotiates its channel layout and precision, prepares and releases it,
//! and calls it once per device block. What happens inside `process` is the
//! processor's business.
//!
//! # Lifecycle
//!
//! ```text
//! attach ──► configure ──► set_precision ──► prepare ──► process (per block)
//!                                                             │
//!   detach / device stop / precision change ◄── release ◄─────┘
//! ```
//!
//! Every `prepare` is followed by exactly one `release` before the next
//! `prepare`. `process` is only called between the two.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::AudioBuffer;
use crate::midi::MidiBuffer;
use crate::position::PositionSource;
use crate::types::{ChannelCount, ExecutionContext, Precision};

/// A processor shared between the control thread and the audio thread.
///
/// The mutex is the processor's own lock. The player holds it while it calls
/// into the processor from the audio thread, so other threads that need to
/// talk to the processor (parameter changes, editors) serialize against
/// processing by taking the same lock. Handles are compared by pointer.
pub type SharedProcessor = Arc<Mutex<dyn AudioProcessor>>;

/// Wrap a processor into a [`SharedProcessor`].
pub fn shared<P: AudioProcessor + 'static>(processor: P) -> SharedProcessor {
    Arc::new(Mutex::new(processor))
}

/// Audio processor hosted by the player.
///
/// Implementations must be `Send`: they are created on one thread, prepared
/// on the control thread and processed on the audio thread.
pub trait AudioProcessor: Send {
    // =========================================================================
    // Layout
    // =========================================================================

    /// Returns true for processors that only handle MIDI.
    ///
    /// MIDI-only processors get no audio channels. They are still called every
    /// block with an empty audio buffer.
    ///
    /// Default returns `false`.
    fn is_midi_effect(&self) -> bool {
        false
    }

    /// The channel layout the processor was built with.
    fn declared_channels(&self) -> ChannelCount;

    /// Returns true if the processor can run with `layout`.
    ///
    /// Default accepts only the declared layout.
    fn accepts_layout(&self, layout: ChannelCount) -> bool {
        layout == self.declared_channels()
    }

    /// Apply the negotiated layout and the device's rate and block size.
    ///
    /// Called before `prepare`. A MIDI-only processor receives
    /// [`ChannelCount::NONE`].
    fn configure(&mut self, layout: ChannelCount, sample_rate: f64, block_size: usize);

    // =========================================================================
    // Precision
    // =========================================================================

    /// Returns true if the processor implements [`process_f64`](Self::process_f64).
    ///
    /// Default returns `false`.
    fn supports_double_precision(&self) -> bool {
        false
    }

    /// Select the precision the next `prepare` and all processing use.
    ///
    /// Only called with [`Precision::Double`] if
    /// [`supports_double_precision`](Self::supports_double_precision) is true.
    fn set_precision(&mut self, precision: Precision);

    /// The precision last set with [`set_precision`](Self::set_precision).
    fn precision(&self) -> Precision;

    // =========================================================================
    // Resources
    // =========================================================================

    /// Allocate whatever processing needs at this rate and maximum block size.
    fn prepare(&mut self, sample_rate: f64, block_size: usize);

    /// Free what `prepare` allocated.
    fn release(&mut self);

    /// Returns true while the processor wants to be skipped.
    ///
    /// A suspended processor is not called; the device outputs silence.
    ///
    /// Default returns `false`.
    fn is_suspended(&self) -> bool {
        false
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Process one block at single precision.
    ///
    /// The first `ins` channels of `buffer` hold input; the processor writes
    /// its outputs in place into the first `outs` channels. `midi` holds the
    /// incoming messages for the block; whatever is left in it afterwards is
    /// sent to the MIDI output.
    fn process(&mut self, buffer: &mut AudioBuffer<'_, f32>, midi: &mut MidiBuffer);

    /// Process one block at double precision.
    ///
    /// Same contract as [`process`](Self::process). Only called when the
    /// processor was set to [`Precision::Double`].
    ///
    /// Default does nothing.
    fn process_f64(&mut self, buffer: &mut AudioBuffer<'_, f64>, midi: &mut MidiBuffer) {
        let _ = (buffer, midi);
        debug_assert!(
            !self.supports_double_precision(),
            "supports_double_precision() returned true but process_f64() is not implemented"
        );
    }

    // =========================================================================
    // Context
    // =========================================================================

    /// Install or remove the position source.
    fn set_position_source(&mut self, source: Option<Arc<dyn PositionSource>>);

    /// The currently installed position source.
    fn position_source(&self) -> Option<&Arc<dyn PositionSource>>;

    /// The device's execution context changed.
    ///
    /// Called from the audio thread before processing the first block in the
    /// new context.
    fn execution_context_changed(&mut self, context: Option<ExecutionContext>) {
        let _ = context;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough {
        precision: Precision,
        position: Option<Arc<dyn PositionSource>>,
    }

    impl AudioProcessor for Passthrough {
        fn declared_channels(&self) -> ChannelCount {
            ChannelCount::stereo()
        }

        fn configure(&mut self, _layout: ChannelCount, _sample_rate: f64, _block_size: usize) {}

        fn set_precision(&mut self, precision: Precision) {
            self.precision = precision;
        }

        fn precision(&self) -> Precision {
            self.precision
        }

        fn prepare(&mut self, _sample_rate: f64, _block_size: usize) {}

        fn release(&mut self) {}

        fn process(&mut self, _buffer: &mut AudioBuffer<'_, f32>, _midi: &mut MidiBuffer) {}

        fn set_position_source(&mut self, source: Option<Arc<dyn PositionSource>>) {
            self.position = source;
        }

        fn position_source(&self) -> Option<&Arc<dyn PositionSource>> {
            self.position.as_ref()
        }
    }

    #[test]
    fn test_defaults() {
        let p = Passthrough {
            precision: Precision::Single,
            position: None,
        };
        assert!(!p.is_midi_effect());
        assert!(!p.supports_double_precision());
        assert!(!p.is_suspended());
        assert!(p.accepts_layout(ChannelCount::stereo()));
        assert!(!p.accepts_layout(ChannelCount::mono()));
    }

    #[test]
    fn test_shared_handles_compare_by_pointer() {
        let a = shared(Passthrough {
            precision: Precision::Single,
            position: None,
        });
        let b = shared(Passthrough {
            precision: Precision::Single,
            position: None,
        });
        let a2 = Arc::clone(&a);

        assert!(Arc::ptr_eq(&a, &a2));
        assert!(!Arc::ptr_eq(&a, &b));

        a.lock().set_precision(Precision::Double);
        assert_eq!(a2.lock().precision(), Precision::Double);
    }
}
