//! Per-block processing.
//!
//! One call per device block, on the real-time thread, with the player lock
//! held:
//!
//! 1. Drain incoming MIDI for the block
//! 2. Route device channels into the processor buffer
//! 3. Skip to silence if there is no prepared, running processor
//! 4. Take the processor's lock, report execution context changes
//! 5. Lease the position source and advance the sample counter
//! 6. Process, through the precision bridge at double precision
//! 7. Send the resulting MIDI to the output
//!
//! # Real-Time Safety
//!
//! Nothing here allocates, logs or blocks on anything but the processor's
//! own lock and the collector's queue lock.

use tether_core::{CallbackContext, PositionInfo, Precision};

use crate::collector::MidiMessageCollector;
use crate::player::PlayerCore;
use crate::position::PositionLease;
use crate::router;

impl PlayerCore {
    /// Process one device block.
    pub(crate) fn process_block(
        &mut self,
        collector: &MidiMessageCollector,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        num_samples: usize,
        context: &CallbackContext,
    ) {
        debug_assert!(
            !self.prepared || num_samples <= self.block_size,
            "block of {} samples exceeds prepared size {}",
            num_samples,
            self.block_size
        );

        self.incoming_midi.clear();
        collector.remove_next_block_of_messages(&mut self.incoming_midi, num_samples);

        if self.render(inputs, outputs, num_samples, context) {
            self.send_midi_output(collector);
        } else {
            for output in outputs.iter_mut() {
                output[..num_samples].fill(0.0);
            }
        }

        self.incoming_midi.clear();
    }

    /// Route and process. Returns false if nothing was processed.
    fn render(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        num_samples: usize,
        context: &CallbackContext,
    ) -> bool {
        let num_outputs = outputs.len();
        let layout = self.actual_processor_channels;

        let mut buffer = router::initialise_io_buffers(
            inputs,
            outputs,
            num_samples,
            layout,
            &mut self.scratch,
            &mut self.channels,
        );

        let Some(processor) = self.processor.as_ref().filter(|_| self.prepared) else {
            return false;
        };

        let mut guard = processor.lock();
        if guard.is_suspended() {
            return false;
        }

        debug_assert!(
            guard.is_midi_effect() || num_outputs == layout.outs,
            "device has {} outputs, processor runs with {}",
            num_outputs,
            layout.outs
        );

        if let Some(device) = &self.device {
            let device_context = device.execution_context();
            if device_context != self.current_context {
                self.current_context = device_context;
                guard.execution_context_changed(device_context);
            }
        }

        let info = PositionInfo::from_counter(context.host_time_ns, self.sample_count, self.sample_rate);
        let mut lease = PositionLease::acquire(&mut *guard, &self.position, info);
        self.sample_count += num_samples as u64;

        let processor = lease.processor();
        let midi = &mut *self.incoming_midi;
        match processor.precision() {
            Precision::Double => self
                .conversion
                .process(&mut buffer, |wide| processor.process_f64(wide, midi)),
            Precision::Single => processor.process(&mut buffer, midi),
        }

        true
    }

    fn send_midi_output(&self, collector: &MidiMessageCollector) {
        let Some(output) = &self.midi_output else {
            return;
        };

        if output.is_background_thread_running() {
            output.send_block_of_messages(&self.incoming_midi, collector.now_ms(), self.sample_rate);
        } else {
            output.send_block_of_messages_now(&self.incoming_midi);
        }
    }
}
