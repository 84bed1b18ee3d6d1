//! Device-to-processor channel routing.
//!
//! Maps the device's input and output channels onto the slots of the
//! processor's in-place buffer for one block. Stateless; all storage is
//! passed in, already sized by the lifecycle code.
//!
//! # Slot layout
//!
//! ```text
//! ins > outs (e.g. 4 in / 2 out)      ins <= outs (e.g. 2 in / 4 out)
//!
//! slot 0  device out 0  <- input 0    slot 0  device out 0  <- input 0
//! slot 1  device out 1  <- input 1    slot 1  device out 1  <- input 1
//! slot 2  scratch 0     <- input 2    slot 2  device out 2  (zeroed)
//! slot 3  scratch 1     <- input 3    slot 3  device out 3  (zeroed)
//! ```
//!
//! Extra inputs go to scratch rather than device inputs because the
//! processor writes in place; input data the driver owns must stay intact.
//! Input `i` is copied from device input `i % device_inputs`, so one device
//! input feeds every processor input. With no device inputs the processor
//! inputs are silent.

use tether_core::{AudioBuffer, ChannelBufferSet, ChannelCount, ScratchBuffer};

/// Route device channels into the processor's buffer for one block.
///
/// On return, slots `[0, layout.ins)` hold input data and every slot in
/// `[0, layout.max_channels())` can be written. The returned buffer borrows
/// `outputs`, `scratch` and `channels` until dropped.
///
/// When `layout.ins > layout.outs`, `scratch` must have the excess channels
/// with at least `num_samples` samples each.
///
/// # Panics
///
/// Panics if `channels` has fewer than `layout.max_channels()` slots, if
/// `outputs` has fewer than `layout.outs` channels, or if any channel used
/// is shorter than `num_samples`.
pub fn initialise_io_buffers<'a>(
    inputs: &[&[f32]],
    outputs: &'a mut [&mut [f32]],
    num_samples: usize,
    layout: ChannelCount,
    scratch: &'a mut ScratchBuffer<f32>,
    channels: &'a mut ChannelBufferSet<f32>,
) -> AudioBuffer<'a, f32> {
    let total = layout.max_channels();

    assert!(
        channels.len() >= total,
        "channel slots ({}) < processor channels ({})",
        channels.len(),
        total
    );
    assert!(
        outputs.len() >= layout.outs,
        "device outputs ({}) < processor outputs ({})",
        outputs.len(),
        layout.outs
    );

    let seed = |index: usize, dest: &mut [f32]| {
        let dest = &mut dest[..num_samples];
        if inputs.is_empty() {
            dest.fill(0.0);
        } else {
            dest.copy_from_slice(&inputs[index % inputs.len()][..num_samples]);
        }
    };

    if layout.ins > layout.outs {
        debug_assert!(scratch.num_channels() >= layout.ins - layout.outs);
        debug_assert!(scratch.num_samples() >= num_samples);

        for (i, out) in outputs.iter_mut().take(layout.outs).enumerate() {
            seed(i, out);
            channels.set(i, out.as_mut_ptr());
        }

        for i in layout.outs..layout.ins {
            let temp = scratch.channel_mut(i - layout.outs);
            seed(i, temp);
            channels.set(i, temp.as_mut_ptr());
        }
    } else {
        for (i, out) in outputs.iter_mut().take(layout.outs).enumerate() {
            if i < layout.ins {
                seed(i, out);
            } else {
                out[..num_samples].fill(0.0);
            }
            channels.set(i, out.as_mut_ptr());
        }
    }

    // SAFETY: the asserts above guarantee slots [0, total) were all set.
    // Each points at a distinct device output or scratch channel holding at
    // least num_samples samples. Both are exclusively borrowed for 'a by this
    // function's signature, so nothing else touches that memory while the
    // buffer lives.
    unsafe { channels.buffer(total, num_samples) }
}
