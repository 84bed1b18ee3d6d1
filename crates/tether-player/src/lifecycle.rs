//! Processor attach/detach and device reconfiguration.
//!
//! Everything here runs on the control thread with the player lock held.
//! The hosted processor moves through these states:
//!
//! ```text
//! Unattached ──set_processor(Some)──► Preparing ──► Active
//!     ▲                                                │
//!     └──────── Releasing ◄── set_processor(None) ─────┘
//! ```
//!
//! A processor attached while no device is running stays attached but
//! unprepared until the device starts. A device stop releases the processor
//! and keeps it attached. `prepared` tracks whether the hosted processor
//! currently holds resources, so every `prepare` gets exactly one `release`.

use std::sync::Arc;

use tether_core::{AudioDevice, AudioProcessor, ChannelCount, Precision, SharedProcessor};

use crate::collector::MidiMessageCollector;
use crate::player::PlayerCore;

/// Pick the layout to run `processor` with on a device with `device` channels.
///
/// MIDI-only processors get no channels. Otherwise the candidates are tried
/// in order and the first one the processor accepts wins:
///
/// 1. The device's channels
/// 2. With at most one device input: the processor's declared inputs, device outputs
/// 3. With at most one device input: device outputs on both sides
///
/// If none is accepted the device's channels are used anyway.
pub fn find_most_suitable_layout(
    processor: &dyn AudioProcessor,
    device: ChannelCount,
) -> ChannelCount {
    if processor.is_midi_effect() {
        return ChannelCount::NONE;
    }

    let declared = processor.declared_channels();
    let candidates = [
        device,
        ChannelCount::new(declared.ins, device.outs),
        ChannelCount::new(device.outs, device.outs),
    ];
    let count = if device.ins <= 1 { candidates.len() } else { 1 };

    candidates[..count]
        .iter()
        .copied()
        .find(|&layout| processor.accepts_layout(layout))
        .unwrap_or_else(|| {
            log::debug!(
                "Processor accepts no candidate layout for device {}, using device layout",
                device
            );
            device
        })
}

fn same_processor(a: &Option<SharedProcessor>, b: &Option<SharedProcessor>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl PlayerCore {
    /// Host `processor`, or nothing. No-op if it is already hosted.
    pub(crate) fn set_processor(&mut self, processor: Option<SharedProcessor>) {
        if same_processor(&self.processor, &processor) {
            return;
        }

        self.sample_count = 0;
        self.current_context = None;

        let mut layout = ChannelCount::NONE;
        let mut prepared = false;

        if let Some(new) = &processor {
            if self.sample_rate > 0.0 && self.block_size > 0 {
                let mut p = new.lock();

                layout = find_most_suitable_layout(&*p, self.device_channels);
                p.configure(layout, self.sample_rate, self.block_size);

                let precision =
                    Precision::negotiate(p.supports_double_precision(), self.double_precision);
                p.set_precision(precision);
                p.prepare(self.sample_rate, self.block_size);
                prepared = true;

                log::debug!(
                    "Processor attached: {} at {} Hz, {} samples, {:?} precision",
                    layout,
                    self.sample_rate,
                    self.block_size,
                    precision
                );
            } else {
                log::debug!("Processor attached; preparing once a device starts");
            }
        } else {
            log::debug!("Processor detached");
        }

        let old = std::mem::replace(&mut self.processor, processor);
        let old_prepared = std::mem::replace(&mut self.prepared, prepared);
        self.actual_processor_channels = layout;
        self.resize_channels();

        if let Some(old) = old {
            if old_prepared {
                old.lock().release();
            }
        }
    }

    /// Request double precision from processors that support it.
    ///
    /// A prepared processor is released and prepared again at the new precision.
    pub(crate) fn set_double_precision(&mut self, enabled: bool) {
        if enabled == self.double_precision {
            return;
        }

        self.current_context = None;
        self.double_precision = enabled;

        if let (Some(processor), true) = (&self.processor, self.prepared) {
            let mut p = processor.lock();
            p.release();
            let precision = Precision::negotiate(p.supports_double_precision(), enabled);
            p.set_precision(precision);
            p.prepare(self.sample_rate, self.block_size);
            log::debug!("Processor re-prepared at {:?} precision", precision);
        }
    }

    /// The device is starting with new settings.
    pub(crate) fn audio_device_about_to_start(
        &mut self,
        device: Arc<dyn AudioDevice>,
        collector: &MidiMessageCollector,
    ) {
        self.sample_rate = device.sample_rate();
        self.block_size = device.block_size();
        self.device_channels = ChannelCount::new(
            device.active_input_channels(),
            device.active_output_channels(),
        );
        self.device = Some(device);

        log::info!(
            "Audio device starting: {} Hz, {} samples, {}",
            self.sample_rate,
            self.block_size,
            self.device_channels
        );

        self.resize_channels();
        collector.reset(self.sample_rate);
        self.current_context = None;

        if let Some(processor) = self.processor.clone() {
            self.set_processor(None);
            self.set_processor(Some(processor));
        }
    }

    /// The device stopped. The processor is released but stays attached.
    pub(crate) fn audio_device_stopped(&mut self) {
        if let (Some(processor), true) = (&self.processor, self.prepared) {
            processor.lock().release();
        }

        self.prepared = false;
        self.actual_processor_channels = ChannelCount::NONE;
        self.sample_rate = 0.0;
        self.block_size = 0;
        self.scratch.set_size(1, 1);
        self.device = None;
        self.current_context = None;

        log::info!("Audio device stopped");
    }

    /// Size slots and scratch for the current device and processor layout.
    pub(crate) fn resize_channels(&mut self) {
        let max_channels = self
            .device_channels
            .max_channels()
            .max(self.actual_processor_channels.max_channels());

        debug_assert!(
            max_channels <= tether_core::MAX_CHANNELS,
            "{} channels exceeds MAX_CHANNELS",
            max_channels
        );

        self.channels.resize(max_channels);
        self.scratch.set_size(max_channels, self.block_size);
        self.conversion.set_size(max_channels, self.block_size);
    }
}
