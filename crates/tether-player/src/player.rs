//! The player: one hosted processor driven by one audio device.
//!
//! [`ProcessorPlayer`] is handed to the device driver as its callback and to
//! MIDI inputs as their receiver. Control-thread calls (attaching processors,
//! switching precision) and the device callbacks all serialize on one lock.
//!
//! # Locking
//!
//! Lock order is player lock, then the processor's own lock, then the MIDI
//! collector's queue lock. The processor lock is only taken with the player
//! lock held, so code that holds a processor lock must not call back into
//! the player.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tether_player::ProcessorPlayer;
//!
//! let player = Arc::new(ProcessorPlayer::new(false));
//! player.set_processor(Some(tether_core::shared(MyProcessor::default())));
//! device.start(player.clone());
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tether_core::{
    AudioDevice, AudioDeviceCallback, CallbackContext, ChannelBufferSet, ChannelCount,
    ExecutionContext, MidiBuffer, MidiInputCallback, MidiMessage, MidiOutput, PlayerConfig,
    PlayerResult, ScratchBuffer, SharedProcessor,
};

use crate::collector::MidiMessageCollector;
use crate::position::HostPosition;
use crate::precision::PrecisionBridge;

/// Player state guarded by the player lock.
pub(crate) struct PlayerCore {
    pub(crate) processor: Option<SharedProcessor>,
    /// True while `processor` holds prepared resources.
    pub(crate) prepared: bool,
    pub(crate) double_precision: bool,

    pub(crate) sample_rate: f64,
    pub(crate) block_size: usize,
    pub(crate) device_channels: ChannelCount,
    pub(crate) actual_processor_channels: ChannelCount,

    pub(crate) channels: ChannelBufferSet<f32>,
    pub(crate) scratch: ScratchBuffer<f32>,
    pub(crate) conversion: PrecisionBridge<f64>,
    pub(crate) incoming_midi: Box<MidiBuffer>,

    pub(crate) sample_count: u64,
    pub(crate) current_context: Option<ExecutionContext>,
    pub(crate) device: Option<Arc<dyn AudioDevice>>,
    pub(crate) midi_output: Option<Arc<dyn MidiOutput>>,
    pub(crate) position: Arc<HostPosition>,
}

impl PlayerCore {
    fn new(double_precision: bool) -> Self {
        Self {
            processor: None,
            prepared: false,
            double_precision,
            sample_rate: 0.0,
            block_size: 0,
            device_channels: ChannelCount::NONE,
            actual_processor_channels: ChannelCount::NONE,
            channels: ChannelBufferSet::new(),
            scratch: ScratchBuffer::new(),
            conversion: PrecisionBridge::new(),
            incoming_midi: MidiBuffer::boxed(),
            sample_count: 0,
            current_context: None,
            device: None,
            midi_output: None,
            position: Arc::new(HostPosition::new()),
        }
    }
}

/// Hosts one processor and plays it through an audio device.
pub struct ProcessorPlayer {
    core: Mutex<PlayerCore>,
    collector: MidiMessageCollector,
}

impl ProcessorPlayer {
    /// Create a player with no processor.
    ///
    /// `double_precision` requests f64 processing from processors that
    /// support it.
    pub fn new(double_precision: bool) -> Self {
        Self::from_parts(&PlayerConfig::new().with_double_precision(double_precision))
    }

    /// Create a player from a configuration, validating it first.
    pub fn with_config(config: &PlayerConfig) -> PlayerResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: &PlayerConfig) -> Self {
        Self {
            core: Mutex::new(PlayerCore::new(config.double_precision)),
            collector: MidiMessageCollector::with_capacity(config.midi_queue_capacity),
        }
    }

    /// Host `processor`, replacing the current one, or host nothing.
    ///
    /// If a device is running the new processor is prepared before the old
    /// one is released. Attaching the processor already hosted does nothing.
    pub fn set_processor(&self, processor: Option<SharedProcessor>) {
        self.core.lock().set_processor(processor);
    }

    /// The hosted processor.
    pub fn processor(&self) -> Option<SharedProcessor> {
        self.core.lock().processor.clone()
    }

    /// Request double precision from processors that support it.
    pub fn set_double_precision_processing(&self, enabled: bool) {
        self.core.lock().set_double_precision(enabled);
    }

    /// True if double precision is requested.
    pub fn double_precision_processing(&self) -> bool {
        self.core.lock().double_precision
    }

    /// Send processor MIDI output to `output`, or nowhere.
    pub fn set_midi_output(&self, output: Option<Arc<dyn MidiOutput>>) {
        let mut core = self.core.lock();
        let unchanged = match (&core.midi_output, &output) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !unchanged {
            core.midi_output = output;
        }
    }

    /// The collector incoming MIDI is queued on.
    pub fn midi_message_collector(&self) -> &MidiMessageCollector {
        &self.collector
    }

    /// The layout the hosted processor runs with. Empty when nothing is prepared.
    pub fn negotiated_channels(&self) -> ChannelCount {
        self.core.lock().actual_processor_channels
    }

    /// The running device's active channels.
    pub fn device_channels(&self) -> ChannelCount {
        self.core.lock().device_channels
    }

    #[cfg(test)]
    pub(crate) fn with_core<R>(&self, f: impl FnOnce(&PlayerCore) -> R) -> R {
        f(&self.core.lock())
    }
}

impl Default for ProcessorPlayer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Drop for ProcessorPlayer {
    fn drop(&mut self) {
        self.core.get_mut().set_processor(None);
    }
}

impl AudioDeviceCallback for ProcessorPlayer {
    fn audio_device_io_callback(
        &self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        num_samples: usize,
        context: &CallbackContext,
    ) {
        self.core
            .lock()
            .process_block(&self.collector, inputs, outputs, num_samples, context);
    }

    fn audio_device_about_to_start(&self, device: Arc<dyn AudioDevice>) {
        self.core
            .lock()
            .audio_device_about_to_start(device, &self.collector);
    }

    fn audio_device_stopped(&self) {
        self.core.lock().audio_device_stopped();
    }
}

impl MidiInputCallback for ProcessorPlayer {
    fn handle_incoming_midi_message(&self, message: MidiMessage, timestamp: f64) {
        self.collector.add_message_to_queue(message, timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{shared_mock, Call, MockDevice, MockProcessor, RecordingMidiOutput};
    use tether_core::PlayerError;

    #[test]
    fn test_with_config() {
        let config = PlayerConfig::new()
            .with_double_precision(true)
            .with_midi_queue_capacity(8);
        let player = ProcessorPlayer::with_config(&config).unwrap();

        assert!(player.double_precision_processing());
        assert_eq!(player.midi_message_collector().capacity(), 8);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = PlayerConfig::new().with_midi_queue_capacity(0);
        assert!(matches!(
            ProcessorPlayer::with_config(&config),
            Err(PlayerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_incoming_midi_is_queued() {
        let player = ProcessorPlayer::new(false);
        player.audio_device_about_to_start(MockDevice::new(48_000.0, 64, 0, 2));

        let now = player.midi_message_collector().now();
        player.handle_incoming_midi_message(MidiMessage::note_on(0, 64, 90), now);

        assert_eq!(player.midi_message_collector().pending(), 1);
        assert_eq!(player.midi_message_collector().sample_rate(), 48_000.0);
    }

    #[test]
    fn test_set_midi_output_swaps() {
        let player = ProcessorPlayer::new(false);
        let first = RecordingMidiOutput::new(false);
        let first_dyn: Arc<dyn MidiOutput> = first.clone();

        player.set_midi_output(Some(first_dyn.clone()));
        player.set_midi_output(Some(first_dyn.clone()));
        player.with_core(|core| {
            assert!(core
                .midi_output
                .as_ref()
                .is_some_and(|o| Arc::ptr_eq(o, &first_dyn)));
        });

        player.set_midi_output(None);
        player.with_core(|core| assert!(core.midi_output.is_none()));
    }

    #[test]
    fn test_drop_releases_prepared_processor() {
        let (mock, handle) = shared_mock(MockProcessor::new(ChannelCount::stereo()));
        {
            let player = ProcessorPlayer::new(false);
            player.audio_device_about_to_start(MockDevice::new(44_100.0, 32, 2, 2));
            player.set_processor(Some(handle));
        }
        assert_eq!(mock.lock().count(&Call::Release), 1);
    }

    #[test]
    fn test_player_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcessorPlayer>();
    }
}
