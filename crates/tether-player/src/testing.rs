//! Test doubles shared by the player tests.

use std::sync::Arc;

use parking_lot::Mutex;
use tether_core::{
    AudioBuffer, AudioDevice, ChannelCount, ExecutionContext, MidiBuffer, MidiEvent, MidiMessage,
    MidiOutput, PositionInfo, PositionSource, Precision, SharedProcessor,
};

/// What a [`MockProcessor`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Configure(ChannelCount, f64, usize),
    SetPrecision(Precision),
    Prepare(f64, usize),
    Release,
    Process(usize),
    ProcessF64(usize),
    ContextChanged(Option<ExecutionContext>),
}

/// Processor that multiplies every channel by `gain` and records its calls.
pub struct MockProcessor {
    pub declared: ChannelCount,
    /// Layouts accepted besides `declared`.
    pub accepted: Vec<ChannelCount>,
    pub midi_effect: bool,
    pub supports_double: bool,
    pub suspended: bool,
    pub gain: f32,
    /// Appended to the MIDI buffer on every block.
    pub emit: Option<MidiMessage>,
    pub precision: Precision,
    pub position: Option<Arc<dyn PositionSource>>,
    pub calls: Vec<Call>,
    /// Result of querying the position source during each block.
    pub positions: Vec<Option<PositionInfo>>,
    /// Incoming MIDI seen during each block.
    pub midi_seen: Vec<Vec<MidiEvent>>,
}

impl MockProcessor {
    pub fn new(declared: ChannelCount) -> Self {
        Self {
            declared,
            accepted: Vec::new(),
            midi_effect: false,
            supports_double: false,
            suspended: false,
            gain: 2.0,
            emit: None,
            precision: Precision::Single,
            position: None,
            calls: Vec::new(),
            positions: Vec::new(),
            midi_seen: Vec::new(),
        }
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn count_matching(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    fn record_block(&mut self, midi: &mut MidiBuffer) {
        let position = self.position.as_ref().and_then(|source| source.position());
        self.positions.push(position);
        self.midi_seen.push(midi.as_slice().to_vec());
        if let Some(message) = self.emit {
            midi.add(message, 0);
        }
    }
}

impl tether_core::AudioProcessor for MockProcessor {
    fn is_midi_effect(&self) -> bool {
        self.midi_effect
    }

    fn declared_channels(&self) -> ChannelCount {
        self.declared
    }

    fn accepts_layout(&self, layout: ChannelCount) -> bool {
        layout == self.declared || self.accepted.contains(&layout)
    }

    fn configure(&mut self, layout: ChannelCount, sample_rate: f64, block_size: usize) {
        self.calls.push(Call::Configure(layout, sample_rate, block_size));
    }

    fn supports_double_precision(&self) -> bool {
        self.supports_double
    }

    fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
        self.calls.push(Call::SetPrecision(precision));
    }

    fn precision(&self) -> Precision {
        self.precision
    }

    fn prepare(&mut self, sample_rate: f64, block_size: usize) {
        self.calls.push(Call::Prepare(sample_rate, block_size));
    }

    fn release(&mut self) {
        self.calls.push(Call::Release);
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn process(&mut self, buffer: &mut AudioBuffer<'_, f32>, midi: &mut MidiBuffer) {
        self.calls.push(Call::Process(buffer.num_samples()));
        for ch in 0..buffer.num_channels() {
            for s in buffer.channel_mut(ch) {
                *s *= self.gain;
            }
        }
        self.record_block(midi);
    }

    fn process_f64(&mut self, buffer: &mut AudioBuffer<'_, f64>, midi: &mut MidiBuffer) {
        self.calls.push(Call::ProcessF64(buffer.num_samples()));
        let gain = self.gain as f64;
        for ch in 0..buffer.num_channels() {
            for s in buffer.channel_mut(ch) {
                *s *= gain;
            }
        }
        self.record_block(midi);
    }

    fn set_position_source(&mut self, source: Option<Arc<dyn PositionSource>>) {
        self.position = source;
    }

    fn position_source(&self) -> Option<&Arc<dyn PositionSource>> {
        self.position.as_ref()
    }

    fn execution_context_changed(&mut self, context: Option<ExecutionContext>) {
        self.calls.push(Call::ContextChanged(context));
    }
}

/// Wrap a mock so the test keeps typed access next to the player's handle.
pub fn shared_mock(mock: MockProcessor) -> (Arc<Mutex<MockProcessor>>, SharedProcessor) {
    let typed = Arc::new(Mutex::new(mock));
    let handle: SharedProcessor = typed.clone();
    (typed, handle)
}

/// Device with fixed settings.
pub struct MockDevice {
    pub sample_rate: f64,
    pub block_size: usize,
    pub ins: usize,
    pub outs: usize,
    pub context: Mutex<Option<ExecutionContext>>,
}

impl MockDevice {
    pub fn new(sample_rate: f64, block_size: usize, ins: usize, outs: usize) -> Arc<Self> {
        Arc::new(Self {
            sample_rate,
            block_size,
            ins,
            outs,
            context: Mutex::new(None),
        })
    }
}

impl AudioDevice for MockDevice {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn active_input_channels(&self) -> usize {
        self.ins
    }

    fn active_output_channels(&self) -> usize {
        self.outs
    }

    fn execution_context(&self) -> Option<ExecutionContext> {
        *self.context.lock()
    }
}

/// How a block reached the [`RecordingMidiOutput`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Queued {
        events: Vec<MidiEvent>,
        sample_rate: f64,
    },
    Now(Vec<MidiEvent>),
}

/// MIDI output that remembers every block it was given.
pub struct RecordingMidiOutput {
    pub background: bool,
    pub sent: Mutex<Vec<Sent>>,
}

impl RecordingMidiOutput {
    pub fn new(background: bool) -> Arc<Self> {
        Arc::new(Self {
            background,
            sent: Mutex::new(Vec::new()),
        })
    }
}

impl MidiOutput for RecordingMidiOutput {
    fn is_background_thread_running(&self) -> bool {
        self.background
    }

    fn send_block_of_messages(&self, buffer: &MidiBuffer, _start_time_ms: f64, sample_rate: f64) {
        self.sent.lock().push(Sent::Queued {
            events: buffer.as_slice().to_vec(),
            sample_rate,
        });
    }

    fn send_block_of_messages_now(&self, buffer: &MidiBuffer) {
        self.sent.lock().push(Sent::Now(buffer.as_slice().to_vec()));
    }
}

/// Position source installed from outside the player.
pub struct FixedPosition(pub PositionInfo);

impl PositionSource for FixedPosition {
    fn position(&self) -> Option<PositionInfo> {
        Some(self.0)
    }
}

/// Device-side channel storage for driving a callback.
pub struct DeviceBuffers {
    pub ins: Vec<Vec<f32>>,
    pub outs: Vec<Vec<f32>>,
}

impl DeviceBuffers {
    /// Input channel `i` holds `i + 1`; outputs hold garbage.
    pub fn new(ins: usize, outs: usize, num_samples: usize) -> Self {
        Self {
            ins: (0..ins).map(|i| vec![(i + 1) as f32; num_samples]).collect(),
            outs: vec![vec![-7.0; num_samples]; outs],
        }
    }

    /// Run one callback against these buffers.
    pub fn run(
        &mut self,
        callback: &dyn tether_core::AudioDeviceCallback,
        num_samples: usize,
        context: &tether_core::CallbackContext,
    ) {
        let ins: Vec<&[f32]> = self.ins.iter().map(Vec::as_slice).collect();
        let mut outs: Vec<&mut [f32]> = self.outs.iter_mut().map(Vec::as_mut_slice).collect();
        callback.audio_device_io_callback(&ins, &mut outs, num_samples, context);
    }

    pub fn output_is(&self, channel: usize, value: f32) -> bool {
        self.outs[channel].iter().all(|&s| s == value)
    }
}
