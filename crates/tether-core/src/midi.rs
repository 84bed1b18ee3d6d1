//! MIDI message types for the player.
//!
//! The player never parses MIDI. It timestamps raw short messages, hands them
//! to the processor in a per-block buffer and forwards whatever the processor
//! leaves there to the output sink. All types here are `Copy` and the block
//! buffer is a fixed-size array, so nothing allocates on the audio thread.

// =============================================================================
// MidiMessage
// =============================================================================

/// A raw short MIDI message (status byte plus up to two data bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MidiMessage {
    data: [u8; 3],
    len: u8,
}

impl MidiMessage {
    /// Build a message from raw bytes. Bytes past the third are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(3);
        let mut data = [0u8; 3];
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            data,
            len: len as u8,
        }
    }

    /// Note-on on `channel` (0-15).
    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            data: [0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            len: 3,
        }
    }

    /// Note-off on `channel` (0-15).
    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            data: [0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            len: 3,
        }
    }

    /// Control change on `channel` (0-15).
    pub const fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self {
            data: [0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F],
            len: 3,
        }
    }

    /// The message bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

/// A message placed at a sample offset inside the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MidiEvent {
    /// Sample offset within the block (0 = first sample).
    pub sample_offset: u32,
    /// The message.
    pub message: MidiMessage,
}

impl MidiEvent {
    /// Create an event at `sample_offset`.
    pub const fn new(sample_offset: u32, message: MidiMessage) -> Self {
        Self {
            sample_offset,
            message,
        }
    }
}

// =============================================================================
// MidiBuffer
// =============================================================================

/// Maximum number of MIDI events per block buffer.
pub const MAX_MIDI_EVENTS: usize = 1024;

/// Fixed-capacity buffer of MIDI events for one block.
///
/// Serves as both the processor's input and its output: the processor may
/// rewrite the buffer in place during `process`. Events are expected in
/// chronological order.
#[derive(Debug, Clone)]
pub struct MidiBuffer {
    events: [MidiEvent; MAX_MIDI_EVENTS],
    len: usize,
    /// Set when a push fails because the buffer is full.
    overflowed: bool,
}

impl MidiBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            events: [MidiEvent {
                sample_offset: 0,
                message: MidiMessage {
                    data: [0; 3],
                    len: 0,
                },
            }; MAX_MIDI_EVENTS],
            len: 0,
            overflowed: false,
        }
    }

    /// Create an empty buffer on the heap.
    ///
    /// The inline array is large; long-lived owners keep it boxed.
    pub fn boxed() -> Box<Self> {
        Box::new(Self::new())
    }

    /// Remove all events.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }

    /// Number of events.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if there are no events.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if a push failed since the last clear.
    #[inline]
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Append an event. Returns `false` and sets the overflow flag when full.
    #[inline]
    pub fn push(&mut self, event: MidiEvent) -> bool {
        if self.len < MAX_MIDI_EVENTS {
            self.events[self.len] = event;
            self.len += 1;
            true
        } else {
            self.overflowed = true;
            false
        }
    }

    /// Append `message` at `sample_offset`.
    #[inline]
    pub fn add(&mut self, message: MidiMessage, sample_offset: u32) -> bool {
        self.push(MidiEvent::new(sample_offset, message))
    }

    /// Iterate over the events.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &MidiEvent> {
        self.events[..self.len].iter()
    }

    /// The events as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[MidiEvent] {
        &self.events[..self.len]
    }
}

impl Default for MidiBuffer {
    fn default() -> Self {
        Self::new()
    }
}
