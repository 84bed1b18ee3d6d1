//! Incoming MIDI collection.
//!
//! MIDI input threads push timestamped messages here; the audio callback
//! drains one block's worth at a time and gets each message placed at a
//! sample offset inside the block.
//!
//! # Timing
//!
//! Timestamps are seconds on the collector's clock ([`MidiMessageCollector::now`]).
//! A message is stamped with its distance in samples from the previous drain.
//! On the next drain the time elapsed since the previous drain is compared
//! to the block length:
//!
//! - Elapsed span longer than the block: positions are scaled down to fit.
//!   At most the last 32 blocks' worth of span is kept; older messages are
//!   dropped.
//! - Elapsed span shorter than the block: messages keep their spacing and
//!   are placed towards the end of the block.
//!
//! Either way every offset lands in `[0, num_samples)`.

use std::time::Instant;

use parking_lot::Mutex;
use tether_core::{MidiBuffer, MidiMessage, DEFAULT_MIDI_QUEUE_CAPACITY};

/// A message waiting for the next block.
#[derive(Debug, Clone, Copy)]
struct QueuedMessage {
    /// Samples after the last drain.
    sample_position: i64,
    message: MidiMessage,
}

#[derive(Debug)]
struct CollectorState {
    /// Sorted by `sample_position`. Capacity is reserved up front.
    queue: Vec<QueuedMessage>,
    capacity: usize,
    sample_rate: f64,
    last_callback_ms: f64,
    has_reset: bool,
}

/// Thread-safe queue between MIDI input and the audio callback.
#[derive(Debug)]
pub struct MidiMessageCollector {
    state: Mutex<CollectorState>,
    epoch: Instant,
}

impl MidiMessageCollector {
    /// Create a collector with the default queue capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MIDI_QUEUE_CAPACITY)
    }

    /// Create a collector holding at most `capacity` pending messages.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CollectorState {
                queue: Vec::with_capacity(capacity),
                capacity,
                sample_rate: 0.0,
                last_callback_ms: 0.0,
                has_reset: false,
            }),
            epoch: Instant::now(),
        }
    }

    /// Seconds since the collector was created. Timestamps use this clock.
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Milliseconds since the collector was created.
    pub fn now_ms(&self) -> f64 {
        self.now() * 1000.0
    }

    /// Maximum number of pending messages.
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Number of messages waiting for the next block.
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Sample rate set by the last reset, or 0 before the first reset.
    pub fn sample_rate(&self) -> f64 {
        self.state.lock().sample_rate
    }

    /// Drop all pending messages and restart timing at `sample_rate`.
    ///
    /// Messages are ignored until the first reset.
    pub fn reset(&self, sample_rate: f64) {
        self.reset_at(sample_rate, self.now_ms());
    }

    /// [`reset`](Self::reset) with an explicit clock reading in milliseconds.
    pub fn reset_at(&self, sample_rate: f64, now_ms: f64) {
        let mut state = self.state.lock();
        state.sample_rate = sample_rate;
        state.queue.clear();
        state.last_callback_ms = now_ms;
        state.has_reset = true;
    }

    /// Queue a message received at `timestamp` seconds on the collector clock.
    ///
    /// Dropped with a warning if the collector has not been reset or the
    /// queue is full.
    pub fn add_message_to_queue(&self, message: MidiMessage, timestamp: f64) {
        let mut state = self.state.lock();

        if !state.has_reset || state.sample_rate <= 0.0 {
            log::warn!("MIDI message dropped: collector has no sample rate yet");
            return;
        }

        let sample_rate = state.sample_rate;
        let position = ((timestamp - 0.001 * state.last_callback_ms) * sample_rate) as i64;

        // Nothing drained for over a second; forget what is older than that.
        let one_second = sample_rate as i64;
        if position > one_second {
            let cutoff = position - one_second;
            state.queue.retain(|m| m.sample_position >= cutoff);
        }

        if state.queue.len() >= state.capacity {
            log::warn!(
                "MIDI message dropped: queue full ({} messages)",
                state.capacity
            );
            return;
        }

        let index = state
            .queue
            .partition_point(|m| m.sample_position <= position);
        state.queue.insert(
            index,
            QueuedMessage {
                sample_position: position,
                message,
            },
        );
    }

    /// Move the pending messages into `dest`, fitted into `num_samples`.
    ///
    /// Called from the audio thread. Does not allocate or log.
    pub fn remove_next_block_of_messages(&self, dest: &mut MidiBuffer, num_samples: usize) {
        self.remove_next_block_of_messages_at(dest, num_samples, self.now_ms());
    }

    /// [`remove_next_block_of_messages`](Self::remove_next_block_of_messages)
    /// with an explicit clock reading in milliseconds.
    pub fn remove_next_block_of_messages_at(
        &self,
        dest: &mut MidiBuffer,
        num_samples: usize,
        now_ms: f64,
    ) {
        // An empty block leaves the queue and the clock for the next one.
        if num_samples == 0 {
            return;
        }

        let mut state = self.state.lock();

        let elapsed_ms = now_ms - state.last_callback_ms;
        state.last_callback_ms = now_ms;

        if state.queue.is_empty() {
            return;
        }

        let block = num_samples as i64;
        let last = block.saturating_sub(1).max(0);
        let mut source_len = ((elapsed_ms * 0.001 * state.sample_rate).round() as i64).max(1);

        if source_len > block {
            let max_len = block << 5;
            let mut start = 0;
            if source_len > max_len {
                start = source_len - max_len;
                source_len = max_len;
            }

            let scale = (block << 10) / source_len;
            for queued in state.queue.iter().filter(|m| m.sample_position >= start) {
                let position = (((queued.sample_position - start) * scale) >> 10).clamp(0, last);
                dest.add(queued.message, position as u32);
            }
        } else {
            let start = block - source_len;
            for queued in &state.queue {
                let position = (queued.sample_position + start).clamp(0, last);
                dest.add(queued.message, position as u32);
            }
        }

        state.queue.clear();
    }
}

impl Default for MidiMessageCollector {
    fn default() -> Self {
        Self::new()
    }
}
