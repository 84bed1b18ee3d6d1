//! Single/double precision bridging.
//!
//! Devices deliver f32. A processor running at double precision gets an f64
//! copy of the routed buffer, processes it, and the result is converted back
//! into the device's channels.
//!
//! # Real-Time Safety
//!
//! - Storage is sized once with `set_size()` on the control thread
//! - `process()` only copies into and out of that storage

use tether_core::{AudioBuffer, Sample, ScratchBuffer};

/// Persistent conversion storage in precision `D`.
#[derive(Debug, Default)]
pub struct PrecisionBridge<D: Sample> {
    storage: ScratchBuffer<D>,
}

impl<D: Sample> PrecisionBridge<D> {
    /// Create a bridge with no storage.
    pub fn new() -> Self {
        Self {
            storage: ScratchBuffer::new(),
        }
    }

    /// Size the storage for `num_channels` x `num_samples`.
    ///
    /// Allocates; control thread only. No-op when unchanged.
    pub fn set_size(&mut self, num_channels: usize, num_samples: usize) {
        self.storage.set_size(num_channels, num_samples);
    }

    /// Allocated channel count.
    pub fn num_channels(&self) -> usize {
        self.storage.num_channels()
    }

    /// Allocated samples per channel.
    pub fn num_samples(&self) -> usize {
        self.storage.num_samples()
    }

    /// Run `f` on a precision `D` copy of `buffer`, then copy the result back.
    ///
    /// The copy has exactly the shape of `buffer`.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is larger than the allocated storage.
    pub fn process<S, F>(&mut self, buffer: &mut AudioBuffer<'_, S>, f: F)
    where
        S: Sample,
        F: FnOnce(&mut AudioBuffer<'_, D>),
    {
        let mut converted = self
            .storage
            .buffer(buffer.num_channels(), buffer.num_samples());
        converted.copy_from(buffer);
        f(&mut converted);
        buffer.copy_from(&converted);
    }
}
