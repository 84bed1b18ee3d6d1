//! Channel buffers shared between the device callback and the processor.
//!
//! The processor sees one [`AudioBuffer`] per block: a set of channels it reads
//! its inputs from and writes its outputs into, in place. The channels are not
//! owned by the buffer. They alias device output memory or scratch storage, so
//! the buffer is built from raw pointers collected by the router.
//!
//! # Pattern
//!
//! 1. Size a [`ChannelBufferSet`] and any [`ScratchBuffer`] once, when the
//!    device or processor configuration changes (non-real-time)
//! 2. Overwrite the slot pointers at the start of each block (no allocation)
//! 3. Build an [`AudioBuffer`] view over the first N slots
//!
//! # Real-Time Safety
//!
//! - `set()` and `buffer()` never allocate
//! - `ScratchBuffer::set_size()` is a no-op when the size is unchanged
//! - All resizing happens in `resize()` / `set_size()` on the control thread

use std::marker::PhantomData;
use std::ptr;
use std::slice;

use crate::sample::Sample;

// =============================================================================
// AudioBuffer
// =============================================================================

/// In-place audio buffer handed to a processor for one block.
///
/// Every channel is both readable (it may hold input data) and writable (the
/// processor leaves its output there). Channels never alias each other.
pub struct AudioBuffer<'a, S: Sample> {
    channels: &'a [*mut S],
    num_samples: usize,
    _marker: PhantomData<&'a mut [S]>,
}

impl<'a, S: Sample> AudioBuffer<'a, S> {
    /// Build a buffer view from channel pointers.
    ///
    /// # Safety
    ///
    /// - Every pointer must be valid for reads and writes of `num_samples`
    ///   samples for the whole lifetime `'a`
    /// - No two pointers may overlap
    /// - Nothing else may access the pointed-to memory during `'a`
    pub unsafe fn from_raw_parts(channels: &'a [*mut S], num_samples: usize) -> Self {
        Self {
            channels,
            num_samples,
            _marker: PhantomData,
        }
    }

    /// Number of channels in the buffer.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Read access to one channel.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn channel(&self, index: usize) -> &[S] {
        let ptr = self.channels[index];
        // SAFETY: from_raw_parts guarantees the pointer is valid for
        // num_samples reads during 'a, and &self prevents concurrent writes.
        unsafe { slice::from_raw_parts(ptr, self.num_samples) }
    }

    /// Write access to one channel.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [S] {
        let ptr = self.channels[index];
        // SAFETY: from_raw_parts guarantees the pointer is valid and not
        // aliased by another channel; &mut self makes this the only live view.
        unsafe { slice::from_raw_parts_mut(ptr, self.num_samples) }
    }

    /// Iterate over all channels for reading.
    pub fn iter(&self) -> impl Iterator<Item = &[S]> + '_ {
        (0..self.num_channels()).map(move |ch| self.channel(ch))
    }

    /// Fill every channel with silence.
    pub fn clear(&mut self) {
        for ch in 0..self.num_channels() {
            self.channel_mut(ch).fill(S::ZERO);
        }
    }

    /// Copy another buffer of identical shape into this one, converting samples.
    ///
    /// Shapes are a precondition, checked in debug builds. In release builds
    /// only the overlapping region is copied.
    pub fn copy_from<T: Sample>(&mut self, source: &AudioBuffer<'_, T>) {
        debug_assert_eq!(
            self.num_channels(),
            source.num_channels(),
            "channel count mismatch"
        );
        debug_assert_eq!(
            self.num_samples(),
            source.num_samples(),
            "sample count mismatch"
        );

        let channels = self.num_channels().min(source.num_channels());
        for ch in 0..channels {
            let dst = self.channel_mut(ch);
            for (d, &s) in dst.iter_mut().zip(source.channel(ch)) {
                *d = S::from_sample(s);
            }
        }
    }
}

impl<S: Sample> std::fmt::Debug for AudioBuffer<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioBuffer")
            .field("num_channels", &self.num_channels())
            .field("num_samples", &self.num_samples)
            .finish()
    }
}

// =============================================================================
// ChannelBufferSet
// =============================================================================

/// Pre-sized table of channel pointer slots.
///
/// Holds one slot per channel the processor may touch. The slot count is fixed
/// between reconfigurations; the router rewrites the pointers every block.
#[derive(Debug)]
pub struct ChannelBufferSet<S: Sample> {
    slots: Vec<*mut S>,
}

impl<S: Sample> ChannelBufferSet<S> {
    /// Create an empty set (no slots).
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Create a set with `count` null slots.
    pub fn with_slots(count: usize) -> Self {
        let mut set = Self::new();
        set.resize(count);
        set
    }

    /// Change the number of slots. Allocates; call from the control thread only.
    pub fn resize(&mut self, count: usize) {
        if count != self.slots.len() {
            self.slots.resize(count, ptr::null_mut());
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if there are no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocated slot capacity. Stays constant across blocks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Point a slot at channel memory.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn set(&mut self, index: usize, channel: *mut S) {
        self.slots[index] = channel;
    }

    /// Build a buffer view over the first `num_channels` slots.
    ///
    /// # Safety
    ///
    /// The first `num_channels` slots must satisfy the contract of
    /// [`AudioBuffer::from_raw_parts`] for the lifetime of the returned view.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` exceeds the slot count.
    #[inline]
    pub unsafe fn buffer(&mut self, num_channels: usize, num_samples: usize) -> AudioBuffer<'_, S> {
        // SAFETY: forwarded to the caller.
        unsafe { AudioBuffer::from_raw_parts(&self.slots[..num_channels], num_samples) }
    }
}

impl<S: Sample> Default for ChannelBufferSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: The pointers are only dereferenced through AudioBuffer views, which
// are built and dropped inside a single callback under the player lock.
unsafe impl<S: Sample> Send for ChannelBufferSet<S> {}

// =============================================================================
// ScratchBuffer
// =============================================================================

/// Owned multi-channel sample storage.
///
/// Used for processor inputs that have no matching device output, and as the
/// storage behind the precision bridge. Carries its own slot table so it can
/// be viewed as an [`AudioBuffer`] without allocating.
#[derive(Debug)]
pub struct ScratchBuffer<S: Sample> {
    channels: Vec<Vec<S>>,
    slots: ChannelBufferSet<S>,
    num_samples: usize,
}

impl<S: Sample> ScratchBuffer<S> {
    /// Create empty storage (no channels).
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            slots: ChannelBufferSet::new(),
            num_samples: 0,
        }
    }

    /// Create zeroed storage of the given size.
    pub fn with_size(num_channels: usize, num_samples: usize) -> Self {
        let mut buffer = Self::new();
        buffer.set_size(num_channels, num_samples);
        buffer
    }

    /// Resize the storage. Allocates; call from the control thread only.
    ///
    /// No-op when the size is unchanged. Channel contents are not preserved.
    pub fn set_size(&mut self, num_channels: usize, num_samples: usize) {
        if num_channels == self.channels.len() && num_samples == self.num_samples {
            return;
        }

        self.channels.resize_with(num_channels, Vec::new);
        for channel in &mut self.channels {
            channel.clear();
            channel.resize(num_samples, S::ZERO);
        }
        self.slots.resize(num_channels);
        self.num_samples = num_samples;
    }

    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Read access to one channel.
    #[inline]
    pub fn channel(&self, index: usize) -> &[S] {
        &self.channels[index]
    }

    /// Write access to one channel.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [S] {
        &mut self.channels[index]
    }

    /// View the first `num_channels` x `num_samples` region as an [`AudioBuffer`].
    ///
    /// # Panics
    ///
    /// Panics if the region exceeds the allocated size.
    pub fn buffer(&mut self, num_channels: usize, num_samples: usize) -> AudioBuffer<'_, S> {
        assert!(
            num_channels <= self.channels.len() && num_samples <= self.num_samples,
            "scratch region {}x{} exceeds allocated {}x{}",
            num_channels,
            num_samples,
            self.channels.len(),
            self.num_samples
        );

        for (index, channel) in self.channels.iter_mut().take(num_channels).enumerate() {
            self.slots.set(index, channel.as_mut_ptr());
        }

        // SAFETY: each slot points at a distinct Vec owned by self holding at
        // least num_samples samples; the view borrows self mutably, so the
        // storage cannot be resized or accessed elsewhere while it lives.
        unsafe { self.slots.buffer(num_channels, num_samples) }
    }
}

impl<S: Sample> Default for ScratchBuffer<S> {
    fn default() -> Self {
        Self::new()
    }
}
