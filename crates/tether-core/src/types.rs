//! Common types used throughout Tether.

// =============================================================================
// Channel Limits
// =============================================================================

/// Maximum number of channels on either side of a layout.
///
/// Generous enough for 22.2 surround. Devices or processors asking for more
/// are a configuration bug and trip a debug assertion when buffers are sized.
pub const MAX_CHANNELS: usize = 64;

/// A pair of input/output channel counts.
///
/// Used for the device's active channels, the processor's declared channels
/// and the layout negotiated between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelCount {
    /// Number of input channels.
    pub ins: usize,
    /// Number of output channels.
    pub outs: usize,
}

impl ChannelCount {
    /// Layout with no channels at all, used for MIDI-only processors.
    pub const NONE: Self = Self::new(0, 0);

    /// Create a new layout.
    pub const fn new(ins: usize, outs: usize) -> Self {
        Self { ins, outs }
    }

    /// Mono in, mono out.
    pub const fn mono() -> Self {
        Self::new(1, 1)
    }

    /// Stereo in, stereo out.
    pub const fn stereo() -> Self {
        Self::new(2, 2)
    }

    /// Number of channel slots a processor with this layout works on.
    ///
    /// Processors process in place, so inputs and outputs share slots.
    #[inline]
    pub const fn max_channels(&self) -> usize {
        if self.ins > self.outs {
            self.ins
        } else {
            self.outs
        }
    }

    /// True if there are neither inputs nor outputs.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.ins == 0 && self.outs == 0
    }
}

impl std::fmt::Display for ChannelCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}in/{}out", self.ins, self.outs)
    }
}

/// Numeric precision a processor runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// 32-bit float samples (the device format).
    #[default]
    Single,
    /// 64-bit float samples, bridged from the device's f32 buffers.
    Double,
}

impl Precision {
    /// Pick double precision only if the processor supports it and it was requested.
    #[inline]
    pub const fn negotiate(supports_double: bool, double_requested: bool) -> Self {
        if supports_double && double_requested {
            Self::Double
        } else {
            Self::Single
        }
    }
}

/// Opaque scheduling-affinity token handed from the device to the processor.
///
/// Devices that run their callback inside an OS workgroup expose its identity
/// here so the processor can join helper threads to it. The player compares
/// tokens by value only; it never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionContext(pub u64);

impl ExecutionContext {
    /// Create a token from a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}
