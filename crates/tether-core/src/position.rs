//! Timing information a processor can query while it processes.
//!
//! A processor holds an optional [`PositionSource`]. The player installs its
//! own source for the duration of a block if the processor has none, so the
//! processor can find out where it is on the running timeline. A source
//! installed by someone else is left alone.

// =============================================================================
// PositionInfo
// =============================================================================

/// Timing snapshot for the current block.
///
/// Fields that a source cannot provide are `None`, following the convention
/// of host transport types.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionInfo {
    /// Host timestamp for the start of the block, in nanoseconds.
    pub host_time_ns: Option<u64>,

    /// Samples processed since the processor was attached.
    pub time_in_samples: Option<u64>,

    /// `time_in_samples` expressed in seconds at the current sample rate.
    pub time_in_seconds: Option<f64>,
}

impl PositionInfo {
    /// Build a snapshot from a running sample counter.
    ///
    /// `time_in_seconds` is left empty when `sample_rate` is not positive.
    pub fn from_counter(host_time_ns: Option<u64>, samples: u64, sample_rate: f64) -> Self {
        let seconds = (sample_rate > 0.0).then(|| samples as f64 / sample_rate);
        Self {
            host_time_ns,
            time_in_samples: Some(samples),
            time_in_seconds: seconds,
        }
    }
}

// =============================================================================
// PositionSource
// =============================================================================

/// Something a processor can ask for the current position.
///
/// Called from the audio thread; implementations must not block for long or
/// allocate.
pub trait PositionSource: Send + Sync {
    /// The current position, or `None` if none is available right now.
    fn position(&self) -> Option<PositionInfo>;
}
