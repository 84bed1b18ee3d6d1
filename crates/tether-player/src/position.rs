//! The player's position source and its per-block lease.
//!
//! The player owns one [`HostPosition`] for its whole life. For each block
//! a [`PositionLease`] publishes that block's snapshot and, if the processor
//! has no source of its own, installs the player's. Dropping the lease undoes
//! both, on every exit path including a panic inside `process`.

use std::sync::Arc;

use parking_lot::Mutex;
use tether_core::{AudioProcessor, PositionInfo, PositionSource};

/// Position source backed by the player's running sample counter.
///
/// Reports a position only while a block is being processed.
#[derive(Debug, Default)]
pub struct HostPosition {
    snapshot: Mutex<Option<PositionInfo>>,
}

impl HostPosition {
    /// Create a source with nothing published.
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, info: PositionInfo) {
        *self.snapshot.lock() = Some(info);
    }

    fn revoke(&self) {
        *self.snapshot.lock() = None;
    }
}

impl PositionSource for HostPosition {
    fn position(&self) -> Option<PositionInfo> {
        *self.snapshot.lock()
    }
}

/// Scoped access to a processor with the player's position published.
pub struct PositionLease<'a> {
    processor: &'a mut dyn AudioProcessor,
    source: &'a Arc<HostPosition>,
    installed: bool,
}

impl<'a> PositionLease<'a> {
    /// Publish `info` and install `source` on `processor` if it has none.
    ///
    /// Does not allocate: installing clones the `Arc`.
    pub fn acquire(
        processor: &'a mut dyn AudioProcessor,
        source: &'a Arc<HostPosition>,
        info: PositionInfo,
    ) -> Self {
        let install = processor.position_source().is_none();

        source.publish(info);
        if install {
            let shared: Arc<dyn PositionSource> = source.clone();
            processor.set_position_source(Some(shared));
        }

        Self {
            processor,
            source,
            installed: install,
        }
    }

    /// The processor, for the duration of the lease.
    #[inline]
    pub fn processor(&mut self) -> &mut (dyn AudioProcessor + 'a) {
        &mut *self.processor
    }

    /// True if the lease installed the player's source.
    #[inline]
    pub fn installed(&self) -> bool {
        self.installed
    }
}

impl Drop for PositionLease<'_> {
    fn drop(&mut self) {
        if self.installed {
            self.processor.set_position_source(None);
        }
        self.source.revoke();
    }
}
