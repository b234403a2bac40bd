//! Per-frame scheduling seam between the driver and the host loop.

use std::collections::BTreeSet;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The host's "call me on the next frame" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancelling an unknown or already-fired handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Queue of requested frames, drained by the host once per display frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every handle requested so far, oldest first.
    /// Handles requested while the caller processes these land in the next batch.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.remove(&handle) {
            self.cancelled += 1;
        }
    }
}
