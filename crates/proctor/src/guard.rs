//! Hand-off between a frame analysis and a caller that may stop waiting

use std::sync::atomic::{AtomicU8, Ordering};

const PENDING: u8 = 0;
const COMMITTED: u8 = 1;
const ABANDONED: u8 = 2;

/// Decides, exactly once, whether a frame's result will be used.
///
/// The analyzer commits before it writes temporal state; a caller that gave
/// up on the frame abandons it. Whichever happens first wins.
#[derive(Debug, Default)]
pub struct FrameGuard {
    state: AtomicU8,
}

impl FrameGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on the frame. Returns false if the analysis already committed,
    /// in which case its result must still be collected.
    pub fn abandon(&self) -> bool {
        match self
            .state
            .compare_exchange(PENDING, ABANDONED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => true,
            Err(current) => current == ABANDONED,
        }
    }

    /// Claim the frame for a state update. Returns false once abandoned.
    pub fn commit(&self) -> bool {
        match self
            .state
            .compare_exchange(PENDING, COMMITTED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => true,
            Err(current) => current == COMMITTED,
        }
    }

    pub fn is_abandoned(&self) -> bool {
        self.state.load(Ordering::SeqCst) == ABANDONED
    }
}
