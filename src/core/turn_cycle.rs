//! Circular pointer over the seats.
//!
//! The pointer marks the current target. Finished players stay in the cycle;
//! callers skip them through the predicate they pass to the scans.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Circular turn pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCycle {
    len: usize,
    ptr: usize,
}

impl TurnCycle {
    /// Cycle over `player_count` seats pointing at seat 0.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self::with_pointer(player_count, 0)
    }

    #[must_use]
    pub fn with_pointer(player_count: usize, ptr: usize) -> Self {
        assert!(player_count > 0, "Turn cycle needs at least one seat");
        Self {
            len: player_count,
            ptr: ptr % player_count,
        }
    }

    /// The seat under the pointer.
    #[must_use]
    pub fn current(&self) -> PlayerId {
        PlayerId(self.ptr as u8)
    }

    #[must_use]
    pub fn pointer(&self) -> usize {
        self.ptr
    }

    pub fn set_pointer(&mut self, ptr: usize) {
        self.ptr = ptr % self.len;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First seat after the pointer (wrapping, current seat last) that
    /// satisfies `pred`.
    ///
    /// With `move_pointer` false the pointer is left untouched.
    pub fn advance_to(
        &mut self,
        pred: impl Fn(PlayerId) -> bool,
        move_pointer: bool,
    ) -> Option<PlayerId> {
        let found = (1..=self.len)
            .map(|step| (self.ptr + step) % self.len)
            .find(|&i| pred(PlayerId(i as u8)))?;
        if move_pointer {
            self.ptr = found;
        }
        Some(PlayerId(found as u8))
    }

    /// Like [`advance_to`](Self::advance_to) but scanning backwards.
    pub fn rewind_to(
        &mut self,
        pred: impl Fn(PlayerId) -> bool,
        move_pointer: bool,
    ) -> Option<PlayerId> {
        let found = (1..=self.len)
            .map(|step| (self.ptr + self.len * 2 - step) % self.len)
            .find(|&i| pred(PlayerId(i as u8)))?;
        if move_pointer {
            self.ptr = found;
        }
        Some(PlayerId(found as u8))
    }

    /// Read-only forward scan.
    #[must_use]
    pub fn peek_next(&self, pred: impl Fn(PlayerId) -> bool) -> Option<PlayerId> {
        let mut probe = *self;
        probe.advance_to(pred, false)
    }

    /// Read-only backward scan.
    #[must_use]
    pub fn peek_prev(&self, pred: impl Fn(PlayerId) -> bool) -> Option<PlayerId> {
        let mut probe = *self;
        probe.rewind_to(pred, false)
    }
}
