//! Buffers reused across detection calls.
//!
//! Contents are reset at the start of every call, so nothing leaks from one
//! frame into the next; only the allocations survive.
use crate::fit::VoteAccumulators;
use crate::pairing::ArcPairCache;

#[derive(Debug, Default)]
pub struct DetectorWorkspace {
    pub(crate) cache: ArcPairCache,
    pub(crate) accumulators: VoteAccumulators,
}

impl DetectorWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all per-call state.
    pub fn reset(&mut self) {
        self.cache.clear();
    }
}
