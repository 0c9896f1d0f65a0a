//! Integer vote histograms used by the parameter estimator.

/// Fixed-size histogram of integer bins with an arg-max election.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    bins: Vec<u32>,
}

impl Accumulator {
    pub fn new(num_bins: usize) -> Self {
        Self {
            bins: vec![0; num_bins],
        }
    }

    /// Zero all bins, resizing to `num_bins` when needed.
    pub fn reset(&mut self, num_bins: usize) {
        self.bins.clear();
        self.bins.resize(num_bins, 0);
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Add one vote. Out-of-range bins are ignored.
    #[inline]
    pub fn vote(&mut self, bin: usize) {
        if let Some(slot) = self.bins.get_mut(bin) {
            *slot += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&v| v as u64).sum()
    }

    /// Bin with the most votes; ties go to the lowest index, an empty or
    /// all-zero histogram elects bin 0.
    pub fn argmax(&self) -> usize {
        let mut best_idx = 0;
        let mut best_val = 0;
        for (i, &val) in self.bins.iter().enumerate() {
            if val > best_val {
                best_val = val;
                best_idx = i;
            }
        }
        best_idx
    }

    #[cfg(test)]
    pub(crate) fn bins(&self) -> &[u32] {
        &self.bins
    }
}

/// Number of axis-ratio bins (`N` in steps of 0.01 over `[0, 1]`).
pub const N_BINS: usize = 101;
/// Number of orientation bins (whole degrees over `[0, 180)`).
pub const RHO_BINS: usize = 180;

/// The three histograms one triplet votes into.
#[derive(Clone, Debug, Default)]
pub struct VoteAccumulators {
    pub n: Accumulator,
    pub rho: Accumulator,
    pub a: Accumulator,
}

impl VoteAccumulators {
    /// Clear all histograms; the semi-major one gets `a_bins` bins.
    pub fn reset(&mut self, a_bins: usize) {
        self.n.reset(N_BINS);
        self.rho.reset(RHO_BINS);
        self.a.reset(a_bins);
    }
}
