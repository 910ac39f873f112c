// ---------------------------------------------------------------------------
// Equal-width binning
// ---------------------------------------------------------------------------

/// Bin count used for every feature panel.
pub const BINS: usize = 30;

/// Frequency counts over equal-width bins.
///
/// `edges` has `counts.len() + 1` entries. Every bin is half-open except the
/// last, which also includes its right edge, so the maximum value is counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin the finite values of `values` into `bins` buckets spanning their
    /// range. No values gives the range `[0, 1]`; a single distinct value `v`
    /// gives `[v - 0.5, v + 0.5]`.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (mut lo, mut hi) = finite
            .clone()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo > hi {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        edges[bins] = hi;

        let mut counts = vec![0u64; bins];
        for v in finite {
            let idx = (((v - lo) / (hi - lo)) * bins as f64) as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Histogram { edges, counts }
    }

    #[cfg(test)]
    fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    #[cfg(test)]
    fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
