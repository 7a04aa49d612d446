/// Snapshot of the spectrum tap's frequency bins
///
/// One byte-scaled magnitude per bin, low to high frequency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpectrumSnapshot {
    bins: Vec<u8>,
}

impl SpectrumSnapshot {
    /// Wrap bin magnitudes
    pub fn new(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    /// An all-zero snapshot with `count` bins
    pub fn silent(count: usize) -> Self {
        Self {
            bins: vec![0; count],
        }
    }

    /// Bin magnitudes
    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether there are no bins
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Loudest bin
    pub fn peak(&self) -> u8 {
        self.bins.iter().copied().max().unwrap_or(0)
    }
}
