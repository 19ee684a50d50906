/// Read-pair classification counters and reporting
use log::info;

/// Running tallies for one pass of pair classification.
///
/// `total` counts every primary pair whose lead read has a mapped mate;
/// `good` and `bad` partition the pairs where both reads are placed.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RunningCounters {
    /// Pairs evaluated
    pub total: u64,
    /// Pairs with a plausible mapping
    pub good: u64,
    /// Pairs with an implausible mapping
    pub bad: u64,
    /// Pairs where both mates are placed
    pub both_mapped: u64,
    /// Mapper flagged the pair as properly paired
    pub properly_paired: u64,
    /// Both mapped, but not flagged properly paired
    pub improperly_paired: u64,
    /// Improper pairs with both mates on one contig
    pub same_contig: u64,
    /// Same-contig mates closer than one read length
    pub realistic_overlap: u64,
    pub unrealistic_overlap: u64,
    /// Cross-contig mates within the insert-size reach of contig ends
    pub realistic_fragment: u64,
    pub unrealistic_fragment: u64,
    /// Mates on opposite strands
    pub proper_orientation: u64,
    pub improper_orientation: u64,
}

impl RunningCounters {
    /// Create a zeroed tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Proportion of `denominator` pairs that mapped well (0 when empty).
    pub fn good_proportion(&self, denominator: u64) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            self.good as f64 / denominator as f64
        }
    }

    /// Percentage of `denominator` pairs that were evaluated (0 when empty).
    pub fn mapping_percent(&self, denominator: u64) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            100.0 * self.total as f64 / denominator as f64
        }
    }

    /// Print the classification breakdown to the log
    pub fn print_summary(&self) {
        if self.total == 0 {
            info!("No read pairs classified");
            return;
        }

        let pct = |n: u64| 100.0 * n as f64 / self.total as f64;

        info!("=== Read Pair Classification ===");
        info!("Pairs evaluated: {}", self.total);
        info!("Good pairs: {} ({:.2}%)", self.good, pct(self.good));
        info!("Bad pairs: {} ({:.2}%)", self.bad, pct(self.bad));
        info!("Both mates mapped: {}", self.both_mapped);
        info!(
            "Properly paired: {} (orientation ok {}, wrong {})",
            self.properly_paired, self.proper_orientation, self.improper_orientation
        );
        info!(
            "Improperly paired: {} (same contig {})",
            self.improperly_paired, self.same_contig
        );
        info!(
            "Overlaps: {} realistic, {} unrealistic",
            self.realistic_overlap, self.unrealistic_overlap
        );
        info!(
            "Cross-contig fragments: {} realistic, {} unrealistic",
            self.realistic_fragment, self.unrealistic_fragment
        );
    }
}
