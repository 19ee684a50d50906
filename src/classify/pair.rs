/// Read pair plausibility classification
///
/// A mapped pair is judged in stages:
/// - properly paired (as flagged by the mapper): orientation decides
/// - improperly paired on one contig: mates must overlap, then orientation
/// - improperly paired across contigs: both mates must sit close enough to
///   their contig ends for one fragment to span the gap (a bridge)
use crate::classify::bridge::BridgeLedger;
use crate::io::sam::{AlignmentRecord, Locus};
use crate::stats::RunningCounters;
use std::collections::HashMap;

/// Number of standard deviations added to the insert size for the
/// cross-contig reach.
const INSERT_SD_MULTIPLIER: i64 = 3;

/// Overall judgement of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Bad,
    /// Not judged; contributes to neither `good` nor `bad`
    Skipped,
}

/// The decision branch that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Secondary or supplementary alignment, discarded
    NotPrimary,
    /// Mate unmapped or read unpaired; deliberately contributes nothing
    Single,
    /// Lead or mate has no placement; counted in `total` only
    Unplaced,
    /// Properly paired, opposite strands
    ProperPair,
    /// Same contig, mates overlap, opposite strands
    Overlap,
    UnrealisticOverlap,
    /// Cross-contig pair within reach of both contig ends
    Fragment,
    UnrealisticFragment,
    /// Mates on the same strand
    OrientationFail,
}

/// Result of classifying one read or pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairOutcome {
    pub verdict: Verdict,
    pub branch: Branch,
}

impl PairOutcome {
    fn new(verdict: Verdict, branch: Branch) -> Self {
        Self { verdict, branch }
    }
}

/// Classifies read pairs against the realistic-distance threshold.
#[derive(Debug, Clone)]
pub struct PairClassifier {
    realistic_distance: i64,
    contig_lengths: HashMap<String, u64>,
}

impl PairClassifier {
    /// # Arguments
    /// * `insert_size` - Mean fragment length of the library
    /// * `insert_sd` - Standard deviation of the fragment length
    pub fn new(insert_size: u32, insert_sd: u32) -> Self {
        Self {
            realistic_distance: i64::from(insert_size)
                + INSERT_SD_MULTIPLIER * i64::from(insert_sd),
            contig_lengths: HashMap::new(),
        }
    }

    /// Use these contig lengths (typically the SAM `@SQ` lines) for the
    /// distance-to-contig-end test.
    pub fn with_contig_lengths(mut self, contig_lengths: HashMap<String, u64>) -> Self {
        self.contig_lengths = contig_lengths;
        self
    }

    /// Largest summed distance to contig ends for a plausible bridge.
    pub fn realistic_distance(&self) -> i64 {
        self.realistic_distance
    }

    /// A read whose mate is unmapped, or which is unpaired.
    ///
    /// Single reads are not judged: the counters are left untouched.
    pub fn classify_single(&self, _read: &AlignmentRecord) -> PairOutcome {
        PairOutcome::new(Verdict::Skipped, Branch::Single)
    }

    /// Classify a pair whose lead read reports a mapped mate.
    pub fn classify_pair(
        &self,
        lead: &AlignmentRecord,
        mate: &AlignmentRecord,
        counters: &mut RunningCounters,
        ledger: &mut BridgeLedger,
    ) -> PairOutcome {
        if !lead.is_primary {
            return PairOutcome::new(Verdict::Skipped, Branch::NotPrimary);
        }

        counters.total += 1;

        let (Some(lead_locus), Some(mate_locus)) = (&lead.locus, &mate.locus) else {
            return PairOutcome::new(Verdict::Skipped, Branch::Unplaced);
        };
        counters.both_mapped += 1;

        if lead.properly_paired {
            counters.properly_paired += 1;
            return Self::check_orientation(lead, Branch::ProperPair, counters);
        }

        counters.improperly_paired += 1;
        if lead_locus.contig_id == mate_locus.contig_id {
            counters.same_contig += 1;
            Self::check_overlap(lead, lead_locus, mate_locus, counters)
        } else {
            self.check_fragment(lead, mate, lead_locus, mate_locus, counters, ledger)
        }
    }

    fn check_orientation(
        lead: &AlignmentRecord,
        branch: Branch,
        counters: &mut RunningCounters,
    ) -> PairOutcome {
        if lead.pair_opposite_strands() {
            counters.proper_orientation += 1;
            counters.good += 1;
            PairOutcome::new(Verdict::Good, branch)
        } else {
            counters.improper_orientation += 1;
            counters.bad += 1;
            PairOutcome::new(Verdict::Bad, Branch::OrientationFail)
        }
    }

    fn check_overlap(
        lead: &AlignmentRecord,
        lead_locus: &Locus,
        mate_locus: &Locus,
        counters: &mut RunningCounters,
    ) -> PairOutcome {
        let distance = lead_locus.position.abs_diff(mate_locus.position);
        if distance < lead.sequence_length {
            counters.realistic_overlap += 1;
            Self::check_orientation(lead, Branch::Overlap, counters)
        } else {
            counters.unrealistic_overlap += 1;
            counters.bad += 1;
            PairOutcome::new(Verdict::Bad, Branch::UnrealisticOverlap)
        }
    }

    fn check_fragment(
        &self,
        lead: &AlignmentRecord,
        mate: &AlignmentRecord,
        lead_locus: &Locus,
        mate_locus: &Locus,
        counters: &mut RunningCounters,
        ledger: &mut BridgeLedger,
    ) -> PairOutcome {
        let lead_dist = self.distance_to_contig_end(lead, lead_locus);
        let mate_dist = self.distance_to_contig_end(mate, mate_locus);

        if lead_dist + mate_dist <= self.realistic_distance {
            ledger.record(&lead_locus.contig_id, &mate_locus.contig_id);
            counters.realistic_fragment += 1;
            counters.good += 1;
            PairOutcome::new(Verdict::Good, Branch::Fragment)
        } else {
            counters.unrealistic_fragment += 1;
            counters.bad += 1;
            PairOutcome::new(Verdict::Bad, Branch::UnrealisticFragment)
        }
    }

    /// Distance from the mapping position to the nearer end of its contig.
    ///
    /// Falls back to the read's own sequence length when the contig length
    /// is unknown. A position past the contig end is at distance 0.
    fn distance_to_contig_end(&self, read: &AlignmentRecord, locus: &Locus) -> i64 {
        let length = self
            .contig_lengths
            .get(&locus.contig_id)
            .copied()
            .unwrap_or(read.sequence_length);
        if locus.position > length {
            log::debug!(
                "Read {} at {}:{} lies past the contig length {}",
                read.read_id,
                locus.contig_id,
                locus.position,
                length
            );
        }
        let pos = locus.position as i64;
        pos.min((length as i64 - pos).max(0))
    }
}
