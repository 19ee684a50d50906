/// Drives pair classification over an alignment stream
use crate::classify::bridge::BridgeLedger;
use crate::classify::pair::PairClassifier;
use crate::error::Error;
use crate::io::sam::{AlignmentCursor, AlignmentRecord, read_base_name};
use crate::params::PairingMode;
use crate::stats::RunningCounters;
use log::{debug, warn};
use std::collections::HashMap;
use std::io::BufRead;

/// How the stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// Every primary record was resolved
    #[default]
    Complete,
    /// The stream ended while a mate was still expected; the waiting
    /// record(s) were dropped without being counted
    Truncated,
}

/// Stream-level bookkeeping that is not part of the pair counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub termination: Termination,
    /// Records decoded from the stream
    pub records: u64,
    /// Secondary/supplementary records discarded
    pub not_primary: u64,
    /// Reads routed to the single-read branch
    pub singles: u64,
    /// Adjacent-mode pairs whose read names disagree
    pub mismatched_mates: u64,
    /// Primary records left without a mate at end of stream
    pub dangling: u64,
}

impl PairClassifier {
    /// Classify every read pair in `cursor`, updating `counters` and
    /// `ledger`.
    pub fn classify_stream<R: BufRead>(
        &self,
        cursor: &mut AlignmentCursor<R>,
        mode: PairingMode,
        counters: &mut RunningCounters,
        ledger: &mut BridgeLedger,
    ) -> Result<StreamSummary, Error> {
        let mut summary = match mode {
            PairingMode::Adjacent => self.classify_adjacent(cursor, counters, ledger)?,
            PairingMode::ByName => self.classify_by_name(cursor, counters, ledger)?,
        };
        summary.records = cursor.records_read();

        if summary.mismatched_mates > 0 {
            warn!(
                "{} adjacent records had differing read names; the mapper output may not be pair-interleaved (try --pairing byName)",
                summary.mismatched_mates
            );
        }
        if summary.termination == Termination::Truncated {
            debug!(
                "Alignment stream ended with {} unpaired record(s) waiting for a mate",
                summary.dangling
            );
        }
        Ok(summary)
    }

    /// Mates are the record immediately after their lead.
    fn classify_adjacent<R: BufRead>(
        &self,
        cursor: &mut AlignmentCursor<R>,
        counters: &mut RunningCounters,
        ledger: &mut BridgeLedger,
    ) -> Result<StreamSummary, Error> {
        let mut summary = StreamSummary::default();

        while let Some(lead) = cursor.next_record()? {
            if !lead.is_primary {
                summary.not_primary += 1;
                continue;
            }

            if lead.mate_unmapped {
                self.classify_single(&lead);
                summary.singles += 1;
                // An unmapped mate is still written out next to its lead.
                if lead.is_paired && next_is_mate(cursor, &lead)? {
                    cursor.next_record()?;
                }
                continue;
            }

            let Some(mate) = cursor.next_record()? else {
                summary.termination = Termination::Truncated;
                summary.dangling += 1;
                break;
            };

            if read_base_name(&lead.read_id) != read_base_name(&mate.read_id) {
                summary.mismatched_mates += 1;
            }
            self.classify_pair(&lead, &mate, counters, ledger);
        }

        Ok(summary)
    }

    /// Mates are matched by read name; the first-seen record leads.
    fn classify_by_name<R: BufRead>(
        &self,
        cursor: &mut AlignmentCursor<R>,
        counters: &mut RunningCounters,
        ledger: &mut BridgeLedger,
    ) -> Result<StreamSummary, Error> {
        let mut summary = StreamSummary::default();
        let mut pending: HashMap<String, AlignmentRecord> = HashMap::new();

        while let Some(record) = cursor.next_record()? {
            if !record.is_primary {
                summary.not_primary += 1;
                continue;
            }

            if !record.is_paired {
                self.classify_single(&record);
                summary.singles += 1;
                continue;
            }

            let name = read_base_name(&record.read_id).to_string();
            match pending.remove(&name) {
                Some(lead) if lead.mate_unmapped => {
                    self.classify_single(&lead);
                    summary.singles += 1;
                }
                Some(lead) => {
                    self.classify_pair(&lead, &record, counters, ledger);
                }
                None => {
                    pending.insert(name, record);
                }
            }
        }

        if !pending.is_empty() {
            summary.termination = Termination::Truncated;
            summary.dangling = pending.len() as u64;
        }

        Ok(summary)
    }
}

/// Whether the next record is the primary mate of `lead`.
fn next_is_mate<R: BufRead>(
    cursor: &mut AlignmentCursor<R>,
    lead: &AlignmentRecord,
) -> Result<bool, Error> {
    Ok(cursor.peek_record()?.is_some_and(|next| {
        next.is_primary && read_base_name(&next.read_id) == read_base_name(&lead.read_id)
    }))
}
