/// Per-base read depth over assembly contigs, computed from a SAM stream
use crate::assembly::Assembly;
use crate::error::Error;
use crate::io::sam::{AlignmentCursor, RawRecord};
use log::{debug, warn};
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

/// One depth array per assembly contig, in assembly order.
#[derive(Debug, Clone)]
pub struct ContigDepths {
    depths: Vec<Vec<u32>>,
}

impl ContigDepths {
    /// Zero-filled depth arrays sized to each contig.
    pub fn zeroed(assembly: &Assembly) -> Self {
        Self {
            depths: assembly
                .contigs()
                .iter()
                .map(|c| vec![0u32; c.length as usize])
                .collect(),
        }
    }

    /// Depths for the contig at `idx` in assembly order.
    pub fn get(&self, idx: usize) -> Option<&[u32]> {
        self.depths.get(idx).map(Vec::as_slice)
    }

    /// Add one aligned block covering `len` bases from 0-based `start`.
    /// Bases past the end of the contig are ignored.
    fn add_block(&mut self, idx: usize, start: u64, len: u64) {
        let depths = &mut self.depths[idx];
        let from = (start as usize).min(depths.len());
        let to = (start.saturating_add(len) as usize).min(depths.len());
        for d in &mut depths[from..to] {
            *d = d.saturating_add(1);
        }
    }
}

/// What a single SAM line contributes to depth.
enum DepthHit {
    Skip,
    UnknownContig(String),
    Aligned {
        contig_idx: usize,
        start: u64,
        ops: Vec<Op>,
    },
}

/// Compute per-base depths for every assembly contig from a SAM file.
pub fn compute_depths(sam_path: &Path, assembly: &Assembly) -> Result<ContigDepths, Error> {
    let mut cursor = AlignmentCursor::open(sam_path)?;
    accumulate_depths(&mut cursor, assembly)
}

/// Stream records from `cursor` into depth arrays.
///
/// Follows the usual depth-counting conventions: unmapped, secondary,
/// QC-failed and duplicate records are skipped; only M, = and X
/// operations add depth, while D and N advance along the contig without
/// covering it.
pub fn accumulate_depths<R: BufRead>(
    cursor: &mut AlignmentCursor<R>,
    assembly: &Assembly,
) -> Result<ContigDepths, Error> {
    let mut depths = ContigDepths::zeroed(assembly);
    let mut unknown: HashSet<String> = HashSet::new();
    let mut n_counted = 0u64;

    while let Some(hit) = cursor.next_with(|line, line_num| decode_hit(line, line_num, assembly))? {
        match hit {
            DepthHit::Skip => {}
            DepthHit::UnknownContig(name) => {
                if unknown.is_empty() {
                    warn!("Alignments reference contig '{name}' which is not in the assembly; ignoring such records");
                }
                unknown.insert(name);
            }
            DepthHit::Aligned {
                contig_idx,
                start,
                ops,
            } => {
                let mut ref_pos = start;
                for op in ops {
                    let len = op.len() as u64;
                    match op.kind() {
                        Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                            depths.add_block(contig_idx, ref_pos, len);
                            ref_pos = ref_pos.saturating_add(len);
                        }
                        Kind::Deletion | Kind::Skip => ref_pos = ref_pos.saturating_add(len),
                        _ => {}
                    }
                }
                n_counted += 1;
            }
        }
    }

    debug!(
        "Depth computed from {} alignments ({} unknown contigs)",
        n_counted,
        unknown.len()
    );
    Ok(depths)
}

fn decode_hit(line: &[u8], line_num: u64, assembly: &Assembly) -> Result<DepthHit, Error> {
    let raw = RawRecord::parse(line, line_num)?;
    let flags = raw.flags()?;

    if flags.is_unmapped() || flags.is_secondary() || flags.is_qc_fail() || flags.is_duplicate() {
        return Ok(DepthHit::Skip);
    }

    let (Some(contig), Some(pos)) = (raw.reference_name(), raw.alignment_start()?) else {
        return Ok(DepthHit::Skip);
    };

    let Some(contig_idx) = assembly.index_of(&contig) else {
        return Ok(DepthHit::UnknownContig(contig.into_owned()));
    };

    Ok(DepthHit::Aligned {
        contig_idx,
        start: pos - 1,
        ops: raw.cigar_ops()?,
    })
}
