/// Per-contig and assembly-wide coverage statistics
use crate::assembly::Assembly;
use crate::error::Error;
use crate::io::ContigDepths;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default minimum contig length for coverage statistics.
pub const DEFAULT_MIN_CONTIG_LENGTH: u64 = 200;

/// Mean depth below which a contig counts as uncovered.
const UNCOVERED_MEAN: f64 = 1.0;

/// Mean depth below which a contig counts as low-covered.
const LOWCOVERED_MEAN: f64 = 10.0;

/// Coverage summary of one contig.
#[derive(Debug, Clone, PartialEq)]
pub struct ContigCoverage {
    pub name: String,
    pub length: u64,
    /// Bases with depth 0
    pub zero_coverage_bases: u64,
    /// Sum of per-base depths
    pub total_depth: u64,
    pub mean: f64,
}

impl ContigCoverage {
    fn from_depths(name: &str, length: u64, depths: &[u32]) -> Result<Self, Error> {
        if depths.is_empty() {
            return Err(Error::CoverageComputation {
                contig: name.to_string(),
                reason: "no per-base coverage values".to_string(),
            });
        }

        let (total, zero) = depths.iter().fold((0u64, 0u64), |(total, zero), &d| {
            (total + u64::from(d), zero + u64::from(d < 1))
        });

        Ok(Self {
            name: name.to_string(),
            length,
            zero_coverage_bases: zero,
            total_depth: total,
            mean: total as f64 / depths.len() as f64,
        })
    }

    pub fn has_uncovered_bases(&self) -> bool {
        self.zero_coverage_bases > 0
    }
}

/// Assembly-wide coverage statistics.
///
/// Counts only include contigs at or above the minimum length, but the
/// proportions divide by the whole assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageStats {
    /// Mean depth over all considered bases, rounded to two decimals
    pub mean_coverage: f64,
    pub n_uncovered_bases: u64,
    pub p_uncovered_bases: f64,
    /// Contigs with at least one zero-depth base
    pub n_uncovered_base_contigs: u64,
    pub p_uncovered_base_contigs: f64,
    /// Contigs with mean depth < 1
    pub n_uncovered_contigs: u64,
    pub p_uncovered_contigs: f64,
    /// Contigs with mean depth < 10
    pub n_lowcovered_contigs: u64,
    pub p_lowcovered_contigs: f64,
    /// Contigs that passed the length filter
    pub n_contigs_considered: u64,
    /// Per-contig summaries, in assembly order
    pub contigs: Vec<ContigCoverage>,
}

impl CoverageStats {
    /// Write one row per considered contig, after a header row.
    pub fn write_contig_csv(&self, output_path: &Path) -> Result<(), Error> {
        let file = File::create(output_path).map_err(|e| Error::io(e, output_path))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "contig,length,zero_coverage_bases,mean_coverage")
            .map_err(|e| Error::io(e, output_path))?;
        for contig in &self.contigs {
            writeln!(
                writer,
                "{},{},{},{}",
                contig.name,
                contig.length,
                contig.zero_coverage_bases,
                round2(contig.mean)
            )
            .map_err(|e| Error::io(e, output_path))?;
        }
        writer.flush().map_err(|e| Error::io(e, output_path))?;

        info!(
            "Wrote coverage for {} contigs to {}",
            self.contigs.len(),
            output_path.display()
        );
        Ok(())
    }

    pub fn print_summary(&self) {
        info!("=== Coverage ===");
        info!(
            "Contigs considered: {}, mean coverage: {:.2}",
            self.n_contigs_considered, self.mean_coverage
        );
        info!(
            "Uncovered bases: {} ({:.2}%)",
            self.n_uncovered_bases,
            self.p_uncovered_bases * 100.0
        );
        info!(
            "Contigs with uncovered bases: {} ({:.2}%)",
            self.n_uncovered_base_contigs,
            self.p_uncovered_base_contigs * 100.0
        );
        info!(
            "Uncovered contigs (mean < 1): {} ({:.2}%)",
            self.n_uncovered_contigs,
            self.p_uncovered_contigs * 100.0
        );
        info!(
            "Low-covered contigs (mean < 10): {} ({:.2}%)",
            self.n_lowcovered_contigs,
            self.p_lowcovered_contigs * 100.0
        );
    }
}

/// Folds per-contig depth arrays into [`CoverageStats`].
#[derive(Debug, Clone)]
pub struct CoverageAggregator {
    min_contig_length: u64,
    contigs: Vec<ContigCoverage>,
    total_depth: u64,
    total_length: u64,
}

impl CoverageAggregator {
    pub fn new(min_contig_length: u64) -> Self {
        Self {
            min_contig_length,
            contigs: Vec::new(),
            total_depth: 0,
            total_length: 0,
        }
    }

    /// Add one contig's depths. Returns `None` when the contig is shorter
    /// than the minimum length and was skipped.
    pub fn add_contig(
        &mut self,
        name: &str,
        length: u64,
        depths: &[u32],
    ) -> Result<Option<&ContigCoverage>, Error> {
        if length < self.min_contig_length {
            return Ok(None);
        }

        let contig = ContigCoverage::from_depths(name, length, depths)?;
        self.total_depth += contig.total_depth;
        self.total_length += depths.len() as u64;
        self.contigs.push(contig);
        Ok(self.contigs.last())
    }

    /// Finish aggregation.
    ///
    /// # Arguments
    /// * `assembly_bases` - Base count of the whole assembly
    /// * `assembly_size` - Contig count of the whole assembly
    pub fn finish(self, assembly_bases: u64, assembly_size: usize) -> CoverageStats {
        let ratio = |n: u64, d: u64| if d == 0 { 0.0 } else { n as f64 / d as f64 };
        let size = assembly_size as u64;

        let mut stats = CoverageStats {
            n_contigs_considered: self.contigs.len() as u64,
            ..Default::default()
        };
        for contig in &self.contigs {
            stats.n_uncovered_bases += contig.zero_coverage_bases;
            if contig.has_uncovered_bases() {
                stats.n_uncovered_base_contigs += 1;
            }
            if contig.mean < UNCOVERED_MEAN {
                stats.n_uncovered_contigs += 1;
            }
            if contig.mean < LOWCOVERED_MEAN {
                stats.n_lowcovered_contigs += 1;
            }
        }

        stats.mean_coverage = if self.total_length == 0 {
            0.0
        } else {
            round2(self.total_depth as f64 / self.total_length as f64)
        };
        stats.p_uncovered_bases = ratio(stats.n_uncovered_bases, assembly_bases);
        stats.p_uncovered_base_contigs = ratio(stats.n_uncovered_base_contigs, size);
        stats.p_uncovered_contigs = ratio(stats.n_uncovered_contigs, size);
        stats.p_lowcovered_contigs = ratio(stats.n_lowcovered_contigs, size);
        stats.contigs = self.contigs;
        stats
    }

    /// Aggregate every contig of `assembly` from its depth array.
    pub fn aggregate(
        assembly: &Assembly,
        depths: &ContigDepths,
        min_contig_length: u64,
    ) -> Result<CoverageStats, Error> {
        let mut aggregator = Self::new(min_contig_length);
        for (idx, contig) in assembly.contigs().iter().enumerate() {
            let values = depths.get(idx).unwrap_or(&[]);
            aggregator.add_contig(&contig.name, contig.length, values)?;
        }

        let stats = aggregator.finish(assembly.n_bases(), assembly.size());
        log::debug!(
            "Coverage aggregated over {} of {} contigs",
            stats.n_contigs_considered,
            assembly.size()
        );
        Ok(stats)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
