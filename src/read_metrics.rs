/// Read-mapping evaluation of an assembly
use crate::assembly::Assembly;
use crate::classify::{BridgeLedger, PairClassifier, StreamSummary, Termination};
use crate::coverage::{CoverageAggregator, CoverageStats};
use crate::error::Error;
use crate::io::compute_depths;
use crate::io::fastq::count_reads;
use crate::io::sam::AlignmentCursor;
use crate::mapper::{MappingRequest, ReadMapper};
use crate::params::Parameters;
use crate::stats::RunningCounters;
use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name (after the output prefix) of the supported bridge table.
pub const BRIDGES_FILE: &str = "supported_bridges.csv";

/// File name (after the output prefix) of the report table.
pub const REPORT_FILE: &str = "read_metrics.csv";

/// File name (after the output prefix) of the per-contig coverage table.
pub const CONTIGS_FILE: &str = "contigs.csv";

/// Outcome of a read-mapping evaluation.
#[derive(Debug, Clone, Default)]
pub struct ReadMappingReport {
    pub num_reads: u64,
    pub num_pairs: u64,
    pub total_mappings: u64,
    pub percent_mapping: f64,
    pub good_mappings: u64,
    pub good_mapping_proportion: f64,
    pub good_mapping_percent: f64,
    pub bad_mappings: u64,
    /// Number of supported bridges
    pub potential_bridges: usize,
    pub coverage: CoverageStats,
    pub counters: RunningCounters,
    pub stream: StreamSummary,
    /// Where the alignments were read from
    pub sam_path: PathBuf,
}

impl ReadMappingReport {
    /// Build the report from the classification and coverage passes.
    pub fn new(
        num_reads: u64,
        num_pairs: u64,
        counters: RunningCounters,
        potential_bridges: usize,
        coverage: CoverageStats,
    ) -> Self {
        let good_mapping_proportion = counters.good_proportion(num_pairs);
        Self {
            num_reads,
            num_pairs,
            total_mappings: counters.total,
            percent_mapping: counters.mapping_percent(num_pairs),
            good_mappings: counters.good,
            good_mapping_proportion,
            good_mapping_percent: good_mapping_proportion * 100.0,
            bad_mappings: counters.bad,
            potential_bridges,
            coverage,
            counters,
            ..Default::default()
        }
    }

    /// Published fields, in report order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let c = &self.coverage;
        vec![
            ("num_reads", self.num_reads.to_string()),
            ("num_pairs", self.num_pairs.to_string()),
            ("total_mappings", self.total_mappings.to_string()),
            ("percent_mapping", self.percent_mapping.to_string()),
            ("good_mappings", self.good_mappings.to_string()),
            ("good_mapping_percent", self.good_mapping_percent.to_string()),
            ("bad_mappings", self.bad_mappings.to_string()),
            ("potential_bridges", self.potential_bridges.to_string()),
            ("mean_coverage", c.mean_coverage.to_string()),
            ("n_uncovered_bases", c.n_uncovered_bases.to_string()),
            ("p_uncovered_bases", c.p_uncovered_bases.to_string()),
            ("n_uncovered_base_contigs", c.n_uncovered_base_contigs.to_string()),
            ("p_uncovered_base_contigs", c.p_uncovered_base_contigs.to_string()),
            ("n_uncovered_contigs", c.n_uncovered_contigs.to_string()),
            ("p_uncovered_contigs", c.p_uncovered_contigs.to_string()),
            ("n_lowcovered_contigs", c.n_lowcovered_contigs.to_string()),
            ("p_lowcovered_contigs", c.p_lowcovered_contigs.to_string()),
        ]
    }

    /// Write the report as a two-row CSV: field names, then values.
    pub fn write_csv(&self, output_path: &Path) -> Result<(), Error> {
        let file = File::create(output_path).map_err(|e| Error::io(e, output_path))?;
        let mut writer = BufWriter::new(file);

        let fields = self.fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let values: Vec<&str> = fields.iter().map(|(_, value)| value.as_str()).collect();

        writeln!(writer, "{}", names.join(",")).map_err(|e| Error::io(e, output_path))?;
        writeln!(writer, "{}", values.join(",")).map_err(|e| Error::io(e, output_path))?;
        writer.flush().map_err(|e| Error::io(e, output_path))?;

        info!("Wrote read metrics to {}", output_path.display());
        Ok(())
    }

    pub fn print_summary(&self) {
        info!("=== Read Metrics ===");
        info!("Reads: {} ({} pairs)", self.num_reads, self.num_pairs);
        info!(
            "Pairs mapped: {} ({:.2}%)",
            self.total_mappings, self.percent_mapping
        );
        info!(
            "Good mappings: {} ({:.2}%), bad mappings: {}",
            self.good_mappings, self.good_mapping_percent, self.bad_mappings
        );
        info!("Supported bridges: {}", self.potential_bridges);
        self.counters.print_summary();
        self.coverage.print_summary();
    }
}

/// Drives mapping, pair classification and coverage for one assembly.
pub struct ReadMetrics<'a> {
    assembly: &'a Assembly,
    params: &'a Parameters,
}

impl<'a> ReadMetrics<'a> {
    pub fn new(assembly: &'a Assembly, params: &'a Parameters) -> Self {
        Self { assembly, params }
    }

    /// Mapping inputs derived from the parameters.
    pub fn mapping_request(&self) -> MappingRequest {
        let stem = self
            .assembly
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "assembly".to_string());

        MappingRequest {
            assembly: self.assembly.path().to_path_buf(),
            left: self.params.left.clone(),
            right: self.params.right.clone(),
            unpaired: self.params.unpaired.clone(),
            insert_size: self.params.insert_size,
            insert_sd: self.params.insert_sd,
            threads: self.params.threads,
            work_prefix: self.params.output_path(&stem),
        }
    }

    /// Read and pair counts from the FASTQ inputs, as `(num_reads, num_pairs)`.
    ///
    /// Pairs are counted from the left files only.
    pub fn count_reads(&self) -> Result<(u64, u64), Error> {
        let mut num_pairs = 0;
        for left in &self.params.left {
            num_pairs += count_reads(left)?;
        }
        let mut num_unpaired = 0;
        for unpaired in &self.params.unpaired {
            num_unpaired += count_reads(unpaired)?;
        }
        Ok((2 * num_pairs + num_unpaired, num_pairs))
    }

    /// Run the full evaluation.
    pub fn run(&self, mapper: &dyn ReadMapper) -> Result<ReadMappingReport, Error> {
        self.params.validate()?;

        let (num_reads, num_pairs) = self.count_reads()?;
        info!("Counted {} reads ({} pairs)", num_reads, num_pairs);

        let sam_path = mapper.map_reads(&self.mapping_request())?;

        let mut counters = RunningCounters::new();
        let mut ledger = BridgeLedger::new();
        let stream = self.classify(&sam_path, &mut counters, &mut ledger)?;

        let potential_bridges = ledger.persist(&self.params.output_path(BRIDGES_FILE))?;

        let depths = compute_depths(&sam_path, self.assembly)?;
        let coverage =
            CoverageAggregator::aggregate(self.assembly, &depths, self.params.min_contig_length)?;
        coverage.write_contig_csv(&self.params.output_path(CONTIGS_FILE))?;

        let mut report =
            ReadMappingReport::new(num_reads, num_pairs, counters, potential_bridges, coverage);
        report.stream = stream;
        report.sam_path = sam_path;
        Ok(report)
    }

    fn classify(
        &self,
        sam_path: &Path,
        counters: &mut RunningCounters,
        ledger: &mut BridgeLedger,
    ) -> Result<StreamSummary, Error> {
        let mut cursor = AlignmentCursor::open(sam_path)?;

        let mut contig_lengths: HashMap<String, u64> = self
            .assembly
            .contigs()
            .iter()
            .map(|c| (c.name.clone(), c.length))
            .collect();
        contig_lengths.extend(
            cursor
                .contig_lengths()
                .iter()
                .map(|(name, &len)| (name.clone(), len)),
        );

        let classifier = PairClassifier::new(self.params.insert_size, self.params.insert_sd)
            .with_contig_lengths(contig_lengths);
        let summary =
            classifier.classify_stream(&mut cursor, self.params.pairing, counters, ledger)?;

        if summary.records == 0 {
            return Err(Error::NoAlignments(sam_path.to_path_buf()));
        }
        if summary.termination == Termination::Truncated {
            warn!(
                "Alignment stream {} ended mid-pair; {} record(s) were not classified",
                sam_path.display(),
                summary.dangling
            );
        }
        if cursor.truncated_tail() {
            warn!("Dropped a truncated final line in {}", sam_path.display());
        }
        info!(
            "Classified {} alignment records ({} secondary/supplementary skipped, {} single reads)",
            summary.records, summary.not_primary, summary.singles
        );
        Ok(summary)
    }
}
