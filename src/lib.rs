pub mod assembly;
pub mod classify;
pub mod coverage;
pub mod error;
pub mod io;
pub mod mapper;
pub mod params;
pub mod read_metrics;
pub mod stats;

use log::info;

use crate::assembly::Assembly;
use crate::mapper::{Bowtie2, PrecomputedAlignments, ReadMapper};
use crate::params::Parameters;
use crate::read_metrics::{REPORT_FILE, ReadMetrics};

/// Top-level entry point. Called from `main()` after CLI parsing.
pub fn run(params: &Parameters) -> anyhow::Result<()> {
    params.validate()?;

    info!("readrate v{}", env!("CARGO_PKG_VERSION"));
    info!("assembly: {}", params.assembly.display());
    info!(
        "insertSize: {} insertSD: {} pairing: {}",
        params.insert_size, params.insert_sd, params.pairing
    );

    let assembly = Assembly::from_fasta(&params.assembly)?;

    let mapper: Box<dyn ReadMapper> = match &params.sam_file {
        Some(sam) => Box::new(PrecomputedAlignments::new(sam)),
        None => Box::new(Bowtie2::new(&params.mapper_command)),
    };

    let report = ReadMetrics::new(&assembly, params).run(mapper.as_ref())?;
    report.print_summary();
    report.write_csv(&params.output_path(REPORT_FILE))?;

    info!("Read metrics complete!");
    Ok(())
}
