use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Pairing mode enum
// ---------------------------------------------------------------------------

/// How mate records are matched up in the alignment stream (`--pairing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingMode {
    /// Mates are the next record in the stream (mapper emits pairs interleaved).
    #[default]
    Adjacent,
    /// Mates are matched by read name, buffering first-seen mates.
    ByName,
}

impl std::str::FromStr for PairingMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adjacent" => Ok(Self::Adjacent),
            "byName" => Ok(Self::ByName),
            _ => Err(format!(
                "unknown pairing mode '{s}'; expected 'adjacent' or 'byName'"
            )),
        }
    }
}

impl std::fmt::Display for PairingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adjacent => write!(f, "adjacent"),
            Self::ByName => write!(f, "byName"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameters struct
// ---------------------------------------------------------------------------

/// readrate command-line parameters.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "readrate",
    about = "Evaluate an assembly by how read pairs map back onto it",
    version
)]
pub struct Parameters {
    // ── Assembly ────────────────────────────────────────────────────────
    /// Assembly FASTA file
    #[arg(long = "assembly")]
    pub assembly: PathBuf,

    /// Contigs shorter than this are excluded from coverage statistics
    #[arg(long = "minContigLength", default_value_t = 200)]
    pub min_contig_length: u64,

    // ── Read files ──────────────────────────────────────────────────────
    /// Left reads (mate 1) FASTQ, comma-separated for several files
    #[arg(long = "left", value_delimiter = ',')]
    pub left: Vec<PathBuf>,

    /// Right reads (mate 2) FASTQ, in the same order as --left
    #[arg(long = "right", value_delimiter = ',')]
    pub right: Vec<PathBuf>,

    /// Unpaired reads FASTQ, comma-separated for several files
    #[arg(long = "unpaired", value_delimiter = ',')]
    pub unpaired: Vec<PathBuf>,

    /// Mean fragment insert size of the read pairs
    #[arg(long = "insertSize", default_value_t = 200)]
    pub insert_size: u32,

    /// Standard deviation of the insert size
    #[arg(long = "insertSD", default_value_t = 50)]
    pub insert_sd: u32,

    // ── Mapping ─────────────────────────────────────────────────────────
    /// Number of threads passed to the read mapper
    #[arg(long = "threads", default_value_t = 1)]
    pub threads: usize,

    /// Read mapper executable (index builder is `<command>-build`)
    #[arg(long = "mapperCommand", default_value = "bowtie2")]
    pub mapper_command: String,

    /// Pre-computed SAM alignments; skips running the mapper
    #[arg(long = "samFile")]
    pub sam_file: Option<PathBuf>,

    /// Mate pairing strategy: adjacent or byName
    #[arg(long = "pairing", default_value = "adjacent")]
    pub pairing: PairingMode,

    // ── Output ──────────────────────────────────────────────────────────
    /// Output file name prefix (including path)
    #[arg(long = "outFileNamePrefix", default_value = "./")]
    pub out_file_name_prefix: PathBuf,
}

impl Parameters {
    /// Full path of an output artifact, built by plain concatenation onto
    /// `--outFileNamePrefix`.
    pub fn output_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.out_file_name_prefix.display(), name))
    }

    /// Validate parameter combinations that clap alone cannot enforce.
    pub fn validate(&self) -> Result<(), Error> {
        match (self.left.is_empty(), self.right.is_empty()) {
            (false, true) => {
                return Err(Error::MissingInput(
                    "--right is required when --left is supplied".into(),
                ));
            }
            (true, false) => {
                return Err(Error::MissingInput(
                    "--left is required when --right is supplied".into(),
                ));
            }
            _ => {}
        }

        if self.left.len() != self.right.len() {
            return Err(Error::MissingInput(format!(
                "--left lists {} files but --right lists {}",
                self.left.len(),
                self.right.len()
            )));
        }

        if self.left.is_empty() && self.unpaired.is_empty() {
            return Err(Error::MissingInput(
                "read files not supplied: give --left and --right, --unpaired, or both".into(),
            ));
        }

        if self.threads == 0 {
            return Err(Error::Parameter("--threads must be >= 1".into()));
        }

        if self.min_contig_length == 0 {
            return Err(Error::Parameter("--minContigLength must be >= 1".into()));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
