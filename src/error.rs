use std::path::PathBuf;

/// Errors that can occur in readrate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("malformed alignment record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("SAM header error: {0}")]
    Header(String),

    #[error("no alignments found in {}", .0.display())]
    NoAlignments(PathBuf),

    #[error("coverage computation failed for contig '{contig}': {reason}")]
    CoverageComputation { contig: String, reason: String },

    #[error("FASTA parsing error: {0}")]
    Fasta(String),

    #[error("read mapper error: {0}")]
    Mapper(String),
}

impl Error {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    pub(crate) fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            path: PathBuf::from("<unknown>"),
        }
    }
}
