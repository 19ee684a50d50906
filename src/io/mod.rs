pub mod depth;
pub mod fastq;
pub mod sam;

pub use depth::{ContigDepths, compute_depths};
pub use sam::{AlignmentCursor, AlignmentRecord, Locus};
