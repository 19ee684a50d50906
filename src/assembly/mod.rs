pub mod fasta;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub use fasta::Contig;

/// An assembly loaded for evaluation: contig names and lengths in file order.
///
/// Sequences are not retained; the evaluation only needs the contig
/// dimensions and the unfiltered totals used as proportion denominators.
#[derive(Debug, Clone)]
pub struct Assembly {
    path: PathBuf,
    contigs: Vec<Contig>,
    index: HashMap<String, usize>,
}

impl Assembly {
    /// Load contig metadata from an assembly FASTA file.
    pub fn from_fasta(path: &Path) -> Result<Self, Error> {
        let contigs = fasta::read_contigs(path)?;
        let assembly = Self::from_contigs(path, contigs)?;

        log::info!(
            "Loaded assembly {}: {} contigs, {} bases",
            path.display(),
            assembly.size(),
            assembly.n_bases()
        );

        Ok(assembly)
    }

    /// Build an assembly from already-known contigs.
    pub fn from_contigs(path: impl Into<PathBuf>, contigs: Vec<Contig>) -> Result<Self, Error> {
        let mut index = HashMap::with_capacity(contigs.len());
        for (i, contig) in contigs.iter().enumerate() {
            if index.insert(contig.name.clone(), i).is_some() {
                return Err(Error::Fasta(format!(
                    "duplicate contig name '{}'",
                    contig.name
                )));
            }
        }

        Ok(Self {
            path: path.into(),
            contigs,
            index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    /// Position of a contig in file order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Number of contigs (all of them, regardless of length).
    pub fn size(&self) -> usize {
        self.contigs.len()
    }

    /// Total bases across all contigs.
    pub fn n_bases(&self) -> u64 {
        self.contigs.iter().map(|c| c.length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contig(name: &str, length: u64) -> Contig {
        Contig {
            name: name.to_string(),
            length,
        }
    }

    #[test]
    fn totals_and_lookup() {
        let asm = Assembly::from_contigs(
            "asm.fa",
            vec![contig("c1", 1000), contig("c2", 150), contig("c3", 250)],
        )
        .unwrap();

        assert_eq!(asm.size(), 3);
        assert_eq!(asm.n_bases(), 1400);
        assert_eq!(asm.index_of("c2"), Some(1));
        assert_eq!(asm.index_of("c9"), None);
        assert_eq!(asm.path(), Path::new("asm.fa"));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = Assembly::from_contigs("asm.fa", vec![contig("c1", 10), contig("c1", 20)])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate contig name 'c1'"));
    }
}
