use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Error;

/// Name and length of one contig from an assembly FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub length: u64,
}

/// Scan a FASTA file and record each contig's name and base count.
///
/// - Control characters (ASCII < 32) do not count as bases
/// - The contig name is the header text up to the first whitespace
pub fn read_contigs(path: &Path) -> Result<Vec<Contig>, Error> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    let reader = BufReader::new(file);

    let mut contigs = Vec::new();
    let mut current: Option<Contig> = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| Error::io(e, path))?;

        if line.is_empty() {
            continue;
        }

        if let Some(stripped) = line.strip_prefix('>') {
            if let Some(contig) = current.take() {
                contigs.push(contig);
            }

            let name = stripped
                .split_whitespace()
                .next()
                .ok_or_else(|| {
                    Error::Fasta(format!(
                        "empty contig name at {}:{}",
                        path.display(),
                        line_num + 1
                    ))
                })?
                .to_string();

            current = Some(Contig { name, length: 0 });
        } else {
            let contig = current.as_mut().ok_or_else(|| {
                Error::Fasta(format!(
                    "sequence data before first header at {}:{}",
                    path.display(),
                    line_num + 1
                ))
            })?;

            contig.length += line.bytes().filter(|&b| b >= 32).count() as u64;
        }
    }

    if let Some(contig) = current {
        contigs.push(contig);
    }

    if contigs.is_empty() {
        return Err(Error::Fasta(format!(
            "no contigs found in {}",
            path.display()
        )));
    }

    if let Some(empty) = contigs.iter().find(|c| c.length == 0) {
        return Err(Error::Fasta(format!(
            "contig '{}' has zero length",
            empty.name
        )));
    }

    Ok(contigs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn single_contig_multiline() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">contig1").unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, "NNNN").unwrap();

        let contigs = read_contigs(file.path()).unwrap();
        assert_eq!(
            contigs,
            vec![Contig {
                name: "contig1".to_string(),
                length: 8
            }]
        );
    }

    #[test]
    fn header_comment_is_dropped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">c1 len=3 cov=2.0").unwrap();
        writeln!(file, "ACG").unwrap();
        writeln!(file, ">c2").unwrap();
        writeln!(file, "TGAT").unwrap();

        let contigs = read_contigs(file.path()).unwrap();
        assert_eq!(contigs.len(), 2);
        assert_eq!(contigs[0].name, "c1");
        assert_eq!(contigs[0].length, 3);
        assert_eq!(contigs[1].name, "c2");
        assert_eq!(contigs[1].length, 4);
    }

    #[test]
    fn carriage_returns_not_counted() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, ">c1\r\nACGT\r\nAC\r\n").unwrap();

        let contigs = read_contigs(file.path()).unwrap();
        assert_eq!(contigs[0].length, 6);
    }

    #[test]
    fn empty_file_error() {
        let file = NamedTempFile::new().unwrap();
        let err = read_contigs(file.path()).unwrap_err();
        assert!(err.to_string().contains("no contigs"));
    }

    #[test]
    fn zero_length_contig_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">c1").unwrap();
        writeln!(file, ">c2").unwrap();
        writeln!(file, "ACGT").unwrap();

        let err = read_contigs(file.path()).unwrap_err();
        assert!(err.to_string().contains("'c1' has zero length"));
    }

    #[test]
    fn sequence_before_header_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ACGT").unwrap();

        let err = read_contigs(file.path()).unwrap_err();
        assert!(err.to_string().contains("sequence data before first header"));
    }
}
