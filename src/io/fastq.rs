/// FASTQ read counting with decompression support
use crate::error::Error;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Lines per FASTQ record (header, sequence, separator, qualities).
pub const LINES_PER_READ: u64 = 4;

/// Open a FASTQ file (plain or gzip compressed) as a buffered reader.
///
/// Compression is detected by the `.gz` / `.gzip` extension.
pub fn open_reads(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let path_str = path.to_string_lossy();
    let is_gzipped = path_str.ends_with(".gz") || path_str.ends_with(".gzip");

    let file = File::open(path).map_err(|e| Error::io(e, path))?;

    if is_gzipped {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Count the lines of a FASTQ file.
pub fn count_lines(path: &Path) -> Result<u64, Error> {
    let mut reader = open_reads(path)?;
    let mut buf = Vec::with_capacity(256);
    let mut n = 0u64;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::io(e, path))?;
        if read == 0 {
            break;
        }
        n += 1;
    }
    Ok(n)
}

/// Number of reads in a FASTQ file, taken as its line count over four.
pub fn count_reads(path: &Path) -> Result<u64, Error> {
    let lines = count_lines(path)?;
    if lines % LINES_PER_READ != 0 {
        log::warn!(
            "{}: {} lines is not a multiple of {}; trailing partial record ignored",
            path.display(),
            lines,
            LINES_PER_READ
        );
    }
    Ok(lines / LINES_PER_READ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_reads(w: &mut impl Write, n: usize) {
        for i in 0..n {
            writeln!(w, "@read{}", i + 1).unwrap();
            writeln!(w, "ACGTACGTAC").unwrap();
            writeln!(w, "+").unwrap();
            writeln!(w, "IIIIIIIIII").unwrap();
        }
    }

    #[test]
    fn count_plain_fastq() {
        let mut file = NamedTempFile::new().unwrap();
        write_reads(&mut file, 5);
        assert_eq!(count_lines(file.path()).unwrap(), 20);
        assert_eq!(count_reads(file.path()).unwrap(), 5);
    }

    #[test]
    fn count_gzipped_fastq() {
        let file = tempfile::Builder::new().suffix(".fq.gz").tempfile().unwrap();
        {
            let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
            write_reads(&mut encoder, 3);
            encoder.finish().unwrap();
        }
        assert_eq!(count_reads(file.path()).unwrap(), 3);
    }

    #[test]
    fn missing_final_newline_still_counted() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "@r1\nACGT\n+\nIIII").unwrap();
        assert_eq!(count_reads(file.path()).unwrap(), 1);
    }

    #[test]
    fn partial_record_rounds_down() {
        let mut file = NamedTempFile::new().unwrap();
        write_reads(&mut file, 2);
        writeln!(file, "@r3").unwrap();
        assert_eq!(count_reads(file.path()).unwrap(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = count_reads(Path::new("/nonexistent/reads.fq")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
