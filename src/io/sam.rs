/// SAM text stream decoding: header lengths, alignment records, record cursor
use crate::error::Error;
use noodles::sam;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record::cigar::Op;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Number of mandatory tab-separated fields in a SAM alignment line.
const MANDATORY_FIELDS: usize = 11;

/// Source name used for cursors built over an anonymous reader.
const STREAM_SOURCE: &str = "<stream>";

/// Where an alignment landed: contig name and 1-based leftmost position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub contig_id: String,
    pub position: u64,
}

/// One decoded alignment line, reduced to what pair classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// QNAME
    pub read_id: String,
    /// `None` when the read is unmapped
    pub locus: Option<Locus>,
    /// Read length (SEQ, or the CIGAR query length when SEQ is `*`)
    pub sequence_length: u64,
    /// Neither secondary nor supplementary
    pub is_primary: bool,
    /// Read is one of a pair (whether or not the mate mapped)
    pub is_paired: bool,
    /// Mate unmapped, or the read has no mate at all
    pub mate_unmapped: bool,
    pub properly_paired: bool,
    pub on_reverse_strand: bool,
    pub mate_on_reverse_strand: bool,
}

impl AlignmentRecord {
    /// Decode a SAM alignment line.
    ///
    /// # Arguments
    /// * `line` - One non-header SAM line, with or without its line ending
    /// * `line_num` - 1-based line number, for error reporting
    pub fn decode(line: &[u8], line_num: u64) -> Result<Self, Error> {
        let raw = RawRecord::parse(line, line_num)?;
        let flags = raw.flags()?;
        let read_id = raw.read_id()?;

        let locus = match (raw.reference_name(), raw.alignment_start()?) {
            (Some(contig_id), Some(position)) if !flags.is_unmapped() => Some(Locus {
                contig_id: contig_id.into_owned(),
                position,
            }),
            _ => None,
        };

        let sequence_length = match raw.record.sequence().len() {
            0 => raw.query_length()?,
            n => n as u64,
        };

        Ok(Self {
            read_id,
            locus,
            sequence_length,
            is_primary: !flags.is_secondary() && !flags.is_supplementary(),
            is_paired: flags.is_segmented(),
            mate_unmapped: !flags.is_segmented() || flags.is_mate_unmapped(),
            properly_paired: flags.is_properly_segmented(),
            on_reverse_strand: flags.is_reverse_complemented(),
            mate_on_reverse_strand: flags.is_mate_reverse_complemented(),
        })
    }

    pub fn contig_id(&self) -> Option<&str> {
        self.locus.as_ref().map(|l| l.contig_id.as_str())
    }

    pub fn position(&self) -> Option<u64> {
        self.locus.as_ref().map(|l| l.position)
    }

    /// True when this read and its mate are on opposite strands.
    pub fn pair_opposite_strands(&self) -> bool {
        self.on_reverse_strand != self.mate_on_reverse_strand
    }
}

/// A noodles SAM record parsed from one line, with field accessors that
/// report failures as `MalformedRecord` at that line.
pub(crate) struct RawRecord {
    pub(crate) record: sam::Record,
    line_num: u64,
}

impl RawRecord {
    pub(crate) fn parse(line: &[u8], line_num: u64) -> Result<Self, Error> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        // The line ending marks where the mandatory fields must stop.
        let mut reader = sam::io::Reader::new(line.chain(&b"\n"[..]));
        let mut record = sam::Record::default();
        match reader.read_record(&mut record) {
            Ok(0) => Err(Error::malformed(line_num, "empty record")),
            Ok(_) => Ok(Self { record, line_num }),
            Err(e) => Err(Error::malformed(
                line_num,
                format!("expected {MANDATORY_FIELDS} tab-separated fields: {e}"),
            )),
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::malformed(self.line_num, reason)
    }

    /// QNAME; `*` is kept as a literal name.
    pub(crate) fn read_id(&self) -> Result<String, Error> {
        match self.record.name() {
            None => Ok("*".to_string()),
            Some(name) if name.is_empty() => Err(self.malformed("empty QNAME")),
            Some(name) => Ok(String::from_utf8_lossy(name).into_owned()),
        }
    }

    pub(crate) fn flags(&self) -> Result<Flags, Error> {
        self.record
            .flags()
            .map_err(|e| self.malformed(format!("invalid FLAG: {e}")))
    }

    /// RNAME, or `None` for `*`.
    pub(crate) fn reference_name(&self) -> Option<Cow<'_, str>> {
        self.record
            .reference_sequence_name()
            .map(|name| String::from_utf8_lossy(name))
    }

    /// 1-based POS, or `None` for 0.
    pub(crate) fn alignment_start(&self) -> Result<Option<u64>, Error> {
        self.record
            .alignment_start()
            .transpose()
            .map(|pos| pos.map(|p| usize::from(p) as u64))
            .map_err(|e| self.malformed(format!("invalid POS: {e}")))
    }

    /// CIGAR operations; `*` yields none.
    pub(crate) fn cigar_ops(&self) -> Result<Vec<Op>, Error> {
        self.record
            .cigar()
            .iter()
            .map(|op| op.map_err(|e| self.malformed(format!("invalid CIGAR: {e}"))))
            .collect()
    }

    /// Read length implied by the query-consuming CIGAR operations.
    fn query_length(&self) -> Result<u64, Error> {
        Ok(self
            .cigar_ops()?
            .iter()
            .filter(|op| op.kind().consumes_read())
            .fold(0u64, |len, op| len.saturating_add(op.len() as u64)))
    }
}

/// Strip a mate suffix (`/1`, `/2`) and any trailing comment from a read name.
pub fn read_base_name(name: &str) -> &str {
    let name = name.split_whitespace().next().unwrap_or(name);
    name.strip_suffix("/1")
        .or_else(|| name.strip_suffix("/2"))
        .unwrap_or(name)
}

/// Pull-based cursor over the records of a SAM text stream.
///
/// The `@` header block is consumed on construction. Afterwards the cursor
/// hands out one record at a time and can peek one line ahead, which is
/// how a damaged final line is told apart from a damaged line mid-stream.
/// Lines are read as bytes; only the header has to be valid UTF-8.
#[derive(Debug)]
pub struct AlignmentCursor<R> {
    reader: R,
    path: PathBuf,
    peeked: Option<(u64, Vec<u8>)>,
    peeked_record: Option<AlignmentRecord>,
    line_num: u64,
    contig_lengths: HashMap<String, u64>,
    records_read: u64,
    truncated_tail: bool,
}

impl AlignmentCursor<BufReader<File>> {
    /// Open a SAM file. A missing or zero-byte file is `NoAlignments`.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NoAlignments(path.to_path_buf())
            } else {
                Error::io(e, path)
            }
        })?;

        let size = file.metadata().map_err(|e| Error::io(e, path))?.len();
        if size == 0 {
            return Err(Error::NoAlignments(path.to_path_buf()));
        }

        Self::with_source(BufReader::new(file), path)
    }
}

impl<R: BufRead> AlignmentCursor<R> {
    /// Wrap an anonymous reader and consume the header block.
    pub fn new(reader: R) -> Result<Self, Error> {
        Self::with_source(reader, STREAM_SOURCE)
    }

    /// Wrap a reader whose I/O errors are reported against `path`.
    pub fn with_source(reader: R, path: impl Into<PathBuf>) -> Result<Self, Error> {
        let mut cursor = Self {
            reader,
            path: path.into(),
            peeked: None,
            peeked_record: None,
            line_num: 0,
            contig_lengths: HashMap::new(),
            records_read: 0,
            truncated_tail: false,
        };
        cursor.read_header()?;
        Ok(cursor)
    }

    /// Contig lengths from the header's `@SQ` lines.
    pub fn contig_lengths(&self) -> &HashMap<String, u64> {
        &self.contig_lengths
    }

    /// Number of records decoded so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// True if an undecodable final line was dropped.
    pub fn truncated_tail(&self) -> bool {
        self.truncated_tail
    }

    /// Next record, or `None` at end of stream.
    ///
    /// A line that fails to decode is an error unless it is the last line
    /// of the stream, in which case it is treated as a truncated write and
    /// the stream ends there.
    pub fn next_record(&mut self) -> Result<Option<AlignmentRecord>, Error> {
        if let Some(record) = self.peeked_record.take() {
            return Ok(Some(record));
        }
        let record = self.next_with(AlignmentRecord::decode)?;
        if record.is_some() {
            self.records_read += 1;
        }
        Ok(record)
    }

    /// Look at the next record without consuming it.
    pub fn peek_record(&mut self) -> Result<Option<&AlignmentRecord>, Error> {
        if self.peeked_record.is_none() {
            self.peeked_record = self.next_record()?;
        }
        Ok(self.peeked_record.as_ref())
    }

    /// Decode the next line with a caller-supplied decoder, applying the
    /// same end-of-stream rule as [`next_record`](Self::next_record).
    pub(crate) fn next_with<T>(
        &mut self,
        decode: impl FnOnce(&[u8], u64) -> Result<T, Error>,
    ) -> Result<Option<T>, Error> {
        let Some((line_num, line)) = self.next_line()? else {
            return Ok(None);
        };

        match decode(&line, line_num) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                if self.peek_line()?.is_some() {
                    return Err(e);
                }
                log::debug!("Dropping truncated final line {line_num}: {e}");
                self.truncated_tail = true;
                Ok(None)
            }
        }
    }

    fn next_line(&mut self) -> Result<Option<(u64, Vec<u8>)>, Error> {
        match self.peeked.take() {
            Some(line) => Ok(Some(line)),
            None => self.read_raw(),
        }
    }

    /// Look at the next non-blank line without consuming it.
    fn peek_line(&mut self) -> Result<Option<&[u8]>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.read_raw()?;
        }
        Ok(self.peeked.as_ref().map(|(_, line)| line.as_slice()))
    }

    fn read_raw(&mut self) -> Result<Option<(u64, Vec<u8>)>, Error> {
        loop {
            let mut line = Vec::new();
            let n = self
                .reader
                .read_until(b'\n', &mut line)
                .map_err(|e| Error::io(e, &self.path))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_num += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Ok(Some((self.line_num, line)));
        }
    }

    fn read_header(&mut self) -> Result<(), Error> {
        let mut text = String::new();
        loop {
            match self.peek_line()? {
                Some(line) if line.starts_with(b"@") => {}
                _ => break,
            }
            if let Some((line_num, line)) = self.peeked.take() {
                let line = std::str::from_utf8(&line)
                    .map_err(|e| Error::Header(format!("line {line_num}: {e}")))?;
                text.push_str(line.trim_end_matches(['\r', '\n']));
                text.push('\n');
            }
        }

        if text.is_empty() {
            return Ok(());
        }

        let header: sam::Header = text.parse().map_err(|e| Error::Header(format!("{e}")))?;
        for (name, reference_sequence) in header.reference_sequences() {
            let length = usize::from(reference_sequence.length()) as u64;
            self.contig_lengths.insert(name.to_string(), length);
        }

        log::debug!(
            "SAM header: {} reference sequences",
            self.contig_lengths.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::sam::alignment::record::cigar::op::Kind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "@HD\tVN:1.6\tSO:unsorted\n@SQ\tSN:c1\tLN:1000\n@SQ\tSN:c2\tLN:500\n";

    fn line(qname: &str, flag: u16, rname: &str, pos: u64, seq: &str) -> String {
        format!("{qname}\t{flag}\t{rname}\t{pos}\t42\t4M\t=\t1\t0\t{seq}\tIIII")
    }

    fn decode(text: &str, line_num: u64) -> Result<AlignmentRecord, Error> {
        AlignmentRecord::decode(text.as_bytes(), line_num)
    }

    /// Reader that fails on the first read.
    #[derive(Debug)]
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device went away"))
        }
    }

    #[test]
    fn decode_proper_pair_mate1() {
        // 99 = paired, proper, mate reverse, first in pair
        let rec = decode(&line("r1", 99, "c1", 10, "ACGT"), 1).unwrap();
        assert_eq!(rec.read_id, "r1");
        assert_eq!(rec.contig_id(), Some("c1"));
        assert_eq!(rec.position(), Some(10));
        assert_eq!(rec.sequence_length, 4);
        assert!(rec.is_primary);
        assert!(rec.is_paired);
        assert!(!rec.mate_unmapped);
        assert!(rec.properly_paired);
        assert!(!rec.on_reverse_strand);
        assert!(rec.mate_on_reverse_strand);
        assert!(rec.pair_opposite_strands());
    }

    #[test]
    fn decode_unmapped_read() {
        // 77 = paired, unmapped, mate unmapped, first in pair
        let rec = decode(&line("r2", 77, "*", 0, "ACGT"), 1).unwrap();
        assert!(rec.locus.is_none());
        assert_eq!(rec.contig_id(), None);
        assert!(rec.mate_unmapped);
    }

    #[test]
    fn decode_unmapped_flag_overrides_placement() {
        // 133 = paired, unmapped, second in pair; placed at its mate's locus
        let rec = decode(&line("r3", 133, "c1", 55, "ACGT"), 1).unwrap();
        assert!(rec.locus.is_none());
        assert!(!rec.mate_unmapped);
    }

    #[test]
    fn decode_unpaired_read_takes_single_branch() {
        let rec = decode(&line("u1", 16, "c2", 7, "ACGT"), 1).unwrap();
        assert!(!rec.is_paired);
        assert!(rec.mate_unmapped);
        assert!(rec.on_reverse_strand);
    }

    #[test]
    fn decode_secondary_and_supplementary() {
        let rec = decode(&line("r4", 256 + 99, "c1", 10, "ACGT"), 1).unwrap();
        assert!(!rec.is_primary);
        let rec = decode(&line("r4", 2048 + 99, "c1", 10, "ACGT"), 1).unwrap();
        assert!(!rec.is_primary);
    }

    #[test]
    fn decode_missing_seq_uses_cigar() {
        let rec = decode("r5\t0\tc1\t10\t0\t3S10M2I5M4D\t*\t0\t0\t*\t*", 1).unwrap();
        assert_eq!(rec.sequence_length, 20);

        let rec = decode("r6\t4\t*\t0\t0\t*\t*\t0\t0\t*\t*", 1).unwrap();
        assert_eq!(rec.sequence_length, 0);
    }

    #[test]
    fn decode_keeps_optional_fields_out_of_the_record() {
        let text = format!("{}\tNM:i:0\tAS:i:-3", line("r1", 0, "c1", 10, "ACGT"));
        let rec = decode(&text, 1).unwrap();
        assert_eq!(rec.sequence_length, 4);
    }

    #[test]
    fn decode_rejects_short_line() {
        let err = decode("r1\t99\tc1\t10", 7).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 7, .. }));
    }

    #[test]
    fn decode_rejects_non_numeric() {
        let err = decode(&line("r1", 99, "c1", 10, "ACGT").replace("\t99\t", "\tx\t"), 3)
            .unwrap_err();
        assert!(err.to_string().contains("invalid FLAG"));

        let err = decode("r1\t99\tc1\tten\t42\t4M\t=\t1\t0\tACGT\tIIII", 3).unwrap_err();
        assert!(err.to_string().contains("invalid POS"));
    }

    #[test]
    fn decode_rejects_empty_qname() {
        let err = decode(&line("", 0, "c1", 10, "ACGT"), 2).unwrap_err();
        assert!(err.to_string().contains("empty QNAME"));
    }

    #[test]
    fn decode_rejects_oversized_cigar_length() {
        let text = "r1\t0\tc1\t10\t0\t99999999999999999999M\t*\t0\t0\t*\t*";
        let err = decode(text, 5).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 5, .. }));
        assert!(err.to_string().contains("invalid CIGAR"));
    }

    #[test]
    fn decode_strips_carriage_return() {
        let text = format!("{}\r\n", line("r1", 99, "c1", 10, "ACGT"));
        let rec = decode(&text, 1).unwrap();
        assert_eq!(rec.sequence_length, 4);
    }

    #[test]
    fn decode_accepts_non_utf8_sequence() {
        let mut text = line("r1", 0, "c1", 10, "ACGT").into_bytes();
        let seq_at = text.windows(4).position(|w| w == b"ACGT").unwrap();
        text[seq_at + 1] = 0xFF;
        let rec = AlignmentRecord::decode(&text, 1).unwrap();
        assert_eq!(rec.sequence_length, 4);
    }

    #[test]
    fn cigar_parsing() {
        let ops = |cigar: &str| {
            let text = format!("r1\t0\tc1\t1\t42\t{cigar}\t*\t0\t0\t*\t*");
            RawRecord::parse(text.as_bytes(), 1)?.cigar_ops()
        };

        let parsed: Vec<(Kind, usize)> = ops("5S10M2D")
            .unwrap()
            .into_iter()
            .map(|op| (op.kind(), op.len()))
            .collect();
        assert_eq!(
            parsed,
            vec![(Kind::SoftClip, 5), (Kind::Match, 10), (Kind::Deletion, 2)]
        );
        assert!(ops("*").unwrap().is_empty());
        assert!(ops("10").is_err());
        assert!(ops("M10").is_err());
        assert!(ops("10Q").is_err());
    }

    #[test]
    fn base_name_strips_mate_suffix() {
        assert_eq!(read_base_name("read1/1"), "read1");
        assert_eq!(read_base_name("read1/2"), "read1");
        assert_eq!(read_base_name("read1 1:N:0:0"), "read1");
        assert_eq!(read_base_name("read_1"), "read_1");
    }

    #[test]
    fn cursor_skips_header_and_reads_lengths() {
        let text = format!(
            "{HEADER}{}\n{}\n",
            line("r1", 99, "c1", 10, "ACGT"),
            line("r1", 147, "c1", 40, "ACGT")
        );
        let mut cursor = AlignmentCursor::new(text.as_bytes()).unwrap();
        assert_eq!(cursor.contig_lengths().get("c1"), Some(&1000));
        assert_eq!(cursor.contig_lengths().get("c2"), Some(&500));

        let first = cursor.next_record().unwrap().unwrap();
        assert_eq!(first.position(), Some(10));
        let second = cursor.next_record().unwrap().unwrap();
        assert_eq!(second.position(), Some(40));
        assert!(cursor.next_record().unwrap().is_none());
        assert_eq!(cursor.records_read(), 2);
        assert!(!cursor.truncated_tail());
    }

    #[test]
    fn cursor_peek_does_not_consume() {
        let text = format!(
            "{}\n{}\n",
            line("r1", 99, "c1", 10, "ACGT"),
            line("r1", 147, "c1", 40, "ACGT")
        );
        let mut cursor = AlignmentCursor::new(text.as_bytes()).unwrap();
        assert_eq!(cursor.peek_record().unwrap().unwrap().position(), Some(10));
        assert_eq!(cursor.peek_record().unwrap().unwrap().position(), Some(10));
        assert_eq!(cursor.next_record().unwrap().unwrap().position(), Some(10));
        assert_eq!(cursor.peek_record().unwrap().unwrap().position(), Some(40));
        assert_eq!(cursor.next_record().unwrap().unwrap().position(), Some(40));
        assert!(cursor.peek_record().unwrap().is_none());
        assert!(cursor.next_record().unwrap().is_none());
        assert_eq!(cursor.records_read(), 2);
    }

    #[test]
    fn cursor_without_header() {
        let text = format!("{}\n", line("r1", 0, "c1", 10, "ACGT"));
        let mut cursor = AlignmentCursor::new(text.as_bytes()).unwrap();
        assert!(cursor.contig_lengths().is_empty());
        assert!(cursor.next_record().unwrap().is_some());
    }

    #[test]
    fn cursor_absorbs_truncated_final_line() {
        let text = format!("{HEADER}{}\nr2\t99\tc1", line("r1", 0, "c1", 10, "ACGT"));
        let mut cursor = AlignmentCursor::new(text.as_bytes()).unwrap();
        assert!(cursor.next_record().unwrap().is_some());
        assert!(cursor.next_record().unwrap().is_none());
        assert!(cursor.truncated_tail());
    }

    #[test]
    fn cursor_rejects_malformed_line_mid_stream() {
        let text = format!(
            "{HEADER}r2\t99\tc1\n{}\n",
            line("r1", 0, "c1", 10, "ACGT")
        );
        let mut cursor = AlignmentCursor::new(text.as_bytes()).unwrap();
        let err = cursor.next_record().unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 4, .. }));
    }

    #[test]
    fn cursor_skips_blank_lines() {
        let text = format!(
            "{HEADER}\n{}\n\n{}\n",
            line("r1", 0, "c1", 10, "ACGT"),
            line("r2", 0, "c1", 20, "ACGT")
        );
        let mut cursor = AlignmentCursor::new(text.as_bytes()).unwrap();
        assert!(cursor.next_record().unwrap().is_some());
        assert!(cursor.next_record().unwrap().is_some());
        assert!(cursor.next_record().unwrap().is_none());
    }

    #[test]
    fn cursor_reads_past_non_utf8_bytes() {
        let mut text = format!("{HEADER}{}\n", line("r1", 0, "c1", 10, "ACGT")).into_bytes();
        let seq_at = text.windows(4).position(|w| w == b"ACGT").unwrap();
        text[seq_at] = 0xFF;
        text.extend_from_slice(format!("{}\n", line("r2", 0, "c1", 20, "ACGT")).as_bytes());

        let mut cursor = AlignmentCursor::new(text.as_slice()).unwrap();
        assert_eq!(cursor.next_record().unwrap().unwrap().read_id, "r1");
        assert_eq!(cursor.next_record().unwrap().unwrap().read_id, "r2");
        assert!(cursor.next_record().unwrap().is_none());
        assert!(!cursor.truncated_tail());
    }

    #[test]
    fn cursor_absorbs_undecodable_final_line() {
        let mut text = format!("{}\n", line("r1", 0, "c1", 10, "ACGT")).into_bytes();
        text.extend_from_slice(b"r2\t\xFF\xFE\tc1\t10\t42\t4M\t=\t1\t0\tACGT\tIIII\n");
        let mut cursor = AlignmentCursor::new(text.as_slice()).unwrap();
        assert!(cursor.next_record().unwrap().is_some());
        assert!(cursor.next_record().unwrap().is_none());
        assert!(cursor.truncated_tail());
    }

    #[test]
    fn cursor_io_error_names_the_source() {
        let err = AlignmentCursor::with_source(BufReader::new(FailingReader), "aln.sam")
            .unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, PathBuf::from("aln.sam")),
            other => panic!("expected Io error, got {other}"),
        }
    }

    #[test]
    fn open_missing_or_empty_file() {
        let err = AlignmentCursor::open(Path::new("/nonexistent/aln.sam")).unwrap_err();
        assert!(matches!(err, Error::NoAlignments(_)));

        let file = NamedTempFile::new().unwrap();
        let err = AlignmentCursor::open(file.path()).unwrap_err();
        assert!(matches!(err, Error::NoAlignments(_)));
    }

    #[test]
    fn open_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{HEADER}{}\n", line("r1", 0, "c1", 10, "ACGT")).unwrap();
        let mut cursor = AlignmentCursor::open(file.path()).unwrap();
        assert!(cursor.next_record().unwrap().is_some());
    }
}
