use crate::counts::{QualityCounts, RecordTally};
use crate::error::{FormatError, IoContext, ScanError};
use crate::policy::{LineTrim, ScanOptions};
use crate::quality::count_high_quality;
use crate::util::{GZIP_MAGIC_LEN, has_gzip_magic, open_file, trim_terminator};

use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

const READ_CAPACITY: usize = 256 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Stdin,
    Reader,
}

/// Where the scanner is in the 4-line record grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Between records; the next line starts a new one.
    Idle,
    /// Header consumed, lines 2..=4 pending.
    InRecord,
    /// Clean end of input at a record boundary.
    Done,
    /// A record was truncated or unreadable. Nothing more is produced.
    Fatal,
}

/// Single-pass FASTQ quality scanner.
///
/// Groups input lines strictly by four (header, sequence, separator,
/// quality) without validating the first three, and tallies the quality
/// line of each record against [`ScanOptions::threshold`].
pub struct RecordScanner {
    src: Source,
    rdr: Box<dyn BufRead + Send>,
    opts: ScanOptions,
    state: ScanState,
    line_num: u64,
    byte_pos: u64,
    line: Vec<u8>,
    magic_checked: bool,
}

impl RecordScanner {
    /// Open a plain FASTQ file. With the `mmap` feature, non-empty files are mapped.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ScanOptions) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let f = open_file(path).map_err(|e| ScanError::io_err(e, IoContext::default()))?;

        #[cfg(feature = "mmap")]
        let rdr: Box<dyn BufRead + Send> = {
            let len = f
                .metadata()
                .map_err(|e| ScanError::io_err(e, IoContext::default()))?
                .len();
            if len == 0 {
                Box::new(BufReader::with_capacity(READ_CAPACITY, f))
            } else {
                // The map stays valid as long as nobody truncates the file under us.
                let mmap = unsafe { memmap2::Mmap::map(&f) }
                    .map_err(|e| ScanError::io_err(e, IoContext::default()))?;
                Box::new(io::Cursor::new(mmap))
            }
        };
        #[cfg(not(feature = "mmap"))]
        let rdr: Box<dyn BufRead + Send> = Box::new(BufReader::with_capacity(READ_CAPACITY, f));

        log::debug!("opened {}", path.display());
        Ok(Self::with_reader(Source::Path(path.to_path_buf()), rdr, opts))
    }

    /// Read from the process standard input.
    pub fn stdin(opts: ScanOptions) -> Self {
        let rdr = BufReader::with_capacity(READ_CAPACITY, io::stdin());
        Self::with_reader(Source::Stdin, Box::new(rdr), opts)
    }

    /// Wrap an arbitrary `BufRead`.
    pub fn from_bufread<R: BufRead + Send + 'static>(reader: R, opts: ScanOptions) -> Self {
        Self::with_reader(Source::Reader, Box::new(reader), opts)
    }

    fn with_reader(src: Source, rdr: Box<dyn BufRead + Send>, opts: ScanOptions) -> Self {
        Self {
            src,
            rdr,
            opts,
            state: ScanState::Idle,
            line_num: 0,
            byte_pos: 0,
            line: Vec::with_capacity(512),
            magic_checked: false,
        }
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Tally of the next record, `None` at end of input or after a failure.
    pub fn next_record(&mut self) -> Option<Result<RecordTally, ScanError>> {
        if matches!(self.state, ScanState::Done | ScanState::Fatal) {
            return None;
        }
        match self.read_one() {
            Ok(Some(tally)) => Some(Ok(tally)),
            Ok(None) => None,
            Err(err) => {
                self.state = ScanState::Fatal;
                Some(Err(err))
            }
        }
    }

    /// Drain the input and return the totals. Stops at the first error.
    pub fn run(mut self) -> Result<QualityCounts, ScanError> {
        let mut counts = QualityCounts::default();
        while let Some(tally) = self.next_record() {
            counts.add(tally?);
        }
        log::debug!(
            "scanned {} lines ({} bytes) from {:?}",
            self.line_num,
            self.byte_pos,
            self.src
        );
        Ok(counts)
    }

    fn read_line(&mut self) -> io::Result<usize> {
        self.line.clear();
        let n = self.rdr.read_until(b'\n', &mut self.line)?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
        }
        Ok(n)
    }

    /// Pull up to two bytes (however the source splits them), check them
    /// for the gzip magic, then put them back in front of the reader.
    fn check_magic(&mut self) -> Result<(), ScanError> {
        self.magic_checked = true;
        let mut head = Vec::with_capacity(GZIP_MAGIC_LEN);
        while head.len() < GZIP_MAGIC_LEN {
            let buf = match self.rdr.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScanError::io_err(e, IoContext::default())),
            };
            if buf.is_empty() {
                break;
            }
            let take = buf.len().min(GZIP_MAGIC_LEN - head.len());
            head.extend_from_slice(&buf[..take]);
            self.rdr.consume(take);
        }

        if has_gzip_magic(&head) {
            return Err(ScanError::fmt_err(
                FormatError::CompressedInput,
                IoContext::default(),
            ));
        }
        if !head.is_empty() {
            let rest = std::mem::replace(&mut self.rdr, Box::new(io::empty()));
            self.rdr = Box::new(io::Cursor::new(head).chain(rest));
        }
        Ok(())
    }

    fn read_one(&mut self) -> Result<Option<RecordTally>, ScanError> {
        if !self.magic_checked {
            self.check_magic()?;
        }

        // Header
        let n = self
            .read_line()
            .map_err(|e| ScanError::io_err(e, self.ctx()))?;
        if n == 0 {
            self.state = ScanState::Done;
            return Ok(None);
        }
        self.state = ScanState::InRecord;

        // Sequence, separator, quality. Only the last one is kept in `line`.
        for missing in 2..=4u8 {
            let n = self
                .read_line()
                .map_err(|e| ScanError::io_err(e, self.ctx()))?;
            if n == 0 {
                return Err(ScanError::fmt_err(
                    FormatError::TruncatedRecord { missing },
                    self.ctx(),
                ));
            }
        }

        match self.opts.line_trim {
            LineTrim::Terminator => trim_terminator(&mut self.line),
            LineTrim::LegacyOneByte => {
                self.line.pop();
            }
        }

        let high_quality_bases =
            count_high_quality(&self.line, self.opts.threshold, self.opts.below_offset)
                .map_err(|e| ScanError::fmt_err(e, self.ctx()))?;

        self.state = ScanState::Idle;
        Ok(Some(RecordTally {
            high_quality_bases,
            all_bases: self.line.len() as u64,
        }))
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

impl Iterator for RecordScanner {
    type Item = Result<RecordTally, ScanError>;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

/// Scan a whole `BufRead` with the given options.
pub fn scan_reader<R: BufRead + Send + 'static>(
    reader: R,
    opts: ScanOptions,
) -> Result<QualityCounts, ScanError> {
    RecordScanner::from_bufread(reader, opts).run()
}
