//! Streaming FASTQ quality counter.
//!
//! - One pass, strict 4-line records (header, sequence, `+`, quality).
//! - Counts reads, bases scoring at or above a Phred+33 threshold, and all bases.
//! - Truncated trailing records are errors; no partial totals.
//! - Plain input only; gzip input is detected and rejected.
//! - Optional `mmap` for plain files.

pub mod counts;
pub mod error;
pub mod policy;
pub mod quality;
pub mod scanner;
mod util;

pub use crate::counts::{QualityCounts, RecordTally};
pub use crate::error::{FormatError, IoContext, ScanError};
pub use crate::policy::{BelowOffset, LineTrim, ScanOptions};
pub use crate::quality::{DEFAULT_MIN_QSCORE, PHRED_OFFSET, QualityThreshold, decode};
pub use crate::scanner::{RecordScanner, ScanState, Source, scan_reader};
