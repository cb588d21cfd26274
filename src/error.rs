use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IoContext {
    pub byte_pos: u64,
    pub line_num: u64,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("truncated record: line {missing} of 4 is missing")]
    TruncatedRecord { missing: u8 },
    #[error("quality byte 0x{byte:02X} is below the Phred+33 offset")]
    QualityBelowOffset { byte: u8 },
    #[error("input looks gzip-compressed; decompress it first (e.g. `zcat in.fastq.gz | kira-qscount`)")]
    CompressedInput,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("I/O error at line {}, byte {}", ctx.line_num, ctx.byte_pos)]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("format error at line {}, byte {}", ctx.line_num, ctx.byte_pos)]
    Format {
        #[source]
        source: FormatError,
        ctx: IoContext,
    },
}

impl ScanError {
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Io { source, ctx }
    }
    pub(crate) fn fmt_err(source: FormatError, ctx: IoContext) -> Self {
        Self::Format { source, ctx }
    }

    /// Missing line index (2, 3 or 4) when the error is a truncated record.
    pub fn truncated_line(&self) -> Option<u8> {
        match self {
            Self::Format {
                source: FormatError::TruncatedRecord { missing },
                ..
            } => Some(*missing),
            _ => None,
        }
    }
}
