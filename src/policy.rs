use crate::quality::QualityThreshold;

/// What to do with quality bytes that decode to a negative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BelowOffset {
    /// Treat the score as 0.
    #[default]
    Clamp,
    /// Count the base as high-quality whatever the threshold. Also applies
    /// to bytes >= 0x80, which wrap the same way through a signed `char`
    /// in the ns0007/jf0007 tools.
    Legacy,
    /// Stop the scan with a format error.
    Reject,
}

/// How the terminator is removed from a quality line before counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTrim {
    /// Strip `\n` and then `\r` only when present.
    #[default]
    Terminator,
    /// Drop exactly one trailing byte, even when the last line has no newline.
    LegacyOneByte,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub threshold: QualityThreshold,
    pub below_offset: BelowOffset,
    pub line_trim: LineTrim,
}

impl ScanOptions {
    pub fn with_threshold(threshold: u16) -> Self {
        Self {
            threshold: QualityThreshold::new(threshold),
            ..Self::default()
        }
    }
}
