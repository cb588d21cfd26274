use crate::error::FormatError;
use crate::policy::BelowOffset;

/// ASCII offset of Sanger / Illumina 1.8+ quality strings.
pub const PHRED_OFFSET: u8 = 33;

pub const DEFAULT_MIN_QSCORE: u16 = 16;

/// Minimum decoded Phred score for a base to count as high-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualityThreshold(u16);

impl QualityThreshold {
    pub const fn new(min_score: u16) -> Self {
        Self(min_score)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn is_met_by(self, score: i32) -> bool {
        score >= i32::from(self.0)
    }
}

impl Default for QualityThreshold {
    fn default() -> Self {
        Self(DEFAULT_MIN_QSCORE)
    }
}

/// Signed Phred+33 decode. Bytes below `!` give negative scores.
#[inline]
pub fn decode(byte: u8) -> i32 {
    i32::from(byte) - i32::from(PHRED_OFFSET)
}

/// Count high-quality bytes in one quality string.
pub fn count_high_quality(
    qual: &[u8],
    threshold: QualityThreshold,
    below: BelowOffset,
) -> Result<u64, FormatError> {
    let mut n = 0u64;
    for &b in qual {
        if below == BelowOffset::Legacy && b >= 0x80 {
            n += 1;
            continue;
        }
        let score = decode(b);
        let high = if score >= 0 {
            threshold.is_met_by(score)
        } else {
            match below {
                BelowOffset::Clamp => threshold.is_met_by(0),
                BelowOffset::Legacy => true,
                BelowOffset::Reject => {
                    return Err(FormatError::QualityBelowOffset { byte: b });
                }
            }
        };
        if high {
            n += 1;
        }
    }
    Ok(n)
}
