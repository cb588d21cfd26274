use std::fmt;

/// Bases seen in a single quality string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordTally {
    pub high_quality_bases: u64,
    pub all_bases: u64,
}

/// Run-wide totals. `Display` renders the tab-separated summary line
/// `reads<TAB>high_quality_bases<TAB>all_bases`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QualityCounts {
    pub reads: u64,
    pub high_quality_bases: u64,
    pub all_bases: u64,
}

impl QualityCounts {
    #[inline]
    pub fn add(&mut self, tally: RecordTally) {
        self.reads += 1;
        self.high_quality_bases += tally.high_quality_bases;
        self.all_bases += tally.all_bases;
    }

    /// `<high> bases in <reads> sequences`, the jf0007 summary line.
    pub fn legacy_line(&self) -> String {
        format!(
            "{} bases in {} sequences",
            self.high_quality_bases, self.reads
        )
    }
}

impl fmt::Display for QualityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.reads, self.high_quality_bases, self.all_bases
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_render() {
        let mut c = QualityCounts::default();
        assert_eq!(c.to_string(), "0\t0\t0");
        c.add(RecordTally {
            high_quality_bases: 3,
            all_bases: 4,
        });
        c.add(RecordTally {
            high_quality_bases: 0,
            all_bases: 2,
        });
        assert_eq!(c.to_string(), "2\t3\t6");
        assert_eq!(c.legacy_line(), "3 bases in 2 sequences");
    }
}
