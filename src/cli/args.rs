use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use kira_qscount::{BelowOffset, DEFAULT_MIN_QSCORE};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kira-qscount",
    about = "Count reads, higher-scored bases and all bases in a FASTQ file",
    after_help = "Output: number of reads, higher-scored bases, and all bases"
)]
pub struct Cli {
    /// `[MIN_QSCORE] [INPUT]`: a leading 1-2 digit number is the minimal score;
    /// the remaining argument is the FASTQ file (stdin when absent or `-`)
    #[arg(value_name = "ARGS")]
    pub positional: Vec<OsString>,

    /// Minimal quality score [default: 16]
    #[arg(short = 'q', long = "min-qscore", value_name = "MIN_QSCORE")]
    pub min_qscore: Option<u16>,

    /// Print programme name and version
    #[arg(short = 'v', long = "version", default_value_t = false)]
    pub version: bool,

    /// Read stdin (with a warning) when the input file cannot be opened
    #[arg(long, default_value_t = false)]
    pub stdin_fallback: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    pub format: OutputFormat,

    /// Handling of quality bytes below the Phred+33 offset
    #[arg(long, value_enum, default_value_t = BelowOffsetArg::Clamp)]
    pub below_offset: BelowOffsetArg,

    /// Drop exactly one trailing byte from every quality line
    #[arg(long, default_value_t = false)]
    pub legacy_trim: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// reads<TAB>high<TAB>all
    #[value(name = "tsv")]
    Tsv,
    /// "<high> bases in <reads> sequences"
    #[value(name = "legacy")]
    Legacy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BelowOffsetArg {
    #[value(name = "clamp")]
    Clamp,
    #[value(name = "legacy")]
    Legacy,
    #[value(name = "reject")]
    Reject,
}

impl From<BelowOffsetArg> for BelowOffset {
    fn from(v: BelowOffsetArg) -> Self {
        match v {
            BelowOffsetArg::Clamp => BelowOffset::Clamp,
            BelowOffsetArg::Legacy => BelowOffset::Legacy,
            BelowOffsetArg::Reject => BelowOffset::Reject,
        }
    }
}

/// Threshold and input after positional disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub min_qscore: u16,
    pub input: Option<PathBuf>,
}

impl Cli {
    pub fn resolve(&self) -> Result<Invocation> {
        let mut min_qscore = self.min_qscore;
        let mut rest = self.positional.as_slice();

        if let Some(first) = rest.first() {
            if is_small_int(first) {
                if min_qscore.is_some() {
                    bail!(
                        "minimal score given twice: -q and positional {:?}",
                        first
                    );
                }
                // 1-2 ASCII digits always fit in u16
                min_qscore = first.to_str().and_then(|s| s.parse().ok());
                rest = &rest[1..];
            }
        }

        let input = match rest {
            [] => None,
            [p] => Some(PathBuf::from(p)),
            _ => bail!("expected at most one input file, got {}", rest.len()),
        };

        Ok(Invocation {
            min_qscore: min_qscore.unwrap_or(DEFAULT_MIN_QSCORE),
            input,
        })
    }
}

/// True for "0".."99": one or two ASCII digits.
pub fn is_small_int(arg: &OsStr) -> bool {
    match arg.to_str() {
        Some(s) => (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

const SHORT_FLAGS: &[char] = &['h', 'v'];
const LONG_FLAGS: &[&str] = &["help", "version", "stdin-fallback", "legacy-trim"];
const LONG_WITH_VALUE: &[&str] = &["min-qscore", "format", "below-offset"];

/// Drop options the parser does not know, getopt style, so that they are
/// reported without aborting the run. Returns the kept arguments and the
/// dropped option names.
pub fn split_unknown_options<I>(args: I) -> (Vec<OsString>, Vec<String>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut it = args.into_iter();
    let mut kept: Vec<OsString> = it.next().into_iter().collect();
    let mut unknown = Vec::new();

    while let Some(arg) = it.next() {
        let Some(s) = arg.to_str() else {
            kept.push(arg);
            continue;
        };

        if s == "--" {
            kept.push(arg);
            kept.extend(it.by_ref());
            break;
        }

        if let Some(long) = s.strip_prefix("--") {
            let (name, has_inline_value) = match long.split_once('=') {
                Some((n, _)) => (n, true),
                None => (long, false),
            };
            if LONG_FLAGS.contains(&name) {
                kept.push(arg);
            } else if LONG_WITH_VALUE.contains(&name) {
                let value = if has_inline_value { None } else { it.next() };
                kept.push(arg);
                kept.extend(value);
            } else {
                unknown.push(format!("--{name}"));
            }
            continue;
        }

        let Some(cluster) = s.strip_prefix('-').filter(|c| !c.is_empty()) else {
            // positional or a bare "-"
            kept.push(arg);
            continue;
        };

        let mut rebuilt = String::from("-");
        let mut needs_value = false;
        for (i, c) in cluster.char_indices() {
            if SHORT_FLAGS.contains(&c) {
                rebuilt.push(c);
            } else if c == 'q' {
                rebuilt.push_str(&cluster[i..]);
                needs_value = i + 1 == cluster.len();
                break;
            } else {
                unknown.push(format!("-{c}"));
            }
        }
        if rebuilt.len() > 1 {
            kept.push(OsString::from(rebuilt));
            if needs_value {
                kept.extend(it.next());
            }
        }
    }

    (kept, unknown)
}
