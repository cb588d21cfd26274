use crate::cli::args::{self, Cli, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use kira_qscount::{LineTrim, QualityThreshold, RecordScanner, ScanOptions};
use std::env;
use std::io::{self, Write};
use std::path::Path;

pub fn entry() -> Result<()> {
    init_logging();

    let (argv, unknown) = args::split_unknown_options(env::args_os());
    for opt in &unknown {
        log::warn!("unknown option: {opt}");
    }

    let cli = Cli::parse_from(argv);
    run(cli)
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.version {
        println!("{} ver. {}", env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let inv = cli.resolve()?;
    let opts = ScanOptions {
        threshold: QualityThreshold::new(inv.min_qscore),
        below_offset: cli.below_offset.into(),
        line_trim: if cli.legacy_trim {
            LineTrim::LegacyOneByte
        } else {
            LineTrim::Terminator
        },
    };
    log::debug!("options: {opts:?}");

    let scanner = open_input(inv.input.as_deref(), cli.stdin_fallback, opts)?;
    let counts = scanner.run().context("failed to scan FASTQ input")?;

    let mut out = io::stdout().lock();
    let written = match cli.format {
        OutputFormat::Tsv => writeln!(out, "{counts}"),
        OutputFormat::Legacy => writeln!(out, "{}", counts.legacy_line()),
    };
    written.context("failed to write summary")?;
    Ok(())
}

fn open_input(
    path: Option<&Path>,
    stdin_fallback: bool,
    opts: ScanOptions,
) -> Result<RecordScanner> {
    let Some(path) = path.filter(|p| p.as_os_str() != "-") else {
        return Ok(RecordScanner::stdin(opts));
    };

    match RecordScanner::from_path(path, opts.clone()) {
        Ok(scanner) => Ok(scanner),
        Err(err) if stdin_fallback => {
            log::warn!(
                "cannot open {} ({err}); reading standard input instead",
                path.display()
            );
            Ok(RecordScanner::stdin(opts))
        }
        Err(err) => Err(err).with_context(|| format!("failed to open input {}", path.display())),
    }
}
