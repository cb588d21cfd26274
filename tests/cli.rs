use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_kira-qscount");

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // The child may exit before reading (e.g. on a bad path)
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(o: &Output) -> String {
    String::from_utf8(o.stdout.clone()).unwrap()
}

#[test]
fn stdin_default_threshold() {
    // '0' = 15, '1' = 16
    let o = run_with_stdin(&[], "@r\nAC\n+\n01\n");
    assert!(o.status.success());
    assert_eq!(stdout(&o), "1\t1\t2\n");
}

#[test]
fn positional_threshold_and_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("in.fastq");
    fs::write(&path, "@r\nACGT\n+\n!!!!\n").unwrap();

    let o = Command::new(BIN)
        .args(["0", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(o.status.success());
    assert_eq!(stdout(&o), "1\t4\t4\n");

    let o = Command::new(BIN)
        .args(["-q", "1", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(stdout(&o), "1\t0\t4\n");
}

#[test]
fn truncated_input_fails_without_summary() {
    let o = run_with_stdin(&["-q", "0"], "@r\nACGT\n");
    assert!(!o.status.success());
    assert!(o.stdout.is_empty());
    assert!(String::from_utf8_lossy(&o.stderr).contains("line 3 of 4"));
}

#[test]
fn help_and_version_skip_processing() {
    let o = Command::new(BIN).arg("-h").output().unwrap();
    assert!(o.status.success());
    assert!(stdout(&o).contains("Usage"));

    let o = Command::new(BIN).arg("-v").output().unwrap();
    assert!(o.status.success());
    assert_eq!(
        stdout(&o),
        format!("kira-qscount ver. {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn unknown_option_warns_and_continues() {
    let o = run_with_stdin(&["-x", "-q", "0"], "@r\nA\n+\n!\n");
    assert!(o.status.success());
    assert_eq!(stdout(&o), "1\t1\t1\n");
    assert!(String::from_utf8_lossy(&o.stderr).contains("unknown option: -x"));
}

#[test]
fn missing_file_is_an_error_unless_fallback() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.fastq");
    let missing = missing.to_str().unwrap();

    let o = run_with_stdin(&[missing], "@r\nA\n+\nI\n");
    assert!(!o.status.success());
    assert!(o.stdout.is_empty());

    let o = run_with_stdin(&["--stdin-fallback", missing], "@r\nA\n+\nI\n");
    assert!(o.status.success());
    assert_eq!(stdout(&o), "1\t1\t1\n");
    assert!(String::from_utf8_lossy(&o.stderr).contains("reading standard input"));
}

#[test]
fn malformed_threshold_exits_with_usage_error() {
    let o = Command::new(BIN).args(["-q", "high"]).output().unwrap();
    assert_eq!(o.status.code(), Some(2));
}

#[test]
fn legacy_output_format() {
    let o = run_with_stdin(&["--format", "legacy", "30"], "@r\nAC\n+\n5I\n");
    assert!(o.status.success());
    assert_eq!(stdout(&o), "1 bases in 1 sequences\n");
}

#[test]
fn dash_reads_stdin() {
    let o = run_with_stdin(&["30", "-"], "@r\nAC\n+\n5I\n");
    assert!(o.status.success());
    assert_eq!(stdout(&o), "1\t1\t2\n");
}

#[test]
fn below_offset_reject_fails_the_run() {
    let o = run_with_stdin(&["--below-offset", "reject", "0"], "@r\nA\n+\n\x1f\n");
    assert!(!o.status.success());
    assert!(o.stdout.is_empty());
    assert!(String::from_utf8_lossy(&o.stderr).contains("below the Phred+33 offset"));

    let o = run_with_stdin(&["--below-offset", "legacy", "40"], "@r\nA\n+\n\x1f\n");
    assert_eq!(stdout(&o), "1\t1\t1\n");
}

#[test]
fn legacy_trim_drops_one_byte_of_unterminated_line() {
    let input = "@r\nACGT\n+\n!!!!";
    let o = run_with_stdin(&["--legacy-trim", "0"], input);
    assert!(o.status.success());
    assert_eq!(stdout(&o), "1\t3\t3\n");

    let o = run_with_stdin(&["0"], input);
    assert_eq!(stdout(&o), "1\t4\t4\n");
}

#[test]
fn truncation_cause_is_printed_once() {
    let o = run_with_stdin(&[], "@r\nACGT\n");
    let stderr = String::from_utf8_lossy(&o.stderr);
    assert_eq!(stderr.matches("line 3 of 4").count(), 1);
}
