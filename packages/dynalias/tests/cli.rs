//! The `dynalias` binary end to end

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Two pointers into the first allocation, one into its replacement
fn trace() -> TraceBuilder {
    TraceBuilder::new()
        .heap(100, 0x1000, 8)
        .ptr(1, 0x1000)
        .ptr(2, 0x1000)
        .heap(101, 0x1000, 8)
        .ptr(3, 0x1000)
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("run.trace"), trace().to_text()).unwrap();
        Self { dir }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn dynalias(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_dynalias"))
            .current_dir(self.dir.path())
            .env("DYNALIAS_LOG", "off")
            .args(args)
            .output()
            .unwrap()
    }
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_run_reports_alias_pairs_by_default() {
    let ws = Workspace::new();
    let output = ws.dynalias(&["run", "--trace", "run.trace"]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["1 aliases", "(#1, #2)"]);
}

#[test]
fn test_run_honours_pointer_analysis_from_config() {
    let ws = Workspace::new();
    ws.write("dynalias.yaml", "version: 1\nanalysis: pointer\n");
    let output = ws.dynalias(&["run", "--trace", "run.trace", "--config", "dynalias.yaml"]);

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["3 pointers", "#1 -> #100", "#2 -> #100", "#3 -> #101"]
    );
}

#[test]
fn test_analysis_flag_overrides_config() {
    let ws = Workspace::new();
    ws.write("dynalias.yaml", "version: 1\nanalysis: pointer\n");

    let pointer = ws.dynalias(&["run", "--trace", "run.trace", "--analysis", "pointer"]);
    assert!(pointer.status.success());
    assert_eq!(stdout_lines(&pointer)[0], "3 pointers");

    let alias = ws.dynalias(&[
        "run",
        "--trace",
        "run.trace",
        "--config",
        "dynalias.yaml",
        "--analysis",
        "alias",
    ]);
    assert!(alias.status.success());
    assert_eq!(stdout_lines(&alias)[0], "1 aliases");
}

#[test]
fn test_pointer_analysis_json() {
    let ws = Workspace::new();
    let output = ws.dynalias(&[
        "run",
        "--trace",
        "run.trace",
        "--analysis",
        "pointer",
        "--output",
        "json",
    ]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["point_tos"]["3"], serde_json::json!([101]));
    assert_eq!(json["unresolved"], 0);
}

#[test]
fn test_unknown_analysis_is_rejected_by_parser() {
    let ws = Workspace::new();
    let output = ws.dynalias(&["run", "--trace", "run.trace", "--analysis", "shape"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("shape"));
}

#[test]
fn test_check_refuses_pointer_analysis() {
    let ws = Workspace::new();
    ws.write("oracle.json", "{}");
    let output = ws.dynalias(&[
        "check",
        "--trace",
        "run.trace",
        "--oracle",
        "oracle.json",
        "--analysis",
        "pointer",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("check compares alias pairs"));
}

#[test]
fn test_corrupt_trace_exits_with_status_two() {
    let ws = Workspace::new();
    ws.write("bad.trace", "alloc 100 0x1000 8 heap\nnot a record\n");
    let output = ws.dynalias(&["run", "--trace", "bad.trace"]);

    assert_eq!(output.status.code(), Some(2));
}
