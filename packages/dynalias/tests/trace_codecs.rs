//! Trace codec integration tests
//!
//! Text and framed traces written to disk, read back through `open_trace`
//! and replayed.

mod common;

use common::*;
use dynalias::features::trace::{open_trace, FramedTraceWriter, TextTraceWriter, TraceFormat};
use dynalias::{AliasEngine, DynAliasError, EngineConfig};
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tempfile::TempDir;

fn sample_trace() -> TraceBuilder {
    TraceBuilder::new()
        .global(1, 0x601000, 64)
        .call(Some(10))
        .enter(10)
        .stack(2, 0x7ffe_0000, 16)
        .heap(3, 0x2000, 32)
        .ptr(20, 0x2000)
        .ptr(21, 0x2000)
        .store(21, 0x7ffe_0000, 0x2000)
        .ptr_on(22, 0x601000, 3)
        .ptr(23, 0x601000)
        .free(0x2000, 32)
        .call(None)
        .ret(10)
        .fork()
}

fn write_framed(path: &std::path::Path, trace: &TraceBuilder) -> u64 {
    let mut writer = FramedTraceWriter::new(BufWriter::new(File::create(path).unwrap()));
    for record in trace.clone().build() {
        writer.write(&record).unwrap();
    }
    let written = writer.written();
    writer.finish().unwrap();
    written
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_text_file_replays() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.trace");
    let trace = sample_trace();
    fs::write(&path, trace.to_text()).unwrap();

    let records = open_trace(&path, TraceFormat::from_path(&path)).unwrap();
    let report = AliasEngine::new(EngineConfig::default()).run(records).unwrap();

    assert_aliases(&report, &[(20, 21), (22, 23)]);
    assert_eq!(report.stats().records(), trace.len() as u64);
}

#[test]
fn test_text_comments_and_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("handwritten.trace");
    fs::write(
        &path,
        "# two pointers into one heap object\n\
         \n\
         alloc 100 0x1000 8 heap   # malloc\n\
         ptr 1 4096\n\
         ptr 2 0x1000 @0\n",
    )
    .unwrap();

    let records: Vec<_> = open_trace(&path, TraceFormat::Text)
        .unwrap()
        .collect::<dynalias::Result<_>>()
        .unwrap();
    assert_eq!(records.len(), 3);

    let report = AliasEngine::new(EngineConfig::default())
        .run(records.into_iter().map(Ok))
        .unwrap();
    assert_aliases(&report, &[(1, 2)]);
}

#[test]
fn test_text_malformed_line_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.trace");
    fs::write(
        &path,
        "alloc 100 0x1000 8 heap\nptr 1 0x1000\n# fine\nptr 2\nptr 3 0x1000\n",
    )
    .unwrap();

    let records = open_trace(&path, TraceFormat::Text).unwrap();
    let err = AliasEngine::new(EngineConfig::default())
        .run(records)
        .unwrap_err();

    assert!(err.is_trace_corruption());
    match err {
        DynAliasError::Malformed { index, message } => {
            assert_eq!(index, 2);
            assert!(message.starts_with("line 4:"), "{}", message);
        }
        other => panic!("expected a malformed record, got {:?}", other),
    }
}

#[test]
fn test_text_writer_output_parses_back() {
    let trace = sample_trace();
    let mut writer = TextTraceWriter::new(Vec::new());
    for record in trace.clone().build() {
        writer.write(&record).unwrap();
    }
    assert_eq!(writer.written(), trace.len() as u64);
    let text = String::from_utf8(writer.finish().unwrap()).unwrap();

    assert!(text.contains("ptr 22 0x601000 @3\n"));
    assert!(text.contains("call -\n"));
    assert_eq!(text, trace.to_text());
}

// ============================================================================
// Framed
// ============================================================================

#[test]
fn test_framed_file_matches_text_replay() {
    let dir = TempDir::new().unwrap();
    let text_path = dir.path().join("run.trace");
    let framed_path = dir.path().join("run.trace.bin");
    let trace = sample_trace();
    fs::write(&text_path, trace.to_text()).unwrap();
    assert_eq!(write_framed(&framed_path, &trace), trace.len() as u64);

    assert_eq!(TraceFormat::from_path(&framed_path), TraceFormat::Framed);
    let from_text = AliasEngine::new(EngineConfig::default())
        .run(open_trace(&text_path, TraceFormat::Text).unwrap())
        .unwrap();
    let from_framed = AliasEngine::new(EngineConfig::default())
        .run(open_trace(&framed_path, TraceFormat::Framed).unwrap())
        .unwrap();

    assert_eq!(from_text.pairs(), from_framed.pairs());
    assert_eq!(from_text.stats(), from_framed.stats());
}

#[test]
fn test_framed_truncated_payload_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cut.bin");
    let trace = sample_trace();
    write_framed(&path, &trace);

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

    let results: Vec<_> = open_trace(&path, TraceFormat::Framed).unwrap().collect();
    assert_eq!(results.len(), trace.len());
    let last = results.last().unwrap();
    assert!(matches!(
        last,
        Err(DynAliasError::Malformed { index, .. }) if *index == trace.len() as u64 - 1
    ));
}

#[test]
fn test_framed_garbage_payload_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.bin");
    let mut file = File::create(&path).unwrap();
    file.write_all(&3u32.to_le_bytes()).unwrap();
    file.write_all(&[0xc1, 0xc1, 0xc1]).unwrap();
    drop(file);

    let err = AliasEngine::new(EngineConfig::default())
        .run(open_trace(&path, TraceFormat::Framed).unwrap())
        .unwrap_err();
    assert_eq!(err.record_index(), Some(0));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = match open_trace(&dir.path().join("absent.trace"), TraceFormat::Text) {
        Ok(_) => panic!("opening a missing trace succeeded"),
        Err(e) => e,
    };
    assert!(matches!(err, DynAliasError::Io(_)));
    assert!(!err.is_trace_corruption());
}
