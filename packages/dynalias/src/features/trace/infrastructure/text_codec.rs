//! Line-oriented text trace format
//!
//! ```text
//! # comment
//! alloc <id> <address> <size> <global|stack|heap>
//! free  <address> <size>
//! ptr   <value> <address> [@thread]
//! store <value> <pointer-address> <value-address>
//! enter <function> [@thread]
//! ret   <function> [@thread]
//! call  <callee|-> [@thread]
//! fork  [@thread]
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hex. Blank lines and `#` comments are
//! skipped. The first unparsable line ends the stream with a
//! [`DynAliasError::Malformed`] error.

use crate::errors::{DynAliasError, Result};
use crate::features::trace::domain::TraceRecord;
use crate::shared::models::{AllocKind, ThreadId, MAIN_THREAD};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

// ============================================================================
// Parsing
// ============================================================================

/// Parse one line; `Ok(None)` for blank and comment lines
pub fn parse_line(line: &str) -> std::result::Result<Option<TraceRecord>, String> {
    let content = line.split('#').next().unwrap_or_default();
    let mut tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }

    let thread = match tokens.last() {
        Some(last) if last.starts_with('@') => {
            let thread: ThreadId = parse_number(&last[1..], "thread")?;
            tokens.pop();
            thread
        }
        _ => MAIN_THREAD,
    };

    let keyword = tokens[0];
    let args = &tokens[1..];
    let threaded = matches!(keyword, "ptr" | "enter" | "ret" | "call" | "fork");
    if !threaded && thread != MAIN_THREAD {
        return Err(format!("'{}' records do not take a thread tag", keyword));
    }

    let record = match keyword {
        "alloc" => {
            expect_args(keyword, args, 4)?;
            let kind = AllocKind::parse(args[3])
                .ok_or_else(|| format!("unknown allocation kind '{}'", args[3]))?;
            TraceRecord::MemAlloc {
                id: parse_number(args[0], "id")?,
                address: parse_number(args[1], "address")?,
                size: parse_number(args[2], "size")?,
                kind,
            }
        }
        "free" => {
            expect_args(keyword, args, 2)?;
            TraceRecord::Free {
                address: parse_number(args[0], "address")?,
                size: parse_number(args[1], "size")?,
            }
        }
        "ptr" => {
            expect_args(keyword, args, 2)?;
            TraceRecord::TopLevel {
                value: parse_number(args[0], "value")?,
                address: parse_number(args[1], "address")?,
                thread,
            }
        }
        "store" => {
            expect_args(keyword, args, 3)?;
            TraceRecord::Store {
                value: parse_number(args[0], "value")?,
                pointer_address: parse_number(args[1], "pointer address")?,
                value_address: parse_number(args[2], "value address")?,
            }
        }
        "enter" => {
            expect_args(keyword, args, 1)?;
            TraceRecord::Enter {
                function: parse_number(args[0], "function")?,
                thread,
            }
        }
        "ret" => {
            expect_args(keyword, args, 1)?;
            TraceRecord::Return {
                function: parse_number(args[0], "function")?,
                thread,
            }
        }
        "call" => {
            let callee = match args {
                [] | ["-"] => None,
                [callee] => Some(parse_number(callee, "callee")?),
                _ => return Err(format!("'call' expects at most 1 argument, got {}", args.len())),
            };
            TraceRecord::Call { callee, thread }
        }
        "fork" => {
            expect_args(keyword, args, 0)?;
            TraceRecord::Fork { thread }
        }
        other => return Err(format!("unknown record kind '{}'", other)),
    };
    Ok(Some(record))
}

fn expect_args(keyword: &str, args: &[&str], expected: usize) -> std::result::Result<(), String> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(format!(
            "'{}' expects {} argument(s), got {}",
            keyword,
            expected,
            args.len()
        ))
    }
}

fn parse_number<T: TryFrom<u64>>(token: &str, field: &str) -> std::result::Result<T, String> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse::<u64>(),
    };
    let n = parsed.map_err(|_| format!("invalid {} '{}'", field, token))?;
    T::try_from(n).map_err(|_| format!("{} '{}' out of range", field, token))
}

// ============================================================================
// Reader
// ============================================================================

/// Streaming reader over a text trace
pub struct TextTraceReader<R> {
    lines: Lines<R>,
    line_no: u64,
    index: u64,
    done: bool,
}

impl<R: BufRead> TextTraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            index: 0,
            done: false,
        }
    }
}

impl TextTraceReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for TextTraceReader<R> {
    type Item = Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            self.line_no += 1;

            match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(record)) => {
                    self.index += 1;
                    return Some(Ok(record));
                }
                Err(message) => {
                    self.done = true;
                    return Some(Err(DynAliasError::malformed(
                        self.index,
                        format!("line {}: {}", self.line_no, message),
                    )));
                }
            }
        }
    }
}

// ============================================================================
// Writer
// ============================================================================

pub struct TextTraceWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> TextTraceWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn write(&mut self, record: &TraceRecord) -> Result<()> {
        writeln!(self.inner, "{}", record)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the sink
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
