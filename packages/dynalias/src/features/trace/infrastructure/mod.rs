//! Trace codecs
//!
//! - **Text**: one record per line, for hand-written and golden traces
//! - **Framed**: `[u32_le len][msgpack]` frames, for instrumented runs

pub mod framed_codec;
pub mod text_codec;

pub use framed_codec::{FramedTraceReader, FramedTraceWriter, MAX_FRAME_LEN};
pub use text_codec::{parse_line, TextTraceReader, TextTraceWriter};

use crate::errors::Result;
use crate::features::trace::domain::TraceRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Boxed record stream, whatever the on-disk format
pub type RecordStream = Box<dyn Iterator<Item = Result<TraceRecord>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    #[default]
    Text,
    Framed,
}

impl TraceFormat {
    /// Guess from the file extension (`.bin` / `.trace.bin` → framed)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("bin") | Some("msgpack") => Self::Framed,
            _ => Self::Text,
        }
    }
}

/// Open `path` as a record stream
pub fn open_trace(path: &Path, format: TraceFormat) -> Result<RecordStream> {
    Ok(match format {
        TraceFormat::Text => Box::new(TextTraceReader::open(path)?),
        TraceFormat::Framed => Box::new(FramedTraceReader::open(path)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(TraceFormat::from_path(Path::new("run.trace.bin")), TraceFormat::Framed);
        assert_eq!(TraceFormat::from_path(Path::new("run.trace")), TraceFormat::Text);
        assert_eq!(TraceFormat::from_path(Path::new("noext")), TraceFormat::Text);
    }
}
