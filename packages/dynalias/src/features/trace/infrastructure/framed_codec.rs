//! Binary trace format
//!
//! Each record is written as:
//! ```text
//! [u32_le length: 4 bytes][msgpack record: length bytes]
//! ```
//!
//! A clean end of input is only accepted on a frame boundary. A partial
//! length prefix, a short payload or an undecodable payload is malformed
//! framing and ends the stream with an error.

use crate::errors::{DynAliasError, Result};
use crate::features::trace::domain::TraceRecord;
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// Largest accepted payload; anything bigger is a corrupt length prefix
pub const MAX_FRAME_LEN: u32 = 1 << 20;

pub struct FramedTraceReader<R> {
    inner: R,
    index: u64,
    done: bool,
}

impl<R: Read> FramedTraceReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            index: 0,
            done: false,
        }
    }

    /// Length prefix of the next frame, `None` at a clean end of input
    fn read_frame_len(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => Ok(None),
            4 => Ok(Some(LittleEndian::read_u32(&buf))),
            n => Err(DynAliasError::malformed(
                self.index,
                format!("truncated length prefix ({} of 4 bytes)", n),
            )),
        }
    }

    fn read_record(&mut self) -> Result<Option<TraceRecord>> {
        let Some(len) = self.read_frame_len()? else {
            return Ok(None);
        };
        if len == 0 || len > MAX_FRAME_LEN {
            return Err(DynAliasError::malformed(
                self.index,
                format!("implausible frame length {}", len),
            ));
        }

        let mut payload = vec![0u8; len as usize];
        self.inner.read_exact(&mut payload).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                DynAliasError::malformed(
                    self.index,
                    format!("truncated frame: expected {} bytes", len),
                )
            } else {
                e.into()
            }
        })?;

        let record = rmp_serde::from_slice(&payload).map_err(|e| {
            DynAliasError::malformed(self.index, format!("undecodable record: {}", e))
        })?;
        Ok(Some(record))
    }
}

impl FramedTraceReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read> Iterator for FramedTraceReader<R> {
    type Item = Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => {
                self.index += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub struct FramedTraceWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> FramedTraceWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Write a single record with its length prefix
    pub fn write(&mut self, record: &TraceRecord) -> Result<()> {
        let bytes = rmp_serde::to_vec_named(record)
            .map_err(|e| DynAliasError::Serialization(e.to_string()))?;
        let len = u32::try_from(bytes.len())
            .map_err(|_| DynAliasError::Serialization("record exceeds frame size".to_string()))?;

        self.inner.write_u32::<LittleEndian>(len)?;
        self.inner.write_all(&bytes)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::AllocKind;
    use std::io::Cursor;

    fn encode(records: &[TraceRecord]) -> Vec<u8> {
        let mut writer = FramedTraceWriter::new(Vec::new());
        for record in records {
            writer.write(record).unwrap();
        }
        writer.finish().unwrap()
    }

    fn sample() -> Vec<TraceRecord> {
        vec![
            TraceRecord::MemAlloc {
                id: 1,
                address: 0x7fff_0000,
                size: 24,
                kind: AllocKind::Stack,
            },
            TraceRecord::Call {
                callee: None,
                thread: 4,
            },
        ]
    }

    #[test]
    fn test_frames_decode_in_order() {
        let bytes = encode(&sample());
        let len = LittleEndian::read_u32(&bytes[..4]) as usize;
        assert!(bytes.len() > 4 + len);

        let decoded: Vec<_> = FramedTraceReader::new(Cursor::new(bytes))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_truncated_payload_is_malformed() {
        let mut bytes = encode(&sample());
        bytes.truncate(bytes.len() - 1);

        let results: Vec<_> = FramedTraceReader::new(Cursor::new(bytes)).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.record_index(), Some(1));
    }

    #[test]
    fn test_partial_prefix_is_malformed() {
        let mut bytes = encode(&sample()[..1]);
        bytes.extend_from_slice(&[0x05, 0x00]);

        let results: Vec<_> = FramedTraceReader::new(Cursor::new(bytes)).collect();
        assert!(results[1]
            .as_ref()
            .unwrap_err()
            .to_string()
            .contains("truncated length prefix"));
    }

    #[test]
    fn test_garbage_payload_is_malformed() {
        let mut bytes = Vec::new();
        bytes.write_u32::<LittleEndian>(3).unwrap();
        bytes.extend_from_slice(&[0xc1, 0xc1, 0xc1]);

        let mut reader = FramedTraceReader::new(Cursor::new(bytes));
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(FramedTraceReader::new(Cursor::new(Vec::new())).next().is_none());
    }
}
