//! Trace Dispatcher
//!
//! Single entry point for replaying a trace: pulls records in order, routes
//! each one to a [`TraceVisitor`], and turns the first structural failure
//! into a fatal error naming the offending record.

use crate::errors::{DynAliasError, Result};
use crate::features::trace::domain::TraceRecord;
use crate::features::trace::ports::TraceVisitor;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct TraceDispatcher {
    /// Log progress every N records (0 = off)
    progress_interval: u64,
}

impl TraceDispatcher {
    pub fn new(progress_interval: u64) -> Self {
        Self { progress_interval }
    }

    /// Replay `records` into `visitor`
    ///
    /// Stops at the first decoding error or structural error; nothing after
    /// it is dispatched. Returns the number of records processed.
    pub fn replay<I, V>(&self, records: I, visitor: &mut V) -> Result<u64>
    where
        I: IntoIterator<Item = Result<TraceRecord>>,
        V: TraceVisitor + ?Sized,
    {
        let mut index: u64 = 0;
        for record in records {
            let record = record?;

            #[cfg(feature = "trace")]
            tracing::trace!(index, %record, "dispatch");

            visitor
                .visit_record(&record)
                .map_err(|source| DynAliasError::Structural { index, source })?;

            index += 1;
            if self.progress_interval > 0 && index % self.progress_interval == 0 {
                info!(records = index, "trace replay progress");
            }
        }
        debug!(records = index, "trace replay finished");
        Ok(index)
    }

    /// Replay already-decoded records
    pub fn replay_records<I, V>(&self, records: I, visitor: &mut V) -> Result<u64>
    where
        I: IntoIterator<Item = TraceRecord>,
        V: TraceVisitor + ?Sized,
    {
        self.replay(records.into_iter().map(Ok), visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::context::ContextError;
    use crate::shared::models::{ThreadId, ValueId};

    /// Counts records and fails on a chosen function's return
    #[derive(Default)]
    struct Recorder {
        seen: Vec<&'static str>,
        fail_on_return_of: Option<ValueId>,
    }

    impl TraceVisitor for Recorder {
        fn visit_enter(
            &mut self,
            _function: ValueId,
            _thread: ThreadId,
        ) -> std::result::Result<(), ContextError> {
            self.seen.push("enter");
            Ok(())
        }

        fn visit_return(
            &mut self,
            function: ValueId,
            thread: ThreadId,
        ) -> std::result::Result<(), ContextError> {
            self.seen.push("ret");
            if self.fail_on_return_of == Some(function) {
                return Err(ContextError::ReturnWithoutEnter { function, thread });
            }
            Ok(())
        }
    }

    #[test]
    fn test_replay_counts_records() {
        let mut recorder = Recorder::default();
        let records = vec![
            TraceRecord::Enter {
                function: 1,
                thread: 0,
            },
            TraceRecord::Fork { thread: 0 },
            TraceRecord::Return {
                function: 1,
                thread: 0,
            },
        ];
        let n = TraceDispatcher::new(1).replay_records(records, &mut recorder).unwrap();
        assert_eq!(n, 3);
        assert_eq!(recorder.seen, vec!["enter", "ret"]);
    }

    #[test]
    fn test_structural_error_carries_index() {
        let mut recorder = Recorder {
            fail_on_return_of: Some(7),
            ..Recorder::default()
        };
        let records = vec![
            TraceRecord::Enter {
                function: 7,
                thread: 0,
            },
            TraceRecord::Return {
                function: 7,
                thread: 0,
            },
            TraceRecord::Enter {
                function: 8,
                thread: 0,
            },
        ];
        let err = TraceDispatcher::default()
            .replay_records(records, &mut recorder)
            .unwrap_err();
        assert_eq!(err.record_index(), Some(1));
        // Nothing after the failing record is dispatched
        assert_eq!(recorder.seen, vec!["enter", "ret"]);
    }

    #[test]
    fn test_decode_error_passes_through() {
        let mut recorder = Recorder::default();
        let records: Vec<Result<TraceRecord>> = vec![
            Ok(TraceRecord::Enter {
                function: 1,
                thread: 0,
            }),
            Err(DynAliasError::malformed(1, "bad line")),
        ];
        let err = TraceDispatcher::default().replay(records, &mut recorder).unwrap_err();
        assert!(matches!(err, DynAliasError::Malformed { index: 1, .. }));
    }
}
