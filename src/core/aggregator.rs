//! Single-pass statistics over a backup file.
//!
//! The [`Aggregator`] streams the backup once, folds messages into a
//! [`ConversationTable`] in batches, and reports progress on batch
//! boundaries no more often than the configured interval.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use smsslicer::config::StreamingConfig;
//! use smsslicer::core::Aggregator;
//! use smsslicer::progress::no_progress;
//!
//! let aggregator = Aggregator::with_config(
//!     StreamingConfig::new()
//!         .with_batch_size(5000)
//!         .with_progress_interval(Duration::from_millis(250)),
//! );
//!
//! let table = aggregator.aggregate("sms-backup.xml", no_progress())?;
//! for (address, stats) in table.top_by_count(5) {
//!     println!("{} ({address}): {} messages", stats.display_name(), stats.count);
//! }
//! # Ok::<(), smsslicer::SmsSlicerError>(())
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::StreamingConfig;
use crate::core::models::ConversationTable;
use crate::error::Result;
use crate::progress::{BYTES_PER_MB, ProgressSnapshot, SinkResult};
use crate::streaming::{MessageIterator, SmsReader};

/// Builds per-contact statistics from a backup.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: StreamingConfig,
}

impl Aggregator {
    /// Creates an aggregator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregator with custom streaming settings.
    pub fn with_config(config: StreamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Streams the backup at `path` and returns its statistics.
    ///
    /// `sink` receives throttled snapshots while the pass runs and exactly
    /// one final snapshot at 100%. Sink errors and panics are logged and
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// - [`FileAccess`](crate::SmsSlicerError::FileAccess) if the file
    ///   cannot be opened or read
    /// - [`MalformedInput`](crate::SmsSlicerError::MalformedInput) on bad
    ///   XML or an `sms` element without a valid `address`/`date`
    ///
    /// No partial table is returned on error.
    pub fn aggregate<P, F>(&self, path: P, sink: F) -> Result<ConversationTable>
    where
        P: AsRef<Path>,
        F: FnMut(&ProgressSnapshot<'_>) -> SinkResult,
    {
        let path = path.as_ref();
        let reader = SmsReader::open(path, &self.config)?.skip_bodies();
        info!(
            path = %path.display(),
            size_mb = reader.total_bytes().unwrap_or(0) as f64 / BYTES_PER_MB,
            "aggregating backup"
        );

        self.aggregate_reader(reader, sink)
    }

    /// Aggregates any [`MessageIterator`].
    ///
    /// Used by [`aggregate`](Self::aggregate); exposed for callers that
    /// stream from something other than a file.
    pub fn aggregate_reader<I, F>(&self, mut messages: I, mut sink: F) -> Result<ConversationTable>
    where
        I: MessageIterator,
        F: FnMut(&ProgressSnapshot<'_>) -> SinkResult,
    {
        let batch_size = self.config.effective_batch_size();
        let total_bytes = messages.total_bytes().unwrap_or(0);
        let started = Instant::now();
        let mut last_report = started;

        let mut table = ConversationTable::new();
        let mut batch = Vec::with_capacity(batch_size);
        let mut processed: u64 = 0;

        loop {
            for result in messages.by_ref().take(batch_size) {
                batch.push(result?);
            }
            if batch.is_empty() {
                break;
            }

            let exhausted = batch.len() < batch_size;
            processed += batch.len() as u64;
            table.record_batch(batch.drain(..));

            let now = Instant::now();
            if now.duration_since(last_report) >= self.config.progress_interval {
                last_report = now;
                let snapshot = ProgressSnapshot::measure(
                    messages.bytes_processed(),
                    total_bytes,
                    now.duration_since(started),
                    processed,
                    &table,
                );
                debug!(
                    progress = snapshot.progress,
                    throughput_mb_s = snapshot.throughput_mb_s,
                    messages = processed,
                    "aggregation progress"
                );
                deliver(&mut sink, &snapshot);
            }

            if exhausted {
                break;
            }
        }

        deliver(&mut sink, &ProgressSnapshot::complete(processed, total_bytes, &table));
        info!(
            conversations = table.len(),
            messages = processed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregation complete"
        );

        Ok(table)
    }
}

/// Streams `path` with default settings.
///
/// See [`Aggregator::aggregate`].
pub fn aggregate<P, F>(path: P, sink: F) -> Result<ConversationTable>
where
    P: AsRef<Path>,
    F: FnMut(&ProgressSnapshot<'_>) -> SinkResult,
{
    Aggregator::new().aggregate(path, sink)
}

/// Hands a snapshot to the sink, containing anything it throws.
fn deliver<F>(sink: &mut F, snapshot: &ProgressSnapshot<'_>)
where
    F: FnMut(&ProgressSnapshot<'_>) -> SinkResult,
{
    match panic::catch_unwind(AssertUnwindSafe(|| sink(snapshot))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "progress sink failed"),
        Err(_) => warn!("progress sink panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const BACKUP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<smses count="4">
  <sms address="A" date="1000" type="2" body="one" contact_name="Alice" />
  <sms address="A" date="500" type="1" body="two" contact_name="Alice" />
  <sms address="A" date="1500" type="2" body="three" contact_name="Alice" />
  <sms address="B" date="700" type="1" body="four" />
</smses>
"#;

    fn reader(xml: &str) -> SmsReader<&[u8]> {
        SmsReader::from_reader(xml.as_bytes(), xml.len() as u64, "test.xml")
    }

    fn every_batch(batch_size: usize) -> Aggregator {
        Aggregator::with_config(
            StreamingConfig::new()
                .with_batch_size(batch_size)
                .with_progress_interval(Duration::ZERO),
        )
    }

    #[test]
    fn test_aggregate_counts() {
        let table = Aggregator::new()
            .aggregate_reader(reader(BACKUP), |_: &ProgressSnapshot<'_>| Ok(()))
            .unwrap();

        let a = table.get("A").unwrap();
        assert_eq!((a.count, a.sent, a.received), (3, 2, 1));
        assert_eq!((a.first_date, a.last_date), (500, 1500));
        assert_eq!(a.display_name(), "Alice");

        let b = table.get("B").unwrap();
        assert_eq!(b.count, 1);
        assert!(b.contact_name.is_none());
    }

    #[test]
    fn test_snapshots_end_with_single_complete() {
        let mut seen = Vec::new();
        every_batch(1)
            .aggregate_reader(reader(BACKUP), |s: &ProgressSnapshot<'_>| {
                seen.push((s.progress, s.messages_processed, s.is_complete()));
                Ok(())
            })
            .unwrap();

        // one per batch of one message, then the final one
        assert_eq!(seen.len(), 5);
        assert_eq!(seen.iter().filter(|(_, _, done)| *done).count(), 1);

        let (progress, processed, done) = *seen.last().unwrap();
        assert_eq!(progress, 1.0);
        assert_eq!(processed, 4);
        assert!(done);

        let messages: Vec<u64> = seen.iter().map(|(_, m, _)| *m).collect();
        assert_eq!(messages, vec![1, 2, 3, 4, 4]);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut progress = Vec::new();
        every_batch(1)
            .aggregate_reader(reader(BACKUP), |s: &ProgressSnapshot<'_>| {
                progress.push(s.progress);
                Ok(())
            })
            .unwrap();

        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_long_interval_reports_only_final() {
        let aggregator = Aggregator::with_config(
            StreamingConfig::new()
                .with_batch_size(1)
                .with_progress_interval(Duration::from_secs(3600)),
        );
        let mut calls = 0;
        aggregator
            .aggregate_reader(reader(BACKUP), |_: &ProgressSnapshot<'_>| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_batch_size_does_not_change_result() {
        let one = every_batch(1)
            .aggregate_reader(reader(BACKUP), |_: &ProgressSnapshot<'_>| Ok(()))
            .unwrap();
        let exact = every_batch(4)
            .aggregate_reader(reader(BACKUP), |_: &ProgressSnapshot<'_>| Ok(()))
            .unwrap();
        let zero = every_batch(0)
            .aggregate_reader(reader(BACKUP), |_: &ProgressSnapshot<'_>| Ok(()))
            .unwrap();
        assert_eq!(one, exact);
        assert_eq!(one, zero);
    }

    #[test]
    fn test_sink_error_is_ignored() {
        let table = every_batch(1)
            .aggregate_reader(reader(BACKUP), |_: &ProgressSnapshot<'_>| Err("display gone".into()))
            .unwrap();
        assert_eq!(table.total_messages(), 4);
    }

    #[test]
    fn test_sink_panic_is_ignored() {
        let mut calls = 0;
        let table = every_batch(2)
            .aggregate_reader(reader(BACKUP), |_: &ProgressSnapshot<'_>| {
                calls += 1;
                if calls == 1 {
                    panic!("sink exploded");
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(table.total_messages(), 4);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_empty_backup() {
        let xml = r#"<?xml version="1.0"?><smses count="0"></smses>"#;
        let mut finals = 0;
        let table = Aggregator::new()
            .aggregate_reader(reader(xml), |s: &ProgressSnapshot<'_>| {
                assert!(s.is_complete());
                finals += 1;
                Ok(())
            })
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(finals, 1);
    }

    #[test]
    fn test_malformed_aborts_without_final_snapshot() {
        let xml = r#"<smses><sms address="A" date="1" /><sms date="2" /></smses>"#;
        let mut complete = false;
        let err = every_batch(1)
            .aggregate_reader(reader(xml), |s: &ProgressSnapshot<'_>| {
                complete |= s.is_complete();
                Ok(())
            })
            .unwrap_err();
        assert!(err.is_malformed_input());
        assert!(!complete);
    }

    #[test]
    fn test_missing_file() {
        let err = aggregate("/definitely/not/here.xml", |_: &ProgressSnapshot<'_>| Ok(())).unwrap_err();
        assert!(err.is_file_access());
    }
}
