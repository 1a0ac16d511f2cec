//! Configuration for the streaming passes.
//!
//! Both the [`Aggregator`](crate::core::Aggregator) and the
//! [`Exporter`](crate::core::Exporter) read the backup through the same
//! [`StreamingConfig`]. None of these settings change results; they only
//! trade memory, throughput and progress granularity.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use smsslicer::config::StreamingConfig;
//!
//! let config = StreamingConfig::new()
//!     .with_buffer_size(256 * 1024)
//!     .with_batch_size(5_000)
//!     .with_progress_interval(Duration::from_millis(250));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default read buffer (64KB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Default number of messages folded into the table at once.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default minimum time between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration options for streaming passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Buffer size for file reading.
    ///
    /// Default: 64KB. Larger buffers improve throughput but use more memory.
    /// Values below 1 are treated as 1.
    pub buffer_size: usize,

    /// Messages buffered before being folded into the statistics table.
    ///
    /// Default: 1000. Values below 1 are treated as 1. Progress is only
    /// checked on batch boundaries.
    pub batch_size: usize,

    /// Minimum wall-clock time between two progress reports.
    ///
    /// Default: 1s. `Duration::ZERO` reports on every batch boundary.
    pub progress_interval: Duration,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl StreamingConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the progress reporting interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Read buffer size actually used when opening a backup.
    ///
    /// A zero-capacity `BufReader` reports end of file immediately.
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(1)
    }

    /// Batch size actually used by the aggregator.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
