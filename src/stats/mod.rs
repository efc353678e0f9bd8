//! Write statistics for an incremental writer.
//!
//! Byte and entry counters are always maintained. Durations are measured
//! only when [`WriterOptions::record_timings`] is enabled, in which case every
//! append and the final directory write are also logged at debug level.
//! Only aggregates are kept, so the statistics stay the same size however
//! many entries are appended.
//!
//! [`WriterOptions::record_timings`]: crate::WriterOptions::record_timings

use std::time::Instant;

/// Aggregated write statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Entries appended through this writer.
    pub entries_written: u64,
    /// Total bytes handed to the archive before compression.
    pub encoded_bytes: u64,
    /// Appends that were timed.
    pub timed_appends: u64,
    /// Total time spent in appends (microseconds). Zero unless timings are
    /// recorded.
    pub append_time_us: u64,
    /// Longest single append (microseconds). Zero unless timings are
    /// recorded.
    pub max_append_time_us: u64,
    /// Time spent writing the central directory (microseconds). Zero unless
    /// timings are recorded.
    pub finalize_time_us: u64,
    /// Size of the archive file after closing, entries from an append-mode
    /// open included. Zero until the writer is closed.
    pub archive_bytes: u64,
}

impl WriteStats {
    /// Returns the average append duration in microseconds.
    pub fn avg_append_time_us(&self) -> f64 {
        if self.timed_appends == 0 {
            0.0
        } else {
            self.append_time_us as f64 / self.timed_appends as f64
        }
    }

    /// Returns the encoded throughput in bytes per second.
    pub fn throughput_bytes_per_sec(&self) -> f64 {
        if self.append_time_us == 0 {
            0.0
        } else {
            (self.encoded_bytes as f64 * 1_000_000.0) / self.append_time_us as f64
        }
    }

    /// Clears all statistics.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Accounts for one finished append.
    pub(crate) fn record_append(&mut self, name: &str, encoded_bytes: u64, duration_us: Option<u64>) {
        self.entries_written += 1;
        self.encoded_bytes += encoded_bytes;

        if let Some(duration_us) = duration_us {
            self.timed_appends += 1;
            self.append_time_us += duration_us;
            self.max_append_time_us = self.max_append_time_us.max(duration_us);
            log::debug!(
                "Appended '{}': {} bytes encoded in {} us",
                name,
                encoded_bytes,
                duration_us
            );
        } else {
            log::debug!("Appended '{}': {} bytes encoded", name, encoded_bytes);
        }
    }

    /// Accounts for the directory write.
    pub(crate) fn record_finalize(&mut self, archive_bytes: u64, duration_us: Option<u64>) {
        self.archive_bytes = archive_bytes;
        if let Some(duration_us) = duration_us {
            self.finalize_time_us = duration_us;
            log::debug!("Finalized archive in {} us", duration_us);
        }
    }
}

/// Measures a duration when enabled, does nothing otherwise.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stopwatch {
    start: Option<Instant>,
}

impl Stopwatch {
    pub(crate) fn start(enabled: bool) -> Self {
        Self {
            start: enabled.then(Instant::now),
        }
    }

    /// Microseconds since [`start`](Self::start), if enabled.
    pub(crate) fn elapsed_us(&self) -> Option<u64> {
        self.start.map(|start| start.elapsed().as_micros() as u64)
    }
}
