//! Incremental npz writing.
//!
//! An [`IncrementalWriter`] appends one array at a time to an npz archive on
//! disk. Each array is encoded, streamed into its own zip entry and released
//! before the next one is accepted, so memory use is bounded by the largest
//! single array rather than by the archive.
//!
//! # Example
//!
//! ```rust,no_run
//! use ndarray::Array2;
//! use npzstream::{Compression, IncrementalWriter, OpenMode, WriterOptions};
//!
//! # fn main() -> npzstream::Result<()> {
//! let options = WriterOptions::new()
//!     .mode(OpenMode::CreateOrTruncate)
//!     .compression(Compression::Deflated);
//!
//! IncrementalWriter::scope("results.npz", options, |writer| {
//!     for step in 0..10 {
//!         let frame = Array2::<f32>::from_elem((256, 256), step as f32);
//!         writer.append(&format!("frame_{}", step), &frame)?;
//!     }
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

mod archive;
mod options;

pub use archive::ArchiveWriter;
pub use options::{Compression, OpenMode, WriterOptions};

use std::fs::{File, OpenOptions};
use std::io::Seek;
use std::path::{Path, PathBuf};

use crate::npy::{NPY_SUFFIX, NpyEncode, encode_to_vec};
use crate::stats::{Stopwatch, WriteStats};
use crate::{Error, Result};

/// Lifecycle of an [`IncrementalWriter`].
///
/// Transitions are linear: `Unopened -> Open -> Closed`. A closed writer
/// cannot be reopened.
enum WriterState {
    /// Configured, no file handle yet.
    Unopened,
    /// Holding the archive handle.
    Open(ArchiveWriter<File>),
    /// Released; further appends are rejected.
    Closed,
}

impl WriterState {
    fn name(&self) -> &'static str {
        match self {
            Self::Unopened => "unopened",
            Self::Open(_) => "open",
            Self::Closed => "closed",
        }
    }
}

/// Returns the open archive, or the lifecycle error for the current state.
fn open_archive(state: &mut WriterState) -> Result<&mut ArchiveWriter<File>> {
    match state {
        WriterState::Open(archive) => Ok(archive),
        WriterState::Unopened => Err(Error::InvalidState("archive has not been opened")),
        WriterState::Closed => Err(Error::InvalidState("archive has been closed")),
    }
}

/// Writes arrays into an npz archive one entry at a time.
///
/// Construct with [`new`](Self::new) (no I/O), then [`open`](Self::open),
/// [`append`](Self::append) any number of arrays and [`close`](Self::close).
/// [`scope`](Self::scope) runs the whole sequence around a closure, and
/// dropping an open writer closes it.
///
/// Every entry is named `<key>.npy`, so `numpy.load` exposes it under `key`.
/// Local headers always carry zip64 fields, so no single array is limited to
/// 4 GiB.
///
/// Between appends the writer holds the zip directory records and one name
/// per entry. [`WriteStats`] is a fixed set of counters and does not grow
/// with the number of appends.
pub struct IncrementalWriter {
    path: PathBuf,
    options: WriterOptions,
    state: WriterState,
    stats: WriteStats,
}

impl std::fmt::Debug for IncrementalWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalWriter")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("state", &self.state.name())
            .finish_non_exhaustive()
    }
}

impl IncrementalWriter {
    /// Creates a writer for `path`. Nothing is touched on disk until
    /// [`open`](Self::open).
    pub fn new(path: impl Into<PathBuf>, options: WriterOptions) -> Self {
        Self {
            path: path.into(),
            options,
            state: WriterState::Unopened,
            stats: WriteStats::default(),
        }
    }

    /// Creates a writer from a mode letter (`"x"`, `"w"` or `"a"`) and a
    /// compress flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for any other mode string.
    pub fn with_mode(path: impl Into<PathBuf>, mode: &str, compress_file: bool) -> Result<Self> {
        let options = WriterOptions::new()
            .mode(mode.parse()?)
            .compression(Compression::from_flag(compress_file));
        Ok(Self::new(path, options))
    }

    /// Creates and opens a writer in one step.
    ///
    /// The archive is finalized when the writer is closed or dropped.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_path(path: impl Into<PathBuf>, options: WriterOptions) -> Result<Self> {
        let mut writer = Self::new(path, options);
        writer.open()?;
        Ok(writer)
    }

    /// Opens a writer, runs `f` with it and closes it.
    ///
    /// The archive is closed exactly once, whether `f` succeeds, fails or
    /// already closed it. An error from `f` takes precedence over an error
    /// from closing.
    ///
    /// # Errors
    ///
    /// Returns the error from opening, from `f`, or from closing.
    pub fn scope<T, F>(path: impl Into<PathBuf>, options: WriterOptions, f: F) -> Result<T>
    where
        F: FnOnce(&mut IncrementalWriter) -> Result<T>,
    {
        let mut writer = Self::open_path(path, options)?;
        let result = f(&mut writer);
        let closed = writer.close();
        settle(&writer.path, result, closed)
    }

    /// Target path of the archive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options this writer was created with.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Returns `true` while the archive handle is held.
    pub fn is_open(&self) -> bool {
        matches!(self.state, WriterState::Open(_))
    }

    /// Returns `true` once the writer has been closed.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, WriterState::Closed)
    }

    /// Statistics for the appends made through this writer.
    pub fn stats(&self) -> &WriteStats {
        &self.stats
    }

    /// Number of entries in the open archive, including those that existed
    /// before an append-mode open. Zero unless open.
    pub fn entry_count(&self) -> usize {
        match &self.state {
            WriterState::Open(archive) => archive.len(),
            _ => 0,
        }
    }

    /// Returns `true` if the open archive has an entry named `entry_name`.
    pub fn contains(&self, entry_name: &str) -> bool {
        match &self.state {
            WriterState::Open(archive) => archive.contains(entry_name),
            _ => false,
        }
    }

    /// Acquires the archive handle according to the configured mode.
    ///
    /// - [`OpenMode::CreateExclusive`] fails if the target exists.
    /// - [`OpenMode::CreateOrTruncate`] discards any existing file.
    /// - [`OpenMode::Append`] reads the existing directory and continues
    ///   after the last entry; an empty file is treated as an empty archive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceAcquisition`] if the file cannot be opened or
    /// is not a readable zip archive, [`Error::UnsupportedFeature`] if deflate
    /// was requested without the `deflate` feature, and
    /// [`Error::InvalidState`] if the writer is already open or closed. The
    /// writer stays unopened on failure.
    pub fn open(&mut self) -> Result<()> {
        match self.state {
            WriterState::Unopened => {}
            WriterState::Open(_) => return Err(Error::InvalidState("archive is already open")),
            WriterState::Closed => return Err(Error::InvalidState("archive has been closed")),
        }
        if !self.options.compression.is_available() {
            return Err(Error::UnsupportedFeature { feature: "deflate" });
        }

        let archive = self
            .acquire()
            .map_err(|e| Error::acquisition(&self.path, e))?;

        log::debug!(
            "Opened '{}' in mode '{}' with {} existing entries",
            self.path.display(),
            self.options.mode,
            archive.len()
        );
        self.state = WriterState::Open(archive);
        Ok(())
    }

    fn acquire(&self) -> Result<ArchiveWriter<File>> {
        let WriterOptions {
            mode,
            compression,
            level,
            ..
        } = self.options;
        match mode {
            OpenMode::CreateExclusive => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create_new(true)
                    .open(&self.path)?;
                Ok(ArchiveWriter::create(file, compression, level))
            }
            OpenMode::CreateOrTruncate => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&self.path)?;
                Ok(ArchiveWriter::create(file, compression, level))
            }
            OpenMode::Append => {
                let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
                if file.metadata()?.len() == 0 {
                    return Ok(ArchiveWriter::create(file, compression, level));
                }
                ArchiveWriter::resume(file, compression, level)
            }
        }
    }

    /// Encodes `data` as `.npy` and writes it as entry `<key>.npy`.
    ///
    /// The encoded array is streamed into the archive and released before
    /// this returns; only its directory record is retained.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if the writer is not open.
    /// - [`Error::InvalidArgument`] if `key` is empty.
    /// - [`Error::EntryExists`] if `<key>.npy` already exists. This is
    ///   checked before `data` is encoded; nothing is written.
    /// - [`Error::Encoding`] if `data` cannot be encoded; nothing is written.
    /// - [`Error::Io`] if streaming fails. The partially written entry is not
    ///   rolled back.
    pub fn append<T: NpyEncode + ?Sized>(&mut self, key: &str, data: &T) -> Result<()> {
        let archive = open_archive(&mut self.state)?;
        if key.is_empty() {
            return Err(Error::InvalidArgument("array key must not be empty".into()));
        }

        let name = format!("{}{}", key, NPY_SUFFIX);
        archive.check_name(&name)?;

        let timer = Stopwatch::start(self.options.record_timings);
        let encoded = encode_to_vec(data)?;
        archive.write_entry(&name, &encoded)?;

        self.stats
            .record_append(&name, encoded.len() as u64, timer.elapsed_us());
        Ok(())
    }

    /// Writes `bytes` verbatim as an entry named exactly `entry_name`.
    ///
    /// No `.npy` encoding is applied and no suffix is added. Duplicate names
    /// are rejected as in [`append`](Self::append).
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append), minus encoding errors.
    pub fn append_raw(&mut self, entry_name: &str, bytes: &[u8]) -> Result<()> {
        let archive = open_archive(&mut self.state)?;
        if entry_name.is_empty() {
            return Err(Error::InvalidArgument("entry name must not be empty".into()));
        }

        let timer = Stopwatch::start(self.options.record_timings);
        archive.write_entry(entry_name, bytes)?;

        self.stats
            .record_append(entry_name, bytes.len() as u64, timer.elapsed_us());
        Ok(())
    }

    /// Finalizes the archive and releases the file.
    ///
    /// Writes the central directory and end records, flushes, and truncates
    /// the file to the end of the archive. Closing an unopened writer just
    /// marks it closed; closing a closed writer does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if finalizing fails. The writer is closed
    /// regardless, and finalization is not retried.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, WriterState::Closed) {
            WriterState::Unopened | WriterState::Closed => Ok(()),
            WriterState::Open(archive) => self.finalize(archive),
        }
    }

    fn finalize(&mut self, archive: ArchiveWriter<File>) -> Result<()> {
        let timer = Stopwatch::start(self.options.record_timings);

        let mut file = archive.finish()?;
        // Appending over a longer old directory can leave stale bytes behind.
        let end = file.stream_position()?;
        file.set_len(end)?;

        self.stats.record_finalize(end, timer.elapsed_us());
        log::debug!(
            "Closed '{}' after {} appended entries, {} bytes",
            self.path.display(),
            self.stats.entries_written,
            end
        );
        Ok(())
    }
}

/// Combines the closure result of [`IncrementalWriter::scope`] with the
/// result of closing. The closure error wins; a close error it shadows is
/// logged.
fn settle<T>(path: &Path, result: Result<T>, closed: Result<()>) -> Result<T> {
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            log::warn!("Failed to close '{}': {}", path.display(), close_err);
            Err(e)
        }
    }
}

impl Drop for IncrementalWriter {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(e) = self.close() {
                log::warn!("Failed to close '{}': {}", self.path.display(), e);
            }
        }
    }
}
