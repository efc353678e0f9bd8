//! Error types for npz archive operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when writing or reading npz archives, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Nothing is
//! retried internally; every failure propagates to the caller of the operation
//! that triggered it.
//!
//! ```rust,no_run
//! use npzstream::{Error, IncrementalWriter, OpenMode, WriterOptions};
//!
//! fn create(path: &str) -> npzstream::Result<()> {
//!     let options = WriterOptions::new().mode(OpenMode::CreateExclusive);
//!     match IncrementalWriter::open_path(path, options) {
//!         Ok(mut writer) => {
//!             writer.append("zeros", &vec![0u8; 16])?;
//!             writer.close()
//!         }
//!         Err(e) if e.is_resource_acquisition() => {
//!             eprintln!("Cannot open {}: {}", path, e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

use zip::result::ZipError;

/// The main error type for npz archive operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Configuration | [`InvalidArgument`][Self::InvalidArgument] | Unknown mode letter, empty key, bad level |
/// | Lifecycle | [`InvalidState`][Self::InvalidState], [`ResourceAcquisition`][Self::ResourceAcquisition] | Opening the target, appending after close |
/// | Encoding | [`Encoding`][Self::Encoding] | Array cannot be serialized or decoded |
/// | Conflict | [`EntryExists`][Self::EntryExists] | Duplicate entry name |
/// | I/O | [`Io`][Self::Io] | Streaming or finalizing failed |
/// | Format | [`InvalidFormat`][Self::InvalidFormat], [`Unsupported`][Self::Unsupported] | Damaged or foreign archive |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while streaming bytes or finalizing the archive.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configuration value was rejected.
    ///
    /// Returned for unknown open-mode letters, empty keys and out-of-range
    /// compression levels.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The archive handle could not be acquired.
    ///
    /// The writer stays unopened when this is returned. Typical causes are an
    /// existing target under [`OpenMode::CreateExclusive`], a missing target
    /// under [`OpenMode::Append`], permissions, or an existing file that is not
    /// a zip archive.
    ///
    /// [`OpenMode::CreateExclusive`]: crate::OpenMode::CreateExclusive
    /// [`OpenMode::Append`]: crate::OpenMode::Append
    #[error("Cannot open archive '{}': {source}", path.display())]
    ResourceAcquisition {
        /// Target path of the archive.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// The operation is not valid in the writer's current lifecycle state.
    #[error("Invalid writer state: {0}")]
    InvalidState(&'static str),

    /// The array encoder could not serialize the data, or `.npy` data could
    /// not be decoded.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An entry with this name already exists and the open mode forbids
    /// duplicates.
    #[error("Entry already exists: {name}")]
    EntryExists {
        /// The conflicting entry name.
        name: String,
    },

    /// The archive is not a valid zip container.
    #[error("Invalid zip format: {0}")]
    InvalidFormat(String),

    /// No entry with this name exists in the archive.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// The entry or array name that was looked up.
        name: String,
    },

    /// The archive uses a zip feature this crate cannot read.
    #[error("Unsupported archive: {0}")]
    Unsupported(String),

    /// A feature is not compiled in.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// Name of the missing feature.
        feature: &'static str,
    },
}

impl Error {
    /// Returns `true` if this error came from acquiring the archive handle.
    pub fn is_resource_acquisition(&self) -> bool {
        matches!(self, Error::ResourceAcquisition { .. })
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Returns `true` if this is a data corruption error.
    ///
    /// Checksum failures surface from the zip reader as I/O errors of kind
    /// [`io::ErrorKind::InvalidData`] and count as corruption.
    pub fn is_corruption(&self) -> bool {
        match self {
            Error::InvalidFormat(_) => true,
            Error::Io(e) => e.kind() == io::ErrorKind::InvalidData,
            _ => false,
        }
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::EntryExists { name } => Some(name.as_str()),
            Error::EntryNotFound { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Wraps an error as a resource acquisition failure for `path`.
    pub(crate) fn acquisition(path: impl Into<PathBuf>, source: impl Into<Error>) -> Self {
        Error::ResourceAcquisition {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }
}

impl From<ZipError> for Error {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(e) => Error::Io(e),
            ZipError::InvalidArchive(msg) => Error::InvalidFormat(msg.to_string()),
            ZipError::UnsupportedArchive(msg) => Error::Unsupported(msg.to_string()),
            other => Error::InvalidFormat(other.to_string()),
        }
    }
}

/// A specialized Result type for npz operations.
pub type Result<T> = std::result::Result<T, Error>;
