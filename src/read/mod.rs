//! Reading npz archives.
//!
//! [`NpzReader`] lists the entries of an npz file and decodes individual
//! arrays. The zip container is handled by [`zip::ZipArchive`], so archives
//! written by [`IncrementalWriter`], `numpy.savez` or any zip tool are read
//! the same way.
//!
//! # Example
//!
//! ```rust,no_run
//! use npzstream::NpzReader;
//!
//! # fn main() -> npzstream::Result<()> {
//! let mut reader = NpzReader::open_path("results.npz")?;
//! for name in reader.names() {
//!     println!("{}", name);
//! }
//! let frame = reader.array::<f32>("frame_0")?;
//! println!("shape {:?}", frame.shape());
//! # Ok(())
//! # }
//! ```
//!
//! [`IncrementalWriter`]: crate::IncrementalWriter

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use ndarray::ArrayD;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::npy::{NPY_SUFFIX, ReadableElement, read_array};
use crate::{Error, Result};

/// Stored and original size of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySizes {
    /// Bytes the entry data occupies in the archive.
    pub compressed: u64,
    /// Bytes of the entry data once decompressed.
    pub uncompressed: u64,
}

/// Reader for npz archives.
pub struct NpzReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> std::fmt::Debug for NpzReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpzReader")
            .field("entries", &self.archive.len())
            .finish_non_exhaustive()
    }
}

impl NpzReader<BufReader<File>> {
    /// Opens the npz file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not a valid zip
    /// archive.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::open(BufReader::new(file))
    }
}

impl<R: Read + Seek> NpzReader<R> {
    /// Reads the central directory of the archive in `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the archive is malformed and
    /// [`Error::Unsupported`] if it uses features the zip reader lacks.
    pub fn open(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Every entry name, in central directory order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names()
    }

    /// Array names (entry names ending in `.npy`, suffix stripped).
    pub fn names(&self) -> Vec<&str> {
        self.archive
            .file_names()
            .filter_map(|name| name.strip_suffix(NPY_SUFFIX))
            .collect()
    }

    /// Archive comment.
    pub fn comment(&self) -> &[u8] {
        self.archive.comment()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Sizes of the entry named `entry_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if there is no such entry.
    pub fn entry_sizes(&mut self, entry_name: &str) -> Result<EntrySizes> {
        let entry = self
            .archive
            .by_name(entry_name)
            .map_err(not_found(entry_name))?;
        Ok(EntrySizes {
            compressed: entry.compressed_size(),
            uncompressed: entry.size(),
        })
    }

    /// Reads and verifies the data of the entry named `entry_name`.
    ///
    /// # Errors
    ///
    /// - [`Error::EntryNotFound`] if there is no such entry.
    /// - [`Error::Unsupported`] for compression methods or encryption the
    ///   zip reader does not handle.
    /// - [`Error::Io`] with kind `InvalidData` if the data fails its
    ///   checksum, or [`Error::InvalidFormat`] if the entry is malformed.
    ///   Both report `true` from [`Error::is_corruption`].
    pub fn read_entry(&mut self, entry_name: &str) -> Result<Vec<u8>> {
        let mut entry = self
            .archive
            .by_name(entry_name)
            .map_err(not_found(entry_name))?;
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Decodes the array stored under `name`.
    ///
    /// `name` is the array key; the `.npy` suffix is added when looking up
    /// the entry. The entry is decoded as it is decompressed.
    ///
    /// # Errors
    ///
    /// Same as [`read_entry`](Self::read_entry), plus [`Error::Encoding`] if
    /// the entry is not a `.npy` stream of element type `A`.
    pub fn array<A: ReadableElement>(&mut self, name: &str) -> Result<ArrayD<A>> {
        let entry_name = format!("{}{}", name, NPY_SUFFIX);
        let entry = self
            .archive
            .by_name(&entry_name)
            .map_err(not_found(name))?;
        read_array(entry)
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.archive.into_inner()
    }
}

/// Maps a failed lookup to [`Error::EntryNotFound`] reported as `name`.
fn not_found(name: &str) -> impl FnOnce(ZipError) -> Error + '_ {
    move |err| match err {
        ZipError::FileNotFound => Error::EntryNotFound {
            name: name.to_string(),
        },
        other => other.into(),
    }
}
