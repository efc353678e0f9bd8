//! Zip container for npz entries.
//!
//! [`ArchiveWriter`] drives a [`zip::ZipWriter`] with the entry policy npz
//! archives need: every entry is opened with zip64 addressing so no single
//! array is limited to 4 GiB, entry names are unique, and one compression
//! setting applies to every entry. Only the per-entry directory records are
//! kept in memory; entry data is streamed straight to the sink.

use std::collections::HashSet;
use std::io::{Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::write::options::Compression;
use crate::{Error, Result};

/// A zip writer over a seekable sink.
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    /// Names already present, for duplicate detection.
    names: HashSet<String>,
    compression: Compression,
    level: u32,
}

impl<W: Write + Seek> std::fmt::Debug for ArchiveWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveWriter")
            .field("entries", &self.names.len())
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Starts a new, empty archive in `sink`.
    pub fn create(sink: W, compression: Compression, level: u32) -> Self {
        Self {
            zip: ZipWriter::new(sink),
            names: HashSet::new(),
            compression,
            level,
        }
    }

    /// Number of entries, including those present before resuming.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns `true` if an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Checks that an entry named `name` can be added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryExists`] if the name is taken and
    /// [`Error::InvalidArgument`] if it is longer than 65535 bytes.
    pub fn check_name(&self, name: &str) -> Result<()> {
        if self.names.contains(name) {
            return Err(Error::EntryExists {
                name: name.to_string(),
            });
        }
        if name.len() > usize::from(u16::MAX) {
            return Err(Error::InvalidArgument(format!(
                "entry name of {} bytes is too long",
                name.len()
            )));
        }
        Ok(())
    }

    /// Writes one complete entry from a buffer.
    ///
    /// The entry is opened with zip64 sizes in its local header and the
    /// buffer is streamed into it. The zip writer completes the entry, CRC
    /// and sizes included, when the next entry starts or the archive is
    /// finished.
    ///
    /// # Errors
    ///
    /// Same as [`check_name`](Self::check_name), plus
    /// [`Error::UnsupportedFeature`] for deflate without the `deflate`
    /// feature and [`Error::Io`] if writing fails. Nothing is written when a
    /// name or feature check fails.
    pub fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.check_name(name)?;
        let options = self.entry_options()?;

        self.zip.start_file(name, options)?;
        self.names.insert(name.to_string());
        self.zip.write_all(data)?;
        Ok(())
    }

    fn entry_options(&self) -> Result<SimpleFileOptions> {
        let options = SimpleFileOptions::default()
            .compression_method(self.compression.method()?)
            .large_file(true);
        Ok(match self.compression {
            Compression::Stored => options,
            Compression::Deflated => options.compression_level(Some(self.level as _)),
        })
    }

    /// Writes the central directory and end records and returns the sink,
    /// positioned at the end of the archive.
    pub fn finish(self) -> Result<W> {
        let entries = self.names.len();
        let sink = self.zip.finish()?;
        log::debug!("Wrote central directory for {} entries", entries);
        Ok(sink)
    }
}

impl<W: Read + Write + Seek> ArchiveWriter<W> {
    /// Continues the existing archive in `sink`.
    ///
    /// New entries overwrite the old central directory, which is rewritten
    /// together with the new records by [`finish`](Self::finish). The archive
    /// comment is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if `sink` does not hold a readable
    /// zip archive. Nothing is written in that case.
    pub fn resume(mut sink: W, compression: Compression, level: u32) -> Result<Self> {
        let names = ZipArchive::new(&mut sink)?
            .file_names()
            .map(str::to_string)
            .collect();
        Ok(Self {
            zip: ZipWriter::new_append(sink)?,
            names,
            compression,
            level,
        })
    }
}
