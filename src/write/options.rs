//! Writer configuration: open mode, entry compression and timing.

use std::fmt;
use std::str::FromStr;

use zip::CompressionMethod;

use crate::{Error, Result};

/// How [`IncrementalWriter::open`] acquires the target file.
///
/// [`IncrementalWriter::open`]: crate::IncrementalWriter::open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Create a new archive; fail if the target exists (`"x"`).
    #[default]
    CreateExclusive,
    /// Create a new archive, discarding any existing file (`"w"`).
    CreateOrTruncate,
    /// Add entries to an existing archive (`"a"`).
    Append,
}

impl OpenMode {
    /// Returns the single-letter form of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateExclusive => "x",
            Self::CreateOrTruncate => "w",
            Self::Append => "a",
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(Self::CreateExclusive),
            "w" => Ok(Self::CreateOrTruncate),
            "a" => Ok(Self::Append),
            other => Err(Error::InvalidArgument(format!(
                "unknown open mode '{}', expected one of 'x', 'w', 'a'",
                other
            ))),
        }
    }
}

impl TryFrom<&str> for OpenMode {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

/// Compression applied to each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression (zip method 0).
    #[default]
    Stored,
    /// Deflate (zip method 8). Requires the `deflate` feature.
    Deflated,
}

impl Compression {
    /// Maps a "compress the file" flag to a compression choice.
    pub fn from_flag(compress: bool) -> Self {
        if compress { Self::Deflated } else { Self::Stored }
    }

    /// Returns the zip compression method.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFeature`] for [`Deflated`](Self::Deflated)
    /// when the `deflate` feature is disabled.
    pub fn method(&self) -> Result<CompressionMethod> {
        match self {
            Self::Stored => Ok(CompressionMethod::Stored),
            #[cfg(feature = "deflate")]
            Self::Deflated => Ok(CompressionMethod::Deflated),
            #[cfg(not(feature = "deflate"))]
            Self::Deflated => Err(Error::UnsupportedFeature { feature: "deflate" }),
        }
    }

    /// Returns `true` if this build can write entries with this compression.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Stored => true,
            Self::Deflated => cfg!(feature = "deflate"),
        }
    }
}

/// Options for an [`IncrementalWriter`].
///
/// # Example
///
/// ```rust
/// use npzstream::{Compression, OpenMode, WriterOptions};
///
/// let options = WriterOptions::new()
///     .mode(OpenMode::CreateOrTruncate)
///     .compression(Compression::Deflated)
///     .level(9)
///     .unwrap()
///     .record_timings(true);
/// assert_eq!(options.level, 9);
/// ```
///
/// [`IncrementalWriter`]: crate::IncrementalWriter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// How the target file is acquired.
    pub mode: OpenMode,
    /// Compression applied to each entry.
    pub compression: Compression,
    /// Deflate level (0-9). Ignored for stored entries.
    pub level: u32,
    /// Whether append and finalize durations are measured.
    pub record_timings: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::default(),
            compression: Compression::default(),
            level: 6,
            record_timings: false,
        }
    }
}

impl WriterOptions {
    /// Creates options with defaults: create-exclusive, stored, level 6, no
    /// timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the open mode.
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the entry compression.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the deflate level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `level` is above 9.
    pub fn level(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidArgument(format!(
                "compression level {} is out of range 0-9",
                level
            )));
        }
        self.level = level;
        Ok(self)
    }

    /// Enables or disables timing of appends and finalization.
    pub fn record_timings(mut self, enabled: bool) -> Self {
        self.record_timings = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("x".parse::<OpenMode>().unwrap(), OpenMode::CreateExclusive);
        assert_eq!("w".parse::<OpenMode>().unwrap(), OpenMode::CreateOrTruncate);
        assert_eq!(OpenMode::try_from("a").unwrap(), OpenMode::Append);

        for bad in ["", "r", "wb", "X", "a+"] {
            let err = bad.parse::<OpenMode>().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [OpenMode::CreateExclusive, OpenMode::CreateOrTruncate, OpenMode::Append] {
            assert_eq!(mode.to_string().parse::<OpenMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_compression_from_flag() {
        assert_eq!(Compression::from_flag(false), Compression::Stored);
        assert_eq!(Compression::from_flag(true), Compression::Deflated);
        assert_eq!(Compression::Stored.method().unwrap(), CompressionMethod::Stored);
        assert!(Compression::Stored.is_available());
        assert_eq!(
            Compression::Deflated.method().is_ok(),
            Compression::Deflated.is_available()
        );
    }

    #[test]
    fn test_level_validation() {
        assert_eq!(WriterOptions::new().level(0).unwrap().level, 0);
        assert_eq!(WriterOptions::new().level(9).unwrap().level, 9);
        assert!(matches!(
            WriterOptions::new().level(10),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let options = WriterOptions::default();
        assert_eq!(options.mode, OpenMode::CreateExclusive);
        assert_eq!(options.compression, Compression::Stored);
        assert_eq!(options.level, 6);
        assert!(!options.record_timings);
    }
}
