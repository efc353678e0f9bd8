//! # npzstream
//!
//! Incremental writing of NumPy `.npz` archives.
//!
//! An npz file is a zip archive in which every entry is one array in `.npy`
//! format. `numpy.savez` needs all arrays in memory at once; this crate
//! appends them one at a time instead, streaming each encoded array straight
//! into the archive so that memory use is bounded by the largest single
//! array.
//!
//! ## Quick Start
//!
//! ### Writing arrays as they are produced
//!
//! ```rust,no_run
//! use ndarray::Array1;
//! use npzstream::{IncrementalWriter, OpenMode, Result, WriterOptions};
//!
//! fn main() -> Result<()> {
//!     let options = WriterOptions::new().mode(OpenMode::CreateOrTruncate);
//!     let mut writer = IncrementalWriter::open_path("samples.npz", options)?;
//!
//!     for batch in 0..100 {
//!         let samples = Array1::<f64>::linspace(0.0, batch as f64, 1_000);
//!         writer.append(&format!("batch_{}", batch), &samples)?;
//!     }
//!
//!     writer.close()
//! }
//! ```
//!
//! ### Adding to an existing archive
//!
//! ```rust,no_run
//! use ndarray::array;
//! use npzstream::{IncrementalWriter, Result};
//!
//! fn main() -> Result<()> {
//!     // Mode letters follow Python's `open`: "x", "w" or "a".
//!     let mut writer = IncrementalWriter::with_mode("samples.npz", "a", true)?;
//!     writer.open()?;
//!     writer.append("labels", &array![0u8, 1, 1, 0])?;
//!     writer.close()
//! }
//! ```
//!
//! ### Reading back
//!
//! ```rust,no_run
//! use npzstream::{NpzReader, Result};
//!
//! fn main() -> Result<()> {
//!     let mut reader = NpzReader::open_path("samples.npz")?;
//!     let labels = reader.array::<u8>("labels")?;
//!     println!("{} labels", labels.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `deflate` | Yes | Deflate-compressed entries (the `zip` crate's deflate support) |
//!
//! Without `deflate`, only stored entries can be written or read; requesting
//! [`Compression::Deflated`] fails when the writer is opened.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: opening,
//! appending and finalizing at debug level, close failures that would
//! otherwise be lost (during drop, or behind an error returned from
//! [`IncrementalWriter::scope`]) at warn level. No logger is installed.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod npy;
pub mod read;
pub mod stats;
pub mod write;

pub use error::{Error, Result};
pub use npy::{NpyEncode, ReadableElement, WritableElement};
pub use read::{EntrySizes, NpzReader};
pub use stats::WriteStats;
pub use write::{Compression, IncrementalWriter, OpenMode, WriterOptions};
