//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, IxDyn};
use npzstream::{Compression, IncrementalWriter, OpenMode, WriterOptions};
use rand::Rng;

/// Creates a temporary directory and a path for an archive inside it.
///
/// The directory is removed when the returned guard is dropped.
pub fn temp_archive(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    (dir, path)
}

/// Writer options for `mode` and `compression` with default level.
pub fn options(mode: OpenMode, compression: Compression) -> WriterOptions {
    WriterOptions::new().mode(mode).compression(compression)
}

/// Writes `arrays` into a new archive at `path` in create-or-truncate mode.
pub fn write_arrays(path: &Path, compression: Compression, arrays: &[(&str, ArrayD<f64>)]) {
    let options = options(OpenMode::CreateOrTruncate, compression);
    IncrementalWriter::scope(path, options, |writer| {
        for (key, array) in arrays {
            writer.append(key, array)?;
        }
        Ok(())
    })
    .expect("Failed to write archive");
}

/// Builds an array of the given shape filled with random values.
pub fn random_array<R: Rng>(rng: &mut R, shape: &[usize]) -> ArrayD<f64> {
    let len = shape.iter().product();
    let values: Vec<f64> = (0..len).map(|_| rng.gen_range(-1e6..1e6)).collect();
    ArrayD::from_shape_vec(IxDyn(shape), values).expect("shape matches length")
}

/// Reads every entry with the `zip` crate: (name, method, data).
pub fn read_with_zip(path: &Path) -> Vec<(String, zip::CompressionMethod, Vec<u8>)> {
    let file = File::open(path).expect("Failed to open archive");
    let mut archive = zip::ZipArchive::new(file).expect("zip crate rejected the archive");
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("Failed to read entry");
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("Failed to read entry data");
        entries.push((entry.name().to_string(), entry.compression(), data));
    }
    entries
}

/// Current size of the file at `path`.
pub fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).expect("Failed to stat file").len()
}
