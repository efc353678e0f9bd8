//! Open mode semantics: create-exclusive, create-or-truncate and append.

mod common;

use std::fs;

use ndarray::{Array1, array};
use npzstream::{Compression, Error, IncrementalWriter, NpzReader, OpenMode};

#[test]
fn test_exclusive_refuses_existing_file() {
    let (_dir, path) = common::temp_archive("taken.npz");
    fs::write(&path, b"precious").unwrap();

    let mut writer = IncrementalWriter::with_mode(&path, "x", false).unwrap();
    let err = writer.open().unwrap_err();
    assert!(err.is_resource_acquisition(), "{:?}", err);
    assert!(!writer.is_open());
    drop(writer);

    assert_eq!(fs::read(&path).unwrap(), b"precious");
}

#[test]
fn test_truncate_replaces_existing_archive() {
    let (_dir, path) = common::temp_archive("replace.npz");
    common::write_arrays(
        &path,
        Compression::Stored,
        &[("old", array![1.0, 2.0].into_dyn())],
    );

    let options = common::options(OpenMode::CreateOrTruncate, Compression::Stored);
    IncrementalWriter::scope(&path, options, |writer| {
        writer.append("new", &array![3.0f64])
    })
    .unwrap();

    let reader = NpzReader::open_path(&path).unwrap();
    assert_eq!(reader.names(), ["new"]);
}

#[test]
fn test_append_preserves_existing_entries() {
    let (_dir, path) = common::temp_archive("grow.npz");
    common::write_arrays(
        &path,
        Compression::Stored,
        &[
            ("a", array![1.0, 2.0].into_dyn()),
            ("b", array![[3.0], [4.0]].into_dyn()),
        ],
    );

    let options = common::options(OpenMode::Append, Compression::Stored);
    let mut writer = IncrementalWriter::open_path(&path, options).unwrap();
    assert_eq!(writer.entry_count(), 2);
    assert!(writer.contains("b.npy"));
    writer.append("c", &array![5i32, 6, 7]).unwrap();
    writer.close().unwrap();

    let mut reader = NpzReader::open_path(&path).unwrap();
    assert_eq!(reader.names(), ["a", "b", "c"]);
    assert_eq!(reader.array::<f64>("a").unwrap(), array![1.0, 2.0].into_dyn());
    assert_eq!(reader.array::<f64>("b").unwrap(), array![[3.0], [4.0]].into_dyn());
    assert_eq!(reader.array::<i32>("c").unwrap(), array![5, 6, 7].into_dyn());
}

#[test]
fn test_repeated_append_sessions() {
    let (_dir, path) = common::temp_archive("sessions.npz");
    for i in 0..4 {
        let mode = if i == 0 { "x" } else { "a" };
        let mut writer = IncrementalWriter::with_mode(&path, mode, false).unwrap();
        writer.open().unwrap();
        writer.append(&format!("step_{}", i), &array![i as u32]).unwrap();
        writer.close().unwrap();
    }

    let mut reader = NpzReader::open_path(&path).unwrap();
    assert_eq!(reader.len(), 4);
    assert_eq!(reader.array::<u32>("step_3").unwrap(), array![3u32].into_dyn());

    // The zip crate agrees nothing is left over from earlier directories.
    let entries = common::read_with_zip(&path);
    assert_eq!(entries.len(), 4);
}

#[test]
fn test_append_to_missing_file_fails() {
    let (_dir, path) = common::temp_archive("absent.npz");
    let mut writer = IncrementalWriter::with_mode(&path, "a", false).unwrap();
    let err = writer.open().unwrap_err();
    assert!(err.is_resource_acquisition());
    assert!(!path.exists());
}

#[test]
fn test_append_to_empty_file_starts_archive() {
    let (_dir, path) = common::temp_archive("empty.npz");
    fs::File::create(&path).unwrap();

    let options = common::options(OpenMode::Append, Compression::Stored);
    IncrementalWriter::scope(&path, options, |writer| writer.append("x", &array![1u8])).unwrap();

    let reader = NpzReader::open_path(&path).unwrap();
    assert_eq!(reader.names(), ["x"]);
}

#[test]
fn test_append_to_non_zip_fails_without_damage() {
    let (_dir, path) = common::temp_archive("notes.npz");
    let content = vec![b'z'; 300];
    fs::write(&path, &content).unwrap();

    let options = common::options(OpenMode::Append, Compression::Stored);
    let err = IncrementalWriter::open_path(&path, options).unwrap_err();
    match err {
        Error::ResourceAcquisition { source, .. } => {
            assert!(matches!(*source, Error::InvalidFormat(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(fs::read(&path).unwrap(), content);
}

#[test]
fn test_duplicate_keys_rejected_in_every_mode() {
    let (_dir, path) = common::temp_archive("dupes.npz");

    let options = common::options(OpenMode::CreateExclusive, Compression::Stored);
    let mut writer = IncrementalWriter::open_path(&path, options).unwrap();
    writer.append("k", &array![1u8]).unwrap();
    let err = writer.append("k", &array![2u8]).unwrap_err();
    assert!(matches!(err, Error::EntryExists { ref name } if name == "k.npy"));
    writer.close().unwrap();

    let options = common::options(OpenMode::Append, Compression::Stored);
    let mut writer = IncrementalWriter::open_path(&path, options).unwrap();
    assert!(matches!(
        writer.append("k", &array![3u8]),
        Err(Error::EntryExists { .. })
    ));
    writer.close().unwrap();

    let options = common::options(OpenMode::CreateOrTruncate, Compression::Stored);
    let mut writer = IncrementalWriter::open_path(&path, options).unwrap();
    writer.append("k", &array![4u8]).unwrap();
    assert!(matches!(
        writer.append("k", &array![5u8]),
        Err(Error::EntryExists { .. })
    ));
    writer.close().unwrap();

    let mut reader = NpzReader::open_path(&path).unwrap();
    assert_eq!(reader.len(), 1);
    assert_eq!(reader.array::<u8>("k").unwrap(), array![4u8].into_dyn());
}

#[cfg(feature = "deflate")]
#[test]
fn test_append_with_different_compression() {
    let (_dir, path) = common::temp_archive("mixed_methods.npz");
    common::write_arrays(
        &path,
        Compression::Stored,
        &[("plain", Array1::<f64>::zeros(1000).into_dyn())],
    );

    let options = common::options(OpenMode::Append, Compression::Deflated);
    IncrementalWriter::scope(&path, options, |writer| {
        writer.append("packed", &Array1::<f64>::zeros(1000))
    })
    .unwrap();

    let entries = common::read_with_zip(&path);
    assert_eq!(entries[0].1, zip::CompressionMethod::Stored);
    assert_eq!(entries[1].1, zip::CompressionMethod::Deflated);
    assert_eq!(entries[0].2, entries[1].2);
}
