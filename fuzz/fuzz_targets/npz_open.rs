//! Fuzz target for NpzReader::open with arbitrary byte input.
//!
//! Exercises directory parsing, entry extraction and `.npy` decoding on
//! potentially malformed archives. Looks for panics, hangs
//! and unbounded allocations.
//!
//! Run with: cargo +nightly fuzz run npz_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let Ok(mut reader) = npzstream::NpzReader::open(Cursor::new(data)) else {
        return;
    };

    let names: Vec<String> = reader.entry_names().map(String::from).collect();
    for name in &names {
        let _ = reader.read_entry(name);
    }

    let keys: Vec<String> = reader.names().into_iter().map(String::from).collect();
    for key in &keys {
        let _ = reader.array::<f64>(key);
        let _ = reader.array::<u8>(key);
    }
});
