//! Fuzz target for `.npy` decoding of entry data.
//!
//! Run with: cargo +nightly fuzz run npy_decode

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(array) = npzstream::npy::read_array::<i32, _>(data) {
        // Whatever decodes must encode again.
        let _ = npzstream::npy::encode_to_vec(&array);
    }
    let _ = npzstream::npy::read_array::<bool, _>(data);
    let _ = npzstream::npy::read_array::<f64, _>(data);
});
