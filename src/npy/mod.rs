//! The `.npy` array encoding.
//!
//! Every entry an [`IncrementalWriter`] appends is one `.npy` stream. The
//! stream itself is produced and parsed by [`ndarray_npy`]; this module adapts
//! it to the writer: [`NpyEncode`] is the seam the writer encodes through, and
//! [`read_array`] decodes an entry back into an [`ArrayD`].
//!
//! # Example
//!
//! ```rust
//! use ndarray::array;
//! use npzstream::npy::{encode_to_vec, read_array};
//!
//! let a = array![[1.0f64, 2.0], [3.0, 4.0]];
//! let bytes = encode_to_vec(&a).unwrap();
//! let back = read_array::<f64, _>(bytes.as_slice()).unwrap();
//! assert_eq!(back, a.into_dyn());
//! ```
//!
//! [`IncrementalWriter`]: crate::IncrementalWriter

use std::io::{Read, Write};

use ndarray::{ArrayBase, ArrayD, ArrayView1, Data, Dimension};
use ndarray_npy::{ReadNpyError, ReadNpyExt, WriteNpyError, WriteNpyExt};

pub use ndarray_npy::{ReadableElement, WritableElement};

use crate::{Error, Result};

/// File name suffix of array entries inside an npz archive.
pub const NPY_SUFFIX: &str = ".npy";

/// Data that can be serialized as a `.npy` stream.
///
/// Implemented for every `ndarray` array of [`WritableElement`] values and
/// for raw byte blobs (`[u8]`, `Vec<u8>`), which are encoded as a 1-D `|u1`
/// array rather than stored verbatim. Implement it for your own types to
/// plug a different encoder into the writer; failures should be reported as
/// [`Error::Encoding`].
pub trait NpyEncode {
    /// Writes the complete `.npy` stream for `self` to `out`.
    fn encode_npy(&self, out: &mut dyn Write) -> Result<()>;
}

impl<T: NpyEncode + ?Sized> NpyEncode for &T {
    fn encode_npy(&self, out: &mut dyn Write) -> Result<()> {
        (**self).encode_npy(out)
    }
}

impl<A, S, D> NpyEncode for ArrayBase<S, D>
where
    A: WritableElement,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn encode_npy(&self, out: &mut dyn Write) -> Result<()> {
        self.write_npy(out).map_err(write_error)
    }
}

impl NpyEncode for [u8] {
    fn encode_npy(&self, out: &mut dyn Write) -> Result<()> {
        ArrayView1::from(self).write_npy(out).map_err(write_error)
    }
}

impl NpyEncode for Vec<u8> {
    fn encode_npy(&self, out: &mut dyn Write) -> Result<()> {
        self.as_slice().encode_npy(out)
    }
}

/// Encodes `data` into a freshly allocated buffer.
pub fn encode_to_vec<T: NpyEncode + ?Sized>(data: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    data.encode_npy(&mut buf)?;
    Ok(buf)
}

/// Decodes one complete `.npy` stream into a dynamic-dimensional array.
///
/// C and Fortran order and either byte order are accepted. The reader must
/// end with the array data.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the header is malformed, the dtype does not
/// match `A`, or the data is truncated or followed by extra bytes, and
/// [`Error::Io`] if reading fails.
pub fn read_array<A: ReadableElement, R: Read>(reader: R) -> Result<ArrayD<A>> {
    ArrayD::<A>::read_npy(reader).map_err(read_error)
}

fn write_error(err: WriteNpyError) -> Error {
    match err {
        WriteNpyError::Io(e) => Error::Io(e),
        other => Error::Encoding(other.to_string()),
    }
}

fn read_error(err: ReadNpyError) -> Error {
    match err {
        ReadNpyError::Io(e) => Error::Io(e),
        other => Error::Encoding(other.to_string()),
    }
}
