//! Minimal NPY v1.0 codec for float32 matrices.
//!
//! The on-disk embedding matrix is a plain NumPy array file: magic,
//! version, a space-padded ASCII header dict, then little-endian `f32`
//! data in C order. Only the shapes this crate writes are accepted back:
//! 2-D `<f4` arrays, C order.

use bytes::{Buf, BufMut, BytesMut};
use riskwise_core::error::{Error, Result};
use riskwise_core::vector::Matrix;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Writers align the end of the header to this boundary, matching what
/// recent NumPy versions emit.
const HEADER_ALIGN: usize = 64;

/// Serialize a matrix into NPY v1.0 bytes.
#[must_use]
pub fn encode_matrix(matrix: &Matrix) -> Vec<u8> {
    let header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': ({}, {}), }}",
        matrix.rows(),
        matrix.dim()
    );
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;

    let mut buf = BytesMut::with_capacity(unpadded + padding + matrix.as_slice().len() * 4);
    buf.put_slice(MAGIC);
    buf.put_u8(1);
    buf.put_u8(0);
    buf.put_u16_le((header.len() + padding + 1) as u16);
    buf.put_slice(header.as_bytes());
    buf.put_bytes(b' ', padding);
    buf.put_u8(b'\n');
    for &x in matrix.as_slice() {
        buf.put_f32_le(x);
    }
    buf.to_vec()
}

/// Parse NPY bytes back into a matrix.
///
/// Alignment of the header is not enforced on read, so files written by
/// older NumPy versions (16-byte alignment) load fine.
pub fn decode_matrix(bytes: &[u8]) -> Result<Matrix> {
    let mut buf = bytes;
    if buf.remaining() < MAGIC.len() + 4 {
        return Err(Error::Corrupt("npy header truncated".to_string()));
    }

    let mut magic = [0u8; 6];
    buf.copy_to_slice(&mut magic);
    if &magic != MAGIC {
        return Err(Error::Corrupt("not an npy file".to_string()));
    }

    let major = buf.get_u8();
    let minor = buf.get_u8();
    if major != 1 {
        return Err(Error::Corrupt(format!(
            "unsupported npy version {major}.{minor}"
        )));
    }

    let header_len = buf.get_u16_le() as usize;
    if buf.remaining() < header_len {
        return Err(Error::Corrupt("npy header truncated".to_string()));
    }
    let header = std::str::from_utf8(&buf[..header_len])
        .map_err(|_| Error::Corrupt("npy header is not ASCII".to_string()))?
        .to_string();
    buf.advance(header_len);

    if !header.contains("'descr': '<f4'") {
        return Err(Error::Corrupt(
            "npy dtype must be little-endian float32".to_string(),
        ));
    }
    if !header.contains("'fortran_order': False") {
        return Err(Error::Corrupt(
            "fortran-ordered npy is not supported".to_string(),
        ));
    }

    let (rows, dim) = parse_shape(&header)?;
    if dim == 0 {
        return Err(Error::Corrupt("zero embedding dimension".to_string()));
    }

    let expected = rows
        .checked_mul(dim)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| Error::Corrupt("npy shape overflows".to_string()))?;
    if buf.remaining() != expected {
        return Err(Error::Corrupt(format!(
            "npy payload is {} bytes, shape ({rows}, {dim}) needs {expected}",
            buf.remaining()
        )));
    }

    let mut data = Vec::with_capacity(rows * dim);
    for _ in 0..rows * dim {
        data.push(buf.get_f32_le());
    }
    Ok(Matrix::from_flat(dim, data))
}

fn parse_shape(header: &str) -> Result<(usize, usize)> {
    const KEY: &str = "'shape': (";
    let start = header
        .find(KEY)
        .ok_or_else(|| Error::Corrupt("npy header lacks a shape".to_string()))?
        + KEY.len();
    let rest = &header[start..];
    let end = rest
        .find(')')
        .ok_or_else(|| Error::Corrupt("npy shape is unterminated".to_string()))?;

    let dims: Vec<&str> = rest[..end]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if dims.len() != 2 {
        return Err(Error::Corrupt(format!(
            "expected a 2-D npy array, shape has {} axes",
            dims.len()
        )));
    }

    let rows = dims[0]
        .parse()
        .map_err(|_| Error::Corrupt("npy shape is not numeric".to_string()))?;
    let dim = dims[1]
        .parse()
        .map_err(|_| Error::Corrupt("npy shape is not numeric".to_string()))?;
    Ok((rows, dim))
}
