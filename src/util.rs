use zerocopy::{FromBytes, byteorder};

use crate::{Error, Result};

#[inline(always)]
#[cold]
pub(crate) fn cold_path() {}

pub trait ByteOrder: zerocopy::ByteOrder + Send + Sync + 'static {}

impl<T: zerocopy::ByteOrder + Send + Sync + 'static> ByteOrder for T {}

/// Returns `true` when `O` stores the most significant byte first.
#[inline]
pub fn is_big_endian<O: ByteOrder>() -> bool {
    byteorder::U16::<O>::from_bytes([0, 1]).get() == 1
}

/// Bounds-checked `data[offset..offset + len]`.
#[inline]
pub(crate) fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    match offset.checked_add(len) {
        Some(end) if end <= data.len() => Ok(&data[offset..end]),
        _ => {
            cold_path();
            Err(Error::OutOfBounds {
                offset,
                len,
                available: data.len(),
            })
        }
    }
}

#[inline]
pub(crate) fn slice_at_mut(data: &mut [u8], offset: usize, len: usize) -> Result<&mut [u8]> {
    let available = data.len();
    match offset.checked_add(len) {
        Some(end) if end <= available => Ok(&mut data[offset..end]),
        _ => {
            cold_path();
            Err(Error::OutOfBounds {
                offset,
                len,
                available,
            })
        }
    }
}

#[inline]
pub(crate) fn array_at<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(slice_at(data, offset, N)?);
    Ok(bytes)
}

/// Reads a `T` stored unaligned at `offset`.
#[inline]
pub(crate) fn read_at<T: FromBytes>(data: &[u8], offset: usize) -> Result<T> {
    T::read_from_bytes(slice_at(data, offset, size_of::<T>())?).map_err(|_| {
        cold_path();
        Error::OutOfBounds {
            offset,
            len: size_of::<T>(),
            available: data.len(),
        }
    })
}

/// Offsets inside a document are stored as signed 32-bit values but always
/// address forward from the start of the buffer.
#[inline]
pub(crate) const fn value_offset(value: i32) -> usize {
    value as u32 as usize
}
