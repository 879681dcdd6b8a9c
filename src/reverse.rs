//! In-place byte order conversion.
//!
//! Documents written on a machine of the other endianness are flipped once,
//! before any view is built over them. The pass walks the node tree through
//! offsets and reverses every multi-byte field as its own unit.

use std::{collections::HashSet, marker::PhantomData};

use zerocopy::FromBytes;

use crate::{
    ByteOrder, ContainerHeader, Error, HashMap32, NodeType, Result, cold_path,
    util::{read_at, slice_at, slice_at_mut, value_offset},
};

/// Flips a fixed-size on-disk record in place.
///
/// `bytes` is exactly `size_of::<Self>()` long.
pub trait Reverse {
    fn reverse(bytes: &mut [u8]);
}

/// A cursor over a mutable document buffer used during byte order
/// conversion. `O` is the order the bytes are converted *into*.
pub struct ReverseReader<'a, O: ByteOrder> {
    data: &'a mut [u8],
    visited: HashSet<usize>,
    _marker: PhantomData<O>,
}

impl<'a, O: ByteOrder> ReverseReader<'a, O> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            visited: HashSet::new(),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &*self.data
    }

    #[inline]
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(slice_at(&*self.data, offset, 1)?[0])
    }

    /// Reads a `T` at `offset` without flipping it.
    #[inline]
    pub fn read<T: FromBytes>(&self, offset: usize) -> Result<T> {
        read_at(&*self.data, offset)
    }

    /// Reverses `len` bytes at `offset` as a single unit.
    #[inline]
    pub fn reverse_bytes(&mut self, offset: usize, len: usize) -> Result<()> {
        slice_at_mut(&mut *self.data, offset, len)?.reverse();
        Ok(())
    }

    /// Flips the record at `offset` with its own reverser, then reads it in
    /// order `O`.
    #[inline]
    pub fn read_reversed<T: Reverse + FromBytes>(&mut self, offset: usize) -> Result<T> {
        T::reverse(slice_at_mut(&mut *self.data, offset, size_of::<T>())?);
        read_at(&*self.data, offset)
    }

    /// Marks the payload at `offset` as converted. Returns `false` if it
    /// already was during this pass.
    #[inline]
    pub fn visit(&mut self, offset: usize) -> bool {
        self.visited.insert(offset)
    }
}

/// Flips the node an entry refers to, recursing into containers.
///
/// Immediate values need no work here: they live in the entry and were
/// flipped along with it.
pub fn reverse_node<O: ByteOrder>(
    reader: &mut ReverseReader<'_, O>,
    value: i32,
    tag: u8,
) -> Result<()> {
    let node_type = NodeType::try_from(tag)?;
    let offset = value_offset(value);

    match node_type {
        NodeType::HashMap32 => {
            if !reader.visit(offset) {
                return Ok(());
            }
            let header = reader.read_reversed::<ContainerHeader>(offset)?;
            let actual = header.node_type()?;
            if actual != NodeType::HashMap32 {
                cold_path();
                return Err(Error::NodeTypeMismatch {
                    expected: NodeType::HashMap32,
                    actual,
                });
            }
            HashMap32::reverse(reader, offset, header.count::<O>())
        }
        NodeType::HashMap64 | NodeType::Array | NodeType::Map | NodeType::StringTable => {
            cold_path();
            Err(Error::Unsupported(node_type))
        }
        NodeType::Int64 | NodeType::UInt64 | NodeType::Double => {
            if reader.visit(offset) {
                reader.reverse_bytes(offset, 8)?;
            }
            Ok(())
        }
        NodeType::Binary => {
            if reader.visit(offset) {
                reader.reverse_bytes(offset, 4)?;
            }
            Ok(())
        }
        NodeType::BinaryAligned => {
            if reader.visit(offset) {
                reader.reverse_bytes(offset, 4)?;
                reader.reverse_bytes(offset.saturating_add(4), 4)?;
            }
            Ok(())
        }
        NodeType::String
        | NodeType::Bool
        | NodeType::Int
        | NodeType::Float
        | NodeType::UInt32
        | NodeType::Null => Ok(()),
    }
}
