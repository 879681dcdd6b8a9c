use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::{ByteOrder, NodeType, Result, Reverse, is_big_endian, util::read_at};

/// Size in bytes of the header that precedes every container's payload.
pub const HEADER_SIZE: usize = size_of::<ContainerHeader>();

/// One type byte followed by a 24-bit element count in document byte order.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct ContainerHeader {
    tag: u8,
    count: [u8; 3],
}

impl ContainerHeader {
    #[inline]
    pub fn read(data: &[u8], offset: usize) -> Result<Self> {
        read_at(data, offset)
    }

    /// The raw type byte.
    #[inline]
    pub fn tag(&self) -> u8 {
        self.tag
    }

    #[inline]
    pub fn node_type(&self) -> Result<NodeType> {
        NodeType::try_from(self.tag)
    }

    #[inline]
    pub fn count<O: ByteOrder>(&self) -> usize {
        let [a, b, c] = self.count;
        if is_big_endian::<O>() {
            u32::from_be_bytes([0, a, b, c]) as usize
        } else {
            u32::from_le_bytes([a, b, c, 0]) as usize
        }
    }
}

impl Reverse for ContainerHeader {
    #[inline]
    fn reverse(bytes: &mut [u8]) {
        bytes[1..4].reverse();
    }
}
