use crate::{Error, Result};

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum NodeType {
    HashMap32 = 0x20,
    HashMap64 = 0x21,
    String = 0xA0,
    Binary = 0xA1,
    BinaryAligned = 0xA2,
    Array = 0xC0,
    Map = 0xC1,
    StringTable = 0xC2,
    Bool = 0xD0,
    Int = 0xD1,
    Float = 0xD2,
    UInt32 = 0xD3,
    Int64 = 0xD4,
    UInt64 = 0xD5,
    Double = 0xD6,
    Null = 0xFF,
}

impl NodeType {
    /// Returns `true` if nodes of this type hold other nodes.
    ///
    /// # Example
    ///
    /// ```
    /// use na_byml::NodeType;
    ///
    /// assert!(NodeType::HashMap32.is_container_type());
    /// assert!(NodeType::Array.is_container_type());
    /// assert!(!NodeType::Int.is_container_type());
    /// assert!(!NodeType::StringTable.is_container_type());
    /// ```
    pub const fn is_container_type(self) -> bool {
        matches!(
            self,
            Self::HashMap32 | Self::HashMap64 | Self::Array | Self::Map
        )
    }

    /// Returns `true` if the 32-bit value of a node of this type is an offset
    /// to out-of-line data rather than the value itself.
    pub const fn is_value_offset(self) -> bool {
        matches!(
            self,
            Self::Binary | Self::BinaryAligned | Self::Int64 | Self::UInt64 | Self::Double
        )
    }
}

impl TryFrom<u8> for NodeType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0x20 => Self::HashMap32,
            0x21 => Self::HashMap64,
            0xA0 => Self::String,
            0xA1 => Self::Binary,
            0xA2 => Self::BinaryAligned,
            0xC0 => Self::Array,
            0xC1 => Self::Map,
            0xC2 => Self::StringTable,
            0xD0 => Self::Bool,
            0xD1 => Self::Int,
            0xD2 => Self::Float,
            0xD3 => Self::UInt32,
            0xD4 => Self::Int64,
            0xD5 => Self::UInt64,
            0xD6 => Self::Double,
            0xFF => Self::Null,
            _ => return Err(Error::InvalidNodeType(value)),
        })
    }
}

impl From<NodeType> for u8 {
    #[inline]
    fn from(value: NodeType) -> Self {
        value as u8
    }
}
