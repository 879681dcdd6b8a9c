use zerocopy::byteorder;

use crate::{
    ByteOrder, Error, HashMap32, NodeType, Result, cold_path,
    util::{array_at, slice_at, value_offset},
};

/// A node referenced by a container entry, decoded from its value field and
/// type byte.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a, O: ByteOrder> {
    HashMap32(HashMap32<'a, O>),
    /// A container kind this crate does not decode. Only its location is kept.
    Container {
        node_type: NodeType,
        offset: usize,
    },
    /// An index into the document string table.
    String(u32),
    Binary(&'a [u8]),
    BinaryAligned {
        data: &'a [u8],
        alignment: u32,
    },
    Bool(bool),
    Int(i32),
    Float(f32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Null,
}

impl<'a, O: ByteOrder> Node<'a, O> {
    /// Decodes the node an entry refers to.
    ///
    /// `value` is either the value itself or, for containers and wide or
    /// variable-length scalars, the offset of its payload inside `data`.
    pub fn materialize(data: &'a [u8], value: i32, tag: u8) -> Result<Self> {
        let node_type = NodeType::try_from(tag)?;
        Ok(match node_type {
            NodeType::HashMap32 => Node::HashMap32(HashMap32::read(data, value_offset(value))?),
            NodeType::HashMap64 | NodeType::Array | NodeType::Map => Node::Container {
                node_type,
                offset: value_offset(value),
            },
            NodeType::StringTable => {
                cold_path();
                return Err(Error::Unsupported(node_type));
            }
            NodeType::String => Node::String(value as u32),
            NodeType::Binary => {
                let offset = value_offset(value);
                let len = byteorder::U32::<O>::from_bytes(array_at(data, offset)?).get();
                Node::Binary(slice_at(data, offset.saturating_add(4), len as usize)?)
            }
            NodeType::BinaryAligned => {
                let offset = value_offset(value);
                let len = byteorder::U32::<O>::from_bytes(array_at(data, offset)?).get();
                let alignment =
                    byteorder::U32::<O>::from_bytes(array_at(data, offset.saturating_add(4))?)
                        .get();
                Node::BinaryAligned {
                    data: slice_at(data, offset.saturating_add(8), len as usize)?,
                    alignment,
                }
            }
            NodeType::Bool => Node::Bool(value != 0),
            NodeType::Int => Node::Int(value),
            NodeType::Float => Node::Float(f32::from_bits(value as u32)),
            NodeType::UInt32 => Node::UInt32(value as u32),
            NodeType::Int64 => Node::Int64(
                byteorder::I64::<O>::from_bytes(array_at(data, value_offset(value))?).get(),
            ),
            NodeType::UInt64 => Node::UInt64(
                byteorder::U64::<O>::from_bytes(array_at(data, value_offset(value))?).get(),
            ),
            NodeType::Double => Node::Double(
                byteorder::F64::<O>::from_bytes(array_at(data, value_offset(value))?).get(),
            ),
            NodeType::Null => Node::Null,
        })
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::HashMap32(map) => map.node_type(),
            Node::Container { node_type, .. } => *node_type,
            Node::String(_) => NodeType::String,
            Node::Binary(_) => NodeType::Binary,
            Node::BinaryAligned { .. } => NodeType::BinaryAligned,
            Node::Bool(_) => NodeType::Bool,
            Node::Int(_) => NodeType::Int,
            Node::Float(_) => NodeType::Float,
            Node::UInt32(_) => NodeType::UInt32,
            Node::Int64(_) => NodeType::Int64,
            Node::UInt64(_) => NodeType::UInt64,
            Node::Double(_) => NodeType::Double,
            Node::Null => NodeType::Null,
        }
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        self.node_type().is_container_type()
    }

    #[inline]
    pub fn as_hash_map32(&self) -> Option<HashMap32<'a, O>> {
        match self {
            Node::HashMap32(map) => Some(*map),
            _ => None,
        }
    }
}
