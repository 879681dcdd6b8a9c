use serde::{
    Serialize, Serializer,
    ser::{Error as _, SerializeMap},
};

use crate::{Byml, ByteOrder, Error, HashMap32, Node};

impl<O: ByteOrder> Serialize for Byml<'_, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.root().map_err(S::Error::custom)? {
            Some(node) => NodeWithRoot {
                node,
                root: self,
                parent: None,
            }
            .serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl<'a, O: ByteOrder> HashMap32<'a, O> {
    /// Pairs this container with the document that resolves its strings, so
    /// it can be handed to a serde serializer.
    ///
    /// Keys are written as `0x`-prefixed lowercase hex strings.
    #[inline]
    pub fn serializable<'r>(self, root: &'r Byml<'a, O>) -> SerializableHashMap32<'r, 'a, O> {
        SerializableHashMap32 {
            map: self,
            root,
            parent: None,
        }
    }
}

/// One link in the chain of containers enclosing the node being written.
struct Ancestor<'p> {
    offset: usize,
    parent: Option<&'p Ancestor<'p>>,
}

impl Ancestor<'_> {
    fn contains(&self, offset: usize) -> bool {
        let mut link = Some(self);
        while let Some(ancestor) = link {
            if ancestor.offset == offset {
                return true;
            }
            link = ancestor.parent;
        }
        false
    }
}

pub struct SerializableHashMap32<'r, 'a, O: ByteOrder> {
    map: HashMap32<'a, O>,
    root: &'r Byml<'a, O>,
    parent: Option<&'r Ancestor<'r>>,
}

impl<O: ByteOrder> Serialize for SerializableHashMap32<'_, '_, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let offset = self.map.offset();
        if self.parent.is_some_and(|parent| parent.contains(offset)) {
            return Err(S::Error::custom(Error::CyclicReference(offset)));
        }
        let current = Ancestor {
            offset,
            parent: self.parent,
        };

        let mut map = serializer.serialize_map(Some(self.map.len()))?;
        for entry in self.map.iter() {
            let (hash, node) = entry.map_err(S::Error::custom)?;
            map.serialize_entry(
                &format!("0x{hash:02x}"),
                &NodeWithRoot {
                    node,
                    root: self.root,
                    parent: Some(&current),
                },
            )?;
        }
        map.end()
    }
}

struct NodeWithRoot<'r, 'a, O: ByteOrder> {
    node: Node<'a, O>,
    root: &'r Byml<'a, O>,
    parent: Option<&'r Ancestor<'r>>,
}

impl<O: ByteOrder> Serialize for NodeWithRoot<'_, '_, O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node {
            Node::HashMap32(map) => SerializableHashMap32 {
                map,
                root: self.root,
                parent: self.parent,
            }
            .serialize(serializer),
            Node::Container { node_type, .. } => {
                Err(S::Error::custom(Error::Unsupported(node_type)))
            }
            Node::String(index) => serializer.serialize_str(
                self.root
                    .string(index as usize)
                    .map_err(S::Error::custom)?,
            ),
            Node::Binary(data) => serializer.serialize_bytes(data),
            Node::BinaryAligned { data, .. } => serializer.serialize_bytes(data),
            Node::Bool(value) => serializer.serialize_bool(value),
            Node::Int(value) => serializer.serialize_i32(value),
            Node::Float(value) => serializer.serialize_f32(value),
            Node::UInt32(value) => serializer.serialize_u32(value),
            Node::Int64(value) => serializer.serialize_i64(value),
            Node::UInt64(value) => serializer.serialize_u64(value),
            Node::Double(value) => serializer.serialize_f64(value),
            Node::Null => serializer.serialize_unit(),
        }
    }
}
