use std::{fmt, fmt::Write as _, iter::FusedIterator};

use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned, byteorder};

use crate::{
    Byml, ByteOrder, ContainerHeader, Error, HEADER_SIZE, Node, NodeType, Result, Reverse,
    ReverseReader, YamlEmitter, cold_path, reverse_node, util::slice_at,
};

/// Containers with at most this many scalar entries are emitted in flow style.
const COMPACT_THRESHOLD: usize = 5;

/// The fixed 8-byte on-disk record of a hashed map.
#[repr(C)]
#[derive(Clone, Copy, FromBytes, KnownLayout, Immutable, Unaligned)]
pub(crate) struct Entry<O: ByteOrder> {
    hash: byteorder::U32<O>,
    value: byteorder::I32<O>,
}

impl<O: ByteOrder> Entry<O> {
    pub(crate) const SIZE: usize = 8;
}

impl<O: ByteOrder> Reverse for Entry<O> {
    #[inline]
    fn reverse(bytes: &mut [u8]) {
        bytes[0..4].reverse();
        bytes[4..8].reverse();
    }
}

/// A borrowed view of a container keyed by 32-bit hashes.
///
/// The entries and their type tags are read straight out of the document
/// buffer: `count` 8-byte entries follow the header, then `count + 1` type
/// bytes. Nodes are materialized on access and never cached.
///
/// # Example
///
/// ```
/// use na_byml::{HashMap32, LittleEndian, Node, NodeType};
///
/// let data = [
///     0x20, 0x01, 0x00, 0x00, // header: HashMap32, one entry
///     0xEF, 0xBE, 0xAD, 0xDE, 0x07, 0x00, 0x00, 0x00, // 0xdeadbeef -> 7
///     0xD1, 0x00, // Int tag, reserved byte
/// ];
/// let map = HashMap32::<LittleEndian>::read(&data, 0).unwrap();
///
/// assert_eq!(map.len(), 1);
/// let (hash, node) = map.get(0).unwrap();
/// assert_eq!(hash, 0xDEAD_BEEF);
/// assert!(matches!(node, Node::Int(7)));
/// assert_eq!(map.node_type(), NodeType::HashMap32);
/// ```
#[derive(Clone, Copy)]
pub struct HashMap32<'a, O: ByteOrder> {
    data: &'a [u8],
    offset: usize,
    node_type: NodeType,
    entries: &'a [Entry<O>],
    types: &'a [u8],
}

impl<'a, O: ByteOrder> HashMap32<'a, O> {
    /// Resolves the entry and type regions of the container whose header
    /// starts at `offset`.
    ///
    /// Fails with [`Error::OutOfBounds`] if either region does not fit in
    /// `data`. With `count == 0` nothing past the header is touched.
    pub fn new(data: &'a [u8], offset: usize, count: usize, node_type: NodeType) -> Result<Self> {
        if count == 0 {
            return Ok(Self {
                data,
                offset,
                node_type,
                entries: &[],
                types: &[],
            });
        }

        let entries_offset = offset.saturating_add(HEADER_SIZE);
        let entries_len = count.saturating_mul(Entry::<O>::SIZE);
        let entries = <[Entry<O>]>::ref_from_bytes_with_elems(
            slice_at(data, entries_offset, entries_len)?,
            count,
        )
        .map_err(|_| {
            cold_path();
            Error::OutOfBounds {
                offset: entries_offset,
                len: entries_len,
                available: data.len(),
            }
        })?;

        let types = slice_at(
            data,
            entries_offset.saturating_add(entries_len),
            count.saturating_add(1),
        )?;

        Ok(Self {
            data,
            offset,
            node_type,
            entries,
            types,
        })
    }

    /// Reads the header at `offset` and resolves the container behind it.
    pub fn read(data: &'a [u8], offset: usize) -> Result<Self> {
        let header = ContainerHeader::read(data, offset)?;
        let actual = header.node_type()?;
        if actual != NodeType::HashMap32 {
            cold_path();
            return Err(Error::NodeTypeMismatch {
                expected: NodeType::HashMap32,
                actual,
            });
        }
        Self::new(data, offset, header.count::<O>(), actual)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if this container has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset of the container header inside the document.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The whole document buffer this view borrows from.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The type byte of every entry, in on-disk order.
    #[inline]
    pub fn type_tags(&self) -> &'a [u8] {
        &self.types[..self.entries.len()]
    }

    /// Returns the hash, the undecoded value field and the type byte of the
    /// entry at `index`.
    #[inline]
    pub fn raw(&self, index: usize) -> Result<(u32, i32, u8)> {
        let Some(entry) = self.entries.get(index) else {
            cold_path();
            return Err(Error::IndexOutOfRange {
                index,
                count: self.len(),
            });
        };
        Ok((entry.hash.get(), entry.value.get(), self.types[index]))
    }

    /// Returns the entry at `index` with its node materialized.
    #[inline]
    pub fn get(&self, index: usize) -> Result<(u32, Node<'a, O>)> {
        let (hash, value, tag) = self.raw(index)?;
        Ok((hash, Node::materialize(self.data, value, tag)?))
    }

    /// Returns an iterator over the entries in on-disk order.
    #[inline]
    pub fn iter(&self) -> HashMap32Iter<'a, O> {
        HashMap32Iter {
            map: *self,
            index: 0,
        }
    }

    /// Returns `true` if any entry references a container node.
    pub fn has_container_nodes(&self) -> bool {
        self.type_tags()
            .iter()
            .any(|&tag| NodeType::try_from(tag).is_ok_and(NodeType::is_container_type))
    }

    /// Flips the byte order of the `count` entries of the container at
    /// `offset` and of every node they reference.
    ///
    /// `reader` converts into `O`; each entry is flipped before its value is
    /// read. Type bytes are left as they are.
    pub fn reverse(reader: &mut ReverseReader<'_, O>, offset: usize, count: usize) -> Result<()> {
        let entries_offset = offset.saturating_add(HEADER_SIZE);
        let types_offset = entries_offset.saturating_add(count.saturating_mul(Entry::<O>::SIZE));

        for i in 0..count {
            let entry = reader.read_reversed::<Entry<O>>(entries_offset + Entry::<O>::SIZE * i)?;
            let tag = reader.read_u8(types_offset + i)?;
            reverse_node(reader, entry.value.get(), tag)?;
        }

        Ok(())
    }

    /// Appends this container to `emitter` as a `!h` tagged mapping.
    ///
    /// Fails with [`Error::CyclicReference`] if an entry leads back to this
    /// container or one enclosing it.
    pub fn emit_yaml(&self, emitter: &mut YamlEmitter, root: &Byml<'_, O>) -> Result<()> {
        emitter.enter_container(self.offset)?;
        let result = self.emit_entries(emitter, root);
        emitter.leave_container();
        result
    }

    fn emit_entries(&self, emitter: &mut YamlEmitter, root: &Byml<'_, O>) -> Result<()> {
        emitter.push_str("!h");
        emitter.new_line();

        if self.len() <= COMPACT_THRESHOLD && !emitter.is_indented() && !self.has_container_nodes()
        {
            emitter.push_str("{");
            for (i, entry) in self.iter().enumerate() {
                let (hash, node) = entry?;
                if i > 0 {
                    emitter.push_str(", ");
                }
                write!(emitter, "0x{hash:02x}: ")?;
                emitter.emit_node(node, root)?;
            }
            emitter.push_str("}");
            return Ok(());
        }

        for entry in self.iter() {
            let (hash, node) = entry?;
            if !emitter.is_at_line_start() {
                emitter.new_line();
            }

            emitter.indent_line();
            write!(emitter, "0x{hash:02x}: ")?;
            emitter.set_inline(true);
            emitter.set_indented(false);
            emitter.push_level();
            let result = emitter.emit_node(node, root);
            emitter.pop_level();
            result?;
        }

        Ok(())
    }
}

impl<O: ByteOrder> fmt::Debug for HashMap32<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashMap32")
            .field("offset", &format_args!("{:#x}", self.offset))
            .field("count", &self.len())
            .field("node_type", &self.node_type)
            .finish()
    }
}

impl<'a, O: ByteOrder> IntoIterator for HashMap32<'a, O> {
    type Item = Result<(u32, Node<'a, O>)>;
    type IntoIter = HashMap32Iter<'a, O>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        HashMap32Iter {
            map: self,
            index: 0,
        }
    }
}

impl<'a, O: ByteOrder> IntoIterator for &HashMap32<'a, O> {
    type Item = Result<(u32, Node<'a, O>)>;
    type IntoIter = HashMap32Iter<'a, O>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone)]
pub struct HashMap32Iter<'a, O: ByteOrder> {
    map: HashMap32<'a, O>,
    index: usize,
}

impl<'a, O: ByteOrder> Iterator for HashMap32Iter<'a, O> {
    type Item = Result<(u32, Node<'a, O>)>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.map.len() {
            return None;
        }

        let item = self.map.get(self.index);
        self.index += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.map.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<O: ByteOrder> ExactSizeIterator for HashMap32Iter<'_, O> {}

impl<O: ByteOrder> FusedIterator for HashMap32Iter<'_, O> {}
