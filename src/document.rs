//! The document root: header, string tables and whole-document
//! normalization.

use std::fmt;

use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned, byteorder};

use crate::{
    ByteOrder, ContainerHeader, Error, HEADER_SIZE, Node, NodeType, Result, Reverse,
    ReverseReader, YamlEmitter, cold_path, is_big_endian, reverse_node,
    util::{array_at, read_at, slice_at},
};

pub const DOCUMENT_HEADER_SIZE: usize = size_of::<DocumentHeader<crate::NativeEndian>>();

const MAGIC_BIG: [u8; 2] = *b"BY";
const MAGIC_LITTLE: [u8; 2] = *b"YB";
const MIN_VERSION: u16 = 2;
const MAX_VERSION: u16 = 7;

#[repr(C)]
#[derive(Clone, Copy, FromBytes, KnownLayout, Immutable, Unaligned)]
struct DocumentHeader<O: ByteOrder> {
    magic: [u8; 2],
    version: byteorder::U16<O>,
    key_table_offset: byteorder::U32<O>,
    string_table_offset: byteorder::U32<O>,
    root_offset: byteorder::U32<O>,
}

impl<O: ByteOrder> Reverse for DocumentHeader<O> {
    fn reverse(bytes: &mut [u8]) {
        bytes[0..2].reverse();
        bytes[2..4].reverse();
        for field in bytes[4..16].chunks_exact_mut(4) {
            field.reverse();
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    #[inline]
    pub fn of<O: ByteOrder>() -> Self {
        if is_big_endian::<O>() {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    #[inline]
    pub fn native() -> Self {
        Self::of::<crate::NativeEndian>()
    }
}

/// Reports the byte order a document was written in, from its magic.
pub fn endianness_of(data: &[u8]) -> Result<Endianness> {
    match array_at::<2>(data, 0)? {
        MAGIC_BIG => Ok(Endianness::Big),
        MAGIC_LITTLE => Ok(Endianness::Little),
        magic => {
            cold_path();
            Err(Error::InvalidMagic(magic))
        }
    }
}

/// Converts a whole document into byte order `O` in place.
///
/// Returns `false` without touching `data` when the document is already in
/// order `O`. Must run once per document, before any view is built: flipping
/// an already converted document scrambles it. A failure part way leaves the
/// buffer partially converted.
///
/// # Example
///
/// ```
/// use na_byml::{BigEndian, Byml, LittleEndian, normalize};
///
/// let mut data = vec![
///     b'Y', b'B', 0x07, 0x00, // little endian, version 7
///     0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // no tables, empty root
/// ];
/// assert!(!normalize::<LittleEndian>(&mut data).unwrap());
/// assert!(normalize::<BigEndian>(&mut data).unwrap());
/// assert_eq!(&data[..4], b"BY\x00\x07");
/// assert!(Byml::<BigEndian>::new(&data).is_ok());
/// ```
pub fn normalize<O: ByteOrder>(data: &mut [u8]) -> Result<bool> {
    if endianness_of(data)? == Endianness::of::<O>() {
        return Ok(false);
    }

    let [_, _, first, second] = array_at::<4>(data, 0)?;
    check_version(byteorder::U16::<O>::from_bytes([second, first]).get())?;

    let mut reader = ReverseReader::<O>::new(data);
    let header = reader.read_reversed::<DocumentHeader<O>>(0)?;

    for table_offset in [header.key_table_offset.get(), header.string_table_offset.get()] {
        if table_offset != 0 {
            reverse_string_table(&mut reader, table_offset as usize)?;
        }
    }

    let root_offset = header.root_offset.get();
    if root_offset != 0 {
        let tag = reader.read_u8(root_offset as usize)?;
        reverse_node(&mut reader, root_offset as i32, tag)?;
    }

    Ok(true)
}

fn reverse_string_table<O: ByteOrder>(reader: &mut ReverseReader<'_, O>, offset: usize) -> Result<()> {
    if !reader.visit(offset) {
        return Ok(());
    }

    let header = reader.read_reversed::<ContainerHeader>(offset)?;
    expect_type(header.node_type()?, NodeType::StringTable)?;
    let offsets = offset.saturating_add(HEADER_SIZE);
    for i in 0..=header.count::<O>() {
        reader.reverse_bytes(offsets + 4 * i, 4)?;
    }
    Ok(())
}

fn check_version(version: u16) -> Result<()> {
    if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
        cold_path();
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(())
}

fn expect_type(actual: NodeType, expected: NodeType) -> Result<()> {
    if actual != expected {
        cold_path();
        return Err(Error::NodeTypeMismatch { expected, actual });
    }
    Ok(())
}

/// A table of NUL-terminated strings addressed by index.
#[derive(Clone, Copy)]
pub struct StringTable<'a, O: ByteOrder> {
    data: &'a [u8],
    offset: usize,
    offsets: &'a [byteorder::U32<O>],
}

impl<'a, O: ByteOrder> StringTable<'a, O> {
    pub fn read(data: &'a [u8], offset: usize) -> Result<Self> {
        let header = ContainerHeader::read(data, offset)?;
        expect_type(header.node_type()?, NodeType::StringTable)?;
        let count = header.count::<O>() + 1;
        let offsets_offset = offset.saturating_add(HEADER_SIZE);
        let offsets_len = count.saturating_mul(4);
        let offsets = <[byteorder::U32<O>]>::ref_from_bytes_with_elems(
            slice_at(data, offsets_offset, offsets_len)?,
            count,
        )
        .map_err(|_| {
            cold_path();
            Error::OutOfBounds {
                offset: offsets_offset,
                len: offsets_len,
                available: data.len(),
            }
        })?;

        Ok(Self {
            data,
            offset,
            offsets,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.len() {
            cold_path();
            return Err(Error::IndexOutOfRange {
                index,
                count: self.len(),
            });
        }

        let start = self.offset.saturating_add(self.offsets[index].get() as usize);
        let end = self.offset.saturating_add(self.offsets[index + 1].get() as usize);
        let Some(len) = end.checked_sub(start) else {
            cold_path();
            return Err(Error::OutOfBounds {
                offset: start,
                len: 0,
                available: end,
            });
        };
        let bytes = slice_at(self.data, start, len)?;
        let bytes = match bytes.iter().position(|&b| b == 0) {
            Some(nul) => &bytes[..nul],
            None => bytes,
        };
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<&'a str>> + '_ {
        (0..self.len()).map(|index| self.get(index))
    }
}

impl<O: ByteOrder> fmt::Debug for StringTable<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringTable")
            .field("offset", &format_args!("{:#x}", self.offset))
            .field("count", &self.len())
            .finish()
    }
}

/// A borrowed BYML document in byte order `O`.
///
/// Only documents already in order `O` can be opened; use [`normalize`] to
/// convert a buffer first.
#[derive(Clone, Copy)]
pub struct Byml<'a, O: ByteOrder> {
    data: &'a [u8],
    version: u16,
    keys: Option<StringTable<'a, O>>,
    strings: Option<StringTable<'a, O>>,
    root_offset: usize,
}

impl<'a, O: ByteOrder> Byml<'a, O> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if endianness_of(data)? != Endianness::of::<O>() {
            cold_path();
            return Err(Error::ByteOrderMismatch);
        }

        let header = read_at::<DocumentHeader<O>>(data, 0)?;
        let version = header.version.get();
        check_version(version)?;

        let table = |offset: u32| match offset {
            0 => Ok(None),
            offset => StringTable::read(data, offset as usize).map(Some),
        };

        Ok(Self {
            data,
            version,
            keys: table(header.key_table_offset.get())?,
            strings: table(header.string_table_offset.get())?,
            root_offset: header.root_offset.get() as usize,
        })
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn version(&self) -> u16 {
        self.version
    }

    /// The root node, or `None` for an empty document.
    pub fn root(&self) -> Result<Option<Node<'a, O>>> {
        if self.root_offset == 0 {
            return Ok(None);
        }

        let header = ContainerHeader::read(self.data, self.root_offset)?;
        Node::materialize(self.data, self.root_offset as i32, header.tag()).map(Some)
    }

    /// Resolves a string node's value.
    pub fn string(&self, index: usize) -> Result<&'a str> {
        match &self.strings {
            Some(strings) => strings.get(index),
            None => {
                cold_path();
                Err(Error::IndexOutOfRange { index, count: 0 })
            }
        }
    }

    /// Resolves a key of a string-keyed map.
    pub fn key(&self, index: usize) -> Result<&'a str> {
        match &self.keys {
            Some(keys) => keys.get(index),
            None => {
                cold_path();
                Err(Error::IndexOutOfRange { index, count: 0 })
            }
        }
    }

    #[inline]
    pub fn strings(&self) -> Option<StringTable<'a, O>> {
        self.strings
    }

    #[inline]
    pub fn keys(&self) -> Option<StringTable<'a, O>> {
        self.keys
    }

    /// Renders the whole document as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let mut emitter = YamlEmitter::new();
        match self.root()? {
            Some(root) => emitter.emit_node(root, self)?,
            None => emitter.push_str("{}"),
        }
        Ok(emitter.finish())
    }
}

impl<O: ByteOrder> fmt::Debug for Byml<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Byml")
            .field("version", &self.version)
            .field("endianness", &Endianness::of::<O>())
            .field("root_offset", &format_args!("{:#x}", self.root_offset))
            .finish()
    }
}
