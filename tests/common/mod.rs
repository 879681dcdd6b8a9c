//! Byte-level builders for synthetic BYML documents.

#![allow(dead_code)]

use na_byml::NodeType;

pub struct Writer {
    big: bool,
    pub buf: Vec<u8>,
}

impl Writer {
    pub fn new(big: bool) -> Self {
        Self {
            big,
            buf: Vec::new(),
        }
    }

    pub fn pos(&self) -> u32 {
        self.buf.len() as u32
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn u16(&mut self, value: u16) {
        if self.big {
            self.bytes(&value.to_be_bytes());
        } else {
            self.bytes(&value.to_le_bytes());
        }
    }

    pub fn u24(&mut self, value: u32) {
        if self.big {
            self.bytes(&value.to_be_bytes()[1..]);
        } else {
            self.bytes(&value.to_le_bytes()[..3]);
        }
    }

    pub fn u32(&mut self, value: u32) {
        if self.big {
            self.bytes(&value.to_be_bytes());
        } else {
            self.bytes(&value.to_le_bytes());
        }
    }

    pub fn i32(&mut self, value: i32) {
        self.u32(value as u32);
    }

    pub fn u64(&mut self, value: u64) {
        if self.big {
            self.bytes(&value.to_be_bytes());
        } else {
            self.bytes(&value.to_le_bytes());
        }
    }

    pub fn align(&mut self, alignment: usize) {
        while self.buf.len() % alignment != 0 {
            self.buf.push(0);
        }
    }

    pub fn patch_u32(&mut self, at: usize, value: u32) {
        let bytes = if self.big {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.buf[at..at + 4].copy_from_slice(&bytes);
    }
}

/// Writes a 32-bit hashed map and returns its offset.
pub fn hash_map(w: &mut Writer, entries: &[(u32, NodeType, i32)]) -> u32 {
    w.align(4);
    let offset = w.pos();
    w.u8(NodeType::HashMap32 as u8);
    w.u24(entries.len() as u32);
    for &(hash, _, value) in entries {
        w.u32(hash);
        w.i32(value);
    }
    for &(_, node_type, _) in entries {
        w.u8(node_type as u8);
    }
    w.u8(0);
    w.align(4);
    offset
}

/// Writes an 8-byte payload and returns its offset.
pub fn wide(w: &mut Writer, value: u64) -> u32 {
    w.align(4);
    let offset = w.pos();
    w.u64(value);
    offset
}

pub fn binary(w: &mut Writer, data: &[u8]) -> u32 {
    w.align(4);
    let offset = w.pos();
    w.u32(data.len() as u32);
    w.bytes(data);
    w.align(4);
    offset
}

pub fn string_table(w: &mut Writer, strings: &[&str]) -> u32 {
    w.align(4);
    let offset = w.pos();
    w.u8(NodeType::StringTable as u8);
    w.u24(strings.len() as u32);
    let mut relative = 4 + 4 * (strings.len() as u32 + 1);
    for s in strings {
        w.u32(relative);
        relative += s.len() as u32 + 1;
    }
    w.u32(relative);
    for s in strings {
        w.bytes(s.as_bytes());
        w.u8(0);
    }
    w.align(4);
    offset
}

/// Builds a version 7 document. `root` writes the node tree and returns the
/// root offset (0 for an empty document).
pub fn document(big: bool, strings: &[&str], root: impl FnOnce(&mut Writer) -> u32) -> Vec<u8> {
    let mut w = Writer::new(big);
    w.bytes(if big { b"BY" } else { b"YB" });
    w.u16(7);
    w.u32(0);
    w.u32(0);
    w.u32(0);
    if !strings.is_empty() {
        let strings = string_table(&mut w, strings);
        w.patch_u32(8, strings);
    }
    let root = root(&mut w);
    w.patch_u32(12, root);
    w.buf
}

/// A document whose root is a hashed map of `Int` entries `hash -> value`.
pub fn int_map_document(big: bool, entries: &[(u32, i32)]) -> Vec<u8> {
    document(big, &[], |w| {
        let entries: Vec<_> = entries
            .iter()
            .map(|&(hash, value)| (hash, NodeType::Int, value))
            .collect();
        hash_map(w, &entries)
    })
}
