//! Error types for reading, emitting and normalizing BYML data.
//!
//! This module contains the [`Error`] type which represents every fault the
//! crate can report. Faults are local and immediate: nothing is retried,
//! clamped or replaced by default data.
//!
//! # Example
//!
//! ```
//! use na_byml::{Byml, Error, LittleEndian, Result};
//!
//! fn try_open(data: &[u8]) -> Result<()> {
//!     match Byml::<LittleEndian>::new(data) {
//!         Ok(_) => Ok(()),
//!         Err(Error::OutOfBounds { .. }) => {
//!             println!("Data was truncated");
//!             Ok(())
//!         }
//!         Err(Error::InvalidMagic(magic)) => {
//!             println!("Not a BYML document: {magic:?}");
//!             Ok(())
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//!
//! // little endian magic with the rest of the header missing
//! try_open(&[b'Y', b'B']).unwrap();
//! ```

use std::fmt::{self, Display};

use crate::NodeType;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// This type represents all possible errors that can occur when reading,
/// emitting or normalizing BYML data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Message(String),

    /// A computed byte range does not fit inside the buffer.
    ///
    /// Returned when a count or offset is inconsistent with the length of the
    /// data, for example a container declaring more entries than the buffer
    /// holds. Nothing is decoded from a range that fails this check.
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// An ordinal access outside `0..count`.
    IndexOutOfRange { index: usize, count: usize },

    /// A type tag byte that names no BYML node type.
    InvalidNodeType(u8),

    /// A referenced header carries a different type than the entry that
    /// points at it.
    NodeTypeMismatch { expected: NodeType, actual: NodeType },

    /// The node type is part of the format but is only referenced opaquely by
    /// this crate.
    Unsupported(NodeType),

    /// The first two bytes are neither `BY` nor `YB`.
    InvalidMagic([u8; 2]),

    UnsupportedVersion(u16),

    /// The document is stored in the opposite byte order from the one it is
    /// being read as. Run [`normalize`](crate::normalize) first.
    ByteOrderMismatch,

    /// The string at the given table index is not valid UTF-8.
    InvalidUtf8(usize),

    /// A container entry leads back to a container that encloses it. Holds
    /// the offset of the repeated container.
    CyclicReference(usize),

    /// The text sink rejected a write.
    Fmt(fmt::Error),
}

impl From<fmt::Error> for Error {
    fn from(error: fmt::Error) -> Self {
        Error::Fmt(error)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(message) => formatter.write_str(message),
            Error::OutOfBounds {
                offset,
                len,
                available,
            } => write!(
                formatter,
                "range of {len} bytes at offset {offset:#x} is outside a buffer of {available} bytes"
            ),
            Error::IndexOutOfRange { index, count } => {
                write!(formatter, "index {index} out of range for {count} entries")
            }
            Error::InvalidNodeType(tag) => write!(formatter, "invalid BYML node type: {tag:#04x}"),
            Error::NodeTypeMismatch { expected, actual } => write!(
                formatter,
                "node type mismatch: expected {expected:?}, got {actual:?}"
            ),
            Error::Unsupported(node_type) => {
                write!(formatter, "unsupported node type: {node_type:?}")
            }
            Error::InvalidMagic(magic) => write!(
                formatter,
                "invalid BYML magic: {:#04x} {:#04x}",
                magic[0], magic[1]
            ),
            Error::UnsupportedVersion(version) => {
                write!(formatter, "unsupported BYML version: {version}")
            }
            Error::ByteOrderMismatch => {
                formatter.write_str("document byte order does not match the requested order")
            }
            Error::InvalidUtf8(index) => write!(formatter, "string {index} is not valid UTF-8"),
            Error::CyclicReference(offset) => {
                write!(formatter, "cyclic reference to the container at offset {offset:#x}")
            }
            Error::Fmt(error) => Display::fmt(error, formatter),
        }
    }
}

impl std::error::Error for Error {}
