use std::fmt::{self, Write as _};

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{Byml, ByteOrder, Error, Node, Result, cold_path};

const INDENT: &str = "  ";

/// Incremental YAML text builder.
///
/// Containers drive the layout through the nesting level and the two context
/// flags; scalars are rendered here.
#[derive(Default, Debug, Clone)]
pub struct YamlEmitter {
    builder: String,
    level: usize,
    indented: bool,
    inline: bool,
    /// Offsets of the containers currently being written, outermost first.
    ancestors: Vec<usize>,
}

impl YamlEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_str(&mut self, text: &str) {
        self.builder.push_str(text);
    }

    #[inline]
    pub fn new_line(&mut self) {
        self.builder.push('\n');
        self.inline = false;
    }

    /// Writes the indentation for the current nesting level.
    #[inline]
    pub fn indent_line(&mut self) {
        for _ in 0..self.level {
            self.builder.push_str(INDENT);
        }
    }

    /// Returns `true` if nothing has been written on the current line.
    #[inline]
    pub fn is_at_line_start(&self) -> bool {
        self.builder.is_empty() || self.builder.ends_with('\n')
    }

    /// Whether the node being written sits inside an indented block.
    #[inline]
    pub fn is_indented(&self) -> bool {
        self.indented
    }

    #[inline]
    pub fn set_indented(&mut self, indented: bool) {
        self.indented = indented;
    }

    /// Whether the node being written follows a key on the same line.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    #[inline]
    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    #[inline]
    pub fn push_level(&mut self) {
        self.level += 1;
    }

    #[inline]
    pub fn pop_level(&mut self) {
        debug_assert!(self.level > 0, "unbalanced nesting level");
        self.level = self.level.saturating_sub(1);
    }

    /// Marks the container at `offset` as being written. Fails if it is
    /// already open further up the tree.
    pub(crate) fn enter_container(&mut self, offset: usize) -> Result<()> {
        if self.ancestors.contains(&offset) {
            cold_path();
            return Err(Error::CyclicReference(offset));
        }
        self.ancestors.push(offset);
        Ok(())
    }

    #[inline]
    pub(crate) fn leave_container(&mut self) {
        self.ancestors.pop();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.builder
    }

    pub fn finish(self) -> String {
        self.builder
    }

    /// Renders `node`, resolving strings and nested containers through `root`.
    pub fn emit_node<O: ByteOrder>(&mut self, node: Node<'_, O>, root: &Byml<'_, O>) -> Result<()> {
        match node {
            Node::HashMap32(map) => map.emit_yaml(self, root)?,
            Node::Container { node_type, .. } => {
                cold_path();
                return Err(Error::Unsupported(node_type));
            }
            Node::String(index) => self.emit_string(root.string(index as usize)?)?,
            Node::Binary(data) => write!(self, "!!binary {}", STANDARD.encode(data))?,
            Node::BinaryAligned { data, alignment } => {
                write!(self, "!a{alignment} {}", STANDARD.encode(data))?
            }
            Node::Bool(value) => self.push_str(if value { "true" } else { "false" }),
            Node::Int(value) => write!(self, "{value}")?,
            Node::Float(value) => self.emit_float(value, "")?,
            Node::UInt32(value) => write!(self, "!u 0x{value:x}")?,
            Node::Int64(value) => write!(self, "!l {value}")?,
            Node::UInt64(value) => write!(self, "!ul {value}")?,
            Node::Double(value) => self.emit_float(value, "!d ")?,
            Node::Null => self.push_str("null"),
        }
        Ok(())
    }

    fn emit_float<F: Into<f64> + fmt::Debug + Copy>(&mut self, value: F, tag: &str) -> fmt::Result {
        self.push_str(tag);
        let wide: f64 = value.into();
        if wide.is_nan() {
            self.push_str(".nan");
        } else if wide.is_infinite() {
            self.push_str(if wide > 0.0 { ".inf" } else { "-.inf" });
        } else {
            write!(self, "{value:?}")?;
        }
        Ok(())
    }

    fn emit_string(&mut self, value: &str) -> fmt::Result {
        if !needs_quotes(value) {
            self.push_str(value);
            return Ok(());
        }

        self.builder.push('"');
        for c in value.chars() {
            match c {
                '"' => self.push_str("\\\""),
                '\\' => self.push_str("\\\\"),
                '\n' => self.push_str("\\n"),
                '\r' => self.push_str("\\r"),
                '\t' => self.push_str("\\t"),
                c if c.is_control() => write!(self, "\\u{:04X}", c as u32)?,
                c => self.builder.push(c),
            }
        }
        self.builder.push('"');
        Ok(())
    }
}

impl fmt::Write for YamlEmitter {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.builder.push_str(s);
        Ok(())
    }
}

fn needs_quotes(value: &str) -> bool {
    const LEADING: &[char] = &[
        '-', '?', ':', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`', '~',
    ];
    const FLOW: &[char] = &[',', '[', ']', '{', '}'];

    value.is_empty()
        || value.starts_with(LEADING)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(FLOW)
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.contains(char::is_control)
        || matches!(
            value,
            "null" | "Null" | "NULL" | "true" | "True" | "TRUE" | "false" | "False" | "FALSE"
        )
        || value.starts_with("0x")
        || value.parse::<f64>().is_ok()
}
