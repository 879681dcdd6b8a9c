pub use zerocopy::BigEndian;
pub use zerocopy::LittleEndian;
pub use zerocopy::NativeEndian;

mod container;
mod document;
mod error;
mod node;
mod node_type;
mod reverse;
#[cfg(feature = "serde")]
mod ser;
mod util;
mod yaml;

pub use container::*;
pub use document::*;
pub use error::*;
pub use node::*;
pub use node_type::*;
pub use reverse::*;
#[cfg(feature = "serde")]
pub use ser::*;
pub use util::*;
pub use yaml::*;
