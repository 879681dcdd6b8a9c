mod hash_map32;
mod header;

pub use hash_map32::*;
pub use header::*;
