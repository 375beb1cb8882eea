//! The tree-to-text projection: line grammar, rendering, and the mapping
//! from buffer positions back to paths.

pub mod codec;
pub mod expansion;
pub mod projector;
pub mod resolver;
pub mod snapshot;
