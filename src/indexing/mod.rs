//! Tree structures and the concurrent BK-tree builder
//!
//! - Node: owned tree returned to callers
//! - Thread-safe arena: per-node locked tree used while building
//! - Partition: round-robin work chunks for the build phases
//! - BK-tree: the two-phase builder

pub mod bktree;
pub mod node;
pub mod partition;
pub mod threadsafe;

pub use bktree::*;
pub use node::*;
pub use partition::*;
pub use threadsafe::*;
