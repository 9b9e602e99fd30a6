/// Arena-backed reference graph.
pub mod arena;

/// Forward-reference trees and dependency paths.
pub mod chain;

/// Reference cycle detection.
pub mod cycles;

/// Unreferenced skill detection.
pub mod orphans;

pub use arena::{NodeId, ReferenceGraph};
pub use chain::{ChainTracer, DEFAULT_MAX_CHAIN_DEPTH};
pub use cycles::find_cycles;
pub use orphans::{find_orphaned_skills, mentions_name};
