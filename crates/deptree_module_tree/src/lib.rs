//! Package tree construction and rendering for module dependency graphs.
//!
//! This crate turns a converted module graph into a colorized tree:
//! - Building a Package/Module tree with per-node relation counters
//! - Sorting, counting and thresholding passes over the tree
//! - Visibility filtering with a per-run memo cache
//! - Drawing the tree and a statistics footer to any writer

mod analyzer;
mod builder;
mod color;
mod config;
mod node;
mod reporter;
mod stats;
mod tree;
mod visibility;

// Re-export public API
pub use analyzer::{Analysis, analyze};
pub use builder::build_module_tree;
pub use config::Config;
pub use node::{Module, Node, Package};
pub use reporter::{print_stats, print_tree};
pub use stats::DependencyStats;
pub use tree::{ModuleTree, NodeId};
pub use visibility::{DrawOptions, VisibilityCache};
