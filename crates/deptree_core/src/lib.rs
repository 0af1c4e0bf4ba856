//! Core utilities for deptree.
//!
//! This crate provides the shared plumbing for turning a file-level
//! dependency graph into dotted module paths:
//! - Reading the JSON graph produced by an analyzer such as `ruff analyze graph`
//! - Computing the common root path shared by all files
//! - Converting file paths into dotted module paths
//! - Splitting module paths into parent path, leaf name and package-init parts

mod constants;
mod graph;
mod names;
mod types;

// Re-export public API
pub use constants::{MODULE_PATH_SEPARATOR, PACKAGE_INIT_MARKER, PATH_SEPARATOR};
pub use graph::{ModuleGraph, count_dependency_targets, module_graph_from_files, read_graph};
pub use names::{
    find_root_path, join_module_path, module_path_from_file, root_module_name, split_module_path,
    strip_extension,
};
pub use types::{CaseMode, FileGraph};
