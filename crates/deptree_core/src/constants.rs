//! Shared constants for module path handling.

/// File stem that marks the module defining a package itself rather than a
/// member module, e.g. `pkg/__init__.py` defines the package `pkg`.
pub const PACKAGE_INIT_MARKER: &str = "__init__";

/// Separator between components of a file path.
pub const PATH_SEPARATOR: char = '/';

/// Separator between segments of a dotted module path.
pub const MODULE_PATH_SEPARATOR: &str = ".";
