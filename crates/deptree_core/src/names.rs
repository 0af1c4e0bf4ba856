use anyhow::{Result, ensure};
use log::trace;
use std::collections::BTreeSet;

use crate::constants::{MODULE_PATH_SEPARATOR, PACKAGE_INIT_MARKER, PATH_SEPARATOR};
use crate::types::{CaseMode, FileGraph};

/// Longest common directory prefix of every path in the graph.
///
/// With fewer than two distinct paths there is no meaningful prefix and the
/// root is empty. Mixing absolute and relative paths also degenerates to an
/// empty root.
pub fn find_root_path(files: &FileGraph) -> String {
    let paths: BTreeSet<&str> = files.all_paths().collect();
    if paths.len() < 2 {
        return String::new();
    }
    let (Some(first), Some(last)) = (paths.first(), paths.last()) else {
        return String::new();
    };
    let root = common_path(first, last);
    trace!("Common root of {} paths: `{root}`", paths.len());
    root
}

// The lexicographically smallest and largest paths bound every other path,
// so their common prefix is the common prefix of the whole set.
fn common_path(first: &str, last: &str) -> String {
    let absolute = first.starts_with(PATH_SEPARATOR);
    if absolute != last.starts_with(PATH_SEPARATOR) {
        return String::new();
    }
    let common: Vec<&str> = components(first)
        .zip(components(last))
        .take_while(|(left, right)| left == right)
        .map(|(component, _)| component)
        .collect();
    let joined = common.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

fn components(path: &str) -> impl Iterator<Item = &str> + '_ {
    path.split(PATH_SEPARATOR).filter(|component| !component.is_empty() && *component != ".")
}

/// Removes the extension from the last path component.
///
/// Leading dots do not start an extension, so hidden files like `.bashrc`
/// stay intact.
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind(PATH_SEPARATOR).map_or(0, |index| index + 1);
    match path[name_start..].rfind(MODULE_PATH_SEPARATOR) {
        Some(relative_dot) => {
            let dot = name_start + relative_dot;
            if path.as_bytes()[name_start..dot].iter().any(|&byte| byte != b'.') {
                &path[..dot]
            } else {
                path
            }
        }
        None => path,
    }
}

/// Converts a file path into a dotted module path relative to `root`.
pub fn module_path_from_file(root: &str, filepath: &str, case: CaseMode) -> String {
    let path = strip_extension(filepath);
    let path = path.strip_prefix(root).unwrap_or(path);
    let path = path.trim_start_matches(PATH_SEPARATOR);
    let dotted = path.replace(PATH_SEPARATOR, MODULE_PATH_SEPARATOR);
    match case {
        CaseMode::Lower => dotted.to_lowercase(),
        CaseMode::Preserve => dotted,
    }
}

/// Display name of the synthetic root, derived from the last component of
/// the root path.
pub fn root_module_name(root_path: &str, case: CaseMode) -> String {
    let tail = &root_path[root_path.rfind(PATH_SEPARATOR).map_or(0, |index| index + 1)..];
    let name = if tail.is_empty() { root_path } else { tail };
    module_path_from_file("", name, case)
}

/// Joins a parent path and a leaf name back into a dotted module path.
pub fn join_module_path(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}{MODULE_PATH_SEPARATOR}{name}")
    }
}

/// Splits a dotted module path into `(parent_path, leaf_name, is_init_module)`.
///
/// A leaf equal to the package-init marker collapses into its parent:
/// `a.b.__init__` splits to parent `a`, leaf `b` with the init flag set,
/// because that file defines the package `a.b` itself. A repeated marker is
/// malformed input and fails.
pub fn split_module_path(module: &str) -> Result<(&str, &str, bool)> {
    split_module_path_inner(module, false)
}

fn split_module_path_inner(module: &str, is_init_module: bool) -> Result<(&str, &str, bool)> {
    match module.rsplit_once(MODULE_PATH_SEPARATOR) {
        None => Ok(("", module, is_init_module)),
        Some((parent, leaf)) if leaf == PACKAGE_INIT_MARKER => {
            ensure!(
                !is_init_module,
                "repeated package init marker in module path ending with `{module}`"
            );
            split_module_path_inner(parent, true)
        }
        Some((parent, leaf)) => Ok((parent, leaf, is_init_module)),
    }
}
