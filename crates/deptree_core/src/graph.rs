use anyhow::{Context, Result};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use crate::names::{find_root_path, module_path_from_file, root_module_name};
use crate::types::{CaseMode, FileGraph};

/// File-level dependency graph converted to dotted module paths.
///
/// Modules are held in path order so every consumer iterates them the same
/// way on every run, independent of the hash seed the input map was built
/// with. Colliding paths would otherwise resolve differently across runs.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    /// Module path of each analyzed file mapped to its dependency module paths.
    pub modules: BTreeMap<String, Vec<String>>,
    /// Display name of the synthetic root, derived from the common root path.
    pub root_name: String,
}

/// Reads the JSON dependency graph from a reader, usually stdin.
pub fn read_graph<R: Read>(reader: R) -> Result<FileGraph> {
    let graph: FileGraph = serde_json::from_reader(reader)
        .context("failed to parse the module dependency graph from stdin")?;
    debug!("Read dependency graph with {} modules", graph.len());
    Ok(graph)
}

/// Converts the file-level graph into dotted module paths relative to the
/// common root.
pub fn module_graph_from_files(files: &FileGraph, case: CaseMode) -> ModuleGraph {
    let root_path = find_root_path(files);
    debug!("Common root path: `{root_path}`");

    let modules = files
        .iter()
        .map(|(file, deps)| {
            let module = module_path_from_file(&root_path, file, case);
            let dependencies =
                deps.iter().map(|dep| module_path_from_file(&root_path, dep, case)).collect();
            (module, dependencies)
        })
        .collect();

    let root_name = root_module_name(&root_path, case);
    ModuleGraph { modules, root_name }
}

/// Counts how many times each module path appears as a dependency target.
pub fn count_dependency_targets(modules: &BTreeMap<String, Vec<String>>) -> HashMap<String, usize> {
    let mut counters: HashMap<String, usize> = HashMap::new();
    for target in modules.values().flatten() {
        *counters.entry(target.clone()).or_insert(0) += 1;
    }
    counters
}
