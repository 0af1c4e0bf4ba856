use anyhow::Result;
use log::{debug, info};

use deptree_core::{FileGraph, count_dependency_targets, module_graph_from_files};

use crate::builder::build_module_tree;
use crate::config::Config;
use crate::stats::{self, DependencyStats};
use crate::tree::ModuleTree;

/// Finished tree plus the global numbers the renderer draws from.
#[derive(Debug)]
pub struct Analysis {
    pub tree: ModuleTree,
    pub root_name: String,
    pub dependencies_quantile: usize,
    pub stats: Option<DependencyStats>,
}

/// Turns the raw file graph into a sorted, counted and thresholded tree.
pub fn analyze(files: &FileGraph, config: &Config) -> Result<Analysis> {
    info!("Analyzing a graph of {} files", files.len());

    let graph = module_graph_from_files(files, config.case_mode());
    debug!("Resolved root module `{}`", graph.root_name);

    let counters = count_dependency_targets(&graph.modules);
    debug!("Counted {} distinct dependency targets", counters.len());

    let mut tree = build_module_tree(graph.root_name.clone(), &graph.modules, &counters)?;
    tree.sort_children();
    let total_relations = tree.apply_counters();
    tree.apply_quantiles(config.quantile as usize);
    debug!("Tree of {} nodes carries {total_relations} relations", tree.len());

    let counter_values: Vec<usize> = counters.values().copied().collect();
    let dependencies_quantile = stats::dependencies_quantile(&counter_values, config.quantile);
    info!("Dependencies quantile at {}%: {dependencies_quantile}", config.quantile);

    Ok(Analysis {
        tree,
        root_name: graph.root_name,
        dependencies_quantile,
        stats: stats::summarize(&counter_values),
    })
}
