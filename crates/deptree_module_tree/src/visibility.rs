use std::collections::HashMap;

use crate::tree::{ModuleTree, NodeId};

/// Rendering options shared by the visibility filter and the label painter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DrawOptions {
    /// Global threshold separating cold from hot labels.
    pub dependencies_quantile: usize,
    /// Hide nodes discovered only as dependencies.
    pub skip_dependencies: bool,
    /// Show nothing but dependencies, without colors.
    pub only_deps: bool,
    /// Hide nodes with zero total relations.
    pub skip_zero: bool,
}

/// Memoized visibility lookups, scoped to a single rendering pass.
///
/// A package is queried once while filtering the top level and again while
/// descending into it, so answers are cached per node and option set.
#[derive(Debug, Default)]
pub struct VisibilityCache {
    memo: HashMap<(NodeId, DrawOptions), bool>,
}

impl VisibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&mut self, tree: &ModuleTree, id: NodeId, options: DrawOptions) -> bool {
        if let Some(&visible) = self.memo.get(&(id, options)) {
            return visible;
        }
        let visible = self.compute(tree, id, options);
        self.memo.insert((id, options), visible);
        visible
    }

    // A package with any visible child stays visible no matter how it fares
    // against the filters itself.
    fn compute(&mut self, tree: &ModuleTree, id: NodeId, options: DrawOptions) -> bool {
        for &child in tree.children(id) {
            if self.is_visible(tree, child, options) {
                return true;
            }
        }
        passes_filters(tree.node(id).is_dependency(), tree.total_relations(id), options)
    }
}

fn passes_filters(is_dependency: bool, total_relations: usize, options: DrawOptions) -> bool {
    if is_dependency {
        if options.skip_dependencies {
            return false;
        }
    } else if options.only_deps {
        return false;
    }

    if options.skip_zero && total_relations == 0 {
        return false;
    }

    true
}
