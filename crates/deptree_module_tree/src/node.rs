use crate::tree::NodeId;

/// Leaf module in the package tree.
#[derive(Debug, Clone)]
pub struct Module {
    pub import_path: String,
    pub name: String,
    /// True when the path only appeared as a dependency target, never as an
    /// analyzed file.
    pub is_dependency: bool,
    /// How many times this path appears as a dependency target.
    pub direct_relations: usize,
}

/// Package with a mixed, ordered list of module and package children.
#[derive(Debug, Clone)]
pub struct Package {
    pub import_path: String,
    pub name: String,
    pub is_dependency: bool,
    /// True when the package was declared by its own init-marked file rather
    /// than materialized as an ancestor.
    pub is_init_module: bool,
    pub children: Vec<NodeId>,
    pub direct_relations: usize,
    /// Sum of the total relations of all children, filled in by the counter
    /// pass.
    pub children_relations: usize,
    /// Percentile threshold over the children's total relations, filled in
    /// by the quantile pass. Zero for packages with fewer than two children.
    pub children_quantile: usize,
}

/// A node in the module tree.
#[derive(Debug, Clone)]
pub enum Node {
    Module(Module),
    Package(Package),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Module(module) => &module.name,
            Node::Package(package) => &package.name,
        }
    }

    pub fn import_path(&self) -> &str {
        match self {
            Node::Module(module) => &module.import_path,
            Node::Package(package) => &package.import_path,
        }
    }

    pub fn is_dependency(&self) -> bool {
        match self {
            Node::Module(module) => module.is_dependency,
            Node::Package(package) => package.is_dependency,
        }
    }

    pub fn direct_relations(&self) -> usize {
        match self {
            Node::Module(module) => module.direct_relations,
            Node::Package(package) => package.direct_relations,
        }
    }

    pub fn is_package(&self) -> bool {
        matches!(self, Node::Package(_))
    }

    pub fn as_package(&self) -> Option<&Package> {
        match self {
            Node::Package(package) => Some(package),
            Node::Module(_) => None,
        }
    }
}
