use log::trace;

use crate::node::{Node, Package};
use crate::stats;

/// Index of a node in its [`ModuleTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Arena-backed package/module tree.
///
/// Nodes are addressed by [`NodeId`]; the synthetic root package always sits
/// at the first slot. Ids never leave the tree they were allocated in.
#[derive(Debug)]
pub struct ModuleTree {
    nodes: Vec<Node>,
}

impl ModuleTree {
    pub fn new(root_name: String) -> Self {
        let root = Package {
            import_path: String::new(),
            name: root_name,
            is_dependency: false,
            is_init_module: false,
            children: Vec::new(),
            direct_relations: 0,
            children_relations: 0,
            children_quantile: 0,
        };
        Self { nodes: vec![Node::Package(root)] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // Parent ids handed to this method always come from the builder's
    // package map, so the parent is a package.
    pub(crate) fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        if let Node::Package(package) = self.node_mut(parent) {
            package.children.push(child);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Package(package) => &package.children,
            Node::Module(_) => &[],
        }
    }

    /// Package-typed children of a node, filtered out of the mixed child list.
    pub fn child_packages(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).iter().copied().filter(|&child| self.node(child).is_package())
    }

    pub fn total_relations(&self, id: NodeId) -> usize {
        match self.node(id) {
            Node::Module(module) => module.direct_relations,
            Node::Package(package) => package.direct_relations + package.children_relations,
        }
    }

    /// Sorts every package's child list by display name, depth first.
    pub fn sort_children(&mut self) {
        self.sort_children_of(self.root());
    }

    fn sort_children_of(&mut self, id: NodeId) {
        let mut children = match self.node(id) {
            Node::Package(package) => package.children.clone(),
            Node::Module(_) => return,
        };
        children.sort_by(|&left, &right| self.node(left).name().cmp(self.node(right).name()));
        if let Node::Package(package) = self.node_mut(id) {
            package.children = children.clone();
        }
        for child in children {
            self.sort_children_of(child);
        }
    }

    /// Computes `children_relations` for every package bottom-up and returns
    /// the root's total relations.
    pub fn apply_counters(&mut self) -> usize {
        self.apply_counters_at(self.root())
    }

    fn apply_counters_at(&mut self, id: NodeId) -> usize {
        let children = match self.node(id) {
            Node::Module(module) => return module.direct_relations,
            Node::Package(package) => package.children.clone(),
        };
        let children_relations: usize =
            children.into_iter().map(|child| self.apply_counters_at(child)).sum();
        if let Node::Package(package) = self.node_mut(id) {
            package.children_relations = children_relations;
        }
        self.node(id).direct_relations() + children_relations
    }

    /// Stores the percentile threshold over each package's child totals.
    ///
    /// Packages with fewer than two children keep a threshold of zero since
    /// no meaningful percentile exists for them.
    pub fn apply_quantiles(&mut self, percentile: usize) {
        self.apply_quantiles_at(self.root(), percentile);
    }

    fn apply_quantiles_at(&mut self, id: NodeId, percentile: usize) {
        let totals: Vec<usize> =
            self.children(id).iter().map(|&child| self.total_relations(child)).collect();
        let threshold = stats::children_quantile(&totals, percentile);
        trace!("children_quantile(`{}`) = {threshold}", self.node(id).import_path());
        if let Node::Package(package) = self.node_mut(id) {
            package.children_quantile = threshold;
        }
        let sub_packages: Vec<NodeId> = self.child_packages(id).collect();
        for child in sub_packages {
            self.apply_quantiles_at(child, percentile);
        }
    }
}
