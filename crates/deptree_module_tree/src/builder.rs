use anyhow::{Result, ensure};
use log::{debug, trace, warn};
use std::collections::{BTreeMap, HashMap};

use deptree_core::{join_module_path, split_module_path};

use crate::node::{Module, Node, Package};
use crate::tree::{ModuleTree, NodeId};

/// Incrementally grows a [`ModuleTree`], keeping one node per import path.
///
/// Paths are registered in two passes: analyzed files first, dependency
/// targets second. A path seen in the first pass keeps its classification
/// when it shows up again in the second, so shared registries of already
/// placed modules and packages are consulted before any node is created.
struct TreeBuilder<'a> {
    tree: ModuleTree,
    counters: &'a HashMap<String, usize>,
    modules: HashMap<String, NodeId>,
    packages: HashMap<String, NodeId>,
}

impl<'a> TreeBuilder<'a> {
    fn new(root_name: String, counters: &'a HashMap<String, usize>) -> Self {
        let tree = ModuleTree::new(root_name);
        let root = tree.root();
        Self {
            tree,
            counters,
            modules: HashMap::new(),
            packages: HashMap::from([(String::new(), root)]),
        }
    }

    fn add_path(&mut self, import_path: &str, is_dependency: bool) -> Result<()> {
        let (parent_path, name, is_init_module) = split_module_path(import_path)?;
        if is_init_module {
            // An init file stands for its containing package, so the node is
            // registered under the collapsed path without the marker.
            let package_path = join_module_path(parent_path, name);
            if self.packages.contains_key(&package_path) {
                trace!("Package `{package_path}` is already registered");
                return Ok(());
            }
            if self.modules.contains_key(&package_path) {
                warn!("Path `{package_path}` is already taken by a module, skipping the package");
                return Ok(());
            }
            let parent = self.get_or_make_package(parent_path, is_dependency)?;
            self.insert_package(package_path, name.to_string(), parent, is_dependency, true);
        } else {
            if self.modules.contains_key(import_path) {
                trace!("Module `{import_path}` is already registered");
                return Ok(());
            }
            if self.packages.contains_key(import_path) {
                warn!("Path `{import_path}` is already taken by a package, skipping the module");
                return Ok(());
            }
            let parent = self.get_or_make_package(parent_path, is_dependency)?;
            self.insert_module(import_path.to_string(), name.to_string(), parent, is_dependency);
        }
        Ok(())
    }

    /// Finds the package at `import_path`, materializing the parent chain on
    /// demand. Implicit ancestors carry zero direct relations and inherit the
    /// dependency flag of the pass that reached them.
    fn get_or_make_package(&mut self, import_path: &str, is_dependency: bool) -> Result<NodeId> {
        let (parent_path, name, is_init_module) = split_module_path(import_path)?;
        let package_path = join_module_path(parent_path, name);
        if let Some(&id) = self.packages.get(&package_path) {
            return Ok(id);
        }

        ensure!(
            !is_init_module,
            "init module `{import_path}` cannot be the parent of other modules"
        );
        if self.modules.contains_key(&package_path) {
            warn!("Module `{package_path}` is shadowed by a package with the same path");
        }
        let parent = self.get_or_make_package(parent_path, is_dependency)?;
        Ok(self.insert_package(package_path, name.to_string(), parent, is_dependency, false))
    }

    fn insert_package(
        &mut self,
        import_path: String,
        name: String,
        parent: NodeId,
        is_dependency: bool,
        is_init_module: bool,
    ) -> NodeId {
        let direct_relations = self.counters.get(&import_path).copied().unwrap_or(0);
        let id = self.tree.alloc(Node::Package(Package {
            import_path: import_path.clone(),
            name,
            is_dependency,
            is_init_module,
            children: Vec::new(),
            direct_relations,
            children_relations: 0,
            children_quantile: 0,
        }));
        self.tree.attach_child(parent, id);
        trace!("Created package `{import_path}`");
        self.packages.insert(import_path, id);
        id
    }

    fn insert_module(
        &mut self,
        import_path: String,
        name: String,
        parent: NodeId,
        is_dependency: bool,
    ) -> NodeId {
        let direct_relations = self.counters.get(&import_path).copied().unwrap_or(0);
        let id = self.tree.alloc(Node::Module(Module {
            import_path: import_path.clone(),
            name,
            is_dependency,
            direct_relations,
        }));
        self.tree.attach_child(parent, id);
        trace!("Created module `{import_path}`");
        self.modules.insert(import_path, id);
        id
    }

    fn finish(self) -> ModuleTree {
        self.tree
    }
}

/// Builds the package tree from a converted module graph.
///
/// Keys of `modules` are the analyzed files; their dependency targets are
/// registered afterwards and marked as dependencies unless already placed.
/// Both passes run in path order, so when two paths collide the same one
/// wins on every run.
pub fn build_module_tree(
    root_name: String,
    modules: &BTreeMap<String, Vec<String>>,
    counters: &HashMap<String, usize>,
) -> Result<ModuleTree> {
    let mut builder = TreeBuilder::new(root_name, counters);

    for import_path in modules.keys() {
        builder.add_path(import_path, false)?;
    }
    debug!(
        "Registered {} modules and {} packages from analyzed files",
        builder.modules.len(),
        builder.packages.len()
    );

    for import_path in modules.values().flatten() {
        builder.add_path(import_path, true)?;
    }
    debug!("Module tree holds {} nodes after the dependency pass", builder.tree.len());

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deptree_core::count_dependency_targets;

    fn modules(json: &str) -> BTreeMap<String, Vec<String>> {
        serde_json::from_str(json).expect("valid module map fixture")
    }

    fn build(json: &str) -> ModuleTree {
        let map = modules(json);
        let counters = count_dependency_targets(&map);
        build_module_tree("src".to_string(), &map, &counters).expect("tree builds")
    }

    fn child_by_name(tree: &ModuleTree, parent: NodeId, name: &str) -> NodeId {
        tree.children(parent)
            .iter()
            .copied()
            .find(|&child| tree.node(child).name() == name)
            .unwrap_or_else(|| panic!("no child named `{name}`"))
    }

    #[test]
    fn test_two_flat_modules() {
        let tree = build(r#"{"a": ["b"], "b": []}"#);
        let root = tree.root();

        assert_eq!(tree.len(), 3);
        let a = child_by_name(&tree, root, "a");
        let b = child_by_name(&tree, root, "b");
        assert_eq!(tree.node(a).direct_relations(), 0);
        assert_eq!(tree.node(b).direct_relations(), 1);
        assert!(!tree.node(a).is_dependency());
        assert!(!tree.node(b).is_dependency());
    }

    #[test]
    fn test_init_path_becomes_a_package() {
        let tree = build(r#"{"pkg.__init__": ["other"], "other": []}"#);
        let root = tree.root();

        let pkg = child_by_name(&tree, root, "pkg");
        let package = tree.node(pkg).as_package().expect("pkg is a package");
        assert!(package.is_init_module);
        assert_eq!(package.import_path, "pkg");
        assert_eq!(package.direct_relations, 0);

        let other = child_by_name(&tree, root, "other");
        assert_eq!(tree.node(other).direct_relations(), 1);
    }

    #[test]
    fn test_counters_track_the_raw_init_path() {
        // Counters are keyed by the dependency target as written, so the
        // collapsed package path finds no entry of its own.
        let tree = build(r#"{"pkg.__init__": [], "main": ["pkg.__init__"]}"#);
        let pkg = child_by_name(&tree, tree.root(), "pkg");
        assert_eq!(tree.node(pkg).direct_relations(), 0);
    }

    #[test]
    fn test_every_path_registers_exactly_once() {
        let tree = build(
            r#"{"app.__init__": ["app.core.engine", "util"],
                "app.core.engine": ["util", "vendor.lib"],
                "util": [],
                "main": ["app.__init__", "util"]}"#,
        );

        // root, app, core, engine, util, main, vendor and lib.
        assert_eq!(tree.len(), 8);
        let mut paths: Vec<&str> =
            tree.node_ids().map(|id| tree.node(id).import_path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), 8);
    }

    #[test]
    fn test_dependency_target_keeps_own_classification() {
        let tree = build(r#"{"a": ["b"], "b": ["a"]}"#);
        let a = child_by_name(&tree, tree.root(), "a");
        let b = child_by_name(&tree, tree.root(), "b");
        assert!(!tree.node(a).is_dependency());
        assert!(!tree.node(b).is_dependency());
    }

    #[test]
    fn test_foreign_dependency_is_flagged_with_its_ancestors() {
        let tree = build(r#"{"main": ["vendor.lib"]}"#);
        let root = tree.root();

        let main = child_by_name(&tree, root, "main");
        assert!(!tree.node(main).is_dependency());

        let vendor = child_by_name(&tree, root, "vendor");
        let package = tree.node(vendor).as_package().expect("vendor is a package");
        assert!(package.is_dependency);
        assert!(!package.is_init_module);

        let lib = child_by_name(&tree, vendor, "lib");
        assert!(tree.node(lib).is_dependency());
        assert_eq!(tree.node(lib).direct_relations(), 1);
    }

    #[test]
    fn test_implicit_ancestors_carry_zero_relations() {
        let tree = build(r#"{"app.core.engine": []}"#);
        let app = child_by_name(&tree, tree.root(), "app");
        let core = child_by_name(&tree, app, "core");

        assert_eq!(tree.node(app).direct_relations(), 0);
        assert_eq!(tree.node(core).direct_relations(), 0);
        assert!(!tree.node(app).as_package().unwrap().is_init_module);
    }

    #[test]
    fn test_repeated_init_marker_is_rejected() {
        let map = modules(r#"{"a.__init__.__init__": []}"#);
        let counters = count_dependency_targets(&map);
        assert!(build_module_tree("src".to_string(), &map, &counters).is_err());
    }

    #[test]
    fn test_init_module_cannot_own_submodules() {
        let map = modules(r#"{"a.__init__.b": []}"#);
        let counters = count_dependency_targets(&map);
        let error = build_module_tree("src".to_string(), &map, &counters).unwrap_err();
        assert!(error.to_string().contains("cannot be the parent"));
    }

    #[test]
    fn test_module_and_init_package_share_a_path() {
        // Both `app.py` and `app/__init__.py` collapse to the path `app`.
        // Registration runs in path order, so the module wins and the
        // package declaration is dropped.
        let tree = build(r#"{"app": [], "app.__init__": []}"#);
        let root = tree.root();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(root).len(), 1);
        let app = tree.children(root)[0];
        assert_eq!(tree.node(app).name(), "app");
        assert!(!tree.node(app).is_package());
    }

    #[test]
    fn test_colliding_paths_resolve_in_path_order() {
        // `app` sorts before `app.core`, so the module registers first and
        // the deeper path shadows it with a package. The shape is a pure
        // function of the input, not of map iteration order.
        let tree = build(r#"{"app": [], "app.core": []}"#);
        let root = tree.root();

        assert_eq!(tree.len(), 4);
        let kinds: Vec<bool> =
            tree.children(root).iter().map(|&child| tree.node(child).is_package()).collect();
        assert_eq!(kinds, [false, true]);
        let names: Vec<&str> =
            tree.children(root).iter().map(|&child| tree.node(child).name()).collect();
        assert_eq!(names, ["app", "app"]);
    }

    #[test]
    fn test_package_materialized_over_module_path() {
        let counters = HashMap::new();
        let mut builder = TreeBuilder::new("src".to_string(), &counters);
        builder.add_path("app", false).unwrap();
        builder.add_path("app.core", false).unwrap();
        let tree = builder.finish();

        // The module registered first, so the deeper path shadows it with an
        // implicit package of the same name.
        let names: Vec<&str> =
            tree.children(tree.root()).iter().map(|&child| tree.node(child).name()).collect();
        assert_eq!(names, ["app", "app"]);
    }

    #[test]
    fn test_module_add_after_package_is_skipped() {
        let counters = HashMap::new();
        let mut builder = TreeBuilder::new("src".to_string(), &counters);
        builder.add_path("app.core", false).unwrap();
        builder.add_path("app", false).unwrap();
        let tree = builder.finish();

        assert_eq!(tree.children(tree.root()).len(), 1);
        let app = tree.children(tree.root())[0];
        assert!(tree.node(app).is_package());
    }

    #[test]
    fn test_dependency_pass_reuses_packages_quietly() {
        let tree = build(r#"{"pkg.__init__": [], "main": ["pkg.__init__", "pkg.extra"]}"#);
        let pkg = child_by_name(&tree, tree.root(), "pkg");
        let package = tree.node(pkg).as_package().expect("pkg is a package");

        // The package came from an analyzed file and stays non-dependency;
        // the module added through the dependency pass is flagged.
        assert!(!package.is_dependency);
        let extra = child_by_name(&tree, pkg, "extra");
        assert!(tree.node(extra).is_dependency());
    }
}
