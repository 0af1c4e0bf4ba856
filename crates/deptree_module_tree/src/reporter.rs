use colored::Colorize;
use log::debug;
use std::io::{self, Write};

use crate::analyzer::Analysis;
use crate::color::ColorCache;
use crate::node::Node;
use crate::stats::DependencyStats;
use crate::tree::{ModuleTree, NodeId};
use crate::visibility::{DrawOptions, VisibilityCache};

/// Writes the package tree under a sparkling header line.
///
/// Labels are tinted by their direct relations against the global quantile;
/// the guide lane of every child is tinted by its total relations against
/// the parent's per-children threshold. When the root keeps only one
/// visible child, that child takes the root's place to skip a one-lane
/// level.
pub fn print_tree<W: Write>(
    writer: &mut W,
    analysis: &Analysis,
    options: DrawOptions,
) -> io::Result<()> {
    let tree = &analysis.tree;
    let mut visibility = VisibilityCache::new();
    let mut colors = ColorCache::new();
    debug!("Drawing the tree with {options:?}");

    writeln!(
        writer,
        "✨✨✨ {}",
        format!("{} modules ✨✨✨", analysis.root_name).green().bold()
    )?;

    let root = tree.root();
    let visible: Vec<NodeId> = tree
        .children(root)
        .iter()
        .copied()
        .filter(|&child| visibility.is_visible(tree, child, options))
        .collect();
    let top = if visible.len() == 1 { visible[0] } else { root };

    if visibility.is_visible(tree, top, options) {
        let connector = "└── ".dimmed();
        writeln!(writer, "{connector}{}", label(tree.node(top), options, &mut colors))?;
        print_children(writer, tree, top, "    ", options, &mut visibility, &mut colors)?;
    }
    writer.flush()
}

fn print_children<W: Write>(
    writer: &mut W,
    tree: &ModuleTree,
    id: NodeId,
    prefix: &str,
    options: DrawOptions,
    visibility: &mut VisibilityCache,
    colors: &mut ColorCache,
) -> io::Result<()> {
    let threshold = match tree.node(id) {
        Node::Package(package) => package.children_quantile,
        Node::Module(_) => return Ok(()),
    };

    let visible: Vec<NodeId> = tree
        .children(id)
        .iter()
        .copied()
        .filter(|&child| visibility.is_visible(tree, child, options))
        .collect();

    for (position, &child) in visible.iter().enumerate() {
        let last = position + 1 == visible.len();
        let connector = if last { "└── " } else { "├── " };
        let extension = if last { "    " } else { "│   " };

        let (connector, extension) = if options.only_deps {
            (connector.dimmed().to_string(), extension.dimmed().to_string())
        } else {
            let guide = colors.heat(tree.total_relations(child), threshold);
            (connector.color(guide).to_string(), extension.color(guide).to_string())
        };

        writeln!(writer, "{prefix}{connector}{}", label(tree.node(child), options, colors))?;
        let child_prefix = format!("{prefix}{extension}");
        print_children(writer, tree, child, &child_prefix, options, visibility, colors)?;
    }
    Ok(())
}

fn label(node: &Node, options: DrawOptions, colors: &mut ColorCache) -> String {
    let star = if node.is_dependency() { "*" } else { "" };
    let text = match node {
        Node::Module(module) => format!("{}{star} ({})", module.name, module.direct_relations),
        Node::Package(package) => format!(
            "{}{star} ({}) {{{}}}",
            package.name, package.direct_relations, package.children_relations
        ),
    };

    if options.only_deps {
        return text;
    }
    let color = colors.heat(node.direct_relations(), options.dependencies_quantile);
    text.color(color).to_string()
}

/// Writes the statistics footer. Without any counted dependencies only the
/// heading is printed.
pub fn print_stats<W: Write>(
    writer: &mut W,
    percentile: f64,
    dependencies_quantile: usize,
    stats: Option<&DependencyStats>,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Dependencies statistics:")?;
    let Some(stats) = stats else {
        return writer.flush();
    };
    writeln!(writer, "Arithmetic mean: {}", stats.mean)?;
    writeln!(writer, "Median (middle value): {}", stats.median)?;
    writeln!(writer, "Quantile ({percentile}%): {dependencies_quantile}")?;
    writer.flush()
}
