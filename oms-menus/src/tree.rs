//! Nested tree assembly from flat menu rows
//!
//! Siblings are ordered by `order_index` (then id, for stability when the
//! stored state is degenerate). Nodes whose declared parent is missing from
//! the input set still become roots, matching the behavior the admin
//! front-end has always relied on, but their ids are surfaced in a separate
//! diagnostic list instead of being silently flattened.

use std::collections::{HashMap, HashSet};

use oms_common::{MenuNode, MenuTreeNode};

/// Result of tree assembly: the nested forest plus orphan diagnostics.
#[derive(Debug, Clone)]
pub struct TreeBuild {
    pub roots: Vec<MenuTreeNode>,
    /// Ids of nodes promoted to root because their parent was not in the
    /// input set (deleted or inactive parent)
    pub orphans: Vec<i64>,
}

/// Build a nested forest from a flat node list.
pub fn build_tree(nodes: Vec<MenuNode>) -> TreeBuild {
    let ids: HashSet<i64> = nodes.iter().map(|n| n.id).collect();

    let mut orphans = Vec::new();
    let mut by_parent: HashMap<Option<i64>, Vec<MenuNode>> = HashMap::new();

    for node in nodes {
        let slot = match node.parent_id {
            Some(parent) if ids.contains(&parent) => Some(parent),
            Some(_) => {
                orphans.push(node.id);
                None
            }
            None => None,
        };
        by_parent.entry(slot).or_default().push(node);
    }

    orphans.sort_unstable();

    TreeBuild {
        roots: assemble(None, &mut by_parent),
        orphans,
    }
}

fn assemble(
    parent: Option<i64>,
    by_parent: &mut HashMap<Option<i64>, Vec<MenuNode>>,
) -> Vec<MenuTreeNode> {
    let mut group = by_parent.remove(&parent).unwrap_or_default();
    group.sort_by_key(|n| (n.order_index, n.id));

    group
        .into_iter()
        .map(|node| {
            let children = assemble(Some(node.id), by_parent);
            MenuTreeNode { node, children }
        })
        .collect()
}
