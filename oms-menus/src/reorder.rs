//! Reorder batch validation
//!
//! Pure, side-effect-free validation of a proposed batch reorder before it
//! is persisted. Input is the current full node set plus the desired end
//! state for some subset of nodes; output is either a fully-normalized
//! placement list ready for one transactional write, or a typed error.
//! All bookkeeping lives in maps local to the call, so concurrent requests
//! never share validation state.

use std::collections::HashMap;

use oms_common::MenuNode;
use serde::Deserialize;
use thiserror::Error;

/// One proposed placement, as submitted by the client.
///
/// An absent (or null) `parent_id` places the node at root level.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderItem {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub order_index: i64,
}

/// A validated placement with its final dense `order_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPlacement {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub order_index: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("unknown menu id {0}")]
    UnknownNode(i64),
    #[error("reorder would create a cycle through menu id {0}")]
    Cycle(i64),
}

/// Validate a proposed reorder against the current node set.
///
/// Three passes:
/// 1. every id referenced by a proposal (including parent ids) must exist;
/// 2. the effective parent map (proposals overlaid on current state) must
///    stay acyclic;
/// 3. every affected sibling group is reindexed to a dense 0..N-1 sequence.
///    Sparse or colliding client indices are tolerated; ties between
///    proposals resolve last-write-wins by input position, and unproposed
///    siblings keep their current relative order.
///
/// Returns placements only for nodes that were proposed or whose stored
/// position actually changes, so untouched rows are not rewritten.
pub fn validate_reorder(
    current: &[MenuNode],
    proposed: &[ReorderItem],
) -> Result<Vec<NormalizedPlacement>, ReorderError> {
    let known: HashMap<i64, &MenuNode> = current.iter().map(|n| (n.id, n)).collect();

    for item in proposed {
        if !known.contains_key(&item.id) {
            return Err(ReorderError::UnknownNode(item.id));
        }
        if let Some(parent) = item.parent_id {
            if !known.contains_key(&parent) {
                return Err(ReorderError::UnknownNode(parent));
            }
        }
    }

    // Overlay: for duplicate ids in the input, the last proposal wins
    let mut overlay: HashMap<i64, (Option<i64>, i64, usize)> = HashMap::new();
    for (position, item) in proposed.iter().enumerate() {
        overlay.insert(item.id, (item.parent_id, item.order_index, position));
    }

    let mut parent_of: HashMap<i64, Option<i64>> = HashMap::with_capacity(current.len());
    for node in current {
        let parent = match overlay.get(&node.id) {
            Some((parent, _, _)) => *parent,
            None => node.parent_id,
        };
        parent_of.insert(node.id, parent);
    }

    detect_cycle(&parent_of)?;

    // Group by effective parent and sort each group by the proposed-or-existing
    // order. Sort key: (order, proposed-before-existing, tiebreak, id) where a
    // later input position wins a contested slot.
    let mut groups: HashMap<Option<i64>, Vec<((i64, i64, i64, i64), i64)>> = HashMap::new();
    for node in current {
        let key = match overlay.get(&node.id) {
            Some((_, order, position)) => (*order, 0, -(*position as i64), node.id),
            None => (node.order_index, 1, node.order_index, node.id),
        };
        groups.entry(parent_of[&node.id]).or_default().push((key, node.id));
    }

    let mut group_parents: Vec<Option<i64>> = groups.keys().copied().collect();
    group_parents.sort_unstable();

    let mut placements = Vec::new();
    for parent in group_parents {
        let mut members = groups.remove(&parent).unwrap_or_default();
        members.sort_unstable_by_key(|(key, _)| *key);

        for (index, (_, id)) in members.into_iter().enumerate() {
            let order_index = index as i64;
            let node = known[&id];
            let changed = parent != node.parent_id || order_index != node.order_index;
            if changed || overlay.contains_key(&id) {
                placements.push(NormalizedPlacement { id, parent_id: parent, order_index });
            }
        }
    }

    Ok(placements)
}

/// Walk parent chains with tri-state marks.
///
/// Each node has at most one parent, so traversal is chain-following rather
/// than general DFS. Nodes proven cycle-free are memoized, keeping the whole
/// check O(N) amortized.
fn detect_cycle(parent_of: &HashMap<i64, Option<i64>>) -> Result<(), ReorderError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        OnPath,
        Done,
    }

    let mut marks: HashMap<i64, Mark> = HashMap::with_capacity(parent_of.len());

    for &start in parent_of.keys() {
        let mut path = Vec::new();
        let mut cursor = start;

        loop {
            match marks.get(&cursor) {
                Some(Mark::Done) => break,
                Some(Mark::OnPath) => return Err(ReorderError::Cycle(cursor)),
                None => {}
            }
            marks.insert(cursor, Mark::OnPath);
            path.push(cursor);

            match parent_of.get(&cursor).copied().flatten() {
                Some(parent) => cursor = parent,
                None => break,
            }
        }

        for id in path {
            marks.insert(id, Mark::Done);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, parent_id: Option<i64>, order_index: i64) -> MenuNode {
        MenuNode {
            id,
            parent_id,
            key_name: format!("key-{}", id),
            label: format!("Node {}", id),
            icon: None,
            path: None,
            roles: Vec::new(),
            is_active: true,
            order_index,
            meta: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            updated_by: None,
        }
    }

    fn item(id: i64, parent_id: Option<i64>, order_index: i64) -> ReorderItem {
        ReorderItem { id, parent_id, order_index }
    }

    fn placement_for(placements: &[NormalizedPlacement], id: i64) -> &NormalizedPlacement {
        placements.iter().find(|p| p.id == id).expect("placement missing")
    }

    #[test]
    fn unknown_id_rejected() {
        let current = vec![node(1, None, 0)];
        let err = validate_reorder(&current, &[item(9999, None, 0)]).unwrap_err();
        assert_eq!(err, ReorderError::UnknownNode(9999));
    }

    #[test]
    fn unknown_parent_rejected() {
        let current = vec![node(1, None, 0)];
        let err = validate_reorder(&current, &[item(1, Some(42), 0)]).unwrap_err();
        assert_eq!(err, ReorderError::UnknownNode(42));
    }

    #[test]
    fn two_node_cycle_rejected() {
        let current = vec![node(1, None, 0), node(2, Some(1), 0)];
        let proposal = vec![item(1, Some(2), 0), item(2, Some(1), 0)];
        assert!(matches!(
            validate_reorder(&current, &proposal),
            Err(ReorderError::Cycle(_))
        ));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let current = vec![node(1, None, 0)];
        assert_eq!(
            validate_reorder(&current, &[item(1, Some(1), 0)]),
            Err(ReorderError::Cycle(1))
        );
    }

    #[test]
    fn deep_chain_is_not_a_cycle() {
        let current = vec![
            node(1, None, 0),
            node(2, Some(1), 0),
            node(3, Some(2), 0),
            node(4, Some(3), 0),
        ];
        // Moving the deepest node up the chain is legal
        let placements = validate_reorder(&current, &[item(4, Some(1), 1)]).unwrap();
        assert_eq!(placement_for(&placements, 4).parent_id, Some(1));
    }

    #[test]
    fn sparse_indices_are_densified() {
        let current = vec![node(1, None, 0), node(2, None, 1), node(3, None, 2)];
        let proposal = vec![item(1, None, 10), item(2, None, 20), item(3, None, 5)];
        let placements = validate_reorder(&current, &proposal).unwrap();

        assert_eq!(placement_for(&placements, 3).order_index, 0);
        assert_eq!(placement_for(&placements, 1).order_index, 1);
        assert_eq!(placement_for(&placements, 2).order_index, 2);
    }

    #[test]
    fn colliding_indices_last_write_wins() {
        let current = vec![node(1, None, 0), node(2, None, 1)];
        // Both claim slot 0; the later proposal (id 2) takes it
        let proposal = vec![item(1, None, 0), item(2, None, 0)];
        let placements = validate_reorder(&current, &proposal).unwrap();

        assert_eq!(placement_for(&placements, 2).order_index, 0);
        assert_eq!(placement_for(&placements, 1).order_index, 1);
    }

    #[test]
    fn moving_out_compacts_the_old_group() {
        let current = vec![
            node(1, None, 0),
            node(2, None, 1),
            node(3, None, 2),
            node(4, Some(1), 0),
        ];
        // Node 2 leaves the root group; node 3 must slide down to index 1
        let placements = validate_reorder(&current, &[item(2, Some(1), 99)]).unwrap();

        let moved = placement_for(&placements, 2);
        assert_eq!(moved.parent_id, Some(1));
        assert_eq!(moved.order_index, 1);
        assert_eq!(placement_for(&placements, 3).order_index, 1);
        // Node 1 and node 4 are untouched and not rewritten
        assert!(placements.iter().all(|p| p.id != 1 && p.id != 4));
    }

    #[test]
    fn full_permutation_of_roots() {
        let current = vec![node(1, None, 0), node(2, None, 1), node(3, None, 2)];
        let proposal = vec![item(3, None, 0), item(1, None, 1), item(2, None, 2)];
        let placements = validate_reorder(&current, &proposal).unwrap();

        assert_eq!(placement_for(&placements, 3).order_index, 0);
        assert_eq!(placement_for(&placements, 1).order_index, 1);
        assert_eq!(placement_for(&placements, 2).order_index, 2);
    }

    #[test]
    fn duplicate_proposal_for_same_id_uses_the_last() {
        let current = vec![node(1, None, 0), node(2, None, 1)];
        let proposal = vec![item(1, None, 0), item(1, None, 5)];
        let placements = validate_reorder(&current, &proposal).unwrap();

        assert_eq!(placement_for(&placements, 1).order_index, 1);
        // Node 2 keeps slot 0 once node 1 asks for the tail
        assert_eq!(placement_for(&placements, 2).order_index, 0);
    }

    #[test]
    fn noop_proposal_still_emits_a_placement() {
        // A proposal that matches stored state is still an explicit mutation
        // request, so it surfaces in the batch (and gets its audit stamp)
        let current = vec![node(1, None, 0)];
        let placements = validate_reorder(&current, &[item(1, None, 0)]).unwrap();
        assert_eq!(
            placements,
            vec![NormalizedPlacement { id: 1, parent_id: None, order_index: 0 }]
        );
    }

    #[test]
    fn empty_proposal_on_dense_state_is_a_noop() {
        let current = vec![node(1, None, 0), node(2, None, 1), node(3, Some(1), 0)];
        let placements = validate_reorder(&current, &[]).unwrap();
        assert!(placements.is_empty());
    }

    #[test]
    fn empty_proposal_still_repairs_sparse_state() {
        // Defensive: pre-existing gaps get compacted even with no proposals
        let current = vec![node(1, None, 3), node(2, None, 7)];
        let placements = validate_reorder(&current, &[]).unwrap();

        assert_eq!(placement_for(&placements, 1).order_index, 0);
        assert_eq!(placement_for(&placements, 2).order_index, 1);
    }
}
