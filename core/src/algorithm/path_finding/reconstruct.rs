//! Route reconstruction from a predecessor map
//!
//! Safe to call on a partially built map in the middle of a search as well
//! as on the final one.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;

use crate::algorithm::traits::NodeId;

/// Predecessor map: node to the node it was reached from
pub type CameFrom = BTreeMap<NodeId, NodeId>;

/// Walks backwards from `target` to `start` and returns the route in
/// start-to-target order.
///
/// Returns `[start]` when `target == start` and an empty vector when the
/// chain breaks before reaching `start` (target unreachable under this map).
pub fn reconstruct(came_from: &CameFrom, start: NodeId, target: NodeId) -> Vec<NodeId> {
    // A well-formed map is a tree, so no route is longer than this.
    let max_len = came_from.len() + 1;

    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                current = previous;
                path.push(current);
            }
            None => return Vec::new(),
        }
        if path.len() > max_len {
            return Vec::new();
        }
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(pairs: &[(usize, usize)]) -> CameFrom {
        pairs
            .iter()
            .map(|&(node, prev)| (NodeId(node), NodeId(prev)))
            .collect()
    }

    #[test]
    fn test_reconstruct_full_route() {
        let came_from = chain(&[(1, 0), (2, 1), (3, 2)]);
        assert_eq!(
            reconstruct(&came_from, NodeId(0), NodeId(3)),
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]
        );
    }

    #[test]
    fn test_reconstruct_start_is_target() {
        assert_eq!(
            reconstruct(&CameFrom::new(), NodeId(5), NodeId(5)),
            vec![NodeId(5)]
        );
    }

    #[test]
    fn test_reconstruct_unreachable_is_empty() {
        let came_from = chain(&[(1, 0)]);
        assert!(reconstruct(&came_from, NodeId(0), NodeId(7)).is_empty());
    }

    #[test]
    fn test_reconstruct_broken_chain_is_empty() {
        // 3 -> 2, but 2 has no predecessor and is not the start
        let came_from = chain(&[(3, 2)]);
        assert!(reconstruct(&came_from, NodeId(0), NodeId(3)).is_empty());
    }

    #[test]
    fn test_reconstruct_cycle_terminates() {
        let came_from = chain(&[(1, 2), (2, 1)]);
        assert!(reconstruct(&came_from, NodeId(0), NodeId(1)).is_empty());
    }
}
