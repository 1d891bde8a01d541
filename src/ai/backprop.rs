//! Leaf-to-root value updates

use super::mcts::{NodeId, Tree};
use super::params::BackpropKind;

/// Walk from the rollout leaf up through every ancestor to the root,
/// folding the rollout result into each node. The discounted rule decays
/// the contribution by each ancestor's own depth, so near-root nodes
/// receive larger-magnitude credit than deep nodes for the same outcome.
pub fn back_up(tree: &mut Tree, leaf: NodeId, result: f64, kind: BackpropKind, discount: f64) {
    let mut cursor = Some(leaf);
    while let Some(id) = cursor {
        let node = tree.node_mut(id);
        let contribution = match kind {
            BackpropKind::Plain => result,
            BackpropKind::Discounted => result * discount.powi(node.depth as i32),
        };
        node.absorb(contribution);
        cursor = node.parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> child -> grandchild chain over a 3-action space
    fn chain() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new(3);
        let child = tree.add_child(Tree::ROOT, 1, 0);
        let grandchild = tree.add_child(child, 0, 0);
        (tree, child, grandchild)
    }

    #[test]
    fn test_plain_backup_counts_and_sums() {
        let (mut tree, child, grandchild) = chain();

        back_up(&mut tree, grandchild, 2.5, BackpropKind::Plain, 0.9);
        back_up(&mut tree, child, -1.0, BackpropKind::Plain, 0.9);

        assert_eq!(tree.node(Tree::ROOT).visits, 2);
        assert_eq!(tree.node(child).visits, 2);
        assert_eq!(tree.node(grandchild).visits, 1);

        assert_eq!(tree.node(Tree::ROOT).value, 1.5);
        assert_eq!(tree.node(child).value, 1.5);
        assert_eq!(tree.node(grandchild).value, 2.5);

        assert_eq!(tree.node(Tree::ROOT).bounds, [-1.0, 2.5]);
    }

    #[test]
    fn test_discounted_backup_decays_by_ancestor_depth() {
        let (mut tree, child, grandchild) = chain();
        let result = 2.0;
        let discount = 0.5;

        back_up(&mut tree, grandchild, result, BackpropKind::Discounted, discount);

        // each ancestor is decayed by its own depth, not the leaf's
        assert_eq!(tree.node(grandchild).value, result * discount * discount);
        assert_eq!(tree.node(child).value, result * discount);
        assert_eq!(tree.node(Tree::ROOT).value, result);
    }

    #[test]
    fn test_discounted_backup_bounds_use_discounted_values() {
        let (mut tree, child, grandchild) = chain();

        back_up(&mut tree, grandchild, 4.0, BackpropKind::Discounted, 0.5);

        assert_eq!(tree.node(grandchild).bounds, [1.0, 1.0]);
        assert_eq!(tree.node(child).bounds, [2.0, 2.0]);
        assert_eq!(tree.node(Tree::ROOT).bounds, [4.0, 4.0]);
    }

    #[test]
    fn test_visit_count_equals_rollouts_through_subtree() {
        let (mut tree, child, grandchild) = chain();
        let sibling = tree.add_child(Tree::ROOT, 2, 0);

        for _ in 0..3 {
            back_up(&mut tree, grandchild, 1.0, BackpropKind::Plain, 1.0);
        }
        for _ in 0..2 {
            back_up(&mut tree, sibling, 1.0, BackpropKind::Plain, 1.0);
        }

        assert_eq!(tree.node(grandchild).visits, 3);
        assert_eq!(tree.node(child).visits, 3);
        assert_eq!(tree.node(sibling).visits, 2);
        assert_eq!(tree.node(Tree::ROOT).visits, 5);
    }
}
