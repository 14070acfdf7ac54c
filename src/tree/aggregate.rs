use super::arena::{FileTree, NodeId};

/// Compute aggregated sizes for every directory below (and including) `node`, bottom-up.
/// After this, each directory's `size` equals the sum of all descendant file sizes;
/// a directory without children ends up with size 0. Returns the size of `node`.
pub fn aggregate_sizes(tree: &mut FileTree, node: NodeId) -> u64 {
    if node == tree.root {
        // Children always have higher indices than their parents in our arena,
        // so walking the whole arena backwards sees children first.
        for i in (0..tree.nodes.len()).rev() {
            sum_children(tree, NodeId(i as u32));
        }
    } else {
        // Pre-order visits parents first; reversed, it visits children first.
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if !tree.get(id).is_dir {
                continue;
            }
            order.push(id);
            stack.extend(tree.children(id));
        }
        for &id in order.iter().rev() {
            sum_children(tree, id);
        }
    }
    tree.get(node).size
}

/// Set a directory's size to the sum of its direct children.
fn sum_children(tree: &mut FileTree, id: NodeId) {
    if !tree.get(id).is_dir {
        return;
    }
    let total = tree
        .children(id)
        .fold(0u64, |acc, c| acc.saturating_add(tree.get(c).size));
    tree.get_mut(id).size = total;
}

/// Aggregate the whole tree, then order the root's entries largest first.
/// Returns the root size.
pub fn aggregate(tree: &mut FileTree) -> u64 {
    let root = tree.root;
    let total = aggregate_sizes(tree, root);
    sort_children_by_size(tree, root);
    total
}

/// Sort the direct children of `parent` by size (descending).
/// The sort is stable, so equal sizes keep insertion (path) order.
/// This re-links the sibling list without moving nodes in the arena.
pub fn sort_children_by_size(tree: &mut FileTree, parent: NodeId) {
    let mut children: Vec<NodeId> = tree.children(parent).collect();
    children.sort_by_key(|&id| std::cmp::Reverse(tree.get(id).size));
    tree.relink_children(parent, &children);
}
