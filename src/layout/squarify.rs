use std::collections::HashMap;

use crate::render::colors::{color_of, Rgb, DEFAULT_BASE_COLOR};
use crate::tree::arena::{FileTree, NodeId};

/// A positioned, colored rectangle in the treemap layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Layout depth: 0 for the view root, +1 per level of subdivision
    pub depth: u32,
    pub color: Rgb,
}

impl LayoutRect {
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Half-open containment: the right and bottom edges belong to the neighbour.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// The full layout result (rects + fast lookup).
///
/// Rebuilt from scratch on every call, so geometry from an earlier viewport can
/// never leak into a later one. Nodes with zero size never appear.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Parents always precede their children
    pub rects: Vec<LayoutRect>,
    /// node → index into `rects`
    pub node_to_rect: HashMap<NodeId, usize>,
}

impl Layout {
    pub fn get(&self, node: NodeId) -> Option<&LayoutRect> {
        self.node_to_rect.get(&node).map(|&i| &self.rects[i])
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Insert or overwrite the rectangle of `rect.node`.
    fn place(&mut self, rect: LayoutRect) {
        match self.node_to_rect.get(&rect.node) {
            Some(&i) => self.rects[i] = rect,
            None => {
                self.node_to_rect.insert(rect.node, self.rects.len());
                self.rects.push(rect);
            }
        }
    }
}

/// Configuration for treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Color files are tinted from
    pub base_color: Rgb,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_color: DEFAULT_BASE_COLOR,
        }
    }
}

/// Compute layout for any subtree (root can be any directory for drill-down).
///
/// Returns `None` when the rectangle has no area; callers keep whatever layout
/// they had before.
pub fn compute_layout(
    tree: &FileTree,
    root: NodeId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Option<Layout> {
    if !(width > 0.0 && height > 0.0) {
        tracing::warn!("Invalid layout dimensions {}x{}, skipping layout", width, height);
        return None;
    }

    let mut layout = Layout {
        rects: Vec::new(),
        node_to_rect: HashMap::new(),
    };
    let mut engine = Squarifier {
        tree,
        base_color: config.base_color,
        layout: &mut layout,
    };
    engine.layout_node(root, x, y, width, height, 0);

    tracing::debug!(
        "Layout computed: {} rectangles in {:.0}x{:.0}",
        layout.rects.len(),
        width,
        height
    );
    Some(layout)
}

struct Squarifier<'a> {
    tree: &'a FileTree,
    base_color: Rgb,
    layout: &'a mut Layout,
}

impl Squarifier<'_> {
    fn layout_node(&mut self, id: NodeId, x: f64, y: f64, w: f64, h: f64, depth: u32) {
        if !(w > 0.0 && h > 0.0) {
            tracing::warn!("Invalid dimensions {}x{} for node {:?}", w, h, id);
            return;
        }

        let tree = self.tree;
        let node = tree.get(id);
        self.layout.place(LayoutRect {
            node: id,
            x,
            y,
            w,
            h,
            depth,
            color: color_of(self.base_color, depth, 0.0, node.is_dir),
        });

        if !node.is_dir {
            return;
        }

        // Zero-size children cannot get a positive area, so they take no part in packing.
        let mut children: Vec<(NodeId, f64)> = tree
            .children(id)
            .filter(|&c| tree.get(c).size > 0)
            .map(|c| (c, tree.get(c).size as f64))
            .collect();
        if children.is_empty() {
            return;
        }
        // Stable: equal sizes keep sibling order.
        children.sort_by(|a, b| b.1.total_cmp(&a.1));
        let total: f64 = children.iter().map(|&(_, s)| s).sum();

        let mut row: Vec<(NodeId, f64)> = Vec::new();
        let mut current_y = y;
        let mut remaining_h = h;
        let mut i = 0;

        while i < children.len() {
            row.push(children[i]);
            let keep = row.len() == 1
                || worst_score(&row, w) <= worst_score(&row[..row.len() - 1], w);
            if keep {
                i += 1;
                continue;
            }

            // The candidate opens the next row instead.
            row.pop();
            let row_size: f64 = row.iter().map(|&(_, s)| s).sum();
            let row_h = row_size / total * h;
            self.layout_row(&row, x, current_y, w, row_h, depth + 1);
            current_y += row_h;
            remaining_h -= row_h;
            row.clear();
        }

        if !row.is_empty() {
            // The last row takes whatever height is left so rounding never leaves a gap.
            self.layout_row(&row, x, current_y, w, remaining_h.max(0.0), depth + 1);
        }
    }

    /// Fill one full-width row left to right, widths proportional to size.
    fn layout_row(&mut self, row: &[(NodeId, f64)], x: f64, y: f64, w: f64, h: f64, depth: u32) {
        let tree = self.tree;
        let row_size: f64 = row.iter().map(|&(_, s)| s).sum();
        let count = row.len() as f64;
        let mut offset = x;

        for (i, &(id, size)) in row.iter().enumerate() {
            let node_w = size / row_size * w;
            let node = tree.get(id);
            self.layout.place(LayoutRect {
                node: id,
                x: offset,
                y,
                w: node_w,
                h,
                depth,
                color: color_of(self.base_color, depth, i as f64 / count, node.is_dir),
            });

            // A directory with a positive size has at least one sized child.
            if node.is_dir {
                self.layout_node(id, offset, y, node_w, h, depth);
            }
            offset += node_w;
        }
    }
}

/// Aspect-ratio penalty of laying `row` out across `width`; lower is squarer.
///
/// Callers guarantee `width > 0` and positive sizes, so `row_size` and every
/// child width are positive. An empty row never beats anything.
fn worst_score(row: &[(NodeId, f64)], width: f64) -> f64 {
    if row.is_empty() {
        return f64::INFINITY;
    }
    let row_size: f64 = row.iter().map(|&(_, s)| s).sum();
    let (min_w, max_w) = row.iter().fold((f64::INFINITY, 0.0f64), |(lo, hi), &(_, s)| {
        let child_w = s / row_size * width;
        (lo.min(child_w), hi.max(child_w))
    });
    let width_sq = width * width;
    let size_sq = row_size * row_size;
    (width_sq * max_w / size_sq).max(size_sq / (width_sq * min_w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::types::FileRecord;
    use crate::tree::build_aggregated;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn tree_of(items: &[(&str, u64)]) -> FileTree {
        let records: Vec<FileRecord> = items.iter().map(|&(p, s)| FileRecord::new(p, s)).collect();
        build_aggregated(&records)
    }

    fn find(tree: &FileTree, path: &str) -> NodeId {
        let i = tree.nodes.iter().position(|n| n.path.as_str() == path).unwrap();
        NodeId(i as u32)
    }

    fn layout_of(tree: &FileTree, w: f64, h: f64) -> Layout {
        compute_layout(tree, tree.root, 0.0, 0.0, w, h, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn example_layout_gives_proportional_columns() {
        let tree = tree_of(&[("a/b.txt", 100), ("a/c.txt", 300), ("d.txt", 50)]);
        let layout = layout_of(&tree, 450.0, 100.0);

        let a = layout.get(find(&tree, "a")).unwrap();
        let d = layout.get(find(&tree, "d.txt")).unwrap();
        assert!((a.w - 400.0).abs() < EPS && (a.h - 100.0).abs() < EPS);
        assert!((d.w - 50.0).abs() < EPS && (d.h - 100.0).abs() < EPS);
        assert!((d.x - 400.0).abs() < EPS);

        let b = layout.get(find(&tree, "a/b.txt")).unwrap();
        let c = layout.get(find(&tree, "a/c.txt")).unwrap();
        assert!((c.area() / b.area() - 3.0).abs() < EPS);
        // Larger child is placed first.
        assert!(c.x < b.x);
    }

    #[test]
    fn root_covers_viewport_and_is_colored_at_depth_zero() {
        let tree = tree_of(&[("a/b.txt", 1)]);
        let layout = layout_of(&tree, 320.0, 200.0);
        let root = layout.get(tree.root).unwrap();
        assert_eq!((root.x, root.y, root.w, root.h), (0.0, 0.0, 320.0, 200.0));
        assert_eq!(root.color, color_of(DEFAULT_BASE_COLOR, 0, 0.0, true));
        assert_eq!(layout.rects[0].node, tree.root);
    }

    #[test]
    fn single_child_fills_parent() {
        let tree = tree_of(&[("only.bin", 42)]);
        let layout = layout_of(&tree, 1920.0, 1080.0);
        let r = layout.get(find(&tree, "only.bin")).unwrap();
        assert!((r.w - 1920.0).abs() < EPS);
        assert!((r.h - 1080.0).abs() < EPS);
        assert_eq!(r.depth, 1);
    }

    #[test]
    fn row_members_get_position_based_colors() {
        let tree = tree_of(&[("x", 100), ("y", 100)]);
        let layout = layout_of(&tree, 200.0, 100.0);
        let x = layout.get(find(&tree, "x")).unwrap();
        let y = layout.get(find(&tree, "y")).unwrap();
        assert_eq!(x.color, color_of(DEFAULT_BASE_COLOR, 1, 0.0, false));
        assert_eq!(y.color, color_of(DEFAULT_BASE_COLOR, 1, 0.5, false));
    }

    #[test]
    fn subdivided_directory_is_recolored_by_its_own_layout() {
        // "dir" sits second in its row, but its own layout pass repaints it at position 0.
        let tree = tree_of(&[("dir/a", 5), ("dir/b", 5), ("z", 30)]);
        let layout = layout_of(&tree, 300.0, 100.0);
        let dir = layout.get(find(&tree, "dir")).unwrap();
        assert!(dir.x > 0.0);
        assert_eq!(dir.color, color_of(DEFAULT_BASE_COLOR, 1, 0.0, true));
    }

    #[test]
    fn tall_viewport_stacks_rows() {
        let tree = tree_of(&[("a", 50), ("b", 30), ("c", 20)]);
        let layout = layout_of(&tree, 10.0, 100.0);
        let a = layout.get(find(&tree, "a")).unwrap();
        let b = layout.get(find(&tree, "b")).unwrap();
        let c = layout.get(find(&tree, "c")).unwrap();
        // Each ends up in its own full-width row.
        for r in [a, b, c] {
            assert!((r.w - 10.0).abs() < EPS);
        }
        assert!((a.h - 50.0).abs() < EPS);
        assert!((b.y - 50.0).abs() < EPS);
        assert!((c.y + c.h - 100.0).abs() < EPS);
    }

    #[test]
    fn rows_break_where_aspect_ratio_worsens() {
        let tree = tree_of(&[
            ("a", 6),
            ("b", 6),
            ("c", 4),
            ("d", 3),
            ("e", 2),
            ("f", 2),
            ("g", 1),
        ]);
        let layout = layout_of(&tree, 6.0, 4.0);
        let expected = [
            ("a", 0.0, 0.0, 3.0, 2.0),
            ("b", 3.0, 0.0, 3.0, 2.0),
            ("c", 0.0, 2.0, 8.0 / 3.0, 1.5),
            ("d", 8.0 / 3.0, 2.0, 2.0, 1.5),
            ("e", 14.0 / 3.0, 2.0, 4.0 / 3.0, 1.5),
            ("f", 0.0, 3.5, 4.0, 0.5),
            ("g", 4.0, 3.5, 2.0, 0.5),
        ];
        for (name, x, y, w, h) in expected {
            let r = layout.get(find(&tree, name)).unwrap();
            assert!(
                (r.x - x).abs() < EPS
                    && (r.y - y).abs() < EPS
                    && (r.w - w).abs() < EPS
                    && (r.h - h).abs() < EPS,
                "{}: got {:?}",
                name,
                (r.x, r.y, r.w, r.h)
            );
        }
    }

    #[test]
    fn zero_size_children_get_no_geometry() {
        let tree = tree_of(&[("a/empty.txt", 0), ("a/full.txt", 10), ("nothing/x", 0)]);
        let layout = layout_of(&tree, 100.0, 100.0);
        assert!(layout.get(find(&tree, "a/empty.txt")).is_none());
        assert!(layout.get(find(&tree, "nothing")).is_none());
        assert!(layout.get(find(&tree, "nothing/x")).is_none());
        assert!(layout.get(find(&tree, "a/full.txt")).is_some());
    }

    #[test]
    fn all_zero_tree_lays_out_root_only() {
        let tree = tree_of(&[("a", 0), ("b", 0)]);
        let layout = layout_of(&tree, 100.0, 100.0);
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn degenerate_viewport_produces_nothing() {
        let tree = tree_of(&[("a", 1)]);
        let config = LayoutConfig::default();
        assert!(compute_layout(&tree, tree.root, 0.0, 0.0, 0.0, 100.0, &config).is_none());
        assert!(compute_layout(&tree, tree.root, 0.0, 0.0, 100.0, 0.0, &config).is_none());
        assert!(compute_layout(&tree, tree.root, 0.0, 0.0, -5.0, 100.0, &config).is_none());
        assert!(compute_layout(&tree, tree.root, 0.0, 0.0, f64::NAN, 100.0, &config).is_none());
    }

    #[test]
    fn subtree_layout_starts_at_depth_zero() {
        let tree = tree_of(&[("a/b", 1), ("a/c", 3), ("d", 1)]);
        let a = find(&tree, "a");
        let layout = compute_layout(&tree, a, 0.0, 0.0, 40.0, 10.0, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.get(a).unwrap().depth, 0);
        assert!(layout.get(find(&tree, "d")).is_none());
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn worst_score_prefers_square_rows() {
        let id = NodeId(0);
        assert_eq!(worst_score(&[], 10.0), f64::INFINITY);
        let one = worst_score(&[(id, 400.0)], 450.0);
        let two = worst_score(&[(id, 400.0), (id, 50.0)], 450.0);
        assert!(two < one);
    }

    fn overlap(a: &LayoutRect, b: &LayoutRect) -> f64 {
        let w = (a.x + a.w).min(b.x + b.w) - a.x.max(b.x);
        let h = (a.y + a.h).min(b.y + b.h) - a.y.max(b.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    proptest! {
        #[test]
        fn children_tile_their_parent(
            items in prop::collection::vec(("[abc](/[abcd]){0,3}", 0u64..1000), 1..30),
            w in 10.0f64..2000.0,
            h in 10.0f64..2000.0,
        ) {
            let records: Vec<FileRecord> = items.iter().map(|(p, s)| FileRecord::new(p.clone(), *s)).collect();
            let tree = build_aggregated(&records);
            let layout = layout_of(&tree, w, h);

            for parent in &layout.rects {
                let node = tree.get(parent.node);
                let kids: Vec<&LayoutRect> = tree
                    .children(parent.node)
                    .filter_map(|c| layout.get(c))
                    .collect();
                if kids.is_empty() {
                    continue;
                }
                let tol = 1e-6 * parent.area().max(1.0);

                let covered: f64 = kids.iter().map(|k| k.area()).sum();
                prop_assert!((covered - parent.area()).abs() < tol);

                for k in &kids {
                    let share = tree.get(k.node).size as f64 / node.size as f64;
                    prop_assert!((k.area() - share * parent.area()).abs() < tol);
                    prop_assert!(k.x >= parent.x - 1e-6 && k.x + k.w <= parent.x + parent.w + 1e-6);
                    prop_assert!(k.y >= parent.y - 1e-6 && k.y + k.h <= parent.y + parent.h + 1e-6);
                }
                for (i, a) in kids.iter().enumerate() {
                    for b in &kids[i + 1..] {
                        prop_assert!(overlap(a, b) < tol);
                    }
                }
            }

            for (i, node) in tree.nodes.iter().enumerate() {
                if node.size == 0 {
                    prop_assert!(layout.get(NodeId(i as u32)).is_none() || i == 0);
                }
            }
        }

        #[test]
        fn relayout_is_idempotent(
            items in prop::collection::vec(("[ab](/[ab]){0,2}", 1u64..500), 1..15),
            w in 1.0f64..1000.0,
            h in 1.0f64..1000.0,
        ) {
            let records: Vec<FileRecord> = items.iter().map(|(p, s)| FileRecord::new(p.clone(), *s)).collect();
            let tree = build_aggregated(&records);
            prop_assert_eq!(layout_of(&tree, w, h), layout_of(&tree, w, h));
        }
    }
}
