use crate::layout::Layout;
use crate::tree::arena::{FileTree, NodeId};
use crate::ui::navigation::Navigator;

/// Hit-test: find which layout rectangle contains the given point.
/// Returns the topmost (deepest) rectangle at that point.
pub fn hit_test(layout: &Layout, x: f64, y: f64) -> Option<NodeId> {
    // Iterate in reverse since deeper nodes are added later
    layout
        .rects
        .iter()
        .rev()
        .find(|rect| rect.contains(x, y))
        .map(|rect| rect.node)
}

/// Input action produced by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Click on the treemap (drill down into the folder under the cursor)
    Click { x: f64, y: f64 },
    /// Folder picked directly, e.g. from a tree list
    DrillDown { node: NodeId },
    /// Back button, right click or backspace
    NavigateUp,
    /// Display area changed
    Resize { width: f64, height: f64 },
    /// No action
    None,
}

/// Folder a click on `hit` should open: the node itself for directories,
/// otherwise its parent, unless that is already the displayed root.
fn drill_target(tree: &FileTree, view_root: NodeId, hit: NodeId) -> Option<NodeId> {
    let node = tree.get(hit);
    let target = if node.is_dir { hit } else { node.parent? };
    (target != view_root).then_some(target)
}

/// Apply one action to the navigator. Returns true if the view changed.
pub fn handle_action(nav: &mut Navigator, action: InputAction) -> bool {
    match action {
        InputAction::Click { x, y } => {
            let target = nav.current().and_then(|view| {
                let hit = hit_test(view.layout.as_ref()?, x, y)?;
                drill_target(&view.tree, view.root, hit)
            });
            match target {
                Some(node) => nav.drill_into(node),
                None => false,
            }
        }
        InputAction::DrillDown { node } => nav.drill_into(node),
        InputAction::NavigateUp => nav.back(),
        InputAction::Resize { width, height } => {
            let before = nav.viewport();
            nav.resize(width, height);
            nav.viewport() != before
        }
        InputAction::None => false,
    }
}
