use crate::layout::LayoutRect;
use crate::tree::arena::{FileTree, NodeId};

/// Minimum tile size (exclusive) for drawing a file's name inside it.
const LABEL_MIN_WIDTH: f64 = 50.0;
const LABEL_MIN_HEIGHT: f64 = 30.0;

/// Information to display in the tooltip when hovering over a node.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub name: String,
    pub path: String,
    pub size_display: String,
    /// Share of the displayed root, in percent
    pub percent_of_root: f64,
    pub is_dir: bool,
    pub child_count: Option<usize>,
}

/// Build tooltip info for a node hovered inside the view rooted at `view_root`.
pub fn build_tooltip(tree: &FileTree, view_root: NodeId, node_id: NodeId) -> TooltipInfo {
    let node = tree.get(node_id);
    let root_size = tree.get(view_root).size;

    let percent_of_root = if root_size == 0 {
        100.0
    } else {
        node.size as f64 / root_size as f64 * 100.0
    };

    let child_count = if node.is_dir {
        Some(tree.children(node_id).count())
    } else {
        None
    };

    TooltipInfo {
        name: node.name.to_string(),
        path: node.path.to_string(),
        size_display: format_size(node.size),
        percent_of_root,
        is_dir: node.is_dir,
        child_count,
    }
}

/// Tile caption for files large enough to carry one, e.g. `report.pdf (1.50 MB - 12.0%)`.
pub fn label_for(tree: &FileTree, view_root: NodeId, rect: &LayoutRect) -> Option<String> {
    let node = tree.get(rect.node);
    if !shows_label(rect, node.is_dir) {
        return None;
    }
    let info = build_tooltip(tree, view_root, rect.node);
    Some(format!(
        "{} ({} - {:.1}%)",
        info.name, info.size_display, info.percent_of_root
    ))
}

/// Only files get captions, and only on tiles roomy enough to read them.
pub fn shows_label(rect: &LayoutRect, is_dir: bool) -> bool {
    !is_dir && rect.w > LABEL_MIN_WIDTH && rect.h > LABEL_MIN_HEIGHT
}

/// Format bytes into human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
