use serde::Serialize;

use crate::layout::Layout;
use crate::render::colors::Rgb;
use crate::tree::arena::{FileTree, NodeId};
use crate::ui::navigation::Navigator;

/// Everything a presentation layer needs to draw the current view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub base_path: String,
    pub can_go_back: bool,
    pub root: SnapshotNode,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A node of the displayed subtree with its geometry, if it was laid out.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotNode {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<SnapshotRect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

/// Snapshot of the top view, or `None` before the first scan.
pub fn snapshot(nav: &Navigator) -> Option<ViewSnapshot> {
    let view = nav.current()?;
    Some(ViewSnapshot {
        base_path: view.base_path.clone(),
        can_go_back: nav.can_go_back(),
        root: snapshot_node(&view.tree, view.layout.as_ref(), view.root),
    })
}

fn snapshot_node(tree: &FileTree, layout: Option<&Layout>, id: NodeId) -> SnapshotNode {
    let node = tree.get(id);
    let placed = layout.and_then(|l| l.get(id));
    SnapshotNode {
        name: node.name.to_string(),
        path: node.path.to_string(),
        size: node.size,
        is_dir: node.is_dir,
        rect: placed.map(|r| SnapshotRect {
            x: r.x,
            y: r.y,
            width: r.w,
            height: r.h,
        }),
        color: placed.map(|r| r.color),
        children: tree
            .children(id)
            .map(|child| snapshot_node(tree, layout, child))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::types::FileRecord;

    fn records() -> Vec<FileRecord> {
        vec![
            FileRecord::new("a/b.txt", 100),
            FileRecord::new("a/c.txt", 300),
            FileRecord::new("d.txt", 50),
            FileRecord::new("e.txt", 0),
        ]
    }

    #[test]
    fn no_snapshot_before_scan() {
        assert!(snapshot(&Navigator::default()).is_none());
    }

    #[test]
    fn snapshot_mirrors_tree_and_geometry() {
        let mut nav = Navigator::default();
        nav.resize(450.0, 100.0);
        nav.scan(&records(), "/data").unwrap();

        let snap = snapshot(&nav).unwrap();
        assert_eq!(snap.base_path, "/data");
        assert!(!snap.can_go_back);
        assert_eq!(snap.root.size, 450);

        let names: Vec<&str> = snap.root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "d.txt", "e.txt"]);
        assert!(snap.root.children[0].rect.is_some());
        assert!(snap.root.children[2].rect.is_none());
        assert!(snap.root.children[2].color.is_none());

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["root"]["children"][0]["children"][1]["path"], "a/c.txt");
        assert!(json["root"]["children"][0]["color"].as_str().unwrap().starts_with('#'));
        assert!(json["root"]["children"][2].get("rect").is_none());
    }

    #[test]
    fn snapshot_without_viewport_has_no_geometry() {
        let mut nav = Navigator::default();
        nav.scan(&records(), "/data").unwrap();
        let snap = snapshot(&nav).unwrap();
        assert!(snap.root.rect.is_none());
        assert!(snap.root.children.iter().all(|c| c.rect.is_none()));
    }
}
