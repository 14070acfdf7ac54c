pub mod aggregate;
pub mod arena;

use std::collections::HashMap;

use compact_str::CompactString;

use self::arena::{FileNode, FileTree, NodeId};
use crate::scanner::types::FileRecord;

/// Split a record path into its non-empty `/`-separated segments.
fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

/// Build a FileTree from a flat list of records (sizes are not aggregated yet).
///
/// Records are inserted in byte-wise path order so the result does not depend on
/// input order. Records whose path has no segments are dropped. Intermediate
/// segments reuse an existing directory child of the same name; the last segment
/// always becomes a new file node, so duplicate paths produce duplicate leaves.
pub fn build_tree(records: &[FileRecord]) -> FileTree {
    let mut sorted: Vec<&FileRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));

    let mut tree = FileTree::new();

    // Map from directory path → NodeId for parent lookups
    let mut dir_map: HashMap<CompactString, NodeId> = HashMap::new();
    let mut skipped = 0usize;

    for record in sorted {
        let parts = path_segments(&record.path);
        let Some((file_name, dirs)) = parts.split_last() else {
            tracing::debug!("Skipping record with empty path {:?}", record.path);
            skipped += 1;
            continue;
        };

        let mut parent = tree.root;
        let mut dir_path = String::new();
        for &dir_name in dirs {
            if !dir_path.is_empty() {
                dir_path.push('/');
            }
            dir_path.push_str(dir_name);

            parent = match dir_map.get(dir_path.as_str()) {
                Some(&id) => id,
                None => {
                    let id = tree.add_child(parent, FileNode::dir(dir_name, &dir_path));
                    dir_map.insert(CompactString::new(&dir_path), id);
                    id
                }
            };
        }

        let file_path = if dir_path.is_empty() {
            (*file_name).to_string()
        } else {
            format!("{}/{}", dir_path, file_name)
        };
        tree.add_child(parent, FileNode::file(file_name, &file_path, record.size));
    }

    tracing::debug!(
        "Inserted {} records into {} nodes ({} skipped)",
        records.len() - skipped,
        tree.len(),
        skipped
    );

    tree
}

/// Build the tree and aggregate sizes, ready for layout.
pub fn build_aggregated(records: &[FileRecord]) -> FileTree {
    let mut tree = build_tree(records);
    let total = aggregate::aggregate(&mut tree);

    tracing::info!(
        "Tree built: {} total nodes, {} direct children of root, {} bytes",
        tree.len(),
        tree.children(tree.root).count(),
        total
    );

    tree
}
