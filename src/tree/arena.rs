use compact_str::CompactString;

/// Name of the synthetic root that holds the top-level scanned entries.
pub const ROOT_NAME: &str = "root";

/// Index into the arena `Vec<FileNode>`. Uses u32 to save memory (supports up to ~4 billion nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single node in the file tree, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Last path segment (the synthetic root uses [`ROOT_NAME`])
    pub name: CompactString,
    /// Full `/`-separated path from the scan root (empty for the root)
    pub path: CompactString,
    /// Size in bytes. For files: reported size. For dirs: aggregated sum of children.
    pub size: u64,
    /// Whether this node is a directory
    pub is_dir: bool,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// First child node index (None for files / empty dirs)
    pub first_child: Option<NodeId>,
    /// Last child, kept so appends stay O(1)
    pub last_child: Option<NodeId>,
    /// Next sibling node index (None if last child)
    pub next_sibling: Option<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u16,
}

impl FileNode {
    pub fn file(name: &str, path: &str, size: u64) -> Self {
        Self::new(name, path, size, false)
    }

    pub fn dir(name: &str, path: &str) -> Self {
        Self::new(name, path, 0, true)
    }

    fn new(name: &str, path: &str, size: u64, is_dir: bool) -> Self {
        FileNode {
            name: CompactString::new(name),
            path: CompactString::new(path),
            size,
            is_dir,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            depth: 0,
        }
    }
}

/// The file tree stored as a flat arena of nodes.
///
/// Children are kept in insertion order and always sit at higher indices than
/// their parent, so a reverse scan of `nodes` visits children before parents.
#[derive(Debug, Clone)]
pub struct FileTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<FileNode>,
    /// Root node index
    pub root: NodeId,
}

impl FileTree {
    /// Create a tree holding only the synthetic root.
    pub fn new() -> Self {
        FileTree {
            nodes: vec![FileNode::dir(ROOT_NAME, "")],
            root: NodeId(0),
        }
    }

    /// Append a child node under the given parent. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: FileNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth + 1;
        node.next_sibling = None;

        match self.nodes[parent.index()].last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> &FileNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> &mut FileNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether `id` refers to a node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    /// Whether `node` is `ancestor` or lies somewhere below it.
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).parent;
        }
        false
    }

    /// Replace the child list of `parent` with `children`, in that order.
    /// Every id in `children` must already be a child of `parent`.
    pub fn relink_children(&mut self, parent: NodeId, children: &[NodeId]) {
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            return;
        };
        self.nodes[parent.index()].first_child = Some(first);
        self.nodes[parent.index()].last_child = Some(last);
        for w in children.windows(2) {
            self.nodes[w[0].index()].next_sibling = Some(w[1]);
        }
        self.nodes[last.index()].next_sibling = None;
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a FileTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}
