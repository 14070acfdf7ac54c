use crate::error::{DiskmapError, Result};
use crate::layout::{self, Layout, LayoutConfig};
use crate::scanner::types::FileRecord;
use crate::scanner::RecordSource;
use crate::tree::{self, arena::FileTree, arena::NodeId};

/// A view that was left by drilling down, kept so `back` can restore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    pub base_path: String,
    pub root: NodeId,
}

/// One entry of the navigation stack: a scanned tree, the subtree currently
/// shown, and the drill-down history within that tree.
#[derive(Debug)]
pub struct ViewState {
    /// Path the displayed root stands for
    pub base_path: String,
    /// Node currently displayed
    pub root: NodeId,
    /// Earlier `(base_path, root)` pairs, most recent last
    pub history: Vec<ViewEntry>,
    /// The whole scanned tree; drilling only moves `root` within it
    pub tree: FileTree,
    /// Geometry for the current root, absent until a usable viewport is known
    pub layout: Option<Layout>,
    scan_root: String,
}

impl ViewState {
    fn new(base_path: &str, tree: FileTree) -> Self {
        let root = tree.root;
        Self {
            base_path: base_path.to_string(),
            root,
            history: Vec::new(),
            tree,
            layout: None,
            scan_root: base_path.to_string(),
        }
    }

    /// Path the scan producing this view was started from.
    pub fn scan_root(&self) -> &str {
        &self.scan_root
    }

    /// Look up a node by its path relative to the scan root.
    ///
    /// A file and a directory may share a path; the directory wins.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut found = None;
        for (i, node) in self.tree.nodes.iter().enumerate() {
            if node.path.as_str() != path {
                continue;
            }
            let id = NodeId(i as u32);
            if node.is_dir {
                return Some(id);
            }
            found.get_or_insert(id);
        }
        found
    }

    fn relayout(&mut self, viewport: Option<(f64, f64)>, config: &LayoutConfig) {
        let Some((width, height)) = viewport else {
            return;
        };
        if let Some(layout) =
            layout::compute_layout(&self.tree, self.root, 0.0, 0.0, width, height, config)
        {
            self.layout = Some(layout);
        }
    }
}

/// Coarse state of the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    /// No scan yet
    Empty,
    /// At least one view on the stack
    Displaying,
}

/// Navigation state: a stack of scanned views plus the viewport they are laid out in.
pub struct Navigator {
    views: Vec<ViewState>,
    viewport: Option<(f64, f64)>,
    config: LayoutConfig,
}

impl Navigator {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            views: Vec::new(),
            viewport: None,
            config,
        }
    }

    pub fn phase(&self) -> NavPhase {
        if self.views.is_empty() {
            NavPhase::Empty
        } else {
            NavPhase::Displaying
        }
    }

    /// The view on top of the stack.
    pub fn current(&self) -> Option<&ViewState> {
        self.views.last()
    }

    pub fn base_path(&self) -> Option<&str> {
        self.current().map(|v| v.base_path.as_str())
    }

    pub fn viewport(&self) -> Option<(f64, f64)> {
        self.viewport
    }

    /// Number of views on the stack.
    pub fn depth(&self) -> usize {
        self.views.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.views.len() > 1 || self.current().is_some_and(|v| !v.history.is_empty())
    }

    /// Replace everything with a fresh scan of `records` taken under `base_path`.
    ///
    /// With no usable records the navigator is left empty and `EmptyInput` is returned.
    pub fn scan(&mut self, records: &[FileRecord], base_path: &str) -> Result<()> {
        self.views.clear();
        let view = self.make_view(records, base_path)?;
        self.views.push(view);
        Ok(())
    }

    /// Like [`Navigator::scan`], pulling the records from `source`.
    /// A failing source leaves the navigator empty and its error is returned as is.
    pub fn scan_from<S: RecordSource + ?Sized>(&mut self, source: &S, base_path: &str) -> Result<()> {
        self.views.clear();
        let records = source.records().map_err(|e| {
            tracing::error!("Scan of {} failed: {}", base_path, e);
            DiskmapError::Scanner(e)
        })?;
        self.scan(&records, base_path)
    }

    /// Stack a new scan on top of the current views; `back` from its root
    /// reveals the previous scan again.
    pub fn push_scan(&mut self, records: &[FileRecord], base_path: &str) -> Result<()> {
        let view = self.make_view(records, base_path)?;
        self.views.push(view);
        Ok(())
    }

    fn make_view(&self, records: &[FileRecord], base_path: &str) -> Result<ViewState> {
        let tree = tree::build_aggregated(records);
        if tree.is_empty() {
            tracing::warn!("Scan of {} produced no usable records", base_path);
            return Err(DiskmapError::EmptyInput);
        }

        let mut view = ViewState::new(base_path, tree);
        view.relayout(self.viewport, &self.config);
        if view.layout.is_none() {
            tracing::debug!("No viewport yet, layout deferred until the first resize");
        }
        tracing::info!(
            "Displaying {} ({} nodes, {} bytes)",
            base_path,
            view.tree.len(),
            view.tree.get(view.root).size
        );
        Ok(view)
    }

    /// Lay the top view out again for a new viewport.
    ///
    /// Non-positive sizes are logged and ignored; the previous layout stays.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            tracing::warn!("Ignoring invalid viewport {}x{}", width, height);
            return;
        }
        self.viewport = Some((width, height));
        let viewport = self.viewport;
        if let Some(view) = self.views.last_mut() {
            view.relayout(viewport, &self.config);
        }
    }

    /// Show `folder` as the root of the top view, remembering the current root.
    ///
    /// Returns false for files, the current root itself, and nodes outside the
    /// currently displayed subtree.
    pub fn drill_into(&mut self, folder: NodeId) -> bool {
        let viewport = self.viewport;
        let Some(view) = self.views.last_mut() else {
            return false;
        };
        if !view.tree.contains(folder) || folder == view.root {
            return false;
        }
        if !view.tree.get(folder).is_dir || !view.tree.is_descendant_of(folder, view.root) {
            return false;
        }

        view.history.push(ViewEntry {
            base_path: std::mem::take(&mut view.base_path),
            root: view.root,
        });
        view.root = folder;
        view.base_path = join_path(&view.scan_root, &view.tree.get(folder).path);
        view.relayout(viewport, &self.config);

        tracing::info!("Drilled into {}", view.base_path);
        true
    }

    /// Undo the last navigation step.
    ///
    /// Pops the top view's drill-down history if it has any, otherwise drops the
    /// whole top view to reveal the previous scan. Returns false when there is
    /// nothing to go back to.
    pub fn back(&mut self) -> bool {
        let viewport = self.viewport;
        let stack_len = self.views.len();
        let Some(view) = self.views.last_mut() else {
            return false;
        };

        if let Some(prev) = view.history.pop() {
            view.base_path = prev.base_path;
            view.root = prev.root;
            view.relayout(viewport, &self.config);
            tracing::info!("Back to {}", view.base_path);
            return true;
        }

        if stack_len > 1 {
            self.views.pop();
            if let Some(view) = self.views.last_mut() {
                view.relayout(viewport, &self.config);
                tracing::info!("Back to previous scan {}", view.base_path);
            }
            return true;
        }

        false
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

fn join_path(base: &str, relative: &str) -> String {
    if base.is_empty() {
        relative.to_string()
    } else if relative.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), relative)
    }
}
