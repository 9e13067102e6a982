//! Stateful front for a rendering surface.
//!
//! [`OrgChart`] owns the current hierarchy and the last computed layout. A new
//! hierarchy replaces the layout snapshot wholesale, so readers holding an
//! earlier `Arc<Layout>` keep a consistent view. Programmatic scrolling waits
//! for the surface to report it is ready instead of guessing with a delay.

use std::sync::Arc;

use crate::config::Config;
use crate::ir::TreeNode;
use crate::layout::{Layout, LayoutError, compute_layout};
use crate::navigation::{
    Highlight, NavigationError, Query, ScrollTarget, find, scroll_target_for,
};

/// A search hit together with the scroll it triggered. `scroll` is only set
/// when the surface was already ready; otherwise the scroll is queued until
/// [`OrgChart::surface_ready`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub node: &'a TreeNode,
    pub scroll: Option<ScrollTarget>,
}

#[derive(Debug)]
pub struct OrgChart {
    config: Config,
    tree: Option<TreeNode>,
    layout: Arc<Layout>,
    highlight: Highlight,
    pending_scroll: Option<String>,
    surface_ready: bool,
}

impl OrgChart {
    pub fn new(config: Config) -> Self {
        let layout = Layout::empty(&config.layout, &config.viewport);
        Self {
            config,
            tree: None,
            layout: Arc::new(layout),
            highlight: Highlight::default(),
            pending_scroll: None,
            surface_ready: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    pub fn layout(&self) -> Arc<Layout> {
        Arc::clone(&self.layout)
    }

    pub fn highlight_state(&self) -> &Highlight {
        &self.highlight
    }

    /// Replaces the hierarchy and recomputes everything from scratch.
    ///
    /// On a structural error the chart falls back to an empty layout and the
    /// error is returned for the host to display. Queued scrolls belong to the
    /// previous hierarchy and are dropped either way.
    pub fn set_tree(&mut self, tree: Option<TreeNode>) -> Result<(), LayoutError> {
        self.highlight.search_result = None;
        self.pending_scroll = None;
        self.surface_ready = false;
        match compute_layout(tree.as_ref(), &self.config.layout, &self.config.viewport) {
            Ok(layout) => {
                self.tree = tree;
                self.layout = Arc::new(layout);
                Ok(())
            }
            Err(err) => {
                self.tree = None;
                self.layout = Arc::new(Layout::empty(&self.config.layout, &self.config.viewport));
                Err(err)
            }
        }
    }

    /// Sets or clears the highlight requested from outside the chart.
    pub fn highlight(&mut self, id: Option<String>) {
        self.highlight.external = id;
    }

    /// Runs a search, highlights the hit and scrolls to it: immediately when
    /// the surface is ready, otherwise once it reports ready.
    ///
    /// Returns `None` when nothing matches; the previous search highlight is
    /// cleared in that case.
    pub fn search(&mut self, query: &Query) -> Option<SearchHit<'_>> {
        let hit = self
            .tree
            .as_ref()
            .and_then(|root| find(root, |node| query.matches(node)));
        let Some(node) = hit else {
            self.highlight.search_result = None;
            tracing::debug!(?query, "search found no match");
            return None;
        };
        self.highlight.search_result = Some(node.id.clone());
        if !self.surface_ready {
            self.pending_scroll = Some(node.id.clone());
            return Some(SearchHit { node, scroll: None });
        }
        self.pending_scroll = None;
        let scroll = match scroll_target_for(
            &node.id,
            &self.layout,
            &self.config.viewport,
            &self.config.layout,
        ) {
            Ok(target) => Some(target),
            Err(err) => {
                tracing::warn!(%err, "search hit has no position");
                None
            }
        };
        Some(SearchHit { node, scroll })
    }

    /// Scrolls to `id` now if the surface is ready, otherwise queues the
    /// request (the latest request wins) and returns `Ok(None)`.
    pub fn request_scroll(&mut self, id: &str) -> Result<Option<ScrollTarget>, NavigationError> {
        if !self.layout.positions.contains_key(id) {
            return Err(NavigationError::NotFound { id: id.to_string() });
        }
        if self.surface_ready {
            self.pending_scroll = None;
            return self.scroll_target(id).map(Some);
        }
        self.pending_scroll = Some(id.to_string());
        Ok(None)
    }

    /// Called by the surface once it can accept scroll commands. Flushes the
    /// queued request, if any, against the current layout.
    pub fn surface_ready(&mut self) -> Option<ScrollTarget> {
        self.surface_ready = true;
        let id = self.pending_scroll.take()?;
        match self.scroll_target(&id) {
            Ok(target) => Some(target),
            Err(err) => {
                tracing::warn!(%err, "dropping queued scroll");
                None
            }
        }
    }

    pub fn scroll_target(&self, id: &str) -> Result<ScrollTarget, NavigationError> {
        scroll_target_for(id, &self.layout, &self.config.viewport, &self.config.layout)
    }
}

impl Default for OrgChart {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
