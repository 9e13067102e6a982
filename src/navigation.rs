//! Search and viewport targeting over a computed [`Layout`].
//!
//! Everything here is read-only: searching walks the tree, scrolling reads the
//! position map, and highlighting is plain data passed on to rendering.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::{LayoutConfig, ViewportConfig};
use crate::ir::TreeNode;
use crate::layout::Layout;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("node `{id}` is not part of the current layout")]
    NotFound { id: String },
}

/// Returns the first node, in pre-order, accepted by `predicate`.
pub fn find<'a, F>(root: &'a TreeNode, mut predicate: F) -> Option<&'a TreeNode>
where
    F: FnMut(&TreeNode) -> bool,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if predicate(node) {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// What the host's search bar or "jump to" action can ask for.
#[derive(Debug, Clone)]
pub enum Query {
    /// Exact id.
    Id(String),
    /// Case-insensitive substring of the id or any display field.
    Text(String),
    /// Case-insensitive substring of one named field.
    Field { name: String, needle: String },
    /// Regular expression over the display fields.
    Pattern(Regex),
}

impl Query {
    pub fn text(needle: &str) -> Self {
        Self::Text(normalize(needle))
    }

    pub fn field(name: impl Into<String>, needle: &str) -> Self {
        Self::Field {
            name: name.into(),
            needle: normalize(needle),
        }
    }

    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self::Pattern)
    }

    pub fn matches(&self, node: &TreeNode) -> bool {
        match self {
            Self::Id(id) => node.id == *id,
            Self::Text(needle) => {
                !needle.is_empty()
                    && (contains_folded(&node.id, needle)
                        || node.fields.values().any(|value| contains_folded(value, needle)))
            }
            Self::Field { name, needle } => {
                !needle.is_empty()
                    && node
                        .field(name)
                        .is_some_and(|value| contains_folded(value, needle))
            }
            Self::Pattern(re) => node.fields.values().any(|value| re.is_match(value)),
        }
    }
}

fn normalize(input: &str) -> String {
    WHITESPACE_RE
        .replace_all(input.trim(), " ")
        .to_lowercase()
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    normalize(haystack).contains(needle)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollTarget {
    pub x: f32,
    pub y: f32,
}

/// Scroll offset that brings `id` into view: horizontally centred, with
/// `top_margin` above it. Never negative, never past the canvas.
pub fn scroll_target_for(
    id: &str,
    layout: &Layout,
    viewport: &ViewportConfig,
    config: &LayoutConfig,
) -> Result<ScrollTarget, NavigationError> {
    let Some(position) = layout.position(id) else {
        tracing::warn!(id, "scroll target not in layout");
        return Err(NavigationError::NotFound { id: id.to_string() });
    };
    let x = position.x - viewport.width / 2.0 + config.node_width / 2.0;
    let y = position.y - config.top_margin;
    let max_x = (layout.canvas.width - viewport.width).max(0.0);
    let max_y = (layout.canvas.height - viewport.height).max(0.0);
    Ok(ScrollTarget {
        x: x.min(max_x).max(0.0),
        y: y.min(max_y).max(0.0),
    })
}

/// Highlight state handed to the renderer. It never affects geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    pub external: Option<String>,
    pub search_result: Option<String>,
}

impl Highlight {
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.external.as_deref() == Some(id) || self.search_result.as_deref() == Some(id)
    }
}
