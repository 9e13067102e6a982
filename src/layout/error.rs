use thiserror::Error;

/// Structural problems in the input hierarchy. Any of these aborts the
/// layout pass; no partial positions are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("node `{id}` appears more than once in the hierarchy")]
    DuplicateNode { id: String },
    #[error("parent chain of node `{id}` loops back on itself")]
    Cycle { id: String },
    #[error("hierarchy has more than one root (`{first}`, `{second}`)")]
    MultipleRoots { first: String, second: String },
    #[error("hierarchy is deeper than {max_depth} levels at node `{id}`")]
    DepthExceeded { id: String, max_depth: usize },
}
