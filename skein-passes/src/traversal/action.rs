//! Actions control the traversal of the tree.
use skein_utils::SkeinResult;

/// Result of performing a visit.
pub type VisResult = SkeinResult<Action>;

/// Action performed at the end of visiting a node.
pub enum Action {
    /// Continue traversal into this node's children.
    Continue,
    /// Skip the traversal of this node's children but continue with the
    /// sibling nodes. Handlers that drive their own recursion return this.
    SkipChildren,
    /// Globally abort the traversal.
    Stop,
}
