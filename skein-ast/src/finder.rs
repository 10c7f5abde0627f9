//! Read-only queries over the tree.
use crate::{Kind, Node, RRC};

/// Default depth bound for queries; deep enough for any real script.
pub const MAX_DEPTH: usize = 1024;

/// Return all nodes under `root` (inclusive, pre-order) that match `kind`
/// and `pred`, descending at most `maxdepth` levels. The root sits at depth
/// 0 and the result order follows child-list order.
pub fn find_all(
    root: &RRC<Node>,
    kind: Option<Kind>,
    pred: Option<&dyn Fn(&Node) -> bool>,
    maxdepth: usize,
) -> Vec<RRC<Node>> {
    let mut matches = Vec::new();
    visit(root, kind, pred, 0, maxdepth, &mut matches);
    matches
}

/// [`find_all`] restricted by kind only, with the default depth bound.
pub fn find_kind(root: &RRC<Node>, kind: Kind) -> Vec<RRC<Node>> {
    find_all(root, Some(kind), None, MAX_DEPTH)
}

fn visit(
    node: &RRC<Node>,
    kind: Option<Kind>,
    pred: Option<&dyn Fn(&Node) -> bool>,
    depth: usize,
    maxdepth: usize,
    matches: &mut Vec<RRC<Node>>,
) {
    let this = node.borrow();
    if this.matches(kind, pred) {
        matches.push(node.clone());
    }
    if !this.is_leaf() && depth < maxdepth {
        for child in this.children() {
            visit(child, kind, pred, depth + 1, maxdepth, matches);
        }
    }
}
