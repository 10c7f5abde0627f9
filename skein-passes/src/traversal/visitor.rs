//! Implements a visitor over script trees.
use super::action::{Action, VisResult};
use skein_ast::{Kind, Node, RRC};
use skein_utils::SkeinResult;
use std::rc::Rc;

/// Trait that describes named things. Used for pass identification and
/// timing logs.
pub trait Named {
    /// The name of a pass. Is used for identifying passes.
    fn name() -> &'static str;
    /// A short description of the pass.
    fn description() -> &'static str;
}

/// The visiting interface for a script tree. A pass overrides the handlers
/// for the kinds it rewrites and relies on the defaults to reach the rest
/// of the tree.
///
/// A handler that performs its own recursion (or must not descend into a
/// node it just rewired) returns [`Action::SkipChildren`]; otherwise the
/// walk continues into the node's children.
pub trait Visitor {
    fn on_block(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }
    fn on_component(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }
    fn on_assignment(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }
    fn on_named_arg(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }
    fn on_constant(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }
    fn on_link(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }
    /// Called for every port kind, internal markers included.
    fn on_port(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }
    fn on_implicit_port(&mut self, _node: &RRC<Node>) -> VisResult {
        Ok(Action::Continue)
    }

    /// Run the visitor over the whole tree under `root`.
    fn traverse(&mut self, root: &RRC<Node>) -> SkeinResult<()>
    where
        Self: Sized,
    {
        walk(self, root).map(|_| ())
    }
}

/// Dispatch on the node's kind, then recurse into its children unless the
/// handler asked otherwise.
///
/// The child list is iterated over a snapshot, and a child that was
/// detached or replaced by an earlier handler in the same sweep is skipped:
/// passes mutate the lists they are being walked over.
pub fn walk<V: Visitor + ?Sized>(v: &mut V, node: &RRC<Node>) -> VisResult {
    let tag = node.borrow().kind.tag();
    let action = match tag {
        Kind::Block => v.on_block(node)?,
        Kind::Component => v.on_component(node)?,
        Kind::Assignment => v.on_assignment(node)?,
        Kind::NamedArg => v.on_named_arg(node)?,
        Kind::Constant => v.on_constant(node)?,
        Kind::Link => v.on_link(node)?,
        Kind::Port
        | Kind::InPort
        | Kind::OutPort
        | Kind::InternalInPort
        | Kind::InternalOutPort => v.on_port(node)?,
        Kind::ImplicitPort => v.on_implicit_port(node)?,
        Kind::Id | Kind::Value => Action::Continue,
    };

    match action {
        Action::Continue => {
            let snapshot = node.borrow().snapshot();
            for child in snapshot {
                let attached = child
                    .borrow()
                    .parent()
                    .is_some_and(|p| Rc::ptr_eq(&p, node));
                if !attached {
                    continue;
                }
                if let Action::Stop = walk(v, &child)? {
                    return Ok(Action::Stop);
                }
            }
            Ok(Action::Continue)
        }
        Action::SkipChildren => Ok(Action::Continue),
        Action::Stop => Ok(Action::Stop),
    }
}
