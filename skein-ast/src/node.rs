//! Tree nodes and the operations that keep parent links consistent.
use crate::{rrc, Literal, RRC, WRC};
use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};
use skein_utils::{Id, Pos};
use std::rc::Rc;

/// Payload-free kind tags, used by queries and the interchange form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Block,
    Component,
    Assignment,
    NamedArg,
    Constant,
    Link,
    Id,
    Value,
    Port,
    InPort,
    OutPort,
    InternalInPort,
    InternalOutPort,
    ImplicitPort,
}

/// A node's kind together with its kind-specific attributes.
///
/// The port kinds all carry the same `(actor, port)` attributes. `InPort`
/// and `OutPort` are references to a named actor's ports; the `Internal`
/// variants are the dot-form references to the enclosing component's own
/// interface and only survive until the port map is resolved. A bare `Port`
/// is only ever synthesized by the implicit-port rewrite.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Block {
        namespace: Option<Id>,
        /// Argument bindings carried by an expanded component body.
        /// Populated by expansion, consumed by flattening.
        args: LinkedHashMap<Id, RRC<Node>>,
    },
    Component {
        name: Id,
        arg_names: Vec<Id>,
    },
    Assignment {
        ident: Id,
        actor_type: Id,
    },
    NamedArg,
    Constant,
    Link,
    Id {
        ident: Id,
    },
    Value {
        value: Literal,
    },
    Port {
        actor: Option<Id>,
        port: Id,
    },
    InPort {
        actor: Option<Id>,
        port: Id,
    },
    OutPort {
        actor: Option<Id>,
        port: Id,
    },
    InternalInPort {
        actor: Option<Id>,
        port: Id,
    },
    InternalOutPort {
        actor: Option<Id>,
        port: Id,
    },
    ImplicitPort,
}

impl NodeKind {
    /// The payload-free tag for this kind.
    pub fn tag(&self) -> Kind {
        match self {
            NodeKind::Block { .. } => Kind::Block,
            NodeKind::Component { .. } => Kind::Component,
            NodeKind::Assignment { .. } => Kind::Assignment,
            NodeKind::NamedArg => Kind::NamedArg,
            NodeKind::Constant => Kind::Constant,
            NodeKind::Link => Kind::Link,
            NodeKind::Id { .. } => Kind::Id,
            NodeKind::Value { .. } => Kind::Value,
            NodeKind::Port { .. } => Kind::Port,
            NodeKind::InPort { .. } => Kind::InPort,
            NodeKind::OutPort { .. } => Kind::OutPort,
            NodeKind::InternalInPort { .. } => Kind::InternalInPort,
            NodeKind::InternalOutPort { .. } => Kind::InternalOutPort,
            NodeKind::ImplicitPort => Kind::ImplicitPort,
        }
    }

    /// The `(actor, port)` attributes shared by every port kind.
    pub fn port_ref(&self) -> Option<(Option<Id>, Id)> {
        match self {
            NodeKind::Port { actor, port }
            | NodeKind::InPort { actor, port }
            | NodeKind::OutPort { actor, port }
            | NodeKind::InternalInPort { actor, port }
            | NodeKind::InternalOutPort { actor, port } => {
                Some((*actor, *port))
            }
            _ => None,
        }
    }

    /// Mutable access to the `(actor, port)` attributes of a port kind.
    pub fn port_mut(&mut self) -> Option<(&mut Option<Id>, &mut Id)> {
        match self {
            NodeKind::Port { actor, port }
            | NodeKind::InPort { actor, port }
            | NodeKind::OutPort { actor, port }
            | NodeKind::InternalInPort { actor, port }
            | NodeKind::InternalOutPort { actor, port } => Some((actor, port)),
            _ => None,
        }
    }

    pub fn is_port(&self) -> bool {
        self.port_ref().is_some()
    }
}

/// A single tree node. The child list owns the subtree; the parent link is
/// a weak relation set on attach and cleared on detach.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: Pos,
    children: Vec<RRC<Node>>,
    parent: Option<WRC<Node>>,
}

impl Node {
    pub fn new(kind: NodeKind) -> RRC<Node> {
        Node::with_pos(kind, Pos::UNKNOWN)
    }

    pub fn with_pos(kind: NodeKind, pos: Pos) -> RRC<Node> {
        rrc(Node {
            kind,
            pos,
            children: Vec::new(),
            parent: None,
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[RRC<Node>] {
        &self.children
    }

    /// A copy of the child list. Passes iterate over this while they
    /// mutate the list itself.
    pub fn snapshot(&self) -> Vec<RRC<Node>> {
        self.children.clone()
    }

    pub fn child(&self, idx: usize) -> Option<RRC<Node>> {
        self.children.get(idx).map(Rc::clone)
    }

    pub fn parent(&self) -> Option<RRC<Node>> {
        self.parent.as_ref().and_then(WRC::try_upgrade)
    }

    /// The source end of a link (first child).
    pub fn outport(&self) -> Option<RRC<Node>> {
        match self.kind {
            NodeKind::Link => self.child(0),
            _ => None,
        }
    }

    /// The destination end of a link (second child).
    pub fn inport(&self) -> Option<RRC<Node>> {
        match self.kind {
            NodeKind::Link => self.child(1),
            _ => None,
        }
    }

    /// The `(name, value)` children of a `NamedArg` or `Constant`.
    pub fn pair(&self) -> Option<(RRC<Node>, RRC<Node>)> {
        match self.kind {
            NodeKind::NamedArg | NodeKind::Constant => {
                match (self.child(0), self.child(1)) {
                    (Some(a), Some(b)) => Some((a, b)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Kind and attribute test used by the finder. A `None` kind or
    /// predicate matches anything.
    pub fn matches(
        &self,
        kind: Option<Kind>,
        pred: Option<&dyn Fn(&Node) -> bool>,
    ) -> bool {
        if let Some(k) = kind {
            if self.kind.tag() != k {
                return false;
            }
        }
        match pred {
            Some(p) => p(self),
            None => true,
        }
    }

    /* ============== Operations that maintain parent links ============== */

    /// Attach `child` as the last child of `parent`.
    pub fn append_child(parent: &RRC<Node>, child: RRC<Node>) {
        child.borrow_mut().parent = Some(WRC::from(parent));
        parent.borrow_mut().children.push(child);
    }

    /// Attach every node in `kids` at the end of `parent`'s child list,
    /// preserving order.
    pub fn add_children(parent: &RRC<Node>, kids: Vec<RRC<Node>>) {
        for child in kids {
            Node::append_child(parent, child);
        }
    }

    /// Replace `old` with `new` in `parent`'s child list, keeping the
    /// position. Returns false when `old` is not a child of `parent`.
    pub fn replace_child(
        parent: &RRC<Node>,
        old: &RRC<Node>,
        new: RRC<Node>,
    ) -> bool {
        let idx = {
            let p = parent.borrow();
            match p.children.iter().position(|c| Rc::ptr_eq(c, old)) {
                Some(idx) => idx,
                None => return false,
            }
        };
        old.borrow_mut().parent = None;
        new.borrow_mut().parent = Some(WRC::from(parent));
        parent.borrow_mut().children[idx] = new;
        true
    }

    /// Detach and return all of `node`'s children, preserving order.
    pub fn take_children(node: &RRC<Node>) -> Vec<RRC<Node>> {
        let kids = std::mem::take(&mut node.borrow_mut().children);
        for child in &kids {
            child.borrow_mut().parent = None;
        }
        kids
    }

    /// Remove `node` from its parent's child list and sever the back
    /// reference. Dropping the returned handle reclaims the subtree.
    pub fn detach(node: &RRC<Node>) {
        let parent = node.borrow().parent.clone();
        if let Some(parent) = parent.as_ref().and_then(WRC::try_upgrade) {
            parent
                .borrow_mut()
                .children
                .retain(|c| !Rc::ptr_eq(c, node));
        }
        node.borrow_mut().parent = None;
    }

    /// Deep copy: fresh nodes all the way down, fresh parent links, no
    /// substructure shared with the original. Block argument bindings are
    /// copied too.
    pub fn deep_clone(node: &RRC<Node>) -> RRC<Node> {
        let src = node.borrow();
        let kind = match &src.kind {
            NodeKind::Block { namespace, args } => NodeKind::Block {
                namespace: *namespace,
                args: args
                    .iter()
                    .map(|(name, val)| (*name, Node::deep_clone(val)))
                    .collect(),
            },
            other => other.clone(),
        };
        let copy = Node::with_pos(kind, src.pos);
        for child in &src.children {
            Node::append_child(&copy, Node::deep_clone(child));
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;
    use crate::Literal;

    #[test]
    fn attach_sets_the_back_reference() {
        let parent = build::block(None, vec![]);
        let child = build::assignment("a", "std.Identity", vec![]);
        Node::append_child(&parent, child.clone());
        let up = child.borrow().parent().unwrap();
        assert!(Rc::ptr_eq(&up, &parent));
    }

    #[test]
    fn detach_severs_both_directions() {
        let child = build::assignment("a", "std.Identity", vec![]);
        let parent = build::block(None, vec![child.clone()]);
        Node::detach(&child);
        assert!(parent.borrow().is_leaf());
        assert!(child.borrow().parent().is_none());
    }

    #[test]
    fn replace_keeps_the_position() {
        let first = build::assignment("a", "std.Identity", vec![]);
        let second = build::assignment("b", "std.Identity", vec![]);
        let parent = build::block(None, vec![first.clone(), second]);
        let swapped = build::assignment("c", "std.Identity", vec![]);
        assert!(Node::replace_child(&parent, &first, swapped.clone()));
        assert!(Rc::ptr_eq(&parent.borrow().child(0).unwrap(), &swapped));
        assert!(first.borrow().parent().is_none());
    }

    #[test]
    fn deep_clone_shares_nothing() {
        let original = build::block(
            None,
            vec![build::assignment(
                "a",
                "std.Identity",
                vec![("n", build::value(Literal::Int(1)))],
            )],
        );
        let copy = Node::deep_clone(&original);
        assert!(!Rc::ptr_eq(&original, &copy));

        // mutating the copy leaves the original alone
        let cloned_assignment = copy.borrow().child(0).unwrap();
        if let NodeKind::Assignment { ident, .. } =
            &mut cloned_assignment.borrow_mut().kind
        {
            *ident = Id::from("renamed");
        }
        let original_child = original.borrow().child(0).unwrap();
        let original_child_borrow = original_child.borrow();
        match original_child_borrow.kind {
            NodeKind::Assignment { ident, .. } => {
                assert_eq!(ident, Id::from("a"))
            }
            _ => unreachable!(),
        }
    }
}
