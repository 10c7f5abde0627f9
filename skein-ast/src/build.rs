//! Construction helpers that keep parent links correct.
//!
//! The parser boundary and the test suites build trees through these
//! instead of wiring children by hand.
use crate::{Literal, Node, NodeKind, RRC};
use linked_hash_map::LinkedHashMap;
use skein_utils::Id;

/// A block scope. `namespace` is set only on expanded component bodies.
pub fn block(namespace: Option<&str>, children: Vec<RRC<Node>>) -> RRC<Node> {
    let node = Node::new(NodeKind::Block {
        namespace: namespace.map(Id::from),
        args: LinkedHashMap::new(),
    });
    Node::add_children(&node, children);
    node
}

/// A component definition wrapping its body block.
pub fn component(
    name: &str,
    arg_names: &[&str],
    body: RRC<Node>,
) -> RRC<Node> {
    let node = Node::new(NodeKind::Component {
        name: Id::from(name),
        arg_names: arg_names.iter().map(|a| Id::from(*a)).collect(),
    });
    Node::append_child(&node, body);
    node
}

/// An actor instantiation with named argument bindings.
pub fn assignment(
    ident: &str,
    actor_type: &str,
    args: Vec<(&str, RRC<Node>)>,
) -> RRC<Node> {
    let node = Node::new(NodeKind::Assignment {
        ident: Id::from(ident),
        actor_type: Id::from(actor_type),
    });
    for (name, value) in args {
        Node::append_child(&node, named_arg(name, value));
    }
    node
}

/// A `(name, value)` argument pair. `value` is a [`value`] or [`id_ref`]
/// node.
pub fn named_arg(name: &str, value: RRC<Node>) -> RRC<Node> {
    let node = Node::new(NodeKind::NamedArg);
    Node::append_child(&node, id_ref(name));
    Node::append_child(&node, value);
    node
}

/// A top-level constant definition.
pub fn constant(name: &str, lit: Literal) -> RRC<Node> {
    let node = Node::new(NodeKind::Constant);
    Node::append_child(&node, id_ref(name));
    Node::append_child(&node, value(lit));
    node
}

/// A directed connection; `out` feeds `inp`.
pub fn link(out: RRC<Node>, inp: RRC<Node>) -> RRC<Node> {
    let node = Node::new(NodeKind::Link);
    Node::append_child(&node, out);
    Node::append_child(&node, inp);
    node
}

pub fn id_ref(ident: &str) -> RRC<Node> {
    Node::new(NodeKind::Id {
        ident: Id::from(ident),
    })
}

pub fn value(lit: Literal) -> RRC<Node> {
    Node::new(NodeKind::Value { value: lit })
}

/// A synthesized port reference; only the implicit-port rewrite makes
/// these.
pub fn port(actor: &str, port_name: &str) -> RRC<Node> {
    Node::new(NodeKind::Port {
        actor: Some(Id::from(actor)),
        port: Id::from(port_name),
    })
}

pub fn inport(actor: &str, port_name: &str) -> RRC<Node> {
    Node::new(NodeKind::InPort {
        actor: Some(Id::from(actor)),
        port: Id::from(port_name),
    })
}

pub fn outport(actor: &str, port_name: &str) -> RRC<Node> {
    Node::new(NodeKind::OutPort {
        actor: Some(Id::from(actor)),
        port: Id::from(port_name),
    })
}

/// Dot-form reference to the enclosing component's own input, e.g. the
/// `.in` in `.in > i.in`. Gains its actor qualifier during flattening.
pub fn internal_inport(port_name: &str) -> RRC<Node> {
    Node::new(NodeKind::InternalInPort {
        actor: None,
        port: Id::from(port_name),
    })
}

/// Dot-form reference to the enclosing component's own output, e.g. the
/// `.out` in `i.out > .out`.
pub fn internal_outport(port_name: &str) -> RRC<Node> {
    Node::new(NodeKind::InternalOutPort {
        actor: None,
        port: Id::from(port_name),
    })
}

/// A literal standing where a source port is expected, e.g. `42 > a.in`.
pub fn implicit_port(lit: Literal) -> RRC<Node> {
    let node = Node::new(NodeKind::ImplicitPort);
    Node::append_child(&node, value(lit));
    node
}
