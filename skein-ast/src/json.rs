//! The interchange form at the parser boundary.
//!
//! The parser is a separate program; it hands the compiler a tree
//! serialized as JSON. Kinds are tagged by name and attributes appear as
//! optional fields, so one record shape covers every kind. The same form
//! is used to persist exported component definitions.
use crate::{Kind, Literal, Node, NodeKind, RRC};
use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};
use skein_utils::{Error, Id, Pos, SkeinResult};

/// One serialized node. Absent `value` on a `Value` node reads as `null`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonNode {
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ident: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode>,
}

impl JsonNode {
    fn pos(&self) -> Pos {
        match (self.line, self.col) {
            (Some(line), Some(col)) => Pos::new(line, col),
            _ => Pos::UNKNOWN,
        }
    }

    fn require(&self, field: &str, val: &Option<String>) -> SkeinResult<Id> {
        val.as_deref().map(Id::from).ok_or_else(|| {
            Error::malformed_tree(format!(
                "{:?} node missing `{field}'",
                self.kind
            ))
            .with_pos(self.pos())
        })
    }
}

/// Build a tree from its interchange form.
pub fn tree_from_json(json: &JsonNode) -> SkeinResult<RRC<Node>> {
    let pos = json.pos();
    let kind = match json.kind {
        Kind::Block => NodeKind::Block {
            namespace: json.namespace.as_deref().map(Id::from),
            args: LinkedHashMap::new(),
        },
        Kind::Component => NodeKind::Component {
            name: json.require("name", &json.name)?,
            arg_names: json
                .arg_names
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|s| Id::from(s.as_str()))
                .collect(),
        },
        Kind::Assignment => NodeKind::Assignment {
            ident: json.require("ident", &json.ident)?,
            actor_type: json.require("actor_type", &json.actor_type)?,
        },
        Kind::NamedArg => NodeKind::NamedArg,
        Kind::Constant => NodeKind::Constant,
        Kind::Link => NodeKind::Link,
        Kind::Id => NodeKind::Id {
            ident: json.require("ident", &json.ident)?,
        },
        Kind::Value => NodeKind::Value {
            value: json.value.clone().unwrap_or(Literal::Null),
        },
        Kind::Port => NodeKind::Port {
            actor: json.actor.as_deref().map(Id::from),
            port: json.require("port", &json.port)?,
        },
        Kind::InPort => NodeKind::InPort {
            actor: json.actor.as_deref().map(Id::from),
            port: json.require("port", &json.port)?,
        },
        Kind::OutPort => NodeKind::OutPort {
            actor: json.actor.as_deref().map(Id::from),
            port: json.require("port", &json.port)?,
        },
        Kind::InternalInPort => NodeKind::InternalInPort {
            actor: json.actor.as_deref().map(Id::from),
            port: json.require("port", &json.port)?,
        },
        Kind::InternalOutPort => NodeKind::InternalOutPort {
            actor: json.actor.as_deref().map(Id::from),
            port: json.require("port", &json.port)?,
        },
        Kind::ImplicitPort => NodeKind::ImplicitPort,
    };

    check_arity(json)?;

    let node = Node::with_pos(kind, pos);
    for child in &json.children {
        Node::append_child(&node, tree_from_json(child)?);
    }
    Ok(node)
}

/// Serialize a subtree back into the interchange form. Block argument
/// bindings are pass-internal state and are not carried.
pub fn tree_to_json(node: &RRC<Node>) -> JsonNode {
    let this = node.borrow();
    let mut out = JsonNode {
        kind: this.kind.tag(),
        ident: None,
        name: None,
        arg_names: None,
        actor_type: None,
        namespace: None,
        actor: None,
        port: None,
        value: None,
        line: this.pos.is_known().then_some(this.pos.line),
        col: this.pos.is_known().then_some(this.pos.col),
        children: this.children().iter().map(tree_to_json).collect(),
    };
    match &this.kind {
        NodeKind::Block { namespace, .. } => {
            out.namespace = namespace.map(|n| n.to_string());
        }
        NodeKind::Component { name, arg_names } => {
            out.name = Some(name.to_string());
            if !arg_names.is_empty() {
                out.arg_names =
                    Some(arg_names.iter().map(|a| a.to_string()).collect());
            }
        }
        NodeKind::Assignment { ident, actor_type } => {
            out.ident = Some(ident.to_string());
            out.actor_type = Some(actor_type.to_string());
        }
        NodeKind::Id { ident } => {
            out.ident = Some(ident.to_string());
        }
        NodeKind::Value { value } => {
            out.value = Some(value.clone());
        }
        NodeKind::Port { actor, port }
        | NodeKind::InPort { actor, port }
        | NodeKind::OutPort { actor, port }
        | NodeKind::InternalInPort { actor, port }
        | NodeKind::InternalOutPort { actor, port } => {
            out.actor = actor.map(|a| a.to_string());
            out.port = Some(port.to_string());
        }
        NodeKind::NamedArg
        | NodeKind::Constant
        | NodeKind::Link
        | NodeKind::ImplicitPort => {}
    }
    out
}

/// Structural checks the rest of the pipeline relies on.
fn check_arity(json: &JsonNode) -> SkeinResult<()> {
    let expect = |n: usize, what: &str| {
        if json.children.len() == n {
            Ok(())
        } else {
            Err(Error::malformed_tree(format!(
                "{:?} node must have exactly {n} children ({what})",
                json.kind
            ))
            .with_pos(json.pos()))
        }
    };
    match json.kind {
        Kind::Component => {
            expect(1, "the body block")?;
            if json.children[0].kind != Kind::Block {
                return Err(Error::malformed_tree(
                    "component body must be a block",
                )
                .with_pos(json.pos()));
            }
            Ok(())
        }
        Kind::NamedArg => expect(2, "name and value"),
        Kind::Constant => expect(2, "name and value"),
        Kind::Link => expect(2, "outport and inport"),
        Kind::ImplicitPort => expect(1, "the literal"),
        Kind::Id | Kind::Value | Kind::Port | Kind::InPort | Kind::OutPort
        | Kind::InternalInPort | Kind::InternalOutPort => {
            expect(0, "leaf kinds take none")
        }
        Kind::Block | Kind::Assignment => Ok(()),
    }
}
