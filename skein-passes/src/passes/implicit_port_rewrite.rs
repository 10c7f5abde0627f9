use crate::traversal::{
    Action, DiagnosticContext, DiagnosticPass, Named, VisResult, Visitor,
};
use skein_ast::{build, Kind, Literal, Node, RRC};
use skein_utils::Error;

/// Name prefix for synthesized constant emitters.
const CONST_PREFIX: &str = "_literal_const_";

/// Desugars `<literal> > actor.port` into a constant-emitter actor wired
/// to the target port.
///
/// Implicit ports are visited in pre-order, so the synthesized names are
/// numbered by source position. The counter restarts with every pass
/// instance, i.e. every compilation.
#[derive(Default)]
pub struct ImplicitPortRewrite {
    counter: u64,
    diag: DiagnosticContext,
}

impl Named for ImplicitPortRewrite {
    fn name() -> &'static str {
        "implicit-port-rewrite"
    }

    fn description() -> &'static str {
        "replace literal sources with synthesized constant-emitter actors"
    }
}

impl DiagnosticPass for ImplicitPortRewrite {
    fn diagnostics(&self) -> &DiagnosticContext {
        &self.diag
    }
}

impl Visitor for ImplicitPortRewrite {
    fn on_implicit_port(&mut self, node: &RRC<Node>) -> VisResult {
        let pos = node.borrow().pos;
        let Some(literal) = node.borrow().child(0) else {
            return self.diag.early_return_err(
                Error::malformed_tree("implicit port carries no literal")
                    .with_pos(pos),
            );
        };
        let Some(link) = node.borrow().parent() else {
            return self.diag.early_return_err(
                Error::malformed_tree("implicit port outside a link")
                    .with_pos(pos),
            );
        };
        let enclosing = link.borrow().parent().filter(|block| {
            block.borrow().kind.tag() == Kind::Block
        });
        let Some(block) = enclosing else {
            return self.diag.early_return_err(
                Error::malformed_tree("link outside an enclosing block")
                    .with_pos(pos),
            );
        };

        self.counter += 1;
        let const_name = format!("{CONST_PREFIX}{}", self.counter);

        // The literal node itself becomes the `data` argument.
        Node::detach(&literal);
        let const_actor = build::assignment(
            &const_name,
            "std.Constant",
            vec![
                ("data", literal),
                ("n", build::value(Literal::Int(-1))),
            ],
        );
        let const_port = build::port(&const_name, "token");

        Node::replace_child(&link, node, const_port);
        Node::append_child(&block, const_actor);
        Ok(Action::SkipChildren)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ast::{find_kind, NodeKind};
    use skein_utils::Id;

    #[test]
    fn literal_becomes_constant_actor() {
        let root = build::block(
            None,
            vec![
                build::assignment("a", "std.Identity", vec![]),
                build::link(
                    build::implicit_port(Literal::Int(42)),
                    build::inport("a", "in"),
                ),
            ],
        );
        let mut rewrite = ImplicitPortRewrite::default();
        rewrite.traverse(&root).unwrap();
        assert!(!rewrite.diagnostics().has_errors());

        assert!(find_kind(&root, Kind::ImplicitPort).is_empty());
        let assignments = find_kind(&root, Kind::Assignment);
        assert_eq!(assignments.len(), 2);
        let synthesized = &assignments[1];
        match synthesized.borrow().kind {
            NodeKind::Assignment { ident, actor_type } => {
                assert_eq!(ident, Id::from("_literal_const_1"));
                assert_eq!(actor_type, Id::from("std.Constant"));
            }
            _ => unreachable!(),
        }

        // the link now reads from the synthesized actor's token port
        let links = find_kind(&root, Kind::Link);
        let out = links[0].borrow().outport().unwrap();
        let (actor, port) = out.borrow().kind.port_ref().unwrap();
        assert_eq!(actor, Some(Id::from("_literal_const_1")));
        assert_eq!(port, Id::from("token"));
    }

    #[test]
    fn names_are_distinct_and_positional() {
        let root = build::block(
            None,
            vec![
                build::assignment("a", "std.Identity", vec![]),
                build::link(
                    build::implicit_port(Literal::Str("x".into())),
                    build::inport("a", "in"),
                ),
                build::link(
                    build::implicit_port(Literal::Bool(true)),
                    build::inport("a", "in"),
                ),
            ],
        );
        let mut rewrite = ImplicitPortRewrite::default();
        rewrite.traverse(&root).unwrap();

        let names: Vec<String> = find_kind(&root, Kind::Assignment)
            .iter()
            .filter_map(|n| match n.borrow().kind {
                NodeKind::Assignment { ident, actor_type }
                    if actor_type == "std.Constant" =>
                {
                    Some(ident.to_string())
                }
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["_literal_const_1", "_literal_const_2"]);
    }

    #[test]
    fn synthesized_args_carry_data_and_n() {
        let root = build::block(
            None,
            vec![
                build::assignment("a", "std.Identity", vec![]),
                build::link(
                    build::implicit_port(Literal::Int(7)),
                    build::inport("a", "in"),
                ),
            ],
        );
        let mut rewrite = ImplicitPortRewrite::default();
        rewrite.traverse(&root).unwrap();

        let synthesized = find_kind(&root, Kind::Assignment)
            .into_iter()
            .find(|n| match n.borrow().kind {
                NodeKind::Assignment { actor_type, .. } => {
                    actor_type == "std.Constant"
                }
                _ => false,
            })
            .unwrap();
        let args: Vec<(String, Literal)> = synthesized
            .borrow()
            .children()
            .iter()
            .filter_map(|arg| {
                let (name, value) = arg.borrow().pair()?;
                let name = match name.borrow().kind {
                    NodeKind::Id { ident } => ident.to_string(),
                    _ => return None,
                };
                let value = match &value.borrow().kind {
                    NodeKind::Value { value } => value.clone(),
                    _ => return None,
                };
                Some((name, value))
            })
            .collect();
        assert_eq!(
            args,
            vec![
                ("data".to_string(), Literal::Int(7)),
                ("n".to_string(), Literal::Int(-1)),
            ]
        );
    }
}
