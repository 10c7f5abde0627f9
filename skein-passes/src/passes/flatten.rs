use crate::traversal::{
    walk, Action, DiagnosticContext, DiagnosticPass, Named, VisResult,
    Visitor,
};
use itertools::Itertools;
use skein_ast::{Node, NodeKind, RRC};
use skein_utils::{Error, Id};
use std::collections::HashMap;

/// Separator joining namespace segments in qualified names.
const SEPARATOR: &str = ":";

/// Collapses the block hierarchy into the root block.
///
/// Every assignment ident and port actor is rewritten with the namespace
/// prefix accumulated on the way down; argument references resolve against
/// the enclosing block's bindings, then against the script's constants.
/// Interior blocks hand their children to their parent and disappear, so
/// afterwards the root holds nothing but assignments and links.
#[derive(Default)]
pub struct Flatten {
    stack: Vec<Id>,
    constants: HashMap<Id, RRC<Node>>,
    diag: DiagnosticContext,
}

impl Named for Flatten {
    fn name() -> &'static str {
        "flatten"
    }

    fn description() -> &'static str {
        "qualify names with their namespaces and remove interior blocks"
    }
}

impl DiagnosticPass for Flatten {
    fn diagnostics(&self) -> &DiagnosticContext {
        &self.diag
    }
}

impl Flatten {
    fn qualified(&self, last: Option<Id>) -> Id {
        let joined = self
            .stack
            .iter()
            .copied()
            .chain(last)
            .map(|id| id.to_string())
            .join(SEPARATOR);
        Id::new(joined)
    }
}

impl Visitor for Flatten {
    /// Record the constant and drop the definition from the tree.
    fn on_constant(&mut self, node: &RRC<Node>) -> VisResult {
        let pos = node.borrow().pos;
        let Some((name_node, value_node)) = node.borrow().pair() else {
            return self.diag.early_return_err(
                Error::malformed_tree("constant without name/value pair")
                    .with_pos(pos),
            );
        };
        if let NodeKind::Id { ident } = name_node.borrow().kind {
            self.constants.insert(ident, value_node);
        }
        Node::detach(node);
        Ok(Action::SkipChildren)
    }

    fn on_block(&mut self, node: &RRC<Node>) -> VisResult {
        let parent = node.borrow().parent();

        // Bindings that name a symbol are resolved against the parent
        // block's bindings before this block's own children see them.
        let mut resolved: Vec<(Id, RRC<Node>)> = Vec::new();
        let mut missing: Vec<Id> = Vec::new();
        {
            let this = node.borrow();
            if let NodeKind::Block { args, .. } = &this.kind {
                for (name, value) in args.iter() {
                    let NodeKind::Id { ident } = value.borrow().kind else {
                        continue;
                    };
                    let outer = parent.as_ref().and_then(|p| {
                        match &p.borrow().kind {
                            NodeKind::Block { args, .. } => {
                                args.get(&ident).cloned()
                            }
                            _ => None,
                        }
                    });
                    match outer {
                        Some(outer_value) => {
                            resolved.push((*name, outer_value))
                        }
                        None => missing.push(ident),
                    }
                }
            }
        }
        for ident in missing {
            let pos = node.borrow().pos;
            self.diag
                .warning(Error::unresolved_symbol(ident).with_pos(pos));
        }
        if !resolved.is_empty() {
            let mut this = node.borrow_mut();
            if let NodeKind::Block { args, .. } = &mut this.kind {
                for (name, value) in resolved {
                    args.insert(name, value);
                }
            }
        }

        let namespace = match &node.borrow().kind {
            NodeKind::Block { namespace, .. } => *namespace,
            _ => None,
        };
        if let Some(ns) = namespace {
            self.stack.push(ns);
        }
        let snapshot = node.borrow().snapshot();
        for child in snapshot {
            let attached = child
                .borrow()
                .parent()
                .is_some_and(|p| RRC::ptr_eq(&p, node));
            if !attached {
                continue;
            }
            walk(self, &child)?;
        }
        if namespace.is_some() {
            self.stack.pop();
        }

        // Interior blocks dissolve into their parent; the root stays.
        if let Some(parent) = parent {
            let kids = Node::take_children(node);
            Node::add_children(&parent, kids);
            Node::detach(node);
        }
        Ok(Action::SkipChildren)
    }

    fn on_assignment(&mut self, node: &RRC<Node>) -> VisResult {
        let ident = match node.borrow().kind {
            NodeKind::Assignment { ident, .. } => ident,
            _ => return Ok(Action::Continue),
        };
        let qualified = self.qualified(Some(ident));
        if let NodeKind::Assignment { ident, .. } =
            &mut node.borrow_mut().kind
        {
            *ident = qualified;
        }
        Ok(Action::Continue)
    }

    /// Substitute a symbolic argument value: the enclosing block's
    /// bindings shadow the script constants.
    fn on_named_arg(&mut self, node: &RRC<Node>) -> VisResult {
        let Some((_, value_node)) = node.borrow().pair() else {
            let pos = node.borrow().pos;
            return self.diag.early_return_err(
                Error::malformed_tree("argument without name/value pair")
                    .with_pos(pos),
            );
        };
        let key = match value_node.borrow().kind {
            NodeKind::Id { ident } => ident,
            _ => return Ok(Action::SkipChildren),
        };

        // The enclosing block is the grandparent: NamedArg -> Assignment
        // -> Block.
        let block = node
            .borrow()
            .parent()
            .and_then(|assignment| assignment.borrow().parent());
        let bound = block.and_then(|b| match &b.borrow().kind {
            NodeKind::Block { args, .. } => args.get(&key).cloned(),
            _ => None,
        });
        let substitute =
            bound.or_else(|| self.constants.get(&key).cloned());

        match substitute {
            Some(value) => {
                Node::replace_child(node, &value_node, Node::deep_clone(&value));
            }
            None => {
                let pos = value_node.borrow().pos;
                self.diag
                    .warning(Error::unresolved_symbol(key).with_pos(pos));
            }
        }
        Ok(Action::SkipChildren)
    }

    fn on_port(&mut self, node: &RRC<Node>) -> VisResult {
        let mut this = node.borrow_mut();
        if let Some((actor, _)) = this.kind.port_mut() {
            *actor = match *actor {
                Some(name) => Some(self.qualified(Some(name))),
                None => Some(self.qualified(None)),
            };
        }
        Ok(Action::SkipChildren)
    }
}
