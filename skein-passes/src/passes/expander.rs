use crate::traversal::{
    walk, Action, DiagnosticContext, DiagnosticPass, Named, VisResult,
    Visitor,
};
use linked_hash_map::LinkedHashMap;
use skein_ast::{Node, NodeKind, RRC};
use skein_utils::{Error, Id};

/// Default bound on nested expansions before a component is declared
/// self-referential.
const DEFAULT_MAX_DEPTH: usize = 1024;

/// Inlines component bodies at their use sites.
///
/// An assignment whose type names a collected component is replaced by a
/// deep clone of that component's body block; the block inherits the
/// assignment's ident as its namespace and the assignment's argument
/// bindings as `args`. The clone is expanded recursively, so component
/// definitions may use other components, including ones defined later in
/// the script.
pub struct Expander<'a> {
    components: &'a LinkedHashMap<Id, RRC<Node>>,
    max_depth: usize,
    depth: usize,
    diag: DiagnosticContext,
}

impl Named for Expander<'_> {
    fn name() -> &'static str {
        "expander"
    }

    fn description() -> &'static str {
        "inline local component definitions at their use sites"
    }
}

impl DiagnosticPass for Expander<'_> {
    fn diagnostics(&self) -> &DiagnosticContext {
        &self.diag
    }
}

impl<'a> Expander<'a> {
    pub fn new(components: &'a LinkedHashMap<Id, RRC<Node>>) -> Self {
        Expander {
            components,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            diag: DiagnosticContext::default(),
        }
    }

    /// Override the expansion depth bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Move the argument bindings of the cloned assignment onto the cloned
    /// body block.
    fn bind_args(assignment: &RRC<Node>, body: &RRC<Node>, namespace: Id) {
        let mut bindings: Vec<(Id, RRC<Node>)> = Vec::new();
        for arg in assignment.borrow().children() {
            let Some((name_node, value_node)) = arg.borrow().pair() else {
                continue;
            };
            let name_node_borrow = name_node.borrow();
            if let NodeKind::Id { ident } = name_node_borrow.kind {
                bindings.push((ident, value_node));
            }
        }
        let mut block = body.borrow_mut();
        if let NodeKind::Block {
            namespace: ns,
            args,
        } = &mut block.kind
        {
            *ns = Some(namespace);
            for (name, value) in bindings {
                args.insert(name, value);
            }
        }
    }
}

impl Visitor for Expander<'_> {
    fn on_assignment(&mut self, node: &RRC<Node>) -> VisResult {
        let (ident, actor_type, pos) = {
            let n = node.borrow();
            match n.kind {
                NodeKind::Assignment { ident, actor_type } => {
                    (ident, actor_type, n.pos)
                }
                _ => return Ok(Action::Continue),
            }
        };
        let Some(component) = self.components.get(&actor_type) else {
            return Ok(Action::Continue);
        };
        if self.depth >= self.max_depth {
            self.diag
                .err(Error::recursive_component(actor_type).with_pos(pos));
            return Ok(Action::SkipChildren);
        }

        let Some(body) = component.borrow().child(0) else {
            return self.diag.early_return_err(
                Error::malformed_tree(format!(
                    "component `{actor_type}' has no body block"
                ))
                .with_pos(pos),
            );
        };

        // Clone the assignment so the bindings own independent value nodes
        // even when the same component is expanded many times.
        let args_source = Node::deep_clone(node);
        let expanded = Node::deep_clone(&body);
        Self::bind_args(&args_source, &expanded, ident);

        let Some(parent) = node.borrow().parent() else {
            return self.diag.early_return_err(
                Error::malformed_tree(
                    "component use site has no enclosing block",
                )
                .with_pos(pos),
            );
        };
        Node::replace_child(&parent, node, expanded.clone());

        // Expand uses nested inside the freshly inlined body.
        self.depth += 1;
        let result = walk(self, &expanded);
        self.depth -= 1;
        result?;
        Ok(Action::SkipChildren)
    }

    fn on_component(&mut self, _node: &RRC<Node>) -> VisResult {
        // Definitions are never expanded in place.
        Ok(Action::SkipChildren)
    }
}
