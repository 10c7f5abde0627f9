use crate::manifest::{ActorEntry, Manifest};
use crate::traversal::{
    Action, DiagnosticContext, DiagnosticPass, Named, VisResult, Visitor,
};
use linked_hash_map::LinkedHashMap;
use skein_ast::{Literal, Node, NodeKind, RRC};
use skein_store::{ActorStore, Lookup};
use skein_utils::Error;

/// Walks the flat tree and produces the actors and connections tables.
pub struct ManifestEmitter<'a> {
    store: &'a dyn ActorStore,
    manifest: Manifest,
    diag: DiagnosticContext,
}

impl Named for ManifestEmitter<'_> {
    fn name() -> &'static str {
        "manifest-emitter"
    }

    fn description() -> &'static str {
        "emit the flat actors-and-connections manifest"
    }
}

impl DiagnosticPass for ManifestEmitter<'_> {
    fn diagnostics(&self) -> &DiagnosticContext {
        &self.diag
    }
}

impl<'a> ManifestEmitter<'a> {
    pub fn new(script_name: &str, store: &'a dyn ActorStore) -> Self {
        ManifestEmitter {
            store,
            manifest: Manifest::new(script_name),
            diag: DiagnosticContext::default(),
        }
    }

    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    /// Extract the primitive argument values of an assignment. A value
    /// that is still a symbol was reported during flattening and is left
    /// out of the manifest.
    fn extract_args(
        &mut self,
        node: &RRC<Node>,
    ) -> LinkedHashMap<String, Literal> {
        let mut args = LinkedHashMap::new();
        for arg in node.borrow().children() {
            let n = arg.borrow();
            if !matches!(n.kind, NodeKind::NamedArg) {
                continue;
            }
            let Some((name_node, value_node)) = n.pair() else {
                self.diag.err(
                    Error::malformed_tree(
                        "argument without name/value pair",
                    )
                    .with_pos(n.pos),
                );
                continue;
            };
            let NodeKind::Id { ident } = name_node.borrow().kind else {
                self.diag.err(
                    Error::malformed_tree("argument name is not a symbol")
                        .with_pos(n.pos),
                );
                continue;
            };
            let value_node_borrow = value_node.borrow();
            if let NodeKind::Value { value } = &value_node_borrow.kind {
                args.insert(ident.to_string(), value.clone());
            }
        }
        args
    }
}

impl Visitor for ManifestEmitter<'_> {
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

        let signature = match self.store.lookup(actor_type) {
            Lookup::Actor(class) | Lookup::Component(class) => {
                class.signature()
            }
            Lookup::NotFound => {
                self.diag.err(
                    Error::unknown_actor_type(actor_type).with_pos(pos),
                );
                String::new()
            }
        };

        let key = format!("{}:{}", self.manifest.name, ident);
        let entry = ActorEntry {
            actor_type: actor_type.to_string(),
            args: self.extract_args(node),
            signature,
        };
        self.manifest.actors.insert(key, entry);
        Ok(Action::SkipChildren)
    }

    fn on_link(&mut self, node: &RRC<Node>) -> VisResult {
        let pos = node.borrow().pos;
        let endpoint = |end: Option<RRC<Node>>| {
            end.and_then(|port| {
                let (actor, port_name) = port.borrow().kind.port_ref()?;
                Some(format!(
                    "{}:{}.{}",
                    self.manifest.name,
                    actor?,
                    port_name
                ))
            })
        };
        let source = endpoint(node.borrow().outport());
        let target = endpoint(node.borrow().inport());
        let (Some(source), Some(target)) = (source, target) else {
            return self.diag.early_return_err(
                Error::malformed_tree("link with unresolved endpoints")
                    .with_pos(pos),
            );
        };

        let targets =
            self.manifest.connections.entry(source).or_insert_with(Vec::new);
        if !targets.contains(&target) {
            targets.push(target);
        }
        Ok(Action::SkipChildren)
    }
}
