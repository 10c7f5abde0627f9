use crate::traversal::{DiagnosticContext, DiagnosticPass, Named};
use linked_hash_map::LinkedHashMap;
use skein_ast::{find_all, Kind, Node, NodeKind, RRC};
use skein_utils::{Error, Id};

/// Gathers top-level component definitions into a name-to-definition map.
///
/// Components are only declared at the top level, so the query stops one
/// level below the root. In the compile flow the definitions are detached
/// from the tree afterwards; the export flow leaves them in place.
pub struct ComponentCollector {
    detach: bool,
    diag: DiagnosticContext,
}

impl Named for ComponentCollector {
    fn name() -> &'static str {
        "component-collector"
    }

    fn description() -> &'static str {
        "gather top-level component definitions and remove them from the tree"
    }
}

impl DiagnosticPass for ComponentCollector {
    fn diagnostics(&self) -> &DiagnosticContext {
        &self.diag
    }
}

impl ComponentCollector {
    /// Collector for the compile flow: definitions leave the tree.
    pub fn detaching() -> Self {
        ComponentCollector {
            detach: true,
            diag: DiagnosticContext::default(),
        }
    }

    /// Collector for the export flow: the tree is left untouched.
    pub fn preserving() -> Self {
        ComponentCollector {
            detach: false,
            diag: DiagnosticContext::default(),
        }
    }

    /// Collect the definitions. A name defined twice resolves to the later
    /// definition and is reported.
    pub fn collect(
        &mut self,
        root: &RRC<Node>,
    ) -> LinkedHashMap<Id, RRC<Node>> {
        let mut components = LinkedHashMap::new();
        for comp in find_all(root, Some(Kind::Component), None, 1) {
            let (name, pos) = {
                let n = comp.borrow();
                match n.kind {
                    NodeKind::Component { name, .. } => (name, n.pos),
                    _ => continue,
                }
            };
            if components.insert(name, comp.clone()).is_some() {
                self.diag
                    .err(Error::duplicate_component(name).with_pos(pos));
            }
            if self.detach {
                Node::detach(&comp);
            }
        }
        components
    }
}
