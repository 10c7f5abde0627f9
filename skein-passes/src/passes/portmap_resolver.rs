use crate::traversal::{DiagnosticContext, DiagnosticPass, Named};
use skein_ast::{find_all, find_kind, Kind, Node, RRC};

/// Splices connections across former component boundaries.
///
/// After flattening, a link that crossed a component boundary still ends
/// in a dot-form marker. Each marker's link records the real endpoint on
/// the inside; every outside reference to the marker's `(actor, port)` is
/// redirected to that endpoint. Links still touching a marker afterwards
/// carried no outside connection and are dropped.
#[derive(Default)]
pub struct PortMapResolver {
    diag: DiagnosticContext,
}

impl Named for PortMapResolver {
    fn name() -> &'static str {
        "portmap-resolver"
    }

    fn description() -> &'static str {
        "redirect internal-port markers to the real outside ports"
    }
}

impl DiagnosticPass for PortMapResolver {
    fn diagnostics(&self) -> &DiagnosticContext {
        &self.diag
    }
}

/// The `(marker, replacement)` geometry of one splice direction.
enum Direction {
    /// `.in` markers source their link; outside `InPort` references are
    /// redirected to the link's real destination.
    ComponentInput,
    /// `.out` markers sink their link; outside `OutPort` references are
    /// redirected to the link's real source.
    ComponentOutput,
}

impl Direction {
    fn marker_kind(&self) -> Kind {
        match self {
            Direction::ComponentInput => Kind::InternalInPort,
            Direction::ComponentOutput => Kind::InternalOutPort,
        }
    }

    fn reference_kind(&self) -> Kind {
        match self {
            Direction::ComponentInput => Kind::InPort,
            Direction::ComponentOutput => Kind::OutPort,
        }
    }

    /// The real endpoint recorded on the marker's own link.
    fn endpoint(&self, link: &RRC<Node>) -> Option<RRC<Node>> {
        match self {
            Direction::ComponentInput => link.borrow().inport(),
            Direction::ComponentOutput => link.borrow().outport(),
        }
    }
}

impl PortMapResolver {
    pub fn resolve(&mut self, root: &RRC<Node>) {
        self.splice(root, Direction::ComponentInput);
        self.splice(root, Direction::ComponentOutput);

        // Whatever still touches a marker never reached an outside port:
        // the component interface was unused.
        for kind in [Kind::InternalInPort, Kind::InternalOutPort] {
            for marker in find_kind(root, kind) {
                if let Some(link) = marker.borrow().parent() {
                    log::debug!(
                        "dropping unconnected boundary link for {}",
                        describe(&marker)
                    );
                    Node::detach(&link);
                }
            }
        }
    }

    fn splice(&mut self, root: &RRC<Node>, direction: Direction) {
        for marker in find_kind(root, direction.marker_kind()) {
            let Some((actor, port)) = marker.borrow().kind.port_ref()
            else {
                continue;
            };
            let Some(link) = marker.borrow().parent() else {
                continue;
            };
            let Some(endpoint) = direction.endpoint(&link) else {
                continue;
            };
            let matches_marker = |n: &Node| {
                n.kind.port_ref() == Some((actor, port))
            };
            for reference in find_all(
                root,
                Some(direction.reference_kind()),
                Some(&matches_marker),
                skein_ast::MAX_DEPTH,
            ) {
                let Some(outer) = reference.borrow().parent() else {
                    continue;
                };
                Node::replace_child(
                    &outer,
                    &reference,
                    Node::deep_clone(&endpoint),
                );
            }
        }
    }
}

fn describe(marker: &RRC<Node>) -> String {
    match marker.borrow().kind.port_ref() {
        Some((Some(actor), port)) => format!("{actor}.{port}"),
        Some((None, port)) => format!(".{port}"),
        None => String::from("<not a port>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_ast::build;
    use skein_utils::Id;

    fn internal_inport_at(actor: &str, port: &str) -> RRC<Node> {
        let node = build::internal_inport(port);
        if let Some((a, _)) = node.borrow_mut().kind.port_mut() {
            *a = Some(Id::from(actor));
        }
        node
    }

    fn internal_outport_at(actor: &str, port: &str) -> RRC<Node> {
        let node = build::internal_outport(port);
        if let Some((a, _)) = node.borrow_mut().kind.port_mut() {
            *a = Some(Id::from(actor));
        }
        node
    }

    fn connections(root: &RRC<Node>) -> Vec<(String, String)> {
        find_kind(root, Kind::Link)
            .iter()
            .map(|link| {
                let fmt = |n: RRC<Node>| {
                    let (actor, port) = n.borrow().kind.port_ref().unwrap();
                    format!("{}.{}", actor.unwrap(), port)
                };
                (
                    fmt(link.borrow().outport().unwrap()),
                    fmt(link.borrow().inport().unwrap()),
                )
            })
            .collect()
    }

    // The flat shape of: component c { i } with src and dst wired to it.
    fn boundary_tree() -> RRC<Node> {
        build::block(
            None,
            vec![
                build::link(
                    build::outport("src", "out"),
                    build::inport("c", "in"),
                ),
                build::link(
                    internal_inport_at("c", "in"),
                    build::inport("c:i", "in"),
                ),
                build::link(
                    build::outport("c:i", "out"),
                    internal_outport_at("c", "out"),
                ),
                build::link(
                    build::outport("c", "out"),
                    build::inport("dst", "in"),
                ),
            ],
        )
    }

    #[test]
    fn boundary_links_are_spliced() {
        let root = boundary_tree();
        let mut resolver = PortMapResolver::default();
        resolver.resolve(&root);

        assert!(find_kind(&root, Kind::InternalInPort).is_empty());
        assert!(find_kind(&root, Kind::InternalOutPort).is_empty());
        assert_eq!(
            connections(&root),
            vec![
                ("src.out".to_string(), "c:i.in".to_string()),
                ("c:i.out".to_string(), "dst.in".to_string()),
            ]
        );
    }

    #[test]
    fn fan_out_reaches_every_consumer() {
        let root = build::block(
            None,
            vec![
                build::link(
                    internal_inport_at("c", "in"),
                    build::inport("c:i", "in"),
                ),
                build::link(
                    build::outport("one", "out"),
                    build::inport("c", "in"),
                ),
                build::link(
                    build::outport("two", "out"),
                    build::inport("c", "in"),
                ),
            ],
        );
        let mut resolver = PortMapResolver::default();
        resolver.resolve(&root);
        assert_eq!(
            connections(&root),
            vec![
                ("one.out".to_string(), "c:i.in".to_string()),
                ("two.out".to_string(), "c:i.in".to_string()),
            ]
        );
    }

    #[test]
    fn unused_interface_drops_silently() {
        // nothing outside connects to c.in
        let root = build::block(
            None,
            vec![build::link(
                internal_inport_at("c", "in"),
                build::inport("c:i", "in"),
            )],
        );
        let mut resolver = PortMapResolver::default();
        resolver.resolve(&root);
        assert!(find_kind(&root, Kind::Link).is_empty());
        assert!(!resolver.diagnostics().has_errors());
    }

    #[test]
    fn nested_boundaries_cascade() {
        // outer forwards its input to inner, inner to the leaf actor
        let root = build::block(
            None,
            vec![
                build::link(
                    build::outport("src", "out"),
                    build::inport("o", "in"),
                ),
                build::link(
                    internal_inport_at("o", "in"),
                    build::inport("o:n", "in"),
                ),
                build::link(
                    internal_inport_at("o:n", "in"),
                    build::inport("o:n:leaf", "in"),
                ),
            ],
        );
        let mut resolver = PortMapResolver::default();
        resolver.resolve(&root);
        assert_eq!(
            connections(&root),
            vec![("src.out".to_string(), "o:n:leaf.in".to_string())]
        );
    }
}
