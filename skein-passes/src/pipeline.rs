//! Fixed-order execution of the pipeline.
//!
//! The pass order is a contract: collection, expansion, implicit-port
//! rewriting, flattening, port-map resolution, emission. Passes gather
//! diagnostics instead of aborting; an error anywhere marks the manifest
//! invalid at the end.
use crate::manifest::Manifest;
use crate::passes::{
    ComponentCollector, Expander, Flatten, ImplicitPortRewrite,
    ManifestEmitter, PortMapResolver,
};
use crate::traversal::{DiagnosticPass, Named, Visitor};
use skein_ast::{Node, RRC};
use skein_store::ActorStore;
use skein_utils::{Report, Severity};
use std::time::Instant;

/// Compile a parsed script tree into its manifest. The tree is consumed:
/// passes rewrite it in place.
pub fn compile(
    root: &RRC<Node>,
    script_name: &str,
    store: &dyn ActorStore,
) -> (Manifest, Vec<Report>) {
    let mut reports: Vec<Report> = Vec::new();

    let mut collector = ComponentCollector::detaching();
    let components =
        timed(ComponentCollector::name(), || collector.collect(root));
    reports.extend(collector.diagnostics().reports());

    let mut expander = Expander::new(&components);
    run_pass(&mut expander, root, &mut reports);

    let mut rewrite = ImplicitPortRewrite::default();
    run_pass(&mut rewrite, root, &mut reports);

    let mut flatten = Flatten::default();
    run_pass(&mut flatten, root, &mut reports);

    let mut resolver = PortMapResolver::default();
    timed(PortMapResolver::name(), || resolver.resolve(root));
    reports.extend(resolver.diagnostics().reports());

    let mut emitter = ManifestEmitter::new(script_name, store);
    run_pass(&mut emitter, root, &mut reports);
    let mut manifest = emitter.into_manifest();

    manifest.valid = !reports.iter().any(Report::is_error);
    (manifest, reports)
}

/// Return the top-level component definitions without inlining anything,
/// for the install flow. The tree is left untouched.
pub fn export_components(
    root: &RRC<Node>,
) -> (Vec<RRC<Node>>, Vec<Report>) {
    let mut collector = ComponentCollector::preserving();
    let components = collector.collect(root);
    let reports = collector.diagnostics().reports();
    (components.into_iter().map(|(_, node)| node).collect(), reports)
}

fn run_pass<P>(pass: &mut P, root: &RRC<Node>, reports: &mut Vec<Report>)
where
    P: Visitor + Named + DiagnosticPass,
{
    let result = timed(P::name(), || pass.traverse(root));
    if let Err(err) = result {
        reports.push(Report::new(Severity::Error, &err));
    }
    reports.extend(pass.diagnostics().reports());
}

fn timed<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    log::info!("{name}: {}ms", start.elapsed().as_millis());
    out
}
