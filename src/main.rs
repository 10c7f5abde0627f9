//! Driver: reads a parsed script tree, runs the pipeline, prints the
//! manifest, and reports diagnostics on stderr.
mod cmdline;

use atty::Stream;
use cmdline::{Command, CompileOpts, InstallOpts, Opts};
use serde::Serialize;
use skein_ast::{
    find_kind, tree_from_json, tree_to_json, JsonNode, Kind, Node, NodeKind,
    RRC,
};
use skein_passes::{compile, export_components};
use skein_store::{ActorClass, LocalStore};
use skein_utils::{Error, Id, Report, SkeinResult};
use std::io::{Read, Write};
use std::path::Path;

fn main() {
    env_logger::init();
    let opts: Opts = argh::from_env();
    let result = match opts.command {
        Command::Compile(opts) => run_compile(opts),
        Command::Install(opts) => run_install(opts),
    };
    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

/// Read the parse tree from a file, or from the input stream when no file
/// is provided and the input stream is not a TTY.
fn read_tree(file: Option<&Path>) -> SkeinResult<RRC<Node>> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_file(format!("{}: {e}", path.display()))
        })?,
        None => {
            if atty::isnt(Stream::Stdin) {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                return Err(Error::invalid_file(
                    "No file provided and terminal not a TTY".to_string(),
                ));
            }
        }
    };
    let json: JsonNode = serde_json::from_str(&text)?;
    tree_from_json(&json)
}

fn report_issues(mut reports: Vec<Report>, script: &str) {
    reports.sort_by_key(|r| r.line);
    for report in &reports {
        eprintln!("{script}: {report}");
    }
}

fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
    pretty: bool,
) -> SkeinResult<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match output {
        Some(path) => std::fs::write(path, text + "\n")?,
        None => {
            let stdout = std::io::stdout();
            writeln!(stdout.lock(), "{text}")?;
        }
    }
    Ok(())
}

fn run_compile(opts: CompileOpts) -> SkeinResult<i32> {
    let root = read_tree(opts.file.as_deref())?;
    let store = LocalStore::new();
    let (manifest, reports) = compile(&root, &opts.name, &store);
    log::info!(
        "compiled `{}': {} actors, {} connection keys",
        opts.name,
        manifest.actors.len(),
        manifest.connections.len()
    );

    let script = opts
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    let failed = reports.iter().any(|r| r.is_error());
    report_issues(reports, &script);

    write_json(&manifest, opts.output.as_deref(), opts.pretty)?;
    Ok(if failed { 1 } else { 0 })
}

/// One installable component in the output bundle.
#[derive(Serialize)]
struct BundleEntry {
    namespace: String,
    name: String,
    definition: JsonNode,
}

/// The component's outside interface: the dot-form markers used in its
/// body name exactly the ports the component exposes.
fn component_interface(qualified: &str, definition: &RRC<Node>) -> ActorClass {
    let collect = |kind: Kind| {
        let mut names: Vec<Id> = Vec::new();
        for marker in find_kind(definition, kind) {
            if let Some((_, port)) = marker.borrow().kind.port_ref() {
                if !names.contains(&port) {
                    names.push(port);
                }
            }
        }
        names
    };
    let inports = collect(Kind::InternalInPort);
    let outports = collect(Kind::InternalOutPort);
    ActorClass {
        actor_type: Id::from(qualified),
        inports,
        outports,
        is_primitive: false,
    }
}

fn run_install(opts: InstallOpts) -> SkeinResult<i32> {
    let root = read_tree(Some(&opts.script))?;
    let (components, reports) = export_components(&root);
    let script = opts.script.display().to_string();
    let mut failed = reports.iter().any(|r| r.is_error());
    report_issues(reports, &script);

    let mut store = LocalStore::new();
    let mut bundle: Vec<BundleEntry> = Vec::new();
    let mut installed: Vec<String> = Vec::new();
    for definition in &components {
        let name = match &definition.borrow().kind {
            NodeKind::Component { name, .. } => name.to_string(),
            _ => continue,
        };
        if !opts.component.is_empty() && !opts.component.contains(&name) {
            continue;
        }
        let qualified = format!("{}.{}", opts.namespace, name);
        let interface = component_interface(&qualified, definition);
        let serialized = tree_to_json(definition);
        if let Err(err) = store.add_component(
            &opts.namespace,
            &name,
            interface,
            serialized.clone(),
            opts.force,
        ) {
            eprintln!("{script}: Error: {}", err.message());
            failed = true;
            continue;
        }
        bundle.push(BundleEntry {
            namespace: opts.namespace.clone(),
            name: name.clone(),
            definition: serialized,
        });
        installed.push(name);
    }

    // A requested component that is not in the script is an error.
    for requested in &opts.component {
        if !installed.contains(requested) {
            eprintln!(
                "{script}: Error: No component `{requested}' in script"
            );
            failed = true;
        }
    }

    if failed {
        return Ok(1);
    }
    write_json(&bundle, opts.output.as_deref(), true)?;
    Ok(0)
}
