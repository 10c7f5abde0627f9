//! Command-line interface definition.
use argh::FromArgs;
use std::path::PathBuf;

#[derive(FromArgs)]
/// The skein dataflow-script compiler.
pub struct Opts {
    #[argh(subcommand)]
    pub command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Compile(CompileOpts),
    Install(InstallOpts),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "compile")]
/// compile a parsed script tree into an application manifest
pub struct CompileOpts {
    /// parsed script tree (JSON); omit to read from stdin
    #[argh(positional)]
    pub file: Option<PathBuf>,

    /// script name used to qualify manifest keys
    #[argh(option, short = 'n', default = "String::from(\"script\")")]
    pub name: String,

    /// write the manifest here instead of stdout
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,

    /// pretty-print the manifest JSON
    #[argh(switch)]
    pub pretty: bool,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "install")]
/// export component definitions from a script and bundle them for a store
pub struct InstallOpts {
    /// parsed script tree (JSON) with component definitions
    #[argh(option)]
    pub script: PathBuf,

    /// namespace to install components under
    #[argh(option)]
    pub namespace: String,

    /// name of component(s) to install; default is all found in the script
    #[argh(option)]
    pub component: Vec<String>,

    /// overwrite components that exist at the destination
    #[argh(switch)]
    pub force: bool,

    /// write the component bundle here instead of stdout
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,
}
