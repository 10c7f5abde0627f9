//! The tree-rewriting pipeline: from a parsed script tree to a flat
//! application manifest.
//!
//! Passes run in a fixed order, each consuming the tree its predecessor
//! produced: component collection, expansion, implicit-port rewriting,
//! flattening, port-map resolution, manifest emission. Diagnostics
//! accumulate across the whole run; an error anywhere marks the manifest
//! invalid but never stops the remaining passes.
mod manifest;
mod pipeline;

pub mod passes;
pub mod traversal;

pub use manifest::{ActorEntry, Manifest};
pub use pipeline::{compile, export_components};
