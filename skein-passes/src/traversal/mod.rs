//! Traversal machinery shared by the passes.
mod action;
mod diagnostics;
mod visitor;

pub use action::{Action, VisResult};
pub use diagnostics::{DiagnosticContext, DiagnosticPass};
pub use visitor::{walk, Named, Visitor};
