use skein_utils::{Error, Report, Severity};

use super::{Action, VisResult};

/// A pass that reports diagnostics.
pub trait DiagnosticPass {
    /// Return the diagnostics gathered by this pass.
    fn diagnostics(&self) -> &DiagnosticContext;
}

/// A type for accumulating multiple errors
#[derive(Default, Debug)]
pub struct DiagnosticContext {
    errors: Vec<Error>,
    warnings: Vec<Error>,
}

impl DiagnosticContext {
    /// Report an `error`
    pub fn err(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Report a `warning`
    pub fn warning(&mut self, warning: Error) {
        self.warnings.push(warning)
    }

    /// Accumulates `error` into the context, and returns
    /// `Ok(Action::Continue)`. Useful when a value needed to continue the
    /// visit could not be constructed.
    pub fn early_return_err(&mut self, error: Error) -> VisResult {
        self.err(error);
        Ok(Action::Continue)
    }

    pub fn warning_iter(&self) -> impl Iterator<Item = &Error> {
        self.warnings.iter()
    }

    pub fn errors_iter(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Flatten the gathered diagnostics into serializable records.
    pub fn reports(&self) -> Vec<Report> {
        self.errors
            .iter()
            .map(|e| Report::new(Severity::Error, e))
            .chain(
                self.warnings
                    .iter()
                    .map(|w| Report::new(Severity::Warning, w)),
            )
            .collect()
    }
}
