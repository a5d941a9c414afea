//! # Normalization Passes
//!
//! AST-to-AST transforms applied before IR building. Each pass mutates the
//! program in place and reports whether anything changed; the external pass
//! pipeline re-invokes passes until none reports a change.
//!
//! ```text
//! parse(source) -> [Normalization Passes] -> build_ir() -> optimize -> execute
//! ```
//!
//! Passes consult upstream analyses (types, groundedness) read-only through
//! an [`AnalysisContext`]. A pass invocation assumes the analyses are fresh
//! for the current program snapshot; after a pass reports a change the
//! pipeline must recompute them before the next invocation.

use crate::analysis::{GroundednessAnalysis, TypeAnalysis};
use crate::ast::Program;

mod resolve_record_aliases;

pub use resolve_record_aliases::ResolveRecordAliases;

/// Read-only analysis results injected into a pass invocation
pub struct AnalysisContext<'a> {
    pub types: &'a dyn TypeAnalysis,
    pub groundedness: &'a dyn GroundednessAnalysis,
}

impl<'a> AnalysisContext<'a> {
    /// Bundle the two analyses for one pass invocation
    pub fn new(
        types: &'a dyn TypeAnalysis,
        groundedness: &'a dyn GroundednessAnalysis,
    ) -> Self {
        AnalysisContext {
            types,
            groundedness,
        }
    }
}

/// A program-to-program normalization pass
pub trait Transform {
    /// Name of the pass, for logs
    fn name(&self) -> &'static str;

    /// Apply the pass to the whole program
    ///
    /// Returns true iff the program was changed. A single invocation must be
    /// safe to repeat: fixpointing is the caller's job.
    fn apply(&mut self, program: &mut Program, ctx: &AnalysisContext<'_>) -> bool;
}
