//! # Error Types
//!
//! Construction-time findings. The parse path itself has no error channel:
//! an input with no derivation is an empty result stream, and a grammar
//! admitting unboundedly many derivations simply never exhausts its
//! worklist.
//!
//! When the `diagnostics` feature is enabled, errors integrate with
//! [`miette`] for rich reporting.

use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

use crate::grammar::ParserId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    /// A rule was declared but its body never bound. Parsing such a rule
    /// yields no results; this finding is advisory.
    #[error("rule `{name}` is declared but never defined")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::unbound_rule)))]
    UnboundRule { name: String },

    /// `define` was handed a parser that is not a rule handle.
    #[error("parser {0:?} is not a declared rule and cannot be given a body")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::not_a_rule)))]
    NotARule(ParserId),
}
