//! Post-construction grammar checks.
//!
//! The engine is deliberately permissive: an unbound rule is legal and
//! simply matches nothing. `validate` surfaces such stubs so grammar
//! authors can tell a deliberately open rule from a typo.

use crate::error::GrammarError;
use crate::grammar::def::Def;
use crate::grammar::Grammar;

/// Scan the grammar for declared-but-never-defined rules.
pub(crate) fn validate_grammar(grammar: &Grammar) -> Vec<GrammarError> {
    let mut findings = Vec::new();
    for (_, def) in grammar.defs() {
        if let Def::Rule { name, body: None } = def {
            findings.push(GrammarError::UnboundRule {
                name: grammar.resolve_name(*name).to_string(),
            });
        }
    }
    findings
}
