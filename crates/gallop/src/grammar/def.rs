use compact_str::CompactString;
use lasso::Spur;
use smallvec::SmallVec;

use crate::value::Action;

/// Stable identity of one combinator instance.
///
/// An id is an index into its [`Grammar`](crate::grammar::Grammar)'s
/// definition arena and is only meaningful together with that grammar.
/// Identity is what the memo table keys on, so two ids are equal exactly
/// when they denote the same parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParserId(pub(crate) u32);

impl ParserId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Child list storage; most real-world rules have few children.
pub(crate) type ChildIds = SmallVec<[ParserId; 4]>;

/// A combinator definition.
pub(crate) enum Def {
    /// Match a literal prefix of the input.
    Term(CompactString),
    /// Match nothing, producing the empty value.
    Epsilon,
    /// Run every child in order, threading the position through.
    /// Canonicalization guarantees the child list is non-empty.
    Seq(ChildIds),
    /// Explore every child at the same position.
    Alt(ChildIds),
    /// Apply a semantic action to the inner parser's values.
    Red { inner: ParserId, action: Action },
    /// A named rule. The body is bound after construction so rules can
    /// refer to themselves and to rules declared later; an unbound body
    /// matches nothing.
    Rule { name: Spur, body: Option<ParserId> },
}

/// Canonicalization key for the constructor cache.
///
/// Two constructor calls with equal keys must return the same
/// [`ParserId`]. Without this, a self-referential combinator like `many`
/// would mint a fresh identity on every mention and the memo table could
/// never observe the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum DefKey {
    Term(CompactString),
    Epsilon,
    Seq(ChildIds),
    Alt(ChildIds),
    Red(ParserId, Action),
    Many(ParserId),
}
