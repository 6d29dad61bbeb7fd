use compact_str::CompactString;
use hashbrown::HashMap;
use lasso::Rodeo;

use crate::engine::Parses;
use crate::error::GrammarError;
use crate::grammar::def::{ChildIds, Def, DefKey, ParserId};
use crate::grammar::validate::validate_grammar;
use crate::value::{Action, Value};

/// A grammar: an arena of combinator definitions plus the canonicalization
/// state that keeps combinator identities stable.
///
/// All constructors return a [`ParserId`], a cheap copyable handle. Handles
/// are only meaningful with the grammar that minted them. Construction
/// takes `&mut self`; parsing takes `&self`, so a finished grammar can be
/// shared freely across any number of parses.
///
/// Constructors are memoized on their arguments: `term("a")` called twice
/// hands back the same id, `alt` of the same children likewise. Named
/// rules come from [`declare`](Self::declare) and get their bodies bound
/// later, which is how recursive and mutually recursive grammars are tied.
pub struct Grammar {
    defs: Vec<Def>,
    canon: HashMap<DefKey, ParserId, ahash::RandomState>,
    names: Rodeo,
    rules: HashMap<lasso::Spur, ParserId, ahash::RandomState>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    #[must_use]
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            canon: HashMap::default(),
            names: Rodeo::new(),
            rules: HashMap::default(),
        }
    }

    #[must_use]
    pub fn with_capacity(parsers: usize) -> Self {
        Self {
            defs: Vec::with_capacity(parsers),
            canon: HashMap::with_capacity_and_hasher(parsers, ahash::RandomState::new()),
            names: Rodeo::new(),
            rules: HashMap::default(),
        }
    }

    /// Number of distinct parsers constructed so far.
    #[must_use]
    pub fn parser_count(&self) -> usize {
        self.defs.len()
    }

    // ── Named rules ──────────────────────────────────────────────────

    /// Declare a named rule, returning its stable handle.
    ///
    /// Declaring the same name again returns the same handle, so forward
    /// references work: declare everything, then bind bodies with
    /// [`define`](Self::define) in any order. A rule whose body is never
    /// bound matches nothing.
    pub fn declare(&mut self, name: &str) -> ParserId {
        let name = self.names.get_or_intern(name);
        if let Some(&id) = self.rules.get(&name) {
            return id;
        }
        let id = self.alloc(Def::Rule { name, body: None });
        self.rules.insert(name, id);
        id
    }

    /// Bind (or rebind) the body of a declared rule.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::NotARule`] if `rule` was not produced by
    /// [`declare`](Self::declare).
    pub fn define(&mut self, rule: ParserId, body: impl IntoParser) -> Result<(), GrammarError> {
        let body = body.into_parser(self);
        match &mut self.defs[rule.index()] {
            Def::Rule { body: slot, .. } => {
                *slot = Some(body);
                Ok(())
            }
            _ => Err(GrammarError::NotARule(rule)),
        }
    }

    /// Declare `name`, bind `body` reduced by an action named after the
    /// rule itself, and return the handle.
    ///
    /// This is the usual way to build a grammar whose parse trees carry
    /// one tagged node per rule application.
    pub fn define_rule(&mut self, name: &str, body: impl IntoParser) -> ParserId {
        let rule = self.declare(name);
        let body = body.into_parser(self);
        let tagged = self.red(body, Action::new(name));
        self.bind(rule, tagged);
        rule
    }

    /// Look up a previously declared rule by name.
    #[must_use]
    pub fn rule_named(&self, name: &str) -> Option<ParserId> {
        let name = self.names.get(name)?;
        self.rules.get(&name).copied()
    }

    /// The declared name of a rule handle, if `id` is one.
    #[must_use]
    pub fn name_of(&self, id: ParserId) -> Option<&str> {
        match self.defs.get(id.index())? {
            Def::Rule { name, .. } => Some(self.names.resolve(name)),
            _ => None,
        }
    }

    // ── Primitive constructors ───────────────────────────────────────

    /// A terminal matching `literal` as a prefix of the remaining input.
    ///
    /// The empty literal is permitted and succeeds everywhere without
    /// consuming anything.
    pub fn term(&mut self, literal: &str) -> ParserId {
        let literal = CompactString::from(literal);
        self.canonical(DefKey::Term(literal.clone()), || Def::Term(literal))
    }

    /// The parser that matches the empty string, producing [`Value::Empty`].
    pub fn epsilon(&mut self) -> ParserId {
        self.canonical(DefKey::Epsilon, || Def::Epsilon)
    }

    /// Run the children in order; the value is a `seq`-tagged node of the
    /// child values. An empty sequence is epsilon.
    pub fn seq<I>(&mut self, items: I) -> ParserId
    where
        I: IntoIterator,
        I::Item: IntoParser,
    {
        let ids = self.resolve_children(items);
        if ids.is_empty() {
            return self.epsilon();
        }
        self.canonical(DefKey::Seq(ids.clone()), || Def::Seq(ids))
    }

    /// Explore every child at the same position, in declaration order.
    ///
    /// Each child that succeeds contributes its values independently; the
    /// memo table is what deduplicates coinciding results. A one-element
    /// alternation is the element itself.
    pub fn alt<I>(&mut self, items: I) -> ParserId
    where
        I: IntoIterator,
        I::Item: IntoParser,
    {
        let ids = self.resolve_children(items);
        if ids.len() == 1 {
            return ids[0];
        }
        self.canonical(DefKey::Alt(ids.clone()), || Def::Alt(ids))
    }

    /// Reduce `parser` by `action`: successful values are retagged (see
    /// [`Value`]'s reduction shape) and positions pass through untouched.
    pub fn red(&mut self, parser: ParserId, action: impl Into<Action>) -> ParserId {
        let action = action.into();
        self.canonical(DefKey::Red(parser, action.clone()), || Def::Red {
            inner: parser,
            action,
        })
    }

    /// Like [`red`](Self::red), but the null descriptor is the identity:
    /// `red_opt(p, None)` is `p`.
    pub fn red_opt(&mut self, parser: ParserId, action: Option<Action>) -> ParserId {
        match action {
            Some(action) => self.red(parser, action),
            None => parser,
        }
    }

    // ── Derived constructors ─────────────────────────────────────────

    /// Zero or one occurrences: `alt(epsilon, p)`.
    pub fn maybe(&mut self, parser: ParserId) -> ParserId {
        let eps = self.epsilon();
        self.alt([eps, parser])
    }

    /// Zero or more occurrences: `alt(epsilon, seq(p, many(p)))`.
    ///
    /// The self-reference reuses a single identity, keyed on `parser`, so
    /// the memo table sees the cycle instead of an unbounded unfolding.
    pub fn many(&mut self, parser: ParserId) -> ParserId {
        if let Some(&id) = self.canon.get(&DefKey::Many(parser)) {
            return id;
        }
        let name = self
            .names
            .get_or_intern(format!("many#{}", self.defs.len()));
        let id = self.alloc(Def::Rule { name, body: None });
        self.canon.insert(DefKey::Many(parser), id);
        let eps = self.epsilon();
        let tail = self.seq([parser, id]);
        let body = self.alt([eps, tail]);
        self.bind(id, body);
        id
    }

    /// One or more occurrences: `seq(p, many(p))`.
    pub fn many1(&mut self, parser: ParserId) -> ParserId {
        let rest = self.many(parser);
        self.seq([parser, rest])
    }

    // ── Validation and parsing ───────────────────────────────────────

    /// Post-hoc construction check. Findings are advisory: an unbound rule
    /// parses to the empty result set rather than failing.
    #[must_use]
    pub fn validate(&self) -> Vec<GrammarError> {
        validate_grammar(self)
    }

    /// Parse `input` with `parser`, returning the lazy stream of values
    /// for complete matches (those consuming the whole input).
    ///
    /// A fresh engine and memo table back each call; dropping the stream
    /// abandons any unexplored derivations. No match is reported as an
    /// empty stream, never as an error.
    #[must_use]
    pub fn parse<'g>(&'g self, parser: ParserId, input: &str) -> Parses<'g> {
        Parses::new(self, parser, input)
    }

    /// Drive [`parse`](Self::parse) to exhaustion and collect every value.
    ///
    /// Grammars admitting infinitely many distinct derivations will not
    /// return; use [`parse`](Self::parse) and take a prefix instead.
    #[must_use]
    pub fn parse_all(&self, parser: ParserId, input: &str) -> Vec<Value> {
        self.parse(parser, input).collect()
    }

    // ── Internals ────────────────────────────────────────────────────

    pub(crate) fn def(&self, id: ParserId) -> &Def {
        &self.defs[id.index()]
    }

    fn alloc(&mut self, def: Def) -> ParserId {
        let id = ParserId(u32::try_from(self.defs.len()).expect("grammar arena overflow"));
        self.defs.push(def);
        id
    }

    fn canonical(&mut self, key: DefKey, def: impl FnOnce() -> Def) -> ParserId {
        if let Some(&id) = self.canon.get(&key) {
            return id;
        }
        let id = self.alloc(def());
        self.canon.insert(key, id);
        id
    }

    /// Bind a rule body where the handle is known to be a rule.
    fn bind(&mut self, rule: ParserId, body: ParserId) {
        match &mut self.defs[rule.index()] {
            Def::Rule { body: slot, .. } => *slot = Some(body),
            _ => unreachable!("bind on a non-rule handle"),
        }
    }

    fn resolve_children<I>(&mut self, items: I) -> ChildIds
    where
        I: IntoIterator,
        I::Item: IntoParser,
    {
        // Collect before canonicalizing: children may themselves allocate.
        let mut ids = ChildIds::new();
        for item in items {
            ids.push(item.into_parser(self));
        }
        ids
    }

    pub(crate) fn resolve_name(&self, name: lasso::Spur) -> &str {
        self.names.resolve(&name)
    }

    pub(crate) fn defs(&self) -> impl Iterator<Item = (ParserId, &Def)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (ParserId(i as u32), def))
    }
}

/// Anything acceptable as a child of [`Grammar::seq`] / [`Grammar::alt`]:
/// an existing [`ParserId`], or a string literal which becomes a terminal.
pub trait IntoParser {
    fn into_parser(self, grammar: &mut Grammar) -> ParserId;
}

impl IntoParser for ParserId {
    fn into_parser(self, _grammar: &mut Grammar) -> ParserId {
        self
    }
}

impl IntoParser for &str {
    fn into_parser(self, grammar: &mut Grammar) -> ParserId {
        grammar.term(self)
    }
}

impl IntoParser for &String {
    fn into_parser(self, grammar: &mut Grammar) -> ParserId {
        grammar.term(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_are_canonicalized() {
        let mut g = Grammar::with_capacity(8);
        assert_eq!(g.term("a"), g.term("a"));
        assert_ne!(g.term("a"), g.term("b"));

        let a = g.term("a");
        let b = g.term("b");
        assert_eq!(g.seq([a, b]), g.seq([a, b]));
        assert_eq!(g.alt([a, b]), g.alt([a, b]));
        assert_ne!(g.seq([a, b]), g.seq([b, a]));

        let red = g.red(a, "x");
        assert_eq!(red, g.red(a, "x"));
        assert_ne!(red, g.red(a, "y"));

        // Repeating any constructor allocates nothing new.
        let before = g.parser_count();
        let _ = g.seq([a, b]);
        let _ = g.red(a, "x");
        assert_eq!(g.parser_count(), before);
    }

    #[test]
    fn many_reuses_one_identity() {
        let mut g = Grammar::new();
        let a = g.term("a");
        assert_eq!(g.many(a), g.many(a));
    }

    #[test]
    fn empty_seq_is_epsilon() {
        let mut g = Grammar::new();
        let empty = g.seq(Vec::<ParserId>::new());
        assert_eq!(empty, g.epsilon());
    }

    #[test]
    fn singleton_alt_is_its_element() {
        let mut g = Grammar::new();
        let a = g.term("a");
        assert_eq!(g.alt([a]), a);
    }

    #[test]
    fn null_reduction_is_identity() {
        let mut g = Grammar::new();
        let a = g.term("a");
        assert_eq!(g.red_opt(a, None), a);
    }

    #[test]
    fn declare_is_stable_per_name() {
        let mut g = Grammar::new();
        let s = g.declare("S");
        assert_eq!(s, g.declare("S"));
        assert_ne!(s, g.declare("T"));
        assert_eq!(g.rule_named("S"), Some(s));
        assert_eq!(g.name_of(s), Some("S"));
    }

    #[test]
    fn define_rejects_non_rules() {
        let mut g = Grammar::new();
        let a = g.term("a");
        let eps = g.epsilon();
        assert!(matches!(g.define(a, eps), Err(GrammarError::NotARule(_))));
    }
}
