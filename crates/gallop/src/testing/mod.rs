//! # Testing Utilities
//!
//! Grammar fixtures shared by the integration tests and benches. These are
//! ordinary grammars built through the public API; nothing here is wired
//! into the engine.

use crate::grammar::{Grammar, ParserId};

/// Ambiguous infix arithmetic:
///
/// ```text
/// expr ::= expr op expr | "(" expr ")" | num
/// num  ::= "0" | ... | "9"          (reduced by `num`)
/// op   ::= "+" | "-"                (reduced by `sym`)
/// ```
///
/// The binary branch is reduced by `app` and the parenthesized branch by
/// `group`, so callers can evaluate trees by dispatching on the action
/// name. The grammar is both left- and right-recursive; `"1+2+3"` has two
/// derivations.
pub fn ambiguous_arithmetic(g: &mut Grammar) -> ParserId {
    let digits: Vec<ParserId> = (0..10).map(|d| g.term(&d.to_string())).collect();
    let digit = g.alt(digits);
    let num = g.red(digit, "num");

    let operators = g.alt(["+", "-"]);
    let op = g.red(operators, "sym");

    let expr = g.declare("expr");
    let binary = g.seq([expr, op, expr]);
    let app = g.red(binary, "app");
    let open = g.term("(");
    let close = g.term(")");
    let parenthesized = g.seq([open, expr, close]);
    let group = g.red(parenthesized, "group");
    let body = g.alt([app, group, num]);
    g.define(expr, body).expect("expr is a rule handle");
    expr
}

/// The SICP toy natural-language grammar, over space-terminated words.
///
/// `noun-phrase` and `verb-phrase` are directly left-recursive through
/// their prepositional-phrase extensions.
pub fn sicp_sentence(g: &mut Grammar) -> ParserId {
    let noun = word_class(g, "noun", &["student ", "professor ", "cat ", "class "]);
    let verb = word_class(g, "verb", &["studies ", "lectures ", "eats ", "sleeps "]);
    let article = word_class(g, "article", &["the ", "a "]);
    let preposition = word_class(g, "prep", &["for ", "to ", "in ", "by ", "with "]);

    let sentence = g.declare("sentence");
    let noun_phrase = g.declare("noun-phrase");
    let verb_phrase = g.declare("verb-phrase");

    let prep_body = g.seq([preposition, noun_phrase]);
    let prep_phrase = g.red(prep_body, "prep-phrase");

    let simple_body = g.seq([article, noun]);
    let simple_noun_phrase = g.red(simple_body, "simple-noun-phrase");
    let extended_np = g.seq([noun_phrase, prep_phrase]);
    let np_body = g.alt([simple_noun_phrase, extended_np]);
    g.define(noun_phrase, np_body)
        .expect("noun-phrase is a rule handle");

    let extended_vp = g.seq([verb_phrase, prep_phrase]);
    let vp_body = g.alt([verb, extended_vp]);
    g.define(verb_phrase, vp_body)
        .expect("verb-phrase is a rule handle");

    let sentence_body = g.seq([noun_phrase, verb_phrase]);
    let tagged = g.red(sentence_body, "sentence");
    g.define(sentence, tagged).expect("sentence is a rule handle");
    sentence
}

/// `S ::= "b" | S S | S S S`, the classic superpolynomially ambiguous
/// grammar. Seven `b`s already admit 654 derivations.
pub fn exponential_bs(g: &mut Grammar) -> ParserId {
    let s = g.declare("S");
    let b = g.term("b");
    let pair = g.seq([s, s]);
    let triple = g.seq([s, s, s]);
    let body = g.alt([b, pair, triple]);
    g.define(s, body).expect("S is a rule handle");
    s
}

fn word_class(g: &mut Grammar, class: &str, words: &[&str]) -> ParserId {
    let alternatives: Vec<ParserId> = words.iter().map(|&w| g.term(w)).collect();
    let any = g.alt(alternatives);
    g.red(any, class)
}
