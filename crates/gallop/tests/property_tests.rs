//! Property-based invariants of the engine, driven by proptest.

use proptest::prelude::*;

use gallop::{Grammar, ParserId, Value};

/// Sort parse values into a canonical multiset representation.
fn multiset(values: Vec<Value>) -> Vec<String> {
    let mut rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    rendered.sort();
    rendered
}

/// `S ::= "a" S | "a" | ε` over a handle; used where an ambiguous grammar
/// is needed.
fn ambiguous_tail(g: &mut Grammar) -> ParserId {
    let s = g.declare("S");
    let a = g.term("a");
    let eps = g.epsilon();
    let recursive = g.seq([a, s]);
    let body = g.alt([recursive, a, eps]);
    g.define(s, body).unwrap();
    s
}

/// One of a few representative combinator shapes, by index. Covers
/// value-producing cases from every primitive: leaf, empty leaf,
/// sequence node, repetition, and the empty value.
fn pick_parser(g: &mut Grammar, which: usize) -> ParserId {
    match which {
        0 => g.term("a"),
        1 => g.term(""),
        2 => g.seq(["a", "b"]),
        3 => {
            let a = g.term("a");
            g.many(a)
        }
        _ => g.epsilon(),
    }
}

proptest! {
    /// `term(s)` matches the whole input exactly when the input is `s`.
    #[test]
    fn terminal_exactness(lit in "[ab]{0,3}", input in "[ab]{0,4}") {
        let mut g = Grammar::new();
        let t = g.term(&lit);
        let results = g.parse_all(t, &input);
        if input == lit {
            prop_assert_eq!(results, vec![Value::text(lit.as_str())]);
        } else {
            prop_assert!(results.is_empty());
        }
    }

    /// Reordering alternatives preserves the multiset of full-match
    /// values (though not their order).
    #[test]
    fn alternation_result_set_ignores_order(input in "[ab]{0,4}") {
        let literals = ["a", "b", "ab", "aa", "ba"];

        let mut forward = Grammar::new();
        let fwd = forward.alt(literals);

        let mut backward = Grammar::new();
        let mut reversed = literals;
        reversed.reverse();
        let bwd = backward.alt(reversed);

        prop_assert_eq!(
            multiset(forward.parse_all(fwd, &input)),
            multiset(backward.parse_all(bwd, &input))
        );
    }

    /// The null reduction descriptor is the identity on any parser: the
    /// same handle comes back, and parses agree value-for-value on every
    /// input, empty-valued results included.
    #[test]
    fn null_reduction_is_identity(which in 0usize..5, input in "[ab]{0,4}") {
        let mut g = Grammar::new();
        let p = pick_parser(&mut g, which);
        let reduced = g.red_opt(p, None);
        prop_assert_eq!(p, reduced);
        prop_assert_eq!(g.parse_all(p, &input), g.parse_all(reduced, &input));
    }

    /// Epsilon is neutral for acceptance on either side of a parser.
    #[test]
    fn epsilon_neutrality(input in "[ab]{0,4}") {
        let mut g = Grammar::new();
        let p = g.seq(["a", "b"]);
        let eps = g.epsilon();
        let left = g.seq([eps, p]);
        let right = g.seq([p, eps]);

        let bare = g.parse_all(p, &input);
        let padded_left = g.parse_all(left, &input);
        let padded_right = g.parse_all(right, &input);

        prop_assert_eq!(bare.is_empty(), padded_left.is_empty());
        prop_assert_eq!(bare.is_empty(), padded_right.is_empty());
        for value in padded_left.iter().chain(&padded_right) {
            prop_assert_eq!(value.flat_text(), input.clone());
        }
    }

    /// `seq(a, b, c)` and `seq(a, seq(b, c))` accept the same inputs; the
    /// tree shapes differ.
    #[test]
    fn sequence_associativity_of_acceptance(input in "[abc]{0,4}") {
        let mut g = Grammar::new();
        let flat = g.seq(["a", "b", "c"]);
        let bc = g.seq(["b", "c"]);
        let a = g.term("a");
        let nested = g.seq([a, bc]);

        prop_assert_eq!(
            g.parse_all(flat, &input).is_empty(),
            g.parse_all(nested, &input).is_empty()
        );
    }

    /// The full-match multiset is a function of grammar and input alone:
    /// repeated parses agree exactly.
    #[test]
    fn parsing_is_deterministic(input in "a{0,5}") {
        let mut g = Grammar::new();
        let s = ambiguous_tail(&mut g);
        let first = g.parse_all(s, &input);
        let second = g.parse_all(s, &input);
        prop_assert_eq!(first, second);
    }

    /// Every full match flattens back to the input, whatever the
    /// derivation.
    #[test]
    fn full_matches_flatten_to_the_input(input in "a{0,6}") {
        let mut g = Grammar::new();
        let s = ambiguous_tail(&mut g);
        for value in g.parse(s, &input).take(50) {
            prop_assert_eq!(value.flat_text(), input.clone());
        }
    }
}
