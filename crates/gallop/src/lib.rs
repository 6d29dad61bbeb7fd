//! # Gallop
//!
//! A GLL-style parser combinator engine for arbitrary context-free
//! grammars, including left-recursive, ambiguous, and cyclic ones, that
//! returns the complete (lazily produced) set of successful parses.
//!
//! ## Overview
//!
//! Conventional combinator libraries diverge on left recursion and commit
//! to one derivation of an ambiguous input. Gallop instead routes every
//! combinator invocation through a central trampoline that memoizes each
//! `(parser, input position)` pair, collects all distinct sub-results, and
//! re-fires registered continuations, so:
//!
//! - **Left recursion terminates**, direct or indirect: re-entering a pair
//!   under computation subscribes for its results instead of recursing.
//! - **Ambiguity is exhaustive**: every derivation is explored
//!   breadth-first and every distinct parse tree is produced.
//! - **Results are lazy**: the stream interleaves production with worklist
//!   drainage, so a caller can take a prefix without exhausting a large
//!   (or infinite) derivation space.
//!
//! Parse trees are [`Value`]s: tagged lists whose default `seq` tag can be
//! replaced by opaque user [`Action`]s via reduction. The engine never
//! evaluates actions; callers post-process the tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use gallop::{Grammar, Value};
//!
//! let mut g = Grammar::new();
//!
//! // num ::= "0" | ... | "9", tagged `num`
//! let digits: Vec<_> = (0..10).map(|d| g.term(&d.to_string())).collect();
//! let digit = g.alt(digits);
//! let num = g.red(digit, "num");
//!
//! // expr ::= expr op expr | num   (left- AND right-recursive)
//! let expr = g.declare("expr");
//! let op = g.alt(["+", "-"]);
//! let binary = g.seq([expr, op, expr]);
//! let body = g.alt([binary, num]);
//! g.define(expr, body)?;
//!
//! // "1+2+3" is ambiguous: two derivations, both full matches.
//! let trees: Vec<Value> = g.parse(expr, "1+2+3").collect();
//! assert_eq!(trees.len(), 2);
//! for tree in &trees {
//!     assert_eq!(tree.flat_text(), "1+2+3");
//! }
//! # Ok::<(), gallop::GrammarError>(())
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - Combinator constructors and grammar definition
//! - [`engine`] - The trampoline scheduler and lazy result stream
//! - [`value`] - Parse value trees, tags, and semantic-action descriptors
//! - [`error`] - Construction-time findings
//! - [`testing`] - Grammar fixtures for tests and benches
//!
//! ## What the engine does not do
//!
//! No error recovery, no source locations, no grammar normalization, no
//! incremental re-parsing. An input with no derivation is an empty result
//! stream, not an error. Grammars admitting infinitely many distinct
//! derivations keep producing for as long as the caller keeps pulling;
//! termination is a property of the grammar and input, not of the engine.

pub mod engine;
pub mod error;
pub mod grammar;
pub mod testing;
pub mod value;

// Re-export commonly used types
pub use engine::{Parses, ParseStats};
pub use error::GrammarError;
pub use grammar::{Grammar, IntoParser, ParserId};
pub use value::{Action, Tag, Value};
