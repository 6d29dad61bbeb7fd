//! # Grammar Construction
//!
//! Combinator constructors and the identity discipline that makes
//! arbitrary context-free grammars, cyclic ones included, parseable.
//!
//! ## Overview
//!
//! A [`Grammar`] owns every combinator it builds and hands out [`ParserId`]
//! handles. Two things distinguish this from a conventional combinator
//! library:
//!
//! - **Canonicalized construction.** Constructors are memoized on their
//!   arguments, so structurally equal combinators share one identity. The
//!   engine's memo table keys on identity; without sharing, recursive
//!   grammars would never hit the table and left recursion would diverge.
//! - **Late-bound rules.** [`Grammar::declare`] mints a stable handle whose
//!   body is attached afterwards with [`Grammar::define`], permitting
//!   self-reference, mutual recursion, and forward references. The handle,
//!   not the body, is the memoization key.
//!
//! Rules may reference rules that are never defined; those parse to the
//! empty result set. [`Grammar::validate`] reports them.

pub mod builder;
pub(crate) mod def;
pub mod validate;

pub use builder::{Grammar, IntoParser};
pub use def::ParserId;

pub(crate) use def::Def;
