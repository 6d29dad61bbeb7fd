//! # Parse Engine
//!
//! The trampoline scheduler, its memo table, and the lazy result stream.
//!
//! ## Overview
//!
//! The engine explores every derivation of a context-free grammar over an
//! input breadth-first. Invocations are memoized on `(parser identity,
//! input offset)`; re-entry into a key under computation subscribes for
//! its results instead of recursing, which is how left-recursive and
//! cyclic grammars terminate. Continuations are explicit data routed
//! through a FIFO worklist, so long inputs and deep grammars cannot
//! overflow the stack.
//!
//! The engine is single-threaded and cooperative: all concurrency lives in
//! the worklist, and suspension points are exactly the hand-offs to the
//! trampoline.
//!
//! Callers normally reach this module through
//! [`Grammar::parse`](crate::Grammar::parse), which yields [`Parses`].

mod stream;
mod trampoline;

pub use stream::Parses;
pub use trampoline::ParseStats;
