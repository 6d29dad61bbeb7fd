//! The caller-facing lazy stream of parse values.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::engine::trampoline::{Cont, ParseStats, Trampoline};
use crate::grammar::{Grammar, ParserId};
use crate::value::Value;

/// Lazy sequence of complete-match values for one parse.
///
/// Each [`next`](Iterator::next) call drains the trampoline only until the
/// next batch of complete matches appears (or the worklist empties), so a
/// caller can take a prefix of an ambiguous (or even infinite) result
/// stream without exhausting the exploration. Dropping the stream drops
/// the trampoline and its memo table; no further work happens.
pub struct Parses<'g> {
    grammar: &'g Grammar,
    trampoline: Trampoline,
    batch: VecDeque<Value>,
}

impl<'g> Parses<'g> {
    pub(crate) fn new(grammar: &'g Grammar, parser: ParserId, input: &str) -> Self {
        let mut trampoline = Trampoline::new(Arc::from(input));
        trampoline.push(parser, 0, Cont::gather());
        Self {
            grammar,
            trampoline,
            batch: VecDeque::new(),
        }
    }

    /// Scheduler counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> ParseStats {
        self.trampoline.stats()
    }
}

impl Iterator for Parses<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        loop {
            if let Some(value) = self.batch.pop_front() {
                return Some(value);
            }
            if !self.trampoline.has_next() {
                return None;
            }
            while self.trampoline.has_next() && !self.trampoline.has_matches() {
                self.trampoline.step(self.grammar);
            }
            self.batch.extend(self.trampoline.take_matches());
        }
    }
}

impl FusedIterator for Parses<'_> {}
