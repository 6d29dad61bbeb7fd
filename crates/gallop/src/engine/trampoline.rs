//! The worklist scheduler and its memo table.
//!
//! Every recursive combinator invocation is routed through
//! [`Trampoline::push`], which memoizes on `(parser identity, input
//! offset)`. A re-entry into a key that is already being computed does not
//! run the parser again; it subscribes for that key's results. Since each
//! key has finitely many distinct results for a finite grammar and input,
//! this is what makes direct and indirect left recursion terminate.
//!
//! The call queue is strictly FIFO. Alternatives enqueue all of their
//! children before any child runs, so exploration is breadth-first and
//! fair; a LIFO queue would starve cyclically dependent entries.

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::grammar::{Def, Grammar, ParserId};
use crate::value::Value;

/// One successful sub-parse: the value built so far and the offset where
/// the unconsumed input begins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Success {
    pub value: Value,
    pub rest: usize,
}

/// Counters describing one parse run.
///
/// `invocations` equals `entries` in a correct run: a memo key's parser
/// body is executed exactly once, no matter how many times the key is
/// reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Thunks executed by the scheduler.
    pub steps: usize,
    /// Parser bodies run (one per fresh memo entry).
    pub invocations: usize,
    /// Memo entries created.
    pub entries: usize,
    /// `push` calls answered from an existing entry.
    pub memo_hits: usize,
    /// Distinct results discovered across all entries.
    pub results: usize,
}

/// A suspended computation awaiting sub-parse results.
///
/// Continuations are explicit data rather than closures: they sit in memo
/// entries and on the call queue, and resuming one only ever inserts into
/// an entry or enqueues more work. Nothing here re-enters a parser
/// synchronously, so stack depth stays constant regardless of grammar
/// depth or input length.
#[derive(Clone)]
pub(crate) struct Cont(Rc<ContKind>);

enum ContKind {
    /// Inner continuation of a memo entry: deduplicate the result under
    /// `(parser, at)` and fan it out to every registered subscriber.
    Complete { parser: ParserId, at: usize },
    /// A sequence part-way done: `taken` children matched so far, child
    /// `next` still to run. Delivers to the sequence's own entry when the
    /// child list is exhausted.
    Step {
        seq: ParserId,
        start: usize,
        next: usize,
        taken: SmallVec<[Value; 4]>,
    },
    /// Apply a reduction action, then deliver to the reduction's entry.
    Apply {
        red: ParserId,
        start: usize,
    },
    /// The driver's collector: keep values that consumed all input.
    Gather,
}

impl Cont {
    pub(crate) fn gather() -> Self {
        Self(Rc::new(ContKind::Gather))
    }

    fn complete(parser: ParserId, at: usize) -> Self {
        Self(Rc::new(ContKind::Complete { parser, at }))
    }

    fn step(seq: ParserId, start: usize, next: usize, taken: SmallVec<[Value; 4]>) -> Self {
        Self(Rc::new(ContKind::Step {
            seq,
            start,
            next,
            taken,
        }))
    }

    fn apply(red: ParserId, start: usize) -> Self {
        Self(Rc::new(ContKind::Apply { red, start }))
    }
}

/// Work item on the call queue.
pub(crate) enum Thunk {
    /// First computation of a memo key: run the parser body at the offset.
    Call { parser: ParserId, at: usize },
    /// Hand a discovered result to one registered continuation.
    Resume { cont: Cont, result: Rc<Success> },
}

/// State of one memo key.
///
/// Every continuation ever registered here fires exactly once per distinct
/// result, regardless of arrival order: results present at registration
/// are replayed to the newcomer, and results discovered later fan out to
/// everyone registered at that point.
struct MemoEntry {
    conts: SmallVec<[Cont; 2]>,
    /// Discovery order, for deterministic replay.
    results: Vec<Rc<Success>>,
    /// Structural-equality view of `results`.
    seen: HashSet<Rc<Success>, ahash::RandomState>,
}

/// The scheduler owning the call queue, the memo table, and the
/// accumulator of complete matches. One trampoline backs one parse, and
/// lives behind the parse's [`Parses`](crate::engine::Parses) stream.
pub(crate) struct Trampoline {
    input: Arc<str>,
    queue: VecDeque<Thunk>,
    memo: HashMap<ParserId, HashMap<usize, MemoEntry, ahash::RandomState>, ahash::RandomState>,
    matched: Vec<Value>,
    stats: ParseStats,
}

impl Trampoline {
    pub(crate) fn new(input: Arc<str>) -> Self {
        Self {
            input,
            queue: VecDeque::new(),
            memo: HashMap::default(),
            matched: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    /// True while the call queue still holds work.
    #[must_use]
    pub(crate) fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }

    #[must_use]
    pub(crate) fn stats(&self) -> ParseStats {
        self.stats
    }

    pub(crate) fn has_matches(&self) -> bool {
        !self.matched.is_empty()
    }

    pub(crate) fn take_matches(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.matched)
    }

    /// Pop one thunk off the queue and run it. No-op when the queue is
    /// empty. `grammar` must be the grammar the scheduled parsers belong
    /// to.
    pub(crate) fn step(&mut self, grammar: &Grammar) {
        let Some(thunk) = self.queue.pop_front() else {
            return;
        };
        self.stats.steps += 1;
        match thunk {
            Thunk::Call { parser, at } => self.invoke(grammar, parser, at),
            Thunk::Resume { cont, result } => self.resume(grammar, &cont, &result),
        }
    }

    /// Append a raw thunk at the tail of the call queue.
    ///
    /// This is the one way work enters the queue; [`push`](Self::push) and
    /// result fan-out both route through it. Tail-append plus head-consume
    /// is what keeps exploration FIFO-fair.
    pub(crate) fn push_thunk(&mut self, thunk: Thunk) {
        self.queue.push_back(thunk);
    }

    /// The memoizing invocation primitive.
    ///
    /// For a fresh `(parser, at)` key: register `cont` as the first
    /// subscriber and enqueue a single thunk that runs the parser body.
    /// For a known key: append `cont` and replay every result discovered
    /// so far to it. Either way `cont` ends up seeing each distinct result
    /// exactly once.
    pub(crate) fn push(&mut self, parser: ParserId, at: usize, cont: Cont) {
        let replay = match self.memo.entry(parser).or_default().entry(at) {
            Entry::Occupied(mut occupied) => {
                self.stats.memo_hits += 1;
                let entry = occupied.get_mut();
                entry.conts.push(cont.clone());
                Some(entry.results.clone())
            }
            Entry::Vacant(vacant) => {
                self.stats.entries += 1;
                vacant.insert(MemoEntry {
                    conts: SmallVec::from_iter([cont.clone()]),
                    results: Vec::new(),
                    seen: HashSet::default(),
                });
                None
            }
        };
        match replay {
            Some(results) => {
                for result in results {
                    self.push_thunk(Thunk::Resume {
                        cont: cont.clone(),
                        result,
                    });
                }
            }
            None => self.push_thunk(Thunk::Call { parser, at }),
        }
    }

    /// Run a parser body. Bodies never recurse directly: sub-parses go
    /// back through [`push`](Self::push) and successes through
    /// [`complete`](Self::complete).
    fn invoke(&mut self, grammar: &Grammar, parser: ParserId, at: usize) {
        self.stats.invocations += 1;
        match grammar.def(parser) {
            Def::Term(literal) => {
                if self.input[at..].starts_with(literal.as_str()) {
                    let rest = at + literal.len();
                    self.complete(
                        parser,
                        at,
                        Success {
                            value: Value::Text(literal.clone()),
                            rest,
                        },
                    );
                }
                // A failed terminal is silent: no result, no error.
            }
            Def::Epsilon => {
                self.complete(
                    parser,
                    at,
                    Success {
                        value: Value::Empty,
                        rest: at,
                    },
                );
            }
            Def::Seq(items) => {
                // Construction guarantees the list is non-empty.
                self.push(items[0], at, Cont::step(parser, at, 1, SmallVec::new()));
            }
            Def::Alt(items) => {
                // All children enqueue before any runs; declaration order
                // is the tie-break between alternatives.
                for &child in items {
                    self.push(child, at, Cont::complete(parser, at));
                }
            }
            Def::Red { inner, .. } => {
                self.push(*inner, at, Cont::apply(parser, at));
            }
            Def::Rule { body, .. } => {
                if let Some(body) = *body {
                    self.push(body, at, Cont::complete(parser, at));
                }
                // An unbound rule matches nothing.
            }
        }
    }

    fn resume(&mut self, grammar: &Grammar, cont: &Cont, result: &Rc<Success>) {
        match &*cont.0 {
            ContKind::Complete { parser, at } => {
                self.complete(*parser, *at, (**result).clone());
            }
            ContKind::Step {
                seq,
                start,
                next,
                taken,
            } => {
                let Def::Seq(items) = grammar.def(*seq) else {
                    unreachable!("sequence continuation bound to a non-sequence parser");
                };
                let mut taken = taken.clone();
                taken.push(result.value.clone());
                if *next < items.len() {
                    let item = items[*next];
                    self.push(item, result.rest, Cont::step(*seq, *start, next + 1, taken));
                } else {
                    self.complete(
                        *seq,
                        *start,
                        Success {
                            value: Value::seq(taken),
                            rest: result.rest,
                        },
                    );
                }
            }
            ContKind::Apply { red, start } => {
                let Def::Red { action, .. } = grammar.def(*red) else {
                    unreachable!("reduction continuation bound to a non-reduction parser");
                };
                self.complete(
                    *red,
                    *start,
                    Success {
                        value: result.value.clone().reduce(action),
                        rest: result.rest,
                    },
                );
            }
            ContKind::Gather => {
                if result.rest == self.input.len() {
                    self.matched.push(result.value.clone());
                }
            }
        }
    }

    /// Record a result for `(parser, at)`. Duplicates (by structural
    /// equality) are dropped; a fresh result fans out to every
    /// continuation currently registered on the entry.
    fn complete(&mut self, parser: ParserId, at: usize, result: Success) {
        let result = Rc::new(result);
        let subscribers = {
            let Some(entry) = self.memo.get_mut(&parser).and_then(|by_at| by_at.get_mut(&at))
            else {
                // `complete` is only reachable for keys `push` created.
                return;
            };
            if !entry.seen.insert(Rc::clone(&result)) {
                return;
            }
            entry.results.push(Rc::clone(&result));
            entry.conts.clone()
        };
        self.stats.results += 1;
        for cont in subscribers {
            self.push_thunk(Thunk::Resume {
                cont,
                result: Rc::clone(&result),
            });
        }
    }
}
