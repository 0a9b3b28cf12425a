//! Deterministic finite automata: storage, recognition, the Boolean algebra over DFAs sharing an
//! alphabet, and the structural analyses and enumerator built on top of them.

pub mod analysis;
pub mod enumerate;

use crate::alphabet::Alphabet;
use crate::error::AutomatonError;
use crate::nfa::{EdgeLabel, Nfa, NfaEdge, NfaState};
use analysis::{AcceptDistance, Analyses};
use enumerate::Enumerator;
use std::cell::{Ref, RefCell};
use std::collections::{HashMap, VecDeque};

/// An opaque, dense state identifier, valid only within the [`Dfa`] that minted it.
pub type StateId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub accepting: bool,
    pub transitions: Vec<Option<StateId>>,
}

impl DfaState {
    pub fn empty(alphabet_len: usize) -> Self {
        DfaState {
            accepting: false,
            transitions: vec![None; alphabet_len],
        }
    }
}

/// The way two DFAs are combined by [`Dfa::combine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombineMode {
    Union,
    Intersection,
    Difference,
}

/// A deterministic finite automaton over a fixed [`Alphabet`]. May be partial; most algebraic
/// operations complete it first (reusing an existing sink state where one already exists).
///
/// Structural analyses (dead states, distance to accept, cycles) are computed lazily on first
/// use and cached; any mutation invalidates the cache. `Clone` and `PartialEq` both treat the
/// cache as derived state: equality never looks at it, and a clone starts with an empty cache
/// rather than copying stale results across an independent DFA.
#[derive(Clone, Debug)]
pub struct Dfa {
    alphabet: Alphabet,
    states: Vec<DfaState>,
    start: StateId,
    /// Count of defined `(state, symbol)` pairs. Redundant with `states`, but maintained
    /// alongside every mutation so `is_complete` is an O(1) comparison rather than a full scan.
    num_edges: usize,
    analyses: RefCell<Option<Analyses>>,
}

impl PartialEq for Dfa {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.states == other.states && self.start == other.start
    }
}

impl Eq for Dfa {}

impl Dfa {
    pub(crate) fn from_parts(
        alphabet: Alphabet,
        states: Vec<DfaState>,
        start: StateId,
        num_edges: usize,
    ) -> Self {
        Dfa {
            alphabet,
            states,
            start,
            num_edges,
            analyses: RefCell::new(None),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn transition(&self, state: StateId, symbol_index: usize) -> Option<StateId> {
        self.states[state].transitions[symbol_index]
    }

    /// `SPEC_FULL.md` §3: `is_complete ⇔ num_edges == num_states × |alphabet|`, checked in O(1)
    /// against the edge count maintained by every mutator.
    pub fn is_complete(&self) -> bool {
        self.num_edges == self.states.len() * self.alphabet.len()
    }

    fn invalidate(&mut self) {
        *self.analyses.get_mut() = None;
    }

    fn ensure_analyses(&self) -> Ref<'_, Analyses> {
        if self.analyses.borrow().is_none() {
            let computed = analysis::compute(self);
            *self.analyses.borrow_mut() = Some(computed);
        }
        Ref::map(self.analyses.borrow(), |cached| cached.as_ref().unwrap())
    }

    pub fn is_dead(&self, state: StateId) -> bool {
        self.ensure_analyses().is_dead(state)
    }

    pub fn dead_states(&self) -> Vec<StateId> {
        self.ensure_analyses().dead_states().collect()
    }

    /// `None` if `state` cannot reach an accepting state at all.
    pub fn distance_to_accept(&self, state: StateId) -> Option<u64> {
        self.ensure_analyses().distance_to_accept(state)
    }

    pub fn max_accept_distance(&self) -> AcceptDistance {
        self.ensure_analyses().max_accept_distance()
    }

    pub fn enumerator(&self) -> Enumerator<'_> {
        Enumerator::new(self)
    }

    /// Recognition. Fails if `word` contains a symbol outside this DFA's alphabet, or if it
    /// drives the automaton through a missing transition of a partial DFA.
    pub fn accepts(&self, word: &str) -> Result<bool, AutomatonError> {
        let mut state = self.start;
        for ch in word.chars() {
            let idx = self
                .alphabet
                .index_of(ch)
                .ok_or(AutomatonError::UnknownSymbol(ch))?;
            state = self.states[state].transitions[idx].ok_or(AutomatonError::IncompleteAutomaton)?;
        }
        Ok(self.states[state].accepting)
    }

    /// Fills every missing transition with a sink state, reusing an existing non-accepting
    /// all-self-loop state if one is already present. A no-op if already complete.
    pub fn make_complete(&mut self) {
        if self.is_complete() {
            return;
        }
        let existing_sink = self.states.iter().enumerate().find_map(|(idx, s)| {
            (!s.accepting && s.transitions.iter().all(|&t| t == Some(idx))).then_some(idx)
        });
        let sink = existing_sink.unwrap_or_else(|| {
            let id = self.states.len();
            self.states.push(DfaState {
                accepting: false,
                transitions: vec![Some(id); self.alphabet.len()],
            });
            self.num_edges += self.alphabet.len();
            id
        });
        for state in &mut self.states {
            for t in &mut state.transitions {
                if t.is_none() {
                    *t = Some(sink);
                    self.num_edges += 1;
                }
            }
        }
        self.invalidate();
    }

    /// The Boolean combination of two DFAs by product construction (`SPEC_FULL.md` §4.4). Both
    /// operands are completed first; `self` and `other` must share the same ordered alphabet.
    pub fn combine(&self, other: &Dfa, mode: CombineMode) -> Result<Dfa, AutomatonError> {
        if self.alphabet != other.alphabet {
            return Err(AutomatonError::AlphabetMismatch);
        }
        let mut a = self.clone();
        let mut b = other.clone();
        a.make_complete();
        b.make_complete();

        let alphabet = a.alphabet.clone();
        let mut pair_id: HashMap<(StateId, StateId), StateId> = HashMap::new();
        let mut states: Vec<DfaState> = Vec::new();
        let mut worklist: VecDeque<(StateId, StateId)> = VecDeque::new();

        let start_pair = (a.start, b.start);
        pair_id.insert(start_pair, 0);
        states.push(DfaState::empty(alphabet.len()));
        worklist.push_back(start_pair);

        while let Some((pa, pb)) = worklist.pop_front() {
            let id = pair_id[&(pa, pb)];
            for sym_idx in 0..alphabet.len() {
                let ta = a.states[pa].transitions[sym_idx].expect("a is complete");
                let tb = b.states[pb].transitions[sym_idx].expect("b is complete");
                let target_id = *pair_id.entry((ta, tb)).or_insert_with(|| {
                    let new_id = states.len();
                    states.push(DfaState::empty(alphabet.len()));
                    worklist.push_back((ta, tb));
                    new_id
                });
                states[id].transitions[sym_idx] = Some(target_id);
            }
        }

        for (&(pa, pb), &id) in &pair_id {
            let aa = a.states[pa].accepting;
            let bb = b.states[pb].accepting;
            states[id].accepting = match mode {
                CombineMode::Union => aa || bb,
                CombineMode::Intersection => aa && bb,
                CombineMode::Difference => aa && !bb,
            };
        }

        // Every state above had every symbol assigned in the worklist loop, so the product is
        // complete by construction.
        let num_edges = states.len() * alphabet.len();
        Ok(Dfa::from_parts(alphabet, states, 0, num_edges))
    }

    /// Complements the accepted language. Completes first, since a symbol with no transition at
    /// all is neither accepted nor rejected, and negation requires every word to be one or the
    /// other.
    pub fn negate(&self) -> Dfa {
        let mut out = self.clone();
        out.make_complete();
        for state in &mut out.states {
            state.accepting = !state.accepting;
        }
        out.invalidate();
        out
    }

    /// Concatenation, via an NFA round trip (`Nfa::concat` then subset construction). `self` and
    /// `other` must share the same ordered alphabet.
    pub fn concat(&self, other: &Dfa) -> Result<Dfa, AutomatonError> {
        if self.alphabet != other.alphabet {
            return Err(AutomatonError::AlphabetMismatch);
        }
        Ok(Nfa::concat(&self.to_nfa(), &other.to_nfa()).to_dfa())
    }

    /// Kleene closure, via an NFA round trip.
    pub fn kleene(&self) -> Dfa {
        Nfa::kleene(&self.to_nfa()).to_dfa()
    }

    /// Every DFA transition is also a (deterministic) NFA edge; this just relabels them.
    pub fn to_nfa(&self) -> Nfa {
        let states = self
            .states
            .iter()
            .map(|s| NfaState {
                accepting: s.accepting,
                edges: s
                    .transitions
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, target)| {
                        target.map(|t| NfaEdge {
                            target: t,
                            label: EdgeLabel::Symbol(
                                self.alphabet.symbol_at(idx).expect("index within alphabet"),
                            ),
                        })
                    })
                    .collect(),
            })
            .collect();
        Nfa::from_parts(self.alphabet.clone(), states, self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;

    fn ab_alphabet() -> Alphabet {
        Alphabet::new(['a', 'b'])
    }

    fn literal_dfa(literal: &str) -> Dfa {
        Nfa::base(&ab_alphabet(), literal).to_dfa()
    }

    #[test]
    fn make_complete_is_idempotent_and_total() {
        let mut dfa = literal_dfa("a");
        assert!(!dfa.is_complete());
        dfa.make_complete();
        assert!(dfa.is_complete());
        let before = dfa.states().len();
        dfa.make_complete();
        assert_eq!(dfa.states().len(), before);
    }

    #[test]
    fn combine_union_accepts_either() {
        let a = literal_dfa("a");
        let b = literal_dfa("b");
        let u = a.combine(&b, CombineMode::Union).unwrap();
        assert!(u.accepts("a").unwrap());
        assert!(u.accepts("b").unwrap());
        assert!(!u.accepts("ab").unwrap());
    }

    #[test]
    fn combine_intersection_of_disjoint_literals_is_empty() {
        let a = literal_dfa("a");
        let b = literal_dfa("b");
        let i = a.combine(&b, CombineMode::Intersection).unwrap();
        assert!(!i.accepts("a").unwrap());
        assert!(!i.accepts("b").unwrap());
        assert_eq!(i.max_accept_distance(), AcceptDistance::NegativeInfinity);
    }

    #[test]
    fn combine_difference_removes_shared_words() {
        let ab = Nfa::union(&Nfa::base(&ab_alphabet(), "a"), &Nfa::base(&ab_alphabet(), "b")).to_dfa();
        let a = literal_dfa("a");
        let d = ab.combine(&a, CombineMode::Difference).unwrap();
        assert!(!d.accepts("a").unwrap());
        assert!(d.accepts("b").unwrap());
    }

    #[test]
    fn negate_flips_membership_over_the_complete_language() {
        let dfa = literal_dfa("a").negate();
        assert!(!dfa.accepts("a").unwrap());
        assert!(dfa.accepts("b").unwrap());
        assert!(dfa.accepts("").unwrap());
    }

    #[test]
    fn combine_rejects_mismatched_alphabets() {
        let a = literal_dfa("a");
        let c = Nfa::base(&Alphabet::new(['a', 'b', 'c']), "c").to_dfa();
        assert_eq!(
            a.combine(&c, CombineMode::Union).unwrap_err(),
            AutomatonError::AlphabetMismatch
        );
    }

    #[test]
    fn dfa_concat_and_kleene_match_nfa_level_operators() {
        let a = literal_dfa("a");
        let b = literal_dfa("b");
        let cat = a.concat(&b).unwrap();
        assert!(cat.accepts("ab").unwrap());
        assert!(!cat.accepts("ba").unwrap());

        let star = a.kleene();
        assert!(star.accepts("").unwrap());
        assert!(star.accepts("aaa").unwrap());
        assert!(!star.accepts("aab").unwrap());
    }
}
