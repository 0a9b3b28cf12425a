//! Nondeterministic finite automata: the Thompson-style constructors used by the regex
//! compiler, and the subset construction that turns an [`Nfa`] into a [`crate::dfa::Dfa`].

use crate::alphabet::{Alphabet, Symbol};
use crate::dfa::{Dfa, DfaState};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

/// An opaque, dense state identifier, valid only within the [`Nfa`] that minted it.
pub type StateId = usize;

/// The label on one outgoing edge: epsilon, a single alphabet symbol, or (transiently, before
/// [`Nfa::simplify`]) a multi-symbol literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeLabel {
    Epsilon,
    Symbol(Symbol),
    Literal(Rc<str>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaEdge {
    pub target: StateId,
    pub label: EdgeLabel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaState {
    pub accepting: bool,
    pub edges: Vec<NfaEdge>,
}

/// A nondeterministic finite automaton over a fixed [`Alphabet`]. The start state is always
/// state `0`; every constructor below re-mints ids to preserve that invariant when combining
/// automata (`SPEC_FULL.md` §9, "state identity across automata").
#[derive(Clone, Debug, PartialEq)]
pub struct Nfa {
    alphabet: Alphabet,
    states: Vec<NfaState>,
    start: StateId,
}

impl Nfa {
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    /// Builds an NFA directly from its parts, with no validation. Used by [`crate::dfa::Dfa::to_nfa`]
    /// to relabel an existing DFA's transitions as (deterministic) NFA edges.
    pub(crate) fn from_parts(alphabet: Alphabet, states: Vec<NfaState>, start: StateId) -> Self {
        Nfa {
            alphabet,
            states,
            start,
        }
    }

    fn push_state(&mut self, accepting: bool) -> StateId {
        self.states.push(NfaState {
            accepting,
            edges: Vec::new(),
        });
        self.states.len() - 1
    }

    /// The automaton accepting exactly the single string `literal`, over `alphabet`. The
    /// alphabet is supplied explicitly rather than derived from `literal` (`SPEC_FULL.md` §9,
    /// open question resolution).
    pub fn base(alphabet: &Alphabet, literal: &str) -> Self {
        let label = match literal.chars().count() {
            0 => EdgeLabel::Epsilon,
            1 => EdgeLabel::Symbol(literal.chars().next().unwrap()),
            _ => EdgeLabel::Literal(Rc::from(literal)),
        };
        Nfa {
            alphabet: alphabet.clone(),
            states: vec![
                NfaState {
                    accepting: false,
                    edges: vec![NfaEdge { target: 1, label }],
                },
                NfaState {
                    accepting: true,
                    edges: Vec::new(),
                },
            ],
            start: 0,
        }
    }

    /// Replaces every edge whose label is a multi-symbol literal with a chain of fresh
    /// single-symbol edges. Idempotent; a no-op if there are no literal edges left.
    pub fn simplify(&mut self) {
        let old_states = std::mem::take(&mut self.states);
        self.states = old_states
            .iter()
            .map(|s| NfaState {
                accepting: s.accepting,
                edges: Vec::new(),
            })
            .collect();
        for (from, state) in old_states.into_iter().enumerate() {
            for edge in state.edges {
                match edge.label {
                    EdgeLabel::Literal(text) => {
                        let chars: Vec<Symbol> = text.chars().collect();
                        let mut cursor = from;
                        for &c in &chars[..chars.len() - 1] {
                            let next = self.push_state(false);
                            self.states[cursor].edges.push(NfaEdge {
                                target: next,
                                label: EdgeLabel::Symbol(c),
                            });
                            cursor = next;
                        }
                        self.states[cursor].edges.push(NfaEdge {
                            target: edge.target,
                            label: EdgeLabel::Symbol(*chars.last().expect("non-empty literal")),
                        });
                    }
                    other => self.states[from].edges.push(NfaEdge {
                        target: edge.target,
                        label: other,
                    }),
                }
            }
        }
    }

    /// `union(A, B)`: fresh start, fresh sole accepting state, epsilon edges into both operands
    /// and epsilon edges out of every accepting state of both operands.
    pub fn union(a: &Nfa, b: &Nfa) -> Self {
        let a_off = 1;
        let b_off = a_off + a.states.len();
        let final_state = b_off + b.states.len();

        let mut states = Vec::with_capacity(final_state + 1);
        states.push(NfaState {
            accepting: false,
            edges: vec![
                NfaEdge {
                    target: a_off + a.start,
                    label: EdgeLabel::Epsilon,
                },
                NfaEdge {
                    target: b_off + b.start,
                    label: EdgeLabel::Epsilon,
                },
            ],
        });
        states.extend(renumbered(&a.states, a_off));
        states.extend(renumbered(&b.states, b_off));
        states.push(NfaState {
            accepting: true,
            edges: Vec::new(),
        });

        for (i, s) in a.states.iter().enumerate() {
            if s.accepting {
                states[a_off + i].edges.push(NfaEdge {
                    target: final_state,
                    label: EdgeLabel::Epsilon,
                });
            }
        }
        for (i, s) in b.states.iter().enumerate() {
            if s.accepting {
                states[b_off + i].edges.push(NfaEdge {
                    target: final_state,
                    label: EdgeLabel::Epsilon,
                });
            }
        }

        Nfa {
            alphabet: a.alphabet.clone(),
            states,
            start: 0,
        }
    }

    /// `concat(A, B)`: A keeps its ids, B is renumbered above it; A's accepting states gain an
    /// epsilon edge into B's start and stop being accepting themselves.
    pub fn concat(a: &Nfa, b: &Nfa) -> Self {
        let offset = a.states.len();
        let mut states: Vec<NfaState> = a
            .states
            .iter()
            .map(|s| NfaState {
                accepting: false,
                edges: s.edges.clone(),
            })
            .collect();
        states.extend(renumbered(&b.states, offset));

        for (i, s) in a.states.iter().enumerate() {
            if s.accepting {
                states[i].edges.push(NfaEdge {
                    target: offset + b.start,
                    label: EdgeLabel::Epsilon,
                });
            }
        }

        Nfa {
            alphabet: a.alphabet.clone(),
            states,
            start: 0,
        }
    }

    /// `kleene(A)`: fresh start/accept state, epsilon in, epsilon back from every accepting
    /// state of A.
    pub fn kleene(a: &Nfa) -> Self {
        let offset = 1;
        let mut states = Vec::with_capacity(a.states.len() + 1);
        states.push(NfaState {
            accepting: true,
            edges: vec![NfaEdge {
                target: offset + a.start,
                label: EdgeLabel::Epsilon,
            }],
        });
        states.extend(renumbered(&a.states, offset));

        for (i, s) in a.states.iter().enumerate() {
            if s.accepting {
                states[offset + i].edges.push(NfaEdge {
                    target: 0,
                    label: EdgeLabel::Epsilon,
                });
            }
        }

        Nfa {
            alphabet: a.alphabet.clone(),
            states,
            start: 0,
        }
    }

    /// The epsilon-closure of a set of states: everything reachable using only epsilon edges,
    /// via a marking BFS.
    fn epsilon_closure(&self, seeds: &[StateId]) -> BTreeSet<StateId> {
        let mut marked: BTreeSet<StateId> = BTreeSet::new();
        let mut pending: Vec<StateId> = seeds.to_vec();
        while let Some(s) = pending.pop() {
            if !marked.insert(s) {
                continue;
            }
            for edge in &self.states[s].edges {
                if matches!(edge.label, EdgeLabel::Epsilon) && !marked.contains(&edge.target) {
                    pending.push(edge.target);
                }
            }
        }
        marked
    }

    /// The move-set: epsilon-closure of everywhere a symbol edge from `closure` leads.
    fn move_set(&self, closure: &BTreeSet<StateId>, symbol: Symbol) -> BTreeSet<StateId> {
        let mut targets = Vec::new();
        for &s in closure {
            for edge in &self.states[s].edges {
                if edge.label == EdgeLabel::Symbol(symbol) {
                    targets.push(edge.target);
                }
            }
        }
        self.epsilon_closure(&targets)
    }

    /// Subset construction (`SPEC_FULL.md` §4.2). Simplifies a cloned copy first so multi-symbol
    /// literal edges never reach determinisation. The resulting DFA is total over the derived
    /// alphabet iff this NFA has an outgoing edge for every symbol from every reachable closure;
    /// otherwise it is partial, and callers needing completeness must call `make_complete`.
    pub fn to_dfa(&self) -> Dfa {
        let mut simplified = self.clone();
        simplified.simplify();
        simplified.to_dfa_simplified()
    }

    fn to_dfa_simplified(&self) -> Dfa {
        let alphabet = self.alphabet.clone();
        let start_closure = self.epsilon_closure(&[self.start]);
        let start_key: Vec<StateId> = start_closure.iter().copied().collect();

        let mut id_of: HashMap<Vec<StateId>, StateId> = HashMap::new();
        let mut closures: Vec<BTreeSet<StateId>> = Vec::new();
        let mut worklist: VecDeque<Vec<StateId>> = VecDeque::new();

        id_of.insert(start_key.clone(), 0);
        closures.push(start_closure);
        worklist.push_back(start_key);

        let mut dfa_states: Vec<DfaState> = vec![DfaState::empty(alphabet.len())];

        while let Some(set_key) = worklist.pop_front() {
            let id = id_of[&set_key];
            let closure: BTreeSet<StateId> = set_key.into_iter().collect();
            for (sym_idx, sym) in alphabet.iter().enumerate() {
                let moved = self.move_set(&closure, sym);
                if moved.is_empty() {
                    continue;
                }
                let mkey: Vec<StateId> = moved.iter().copied().collect();
                let target_id = *id_of.entry(mkey.clone()).or_insert_with(|| {
                    let new_id = dfa_states.len();
                    dfa_states.push(DfaState::empty(alphabet.len()));
                    closures.push(moved.clone());
                    worklist.push_back(mkey);
                    new_id
                });
                dfa_states[id].transitions[sym_idx] = Some(target_id);
            }
        }

        for (id, closure) in closures.iter().enumerate() {
            dfa_states[id].accepting = closure.iter().any(|&s| self.states[s].accepting);
        }

        let num_edges = dfa_states
            .iter()
            .map(|s| s.transitions.iter().filter(|t| t.is_some()).count())
            .sum();

        Dfa::from_parts(alphabet, dfa_states, 0, num_edges)
    }
}

fn renumbered(states: &[NfaState], offset: StateId) -> Vec<NfaState> {
    states
        .iter()
        .map(|s| NfaState {
            accepting: s.accepting,
            edges: s
                .edges
                .iter()
                .map(|e| NfaEdge {
                    target: e.target + offset,
                    label: e.label.clone(),
                })
                .collect(),
        })
        .collect()
}
