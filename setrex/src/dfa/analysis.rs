//! Structural analyses over a [`super::Dfa`]: dead-state detection, distance to an accepting
//! state, and cycle detection with the longest acyclic path. All three are computed together in
//! one pass and cached; see `SPEC_FULL.md` §4.3.
//!
//! Grounded on `examples/original_source/dfa.py`'s `compute_dead_states`: a reverse BFS from the
//! accepting set gives both liveness and distance in one traversal, followed by a DFS-based
//! cycle check and a DAG longest-path pass.

use super::{Dfa, StateId};

/// The length of the longest accepted word reachable by an acyclic walk from the start state,
/// or the two degenerate cases: no accepting state is reachable at all (`NegativeInfinity`), or
/// some reachable, non-dead state lies on a cycle (`Infinity`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AcceptDistance {
    NegativeInfinity,
    Finite(u64),
    Infinity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analyses {
    dead_states: Vec<bool>,
    distance_to_accept: Vec<Option<u64>>,
    max_accept_distance: AcceptDistance,
}

impl Analyses {
    pub fn is_dead(&self, state: StateId) -> bool {
        self.dead_states[state]
    }

    pub fn dead_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.dead_states
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| d.then_some(i))
    }

    /// `None` means infinite (the state cannot reach an accepting state at all).
    pub fn distance_to_accept(&self, state: StateId) -> Option<u64> {
        self.distance_to_accept[state]
    }

    pub fn max_accept_distance(&self) -> AcceptDistance {
        self.max_accept_distance
    }
}

pub(crate) fn compute(dfa: &Dfa) -> Analyses {
    let n = dfa.states().len();

    let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for (from, state) in dfa.states().iter().enumerate() {
        for &to in state.transitions.iter().flatten() {
            reverse[to].push(from);
        }
    }

    let mut distance_to_accept: Vec<Option<u64>> = vec![None; n];
    let mut queue = std::collections::VecDeque::new();
    for (s, state) in dfa.states().iter().enumerate() {
        if state.accepting {
            distance_to_accept[s] = Some(0);
            queue.push_back(s);
        }
    }
    while let Some(s) = queue.pop_front() {
        let d = distance_to_accept[s].expect("queued states always have a distance");
        for &pred in &reverse[s] {
            if distance_to_accept[pred].is_none() {
                distance_to_accept[pred] = Some(d + 1);
                queue.push_back(pred);
            }
        }
    }

    let dead_states: Vec<bool> = distance_to_accept.iter().map(Option::is_none).collect();

    let reachable = forward_reachable(dfa, &dead_states);
    let has_cycle = reachable_cycle_exists(dfa, &dead_states, &reachable);

    let max_accept_distance = if has_cycle {
        AcceptDistance::Infinity
    } else {
        longest_acyclic_distance(dfa, &dead_states, &reachable)
    };

    Analyses {
        dead_states,
        distance_to_accept,
        max_accept_distance,
    }
}

/// States reachable from `dfa.start()` while never stepping onto a dead state.
fn forward_reachable(dfa: &Dfa, dead: &[bool]) -> Vec<bool> {
    let n = dfa.states().len();
    let mut reachable = vec![false; n];
    let start = dfa.start();
    if dead[start] {
        return reachable;
    }
    reachable[start] = true;
    let mut stack = vec![start];
    while let Some(s) = stack.pop() {
        for &t in dfa.states()[s].transitions.iter().flatten() {
            if !dead[t] && !reachable[t] {
                reachable[t] = true;
                stack.push(t);
            }
        }
    }
    reachable
}

/// Does the subgraph induced by `reachable \ dead` contain a directed cycle?
fn reachable_cycle_exists(dfa: &Dfa, dead: &[bool], reachable: &[bool]) -> bool {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;
    let n = dfa.states().len();
    let mut color = vec![WHITE; n];

    // Explicit stack of (node, remaining out-edges to visit) to avoid recursion depth limits.
    for start in 0..n {
        if !reachable[start] || dead[start] || color[start] != WHITE {
            continue;
        }
        let mut stack: Vec<(StateId, Vec<StateId>)> = vec![(start, out_edges(dfa, dead, reachable, start))];
        color[start] = GRAY;
        while let Some((u, edges)) = stack.last_mut() {
            match edges.pop() {
                Some(v) => match color[v] {
                    WHITE => {
                        color[v] = GRAY;
                        let next_edges = out_edges(dfa, dead, reachable, v);
                        stack.push((v, next_edges));
                    }
                    GRAY => return true,
                    BLACK => {}
                },
                None => {
                    color[*u] = BLACK;
                    stack.pop();
                }
            }
        }
    }
    false
}

fn out_edges(dfa: &Dfa, dead: &[bool], reachable: &[bool], u: StateId) -> Vec<StateId> {
    dfa.states()[u]
        .transitions
        .iter()
        .flatten()
        .copied()
        .filter(|&v| !dead[v] && reachable[v])
        .collect()
}

/// Longest path length from start to any accepting state, over the (guaranteed acyclic)
/// reachable-and-live subgraph, via topological-order relaxation.
fn longest_acyclic_distance(dfa: &Dfa, dead: &[bool], reachable: &[bool]) -> AcceptDistance {
    let order = topological_order(dfa, dead, reachable);
    let n = dfa.states().len();
    let mut dist: Vec<Option<u64>> = vec![None; n];
    let start = dfa.start();
    if reachable[start] && !dead[start] {
        dist[start] = Some(0);
    }
    for u in order {
        let Some(du) = dist[u] else { continue };
        for &v in dfa.states()[u].transitions.iter().flatten() {
            if dead[v] || !reachable[v] {
                continue;
            }
            let candidate = du + 1;
            if dist[v].map_or(true, |cur| candidate > cur) {
                dist[v] = Some(candidate);
            }
        }
    }
    dfa.states()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.accepting)
        .filter_map(|(i, _)| dist[i])
        .max()
        .map(AcceptDistance::Finite)
        .unwrap_or(AcceptDistance::NegativeInfinity)
}

/// A topological order of the reachable-and-live subgraph, via iterative DFS postorder.
fn topological_order(dfa: &Dfa, dead: &[bool], reachable: &[bool]) -> Vec<StateId> {
    let n = dfa.states().len();
    let mut visited = vec![false; n];
    let mut postorder = Vec::with_capacity(n);
    for start in 0..n {
        if !reachable[start] || dead[start] || visited[start] {
            continue;
        }
        visited[start] = true;
        let mut stack: Vec<(StateId, std::vec::IntoIter<StateId>)> =
            vec![(start, out_edges(dfa, dead, reachable, start).into_iter())];
        while let Some((u, iter)) = stack.last_mut() {
            match iter.next() {
                Some(v) => {
                    if !visited[v] {
                        visited[v] = true;
                        stack.push((v, out_edges(dfa, dead, reachable, v).into_iter()));
                    }
                }
                None => {
                    postorder.push(*u);
                    stack.pop();
                }
            }
        }
    }
    postorder.reverse();
    postorder
}
