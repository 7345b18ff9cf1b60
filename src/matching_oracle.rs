//! Perfect-matching computation on a [`BipartiteGraph`], used by the
//! driver whenever the caller does not already hold a matching. A dense
//! `mate: Vec<u32>` array represents the matching, with a sentinel
//! value standing in for "unmatched" rather than `Option<VertexId>` per
//! slot, and Hopcroft–Karp's BFS layering plus DFS augmentation builds
//! one.

use std::collections::{HashMap, VecDeque};

use error_stack::Report;

use crate::error::{AugmentError, Result};
use crate::graph_store::{BipartiteGraph, VertexId};

const NIL: u32 = u32::MAX;

/// Anything able to hand the driver a perfect matching of a bipartite
/// graph's side A against side B.
pub trait MatchingOracle {
    fn perfect_matching(&self, g: &BipartiteGraph) -> Result<HashMap<VertexId, VertexId>>;
}

/// Hopcroft–Karp maximum matching, taken as perfect if it saturates
/// every vertex. O(E * sqrt(V)) as usual for the algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct HopcroftKarp;

impl MatchingOracle for HopcroftKarp {
    fn perfect_matching(&self, g: &BipartiteGraph) -> Result<HashMap<VertexId, VertexId>> {
        let n = g.vertex_count();
        let mut mate: Vec<u32> = vec![NIL; n];

        let side_a: Vec<VertexId> = g.side_a().collect();
        let side_b_count = g.side_b().count();

        if side_a.len() != side_b_count {
            return Err(Report::new(AugmentError::NoPerfectMatching));
        }

        while augment_phase(g, &side_a, &mut mate) {}

        if side_a.iter().any(|&u| mate[u.index()] == NIL) {
            return Err(Report::new(AugmentError::NoPerfectMatching));
        }

        let mut result = HashMap::with_capacity(side_a.len() * 2);
        for &u in &side_a {
            let v = VertexId::from(mate[u.index()] as usize);
            result.insert(u, v);
            result.insert(v, u);
        }
        Ok(result)
    }
}

/// BFS from every unmatched side-A vertex, layering distances over side
/// A only (the standard Hopcroft–Karp phase graph). Returns `None` once
/// no augmenting path exists (no unmatched side-B vertex reached).
fn bfs_layers(g: &BipartiteGraph, side_a: &[VertexId], mate: &[u32]) -> Option<HashMap<VertexId, u32>> {
    let mut dist: HashMap<VertexId, u32> = HashMap::new();
    let mut queue: VecDeque<VertexId> = VecDeque::new();

    for &u in side_a {
        if mate[u.index()] == NIL {
            dist.insert(u, 0);
            queue.push_back(u);
        }
    }

    let mut found = false;
    while let Some(u) = queue.pop_front() {
        let d = dist[&u];
        for v in g.neighbors(u) {
            let mate_v = mate[v.index()];
            if mate_v == NIL {
                found = true;
            } else {
                let mate_v_id = VertexId::from(mate_v as usize);
                if !dist.contains_key(&mate_v_id) {
                    dist.insert(mate_v_id, d + 1);
                    queue.push_back(mate_v_id);
                }
            }
        }
    }

    if found {
        Some(dist)
    } else {
        None
    }
}

/// One Hopcroft–Karp phase: BFS to layer the unmatched-to-unmatched
/// distances, then a DFS per unmatched side-A vertex that augments
/// along shortest alternating paths, committing into `mate` directly.
/// Returns `false` once no unmatched side-A vertex reaches an unmatched
/// side-B vertex, signaling the matching is already maximum.
fn augment_phase(g: &BipartiteGraph, side_a: &[VertexId], mate: &mut [u32]) -> bool {
    let Some(mut dist) = bfs_layers(g, side_a, mate) else {
        return false;
    };

    let mut augmented = false;
    for &u in side_a {
        if mate[u.index()] == NIL && try_augment(g, u, mate, &mut dist) {
            augmented = true;
        }
    }
    augmented
}

/// Explicit-stack transliteration of the recursive augmenting-path DFS:
/// one frame per vertex on the current alternating path, each tracking
/// its own neighbor cursor, plus a side stack recording which neighbor
/// edge led to each pushed frame so a child's result can be paired back
/// up with the edge that spawned it.
fn try_augment(g: &BipartiteGraph, start: VertexId, mate: &mut [u32], dist: &mut HashMap<VertexId, u32>) -> bool {
    struct Frame {
        u: VertexId,
        neighbors: Vec<VertexId>,
        idx: usize,
    }

    let mut stack = vec![Frame {
        u: start,
        neighbors: g.neighbors(start).collect(),
        idx: 0,
    }];
    let mut calling_v: Vec<VertexId> = Vec::new();
    let mut pending_result: Option<bool> = None;

    loop {
        let Some(top) = stack.last_mut() else { break };
        let u = top.u;

        if let Some(success) = pending_result.take() {
            let v = calling_v.pop().expect("calling edge for a resumed frame");
            if success {
                mate[u.index()] = v.0;
                mate[v.index()] = u.0;
                stack.pop();
                pending_result = Some(true);
                continue;
            }
            // child's attempt failed; fall through and try u's next neighbor
        }

        if top.idx >= top.neighbors.len() {
            dist.insert(u, u32::MAX);
            stack.pop();
            pending_result = Some(false);
            continue;
        }

        let v = top.neighbors[top.idx];
        top.idx += 1;
        let mate_v = mate[v.index()];

        if mate_v == NIL {
            mate[u.index()] = v.0;
            mate[v.index()] = u.0;
            stack.pop();
            pending_result = Some(true);
            continue;
        }

        let mate_v_id = VertexId::from(mate_v as usize);
        if dist.get(&mate_v_id).copied() == Some(dist[&u] + 1) {
            calling_v.push(v);
            stack.push(Frame {
                u: mate_v_id,
                neighbors: g.neighbors(mate_v_id).collect(),
                idx: 0,
            });
        }
    }

    pending_result.unwrap_or(false)
}

/// Verifies `mate` (keyed by either side) is a valid perfect matching of
/// `g`: every vertex mapped exactly once, mutually consistent, and every
/// mapped pair is an actual edge. Used by the driver's optional
/// verification step.
pub fn verify_matching(g: &BipartiteGraph, mate: &HashMap<VertexId, VertexId>) -> bool {
    if mate.len() != g.vertex_count() {
        return false;
    }

    for v in g.vertices() {
        let Some(&partner) = mate.get(&v) else {
            return false;
        };
        if mate.get(&partner) != Some(&v) {
            return false;
        }
        if g.side(partner) == g.side(v) {
            return false;
        }
        if !g.neighbors(v).any(|n| n == partner) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_store::Side;

    fn k_n_n(n: usize) -> BipartiteGraph {
        let mut g = BipartiteGraph::new();
        let a: Vec<VertexId> = (0..n).map(|_| g.add_vertex(Side::A)).collect();
        let b: Vec<VertexId> = (0..n).map(|_| g.add_vertex(Side::B)).collect();
        for &u in &a {
            for &v in &b {
                g.add_edge(u, v);
            }
        }
        g
    }

    #[test]
    fn finds_perfect_matching_on_complete_bipartite_graph() {
        let g = k_n_n(4);
        let mate = HopcroftKarp.perfect_matching(&g).unwrap();
        assert!(verify_matching(&g, &mate));
    }

    #[test]
    fn finds_perfect_matching_on_a_cycle() {
        // 4-cycle: a0-b0-a1-b1-a0
        let mut g = BipartiteGraph::new();
        let a0 = g.add_vertex(Side::A);
        let a1 = g.add_vertex(Side::A);
        let b0 = g.add_vertex(Side::B);
        let b1 = g.add_vertex(Side::B);
        g.add_edge(a0, b0);
        g.add_edge(b0, a1);
        g.add_edge(a1, b1);
        g.add_edge(b1, a0);

        let mate = HopcroftKarp.perfect_matching(&g).unwrap();
        assert!(verify_matching(&g, &mate));
    }

    #[test]
    fn unbalanced_sides_is_not_augmentable() {
        let mut g = BipartiteGraph::new();
        let a0 = g.add_vertex(Side::A);
        let a1 = g.add_vertex(Side::A);
        let b0 = g.add_vertex(Side::B);
        g.add_edge(a0, b0);
        g.add_edge(a1, b0);

        let err = HopcroftKarp.perfect_matching(&g).unwrap_err();
        assert_eq!(*err.current_context(), AugmentError::NoPerfectMatching);
    }

    #[test]
    fn no_perfect_matching_when_a_vertex_is_isolated() {
        let mut g = BipartiteGraph::new();
        let a0 = g.add_vertex(Side::A);
        let _a1 = g.add_vertex(Side::A);
        let b0 = g.add_vertex(Side::B);
        let _b1 = g.add_vertex(Side::B);
        g.add_edge(a0, b0);

        let err = HopcroftKarp.perfect_matching(&g).unwrap_err();
        assert_eq!(*err.current_context(), AugmentError::NoPerfectMatching);
    }
}
