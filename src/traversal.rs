//! Stack-based, pluggable-callback traversal. Generalizes `petgraph`'s
//! `visit::Dfs` (already an explicit-stack, non-recursive struct) to a
//! single generic routine with per-vertex/per-edge decision callbacks,
//! so the same traversal core backs preorder DFS, the condensation's
//! CX/XC reachability sweeps, and `source_cover`'s per-source coverage
//! passes, instead of re-implementing a stack loop at each call site.

use fixedbitset::FixedBitSet;

use crate::graph_store::{DiGraph, Reversed, VertexId};

/// What to do after visiting a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexSignal {
    Continue,
    Stop,
}

/// What to do with a candidate neighbor discovered while visiting a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSignal {
    Push,
    Skip,
}

/// Anything this crate's traversal can walk: an outgoing-neighbor view
/// plus a vertex count, implemented by both `DiGraph` and its `Reversed`
/// view so callers can traverse either direction with the same code.
pub trait NeighborSource {
    fn vertex_count(&self) -> usize;
    fn out_neighbors(&self, v: VertexId) -> Vec<VertexId>;
}

impl NeighborSource for DiGraph {
    fn vertex_count(&self) -> usize {
        DiGraph::vertex_count(self)
    }

    fn out_neighbors(&self, v: VertexId) -> Vec<VertexId> {
        self.out_neighbors(v).collect()
    }
}

impl<'a> NeighborSource for Reversed<'a> {
    fn vertex_count(&self) -> usize {
        Reversed::vertex_count(self)
    }

    fn out_neighbors(&self, v: VertexId) -> Vec<VertexId> {
        Reversed::out_neighbors(self, v).collect()
    }
}

/// Explicit-stack traversal starting at `start`. Pops a vertex, calls
/// `on_vertex`; if it signals `Stop`, the traversal aborts and that
/// vertex is returned. Otherwise each outgoing neighbor (in adjacency
/// insertion order) is offered to `on_edge`, which decides whether to
/// push it. The caller owns `visited` (and is responsible for marking
/// `start` before calling, and for marking vertices in `on_edge` to
/// avoid re-pushing them) — this is deliberate: it lets the same routine
/// back both a fresh single-source walk and a multi-source "flatten"
/// pass that shares one visited set across many starting points.
pub fn traverse<G, F, E>(g: &G, start: VertexId, mut on_vertex: F, mut on_edge: E) -> Option<VertexId>
where
    G: NeighborSource,
    F: FnMut(VertexId) -> VertexSignal,
    E: FnMut(VertexId, VertexId) -> EdgeSignal,
{
    let mut stack = vec![start];

    while let Some(v) = stack.pop() {
        if on_vertex(v) == VertexSignal::Stop {
            return Some(v);
        }

        for u in g.out_neighbors(v) {
            if on_edge(u, v) == EdgeSignal::Push {
                stack.push(u);
            }
        }
    }

    None
}

/// Marks every vertex reachable from any of `starts` into `visited`,
/// using a single shared visited set (so a vertex discovered from one
/// start is never re-expanded from another). Built on [`traverse`].
pub fn mark_reachable<G>(g: &G, starts: impl IntoIterator<Item = VertexId>, visited: &mut FixedBitSet)
where
    G: NeighborSource,
{
    if visited.len() < g.vertex_count() {
        visited.grow(g.vertex_count());
    }

    for start in starts {
        if visited[start.index()] {
            continue;
        }
        visited.insert(start.index());

        traverse(
            g,
            start,
            |_| VertexSignal::Continue,
            |neighbor, _parent| {
                if visited[neighbor.index()] {
                    EdgeSignal::Skip
                } else {
                    visited.insert(neighbor.index());
                    EdgeSignal::Push
                }
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> DiGraph {
        let mut g = DiGraph::with_vertex_count(n);
        for i in 0..n - 1 {
            g.add_arc(VertexId::from(i), VertexId::from(i + 1));
        }
        g
    }

    #[test]
    fn traverse_visits_every_reachable_vertex_once() {
        let g = chain(5);
        let mut visited = FixedBitSet::with_capacity(5);
        visited.insert(0);
        let mut order = Vec::new();

        traverse(
            &g,
            VertexId::from(0),
            |v| {
                order.push(v);
                VertexSignal::Continue
            },
            |neighbor, _| {
                if visited[neighbor.index()] {
                    EdgeSignal::Skip
                } else {
                    visited.insert(neighbor.index());
                    EdgeSignal::Push
                }
            },
        );

        assert_eq!(order.len(), 5);
    }

    #[test]
    fn traverse_stop_aborts_early() {
        let g = chain(5);
        let mut visited = FixedBitSet::with_capacity(5);
        visited.insert(0);

        let stopped_at = traverse(
            &g,
            VertexId::from(0),
            |v| {
                if v == VertexId::from(2) {
                    VertexSignal::Stop
                } else {
                    VertexSignal::Continue
                }
            },
            |neighbor, _| {
                if visited[neighbor.index()] {
                    EdgeSignal::Skip
                } else {
                    visited.insert(neighbor.index());
                    EdgeSignal::Push
                }
            },
        );

        assert_eq!(stopped_at, Some(VertexId::from(2)));
    }

    #[test]
    fn mark_reachable_from_multiple_starts_shares_visited_set() {
        let mut g = DiGraph::with_vertex_count(4);
        g.add_arc(VertexId::from(0), VertexId::from(1));
        g.add_arc(VertexId::from(2), VertexId::from(3));

        let mut visited = FixedBitSet::with_capacity(4);
        mark_reachable(&g, [VertexId::from(0), VertexId::from(2)], &mut visited);

        assert!(visited.count_ones(..) == 4);
    }
}
