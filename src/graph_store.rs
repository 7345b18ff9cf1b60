//! Dense-integer-id adjacency storage, in the spirit of `petgraph::graph`:
//! a handful of concrete graph types instead of one generic storage trait,
//! vertex identity is a small `Copy` newtype over `u32`, and a "reverse
//! view" is a zero-cost wrapper rather than a copy of the adjacency lists.

use core::fmt;

/// Dense vertex identity. Opaque to callers; external labels are mapped
/// through a bijective table kept by whichever code builds the graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<usize> for VertexId {
    fn from(i: usize) -> Self {
        VertexId(i as u32)
    }
}

/// Directed, simple adjacency-array graph. `out_adj[v]`/`in_adj[v]` are
/// kept in insertion order (neighbor iteration order is the order edges
/// were added, matching `petgraph`'s own documented traversal-order
/// contract).
#[derive(Debug, Clone, Default)]
pub struct DiGraph {
    out_adj: Vec<Vec<VertexId>>,
    in_adj: Vec<Vec<VertexId>>,
}

impl DiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertex_count(n: usize) -> Self {
        DiGraph {
            out_adj: vec![Vec::new(); n],
            in_adj: vec![Vec::new(); n],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.out_adj.len()
    }

    /// Adds a new vertex and returns its id.
    pub fn add_vertex(&mut self) -> VertexId {
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        VertexId((self.out_adj.len() - 1) as u32)
    }

    fn ensure_vertex(&mut self, v: VertexId) {
        if v.index() >= self.out_adj.len() {
            self.out_adj.resize(v.index() + 1, Vec::new());
            self.in_adj.resize(v.index() + 1, Vec::new());
        }
    }

    /// Adds arc `u -> v`. Idempotent: adding an already-present arc is a
    /// no-op. No self-loops are rejected here; callers that must not
    /// produce them (the witness digraph construction) are responsible
    /// for that invariant.
    pub fn add_arc(&mut self, u: VertexId, v: VertexId) {
        self.ensure_vertex(u);
        self.ensure_vertex(v);
        if !self.out_adj[u.index()].contains(&v) {
            self.out_adj[u.index()].push(v);
            self.in_adj[v.index()].push(u);
        }
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.out_adj[v.index()].len()
    }

    pub fn in_degree(&self, v: VertexId) -> usize {
        self.in_adj[v.index()].len()
    }

    pub fn out_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.out_adj[v.index()].iter().copied()
    }

    pub fn in_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.in_adj[v.index()].iter().copied()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (0..self.out_adj.len()).map(VertexId::from)
    }

    pub fn arcs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.out_adj.iter().enumerate().flat_map(|(u, outs)| {
            outs.iter().map(move |&v| (VertexId::from(u), v))
        })
    }

    /// A read-only view with in/out adjacency swapped. Never copies
    /// storage: `Reversed` just flips which array each accessor reads.
    pub fn reversed(&self) -> Reversed<'_> {
        Reversed(self)
    }

    /// Copies the adjacency restricted to `vertices`, renumbering to a
    /// dense `0..vertices.len()` range. Returns the new graph along with
    /// a map from the new dense id back to the original `VertexId`.
    pub fn induced_subgraph(&self, vertices: &[VertexId]) -> (DiGraph, Vec<VertexId>) {
        use std::collections::HashMap;

        let mut renumber: HashMap<VertexId, VertexId> = HashMap::with_capacity(vertices.len());
        for (new_idx, &old) in vertices.iter().enumerate() {
            renumber.insert(old, VertexId::from(new_idx));
        }

        let mut sub = DiGraph::with_vertex_count(vertices.len());
        for &old_u in vertices {
            let new_u = renumber[&old_u];
            for old_v in self.out_neighbors(old_u) {
                if let Some(&new_v) = renumber.get(&old_v) {
                    sub.add_arc(new_u, new_v);
                }
            }
        }

        (sub, vertices.to_vec())
    }
}

/// Zero-cost alias that swaps in/out adjacency of a borrowed [`DiGraph`].
#[derive(Debug, Clone, Copy)]
pub struct Reversed<'a>(pub &'a DiGraph);

impl<'a> Reversed<'a> {
    pub fn vertex_count(&self) -> usize {
        self.0.vertex_count()
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.0.in_degree(v)
    }

    pub fn in_degree(&self, v: VertexId) -> usize {
        self.0.out_degree(v)
    }

    pub fn out_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + 'a {
        self.0.in_neighbors(v)
    }

    pub fn in_neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + 'a {
        self.0.out_neighbors(v)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        self.0.vertices()
    }
}

/// Which side of the bipartition a vertex of a [`BipartiteGraph`] is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// Undirected simple bipartite graph: every edge has one endpoint tagged
/// `Side::A` and one tagged `Side::B`. Stored as a single undirected
/// adjacency-array graph (symmetric `out_adj`/`in_adj` collapse to one
/// array) plus a per-vertex side tag, analogous to how `petgraph::Graph`
/// collapses to a single adjacency representation for `Undirected`.
#[derive(Debug, Clone, Default)]
pub struct BipartiteGraph {
    adj: Vec<Vec<VertexId>>,
    side: Vec<Side>,
}

impl BipartiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, side: Side) -> VertexId {
        self.adj.push(Vec::new());
        self.side.push(side);
        VertexId((self.adj.len() - 1) as u32)
    }

    pub fn side(&self, v: VertexId) -> Side {
        self.side[v.index()]
    }

    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    /// Adds the undirected edge `{u, v}`. Idempotent. Panics (a
    /// programmer error, not a runtime condition) if both endpoints are
    /// on the same side.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) {
        assert_ne!(self.side(u), self.side(v), "bipartite edge must cross the bipartition");
        if !self.adj[u.index()].contains(&v) {
            self.adj[u.index()].push(v);
            self.adj[v.index()].push(u);
        }
    }

    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adj[v.index()].iter().copied()
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.adj[v.index()].len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (0..self.adj.len()).map(VertexId::from)
    }

    pub fn side_a(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices().filter(move |&v| self.side(v) == Side::A)
    }

    pub fn side_b(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices().filter(move |&v| self.side(v) == Side::B)
    }

    /// `true` if `G` has a multi-edge or a self-loop, i.e. is not simple.
    /// Used by entry points that must reject multigraphs.
    pub fn is_simple(&self) -> bool {
        for v in self.vertices() {
            let mut seen = std::collections::HashSet::new();
            for n in self.neighbors(v) {
                if n == v || !seen.insert(n) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_arc_is_idempotent() {
        let mut d = DiGraph::new();
        let a = d.add_vertex();
        let b = d.add_vertex();
        d.add_arc(a, b);
        d.add_arc(a, b);
        assert_eq!(d.out_degree(a), 1);
        assert_eq!(d.in_degree(b), 1);
    }

    #[test]
    fn reversed_swaps_degree_reads() {
        let mut d = DiGraph::new();
        let a = d.add_vertex();
        let b = d.add_vertex();
        d.add_arc(a, b);

        let r = d.reversed();
        assert_eq!(r.out_degree(a), 0);
        assert_eq!(r.in_degree(a), 1);
        assert_eq!(r.out_degree(b), 1);
        assert_eq!(r.in_degree(b), 0);
    }

    #[test]
    fn induced_subgraph_renumbers_densely() {
        let mut d = DiGraph::new();
        let a = d.add_vertex();
        let b = d.add_vertex();
        let c = d.add_vertex();
        d.add_arc(a, b);
        d.add_arc(b, c);

        let (sub, members) = d.induced_subgraph(&[a, c]);
        assert_eq!(members, vec![a, c]);
        assert_eq!(sub.vertex_count(), 2);
        assert_eq!(sub.arcs().count(), 0);
    }

    #[test]
    fn bipartite_rejects_same_side_edge() {
        let mut g = BipartiteGraph::new();
        let a1 = g.add_vertex(Side::A);
        let a2 = g.add_vertex(Side::A);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            g.add_edge(a1, a2);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn is_simple_true_for_simple_graph() {
        let mut g = BipartiteGraph::new();
        let a = g.add_vertex(Side::A);
        let b = g.add_vertex(Side::B);
        g.add_edge(a, b);
        assert!(g.is_simple());
    }
}
