//! Strongly connected components and the condensation DAG built from
//! them, via an iterative transliteration of Tarjan's algorithm: the
//! recursive `visit` call per neighbor is replaced by an explicit work
//! stack, since this crate avoids recursion for traversals that can run
//! as deep as the input has vertices. The recursion stack's three
//! pieces of per-frame state (the node, its neighbor iterator position,
//! and whether it is still a local root) become three parallel stacks.

use std::num::NonZeroUsize;

use indexmap::IndexSet;

use crate::graph_store::{DiGraph, VertexId};

/// Dense id of a super-node (strongly connected component) of a
/// [`Condensation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SuperId(pub u32);

impl SuperId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for SuperId {
    fn from(i: usize) -> Self {
        SuperId(i as u32)
    }
}

/// The DAG of strongly connected components of some digraph `D`, with
/// each super-node's `members` — the underlying vertex set of its SCC —
/// retained.
#[derive(Debug, Clone)]
pub struct Condensation {
    pub members: Vec<Vec<VertexId>>,
    pub comp_of: Vec<SuperId>,
    pub dag: DiGraph,
}

impl Condensation {
    pub fn super_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_trivial(&self, s: SuperId) -> bool {
        self.members[s.index()].len() == 1
    }

    pub fn trivial_sccs(&self) -> impl Iterator<Item = SuperId> + '_ {
        (0..self.super_count())
            .map(SuperId::from)
            .filter(move |&s| self.is_trivial(s))
    }
}

/// Classification of a DAG's vertices: `sources` have in-degree 0 and
/// out-degree > 0, `sinks` have out-degree 0 and in-degree > 0,
/// `isolated` have both degrees 0. Pairwise disjoint, O(|V|+|E|) single
/// pass.
pub fn get_sources_sinks_isolated(dag: &DiGraph) -> (Vec<SuperId>, Vec<SuperId>, Vec<SuperId>) {
    let mut sources = Vec::new();
    let mut sinks = Vec::new();
    let mut isolated = Vec::new();

    for v in dag.vertices() {
        let s = SuperId::from(v.index());
        let in_deg = dag.in_degree(v);
        let out_deg = dag.out_degree(v);

        if in_deg == 0 && out_deg == 0 {
            isolated.push(s);
        } else if in_deg == 0 {
            sources.push(s);
        } else if out_deg == 0 {
            sinks.push(s);
        }
    }

    (sources, sinks, isolated)
}

/// Iterative Tarjan's strongly connected components, using Pierce's
/// memory-efficient variant (one `rootindex` per node, no separate
/// lowlink array), with the recursive `visit` call turned into an
/// explicit work stack.
///
/// Returns components in postorder (reverse topological order).
pub fn tarjan_scc_iterative(g: &DiGraph) -> Vec<Vec<VertexId>> {
    #[derive(Clone, Copy)]
    struct NodeData {
        rootindex: Option<NonZeroUsize>,
    }

    let n = g.vertex_count();
    let mut nodes = vec![NodeData { rootindex: None }; n];
    let mut scc_stack: Vec<VertexId> = Vec::new();
    let mut index = 1usize;
    let mut componentcount = usize::MAX;
    let mut sccs = Vec::new();

    // Explicit DFS work stack. Each frame tracks the vertex being
    // visited and how far through its neighbor list we've gotten.
    enum Frame {
        Enter(VertexId),
        // Resume after the child `child` (reached via neighbor index
        // `next_idx - 1` of `parent`) has been fully processed.
        Resume { v: VertexId, next_idx: usize },
    }

    for start in g.vertices() {
        if nodes[start.index()].rootindex.is_some() {
            continue;
        }

        let mut work: Vec<Frame> = vec![Frame::Enter(start)];
        let mut is_local_root: Vec<bool> = vec![false; n];

        while let Some(frame) = work.pop() {
            match frame {
                Frame::Enter(v) => {
                    if nodes[v.index()].rootindex.is_some() {
                        continue;
                    }
                    nodes[v.index()].rootindex = NonZeroUsize::new(index);
                    index += 1;
                    is_local_root[v.index()] = true;

                    work.push(Frame::Resume { v, next_idx: 0 });
                }
                Frame::Resume { v, next_idx } => {
                    let out: Vec<VertexId> = g.out_neighbors(v).collect();

                    if next_idx > 0 {
                        // We just returned from visiting out[next_idx - 1].
                        let w = out[next_idx - 1];
                        if nodes[w.index()].rootindex < nodes[v.index()].rootindex {
                            nodes[v.index()].rootindex = nodes[w.index()].rootindex;
                            is_local_root[v.index()] = false;
                        }
                    }

                    let mut idx = next_idx;
                    let mut scheduled_child = false;
                    while idx < out.len() {
                        let w = out[idx];
                        idx += 1;
                        if nodes[w.index()].rootindex.is_none() {
                            work.push(Frame::Resume { v, next_idx: idx });
                            work.push(Frame::Enter(w));
                            scheduled_child = true;
                            break;
                        } else if nodes[w.index()].rootindex < nodes[v.index()].rootindex {
                            nodes[v.index()].rootindex = nodes[w.index()].rootindex;
                            is_local_root[v.index()] = false;
                        }
                    }

                    if scheduled_child {
                        continue;
                    }

                    // All neighbors processed: v is fully visited.
                    if is_local_root[v.index()] {
                        let mut indexadjustment = 1;
                        let c = NonZeroUsize::new(componentcount);
                        let start_pos = scc_stack
                            .iter()
                            .rposition(|&w| {
                                if nodes[v.index()].rootindex > nodes[w.index()].rootindex {
                                    true
                                } else {
                                    nodes[w.index()].rootindex = c;
                                    indexadjustment += 1;
                                    false
                                }
                            })
                            .map(|x| x + 1)
                            .unwrap_or(0);

                        nodes[v.index()].rootindex = c;
                        scc_stack.push(v);
                        sccs.push(scc_stack[start_pos..].to_vec());
                        scc_stack.truncate(start_pos);
                        index -= indexadjustment;
                        componentcount -= 1;
                    } else {
                        scc_stack.push(v);
                    }
                }
            }
        }
    }

    sccs
}

/// Builds the condensation of `d`: SCCs as super-nodes, `members`
/// attached, and deduplicated inter-component arcs.
pub fn condense(d: &DiGraph) -> Condensation {
    let sccs = tarjan_scc_iterative(d);

    let mut comp_of = vec![SuperId::from(0); d.vertex_count()];
    for (comp_idx, members) in sccs.iter().enumerate() {
        for &v in members {
            comp_of[v.index()] = SuperId::from(comp_idx);
        }
    }

    let mut dag = DiGraph::with_vertex_count(sccs.len());
    let mut seen_arcs: IndexSet<(SuperId, SuperId)> = IndexSet::new();
    for (u, v) in d.arcs() {
        let su = comp_of[u.index()];
        let sv = comp_of[v.index()];
        if su != sv && seen_arcs.insert((su, sv)) {
            dag.add_arc(VertexId::from(su.index()), VertexId::from(sv.index()));
        }
    }

    Condensation {
        members: sccs,
        comp_of,
        dag,
    }
}
