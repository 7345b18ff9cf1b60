//! Eswaran–Tarjan minimum strong-connectivity augmentation, with
//! Raghavan's correction. The arc-synthesis case analysis is kept
//! literal — it is the contribution of this algorithm and any
//! "simplification" of it tends to silently drop a case — but the
//! marking DFS and cycle check use this crate's iterative `traverse`,
//! communicating "sink found" out of the DFS via a returned `Option`
//! rather than a captured mutable outer variable.

use std::collections::{HashSet, VecDeque};

use error_stack::Report;
use indexmap::IndexSet;

use crate::condensation::{condense, get_sources_sinks_isolated, SuperId};
use crate::error::{AugmentError, Result};
use crate::graph_store::{DiGraph, VertexId};
use crate::traversal::{traverse, EdgeSignal, NeighborSource, VertexSignal};

fn vid(s: SuperId) -> VertexId {
    VertexId(s.0)
}

fn sid(v: VertexId) -> SuperId {
    SuperId(v.0)
}

/// `true` if `g` has no directed cycle, checked iteratively via
/// Kahn's algorithm (in-degree counting) rather than computing a full
/// topological order and discarding it.
fn is_acyclic(g: &DiGraph) -> bool {
    let mut in_degree: Vec<usize> = g.vertices().map(|v| g.in_degree(v)).collect();
    let mut queue: VecDeque<VertexId> = g
        .vertices()
        .filter(|&v| in_degree[v.index()] == 0)
        .collect();

    let mut visited = 0usize;
    while let Some(v) = queue.pop_front() {
        visited += 1;
        for w in g.out_neighbors(v) {
            in_degree[w.index()] -= 1;
            if in_degree[w.index()] == 0 {
                queue.push_back(w);
            }
        }
    }

    visited == g.vertex_count()
}

/// Minimum-cardinality arc set making `h` strongly connected, expressed
/// over `h`'s own vertex ids.
///
/// If `is_condensation` is `false`, `h` is condensed first and returned
/// arcs are over the condensation's super-node ids paired with one
/// representative member each (see [`eswaran_tarjan_condensed`] if the
/// caller already has a [`crate::condensation::Condensation`] and wants
/// super-node arcs directly).
pub fn eswaran_tarjan(h: &DiGraph, is_condensation: bool) -> Result<IndexSet<(VertexId, VertexId)>> {
    if is_condensation {
        if !is_acyclic(h) {
            return Err(Report::new(AugmentError::HasCycle));
        }
        Ok(augment_dag(h))
    } else {
        let condensation = condense(h);
        let arcs = augment_dag(&condensation.dag);
        // Project super-node arcs back to one representative member
        // vertex of `h` per endpoint (selection never mutates `members`).
        let projected = arcs
            .into_iter()
            .map(|(u, v)| {
                let member_u = condensation.members[u.index()][0];
                let member_v = condensation.members[v.index()][0];
                (member_u, member_v)
            })
            .collect();
        Ok(projected)
    }
}

/// Core algorithm, operating directly on a DAG's vertex ids (used both
/// by [`eswaran_tarjan`] and by the driver, which calls this on the
/// induced sub-DAG `D̂` with its own `sources`/`sinks`/`isolated`
/// already restricted).
pub fn augment_dag(h: &DiGraph) -> IndexSet<(VertexId, VertexId)> {
    if h.vertex_count() <= 1 {
        return IndexSet::new();
    }

    let (sources0, sinks0, isolated0) = get_sources_sinks_isolated(h);
    augment_dag_with_classification(h, sources0, sinks0, isolated0)
}

/// Same as [`augment_dag`] but with an explicit classification — the
/// driver computes `sources`/`sinks`/`isolated` once for the full
/// condensation and restricts it to `D̂`'s vertex set rather than
/// reclassifying from scratch.
pub fn augment_dag_with_classification(
    h: &DiGraph,
    mut sources: Vec<SuperId>,
    mut sinks: Vec<SuperId>,
    isolated: Vec<SuperId>,
) -> IndexSet<(VertexId, VertexId)> {
    if h.vertex_count() <= 1 {
        return IndexSet::new();
    }

    let mut reversed_copy: Option<DiGraph> = None;
    let mut reverted = false;

    if sources.len() > sinks.len() {
        reverted = true;
        std::mem::swap(&mut sources, &mut sinks);
        // Build an owned reversed copy so the rest of the function can
        // treat `h_eff` uniformly as a `&DiGraph`.
        let mut rev = DiGraph::with_vertex_count(h.vertex_count());
        for (u, v) in h.arcs() {
            rev.add_arc(v, u);
        }
        reversed_copy = Some(rev);
    }

    let h_eff: &DiGraph = reversed_copy.as_ref().unwrap_or(h);

    let s = sources.len();
    let t = sinks.len();
    let q = isolated.len();

    let sink_set: HashSet<SuperId> = sinks.iter().copied().collect();

    // --- Matching phase: unmarked-source search -----------------------------
    let mut unmarked: HashSet<VertexId> = h_eff.vertices().collect();
    let mut v_list: Vec<SuperId> = Vec::new();
    let mut w_list: Vec<SuperId> = Vec::new();
    let mut paired_sources: HashSet<SuperId> = HashSet::new();
    let mut paired_sinks: HashSet<SuperId> = HashSet::new();

    for &v in &sources {
        let start = vid(v);
        if !unmarked.contains(&start) {
            continue;
        }

        let found_sink = traverse(
            h_eff,
            start,
            |u| {
                unmarked.remove(&u);
                if sink_set.contains(&sid(u)) {
                    VertexSignal::Stop
                } else {
                    VertexSignal::Continue
                }
            },
            |neighbor, _parent| {
                if unmarked.contains(&neighbor) {
                    EdgeSignal::Push
                } else {
                    EdgeSignal::Skip
                }
            },
        );

        if let Some(w) = found_sink {
            v_list.push(v);
            w_list.push(sid(w));
            paired_sources.insert(v);
            paired_sinks.insert(sid(w));
        }
    }

    let p = v_list.len();

    // --- Completion: extend with unpaired sources/sinks, any order --------
    for &v in &sources {
        if !paired_sources.contains(&v) {
            v_list.push(v);
        }
    }
    for &w in &sinks {
        if !paired_sinks.contains(&w) {
            w_list.push(w);
        }
    }
    let x_list: Vec<SuperId> = isolated;

    // --- Arc synthesis -------------------------------------------------------
    let mut arcs: IndexSet<(SuperId, SuperId)> = IndexSet::new();

    for i in 0..p.saturating_sub(1) {
        arcs.insert((w_list[i], v_list[i + 1]));
    }
    for i in p..s {
        arcs.insert((w_list[i], v_list[i]));
    }
    for i in s..t.saturating_sub(1) {
        arcs.insert((w_list[i], w_list[i + 1]));
    }
    for i in 0..q.saturating_sub(1) {
        arcs.insert((x_list[i], x_list[i + 1]));
    }

    if p == 0 {
        // Forces s = t = 0, q >= 2.
        arcs.insert((x_list[q - 1], x_list[0]));
    } else if s == t && q == 0 {
        arcs.insert((w_list[p - 1], v_list[0]));
    } else if s == t {
        arcs.insert((w_list[p - 1], x_list[0]));
        arcs.insert((x_list[q - 1], v_list[0]));
    } else if t > s && q == 0 {
        arcs.insert((w_list[p - 1], w_list[s]));
        arcs.insert((w_list[t - 1], v_list[0]));
    } else {
        arcs.insert((w_list[p - 1], w_list[s]));
        arcs.insert((w_list[t - 1], x_list[0]));
        arcs.insert((x_list[q - 1], v_list[0]));
    }

    let mut result: IndexSet<(VertexId, VertexId)> = arcs
        .into_iter()
        .map(|(u, v)| {
            if reverted {
                (vid(v), vid(u))
            } else {
                (vid(u), vid(v))
            }
        })
        .collect();

    // Stable, deterministic order for callers that care (tests do).
    result.sort_unstable();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(a: u32, b: u32) -> (VertexId, VertexId) {
        (VertexId(a), VertexId(b))
    }

    /// A directed path 0→1→2→3→4 needs exactly one closing arc (4, 0).
    #[test]
    fn path_needs_one_closing_arc() {
        let mut g = DiGraph::with_vertex_count(5);
        for i in 0..4u32 {
            g.add_arc(VertexId(i), VertexId(i + 1));
        }

        let arcs = eswaran_tarjan(&g, true).unwrap();
        assert_eq!(arcs.len(), 1);
        assert!(arcs.contains(&arc(4, 0)));
    }

    #[test]
    fn trivial_graph_needs_nothing() {
        let g = DiGraph::with_vertex_count(1);
        let arcs = eswaran_tarjan(&g, true).unwrap();
        assert!(arcs.is_empty());
    }

    #[test]
    fn already_strongly_connected_needs_nothing() {
        let mut g = DiGraph::with_vertex_count(3);
        g.add_arc(VertexId(0), VertexId(1));
        g.add_arc(VertexId(1), VertexId(2));
        g.add_arc(VertexId(2), VertexId(0));

        // condense first: a single strongly connected component yields a
        // condensation with one super-node, |V|<=1, no arcs needed.
        let arcs = eswaran_tarjan(&g, false).unwrap();
        assert!(arcs.is_empty());
    }

    #[test]
    fn cyclic_input_with_is_condensation_true_errors() {
        let mut g = DiGraph::with_vertex_count(2);
        g.add_arc(VertexId(0), VertexId(1));
        g.add_arc(VertexId(1), VertexId(0));

        let err = eswaran_tarjan(&g, true).unwrap_err();
        assert_eq!(*err.current_context(), AugmentError::HasCycle);
    }

    /// Reverse symmetry: |eswaran_tarjan(H)| == |eswaran_tarjan(reverse(H))|.
    #[test]
    fn reverse_symmetry_of_arc_count() {
        let mut g = DiGraph::with_vertex_count(5);
        for i in 0..4u32 {
            g.add_arc(VertexId(i), VertexId(i + 1));
        }
        let mut rev = DiGraph::with_vertex_count(5);
        for (u, v) in g.arcs() {
            rev.add_arc(v, u);
        }

        let forward = eswaran_tarjan(&g, true).unwrap();
        let backward = eswaran_tarjan(&rev, true).unwrap();
        assert_eq!(forward.len(), backward.len());
    }

    /// Balanced structure with two sources and two sinks and no isolated
    /// vertices exercises the `t > s` (after normalization, `s == t`)
    /// and `q == 0` arc-synthesis branch.
    #[test]
    fn two_sources_two_sinks_no_isolated() {
        // 0 -> 2, 1 -> 3 : two disjoint paths, s=2, t=2, q=0.
        let mut g = DiGraph::with_vertex_count(4);
        g.add_arc(VertexId(0), VertexId(2));
        g.add_arc(VertexId(1), VertexId(3));

        let arcs = eswaran_tarjan(&g, true).unwrap();
        assert_eq!(arcs.len(), 2); // max(s, t) + q = 2
    }

    #[test]
    fn isolated_vertices_only_form_a_cycle() {
        // Four isolated vertices (no arcs at all): s=t=0, q=4.
        let g = DiGraph::with_vertex_count(4);
        let arcs = eswaran_tarjan(&g, true).unwrap();
        assert_eq!(arcs.len(), 4); // a q-cycle needs q arcs
    }
}
