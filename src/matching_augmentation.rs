//! Top-level driver: builds the witness digraph, condenses it, runs
//! source-cover twice to find the induced sub-DAG that actually needs
//! augmenting, runs Eswaran–Tarjan on it, and projects the result back
//! to edges of the input graph. This module is the one place that
//! wires `graph_store`, `condensation`, `source_cover`,
//! `eswaran_tarjan` and `matching_oracle` together; none of those
//! modules know about each other.

use std::collections::{HashMap, HashSet};

use error_stack::Report;
use fixedbitset::FixedBitSet;

use crate::condensation::{condense, get_sources_sinks_isolated, SuperId};
use crate::error::{AugmentError, Result};
use crate::eswaran_tarjan::augment_dag_with_classification;
use crate::graph_store::{BipartiteGraph, DiGraph, VertexId};
use crate::matching_oracle::{verify_matching, HopcroftKarp, MatchingOracle};
use crate::source_cover::source_cover;
use crate::traversal::mark_reachable;

/// Options controlling the driver's optional, non-semantic-changing
/// behavior. There is no configuration file or environment variable
/// surface: everything is this one small struct, passed explicitly.
#[derive(Debug, Clone, Copy)]
pub struct AugmentOptions {
    /// When `true` and a matching is supplied, check it is a valid
    /// perfect matching before use. Off by default: the caller is
    /// trusted, per the documented performance escape.
    pub verify_matching: bool,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        AugmentOptions {
            verify_matching: false,
        }
    }
}

fn vid(s: SuperId) -> VertexId {
    VertexId(s.0)
}

fn sid(v: VertexId) -> SuperId {
    SuperId(v.0)
}

/// Builds the witness digraph D(G, M): one vertex per member of `A`; an
/// arc (a, a') whenever a' is a neighbor (other than a) of a's mate.
fn build_witness_digraph(g: &BipartiteGraph, a: &[VertexId], mate: &HashMap<VertexId, VertexId>) -> DiGraph {
    let mut index_of: HashMap<VertexId, VertexId> = HashMap::with_capacity(a.len());
    for (i, &v) in a.iter().enumerate() {
        index_of.insert(v, VertexId::from(i));
    }

    let mut d = DiGraph::with_vertex_count(a.len());
    for (i, &v) in a.iter().enumerate() {
        let w = mate[&v];
        for neighbor in g.neighbors(w) {
            if neighbor == v {
                continue;
            }
            if let Some(&j) = index_of.get(&neighbor) {
                d.add_arc(VertexId::from(i), j);
            }
        }
    }
    d
}

/// Computes an O(log n)-approximate minimum set of non-matching edges
/// `L` such that `(V(G), E(G) ∪ L)` keeps a perfect matching after any
/// single edge is removed. `g` must be simple and undirected; `a` is
/// one side of the bipartition. If `m` is `None`, a perfect matching is
/// computed via [`HopcroftKarp`].
pub fn augment_matching(
    g: &BipartiteGraph,
    a: &[VertexId],
    m: Option<&HashMap<VertexId, VertexId>>,
    options: AugmentOptions,
) -> Result<HashSet<(VertexId, VertexId)>> {
    if !g.is_simple() {
        return Err(Report::new(AugmentError::NotImplementedForInput));
    }
    if a.len() <= 1 {
        return Err(Report::new(AugmentError::NotAugmentable));
    }

    let owned_matching;
    let mate: &HashMap<VertexId, VertexId> = match m {
        Some(existing) => existing,
        None => {
            owned_matching = HopcroftKarp.perfect_matching(g)?;
            &owned_matching
        }
    };

    if options.verify_matching && !verify_matching(g, mate) {
        return Err(Report::new(AugmentError::NoPerfectMatching));
    }

    let d = build_witness_digraph(g, a, mate);
    let condensation = condense(&d);
    let (sources, sinks, isolated) = get_sources_sinks_isolated(&condensation.dag);

    let critical: Vec<SuperId> = condensation.trivial_sccs().collect();
    if critical.is_empty() {
        return Ok(HashSet::new());
    }

    let c0 = source_cover(&condensation.dag, &critical, (&sources, &sinks, &isolated))?;
    let reversed_dag = condensation.dag.reversed();
    let c1 = source_cover(&reversed_dag, &critical, (&sinks, &sources, &isolated))?;

    let mut cx = FixedBitSet::with_capacity(condensation.super_count());
    let starts_forward: Vec<VertexId> = c0.iter().chain(critical.iter()).map(|&s| vid(s)).collect();
    mark_reachable(&condensation.dag, starts_forward, &mut cx);

    let mut xc = FixedBitSet::with_capacity(condensation.super_count());
    let starts_backward: Vec<VertexId> = c1.iter().chain(critical.iter()).map(|&s| vid(s)).collect();
    mark_reachable(&reversed_dag, starts_backward, &mut xc);

    let mut d_hat_vertices: Vec<SuperId> = (0..condensation.super_count())
        .map(SuperId::from)
        .filter(|&s| cx[s.index()] && xc[s.index()])
        .collect();

    if d_hat_vertices.len() == 1 {
        let only = d_hat_vertices[0];
        if let Some(other) = (0..condensation.super_count())
            .map(SuperId::from)
            .find(|&s| s != only)
        {
            d_hat_vertices.push(other);
        }
    }

    let d_hat_vertex_ids: Vec<VertexId> = d_hat_vertices.iter().map(|&s| vid(s)).collect();
    let (d_hat, members_of_d_hat) = condensation.dag.induced_subgraph(&d_hat_vertex_ids);

    let (local_sources, local_sinks, local_isolated) = get_sources_sinks_isolated(&d_hat);

    let arcs_in_d_hat = augment_dag_with_classification(&d_hat, local_sources, local_sinks, local_isolated);

    let mut result = HashSet::with_capacity(arcs_in_d_hat.len());
    for (u_local, v_local) in arcs_in_d_hat {
        let u_super = sid(members_of_d_hat[u_local.index()]);
        let v_super = sid(members_of_d_hat[v_local.index()]);

        let member_u = condensation.members[u_super.index()][0];
        let member_v = condensation.members[v_super.index()][0];

        // member_u, member_v are A-side vertices of D; project to the
        // G-edge (member_v, M[member_u]).
        let a_vertex = a[member_v.index()];
        let b_vertex = mate[&a[member_u.index()]];
        result.insert((a_vertex, b_vertex));
    }

    Ok(result)
}

/// Convenience overload using default options (no matching
/// verification).
pub fn augment(g: &BipartiteGraph, a: &[VertexId], m: Option<&HashMap<VertexId, VertexId>>) -> Result<HashSet<(VertexId, VertexId)>> {
    augment_matching(g, a, m, AugmentOptions::default())
}
