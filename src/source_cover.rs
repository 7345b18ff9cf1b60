//! Greedy O(log n)-approximate minimum source cover over a DAG's
//! designated critical vertices. Built on [`traverse`] for the
//! per-source reachability sweeps and a lazily-deleted `BinaryHeap`-
//! backed greedy loop: rather than a true decrease-key, we re-push an
//! entry whenever a source's coverage count changes and treat a popped
//! entry whose count disagrees with the source's *current* coverage as
//! stale and skip it — the same stale-entry-skip idiom a `BinaryHeap`-
//! based Dijkstra uses in place of an indexed priority queue.

use std::collections::{BinaryHeap, HashMap, HashSet};

use error_stack::Report;

use crate::condensation::SuperId;
use crate::error::{AugmentError, Result};
use crate::graph_store::{DiGraph, VertexId};
use crate::traversal::{traverse, EdgeSignal, NeighborSource, VertexSignal};

fn vid(s: SuperId) -> VertexId {
    VertexId(s.0)
}

fn sid(v: VertexId) -> SuperId {
    SuperId(v.0)
}

/// `sources(dag) ∪ isolated(dag)` reachability of `critical` vertices.
/// `dag` may be a condensation's forward DAG or its reverse, the
/// classification triple must be consistent with whichever is passed.
pub fn source_cover<G>(
    dag: &G,
    critical: &[SuperId],
    classification: (&[SuperId], &[SuperId], &[SuperId]),
) -> Result<Vec<SuperId>>
where
    G: NeighborSource,
{
    let (sources, _sinks, isolated) = classification;

    let mut source_pool: Vec<SuperId> = Vec::with_capacity(sources.len() + isolated.len());
    source_pool.extend_from_slice(sources);
    source_pool.extend_from_slice(isolated);

    let weak_sinks: HashSet<SuperId> = critical.iter().copied().collect();

    // --- Domination pruning -------------------------------------------------
    // From every critical vertex, find everything it can reach; any other
    // critical vertex in that reachable set is "dominated" and must not
    // contribute coverage credit to a source that also reaches the
    // dominating vertex.
    let mut deleted: HashSet<SuperId> = HashSet::new();
    for &v in critical {
        let mut reached: HashSet<SuperId> = HashSet::new();
        reached.insert(v);
        traverse(
            dag,
            vid(v),
            |_| VertexSignal::Continue,
            |neighbor, _parent| {
                if reached.insert(sid(neighbor)) {
                    EdgeSignal::Push
                } else {
                    EdgeSignal::Skip
                }
            },
        );
        reached.remove(&v);
        for w in reached {
            if weak_sinks.contains(&w) {
                deleted.insert(w);
            }
        }
    }

    let weak_sinks: HashSet<SuperId> = weak_sinks.difference(&deleted).copied().collect();

    // --- Per-source coverage --------------------------------------------------
    // A dedicated visited set per source keeps each sweep to O(|V|+|E|)
    // and never descends into a dominated (`deleted`) vertex.
    let mut children: HashMap<SuperId, HashSet<SuperId>> = HashMap::new();
    for s in source_pool.iter().copied() {
        let mut visited: HashSet<SuperId> = HashSet::new();
        visited.insert(s);
        let mut covered: HashSet<SuperId> = HashSet::new();
        if weak_sinks.contains(&s) {
            covered.insert(s);
        }
        traverse(
            dag,
            vid(s),
            |v| {
                if weak_sinks.contains(&sid(v)) {
                    covered.insert(sid(v));
                }
                VertexSignal::Continue
            },
            |neighbor, _parent| {
                let n = sid(neighbor);
                if deleted.contains(&n) || !visited.insert(n) {
                    EdgeSignal::Skip
                } else {
                    EdgeSignal::Push
                }
            },
        );
        children.insert(s, covered);
    }

    // --- Inverse map ---------------------------------------------------------
    let mut fathers: HashMap<SuperId, HashSet<SuperId>> = HashMap::new();
    for (&s, sinks) in &children {
        for &sink in sinks {
            fathers.entry(sink).or_default().insert(s);
        }
    }

    if weak_sinks.iter().any(|sink| !fathers.contains_key(sink)) {
        return Err(Report::new(AugmentError::UnreachableCritical));
    }

    // --- Greedy max-coverage loop --------------------------------------------
    let mut heap: BinaryHeap<(usize, SuperId)> = BinaryHeap::new();
    for (&s, sinks) in &children {
        if !sinks.is_empty() {
            heap.push((sinks.len(), s));
        }
    }

    let mut cover = Vec::new();
    let mut covered_count = 0usize;
    let target = weak_sinks.len();

    while covered_count < target {
        let Some((count, s)) = heap.pop() else {
            return Err(Report::new(AugmentError::UnreachableCritical));
        };

        let current = children.get(&s).map_or(0, HashSet::len);
        if current != count || current == 0 {
            continue; // stale heap entry
        }

        cover.push(s);
        covered_count += current;

        let sinks_of_s: Vec<SuperId> = children.remove(&s).unwrap().into_iter().collect();
        for sink in sinks_of_s {
            if let Some(fs) = fathers.get_mut(&sink) {
                fs.remove(&s);
                for &other in fs.iter() {
                    if let Some(c) = children.get_mut(&other) {
                        c.remove(&sink);
                        if !c.is_empty() {
                            heap.push((c.len(), other));
                        }
                    }
                }
            }
            fathers.remove(&sink);
        }
    }

    Ok(cover)
}
