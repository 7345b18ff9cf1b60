//! Bipartite matching-robustness augmentation.
//!
//! Given a simple bipartite graph `G = (A ∪ B, E)` with a perfect
//! matching `M`, [`augment_matching`] computes a set `L ⊆ E ∖ M` of
//! non-matching edges such that `(V, E ∪ L)` keeps a perfect matching
//! after the removal of any single edge. `|L|` is within an O(log n)
//! factor of the minimum such set.
//!
//! The reduction has three moving parts, each its own module:
//! a witness digraph whose strong connectivity certifies robustness
//! ([`matching_augmentation`]), Eswaran–Tarjan minimum
//! strong-connectivity augmentation on its condensation
//! ([`eswaran_tarjan`]), and a greedy source-cover approximation that
//! narrows the condensation down to the sub-DAG that actually needs
//! augmenting ([`source_cover`]).

pub mod condensation;
pub mod error;
pub mod eswaran_tarjan;
pub mod graph_store;
pub mod matching_augmentation;
pub mod matching_oracle;
pub mod source_cover;
pub mod traversal;

pub use condensation::{condense, get_sources_sinks_isolated, Condensation, SuperId};
pub use error::{AugmentError, Result};
pub use eswaran_tarjan::eswaran_tarjan;
pub use graph_store::{BipartiteGraph, DiGraph, Side, VertexId};
pub use matching_augmentation::{augment, augment_matching, AugmentOptions};
pub use matching_oracle::{HopcroftKarp, MatchingOracle};
pub use source_cover::source_cover;
