//! Error surface for the augmentation algorithms.
//!
//! One enum covers every failure mode described for `augment_matching`,
//! `eswaran_tarjan` and `source_cover`: all three are called from the same
//! driver and a caller of any of them wants the same vocabulary of
//! failures, so we do not split this into per-algorithm error types.

use core::fmt::{self, Display, Formatter};

use error_stack::Context;

/// Every fatal condition the crate can raise. None of these are retried or
/// recovered from internally; they propagate to the caller of the public
/// entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugmentError {
    /// `augment_matching` was given a directed graph or a multigraph, or
    /// `eswaran_tarjan` was given an undirected graph or a multigraph.
    NotImplementedForInput,
    /// `augment_matching` was called with `|A| <= 1`.
    NotAugmentable,
    /// `eswaran_tarjan(.., is_condensation = true)` was given a cyclic
    /// graph.
    HasCycle,
    /// A supplied or oracle-returned matching failed perfect-matching
    /// validation (only raised when validation was requested).
    NoPerfectMatching,
    /// `source_cover`'s greedy loop could not make progress because some
    /// critical vertex is unreachable from every source. This should be
    /// unreachable when `source_cover` is called from `augment_matching`
    /// on a condensation DAG, since every vertex of a DAG is reachable
    /// from some source, sink-less source, or is itself isolated.
    UnreachableCritical,
}

impl Display for AugmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplementedForInput => {
                write!(f, "operation is not implemented for directed or multigraph input")
            }
            Self::NotAugmentable => write!(f, "bipartite graph cannot be augmented (|A| <= 1)"),
            Self::HasCycle => write!(f, "expected an acyclic graph but found a cycle"),
            Self::NoPerfectMatching => write!(f, "supplied matching is not a perfect matching"),
            Self::UnreachableCritical => {
                write!(f, "a critical vertex is unreachable from every source")
            }
        }
    }
}

impl Context for AugmentError {}

/// Convenience alias for `error_stack::Result<T, E>` fixed to this crate's error type.
pub type Result<T> = error_stack::Result<T, AugmentError>;
