//! Quadral compatibility scoring
//!
//! Two pure scorers over `quadral-domain` snapshots:
//!
//! - [`PairScorer`] — one number in [0, 1] for a pair of users, combining
//!   mutual preference, availability overlap, timezone proximity, and age
//!   proximity.
//! - [`compute_breakdown`] — the six-factor candidate-vs-cluster record
//!   with a weighted 0–100 total, consumed by directory/application views.
//!
//! Neither scorer performs I/O or fails: missing fields degrade to
//! neutral or zero-confidence branches.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod breakdown;
pub mod pairwise;

pub use breakdown::{compute_breakdown, evaluate_candidate, CompatibilityBreakdown};
pub use pairwise::{PairScorer, PairWeights};
