//! Quadral matching engine
//!
//! The cluster assembly state machine over `quadral-domain` snapshots:
//!
//! - [`MatchEngine`] — list open clusters, join one, or find-or-create a
//!   cluster for a user, ranking candidates with `quadral-score`.
//! - [`MatchStore`] — the only data-access seam; the hosting layer
//!   implements it over its database, [`MemoryStore`] serves tests and
//!   embedders.
//! - [`MatchError`] — the full failure taxonomy, every variant locally
//!   recoverable.
//!
//! The engine never persists anything. Successful operations return
//! transaction values ([`JoinTransaction`], [`AssemblyTransaction`]) that
//! the caller applies under its own transactional isolation; two
//! concurrent joins against the same cluster must be serialized by that
//! layer, not here.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod engine;
pub mod error;
pub mod store;
pub mod types;

pub use engine::MatchEngine;
pub use error::{MatchError, MatchErrorKind};
pub use store::{MatchStore, MemoryStore};
pub use types::{
    AssemblyOutcome, AssemblyTransaction, JoinTransaction, MatchConfig, MemberView, ScoredCluster,
};
