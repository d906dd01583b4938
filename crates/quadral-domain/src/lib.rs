//! Quadral domain types
//!
//! Leaf crate of the quadral workspace: the socionics taxonomy, weekly
//! availability masks, and the value snapshots the matchmaking engine
//! consumes and produces (profiles, clusters, memberships, requests).
//!
//! Everything here is plain data — no I/O, no persistence. The hosting
//! application loads snapshots, hands them to `quadral-match`, and
//! persists whatever comes back.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod availability;
pub mod cluster;
pub mod ids;
pub mod profile;
pub mod socionics;

pub use availability::{WeeklyMask, HOURS_PER_WEEK};
pub use cluster::{
    Cluster, ClusterProfile, ClusterStatus, Intent, Membership, MatchRequest, RequestStatus,
    UnknownIntentError,
};
pub use ids::{ClusterId, RequestId, UserId};
pub use profile::{UserProfile, PREFERENCE_RANGE};
pub use socionics::{
    validate_claim, PersonalityType, Quadra, QuadraClaimError, UnknownQuadraError,
    UnknownTypeError,
};
