//! Clusters, memberships, and match requests
//!
//! Value snapshots of the assembly state machine. The engine receives and
//! returns these records; durability and isolation belong to the hosting
//! layer.

use crate::ids::{ClusterId, RequestId, UserId};
use crate::socionics::{PersonalityType, Quadra};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// What a cluster is assembled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Fixed-size cluster: exactly one member per type in the quadra
    Family,
    /// Open-ended cluster: every type represented at least once, repeats allowed
    Work,
}

impl Intent {
    /// Canonical lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Family => "family",
            Self::Work => "work",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = UnknownIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "family" => Ok(Self::Family),
            "work" => Ok(Self::Work),
            _ => Err(UnknownIntentError(s.to_string())),
        }
    }
}

/// Unrecognized intent name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cluster intent: {0}")]
pub struct UnknownIntentError(pub String);

/// Cluster lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    /// Still collecting members
    Assembling,
    /// Required type coverage reached
    Ready,
    /// Closed; rejects all further joins
    Archived,
}

impl ClusterStatus {
    /// Archived clusters never change state again
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Whether the cluster still shows up in open listings
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Assembling | Self::Ready)
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assembling => "assembling",
            Self::Ready => "ready",
            Self::Archived => "archived",
        };
        f.write_str(name)
    }
}

/// One user's seat in a cluster, recording the type at join time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// The member
    pub user_id: UserId,
    /// Personality type recorded when the member joined
    pub socionics_type: PersonalityType,
    /// The match request that produced this seat, if any
    pub request_id: Option<RequestId>,
    /// Join timestamp
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    /// Create a membership record
    #[inline]
    #[must_use]
    pub fn new(
        user_id: UserId,
        socionics_type: PersonalityType,
        request_id: Option<RequestId>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            socionics_type,
            request_id,
            joined_at,
        }
    }
}

/// A matchmaking cluster with its member seats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier
    pub id: ClusterId,
    /// The quadra this cluster assembles
    pub quadra: Quadra,
    /// Family or work intent
    pub intent: Intent,
    /// Lifecycle state
    pub status: ClusterStatus,
    /// Ordered member seats
    pub memberships: Vec<Membership>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Cluster {
    /// Create an empty cluster in `Assembling` state with a fresh id
    #[must_use]
    pub fn new(quadra: Quadra, intent: Intent, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ClusterId::new(),
            quadra,
            intent,
            status: ClusterStatus::Assembling,
            memberships: Vec::new(),
            created_at,
        }
    }

    /// Append a member seat
    #[inline]
    pub fn add_member(&mut self, membership: Membership) {
        self.memberships.push(membership);
    }

    /// Number of member seats
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    /// Whether the cluster has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    /// Personality types currently seated
    #[must_use]
    pub fn member_types(&self) -> HashSet<PersonalityType> {
        self.memberships
            .iter()
            .map(|m| m.socionics_type)
            .collect()
    }

    /// Whether a seat with this type already exists
    #[inline]
    #[must_use]
    pub fn has_type(&self, ty: PersonalityType) -> bool {
        self.memberships.iter().any(|m| m.socionics_type == ty)
    }

    /// Whether the user already holds a seat here
    #[inline]
    #[must_use]
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.memberships.iter().any(|m| m.user_id == user_id)
    }
}

/// Directory-card view of a cluster, used by the compatibility breakdown
///
/// Separate from [`Cluster`]: the breakdown scores candidates against a
/// cluster's declared matching hints, which may exist without any
/// assembled membership state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    /// Declared target quadra, if any
    pub target_quadra: Option<Quadra>,
    /// Declared target psychotype tag, if any
    pub target_psychotype: Option<String>,
    /// Home city
    pub city: Option<String>,
    /// Timezone string
    pub timezone: Option<String>,
    /// Cluster activity score, nominally in [0, 1]
    pub activity_score: f64,
}

impl ClusterProfile {
    /// Create an empty card with neutral activity
    #[must_use]
    pub fn new() -> Self {
        Self {
            activity_score: 0.5,
            ..Self::default()
        }
    }

    /// With target quadra
    #[inline]
    #[must_use]
    pub fn with_target_quadra(mut self, quadra: Quadra) -> Self {
        self.target_quadra = Some(quadra);
        self
    }

    /// With target psychotype tag
    #[inline]
    #[must_use]
    pub fn with_target_psychotype(mut self, tag: impl Into<String>) -> Self {
        self.target_psychotype = Some(tag.into());
        self
    }

    /// With city
    #[inline]
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// With timezone string
    #[inline]
    #[must_use]
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    /// With activity score
    #[inline]
    #[must_use]
    pub fn with_activity(mut self, score: f64) -> Self {
        self.activity_score = score;
        self
    }
}

/// Match request lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for a cluster
    Pending,
    /// Attached to a cluster (terminal)
    Matched,
    /// Withdrawn by the user (terminal)
    Cancelled,
}

impl RequestStatus {
    /// Matched and Cancelled requests never reopen
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Matched | Self::Cancelled)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A user's standing intent to join or assemble a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Request identifier
    pub id: RequestId,
    /// The requesting user
    pub user_id: UserId,
    /// Target quadra
    pub quadra: Quadra,
    /// The user's type at request time
    pub socionics_type: PersonalityType,
    /// Family or work intent
    pub intent: Intent,
    /// Lifecycle state
    pub status: RequestStatus,
    /// The cluster this request resolved to, once matched
    pub cluster_id: Option<ClusterId>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl MatchRequest {
    /// Create a pending request with a fresh id
    #[must_use]
    pub fn new(
        user_id: UserId,
        quadra: Quadra,
        socionics_type: PersonalityType,
        intent: Intent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            user_id,
            quadra,
            socionics_type,
            intent,
            status: RequestStatus::Pending,
            cluster_id: None,
            created_at,
        }
    }

    /// Transition to Matched and link the cluster; only pending requests move
    pub fn mark_matched(&mut self, cluster_id: ClusterId) {
        if self.status == RequestStatus::Pending {
            self.status = RequestStatus::Matched;
            self.cluster_id = Some(cluster_id);
        }
    }

    /// Transition to Cancelled; only pending requests move
    pub fn cancel(&mut self) {
        if self.status == RequestStatus::Pending {
            self.status = RequestStatus::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn cluster_tracks_member_types() {
        let mut cluster = Cluster::new(Quadra::Alpha, Intent::Family, now());
        assert!(cluster.is_empty());

        cluster.add_member(Membership::new(
            UserId::new(),
            PersonalityType::ILE,
            None,
            now(),
        ));
        assert_eq!(cluster.len(), 1);
        assert!(cluster.has_type(PersonalityType::ILE));
        assert!(!cluster.has_type(PersonalityType::SEI));
        assert_eq!(cluster.member_types().len(), 1);
    }

    #[test]
    fn request_matches_only_from_pending() {
        let cluster_id = ClusterId::new();
        let mut request = MatchRequest::new(
            UserId::new(),
            Quadra::Beta,
            PersonalityType::SLE,
            Intent::Family,
            now(),
        );
        request.mark_matched(cluster_id);
        assert_eq!(request.status, RequestStatus::Matched);
        assert_eq!(request.cluster_id, Some(cluster_id));

        // Terminal: neither cancel nor a second match changes anything
        request.cancel();
        assert_eq!(request.status, RequestStatus::Matched);
        request.mark_matched(ClusterId::new());
        assert_eq!(request.cluster_id, Some(cluster_id));
    }

    #[test]
    fn cancelled_request_stays_cancelled() {
        let mut request = MatchRequest::new(
            UserId::new(),
            Quadra::Gamma,
            PersonalityType::SEE,
            Intent::Work,
            now(),
        );
        request.cancel();
        assert_eq!(request.status, RequestStatus::Cancelled);
        request.mark_matched(ClusterId::new());
        assert_eq!(request.status, RequestStatus::Cancelled);
        assert_eq!(request.cluster_id, None);
    }

    #[test]
    fn status_predicates() {
        assert!(ClusterStatus::Assembling.is_open());
        assert!(ClusterStatus::Ready.is_open());
        assert!(!ClusterStatus::Archived.is_open());
        assert!(ClusterStatus::Archived.is_terminal());
        assert!(RequestStatus::Matched.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
    }

    #[test]
    fn intent_parse_round_trip() {
        assert_eq!("family".parse::<Intent>().unwrap(), Intent::Family);
        assert_eq!("WORK".parse::<Intent>().unwrap(), Intent::Work);
        assert!("casual".parse::<Intent>().is_err());
        assert_eq!(Intent::Family.to_string(), "family");
    }
}
