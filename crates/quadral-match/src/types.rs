//! Engine configuration and outcome payloads
//!
//! The engine never writes anywhere: successful operations return
//! transaction values describing exactly what the hosting layer should
//! persist, plus display payloads for the caller.

use quadral_domain::{
    Cluster, ClusterId, ClusterStatus, MatchRequest, Membership, PersonalityType, Quadra, UserId,
};
use quadral_score::PairWeights;
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Pairwise term weights
    pub weights: PairWeights,
    /// Default result cap for open-cluster listings
    pub list_limit: usize,
}

impl MatchConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With pairwise weights
    #[inline]
    #[must_use]
    pub fn with_weights(mut self, weights: PairWeights) -> Self {
        self.weights = weights;
        self
    }

    /// With listing limit
    #[inline]
    #[must_use]
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: PairWeights::default(),
            list_limit: 10,
        }
    }
}

/// One entry of an ordered cluster member list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    /// The member
    pub user_id: UserId,
    /// Type recorded at join time
    pub socionics_type: PersonalityType,
}

impl From<&Membership> for MemberView {
    fn from(membership: &Membership) -> Self {
        Self {
            user_id: membership.user_id,
            socionics_type: membership.socionics_type,
        }
    }
}

/// An open cluster with its ranking score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCluster {
    /// Cluster identifier
    pub cluster_id: ClusterId,
    /// The cluster's quadra
    pub quadra: Quadra,
    /// Current lifecycle state
    pub status: ClusterStatus,
    /// Ranking score: mean pairwise score against a supplied candidate,
    /// or the fill ratio when no candidate was given
    pub score: f64,
    /// Current members
    pub members: Vec<MemberView>,
}

/// Mutations produced by a successful join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinTransaction {
    /// The cluster joined
    pub cluster_id: ClusterId,
    /// The matched request to persist (already linked to the cluster)
    pub request: MatchRequest,
    /// The new member seat to persist
    pub membership: Membership,
    /// Re-evaluated cluster status after the join
    pub cluster_status: ClusterStatus,
}

/// Mutations produced by assembling a brand-new cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyTransaction {
    /// The new cluster, member seats included, status re-evaluated
    pub cluster: Cluster,
    /// The initiator's matched request
    pub request: MatchRequest,
}

/// Result of a find-or-create operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssemblyOutcome {
    /// The user already held an active membership for this intent;
    /// nothing new was created
    Existing {
        /// The cluster the user already belongs to
        cluster_id: ClusterId,
        /// Its current member list
        members: Vec<MemberView>,
    },
    /// A new cluster was assembled
    Created {
        /// What the hosting layer should persist
        transaction: AssemblyTransaction,
        /// Ordered member list of the new cluster
        members: Vec<MemberView>,
    },
}

impl AssemblyOutcome {
    /// The cluster this outcome refers to
    #[inline]
    #[must_use]
    pub fn cluster_id(&self) -> ClusterId {
        match self {
            Self::Existing { cluster_id, .. } => *cluster_id,
            Self::Created { transaction, .. } => transaction.cluster.id,
        }
    }

    /// The cluster's member list
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[MemberView] {
        match self {
            Self::Existing { members, .. } | Self::Created { members, .. } => members,
        }
    }

    /// Whether this call assembled a new cluster
    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quadral_domain::Intent;

    #[test]
    fn config_builders() {
        let config = MatchConfig::new().with_list_limit(25);
        assert_eq!(config.list_limit, 25);
        assert_eq!(config.weights, PairWeights::default());
    }

    #[test]
    fn outcome_accessors() {
        let mut cluster = Cluster::new(Quadra::Alpha, Intent::Family, Utc::now());
        let user = UserId::new();
        cluster.add_member(Membership::new(user, PersonalityType::ILE, None, Utc::now()));
        let mut request = MatchRequest::new(
            user,
            Quadra::Alpha,
            PersonalityType::ILE,
            Intent::Family,
            Utc::now(),
        );
        request.mark_matched(cluster.id);

        let members: Vec<MemberView> = cluster.memberships.iter().map(MemberView::from).collect();
        let outcome = AssemblyOutcome::Created {
            transaction: AssemblyTransaction {
                cluster: cluster.clone(),
                request,
            },
            members,
        };
        assert!(outcome.is_created());
        assert_eq!(outcome.cluster_id(), cluster.id);
        assert_eq!(outcome.members().len(), 1);
        assert_eq!(outcome.members()[0].user_id, user);
    }

    #[test]
    fn join_transaction_serializes_for_the_hosting_layer() {
        let cluster_id = ClusterId::new();
        let user = UserId::new();
        let mut request = MatchRequest::new(
            user,
            Quadra::Delta,
            PersonalityType::SLI,
            Intent::Work,
            Utc::now(),
        );
        request.mark_matched(cluster_id);
        let txn = JoinTransaction {
            cluster_id,
            membership: Membership::new(user, PersonalityType::SLI, Some(request.id), Utc::now()),
            request,
            cluster_status: ClusterStatus::Assembling,
        };

        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["cluster_status"], "assembling");
        assert_eq!(value["request"]["status"], "matched");
        assert_eq!(value["membership"]["socionics_type"], "SLI");
    }
}
