//! Snapshot store boundary
//!
//! [`MatchStore`] is the only data-access seam the engine uses. The
//! hosting layer implements it over its ORM inside one transaction per
//! engine call; [`MemoryStore`] is the in-process implementation used by
//! tests and embedders.
//!
//! Implementations must return users in a deterministic order — candidate
//! tie-breaking is defined as "stable over query order".

use crate::types::{AssemblyTransaction, JoinTransaction};
use quadral_domain::{
    Cluster, ClusterId, Intent, MatchRequest, PersonalityType, Quadra, UserId, UserProfile,
};
use std::collections::HashSet;

/// Read access to a consistent snapshot of the user/cluster graph
pub trait MatchStore {
    /// Look up one user
    fn user(&self, id: UserId) -> Option<UserProfile>;

    /// Look up one cluster with its memberships
    fn cluster(&self, id: ClusterId) -> Option<Cluster>;

    /// All clusters assembled for this quadra and intent, any status
    fn clusters(&self, quadra: Quadra, intent: Intent) -> Vec<Cluster>;

    /// All users of exactly this type, excluding the given ids, in a
    /// deterministic order
    fn users_of_type(&self, ty: PersonalityType, exclude: &HashSet<UserId>) -> Vec<UserProfile>;

    /// The cluster in which the user holds an active (non-archived)
    /// membership for this intent, if any
    fn active_cluster(&self, user: UserId, intent: Intent) -> Option<ClusterId>;
}

/// In-process snapshot store
///
/// Insertion-ordered storage, so candidate ranking ties resolve the same
/// way on every run over the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<UserProfile>,
    clusters: Vec<Cluster>,
    requests: Vec<MatchRequest>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user profile
    pub fn insert_user(&mut self, profile: UserProfile) {
        match self.users.iter_mut().find(|u| u.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.users.push(profile),
        }
    }

    /// Add a cluster snapshot
    pub fn insert_cluster(&mut self, cluster: Cluster) {
        match self.clusters.iter_mut().find(|c| c.id == cluster.id) {
            Some(existing) => *existing = cluster,
            None => self.clusters.push(cluster),
        }
    }

    /// Persist a join transaction: append the membership, store the
    /// request, update the cluster status
    pub fn apply_join(&mut self, txn: &JoinTransaction) {
        if let Some(cluster) = self.clusters.iter_mut().find(|c| c.id == txn.cluster_id) {
            cluster.add_member(txn.membership.clone());
            cluster.status = txn.cluster_status;
        }
        self.requests.push(txn.request.clone());
    }

    /// Persist an assembly transaction: store the new cluster and request
    pub fn apply_assembly(&mut self, txn: &AssemblyTransaction) {
        self.insert_cluster(txn.cluster.clone());
        self.requests.push(txn.request.clone());
    }

    /// All stored requests (test inspection)
    #[inline]
    #[must_use]
    pub fn requests(&self) -> &[MatchRequest] {
        &self.requests
    }

    /// All stored clusters (test inspection)
    #[inline]
    #[must_use]
    pub fn all_clusters(&self) -> &[Cluster] {
        &self.clusters
    }
}

impl MatchStore for MemoryStore {
    fn user(&self, id: UserId) -> Option<UserProfile> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    fn cluster(&self, id: ClusterId) -> Option<Cluster> {
        self.clusters.iter().find(|c| c.id == id).cloned()
    }

    fn clusters(&self, quadra: Quadra, intent: Intent) -> Vec<Cluster> {
        self.clusters
            .iter()
            .filter(|c| c.quadra == quadra && c.intent == intent)
            .cloned()
            .collect()
    }

    fn users_of_type(&self, ty: PersonalityType, exclude: &HashSet<UserId>) -> Vec<UserProfile> {
        self.users
            .iter()
            .filter(|u| u.socionics_type == Some(ty) && !exclude.contains(&u.id))
            .cloned()
            .collect()
    }

    fn active_cluster(&self, user: UserId, intent: Intent) -> Option<ClusterId> {
        self.clusters
            .iter()
            .find(|c| c.intent == intent && !c.status.is_terminal() && c.contains_user(user))
            .map(|c| c.id)
    }
}
