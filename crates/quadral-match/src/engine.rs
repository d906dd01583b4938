//! Cluster assembly engine
//!
//! The state machine over cluster snapshots: list open clusters for a
//! type, join an existing cluster, or assemble a brand-new one from the
//! best-scoring free candidates. Every operation reads one consistent
//! snapshot through [`MatchStore`] and returns a transaction value; the
//! hosting layer persists it under its own isolation guarantees.

use crate::error::MatchError;
use crate::store::MatchStore;
use crate::types::{
    AssemblyOutcome, AssemblyTransaction, JoinTransaction, MatchConfig, MemberView, ScoredCluster,
};
use chrono::{DateTime, Utc};
use quadral_domain::{
    Cluster, ClusterId, ClusterStatus, Intent, MatchRequest, Membership, PersonalityType, Quadra,
    UserId, UserProfile,
};
use quadral_score::PairScorer;
use std::cmp::Ordering;
use std::collections::HashSet;

/// The matching engine
///
/// Borrows a snapshot store for the duration of one operation. Engines
/// are cheap to construct; build one per call.
#[derive(Debug)]
pub struct MatchEngine<'a, S: MatchStore> {
    store: &'a S,
    config: MatchConfig,
    now: DateTime<Utc>,
}

impl<'a, S: MatchStore> MatchEngine<'a, S> {
    /// Create an engine over a snapshot store with default configuration
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: MatchConfig::default(),
            now: Utc::now(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// With a fixed evaluation instant (timestamps and timezone scoring)
    #[inline]
    #[must_use]
    pub fn with_now(mut self, instant: DateTime<Utc>) -> Self {
        self.now = instant;
        self
    }

    fn scorer(&self) -> PairScorer {
        PairScorer::new()
            .with_weights(self.config.weights)
            .at(self.now)
    }

    /// Open clusters a user of this type could join, best first
    ///
    /// Filters to the quadra and intent, drops archived clusters, and for
    /// family intent drops clusters where the type's seat is taken or all
    /// four seats are filled. With a ranking candidate the score is the
    /// mean pairwise score against current members (0.5 for a memberless
    /// cluster); without one it is the fill ratio. Stable sort, so ties
    /// keep store order.
    #[must_use]
    pub fn list_open_clusters(
        &self,
        quadra: Quadra,
        ty: PersonalityType,
        intent: Intent,
        limit: Option<usize>,
        candidate: Option<&UserProfile>,
    ) -> Vec<ScoredCluster> {
        let limit = limit.unwrap_or(self.config.list_limit);
        let scorer = self.scorer();

        let mut scored: Vec<ScoredCluster> = self
            .store
            .clusters(quadra, intent)
            .into_iter()
            .filter(|cluster| cluster.status.is_open())
            .filter(|cluster| {
                intent != Intent::Family
                    || (!cluster.has_type(ty) && cluster.len() < quadra.size())
            })
            .map(|cluster| {
                let score = match candidate {
                    Some(profile) => self.mean_member_score(&scorer, profile, &cluster),
                    None => cluster.len() as f64 / quadra.size() as f64,
                };
                ScoredCluster {
                    cluster_id: cluster.id,
                    quadra: cluster.quadra,
                    status: cluster.status,
                    score,
                    members: member_views(&cluster),
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(limit);
        tracing::debug!(
            "listed {} open {} clusters in {} for {}",
            scored.len(),
            intent,
            quadra,
            ty
        );
        scored
    }

    /// Join an existing cluster
    ///
    /// Checks run in a fixed order, so the first applicable failure is the
    /// one reported: user lookup, cluster lookup, intent, quadra, archived
    /// state, then family seat rules. On success the returned transaction
    /// carries the matched request, the new seat, and the re-evaluated
    /// cluster status.
    pub fn try_join(
        &self,
        user_id: UserId,
        cluster_id: ClusterId,
        intent: Intent,
    ) -> Result<JoinTransaction, MatchError> {
        let user = self
            .store
            .user(user_id)
            .ok_or(MatchError::UserNotFound(user_id))?;
        let cluster = self
            .store
            .cluster(cluster_id)
            .ok_or(MatchError::ClusterNotFound(cluster_id))?;

        if cluster.intent != intent {
            tracing::warn!(
                "join rejected: cluster {cluster_id} is {}, requested {intent}",
                cluster.intent
            );
            return Err(MatchError::IntentMismatch {
                requested: intent,
                actual: cluster.intent,
            });
        }

        // A profile without a resolvable type is foreign to every quadra
        let ty = user
            .socionics_type
            .filter(|ty| cluster.quadra.contains(*ty))
            .ok_or(MatchError::ForeignQuadra {
                user: user_id,
                quadra: cluster.quadra,
            })?;

        if cluster.status.is_terminal() {
            return Err(MatchError::Archived(cluster_id));
        }

        if cluster.intent == Intent::Family
            && (cluster.has_type(ty) || cluster.len() >= cluster.quadra.size())
        {
            tracing::warn!("join rejected: {ty} seat taken in cluster {cluster_id}");
            return Err(MatchError::SlotTaken(cluster_id));
        }

        let mut request = MatchRequest::new(user_id, cluster.quadra, ty, intent, self.now);
        request.mark_matched(cluster_id);
        let membership = Membership::new(user_id, ty, Some(request.id), self.now);

        let mut updated = cluster;
        updated.add_member(membership.clone());
        let cluster_status = evaluate_status(&updated);

        tracing::info!(
            "user {user_id} joined cluster {cluster_id} as {ty}, status {cluster_status}"
        );
        Ok(JoinTransaction {
            cluster_id,
            request,
            membership,
            cluster_status,
        })
    }

    /// Attach the user to their existing cluster for this intent, or
    /// assemble a new one
    ///
    /// Idempotent: a user already holding an active membership for the
    /// intent gets that cluster back and nothing new is created. Otherwise
    /// every type the quadra requires besides the user's own is filled
    /// with the best pairwise-scoring free candidate of that exact type;
    /// if any slot has no candidates the whole operation fails softly with
    /// the list of unfillable types and no transaction is produced.
    pub fn find_or_create(
        &self,
        user_id: UserId,
        quadra: Quadra,
        intent: Intent,
    ) -> Result<AssemblyOutcome, MatchError> {
        let user = self
            .store
            .user(user_id)
            .ok_or(MatchError::UserNotFound(user_id))?;
        let ty = user
            .socionics_type
            .filter(|ty| quadra.contains(*ty))
            .ok_or(MatchError::ForeignQuadra {
                user: user_id,
                quadra,
            })?;

        if let Some(cluster) = self
            .store
            .active_cluster(user_id, intent)
            .and_then(|id| self.store.cluster(id))
        {
            tracing::info!(
                "user {user_id} already holds a {intent} membership in cluster {}",
                cluster.id
            );
            return Ok(AssemblyOutcome::Existing {
                cluster_id: cluster.id,
                members: member_views(&cluster),
            });
        }

        let mut request = MatchRequest::new(user_id, quadra, ty, intent, self.now);

        let scorer = self.scorer();
        let mut exclude = HashSet::from([user_id]);
        let mut selected: Vec<(PersonalityType, UserId)> = Vec::new();
        let mut missing: Vec<PersonalityType> = Vec::new();

        for slot in quadra.members() {
            if slot == ty {
                continue;
            }
            match self.best_candidate(&scorer, &user, slot, quadra, intent, &exclude) {
                Some(pick) => {
                    exclude.insert(pick);
                    selected.push((slot, pick));
                }
                None => missing.push(slot),
            }
        }

        if !missing.is_empty() {
            missing.sort();
            tracing::warn!(
                "assembly for user {user_id} in {quadra} failed: no candidates for {missing:?}"
            );
            // The drafted request is dropped with the failed transaction;
            // nothing reaches the store on a soft failure.
            return Err(MatchError::MissingTypes(missing));
        }

        let mut cluster = Cluster::new(quadra, intent, self.now);
        request.mark_matched(cluster.id);
        cluster.add_member(Membership::new(user_id, ty, Some(request.id), self.now));
        for (slot, member_id) in selected {
            cluster.add_member(Membership::new(member_id, slot, None, self.now));
        }
        cluster.status = evaluate_status(&cluster);

        tracing::info!(
            "assembled {intent} cluster {} in {quadra} with {} members, status {}",
            cluster.id,
            cluster.len(),
            cluster.status
        );
        let members = member_views(&cluster);
        Ok(AssemblyOutcome::Created {
            transaction: AssemblyTransaction { cluster, request },
            members,
        })
    }

    /// Best free candidate of exactly this type for the initiating user
    fn best_candidate(
        &self,
        scorer: &PairScorer,
        initiator: &UserProfile,
        slot: PersonalityType,
        quadra: Quadra,
        intent: Intent,
        exclude: &HashSet<UserId>,
    ) -> Option<UserId> {
        let mut best: Option<(f64, UserId)> = None;
        for candidate in self.store.users_of_type(slot, exclude) {
            if candidate.quadra() != Some(quadra) {
                continue;
            }
            if self.store.active_cluster(candidate.id, intent).is_some() {
                continue;
            }
            let score = scorer.score(initiator, &candidate);
            tracing::debug!("candidate {} for slot {slot}: {score:.4}", candidate.id);
            // Strictly greater, so ties keep the store's query order
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, candidate.id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn mean_member_score(
        &self,
        scorer: &PairScorer,
        candidate: &UserProfile,
        cluster: &Cluster,
    ) -> f64 {
        let scores: Vec<f64> = cluster
            .memberships
            .iter()
            .filter_map(|m| self.store.user(m.user_id))
            .map(|member| scorer.score(candidate, &member))
            .collect();
        if scores.is_empty() {
            0.5
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        }
    }
}

/// Re-evaluate a cluster's status from its memberships
///
/// Family clusters are ready with exactly one seat per required type; work
/// clusters are ready once every required type is represented, however
/// many seats exist. Archived is terminal and never recomputed.
fn evaluate_status(cluster: &Cluster) -> ClusterStatus {
    if cluster.status.is_terminal() {
        return cluster.status;
    }
    let seated = cluster.member_types();
    let covered = cluster
        .quadra
        .members()
        .iter()
        .all(|ty| seated.contains(ty));
    let ready = match cluster.intent {
        Intent::Family => covered && cluster.len() == cluster.quadra.size(),
        Intent::Work => covered,
    };
    if ready {
        ClusterStatus::Ready
    } else {
        ClusterStatus::Assembling
    }
}

fn member_views(cluster: &Cluster) -> Vec<MemberView> {
    cluster.memberships.iter().map(MemberView::from).collect()
}
