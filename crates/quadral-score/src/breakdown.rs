//! Candidate-vs-cluster compatibility breakdown
//!
//! Six sub-scores in [0, 1] combined into a weighted 0–100 total. Pure
//! over its inputs; missing fields degrade to the lowest-confidence branch
//! instead of failing.

use quadral_domain::{ClusterProfile, Quadra, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-factor compatibility record
///
/// Returned to the caller as a flat record for display; `total()` is the
/// weighted aggregate in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    /// Quadra fit against the cluster's target or member quadras
    pub socionics: f64,
    /// Psychotype tag fit
    pub psycho: f64,
    /// Age proximity to the member mean
    pub age: f64,
    /// Geographic proximity (city, then timezone)
    pub geo: f64,
    /// Cluster activity
    pub activity: f64,
    /// Candidate reputation
    pub reputation: f64,
}

impl CompatibilityBreakdown {
    /// Weighted aggregate score in [0, 100]
    #[must_use]
    pub fn total(&self) -> f64 {
        50.0 * self.socionics
            + 20.0 * self.psycho
            + 10.0 * self.age
            + 8.0 * self.geo
            + 6.0 * self.activity
            + 6.0 * self.reputation
    }

    /// Total rounded to two decimals for display
    #[inline]
    #[must_use]
    pub fn display_total(&self) -> f64 {
        (self.total() * 100.0).round() / 100.0
    }
}

/// Compute the compatibility breakdown for a candidate against a cluster
/// card and the profiles of its current members
#[must_use]
pub fn compute_breakdown(
    candidate: &UserProfile,
    cluster: &ClusterProfile,
    members: &[UserProfile],
) -> CompatibilityBreakdown {
    CompatibilityBreakdown {
        socionics: socionics_score(candidate, cluster, members),
        psycho: psycho_score(candidate, cluster),
        age: age_score(candidate, members),
        geo: geo_score(candidate, cluster),
        activity: cluster.activity_score.clamp(0.0, 1.0),
        reputation: candidate.reputation_score.clamp(0.0, 1.0),
    }
}

/// Rounded total plus the full record
#[must_use]
pub fn evaluate_candidate(
    candidate: &UserProfile,
    cluster: &ClusterProfile,
    members: &[UserProfile],
) -> (f64, CompatibilityBreakdown) {
    let breakdown = compute_breakdown(candidate, cluster, members);
    (breakdown.display_total(), breakdown)
}

fn socionics_score(
    candidate: &UserProfile,
    cluster: &ClusterProfile,
    members: &[UserProfile],
) -> f64 {
    let Some(candidate_quadra) = candidate.quadra() else {
        return 0.0;
    };

    if let Some(target) = cluster.target_quadra {
        return if candidate_quadra == target { 1.0 } else { 0.0 };
    }

    let member_quadras: HashSet<Quadra> = members.iter().filter_map(UserProfile::quadra).collect();
    if member_quadras.is_empty() {
        return 0.5;
    }
    if member_quadras.contains(&candidate_quadra) {
        1.0
    } else {
        0.0
    }
}

fn psycho_score(candidate: &UserProfile, cluster: &ClusterProfile) -> f64 {
    let Some(tag) = candidate.psychotype.as_deref() else {
        return 0.0;
    };
    let Some(target) = cluster.target_psychotype.as_deref() else {
        return 0.5;
    };
    if tag.eq_ignore_ascii_case(target) {
        1.0
    } else {
        0.0
    }
}

fn age_score(candidate: &UserProfile, members: &[UserProfile]) -> f64 {
    let Some(age) = candidate.age else {
        return 0.0;
    };

    let ages: Vec<f64> = members.iter().filter_map(|m| m.age.map(f64::from)).collect();
    if ages.is_empty() {
        return 0.5;
    }

    let mean = ages.iter().sum::<f64>() / ages.len() as f64;
    let diff = (f64::from(age) - mean).abs();
    if diff <= 5.0 {
        1.0
    } else if diff <= 10.0 {
        0.5
    } else {
        0.0
    }
}

fn geo_score(candidate: &UserProfile, cluster: &ClusterProfile) -> f64 {
    if let (Some(a), Some(b)) = (candidate.city.as_deref(), cluster.city.as_deref()) {
        if a.eq_ignore_ascii_case(b) {
            return 1.0;
        }
    }
    if let (Some(a), Some(b)) = (candidate.timezone.as_deref(), cluster.timezone.as_deref()) {
        if a == b {
            return 0.5;
        }
    }
    0.0
}
