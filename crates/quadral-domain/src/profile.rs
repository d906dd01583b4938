//! User profile snapshot
//!
//! The engine never loads profiles itself; the hosting layer hands them in
//! as fully-populated value snapshots. Most fields are optional — scoring
//! degrades gracefully when data is missing.

use crate::availability::WeeklyMask;
use crate::ids::UserId;
use crate::socionics::{PersonalityType, Quadra};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Directed preference weights are clamped to this range
pub const PREFERENCE_RANGE: std::ops::RangeInclusive<i8> = -2..=2;

/// A user as seen by the matchmaking engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier (supplied by the hosting application)
    pub id: UserId,
    /// Socionics type, when the user has taken the test
    pub socionics_type: Option<PersonalityType>,
    /// Explicit quadra override; honored only when consistent with the type
    pub quadra_claim: Option<Quadra>,
    /// Secondary psychological-type tag, independent of the socionics type
    pub psychotype: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Home city
    pub city: Option<String>,
    /// IANA timezone name
    pub timezone: Option<String>,
    /// Reputation score, nominally in [0, 1]
    pub reputation_score: f64,
    /// Activity score, nominally in [0, 1]
    pub activity_score: f64,
    /// Weekly availability
    pub availability: WeeklyMask,
    /// Directed preference weights toward other users
    pub preferences: HashMap<UserId, i8>,
}

impl UserProfile {
    /// Create a bare profile with neutral defaults
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            socionics_type: None,
            quadra_claim: None,
            psychotype: None,
            age: None,
            city: None,
            timezone: None,
            reputation_score: 0.5,
            activity_score: 0.5,
            availability: WeeklyMask::empty(),
            preferences: HashMap::new(),
        }
    }

    /// With socionics type
    #[inline]
    #[must_use]
    pub fn with_type(mut self, ty: PersonalityType) -> Self {
        self.socionics_type = Some(ty);
        self
    }

    /// With explicit quadra claim
    #[inline]
    #[must_use]
    pub fn with_quadra_claim(mut self, quadra: Quadra) -> Self {
        self.quadra_claim = Some(quadra);
        self
    }

    /// With psychotype tag
    #[inline]
    #[must_use]
    pub fn with_psychotype(mut self, tag: impl Into<String>) -> Self {
        self.psychotype = Some(tag.into());
        self
    }

    /// With age
    #[inline]
    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// With city
    #[inline]
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// With IANA timezone name
    #[inline]
    #[must_use]
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    /// With reputation score
    #[inline]
    #[must_use]
    pub fn with_reputation(mut self, score: f64) -> Self {
        self.reputation_score = score;
        self
    }

    /// With activity score
    #[inline]
    #[must_use]
    pub fn with_activity(mut self, score: f64) -> Self {
        self.activity_score = score;
        self
    }

    /// With availability mask
    #[inline]
    #[must_use]
    pub fn with_availability(mut self, mask: WeeklyMask) -> Self {
        self.availability = mask;
        self
    }

    /// With a directed preference toward another user
    #[inline]
    #[must_use]
    pub fn with_preference(mut self, to: UserId, weight: i8) -> Self {
        self.preferences.insert(to, weight);
        self
    }

    /// Resolved quadra: a consistent explicit claim wins, otherwise the
    /// quadra derived from the socionics type. `None` when the type is
    /// unknown.
    #[must_use]
    pub fn quadra(&self) -> Option<Quadra> {
        let ty = self.socionics_type?;
        match self.quadra_claim {
            Some(claim) if claim.contains(ty) => Some(claim),
            _ => Some(ty.quadra()),
        }
    }

    /// Directed preference weight toward another user, clamped to [-2, 2];
    /// missing preferences are neutral (0)
    #[inline]
    #[must_use]
    pub fn preference_toward(&self, other: UserId) -> i8 {
        self.preferences
            .get(&other)
            .copied()
            .unwrap_or(0)
            .clamp(*PREFERENCE_RANGE.start(), *PREFERENCE_RANGE.end())
    }
}
