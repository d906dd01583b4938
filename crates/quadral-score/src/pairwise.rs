//! Pairwise compatibility scoring
//!
//! Combines mutual preference, availability overlap, timezone proximity,
//! and age proximity into one score per user pair. Every branch returns a
//! value in [0, 1]; missing data scores neutral rather than failing.

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use quadral_domain::UserProfile;
use serde::{Deserialize, Serialize};

/// Term weights for the pairwise score
///
/// The defaults sum to 1.0; callers overriding them are responsible for
/// keeping the sum normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairWeights {
    /// Mutual directed preference
    pub preference: f64,
    /// Weekly availability overlap
    pub availability: f64,
    /// Timezone proximity
    pub timezone: f64,
    /// Age proximity
    pub age: f64,
}

impl Default for PairWeights {
    fn default() -> Self {
        Self {
            preference: 0.5,
            availability: 0.3,
            timezone: 0.1,
            age: 0.1,
        }
    }
}

/// Scores user pairs at a fixed evaluation instant
///
/// The instant matters only for the timezone term: named zones are
/// resolved to their UTC offset as of that moment, so DST transitions are
/// reflected consistently within one matching operation.
#[derive(Debug, Clone, Copy)]
pub struct PairScorer {
    weights: PairWeights,
    now: DateTime<Utc>,
}

impl PairScorer {
    /// Create a scorer with default weights, evaluated at the current time
    #[must_use]
    pub fn new() -> Self {
        Self {
            weights: PairWeights::default(),
            now: Utc::now(),
        }
    }

    /// With a fixed evaluation instant
    #[inline]
    #[must_use]
    pub fn at(mut self, instant: DateTime<Utc>) -> Self {
        self.now = instant;
        self
    }

    /// With custom term weights
    #[inline]
    #[must_use]
    pub fn with_weights(mut self, weights: PairWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Compatibility score for a user pair, in [0, 1]
    #[must_use]
    pub fn score(&self, a: &UserProfile, b: &UserProfile) -> f64 {
        let like_a = f64::from(a.preference_toward(b.id) + 2) / 4.0;
        let like_b = f64::from(b.preference_toward(a.id) + 2) / 4.0;
        let preference = (like_a + like_b) / 2.0;

        let availability = a.availability.overlap(&b.availability);
        let timezone = self.timezone_term(a.timezone.as_deref(), b.timezone.as_deref());
        let age = age_term(a.age, b.age);

        self.weights.preference * preference
            + self.weights.availability * availability
            + self.weights.timezone * timezone
            + self.weights.age * age
    }

    /// Timezone proximity: unknown on either side is neutral (0.5), an
    /// unresolvable zone name scores 0.0, otherwise the offset difference
    /// in hours is clamped to 12 and inverted.
    fn timezone_term(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        let (Some(name_a), Some(name_b)) = (a, b) else {
            return 0.5;
        };

        let (Some(offset_a), Some(offset_b)) = (
            self.utc_offset_hours(name_a),
            self.utc_offset_hours(name_b),
        ) else {
            return 0.0;
        };

        let diff = (offset_a - offset_b).abs().min(12.0);
        (1.0 - diff / 12.0).max(0.0)
    }

    /// UTC offset in hours for a named zone at the evaluation instant
    fn utc_offset_hours(&self, name: &str) -> Option<f64> {
        let tz: Tz = match name.parse() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::debug!(zone = name, "unresolvable timezone name");
                return None;
            }
        };
        let offset = tz.offset_from_utc_datetime(&self.now.naive_utc());
        Some(f64::from(offset.fix().local_minus_utc()) / 3600.0)
    }
}

impl Default for PairScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Age proximity: unknown on either side is neutral, otherwise linear
/// falloff reaching 0 at a 20-year difference
fn age_term(a: Option<u32>, b: Option<u32>) -> f64 {
    let (Some(age_a), Some(age_b)) = (a, b) else {
        return 0.5;
    };
    let diff = (f64::from(age_a) - f64::from(age_b)).abs();
    (1.0 - diff / 20.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quadral_domain::{PersonalityType, UserId, WeeklyMask, HOURS_PER_WEEK};

    fn profile(ty: PersonalityType) -> UserProfile {
        UserProfile::new(UserId::new()).with_type(ty)
    }

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn bare_profiles_score_neutral_terms() {
        let a = profile(PersonalityType::ILE);
        let b = profile(PersonalityType::SEI);
        let score = PairScorer::new().at(fixed_instant()).score(&a, &b);
        // preference 0.5, availability 0.0, timezone 0.5, age 0.5
        let expected = 0.5 * 0.5 + 0.3 * 0.0 + 0.1 * 0.5 + 0.1 * 0.5;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn mutual_likes_raise_the_score() {
        let mut a = profile(PersonalityType::ILE);
        let mut b = profile(PersonalityType::SEI);
        let baseline = PairScorer::new().at(fixed_instant()).score(&a, &b);

        a = a.with_preference(b.id, 2);
        b = b.with_preference(a.id, 2);
        let liked = PairScorer::new().at(fixed_instant()).score(&a, &b);
        assert!(liked > baseline);
        // preference term maxes at 1.0
        assert!((liked - baseline - 0.5 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn symmetric_when_preferences_match() {
        let full_week = WeeklyMask::from_bits((0..HOURS_PER_WEEK).map(|h| h % 3 == 0));
        let mut a = profile(PersonalityType::LII)
            .with_age(30)
            .with_timezone("Europe/Berlin")
            .with_availability(full_week);
        let mut b = profile(PersonalityType::ESE)
            .with_age(25)
            .with_timezone("Europe/Moscow")
            .with_availability(full_week);
        a = a.with_preference(b.id, 1);
        b = b.with_preference(a.id, 1);

        let scorer = PairScorer::new().at(fixed_instant());
        assert_eq!(scorer.score(&a, &b), scorer.score(&b, &a));
    }

    #[test]
    fn unknown_timezone_is_neutral_unresolvable_is_zero() {
        let scorer = PairScorer::new().at(fixed_instant());
        assert_eq!(scorer.timezone_term(None, Some("Europe/Berlin")), 0.5);
        assert_eq!(scorer.timezone_term(None, None), 0.5);
        assert_eq!(scorer.timezone_term(Some("Atlantis/Lost"), Some("Europe/Berlin")), 0.0);
    }

    #[test]
    fn timezone_distance_scales_linearly() {
        let scorer = PairScorer::new().at(fixed_instant());
        let same = scorer.timezone_term(Some("Europe/Berlin"), Some("Europe/Berlin"));
        assert!((same - 1.0).abs() < 1e-9);

        // Berlin is UTC+1 in January, Tokyo UTC+9: 8 hours apart
        let far = scorer.timezone_term(Some("Europe/Berlin"), Some("Asia/Tokyo"));
        assert!((far - (1.0 - 8.0 / 12.0)).abs() < 1e-9);
    }

    #[test]
    fn age_term_falloff() {
        assert_eq!(age_term(Some(30), Some(30)), 1.0);
        assert!((age_term(Some(30), Some(40)) - 0.5).abs() < 1e-9);
        assert_eq!(age_term(Some(30), Some(55)), 0.0);
        assert_eq!(age_term(None, Some(30)), 0.5);
    }

    proptest! {
        #[test]
        fn score_is_always_bounded(
            pref_ab in -2i8..=2,
            pref_ba in -2i8..=2,
            age_a in proptest::option::of(0u32..120),
            age_b in proptest::option::of(0u32..120),
            bits in proptest::collection::vec(any::<bool>(), HOURS_PER_WEEK),
        ) {
            let mut a = profile(PersonalityType::ILE)
                .with_availability(WeeklyMask::from_bits(bits.iter().copied()));
            let mut b = profile(PersonalityType::SEI);
            if let Some(age) = age_a { a = a.with_age(age); }
            if let Some(age) = age_b { b = b.with_age(age); }
            a = a.with_preference(b.id, pref_ab);
            b = b.with_preference(a.id, pref_ba);

            let score = PairScorer::new().at(fixed_instant()).score(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
