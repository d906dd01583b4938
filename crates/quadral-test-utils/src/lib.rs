//! Test fixtures for the quadral workspace
//!
//! Profile factories, quadra pool seeding, and mask helpers shared by
//! unit and integration tests.

#![allow(missing_docs)]

use quadral_domain::{PersonalityType, Quadra, UserId, UserProfile, WeeklyMask};

/// A fresh profile with the given socionics type and neutral defaults
pub fn user_of(ty: PersonalityType) -> UserProfile {
    UserProfile::new(UserId::new()).with_type(ty)
}

/// One fresh user per type in the quadra, in member-table order
pub fn quadra_pool(quadra: Quadra) -> Vec<UserProfile> {
    quadra.members().into_iter().map(user_of).collect()
}

/// A mask with exactly the given hour slots available
pub fn mask_of_hours(hours: &[usize]) -> WeeklyMask {
    let mut mask = WeeklyMask::empty();
    for &hour in hours {
        mask.set(hour, true);
    }
    mask
}

/// Record the same directed preference weight in both directions
pub fn set_mutual_preference(a: &mut UserProfile, b: &mut UserProfile, weight: i8) {
    a.preferences.insert(b.id, weight);
    b.preferences.insert(a.id, weight);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_covers_the_quadra() {
        let pool = quadra_pool(Quadra::Beta);
        assert_eq!(pool.len(), 4);
        for (user, ty) in pool.iter().zip(Quadra::Beta.members()) {
            assert_eq!(user.socionics_type, Some(ty));
        }
    }

    #[test]
    fn mask_helper_sets_exact_hours() {
        let mask = mask_of_hours(&[0, 100, 167]);
        assert_eq!(mask.popcount(), 3);
        assert!(mask.get(100));
    }

    #[test]
    fn mutual_preference_is_symmetric() {
        let mut a = user_of(PersonalityType::ILE);
        let mut b = user_of(PersonalityType::SEI);
        set_mutual_preference(&mut a, &mut b, 2);
        assert_eq!(a.preference_toward(b.id), 2);
        assert_eq!(b.preference_toward(a.id), 2);
    }
}
