//! Error taxonomy for the matching engine
//!
//! Every failure the engine can report. All variants are locally
//! recoverable: the caller translates them into its own transport
//! representation (HTTP status, bot reply, and so on) via [`MatchError::kind`].

use quadral_domain::{ClusterId, Intent, PersonalityType, Quadra, UserId};

/// Matching engine failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// Referenced user does not exist
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Referenced cluster does not exist
    #[error("cluster {0} not found")]
    ClusterNotFound(ClusterId),

    /// The user's personality type is not a member of the target quadra
    #[error("user {user} does not belong to quadra {quadra}")]
    ForeignQuadra {
        /// The user whose type was checked
        user: UserId,
        /// The quadra the user is foreign to
        quadra: Quadra,
    },

    /// The cluster was assembled for a different intent
    #[error("cluster intent is {actual}, requested {requested}")]
    IntentMismatch {
        /// Intent the caller asked for
        requested: Intent,
        /// Intent the cluster actually has
        actual: Intent,
    },

    /// The cluster is archived and rejects all joins
    #[error("cluster {0} is archived")]
    Archived(ClusterId),

    /// Family-cluster uniqueness or capacity violated
    #[error("slot taken in cluster {0}")]
    SlotTaken(ClusterId),

    /// Assembly found no candidates for one or more required types;
    /// nothing was created
    #[error("no candidates for required types: {}", format_types(.0))]
    MissingTypes(Vec<PersonalityType>),
}

impl MatchError {
    /// Coarse classification for transport mapping
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MatchErrorKind {
        match self {
            Self::UserNotFound(_) | Self::ClusterNotFound(_) => MatchErrorKind::NotFound,
            Self::ForeignQuadra { .. } => MatchErrorKind::ForeignQuadra,
            Self::IntentMismatch { .. } => MatchErrorKind::IntentMismatch,
            Self::Archived(_) => MatchErrorKind::Archived,
            Self::SlotTaken(_) => MatchErrorKind::SlotTaken,
            Self::MissingTypes(_) => MatchErrorKind::MissingTypes,
        }
    }
}

/// Error kinds, one per reason in the engine's contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchErrorKind {
    /// User or cluster absent
    NotFound,
    /// Type outside the target quadra
    ForeignQuadra,
    /// Cluster assembled for a different intent
    IntentMismatch,
    /// Terminal cluster state
    Archived,
    /// Family uniqueness/capacity violation
    SlotTaken,
    /// Unfillable required types (soft failure)
    MissingTypes,
}

fn format_types(types: &[PersonalityType]) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        let user = UserId::new();
        let cluster = ClusterId::new();
        assert_eq!(MatchError::UserNotFound(user).kind(), MatchErrorKind::NotFound);
        assert_eq!(MatchError::ClusterNotFound(cluster).kind(), MatchErrorKind::NotFound);
        assert_eq!(
            MatchError::ForeignQuadra { user, quadra: Quadra::Alpha }.kind(),
            MatchErrorKind::ForeignQuadra
        );
        assert_eq!(
            MatchError::IntentMismatch { requested: Intent::Work, actual: Intent::Family }.kind(),
            MatchErrorKind::IntentMismatch
        );
        assert_eq!(MatchError::Archived(cluster).kind(), MatchErrorKind::Archived);
        assert_eq!(MatchError::SlotTaken(cluster).kind(), MatchErrorKind::SlotTaken);
        assert_eq!(
            MatchError::MissingTypes(vec![PersonalityType::ILE]).kind(),
            MatchErrorKind::MissingTypes
        );
    }

    #[test]
    fn missing_types_lists_the_types() {
        let err = MatchError::MissingTypes(vec![PersonalityType::SEI, PersonalityType::LII]);
        assert!(err.to_string().contains("SEI, LII"));
    }
}
