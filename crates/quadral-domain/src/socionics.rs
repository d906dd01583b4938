//! Socionics taxonomy
//!
//! The 16 personality types and their partition into 4 quadras. The
//! mapping is fixed: every type belongs to exactly one quadra and every
//! quadra owns exactly four types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 16 socionics personality types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum PersonalityType {
    /// Intuitive-logical extrovert (alpha)
    ILE,
    /// Sensory-ethical introvert (alpha)
    SEI,
    /// Ethical-sensory extrovert (alpha)
    ESE,
    /// Logical-intuitive introvert (alpha)
    LII,
    /// Sensory-logical extrovert (beta)
    SLE,
    /// Intuitive-ethical introvert (beta)
    IEI,
    /// Ethical-intuitive extrovert (beta)
    EIE,
    /// Logical-sensory introvert (beta)
    LSI,
    /// Sensory-ethical extrovert (gamma)
    SEE,
    /// Ethical-sensory introvert (gamma)
    ESI,
    /// Logical-intuitive extrovert (gamma)
    LIE,
    /// Intuitive-logical introvert (gamma)
    ILI,
    /// Logical-sensory extrovert (delta)
    LSE,
    /// Ethical-intuitive introvert (delta)
    EII,
    /// Intuitive-ethical extrovert (delta)
    IEE,
    /// Sensory-logical introvert (delta)
    SLI,
}

impl PersonalityType {
    /// All 16 types, quadra-major order
    pub const ALL: [PersonalityType; 16] = [
        Self::ILE,
        Self::SEI,
        Self::ESE,
        Self::LII,
        Self::SLE,
        Self::IEI,
        Self::EIE,
        Self::LSI,
        Self::SEE,
        Self::ESI,
        Self::LIE,
        Self::ILI,
        Self::LSE,
        Self::EII,
        Self::IEE,
        Self::SLI,
    ];

    /// The quadra this type belongs to
    #[inline]
    #[must_use]
    pub const fn quadra(self) -> Quadra {
        match self {
            Self::ILE | Self::SEI | Self::ESE | Self::LII => Quadra::Alpha,
            Self::SLE | Self::IEI | Self::EIE | Self::LSI => Quadra::Beta,
            Self::SEE | Self::ESI | Self::LIE | Self::ILI => Quadra::Gamma,
            Self::LSE | Self::EII | Self::IEE | Self::SLI => Quadra::Delta,
        }
    }

    /// Canonical uppercase code
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ILE => "ILE",
            Self::SEI => "SEI",
            Self::ESE => "ESE",
            Self::LII => "LII",
            Self::SLE => "SLE",
            Self::IEI => "IEI",
            Self::EIE => "EIE",
            Self::LSI => "LSI",
            Self::SEE => "SEE",
            Self::ESI => "ESI",
            Self::LIE => "LIE",
            Self::ILI => "ILI",
            Self::LSE => "LSE",
            Self::EII => "EII",
            Self::IEE => "IEE",
            Self::SLI => "SLI",
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonalityType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == code)
            .ok_or_else(|| UnknownTypeError(s.to_string()))
    }
}

/// Unrecognized personality type code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown personality type: {0}")]
pub struct UnknownTypeError(pub String);

/// One of the four quadras
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadra {
    /// ILE, SEI, ESE, LII
    Alpha,
    /// SLE, IEI, EIE, LSI
    Beta,
    /// SEE, ESI, LIE, ILI
    Gamma,
    /// LSE, EII, IEE, SLI
    Delta,
}

impl Quadra {
    /// All four quadras
    pub const ALL: [Quadra; 4] = [Self::Alpha, Self::Beta, Self::Gamma, Self::Delta];

    /// The four personality types owned by this quadra
    #[inline]
    #[must_use]
    pub const fn members(self) -> [PersonalityType; 4] {
        match self {
            Self::Alpha => [
                PersonalityType::ILE,
                PersonalityType::SEI,
                PersonalityType::ESE,
                PersonalityType::LII,
            ],
            Self::Beta => [
                PersonalityType::SLE,
                PersonalityType::IEI,
                PersonalityType::EIE,
                PersonalityType::LSI,
            ],
            Self::Gamma => [
                PersonalityType::SEE,
                PersonalityType::ESI,
                PersonalityType::LIE,
                PersonalityType::ILI,
            ],
            Self::Delta => [
                PersonalityType::LSE,
                PersonalityType::EII,
                PersonalityType::IEE,
                PersonalityType::SLI,
            ],
        }
    }

    /// Number of member types (the family-cluster capacity)
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        4
    }

    /// Whether the type belongs to this quadra
    #[inline]
    #[must_use]
    pub fn contains(self, ty: PersonalityType) -> bool {
        ty.quadra() == self
    }

    /// Canonical lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Gamma => "gamma",
            Self::Delta => "delta",
        }
    }
}

impl fmt::Display for Quadra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quadra {
    type Err = UnknownQuadraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha" => Ok(Self::Alpha),
            "beta" => Ok(Self::Beta),
            "gamma" => Ok(Self::Gamma),
            "delta" => Ok(Self::Delta),
            _ => Err(UnknownQuadraError(s.to_string())),
        }
    }
}

/// Unrecognized quadra name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quadra: {0}")]
pub struct UnknownQuadraError(pub String);

/// Explicit quadra claim rejected: the type belongs elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("type {ty} is not a member of quadra {claimed}")]
pub struct QuadraClaimError {
    /// The claimed quadra
    pub claimed: Quadra,
    /// The type the claim was made for
    pub ty: PersonalityType,
}

/// Validate an explicit quadra claim against a personality type
///
/// A caller supplying both a type and a quadra may only claim the quadra
/// that actually owns the type.
#[inline]
pub fn validate_claim(ty: PersonalityType, claimed: Quadra) -> Result<(), QuadraClaimError> {
    if claimed.contains(ty) {
        Ok(())
    } else {
        Err(QuadraClaimError { claimed, ty })
    }
}
