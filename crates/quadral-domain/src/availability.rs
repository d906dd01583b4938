//! Weekly availability masks
//!
//! One bit per hour of a 7-day week (168 bits), packed MSB-first into 21
//! bytes. Stored masks arrive in several interchangeable encodings;
//! decoding is lenient and never fails — unparseable input degrades to an
//! all-zero mask.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Hours in one calendar week — the mask length in bits
pub const HOURS_PER_WEEK: usize = 7 * 24;

const MASK_BYTES: usize = HOURS_PER_WEEK / 8;

/// 168-bit weekly availability mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklyMask([u8; MASK_BYTES]);

impl WeeklyMask {
    /// All-zero mask (no availability)
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self([0; MASK_BYTES])
    }

    /// Build from hourly bits; missing hours default to unavailable,
    /// extra bits are dropped
    #[must_use]
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut mask = Self::empty();
        for (hour, bit) in bits.into_iter().take(HOURS_PER_WEEK).enumerate() {
            mask.set(hour, bit);
        }
        mask
    }

    /// Build from packed bytes, MSB-first, padded or truncated to 168 bits
    #[must_use]
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut buf = [0u8; MASK_BYTES];
        let take = raw.len().min(MASK_BYTES);
        buf[..take].copy_from_slice(&raw[..take]);
        Self(buf)
    }

    /// Decode a stored mask, trying each encoding in a fixed order:
    /// exact-length binary string, base64, hex, comma-separated booleans,
    /// then a loose binary filter. Anything else decodes to all-zero.
    ///
    /// The attempt order is behaviorally observable (a string may be valid
    /// under more than one encoding) and must not change.
    #[must_use]
    pub fn decode(input: &str) -> Self {
        let text = input.trim();
        if text.is_empty() {
            return Self::empty();
        }

        if text.len() == HOURS_PER_WEEK && text.bytes().all(|b| b == b'0' || b == b'1') {
            return Self::from_bits(text.bytes().map(|b| b == b'1'));
        }

        if let Ok(raw) = base64::engine::general_purpose::STANDARD.decode(text) {
            if !raw.is_empty() {
                return Self::from_bytes(&raw);
            }
        }

        if let Ok(raw) = hex::decode(text) {
            if !raw.is_empty() {
                return Self::from_bytes(&raw);
            }
        }

        if text.contains(',') {
            return Self::from_bits(
                text.split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(|token| matches!(token, "1" | "true" | "True")),
            );
        }

        if text.bytes().all(|b| matches!(b, b'0' | b'1' | b' ')) {
            return Self::from_bits(text.bytes().filter(|b| *b != b' ').map(|b| b == b'1'));
        }

        Self::empty()
    }

    /// Decode an optional stored mask; absent means all-zero
    #[inline]
    #[must_use]
    pub fn decode_opt(input: Option<&str>) -> Self {
        input.map(Self::decode).unwrap_or_else(Self::empty)
    }

    /// Whether the hour slot (0..168) is available
    #[inline]
    #[must_use]
    pub fn get(&self, hour: usize) -> bool {
        debug_assert!(hour < HOURS_PER_WEEK);
        self.0[hour / 8] >> (7 - hour % 8) & 1 == 1
    }

    /// Set one hour slot (0..168)
    #[inline]
    pub fn set(&mut self, hour: usize, available: bool) {
        debug_assert!(hour < HOURS_PER_WEEK);
        let bit = 1 << (7 - hour % 8);
        if available {
            self.0[hour / 8] |= bit;
        } else {
            self.0[hour / 8] &= !bit;
        }
    }

    /// Number of available hours
    #[inline]
    #[must_use]
    pub fn popcount(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    /// Whether no hours are available
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.popcount() == 0
    }

    /// Normalized overlap with another mask: shared available hours over
    /// the larger of the two availability counts. Two empty masks overlap
    /// by 0.0, not 0/0.
    #[must_use]
    pub fn overlap(&self, other: &WeeklyMask) -> f64 {
        let pop_a = self.popcount();
        let pop_b = other.popcount();
        if pop_a == 0 && pop_b == 0 {
            return 0.0;
        }

        let shared: u32 = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a & b).count_ones())
            .sum();
        f64::from(shared) / f64::from(pop_a.max(pop_b).max(1))
    }

    /// Canonical 168-character `0`/`1` form; `decode` reproduces the mask
    /// exactly from this string
    #[must_use]
    pub fn to_binary_string(&self) -> String {
        (0..HOURS_PER_WEEK)
            .map(|hour| if self.get(hour) { '1' } else { '0' })
            .collect()
    }
}

impl Default for WeeklyMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<bool> for WeeklyMask {
    fn from_iter<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        Self::from_bits(bits)
    }
}
