//! Bucketing totals into qualitative zones.

use serde::{Deserialize, Serialize};

/// Ordered bands over the integers.
///
/// Each band covers `[lower, next.lower)`; the first band is unbounded
/// below and the last unbounded above, so every integer lands in exactly
/// one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneScale<Z> {
    lowest: Z,
    bands: Vec<(i64, Z)>,
}

impl<Z> ZoneScale<Z> {
    /// `lowest` covers everything below the first threshold. Thresholds are
    /// sorted ascending; for duplicate bounds the first one given wins.
    pub fn new(lowest: Z, thresholds: impl IntoIterator<Item = (i64, Z)>) -> Self {
        let mut bands: Vec<(i64, Z)> = thresholds.into_iter().collect();
        bands.sort_by_key(|(lower, _)| *lower);
        bands.dedup_by_key(|(lower, _)| *lower);
        Self { lowest, bands }
    }

    /// The zone containing `value`.
    pub fn bucket(&self, value: i64) -> &Z {
        self.bands
            .iter()
            .take_while(|(lower, _)| *lower <= value)
            .last()
            .map(|(_, zone)| zone)
            .unwrap_or(&self.lowest)
    }

    pub fn len(&self) -> usize {
        self.bands.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// ELS outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadZone {
    Low,
    Moderate,
    High,
}

impl LoadZone {
    /// `≤5` low, `≤12` moderate, `>12` high.
    pub fn scale() -> ZoneScale<LoadZone> {
        ZoneScale::new(LoadZone::Low, [(6, LoadZone::Moderate), (13, LoadZone::High)])
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Low => "Your emotional load looks light right now.",
            Self::Moderate => "You're carrying a moderate emotional load. Small resets help.",
            Self::High => "You're carrying a lot. Consider reaching out to someone you trust.",
        }
    }
}

impl std::fmt::Display for LoadZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Colour band for the load meter, driven by a 0–100 percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadColor {
    Green,
    Yellow,
    Orange,
    Red,
    RedPlus,
}

impl LoadColor {
    pub fn scale() -> ZoneScale<LoadColor> {
        ZoneScale::new(
            LoadColor::Green,
            [
                (20, LoadColor::Yellow),
                (40, LoadColor::Orange),
                (60, LoadColor::Red),
                (80, LoadColor::RedPlus),
            ],
        )
    }
}

impl std::fmt::Display for LoadColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Red => "Red",
            Self::RedPlus => "Red+",
        };
        write!(f, "{s}")
    }
}

/// Position of `total` within `[min, max]` as a whole percentage, clamped
/// to 0–100. A degenerate range yields 0.
pub fn percent_of_range(total: i64, min: i64, max: i64) -> u8 {
    if max <= min {
        return 0;
    }
    let offset = i128::from(total) - i128::from(min);
    let span = i128::from(max) - i128::from(min);
    (offset * 100 / span).clamp(0, 100) as u8
}
