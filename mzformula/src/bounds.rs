//! Mass-tiered per-element count limits that keep the search space finite
use std::collections::HashMap;

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("The bound tier table is empty")]
    EmptyTierTable,
    #[error("The tier threshold {0} is not a finite, positive mass")]
    InvalidThreshold(f64),
    #[error("Tier thresholds must be strictly ascending, but {0} precedes {1}")]
    UnorderedThresholds(f64, f64),
}

/// A mapping from element symbol to the maximum number of atoms of that
/// element a candidate composition may contain.
///
/// Storage order carries no meaning; the search aligns the entries to its
/// [`crate::element::ElementTable`] order before any work begins. Symbols
/// absent from the set behave as if bounded at zero.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundSet(HashMap<String, i32>);

impl BoundSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, symbol: impl Into<String>, max_count: i32) {
        self.0.insert(symbol.into(), max_count);
    }

    pub fn get(&self, symbol: &str) -> Option<i32> {
        self.0.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(symbol, count)| (symbol.as_str(), *count))
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for BoundSet {
    fn from_iter<T: IntoIterator<Item = (S, i32)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(symbol, count)| (symbol.into(), count))
                .collect(),
        )
    }
}

/// A [`BoundSet`] valid for all target masses up to `max_mass`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundTier {
    pub max_mass: f64,
    pub bounds: BoundSet,
}

impl BoundTier {
    pub fn new(max_mass: f64, bounds: BoundSet) -> Self {
        Self { max_mass, bounds }
    }
}

/// An ascending sequence of [`BoundTier`]s mapping a target mass to the
/// bound set governing its search. Larger molecules tolerate more atoms, so
/// tiers grow with mass; a target beyond the last threshold falls back to
/// the largest tier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundTierTable {
    tiers: Vec<BoundTier>,
}

impl BoundTierTable {
    /// Validate and adopt a tier list. The list must be non-empty with
    /// finite, positive, strictly ascending thresholds.
    pub fn new(tiers: Vec<BoundTier>) -> Result<Self, ConfigurationError> {
        if tiers.is_empty() {
            return Err(ConfigurationError::EmptyTierTable);
        }
        for tier in tiers.iter() {
            if !tier.max_mass.is_finite() || tier.max_mass <= 0.0 {
                return Err(ConfigurationError::InvalidThreshold(tier.max_mass));
            }
        }
        if let Some((a, b)) = tiers
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.max_mass >= b.max_mass)
        {
            return Err(ConfigurationError::UnorderedThresholds(
                a.max_mass, b.max_mass,
            ));
        }
        Ok(Self { tiers })
    }

    /// Count limits adapted from the "Seven Golden Rules" element count
    /// ranges, tiered at 200, 500 and 1000 Da
    pub fn builtin() -> Self {
        let tiers = vec![
            BoundTier::new(
                200.0,
                [
                    ("C", 15),
                    ("H", 30),
                    ("N", 8),
                    ("O", 10),
                    ("F", 6),
                    ("Si", 4),
                    ("P", 4),
                    ("S", 4),
                    ("Cl", 4),
                    ("Br", 2),
                ]
                .into_iter()
                .collect(),
            ),
            BoundTier::new(
                500.0,
                [
                    ("C", 39),
                    ("H", 72),
                    ("N", 20),
                    ("O", 20),
                    ("F", 16),
                    ("Si", 8),
                    ("P", 9),
                    ("S", 10),
                    ("Cl", 10),
                    ("Br", 8),
                ]
                .into_iter()
                .collect(),
            ),
            BoundTier::new(
                1000.0,
                [
                    ("C", 78),
                    ("H", 126),
                    ("N", 25),
                    ("O", 27),
                    ("F", 34),
                    ("Si", 14),
                    ("P", 9),
                    ("S", 14),
                    ("Cl", 12),
                    ("Br", 8),
                ]
                .into_iter()
                .collect(),
            ),
        ];
        Self { tiers }
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundTier> {
        self.tiers.iter()
    }

    /// Select the bound set of the first tier whose threshold is at least
    /// `target_mass`, or the last tier when the target exceeds them all
    pub fn resolve(&self, target_mass: f64) -> Result<&BoundSet, ConfigurationError> {
        let tier = self
            .tiers
            .iter()
            .find(|tier| target_mass <= tier.max_mass)
            .or(self.tiers.last())
            .ok_or(ConfigurationError::EmptyTierTable)?;
        debug!(
            "Resolved target mass {target_mass} to the {} Da bound tier",
            tier.max_mass
        );
        Ok(&tier.bounds)
    }
}

impl Default for BoundTierTable {
    fn default() -> Self {
        Self::builtin()
    }
}
