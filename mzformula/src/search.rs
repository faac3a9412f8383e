//! The constrained composition search at the heart of formula finding.
//!
//! Given a mass window and a per-element count limit, [`FormulaIterator`]
//! produces every composition whose monoisotopic mass falls inside the
//! window. The raw search space is the product of `(limit_i + 1)` over all
//! elements, far too large to walk exhaustively, so the iterator advances a
//! single working count vector like an odometer whose digits are element
//! counts: the lightest element turns fastest, and a digit only turns while
//! the running mass stays at or below the window's upper edge. Because the
//! element table is ordered by descending mass, a carry out of a heavy digit
//! discards an enormous subtree in one step, which is what makes the search
//! tractable.
use thiserror::Error;
use tracing::debug;

use crate::bounds::BoundSet;
use crate::composition::Composition;
use crate::element::ElementTable;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("The target mass {0} is not a finite, non-negative number")]
    InvalidMass(f64),
    #[error("The mass tolerance {0} must be a finite, non-negative number")]
    InvalidTolerance(f64),
    #[error("The bound {count} for element {symbol} is negative")]
    NegativeBound { symbol: String, count: i32 },
    #[error("The bound set names {0:?}, which is not in the element table")]
    UnknownElement(String),
}

/// A mass error tolerance, either relative (parts-per-million) or absolute
/// (Daltons)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tolerance {
    PPM(f64),
    Da(f64),
}

impl Tolerance {
    /// The half-width of the window this tolerance spans around
    /// `target_mass`
    pub fn half_width(&self, target_mass: f64) -> f64 {
        match self {
            Self::PPM(ppm) => target_mass * ppm * 1e-6,
            Self::Da(da) => *da,
        }
    }

    /// The inclusive mass window around `target_mass`, validating both the
    /// target and the tolerance
    pub fn window(&self, target_mass: f64) -> Result<MassWindow, FormulaError> {
        if !target_mass.is_finite() || target_mass < 0.0 {
            return Err(FormulaError::InvalidMass(target_mass));
        }
        let half_width = self.half_width(target_mass);
        if !half_width.is_finite() || half_width < 0.0 {
            let raw = match self {
                Self::PPM(ppm) => *ppm,
                Self::Da(da) => *da,
            };
            return Err(FormulaError::InvalidTolerance(raw));
        }
        Ok(MassWindow {
            low: target_mass - half_width,
            high: target_mass + half_width,
        })
    }
}

/// An inclusive `[low, high]` mass range. A zero-width window is legal and
/// matches only exact masses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassWindow {
    pub low: f64,
    pub high: f64,
}

impl MassWindow {
    pub fn contains(&self, mass: f64) -> bool {
        self.low <= mass && mass <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Check a bound set against the table and flatten it into a count limit
/// vector in table order. Symbols absent from the set are limited to zero.
fn align_bounds(table: &ElementTable, bounds: &BoundSet) -> Result<Vec<i32>, FormulaError> {
    let mut limits = vec![0i32; table.len()];
    for (symbol, count) in bounds.iter() {
        let index = table
            .index_of(symbol)
            .ok_or_else(|| FormulaError::UnknownElement(symbol.to_string()))?;
        if count < 0 {
            return Err(FormulaError::NegativeBound {
                symbol: symbol.to_string(),
                count,
            });
        }
        limits[index] = count;
    }
    Ok(limits)
}

/// A lazy, resumable search over every composition whose mass lies inside a
/// [`MassWindow`], subject to per-element count limits.
///
/// The iterator owns a single working vector that it mutates in place;
/// every yielded [`Composition`] is an independent copy. Results appear in
/// ascending lexicographic order of the count vector (lightest element
/// varying fastest), each exactly once. Dropping the iterator abandons the
/// search with nothing to clean up.
#[derive(Debug, Clone)]
pub struct FormulaIterator<'a> {
    table: &'a ElementTable,
    limits: Vec<i32>,
    window: MassWindow,
    counts: Vec<i32>,
    mass: f64,
    primed: bool,
    exhausted: bool,
}

impl<'a> FormulaIterator<'a> {
    /// Validate `bounds` against `table` and set up a search over `window`.
    /// All input checking happens here; once constructed, the search cannot
    /// fail, only finish.
    pub fn new(
        table: &'a ElementTable,
        bounds: &BoundSet,
        window: MassWindow,
    ) -> Result<Self, FormulaError> {
        let limits = align_bounds(table, bounds)?;
        debug!(
            "Searching [{:.6}, {:.6}] over {} elements, {:e} raw combinations",
            window.low,
            window.high,
            table.len(),
            limits.iter().map(|l| (*l + 1) as f64).product::<f64>(),
        );
        Ok(Self {
            table,
            limits,
            window,
            counts: vec![0; table.len()],
            mass: 0.0,
            primed: false,
            exhausted: false,
        })
    }

    /// The window this search covers
    pub fn window(&self) -> MassWindow {
        self.window
    }

    /// Step the working vector to the next count combination whose mass does
    /// not exceed the window's upper edge. Returns `false` when the carry
    /// walks off the heaviest element and the search space is spent.
    fn advance(&mut self) -> bool {
        for position in (0..self.counts.len()).rev() {
            if self.counts[position] < self.limits[position] {
                self.counts[position] += 1;
                // Recomputing the full sum keeps the pruning test and the
                // emitted masses bitwise identical to `Composition::mass`.
                let mass = self.table.mass_of_counts(&self.counts);
                if mass <= self.window.high {
                    self.mass = mass;
                    return true;
                }
                // Mass grows monotonically with any count, so no higher
                // count at this position can fit either: retract and carry.
                self.counts[position] -= 1;
            }
            self.counts[position] = 0;
        }
        false
    }
}

impl Iterator for FormulaIterator<'_> {
    type Item = Composition;

    fn next(&mut self) -> Option<Composition> {
        while !self.exhausted {
            if !self.primed {
                // the all-zero vector is a legitimate candidate for a
                // window touching zero
                self.primed = true;
            } else if !self.advance() {
                self.exhausted = true;
                break;
            }
            if self.window.contains(self.mass) {
                return Some(Composition::new(self.counts.clone()));
            }
        }
        None
    }
}

impl std::iter::FusedIterator for FormulaIterator<'_> {}

/// Enumerate every composition within `ppm` parts-per-million of
/// `target_mass`, subject to `bounds`.
///
/// Validation is synchronous: a non-finite or negative target, a negative
/// tolerance, or a malformed bound set is rejected here, before any search
/// state exists. The returned iterator itself never fails; a window nothing
/// satisfies simply yields an empty sequence.
pub fn enumerate_formulas<'a>(
    target_mass: f64,
    ppm: f64,
    bounds: &BoundSet,
    table: &'a ElementTable,
) -> Result<FormulaIterator<'a>, FormulaError> {
    let window = Tolerance::PPM(ppm).window(target_mass)?;
    FormulaIterator::new(table, bounds, window)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::isclose;

    fn cho_bounds() -> BoundSet {
        [("C", 10), ("H", 20), ("O", 10)].into_iter().collect()
    }

    #[test]
    fn test_glucose_scenario() {
        let table = ElementTable::natural();
        let bounds: BoundSet = [("C", 10), ("H", 20), ("O", 10), ("N", 0)]
            .into_iter()
            .collect();
        let results: Vec<_> = enumerate_formulas(180.0634, 5.0, &bounds, &table)
            .unwrap()
            .collect();

        let glucose = Composition::parse("C6H12O6", &table).unwrap();
        assert!(
            results.contains(&glucose),
            "expected C6H12O6 among {results:?}"
        );
        for composition in results.iter() {
            assert!(
                (composition.mass(&table) - 180.0634).abs() <= 0.0009003,
                "{} deviates by more than 5 ppm",
                composition.hill_notation(&table)
            );
        }
    }

    #[test]
    fn test_results_respect_bounds() {
        let table = ElementTable::natural();
        let bounds = cho_bounds();
        for composition in enumerate_formulas(180.0634, 20.0, &bounds, &table).unwrap() {
            for (element, count) in table.iter().zip(composition.iter()) {
                assert!(*count >= 0);
                assert!(*count <= bounds.get(element.symbol).unwrap_or(0));
            }
        }
    }

    #[test]
    fn test_zero_ppm_matches_exactly() {
        let table = ElementTable::natural();
        let glucose = Composition::parse("C6H12O6", &table).unwrap();
        let target = glucose.mass(&table);
        let results: Vec<_> = enumerate_formulas(target, 0.0, &cho_bounds(), &table)
            .unwrap()
            .collect();
        assert!(results.contains(&glucose));
        for composition in results {
            assert_eq!(composition.mass(&table), target);
        }
    }

    #[test]
    fn test_no_match_is_empty_not_an_error() {
        let table = ElementTable::natural();
        // nothing made of C/H/O sits within 5 ppm of 180.9999
        let mut iter = enumerate_formulas(180.9999, 5.0, &cho_bounds(), &table).unwrap();
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_disallowed_element_gives_empty_sequence() {
        let table = ElementTable::natural();
        let bounds: BoundSet = [("C", 0), ("H", 5)].into_iter().collect();
        // 180 Da requires carbon under these bounds, and carbon is shut off
        let results: Vec<_> = enumerate_formulas(180.0634, 5.0, &bounds, &table)
            .unwrap()
            .collect();
        assert!(results.is_empty());
    }

    #[test]
    fn test_emission_order_is_lexicographic() {
        let table = ElementTable::natural();
        let bounds = cho_bounds();
        let results: Vec<_> = enumerate_formulas(100.05, 5000.0, &bounds, &table)
            .unwrap()
            .collect();
        assert!(results.len() > 1, "want several hits to compare ordering");
        for pair in results.windows(2) {
            assert!(
                pair[0].counts() < pair[1].counts(),
                "{:?} should precede {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_idempotence() {
        let table = ElementTable::natural();
        let bounds = cho_bounds();
        let first: Vec<_> = enumerate_formulas(180.0634, 50.0, &bounds, &table)
            .unwrap()
            .collect();
        let second: Vec<_> = enumerate_formulas(180.0634, 50.0, &bounds, &table)
            .unwrap()
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bound_storage_order_is_irrelevant() {
        let table = ElementTable::natural();
        let forward: BoundSet = [("C", 10), ("H", 20), ("O", 10)].into_iter().collect();
        let backward: BoundSet = [("O", 10), ("H", 20), ("C", 10)].into_iter().collect();
        let a: Vec<_> = enumerate_formulas(180.0634, 50.0, &forward, &table)
            .unwrap()
            .collect();
        let b: Vec<_> = enumerate_formulas(180.0634, 50.0, &backward, &table)
            .unwrap()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_inputs_rejected_before_searching() {
        let table = ElementTable::natural();
        let bounds = cho_bounds();
        assert_eq!(
            enumerate_formulas(-1.0, 5.0, &bounds, &table).err(),
            Some(FormulaError::InvalidMass(-1.0))
        );
        assert!(matches!(
            enumerate_formulas(f64::NAN, 5.0, &bounds, &table).err(),
            Some(FormulaError::InvalidMass(_))
        ));
        assert!(matches!(
            enumerate_formulas(f64::INFINITY, 5.0, &bounds, &table).err(),
            Some(FormulaError::InvalidMass(_))
        ));
        assert_eq!(
            enumerate_formulas(180.0, -5.0, &bounds, &table).err(),
            Some(FormulaError::InvalidTolerance(-5.0))
        );

        let negative: BoundSet = [("C", -3)].into_iter().collect();
        assert_eq!(
            enumerate_formulas(180.0, 5.0, &negative, &table).err(),
            Some(FormulaError::NegativeBound {
                symbol: "C".into(),
                count: -3
            })
        );

        let unknown: BoundSet = [("Xq", 4)].into_iter().collect();
        assert_eq!(
            enumerate_formulas(180.0, 5.0, &unknown, &table).err(),
            Some(FormulaError::UnknownElement("Xq".into()))
        );
    }

    #[test]
    fn test_early_termination_is_just_dropping() {
        let table = ElementTable::natural();
        let bounds = cho_bounds();
        let mut iter = enumerate_formulas(100.05, 5000.0, &bounds, &table).unwrap();
        let first = iter.next().unwrap();
        assert!(isclose(
            first.mass(&table),
            100.05,
            100.05 * 5000.0 * 1e-6 + 1e-9
        ));
        drop(iter);
    }

    #[test]
    fn test_tolerance_windows() {
        let window = Tolerance::PPM(5.0).window(180.0634).unwrap();
        assert!(isclose(window.width(), 2.0 * 180.0634 * 5.0 * 1e-6, 1e-12));
        assert!(window.contains(180.0634));

        let window = Tolerance::Da(0.005).window(180.0634).unwrap();
        assert!(isclose(window.width(), 0.01, 1e-12));

        let point = Tolerance::PPM(0.0).window(180.0634).unwrap();
        assert_eq!(point.width(), 0.0);
        assert!(point.contains(180.0634));
        assert!(!point.contains(180.06340001));
    }
}
