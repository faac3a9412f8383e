//! Elemental composition vectors and their rendering
use std::fmt::Write;

use thiserror::Error;

use crate::element::ElementTable;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaParseError {
    #[error("Unknown element symbol {0:?}")]
    UnknownElement(String),
    #[error("Invalid atom count {0:?}")]
    InvalidCount(String),
    #[error("Unexpected character {0:?} in formula")]
    UnexpectedCharacter(char),
}

/// A vector of non-negative atom counts parallel to an [`ElementTable`],
/// index `i` holding the count of element `i`.
///
/// A `Composition` owns its counts outright. The enumerator copies its
/// working vector into each result it yields, so consumers never alias
/// search state.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Composition(Vec<i32>);

impl Composition {
    pub fn new(counts: Vec<i32>) -> Self {
        Self(counts)
    }

    /// An all-zero composition over `n` elements
    pub fn zeros(n: usize) -> Self {
        Self(vec![0; n])
    }

    /// Parse a symbol-concatenated formula string like `"C6H12O6"` against
    /// `table`, producing a count vector in the table's order. A symbol
    /// without a trailing count means one atom. Repeated symbols accumulate.
    pub fn parse(formula: &str, table: &ElementTable) -> Result<Self, FormulaParseError> {
        let mut counts = vec![0i32; table.len()];
        let mut chars = formula.chars().peekable();
        while let Some(c) = chars.next() {
            if !c.is_ascii_uppercase() {
                return Err(FormulaParseError::UnexpectedCharacter(c));
            }
            let mut symbol = String::from(c);
            while let Some(lc) = chars.peek().copied().filter(|c| c.is_ascii_lowercase()) {
                symbol.push(lc);
                chars.next();
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(|c| c.is_ascii_digit()) {
                digits.push(d);
                chars.next();
            }
            let count: i32 = if digits.is_empty() {
                1
            } else {
                digits
                    .parse()
                    .map_err(|_| FormulaParseError::InvalidCount(digits.clone()))?
            };
            let index = table
                .index_of(&symbol)
                .ok_or(FormulaParseError::UnknownElement(symbol))?;
            counts[index] += count;
        }
        Ok(Self(counts))
    }

    pub fn counts(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> i32 {
        self.0.get(index).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, i32> {
        self.0.iter()
    }

    pub fn total_atoms(&self) -> i32 {
        self.0.iter().sum()
    }

    /// The exact monoisotopic mass of this composition under `table`
    pub fn mass(&self, table: &ElementTable) -> f64 {
        table.mass_of_counts(&self.0)
    }

    /// Render the formula with symbols in table (descending mass) order,
    /// omitting zero-count elements, e.g. `"O6C6H12"`
    pub fn format(&self, table: &ElementTable) -> String {
        let mut out = String::new();
        for (element, count) in table.iter().zip(self.0.iter()) {
            if *count != 0 {
                write!(out, "{}{}", element.symbol, count).unwrap();
            }
        }
        out
    }

    /// Render the formula in conventional Hill order: carbon first, hydrogen
    /// second, every other element alphabetically, and counts of one left
    /// implicit, e.g. `"C6H12O6"`
    pub fn hill_notation(&self, table: &ElementTable) -> String {
        let mut entries: Vec<(&str, i32)> = table
            .iter()
            .zip(self.0.iter())
            .filter(|(_, count)| **count != 0)
            .map(|(element, count)| (element.symbol, *count))
            .collect();
        entries.sort_by_key(|(symbol, _)| match *symbol {
            "C" => (0, ""),
            "H" => (1, ""),
            other => (2, other),
        });
        let mut out = String::new();
        for (symbol, count) in entries {
            if count == 1 {
                out.push_str(symbol);
            } else {
                write!(out, "{}{}", symbol, count).unwrap();
            }
        }
        out
    }
}

impl std::ops::Index<usize> for Composition {
    type Output = i32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<i32>> for Composition {
    fn from(counts: Vec<i32>) -> Self {
        Self(counts)
    }
}

impl FromIterator<i32> for Composition {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::isclose;

    #[test]
    fn test_parse_and_mass() {
        let table = ElementTable::natural();
        let glucose = Composition::parse("C6H12O6", &table).unwrap();
        assert_eq!(glucose.get(table.index_of("C").unwrap()), 6);
        assert_eq!(glucose.get(table.index_of("H").unwrap()), 12);
        assert_eq!(glucose.get(table.index_of("O").unwrap()), 6);
        assert_eq!(glucose.total_atoms(), 24);
        assert!(isclose(glucose.mass(&table), 180.06339, 1e-4));
    }

    #[test]
    fn test_parse_implicit_and_repeated() {
        let table = ElementTable::natural();
        let chloroform = Composition::parse("CHCl3", &table).unwrap();
        assert_eq!(chloroform.get(table.index_of("C").unwrap()), 1);
        assert_eq!(chloroform.get(table.index_of("H").unwrap()), 1);
        assert_eq!(chloroform.get(table.index_of("Cl").unwrap()), 3);

        let doubled = Composition::parse("CH3CH3", &table).unwrap();
        assert_eq!(doubled, Composition::parse("C2H6", &table).unwrap());
    }

    #[test]
    fn test_parse_errors() {
        let table = ElementTable::natural();
        assert!(matches!(
            Composition::parse("C6Xq2", &table),
            Err(FormulaParseError::UnknownElement(_))
        ));
        assert!(matches!(
            Composition::parse("c6", &table),
            Err(FormulaParseError::UnexpectedCharacter('c'))
        ));
    }

    #[test]
    fn test_format() {
        let table = ElementTable::natural();
        let glucose = Composition::parse("C6H12O6", &table).unwrap();
        assert_eq!(glucose.format(&table), "O6C6H12");
        assert_eq!(glucose.hill_notation(&table), "C6H12O6");

        let chloroform = Composition::parse("CHCl3", &table).unwrap();
        assert_eq!(chloroform.format(&table), "Cl3C1H1");
        assert_eq!(chloroform.hill_notation(&table), "CHCl3");

        assert_eq!(Composition::zeros(table.len()).format(&table), "");
    }

    #[test]
    fn test_equality_is_elementwise() {
        let table = ElementTable::natural();
        let a = Composition::parse("C2H6O", &table).unwrap();
        let b = Composition::parse("C2H6O", &table).unwrap();
        let c = Composition::parse("C2H5O", &table).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
