//! The element catalogue a formula search draws atoms from
use num_traits::Float;

/// Compare two floats for approximate equality within an absolute `delta`
pub fn isclose<T: Float>(a: T, b: T, delta: T) -> bool {
    (a - b).abs() < delta
}

/// The monoisotopic mass of a proton, a hydrogen atom less one electron
pub const PROTON: f64 = 1.0078250321 - ELECTRON;

/// The rest mass of an electron
pub const ELECTRON: f64 = 0.00054857990924;

/// A chemical element with its exact monoisotopic mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// The short unique symbol, e.g. `"C"` or `"Cl"`
    pub symbol: &'static str,
    /// The mass of the element's most abundant isotope
    pub mass: f64,
}

impl Element {
    pub const fn new(symbol: &'static str, mass: f64) -> Self {
        Self { symbol, mass }
    }
}

const NATURAL_ELEMENTS: [Element; 10] = [
    Element::new("Br", 78.9183371),
    Element::new("Cl", 34.96885268),
    Element::new("S", 31.972071),
    Element::new("P", 30.97376163),
    Element::new("Si", 27.9769265325),
    Element::new("F", 18.99840322),
    Element::new("O", 15.9949146196),
    Element::new("N", 14.0030740048),
    Element::new("C", 12.0),
    Element::new("H", 1.0078250321),
];

/// An ordered catalogue of [`Element`] entries, sorted by strictly descending
/// mass.
///
/// The descending order is an invariant, not a presentation choice: the
/// enumerator in [`crate::search`] relies on heavier elements occupying lower
/// indices so that its bound checks cut off large subtrees as early as
/// possible. Compositions, bound sets and rendered formulas are all expressed
/// against this ordering. The table is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTable {
    elements: Vec<Element>,
}

impl ElementTable {
    /// Create a table from an arbitrary collection of elements, sorting them
    /// into the descending-mass order the rest of the crate expects
    pub fn new<I: IntoIterator<Item = Element>>(elements: I) -> Self {
        let mut elements: Vec<_> = elements.into_iter().collect();
        elements.sort_by(|a, b| b.mass.total_cmp(&a.mass));
        Self { elements }
    }

    /// The ten-element organic/halogen catalogue the search was designed
    /// around: Br, Cl, S, P, Si, F, O, N, C, H
    pub fn natural() -> Self {
        Self::new(NATURAL_ELEMENTS)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// The position of `symbol` in the table's descending-mass order
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.symbol == symbol)
    }

    pub fn mass_for(&self, symbol: &str) -> Option<f64> {
        self.index_of(symbol).map(|i| self.elements[i].mass)
    }

    /// Total mass of a raw count slice parallel to the table.
    ///
    /// Summation runs in ascending index order so that repeated calls on
    /// related count vectors are reproducible bit-for-bit.
    pub fn mass_of_counts(&self, counts: &[i32]) -> f64 {
        self.elements
            .iter()
            .zip(counts.iter())
            .map(|(e, c)| e.mass * *c as f64)
            .sum()
    }
}

impl std::ops::Index<usize> for ElementTable {
    type Output = Element;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a ElementTable {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        Self::natural()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_descending_order() {
        let table = ElementTable::natural();
        assert_eq!(table.len(), 10);
        for pair in table.iter().collect::<Vec<_>>().windows(2) {
            assert!(
                pair[0].mass > pair[1].mass,
                "{} ({}) should be heavier than {} ({})",
                pair[0].symbol,
                pair[0].mass,
                pair[1].symbol,
                pair[1].mass
            );
        }
        assert_eq!(table[0].symbol, "Br");
        assert_eq!(table[table.len() - 1].symbol, "H");
    }

    #[test]
    fn test_new_sorts() {
        let table = ElementTable::new([
            Element::new("H", 1.0078250321),
            Element::new("O", 15.9949146196),
            Element::new("C", 12.0),
        ]);
        let symbols: Vec<_> = table.iter().map(|e| e.symbol).collect();
        assert_eq!(symbols, vec!["O", "C", "H"]);
    }

    #[test]
    fn test_lookup() {
        let table = ElementTable::natural();
        assert_eq!(table.index_of("C"), Some(8));
        assert_eq!(table.index_of("Xx"), None);
        assert!(isclose(table.mass_for("O").unwrap(), 15.9949146196, 1e-12));
    }

    #[test]
    fn test_proton() {
        assert!(isclose(PROTON, 1.00727645219, 1e-9));
    }
}
