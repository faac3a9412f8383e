//! Enumerate the elemental compositions whose monoisotopic mass falls
//! within a ppm tolerance of an observed measurement.
//!
//! ```
//! use mzformula::bounds::BoundTierTable;
//! use mzformula::element::ElementTable;
//! use mzformula::search::enumerate_formulas;
//!
//! let table = ElementTable::natural();
//! let tiers = BoundTierTable::builtin();
//! let bounds = tiers.resolve(180.0634)?;
//! for composition in enumerate_formulas(180.0634, 5.0, bounds, &table)? {
//!     println!("{}", composition.hill_notation(&table));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod adduct;
pub mod bounds;
pub mod composition;
pub mod element;
pub mod search;

pub use crate::adduct::{Adduct, AdductCatalogue, Polarity};
pub use crate::bounds::{BoundSet, BoundTier, BoundTierTable, ConfigurationError};
pub use crate::composition::Composition;
pub use crate::element::{Element, ElementTable};
pub use crate::search::{enumerate_formulas, FormulaError, FormulaIterator, MassWindow, Tolerance};
