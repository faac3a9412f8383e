//! Ionization forms for translating between neutral mass and observed m/z
use std::fmt::Display;

use crate::element::{ELECTRON, PROTON};

const HYDROGEN: f64 = 1.0078250321;
const NITROGEN: f64 = 14.0030740048;
const OXYGEN: f64 = 15.9949146196;
const CHLORINE: f64 = 34.96885268;
const SODIUM: f64 = 22.9897692809;
const POTASSIUM: f64 = 38.96370668;

const WATER: f64 = 2.0 * HYDROGEN + OXYGEN;
const AMMONIA: f64 = NITROGEN + 3.0 * HYDROGEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn sign(&self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "pos"),
            Self::Negative => write!(f, "neg"),
        }
    }
}

/// A named ionization form.
///
/// `mass_delta` is the signed mass contribution of everything gained or lost
/// relative to `multiplicity` copies of the neutral molecule, electrons
/// included. Adducts are static configuration data, built once and never
/// mutated; no chemical plausibility checking happens here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adduct {
    /// The display name, e.g. `"[M+H]+"`
    pub name: String,
    pub polarity: Polarity,
    /// How many copies of the neutral molecule the ion carries, 2 for the
    /// `[2M+...]` dimer forms
    pub multiplicity: i32,
    /// The absolute value of the net charge
    pub charge: i32,
    pub mass_delta: f64,
}

impl Adduct {
    pub fn new(
        name: impl Into<String>,
        polarity: Polarity,
        multiplicity: i32,
        charge: i32,
        mass_delta: f64,
    ) -> Self {
        Self {
            name: name.into(),
            polarity,
            multiplicity,
            charge,
            mass_delta,
        }
    }

    /// The m/z at which a molecule of `neutral_mass` is observed under this
    /// ionization form
    pub fn to_mz(&self, neutral_mass: f64) -> f64 {
        (self.multiplicity as f64 * neutral_mass + self.mass_delta) / self.charge as f64
    }

    /// The neutral monoisotopic mass behind an observed `mz`, the exact
    /// inverse of [`Adduct::to_mz`]
    pub fn to_neutral(&self, mz: f64) -> f64 {
        (mz * self.charge as f64 - self.mass_delta) / self.multiplicity as f64
    }
}

impl Display for Adduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The set of ionization forms known to the system, partitioned by polarity
#[derive(Debug, Clone, PartialEq)]
pub struct AdductCatalogue {
    adducts: Vec<Adduct>,
}

/// Fold typographic en dashes and minus signs into ASCII hyphens so
/// user-typed names match the catalogue's display names
fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2212}' => '-',
            c => c,
        })
        .collect()
}

impl AdductCatalogue {
    pub fn new(adducts: Vec<Adduct>) -> Self {
        Self { adducts }
    }

    /// The standard electrospray adduct catalogue: protonation, sodiation,
    /// potassiation, chloride attachment, dimers, and ammonia/water losses
    pub fn builtin() -> Self {
        use Polarity::{Negative, Positive};
        let adducts = vec![
            Adduct::new("[M+H]+", Positive, 1, 1, PROTON),
            Adduct::new("[M+2H]2+", Positive, 1, 2, 2.0 * PROTON),
            Adduct::new("[M+H+Na]2+", Positive, 1, 2, PROTON + SODIUM - ELECTRON),
            Adduct::new("[M+H+K]2+", Positive, 1, 2, PROTON + POTASSIUM - ELECTRON),
            Adduct::new("[M+Na]+", Positive, 1, 1, SODIUM - ELECTRON),
            Adduct::new("[M+K]+", Positive, 1, 1, POTASSIUM - ELECTRON),
            Adduct::new("[M+2Na-H]+", Positive, 1, 1, 2.0 * SODIUM - HYDROGEN - ELECTRON),
            Adduct::new("[M+2K-H]+", Positive, 1, 1, 2.0 * POTASSIUM - HYDROGEN - ELECTRON),
            Adduct::new("[2M+H]+", Positive, 2, 1, PROTON),
            Adduct::new("[2M+2H]2+", Positive, 2, 2, 2.0 * PROTON),
            Adduct::new("[2M+H+Na]2+", Positive, 2, 2, PROTON + SODIUM - ELECTRON),
            Adduct::new("[2M+H+K]2+", Positive, 2, 2, PROTON + POTASSIUM - ELECTRON),
            Adduct::new("[2M+Na]+", Positive, 2, 1, SODIUM - ELECTRON),
            Adduct::new("[2M+K]+", Positive, 2, 1, POTASSIUM - ELECTRON),
            Adduct::new("[2M+2Na-H]+", Positive, 2, 1, 2.0 * SODIUM - HYDROGEN - ELECTRON),
            Adduct::new("[2M+2K-H]+", Positive, 2, 1, 2.0 * POTASSIUM - HYDROGEN - ELECTRON),
            Adduct::new("[M+H-NH3]+", Positive, 1, 1, PROTON - AMMONIA),
            Adduct::new("[M+2H-NH3]2+", Positive, 1, 2, 2.0 * PROTON - AMMONIA),
            Adduct::new("[M+H-H2O]+", Positive, 1, 1, PROTON - WATER),
            Adduct::new("[M+2H-H2O]2+", Positive, 1, 2, 2.0 * PROTON - WATER),
            Adduct::new("[M-H]-", Negative, 1, 1, -PROTON),
            Adduct::new("[M-2H]2-", Negative, 1, 2, -2.0 * PROTON),
            Adduct::new("[M-2H+Na]-", Negative, 1, 1, SODIUM - 2.0 * HYDROGEN + ELECTRON),
            Adduct::new("[M-H+Cl]2-", Negative, 1, 2, CHLORINE - HYDROGEN + 2.0 * ELECTRON),
            Adduct::new("[M-2H+K]-", Negative, 1, 1, POTASSIUM - 2.0 * HYDROGEN + ELECTRON),
            Adduct::new("[M+Cl]-", Negative, 1, 1, CHLORINE + ELECTRON),
            Adduct::new("[2M-H]-", Negative, 2, 1, -PROTON),
            Adduct::new("[2M-2H]2-", Negative, 2, 2, -2.0 * PROTON),
            Adduct::new("[2M-2H+Na]-", Negative, 2, 1, SODIUM - 2.0 * HYDROGEN + ELECTRON),
            Adduct::new("[2M-H+Cl]2-", Negative, 2, 2, CHLORINE - HYDROGEN + 2.0 * ELECTRON),
            Adduct::new("[2M-2H+K]-", Negative, 2, 1, POTASSIUM - 2.0 * HYDROGEN + ELECTRON),
            Adduct::new("[2M+Cl]-", Negative, 2, 1, CHLORINE + ELECTRON),
            Adduct::new("[M-H-H2O]-", Negative, 1, 1, -PROTON - WATER),
        ];
        Self { adducts }
    }

    pub fn len(&self) -> usize {
        self.adducts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adducts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Adduct> {
        self.adducts.iter()
    }

    /// Find an adduct by display name, tolerating typographic dash variants
    pub fn get(&self, name: &str) -> Option<&Adduct> {
        let name = normalize_name(name);
        self.adducts
            .iter()
            .find(|a| normalize_name(&a.name) == name)
    }

    /// Only the adducts applicable to data acquired in `polarity` mode
    pub fn of_polarity(&self, polarity: Polarity) -> impl Iterator<Item = &Adduct> {
        self.adducts.iter().filter(move |a| a.polarity == polarity)
    }
}

impl Default for AdductCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}
