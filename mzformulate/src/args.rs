use std::fmt::Display;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use mzformula::adduct::Polarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArgPolarity {
    Pos,
    Neg,
}

impl From<ArgPolarity> for Polarity {
    fn from(value: ArgPolarity) -> Polarity {
        match value {
            ArgPolarity::Pos => Polarity::Positive,
            ArgPolarity::Neg => Polarity::Negative,
        }
    }
}

impl Display for ArgPolarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Enumerate the elemental compositions consistent with an observed mass
#[derive(Debug, Parser)]
#[command(name = "mzformulate", version)]
pub struct MZFormulateArgs {
    /// The observed mass to search, a neutral monoisotopic mass unless
    /// `--adduct` says otherwise
    #[arg(required_unless_present = "list_adducts")]
    pub mass: Option<f64>,

    /// Parts-per-million mass error tolerance
    #[arg(short = 't', long, default_value_t = 5.0)]
    pub ppm: f64,

    /// Absolute mass error tolerance in millidaltons, overriding --ppm
    #[arg(long)]
    pub mda: Option<f64>,

    /// Treat the observed mass as an m/z under this ionization form,
    /// e.g. "[M+H]+", and search the implied neutral mass
    #[arg(short, long)]
    pub adduct: Option<String>,

    /// Load the bound tier table from a JSON file instead of using the
    /// built-in tiers
    #[arg(short, long)]
    pub bounds: Option<PathBuf>,

    /// Print the known ionization forms for a polarity and exit
    #[arg(long, value_enum, value_name = "POLARITY")]
    pub list_adducts: Option<ArgPolarity>,
}
