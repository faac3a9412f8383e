use std::fs;
use std::io;

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mzformula::adduct::AdductCatalogue;
use mzformula::bounds::{BoundTier, BoundTierTable, ConfigurationError};
use mzformula::element::ElementTable;
use mzformula::search::{FormulaError, FormulaIterator, Tolerance};

mod args;

use crate::args::MZFormulateArgs;

#[derive(Debug, Error)]
pub enum MZFormulateError {
    #[error("An IO error occurred: {0}")]
    IOError(
        #[source]
        #[from]
        io::Error,
    ),
    #[error("Failed to parse the bound tier file: {0}")]
    TierParseError(
        #[source]
        #[from]
        serde_json::Error,
    ),
    #[error("{0}")]
    ConfigurationError(
        #[source]
        #[from]
        ConfigurationError,
    ),
    #[error("{0}")]
    SearchError(
        #[source]
        #[from]
        FormulaError,
    ),
    #[error("{0:?} is not a known ionization form")]
    UnknownAdduct(String),
}

fn load_tiers(args: &MZFormulateArgs) -> Result<BoundTierTable, MZFormulateError> {
    match &args.bounds {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let tiers: Vec<BoundTier> = serde_json::from_str(&text)?;
            debug!("Loaded {} bound tiers from {}", tiers.len(), path.display());
            Ok(BoundTierTable::new(tiers)?)
        }
        None => Ok(BoundTierTable::builtin()),
    }
}

fn list_adducts(catalogue: &AdductCatalogue, polarity: args::ArgPolarity) {
    println!("name;polarity;multiplicity;charge;mass_delta");
    for adduct in catalogue.of_polarity(polarity.into()) {
        println!(
            "{};{};{};{};{:.6}",
            adduct.name, adduct.polarity, adduct.multiplicity, adduct.charge, adduct.mass_delta
        );
    }
}

fn run(args: MZFormulateArgs) -> Result<(), MZFormulateError> {
    let catalogue = AdductCatalogue::builtin();
    if let Some(polarity) = args.list_adducts {
        list_adducts(&catalogue, polarity);
        return Ok(());
    }

    // clap enforces the presence of the mass when not listing adducts
    let observed = args.mass.unwrap_or_default();
    let neutral = match &args.adduct {
        Some(name) => {
            let adduct = catalogue
                .get(name)
                .ok_or_else(|| MZFormulateError::UnknownAdduct(name.clone()))?;
            let neutral = adduct.to_neutral(observed);
            info!("Interpreting m/z {observed} as {adduct}, neutral mass {neutral:.6}");
            neutral
        }
        None => observed,
    };

    let tolerance = match args.mda {
        Some(mda) => Tolerance::Da(mda * 1e-3),
        None => Tolerance::PPM(args.ppm),
    };
    let window = tolerance.window(neutral)?;

    let table = ElementTable::natural();
    let tiers = load_tiers(&args)?;
    let bounds = tiers.resolve(neutral)?;

    let mut hits = 0usize;
    println!("formula;mass;ppm");
    for composition in FormulaIterator::new(&table, bounds, window)? {
        let mass = composition.mass(&table);
        let error_ppm = (mass - neutral) / neutral * 1e6;
        println!(
            "{};{:.6};{:.3}",
            composition.hill_notation(&table),
            mass,
            error_ppm
        );
        hits += 1;
    }
    info!("Found {hits} candidate formulas for {neutral:.6}");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = MZFormulateArgs::parse();
    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
