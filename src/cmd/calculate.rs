//! Calculate command - registration and annual tax for a single vehicle

use crate::cmd::read_vehicle;
use crate::core::{EmissionStandard, TaxResult, VehicleCategory, VehicleInput};
use crate::tax::{ErrorReport, TaxEngine};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// JSON file describing the vehicle ("-" for stdin)
    #[arg(short, long, conflicts_with_all = ["category", "year"])]
    vehicle: Option<PathBuf>,

    /// Vehicle category (e.g. M1, N1, L3e)
    #[arg(short, long, value_parser = parse_category, required_unless_present = "vehicle")]
    category: Option<VehicleCategory>,

    /// Year of manufacture
    #[arg(short, long, required_unless_present = "vehicle")]
    year: Option<i32>,

    /// CO2 emissions in g/km
    #[arg(long)]
    co2: Option<Decimal>,

    /// Standard the CO2 figure was measured under
    #[arg(long, value_enum)]
    standard: Option<EmissionStandardArg>,

    /// Full mass in kg
    #[arg(short, long)]
    mass: Option<u32>,

    /// Engine capacity in cc
    #[arg(long)]
    capacity: Option<u32>,

    /// Engine power in hp
    #[arg(long)]
    power: Option<u32>,

    /// Fully electric vehicle
    #[arg(long)]
    electric: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EmissionStandardArg {
    Wltp,
    Nedc,
}

impl From<EmissionStandardArg> for EmissionStandard {
    fn from(arg: EmissionStandardArg) -> Self {
        match arg {
            EmissionStandardArg::Wltp => EmissionStandard::WLTP,
            EmissionStandardArg::Nedc => EmissionStandard::NEDC,
        }
    }
}

pub fn parse_category(s: &str) -> Result<VehicleCategory, String> {
    VehicleCategory::from_code(s).ok_or_else(|| {
        let codes: Vec<&str> = VehicleCategory::ALL.iter().map(|c| c.code()).collect();
        format!("unknown vehicle category '{}', expected one of {}", s, codes.join(", "))
    })
}

impl CalculateCommand {
    pub fn exec(&self, engine: TaxEngine) -> anyhow::Result<()> {
        let vehicle = match &self.vehicle {
            Some(path) => read_vehicle(path)?,
            None => self.vehicle_from_args()?,
        };
        log::info!(
            "Calculating taxes for {} {} (current year {})",
            vehicle.category,
            vehicle.year,
            engine.current_year()
        );

        match engine.calculate(&vehicle) {
            Ok(result) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print_result(&vehicle, &result);
                }
                Ok(())
            }
            Err(err) => {
                if err.is_client_error() {
                    log::warn!("Rejected vehicle: {}", err);
                } else {
                    log::error!("{}", err);
                }
                let report = ErrorReport::from(&err);
                println!("{}", serde_json::to_string_pretty(&report)?);
                std::process::exit(1);
            }
        }
    }

    fn vehicle_from_args(&self) -> anyhow::Result<VehicleInput> {
        let category = self
            .category
            .ok_or_else(|| anyhow::anyhow!("--category is required without --vehicle"))?;
        let year = self
            .year
            .ok_or_else(|| anyhow::anyhow!("--year is required without --vehicle"))?;

        Ok(VehicleInput {
            co2_emissions: self.co2,
            full_mass: self.mass,
            engine_capacity: self.capacity,
            engine_power: self.power,
            electric: self.electric,
            emission_standard: self.standard.map(Into::into),
            ..VehicleInput::new(category, year)
        })
    }
}

fn print_result(vehicle: &VehicleInput, result: &TaxResult) {
    println!();
    println!("TAX CALCULATION ({}, {})", vehicle.category, vehicle.year);
    println!();
    println!("  Registration tax: {:>12}", result.registration_tax);
    println!("  Annual tax:       {:>12}", result.annual_tax);
    println!();
}
