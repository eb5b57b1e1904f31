//! Batch command - taxes for many vehicles read from CSV or JSON

use crate::cmd::read_vehicles;
use crate::core::{MalformedRecord, TaxResult, VehicleRecord};
use crate::tax::{ErrorReport, TaxEngine, TaxError};
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV or JSON file containing vehicles ("-" for a JSON array on stdin)
    #[arg(short, long)]
    vehicles: PathBuf,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// Outcome for one input row
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    row: usize,
    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outcome {
    Calculated(TaxResult),
    Failed { error: ErrorReport },
}

/// Why a row produced no taxes
#[derive(Debug)]
enum RowFailure {
    Malformed(MalformedRecord),
    Rejected(TaxError),
}

impl RowFailure {
    fn report(&self) -> ErrorReport {
        match self {
            RowFailure::Malformed(err) => ErrorReport::from(err),
            RowFailure::Rejected(err) => ErrorReport::from(err),
        }
    }

    fn summary(&self) -> String {
        match self {
            RowFailure::Malformed(err) => err.to_string(),
            RowFailure::Rejected(TaxError::Validation(errors)) => errors.to_string(),
            RowFailure::Rejected(err) => err.to_string(),
        }
    }
}

type RowOutcome = Result<TaxResult, RowFailure>;

/// Row for the batch table and CSV output
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    #[tabled(rename = "#")]
    pub row: usize,

    #[tabled(rename = "Category")]
    pub category: String,

    #[tabled(rename = "Year")]
    pub year: String,

    #[tabled(rename = "Registration")]
    pub registration_tax: String,

    #[tabled(rename = "Annual")]
    pub annual_tax: String,

    #[tabled(rename = "Error")]
    pub error: String,
}

impl BatchCommand {
    pub fn exec(&self, engine: TaxEngine) -> anyhow::Result<()> {
        let records = read_vehicles(&self.vehicles)?;
        log::info!(
            "Calculating taxes for {} vehicles (current year {})",
            records.len(),
            engine.current_year()
        );

        let outcomes = calculate_all(engine, &records);
        let failures = outcomes.iter().filter(|o| o.is_err()).count();

        if self.json {
            self.print_json(&outcomes)?;
        } else {
            let rows = build_rows(&records, &outcomes);
            if self.csv {
                self.write_csv(&rows)?;
            } else {
                self.print_table(&rows);
            }
        }

        // Exit with code 1 if any vehicle failed
        if failures > 0 {
            log::warn!("{} of {} vehicles failed", failures, records.len());
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_table(&self, rows: &[BatchRow]) {
        if rows.is_empty() {
            println!("No vehicles found");
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(3..5)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    fn write_csv(&self, rows: &[BatchRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn print_json(&self, outcomes: &[RowOutcome]) -> anyhow::Result<()> {
        let entries: Vec<BatchEntry> = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| BatchEntry {
                row: i + 1,
                outcome: match outcome {
                    Ok(result) => Outcome::Calculated(*result),
                    Err(failure) => Outcome::Failed {
                        error: failure.report(),
                    },
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        Ok(())
    }
}

fn calculate_all(engine: TaxEngine, records: &[VehicleRecord]) -> Vec<RowOutcome> {
    records
        .iter()
        .map(|record| match record {
            Ok(vehicle) => engine.calculate(vehicle).map_err(RowFailure::Rejected),
            Err(err) => Err(RowFailure::Malformed(err.clone())),
        })
        .collect()
}

fn build_rows(records: &[VehicleRecord], outcomes: &[RowOutcome]) -> Vec<BatchRow> {
    records
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(i, (record, outcome))| {
            let (registration_tax, annual_tax, error) = match outcome {
                Ok(result) => (
                    result.registration_tax.to_string(),
                    result.annual_tax.to_string(),
                    String::new(),
                ),
                Err(failure) => (String::new(), String::new(), failure.summary()),
            };
            let (category, year) = match record {
                Ok(vehicle) => (vehicle.category.to_string(), vehicle.year.to_string()),
                Err(_) => ("-".to_string(), "-".to_string()),
            };
            BatchRow {
                row: i + 1,
                category,
                year,
                registration_tax,
                annual_tax,
                error,
            }
        })
        .collect()
}
