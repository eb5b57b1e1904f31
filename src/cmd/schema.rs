//! Schema command - print expected input formats

use crate::core::{TaxResult, VehicleInput};
use crate::tax::ErrorReport;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a single vehicle
    JsonSchema,
    /// JSON Schema for the calculation result
    ResultSchema,
    /// JSON Schema for the error payload
    ErrorSchema,
    /// CSV header row with column names
    CsvHeader,
    /// Field descriptions
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(VehicleInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::ResultSchema => {
                let schema = schema_for!(TaxResult);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::ErrorSchema => {
                let schema = schema_for!(ErrorReport);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", csv_header()),
            SchemaFormat::Fields => self.print_fields(),
        }
        Ok(())
    }

    fn print_fields(&self) {
        println!("Vehicle Input Fields");
        println!("====================");
        println!();
        for field in VehicleInput::field_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:18} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("NEDC CO2 figures are converted to WLTP (x 1.24) before taxation");
    }
}

fn csv_header() -> String {
    VehicleInput::field_schema()
        .iter()
        .map(|f| f.name)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_header_matches_serialized_fields() {
        assert_eq!(
            csv_header(),
            "co2Emissions,fullMass,year,engineCapacity,enginePower,category,electric,emissionStandard"
        );
    }

    #[test]
    fn vehicle_schema_lists_required_fields() {
        let schema = serde_json::to_value(schema_for!(VehicleInput)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("year")));
        assert!(required.contains(&serde_json::json!("category")));
        assert!(!required.contains(&serde_json::json!("fullMass")));
    }
}
