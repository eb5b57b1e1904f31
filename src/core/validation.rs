//! Cross-field rules a vehicle must satisfy before any tax is calculated

use super::vehicle::{VehicleCategory, VehicleInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest accepted CO2 figure in g/km; keeps band arithmetic far inside `Decimal` range
pub const MAX_CO2_EMISSIONS: Decimal = dec!(10000);

/// Field-keyed validation failures, keyed by the serialized field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Check a vehicle against the input rules.
///
/// All rules are evaluated; every violation is reported, not just the first.
pub fn validate(vehicle: &VehicleInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(co2) = vehicle.co2_emissions {
        if co2 < Decimal::ZERO {
            errors.add("co2Emissions", "co2Emissions must not be negative.");
        } else if co2 > MAX_CO2_EMISSIONS {
            errors.add(
                "co2Emissions",
                format!("co2Emissions must not exceed {MAX_CO2_EMISSIONS}."),
            );
        }
    }

    if !vehicle.electric {
        match vehicle.co2_emissions {
            None if vehicle.engine_capacity.is_none() || vehicle.engine_power.is_none() => {
                errors.add(
                    "engineCapacity",
                    "Missing engineCapacity and/or enginePower for non-electric vehicle.",
                );
            }
            Some(_) if vehicle.emission_standard.is_none() => {
                errors.add(
                    "emissionStandard",
                    "Missing emissionStandard for vehicle with co2Emissions.",
                );
            }
            _ => {}
        }
    }

    if vehicle.full_mass.is_none() && !vehicle.category.is_goods_carrying() {
        let goods: Vec<&str> = VehicleCategory::GOODS.iter().map(|c| c.code()).collect();
        errors.add(
            "fullMass",
            format!(
                "Invalid category for missing fullMass. Category must be one of [{}].",
                goods.join(", ")
            ),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        log::warn!(
            "Rejected {} vehicle with {} violation(s): {}",
            vehicle.category,
            errors.len(),
            errors
        );
        Err(errors)
    }
}
