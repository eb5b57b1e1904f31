pub mod brackets;
pub mod error;
pub mod standard;
pub mod van;

pub use error::{ErrorReport, TaxError};

use crate::core::{validate, TaxResult, VehicleCategory, VehicleInput};
use chrono::Datelike;
use rust_decimal::Decimal;

/// Tax rules applicable to a vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxCalculator {
    /// Passenger cars, motorcycles and quadricycles
    Standard,
    /// Light goods vehicles
    Van,
}

impl TaxCalculator {
    /// Select the rules for a category. Categories without defined rules are rejected.
    pub fn for_category(category: VehicleCategory) -> Result<Self, TaxError> {
        match category {
            VehicleCategory::M1
            | VehicleCategory::M1G
            | VehicleCategory::L3e
            | VehicleCategory::L4e
            | VehicleCategory::L5e
            | VehicleCategory::L6e
            | VehicleCategory::L7e => Ok(TaxCalculator::Standard),
            VehicleCategory::N1 | VehicleCategory::N1G => Ok(TaxCalculator::Van),
            VehicleCategory::MS2 | VehicleCategory::T1b | VehicleCategory::T3 | VehicleCategory::T5 => {
                Err(TaxError::UnsupportedCategory(category))
            }
        }
    }

    pub fn registration_tax(self, vehicle: &VehicleInput, current_year: i32) -> Decimal {
        match self {
            TaxCalculator::Standard => standard::registration_tax(vehicle, current_year),
            TaxCalculator::Van => van::registration_tax(vehicle),
        }
    }

    pub fn annual_tax(self, vehicle: &VehicleInput, current_year: i32) -> Decimal {
        match self {
            TaxCalculator::Standard => standard::annual_tax(vehicle, current_year),
            TaxCalculator::Van => van::annual_tax(vehicle),
        }
    }
}

/// Validate a vehicle and calculate both of its taxes.
///
/// `current_year` is the calendar year used to work out the vehicle's age.
pub fn calculate_tax(vehicle: &VehicleInput, current_year: i32) -> Result<TaxResult, TaxError> {
    validate(vehicle)?;
    let calculator = TaxCalculator::for_category(vehicle.category)?;
    let result = TaxResult::new(
        calculator.registration_tax(vehicle, current_year),
        calculator.annual_tax(vehicle, current_year),
    );
    log::debug!(
        "{} {} ({:?}): registration={}, annual={}",
        vehicle.category,
        vehicle.year,
        calculator,
        result.registration_tax,
        result.annual_tax
    );
    Ok(result)
}

/// Tax calculation pinned to a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxEngine {
    current_year: i32,
}

impl TaxEngine {
    pub fn new(current_year: i32) -> Self {
        TaxEngine { current_year }
    }

    /// Engine using the local calendar year
    pub fn today() -> Self {
        TaxEngine::new(chrono::Local::now().year())
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn calculate(&self, vehicle: &VehicleInput) -> Result<TaxResult, TaxError> {
        calculate_tax(vehicle, self.current_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EmissionStandard;
    use rust_decimal_macros::dec;

    const ENGINE: TaxEngine = TaxEngine { current_year: 2024 };

    fn m1(co2: Option<Decimal>, mass: Option<u32>, year: i32) -> VehicleInput {
        VehicleInput {
            co2_emissions: co2,
            full_mass: mass,
            year,
            engine_capacity: None,
            engine_power: None,
            category: VehicleCategory::M1,
            electric: false,
            emission_standard: co2.map(|_| EmissionStandard::WLTP),
        }
    }

    fn assert_taxes(vehicle: &VehicleInput, registration: &str, annual: &str) {
        let result = ENGINE.calculate(vehicle).unwrap();
        assert_eq!(result.registration_tax.to_string(), registration);
        assert_eq!(result.annual_tax.to_string(), annual);
    }

    #[test]
    fn published_scenarios() {
        assert_taxes(&m1(Some(dec!(299)), Some(2860), 2019), "16565.00", "1064.00");
        assert_taxes(&m1(Some(dec!(150)), Some(1990), 2019), "2205.00", "149.00");

        let mut light_ev = m1(None, Some(1530), 2021);
        light_ev.electric = true;
        assert_taxes(&light_ev, "300.00", "50.00");

        let mut heavy_ev = m1(None, Some(2880), 2021);
        heavy_ev.electric = true;
        assert_taxes(&heavy_ev, "2220.00", "242.00");

        let mut no_co2 = m1(None, Some(2250), 2023);
        no_co2.engine_capacity = Some(1995);
        no_co2.engine_power = Some(150);
        assert_taxes(&no_co2, "2599.75", "150.00");
    }

    #[test]
    fn missing_engine_power_is_rejected() {
        let mut vehicle = m1(None, Some(2250), 2023);
        vehicle.engine_capacity = Some(1995);
        match ENGINE.calculate(&vehicle) {
            Err(TaxError::Validation(errors)) => assert!(errors.contains("engineCapacity")),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_emission_standard_is_rejected() {
        let mut vehicle = m1(Some(dec!(150)), Some(1990), 2019);
        vehicle.emission_standard = None;
        match ENGINE.calculate(&vehicle) {
            Err(TaxError::Validation(errors)) => assert!(errors.contains("emissionStandard")),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn validation_runs_before_category_selection() {
        let mut vehicle = m1(Some(dec!(150)), None, 2019);
        vehicle.category = VehicleCategory::T3;
        let err = ENGINE.calculate(&vehicle).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn unsupported_categories_are_rejected() {
        for category in [
            VehicleCategory::MS2,
            VehicleCategory::T1b,
            VehicleCategory::T3,
            VehicleCategory::T5,
        ] {
            let mut vehicle = m1(Some(dec!(150)), Some(1990), 2019);
            vehicle.category = category;
            assert_eq!(
                ENGINE.calculate(&vehicle),
                Err(TaxError::UnsupportedCategory(category))
            );
        }
    }

    #[test]
    fn calculator_selection() {
        assert_eq!(
            TaxCalculator::for_category(VehicleCategory::M1G),
            Ok(TaxCalculator::Standard)
        );
        assert_eq!(
            TaxCalculator::for_category(VehicleCategory::L3e),
            Ok(TaxCalculator::Standard)
        );
        assert_eq!(
            TaxCalculator::for_category(VehicleCategory::N1G),
            Ok(TaxCalculator::Van)
        );
    }

    #[test]
    fn van_without_mass() {
        let mut vehicle = m1(Some(dec!(260)), None, 2010);
        vehicle.category = VehicleCategory::N1;
        // 10 * 3.5 + 45 * 3
        assert_taxes(&vehicle, "500.00", "220.00");
    }

    #[test]
    fn fractional_amounts_round_half_up() {
        // 0.003125 * 40 + 117 * 5 = 585.125; annual 0.003125 * 3 = 0.009375
        let vehicle = m1(Some(dec!(117.003125)), Some(1500), 2024);
        assert_taxes(&vehicle, "885.13", "50.01");

        // 125.0625 * 1.24 = 155.0775 -> 5.0775 * 60 + 33 * 40 + 585 = 2209.65
        // annual 5.0775 * 3.5 + 33 * 3 = 116.77125
        let mut nedc = m1(Some(dec!(125.0625)), Some(1500), 2024);
        nedc.emission_standard = Some(EmissionStandard::NEDC);
        assert_taxes(&nedc, "2509.65", "166.77");
    }

    #[test]
    fn twenty_one_year_old_vehicle_pays_base_only() {
        assert_taxes(&m1(Some(dec!(400)), Some(5000), 2003), "300.00", "50.00");
    }

    #[test]
    fn oversized_co2_is_rejected_not_computed() {
        let json = r#"{"co2Emissions": 1e27, "fullMass": 1500, "year": 2020, "category": "M1", "emissionStandard": "WLTP"}"#;
        let vehicle: VehicleInput = serde_json::from_str(json).unwrap();
        match ENGINE.calculate(&vehicle) {
            Err(TaxError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains("co2Emissions"));
            }
            other => panic!("expected a validation failure, got {other:?}"),
        }

        let mut nedc = m1(Some(crate::core::validation::MAX_CO2_EMISSIONS), Some(1500), 2024);
        nedc.emission_standard = Some(EmissionStandard::NEDC);
        assert!(ENGINE.calculate(&nedc).is_ok());
    }

    #[test]
    fn maximum_mass_is_computed() {
        // (u32::MAX - 2000) * 4 + 1905; annual mass component capped at 4000
        let vehicle = m1(Some(dec!(150)), Some(u32::MAX), 2024);
        assert_taxes(&vehicle, "17179863385.00", "4149.00");
    }

    #[test]
    fn maximum_engine_specs_are_computed() {
        let mut vehicle = m1(None, Some(1500), 2024);
        vehicle.engine_capacity = Some(u32::MAX);
        vehicle.engine_power = Some(u32::MAX);
        // 300 + u32::MAX * (0.05 + 8)
        assert_taxes(&vehicle, "34574487024.75", "50.00");
    }

    #[test]
    fn extreme_model_years_are_computed() {
        assert_taxes(&m1(Some(dec!(150)), Some(1990), i32::MIN), "300.00", "50.00");
        assert_taxes(&m1(Some(dec!(150)), Some(1990), i32::MAX), "2205.00", "149.00");
    }

    #[test]
    fn engine_reports_its_year() {
        assert_eq!(TaxEngine::new(2024).current_year(), 2024);
        assert_eq!(TaxEngine::new(2024), ENGINE);
    }
}
