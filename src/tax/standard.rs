//! Passenger car and motorcycle taxes

use super::brackets::{age_discount_factor, progressive, Band};
use crate::core::VehicleInput;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const BASE_REGISTRATION_AMOUNT: Decimal = dec!(300);
const BASE_ANNUAL_AMOUNT: Decimal = dec!(50);

// Registration CO2 component when no CO2 figure is known
const DISPLACEMENT_RATE: Decimal = dec!(0.05);
const POWER_RATE: Decimal = dec!(8.00);

const REGISTRATION_CO2_BANDS: [Band; 3] = [
    Band::new(dec!(200), dec!(80)),
    Band::new(dec!(150), dec!(60)),
    Band::new(dec!(117), dec!(40)),
];
const REGISTRATION_CO2_BASE_RATE: Decimal = dec!(5);

const ANNUAL_CO2_BANDS: [Band; 3] = [
    Band::new(dec!(200), dec!(4)),
    Band::new(dec!(150), dec!(3.5)),
    Band::new(dec!(117), dec!(3)),
];

const ELECTRIC_MASS_THRESHOLD: u32 = 2400;
const NON_ELECTRIC_MASS_THRESHOLD: u32 = 2000;
const REGISTRATION_MASS_RATE: Decimal = dec!(4);
const ANNUAL_MASS_RATE: Decimal = dec!(0.4);
const ELECTRIC_ANNUAL_MASS_CAP: Decimal = dec!(4400);
const NON_ELECTRIC_ANNUAL_MASS_CAP: Decimal = dec!(4000);

/// `300 + (co2 + mass) * age factor`
pub fn registration_tax(vehicle: &VehicleInput, current_year: i32) -> Decimal {
    let co2 = registration_co2_component(vehicle);
    let mass = registration_mass_component(vehicle);
    let factor = age_discount_factor(vehicle.year, current_year);
    log::debug!(
        "Registration {}: co2={}, mass={}, age factor={}",
        vehicle.category,
        co2,
        mass,
        factor
    );
    BASE_REGISTRATION_AMOUNT + (co2 + mass) * factor
}

/// `50 + (co2 + capped mass) * age factor`
pub fn annual_tax(vehicle: &VehicleInput, current_year: i32) -> Decimal {
    let co2 = annual_co2_component(vehicle);
    let mass = annual_mass_component(vehicle);
    let factor = age_discount_factor(vehicle.year, current_year);
    log::debug!(
        "Annual {}: co2={}, mass={}, age factor={}",
        vehicle.category,
        co2,
        mass,
        factor
    );
    BASE_ANNUAL_AMOUNT + (co2 + mass) * factor
}

fn registration_co2_component(vehicle: &VehicleInput) -> Decimal {
    if vehicle.electric {
        return Decimal::ZERO;
    }
    match vehicle.wltp_emissions() {
        Some(co2) => progressive(co2, &REGISTRATION_CO2_BANDS, REGISTRATION_CO2_BASE_RATE),
        None => {
            let capacity = Decimal::from(vehicle.engine_capacity.unwrap_or_default());
            let power = Decimal::from(vehicle.engine_power.unwrap_or_default());
            capacity * DISPLACEMENT_RATE + power * POWER_RATE
        }
    }
}

fn annual_co2_component(vehicle: &VehicleInput) -> Decimal {
    vehicle
        .wltp_emissions()
        .map_or(Decimal::ZERO, |co2| {
            progressive(co2, &ANNUAL_CO2_BANDS, Decimal::ZERO)
        })
}

fn excess_mass(vehicle: &VehicleInput) -> Decimal {
    let threshold = if vehicle.electric {
        ELECTRIC_MASS_THRESHOLD
    } else {
        NON_ELECTRIC_MASS_THRESHOLD
    };
    (vehicle.mass_kg() - Decimal::from(threshold)).max(Decimal::ZERO)
}

fn registration_mass_component(vehicle: &VehicleInput) -> Decimal {
    excess_mass(vehicle) * REGISTRATION_MASS_RATE
}

fn annual_mass_component(vehicle: &VehicleInput) -> Decimal {
    let cap = if vehicle.electric {
        ELECTRIC_ANNUAL_MASS_CAP
    } else {
        NON_ELECTRIC_ANNUAL_MASS_CAP
    };
    (excess_mass(vehicle) * ANNUAL_MASS_RATE).min(cap)
}
