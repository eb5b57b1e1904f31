//! Light goods vehicle (N1, N1G) taxes
//!
//! Vans pay a flat registration tax and an annual tax driven by CO2 only.
//! Neither mass nor vehicle age affects the amounts.

use super::brackets::{progressive, Band};
use crate::core::VehicleInput;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const BASE_REGISTRATION_AMOUNT: Decimal = dec!(500);
const BASE_ANNUAL_AMOUNT: Decimal = dec!(50);

const ANNUAL_CO2_BANDS: [Band; 3] = [
    Band::new(dec!(300), dec!(4)),
    Band::new(dec!(250), dec!(3.5)),
    Band::new(dec!(205), dec!(3)),
];

pub fn registration_tax(_vehicle: &VehicleInput) -> Decimal {
    BASE_REGISTRATION_AMOUNT
}

pub fn annual_tax(vehicle: &VehicleInput) -> Decimal {
    let co2 = annual_co2_component(vehicle);
    log::debug!("Annual {}: co2={}", vehicle.category, co2);
    BASE_ANNUAL_AMOUNT + co2
}

fn annual_co2_component(vehicle: &VehicleInput) -> Decimal {
    if vehicle.electric {
        return Decimal::ZERO;
    }
    vehicle
        .co2_emissions
        .map_or(Decimal::ZERO, |co2| {
            progressive(co2, &ANNUAL_CO2_BANDS, Decimal::ZERO)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EmissionStandard, VehicleCategory};

    fn van(co2: Option<Decimal>) -> VehicleInput {
        VehicleInput {
            co2_emissions: co2,
            full_mass: None,
            year: 2015,
            engine_capacity: Some(2200),
            engine_power: Some(140),
            category: VehicleCategory::N1,
            electric: false,
            emission_standard: co2.map(|_| EmissionStandard::WLTP),
        }
    }

    #[test]
    fn registration_is_flat() {
        assert_eq!(registration_tax(&van(Some(dec!(320)))), dec!(500));
        let heavy = VehicleInput {
            full_mass: Some(3400),
            ..van(None)
        };
        assert_eq!(registration_tax(&heavy), dec!(500));
    }

    #[test]
    fn no_annual_co2_component_up_to_205() {
        assert_eq!(annual_tax(&van(Some(dec!(180)))), dec!(50));
        assert_eq!(annual_tax(&van(Some(dec!(205)))), dec!(50));
    }

    #[test]
    fn annual_co2_bands() {
        // 45 * 3
        assert_eq!(annual_tax(&van(Some(dec!(250)))), dec!(185));
        // 50 * 3.5 + 45 * 3
        assert_eq!(annual_tax(&van(Some(dec!(300)))), dec!(360));
        // 20 * 4 + 50 * 3.5 + 45 * 3
        assert_eq!(annual_tax(&van(Some(dec!(320)))), dec!(440));
    }

    #[test]
    fn no_age_discount() {
        let old = VehicleInput {
            year: 1990,
            ..van(Some(dec!(320)))
        };
        assert_eq!(annual_tax(&old), dec!(440));
    }

    #[test]
    fn missing_or_electric_emissions_pay_base_only() {
        assert_eq!(annual_tax(&van(None)), dec!(50));
        let electric = VehicleInput {
            electric: true,
            ..van(Some(dec!(320)))
        };
        assert_eq!(annual_tax(&electric), dec!(50));
    }
}
