//! Progressive emission bands and the vehicle age discount shared by the calculators

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A marginal band: every unit above `threshold` is charged at `rate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl Band {
    pub const fn new(threshold: Decimal, rate: Decimal) -> Self {
        Band { threshold, rate }
    }
}

/// Marginal-rate tax on `value` over `bands` (highest threshold first).
///
/// Each band charges only the slice above its threshold, after which the
/// running value is clamped down to that threshold. Whatever is left below
/// the lowest threshold is charged at `base_rate`.
pub fn progressive(value: Decimal, bands: &[Band], base_rate: Decimal) -> Decimal {
    let mut remaining = value.max(Decimal::ZERO);
    let mut tax = Decimal::ZERO;
    for band in bands {
        if remaining > band.threshold {
            tax += (remaining - band.threshold) * band.rate;
            remaining = band.threshold;
        }
    }
    tax + remaining * base_rate
}

/// Multiplier applied to the variable part of a tax, by vehicle age in years
pub fn age_discount_factor(manufacture_year: i32, current_year: i32) -> Decimal {
    match i64::from(current_year) - i64::from(manufacture_year) {
        21.. => Decimal::ZERO,
        16..=20 => dec!(0.10),
        11..=15 => dec!(0.50),
        6..=10 => dec!(0.75),
        _ => Decimal::ONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANDS: [Band; 3] = [
        Band::new(dec!(200), dec!(80)),
        Band::new(dec!(150), dec!(60)),
        Band::new(dec!(117), dec!(40)),
    ];

    #[test]
    fn below_lowest_band_uses_base_rate() {
        assert_eq!(progressive(dec!(100), &BANDS, dec!(5)), dec!(500));
        assert_eq!(progressive(dec!(117), &BANDS, dec!(5)), dec!(585));
    }

    #[test]
    fn each_band_taxes_only_its_slice() {
        // 33 * 40 + 117 * 5
        assert_eq!(progressive(dec!(150), &BANDS, dec!(5)), dec!(1905));
        // 99 * 80 + 50 * 60 + 33 * 40 + 117 * 5
        assert_eq!(progressive(dec!(299), &BANDS, dec!(5)), dec!(12825));
    }

    #[test]
    fn fractional_values() {
        // 0.5 * 40 + 117 * 5
        assert_eq!(progressive(dec!(117.5), &BANDS, dec!(5)), dec!(605));
    }

    #[test]
    fn zero_base_rate_ignores_lower_slice() {
        assert_eq!(progressive(dec!(117), &BANDS, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(progressive(dec!(120), &BANDS, Decimal::ZERO), dec!(120));
    }

    #[test]
    fn monotonic_in_value() {
        let mut previous = Decimal::ZERO;
        for grams in 0..400 {
            let tax = progressive(Decimal::from(grams), &BANDS, dec!(5));
            assert!(tax >= previous, "tax fell at {grams} g/km");
            previous = tax;
        }
    }

    #[test]
    fn age_discount_steps() {
        let now = 2024;
        assert_eq!(age_discount_factor(2024, now), dec!(1));
        assert_eq!(age_discount_factor(2019, now), dec!(1));
        assert_eq!(age_discount_factor(2018, now), dec!(0.75));
        assert_eq!(age_discount_factor(2014, now), dec!(0.75));
        assert_eq!(age_discount_factor(2013, now), dec!(0.50));
        assert_eq!(age_discount_factor(2009, now), dec!(0.50));
        assert_eq!(age_discount_factor(2008, now), dec!(0.10));
        assert_eq!(age_discount_factor(2004, now), dec!(0.10));
        assert_eq!(age_discount_factor(2003, now), dec!(0));
        assert_eq!(age_discount_factor(1980, now), dec!(0));
    }

    #[test]
    fn future_model_year_gets_no_discount() {
        assert_eq!(age_discount_factor(2025, 2024), dec!(1));
    }

    #[test]
    fn extreme_model_years_do_not_overflow() {
        assert_eq!(age_discount_factor(i32::MIN, 2024), dec!(0));
        assert_eq!(age_discount_factor(i32::MAX, 2024), dec!(1));
        assert_eq!(age_discount_factor(i32::MIN, i32::MAX), dec!(0));
        assert_eq!(age_discount_factor(i32::MAX, i32::MIN), dec!(1));
    }
}
