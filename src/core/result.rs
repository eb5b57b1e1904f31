use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Decimal places carried by every tax amount
pub const CURRENCY_DP: u32 = 2;

/// Calculated taxes for one vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    /// One-time tax due at first registration
    #[schemars(with = "String")]
    pub registration_tax: Decimal,
    /// Recurring yearly tax
    #[schemars(with = "String")]
    pub annual_tax: Decimal,
}

impl TaxResult {
    /// Build a result from unrounded amounts
    pub fn new(registration_tax: Decimal, annual_tax: Decimal) -> Self {
        TaxResult {
            registration_tax: round_currency(registration_tax),
            annual_tax: round_currency(annual_tax),
        }
    }
}

/// Round half-up to currency precision, always keeping two decimal places
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DP);
    rounded
}
