//! The price-estimation rule.
//!
//! A car's estimated price is its base price plus a fixed markup chosen by
//! category. `sedan` and `suv` (compared ignoring ASCII case) carry a markup;
//! every other category, including ones never seen before, carries none.
//! Prices are not validated: zero and negative values go through the same
//! rule.

use serde::{Deserialize, Serialize};

/// Markup added to a sedan's base price.
pub const SEDAN_MARKUP: f64 = 5_000.0;

/// Markup added to an SUV's base price.
pub const SUV_MARKUP: f64 = 10_000.0;

/// The car description a caller asks to have priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarQuote {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub description: String,
}

/// The markup applied to a category.
pub fn markup_for(kind: &str) -> f64 {
    if kind.eq_ignore_ascii_case("sedan") {
        SEDAN_MARKUP
    } else if kind.eq_ignore_ascii_case("suv") {
        SUV_MARKUP
    } else {
        0.0
    }
}

/// Base price plus the category's markup.
pub fn estimate_price(car: &CarQuote) -> f64 {
    car.price + markup_for(&car.kind)
}
