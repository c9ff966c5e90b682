//! Option metadata for the search form. The home page ships these so the
//! client can render the filter dropdowns without a second round trip.

use serde::{Deserialize, Serialize};

pub const PROVINCE_CHOICES: [&str; 13] = [
    "Alberta",
    "British Columbia",
    "Manitoba",
    "New Brunswick",
    "Newfoundland and Labrador",
    "Northwest Territories",
    "Nova Scotia",
    "Nunavut",
    "Ontario",
    "Prince Edward Island",
    "Quebec",
    "Saskatchewan",
    "Yukon",
];

pub fn bedroom_choices() -> Vec<i64> {
    (1..=10).collect()
}

/// Price ceilings offered in the search form, $100k steps up to $1.2M.
pub fn price_choices() -> Vec<i64> {
    (1..=12).map(|n| n * 100_000).collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchChoices {
    pub bedrooms: Vec<i64>,
    pub prices: Vec<i64>,
    pub provinces: Vec<String>,
}

impl SearchChoices {
    pub fn current() -> Self {
        Self {
            bedrooms: bedroom_choices(),
            prices: price_choices(),
            provinces: PROVINCE_CHOICES.iter().map(|p| p.to_string()).collect(),
        }
    }
}
