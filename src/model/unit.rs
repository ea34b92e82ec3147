use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StockError;
use crate::validator::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitOfMeasure {
    SquareMeters,
    Milliliters,
    Milligrams,
}

impl UnitOfMeasure {
    pub const ALL: [UnitOfMeasure; 3] = [
        UnitOfMeasure::SquareMeters,
        UnitOfMeasure::Milliliters,
        UnitOfMeasure::Milligrams,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::SquareMeters => "SQUARE_METERS",
            UnitOfMeasure::Milliliters => "MILLILITERS",
            UnitOfMeasure::Milligrams => "MILLIGRAMS",
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        UnitOfMeasure::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                StockError::input(
                    "unitOfMeasure",
                    "Such UnitOfMeasure doesn't exist (SQUARE_METERS, MILLILITERS, MILLIGRAMS)",
                )
            })
    }
}

impl FieldValue for UnitOfMeasure {}
