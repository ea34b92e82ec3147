use std::fmt;

use crate::error::{StockError, StockResult};
use crate::validator::{FieldValue, Relation, Validator};

use super::parse_int;

/// Largest accepted `x`.
pub const MAX_X: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Coordinates {
    x: Option<i64>,
    y: i64,
}

impl Coordinates {
    pub fn x(&self) -> Option<i64> {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coordinates(X={}, Y={})",
            super::render_opt(&self.x),
            self.y
        )
    }
}

impl FieldValue for Coordinates {}

#[derive(Debug, Clone, Default)]
pub struct CoordinatesBuilder {
    x: Option<i64>,
    y: Option<i64>,
}

impl CoordinatesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_x(&mut self, raw: Option<&str>) -> StockResult<()> {
        let x = parse_int("x", "X", raw)?;
        Validator::nullable()
            .then(Validator::compare(
                Relation::LessOrEqual,
                MAX_X,
                format!("Maximum of x is {}", MAX_X),
            ))
            .check("x", x.as_ref())?;
        self.x = x;
        Ok(())
    }

    pub fn set_y(&mut self, raw: Option<&str>) -> StockResult<()> {
        let y = parse_int("y", "Y", raw)?;
        Validator::not_null("Y can't be null").check("y", y.as_ref())?;
        self.y = y;
        Ok(())
    }

    pub fn build(&self) -> StockResult<Coordinates> {
        let y = self.y.ok_or(StockError::IncompleteEntity {
            entity: "Coordinates",
            field: "y",
        })?;
        Ok(Coordinates { x: self.x, y })
    }
}

impl From<&Coordinates> for CoordinatesBuilder {
    fn from(coordinates: &Coordinates) -> Self {
        Self {
            x: coordinates.x,
            y: Some(coordinates.y),
        }
    }
}
