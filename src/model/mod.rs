//! Immutable records and the builders that are the only way to create them.
//!
//! Builders take raw text (`None` meaning "absent"), parse it, run the
//! field's validator chain and keep the typed value. Parse failures are
//! [`StockError::Input`], rule failures [`StockError::Validation`].

pub mod coordinates;
pub mod organization;
pub mod product;
pub mod unit;

pub use coordinates::{Coordinates, CoordinatesBuilder};
pub use organization::{Organization, OrganizationBuilder};
pub use product::{Product, ProductBuilder};
pub use unit::UnitOfMeasure;

use crate::error::{StockError, StockResult};

fn parse_int(field: &'static str, label: &str, raw: Option<&str>) -> StockResult<Option<i64>> {
    raw.map(|s| {
        s.trim()
            .parse::<i64>()
            .map_err(|_| StockError::input(field, format!("{} must be an integer", label)))
    })
    .transpose()
}

/// Non-finite values are refused: they have no JSON representation.
fn parse_float(field: &'static str, label: &str, raw: Option<&str>) -> StockResult<Option<f64>> {
    raw.map(|s| match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(StockError::input(
            field,
            format!("{} must be a finite number", label),
        )),
    })
    .transpose()
}

fn render_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_trims_and_rejects_garbage() {
        assert_eq!(parse_int("y", "Y", Some(" 42 ")).unwrap(), Some(42));
        assert_eq!(parse_int("y", "Y", None).unwrap(), None);
        let err = parse_int("y", "Y", Some("4.2")).unwrap_err();
        assert!(matches!(err, StockError::Input { field: "y", .. }));
    }

    #[test]
    fn test_parse_float_rejects_non_finite() {
        assert_eq!(parse_float("price", "Price", Some("2.5")).unwrap(), Some(2.5));
        for raw in ["NaN", "inf", "-inf", "abc"] {
            assert!(parse_float("price", "Price", Some(raw)).is_err(), "{}", raw);
        }
    }
}
