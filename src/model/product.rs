use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{StockError, StockResult};
use crate::identity::IdentityHasher;
use crate::validator::{KeySet, Validator};

use super::{parse_float, parse_int, render_opt, Coordinates, Organization, UnitOfMeasure};

/// One record of the collection.
///
/// Products order by price, absent price first. Equal prices are broken by
/// id in the collection, see [`crate::collection::OrderKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    name: String,
    coordinates: Coordinates,
    price: Option<f64>,
    part_number: Option<String>,
    manufacture_cost: f64,
    unit_of_measure: Option<UnitOfMeasure>,
    manufacturer: Option<Organization>,
    creation_date: DateTime<Utc>,
    id: i64,
}

impl Product {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn part_number(&self) -> Option<&str> {
        self.part_number.as_deref()
    }

    pub fn manufacture_cost(&self) -> f64 {
        self.manufacture_cost
    }

    pub fn unit_of_measure(&self) -> Option<UnitOfMeasure> {
        self.unit_of_measure
    }

    pub fn manufacturer(&self) -> Option<&Organization> {
        self.manufacturer.as_ref()
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn price_cmp(&self, other: &Product) -> Ordering {
        compare_prices(self.price, other.price)
    }
}

/// Absent sorts before present; present prices compare numerically.
pub(crate) fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(&b),
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name='{}'", self.name)?;
        writeln!(f, "Coordinates={}", self.coordinates)?;
        writeln!(
            f,
            "Price={}, PartNumber={}",
            render_opt(&self.price),
            render_opt(&self.part_number)
        )?;
        writeln!(f, "ManufactureCost={}", self.manufacture_cost)?;
        writeln!(f, "UnitOfMeasure={}", render_opt(&self.unit_of_measure))?;
        writeln!(f, "Manufacturer={}", render_opt(&self.manufacturer))?;
        writeln!(f, "Id={}", self.id)?;
        write!(f, "CreationDate={}", self.creation_date.to_rfc3339())
    }
}

/// Staged construction of a [`Product`].
///
/// Uniqueness-checked setters take the set of keys currently in use. When
/// editing an existing product wrap that set in
/// [`crate::validator::Excluding`] so the product's own keys stay valid.
#[derive(Debug, Clone, Default)]
pub struct ProductBuilder {
    name: Option<String>,
    coordinates: Option<Coordinates>,
    price: Option<f64>,
    part_number: Option<String>,
    manufacture_cost: Option<f64>,
    unit_of_measure: Option<UnitOfMeasure>,
    manufacturer: Option<Organization>,
    id: Option<i64>,
    creation_date: Option<DateTime<Utc>>,
}

impl ProductBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, raw: Option<&str>) -> StockResult<()> {
        let name = raw.map(str::to_string);
        Validator::not_null("Name can't be null")
            .then(Validator::not_empty("Name can't be empty"))
            .check("name", name.as_ref())?;
        self.name = name;
        Ok(())
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) -> StockResult<()> {
        Validator::not_null("Coordinates can't be null")
            .check("coordinates", coordinates.as_ref())?;
        self.coordinates = coordinates;
        Ok(())
    }

    pub fn set_price(&mut self, raw: Option<&str>) -> StockResult<()> {
        let price = parse_float("price", "Price", raw)?;
        Validator::nullable()
            .then(Validator::positive("Price must be more than zero"))
            .check("price", price.as_ref())?;
        self.price = price;
        Ok(())
    }

    pub fn set_part_number(
        &mut self,
        raw: Option<&str>,
        used: &dyn KeySet<String>,
    ) -> StockResult<()> {
        let part_number = raw.map(str::to_string);
        Validator::nullable()
            .then(Validator::not_empty("PartNumber can't be empty"))
            .then(Validator::unique(
                used,
                "This partNumber already exists. They can't be repeated",
            ))
            .check("partNumber", part_number.as_ref())?;
        self.part_number = part_number;
        Ok(())
    }

    pub fn set_manufacture_cost(&mut self, raw: Option<&str>) -> StockResult<()> {
        let cost = parse_float("manufactureCost", "ManufactureCost", raw)?;
        Validator::not_null("ManufactureCost can't be null")
            .check("manufactureCost", cost.as_ref())?;
        self.manufacture_cost = cost;
        Ok(())
    }

    pub fn set_unit_of_measure(&mut self, raw: Option<&str>) -> StockResult<()> {
        let unit = raw.map(str::parse::<UnitOfMeasure>).transpose()?;
        Validator::nullable().check("unitOfMeasure", unit.as_ref())?;
        self.unit_of_measure = unit;
        Ok(())
    }

    pub fn set_manufacturer(&mut self, manufacturer: Option<Organization>) -> StockResult<()> {
        Validator::nullable().check("manufacturer", manufacturer.as_ref())?;
        self.manufacturer = manufacturer;
        Ok(())
    }

    /// Absent means "derive at build time".
    pub fn set_id(&mut self, raw: Option<&str>, used: &dyn KeySet<i64>) -> StockResult<()> {
        let id = parse_int("id", "Id", raw)?;
        Validator::nullable()
            .then(Validator::positive("Id must be more than zero"))
            .then(Validator::unique(
                used,
                "This id already exists. They can't be repeated",
            ))
            .check("id", id.as_ref())?;
        self.id = id;
        Ok(())
    }

    /// Accepts RFC 3339, or a zone-less `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC.
    /// Absent means "now" at build time.
    pub fn set_creation_date(&mut self, raw: Option<&str>) -> StockResult<()> {
        self.creation_date = raw.map(parse_timestamp).transpose()?;
        Ok(())
    }

    /// Produce the product, or fail without producing anything.
    pub fn build(&self) -> StockResult<Product> {
        let name = self.name.clone().ok_or(incomplete("name"))?;
        let coordinates = self.coordinates.ok_or(incomplete("coordinates"))?;
        let manufacture_cost = self
            .manufacture_cost
            .ok_or(incomplete("manufactureCost"))?;

        let id = match self.id {
            Some(id) => id,
            None => self.fallback_id(&name, &coordinates, manufacture_cost),
        };

        Ok(Product {
            name,
            coordinates,
            price: self.price,
            part_number: self.part_number.clone(),
            manufacture_cost,
            unit_of_measure: self.unit_of_measure,
            manufacturer: self.manufacturer.clone(),
            creation_date: self.creation_date.unwrap_or_else(Utc::now),
            id,
        })
    }

    fn fallback_id(&self, name: &str, coordinates: &Coordinates, manufacture_cost: f64) -> i64 {
        let mut hasher = IdentityHasher::new();
        hasher
            .str(name)
            .opt_int(coordinates.x())
            .int(coordinates.y())
            .opt_float(self.price)
            .opt_str(self.part_number.as_deref())
            .float(manufacture_cost)
            .opt_str(self.unit_of_measure.as_ref().map(UnitOfMeasure::as_str));
        match &self.manufacturer {
            Some(org) => org.hash_into(&mut hasher),
            None => {
                hasher.absent();
            }
        }
        hasher.finish()
    }
}

/// Seed a builder from an existing product, identity and creation date
/// included.
impl From<&Product> for ProductBuilder {
    fn from(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            coordinates: Some(product.coordinates),
            price: product.price,
            part_number: product.part_number.clone(),
            manufacture_cost: Some(product.manufacture_cost),
            unit_of_measure: product.unit_of_measure,
            manufacturer: product.manufacturer.clone(),
            id: Some(product.id),
            creation_date: Some(product.creation_date),
        }
    }
}

fn incomplete(field: &'static str) -> StockError {
    StockError::IncompleteEntity {
        entity: "Product",
        field,
    }
}

fn parse_timestamp(raw: &str) -> StockResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            StockError::input(
                "creationDate",
                "CreationDate must be an RFC 3339 timestamp",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoordinatesBuilder;
    use crate::validator::{Excluding, NoKeys};
    use std::collections::HashSet;

    fn coords() -> Coordinates {
        let mut builder = CoordinatesBuilder::new();
        builder.set_x(Some("1")).unwrap();
        builder.set_y(Some("2")).unwrap();
        builder.build().unwrap()
    }

    fn minimal() -> ProductBuilder {
        let mut builder = ProductBuilder::new();
        builder.set_name(Some("Bolt")).unwrap();
        builder.set_coordinates(Some(coords())).unwrap();
        builder.set_manufacture_cost(Some("-3.5")).unwrap();
        builder
    }

    #[test]
    fn test_minimal_product_gets_fallbacks() {
        let before = Utc::now();
        let product = minimal().build().unwrap();
        assert_eq!(product.name(), "Bolt");
        assert_eq!(product.price(), None);
        assert_eq!(product.manufacture_cost(), -3.5);
        assert!(product.id() > 0);
        assert!(product.creation_date() >= before);
    }

    #[test]
    fn test_fallback_id_ignores_creation_date() {
        let mut a = minimal();
        a.set_creation_date(Some("2024-01-01T00:00:00Z")).unwrap();
        let mut b = minimal();
        b.set_creation_date(Some("2025-06-01T12:00:00Z")).unwrap();
        assert_eq!(a.build().unwrap().id(), b.build().unwrap().id());

        b.set_price(Some("9.99")).unwrap();
        assert_ne!(a.build().unwrap().id(), b.build().unwrap().id());
    }

    #[test]
    fn test_negative_price_names_field() {
        let mut builder = minimal();
        let err = builder.set_price(Some("-1")).unwrap_err();
        assert!(matches!(err, StockError::Validation { field: "price", .. }));
        let err = builder.set_price(Some("cheap")).unwrap_err();
        assert!(matches!(err, StockError::Input { field: "price", .. }));
    }

    #[test]
    fn test_duplicate_part_number_rejected() {
        let used: HashSet<String> = ["AB12".to_string()].into_iter().collect();
        let mut builder = minimal();
        let err = builder.set_part_number(Some("AB12"), &used).unwrap_err();
        assert!(matches!(err, StockError::Validation { field: "partNumber", .. }));
        let err = builder.set_part_number(Some(""), &used).unwrap_err();
        assert!(matches!(err, StockError::Validation { field: "partNumber", .. }));
        assert!(builder.set_part_number(None, &used).is_ok());
        assert!(builder.set_part_number(Some("AB13"), &used).is_ok());
    }

    #[test]
    fn test_own_part_number_is_not_a_duplicate() {
        let used: HashSet<String> = ["AB12".to_string()].into_iter().collect();
        let own = "AB12".to_string();
        let mut builder = minimal();
        builder
            .set_part_number(Some("AB12"), &Excluding::new(&used, Some(&own)))
            .unwrap();
    }

    #[test]
    fn test_id_rules() {
        let used: HashSet<i64> = [1, 2].into_iter().collect();
        let mut builder = minimal();
        assert!(matches!(
            builder.set_id(Some("2"), &used).unwrap_err(),
            StockError::Validation { field: "id", .. }
        ));
        assert!(matches!(
            builder.set_id(Some("-4"), &used).unwrap_err(),
            StockError::Validation { field: "id", .. }
        ));
        builder.set_id(Some("3"), &used).unwrap();
        assert_eq!(builder.build().unwrap().id(), 3);
    }

    #[test]
    fn test_missing_required_fields() {
        let mut builder = ProductBuilder::new();
        builder.set_name(Some("Nut")).unwrap();
        assert_eq!(builder.build().unwrap_err(), incomplete("coordinates"));
        builder.set_coordinates(Some(coords())).unwrap();
        assert_eq!(builder.build().unwrap_err(), incomplete("manufactureCost"));
        let err = builder.set_coordinates(None).unwrap_err();
        assert!(matches!(err, StockError::Validation { field: "coordinates", .. }));
    }

    #[test]
    fn test_unit_and_timestamp_parsing() {
        let mut builder = minimal();
        builder.set_unit_of_measure(Some("MILLIGRAMS")).unwrap();
        assert!(builder.set_unit_of_measure(Some("TONS")).is_err());
        builder
            .set_creation_date(Some("2023-04-05T06:07:08.123"))
            .unwrap();
        assert!(builder.set_creation_date(Some("yesterday")).is_err());
        builder.set_id(None, &NoKeys).unwrap();

        let product = builder.build().unwrap();
        assert_eq!(product.unit_of_measure(), Some(UnitOfMeasure::Milligrams));
        assert_eq!(
            product.creation_date().to_rfc3339(),
            "2023-04-05T06:07:08.123+00:00"
        );
    }

    #[test]
    fn test_price_order_puts_absent_first() {
        let cheap = {
            let mut b = minimal();
            b.set_price(Some("2")).unwrap();
            b.build().unwrap()
        };
        let free = minimal().build().unwrap();
        assert_eq!(free.price_cmp(&cheap), Ordering::Less);
        assert_eq!(cheap.price_cmp(&free), Ordering::Greater);
        assert_eq!(free.price_cmp(&free), Ordering::Equal);
    }

    #[test]
    fn test_reseeded_builder_rebuilds_same_product() {
        let product = minimal().build().unwrap();
        let rebuilt = ProductBuilder::from(&product).build().unwrap();
        assert_eq!(product, rebuilt);
    }
}
