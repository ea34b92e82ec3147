//! JSON interchange format for the collection.
//!
//! The store holds one JSON array of product records:
//!
//! ```json
//! [
//!   {
//!     "Name": "Bolt",
//!     "Coordinates": { "X": 1, "Y": 2 },
//!     "Price": 2.5,
//!     "PartNumber": null,
//!     "ManufactureCost": 0.4,
//!     "UnitOfMeasure": "MILLIGRAMS",
//!     "Manufacturer": null,
//!     "Id": 17,
//!     "CreationDate": "2024-03-01T10:00:00+00:00"
//!   }
//! ]
//! ```
//!
//! Absent fields are written as `null`, never omitted, so that on load a
//! missing key is reported as a corrupt record rather than read as absent.
//!
//! Loading feeds every record through the same builders and
//! [`ProductCollection::add`] that interactive input uses, in file order, so
//! a bad or duplicate record fails exactly where a live `add` would.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::collection::ProductCollection;
use crate::error::{StockError, StockResult};
use crate::model::{
    Coordinates, CoordinatesBuilder, Organization, OrganizationBuilder, Product, ProductBuilder,
    UnitOfMeasure,
};
use crate::store::Store;
use crate::validator::NoKeys;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ProductRecord<'a> {
    name: &'a str,
    coordinates: CoordinatesRecord,
    price: Option<f64>,
    part_number: Option<&'a str>,
    manufacture_cost: f64,
    unit_of_measure: Option<UnitOfMeasure>,
    manufacturer: Option<OrganizationRecord<'a>>,
    id: i64,
    creation_date: String,
}

#[derive(Serialize)]
struct CoordinatesRecord {
    #[serde(rename = "X")]
    x: Option<i64>,
    #[serde(rename = "Y")]
    y: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct OrganizationRecord<'a> {
    name: &'a str,
    full_name: Option<&'a str>,
    annual_turnover: Option<i64>,
    employees_count: Option<i64>,
    id: i64,
}

impl<'a> From<&'a Product> for ProductRecord<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            name: product.name(),
            coordinates: product.coordinates().into(),
            price: product.price(),
            part_number: product.part_number(),
            manufacture_cost: product.manufacture_cost(),
            unit_of_measure: product.unit_of_measure(),
            manufacturer: product.manufacturer().map(OrganizationRecord::from),
            id: product.id(),
            creation_date: product.creation_date().to_rfc3339(),
        }
    }
}

impl From<&Coordinates> for CoordinatesRecord {
    fn from(coordinates: &Coordinates) -> Self {
        Self {
            x: coordinates.x(),
            y: coordinates.y(),
        }
    }
}

impl<'a> From<&'a Organization> for OrganizationRecord<'a> {
    fn from(org: &'a Organization) -> Self {
        Self {
            name: org.name(),
            full_name: org.full_name(),
            annual_turnover: org.annual_turnover(),
            employees_count: org.employees_count(),
            id: org.id(),
        }
    }
}

/// Serialize every product, in ascending order.
pub fn encode(collection: &ProductCollection) -> Result<Vec<u8>> {
    let records: Vec<ProductRecord> = collection.ascending().map(ProductRecord::from).collect();
    serde_json::to_vec_pretty(&records).context("Failed to serialize collection")
}

/// One product as an interchange record.
pub fn product_value(product: &Product) -> Value {
    serde_json::to_value(ProductRecord::from(product)).unwrap_or(Value::Null)
}

/// One organization as an interchange record.
pub fn organization_value(org: &Organization) -> Value {
    serde_json::to_value(OrganizationRecord::from(org)).unwrap_or(Value::Null)
}

/// Outcome of [`decode`].
#[derive(Debug)]
pub struct Loaded {
    pub collection: ProductCollection,
    /// One message per record dropped because `skip_invalid` was set.
    pub skipped: Vec<String>,
}

/// Rebuild a collection from store bytes.
///
/// Empty input and a bare `null` give an empty collection. With
/// `skip_invalid` a rejected record is logged and left out; otherwise the
/// first rejected record aborts the load.
pub fn decode(bytes: &[u8], skip_invalid: bool) -> Result<Loaded> {
    let mut loaded = Loaded {
        collection: ProductCollection::new(),
        skipped: Vec::new(),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(loaded);
    }

    let document: Value = serde_json::from_slice(bytes).context("Store is not valid JSON")?;
    let records = match document {
        Value::Null => return Ok(loaded),
        Value::Array(records) => records,
        other => bail!(
            "Store must contain a JSON array of products, found {}",
            kind_of(&other)
        ),
    };

    for (index, record) in records.iter().enumerate() {
        let outcome = decode_product(record, &loaded.collection)
            .and_then(|product| loaded.collection.add(product));
        if let Err(err) = outcome {
            if !skip_invalid {
                return Err(anyhow::Error::new(err)
                    .context(format!("Record #{} was rejected", index + 1)));
            }
            warn!(record = index + 1, error = %err, "skipping invalid record");
            loaded.skipped.push(format!("Record #{}: {}", index + 1, err));
        }
    }
    Ok(loaded)
}

/// Read the store into a collection. A store that does not exist yet is an
/// empty collection.
pub fn load(store: &dyn Store, skip_invalid: bool) -> Result<Loaded> {
    let loaded = match store.read()? {
        Some(bytes) => decode(&bytes, skip_invalid)
            .with_context(|| format!("Failed to load {}", store.describe()))?,
        None => {
            info!(store = %store.describe(), "store does not exist yet, starting empty");
            decode(&[], skip_invalid)?
        }
    };
    info!(
        size = loaded.collection.len(),
        skipped = loaded.skipped.len(),
        "collection loaded"
    );
    Ok(loaded)
}

/// Write the whole collection to the store. Returns the number of products
/// written.
pub fn save(store: &dyn Store, collection: &ProductCollection) -> Result<usize> {
    let bytes = encode(collection)?;
    store
        .write(&bytes)
        .with_context(|| format!("Failed to save {}", store.describe()))?;
    info!(size = collection.len(), store = %store.describe(), "collection saved");
    Ok(collection.len())
}

fn decode_product(record: &Value, collection: &ProductCollection) -> StockResult<Product> {
    let record = as_object(record, "product")?;
    let mut builder = ProductBuilder::new();

    builder.set_name(literal(record, "Name", "name")?.as_deref())?;
    let coordinates = match required(record, "Coordinates", "coordinates")? {
        Value::Null => None,
        value => Some(decode_coordinates(value)?),
    };
    builder.set_coordinates(coordinates)?;
    builder.set_price(literal(record, "Price", "price")?.as_deref())?;
    builder.set_part_number(
        literal(record, "PartNumber", "partNumber")?.as_deref(),
        collection.used_part_numbers(),
    )?;
    builder.set_manufacture_cost(literal(record, "ManufactureCost", "manufactureCost")?.as_deref())?;
    builder.set_unit_of_measure(literal(record, "UnitOfMeasure", "unitOfMeasure")?.as_deref())?;
    let manufacturer = match required(record, "Manufacturer", "manufacturer")? {
        Value::Null => None,
        value => Some(decode_organization(value)?),
    };
    builder.set_manufacturer(manufacturer)?;
    builder.set_id(
        literal(record, "Id", "id")?.as_deref(),
        collection.used_ids(),
    )?;
    builder.set_creation_date(literal(record, "CreationDate", "creationDate")?.as_deref())?;

    builder.build()
}

fn decode_coordinates(value: &Value) -> StockResult<Coordinates> {
    let record = as_object(value, "coordinates")?;
    let mut builder = CoordinatesBuilder::new();
    builder.set_x(literal(record, "X", "x")?.as_deref())?;
    builder.set_y(literal(record, "Y", "y")?.as_deref())?;
    builder.build()
}

/// Manufacturer ids are only unique within their own record: several
/// products may share one manufacturer.
fn decode_organization(value: &Value) -> StockResult<Organization> {
    let record = as_object(value, "manufacturer")?;
    let mut builder = OrganizationBuilder::new();
    builder.set_name(literal(record, "Name", "name")?.as_deref())?;
    builder.set_full_name(literal(record, "FullName", "fullName")?.as_deref())?;
    builder.set_annual_turnover(literal(record, "AnnualTurnover", "annualTurnover")?.as_deref())?;
    builder.set_employees_count(literal(record, "EmployeesCount", "employeesCount")?.as_deref())?;
    builder.set_id(literal(record, "Id", "id")?.as_deref(), &NoKeys)?;
    builder.build()
}

fn as_object<'v>(value: &'v Value, field: &'static str) -> StockResult<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        StockError::input(
            field,
            format!("expected a JSON object, found {}", kind_of(value)),
        )
    })
}

fn required<'v>(
    record: &'v Map<String, Value>,
    key: &str,
    field: &'static str,
) -> StockResult<&'v Value> {
    record
        .get(key)
        .ok_or_else(|| StockError::input(field, format!("key '{}' is missing from the record", key)))
}

/// The textual literal behind a scalar field; `null` is absent.
fn literal(
    record: &Map<String, Value>,
    key: &str,
    field: &'static str,
) -> StockResult<Option<String>> {
    match required(record, key, field)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(StockError::input(
            field,
            format!("expected a string or number, found {}", kind_of(other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
