//! Field-by-field construction of products and organizations.
//!
//! Each field is read from the current [`LineSource`] and handed to the
//! matching builder setter. An empty line means "absent". When a person is
//! typing, a rejected value is reported and the same field asked again; a
//! script gets no second chance and the command fails.

use anyhow::{bail, Result};

use super::input::LineSource;
use super::ui::Output;
use crate::error::StockResult;
use crate::model::{
    CoordinatesBuilder, Organization, OrganizationBuilder, Product, ProductBuilder, UnitOfMeasure,
};
use crate::validator::KeySet;

pub struct Prompter<'a> {
    input: &'a mut dyn LineSource,
    output: &'a Output,
}

impl<'a> Prompter<'a> {
    pub fn new(input: &'a mut dyn LineSource, output: &'a Output) -> Self {
        Self { input, output }
    }

    /// Ask for every product field.
    ///
    /// A `seed` keeps its id and creation date. `part_numbers` is the set the
    /// part number must not collide with.
    pub fn product(
        &mut self,
        seed: Option<&Product>,
        part_numbers: &dyn KeySet<String>,
    ) -> Result<Product> {
        let mut builder = seed.map(ProductBuilder::from).unwrap_or_default();
        let mut coordinates = CoordinatesBuilder::new();

        self.field("Name (String)", |raw| builder.set_name(raw))?;
        self.field("Coordinates.x (Long, at most 6)", |raw| {
            coordinates.set_x(raw)
        })?;
        self.field("Coordinates.y (Long)", |raw| {
            coordinates.set_y(raw)?;
            builder.set_coordinates(Some(coordinates.build()?))
        })?;
        self.field("Price (Double)", |raw| builder.set_price(raw))?;
        self.field("PartNumber (String)", |raw| {
            builder.set_part_number(raw, part_numbers)
        })?;
        self.field("ManufactureCost (Double)", |raw| {
            builder.set_manufacture_cost(raw)
        })?;
        let units = UnitOfMeasure::ALL
            .iter()
            .map(UnitOfMeasure::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        self.field(&format!("UnitOfMeasure ({})", units), |raw| {
            builder.set_unit_of_measure(raw)
        })?;

        let manufacturer = self.organization("Manufacturer", true)?;
        builder.set_manufacturer(manufacturer)?;

        Ok(builder.build()?)
    }

    /// Ask for an organization. With `optional`, an empty name means there is
    /// none and the remaining fields are skipped.
    pub fn organization(&mut self, prefix: &str, optional: bool) -> Result<Option<Organization>> {
        let mut builder = OrganizationBuilder::new();
        let mut present = true;

        let name_label = if optional {
            format!("{}.name (String, empty for none)", prefix)
        } else {
            format!("{}.name (String)", prefix)
        };
        self.field(&name_label, |raw| {
            if optional && raw.is_none() {
                present = false;
                return Ok(());
            }
            builder.set_name(raw)
        })?;
        if !present {
            return Ok(None);
        }

        self.field(&format!("{}.fullName (String)", prefix), |raw| {
            builder.set_full_name(raw)
        })?;
        self.field(&format!("{}.annualTurnover (Long)", prefix), |raw| {
            builder.set_annual_turnover(raw)
        })?;
        self.field(&format!("{}.employeesCount (Long)", prefix), |raw| {
            builder.set_employees_count(raw)
        })?;

        Ok(Some(builder.build()?))
    }

    fn field<F>(&mut self, label: &str, mut apply: F) -> Result<()>
    where
        F: FnMut(Option<&str>) -> StockResult<()>,
    {
        loop {
            let Some(line) = self.input.next_line(Some(label), self.output)? else {
                bail!("Input ended while reading {}", label);
            };
            let raw = if line.is_empty() { None } else { Some(line.as_str()) };
            match apply(raw) {
                Ok(()) => return Ok(()),
                Err(err) if err.is_retryable() && self.input.is_interactive() => {
                    self.output.error(&err.to_string());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
