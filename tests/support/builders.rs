use stockroom::model::{
    CoordinatesBuilder, Organization, OrganizationBuilder, Product, ProductBuilder,
};
use stockroom::validator::NoKeys;

/// Products for engine tests, built through the real builders.
pub struct ProductFixture {
    id: Option<i64>,
    name: String,
    price: Option<f64>,
    part_number: Option<String>,
    manufacturer: Option<Organization>,
}

impl ProductFixture {
    pub fn new(id: i64) -> Self {
        Self {
            id: Some(id),
            name: format!("Product{}", id),
            price: None,
            part_number: None,
            manufacturer: None,
        }
    }

    /// No explicit id; the builder derives one.
    pub fn unnamed(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            price: None,
            part_number: None,
            manufacturer: None,
        }
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn part_number(mut self, part: &str) -> Self {
        self.part_number = Some(part.to_string());
        self
    }

    pub fn manufacturer(mut self, org: Organization) -> Self {
        self.manufacturer = Some(org);
        self
    }

    pub fn build(self) -> Product {
        let mut coordinates = CoordinatesBuilder::new();
        coordinates.set_x(Some("1")).unwrap();
        coordinates.set_y(Some("2")).unwrap();

        let price = self.price.map(|p| p.to_string());
        let id = self.id.map(|i| i.to_string());

        let mut builder = ProductBuilder::new();
        builder.set_name(Some(self.name.as_str())).unwrap();
        builder
            .set_coordinates(Some(coordinates.build().unwrap()))
            .unwrap();
        builder.set_price(price.as_deref()).unwrap();
        builder
            .set_part_number(self.part_number.as_deref(), &NoKeys)
            .unwrap();
        builder.set_manufacture_cost(Some("1.5")).unwrap();
        builder.set_manufacturer(self.manufacturer).unwrap();
        builder.set_id(id.as_deref(), &NoKeys).unwrap();
        builder
            .set_creation_date(Some("2024-03-01T10:00:00Z"))
            .unwrap();
        builder.build().unwrap()
    }
}

/// An organization with the given turnover and no other optional fields.
pub fn organization(name: &str, turnover: Option<i64>) -> Organization {
    let turnover = turnover.map(|t| t.to_string());
    let mut builder = OrganizationBuilder::new();
    builder.set_name(Some(name)).unwrap();
    builder.set_annual_turnover(turnover.as_deref()).unwrap();
    builder.build().unwrap()
}

/// Script lines answering every `add` prompt.
pub fn product_lines(name: &str, price: Option<&str>, part: Option<&str>) -> String {
    [
        name,
        "1",
        "2",
        price.unwrap_or(""),
        part.unwrap_or(""),
        "3.5",
        "MILLILITERS",
        "",
    ]
    .join("\n")
}

/// Script lines answering the manufacturer prompts of
/// `count_less_than_manufacturer`.
pub fn organization_lines(name: &str, turnover: &str) -> String {
    [name, "", turnover, ""].join("\n")
}
