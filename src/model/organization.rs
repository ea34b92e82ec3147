use std::cmp::Ordering;
use std::fmt;

use crate::error::{StockError, StockResult};
use crate::identity::IdentityHasher;
use crate::validator::{FieldValue, KeySet, Validator};

use super::{parse_int, render_opt};

/// A manufacturer.
///
/// Organizations order by annual turnover; an absent turnover sorts after
/// every present one. [`Organization::turnover_cmp`] is that order alone, the
/// [`Ord`] impl refines it with the remaining fields so it agrees with `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Organization {
    name: String,
    full_name: Option<String>,
    annual_turnover: Option<i64>,
    employees_count: Option<i64>,
    id: i64,
}

impl Organization {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn annual_turnover(&self) -> Option<i64> {
        self.annual_turnover
    }

    pub fn employees_count(&self) -> Option<i64> {
        self.employees_count
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn turnover_cmp(&self, other: &Organization) -> Ordering {
        match (self.annual_turnover, other.annual_turnover) {
            (Some(a), Some(b)) => a.cmp(&b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
        }
    }

    /// Feed this organization into a product's identity.
    pub(crate) fn hash_into(&self, hasher: &mut IdentityHasher) {
        hasher
            .str(&self.name)
            .opt_str(self.full_name.as_deref())
            .opt_int(self.annual_turnover)
            .opt_int(self.employees_count)
            .int(self.id);
    }
}

impl Ord for Organization {
    fn cmp(&self, other: &Self) -> Ordering {
        self.turnover_cmp(other)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.full_name.cmp(&other.full_name))
            .then_with(|| self.employees_count.cmp(&other.employees_count))
    }
}

impl PartialOrd for Organization {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FieldValue for Organization {}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Organization(Name={}, FullName={}, AnnualTurnover={}, EmployeesCount={}, Id={})",
            self.name,
            render_opt(&self.full_name),
            render_opt(&self.annual_turnover),
            render_opt(&self.employees_count),
            self.id
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationBuilder {
    name: Option<String>,
    full_name: Option<String>,
    annual_turnover: Option<i64>,
    employees_count: Option<i64>,
    id: Option<i64>,
}

impl OrganizationBuilder {
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

    pub fn set_full_name(&mut self, raw: Option<&str>) -> StockResult<()> {
        self.full_name = raw.map(str::to_string);
        Ok(())
    }

    pub fn set_annual_turnover(&mut self, raw: Option<&str>) -> StockResult<()> {
        let turnover = parse_int("annualTurnover", "AnnualTurnover", raw)?;
        Validator::nullable()
            .then(Validator::positive("AnnualTurnover must be more than zero"))
            .check("annualTurnover", turnover.as_ref())?;
        self.annual_turnover = turnover;
        Ok(())
    }

    pub fn set_employees_count(&mut self, raw: Option<&str>) -> StockResult<()> {
        let count = parse_int("employeesCount", "EmployeesCount", raw)?;
        Validator::nullable()
            .then(Validator::positive("EmployeesCount must be more than zero"))
            .check("employeesCount", count.as_ref())?;
        self.employees_count = count;
        Ok(())
    }

    /// Absent means "derive at build time".
    pub fn set_id(&mut self, raw: Option<&str>, used: &dyn KeySet<i64>) -> StockResult<()> {
        let id = parse_int("id", "Id", raw)?;
        Validator::nullable()
            .then(Validator::positive("Id must be more than zero"))
            .then(Validator::unique(
                used,
                "Such id already exists. They can't be repeated",
            ))
            .check("id", id.as_ref())?;
        self.id = id;
        Ok(())
    }

    pub fn build(&self) -> StockResult<Organization> {
        let name = self.name.clone().ok_or(StockError::IncompleteEntity {
            entity: "Organization",
            field: "name",
        })?;
        let id = self.id.unwrap_or_else(|| self.fallback_id(&name));
        Ok(Organization {
            name,
            full_name: self.full_name.clone(),
            annual_turnover: self.annual_turnover,
            employees_count: self.employees_count,
            id,
        })
    }

    fn fallback_id(&self, name: &str) -> i64 {
        IdentityHasher::new()
            .str(name)
            .opt_str(self.full_name.as_deref())
            .opt_int(self.annual_turnover)
            .opt_int(self.employees_count)
            .finish()
    }
}

impl From<&Organization> for OrganizationBuilder {
    fn from(organization: &Organization) -> Self {
        Self {
            name: Some(organization.name.clone()),
            full_name: organization.full_name.clone(),
            annual_turnover: organization.annual_turnover,
            employees_count: organization.employees_count,
            id: Some(organization.id),
        }
    }
}
