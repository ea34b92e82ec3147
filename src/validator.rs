//! Composable validator chains for field values.
//!
//! A [`Validator`] is one link: a rule, the message reported when the rule
//! rejects, and an optional next link that runs only after this one passed.
//! Chains are built with [`Validator::then`]:
//!
//! ```
//! use std::collections::HashSet;
//! use stockroom::validator::Validator;
//!
//! let used: HashSet<i64> = [3].into_iter().collect();
//! let chain = Validator::not_null("Id can't be null")
//!     .then(Validator::positive("Id must be more than zero"))
//!     .then(Validator::unique(&used, "Such id already exists"));
//!
//! assert!(chain.check("id", Some(&7)).is_ok());
//! assert!(chain.check("id", Some(&3)).is_err());
//! assert!(chain.check("id", None).is_err());
//! ```
//!
//! Only [`Validator::not_null`] and [`Validator::nullable`] accept an absent
//! value. Any other link that receives one reports
//! [`StockError::Invariant`]: that is a wiring bug, not bad user input.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::error::{StockError, StockResult};

/// A set of keys already taken, consulted by uniqueness links.
pub trait KeySet<T: ?Sized> {
    fn is_taken(&self, value: &T) -> bool;
}

impl<T: Eq + Hash> KeySet<T> for HashSet<T> {
    fn is_taken(&self, value: &T) -> bool {
        self.contains(value)
    }
}

impl<T: Eq + Hash, V> KeySet<T> for HashMap<T, V> {
    fn is_taken(&self, value: &T) -> bool {
        self.contains_key(value)
    }
}

/// The empty key set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeys;

impl<T: ?Sized> KeySet<T> for NoKeys {
    fn is_taken(&self, _value: &T) -> bool {
        false
    }
}

/// A key set with one value carved out.
///
/// Used when an existing record is re-validated: its own id or part number
/// must not count as a duplicate of itself.
pub struct Excluding<'a, T> {
    keys: &'a dyn KeySet<T>,
    own: Option<&'a T>,
}

impl<'a, T> Excluding<'a, T> {
    pub fn new(keys: &'a dyn KeySet<T>, own: Option<&'a T>) -> Self {
        Self { keys, own }
    }
}

impl<T: PartialEq> KeySet<T> for Excluding<'_, T> {
    fn is_taken(&self, value: &T) -> bool {
        if self.own == Some(value) {
            return false;
        }
        self.keys.is_taken(value)
    }
}

/// Values a validator chain can inspect.
pub trait FieldValue: PartialOrd {
    /// Whether the value counts as empty for [`Validator::not_empty`].
    fn is_blank(&self) -> bool {
        false
    }
}

impl FieldValue for i64 {}

impl FieldValue for f64 {}

impl FieldValue for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Numeric types with a zero, for [`Validator::positive`].
pub trait Zero {
    const ZERO: Self;
}

impl Zero for i64 {
    const ZERO: Self = 0;
}

impl Zero for f64 {
    const ZERO: Self = 0.0;
}

/// Relation a value must satisfy against a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Relation {
    /// NaN satisfies no relation.
    fn holds<T: PartialOrd>(self, value: &T, bound: &T) -> bool {
        match self {
            Relation::Less => value < bound,
            Relation::LessOrEqual => value <= bound,
            Relation::Greater => value > bound,
            Relation::GreaterOrEqual => value >= bound,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Less => write!(f, "<"),
            Relation::LessOrEqual => write!(f, "<="),
            Relation::Greater => write!(f, ">"),
            Relation::GreaterOrEqual => write!(f, ">="),
        }
    }
}

enum Rule<'a, T> {
    NotNull,
    Nullable,
    Compare { relation: Relation, bound: T },
    NotEmpty,
    Unique(&'a dyn KeySet<T>),
}

impl<T> Rule<'_, T> {
    fn name(&self) -> &'static str {
        match self {
            Rule::NotNull => "not-null",
            Rule::Nullable => "nullable",
            Rule::Compare { .. } => "comparison",
            Rule::NotEmpty => "not-empty",
            Rule::Unique(_) => "uniqueness",
        }
    }
}

/// One link of a validator chain.
pub struct Validator<'a, T> {
    rule: Rule<'a, T>,
    message: String,
    next: Option<Box<Validator<'a, T>>>,
}

impl<'a, T: FieldValue> Validator<'a, T> {
    fn link(rule: Rule<'a, T>, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            next: None,
        }
    }

    /// Rejects an absent value.
    pub fn not_null(message: impl Into<String>) -> Self {
        Self::link(Rule::NotNull, message)
    }

    /// Accepts an absent value without running the rest of the chain.
    pub fn nullable() -> Self {
        Self::link(Rule::Nullable, "")
    }

    pub fn compare(relation: Relation, bound: T, message: impl Into<String>) -> Self {
        Self::link(Rule::Compare { relation, bound }, message)
    }

    pub fn not_empty(message: impl Into<String>) -> Self {
        Self::link(Rule::NotEmpty, message)
    }

    pub fn unique(keys: &'a dyn KeySet<T>, message: impl Into<String>) -> Self {
        Self::link(Rule::Unique(keys), message)
    }

    /// Append `next` at the end of this chain.
    pub fn then(mut self, next: Validator<'a, T>) -> Self {
        let mut tail = &mut self.next;
        while let Some(link) = tail {
            tail = &mut link.next;
        }
        *tail = Some(Box::new(next));
        self
    }

    /// Run the whole chain against `value`, reporting failures on `field`.
    pub fn check(&self, field: &'static str, value: Option<&T>) -> StockResult<()> {
        let mut current = Some(self);
        while let Some(link) = current {
            let value = match (&link.rule, value) {
                (Rule::NotNull, None) => {
                    return Err(StockError::validation(field, link.message.clone()))
                }
                (Rule::Nullable, None) => return Ok(()),
                (rule, None) => {
                    return Err(StockError::Invariant(format!(
                        "absent value for '{}' reached a {} check",
                        field,
                        rule.name()
                    )))
                }
                (_, Some(value)) => value,
            };

            let accepted = match &link.rule {
                Rule::NotNull | Rule::Nullable => true,
                Rule::Compare { relation, bound } => relation.holds(value, bound),
                Rule::NotEmpty => !value.is_blank(),
                Rule::Unique(keys) => !keys.is_taken(value),
            };
            if !accepted {
                return Err(StockError::validation(field, link.message.clone()));
            }

            current = link.next.as_deref();
        }
        Ok(())
    }
}

impl<'a, T: FieldValue + Zero> Validator<'a, T> {
    /// Value must be strictly greater than zero.
    pub fn positive(message: impl Into<String>) -> Self {
        Self::compare(Relation::Greater, T::ZERO, message)
    }
}
