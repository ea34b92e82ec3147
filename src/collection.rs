//! The ordered product collection and its uniqueness indices.
//!
//! Products live in a `BTreeMap` keyed by [`OrderKey`] (price, then id), so
//! inserts and removals are `O(log n)` and ordered views are free. Two
//! indices ride along:
//!
//! - `keys`: id -> order key, which is both the set of used ids and the way to
//!   find a product by id without a scan
//! - `part_numbers`: every non-absent part number in use
//!
//! Both are only touched by the methods below, so they always describe
//! exactly the products present.
//!
//! Views ([`ProductCollection::ascending`], [`ProductCollection::head_set`],
//! ...) borrow the collection, so it cannot be mutated while one is alive.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{StockError, StockResult};
use crate::model::product::compare_prices;
use crate::model::{Organization, Product};
use crate::validator::KeySet;

/// Sort position of a product: price order, ties broken by ascending id.
#[derive(Debug, Clone, Copy)]
pub struct OrderKey {
    price: Option<f64>,
    id: i64,
}

impl OrderKey {
    pub fn of(product: &Product) -> Self {
        Self {
            price: product.price(),
            id: product.id(),
        }
    }

    /// Smallest key carrying `price`; everything below it is strictly
    /// cheaper.
    fn floor(price: Option<f64>) -> Self {
        Self {
            price,
            id: i64::MIN,
        }
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_prices(self.price, other.price).then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

#[derive(Debug)]
pub struct ProductCollection {
    items: BTreeMap<OrderKey, Product>,
    keys: HashMap<i64, OrderKey>,
    part_numbers: HashSet<String>,
    created_at: DateTime<Utc>,
}

impl Default for ProductCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCollection {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            keys: HashMap::new(),
            part_numbers: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Name reported by `info`.
    pub fn kind(&self) -> &'static str {
        "BTreeMap<price, id>"
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids in use, for builder uniqueness checks.
    pub fn used_ids(&self) -> &dyn KeySet<i64> {
        &self.keys
    }

    /// Part numbers in use, for builder uniqueness checks.
    pub fn used_part_numbers(&self) -> &HashSet<String> {
        &self.part_numbers
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.keys.keys().copied()
    }

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.keys.get(&id).and_then(|key| self.items.get(key))
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.keys.contains_key(&id)
    }

    /// Insert a product built against this collection's key sets.
    ///
    /// The builder is expected to have checked uniqueness already; a clash
    /// here still fails instead of breaking the indices.
    pub fn add(&mut self, product: Product) -> StockResult<()> {
        if self.keys.contains_key(&product.id()) {
            return Err(StockError::validation(
                "id",
                format!("Product with id {} already exists", product.id()),
            ));
        }
        if let Some(part) = product.part_number() {
            if self.part_numbers.contains(part) {
                return Err(StockError::validation(
                    "partNumber",
                    format!("PartNumber '{}' is already used", part),
                ));
            }
        }

        let key = OrderKey::of(&product);
        if let Some(part) = product.part_number() {
            self.part_numbers.insert(part.to_string());
        }
        self.keys.insert(product.id(), key);
        debug!(id = product.id(), size = self.items.len() + 1, "product added");
        self.items.insert(key, product);
        Ok(())
    }

    /// Remove and return the product with `id`, if present.
    pub fn take(&mut self, id: i64) -> Option<Product> {
        let key = self.keys.remove(&id)?;
        let product = self.items.remove(&key)?;
        if let Some(part) = product.part_number() {
            self.part_numbers.remove(part);
        }
        debug!(id, size = self.items.len(), "product removed");
        Some(product)
    }

    /// Returns whether a product was removed. A missing id is not an error.
    pub fn remove_by_id(&mut self, id: i64) -> bool {
        self.take(id).is_some()
    }

    /// Swap the product stored under `id` for `product`.
    ///
    /// Either the swap happens completely or the collection is left as it
    /// was. Returns the replaced product.
    pub fn replace(&mut self, id: i64, product: Product) -> StockResult<Product> {
        let old = self.take(id).ok_or(StockError::NotFound(id))?;
        match self.add(product) {
            Ok(()) => Ok(old),
            Err(err) => {
                // the old product's keys were free a moment ago
                self.add(old)?;
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.keys.clear();
        self.part_numbers.clear();
        debug!("collection cleared");
    }

    pub fn min(&self) -> StockResult<&Product> {
        self.items
            .values()
            .next()
            .ok_or(StockError::EmptyCollection)
    }

    /// Products strictly cheaper than `bound` under the price order.
    ///
    /// Products with the same price as `bound`, and `bound` itself, are not
    /// included.
    pub fn head_set(&self, bound: &Product) -> impl DoubleEndedIterator<Item = &Product> + '_ {
        self.items
            .range(..OrderKey::floor(bound.price()))
            .map(|(_, product)| product)
    }

    /// Remove everything [`Self::head_set`] yields, returning the removed
    /// products in ascending order.
    pub fn remove_lower(&mut self, bound: &Product) -> Vec<Product> {
        let ids: Vec<i64> = self.head_set(bound).map(Product::id).collect();
        ids.into_iter().filter_map(|id| self.take(id)).collect()
    }

    pub fn ascending(&self) -> impl DoubleEndedIterator<Item = &Product> + ExactSizeIterator + '_ {
        self.items.values()
    }

    pub fn descending(&self) -> impl Iterator<Item = &Product> + ExactSizeIterator + '_ {
        self.items.values().rev()
    }

    /// Count products whose manufacturer is absent or has a lower turnover
    /// than `reference`.
    pub fn count_manufacturer_below(&self, reference: &Organization) -> usize {
        self.items
            .values()
            .filter(|product| match product.manufacturer() {
                None => true,
                Some(org) => org.turnover_cmp(reference) == Ordering::Less,
            })
            .count()
    }

    /// Manufacturers of all products, highest turnover first.
    pub fn manufacturers_descending(&self) -> Vec<&Organization> {
        let mut orgs: Vec<&Organization> = self
            .items
            .values()
            .filter_map(Product::manufacturer)
            .collect();
        orgs.sort_by(|a, b| b.cmp(a));
        orgs
    }
}
