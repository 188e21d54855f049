//! Car make/model reference data.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::catalog::seed;

/// Body style of a car model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CarType {
    Sedan,
    Suv,
    Wagon,
}

/// A car manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarMake {
    pub name: String,
    pub description: String,
}

/// A model belonging to exactly one make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarModel {
    pub name: String,
    pub make: String,
    pub body_type: CarType,
    pub year: u16,
    pub dealer_id: Option<u64>,
}

/// Capability interface for the reference tables.
pub trait CarCatalog: Send + Sync {
    /// Number of makes currently stored.
    fn make_count(&self) -> usize;

    /// Load the seed data if the make table is empty. Returns the number of
    /// models inserted (0 when already populated). Safe to call concurrently.
    fn populate(&self) -> usize;

    /// All models, in insertion order.
    fn models(&self) -> Vec<CarModel>;

    /// Populate on first use.
    fn ensure_populated(&self) {
        if self.make_count() == 0 {
            let inserted = self.populate();
            if inserted > 0 {
                tracing::info!(models = inserted, "Car catalog populated");
            }
        }
    }
}

#[derive(Default)]
struct Tables {
    makes: Vec<CarMake>,
    models: Vec<CarModel>,
}

/// Process-local catalog.
#[derive(Default)]
pub struct InMemoryCatalog {
    tables: RwLock<Tables>,
}

impl InMemoryCatalog {
    /// An empty catalog; filled from the seed set on first `ensure_populated`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog with explicit contents. Models must reference existing makes.
    pub fn with_data(makes: Vec<CarMake>, models: Vec<CarModel>) -> Self {
        debug_assert!(models.iter().all(|m| makes.iter().any(|k| k.name == m.make)));
        Self {
            tables: RwLock::new(Tables { makes, models }),
        }
    }
}

impl CarCatalog for InMemoryCatalog {
    fn make_count(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).makes.len()
    }

    fn populate(&self) -> usize {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if !tables.makes.is_empty() {
            return 0;
        }
        let (makes, models) = seed::seed_data();
        let inserted = models.len();
        tables.makes = makes;
        tables.models = models;
        inserted
    }

    fn models(&self) -> Vec<CarModel> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).models.clone()
    }
}
