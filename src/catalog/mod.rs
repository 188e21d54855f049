//! Car make/model catalog.

mod seed;
pub mod store;

pub use store::{CarCatalog, CarMake, CarModel, CarType, InMemoryCatalog};
