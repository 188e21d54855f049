//! Built-in reference data loaded into an empty catalog.

use crate::catalog::store::{CarMake, CarModel, CarType};

const MAKES: &[(&str, &str)] = &[
    ("NISSAN", "Great cars. Japanese technology"),
    ("Mercedes", "Great cars. German technology"),
    ("Audi", "Great cars. German technology"),
    ("Kia", "Great cars. Korean technology"),
    ("Toyota", "Great cars. Japanese technology"),
];

const MODELS: &[(&str, &str, CarType, u16)] = &[
    ("Pathfinder", "NISSAN", CarType::Suv, 2023),
    ("Qashqai", "NISSAN", CarType::Suv, 2023),
    ("XTRAIL", "NISSAN", CarType::Suv, 2023),
    ("A-Class", "Mercedes", CarType::Suv, 2023),
    ("C-Class", "Mercedes", CarType::Suv, 2023),
    ("E-Class", "Mercedes", CarType::Suv, 2023),
    ("A4", "Audi", CarType::Suv, 2023),
    ("A5", "Audi", CarType::Suv, 2023),
    ("A6", "Audi", CarType::Suv, 2023),
    ("Sorrento", "Kia", CarType::Suv, 2023),
    ("Carnival", "Kia", CarType::Suv, 2023),
    ("Cerato", "Kia", CarType::Sedan, 2023),
    ("Corolla", "Toyota", CarType::Sedan, 2023),
    ("Camry", "Toyota", CarType::Sedan, 2023),
    ("Kluger", "Toyota", CarType::Suv, 2023),
];

pub(crate) fn seed_data() -> (Vec<CarMake>, Vec<CarModel>) {
    let makes = MAKES
        .iter()
        .map(|(name, description)| CarMake {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();

    let models = MODELS
        .iter()
        .map(|(name, make, body_type, year)| CarModel {
            name: name.to_string(),
            make: make.to_string(),
            body_type: *body_type,
            year: *year,
            dealer_id: None,
        })
        .collect();

    (makes, models)
}
