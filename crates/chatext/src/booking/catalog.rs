//! Read-only reference data offered by the booking flow.

use serde::{Deserialize, Serialize};

/// A dealership where the test drive takes place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dealership {
    pub name: String,
    pub address: String,
}

/// A vehicle that can be booked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Stable identifier sent to the host on completion (e.g. `"r5i"`).
    pub id: String,
    pub name: String,
    /// Image URL rendered on the vehicle tile.
    pub image: String,
}

/// Built-in dealership list.
pub const DEALERSHIPS: &[(&str, &str)] = &[
    (
        "PARIS INTRA MUROS",
        "72 Rue DU FAUBOURG SAINT JACQUES, 75011 Paris",
    ),
    ("RENAULT MONTROUGE", "59 Avenue Aristide Briand, 75014 Paris"),
    (
        "PARIS SAINT-GERMAIN",
        "81 Boulevard Saint Germain, 75006 Paris",
    ),
    (
        "RENAULT PORTE DE VINCENNES",
        "55 Boulevard de Charonne, 75011 Paris",
    ),
];

/// Built-in vehicle list: `(id, name, image)`.
pub const VEHICLES: &[(&str, &str, &str)] = &[
    ("r5i", "R5 Iconic", "/images/r5Iconic.png"),
    ("r5t", "R5 Techno", "/images/r5Techno.png"),
];

/// Built-in bookable time slots.
pub const TIME_SLOTS: &[&str] = &["10:15-11:00 AM PST", "2:30-3:15 PM PST"];

/// The immutable catalogs a booking session renders from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub dealerships: Vec<Dealership>,
    pub vehicles: Vec<Vehicle>,
    pub time_slots: Vec<String>,
    pub countries: Vec<String>,
    pub default_country: String,
    pub consent_text: String,
}

impl Catalog {
    pub fn dealership(&self, name: &str) -> Option<&Dealership> {
        self.dealerships.iter().find(|d| d.name == name)
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }
}

pub(crate) fn default_dealerships() -> Vec<Dealership> {
    DEALERSHIPS
        .iter()
        .map(|(name, address)| Dealership {
            name: (*name).to_string(),
            address: (*address).to_string(),
        })
        .collect()
}

pub(crate) fn default_vehicles() -> Vec<Vehicle> {
    VEHICLES
        .iter()
        .map(|(id, name, image)| Vehicle {
            id: (*id).to_string(),
            name: (*name).to_string(),
            image: (*image).to_string(),
        })
        .collect()
}

pub(crate) fn default_time_slots() -> Vec<String> {
    TIME_SLOTS.iter().map(|s| (*s).to_string()).collect()
}
