//! Cities: value-bearing nodes of the road network.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::country::CountryId;

/// Index of a city in its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(pub(crate) u32);

impl CityId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arrival behaviour of a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityKind {
    /// Pays a bonus drawn from its value.
    #[default]
    Plain,
    /// Also withholds a toll from travellers coming from another country.
    Border,
    /// Also takes a random share of the traveller's remaining money.
    Capital,
}

impl CityKind {
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "plain" => Some(Self::Plain),
            "border" => Some(Self::Border),
            "capital" => Some(Self::Capital),
            _ => None,
        }
    }

    #[must_use]
    pub const fn charges_toll(self) -> bool {
        matches!(self, Self::Border | Self::Capital)
    }
}

#[derive(Debug, Clone)]
pub struct City {
    name: String,
    initial_value: i64,
    value: i64,
    country: CountryId,
    kind: CityKind,
}

impl City {
    #[must_use]
    pub fn new(name: impl Into<String>, value: i64, country: CountryId, kind: CityKind) -> Self {
        Self {
            name: name.into(),
            initial_value: value,
            value,
            country,
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    #[must_use]
    pub const fn initial_value(&self) -> i64 {
        self.initial_value
    }

    /// Home country; the one whose bonus rules apply on arrival.
    #[must_use]
    pub const fn country(&self) -> CountryId {
        self.country
    }

    #[must_use]
    pub const fn kind(&self) -> CityKind {
        self.kind
    }

    pub const fn change_value(&mut self, amount: i64) {
        self.value += amount;
    }

    pub const fn reset(&mut self) {
        self.value = self.initial_value;
    }
}

impl PartialEq for City {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.country == other.country
    }
}

impl Eq for City {}

impl PartialOrd for City {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for City {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then(self.country.cmp(&other.country))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.value)
    }
}
