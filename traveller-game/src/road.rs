use std::cmp::Ordering;

use crate::city::{City, CityId};

/// Directed edge between two cities. A physical road is two of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Road {
    from: CityId,
    to: CityId,
    length: u32,
}

impl Road {
    #[must_use]
    pub const fn new(from: CityId, to: CityId, length: u32) -> Self {
        Self { from, to, length }
    }

    #[must_use]
    pub const fn from(&self) -> CityId {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> CityId {
        self.to
    }

    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Order by origin city, then destination city, then length.
    ///
    /// Cities compare by name first, so the arena the ids point into is needed.
    #[must_use]
    pub fn cmp_in(&self, other: &Self, cities: &[City]) -> Ordering {
        let city = |id: CityId| &cities[id.index()];
        city(self.from)
            .cmp(city(other.from))
            .then_with(|| city(self.to).cmp(city(other.to)))
            .then(self.length.cmp(&other.length))
    }
}
