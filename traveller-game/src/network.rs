//! The whole map: a city arena plus every country's view of the roads.
use std::cmp::Ordering;

use crate::city::{City, CityId, CityKind};
use crate::country::{Country, CountryId, CountryKind};
use crate::position::Position;
use crate::revenue::{ArrivalOutcome, Traveller};
use crate::rng::GameRng;
use crate::road::Road;
use crate::settings::Settings;

#[derive(Debug, Clone, Default)]
pub struct Network {
    cities: Vec<City>,
    countries: Vec<Country>,
    /// Country ids sorted by country name.
    by_name: Vec<CountryId>,
}

impl Network {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a country, or return the existing one with the same name.
    pub fn add_country(&mut self, name: &str, kind: CountryKind) -> CountryId {
        if let Some(existing) = self.country_named(name) {
            return existing;
        }
        let id = CountryId(index_u32(self.countries.len()));
        self.countries.push(Country::new(id, name, kind));
        let slot = self
            .by_name
            .partition_point(|other| self.countries[other.index()].name() < name);
        self.by_name.insert(slot, id);
        id
    }

    /// Create a city in `country` and register it there.
    ///
    /// A second city with the same name in the same country overwrites the
    /// first in place: same id, new value and kind, no roads. Returns `None`
    /// for a country id that does not belong to this network.
    pub fn add_city(
        &mut self,
        country: CountryId,
        name: &str,
        value: i64,
        kind: CityKind,
    ) -> Option<CityId> {
        let home = self.countries.get(country.index())?;
        let city = City::new(name, value, country, kind);
        let id = if let Some(existing) = home.home_city(name) {
            self.cities[existing.index()] = city;
            existing
        } else {
            self.cities.push(city);
            CityId(index_u32(self.cities.len() - 1))
        };
        self.countries[country.index()].add_city(id, &self.cities);
        Some(id)
    }

    /// Let `country` own an existing city of another country as well.
    pub fn register_city(&mut self, country: CountryId, city: CityId) -> bool {
        if city.index() >= self.cities.len() {
            return false;
        }
        let Some(view) = self.countries.get_mut(country.index()) else {
            return false;
        };
        view.add_city(city, &self.cities);
        true
    }

    /// Connect `a` and `b` in every country's view.
    ///
    /// Self-loops, non-positive lengths and cities no country owns are
    /// ignored.
    pub fn add_roads(&mut self, a: CityId, b: CityId, length: i64) {
        for country in &mut self.countries {
            country.add_roads(a, b, length, &self.cities);
        }
    }

    /// # Panics
    ///
    /// Panics when `id` was not issued by this network.
    #[must_use]
    pub fn city(&self, id: CityId) -> &City {
        &self.cities[id.index()]
    }

    /// # Panics
    ///
    /// Panics when `id` was not issued by this network.
    pub fn city_mut(&mut self, id: CityId) -> &mut City {
        &mut self.cities[id.index()]
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city_ids(&self) -> impl Iterator<Item = CityId> + '_ {
        (0..self.cities.len()).map(|index| CityId(index_u32(index)))
    }

    /// First city called `name`, searching countries in name order.
    #[must_use]
    pub fn find_city(&self, name: &str) -> Option<CityId> {
        self.countries().find_map(|country| country.city(name))
    }

    /// # Panics
    ///
    /// Panics when `id` was not issued by this network.
    #[must_use]
    pub fn country(&self, id: CountryId) -> &Country {
        &self.countries[id.index()]
    }

    #[must_use]
    pub fn country_named(&self, name: &str) -> Option<CountryId> {
        self.countries
            .iter()
            .find(|country| country.name() == name)
            .map(Country::id)
    }

    /// Countries in name order.
    pub fn countries(&self) -> impl Iterator<Item = &Country> + '_ {
        self.by_name.iter().map(|id| &self.countries[id.index()])
    }

    #[must_use]
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// Home country of `city`.
    #[must_use]
    pub fn owner_of(&self, city: CityId) -> &Country {
        self.country(self.city(city).country())
    }

    /// Outgoing roads of `city` as its home country sees them.
    #[must_use]
    pub fn roads_from(&self, city: CityId) -> &[Road] {
        self.owner_of(city).roads(city)
    }

    /// Position for the trip `from` -> `to`.
    ///
    /// Asks the home country of `from`, then the home country of `to`, which
    /// is the only one that knows the road when it crosses a border the other
    /// way. Without any road the traveller stays at `from`.
    #[must_use]
    pub fn ready_to_travel(&self, from: CityId, to: CityId) -> Position {
        let departure = self.owner_of(from).ready_to_travel(from, to);
        if from == to || !departure.is_stationary() {
            return departure;
        }
        self.owner_of(to).ready_to_travel(from, to)
    }

    /// Restore every city to its initial value.
    pub fn reset_all(&mut self) {
        for view in &self.countries {
            view.reset(&mut self.cities);
        }
    }

    /// Resolve an arrival at `city` using its home country's bonus rules.
    pub fn arrive<T: Traveller + ?Sized>(
        &mut self,
        city: CityId,
        traveller: &mut T,
        rng: &mut GameRng,
        settings: &Settings,
    ) -> ArrivalOutcome {
        let kind = self.owner_of(city).kind();
        self.cities[city.index()].arrive_with(kind, traveller, rng, settings)
    }

    /// Road ordering by origin name, destination name, then length.
    #[must_use]
    pub fn compare_roads(&self, a: &Road, b: &Road) -> Ordering {
        a.cmp_in(b, &self.cities)
    }

    #[must_use]
    pub fn road_label(&self, road: &Road) -> String {
        format!(
            "{} -> {} : {}",
            self.city(road.from()).name(),
            self.city(road.to()).name(),
            road.length()
        )
    }
}

fn index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
