//! Countries own cities and the roads leaving them.
//!
//! Each country keeps its own view of the road network: a road is stored
//! under a city only when this country owns that city. A road between two
//! countries therefore shows up once in each country's view, each time
//! leaving the city that country owns.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::city::{City, CityId};
use crate::position::Position;
use crate::road::Road;
use crate::rng::GameRng;
use crate::settings::Settings;

/// Index of a country in its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryId(pub(crate) u32);

impl CountryId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a country generates the bonus paid on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryKind {
    #[default]
    Plain,
    /// Robs arriving travellers with the configured risk instead of paying.
    Mafia,
}

impl CountryKind {
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "plain" => Some(Self::Plain),
            "mafia" => Some(Self::Mafia),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Country {
    id: CountryId,
    name: String,
    kind: CountryKind,
    /// Owned cities ordered by (name, home country).
    cities: BTreeMap<(String, CountryId), CityId>,
    /// Outgoing roads per owned city, ordered by [`Road::cmp_in`].
    roads: HashMap<CityId, Vec<Road>>,
}

impl Country {
    pub(crate) fn new(id: CountryId, name: impl Into<String>, kind: CountryKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            cities: BTreeMap::new(),
            roads: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> CountryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> CountryKind {
        self.kind
    }

    /// Register `city` with an empty road set, replacing any earlier entry.
    pub fn add_city(&mut self, city: CityId, cities: &[City]) {
        let entry = &cities[city.index()];
        self.cities
            .insert((entry.name().to_string(), entry.country()), city);
        self.roads.insert(city, Vec::new());
    }

    #[must_use]
    pub fn owns(&self, city: CityId) -> bool {
        self.roads.contains_key(&city)
    }

    /// Owned cities in name order.
    pub fn cities(&self) -> impl Iterator<Item = CityId> + '_ {
        self.cities.values().copied()
    }

    #[must_use]
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// First owned city called `name`.
    #[must_use]
    pub fn city(&self, name: &str) -> Option<CityId> {
        self.cities
            .iter()
            .find(|((city_name, _), _)| city_name == name)
            .map(|(_, id)| *id)
    }

    /// Owned city called `name` whose home is this country.
    pub(crate) fn home_city(&self, name: &str) -> Option<CityId> {
        self.cities.get(&(name.to_string(), self.id)).copied()
    }

    /// Outgoing roads registered under `city` in this country's view.
    #[must_use]
    pub fn roads(&self, city: CityId) -> &[Road] {
        self.roads.get(&city).map(Vec::as_slice).unwrap_or_default()
    }

    /// Connect `a` and `b` as far as this country is concerned.
    ///
    /// Self-loops and non-positive lengths are ignored, as are cities this
    /// country does not own.
    pub fn add_roads(&mut self, a: CityId, b: CityId, length: i64, cities: &[City]) {
        let Ok(length) = u32::try_from(length) else {
            return;
        };
        if length == 0 || a == b {
            return;
        }
        if self.owns(a) {
            self.insert_road(Road::new(a, b, length), cities);
        }
        if self.owns(b) {
            self.insert_road(Road::new(b, a, length), cities);
        }
    }

    fn insert_road(&mut self, road: Road, cities: &[City]) {
        let Some(set) = self.roads.get_mut(&road.from()) else {
            return;
        };
        if let Err(slot) = set.binary_search_by(|existing| existing.cmp_in(&road, cities)) {
            set.insert(slot, road);
        }
    }

    /// Parked position at `city`, if this country owns it.
    #[must_use]
    pub fn position(&self, city: CityId) -> Option<Position> {
        self.owns(city).then(|| Position::stationary(city))
    }

    /// Position at the start of the road from `from` to `to`.
    ///
    /// Looks for the road under `from` first, then for the same connection
    /// registered under `to`. Without a road the traveller stays at `from`.
    #[must_use]
    pub fn ready_to_travel(&self, from: CityId, to: CityId) -> Position {
        if from == to {
            return Position::stationary(from);
        }
        self.roads(from)
            .iter()
            .find(|road| road.to() == to)
            .or_else(|| self.roads(to).iter().find(|road| road.to() == from))
            .map_or_else(
                || Position::stationary(from),
                |road| Position::new(from, to, road.length()),
            )
    }

    /// Restore every owned city to its initial value.
    pub fn reset(&self, cities: &mut [City]) {
        for id in self.cities.values() {
            cities[id.index()].reset();
        }
    }

    /// Signed bonus for a city worth `max_value`; see [`CountryKind::bonus`].
    pub fn bonus(&self, max_value: i64, rng: &mut GameRng, settings: &Settings) -> i64 {
        self.kind.bonus(max_value, rng, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityKind;

    struct Fixture {
        cities: Vec<City>,
        one: Country,
        two: Country,
    }

    // A(80) and C(40) live in country one, B(60) in country two.
    fn fixture() -> Fixture {
        let one_id = CountryId(0);
        let two_id = CountryId(1);
        let cities = vec![
            City::new("City A", 80, one_id, CityKind::Plain),
            City::new("City B", 60, two_id, CityKind::Plain),
            City::new("City C", 40, one_id, CityKind::Plain),
        ];
        Fixture {
            cities,
            one: Country::new(one_id, "Country 1", CountryKind::Plain),
            two: Country::new(two_id, "Country 2", CountryKind::Mafia),
        }
    }

    const A: CityId = CityId(0);
    const B: CityId = CityId(1);
    const C: CityId = CityId(2);

    #[test]
    fn cities_are_listed_in_name_order() {
        let mut f = fixture();
        f.one.add_city(C, &f.cities);
        f.one.add_city(A, &f.cities);
        f.one.add_city(B, &f.cities);
        f.two.add_city(B, &f.cities);
        assert_eq!(f.one.cities().collect::<Vec<_>>(), vec![A, B, C]);
        assert_eq!(f.two.city_count(), 1);
    }

    #[test]
    fn city_lookup_by_name() {
        let mut f = fixture();
        f.one.add_city(A, &f.cities);
        f.one.add_city(B, &f.cities);
        f.two.add_city(B, &f.cities);
        assert_eq!(f.one.city("City A"), Some(A));
        assert_eq!(f.one.city("City B"), Some(B));
        assert_eq!(f.two.city("City A"), None);
        f.two.add_city(A, &f.cities);
        assert_eq!(f.two.city("City A"), Some(A));
    }

    #[test]
    fn roads_accumulate_per_owned_city() {
        let mut f = fixture();
        assert!(f.one.roads(A).is_empty());
        for id in [A, B, C] {
            f.one.add_city(id, &f.cities);
        }
        f.one.add_roads(A, B, 5, &f.cities);
        assert_eq!(f.one.roads(A).len(), 1);
        f.one.add_roads(C, A, 5, &f.cities);
        assert_eq!(f.one.roads(A).len(), 2);
        f.one.add_roads(C, B, 2, &f.cities);
        assert_eq!(f.one.roads(A).len(), 2);
        assert_eq!(f.one.roads(B).len(), 2);
        assert_eq!(f.one.roads(C).len(), 2);
    }

    #[test]
    fn roads_are_sorted_and_deduplicated() {
        let mut f = fixture();
        for id in [A, B, C] {
            f.one.add_city(id, &f.cities);
        }
        f.one.add_roads(A, C, 3, &f.cities);
        f.one.add_roads(A, B, 4, &f.cities);
        f.one.add_roads(A, B, 4, &f.cities);
        let targets: Vec<CityId> = f.one.roads(A).iter().map(Road::to).collect();
        assert_eq!(targets, vec![B, C]);
    }

    #[test]
    fn invalid_edits_are_ignored() {
        let mut f = fixture();
        f.one.add_city(A, &f.cities);
        f.one.add_city(C, &f.cities);
        f.one.add_roads(A, A, 5, &f.cities);
        f.one.add_roads(A, C, 0, &f.cities);
        f.one.add_roads(A, C, -3, &f.cities);
        assert!(f.one.roads(A).is_empty());
        assert!(f.one.roads(C).is_empty());
    }

    #[test]
    fn cross_border_roads_leave_only_owned_cities() {
        let mut f = fixture();
        f.one.add_city(A, &f.cities);
        f.two.add_city(B, &f.cities);
        f.one.add_roads(A, B, 5, &f.cities);
        f.two.add_roads(A, B, 5, &f.cities);
        assert_eq!(f.one.roads(A), &[Road::new(A, B, 5)]);
        assert!(f.one.roads(B).is_empty());
        assert_eq!(f.two.roads(B), &[Road::new(B, A, 5)]);
        assert!(f.two.roads(A).is_empty());
    }

    #[test]
    fn ready_to_travel_finds_road_or_stays() {
        let mut f = fixture();
        f.one.add_city(A, &f.cities);
        f.one.add_city(C, &f.cities);
        f.one.add_roads(A, C, 4, &f.cities);
        assert_eq!(f.one.ready_to_travel(A, C), Position::new(A, C, 4));
        assert_eq!(f.one.ready_to_travel(A, A), Position::stationary(A));
        assert_eq!(f.one.ready_to_travel(A, B), Position::stationary(A));
    }

    #[test]
    fn ready_to_travel_falls_back_to_reverse_registration() {
        let mut f = fixture();
        f.two.add_city(B, &f.cities);
        f.two.add_roads(A, B, 6, &f.cities);
        // Only B -> A is known to country two; the trip A -> B reuses it.
        assert_eq!(f.two.ready_to_travel(A, B), Position::new(A, B, 6));
    }

    #[test]
    fn position_requires_ownership() {
        let mut f = fixture();
        f.one.add_city(A, &f.cities);
        assert_eq!(f.one.position(A), Some(Position::stationary(A)));
        assert_eq!(f.one.position(B), None);
    }

    #[test]
    fn reset_only_touches_owned_cities() {
        let mut f = fixture();
        f.one.add_city(A, &f.cities);
        f.one.add_city(B, &f.cities);
        f.two.add_city(C, &f.cities);
        for city in &mut f.cities {
            city.change_value(-7);
        }
        f.one.reset(&mut f.cities);
        assert_eq!(f.cities[A.index()].value(), 80);
        assert_eq!(f.cities[B.index()].value(), 60);
        assert_eq!(f.cities[C.index()].value(), 33);
    }

    #[test]
    fn re_adding_a_city_clears_its_roads() {
        let mut f = fixture();
        f.one.add_city(A, &f.cities);
        f.one.add_city(C, &f.cities);
        f.one.add_roads(A, C, 2, &f.cities);
        f.one.add_city(A, &f.cities);
        assert!(f.one.roads(A).is_empty());
        assert_eq!(f.one.roads(C).len(), 1);
        assert_eq!(f.one.city_count(), 2);
    }
}
