//! Line-oriented map files.
//!
//! ```text
//! // comment
//! game     4242
//! country  Denmark
//! city     Copenhagen  100  capital
//! city     Padborg     40   border
//! country  Sweden      mafia
//! city     Malmo       70
//! road     Copenhagen  Malmo  3
//! position Copenhagen  310 220
//! ```
//!
//! Cities belong to the most recent `country`. Roads name their endpoints;
//! both must already exist. `position` and `background` lines carry screen
//! layout and are skipped. Unknown commands are logged and skipped.
use std::str::FromStr;

use log::warn;
use thiserror::Error;

use crate::city::{CityId, CityKind};
use crate::country::{CountryId, CountryKind};
use crate::game::Game;
use crate::network::Network;
use crate::settings::Settings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("line {line}: `{command}` is missing its {field}")]
    MissingField {
        line: usize,
        command: &'static str,
        field: &'static str,
    },
    #[error("line {line}: `{value}` is not a valid {field}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: unknown {what} `{word}`")]
    UnknownKind {
        line: usize,
        what: &'static str,
        word: String,
    },
    #[error("line {line}: city `{name}` appears before any country")]
    CityBeforeCountry { line: usize, name: String },
    #[error("line {line}: road refers to unknown city `{name}`")]
    UnknownCity { line: usize, name: String },
}

/// A parsed map: the network plus the seed it asks for, if any.
#[derive(Debug, Clone)]
pub struct MapDefinition {
    pub seed: Option<u64>,
    pub network: Network,
}

impl MapDefinition {
    /// Start a game on this map, seeded by the map unless `seed` overrides it.
    #[must_use]
    pub fn into_game(self, settings: Settings, seed: Option<u64>) -> Game {
        let seed = seed.or(self.seed).unwrap_or_default();
        Game::new(self.network, settings, seed)
    }
}

impl FromStr for MapDefinition {
    type Err = MapError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_map(text)
    }
}

/// Parse a whole map file.
///
/// # Errors
///
/// Returns the first malformed line: a missing or non-numeric field, an
/// unknown city or country kind, a city before any country, or a road to a
/// city that does not exist yet.
pub fn parse_map(text: &str) -> Result<MapDefinition, MapError> {
    let mut seed = None;
    let mut network = Network::new();
    let mut current: Option<CountryId> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let words: Vec<&str> = raw
            .split_whitespace()
            .take_while(|word| !word.starts_with("//"))
            .collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };
        let at = |command: &'static str| Fields {
            line,
            command,
            args,
        };
        match command.to_ascii_lowercase().as_str() {
            "game" => {
                let fields = at("game");
                seed = Some(fields.number::<u64>(0, "seed")?);
            }
            "country" => {
                let fields = at("country");
                let name = fields.word(0, "name")?;
                let kind = match args.get(1) {
                    Some(word) => CountryKind::parse(word).ok_or_else(|| MapError::UnknownKind {
                        line,
                        what: "country kind",
                        word: (*word).to_string(),
                    })?,
                    None => CountryKind::Plain,
                };
                current = Some(network.add_country(name, kind));
            }
            "city" => {
                let fields = at("city");
                let name = fields.word(0, "name")?;
                let value = fields.number::<i64>(1, "value")?;
                let kind = match args.get(2) {
                    Some(word) => CityKind::parse(word).ok_or_else(|| MapError::UnknownKind {
                        line,
                        what: "city kind",
                        word: (*word).to_string(),
                    })?,
                    None => CityKind::Plain,
                };
                let country = current.ok_or_else(|| MapError::CityBeforeCountry {
                    line,
                    name: name.to_string(),
                })?;
                network.add_city(country, name, value, kind);
            }
            "road" => {
                let fields = at("road");
                let a = fields.city(&network, 0, "first city")?;
                let b = fields.city(&network, 1, "second city")?;
                let length = fields.number::<i64>(2, "length")?;
                network.add_roads(a, b, length);
            }
            "position" | "background" => {}
            other => warn!("map line {line}: skipping unknown command `{other}`"),
        }
    }

    Ok(MapDefinition { seed, network })
}

/// Positional arguments of one map line.
struct Fields<'a> {
    line: usize,
    command: &'static str,
    args: &'a [&'a str],
}

impl<'a> Fields<'a> {
    fn word(&self, index: usize, field: &'static str) -> Result<&'a str, MapError> {
        self.args
            .get(index)
            .copied()
            .ok_or(MapError::MissingField {
                line: self.line,
                command: self.command,
                field,
            })
    }

    fn number<T: FromStr>(&self, index: usize, field: &'static str) -> Result<T, MapError> {
        let word = self.word(index, field)?;
        word.parse().map_err(|_| MapError::InvalidNumber {
            line: self.line,
            field,
            value: word.to_string(),
        })
    }

    fn city(
        &self,
        network: &Network,
        index: usize,
        field: &'static str,
    ) -> Result<CityId, MapError> {
        let name = self.word(index, field)?;
        network.find_city(name).ok_or_else(|| MapError::UnknownCity {
            line: self.line,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    const NORDIC: &str = "\
// Two countries and a bridge.
game 4242
country Denmark
city\tCopenhagen   100 capital
city Odense 50
country Sweden mafia
city Malmo 70 border   // ferry port
background map.png
position Malmo 10 20
road Copenhagen Odense 4
road Copenhagen\t\tMalmo 3
";

    #[test]
    fn parses_countries_cities_and_roads() {
        let map: MapDefinition = NORDIC.parse().unwrap();
        assert_eq!(map.seed, Some(4242));
        let net = &map.network;
        assert_eq!(net.country_count(), 2);
        let sweden = net.country_named("Sweden").unwrap();
        assert_eq!(net.country(sweden).kind(), CountryKind::Mafia);

        let copenhagen = net.find_city("Copenhagen").unwrap();
        let malmo = net.find_city("Malmo").unwrap();
        assert_eq!(net.city(copenhagen).kind(), CityKind::Capital);
        assert_eq!(net.city(malmo).kind(), CityKind::Border);
        assert_eq!(net.city(malmo).value(), 70);
        assert_eq!(net.city(malmo).country(), sweden);
        assert_eq!(
            net.ready_to_travel(malmo, copenhagen),
            Position::new(malmo, copenhagen, 3)
        );
        assert_eq!(net.roads_from(copenhagen).len(), 2);
    }

    #[test]
    fn seed_is_optional_and_overridable() {
        let map = parse_map("country A\ncity X 1\n").unwrap();
        assert_eq!(map.seed, None);
        let game = parse_map(NORDIC)
            .unwrap()
            .into_game(Settings::default(), Some(7));
        assert_eq!(game.seed(), 7);
        let game = parse_map(NORDIC).unwrap().into_game(Settings::default(), None);
        assert_eq!(game.seed(), 4242);
    }

    #[test]
    fn unknown_commands_are_skipped() {
        let map = parse_map("country A\nteleport X Y\ncity X 3\n").unwrap();
        assert!(map.network.find_city("X").is_some());
    }

    #[test]
    fn bad_numbers_report_their_line() {
        let err = parse_map("country A\ncity X lots\n").unwrap_err();
        assert_eq!(
            err,
            MapError::InvalidNumber {
                line: 2,
                field: "value",
                value: "lots".to_string(),
            }
        );
        assert_eq!(err.to_string(), "line 2: `lots` is not a valid value");
    }

    #[test]
    fn missing_fields_are_errors() {
        let err = parse_map("\n\ncountry A\ncity X 1\nroad X\n").unwrap_err();
        assert_eq!(
            err,
            MapError::MissingField {
                line: 5,
                command: "road",
                field: "second city",
            }
        );
    }

    #[test]
    fn city_needs_a_country() {
        let err = parse_map("city X 10\n").unwrap_err();
        assert!(matches!(err, MapError::CityBeforeCountry { line: 1, .. }));
    }

    #[test]
    fn roads_need_known_cities() {
        let err = parse_map("country A\ncity X 1\nroad X Y 2\n").unwrap_err();
        assert!(matches!(err, MapError::UnknownCity { line: 3, ref name } if name == "Y"));
    }

    #[test]
    fn unknown_kinds_are_errors() {
        let err = parse_map("country A pirate\n").unwrap_err();
        assert!(matches!(err, MapError::UnknownKind { what: "country kind", .. }));
        let err = parse_map("country A\ncity X 1 metropolis\n").unwrap_err();
        assert!(matches!(err, MapError::UnknownKind { what: "city kind", .. }));
    }

    #[test]
    fn invalid_road_lengths_are_ignored_like_any_edit() {
        let map = parse_map("country A\ncity X 1\ncity Y 2\nroad X Y 0\nroad X X 4\n").unwrap();
        let x = map.network.find_city("X").unwrap();
        assert!(map.network.roads_from(x).is_empty());
    }
}
