//! Nordic Traveller Game Engine
//!
//! Platform-agnostic core of the Nordic Traveller simulation: a road network
//! split across countries, the stochastic income paid by cities on arrival,
//! travellers moving one unit per step, and the bounded path search used by
//! the smart agent. This crate has no UI or platform-specific dependencies.

pub mod agent;
pub mod city;
pub mod country;
pub mod game;
pub mod map;
pub mod network;
pub mod numbers;
pub mod position;
pub mod revenue;
pub mod rng;
pub mod road;
pub mod search;
pub mod settings;

// Re-export commonly used types
pub use agent::{AgentKind, Inbound, Player};
pub use city::{City, CityId, CityKind};
pub use country::{Country, CountryId, CountryKind};
pub use game::{Game, Standing};
pub use map::{MapDefinition, MapError, parse_map};
pub use network::Network;
pub use position::Position;
pub use revenue::{ArrivalOutcome, Traveller};
pub use rng::GameRng;
pub use road::Road;
pub use search::{PathSearch, PlayerPath};
pub use settings::{ActiveAgents, Settings, SettingsError};
