//! Players and the policies that pick their next destination.
use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::city::CityId;
use crate::country::CountryId;
use crate::network::Network;
use crate::numbers::per_step;
use crate::position::Position;
use crate::revenue::Traveller;
use crate::rng::GameRng;
use crate::road::Road;
use crate::search::PathSearch;
use crate::settings::ActiveAgents;

/// Decision policy of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Runs the bounded path search at every city.
    Smart,
    /// Heads for the neighbour with the best value per step.
    Greedy,
    /// Picks an outgoing road uniformly at random.
    Random,
    /// Follows destinations queued by a caller.
    Manual,
}

impl AgentKind {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Smart => "Smart Player",
            Self::Greedy => "Greedy Player",
            Self::Random => "Random Player",
            Self::Manual => "Manual Player",
        }
    }

    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "smart" => Some(Self::Smart),
            "greedy" => Some(Self::Greedy),
            "random" => Some(Self::Random),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }

    /// Manual players cannot be switched off.
    #[must_use]
    pub const fn is_active(self, active: &ActiveAgents) -> bool {
        match self {
            Self::Smart => active.smart,
            Self::Greedy => active.greedy,
            Self::Random => active.random,
            Self::Manual => true,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    kind: AgentKind,
    position: Position,
    money: i64,
    /// Destinations queued while travelling, manual players only.
    pending: VecDeque<CityId>,
}

impl Player {
    #[must_use]
    pub const fn new(kind: AgentKind, position: Position) -> Self {
        Self {
            kind,
            position,
            money: 0,
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        self.kind
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn money(&self) -> i64 {
        self.money
    }

    pub const fn set_money(&mut self, money: i64) {
        self.money = money;
    }

    pub const fn credit(&mut self, amount: i64) {
        self.money += amount;
    }

    /// Clamp a negative balance back to zero.
    pub const fn floor_money(&mut self) {
        if self.money < 0 {
            self.money = 0;
        }
    }

    /// Replace the position and drop queued destinations, as at game start.
    pub fn place(&mut self, position: Position) {
        self.position = position;
        self.pending.clear();
    }

    /// Move one unit along the current road. Returns `true` when this step
    /// completed the trip.
    pub const fn advance(&mut self) -> bool {
        self.position.move_step() && self.position.has_arrived()
    }

    /// Pick the next trip once parked at a city. No-op while travelling.
    pub fn choose_next(
        &mut self,
        network: &Network,
        rng: &mut GameRng,
        search: &PathSearch,
        steps_left: u32,
    ) {
        if !self.position.has_arrived() {
            return;
        }
        let here = self.position.to();
        let target = match self.kind {
            AgentKind::Smart => Some(search.next_city(network, here, steps_left)),
            AgentKind::Greedy => greedy_target(network, here),
            AgentKind::Random => random_target(network, here, rng),
            AgentKind::Manual => {
                if let Some(next) = self.pending.pop_front() {
                    self.travel_to(network, next);
                }
                None
            }
        };
        if let Some(target) = target {
            self.position = network.ready_to_travel(here, target);
        }
    }

    /// Steer a manual player towards `city`.
    ///
    /// A parked player sets off when a road leads there. A travelling player
    /// turns around when `city` is where it came from, and otherwise queues
    /// `city` for when it arrives.
    pub fn travel_to(&mut self, network: &Network, city: CityId) {
        if self.position.has_arrived() {
            let here = self.position.to();
            if network.roads_from(here).iter().any(|road| road.to() == city) {
                self.position = network.ready_to_travel(here, city);
                self.pending.clear();
            }
        } else if city == self.position.from() {
            self.position.turn_around();
        } else {
            self.pending.push_back(city);
        }
    }

    #[must_use]
    pub fn pending(&self) -> impl ExactSizeIterator<Item = CityId> + '_ {
        self.pending.iter().copied()
    }
}

/// A player on its way into a city, tagged with the country it left.
#[derive(Debug)]
pub struct Inbound<'p> {
    player: &'p mut Player,
    origin: CountryId,
}

impl<'p> Inbound<'p> {
    /// Arrival is resolved before the next trip is chosen, so the position's
    /// `from` is still the city the player just left.
    pub fn new(player: &'p mut Player, network: &Network) -> Self {
        let origin = network.city(player.position.from()).country();
        Self { player, origin }
    }
}

impl Traveller for Inbound<'_> {
    fn money(&self) -> i64 {
        self.player.money
    }

    fn debit(&mut self, amount: i64) {
        self.player.money -= amount;
    }

    fn from_country(&self) -> CountryId {
        self.origin
    }
}

fn greedy_target(network: &Network, here: CityId) -> Option<CityId> {
    let mut best = 0.0;
    let mut target = None;
    for road in network.roads_from(here) {
        let value = per_step(network.city(road.to()).value(), road.length());
        if value > best {
            best = value;
            target = Some(road.to());
        }
    }
    target
}

fn random_target(network: &Network, here: CityId, rng: &mut GameRng) -> Option<CityId> {
    let roads = network.roads_from(here);
    if roads.is_empty() {
        return None;
    }
    roads.get(rng.below(roads.len())).map(Road::to)
}
