//! Step loop and run lifecycle.
//!
//! A [`Game`] owns the network, the shared random stream and the players.
//! Every step moves each active player one unit; a player that completes a
//! trip runs the arrival protocol of the city it reached and then picks its
//! next trip.
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, Inbound, Player};
use crate::city::CityId;
use crate::network::Network;
use crate::position::Position;
use crate::rng::GameRng;
use crate::search::PathSearch;
use crate::settings::Settings;

/// One line of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub kind: AgentKind,
    pub money: i64,
}

#[derive(Debug, Clone)]
pub struct Game {
    network: Network,
    rng: GameRng,
    settings: Settings,
    search: PathSearch,
    /// Kept sorted by display name; players act in this order.
    players: Vec<Player>,
    total_steps: u32,
    steps_left: u32,
    aborted: bool,
}

impl Game {
    #[must_use]
    pub fn new(network: Network, settings: Settings, seed: u64) -> Self {
        Self {
            network,
            rng: GameRng::from_user_seed(seed),
            search: PathSearch::from_settings(&settings),
            total_steps: settings.total_steps,
            steps_left: settings.total_steps,
            settings,
            players: Vec::new(),
            aborted: false,
        }
    }

    #[must_use]
    pub const fn network(&self) -> &Network {
        &self.network
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Seed of the current run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// Search used by smart players.
    #[must_use]
    pub const fn search(&self) -> &PathSearch {
        &self.search
    }

    /// Players in acting order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// First player of `kind`.
    #[must_use]
    pub fn player(&self, kind: AgentKind) -> Option<&Player> {
        self.players.iter().find(|player| player.kind() == kind)
    }

    #[must_use]
    pub const fn total_steps(&self) -> u32 {
        self.total_steps
    }

    #[must_use]
    pub const fn steps_left(&self) -> u32 {
        self.steps_left
    }

    #[must_use]
    pub const fn ongoing(&self) -> bool {
        !self.aborted && self.steps_left > 0
    }

    pub const fn abort(&mut self) {
        self.aborted = true;
    }

    /// Add a player of `kind` at a random starting city.
    ///
    /// Returns `false`, adding nothing, when the network has no cities.
    pub fn add_player(&mut self, kind: AgentKind) -> bool {
        let Some(start) = self.random_start() else {
            return false;
        };
        let player = Player::new(kind, start);
        let slot = self
            .players
            .partition_point(|other| other.name() <= player.name());
        self.players.insert(slot, player);
        true
    }

    /// Parked position in a random city of a random country.
    ///
    /// Countries without cities are skipped; the draw is over the rest, in
    /// name order.
    pub fn random_start(&mut self) -> Option<Position> {
        let populated: Vec<_> = self
            .network
            .countries()
            .filter(|country| country.city_count() > 0)
            .collect();
        if populated.is_empty() {
            return None;
        }
        let country = populated[self.rng.below(populated.len())];
        let city = country.cities().nth(self.rng.below(country.city_count()))?;
        country.position(city)
    }

    /// Advance every active player by one unit. No-op once the run is over.
    pub fn step(&mut self) {
        if !self.ongoing() {
            return;
        }
        for player in &mut self.players {
            if !player.kind().is_active(&self.settings.active) {
                continue;
            }
            if player.advance() {
                let city = player.position().to();
                let mut inbound = Inbound::new(player, &self.network);
                let outcome =
                    self.network
                        .arrive(city, &mut inbound, &mut self.rng, &self.settings);
                player.credit(outcome.bonus);
                debug!(
                    "{} reached {} ({:+}), balance {}",
                    player.name(),
                    self.network.city(city).name(),
                    outcome.net(),
                    player.money()
                );
            }
            player.choose_next(&self.network, &mut self.rng, &self.search, self.steps_left);
            player.floor_money();
        }
        self.steps_left -= 1;
    }

    /// Step until the run is over. Returns the number of steps taken.
    pub fn run(&mut self) -> u32 {
        let mut steps = 0;
        while self.ongoing() {
            self.step();
            steps += 1;
        }
        steps
    }

    /// Start a new run: fresh seed drawn from the current stream, cities
    /// restored, money zeroed and players placed at new random cities.
    pub fn reset(&mut self) {
        let seed = self.rng.next_seed();
        self.rng.reseed(seed);
        self.steps_left = self.total_steps;
        self.aborted = false;
        self.network.reset_all();
        for index in 0..self.players.len() {
            let start = self.random_start();
            let player = &mut self.players[index];
            player.set_money(0);
            if let Some(start) = start {
                player.place(start);
            }
        }
        info!("new run with seed {seed}, {} steps", self.total_steps);
    }

    /// Steer the first manual player towards `city`. Returns `false` when the
    /// game has no manual player.
    pub fn travel_to(&mut self, city: CityId) -> bool {
        let Some(player) = self
            .players
            .iter_mut()
            .find(|player| player.kind() == AgentKind::Manual)
        else {
            return false;
        };
        player.travel_to(&self.network, city);
        true
    }

    /// Standings, richest first; ties in acting order.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .map(|player| Standing {
                name: player.name().to_string(),
                kind: player.kind(),
                money: player.money(),
            })
            .collect();
        standings.sort_by(|a, b| b.money.cmp(&a.money));
        standings
    }
}
