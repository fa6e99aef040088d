//! Bounded exhaustive path search used by the smart agent.
//!
//! From the current city every road that fits the remaining step budget is
//! tried, recursively, and the best scoring path wins. A path's score is the
//! sum of the values of the cities it reaches, halved for every earlier visit
//! of the same city on that path and discounted by `impulsiveness` per edge.
//! Only the first road of the winning path is acted upon; the search runs
//! again at the next city.
use std::cmp::Ordering;

use log::trace;
use smallvec::SmallVec;

use crate::city::CityId;
use crate::network::Network;
use crate::numbers::{i64_to_f64, powu};
use crate::road::Road;
use crate::settings::Settings;

pub const DEFAULT_HORIZON: u32 = 200;
pub const DEFAULT_IMPULSIVENESS: f64 = 1.10;

/// Times each city has been entered on the candidate path being built.
type Visits = im::HashMap<CityId, u32>;

/// A candidate route, built back to front.
#[derive(Debug, Clone)]
pub struct PlayerPath<'n> {
    /// Stack of roads; the top is the first road to travel.
    edges: SmallVec<[&'n Road; 16]>,
    length: u32,
    score: f64,
    impulsiveness: f64,
}

impl<'n> PlayerPath<'n> {
    /// The "stay put" path: no roads, score 0.
    #[must_use]
    pub fn empty(impulsiveness: f64) -> Self {
        Self {
            edges: SmallVec::new(),
            length: 0,
            score: 0.0,
            impulsiveness,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// First road to travel, if any.
    #[must_use]
    pub fn first_road(&self) -> Option<&'n Road> {
        self.edges.last().copied()
    }

    /// Roads in travel order.
    pub fn roads(&self) -> impl Iterator<Item = &'n Road> + '_ {
        self.edges.iter().rev().copied()
    }

    /// Total road length in steps.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Put `road` in front of the path; `penalty` is how many times its
    /// destination has been entered on the path so far, this time included.
    ///
    /// # Panics
    ///
    /// Panics when `road` does not lead into the start of the current path.
    pub fn add_road(&mut self, network: &Network, road: &'n Road, penalty: u32) {
        if let Some(top) = self.first_road() {
            assert!(
                top.from() == road.to(),
                "non-adjacent road {} spliced before {}",
                network.road_label(road),
                network.road_label(top)
            );
        } else {
            self.score += self.term(network.city(road.from()).value(), penalty, 0);
        }
        self.edges.push(road);
        self.length += road.length();
        self.score += self.term(
            network.city(road.to()).value(),
            penalty,
            self.edges.len(),
        );
    }

    fn term(&self, value: i64, penalty: u32, size: usize) -> f64 {
        let revisits = usize::try_from(penalty.saturating_sub(1)).unwrap_or(usize::MAX);
        i64_to_f64(value) / (powu(2.0, revisits) * powu(self.impulsiveness, size))
    }

    /// Higher score wins, then the shorter path, then the smaller first road.
    #[must_use]
    pub fn compare(&self, other: &Self, network: &Network) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.length.cmp(&self.length))
            .then_with(|| match (self.first_road(), other.first_road()) {
                (Some(mine), Some(theirs)) => network.compare_roads(theirs, mine),
                _ => Ordering::Equal,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSearch {
    horizon: u32,
    impulsiveness: f64,
}

impl Default for PathSearch {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON, DEFAULT_IMPULSIVENESS)
    }
}

impl PathSearch {
    #[must_use]
    pub const fn new(horizon: u32, impulsiveness: f64) -> Self {
        Self {
            horizon,
            impulsiveness,
        }
    }

    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.search_horizon, settings.impulsiveness)
    }

    #[must_use]
    pub const fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Best path from `start` within `min(horizon, steps_left)` steps.
    #[must_use]
    pub fn best_path<'n>(
        &self,
        network: &'n Network,
        start: CityId,
        steps_left: u32,
    ) -> PlayerPath<'n> {
        let visits = Visits::unit(start, 1);
        self.explore(network, &visits, start, steps_left.min(self.horizon))
    }

    /// Next city to head for; `start` itself when staying put is best.
    #[must_use]
    pub fn next_city(&self, network: &Network, start: CityId, steps_left: u32) -> CityId {
        let best = self.best_path(network, start, steps_left);
        let next = best.first_road().map_or(start, Road::to);
        trace!(
            "search from {} over {} steps: score {:.3}, heading to {}",
            network.city(start).name(),
            steps_left.min(self.horizon),
            best.score(),
            network.city(next).name()
        );
        next
    }

    fn explore<'n>(
        &self,
        network: &'n Network,
        visits: &Visits,
        city: CityId,
        budget: u32,
    ) -> PlayerPath<'n> {
        let mut best = PlayerPath::empty(self.impulsiveness);
        for road in network.roads_from(city) {
            if road.length() > budget {
                continue;
            }
            let mut branch = visits.clone();
            let penalty = {
                let count = branch.entry(road.to()).or_insert(0);
                *count += 1;
                *count
            };
            let mut candidate = self.explore(network, &branch, road.to(), budget - road.length());
            candidate.add_road(network, road, penalty);
            if candidate.compare(&best, network) == Ordering::Greater {
                best = candidate;
            }
        }
        best
    }
}
