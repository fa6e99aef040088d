//! Movement state of a traveller along one road, or parked at a city.
use std::fmt;

use crate::city::CityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    from: CityId,
    to: CityId,
    remaining: u32,
    total: u32,
}

impl Position {
    /// Start a trip with `remaining` steps left; the trip's total is fixed here.
    #[must_use]
    pub const fn new(from: CityId, to: CityId, remaining: u32) -> Self {
        Self {
            from,
            to,
            remaining,
            total: remaining,
        }
    }

    /// Zero-length position parked at `city`.
    #[must_use]
    pub const fn stationary(city: CityId) -> Self {
        Self::new(city, city, 0)
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
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub const fn has_arrived(&self) -> bool {
        self.remaining == 0
    }

    #[must_use]
    pub const fn is_stationary(&self) -> bool {
        self.total == 0
    }

    /// Advance one step. Returns `false` when already arrived.
    pub const fn move_step(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Reverse direction. Turning around after arriving starts the trip back.
    pub const fn turn_around(&mut self) {
        let from = self.from;
        self.from = self.to;
        self.to = from;
        self.remaining = self.total - self.remaining;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} -> #{} : {}/{}",
            self.from.0, self.to.0, self.remaining, self.total
        )
    }
}
