//! Arrival economy: what a city pays, and takes, when a traveller arrives.
//!
//! The protocol composes bottom-up. The country draws a signed bonus from the
//! city's value, the city pays it out, border cities withhold a toll from
//! foreigners first, and capitals finally take a share of what is left.
//! Random draws happen in a fixed order per arrival: robbery check, value
//! draw, spending draw. Reordering them changes every later draw of a seeded
//! game.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::city::{City, CityKind};
use crate::country::{CountryId, CountryKind};
use crate::rng::GameRng;
use crate::settings::Settings;

/// Anything that carries money into a city.
pub trait Traveller {
    fn money(&self) -> i64;

    /// Remove `amount` from the balance. Floors are the caller's concern.
    fn debit(&mut self, amount: i64);

    /// Country of the city the traveller is arriving from.
    fn from_country(&self) -> CountryId;
}

/// What a single arrival did to the traveller.
///
/// `toll` and `spent` have already been debited from the traveller; `bonus`
/// is left for the caller to credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrivalOutcome {
    /// Signed payout; negative when the traveller was robbed.
    pub bonus: i64,
    pub toll: i64,
    pub spent: i64,
    pub robbed: bool,
}

impl ArrivalOutcome {
    /// Net change of the traveller's balance once `bonus` is credited.
    #[must_use]
    pub const fn net(&self) -> i64 {
        self.bonus - self.toll - self.spent
    }
}

impl CountryKind {
    /// Signed bonus for a city worth `max_value`.
    ///
    /// Nothing is paid, and nothing drawn, for `max_value <= 0`. A plain draw
    /// is uniform over `[0, max_value]`. A mafia country first rolls
    /// `[0, 99]`; below the robbery risk it returns the negated loss drawn
    /// from `[min_loss, max_loss]`.
    pub fn bonus(self, max_value: i64, rng: &mut GameRng, settings: &Settings) -> i64 {
        self.draw(max_value, rng, settings).0
    }

    fn draw(self, max_value: i64, rng: &mut GameRng, settings: &Settings) -> (i64, bool) {
        if max_value <= 0 {
            return (0, false);
        }
        if self == Self::Mafia && rng.next_int(99) < i64::from(settings.robbery_risk) {
            let loss = rng.range_inclusive(
                i64::from(settings.min_loss),
                i64::from(settings.max_loss),
            );
            return (-loss, true);
        }
        (rng.next_int(max_value), false)
    }
}

impl City {
    /// Pay out a bonus drawn by `country` from the current value.
    ///
    /// The value drops by exactly the bonus, so a robbery raises it.
    pub fn arrive(&mut self, country: CountryKind, rng: &mut GameRng, settings: &Settings) -> i64 {
        self.pay_bonus(country, rng, settings).0
    }

    /// Run this city's full arrival protocol for `traveller`.
    pub fn arrive_with<T: Traveller + ?Sized>(
        &mut self,
        country: CountryKind,
        traveller: &mut T,
        rng: &mut GameRng,
        settings: &Settings,
    ) -> ArrivalOutcome {
        let mut outcome = ArrivalOutcome::default();
        if self.kind().charges_toll() {
            outcome.toll = self.withhold_toll(traveller, settings);
        }
        (outcome.bonus, outcome.robbed) = self.pay_bonus(country, rng, settings);
        if self.kind() == CityKind::Capital {
            outcome.spent = self.collect_spending(traveller, rng);
        }
        if outcome.robbed {
            debug!("{} robbed a traveller of {}", self.name(), -outcome.bonus);
        }
        debug!(
            "arrival at {}: bonus {} toll {} spent {}",
            self.name(),
            outcome.bonus,
            outcome.toll,
            outcome.spent
        );
        outcome
    }

    fn pay_bonus(
        &mut self,
        country: CountryKind,
        rng: &mut GameRng,
        settings: &Settings,
    ) -> (i64, bool) {
        let (bonus, robbed) = country.draw(self.value(), rng, settings);
        self.change_value(-bonus);
        (bonus, robbed)
    }

    /// Toll step: foreigners leave `toll_percent` of their money, rounded down.
    fn withhold_toll<T: Traveller + ?Sized>(
        &mut self,
        traveller: &mut T,
        settings: &Settings,
    ) -> i64 {
        if traveller.from_country() == self.country() {
            return 0;
        }
        let toll = (traveller.money() * i64::from(settings.toll_percent)).div_euclid(100);
        traveller.debit(toll);
        self.change_value(toll);
        toll
    }

    /// Spend step: a uniform share of the traveller's current money stays here.
    fn collect_spending<T: Traveller + ?Sized>(
        &mut self,
        traveller: &mut T,
        rng: &mut GameRng,
    ) -> i64 {
        let spent = rng.next_int(traveller.money());
        traveller.debit(spent);
        self.change_value(spent);
        spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: CountryId = CountryId(0);
    const ABROAD: CountryId = CountryId(1);

    struct Wallet {
        money: i64,
        from: CountryId,
    }

    impl Traveller for Wallet {
        fn money(&self) -> i64 {
            self.money
        }

        fn debit(&mut self, amount: i64) {
            self.money -= amount;
        }

        fn from_country(&self) -> CountryId {
            self.from
        }
    }

    fn wallet(money: i64, from: CountryId) -> Wallet {
        Wallet { money, from }
    }

    #[test]
    fn plain_bonus_is_seed_stable_and_bounded() {
        let settings = Settings::default();
        for seed in 0..50 {
            let mut rng = GameRng::from_user_seed(seed);
            let first = CountryKind::Plain.bonus(80, &mut rng, &settings);
            rng.reseed(seed);
            let second = CountryKind::Plain.bonus(80, &mut rng, &settings);
            assert_eq!(first, second);
            assert!((0..=80).contains(&first));
        }
    }

    #[test]
    fn non_positive_value_pays_nothing() {
        let settings = Settings {
            robbery_risk: 100,
            ..Settings::default()
        };
        let mut rng = GameRng::from_user_seed(3);
        for kind in [CountryKind::Plain, CountryKind::Mafia] {
            assert_eq!(kind.bonus(0, &mut rng, &settings), 0);
            assert_eq!(kind.bonus(-10, &mut rng, &settings), 0);
        }
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn mafia_with_certain_risk_always_robs() {
        let settings = Settings {
            robbery_risk: 100,
            min_loss: 10,
            max_loss: 50,
            ..Settings::default()
        };
        let mut rng = GameRng::from_user_seed(11);
        for _ in 0..200 {
            let bonus = CountryKind::Mafia.bonus(80, &mut rng, &settings);
            assert!((-50..=-10).contains(&bonus));
        }
    }

    #[test]
    fn mafia_without_risk_matches_plain_draw() {
        let settings = Settings {
            robbery_risk: 0,
            ..Settings::default()
        };
        for seed in 0..50 {
            let mut rng = GameRng::from_user_seed(seed);
            let mafia = CountryKind::Mafia.bonus(80, &mut rng, &settings);
            rng.reseed(seed);
            rng.next_int(99);
            let plain = CountryKind::Plain.bonus(80, &mut rng, &settings);
            assert_eq!(mafia, plain);
        }
    }

    #[test]
    fn plain_arrival_lowers_value_by_bonus() {
        let settings = Settings::default();
        let mut rng = GameRng::from_user_seed(5);
        let mut city = City::new("Odense", 80, HOME, CityKind::Plain);
        for _ in 0..20 {
            let before = city.value();
            let bonus = city.arrive(CountryKind::Plain, &mut rng, &settings);
            assert_eq!(city.value(), before - bonus);
        }
    }

    #[test]
    fn robbery_raises_city_value() {
        let settings = Settings {
            robbery_risk: 100,
            ..Settings::default()
        };
        let mut rng = GameRng::from_user_seed(8);
        let mut city = City::new("Palermo", 30, HOME, CityKind::Plain);
        let bonus = city.arrive(CountryKind::Mafia, &mut rng, &settings);
        assert!(bonus < 0);
        assert_eq!(city.value(), 30 - bonus);
    }

    #[test]
    fn plain_city_ignores_origin() {
        let settings = Settings::default();
        let mut rng = GameRng::from_user_seed(2);
        let mut city = City::new("Odense", 60, HOME, CityKind::Plain);
        let mut traveller = wallet(250, ABROAD);
        let outcome = city.arrive_with(CountryKind::Plain, &mut traveller, &mut rng, &settings);
        assert_eq!(outcome.toll, 0);
        assert_eq!(outcome.spent, 0);
        assert_eq!(traveller.money, 250);
    }

    #[test]
    fn border_city_tolls_foreigners_before_the_draw() {
        let settings = Settings::default();
        for seed in 0..200 {
            let mut rng = GameRng::from_user_seed(seed);
            let expected_bonus = CountryKind::Plain.bonus(60 + 50, &mut rng, &settings);

            rng.reseed(seed);
            let mut city = City::new("Padborg", 60, HOME, CityKind::Border);
            let mut traveller = wallet(250, ABROAD);
            let outcome =
                city.arrive_with(CountryKind::Plain, &mut traveller, &mut rng, &settings);
            assert_eq!(outcome.toll, 50);
            assert_eq!(outcome.bonus, expected_bonus);
            assert_eq!(outcome.net(), expected_bonus - 50);
            assert_eq!(traveller.money, 200);
            assert_eq!(city.value(), 60 + 50 - expected_bonus);
        }
    }

    #[test]
    fn border_city_spares_compatriots() {
        let settings = Settings::default();
        for seed in 0..100 {
            let mut rng = GameRng::from_user_seed(seed);
            let expected_bonus = CountryKind::Plain.bonus(60, &mut rng, &settings);

            rng.reseed(seed);
            let mut city = City::new("Padborg", 60, HOME, CityKind::Border);
            let mut traveller = wallet(250, HOME);
            let outcome =
                city.arrive_with(CountryKind::Plain, &mut traveller, &mut rng, &settings);
            assert_eq!(outcome.toll, 0);
            assert_eq!(outcome.net(), expected_bonus);
            assert_eq!(traveller.money, 250);
            assert_eq!(city.value(), 60 - expected_bonus);
        }
    }

    #[test]
    fn toll_rounds_down() {
        let settings = Settings {
            toll_percent: 15,
            ..Settings::default()
        };
        let mut rng = GameRng::from_user_seed(1);
        let mut city = City::new("Padborg", 0, HOME, CityKind::Border);
        let mut traveller = wallet(99, ABROAD);
        let outcome = city.arrive_with(CountryKind::Plain, &mut traveller, &mut rng, &settings);
        assert_eq!(outcome.toll, 14);
        assert_eq!(traveller.money, 85);
    }

    #[test]
    fn capital_spends_from_post_toll_money() {
        let settings = Settings::default();
        for seed in 0..200 {
            let mut rng = GameRng::from_user_seed(seed);
            let expected_bonus = CountryKind::Plain.bonus(60 + 50, &mut rng, &settings);
            let expected_spent = rng.next_int(200);

            rng.reseed(seed);
            let mut city = City::new("Copenhagen", 60, HOME, CityKind::Capital);
            let mut traveller = wallet(250, ABROAD);
            let outcome =
                city.arrive_with(CountryKind::Plain, &mut traveller, &mut rng, &settings);
            assert_eq!(outcome.spent, expected_spent);
            assert_eq!(outcome.net(), expected_bonus - 50 - expected_spent);
            assert_eq!(traveller.money, 200 - expected_spent);
            assert!(traveller.money >= 0);
            assert_eq!(city.value(), 60 + 50 - expected_bonus + expected_spent);
        }
    }

    #[test]
    fn capital_draw_order_is_robbery_value_spending() {
        let settings = Settings {
            robbery_risk: 50,
            ..Settings::default()
        };
        for seed in 0..100 {
            let mut rng = GameRng::from_user_seed(seed);
            let expected_bonus = CountryKind::Mafia.bonus(60, &mut rng, &settings);
            let expected_spent = rng.next_int(250);

            rng.reseed(seed);
            let mut city = City::new("Rome", 60, HOME, CityKind::Capital);
            let mut traveller = wallet(250, HOME);
            let outcome =
                city.arrive_with(CountryKind::Mafia, &mut traveller, &mut rng, &settings);
            assert_eq!(outcome.bonus, expected_bonus);
            assert_eq!(outcome.robbed, expected_bonus < 0);
            assert_eq!(outcome.spent, expected_spent);
        }
    }

    #[test]
    fn broke_traveller_spends_nothing() {
        let settings = Settings::default();
        let mut rng = GameRng::from_user_seed(4);
        let mut city = City::new("Stockholm", 0, HOME, CityKind::Capital);
        let mut traveller = wallet(0, ABROAD);
        let outcome = city.arrive_with(CountryKind::Plain, &mut traveller, &mut rng, &settings);
        assert_eq!(outcome, ArrivalOutcome::default());
        assert_eq!(rng.draws(), 0);
    }
}
