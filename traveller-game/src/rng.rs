//! Seeded random stream shared by every arrival in a game.
//!
//! All randomness (bonus draws, robberies, capital spending, random agents,
//! starting positions) is pulled from one sequential stream so that a fixed
//! seed reproduces a whole run. Callers must consume it in a fixed order.

use hmac::{Hmac, Mac};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Counting wrapper around the game's ChaCha stream.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha20Rng,
    seed: u64,
    draws: u64,
}

impl GameRng {
    /// Construct the stream from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"world")),
            seed,
            draws: 0,
        }
    }

    /// Restart the stream as if it had been built from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::from_user_seed(seed);
    }

    /// The user-visible seed this stream was last seeded with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform integer in `[0, n]` inclusive.
    ///
    /// Returns 0 for `n <= 0` without advancing the stream.
    pub fn next_int(&mut self, n: i64) -> i64 {
        if n <= 0 {
            return 0;
        }
        self.gen_range(0..=n)
    }

    /// Uniform integer in `[lo, hi]` inclusive; `hi < lo` collapses to `lo`.
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        lo + self.next_int(hi - lo)
    }

    /// Uniform index in `[0, n)`. Returns 0 for an empty range without a draw.
    pub fn below(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.gen_range(0..n)
    }

    /// Draw a seed for the next run from the current stream.
    pub fn next_seed(&mut self) -> u64 {
        self.next_u64()
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    u64::from_le_bytes(std::array::from_fn(|i| digest[i]))
}
