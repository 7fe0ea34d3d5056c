//=========================================================================
// Random Generator
//=========================================================================
//
// WELL512 pseudo-random generator: 16 words of state, period 2^512 - 1.
//
// Deterministic for a given seed, so a recorded seed or state snapshot
// replays the same sequence. Not suitable for cryptography.
//
//=========================================================================

//=== Constants ===========================================================

/// Seed used by [`RandomGenerator::new`].
pub const DEFAULT_SEED: u32 = 0x5ee3_9c34;

const STATE_WORDS: usize = 16;
const SEED_MASK: u32 = 0xf68a_9fc1;
const SEED_MULTIPLIER: u32 = 0x6c07_8965;
const TEMPER_MASK: u32 = 0xda44_2d20;

//=== RandomState =========================================================

/// Snapshot of a generator, restorable with [`RandomGenerator::set_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomState {
    pub words: [u32; STATE_WORDS],
    pub index: usize,
}

//=== RandomGenerator =====================================================

/// WELL512 generator.
///
/// ```rust
/// use stratum_engine::core::random::RandomGenerator;
///
/// let mut a = RandomGenerator::with_seed(7);
/// let mut b = RandomGenerator::with_seed(7);
/// assert_eq!(a.next_u32(), b.next_u32());
///
/// let roll = a.range(1, 6);
/// assert!((1..=6).contains(&roll));
/// ```
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    state: [u32; STATE_WORDS],
    index: usize,
}

impl RandomGenerator {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u32) -> Self {
        let mut rng = Self {
            state: [0; STATE_WORDS],
            index: 0,
        };
        rng.seed(seed);
        rng
    }

    pub fn from_state(state: RandomState) -> Self {
        let mut rng = Self::new();
        rng.set_state(state);
        rng
    }

    //--- Seeding & Snapshots ----------------------------------------------

    /// Refills the state words from `seed`. The read position is kept.
    pub fn seed(&mut self, seed: u32) {
        self.state[0] = seed ^ SEED_MASK;
        for i in 1..STATE_WORDS {
            let prev = self.state[i - 1];
            self.state[i] = SEED_MULTIPLIER
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
    }

    /// Restores a snapshot. The index is masked into `0..16`.
    pub fn set_state(&mut self, state: RandomState) {
        self.state = state.words;
        self.index = state.index & (STATE_WORDS - 1);
    }

    pub fn state(&self) -> RandomState {
        RandomState {
            words: self.state,
            index: self.index,
        }
    }

    //--- Generation -------------------------------------------------------

    /// Advances the generator and returns the next word.
    pub fn next_u32(&mut self) -> u32 {
        let s = &mut self.state;
        let i = self.index;

        let mut a = s[i];
        let mut c = s[(i + 13) & 15];
        let b = a ^ c ^ (a << 16) ^ (c << 15);
        c = s[(i + 9) & 15];
        c ^= c >> 11;
        a = b ^ c;
        s[i] = a;
        let d = a ^ ((a << 5) & TEMPER_MASK);

        self.index = (i + 15) & 15;
        a = s[self.index];
        s[self.index] = a ^ b ^ d ^ (a << 2) ^ (b << 18) ^ (c << 28);
        s[self.index]
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // 24 bits fill the f32 mantissa exactly
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform integer in `min..=max`. Returns `min` when `max < min`.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        if max < min {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        let offset = (u64::from(self.next_u32()) * span) >> 32;
        (i64::from(min) + offset as i64) as i32
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
