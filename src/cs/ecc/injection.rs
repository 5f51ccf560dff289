//! Random error injection for codewords.
//!
//! Models a noisy channel by flipping randomly chosen bits of each codeword.
//! The positions to flip are drawn without replacement: the 8 bit positions
//! are shuffled with Fisher-Yates and the first `k` are flipped, so `k`
//! distinct bits always change.
//!
//! The number of errors `k` per codeword follows an [`ErrorPolicy`]. The
//! random source is always supplied by the caller, which makes every run
//! reproducible from a seed.

use crate::cs::ecc::hamming::CODEWORD_BITS;
use crate::cs::ecc::Result;
use crate::error::Error;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::StandardNormal;

/// How many bit errors to introduce in each codeword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Exactly this many errors, at most 8
    Fixed(usize),
    /// `|floor(g)|` errors, where `g` follows a standard normal distribution.
    /// Usually 0 or 1, sometimes more than the code can detect.
    Normal,
    /// Like `Normal`, reduced modulo 3 so it never exceeds the 2 errors the
    /// code is able to detect.
    BoundedNormal,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Fixed(0)
    }
}

impl ErrorPolicy {
    /// Checks the policy parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            ErrorPolicy::Fixed(count) if count > CODEWORD_BITS => Err(Error::InvalidInput(
                format!(
                    "Error count must be between 0 and {}, got {}",
                    CODEWORD_BITS, count
                ),
            )),
            _ => Ok(()),
        }
    }

    /// Draws the number of errors for the next codeword, capped at 8
    pub fn error_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let count = match *self {
            ErrorPolicy::Fixed(count) => count,
            ErrorPolicy::Normal => normal_count(rng),
            ErrorPolicy::BoundedNormal => normal_count(rng) % 3,
        };
        count.min(CODEWORD_BITS)
    }
}

fn normal_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    let sample: f64 = rng.sample(StandardNormal);
    sample.floor().abs() as usize
}

/// Shuffles `positions` in place using the Fisher-Yates algorithm
pub fn shuffle_positions<R: Rng + ?Sized>(rng: &mut R, positions: &mut [u8]) {
    for i in (1..positions.len()).rev() {
        let j = rng.gen_range(0..=i);
        positions.swap(i, j);
    }
}

/// Flips the bits of `codeword` at the given positions (0 is the least
/// significant bit)
pub fn flip_bits(codeword: u8, positions: &[u8]) -> u8 {
    positions
        .iter()
        .fold(codeword, |word, &position| word ^ (1 << position))
}

/// Corrupts a codeword according to `policy`.
///
/// # Returns
///
/// The corrupted codeword and the number of bits flipped
pub fn inject_errors<R: Rng + ?Sized>(
    codeword: u8,
    rng: &mut R,
    policy: ErrorPolicy,
) -> (u8, usize) {
    let mut positions: [u8; CODEWORD_BITS] = [0, 1, 2, 3, 4, 5, 6, 7];
    shuffle_positions(rng, &mut positions);

    let count = policy.error_count(rng);
    (flip_bits(codeword, &positions[..count]), count)
}

/// Stateful error injector owning its random source.
///
/// Keeps a running total of the errors introduced so far.
#[derive(Debug, Clone)]
pub struct ErrorInjector<R: Rng> {
    /// Policy deciding the number of errors per codeword
    policy: ErrorPolicy,
    /// Random source for positions and counts
    rng: R,
    /// Errors introduced so far
    injected: usize,
}

impl ErrorInjector<ChaCha20Rng> {
    /// Create a new injector seeded from system entropy
    pub fn from_entropy(policy: ErrorPolicy) -> Result<Self> {
        Self::new(policy, ChaCha20Rng::from_entropy())
    }

    /// Create a new injector with a reproducible seed
    pub fn with_seed(policy: ErrorPolicy, seed: u64) -> Result<Self> {
        Self::new(policy, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ErrorInjector<R> {
    /// Create a new injector drawing from `rng`
    pub fn new(policy: ErrorPolicy, rng: R) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            rng,
            injected: 0,
        })
    }

    /// The configured policy
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Total number of bit errors introduced so far
    pub fn injected(&self) -> usize {
        self.injected
    }

    /// Corrupts a codeword, returning the possibly modified word
    pub fn corrupt(&mut self, codeword: u8) -> u8 {
        let (corrupted, count) = inject_errors(codeword, &mut self.rng, self.policy);
        self.injected += count;
        corrupted
    }
}
