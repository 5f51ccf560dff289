//! Monte-Carlo simulation of the extended Hamming (8,4) code over a noisy
//! channel.
//!
//! Each trial encodes a random nibble, corrupts the codeword according to an
//! [`ErrorPolicy`] and decodes it again, classifying the outcome. Trials run in
//! chunks on the rayon thread pool. Every chunk draws from its own ChaCha20
//! stream, derived from the seed and the chunk index, so a given configuration
//! always produces the same report whatever the number of threads.

use crate::cs::ecc::injection::inject_errors;
use crate::cs::ecc::{ErrorPolicy, ExtendedHamming, Result};
use crate::error::Error;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

/// Number of trials run sequentially by one task
const CHUNK_SIZE: usize = 1024;

/// Parameters of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of codewords to send through the channel
    pub trials: usize,
    /// Errors introduced per codeword
    pub policy: ErrorPolicy,
    /// Seed of the random source
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            policy: ErrorPolicy::BoundedNormal,
            seed: 0,
        }
    }
}

/// Outcome counts of a simulation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub trials: usize,
    /// Total bits flipped by the channel
    pub errors_injected: usize,
    /// Codewords received intact
    pub clean: usize,
    /// Codewords with a single error, corrected
    pub corrected: usize,
    /// Codewords rejected as uncorrectable
    pub detected: usize,
    /// Codewords decoded to the wrong nibble without any detection
    pub miscorrected: usize,
}

impl SimulationReport {
    /// Adds up the counts of two reports
    pub fn merge(self, other: SimulationReport) -> SimulationReport {
        SimulationReport {
            trials: self.trials + other.trials,
            errors_injected: self.errors_injected + other.errors_injected,
            clean: self.clean + other.clean,
            corrected: self.corrected + other.corrected,
            detected: self.detected + other.detected,
            miscorrected: self.miscorrected + other.miscorrected,
        }
    }

    /// Fraction of trials that delivered the right nibble
    pub fn delivered_ratio(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        (self.clean + self.corrected) as f64 / self.trials as f64
    }

    /// Fraction of trials that silently delivered a wrong nibble
    pub fn residual_error_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.miscorrected as f64 / self.trials as f64
    }
}

/// Runs `config.trials` encode-corrupt-decode trials.
///
/// # Returns
///
/// The outcome counts, or `InvalidInput` if there are no trials or the policy
/// is invalid
pub fn simulate(code: &ExtendedHamming, config: &SimulationConfig) -> Result<SimulationReport> {
    if config.trials == 0 {
        return Err(Error::InvalidInput(
            "Number of trials must be positive".to_string(),
        ));
    }
    config.policy.validate()?;

    let chunks = config.trials.div_ceil(CHUNK_SIZE);
    let reports: Vec<SimulationReport> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let start = chunk * CHUNK_SIZE;
            let trials = CHUNK_SIZE.min(config.trials - start);

            let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
            rng.set_stream(chunk as u64);

            run_trials(code, &mut rng, config.policy, trials)
        })
        .collect::<Result<_>>()?;

    let report = reports
        .into_iter()
        .fold(SimulationReport::default(), SimulationReport::merge);

    debug!(
        "simulated {} trials with {:?}: {} clean, {} corrected, {} detected, {} miscorrected",
        report.trials,
        config.policy,
        report.clean,
        report.corrected,
        report.detected,
        report.miscorrected
    );

    Ok(report)
}

fn run_trials<R: Rng>(
    code: &ExtendedHamming,
    rng: &mut R,
    policy: ErrorPolicy,
    trials: usize,
) -> Result<SimulationReport> {
    let mut report = SimulationReport::default();

    for _ in 0..trials {
        let nibble: u8 = rng.gen_range(0..16);
        let codeword = code.encode_nibble(nibble)?;
        let (received, flipped) = inject_errors(codeword, rng, policy);

        report.trials += 1;
        report.errors_injected += flipped;

        match code.correct(received) {
            Ok(correction) if correction.nibble != nibble => report.miscorrected += 1,
            Ok(correction) if correction.errors == 0 => report.clean += 1,
            Ok(_) => report.corrected += 1,
            Err(Error::UncorrectableError(_)) => report.detected += 1,
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
