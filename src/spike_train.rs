//! Spike train sampling, to produce (correlated) sets of trials.
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};

use crate::error::SNNError;

/// Returns random spike trains on `[0, duration)`, each sampled from a homogeneous Poisson process with the given firing rate.
/// The firing times of every train are sorted.
pub fn rand_poisson(
    num_trains: usize,
    duration: f64,
    firing_rate: f64,
    seed: u64,
) -> Result<Vec<Vec<f64>>, SNNError> {
    if !(duration.is_finite() && duration > 0.0) {
        return Err(SNNError::InvalidParameter(
            "Invalid duration value: must be positive".to_string(),
        ));
    }

    if !(firing_rate.is_finite() && firing_rate >= 0.0) {
        return Err(SNNError::InvalidParameter(
            "Invalid firing rate value: must be non-negative".to_string(),
        ));
    }

    if firing_rate == 0.0 {
        return Ok(vec![vec![]; num_trains]);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let isi = Exp::new(firing_rate).map_err(|e| SNNError::InvalidParameter(e.to_string()))?;

    let times = (0..num_trains)
        .map(|_| {
            let mut times = vec![];
            let mut time = isi.sample(&mut rng);
            while time < duration {
                times.push(time);
                time += isi.sample(&mut rng);
            }
            times
        })
        .collect();

    Ok(times)
}

/// Returns copies of a reference spike train, where every spike has been jittered by a centered gaussian noise.
/// Spikes jittered outside of `[0, duration)` are dropped, and the firing times of every copy are sorted.
pub fn jittered_copies(
    reference: &[f64],
    num_copies: usize,
    jitter_std: f64,
    duration: f64,
    seed: u64,
) -> Result<Vec<Vec<f64>>, SNNError> {
    if !(jitter_std.is_finite() && jitter_std >= 0.0) {
        return Err(SNNError::InvalidParameter(
            "Invalid jitter value: must be non-negative".to_string(),
        ));
    }

    if !(duration.is_finite() && duration > 0.0) {
        return Err(SNNError::InvalidParameter(
            "Invalid duration value: must be positive".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noise =
        Normal::new(0.0, jitter_std).map_err(|e| SNNError::InvalidParameter(e.to_string()))?;

    let copies = (0..num_copies)
        .map(|_| {
            let mut times: Vec<f64> = reference
                .iter()
                .map(|time| time + noise.sample(&mut rng))
                .filter(|time| *time >= 0.0 && *time < duration)
                .collect();
            times.sort_by(|a, b| {
                a.partial_cmp(b)
                    .expect("Problem with sorting the jittered firing times.")
            });
            times
        })
        .collect();

    Ok(copies)
}
