//! Binning of spike trains into discretized, smoothed signals.
//!
//! A spike at time `s` marks the bin `floor(s / dt) - 1` of the template. Marking is idempotent:
//! a binned signal records the occurrence of spikes in a bin, not their count.
//! The occurrence signal is then smoothed by a "same"-length convolution with a kernel.
//!
//! # Examples
//!
//! ```rust
//! use rusty_snn_stats::binning::{spike2bin, BoundaryPolicy};
//!
//! let template = vec![0.0; 6];
//! let binned = spike2bin(&[2.0, 4.0, 4.5], &template, &[1.0], 1.0, BoundaryPolicy::Clamp).unwrap();
//!
//! assert_eq!(binned, vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
//! ```
use log;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::SNNError;
use crate::kernel::{convolve_same, Kernel};

/// Rule applied to spikes whose bin index is negative, e.g., every spike in `[0, dt)` lands on index `-1`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Negative indices are clamped to the first bin.
    #[default]
    Clamp,
    /// Negative indices count from the end of the template, i.e., `-1` is the last bin.
    /// Indices below `-len` are rejected.
    Wrap,
}

impl BoundaryPolicy {
    /// Returns the boundary policy from a string.
    pub fn from_str(s: &str) -> Result<Self, SNNError> {
        match s {
            "clamp" => Ok(BoundaryPolicy::Clamp),
            "wrap" => Ok(BoundaryPolicy::Wrap),
            _ => Err(SNNError::InvalidArgument(format!(
                "Unknown boundary policy '{}'",
                s
            ))),
        }
    }

    /// Returns the position in a template of length `len` targeted by the (signed) bin index, if any.
    fn resolve(&self, index: i64, len: usize) -> Option<usize> {
        let len = len as i64;
        let pos = match self {
            _ if index >= 0 => index,
            BoundaryPolicy::Clamp => 0,
            BoundaryPolicy::Wrap => len + index,
        };
        if pos >= 0 && pos < len {
            Some(pos as usize)
        } else {
            None
        }
    }
}

/// Returns the signed bin index of a spike at the given time.
pub fn bin_index(time: f64, dt: f64) -> i64 {
    ((time / dt).floor() as i64).saturating_sub(1)
}

/// Returns the binned signal of a spike train, smoothed by the provided kernel taps.
///
/// The template is left untouched: the binned signal is a new vector with the template length.
/// If there is no spike at all, the template is returned as is, without any convolution.
///
/// Returns an error if
/// - the time step is not positive;
/// - the kernel is empty or longer than the template;
/// - a spike time is not finite, or falls outside of the template.
pub fn spike2bin(
    times: &[f64],
    template: &[f64],
    kernel: &[f64],
    dt: f64,
    boundary: BoundaryPolicy,
) -> Result<Vec<f64>, SNNError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SNNError::InvalidArgument(format!(
            "The time step must be positive, got {}",
            dt
        )));
    }

    if kernel.is_empty() {
        return Err(SNNError::InvalidArgument(
            "The kernel must not be empty".to_string(),
        ));
    }

    if kernel.len() > template.len() {
        return Err(SNNError::InvalidArgument(format!(
            "The kernel ({} taps) is longer than the template ({} bins)",
            kernel.len(),
            template.len()
        )));
    }

    if times.is_empty() {
        return Ok(template.to_vec());
    }

    let mut signal = template.to_vec();
    for &time in times {
        if !time.is_finite() {
            return Err(SNNError::InvalidArgument(format!(
                "Invalid spike time: {}",
                time
            )));
        }

        let index = bin_index(time, dt);
        let pos = boundary.resolve(index, signal.len()).ok_or_else(|| {
            SNNError::InvalidArgument(format!(
                "The spike at {} (bin {}) falls outside of the template ({} bins)",
                time,
                index,
                signal.len()
            ))
        })?;

        if index < 0 {
            log::trace!(
                "Spike at {} has bin index {}, moved to bin {} ({:?})",
                time,
                index,
                pos,
                boundary
            );
        }
        signal[pos] = 1.0;
    }

    Ok(convolve_same(&signal, kernel))
}

/// The binning parameters shared by all trials of an experiment.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BinningConfig {
    /// The number of bins of the binned signals.
    pub num_bins: usize,
    /// The width of a bin.
    pub dt: f64,
    /// The smoothing kernel.
    #[serde(default)]
    pub kernel: Kernel,
    /// The rule for spikes landing before the first bin.
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

impl BinningConfig {
    /// Returns the binning configuration covering a recording of the given duration.
    pub fn from_duration(duration: f64, dt: f64, kernel: Kernel) -> Result<Self, SNNError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SNNError::InvalidArgument(format!(
                "The time step must be positive, got {}",
                dt
            )));
        }
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(SNNError::InvalidArgument(format!(
                "The duration must be non-negative, got {}",
                duration
            )));
        }
        Ok(BinningConfig {
            num_bins: (duration / dt).ceil() as usize,
            dt,
            kernel,
            boundary: BoundaryPolicy::default(),
        })
    }
}

/// Bins spike trains with a fixed configuration.
///
/// The kernel taps are materialized once, when the binner is built.
#[derive(Debug, PartialEq, Clone)]
pub struct Binner {
    config: BinningConfig,
    taps: Vec<f64>,
    template: Vec<f64>,
}

impl Binner {
    /// Create a new binner from the given configuration.
    /// Returns an error if the kernel is invalid or longer than the template.
    pub fn build(config: BinningConfig) -> Result<Self, SNNError> {
        let taps = config.kernel.taps()?;
        if taps.len() > config.num_bins {
            return Err(SNNError::InvalidArgument(format!(
                "The kernel ({} taps) is longer than the template ({} bins)",
                taps.len(),
                config.num_bins
            )));
        }
        let template = vec![0.0; config.num_bins];
        Ok(Binner {
            config,
            taps,
            template,
        })
    }

    /// Returns the binning configuration.
    pub fn config(&self) -> &BinningConfig {
        &self.config
    }

    /// Returns the number of bins.
    pub fn num_bins(&self) -> usize {
        self.config.num_bins
    }

    /// Returns the binned signal of a single spike train.
    pub fn bin(&self, times: &[f64]) -> Result<Vec<f64>, SNNError> {
        spike2bin(
            times,
            &self.template,
            &self.taps,
            self.config.dt,
            self.config.boundary,
        )
    }

    /// Returns the matrix of binned signals, one row per spike train.
    pub fn bin_all(&self, trains: &[Vec<f64>]) -> Result<DMatrix<f64>, SNNError> {
        let rows = trains
            .iter()
            .map(|times| self.bin(times))
            .collect::<Result<Vec<Vec<f64>>, SNNError>>()?;

        log::debug!(
            "Binned {} spike trains into {} bins of width {}",
            rows.len(),
            self.num_bins(),
            self.config.dt
        );

        Ok(DMatrix::from_fn(rows.len(), self.num_bins(), |i, j| {
            rows[i][j]
        }))
    }
}
