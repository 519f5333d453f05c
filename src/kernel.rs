//! Smoothing kernels for binned spike trains and the associated "same"-length convolution.
use serde::{Deserialize, Serialize};

use crate::error::SNNError;

/// Number of standard deviations covered on each side of a gaussian kernel.
pub const GAUSSIAN_SUPPORT: f64 = 3.0;
/// Number of time constants covered by an exponential kernel.
pub const EXPONENTIAL_SUPPORT: f64 = 5.0;

/// A smoothing kernel, described by its shape.
/// Every shape is materialized into a finite sequence of taps by [`Kernel::taps`].
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    /// The identity kernel `[1]`, i.e., no smoothing at all.
    #[default]
    Identity,
    /// A flat window of `width` unit taps.
    Boxcar { width: usize },
    /// A symmetric gaussian window with unit peak, sampled every `dt` over ±3σ.
    Gaussian { sigma: f64, dt: f64 },
    /// A causal exponential decay with unit peak, sampled every `dt` over 5τ.
    Exponential { tau: f64, dt: f64 },
    /// Explicit taps.
    Taps { values: Vec<f64> },
}

impl Kernel {
    /// Parse a kernel description of the form `name[:parameter]`, e.g., `identity`, `boxcar:5`,
    /// `gaussian:2.0` or `exponential:5.0`. The time constants are expressed in the same unit as `dt`.
    pub fn parse(s: &str, dt: f64) -> Result<Self, SNNError> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name, Some(param)),
            None => (s, None),
        };

        let parse_param = |param: Option<&str>| -> Result<f64, SNNError> {
            param
                .ok_or_else(|| {
                    SNNError::InvalidArgument(format!("Kernel '{}' requires a parameter", name))
                })?
                .parse::<f64>()
                .map_err(|e| SNNError::InvalidArgument(format!("Invalid kernel parameter: {}", e)))
        };

        match name {
            "identity" => Ok(Kernel::Identity),
            "boxcar" => {
                let width = param
                    .ok_or_else(|| {
                        SNNError::InvalidArgument("Kernel 'boxcar' requires a width".to_string())
                    })?
                    .parse::<usize>()
                    .map_err(|e| {
                        SNNError::InvalidArgument(format!("Invalid boxcar width: {}", e))
                    })?;
                Ok(Kernel::Boxcar { width })
            }
            "gaussian" => Ok(Kernel::Gaussian {
                sigma: parse_param(param)?,
                dt,
            }),
            "exponential" => Ok(Kernel::Exponential {
                tau: parse_param(param)?,
                dt,
            }),
            _ => Err(SNNError::InvalidArgument(format!("Unknown kernel '{}'", name))),
        }
    }

    /// Returns the taps of the kernel.
    /// Returns an error if the shape parameters are not positive (and finite), or if explicit taps are empty.
    pub fn taps(&self) -> Result<Vec<f64>, SNNError> {
        match self {
            Kernel::Identity => Ok(vec![1.0]),
            Kernel::Boxcar { width } => {
                if *width == 0 {
                    return Err(SNNError::InvalidArgument(
                        "Boxcar width must be positive".to_string(),
                    ));
                }
                Ok(vec![1.0; *width])
            }
            Kernel::Gaussian { sigma, dt } => {
                check_positive(*sigma, "Gaussian width")?;
                check_positive(*dt, "Time step")?;
                let half = (GAUSSIAN_SUPPORT * sigma / dt).ceil() as i64;
                Ok((-half..=half)
                    .map(|i| (-0.5 * (i as f64 * dt / sigma).powi(2)).exp())
                    .collect())
            }
            Kernel::Exponential { tau, dt } => {
                check_positive(*tau, "Time constant")?;
                check_positive(*dt, "Time step")?;
                // Zero padding on the left keeps the response causal once the kernel is centered.
                let n = (EXPONENTIAL_SUPPORT * tau / dt).ceil() as usize + 1;
                Ok(std::iter::repeat(0.0)
                    .take(n - 1)
                    .chain((0..n).map(|i| (-(i as f64) * dt / tau).exp()))
                    .collect())
            }
            Kernel::Taps { values } => {
                if values.is_empty() {
                    return Err(SNNError::InvalidArgument(
                        "Kernel taps must not be empty".to_string(),
                    ));
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(SNNError::InvalidArgument(
                        "Kernel taps must be finite".to_string(),
                    ));
                }
                Ok(values.clone())
            }
        }
    }
}

fn check_positive(value: f64, what: &str) -> Result<(), SNNError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(SNNError::InvalidArgument(format!(
            "{} must be positive, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Discrete convolution of `signal` with `taps`, restricted to the central part of the full
/// convolution so that the output has the length of `signal`.
/// The kernel is centered on each sample with an offset of `(taps.len() - 1) / 2`.
pub fn convolve_same(signal: &[f64], taps: &[f64]) -> Vec<f64> {
    let offset = taps.len().saturating_sub(1) / 2;
    (0..signal.len())
        .map(|k| {
            let i = k + offset;
            let lo = (i + 1).saturating_sub(taps.len());
            let hi = i.min(signal.len() - 1);
            (lo..=hi).map(|j| signal[j] * taps[i - j]).sum()
        })
        .collect()
}
