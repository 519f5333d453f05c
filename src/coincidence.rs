//! Coincidence and correlation statistics of binned spike trains.
//!
//! The coincidence of two trials is the inner product of their binned signals. The correlation of
//! a set of trials summarizes their coincidence matrix by the mean of its off-diagonal entries.
//!
//! # Examples
//!
//! ```rust
//! use approx::assert_relative_eq;
//! use nalgebra::DMatrix;
//! use rusty_snn_stats::coincidence::{spike_coincidence, Normalization};
//!
//! let binned = DMatrix::from_row_slice(3, 4, &[
//!     1.0, 0.0, 1.0, 0.0,
//!     1.0, 0.0, 1.0, 0.0,
//!     0.0, 1.0, 0.0, 1.0,
//! ]);
//! let coincidence = spike_coincidence(&binned, Normalization::None).unwrap();
//!
//! assert_eq!(coincidence.matrix[(0, 1)], 2.0);
//! assert_relative_eq!(coincidence.correlation, 2.0 / 3.0);
//! ```
use log;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::SNNError;

/// Normalization of the coincidence matrix.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Absolute coincidence counts.
    #[default]
    None,
    /// Every row is divided by the self-energy of the trial, i.e., by its diagonal entry.
    /// The normalized matrix is no longer symmetric in general.
    Energy,
}

impl Normalization {
    /// Returns the normalization from a string.
    pub fn from_str(s: &str) -> Result<Self, SNNError> {
        match s {
            "none" => Ok(Normalization::None),
            "energy" => Ok(Normalization::Energy),
            _ => Err(SNNError::InvalidArgument(format!(
                "Unknown normalization '{}', must be one of: none, energy",
                s
            ))),
        }
    }
}

/// The coincidence statistics of a set of trials.
#[derive(Debug, PartialEq, Clone)]
pub struct Coincidence {
    /// The (possibly normalized) coincidence matrix, with one row and one column per trial.
    pub matrix: DMatrix<f64>,
    /// The mean off-diagonal coincidence.
    pub correlation: f64,
    /// The trials with zero self-energy, left unnormalized.
    pub degenerate_trials: Vec<usize>,
}

impl Coincidence {
    /// Returns the number of trials.
    pub fn num_trials(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns the coincidence matrix as nested rows.
    pub fn matrix_rows(&self) -> Vec<Vec<f64>> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

/// Returns the coincidence matrix `M · Mᵀ` of the binned signals, one row per trial.
pub fn coincidence_matrix(binned: &DMatrix<f64>) -> DMatrix<f64> {
    binned * binned.transpose()
}

/// Returns the mean of the off-diagonal entries of a square matrix with at least two rows.
pub fn off_diagonal_mean(matrix: &DMatrix<f64>) -> Result<f64, SNNError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(SNNError::InvalidArgument(format!(
            "The coincidence matrix must be square, got {}x{}",
            n,
            matrix.ncols()
        )));
    }
    if n < 2 {
        return Err(SNNError::InvalidArgument(format!(
            "The correlation requires at least 2 trials, got {}",
            n
        )));
    }
    Ok((matrix.sum() - matrix.trace()) / (n * (n - 1)) as f64)
}

/// Divide every row of the matrix by its diagonal entry (in-place).
/// Returns the rows with a zero diagonal entry, which are left untouched.
fn normalize_energy_in(matrix: &mut DMatrix<f64>) -> Vec<usize> {
    let mut degenerate = vec![];
    for i in 0..matrix.nrows() {
        let energy = matrix[(i, i)];
        if energy == 0.0 {
            let err = SNNError::DegenerateInput(format!("trial {} has zero self-energy", i));
            log::warn!("{}, left unnormalized", err);
            degenerate.push(i);
            continue;
        }
        matrix.row_mut(i).iter_mut().for_each(|c| *c /= energy);
    }
    degenerate
}

/// Compute the coincidence statistics of binned spike trains, one row per trial.
///
/// The caller's matrix is never modified: the coincidence matrix is freshly allocated.
/// Returns an error if there are less than two trials, in which case the correlation is undefined.
pub fn spike_coincidence(
    binned: &DMatrix<f64>,
    normalization: Normalization,
) -> Result<Coincidence, SNNError> {
    let (num_trials, num_bins) = binned.shape();
    if num_trials < 2 {
        return Err(SNNError::InvalidArgument(format!(
            "The correlation requires at least 2 trials, got {}",
            num_trials
        )));
    }
    log::debug!(
        "Coincidence of {} trials over {} bins ({:?} normalization)",
        num_trials,
        num_bins,
        normalization
    );

    let mut matrix = coincidence_matrix(binned);
    let degenerate_trials = match normalization {
        Normalization::None => vec![],
        Normalization::Energy => normalize_energy_in(&mut matrix),
    };

    let correlation = off_diagonal_mean(&matrix)?;
    log::debug!("Correlation: {}", correlation);

    Ok(Coincidence {
        matrix,
        correlation,
        degenerate_trials,
    })
}

/// Compute the coincidence statistics of binned spike trains given as rows.
/// Returns an error if the rows don't have the same length, or if there are less than two of them.
pub fn spike_coincidence_rows(
    rows: &[Vec<f64>],
    normalization: Normalization,
) -> Result<Coincidence, SNNError> {
    let num_bins = rows.first().map_or(0, |row| row.len());
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != num_bins) {
        return Err(SNNError::InvalidArgument(format!(
            "Trial {} has {} bins, expected {}",
            i,
            row.len(),
            num_bins
        )));
    }

    let binned = DMatrix::from_fn(rows.len(), num_bins, |i, j| rows[i][j]);
    spike_coincidence(&binned, normalization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn example() -> DMatrix<f64> {
        DMatrix::from_row_slice(
            3,
            4,
            &[
                1.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 1.0, 0.0, //
                0.0, 1.0, 0.0, 1.0,
            ],
        )
    }

    #[test]
    fn test_coincidence_none() {
        let coincidence = spike_coincidence(&example(), Normalization::None).unwrap();

        assert_eq!(
            coincidence.matrix,
            DMatrix::from_row_slice(3, 3, &[2.0, 2.0, 0.0, 2.0, 2.0, 0.0, 0.0, 0.0, 2.0])
        );
        assert_relative_eq!(coincidence.correlation, 2.0 / 3.0, epsilon = 1e-12);
        assert!(coincidence.degenerate_trials.is_empty());
    }

    #[test]
    fn test_coincidence_energy() {
        let coincidence = spike_coincidence(&example(), Normalization::Energy).unwrap();

        assert_eq!(
            coincidence.matrix_rows(),
            vec![
                vec![1.0, 1.0, 0.0],
                vec![1.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0]
            ]
        );
        assert_relative_eq!(coincidence.correlation, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_is_row_asymmetric() {
        let binned = DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
        let coincidence = spike_coincidence(&binned, Normalization::Energy).unwrap();

        assert_relative_eq!(coincidence.matrix[(0, 1)], 0.5);
        assert_relative_eq!(coincidence.matrix[(1, 0)], 1.0);
        assert_relative_eq!(coincidence.correlation, 0.75);
    }

    #[test]
    fn test_symmetry() {
        let binned = DMatrix::from_row_slice(
            3,
            5,
            &[
                0.5, 1.0, 0.0, 0.25, 0.0, //
                0.0, 0.75, 1.0, 0.0, 0.5, //
                1.0, 0.0, 0.25, 0.5, 1.0,
            ],
        );
        let coincidence = spike_coincidence(&binned, Normalization::None).unwrap();
        assert_eq!(coincidence.matrix, coincidence.matrix.transpose());
    }

    #[test]
    fn test_orthogonal_trials() {
        let binned = DMatrix::from_row_slice(
            3,
            6,
            &[
                1.0, 1.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 1.0, 1.0,
            ],
        );
        for normalization in [Normalization::None, Normalization::Energy] {
            let coincidence = spike_coincidence(&binned, normalization).unwrap();
            for i in 0..3 {
                for j in 0..3 {
                    if i != j {
                        assert_eq!(coincidence.matrix[(i, j)], 0.0);
                    }
                }
            }
            assert_eq!(coincidence.correlation, 0.0);
        }
    }

    #[test]
    fn test_degenerate_trial() {
        let binned = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
        let coincidence = spike_coincidence(&binned, Normalization::Energy).unwrap();

        assert_eq!(coincidence.degenerate_trials, vec![1]);
        assert_eq!(
            coincidence.matrix_rows(),
            vec![
                vec![1.0, 0.0, 0.5],
                vec![0.0, 0.0, 0.0],
                vec![1.0, 0.0, 1.0]
            ]
        );
    }

    #[test]
    fn test_input_untouched() {
        let binned = example();
        let _ = spike_coincidence(&binned, Normalization::Energy).unwrap();
        assert_eq!(binned, example());
    }

    #[test]
    fn test_single_trial() {
        let binned = DMatrix::from_row_slice(1, 3, &[1.0, 0.0, 1.0]);
        assert!(matches!(
            spike_coincidence(&binned, Normalization::None),
            Err(SNNError::InvalidArgument(_))
        ));
        assert!(matches!(
            spike_coincidence(&DMatrix::zeros(0, 3), Normalization::None),
            Err(SNNError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rows() {
        let coincidence = spike_coincidence_rows(
            &vec![vec![1.0, 0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0, 0.0], vec![0.0, 1.0, 0.0, 1.0]],
            Normalization::None,
        )
        .unwrap();
        assert_relative_eq!(coincidence.correlation, 2.0 / 3.0, epsilon = 1e-12);

        assert!(matches!(
            spike_coincidence_rows(&vec![vec![1.0, 0.0], vec![1.0]], Normalization::None),
            Err(SNNError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_normalization_from_str() {
        assert_eq!(Normalization::from_str("none").unwrap(), Normalization::None);
        assert_eq!(Normalization::from_str("energy").unwrap(), Normalization::Energy);
        assert!(matches!(
            Normalization::from_str("1"),
            Err(SNNError::InvalidArgument(_))
        ));
    }
}
