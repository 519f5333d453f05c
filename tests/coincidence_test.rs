use approx::assert_relative_eq;
use nalgebra::DMatrix;

use rusty_snn_stats::binning::{spike2bin, Binner, BinningConfig, BoundaryPolicy};
use rusty_snn_stats::coincidence::{spike_coincidence, spike_coincidence_rows, Normalization};
use rusty_snn_stats::connection::{weight_matrix, Connection};
use rusty_snn_stats::error::SNNError;
use rusty_snn_stats::kernel::Kernel;
use rusty_snn_stats::recording::{load_from, spike_trains, SpikeRecord};
use rusty_snn_stats::spike_train::{jittered_copies, rand_poisson};

#[test]
fn test_bin_then_score() {
    // Spikes at 1 and 3 ms (resp. 2 and 4 ms) land on bins 0 and 2 (resp. 1 and 3)
    let template = vec![0.0; 4];
    let rows: Vec<Vec<f64>> = [vec![1.0, 3.0], vec![1.5, 3.5], vec![2.0, 4.0]]
        .iter()
        .map(|times| spike2bin(times, &template, &[1.0], 1.0, BoundaryPolicy::Clamp).unwrap())
        .collect();

    assert_eq!(
        rows,
        vec![
            vec![1.0, 0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0, 1.0]
        ]
    );

    let coincidence = spike_coincidence_rows(&rows, Normalization::None).unwrap();
    assert_eq!(
        coincidence.matrix_rows(),
        vec![
            vec![2.0, 2.0, 0.0],
            vec![2.0, 2.0, 0.0],
            vec![0.0, 0.0, 2.0]
        ]
    );
    assert_relative_eq!(coincidence.correlation, 2.0 / 3.0, epsilon = 1e-12);

    let coincidence = spike_coincidence_rows(&rows, Normalization::Energy).unwrap();
    assert_eq!(
        coincidence.matrix_rows(),
        vec![
            vec![1.0, 1.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0]
        ]
    );
}

#[test]
fn test_identical_trials_are_fully_correlated() {
    let reference = rand_poisson(1, 200.0, 0.1, 7).unwrap().remove(0);
    let trials = jittered_copies(&reference, 5, 0.0, 200.0, 7).unwrap();

    let config = BinningConfig::from_duration(200.0, 1.0, Kernel::Identity).unwrap();
    let binned = Binner::build(config).unwrap().bin_all(&trials).unwrap();

    let coincidence = spike_coincidence(&binned, Normalization::Energy).unwrap();
    assert_relative_eq!(coincidence.correlation, 1.0, epsilon = 1e-12);
}

#[test]
fn test_jitter_decreases_correlation() {
    let reference = rand_poisson(1, 1000.0, 0.02, 3).unwrap().remove(0);
    let config =
        BinningConfig::from_duration(1000.0, 1.0, Kernel::Gaussian { sigma: 2.0, dt: 1.0 })
            .unwrap();
    let binner = Binner::build(config).unwrap();

    let correlation = |jitter: f64| {
        let trials = jittered_copies(&reference, 10, jitter, 1000.0, 3).unwrap();
        let binned = binner.bin_all(&trials).unwrap();
        spike_coincidence(&binned, Normalization::Energy)
            .unwrap()
            .correlation
    };

    let tight = correlation(0.5);
    let loose = correlation(20.0);
    assert!(tight > loose);
    assert!(tight <= 1.0 + 1e-12);
}

#[test]
fn test_independent_trials_with_silent_trial() {
    let mut trials = rand_poisson(4, 500.0, 0.05, 11).unwrap();
    trials.push(vec![]);

    let config = BinningConfig::from_duration(500.0, 1.0, Kernel::Boxcar { width: 5 }).unwrap();
    let binned = Binner::build(config).unwrap().bin_all(&trials).unwrap();

    let coincidence = spike_coincidence(&binned, Normalization::Energy).unwrap();
    assert_eq!(coincidence.degenerate_trials, vec![4]);
    assert!(coincidence.correlation.is_finite());
    assert!(coincidence.correlation >= 0.0);

    let coincidence = spike_coincidence(&binned, Normalization::None).unwrap();
    assert!(coincidence.degenerate_trials.is_empty());
    assert_eq!(coincidence.matrix, coincidence.matrix.transpose());
}

#[test]
fn test_single_trial_is_rejected() {
    let binned = DMatrix::from_row_slice(1, 4, &[1.0, 0.0, 1.0, 0.0]);
    assert!(matches!(
        spike_coincidence(&binned, Normalization::Energy),
        Err(SNNError::InvalidArgument(_))
    ));
}

#[test]
fn test_recordings_to_correlation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    std::fs::write(
        &path,
        r#"[
            {"times": [2.0, 5.0, 9.0], "senders": [1, 1, 1]},
            {"times": [2.0, 5.0, 9.0], "senders": [2, 2, 2]},
            {"times": [3.0, 7.0], "senders": [3, 3]}
        ]"#,
    )
    .unwrap();

    let records: Vec<SpikeRecord> = load_from(&path).unwrap();
    let trains = spike_trains(&records);

    let config = BinningConfig {
        num_bins: 10,
        dt: 1.0,
        kernel: Kernel::Identity,
        boundary: BoundaryPolicy::Clamp,
    };
    let binned = Binner::build(config).unwrap().bin_all(&trains).unwrap();
    let coincidence = spike_coincidence(&binned, Normalization::None).unwrap();

    // Only the first two trials coincide, on 3 bins: (3 + 3) / (3 * 2)
    assert_relative_eq!(coincidence.matrix[(0, 1)], 3.0);
    assert_relative_eq!(coincidence.correlation, 1.0);
}

#[test]
fn test_weight_matrix_from_json() {
    let connections: Vec<Connection> = serde_json::from_str(
        r#"[
            {"source_id": 10, "target_id": 20, "weight": 0.5, "delay": 1.0},
            {"source_id": 11, "target_id": 21, "weight": -0.25, "delay": 1.0},
            {"source_id": 11, "target_id": 21, "weight": -0.25, "delay": 2.0}
        ]"#,
    )
    .unwrap();

    let weights = weight_matrix(&connections, &[10, 11], &[20, 21, 22]).unwrap();
    assert_eq!(weights.shape(), (2, 3));
    assert_relative_eq!(weights[(0, 0)], 0.5);
    assert_relative_eq!(weights[(1, 1)], -0.5);
    assert_relative_eq!(weights.sum(), 0.0);
}
