//! This crate provides tools for post-processing the recordings of spiking neural network simulations in Rust.
//!
//! # Binning Spike Trains
//!
//! ```rust
//! use rusty_snn_stats::binning::{Binner, BinningConfig};
//! use rusty_snn_stats::kernel::Kernel;
//!
//! // Bin spike trains of 10 ms with a time step of 1 ms, smoothed by a flat window of 3 bins
//! let config = BinningConfig::from_duration(10.0, 1.0, Kernel::Boxcar { width: 3 }).unwrap();
//! let binner = Binner::build(config).unwrap();
//!
//! let binned = binner.bin(&[2.0, 6.0]).unwrap();
//! assert_eq!(binned, vec![1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
//! ```
//!
//! # Measuring Coincidence
//!
//! ```rust
//! use rusty_snn_stats::binning::{Binner, BinningConfig};
//! use rusty_snn_stats::coincidence::{spike_coincidence, Normalization};
//! use rusty_snn_stats::kernel::Kernel;
//! use rusty_snn_stats::spike_train::{jittered_copies, rand_poisson};
//!
//! // Sample a reference spike train and 20 jittered trials of it
//! let reference = rand_poisson(1, 500.0, 0.05, 42).unwrap().remove(0);
//! let trials = jittered_copies(&reference, 20, 0.5, 500.0, 42).unwrap();
//!
//! // Bin all trials and compute their energy-normalized coincidence
//! let config = BinningConfig::from_duration(500.0, 1.0, Kernel::Gaussian { sigma: 2.0, dt: 1.0 }).unwrap();
//! let binned = Binner::build(config).unwrap().bin_all(&trials).unwrap();
//! let coincidence = spike_coincidence(&binned, Normalization::Energy).unwrap();
//!
//! assert_eq!(coincidence.num_trials(), 20);
//! assert!(coincidence.correlation > 0.5);
//! ```
//!
//! # Figures
//!
//! The [`plot`] module renders spike rasters, membrane potential traces and weight matrices as SVG files.

pub mod binning;
pub mod coincidence;
pub mod connection;
pub mod error;
pub mod kernel;
pub mod plot;
pub mod recording;
pub mod spike_train;

/// The resting membrane potential (in mV) used when summing voltage traces, unless specified otherwise.
pub const REST_POTENTIAL: f64 = -70.0;
