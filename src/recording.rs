//! Recordings of simulator devices, i.e., spike detectors and voltmeters.
//!
//! Records deserialize from the event dictionaries reported by the simulator, e.g.,
//! `{"times": [1.5, 3.0], "senders": [2, 4]}` for a spike detector or
//! `{"times": [0.1, 0.2], "V_m": [-70.0, -69.5]}` for a voltmeter.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SNNError;

/// The events recorded by a spike detector.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct SpikeRecord {
    /// The firing times.
    pub times: Vec<f64>,
    /// The ID of the neuron which emitted each spike, if recorded.
    #[serde(default)]
    pub senders: Vec<usize>,
}

impl SpikeRecord {
    /// Returns one (sorted) spike train per provided sender ID.
    /// Returns an error if the senders were not recorded along with the times.
    pub fn split_by_sender(&self, ids: &[usize]) -> Result<Vec<Vec<f64>>, SNNError> {
        if self.senders.len() != self.times.len() {
            return Err(SNNError::IncompatibleRecordings(format!(
                "{} senders recorded for {} spikes",
                self.senders.len(),
                self.times.len()
            )));
        }

        Ok(ids
            .iter()
            .map(|id| {
                let mut times: Vec<f64> = self
                    .senders
                    .iter()
                    .zip(self.times.iter())
                    .filter(|(sender, _)| *sender == id)
                    .map(|(_, time)| *time)
                    .collect();
                times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                times
            })
            .collect())
    }
}

/// The membrane potential recorded by a voltmeter.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct VoltageTrace {
    /// The sampling times.
    pub times: Vec<f64>,
    /// The membrane potential at each sampling time.
    #[serde(rename = "V_m")]
    pub v_m: Vec<f64>,
}

impl VoltageTrace {
    /// Create a new voltage trace.
    /// Returns an error if the numbers of times and potentials don't match.
    pub fn build(times: Vec<f64>, v_m: Vec<f64>) -> Result<Self, SNNError> {
        if times.len() != v_m.len() {
            return Err(SNNError::IncompatibleRecordings(format!(
                "{} sampling times for {} potentials",
                times.len(),
                v_m.len()
            )));
        }
        Ok(VoltageTrace { times, v_m })
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.v_m.len()
    }

    /// Returns true if the trace has no sample.
    pub fn is_empty(&self) -> bool {
        self.v_m.is_empty()
    }
}

/// Returns one spike train per spike detector.
pub fn spike_trains(records: &[SpikeRecord]) -> Vec<Vec<f64>> {
    records.iter().map(|record| record.times.clone()).collect()
}

/// Returns the summed potential of a group of voltage traces, i.e., the sum of their deviations from
/// the resting potential, offset by the resting potential.
/// Returns an error if the group is empty or if the traces don't have the same length.
pub fn summed_potential(group: &[VoltageTrace], rest_v: f64) -> Result<Vec<f64>, SNNError> {
    let len = match group.first() {
        Some(trace) => trace.len(),
        None => {
            return Err(SNNError::InvalidArgument(
                "Cannot sum an empty group of voltage traces".to_string(),
            ))
        }
    };

    if let Some((i, trace)) = group.iter().enumerate().find(|(_, trace)| trace.len() != len) {
        return Err(SNNError::IncompatibleRecordings(format!(
            "Trace {} has {} samples, expected {}",
            i,
            trace.len(),
            len
        )));
    }

    Ok((0..len)
        .map(|k| group.iter().map(|trace| trace.v_m[k] - rest_v).sum::<f64>() + rest_v)
        .collect())
}

/// Load a JSON document from a file.
pub fn load_from<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, SNNError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)?;
    Ok(value)
}
