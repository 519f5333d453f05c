//! Module implementing the connections between two neuron populations, as reported by a simulator.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::error::SNNError;

/// Represents a connection between two neurons in a network.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Connection {
    source_id: usize,
    /// Target ID
    target_id: usize,
    /// Connection weight
    weight: f64,
    /// Connection delay (must be non-negative)
    #[serde(default)]
    delay: f64,
}

impl Connection {
    /// Create a new connection with the specified parameters.
    /// Returns an error if the delay is negative.
    pub fn build(
        source_id: usize,
        target_id: usize,
        weight: f64,
        delay: f64,
    ) -> Result<Self, SNNError> {
        if delay < 0.0 {
            return Err(SNNError::InvalidParameter(
                "Connection delay must be non-negative".to_string(),
            ));
        }

        Ok(Connection {
            source_id,
            target_id,
            weight,
            delay,
        })
    }

    /// Returns the ID of the source neuron.
    pub fn source_id(&self) -> usize {
        self.source_id
    }

    /// Returns the ID of the target neuron.
    pub fn target_id(&self) -> usize {
        self.target_id
    }

    /// Returns the weight of the connection.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the delay of the connection.
    pub fn delay(&self) -> f64 {
        self.delay
    }
}

/// Returns the weight matrix from the sources to the targets, with one row per source and one column per target.
///
/// Neurons are located relative to the smallest ID of their population, i.e., the entry of a connection
/// is `[source_id - min(sources), target_id - min(targets)]`. Parallel connections accumulate their weights.
/// Connections from or to neurons outside of the populations are ignored.
/// Returns an error if a population is not contiguous enough for its IDs to fit in the matrix.
pub fn weight_matrix(
    connections: &[Connection],
    sources: &[usize],
    targets: &[usize],
) -> Result<DMatrix<f64>, SNNError> {
    let mut weights = DMatrix::zeros(sources.len(), targets.len());

    let (min_source, min_target) = match (sources.iter().min(), targets.iter().min()) {
        (Some(min_source), Some(min_target)) => (*min_source, *min_target),
        _ => return Ok(weights),
    };

    for connection in connections.iter().filter(|connection| {
        sources.contains(&connection.source_id) && targets.contains(&connection.target_id)
    }) {
        let (i, j) = (
            connection.source_id - min_source,
            connection.target_id - min_target,
        );
        if i >= sources.len() || j >= targets.len() {
            return Err(SNNError::OutOfBounds(format!(
                "Connection from {} to {} does not fit in a {}x{} weight matrix",
                connection.source_id,
                connection.target_id,
                sources.len(),
                targets.len()
            )));
        }
        weights[(i, j)] += connection.weight;
    }

    Ok(weights)
}
