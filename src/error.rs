//! Error module for the Rusty SNN Stats library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SNNError {
    /// Error for invalid arguments, e.g., a kernel longer than the binning template or a single trial.
    InvalidArgument(String),
    /// A trial without any activity, i.e., with zero self-energy.
    /// Energy normalization recovers from it by leaving the trial untouched.
    DegenerateInput(String),
    /// Error for invalid parameters, e.g., a negative firing rate.
    InvalidParameter(String),
    /// Error for recordings which cannot be combined, e.g., voltage traces of different lengths.
    IncompatibleRecordings(String),
    /// Error for out of bounds access, e.g., a neuron outside of the population.
    OutOfBounds(String),
    /// Error while rendering a figure.
    PlotError(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for SNNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SNNError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            SNNError::DegenerateInput(e) => write!(f, "Degenerate input: {}", e),
            SNNError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SNNError::IncompatibleRecordings(e) => write!(f, "Incompatible recordings: {}", e),
            SNNError::OutOfBounds(e) => {
                write!(f, "Index out of bounds: {}", e)
            }
            SNNError::PlotError(e) => write!(f, "Plotting error: {}", e),
            SNNError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SNNError {}

impl From<std::io::Error> for SNNError {
    fn from(e: std::io::Error) -> Self {
        SNNError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for SNNError {
    fn from(e: serde_json::Error) -> Self {
        SNNError::IOError(e.to_string())
    }
}
