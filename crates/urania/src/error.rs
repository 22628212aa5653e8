use crate::ephemeris::{CelestialBody, EphemerisError};
use thiserror::Error;

/// Errors produced by chart, transit, synastry and reading calculations.
#[derive(Error, Debug)]
pub enum UraniaError {
    #[error("Invalid birth data: {field} = {value}. {message}")]
    InvalidBirthData {
        field: &'static str,
        value: String,
        message: String,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error("No position available for {0}")]
    MissingBody(CelestialBody),
    #[error("{what} did not converge after {iterations} iterations")]
    Convergence { what: String, iterations: usize },
}

impl UraniaError {
    pub(crate) fn birth(
        field: &'static str,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidBirthData {
            field,
            value: value.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UraniaError>;
