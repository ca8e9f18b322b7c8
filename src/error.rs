// SPDX-License-Identifier: MPL-2.0
//! Error types for the media control.
//!
//! Only programmer-visible failures are errors. Runtime failures of the
//! native pipeline are recovered by the control and reported as
//! [`EngineFailure`](crate::application::port::EngineFailure) payloads
//! through [`MediaEvent::Failed`](crate::element::MediaEvent::Failed).

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A raw playback state outside the enumeration.
    #[error("Invalid playback state: {0}")]
    InvalidState(String),

    /// The engine adapter could not be created or lacks a required capability.
    #[error("Engine construction failed: {0}")]
    EngineConstruction(String),

    /// A speed ratio that is not finite and strictly positive.
    #[error("Invalid speed ratio: {0}")]
    InvalidSpeedRatio(f64),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("I/O Error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
