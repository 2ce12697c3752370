//! Error types emitted by the lastmile CLI.

use std::path::PathBuf;

use thiserror::Error;

use lastmile_engine::{CoordinateError, DeliveryParseError, DispatchError};

/// Errors emitted by the lastmile CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// The scenario file could not be read.
    #[error("failed to read scenario {path:?}: {source}")]
    ReadScenario {
        /// Path that was given on the command line.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The scenario file is not valid JSON for the expected shape.
    #[error("failed to parse scenario {path:?}: {source}")]
    ParseScenario {
        /// Path that was given on the command line.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The depot coordinates are out of range.
    #[error("invalid depot: {0}")]
    InvalidDepot(#[source] CoordinateError),
    /// A delivery's destination coordinates are out of range.
    #[error("delivery {id}: {source}")]
    InvalidDestination {
        /// The offending delivery.
        id: u64,
        /// The underlying coordinate error.
        #[source]
        source: CoordinateError,
    },
    /// A delivery names a priority level that does not exist.
    #[error("delivery {id}: {source}")]
    InvalidPriority {
        /// The offending delivery.
        id: u64,
        /// The underlying parse error.
        #[source]
        source: DeliveryParseError,
    },
    /// Planning or committing the routes failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The result could not be encoded as JSON.
    #[error("failed to encode result: {0}")]
    EncodeResult(#[from] serde_json::Error),
}
