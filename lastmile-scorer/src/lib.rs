//! Route evaluation for the lastmile engine.
//!
//! [`RouteEvaluator`] derives aggregate metrics (total distance, estimated
//! duration and a normalised efficiency score) from a planned route plus
//! the deliveries and vehicle behind it, and produces rule-based
//! improvement suggestions. Every output is a deterministic function of the
//! inputs: evaluating the same route twice yields identical numbers, and a
//! metric that cannot be derived from the data at hand is reported as
//! absent rather than invented.

#![forbid(unsafe_code)]

mod metrics;
mod suggest;

pub use metrics::{EvaluatorConfig, EvaluatorConfigError, RouteEvaluator, RouteMetrics};
pub use suggest::Suggestion;
