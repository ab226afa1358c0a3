//! Serializable timing records and the JSON reports written by the demos.
//!
//! Measurement stages return their own [`TimingBreakdown`]; nothing is
//! collected in global state. Callers that process many plates merge the
//! returned breakdowns with [`TimingBreakdown::accumulate`].

pub mod report;
pub mod timing;

pub use report::{InputDescriptor, PlateReport, SpeedReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
