use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrajectoryError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("invalid time window: end time {end} must be greater than start time {start}")]
    InvalidTimeWindow { start: f64, end: f64 },

    #[error("invalid sample period {period}: must be finite and positive")]
    InvalidSamplePeriod { period: f64 },

    #[error("time window of {duration}s holds no sample at period {period}s")]
    EmptyTimeGrid { duration: f64, period: f64 },

    #[error("grid of {count} samples exceeds the limit of {limit}")]
    TooManySamples { count: f64, limit: usize },

    #[error("quintic boundary matrix is singular")]
    SingularBoundaryMatrix,

    #[error("arc is degenerate: zero radius or start, end and center are collinear")]
    DegenerateArc,

    #[error("path of length {length} holds no sample at step {step}")]
    EmptyPath { length: f64, step: f64 },

    #[error("Frenet frame undefined at sample {index}: zero velocity or acceleration")]
    DegenerateFrenetFrame { index: usize },

    #[error("sample index {index} out of range for trajectory of {len} samples")]
    SampleIndexOutOfRange { index: usize, len: usize },

    #[error("non-finite value in {0}")]
    NonFiniteInput(&'static str),
}
