//! Cartesian trajectory generation for an end-effector moving between two poses.
//!
//! A rest-to-rest quintic time law drives a straight or circular path, while the
//! orientation, kept as a three-parameter angle vector, is interpolated under the
//! same law. [`Trajectory`] assembles both into position, velocity and
//! acceleration channels sampled on a half-open time grid.

use nalgebra::Vector3;

pub mod assembler;
pub mod error;
pub mod orientation;
pub mod path;
pub mod time_scaling;
pub mod timed;

pub use assembler::{
    CartesianState, OrientationSource, PathShape, Trajectory, TrajectoryRequest, TrajectorySample,
};
pub use error::{Result, TrajectoryError};
pub use path::{ArcPath, Channels, LinePath, PathGeometry};
pub use time_scaling::{BoundaryConditions, QuinticPolynomial, ScalarProfile, TimeWindow};

pub type Position = Vector3<f64>;

/// `(phi1, phi2, phi3)`, see [`orientation`].
pub type AngleVector = Vector3<f64>;

/// Norms at or below this are treated as zero when normalizing a direction.
pub const DEGENERATE_EPSILON: f64 = 1e-12;
