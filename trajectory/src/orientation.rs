//! End-effector orientation as a three-parameter angle vector.
//!
//! The angle vector is read off the frame matrix `[t | b | n]` with
//!
//! ```text
//! phi1 = atan2(sqrt(R02^2 + R12^2), R22)
//! phi2 = atan2(R12, R02)
//! phi3 = atan2(R21, -R20)
//! ```
//!
//! This matches no named Euler convention and has no inverse in this crate.
//! It is kept as-is so downstream consumers see the same numbers.

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::error::{Result, TrajectoryError};
use crate::path::Channels;
use crate::time_scaling::{BoundaryConditions, ScalarProfile, TimeWindow};
use crate::{AngleVector, DEGENERATE_EPSILON};

/// Tangent, normal and binormal of a path at one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrenetFrame {
    pub tangent: Vector3<f64>,
    pub normal: Vector3<f64>,
    pub binormal: Vector3<f64>,
}

impl FrenetFrame {
    /// `t = v / |v|`, `n = a / |a|`, `b = t x n`.
    pub fn from_derivatives(
        velocity: &Vector3<f64>,
        acceleration: &Vector3<f64>,
        index: usize,
    ) -> Result<Self> {
        let speed = velocity.norm();
        let magnitude = acceleration.norm();
        if speed <= DEGENERATE_EPSILON || magnitude <= DEGENERATE_EPSILON {
            return Err(TrajectoryError::DegenerateFrenetFrame { index });
        }

        let tangent = velocity / speed;
        let normal = acceleration / magnitude;
        let binormal = tangent.cross(&normal);
        Ok(Self {
            tangent,
            normal,
            binormal,
        })
    }

    /// Columns in the order tangent, binormal, normal.
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[self.tangent, self.binormal, self.normal])
    }

    pub fn angle_vector(&self) -> AngleVector {
        angle_vector(&self.matrix())
    }
}

pub fn angle_vector(r: &Matrix3<f64>) -> AngleVector {
    AngleVector::new(
        (r[(0, 2)].powi(2) + r[(1, 2)].powi(2)).sqrt().atan2(r[(2, 2)]),
        r[(1, 2)].atan2(r[(0, 2)]),
        r[(2, 1)].atan2(-r[(2, 0)]),
    )
}

/// Angle vectors at the first and last sample of a sampled path.
pub fn frenet_endpoints(path: &Channels) -> Result<(AngleVector, AngleVector)> {
    if path.is_empty() {
        return Err(TrajectoryError::DegenerateFrenetFrame { index: 0 });
    }
    let last = path.len() - 1;

    let initial = FrenetFrame::from_derivatives(
        &path.velocity.column(0).into_owned(),
        &path.acceleration.column(0).into_owned(),
        0,
    )?;
    let exit = FrenetFrame::from_derivatives(
        &path.velocity.column(last).into_owned(),
        &path.acceleration.column(last).into_owned(),
        last,
    )?;

    let endpoints = (initial.angle_vector(), exit.angle_vector());
    debug!("Frenet orientation {:?} -> {:?}", endpoints.0, endpoints.1);
    Ok(endpoints)
}

/// Moves the angle vector from `initial` to `exit` along their difference
/// under a rest-to-rest quintic time law.
///
/// Equal endpoints give a constant orientation with zero derivatives.
pub fn interpolate(
    initial: &AngleVector,
    exit: &AngleVector,
    window: &TimeWindow,
) -> Result<Channels> {
    if !initial.iter().chain(exit.iter()).all(|v| v.is_finite()) {
        return Err(TrajectoryError::NonFiniteInput("orientation endpoints"));
    }

    let support = exit - initial;
    let distance = support.norm();
    let direction = if distance > DEGENERATE_EPSILON {
        support / distance
    } else {
        debug!("orientation endpoints coincide, holding orientation constant");
        Vector3::zeros()
    };

    let profile = ScalarProfile::quintic(window, &BoundaryConditions::rest_to_rest(distance))?;
    let mut channels = Channels::zeros(profile.len());
    for k in 0..profile.len() {
        channels.set(
            k,
            &(initial + direction * profile.position[k]),
            &(direction * profile.velocity[k]),
            &(direction * profile.acceleration[k]),
        );
    }
    Ok(channels)
}
