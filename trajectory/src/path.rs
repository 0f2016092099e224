use log::debug;
use nalgebra::{Matrix3, Matrix3xX, Vector3};

use crate::error::{Result, TrajectoryError};
use crate::time_scaling::grid_len;
use crate::{Position, DEGENERATE_EPSILON};

/// Three-row position, first and second derivative channels indexed by sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Channels {
    pub position: Matrix3xX<f64>,
    pub velocity: Matrix3xX<f64>,
    pub acceleration: Matrix3xX<f64>,
}

impl Channels {
    pub fn zeros(len: usize) -> Self {
        Self {
            position: Matrix3xX::zeros(len),
            velocity: Matrix3xX::zeros(len),
            acceleration: Matrix3xX::zeros(len),
        }
    }

    pub fn len(&self) -> usize {
        self.position.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn set(
        &mut self,
        index: usize,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        acceleration: &Vector3<f64>,
    ) {
        self.position.set_column(index, position);
        self.velocity.set_column(index, velocity);
        self.acceleration.set_column(index, acceleration);
    }
}

/// A time-free Cartesian path parameterized by arc length `s` in `[0, length()]`.
pub trait PathGeometry {
    fn length(&self) -> f64;

    fn position(&self, s: f64) -> Position;

    /// `dp/ds`
    fn tangent(&self, s: f64) -> Vector3<f64>;

    /// `d2p/ds2`
    fn curvature(&self, s: f64) -> Vector3<f64>;

    /// Samples the path at `s_k = k * step` for `k` in `[0, floor(length / step))`.
    fn sample_along(&self, step: f64) -> Result<Channels> {
        if !(step.is_finite() && step > 0.0) {
            return Err(TrajectoryError::InvalidSamplePeriod { period: step });
        }
        let length = self.length();
        let len = grid_len(length, step)?;
        if len == 0 {
            return Err(TrajectoryError::EmptyPath { length, step });
        }

        let mut channels = Channels::zeros(len);
        for k in 0..len {
            let s = k as f64 * step;
            channels.set(k, &self.position(s), &self.tangent(s), &self.curvature(s));
        }
        debug!("sampled path of length {length} at step {step}: {len} samples");
        Ok(channels)
    }
}

/// Straight segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePath {
    start: Position,
    direction: Vector3<f64>,
    length: f64,
}

impl LinePath {
    /// A zero-length segment keeps a zero direction, so every derivative is zero.
    pub fn new(start: Position, end: Position) -> Result<Self> {
        if !start.iter().chain(end.iter()).all(|v| v.is_finite()) {
            return Err(TrajectoryError::NonFiniteInput("line endpoints"));
        }
        let support = end - start;
        let length = support.norm();
        let direction = if length > DEGENERATE_EPSILON {
            support / length
        } else {
            debug!("line endpoints coincide, direction collapsed to zero");
            Vector3::zeros()
        };
        Ok(Self {
            start,
            direction,
            length,
        })
    }

    pub fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }
}

impl PathGeometry for LinePath {
    fn length(&self) -> f64 {
        self.length
    }

    fn position(&self, s: f64) -> Position {
        self.start + self.direction * s
    }

    fn tangent(&self, _s: f64) -> Vector3<f64> {
        self.direction
    }

    fn curvature(&self, _s: f64) -> Vector3<f64> {
        Vector3::zeros()
    }
}

/// Circular arc about `center` from `start` towards `end`.
///
/// `end` is assumed to lie at the same distance from `center` as `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    center: Position,
    radius: f64,
    frame: Matrix3<f64>,
    length: f64,
}

impl ArcPath {
    pub fn new(start: Position, end: Position, center: Position) -> Result<Self> {
        if !start
            .iter()
            .chain(end.iter())
            .chain(center.iter())
            .all(|v| v.is_finite())
        {
            return Err(TrajectoryError::NonFiniteInput("arc points"));
        }

        let radius = (start - center).norm();
        let x = center - end;
        let y = center - start;
        let axis = x.cross(&y);
        let axis_norm = axis.norm();
        if radius <= DEGENERATE_EPSILON || axis_norm <= DEGENERATE_EPSILON {
            return Err(TrajectoryError::DegenerateArc);
        }

        let e_x = (start - center) / radius;
        let e_z = axis / axis_norm;
        let e_y = e_x.cross(&e_z);
        let frame = Matrix3::from_columns(&[e_x, e_y, e_z]);

        let length = radius * signed_angle(&x, &y, &axis);
        Ok(Self {
            center,
            radius,
            frame,
            length,
        })
    }

    pub fn center(&self) -> &Position {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Columns are the in-plane start direction, the in-plane normal to it,
    /// and the rotation axis.
    pub fn frame(&self) -> &Matrix3<f64> {
        &self.frame
    }
}

impl PathGeometry for ArcPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn position(&self, s: f64) -> Position {
        let theta = s / self.radius;
        let local = Vector3::new(
            self.radius * theta.cos(),
            self.radius * theta.sin(),
            0.0,
        );
        self.center + self.frame * local
    }

    fn tangent(&self, s: f64) -> Vector3<f64> {
        let theta = s / self.radius;
        self.frame * Vector3::new(-theta.sin(), theta.cos(), 0.0)
    }

    fn curvature(&self, s: f64) -> Vector3<f64> {
        let theta = s / self.radius;
        self.frame * Vector3::new(-theta.cos(), -theta.sin(), 0.0) / self.radius
    }
}

/// Angle from `x` to `y` in `[-pi, pi]`, signed by which side of `normal`
/// their cross product falls on.
pub fn signed_angle(x: &Vector3<f64>, y: &Vector3<f64>, normal: &Vector3<f64>) -> f64 {
    let cross = x.cross(y);
    let side = cross.dot(normal);
    let sign = if side > 0.0 {
        1.0
    } else if side < 0.0 {
        -1.0
    } else {
        0.0
    };
    (sign * cross.norm()).atan2(x.dot(y))
}
