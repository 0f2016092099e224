use log::debug;
use nalgebra::{Matrix3xX, Matrix6xX, Vector6};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrajectoryError};
use crate::orientation;
use crate::path::{ArcPath, Channels, LinePath, PathGeometry};
use crate::time_scaling::TimeWindow;
use crate::timed;
use crate::{AngleVector, Position};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathShape {
    #[default]
    Line,
    Arc { center: Position },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationSource {
    /// Interpolate between the requested angle vectors.
    #[default]
    Fixed,
    /// Derive both angle vectors from the path's Frenet frame at its ends.
    Frenet,
}

/// Everything needed to build one trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRequest {
    pub initial_position: Position,
    pub final_position: Position,
    pub initial_orientation: AngleVector,
    pub final_orientation: AngleVector,
    pub start_time: f64,
    pub end_time: f64,
    pub sample_period: f64,
    #[serde(default)]
    pub path: PathShape,
    #[serde(default)]
    pub orientation: OrientationSource,
}

impl TrajectoryRequest {
    pub fn new(
        initial_position: Position,
        final_position: Position,
        initial_orientation: AngleVector,
        final_orientation: AngleVector,
        start_time: f64,
        end_time: f64,
        sample_period: f64,
    ) -> Self {
        Self {
            initial_position,
            final_position,
            initial_orientation,
            final_orientation,
            start_time,
            end_time,
            sample_period,
            path: PathShape::Line,
            orientation: OrientationSource::Fixed,
        }
    }

    pub fn with_path(mut self, path: PathShape) -> Self {
        self.path = path;
        self
    }

    pub fn with_orientation(mut self, orientation: OrientationSource) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Pose, twist or its derivative: Cartesian part and angle-vector part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianState {
    pub linear: Position,
    pub angular: AngleVector,
}

impl CartesianState {
    /// `(x, y, z, phi1, phi2, phi3)`
    pub fn to_vector(&self) -> Vector6<f64> {
        Vector6::new(
            self.linear.x,
            self.linear.y,
            self.linear.z,
            self.angular.x,
            self.angular.y,
            self.angular.z,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub index: usize,
    pub time: f64,
    pub position: CartesianState,
    pub velocity: CartesianState,
    pub acceleration: CartesianState,
}

/// A fully sampled 6-DOF trajectory. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    window: TimeWindow,
    cartesian: Channels,
    orientation: Channels,
}

impl Trajectory {
    pub fn new(request: &TrajectoryRequest) -> Result<Self> {
        let window = TimeWindow::new(request.start_time, request.end_time, request.sample_period)?;

        let (cartesian, (initial, exit)) = match request.path {
            PathShape::Line => {
                let line = LinePath::new(request.initial_position, request.final_position)?;
                (
                    timed::with_timing(&line, &window)?,
                    Self::orientation_ends(&line, request, &window)?,
                )
            }
            PathShape::Arc { center } => {
                let arc = ArcPath::new(request.initial_position, request.final_position, center)?;
                (
                    timed::with_timing(&arc, &window)?,
                    Self::orientation_ends(&arc, request, &window)?,
                )
            }
        };
        let orientation = orientation::interpolate(&initial, &exit, &window)?;

        debug!(
            "trajectory {:?} path, {:?} orientation: {} samples of {}s",
            request.path,
            request.orientation,
            window.sample_count(),
            window.sample_period()
        );
        Ok(Self {
            window,
            cartesian,
            orientation,
        })
    }

    fn orientation_ends<P: PathGeometry>(
        path: &P,
        request: &TrajectoryRequest,
        window: &TimeWindow,
    ) -> Result<(AngleVector, AngleVector)> {
        match request.orientation {
            OrientationSource::Fixed => {
                Ok((request.initial_orientation, request.final_orientation))
            }
            OrientationSource::Frenet => {
                orientation::frenet_endpoints(&path.sample_along(window.sample_period())?)
            }
        }
    }

    pub fn sample_count(&self) -> usize {
        self.window.sample_count()
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn cartesian(&self) -> &Channels {
        &self.cartesian
    }

    pub fn orientation(&self) -> &Channels {
        &self.orientation
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.sample_count() {
            return Err(TrajectoryError::SampleIndexOutOfRange {
                index,
                len: self.sample_count(),
            });
        }
        Ok(())
    }

    pub fn time(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.window.time_at(index))
    }

    pub fn position(&self, index: usize) -> Result<CartesianState> {
        self.check_index(index)?;
        Ok(Self::state(&self.cartesian.position, &self.orientation.position, index))
    }

    pub fn velocity(&self, index: usize) -> Result<CartesianState> {
        self.check_index(index)?;
        Ok(Self::state(&self.cartesian.velocity, &self.orientation.velocity, index))
    }

    pub fn acceleration(&self, index: usize) -> Result<CartesianState> {
        self.check_index(index)?;
        Ok(Self::state(
            &self.cartesian.acceleration,
            &self.orientation.acceleration,
            index,
        ))
    }

    pub fn sample(&self, index: usize) -> Result<TrajectorySample> {
        self.check_index(index)?;
        Ok(self.sample_at(index))
    }

    pub fn samples(&self) -> impl Iterator<Item = TrajectorySample> + '_ {
        (0..self.sample_count()).map(move |k| self.sample_at(k))
    }

    fn sample_at(&self, index: usize) -> TrajectorySample {
        TrajectorySample {
            index,
            time: self.window.time_at(index),
            position: Self::state(&self.cartesian.position, &self.orientation.position, index),
            velocity: Self::state(&self.cartesian.velocity, &self.orientation.velocity, index),
            acceleration: Self::state(
                &self.cartesian.acceleration,
                &self.orientation.acceleration,
                index,
            ),
        }
    }

    /// Rows 0-2 Cartesian position, rows 3-5 angle vector.
    pub fn position_matrix(&self) -> Matrix6xX<f64> {
        Self::stack(&self.cartesian.position, &self.orientation.position)
    }

    pub fn velocity_matrix(&self) -> Matrix6xX<f64> {
        Self::stack(&self.cartesian.velocity, &self.orientation.velocity)
    }

    pub fn acceleration_matrix(&self) -> Matrix6xX<f64> {
        Self::stack(&self.cartesian.acceleration, &self.orientation.acceleration)
    }

    fn state(linear: &Matrix3xX<f64>, angular: &Matrix3xX<f64>, index: usize) -> CartesianState {
        CartesianState {
            linear: linear.column(index).into_owned(),
            angular: angular.column(index).into_owned(),
        }
    }

    fn stack(linear: &Matrix3xX<f64>, angular: &Matrix3xX<f64>) -> Matrix6xX<f64> {
        let mut stacked = Matrix6xX::zeros(linear.ncols());
        stacked.fixed_rows_mut::<3>(0).copy_from(linear);
        stacked.fixed_rows_mut::<3>(3).copy_from(angular);
        stacked
    }
}
