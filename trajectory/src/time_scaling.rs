use log::{debug, trace};
use nalgebra::{Matrix6, RowDVector, RowVector6, Vector6};

use crate::error::{Result, TrajectoryError};

/// Largest sample grid a single window or path may request.
pub const MAX_SAMPLES: usize = 1 << 24;

/// `floor(extent / step)` as a sample count, refusing grids above [`MAX_SAMPLES`].
pub(crate) fn grid_len(extent: f64, step: f64) -> Result<usize> {
    let count = (extent / step).floor();
    if count > MAX_SAMPLES as f64 {
        return Err(TrajectoryError::TooManySamples {
            count,
            limit: MAX_SAMPLES,
        });
    }
    Ok(count as usize)
}

/// Half-open sampling grid `t_i + k * Ts` for `k` in `[0, floor((t_f - t_i) / Ts))`.
///
/// `t_f` itself is never sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    start: f64,
    end: f64,
    sample_period: f64,
    sample_count: usize,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64, sample_period: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(TrajectoryError::NonFiniteInput("time window"));
        }
        if !(sample_period.is_finite() && sample_period > 0.0) {
            return Err(TrajectoryError::InvalidSamplePeriod {
                period: sample_period,
            });
        }
        if end <= start {
            return Err(TrajectoryError::InvalidTimeWindow { start, end });
        }

        let sample_count = grid_len(end - start, sample_period)?;
        if sample_count == 0 {
            return Err(TrajectoryError::EmptyTimeGrid {
                duration: end - start,
                period: sample_period,
            });
        }

        Ok(Self {
            start,
            end,
            sample_period,
            sample_count,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn sample_period(&self) -> f64 {
        self.sample_period
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Time of sample `index`. Not range checked.
    pub fn time_at(&self, index: usize) -> f64 {
        self.start + index as f64 * self.sample_period
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count).map(|k| self.time_at(k))
    }
}

/// Position, velocity and acceleration of a scalar path parameter at both
/// ends of a time window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundaryConditions {
    pub initial: (f64, f64, f64),
    pub exit: (f64, f64, f64),
}

impl BoundaryConditions {
    pub fn new(initial: (f64, f64, f64), exit: (f64, f64, f64)) -> Self {
        Self { initial, exit }
    }

    /// Rest-to-rest motion from `0` to `distance`.
    pub fn rest_to_rest(distance: f64) -> Self {
        Self {
            initial: (0.0, 0.0, 0.0),
            exit: (distance, 0.0, 0.0),
        }
    }
}

/// Degree-5 polynomial `a0 + a1 tau + ... + a5 tau^5` in local time `tau = t - start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuinticPolynomial {
    start: f64,
    coefficients: Vector6<f64>,
}

impl QuinticPolynomial {
    /// Solves `H a = Q` where the rows of `H` are the position, velocity and
    /// acceleration monomial rows at `tau = 0`, then at `tau = end - start`.
    ///
    /// `H` is built in local time so its conditioning depends only on the
    /// window length, not on how far `start` is from zero.
    pub fn solve(start: f64, end: f64, boundary: &BoundaryConditions) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(TrajectoryError::NonFiniteInput("time window"));
        }
        if end <= start {
            return Err(TrajectoryError::InvalidTimeWindow { start, end });
        }

        let duration = end - start;
        let h = Matrix6::from_rows(&[
            Self::position_row(0.0),
            Self::velocity_row(0.0),
            Self::acceleration_row(0.0),
            Self::position_row(duration),
            Self::velocity_row(duration),
            Self::acceleration_row(duration),
        ]);
        let (qi, dqi, ddqi) = boundary.initial;
        let (qf, dqf, ddqf) = boundary.exit;
        let q = Vector6::new(qi, dqi, ddqi, qf, dqf, ddqf);

        let coefficients = h
            .lu()
            .solve(&q)
            .ok_or(TrajectoryError::SingularBoundaryMatrix)?;
        if coefficients.iter().any(|a| !a.is_finite()) {
            return Err(TrajectoryError::SingularBoundaryMatrix);
        }
        trace!("quintic coefficients: {:?}", coefficients.as_slice());

        Ok(Self {
            start,
            coefficients,
        })
    }

    fn position_row(t: f64) -> RowVector6<f64> {
        RowVector6::new(1.0, t, t.powi(2), t.powi(3), t.powi(4), t.powi(5))
    }

    fn velocity_row(t: f64) -> RowVector6<f64> {
        RowVector6::new(
            0.0,
            1.0,
            2.0 * t,
            3.0 * t.powi(2),
            4.0 * t.powi(3),
            5.0 * t.powi(4),
        )
    }

    fn acceleration_row(t: f64) -> RowVector6<f64> {
        RowVector6::new(0.0, 0.0, 2.0, 6.0 * t, 12.0 * t.powi(2), 20.0 * t.powi(3))
    }

    /// Coefficients in local time `tau = t - start`.
    pub fn coefficients(&self) -> &Vector6<f64> {
        &self.coefficients
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn position(&self, t: f64) -> f64 {
        let t = t - self.start;
        let a = &self.coefficients;
        ((((a[5] * t + a[4]) * t + a[3]) * t + a[2]) * t + a[1]) * t + a[0]
    }

    pub fn velocity(&self, t: f64) -> f64 {
        let t = t - self.start;
        let a = &self.coefficients;
        (((5.0 * a[5] * t + 4.0 * a[4]) * t + 3.0 * a[3]) * t + 2.0 * a[2]) * t + a[1]
    }

    pub fn acceleration(&self, t: f64) -> f64 {
        let t = t - self.start;
        let a = &self.coefficients;
        ((20.0 * a[5] * t + 12.0 * a[4]) * t + 6.0 * a[3]) * t + 2.0 * a[2]
    }
}

/// `s(t_k)`, `ds/dt(t_k)` and `d2s/dt2(t_k)` over a time window.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarProfile {
    pub position: RowDVector<f64>,
    pub velocity: RowDVector<f64>,
    pub acceleration: RowDVector<f64>,
}

impl ScalarProfile {
    pub fn quintic(window: &TimeWindow, boundary: &BoundaryConditions) -> Result<Self> {
        let polynomial = QuinticPolynomial::solve(window.start(), window.end(), boundary)?;
        let len = window.sample_count();

        let profile = Self {
            position: RowDVector::from_fn(len, |_, k| polynomial.position(window.time_at(k))),
            velocity: RowDVector::from_fn(len, |_, k| polynomial.velocity(window.time_at(k))),
            acceleration: RowDVector::from_fn(len, |_, k| {
                polynomial.acceleration(window.time_at(k))
            }),
        };
        debug!(
            "quintic profile {:?} -> {:?} over [{}, {}): {} samples",
            boundary.initial,
            boundary.exit,
            window.start(),
            window.end(),
            len
        );
        Ok(profile)
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-9;

    #[rstest]
    #[case(0.0, 2.0, 0.1, 20)]
    #[case(0.0, 1.0, 0.25, 4)]
    #[case(1.0, 3.5, 0.5, 5)]
    #[case(0.0, 1.0, 0.3, 3)]
    #[case(100.0, 102.0, 0.1, 20)]
    #[case(1000.0, 1002.0, 0.1, 20)]
    fn test_sample_count_is_floor(
        #[case] start: f64,
        #[case] end: f64,
        #[case] period: f64,
        #[case] expected: usize,
    ) {
        let window = TimeWindow::new(start, end, period).unwrap();
        assert_eq!(window.sample_count(), expected);
        assert_eq!(window.times().count(), expected);
    }

    #[test]
    fn test_time_grid_is_half_open() {
        let window = TimeWindow::new(0.0, 2.0, 0.5).unwrap();
        let times: Vec<f64> = window.times().collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[rstest]
    #[case(2.0, 2.0)]
    #[case(2.0, 1.0)]
    fn test_rejects_inverted_window(#[case] start: f64, #[case] end: f64) {
        assert_eq!(
            TimeWindow::new(start, end, 0.1),
            Err(TrajectoryError::InvalidTimeWindow { start, end })
        );
    }

    #[test]
    fn test_rejects_bad_period_and_empty_grid() {
        assert!(matches!(
            TimeWindow::new(0.0, 1.0, 0.0),
            Err(TrajectoryError::InvalidSamplePeriod { .. })
        ));
        assert!(matches!(
            TimeWindow::new(0.0, 1.0, f64::NAN),
            Err(TrajectoryError::InvalidSamplePeriod { .. })
        ));
        assert!(matches!(
            TimeWindow::new(0.0, 0.05, 0.1),
            Err(TrajectoryError::EmptyTimeGrid { .. })
        ));
    }

    #[rstest]
    #[case(1.0e-300)]
    #[case(1.0e-9)]
    fn test_rejects_oversized_grid(#[case] period: f64) {
        assert!(matches!(
            TimeWindow::new(0.0, 1.0, period),
            Err(TrajectoryError::TooManySamples { limit: MAX_SAMPLES, .. })
        ));
    }

    #[test]
    fn test_profile_far_from_time_origin() {
        let window = TimeWindow::new(1000.0, 1002.0, 0.1).unwrap();
        let profile =
            ScalarProfile::quintic(&window, &BoundaryConditions::rest_to_rest(1.0)).unwrap();

        assert!(profile.position[0].abs() < TOLERANCE);
        assert!(profile.velocity[0].abs() < TOLERANCE);
        assert!((profile.position[profile.len() - 1] - 1.0).abs() < 1e-2);
        assert!(profile.position.iter().all(|s| (-TOLERANCE..=1.0).contains(s)));
    }

    #[rstest]
    #[case(0.0, 2.0, (0.0, 0.0, 0.0), (1.0, 0.0, 0.0))]
    #[case(1.0, 3.0, (0.5, 0.2, -0.1), (-1.5, 0.3, 0.4))]
    #[case(0.5, 1.5, (2.0, -1.0, 0.0), (2.0, 1.0, 0.0))]
    #[case(100.0, 102.0, (0.0, 0.0, 0.0), (1.0, 0.0, 0.0))]
    #[case(1000.0, 1002.0, (0.0, 0.0, 0.0), (1.0, 0.0, 0.0))]
    #[case(1000.0, 1003.0, (0.5, 0.2, -0.1), (-1.5, 0.3, 0.4))]
    #[case(1.0e4, 1.0e4 + 2.0, (0.0, 0.0, 0.0), (1.0, 0.0, 0.0))]
    fn test_quintic_meets_boundary_conditions(
        #[case] start: f64,
        #[case] end: f64,
        #[case] initial: (f64, f64, f64),
        #[case] exit: (f64, f64, f64),
    ) {
        let boundary = BoundaryConditions::new(initial, exit);
        let poly = QuinticPolynomial::solve(start, end, &boundary).unwrap();

        assert!((poly.position(start) - initial.0).abs() < TOLERANCE);
        assert!((poly.velocity(start) - initial.1).abs() < TOLERANCE);
        assert!((poly.acceleration(start) - initial.2).abs() < TOLERANCE);
        assert!((poly.position(end) - exit.0).abs() < TOLERANCE);
        assert!((poly.velocity(end) - exit.1).abs() < TOLERANCE);
        assert!((poly.acceleration(end) - exit.2).abs() < TOLERANCE);
    }

    #[test]
    fn test_quintic_rejects_collapsed_window() {
        let boundary = BoundaryConditions::rest_to_rest(1.0);
        assert!(QuinticPolynomial::solve(1.0, 1.0, &boundary).is_err());
    }

    #[test]
    fn test_constant_profile_when_at_rest() {
        let window = TimeWindow::new(0.0, 1.0, 0.1).unwrap();
        let boundary = BoundaryConditions::new((3.0, 0.0, 0.0), (3.0, 0.0, 0.0));
        let profile = ScalarProfile::quintic(&window, &boundary).unwrap();

        assert_eq!(profile.len(), 10);
        for k in 0..profile.len() {
            assert!((profile.position[k] - 3.0).abs() < TOLERANCE);
            assert!(profile.velocity[k].abs() < TOLERANCE);
            assert!(profile.acceleration[k].abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_rest_to_rest_profile_is_monotonic() {
        let window = TimeWindow::new(0.0, 2.0, 0.1).unwrap();
        let profile =
            ScalarProfile::quintic(&window, &BoundaryConditions::rest_to_rest(1.0)).unwrap();

        assert!(profile.position[0].abs() < TOLERANCE);
        assert!(profile.velocity[0].abs() < TOLERANCE);
        for k in 1..profile.len() {
            assert!(profile.position[k] > profile.position[k - 1]);
            assert!(profile.velocity[k] >= 0.0);
        }
        // Last sample sits one period before t_f.
        assert!((profile.position[profile.len() - 1] - 1.0).abs() < 1e-2);
    }
}
