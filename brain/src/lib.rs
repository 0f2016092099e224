use log::{debug, info};
use std::collections::VecDeque;
use trajectory::{Trajectory, TrajectoryRequest, TrajectorySample};

/// Downstream step that turns one Cartesian sample into a motion command,
/// e.g. an inverse-kinematics solver feeding a joint controller.
pub trait SampleConsumer {
    type Error;

    fn consume(&mut self, sample: &TrajectorySample) -> Result<(), Self::Error>;
}

#[derive(Debug, Default)]
pub struct Planner {
    trajectory: VecDeque<TrajectorySample>,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            trajectory: VecDeque::new(),
        }
    }

    pub fn add_waypoint(&mut self, sample: TrajectorySample) {
        self.trajectory.push_back(sample);
    }

    pub fn next_step(&mut self) -> Option<TrajectorySample> {
        self.trajectory.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.trajectory.len()
    }

    pub fn clear(&mut self) {
        self.trajectory.clear();
    }
}

#[derive(Debug, Default)]
pub struct RobotBrain {
    planner: Planner,
}

impl RobotBrain {
    pub fn new() -> Self {
        Self {
            planner: Planner::new(),
        }
    }

    /// Computes the whole trajectory before queueing any sample. On error the
    /// queue is left untouched.
    pub fn plan_motion(&mut self, request: &TrajectoryRequest) -> trajectory::Result<usize> {
        let trajectory = Trajectory::new(request)?;

        self.planner.clear();
        for sample in trajectory.samples() {
            self.planner.add_waypoint(sample);
        }
        info!(
            "planned {} samples from {:?} to {:?}",
            trajectory.sample_count(),
            request.initial_position.as_slice(),
            request.final_position.as_slice()
        );
        Ok(trajectory.sample_count())
    }

    pub fn execute_next_step(&mut self) -> Option<TrajectorySample> {
        self.planner.next_step()
    }

    pub fn remaining_steps(&self) -> usize {
        self.planner.remaining()
    }

    /// Hands every queued sample to `consumer` in order, stopping at the first
    /// error. The failing sample is not requeued.
    pub fn stream_to<C: SampleConsumer>(&mut self, consumer: &mut C) -> Result<usize, C::Error> {
        let mut sent = 0;
        while let Some(sample) = self.execute_next_step() {
            consumer.consume(&sample)?;
            sent += 1;
        }
        debug!("streamed {sent} samples");
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajectory::{AngleVector, Position, TrajectoryError};

    fn request() -> TrajectoryRequest {
        TrajectoryRequest::new(
            Position::zeros(),
            Position::new(0.0, 0.0, 1.0),
            AngleVector::zeros(),
            AngleVector::new(0.0, 1.0, 0.0),
            0.0,
            1.0,
            0.1,
        )
    }

    #[derive(Default)]
    struct Recorder {
        indices: Vec<usize>,
        fail_at: Option<usize>,
    }

    impl SampleConsumer for Recorder {
        type Error = String;

        fn consume(&mut self, sample: &TrajectorySample) -> Result<(), Self::Error> {
            if self.fail_at == Some(sample.index) {
                return Err(format!("rejected sample {}", sample.index));
            }
            self.indices.push(sample.index);
            Ok(())
        }
    }

    #[test]
    fn test_planner() {
        let mut brain = RobotBrain::new();
        let planned = brain.plan_motion(&request()).unwrap();
        assert_eq!(planned, 10);
        assert_eq!(brain.remaining_steps(), 10);

        let next_step = brain.execute_next_step();
        assert!(next_step.is_some());
        let first = next_step.unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.time, 0.0);
        assert_eq!(brain.remaining_steps(), 9);
    }

    #[test]
    fn test_failed_plan_keeps_queue() {
        let mut brain = RobotBrain::new();
        brain.plan_motion(&request()).unwrap();

        let mut bad = request();
        bad.sample_period = -0.1;
        assert_eq!(
            brain.plan_motion(&bad),
            Err(TrajectoryError::InvalidSamplePeriod { period: -0.1 })
        );
        assert_eq!(brain.remaining_steps(), 10);
    }

    #[test]
    fn test_stream_in_order() {
        let mut brain = RobotBrain::new();
        brain.plan_motion(&request()).unwrap();

        let mut recorder = Recorder::default();
        assert_eq!(brain.stream_to(&mut recorder), Ok(10));
        assert_eq!(recorder.indices, (0..10).collect::<Vec<_>>());
        assert!(brain.execute_next_step().is_none());
    }

    #[test]
    fn test_stream_stops_on_error() {
        let mut brain = RobotBrain::new();
        brain.plan_motion(&request()).unwrap();

        let mut recorder = Recorder {
            fail_at: Some(4),
            ..Default::default()
        };
        assert!(brain.stream_to(&mut recorder).is_err());
        assert_eq!(recorder.indices, vec![0, 1, 2, 3]);
        assert_eq!(brain.remaining_steps(), 5);
    }
}
