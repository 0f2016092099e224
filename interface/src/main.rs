mod config;

use brain::{RobotBrain, SampleConsumer};
use config::{DEFAULT_CONFIG_PATH, MotionConfig};
use log::{error, info};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use trajectory::TrajectorySample;

/// Prints each pose as `(x, y, z, phi1, phi2, phi3)`.
struct ConsoleSink;

impl SampleConsumer for ConsoleSink {
    type Error = Infallible;

    fn consume(&mut self, sample: &TrajectorySample) -> Result<(), Self::Error> {
        let pose = sample.position.to_vector();
        println!(
            "{:>4} t={:.3} pose=[{:.5}, {:.5}, {:.5}, {:.5}, {:.5}, {:.5}]",
            sample.index, sample.time, pose[0], pose[1], pose[2], pose[3], pose[4], pose[5]
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH)
    });
    info!("Loading motion request from {}", path.display());
    let config = MotionConfig::load(&path)?;

    let mut brain = RobotBrain::new();
    let planned = match brain.plan_motion(&config.trajectory) {
        Ok(planned) => planned,
        Err(e) => {
            error!("Trajectory planning failed: {e}");
            return Err(e.into());
        }
    };
    info!("Planned {planned} samples");

    let mut sink = ConsoleSink;
    if config.realtime {
        let period = Duration::from_secs_f64(config.trajectory.sample_period);
        while let Some(sample) = brain.execute_next_step() {
            sink.consume(&sample)?;
            sleep(period).await;
        }
    } else {
        brain.stream_to(&mut sink)?;
    }

    info!("Motion complete.");
    Ok(())
}
