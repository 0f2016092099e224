use log::debug;

use crate::error::Result;
use crate::path::{ArcPath, Channels, LinePath, PathGeometry};
use crate::time_scaling::{BoundaryConditions, ScalarProfile, TimeWindow};
use crate::Position;

/// Drives `path` along its full length with a rest-to-rest quintic time law.
///
/// Velocity is `p'(s) * ds/dt` and acceleration `p''(s) * (ds/dt)^2 + p'(s) * d2s/dt2`.
/// The sample count is always `window.sample_count()`.
pub fn with_timing<P: PathGeometry>(path: &P, window: &TimeWindow) -> Result<Channels> {
    let boundary = BoundaryConditions::rest_to_rest(path.length());
    let profile = ScalarProfile::quintic(window, &boundary)?;

    let mut channels = Channels::zeros(profile.len());
    for k in 0..profile.len() {
        let s = profile.position[k];
        let sd = profile.velocity[k];
        let sdd = profile.acceleration[k];

        let tangent = path.tangent(s);
        let velocity = tangent * sd;
        let acceleration = path.curvature(s) * (sd * sd) + tangent * sdd;
        channels.set(k, &path.position(s), &velocity, &acceleration);
    }
    debug!(
        "timed path of length {} over {} samples",
        path.length(),
        channels.len()
    );
    Ok(channels)
}

/// Straight line from `start` to `end` under the quintic time law.
pub fn linear_with_timing(
    start: Position,
    end: Position,
    window: &TimeWindow,
) -> Result<Channels> {
    with_timing(&LinePath::new(start, end)?, window)
}

/// Circular arc about `center` from `start` to `end` under the quintic time law.
pub fn circular_with_timing(
    start: Position,
    end: Position,
    center: Position,
    window: &TimeWindow,
) -> Result<Channels> {
    with_timing(&ArcPath::new(start, end, center)?, window)
}
