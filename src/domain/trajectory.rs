// Straight-line trajectory synthesis from a reported pose

/// Number of points attached to every rendezvous response
pub const TRAJECTORY_POINTS: usize = 20;

/// Distance between consecutive trajectory points
pub const STEP_SIZE: f64 = 1.0;

/// Generates a straight path ahead of a pose
///
/// Heading is in radians, 0 along the positive x-axis and increasing
/// counter-clockwise. Returns `[x0, y0, x1, y1, ...]` with `2 * count`
/// elements; point 0 is exactly `(x0, y0)`.
///
/// # Example
/// ```
/// use fleet_rendezvous::domain::trajectory::synthesize;
///
/// let path = synthesize(0.5, 5.0, 0.0, 3);
/// assert_eq!(path, vec![0.5, 5.0, 1.5, 5.0, 2.5, 5.0]);
/// ```
pub fn synthesize(x0: f64, y0: f64, heading: f64, count: usize) -> Vec<f64> {
    let (sin, cos) = heading.sin_cos();
    let mut path = Vec::with_capacity(count * 2);
    for i in 0..count {
        if i == 0 {
            path.extend([x0, y0]);
            continue;
        }
        let distance = i as f64 * STEP_SIZE;
        path.extend([x0 + distance * cos, y0 + distance * sin]);
    }
    path
}
