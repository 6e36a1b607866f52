//! Neon Barrage - combat simulation core for a top-down shooter
//!
//! Core modules:
//! - `sim`: Projectile/particle pools, enemy agents, waves, collision, the step function
//! - `session`: Per-run score/difficulty context and the host collaborator seam
//! - `settings`: Persisted player preferences (difficulty, volumes, high score)
//! - `tuning`: Data-driven run configuration
//! - `snapshot`: Flat read-only view of the simulation for a renderer

pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use session::{Host, NullHost, Session, Track};
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

use std::f32::consts::{PI, TAU};

/// Playfield and step constants
pub mod consts {
    /// Fixed simulation timestep (one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Virtual playfield size in simulation units
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const FIELD_HEIGHT: f32 = 720.0;

    /// Projectiles and particles are reclaimed once this far outside the field
    pub const FIELD_MARGIN: f32 = 50.0;
    /// Hit projectiles are parked here until the next compaction
    pub const OFF_FIELD_Y: f32 = -1000.0;

    /// Horizontal clamp shared by player and enemies
    pub const SIDE_MARGIN: f32 = 20.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    while angle >= PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Exponentially ease `current` toward `target` along the shortest arc.
///
/// `rate` is in 1/s; the fraction covered per step is `1 - e^(-rate*dt)`,
/// so the result never overshoots and is frame-rate independent.
#[inline]
pub fn ease_angle(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta * (1.0 - (-rate * dt).exp()))
}

/// Facing angle for a travel direction. 0 faces down the field (+y).
#[inline]
pub fn facing_for(dir: glam::Vec2) -> f32 {
    normalize_angle(dir.y.atan2(dir.x) - std::f32::consts::FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert_eq!(normalize_angle(0.25), 0.25);
    }

    #[test]
    fn test_ease_angle_takes_short_way_round() {
        // From just below +π to just above -π is a tiny step, not a full turn
        let eased = ease_angle(PI - 0.1, -PI + 0.1, 5.0, 1.0 / 60.0);
        assert!(eased > PI - 0.1 || eased < -PI + 0.1);
    }

    #[test]
    fn test_ease_angle_never_snaps() {
        let eased = ease_angle(0.0, 1.0, 5.0, 1.0 / 60.0);
        assert!(eased > 0.0 && eased < 1.0);
    }

    #[test]
    fn test_facing_for_down_is_zero() {
        assert!(facing_for(Vec2::new(0.0, 1.0)).abs() < 1e-6);
        assert!((facing_for(Vec2::new(1.0, 0.0)) + PI / 2.0).abs() < 1e-6);
    }
}
