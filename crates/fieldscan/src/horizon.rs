//! Kinematic ground-horizon model.
//!
//! The horizon line is computed from body/camera kinematics by the platform
//! layer; vision consumes it as an opaque `y = f(x)` oracle bounding the
//! region where green field can appear.

/// Image-space horizon line `y = gradient · x + y_intercept`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Horizon {
    pub gradient: f32,
    pub y_intercept: f32,
}

impl Horizon {
    pub fn new(gradient: f32, y_intercept: f32) -> Self {
        Self {
            gradient,
            y_intercept,
        }
    }

    /// A level horizon at a fixed image row.
    pub fn level(y: f32) -> Self {
        Self::new(0.0, y)
    }

    /// Expected horizon row at column `x`.
    #[inline]
    pub fn y_at_x(&self, x: i32) -> f32 {
        self.gradient * x as f32 + self.y_intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_horizon_is_constant() {
        let h = Horizon::level(42.0);
        assert_eq!(h.y_at_x(0), 42.0);
        assert_eq!(h.y_at_x(319), 42.0);
    }

    #[test]
    fn sloped_horizon_follows_gradient() {
        let h = Horizon::new(0.5, 10.0);
        assert_eq!(h.y_at_x(20), 20.0);
    }
}
