//! Behaviour inputs: the per-cycle sensor snapshot and shared team state.
//!
//! The platform layer reports every reading with a validity flag, modelled
//! here as `Option`. Behaviours must treat `None` as "sensor said nothing
//! this cycle", not as zero.

/// Immutable copy of the sensor values behaviour reads in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorsSnapshot {
    pub current_time_ms: f64,
    pub head_yaw: Option<f32>,
    pub head_pitch: Option<f32>,
    /// Ultrasonic echo distances (cm), nearest first.
    pub distance_left: Option<Vec<f32>>,
    pub distance_right: Option<Vec<f32>>,
    /// Whether the motion engine is currently executing a kick.
    pub kick_active: Option<bool>,
    pub single_chest_click: bool,
    pub long_chest_click: bool,
}

/// No reading means no obstacle as far as avoidance is concerned.
const NO_OBSTACLE_CM: f32 = 255.0;

impl SensorsSnapshot {
    pub fn at(current_time_ms: f64) -> Self {
        Self {
            current_time_ms,
            ..Self::default()
        }
    }

    /// Nearest left ultrasonic reading, or [`NO_OBSTACLE_CM`].
    pub fn left_obstacle_cm(&self) -> f32 {
        self.distance_left
            .as_deref()
            .and_then(|d| d.first())
            .copied()
            .unwrap_or(NO_OBSTACLE_CM)
    }

    /// Nearest right ultrasonic reading, or [`NO_OBSTACLE_CM`].
    pub fn right_obstacle_cm(&self) -> f32 {
        self.distance_right
            .as_deref()
            .and_then(|d| d.first())
            .copied()
            .unwrap_or(NO_OBSTACLE_CM)
    }

    pub fn chest_clicked(&self) -> bool {
        self.single_chest_click || self.long_chest_click
    }
}

/// Shared team knowledge relevant to role selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamInfo {
    pub am_closest_to_ball: bool,
}

/// Referee/game-controller state. Carried through the behaviour context so
/// game-state-aware behaviours have a slot for it; nothing in this crate
/// reads it yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameInfo;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ultrasonics_read_as_clear() {
        let sensors = SensorsSnapshot::at(0.0);
        assert_eq!(sensors.left_obstacle_cm(), 255.0);
        assert_eq!(sensors.right_obstacle_cm(), 255.0);
    }

    #[test]
    fn nearest_echo_wins() {
        let mut sensors = SensorsSnapshot::at(0.0);
        sensors.distance_left = Some(vec![42.0, 90.0]);
        assert_eq!(sensors.left_obstacle_cm(), 42.0);
    }

    #[test]
    fn empty_echo_vector_reads_as_clear() {
        let mut sensors = SensorsSnapshot::at(0.0);
        sensors.distance_right = Some(vec![]);
        assert_eq!(sensors.right_obstacle_cm(), 255.0);
    }
}
