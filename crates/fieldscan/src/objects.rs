//! Typed field objects: the frame-to-frame state written by vision and read
//! by behaviour.
//!
//! Sightings are recorded in polar form relative to the camera. Visibility
//! is per frame, but `time_seen_ms` accumulates across frames within a
//! sighting episode: a gap longer than [`SIGHTING_GAP_MS`] starts a new
//! episode from zero. Behaviour keys decisions like "ball settled long
//! enough to kick" off that accumulated value.

/// Gap after which a new sighting no longer continues the previous episode.
pub const SIGHTING_GAP_MS: f64 = 500.0;

/// A camera-relative measurement in polar form.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Polar {
    pub distance_cm: f32,
    pub bearing_rad: f32,
    pub elevation_rad: f32,
}

impl Polar {
    pub fn new(distance_cm: f32, bearing_rad: f32, elevation_rad: f32) -> Self {
        Self {
            distance_cm,
            bearing_rad,
            elevation_rad,
        }
    }
}

/// An object that moves on the field (the ball, other robots).
#[derive(Debug, Clone, Default)]
pub struct MobileObject {
    pub relative: Polar,
    pub relative_error: Polar,
    /// Estimated field-frame position, metres-free: centimetres, field origin.
    pub field_location: [f32; 2],
    pub field_velocity: [f32; 2],
    is_visible: bool,
    time_last_seen_ms: f64,
    time_seen_ms: f64,
    ever_seen: bool,
}

impl MobileObject {
    /// Record a sighting at `timestamp_ms`.
    pub fn update_visual(&mut self, relative: Polar, relative_error: Polar, timestamp_ms: f64) {
        let gap = timestamp_ms - self.time_last_seen_ms;
        if !self.ever_seen || gap > SIGHTING_GAP_MS {
            self.time_seen_ms = 0.0;
        } else {
            self.time_seen_ms += gap;
        }
        self.relative = relative;
        self.relative_error = relative_error;
        self.time_last_seen_ms = timestamp_ms;
        self.is_visible = true;
        self.ever_seen = true;
    }

    /// Clear per-frame visibility; called at the start of every frame.
    pub fn mark_not_seen(&mut self) {
        self.is_visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Milliseconds of continuous sighting within the current episode.
    pub fn time_seen_ms(&self) -> f64 {
        self.time_seen_ms
    }

    pub fn time_last_seen_ms(&self) -> f64 {
        self.time_last_seen_ms
    }

    /// Milliseconds since the last sighting; `f64::INFINITY` if never seen.
    pub fn time_since_last_seen_ms(&self, now_ms: f64) -> f64 {
        if self.ever_seen {
            now_ms - self.time_last_seen_ms
        } else {
            f64::INFINITY
        }
    }

    /// Field-frame speed magnitude, cm/s.
    pub fn speed(&self) -> f32 {
        let [vx, vy] = self.field_velocity;
        (vx * vx + vy * vy).sqrt()
    }
}

/// An object fixed to the field (goal posts).
#[derive(Debug, Clone, Default)]
pub struct StationaryObject {
    /// Known field-frame position, centimetres.
    pub field_location: [f32; 2],
    pub relative: Polar,
    pub relative_error: Polar,
    is_visible: bool,
    time_last_seen_ms: f64,
    ever_seen: bool,
}

impl StationaryObject {
    pub fn at(field_location: [f32; 2]) -> Self {
        Self {
            field_location,
            ..Self::default()
        }
    }

    pub fn update_visual(&mut self, relative: Polar, relative_error: Polar, timestamp_ms: f64) {
        self.relative = relative;
        self.relative_error = relative_error;
        self.time_last_seen_ms = timestamp_ms;
        self.is_visible = true;
        self.ever_seen = true;
    }

    pub fn mark_not_seen(&mut self) {
        self.is_visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn time_since_last_seen_ms(&self, now_ms: f64) -> f64 {
        if self.ever_seen {
            now_ms - self.time_last_seen_ms
        } else {
            f64::INFINITY
        }
    }
}

/// Identifies one of the four goal posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPostId {
    BlueLeft,
    BlueRight,
    YellowLeft,
    YellowRight,
}

impl GoalPostId {
    pub const ALL: [GoalPostId; 4] = [
        GoalPostId::BlueLeft,
        GoalPostId::BlueRight,
        GoalPostId::YellowLeft,
        GoalPostId::YellowRight,
    ];

    fn index(self) -> usize {
        match self {
            GoalPostId::BlueLeft => 0,
            GoalPostId::BlueRight => 1,
            GoalPostId::YellowLeft => 2,
            GoalPostId::YellowRight => 3,
        }
    }
}

/// Everything vision knows about the field, updated in place each frame.
#[derive(Debug, Clone, Default)]
pub struct FieldObjects {
    pub ball: MobileObject,
    posts: [StationaryObject; 4],
}

impl FieldObjects {
    pub fn post(&self, id: GoalPostId) -> &StationaryObject {
        &self.posts[id.index()]
    }

    pub fn post_mut(&mut self, id: GoalPostId) -> &mut StationaryObject {
        &mut self.posts[id.index()]
    }

    /// Reset per-frame visibility ahead of a new frame's updates.
    pub fn begin_frame(&mut self) {
        self.ball.mark_not_seen();
        for post in &mut self.posts {
            post.mark_not_seen();
        }
    }
}
