//! Typed job queue between behaviour and the subsystems it commands.
//!
//! Jobs are plain sum types grouped by consuming subsystem. Behaviour pushes
//! during its tick; each consumer drains its own partition once per cycle.
//! Nothing expires automatically: an undrained job is a consumer bug, not a
//! queue feature.

use fieldscan::MobileObject;

/// What the head should look at for pan/nod sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeTarget {
    Ball,
    Localisation,
    BallAndLocalisation,
}

/// Commands consumed by the motion subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionJob {
    /// Omnidirectional walk request: speed, direction and body turn rate.
    Walk {
        trans_speed: f32,
        trans_direction: f32,
        yaw: f32,
    },
    /// Kick the ball at `kick_position` towards `target_position`, both in
    /// robot-relative centimetres.
    Kick {
        time_ms: f64,
        kick_position: [f32; 2],
        target_position: [f32; 2],
    },
    /// Centre the gaze on a measured object.
    HeadTrack {
        distance_cm: f32,
        bearing_rad: f32,
        elevation_rad: f32,
    },
    /// Sweep the head over the region where the target is expected.
    HeadPan(GazeTarget),
    /// Nod the head up and down while the body turns at `rate`.
    HeadNod { target: GazeTarget, rate: f32 },
    /// Drive head joints to explicit positions by `end_time_ms`.
    Head {
        end_time_ms: f64,
        positions: Vec<f32>,
    },
    /// Kill all motion immediately.
    Freeze,
}

impl MotionJob {
    /// Head-track job aimed at a mobile object's last measurement.
    pub fn track(object: &MobileObject) -> Self {
        MotionJob::HeadTrack {
            distance_cm: object.relative.distance_cm,
            bearing_rad: object.relative.bearing_rad,
            elevation_rad: object.relative.elevation_rad,
        }
    }
}

/// Commands consumed by the vision subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisionJob {
    /// Stream the next `count` frames to disk for offline calibration.
    SaveImages { count: u32, include_sensors: bool },
}

/// Commands consumed by the camera driver.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraJob {
    ChangeSettings { exposure: f32, gain: f32 },
}

/// Commands consumed by the audio subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundJob {
    Play(String),
}

/// One cycle's worth of commands, partitioned by subsystem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobList {
    motion: Vec<MotionJob>,
    vision: Vec<VisionJob>,
    camera: Vec<CameraJob>,
    sound: Vec<SoundJob>,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_motion_job(&mut self, job: MotionJob) {
        self.motion.push(job);
    }

    pub fn add_vision_job(&mut self, job: VisionJob) {
        self.vision.push(job);
    }

    pub fn add_camera_job(&mut self, job: CameraJob) {
        self.camera.push(job);
    }

    pub fn add_sound_job(&mut self, job: SoundJob) {
        self.sound.push(job);
    }

    /// Drain the motion partition; the caller owns the jobs afterwards.
    pub fn take_motion_jobs(&mut self) -> Vec<MotionJob> {
        std::mem::take(&mut self.motion)
    }

    pub fn take_vision_jobs(&mut self) -> Vec<VisionJob> {
        std::mem::take(&mut self.vision)
    }

    pub fn take_camera_jobs(&mut self) -> Vec<CameraJob> {
        std::mem::take(&mut self.camera)
    }

    pub fn take_sound_jobs(&mut self) -> Vec<SoundJob> {
        std::mem::take(&mut self.sound)
    }

    pub fn motion_jobs(&self) -> &[MotionJob] {
        &self.motion
    }

    pub fn is_empty(&self) -> bool {
        self.motion.is_empty()
            && self.vision.is_empty()
            && self.camera.is_empty()
            && self.sound.is_empty()
    }

    pub fn len(&self) -> usize {
        self.motion.len() + self.vision.len() + self.camera.len() + self.sound.len()
    }
}
