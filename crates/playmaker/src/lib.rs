//! playmaker — behaviour layer for humanoid soccer robots.
//!
//! Turns the field-object estimates produced by `fieldscan` into motion
//! commands through small finite-state behaviours:
//!
//! - **Jobs** – typed per-subsystem command queue, drained each cycle.
//! - **Inputs** – sensor snapshot and shared team state, `Option`-valued
//!   where the platform reports validity flags.
//! - **Machine** – the generic transition/act driver all behaviours run on.
//! - **Behaviours** – chase-ball (chase/position/search/pause), kicker
//!   (wait/kick) and the walk-optimiser pause wrapper.
//! - **Runtime** – latest-wins mailboxes joining the camera-rate see-think
//!   cycle to the fixed-period sense-move cycle.

pub mod chase;
pub mod inputs;
pub mod jobs;
pub mod kicker;
pub mod machine;
pub mod runtime;
pub mod walk_optimiser;

pub use chase::{ChaseBall, ChaseState, BALL_LOST_MS};
pub use inputs::{GameInfo, SensorsSnapshot, TeamInfo};
pub use jobs::{CameraJob, GazeTarget, JobList, MotionJob, SoundJob, VisionJob};
pub use kicker::{Kicker, KickerState};
pub use machine::{Behaviour, Context, StateMachine};
pub use runtime::{ActionSink, FrameProcessor, Mailbox, SeeThinkCycle, SenseMoveCycle};
pub use walk_optimiser::{WalkOptimiser, WalkOptimiserState};
