//! Walk-trial pause wrapper: chest-click toggles between running and a safe
//! halt.
//!
//! Wraps whatever walking activity is running with an operator kill switch.
//! Any chest click flips into Paused; the next click resumes whatever state
//! was active before. Paused parks the robot once on entry: zero walk plus
//! a timed head-home move.

use crate::jobs::{JobList, MotionJob};
use crate::machine::{Behaviour, Context};

/// Head joints driven by the head-home move (yaw, pitch).
const HEAD_JOINTS: usize = 2;
/// How long the head-home move is given to complete.
const HEAD_HOME_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOptimiserState {
    Walking,
    Paused,
}

#[derive(Debug, Default)]
pub struct WalkOptimiser;

impl WalkOptimiser {
    pub fn new() -> Self {
        Self
    }
}

impl Behaviour for WalkOptimiser {
    type State = WalkOptimiserState;

    fn transition(
        &mut self,
        state: WalkOptimiserState,
        previous: WalkOptimiserState,
        ctx: &Context<'_>,
    ) -> WalkOptimiserState {
        if ctx.sensors.chest_clicked() {
            if state == WalkOptimiserState::Paused {
                previous
            } else {
                WalkOptimiserState::Paused
            }
        } else {
            state
        }
    }

    fn act(
        &mut self,
        state: WalkOptimiserState,
        state_changed: bool,
        ctx: &Context<'_>,
        jobs: &mut JobList,
    ) {
        match state {
            WalkOptimiserState::Walking => {}
            WalkOptimiserState::Paused => {
                if state_changed {
                    jobs.add_motion_job(MotionJob::Walk {
                        trans_speed: 0.0,
                        trans_direction: 0.0,
                        yaw: 0.0,
                    });
                    jobs.add_motion_job(MotionJob::Head {
                        end_time_ms: ctx.sensors.current_time_ms + HEAD_HOME_MS,
                        positions: vec![0.0; HEAD_JOINTS],
                    });
                }
            }
        }
    }
}
