//! Kicker behaviour: wait for a settled ball, then kick it straight ahead.
//!
//! Wait arms the kick once the ball has been continuously seen for half a
//! second and is near-stationary; Kick holds until the motion engine
//! reports the kick finished, the ball disappears, or it starts moving
//! (someone else got there first).

use crate::jobs::{GazeTarget, JobList, MotionJob};
use crate::machine::{Behaviour, Context};

/// Continuous-sighting time required before a kick is armed.
const SETTLED_MS: f64 = 500.0;
/// The ball counts as stationary below this speed (cm/s).
const SETTLED_SPEED: f32 = 5.0;
/// A ball moving faster than this aborts the kick (cm/s).
const MOVING_SPEED: f32 = 15.0;
/// Staleness beyond which the head pans instead of tracking.
const STALE_MS: f64 = 250.0;
/// Unseen-for longer than this aborts the kick.
const LOST_MS: f64 = 500.0;
/// Wait creeps forward for this many ticks after entry, to settle the
/// walk engine near the ball.
const INITIAL_MOVE_TICKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickerState {
    Wait,
    Kick,
}

#[derive(Debug, Default)]
pub struct Kicker {
    initial_move_counter: u32,
    kick_active_prev: bool,
}

impl Kicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn wait(&mut self, ctx: &Context<'_>, jobs: &mut JobList) {
        let ball = &ctx.objects.ball;
        let now = ctx.sensors.current_time_ms;
        if ball.is_visible() {
            jobs.add_motion_job(MotionJob::track(ball));
        } else if ball.time_since_last_seen_ms(now) > STALE_MS {
            jobs.add_motion_job(MotionJob::HeadPan(GazeTarget::Ball));
        }
        if self.initial_move_counter < INITIAL_MOVE_TICKS {
            jobs.add_motion_job(MotionJob::Walk {
                trans_speed: 0.001,
                trans_direction: 0.0,
                yaw: 0.0,
            });
            self.initial_move_counter += 1;
        } else {
            jobs.add_motion_job(MotionJob::Walk {
                trans_speed: 0.0,
                trans_direction: 0.0,
                yaw: 0.0,
            });
        }
    }

    fn kick(&self, ctx: &Context<'_>, jobs: &mut JobList) {
        let ball = &ctx.objects.ball;
        let now = ctx.sensors.current_time_ms;
        let distance = ball.relative.distance_cm;
        let bearing = ball.relative.bearing_rad;
        // Robot frame: x forward, y right.
        let kick_position = [distance * bearing.cos(), -distance * bearing.sin()];
        jobs.add_motion_job(MotionJob::Kick {
            time_ms: 0.0,
            kick_position,
            target_position: [kick_position[0] + 1000.0, kick_position[1]],
        });
        if ball.is_visible() {
            jobs.add_motion_job(MotionJob::track(ball));
        } else if ball.time_since_last_seen_ms(now) < STALE_MS {
            jobs.add_motion_job(MotionJob::HeadPan(GazeTarget::Ball));
        }
    }
}

impl Behaviour for Kicker {
    type State = KickerState;

    fn transition(
        &mut self,
        state: KickerState,
        _previous: KickerState,
        ctx: &Context<'_>,
    ) -> KickerState {
        let ball = &ctx.objects.ball;
        let now = ctx.sensors.current_time_ms;
        match state {
            KickerState::Wait => {
                if ball.time_seen_ms() > SETTLED_MS && ball.speed() < SETTLED_SPEED {
                    self.initial_move_counter = 0;
                    KickerState::Kick
                } else {
                    KickerState::Wait
                }
            }
            KickerState::Kick => {
                let active = ctx.sensors.kick_active.unwrap_or(false);
                let finished = self.kick_active_prev && !active;
                self.kick_active_prev = active;
                let visible = ball.time_since_last_seen_ms(now) < LOST_MS;
                if finished || !visible || ball.speed() > MOVING_SPEED {
                    KickerState::Wait
                } else {
                    KickerState::Kick
                }
            }
        }
    }

    fn act(
        &mut self,
        state: KickerState,
        _state_changed: bool,
        ctx: &Context<'_>,
        jobs: &mut JobList,
    ) {
        match state {
            KickerState::Wait => self.wait(ctx, jobs),
            KickerState::Kick => self.kick(ctx, jobs),
        }
    }
}
