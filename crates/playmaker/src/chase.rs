//! Chase-ball behaviour: chase, position, search, pause.
//!
//! The striker triad. Chase drives at the ball and fires alternating-side
//! kicks; Position holds a supporting pose when a teammate is closer;
//! Search spins towards the ball's last bearing. The ball counts as lost
//! after [`BALL_LOST_MS`] without a sighting.

use crate::jobs::{GazeTarget, JobList, MotionJob};
use crate::machine::{Behaviour, Context};

/// Unseen-for longer than this means the ball is lost.
pub const BALL_LOST_MS: f64 = 500.0;

/// Ultrasonic range below which avoidance shaping kicks in.
const OBSTACLE_NEAR_CM: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseState {
    Paused,
    Chase,
    Position,
    Search,
}

/// The chase-ball behaviour and its cross-tick scratch: which side the next
/// kick fires from, and whether the side has already been flipped during
/// the kick currently executing.
#[derive(Debug)]
pub struct ChaseBall {
    last_kick_sign: f32,
    kick_side_changed: bool,
}

impl Default for ChaseBall {
    fn default() -> Self {
        Self {
            last_kick_sign: 1.0,
            kick_side_changed: false,
        }
    }
}

impl ChaseBall {
    pub fn new() -> Self {
        Self::default()
    }

    fn chase(&mut self, ctx: &Context<'_>, jobs: &mut JobList) {
        let ball = &ctx.objects.ball;
        if !ball.is_visible() {
            return;
        }
        let bearing = ball.relative.bearing_rad;

        let mut trans_speed: f32 = 1.0;
        let mut trans_direction = bearing;
        let mut yaw = bearing / 2.0;

        let left = ctx.sensors.left_obstacle_cm();
        let right = ctx.sensors.right_obstacle_cm();
        if left < OBSTACLE_NEAR_CM {
            trans_speed += 0.01 * (left - OBSTACLE_NEAR_CM);
            if trans_speed > 0.0 {
                trans_direction -= 20.0f32.atan2(left);
            } else {
                trans_direction += 20.0f32.atan2(left);
            }
            yaw -= 0.015 * (left - OBSTACLE_NEAR_CM);
        } else if right < OBSTACLE_NEAR_CM {
            trans_speed += 0.01 * (right - OBSTACLE_NEAR_CM);
            if trans_speed > 0.0 {
                trans_direction += 20.0f32.atan2(right);
            } else {
                trans_direction -= 20.0f32.atan2(right);
            }
            yaw += 0.015 * (right - OBSTACLE_NEAR_CM);
        }
        jobs.add_motion_job(MotionJob::Walk {
            trans_speed,
            trans_direction,
            yaw,
        });

        // Kick with alternating feet: queue a kick whenever the engine is
        // idle, and flip the side exactly once per executed kick.
        if let Some(active) = ctx.sensors.kick_active {
            if !active {
                self.kick_side_changed = false;
                jobs.add_motion_job(MotionJob::Kick {
                    time_ms: 0.0,
                    kick_position: [15.0, self.last_kick_sign * 10.0],
                    target_position: [1000.0, self.last_kick_sign * 10.0],
                });
            } else if !self.kick_side_changed {
                self.kick_side_changed = true;
                self.last_kick_sign = -self.last_kick_sign;
            }
        }

        jobs.add_motion_job(MotionJob::track(ball));
    }

    fn position(&self, ctx: &Context<'_>, jobs: &mut JobList) {
        let ball = &ctx.objects.ball;
        if !ball.is_visible() {
            return;
        }
        // Ground-plane distance: the measurement is along the camera ray.
        let distance = ball.relative.distance_cm * ball.relative.elevation_rad.cos();
        let bearing = ball.relative.bearing_rad;

        let mut trans_speed = 0.5 * (distance - 100.0) * bearing.cos();
        let mut yaw = bearing / 2.0;

        let left = ctx.sensors.left_obstacle_cm();
        let right = ctx.sensors.right_obstacle_cm();
        if left < OBSTACLE_NEAR_CM {
            trans_speed += 0.5 * (left - OBSTACLE_NEAR_CM);
            yaw += 0.015 * (left - OBSTACLE_NEAR_CM);
        } else if right < OBSTACLE_NEAR_CM {
            trans_speed += 0.5 * (right - OBSTACLE_NEAR_CM);
            yaw -= 0.015 * (right - OBSTACLE_NEAR_CM);
        }

        jobs.add_motion_job(MotionJob::Walk {
            trans_speed,
            trans_direction: bearing,
            yaw,
        });
        jobs.add_motion_job(MotionJob::track(ball));
    }

    fn search(&self, ctx: &Context<'_>, jobs: &mut JobList) {
        let spin = if ctx.objects.ball.relative.bearing_rad < 0.0 {
            -0.4
        } else {
            0.4
        };
        jobs.add_motion_job(MotionJob::Walk {
            trans_speed: 0.0,
            trans_direction: 0.0,
            yaw: spin,
        });
        jobs.add_motion_job(MotionJob::HeadNod {
            target: GazeTarget::Ball,
            rate: spin,
        });
    }
}

impl Behaviour for ChaseBall {
    type State = ChaseState;

    fn transition(
        &mut self,
        state: ChaseState,
        _previous: ChaseState,
        ctx: &Context<'_>,
    ) -> ChaseState {
        let ball = &ctx.objects.ball;
        let now = ctx.sensors.current_time_ms;
        match state {
            ChaseState::Paused => ChaseState::Paused,
            ChaseState::Chase => {
                if ball.time_since_last_seen_ms(now) > BALL_LOST_MS {
                    ChaseState::Search
                } else if !ctx.team.am_closest_to_ball {
                    ChaseState::Position
                } else {
                    ChaseState::Chase
                }
            }
            ChaseState::Position => {
                if ball.time_since_last_seen_ms(now) > BALL_LOST_MS {
                    ChaseState::Search
                } else if ctx.team.am_closest_to_ball {
                    ChaseState::Chase
                } else {
                    ChaseState::Position
                }
            }
            ChaseState::Search => {
                if ball.time_seen_ms() > 0.0 {
                    ChaseState::Chase
                } else {
                    ChaseState::Search
                }
            }
        }
    }

    fn act(
        &mut self,
        state: ChaseState,
        state_changed: bool,
        ctx: &Context<'_>,
        jobs: &mut JobList,
    ) {
        match state {
            ChaseState::Paused => {
                if state_changed {
                    jobs.add_motion_job(MotionJob::Freeze);
                }
            }
            ChaseState::Chase => self.chase(ctx, jobs),
            ChaseState::Position => self.position(ctx, jobs),
            ChaseState::Search => self.search(ctx, jobs),
        }
    }
}
