//! Generic state-machine driver for behaviours.
//!
//! A behaviour is an enum of states plus two functions over them: where to
//! go next, and what jobs to emit once there. The driver owns the current
//! and previous state and the change flag; behaviours keep only the
//! long-lived scratch their actions need (kick side, move counters).

use std::fmt;

use fieldscan::FieldObjects;
use tracing::debug;

use crate::inputs::{GameInfo, SensorsSnapshot, TeamInfo};
use crate::jobs::JobList;

/// Everything a behaviour may read during one tick.
pub struct Context<'a> {
    pub objects: &'a FieldObjects,
    pub sensors: &'a SensorsSnapshot,
    pub team: &'a TeamInfo,
    pub game: &'a GameInfo,
}

/// A finite-state behaviour. `transition` must not emit jobs; `act` must not
/// change state. The driver enforces the ordering: transition first, then
/// act on the (possibly new) state.
pub trait Behaviour {
    type State: Copy + Eq + fmt::Debug;

    /// Next state given the current one. `previous` is the state held before
    /// the last change, for behaviours that resume it (pause wrappers).
    fn transition(
        &mut self,
        state: Self::State,
        previous: Self::State,
        ctx: &Context<'_>,
    ) -> Self::State;

    /// Emit this state's jobs. `state_changed` is true on the first tick in
    /// a state, for entry actions.
    fn act(
        &mut self,
        state: Self::State,
        state_changed: bool,
        ctx: &Context<'_>,
        jobs: &mut JobList,
    );
}

/// Drives one behaviour, one tick per cycle.
pub struct StateMachine<B: Behaviour> {
    behaviour: B,
    state: B::State,
    previous_state: B::State,
    state_changed: bool,
    first_tick: bool,
}

impl<B: Behaviour> StateMachine<B> {
    /// The first tick reports `state_changed` so entry actions of the
    /// initial state run.
    pub fn new(behaviour: B, initial: B::State) -> Self {
        Self {
            behaviour,
            state: initial,
            previous_state: initial,
            state_changed: true,
            first_tick: true,
        }
    }

    pub fn state(&self) -> B::State {
        self.state
    }

    pub fn previous_state(&self) -> B::State {
        self.previous_state
    }

    pub fn state_changed(&self) -> bool {
        self.state_changed
    }

    pub fn tick(&mut self, ctx: &Context<'_>, jobs: &mut JobList) {
        let next = self
            .behaviour
            .transition(self.state, self.previous_state, ctx);
        self.state_changed = next != self.state || self.first_tick;
        self.first_tick = false;
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "state transition");
            self.previous_state = self.state;
            self.state = next;
        }
        self.behaviour.act(self.state, self.state_changed, ctx, jobs);
    }
}
