//! Two-cycle runtime handoff.
//!
//! The see-think cycle runs at camera rate: take the latest frame, run
//! vision and behaviour, publish a [`JobList`]. The sense-move cycle runs on
//! its own fixed period and forwards the latest published jobs to the
//! actuators. The two meet only at single-slot mailboxes: a slow consumer
//! sees the newest value, never a backlog. Overruns are logged and survived;
//! a dropped frame is normal operation.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use fieldscan::YcbcrImage;
use tracing::{trace, warn};

use crate::jobs::JobList;

/// Single-slot, latest-wins channel.
///
/// `post` overwrites any unconsumed value; takers get the newest value or
/// nothing. Both sides are non-blocking except [`Mailbox::wait_take`].
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned mutex only means a peer panicked mid-post; the slot itself
    // is still a valid Option.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a value, replacing any unconsumed one.
    pub fn post(&self, value: T) {
        let mut slot = self.lock();
        if slot.replace(value).is_some() {
            trace!("mailbox overwrote an unconsumed value");
        }
        drop(slot);
        self.ready.notify_one();
    }

    /// Take the current value if there is one.
    pub fn try_take(&self) -> Option<T> {
        self.lock().take()
    }

    /// Block until a value is available and take it.
    pub fn wait_take(&self) -> T {
        let mut slot = self.lock();
        loop {
            if let Some(value) = slot.take() {
                return value;
            }
            slot = self.ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block up to `timeout` for a value.
    pub fn wait_take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock();
        loop {
            if let Some(value) = slot.take() {
                return Some(value);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _timed_out) = self
                .ready
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            slot = guard;
        }
    }
}

/// One see-think iteration: a frame in, a job list out.
pub trait FrameProcessor {
    fn process_frame(&mut self, frame: YcbcrImage) -> JobList;
}

/// Actuator-side consumer of job lists.
pub trait ActionSink {
    fn execute(&mut self, jobs: JobList);
}

/// Camera-rate cycle: vision + behaviour.
pub struct SeeThinkCycle<P: FrameProcessor> {
    frames: Arc<Mailbox<YcbcrImage>>,
    jobs: Arc<Mailbox<JobList>>,
    processor: P,
    budget: Duration,
}

impl<P: FrameProcessor> SeeThinkCycle<P> {
    pub fn new(
        frames: Arc<Mailbox<YcbcrImage>>,
        jobs: Arc<Mailbox<JobList>>,
        processor: P,
        budget: Duration,
    ) -> Self {
        Self {
            frames,
            jobs,
            processor,
            budget,
        }
    }

    /// Wait for the next frame, process it and publish the resulting jobs.
    pub fn run_once(&mut self) {
        let frame = self.frames.wait_take();
        let started = Instant::now();
        let jobs = self.processor.process_frame(frame);
        self.jobs.post(jobs);
        let elapsed = started.elapsed();
        if elapsed > self.budget {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.budget.as_millis() as u64,
                "see-think cycle overran its budget"
            );
        }
    }
}

/// Fixed-period cycle: forward the latest jobs to the actuators.
pub struct SenseMoveCycle<S: ActionSink> {
    jobs: Arc<Mailbox<JobList>>,
    sink: S,
    period: Duration,
}

impl<S: ActionSink> SenseMoveCycle<S> {
    pub fn new(jobs: Arc<Mailbox<JobList>>, sink: S, period: Duration) -> Self {
        Self { jobs, sink, period }
    }

    /// One actuation step: execute the latest published jobs, if any.
    /// Scheduling the fixed period is the caller's loop; this only measures
    /// and reports execution overruns against it.
    pub fn run_once(&mut self) {
        let Some(jobs) = self.jobs.try_take() else {
            return;
        };
        let started = Instant::now();
        self.sink.execute(jobs);
        let elapsed = started.elapsed();
        if elapsed > self.period {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                period_ms = self.period.as_millis() as u64,
                "sense-move cycle overran its period"
            );
        }
    }
}
