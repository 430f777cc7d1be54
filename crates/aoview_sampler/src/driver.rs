//! Progressive driver for incremental engines
//!
//! The driver steps an [`IncrementalEngine`] to completion while handing
//! control back to the host at regular intervals. Instead of language-level
//! suspension it is an explicit state machine:
//!
//! ```text
//! Idle -> Stepping -> Suspended -> Stepping -> ... -> Collecting -> Released
//! ```
//!
//! The host calls [`ProgressiveDriver::resume`] once per display refresh.
//! Each call steps the engine until the throttle interval has elapsed since
//! the last progress report, then returns [`DriverPoll::Suspended`]. After
//! the final step the engine is collected and released and the result is
//! returned as [`DriverPoll::Finished`].

use std::fmt;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::engine::IncrementalEngine;

/// Minimum time between two progress reports (and host yields)
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(100);

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Created, no step taken yet
    Idle,
    /// Inside a `resume` call, stepping the engine
    Stepping,
    /// Yielded back to the host, waiting for the next `resume`
    Suspended,
    /// All steps done, collecting the result
    Collecting,
    /// Engine released; the driver is finished
    Released,
}

/// Outcome of one [`ProgressiveDriver::resume`] call
#[derive(Debug, Clone, PartialEq)]
pub enum DriverPoll {
    /// Control returned to the host; call `resume` again on the next frame
    Suspended {
        /// Completed steps / total steps
        progress: f32,
    },
    /// The engine was collected and released
    Finished(Vec<f32>),
}

/// Driver error
#[derive(Debug)]
pub enum DriverError<E> {
    /// The engine failed during `step` or `collect` (already released)
    Engine(E),
    /// `resume` was called after the driver finished
    AlreadyFinished,
}

impl<E: fmt::Display> fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Engine(e) => write!(f, "Engine failure: {}", e),
            DriverError::AlreadyFinished => write!(f, "Driver already finished"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for DriverError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Engine(e) => Some(e),
            DriverError::AlreadyFinished => None,
        }
    }
}

/// Steps an engine to completion with throttled yields
///
/// The driver owns the engine exclusively. The engine is released exactly
/// once: after a successful `collect`, after an engine failure, or when the
/// driver is dropped early.
pub struct ProgressiveDriver<E: IncrementalEngine, C: Clock = SystemClock> {
    engine: E,
    clock: C,
    total_steps: u32,
    completed: u32,
    throttle: Duration,
    /// Time of the last progress report (or of the first resume)
    last_report: Duration,
    state: DriverState,
}

impl<E: IncrementalEngine> ProgressiveDriver<E, SystemClock> {
    /// Create a driver using wall-clock time
    pub fn new(engine: E, total_steps: u32) -> Self {
        Self::with_clock(engine, total_steps, SystemClock::new())
    }
}

impl<E: IncrementalEngine, C: Clock> ProgressiveDriver<E, C> {
    /// Create a driver with a custom clock
    pub fn with_clock(engine: E, total_steps: u32, clock: C) -> Self {
        Self {
            engine,
            clock,
            total_steps,
            completed: 0,
            throttle: DEFAULT_THROTTLE,
            last_report: Duration::ZERO,
            state: DriverState::Idle,
        }
    }

    /// Builder: set the minimum interval between progress reports
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of steps taken so far
    pub fn completed_steps(&self) -> u32 {
        self.completed
    }

    /// Total number of steps to take
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Completed steps / total steps, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.total_steps == 0 {
            1.0
        } else {
            self.completed as f32 / self.total_steps as f32
        }
    }

    /// Check if the engine has been released
    pub fn is_finished(&self) -> bool {
        self.state == DriverState::Released
    }

    /// Run until the next yield point or until the result is ready
    ///
    /// `on_progress` receives the completed fraction at every suspension and
    /// `0.0` once the run finishes.
    pub fn resume(
        &mut self,
        on_progress: &mut dyn FnMut(f32),
    ) -> Result<DriverPoll, DriverError<E::Error>> {
        match self.state {
            DriverState::Released => return Err(DriverError::AlreadyFinished),
            DriverState::Idle => {
                self.last_report = self.clock.now();
                log::debug!("Driver started: {} steps", self.total_steps);
            }
            _ => {}
        }
        self.state = DriverState::Stepping;

        while self.completed < self.total_steps {
            if let Err(e) = self.engine.step() {
                log::error!("Engine step {} failed", self.completed);
                self.release_engine();
                return Err(DriverError::Engine(e));
            }
            self.completed += 1;

            let now = self.clock.now();
            if now.saturating_sub(self.last_report) >= self.throttle {
                self.last_report = now;
                self.state = DriverState::Suspended;
                let progress = self.progress();
                on_progress(progress);
                return Ok(DriverPoll::Suspended { progress });
            }
        }

        self.state = DriverState::Collecting;
        let result = match self.engine.collect() {
            Ok(result) => result,
            Err(e) => {
                log::error!("Engine collect failed");
                self.release_engine();
                return Err(DriverError::Engine(e));
            }
        };
        self.release_engine();
        on_progress(0.0);
        log::debug!("Driver finished after {} steps", self.completed);

        Ok(DriverPoll::Finished(result))
    }

    fn release_engine(&mut self) {
        if self.state != DriverState::Released {
            self.engine.release();
            self.state = DriverState::Released;
        }
    }
}

impl<E: IncrementalEngine, C: Clock> Drop for ProgressiveDriver<E, C> {
    fn drop(&mut self) {
        self.release_engine();
    }
}

/// Drive an engine to completion, calling `on_yield` at every suspension
///
/// `on_yield` stands in for the host scheduler (e.g. waiting for the next
/// display refresh). Engine failures are returned after the engine has been
/// released.
pub fn run<E, C>(
    engine: E,
    total_steps: u32,
    clock: C,
    mut on_progress: impl FnMut(f32),
    mut on_yield: impl FnMut(),
) -> Result<Vec<f32>, DriverError<E::Error>>
where
    E: IncrementalEngine,
    C: Clock,
{
    let mut driver = ProgressiveDriver::with_clock(engine, total_steps, clock);
    loop {
        match driver.resume(&mut on_progress)? {
            DriverPoll::Suspended { .. } => on_yield(),
            DriverPoll::Finished(result) => return Ok(result),
        }
    }
}
