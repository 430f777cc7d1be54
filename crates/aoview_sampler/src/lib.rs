//! Progressive ambient occlusion sampling
//!
//! This crate drives a long-running incremental computation without blocking
//! the host event loop, and provides the CPU ambient occlusion sampler used
//! by the viewer.
//!
//! - [`IncrementalEngine`] - The `step`/`collect`/`release` contract
//! - [`ProgressiveDriver`] - State machine that steps an engine with throttled yields
//! - [`Clock`] - Monotonic time source (real or manual)
//! - [`OcclusionSampler`] - Depth-map visibility sampler producing per-vertex AO

mod engine;
mod clock;
mod driver;
mod sequence;
mod occlusion;

pub use engine::IncrementalEngine;
pub use clock::{Clock, SystemClock, ManualClock};
pub use driver::{
    run, DriverError, DriverPoll, DriverState, ProgressiveDriver, DEFAULT_THROTTLE,
};
pub use sequence::{halton, sphere_direction};
pub use occlusion::{OcclusionSampler, SamplerError, SamplerOptions, MAX_RESOLUTION};
