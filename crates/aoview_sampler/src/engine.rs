//! Incremental engine contract

/// A long-running computation split into discrete steps
///
/// The driver calls [`step`](IncrementalEngine::step) a fixed number of
/// times, then [`collect`](IncrementalEngine::collect) once, then
/// [`release`](IncrementalEngine::release) once. No call is made after
/// `release`.
pub trait IncrementalEngine {
    /// Unrecoverable engine failure
    type Error;

    /// Advance the internal state by one unit of work
    fn step(&mut self) -> Result<(), Self::Error>;

    /// Return the per-vertex result; valid once all steps have run
    fn collect(&mut self) -> Result<Vec<f32>, Self::Error>;

    /// Free engine resources
    fn release(&mut self);
}
