//! Ambient occlusion compute system
//!
//! Wraps the progressive driver so the event loop can advance sampling one
//! slice per display refresh. Status text and progress go to injected sinks.

use aoview_core::Mesh;
use aoview_sampler::{
    Clock, DriverError, DriverPoll, IncrementalEngine, OcclusionSampler, ProgressiveDriver,
    SamplerError, SamplerOptions, SystemClock,
};

use crate::config::SamplerConfig;

/// Status shown while sampling runs
pub const STATUS_COMPUTING: &str = "Computing ambient occlusion...";
/// Status shown once the result is in
pub const STATUS_READY: &str = "Ambient occlusion ready";

/// Receives status text
pub type StatusSink = Box<dyn FnMut(&str)>;
/// Receives progress fractions in [0, 1]; 0 after completion hides the bar
pub type ProgressSink = Box<dyn FnMut(f32)>;

/// Outcome of one compute slice
#[derive(Debug, Clone, PartialEq)]
pub enum ComputePoll {
    /// Suspended; call `poll` again after the next display refresh
    Pending,
    /// Finished with one occlusion value per vertex
    Ready(Vec<f32>),
}

/// Drives an incremental engine from the event loop
pub struct ComputeSystem<E: IncrementalEngine = OcclusionSampler, C: Clock = SystemClock> {
    driver: ProgressiveDriver<E, C>,
    on_status: StatusSink,
    on_progress: ProgressSink,
    announced: bool,
}

impl ComputeSystem<OcclusionSampler, SystemClock> {
    /// Set up occlusion sampling for `mesh`
    pub fn for_mesh(
        mesh: &Mesh,
        config: &SamplerConfig,
        on_status: StatusSink,
        on_progress: ProgressSink,
    ) -> Result<Self, SamplerError> {
        let options = SamplerOptions::new(mesh.cells().to_vec())
            .with_resolution(config.resolution)
            .with_bias(config.bias);
        let sampler = OcclusionSampler::new(mesh.positions(), options)?;

        log::info!(
            "Sampling ambient occlusion: {} directions at {}x{}",
            config.sample_count,
            config.resolution,
            config.resolution
        );

        let driver = ProgressiveDriver::new(sampler, config.sample_count)
            .with_throttle(config.throttle());
        Ok(Self::new(driver, on_status, on_progress))
    }
}

impl<E: IncrementalEngine, C: Clock> ComputeSystem<E, C> {
    pub fn new(driver: ProgressiveDriver<E, C>, on_status: StatusSink, on_progress: ProgressSink) -> Self {
        Self {
            driver,
            on_status,
            on_progress,
            announced: false,
        }
    }

    /// Run steps until the next suspension or completion
    pub fn poll(&mut self) -> Result<ComputePoll, DriverError<E::Error>> {
        if !self.announced {
            (self.on_status)(STATUS_COMPUTING);
            self.announced = true;
        }

        let on_progress = &mut self.on_progress;
        let poll = self.driver.resume(&mut |p| on_progress(p))?;
        match poll {
            DriverPoll::Suspended { progress } => {
                log::debug!(
                    "Sampling {:.0}% ({}/{})",
                    progress * 100.0,
                    self.driver.completed_steps(),
                    self.driver.total_steps()
                );
                Ok(ComputePoll::Pending)
            }
            DriverPoll::Finished(ao) => {
                log::info!("Ambient occlusion finished: {} values", ao.len());
                (self.on_status)(STATUS_READY);
                Ok(ComputePoll::Ready(ao))
            }
        }
    }

    /// Fraction of steps completed
    pub fn progress(&self) -> f32 {
        self.driver.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use aoview_core::icosphere;
    use aoview_sampler::ManualClock;

    /// Each step costs 30ms of manual time
    struct SlowEngine {
        clock: Rc<ManualClock>,
        fail_at: Option<u32>,
        steps: u32,
        released: Rc<RefCell<bool>>,
    }

    impl IncrementalEngine for SlowEngine {
        type Error = String;

        fn step(&mut self) -> Result<(), String> {
            self.steps += 1;
            self.clock.advance(Duration::from_millis(30));
            if Some(self.steps) == self.fail_at {
                return Err(format!("step {} failed", self.steps));
            }
            Ok(())
        }

        fn collect(&mut self) -> Result<Vec<f32>, String> {
            Ok(vec![0.5; 4])
        }

        fn release(&mut self) {
            *self.released.borrow_mut() = true;
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn sinks(log: &Log) -> (StatusSink, ProgressSink) {
        let status_log = Rc::clone(log);
        let progress_log = Rc::clone(log);
        (
            Box::new(move |s: &str| status_log.borrow_mut().push(format!("status:{}", s))),
            Box::new(move |p: f32| progress_log.borrow_mut().push(format!("progress:{:.2}", p))),
        )
    }

    fn slow_system(steps: u32, fail_at: Option<u32>, log: &Log) -> (ComputeSystem<SlowEngine, Rc<ManualClock>>, Rc<RefCell<bool>>) {
        let clock = Rc::new(ManualClock::new());
        let released = Rc::new(RefCell::new(false));
        let engine = SlowEngine {
            clock: Rc::clone(&clock),
            fail_at,
            steps: 0,
            released: Rc::clone(&released),
        };
        let driver = ProgressiveDriver::with_clock(engine, steps, clock);
        let (on_status, on_progress) = sinks(log);
        (ComputeSystem::new(driver, on_status, on_progress), released)
    }

    #[test]
    fn test_status_and_progress_sequence() {
        let log: Log = Rc::default();
        let (mut system, released) = slow_system(10, None, &log);

        let mut pending = 0;
        let ao = loop {
            match system.poll().unwrap() {
                ComputePoll::Pending => pending += 1,
                ComputePoll::Ready(ao) => break ao,
            }
        };

        assert_eq!(ao, vec![0.5; 4]);
        assert!(*released.borrow());
        // 30ms steps with a 100ms throttle: suspend after steps 4 and 8
        assert_eq!(pending, 2);

        let log = log.borrow();
        assert_eq!(log.first().map(String::as_str), Some("status:Computing ambient occlusion..."));
        assert_eq!(
            log[1..].to_vec(),
            vec![
                "progress:0.40".to_string(),
                "progress:0.80".to_string(),
                "progress:0.00".to_string(),
                "status:Ambient occlusion ready".to_string(),
            ]
        );
    }

    #[test]
    fn test_engine_failure_propagates_after_release() {
        let log: Log = Rc::default();
        let (mut system, released) = slow_system(10, Some(2), &log);

        let err = system.poll().unwrap_err();
        assert!(matches!(err, DriverError::Engine(ref msg) if msg == "step 2 failed"));
        assert!(*released.borrow());
        assert!(!log.borrow().iter().any(|l| l.contains("ready")));
    }

    #[test]
    fn test_for_mesh_samples_every_vertex() {
        let mesh = icosphere(10.0, 1);
        let config = SamplerConfig {
            sample_count: 8,
            resolution: 32,
            ..SamplerConfig::default()
        };
        let log: Log = Rc::default();
        let (on_status, on_progress) = sinks(&log);
        let mut system = ComputeSystem::for_mesh(&mesh, &config, on_status, on_progress).unwrap();

        let ao = loop {
            if let ComputePoll::Ready(ao) = system.poll().unwrap() {
                break ao;
            }
        };
        assert_eq!(ao.len(), mesh.vertex_count());
        assert!(system.is_finished());
        assert_eq!(system.progress(), 1.0);
    }

    #[test]
    fn test_for_mesh_rejects_zero_resolution() {
        let mesh = icosphere(10.0, 0);
        let config = SamplerConfig {
            resolution: 0,
            ..SamplerConfig::default()
        };
        let result = ComputeSystem::for_mesh(&mesh, &config, Box::new(|_| {}), Box::new(|_| {}));
        assert!(matches!(result, Err(SamplerError::InvalidResolution(0))));
    }
}
