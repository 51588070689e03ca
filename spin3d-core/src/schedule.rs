//! Frame scheduling: timestamps in, one composed draw out.
//!
//! The host owns the "next frame" primitive (`requestAnimationFrame`, a
//! sleep loop, a vsync callback). Each time it fires, the host calls
//! [`FrameScheduler::tick`] and re-registers only while
//! [`FrameScheduler::should_reschedule`] holds. Everything runs on one
//! thread and frames never overlap.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, error, info, warn};

use crate::animation::AnimationState;
use crate::backend::RendererBackend;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::projection::Viewport;
use crate::transform::Transform;

/// Cooperative stop flag shared between the host and the scheduler
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Time of the previous frame, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    previous: f64,
}

impl FrameTiming {
    /// Start from zero: the first delta equals the first timestamp.
    pub fn new() -> Self {
        Self { previous: 0.0 }
    }

    /// Start from a known host time so the first delta stays small
    pub fn starting_at(seconds: f64) -> Self {
        Self { previous: seconds }
    }

    pub fn previous(&self) -> f64 {
        self.previous
    }

    /// Seconds since the previous call; remembers `now` for the next one
    pub fn delta(&mut self, now: f64) -> f64 {
        let delta = now - self.previous;
        self.previous = now;
        delta
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, no callback registered yet
    Idle,
    Running,
    /// Cancelled or hit a fatal backend error
    Stopped,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// Nothing was drawn: the scheduler is not running or the surface has a
    /// zero dimension.
    Skipped,
}

/// Advances the animation and renders one frame per host callback
pub struct FrameScheduler<B: RendererBackend> {
    backend: B,
    animation: AnimationState,
    timing: FrameTiming,
    projection_depth: f32,
    state: SchedulerState,
    cancel: CancellationToken,
    frames_drawn: u64,
}

impl<B: RendererBackend> FrameScheduler<B> {
    pub fn new(backend: B, config: &SceneConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            backend,
            animation: AnimationState::from_config(config),
            timing: FrameTiming::new(),
            projection_depth: config.projection_depth,
            state: SchedulerState::Idle,
            cancel: CancellationToken::new(),
            frames_drawn: 0,
        })
    }

    /// Replace the frame timing, e.g. with [`FrameTiming::starting_at`]
    pub fn with_timing(mut self, timing: FrameTiming) -> Self {
        self.timing = timing;
        self
    }

    /// A handle the host can use to stop the loop
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Idle to Running. Has no effect in any other state.
    pub fn start(&mut self) {
        if self.state == SchedulerState::Idle {
            info!("frame scheduler started");
            self.state = SchedulerState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            info!("frame scheduler stopped after {} frames", self.frames_drawn);
            self.state = SchedulerState::Stopped;
        }
    }

    /// Whether the host should register another callback
    pub fn should_reschedule(&self) -> bool {
        self.state == SchedulerState::Running && !self.cancel.is_cancelled()
    }

    /// Run one frame for a host timestamp in milliseconds
    pub fn tick_millis(&mut self, now_ms: f64) -> Result<FrameOutcome> {
        self.tick(now_ms * 0.001)
    }

    /// Run one frame for a host timestamp in seconds.
    ///
    /// A failing backend call is returned to the caller. Fatal failures also
    /// stop the scheduler; any other failure leaves it running for the next
    /// frame.
    pub fn tick(&mut self, now: f64) -> Result<FrameOutcome> {
        if self.cancel.is_cancelled() {
            self.stop();
        }
        if self.state != SchedulerState::Running {
            return Ok(FrameOutcome::Skipped);
        }

        let delta = self.timing.delta(now);
        if delta < 0.0 {
            debug!("timestamp went backwards by {:.4}s, holding rotation", -delta);
        }
        self.animation.advance(delta.max(0.0));

        match self.render_frame() {
            Ok(outcome) => {
                if outcome == FrameOutcome::Drawn {
                    self.frames_drawn += 1;
                }
                Ok(outcome)
            }
            Err(err) if err.is_fatal() => {
                error!("fatal renderer error, stopping: {}", err);
                self.stop();
                Err(err)
            }
            Err(err) => {
                warn!("frame {} failed: {}", self.frames_drawn + 1, err);
                Err(err)
            }
        }
    }

    fn render_frame(&mut self) -> Result<FrameOutcome> {
        let (width, height) = self.backend.resize()?;
        self.backend.clear()?;

        let viewport = Viewport::new(width, height);
        if viewport.is_degenerate() {
            debug!("surface is {}x{}, skipping draw", width, height);
            return Ok(FrameOutcome::Skipped);
        }

        let projection = viewport.projection(self.projection_depth)?;
        let matrix = Transform::compose_onto(&projection, &self.animation);
        self.backend.draw(&matrix)?;
        Ok(FrameOutcome::Drawn)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
