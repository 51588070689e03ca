use approx::assert_relative_eq;
use nalgebra::{Matrix4, Vector3};
use spin3d_core::{
    AnimationState, Error, FrameOutcome, FrameScheduler, FrameTiming, RendererBackend, Result,
    SceneConfig, SchedulerState, Transform,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Resize,
    Clear,
    Draw(Matrix4<f32>),
}

/// Records every backend call and fails on demand
struct RecordingBackend {
    size: (u32, u32),
    calls: Vec<Call>,
    fail_draw: Option<fn() -> Error>,
}

impl RecordingBackend {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            calls: Vec::new(),
            fail_draw: None,
        }
    }

    fn draws(&self) -> Vec<Matrix4<f32>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(m) => Some(*m),
                _ => None,
            })
            .collect()
    }
}

impl RendererBackend for RecordingBackend {
    fn resize(&mut self) -> Result<(u32, u32)> {
        self.calls.push(Call::Resize);
        Ok(self.size)
    }

    fn clear(&mut self) -> Result<()> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw(&mut self, matrix: &Matrix4<f32>) -> Result<()> {
        if let Some(make_err) = self.fail_draw {
            return Err(make_err());
        }
        self.calls.push(Call::Draw(*matrix));
        Ok(())
    }
}

fn running(backend: RecordingBackend) -> FrameScheduler<RecordingBackend> {
    let mut scheduler = FrameScheduler::new(backend, &SceneConfig::default()).unwrap();
    scheduler.start();
    scheduler
}

#[test]
fn idle_scheduler_does_nothing() {
    let mut scheduler = FrameScheduler::new(RecordingBackend::new(800, 600), &SceneConfig::default())
        .unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(!scheduler.should_reschedule());
    assert_eq!(scheduler.tick(1.0).unwrap(), FrameOutcome::Skipped);
    assert!(scheduler.backend().calls.is_empty());
}

#[test]
fn resize_and_clear_precede_draw() {
    let mut scheduler = running(RecordingBackend::new(800, 600));
    assert_eq!(scheduler.tick(0.016).unwrap(), FrameOutcome::Drawn);
    assert_eq!(scheduler.tick(0.032).unwrap(), FrameOutcome::Drawn);

    let calls = &scheduler.backend().calls;
    assert_eq!(calls.len(), 6);
    for frame in calls.chunks(3) {
        assert_eq!(frame[0], Call::Resize);
        assert_eq!(frame[1], Call::Clear);
        assert!(matches!(frame[2], Call::Draw(_)));
    }
    assert_eq!(scheduler.frames_drawn(), 2);
    assert!(scheduler.should_reschedule());
}

#[test]
fn first_frame_delta_is_the_timestamp() {
    let mut scheduler = running(RecordingBackend::new(800, 600));
    let start = scheduler.animation().rotation.y;

    scheduler.tick_millis(2500.0).unwrap();

    assert_relative_eq!(scheduler.timing().previous(), 2.5, epsilon = 1e-9);
    assert_relative_eq!(scheduler.animation().rotation.y, start + 1.2 * 2.5, epsilon = 1e-5);
}

#[test]
fn starting_at_avoids_the_large_first_step() {
    let backend = RecordingBackend::new(800, 600);
    let mut scheduler = FrameScheduler::new(backend, &SceneConfig::default())
        .unwrap()
        .with_timing(FrameTiming::starting_at(2.5));
    scheduler.start();
    let start = scheduler.animation().rotation.y;

    scheduler.tick(2.5).unwrap();
    assert_eq!(scheduler.animation().rotation.y, start);
}

#[test]
fn rotation_accumulates_over_fixed_steps() {
    let mut scheduler = running(RecordingBackend::new(800, 600));
    let start = scheduler.animation().rotation.y;
    let delta = 0.02;

    for frame in 1..=50 {
        scheduler.tick(frame as f64 * delta).unwrap();
    }

    let expected = start + 50.0 * 1.2 * delta;
    assert_relative_eq!(scheduler.animation().rotation.y, expected, epsilon = 1e-4);
}

#[test]
fn backwards_timestamp_holds_rotation() {
    let mut scheduler = running(RecordingBackend::new(800, 600));
    scheduler.tick(1.0).unwrap();
    let after_first = scheduler.animation().rotation.y;

    scheduler.tick(0.5).unwrap();
    assert_eq!(scheduler.animation().rotation.y, after_first);
}

#[test]
fn drawn_matrix_is_the_composed_pipeline() {
    let mut scheduler = running(RecordingBackend::new(800, 600));
    scheduler.tick(0.0).unwrap();

    let expected = Transform::model_view_projection(scheduler.animation(), 800.0, 600.0, 400.0);
    let draws = scheduler.backend().draws();
    assert_eq!(draws.len(), 1);
    assert_relative_eq!(draws[0], expected, epsilon = 1e-6);

    // Nothing advanced at t = 0, so this is the fixed starting pose
    let m = draws[0];
    assert_relative_eq!(m[(0, 3)], -0.55, epsilon = 1e-6);
    assert_relative_eq!(m[(1, 3)], 0.5, epsilon = 1e-6);
}

#[test]
fn custom_config_reaches_the_draw() {
    let config = SceneConfig {
        translation: Vector3::new(0.0, 0.0, 0.0),
        initial_rotation: Vector3::zeros(),
        scale: Vector3::new(2.0, 2.0, 2.0),
        rotation_speed: 0.0,
        projection_depth: 100.0,
    };
    let mut scheduler = FrameScheduler::new(RecordingBackend::new(200, 100), &config).unwrap();
    scheduler.start();
    scheduler.tick(5.0).unwrap();

    let m = scheduler.backend().draws()[0];
    let expected = Transform::scale(&Transform::projection(200.0, 100.0, 100.0), 2.0, 2.0, 2.0);
    assert_relative_eq!(m, expected, epsilon = 1e-6);
}

#[test]
fn non_uniform_scale_reaches_the_draw() {
    let config = SceneConfig {
        scale: Vector3::new(2.0, 0.5, 1.0),
        rotation_speed: 0.0,
        ..SceneConfig::default()
    };
    let mut scheduler = FrameScheduler::new(RecordingBackend::new(800, 600), &config).unwrap();
    scheduler.start();
    scheduler.tick(1.0).unwrap();

    let m = scheduler.backend().draws()[0];
    let uniform = Transform::model_view_projection(
        &AnimationState::from_config(&SceneConfig::default()),
        800.0,
        600.0,
        400.0,
    );
    // Innermost scale multiplies the model-space columns
    for row in 0..4 {
        assert_relative_eq!(m[(row, 0)], uniform[(row, 0)] * 2.0, epsilon = 1e-7);
        assert_relative_eq!(m[(row, 1)], uniform[(row, 1)] * 0.5, epsilon = 1e-7);
        assert_relative_eq!(m[(row, 2)], uniform[(row, 2)], epsilon = 1e-7);
        assert_relative_eq!(m[(row, 3)], uniform[(row, 3)], epsilon = 1e-7);
    }
}

#[test]
fn rotation_keeps_advancing_after_a_long_run() {
    let backend = RecordingBackend::new(800, 600);
    let day = 86_400.0;
    let mut scheduler = FrameScheduler::new(backend, &SceneConfig::default())
        .unwrap()
        .with_timing(FrameTiming::starting_at(day));
    scheduler.start();
    // Spin for a day in one step, then continue frame by frame
    scheduler.tick(2.0 * day).unwrap();

    let frame = 1.0 / 60.0;
    let mut previous = scheduler.animation().rotation.y;
    for n in 1..=10 {
        scheduler.tick(2.0 * day + n as f64 * frame).unwrap();
        let current = scheduler.animation().rotation.y;
        assert!(current > previous);
        assert_relative_eq!(current - previous, 1.2 * frame, epsilon = 1e-6);
        previous = current;
    }

    let draws = scheduler.backend().draws();
    assert_ne!(draws[draws.len() - 1], draws[draws.len() - 2]);
}

#[test]
fn zero_sized_surface_skips_the_draw() {
    let mut scheduler = running(RecordingBackend::new(0, 600));
    assert_eq!(scheduler.tick(0.1).unwrap(), FrameOutcome::Skipped);
    assert!(scheduler.backend().draws().is_empty());
    assert_eq!(scheduler.frames_drawn(), 0);
    assert!(scheduler.should_reschedule());

    scheduler.backend_mut().size = (640, 480);
    assert_eq!(scheduler.tick(0.2).unwrap(), FrameOutcome::Drawn);
}

#[test]
fn frame_error_keeps_running() {
    let mut backend = RecordingBackend::new(800, 600);
    backend.fail_draw = Some(|| Error::Frame("draw rejected".into()));
    let mut scheduler = running(backend);

    let err = scheduler.tick(0.1).unwrap_err();
    assert!(matches!(err, Error::Frame(_)));
    assert_eq!(scheduler.state(), SchedulerState::Running);
    assert!(scheduler.should_reschedule());

    scheduler.backend_mut().fail_draw = None;
    assert_eq!(scheduler.tick(0.2).unwrap(), FrameOutcome::Drawn);
}

#[test]
fn lost_context_stops_the_loop() {
    let mut backend = RecordingBackend::new(800, 600);
    backend.fail_draw = Some(|| Error::ContextLost("gone".into()));
    let mut scheduler = running(backend);

    assert!(scheduler.tick(0.1).is_err());
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert!(!scheduler.should_reschedule());

    scheduler.backend_mut().fail_draw = None;
    assert_eq!(scheduler.tick(0.2).unwrap(), FrameOutcome::Skipped);
}

#[test]
fn cancellation_stops_before_the_next_frame() {
    let mut scheduler = running(RecordingBackend::new(800, 600));
    let token = scheduler.cancellation_token();
    scheduler.tick(0.1).unwrap();

    token.cancel();
    assert!(!scheduler.should_reschedule());
    assert_eq!(scheduler.tick(0.2).unwrap(), FrameOutcome::Skipped);
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert_eq!(scheduler.backend().draws().len(), 1);
}

#[test]
fn start_only_leaves_idle() {
    let mut scheduler = running(RecordingBackend::new(800, 600));
    scheduler.stop();
    scheduler.start();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = SceneConfig {
        projection_depth: 0.0,
        ..SceneConfig::default()
    };
    let result = FrameScheduler::new(RecordingBackend::new(800, 600), &config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}
