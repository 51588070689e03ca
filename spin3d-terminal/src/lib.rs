/// Terminal backend and host loop for the spinning letter
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use nalgebra::Matrix4;
use spin3d_core::{Error, FrameScheduler, Mesh, RendererBackend, Result, SceneConfig};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Virtual pixels covered by one terminal cell. Matches the usual 1:2
/// glyph aspect so pixel-space scenes keep their proportions.
pub const CELL_WIDTH_PX: u32 = 8;
pub const CELL_HEIGHT_PX: u32 = 16;

/// Where the cell grid size comes from
#[derive(Debug, Clone, Copy)]
enum GridSize {
    Terminal,
    Fixed(u16, u16),
}

/// [`RendererBackend`] that rasterizes the mesh into a terminal
pub struct TerminalBackend<W: Write> {
    writer: W,
    mesh: Mesh,
    renderer: AsciiRenderer,
    grid: GridSize,
    status: Option<String>,
}

impl<W: Write> TerminalBackend<W> {
    /// Backend sized from the live terminal on every resize
    pub fn initialize(writer: W, mesh: &Mesh) -> Result<Self> {
        let (cols, rows) = terminal::size()
            .map_err(|e| Error::Initialization(format!("no terminal size: {}", e)))?;
        info!("terminal backend initialized at {}x{} cells", cols, rows);
        Ok(Self::new(writer, mesh, GridSize::Terminal, cols, rows))
    }

    /// Backend with a fixed cell grid, independent of any terminal
    pub fn with_grid(writer: W, mesh: &Mesh, cols: u16, rows: u16) -> Self {
        Self::new(writer, mesh, GridSize::Fixed(cols, rows), cols, rows)
    }

    fn new(writer: W, mesh: &Mesh, grid: GridSize, cols: u16, rows: u16) -> Self {
        Self {
            writer,
            mesh: mesh.clone(),
            renderer: AsciiRenderer::new(cols as usize, rows as usize),
            grid,
            status: None,
        }
    }

    /// One line drawn over the top-left of every frame
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> RendererBackend for TerminalBackend<W> {
    fn resize(&mut self) -> Result<(u32, u32)> {
        let (cols, rows) = match self.grid {
            GridSize::Terminal => terminal::size().map_err(output_error)?,
            GridSize::Fixed(cols, rows) => (cols, rows),
        };

        if (cols as usize, rows as usize) != (self.renderer.width(), self.renderer.height()) {
            debug!("terminal resized to {}x{} cells", cols, rows);
            self.renderer.resize(cols as usize, rows as usize);
            queue!(self.writer, terminal::Clear(ClearType::All)).map_err(output_error)?;
        }

        Ok((cols as u32 * CELL_WIDTH_PX, rows as u32 * CELL_HEIGHT_PX))
    }

    fn clear(&mut self) -> Result<()> {
        self.renderer.clear();
        Ok(())
    }

    fn draw(&mut self, matrix: &Matrix4<f32>) -> Result<()> {
        self.renderer.render_mesh(&self.mesh, matrix);

        queue!(self.writer, cursor::MoveTo(0, 0)).map_err(output_error)?;
        self.renderer.draw(&mut self.writer).map_err(output_error)?;

        if let Some(status) = &self.status {
            queue!(
                self.writer,
                cursor::MoveTo(0, 0),
                SetForegroundColor(Color::Yellow),
                Print(status),
                ResetColor
            )
            .map_err(output_error)?;
        }

        self.writer.flush().map_err(output_error)
    }
}

/// A closed output can never take another frame, so it counts as a lost
/// context. Anything else is left to the next frame.
fn output_error(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof | io::ErrorKind::WriteZero => {
            Error::ContextLost(format!("terminal output closed: {}", err))
        }
        _ => Error::Io(err),
    }
}

/// Main application struct: owns the scheduler and plays host to it
pub struct TerminalApp {
    scheduler: FrameScheduler<TerminalBackend<Stdout>>,
    frame_time: Duration,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &SceneConfig) -> Result<Self> {
        let mut backend = TerminalBackend::initialize(stdout(), &mesh)?;
        backend.set_status("spin3d | Q/Esc to quit");

        Ok(Self {
            scheduler: FrameScheduler::new(backend, config)?,
            frame_time: Duration::from_millis(1000 / 30), // 30 FPS target
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let cancel = self.scheduler.cancellation_token();
        let clock = Instant::now();
        self.scheduler.start();

        while self.scheduler.should_reschedule() {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? && quit_requested(&event::read()?) {
                cancel.cancel();
                continue;
            }

            match self.scheduler.tick(clock.elapsed().as_secs_f64()) {
                Ok(_) => {}
                Err(err) if err.is_fatal() => return Err(err),
                // Already logged by the scheduler; try again next frame
                Err(_) => {}
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }

        info!("drew {} frames", self.scheduler.frames_drawn());
        Ok(())
    }
}

fn quit_requested(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Esc => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin3d_core::{FrameOutcome, SchedulerState, Transform};

    #[test]
    fn test_resize_reports_virtual_pixels() {
        let mut backend = TerminalBackend::with_grid(Vec::new(), &Mesh::letter_a(), 100, 40);
        assert_eq!(backend.resize().unwrap(), (800, 640));
        assert_eq!(backend.renderer().width(), 100);
    }

    #[test]
    fn test_draw_writes_frame() {
        let mut backend = TerminalBackend::with_grid(Vec::new(), &Mesh::letter_a(), 100, 40);
        backend.set_status("status");
        let matrix = Transform::model_view_projection(&Default::default(), 800.0, 640.0, 400.0);
        backend.clear().unwrap();
        backend.draw(&matrix).unwrap();

        assert!(backend.renderer().covered_cells() > 0);
        let text = String::from_utf8_lossy(backend.writer());
        assert!(text.contains("status"));
    }

    #[test]
    fn test_draws_only_the_mesh_it_was_built_with() {
        let matrix = Transform::model_view_projection(&Default::default(), 800.0, 640.0, 400.0);
        let mut empty = TerminalBackend::with_grid(Vec::new(), &Mesh::new(), 100, 40);
        empty.clear().unwrap();
        empty.draw(&matrix).unwrap();
        assert_eq!(empty.renderer().covered_cells(), 0);
    }

    #[test]
    fn test_scheduler_drives_terminal_backend() {
        let backend = TerminalBackend::with_grid(Vec::new(), &Mesh::letter_a(), 100, 40);
        let mut scheduler = FrameScheduler::new(backend, &SceneConfig::default()).unwrap();
        scheduler.start();

        for frame in 0..3 {
            assert_eq!(scheduler.tick(frame as f64 / 30.0).unwrap(), FrameOutcome::Drawn);
        }
        assert!(!scheduler.backend().writer().is_empty());
    }

    /// Output whose reader has gone away
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
        }
    }

    #[test]
    fn test_closed_output_stops_scheduler() {
        let backend = TerminalBackend::with_grid(ClosedPipe, &Mesh::letter_a(), 100, 40);
        let mut scheduler = FrameScheduler::new(backend, &SceneConfig::default()).unwrap();
        scheduler.start();

        let err = scheduler.tick(0.0).unwrap_err();
        assert!(matches!(err, Error::ContextLost(_)));
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(!scheduler.should_reschedule());
    }

    #[test]
    fn test_output_error_classification() {
        for kind in [
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::UnexpectedEof,
            io::ErrorKind::WriteZero,
        ] {
            assert!(output_error(io::Error::new(kind, "closed")).is_fatal());
        }
        let busy = output_error(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        assert!(matches!(busy, Error::Io(_)));
        assert!(!busy.is_fatal());
    }

    #[test]
    fn test_quit_keys() {
        let key = |code, modifiers| Event::Key(KeyEvent::new(code, modifiers));
        assert!(quit_requested(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(quit_requested(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(quit_requested(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!quit_requested(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!quit_requested(&key(KeyCode::Char('w'), KeyModifiers::NONE)));
    }
}
