//! Viewer state and the per-tick interaction loop
//!
//! The loop only talks to its surroundings through the traits below, so the
//! frontend (macroquad) and the tests plug in their own display, input and
//! clock.

use tracing::{debug, info};

use crate::config::{ViewerConfig, CAMERA_DISTANCE};
use crate::error::Result;
use crate::rasterizer::{render, Color, FillSink, Mat4, Triangle, Viewport};
use crate::surface::{build_triangles, generate};

/// Arrow keys that rotate the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// Pixel target the loop draws into
pub trait DisplaySurface: FillSink {
    fn clear(&mut self, color: Color);
    fn present(&mut self);
    fn viewport(&self) -> Viewport;
}

pub trait InputSource {
    /// True once the user has asked to close the window
    fn quit_requested(&mut self) -> bool;
    /// Whether the key is currently held
    fn is_down(&self, key: Direction) -> bool;
}

pub trait Clock {
    /// Block until the next tick boundary
    fn wait_for_tick(&mut self, ticks_per_second: u32);
}

/// Loop state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Rotation of the surface, in radians. Unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraState {
    pub angle_x: f32,
    pub angle_y: f32,
}

impl CameraState {
    /// Model transform: rotate about the origin (Y first, then X), then push
    /// the surface away from the camera.
    pub fn transform(&self) -> Mat4 {
        let rotation = Mat4::rotation_x(self.angle_x) * Mat4::rotation_y(self.angle_y);
        Mat4::translation(0.0, 0.0, -CAMERA_DISTANCE) * rotation
    }

    /// Apply one tick of held keys. Each held key contributes independently.
    pub fn apply_keys(&mut self, input: &impl InputSource, step: f32) {
        for key in Direction::ALL {
            if !input.is_down(key) {
                continue;
            }
            match key {
                Direction::Left => self.angle_y -= step,
                Direction::Right => self.angle_y += step,
                Direction::Up => self.angle_x -= step,
                Direction::Down => self.angle_x += step,
            }
        }
    }
}

/// Owns the static geometry, the cached projection and the camera
pub struct Viewer {
    config: ViewerConfig,
    projection: Mat4,
    triangles: Vec<Triangle>,
    pub camera: CameraState,
    state: LoopState,
    frame: u64,
}

impl Viewer {
    /// Validate the config and build the triangle list. Fails before any
    /// frame is drawn if a startup constant is out of range.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let projection = config.projection()?;
        let grid = generate(&config.surface)?;
        let points = grid.len();
        let triangles = build_triangles(grid);

        info!(
            points,
            triangles = triangles.len(),
            u_steps = config.surface.u_steps,
            v_steps = config.surface.v_steps,
            "tessellated surface"
        );

        Ok(Self {
            config,
            projection,
            triangles,
            camera: CameraState::default(),
            state: LoopState::Running,
            frame: 0,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames drawn so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Clear and draw the surface for the current camera
    pub fn draw<D: DisplaySurface>(&mut self, display: &mut D) {
        let viewport = display.viewport();
        display.clear(self.config.background);
        render(
            display,
            &self.triangles,
            self.projection,
            self.camera.transform(),
            viewport,
            self.config.surface_color,
        );
        self.frame += 1;
    }

    /// Poll input at the end of a tick. A quit request stops the loop
    /// without applying that tick's held keys.
    pub fn handle_input<I: InputSource>(&mut self, input: &mut I) {
        if input.quit_requested() {
            info!(frames = self.frame, "quit requested");
            self.state = LoopState::Stopped;
            return;
        }
        self.camera.apply_keys(input, self.config.rotation_step);
    }

    /// Run one full tick: draw, present, wait, poll input.
    /// Does nothing once stopped.
    pub fn tick<D, C, I>(&mut self, display: &mut D, clock: &mut C, input: &mut I) -> LoopState
    where
        D: DisplaySurface,
        C: Clock,
        I: InputSource,
    {
        if self.state == LoopState::Stopped {
            return self.state;
        }
        self.draw(display);
        display.present();
        clock.wait_for_tick(self.config.ticks_per_second);
        self.handle_input(input);
        if self.frame % u64::from(self.config.ticks_per_second) == 0 {
            debug!(
                frame = self.frame,
                angle_x = self.camera.angle_x,
                angle_y = self.camera.angle_y,
                "tick"
            );
        }
        self.state
    }
}

/// Fixed-rate pacing against wall-clock deadlines.
///
/// On wasm the browser's frame callback already paces the loop, so waiting
/// is a no-op there.
pub struct FramePacer {
    #[cfg(not(target_arch = "wasm32"))]
    next_tick: Option<std::time::Instant>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            next_tick: None,
        }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FramePacer {
    #[cfg(not(target_arch = "wasm32"))]
    fn wait_for_tick(&mut self, ticks_per_second: u32) {
        use std::time::{Duration, Instant};

        let period = Duration::from_secs(1) / ticks_per_second.max(1);
        let now = Instant::now();
        let deadline = self.next_tick.unwrap_or(now + period);
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next_tick = Some(deadline + period);
        } else {
            // Fell behind; restart the schedule instead of bursting
            self.next_tick = Some(now + period);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn wait_for_tick(&mut self, _ticks_per_second: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{project_point, transform_point, ScreenPoint, Vec3};
    use crate::surface::SurfaceParams;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[derive(Default)]
    struct MockDisplay {
        clears: usize,
        presents: usize,
        fills: usize,
    }

    impl FillSink for MockDisplay {
        fn fill_polygon(&mut self, _points: &[ScreenPoint], _color: Color) {
            self.fills += 1;
        }
    }

    impl DisplaySurface for MockDisplay {
        fn clear(&mut self, _color: Color) {
            self.clears += 1;
        }
        fn present(&mut self) {
            self.presents += 1;
        }
        fn viewport(&self) -> Viewport {
            Viewport::new(800, 600)
        }
    }

    #[derive(Default)]
    struct MockInput {
        quit: bool,
        held: HashSet<Direction>,
    }

    impl MockInput {
        fn holding(keys: &[Direction]) -> Self {
            Self {
                quit: false,
                held: keys.iter().copied().collect(),
            }
        }
    }

    impl InputSource for MockInput {
        fn quit_requested(&mut self) -> bool {
            self.quit
        }
        fn is_down(&self, key: Direction) -> bool {
            self.held.contains(&key)
        }
    }

    #[derive(Default)]
    struct MockClock {
        waits: Vec<u32>,
    }

    impl Clock for MockClock {
        fn wait_for_tick(&mut self, ticks_per_second: u32) {
            self.waits.push(ticks_per_second);
        }
    }

    fn small_viewer() -> Viewer {
        let config = ViewerConfig {
            surface: SurfaceParams {
                u_steps: 4,
                v_steps: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        Viewer::new(config).unwrap()
    }

    #[test]
    fn test_tick_draws_every_triangle() {
        let mut viewer = small_viewer();
        let mut display = MockDisplay::default();
        let mut clock = MockClock::default();
        let mut input = MockInput::default();

        let state = viewer.tick(&mut display, &mut clock, &mut input);
        assert_eq!(state, LoopState::Running);
        assert_eq!(display.clears, 1);
        assert_eq!(display.presents, 1);
        assert_eq!(display.fills, 2 * 3 * 2);
        assert_eq!(clock.waits, vec![30]);
        assert_eq!(viewer.frame(), 1);
    }

    #[test]
    fn test_up_and_left_accumulate_independently() {
        let mut viewer = small_viewer();
        let mut input = MockInput::holding(&[Direction::Up, Direction::Left]);
        viewer.tick(&mut MockDisplay::default(), &mut MockClock::default(), &mut input);

        assert_relative_eq!(viewer.camera.angle_x, -0.05);
        assert_relative_eq!(viewer.camera.angle_y, -0.05);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = CameraState::default();
        let input = MockInput::holding(&Direction::ALL);
        camera.apply_keys(&input, 0.05);
        assert_relative_eq!(camera.angle_x, 0.0);
        assert_relative_eq!(camera.angle_y, 0.0);

        camera.apply_keys(&MockInput::holding(&[Direction::Right, Direction::Down]), 0.05);
        assert_relative_eq!(camera.angle_x, 0.05);
        assert_relative_eq!(camera.angle_y, 0.05);
    }

    #[test]
    fn test_angles_are_not_wrapped() {
        let mut camera = CameraState::default();
        let input = MockInput::holding(&[Direction::Right]);
        for _ in 0..200 {
            camera.apply_keys(&input, 0.05);
        }
        assert_relative_eq!(camera.angle_y, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_quit_stops_rendering() {
        let mut viewer = small_viewer();
        let mut display = MockDisplay::default();
        let mut clock = MockClock::default();
        let mut input = MockInput {
            quit: true,
            ..Default::default()
        };

        // The tick that observes quit still completes its work
        assert_eq!(viewer.tick(&mut display, &mut clock, &mut input), LoopState::Stopped);
        assert_eq!(display.presents, 1);

        input.quit = false;
        for _ in 0..3 {
            assert_eq!(viewer.tick(&mut display, &mut clock, &mut input), LoopState::Stopped);
        }
        assert_eq!(display.clears, 1);
        assert_eq!(display.presents, 1);
        assert_eq!(clock.waits.len(), 1);
        assert_eq!(viewer.state(), LoopState::Stopped);
    }

    #[test]
    fn test_quit_ignores_held_keys() {
        let mut viewer = small_viewer();
        let mut input = MockInput::holding(&[Direction::Left]);
        input.quit = true;
        viewer.handle_input(&mut input);
        assert_eq!(viewer.state(), LoopState::Stopped);
        assert_eq!(viewer.camera, CameraState::default());
    }

    #[test]
    fn test_default_transform_pushes_origin_back() {
        let camera = CameraState::default();
        let p = transform_point(Vec3::ZERO, camera.transform());
        assert_eq!(p, Vec3::new(0.0, 0.0, -30.0));

        let viewer = small_viewer();
        let screen = project_point(p, viewer.projection(), viewer.config().viewport());
        assert_eq!(screen, ScreenPoint::new(400, 300));
    }

    #[test]
    fn test_invalid_config_fails_startup() {
        let config = ViewerConfig {
            near: -1.0,
            ..Default::default()
        };
        assert!(Viewer::new(config).is_err());
    }

    #[test]
    fn test_pacer_waits_roughly_one_period() {
        let mut pacer = FramePacer::new();
        let start = std::time::Instant::now();
        pacer.wait_for_tick(100);
        pacer.wait_for_tick(100);
        assert!(start.elapsed() >= std::time::Duration::from_millis(15));
    }
}
