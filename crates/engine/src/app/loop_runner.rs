use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::tools::OverlayData;
use super::{run_frame, InputAction, InputSnapshot, LoopMetricsSnapshot, Renderer, Scene};

const SLOW_FRAME_ENV_VAR: &str = "TILESWORD_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
    pub overlay_visible_at_start: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Tile Sword".to_string(),
            window_width: 800,
            window_height: 600,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
            overlay_visible_at_start: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let metrics_log_interval = if config.metrics_log_interval.is_zero() {
        Duration::from_secs(1)
    } else {
        config.metrics_log_interval
    };
    let slow_frame_delay =
        slow_frame_delay(env::var(SLOW_FRAME_ENV_VAR), config.simulated_slow_frame_ms);
    let mut pacer = FramePacer::new(config.max_render_fps, Instant::now());
    let mut input_collector = InputCollector::default();

    scene.load();
    let viewport = renderer.viewport();
    info!(
        window_width = viewport.width,
        window_height = viewport.height,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = ?pacer.cap(),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_metrics = LoopMetricsSnapshot::default();
    let mut overlay_visible = config.overlay_visible_at_start;
    let window_for_loop = Arc::clone(&window);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::Focused(false) => {
                        input_collector.release_all();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_physical_key(
                            event.physical_key,
                            event.state,
                            event.repeat,
                        );
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if input_collector.take_overlay_toggle_pressed() {
                            overlay_visible = !overlay_visible;
                            info!(overlay_visible, "overlay_toggled");
                        }

                        if slow_frame_delay > Duration::ZERO {
                            // Debug perturbation, separate from the fps cap.
                            thread::sleep(slow_frame_delay);
                        }

                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let wait = pacer.wait_before_present(Instant::now());
                        if wait > Duration::ZERO {
                            thread::sleep(wait);
                        }

                        let input_snapshot = input_collector.snapshot_for_frame();
                        let render_result = renderer.render_frame(|canvas| {
                            run_frame(scene.as_mut(), &input_snapshot, canvas);
                            overlay_visible.then(|| OverlayData {
                                metrics: last_metrics,
                                render_fps_cap: pacer.cap(),
                                slow_frame_delay_ms: slow_frame_delay.as_millis() as u64,
                                scene_summary: scene.debug_summary(),
                            })
                        });
                        metrics_accumulator.record_update();
                        if let Err(error) = render_result {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        pacer.mark_presented(Instant::now());
                        metrics_accumulator.record_frame(raw_frame_dt);

                        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                            last_metrics = snapshot;
                            let summary = scene.debug_summary().unwrap_or_default();
                            info!(
                                fps = snapshot.fps,
                                ups = snapshot.ups,
                                frame_time_ms = snapshot.frame_time_ms,
                                scene = %summary,
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    attack_key_is_down: bool,
    attack_pressed_edge: bool,
    overlay_toggle_is_down: bool,
    overlay_toggle_pressed_edge: bool,
    action_states: ActionStates,
}

impl InputCollector {
    fn handle_physical_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        let is_pressed = state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key, is_pressed);
        self.handle_attack_key_state(is_attack_key(key), state, repeat);
        self.handle_overlay_toggle_key_state(is_overlay_toggle_key(key), state, repeat);
    }

    // OS key repeat never raises an edge, even when focus loss has cleared
    // the held flag underneath a key that is still physically down.
    fn handle_attack_key_state(&mut self, is_attack: bool, state: ElementState, repeat: bool) {
        if !is_attack {
            return;
        }

        match state {
            ElementState::Pressed => {
                if !repeat && !self.attack_key_is_down {
                    self.attack_pressed_edge = true;
                }
                self.attack_key_is_down = true;
            }
            ElementState::Released => self.attack_key_is_down = false,
        }
    }

    fn handle_overlay_toggle_key_state(
        &mut self,
        is_toggle_key: bool,
        state: ElementState,
        repeat: bool,
    ) {
        if !is_toggle_key {
            return;
        }

        match state {
            ElementState::Pressed => {
                if !repeat && !self.overlay_toggle_is_down {
                    self.overlay_toggle_pressed_edge = true;
                }
                self.overlay_toggle_is_down = true;
            }
            ElementState::Released => self.overlay_toggle_is_down = false,
        }
    }

    fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.attack_pressed_edge, self.action_states);
        self.attack_pressed_edge = false;
        snapshot
    }

    fn take_overlay_toggle_pressed(&mut self) -> bool {
        std::mem::take(&mut self.overlay_toggle_pressed_edge)
    }

    // Key-up events are lost while unfocused. Pending edges are kept.
    fn release_all(&mut self) {
        self.action_states = ActionStates::default();
        self.attack_key_is_down = false;
        self.overlay_toggle_is_down = false;
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let action = match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                InputAction::MoveUp
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                InputAction::MoveDown
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                InputAction::MoveLeft
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                InputAction::MoveRight
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.quit_requested |= is_pressed;
                return;
            }
            _ => return,
        };
        self.action_states.set(action, is_pressed);
    }
}

#[derive(Debug)]
struct FramePacer {
    cap: Option<u32>,
    frame_budget: Option<Duration>,
    last_present: Instant,
}

impl FramePacer {
    fn new(max_render_fps: Option<u32>, now: Instant) -> Self {
        let cap = max_render_fps.filter(|fps| *fps > 0);
        Self {
            cap,
            frame_budget: cap.map(|fps| Duration::from_secs(1) / fps),
            last_present: now,
        }
    }

    fn cap(&self) -> Option<u32> {
        self.cap
    }

    fn wait_before_present(&self, now: Instant) -> Duration {
        let since_present = now.saturating_duration_since(self.last_present);
        self.frame_budget
            .map_or(Duration::ZERO, |budget| budget.saturating_sub(since_present))
    }

    fn mark_presented(&mut self, now: Instant) {
        self.last_present = now;
    }
}

fn slow_frame_delay(env_value: Result<String, env::VarError>, config_ms: u64) -> Duration {
    let fallback = Duration::from_millis(config_ms);
    match env_value {
        Err(env::VarError::NotPresent) => fallback,
        Err(error) => {
            warn!(env_var = SLOW_FRAME_ENV_VAR, error = %error, "slow_frame_env_unreadable");
            fallback
        }
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(env_var = SLOW_FRAME_ENV_VAR, value = %raw, "slow_frame_env_invalid");
                fallback
            }
        },
    }
}

fn is_attack_key(key: PhysicalKey) -> bool {
    matches!(key, PhysicalKey::Code(KeyCode::Space))
}

fn is_overlay_toggle_key(key: PhysicalKey) -> bool {
    matches!(key, PhysicalKey::Code(KeyCode::F3))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACE: PhysicalKey = PhysicalKey::Code(KeyCode::Space);

    fn press(input: &mut InputCollector, key: PhysicalKey) {
        input.handle_physical_key(key, ElementState::Pressed, false);
    }

    fn repeat(input: &mut InputCollector, key: PhysicalKey) {
        input.handle_physical_key(key, ElementState::Pressed, true);
    }

    fn release(input: &mut InputCollector, key: PhysicalKey) {
        input.handle_physical_key(key, ElementState::Released, false);
    }

    #[test]
    fn attack_press_is_edge_triggered_for_single_frame() {
        let mut input = InputCollector::default();
        press(&mut input, SPACE);

        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert!(first.attack_pressed());
        assert!(!second.attack_pressed());
    }

    #[test]
    fn no_retrigger_without_new_press() {
        let mut input = InputCollector::default();
        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert!(!first.attack_pressed());
        assert!(!second.attack_pressed());
    }

    #[test]
    fn held_attack_key_repeat_events_do_not_spam_edges() {
        let mut input = InputCollector::default();

        press(&mut input, SPACE);
        let first = input.snapshot_for_frame();

        repeat(&mut input, SPACE);
        repeat(&mut input, SPACE);
        let second = input.snapshot_for_frame();

        release(&mut input, SPACE);
        press(&mut input, SPACE);
        let third = input.snapshot_for_frame();

        assert!(first.attack_pressed());
        assert!(!second.attack_pressed());
        assert!(third.attack_pressed());
    }

    #[test]
    fn repeat_after_focus_loss_does_not_start_new_attack() {
        let mut input = InputCollector::default();
        press(&mut input, SPACE);
        assert!(input.snapshot_for_frame().attack_pressed());

        // Space stays physically held while the window loses and regains focus.
        input.release_all();
        repeat(&mut input, SPACE);
        repeat(&mut input, SPACE);
        assert!(!input.snapshot_for_frame().attack_pressed());

        release(&mut input, SPACE);
        press(&mut input, SPACE);
        assert!(input.snapshot_for_frame().attack_pressed());
    }

    #[test]
    fn duplicate_key_down_without_repeat_flag_still_debounced() {
        let mut input = InputCollector::default();
        press(&mut input, SPACE);
        input.snapshot_for_frame();

        press(&mut input, SPACE);
        assert!(!input.snapshot_for_frame().attack_pressed());
    }

    #[test]
    fn tap_between_frames_still_registers() {
        let mut input = InputCollector::default();
        press(&mut input, SPACE);
        release(&mut input, SPACE);

        assert!(input.snapshot_for_frame().attack_pressed());
    }

    #[test]
    fn wasd_and_arrow_keys_map_to_actions() {
        let mut input = InputCollector::default();

        press(&mut input, PhysicalKey::Code(KeyCode::KeyW));
        press(&mut input, PhysicalKey::Code(KeyCode::ArrowLeft));
        press(&mut input, PhysicalKey::Code(KeyCode::ArrowDown));
        press(&mut input, PhysicalKey::Code(KeyCode::KeyD));

        let snapshot = input.snapshot_for_frame();
        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(snapshot.is_down(InputAction::MoveDown));
        assert!(snapshot.is_down(InputAction::MoveRight));
    }

    #[test]
    fn key_release_clears_action_state() {
        let mut input = InputCollector::default();
        press(&mut input, PhysicalKey::Code(KeyCode::KeyD));
        release(&mut input, PhysicalKey::Code(KeyCode::KeyD));

        assert!(!input.snapshot_for_frame().is_down(InputAction::MoveRight));
    }

    #[test]
    fn held_movement_persists_across_snapshots_and_repeats() {
        let mut input = InputCollector::default();
        press(&mut input, PhysicalKey::Code(KeyCode::ArrowUp));
        repeat(&mut input, PhysicalKey::Code(KeyCode::ArrowUp));

        assert!(input.snapshot_for_frame().is_down(InputAction::MoveUp));
        assert!(input.snapshot_for_frame().is_down(InputAction::MoveUp));
    }

    #[test]
    fn escape_requests_quit_and_space_does_not() {
        let mut input = InputCollector::default();
        press(&mut input, SPACE);
        assert!(!input.quit_requested);

        press(&mut input, PhysicalKey::Code(KeyCode::Escape));
        release(&mut input, PhysicalKey::Code(KeyCode::Escape));
        assert!(input.quit_requested);
    }

    #[test]
    fn focus_loss_releases_held_keys_but_keeps_pending_edge() {
        let mut input = InputCollector::default();
        press(&mut input, PhysicalKey::Code(KeyCode::KeyA));
        press(&mut input, SPACE);

        input.release_all();
        let snapshot = input.snapshot_for_frame();
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(snapshot.attack_pressed());
    }

    #[test]
    fn f3_toggle_ignores_repeats() {
        let f3 = PhysicalKey::Code(KeyCode::F3);
        let mut input = InputCollector::default();

        press(&mut input, f3);
        assert!(input.take_overlay_toggle_pressed());
        assert!(!input.take_overlay_toggle_pressed());

        input.release_all();
        repeat(&mut input, f3);
        assert!(!input.take_overlay_toggle_pressed());

        release(&mut input, f3);
        press(&mut input, f3);
        assert!(input.take_overlay_toggle_pressed());
    }

    #[test]
    fn pacer_without_cap_never_waits() {
        let start = Instant::now();
        let pacer = FramePacer::new(None, start);

        assert_eq!(pacer.cap(), None);
        assert_eq!(pacer.wait_before_present(start), Duration::ZERO);
    }

    #[test]
    fn pacer_treats_zero_cap_as_uncapped() {
        let start = Instant::now();
        let pacer = FramePacer::new(Some(0), start);

        assert_eq!(pacer.cap(), None);
        assert_eq!(pacer.wait_before_present(start), Duration::ZERO);
    }

    #[test]
    fn pacer_waits_out_remaining_frame_budget() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(Some(50), start);

        assert_eq!(pacer.cap(), Some(50));
        assert_eq!(
            pacer.wait_before_present(start + Duration::from_millis(5)),
            Duration::from_millis(15)
        );
        assert_eq!(
            pacer.wait_before_present(start + Duration::from_millis(30)),
            Duration::ZERO
        );

        pacer.mark_presented(start + Duration::from_millis(30));
        assert_eq!(
            pacer.wait_before_present(start + Duration::from_millis(40)),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn slow_frame_delay_prefers_valid_env_value() {
        assert_eq!(
            slow_frame_delay(Ok(" 25 ".to_string()), 0),
            Duration::from_millis(25)
        );
    }

    #[test]
    fn slow_frame_delay_falls_back_to_config() {
        assert_eq!(
            slow_frame_delay(Err(env::VarError::NotPresent), 7),
            Duration::from_millis(7)
        );
        assert_eq!(
            slow_frame_delay(Ok("fast".to_string()), 7),
            Duration::from_millis(7)
        );
    }
}
