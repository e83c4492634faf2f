//! Breakout native entry point
//!
//! Owns the window, the fixed-timestep loop and the wiring between input,
//! simulation, sound and rendering.

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use breakout::Settings;
use breakout::audio::AudioManager;
use breakout::consts::*;
use breakout::controller::{self, Action, Controller};
use breakout::renderer::{self, Effects, RenderError, RenderState};
use breakout::sim::{EventBus, GameState, LevelError, LevelSet, tick};

/// Frames-per-second over half-second windows
struct FpsCounter {
    frames: u32,
    since: Instant,
    value: Option<f32>,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
            value: None,
        }
    }

    fn frame(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed().as_secs_f32();
        if elapsed >= 0.5 {
            self.value = Some(self.frames as f32 / elapsed);
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

/// Everything that isn't tied to the window
struct Game {
    state: GameState,
    controller: Controller,
    events: EventBus,
    effects: Rc<RefCell<Effects>>,
    audio: Rc<AudioManager>,
    settings: Settings,
    accumulator: f32,
    last_frame: Option<Instant>,
    fps: FpsCounter,
}

impl Game {
    fn new(settings: Settings, levels: LevelSet, seed: u64) -> Self {
        let mut state = GameState::new(levels, seed);
        state.set_start_level(settings.start_level);
        log::info!("Game initialized with seed: {seed}");

        let audio = Rc::new(AudioManager::new(settings.sound, settings.master_volume));
        let effects = Rc::new(RefCell::new(Effects::new()));

        let mut events = EventBus::new();
        let sound = Rc::clone(&audio);
        events.subscribe(move |event| {
            if let Some(effect) = controller::sound_for(event) {
                sound.play(effect);
            }
        });
        let view = Rc::clone(&effects);
        events.subscribe(move |event| view.borrow_mut().on_event(event));

        Self {
            state,
            controller: Controller::new(settings.mouse_control, settings.sound),
            events,
            effects,
            audio,
            settings,
            accumulator: 0.0,
            last_frame: None,
            fps: FpsCounter::new(),
        }
    }

    fn handle(&mut self, action: Action) {
        self.controller.handle(action);
        if action == Action::ToggleSound {
            let enabled = self.controller.sound_enabled();
            self.audio.set_enabled(enabled);
            self.settings.sound = enabled;
            if let Err(e) = self.settings.save() {
                log::warn!("Could not save settings: {e}");
            }
        }
    }

    /// Run as many fixed ticks as wall time allows
    fn advance(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        // Clamp to avoid a spiral of death after a stall
        self.accumulator = (self.accumulator + dt).min(SIM_DT * MAX_SUBSTEPS as f32);

        while self.accumulator >= SIM_DT {
            let input = self.controller.take_input();
            tick(&mut self.state, &input);
            let events = self.state.drain_events();
            self.events.publish_all(&events);
            self.effects.borrow_mut().update();
            self.accumulator -= SIM_DT;
        }

        self.fps.frame();
    }

    fn title(&self) -> String {
        let fps = if self.settings.show_fps {
            self.fps.value
        } else {
            None
        };
        renderer::title(&self.state, fps)
    }
}

struct App {
    game: Game,
    window: Option<Arc<Window>>,
    render_state: Option<RenderState>,
    last_title: String,
    /// Set when the app had to quit on an unrecoverable error
    failed: bool,
}

impl App {
    fn new(game: Game) -> Self {
        Self {
            game,
            window: None,
            render_state: None,
            last_title: String::new(),
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop) {
        self.failed = true;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.game.advance();

        let Some(render_state) = self.render_state.as_mut() else {
            return;
        };
        let vertices = renderer::build_scene(&self.game.state, &self.game.effects.borrow());
        match render_state.render(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
                self.fail(event_loop);
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        let title = self.game.title();
        if title != self.last_title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.last_title = title;
        }
    }
}

fn init_graphics(window: Arc<Window>) -> Result<RenderState, RenderError> {
    let size = window.inner_size();
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let surface = instance.create_surface(window)?;

    pollster::block_on(async {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);
        RenderState::new(surface, &adapter, size.width, size.height).await
    })
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Breakout")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.fail(event_loop);
                return;
            }
        };

        match init_graphics(Arc::clone(&window)) {
            Ok(render_state) => {
                if self.game.controller.mouse_control() {
                    window.set_cursor_visible(false);
                }
                self.render_state = Some(render_state);
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                self.fail(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(render_state) = &mut self.render_state {
                    render_state.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::Focused(false) => self.game.controller.release_all(),
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let pressed = event.state.is_pressed();
                if event.repeat && pressed {
                    return;
                }
                if code == KeyCode::Escape && pressed {
                    event_loop.exit();
                    return;
                }
                if let Some(action) = controller::action_for_key(code, pressed) {
                    self.game.handle(action);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(render_state) = &self.render_state {
                    let p = renderer::surface_to_playfield(
                        position.x as f32,
                        position.y as f32,
                        render_state.size,
                    );
                    self.game.handle(Action::MouseMoved(p.x));
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.game.handle(Action::Fire),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn load_levels(settings: &Settings) -> Result<LevelSet, LevelError> {
    match &settings.levels_dir {
        Some(dir) => LevelSet::from_dir(dir),
        None => LevelSet::builtin(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Breakout starting...");

    let settings = Settings::load();
    let levels = match load_levels(&settings) {
        Ok(levels) => levels,
        Err(e) => {
            log::error!("Failed to load levels: {e}");
            return ExitCode::FAILURE;
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(Game::new(settings, levels, seed));
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
