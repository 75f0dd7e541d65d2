//! Window and event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`]: it creates the window and
//! renderer on resume, forwards resizes and key presses, and runs one
//! [`FrameLoop`] tick per redraw.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::config::BlobConfig;
use crate::control::CommandSender;
use crate::error::SimulationError;
use crate::frame::FrameLoop;
use crate::gpu::GpuState;
use crate::input::{KeyAction, KeyBindings};
use crate::viewport::ViewportState;

const WINDOW_TITLE: &str = "mä nään värejä";

pub struct App {
    config: BlobConfig,
    bindings: KeyBindings,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    frame: Option<FrameLoop>,
    commands: Option<CommandSender>,
    error: Option<SimulationError>,
}

impl App {
    pub fn new(config: BlobConfig) -> Self {
        Self {
            config,
            bindings: KeyBindings::default(),
            window: None,
            gpu_state: None,
            frame: None,
            commands: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<SimulationError> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let mut window_attrs = Window::default_attributes().with_title(WINDOW_TITLE);
        if self.config.fullscreen {
            window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            window_attrs = window_attrs.with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        }

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        window.set_cursor_visible(false);

        let refresh_rate = window
            .current_monitor()
            .and_then(|monitor| monitor.refresh_rate_millihertz())
            .map(|mhz| mhz as f32 / 1000.0)
            .filter(|hz| *hz > 0.0)
            .unwrap_or(self.config.refresh_rate);

        let size = window.inner_size();
        let viewport = ViewportState::from_size(size.width, size.height);
        let (frame, commands) = FrameLoop::new(&self.config, viewport, refresh_rate)?;
        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            frame.particles().len() as u32,
        ))?;

        window.request_redraw();
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.frame = Some(frame);
        self.commands = Some(commands);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SimulationError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(frame) = &mut self.frame {
                    frame.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => match self.bindings.action_for(&event) {
                Some(KeyAction::Quit) => event_loop.exit(),
                Some(KeyAction::Command(command)) => {
                    if let Some(commands) = &self.commands {
                        commands.send(command);
                    }
                }
                None => {}
            },
            WindowEvent::RedrawRequested => {
                if let (Some(frame), Some(gpu_state)) = (&mut self.frame, &mut self.gpu_state) {
                    match frame.tick(gpu_state) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                            gpu_state.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(config: BlobConfig) -> Result<(), SimulationError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
