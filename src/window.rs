//! Window and Event Loop Management
//!
//! Opens the window that shows a finished drawing and runs the event loop
//! until the user closes it. This is the only blocking point of a drawing
//! session.

use crate::app::{Animation, App};
use crate::color::Color;
use crate::constants::{
    BACKGROUND_COLOR, PEN_WIDTH, SHAPES_PER_FRAME, VIEWPORT_MARGIN, WINDOW_HEIGHT, WINDOW_TITLE,
    WINDOW_WIDTH,
};
use crate::error::{Result, SpiralError};
use crate::raster::FillRule;
use crate::turtle::Drawing;
use crate::Renderer;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window and presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub pen_width: f64,
    pub fill_rule: FillRule,
    pub animation: Animation,
    /// Pixels kept free around the drawing
    pub margin: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_string(),
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            background: BACKGROUND_COLOR,
            pen_width: PEN_WIDTH,
            fill_rule: FillRule::default(),
            animation: Animation::Animated {
                shapes_per_frame: SHAPES_PER_FRAME,
            },
            margin: VIEWPORT_MARGIN,
        }
    }
}

/// Show `drawing` in a window and block until the window is closed.
pub fn run(event_loop: EventLoop<()>, drawing: Drawing, config: WindowConfig) -> Result<()> {
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app_wrapper = AppWrapper::new(drawing, config);
    event_loop.run_app(&mut app_wrapper)?;

    match app_wrapper.failure.take() {
        Some(err) => Err(err),
        None => {
            log::info!("Window closed");
            Ok(())
        }
    }
}

/// Wrapper for the application window and state
pub struct AppWrapper {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    app: Option<App>,
    config: WindowConfig,
    /// Held until the window exists, then moved into `app`
    drawing: Option<Drawing>,
    /// Setup error raised inside a callback, returned after the loop exits
    failure: Option<SpiralError>,
}

impl AppWrapper {
    pub fn new(drawing: Drawing, config: WindowConfig) -> Self {
        Self {
            window: None,
            renderer: None,
            app: None,
            config,
            drawing: Some(drawing),
            failure: None,
        }
    }

    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();
        log::info!("Window created: {:?}", size);

        let renderer = pollster::block_on(Renderer::new(window.clone(), size))?;
        let drawing = self.drawing.take().unwrap_or_default();
        let canvas_size = renderer.canvas_size();
        let app = App::new(
            drawing,
            self.config.background,
            self.config.fill_rule,
            self.config.animation,
            self.config.margin,
            canvas_size,
        );

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.app = Some(app);

        log::info!("✅ Renderer created");
        Ok(())
    }
}

impl ApplicationHandler for AppWrapper {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create(event_loop) {
            log::error!("❌ Failed to open drawing window: {}", err);
            self.failure = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                // Skip invalid sizes
                if physical_size.width == 0 || physical_size.height == 0 {
                    log::warn!("Ignoring resize to zero size: {:?}", physical_size);
                    return;
                }

                if let (Some(renderer), Some(app)) = (&mut self.renderer, &mut self.app) {
                    renderer.resize(physical_size);
                    app.resize(renderer.canvas_size());
                    log::debug!("Surface configured with size: {:?}", physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(renderer), Some(app)) = (&mut self.renderer, &mut self.app) {
                    let animating = app.update();
                    app.render(renderer);

                    // Keep drawing frames until the reveal finishes, then wait for events
                    if animating {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
