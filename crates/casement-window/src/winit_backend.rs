//! Interactive backend on winit.
//!
//! The event loop is owned by the window and pumped once per frame rather
//! than run to completion, which keeps the driver loop in charge of frame
//! pacing. Native events are translated through the key tables into the
//! normalized queue during the pump; a native resize is deferred to the
//! pump boundary and applied there, never mid-frame, so a frame callback
//! can never observe a stale framebuffer size.

use std::sync::Arc;
use std::time::Duration;

use casement_core::geometry::{Rect, Size};
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

use crate::config::{GlVersion, WindowConfig};
use crate::context::GraphicsContext;
use crate::error::WindowError;
use crate::events::{Event, EventBatch, EventQueue};
use crate::keys::{Mods, MouseButton, translate_key};
use crate::target::{ClearPipeline, ClearTarget, Color, clear_target, create_depth_texture};
use crate::window::Window;

/// Pixels per scroll line when the platform reports line deltas.
const LINE_SCROLL_DELTA: f32 = 10.0;

/// `ApplicationHandler` state fed by `pump_app_events`.
///
/// Creates the native window on `resumed` and collects raw window events
/// for translation after the pump returns.
struct PumpState {
    attributes: Option<winit::window::WindowAttributes>,
    window: Option<Arc<winit::window::Window>>,
    create_error: Option<winit::error::OsError>,
    raw: Vec<WindowEvent>,
}

impl ApplicationHandler for PumpState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Some(attributes) = self.attributes.take() {
            match event_loop.create_window(attributes) {
                Ok(window) => self.window = Some(Arc::new(window)),
                Err(e) => self.create_error = Some(e),
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if !matches!(event, WindowEvent::RedrawRequested) {
            self.raw.push(event);
        }
    }
}

/// The currently acquired swapchain image, held between the first draw of
/// a frame and the present in `swap_buffers`.
struct AcquiredFrame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

pub struct WinitWindow {
    config: WindowConfig,
    size: Size<u32>,
    version: GlVersion,
    event_loop: Option<EventLoop<()>>,
    state: PumpState,
    context: Option<GraphicsContext>,
    surface: Option<wgpu::Surface<'static>>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: Option<wgpu::TextureView>,
    clear_pipeline: Option<ClearPipeline>,
    frame: Option<AcquiredFrame>,
    pending_resize: Option<Size<u32>>,
    events: EventQueue,
    mods: Mods,
    mouse_pos: Vec2,
    focused: bool,
    frames: u64,
    closing: bool,
}

impl WinitWindow {
    pub fn new(config: WindowConfig) -> Result<Self, WindowError> {
        config.validate()?;
        if config.samples > 1 {
            // Rendering goes straight to the swapchain; an MSAA resolve
            // into the surface is not wired up on this backend.
            return Err(WindowError::context(format!(
                "multisampling is not supported on the winit backend (requested {} samples)",
                config.samples
            )));
        }

        let mut event_loop = EventLoop::new()
            .map_err(|e| WindowError::display(format!("failed to create event loop: {}", e)))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut attributes = winit::window::Window::default_attributes()
            .with_title(config.title.clone())
            .with_resizable(config.resizable)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                config.size.width,
                config.size.height,
            ));
        if config.fullscreen {
            attributes =
                attributes.with_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let mut state = PumpState {
            attributes: Some(attributes),
            window: None,
            create_error: None,
            raw: Vec::new(),
        };

        // The window appears once `resumed` fires; give the platform a few
        // short pumps to get there.
        for _ in 0..10 {
            event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut state);
            if state.window.is_some() || state.create_error.is_some() {
                break;
            }
        }
        if let Some(e) = state.create_error.take() {
            return Err(WindowError::display(format!(
                "failed to create native window: {}",
                e
            )));
        }
        let window = state
            .window
            .clone()
            .ok_or_else(|| WindowError::display("event loop never delivered a window"))?;

        window.set_cursor_visible(config.cursor_visible);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| WindowError::display(format!("failed to create surface: {}", e)))?;

        let context = GraphicsContext::with_instance(instance, &config, Some(&surface))?;
        let version = context.version();

        let inner = window.inner_size();
        let size = Size::new(inner.width.max(1), inner.height.max(1));

        let mut surface_config = surface
            .get_default_config(&context.adapter, size.width, size.height)
            .ok_or_else(|| WindowError::context("surface is incompatible with the adapter"))?;
        surface_config.present_mode = if config.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&context.device, &surface_config);

        let (_, depth_view) = create_depth_texture(&context.device, size.width, size.height, 1);
        let clear_pipeline = ClearPipeline::new(&context.device, surface_config.format, 1);

        tracing::info!(
            width = size.width,
            height = size.height,
            %version,
            "created winit window"
        );

        Ok(Self {
            config,
            size,
            version,
            event_loop: Some(event_loop),
            state,
            context: Some(context),
            surface: Some(surface),
            surface_config,
            depth_view: Some(depth_view),
            clear_pipeline: Some(clear_pipeline),
            frame: None,
            pending_resize: None,
            events: EventQueue::new(),
            mods: Mods::empty(),
            mouse_pos: Vec2::ZERO,
            focused: true,
            frames: 0,
            closing: false,
        })
    }

    /// Translate one raw winit event into the normalized queue.
    fn translate(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push(Event::CloseRequested),
            WindowEvent::Resized(size) => {
                // Deferred to the pump boundary; see pump_events().
                self.pending_resize = Some(Size::new(size.width, size.height));
            }
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                self.events.push(Event::Focused(focused));
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.mods = Mods::from_winit(modifiers.state());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = translate_key(event.physical_key);
                match event.state {
                    ElementState::Pressed => {
                        self.events.push(Event::KeyDown {
                            key,
                            mods: self.mods,
                        });
                        if let Some(text) = &event.text {
                            for ch in text.chars() {
                                self.events.push(Event::Char(ch));
                            }
                        }
                    }
                    ElementState::Released => {
                        self.events.push(Event::KeyUp {
                            key,
                            mods: self.mods,
                        });
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_pos = Vec2::new(position.x as f32, position.y as f32);
                self.events.push(Event::MouseMove(self.mouse_pos));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from_winit(button);
                let event = match state {
                    ElementState::Pressed => Event::MouseButtonDown {
                        button,
                        pos: self.mouse_pos,
                    },
                    ElementState::Released => Event::MouseButtonUp {
                        button,
                        pos: self.mouse_pos,
                    },
                };
                self.events.push(event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y) * LINE_SCROLL_DELTA,
                    MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x as f32, pos.y as f32),
                };
                self.events.push(Event::MouseScroll(delta));
            }
            WindowEvent::Ime(winit::event::Ime::Commit(text)) => {
                self.events.push(Event::TextInput(text));
            }
            WindowEvent::DroppedFile(path) => {
                self.events.push(Event::FileDrop(path));
            }
            WindowEvent::CursorEntered { .. }
            | WindowEvent::CursorLeft { .. }
            | WindowEvent::Moved(_)
            | WindowEvent::ScaleFactorChanged { .. }
            | WindowEvent::Ime(_)
            | WindowEvent::Destroyed
            | WindowEvent::Occluded(_) => {}
            other => {
                tracing::debug!(event = ?other, "ignoring native window event");
            }
        }
    }

    /// Get (or re-acquire) the swapchain image for the current frame.
    fn acquire_frame(&mut self) -> Option<&AcquiredFrame> {
        if self.frame.is_some() {
            return self.frame.as_ref();
        }
        let (context, surface) = (self.context.as_ref()?, self.surface.as_ref()?);

        let texture = match surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                surface.configure(&context.device, &self.surface_config);
                surface.get_current_texture().ok()?
            }
            Err(e) => {
                tracing::error!("failed to acquire surface texture: {}", e);
                return None;
            }
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(AcquiredFrame { texture, view });
        self.frame.as_ref()
    }
}

impl Window for WinitWindow {
    fn backend_name(&self) -> &'static str {
        "winit"
    }

    fn config(&self) -> &WindowConfig {
        &self.config
    }

    fn size(&self) -> Size<u32> {
        self.size
    }

    fn gl_version(&self) -> GlVersion {
        self.version
    }

    fn frames(&self) -> u64 {
        self.frames
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn bind(&mut self) {
        if self.context.is_none() {
            tracing::error!("bind() called on a destroyed window");
        }
        // The default framebuffer is the only target this layer exposes.
    }

    fn clear(&mut self, color: Color, depth: f32, viewport: Option<Rect<u32>>) {
        if self.context.is_none() {
            tracing::error!("clear() called on a destroyed window");
            return;
        }
        if self.acquire_frame().is_none() {
            return;
        }

        // Split borrows: acquire_frame() populated self.frame above.
        let (Some(context), Some(clear_pipeline), Some(depth_view), Some(frame)) = (
            &self.context,
            &self.clear_pipeline,
            &self.depth_view,
            &self.frame,
        ) else {
            return;
        };

        clear_target(
            context,
            &ClearTarget {
                view: &frame.view,
                resolve: None,
                depth: Some(depth_view),
                width: self.size.width,
                height: self.size.height,
            },
            clear_pipeline,
            color,
            depth,
            viewport,
        );
    }

    fn swap_buffers(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.texture.present();
        }
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(context) = &self.context else {
            tracing::error!("resize() called on a destroyed window");
            return;
        };
        if width == 0 || height == 0 {
            // Minimized; keep the old framebuffer until a real size arrives.
            tracing::debug!("ignoring resize to zero area");
            return;
        }

        self.size = Size::new(width, height);
        self.surface_config.width = width;
        self.surface_config.height = height;
        if let Some(surface) = &self.surface {
            surface.configure(&context.device, &self.surface_config);
        }
        let (_, depth_view) = create_depth_texture(&context.device, width, height, 1);
        self.depth_view = Some(depth_view);
        // Any acquired image has stale dimensions.
        self.frame = None;

        self.events.push(Event::Resized(self.size));
        tracing::debug!(width, height, "resized default framebuffer");
    }

    fn pump_events(&mut self) -> EventBatch {
        if let Some(event_loop) = &mut self.event_loop {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state);
            if matches!(status, PumpStatus::Exit(_)) {
                self.closing = true;
            }
        }

        let raw: Vec<WindowEvent> = self.state.raw.drain(..).collect();
        for event in raw {
            self.translate(event);
        }

        // Apply a deferred native resize at the loop boundary, before the
        // batch is handed to the consumer.
        if let Some(size) = self.pending_resize.take() {
            if size != self.size {
                self.resize(size.width, size.height);
            }
        }

        self.events.drain()
    }

    fn should_close(&self) -> bool {
        self.closing
    }

    fn close(&mut self) {
        self.closing = true;
    }

    fn destroy(&mut self) {
        if self.context.is_none() {
            return;
        }
        self.closing = true;
        self.frame = None;
        self.clear_pipeline = None;
        self.depth_view = None;
        self.surface = None;
        self.context = None;
        self.state.window = None;
        self.event_loop = None;
        tracing::debug!("destroyed winit window");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_multisampled_configs_at_creation() {
        // Fails before any event loop or display is touched, unlike the
        // headless backend which honors the sample count.
        let result = WinitWindow::new(WindowConfig {
            samples: 4,
            ..Default::default()
        });
        assert!(matches!(result, Err(WindowError::ContextCreation(_))));
    }
}
