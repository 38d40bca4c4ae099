//! Offscreen backend: a context and framebuffer with no display attached.
//!
//! Meant for deterministic batch rendering, tests and CI. Creation succeeds
//! whenever a GPU driver is present, independent of any display server.
//! Input events are never produced; this is a documented limitation, not a
//! bug. `swap_buffers` only advances the frame counter.

use casement_core::geometry::{Rect, Size};

use crate::config::{GlVersion, WindowConfig};
use crate::context::GraphicsContext;
use crate::error::WindowError;
use crate::events::{Event, EventBatch, EventQueue};
use crate::readback::{Readback, ReadbackError};
use crate::target::{ClearPipeline, ClearTarget, Color, Framebuffer, clear_target};
use crate::window::Window;

pub struct HeadlessWindow {
    config: WindowConfig,
    size: Size<u32>,
    version: GlVersion,
    context: Option<GraphicsContext>,
    framebuffer: Option<Framebuffer>,
    clear_pipeline: Option<ClearPipeline>,
    events: EventQueue,
    frames: u64,
    closing: bool,
}

impl HeadlessWindow {
    pub fn new(config: WindowConfig) -> Result<Self, WindowError> {
        config.validate()?;

        // Headless contexts have no real vsync, cursor or user resizing;
        // force the flags off so config() reflects reality.
        let config = WindowConfig {
            vsync: false,
            resizable: false,
            cursor_visible: false,
            fullscreen: false,
            ..config
        };

        let context = GraphicsContext::new(&config, None)?;
        let framebuffer = Framebuffer::builder(config.size.width, config.size.height)
            .sample_count(config.sample_count())
            .build(&context);
        let clear_pipeline = ClearPipeline::new(
            &context.device,
            crate::target::COLOR_FORMAT,
            config.sample_count(),
        );
        let version = context.version();

        tracing::info!(
            width = config.size.width,
            height = config.size.height,
            %version,
            "created headless window"
        );

        Ok(Self {
            size: config.size,
            config,
            version,
            context: Some(context),
            framebuffer: Some(framebuffer),
            clear_pipeline: Some(clear_pipeline),
            events: EventQueue::new(),
            frames: 0,
            closing: false,
        })
    }

    /// The graphics context, while the window is alive.
    pub fn context(&self) -> Option<&GraphicsContext> {
        self.context.as_ref()
    }

    /// The default framebuffer, while the window is alive.
    pub fn framebuffer(&self) -> Option<&Framebuffer> {
        self.framebuffer.as_ref()
    }

    /// Read the color attachment back as tightly packed RGBA bytes.
    pub fn read_pixels(&self) -> Result<Vec<u8>, ReadbackError> {
        let (context, framebuffer) = match (&self.context, &self.framebuffer) {
            (Some(context), Some(framebuffer)) => (context, framebuffer),
            _ => return Err(ReadbackError::InvalidDimensions),
        };
        Readback::from_texture(context, framebuffer.color_texture())?.read(context)
    }
}

impl Window for HeadlessWindow {
    fn backend_name(&self) -> &'static str {
        "headless"
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
        // No display, no focus to lose.
        false
    }

    fn bind(&mut self) {
        if self.framebuffer.is_none() {
            tracing::error!("bind() called on a destroyed headless window");
        }
        // The default framebuffer is the only target; nothing to rebind.
    }

    fn clear(&mut self, color: Color, depth: f32, viewport: Option<Rect<u32>>) {
        let (Some(context), Some(framebuffer), Some(clear_pipeline)) =
            (&self.context, &self.framebuffer, &self.clear_pipeline)
        else {
            tracing::error!("clear() called on a destroyed headless window");
            return;
        };

        clear_target(
            context,
            &ClearTarget {
                view: framebuffer.render_view(),
                resolve: framebuffer.resolve_target(),
                depth: Some(framebuffer.depth_view()),
                width: framebuffer.width(),
                height: framebuffer.height(),
            },
            clear_pipeline,
            color,
            depth,
            viewport,
        );
    }

    fn swap_buffers(&mut self) {
        // No swap chain offscreen; counting frames is the whole effect.
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(context) = &self.context else {
            tracing::error!("resize() called on a destroyed headless window");
            return;
        };
        if width == 0 || height == 0 {
            tracing::warn!(width, height, "ignoring resize to zero area");
            return;
        }

        self.size = Size::new(width, height);
        self.framebuffer = Some(
            Framebuffer::builder(width, height)
                .sample_count(self.config.sample_count())
                .build(context),
        );
        self.events.push(Event::Resized(self.size));
    }

    fn pump_events(&mut self) -> EventBatch {
        // Only resize() feeds this queue; there is no input source.
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
        self.clear_pipeline = None;
        self.framebuffer = None;
        self.context = None;
        tracing::debug!("destroyed headless window");
    }
}
