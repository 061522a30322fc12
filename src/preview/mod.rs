//! Native preview window.
//!
//! Runs the particle layer and the cursor glow outside the browser: the
//! layers draw into a [`MemorySurface`] and a [`MemoryGlow`] exactly as
//! they would on the page, and every frame the recorded shapes are
//! tessellated and drawn with wgpu. There is no document, so the DOM page
//! modules stay idle; optional hotspots stand in for links to exercise the
//! glow's hover state.
//!
//! # Example
//!
//! ```ignore
//! use glowfield::preview::{run, PreviewOptions};
//!
//! run(PreviewOptions::default())?;
//! ```

mod gpu;
pub mod mesh;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;
use web_time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::canvas::MemorySurface;
use crate::color::Rgba;
use crate::config::SiteConfig;
use crate::dom::{MemoryDocument, MemoryElement, MemoryViewport};
use crate::error::PreviewError;
use crate::input::{PointerTracker, Rect};
use crate::scheduler::{FrameLoop, ManualClock};
use crate::site::{Site, SiteBuilder};
use crate::style::{GlowFill, MemoryGlow};

pub use gpu::Renderer;
pub use mesh::{Mesh, Vertex};

/// The site as the preview hosts it.
pub type PreviewSite = Site<MemorySurface, MemoryGlow, MemoryElement>;

/// Frames between window title refreshes.
const TITLE_EVERY: u64 = 30;

/// Preview settings, usually filled in from the command line.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub config: SiteConfig,
    /// Initial window size in logical px.
    pub width: u32,
    pub height: u32,
    pub seed: Option<u64>,
    /// Draw a row of hover targets.
    pub hotspots: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            config: SiteConfig::default(),
            width: 1280,
            height: 720,
            seed: None,
            hotspots: false,
        }
    }
}

/// Build a site with an in-memory canvas and glow for a page of `size`.
pub fn build_site(options: &PreviewOptions, size: Vec2, now: Instant) -> PreviewSite {
    let viewport = MemoryViewport::new(size.x as f64, size.y as f64);
    let mut builder = SiteBuilder::new(options.config.clone())
        .with_surface(MemorySurface::new(size.x, size.y))
        .with_glow(MemoryGlow::new());
    if let Some(seed) = options.seed {
        builder = builder.with_seed(seed);
    }
    builder.attach(&MemoryDocument::new(), &viewport, now)
}

/// A row of link-sized targets along the top of the page, like a navbar.
pub fn demo_hotspots() -> Vec<Rect> {
    (0..4)
        .map(|i| Rect::new(24.0 + i as f32 * 124.0, 20.0, 100.0, 32.0))
        .collect()
}

/// Tessellate the current state of `site` into `mesh`.
pub fn build_mesh(site: &PreviewSite, hotspots: &[Rect], mesh: &mut Mesh) {
    mesh.clear();
    for rect in hotspots {
        mesh.push_rect(rect, Rgba::rgb(61, 155, 255).with_alpha(0.08));
    }
    if let Some(particles) = site.particles() {
        mesh.push_draw_list(particles.surface().draw_list());
    }
    if let Some(cursor) = site.cursor() {
        let config = cursor.cursor().config();
        let glow = cursor.glow();
        let fill = glow
            .background
            .unwrap_or_else(|| GlowFill::new(config.default_color));
        mesh.push_glow(&glow.transform, config.diameter, &fill);
    }
}

/// What a headless run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub frames: u64,
    pub particles: usize,
    pub links: usize,
    pub vertices: usize,
}

/// Run `frames` frames at 60 fps simulated time without opening a window.
pub fn run_headless(options: &PreviewOptions, frames: u64) -> HeadlessReport {
    let size = Vec2::new(options.width as f32, options.height as f32);
    let start = Instant::now();
    let site = Rc::new(RefCell::new(build_site(options, size, start)));

    let mut frame_loop = FrameLoop::new();
    frame_loop.add(site.clone());
    let mut clock = ManualClock::new(start, Duration::from_micros(16_667)).with_limit(frames);
    let ran = frame_loop.run(&mut clock);

    let site = site.borrow();
    let hotspots = if options.hotspots {
        demo_hotspots()
    } else {
        Vec::new()
    };
    let mut mesh = Mesh::new(size);
    build_mesh(&site, &hotspots, &mut mesh);

    let (particles, links) = site
        .particles()
        .map(|p| (p.field().particles().len(), p.field().links().count()))
        .unwrap_or((0, 0));
    HeadlessReport {
        frames: ran,
        particles,
        links,
        vertices: mesh.vertices().len(),
    }
}

/// Open the preview window. Blocks until it is closed.
pub fn run(options: PreviewOptions) -> Result<(), PreviewError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    options: PreviewOptions,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    site: Option<Rc<RefCell<PreviewSite>>>,
    frames: FrameLoop<'static>,
    tracker: PointerTracker,
    mesh: Mesh,
    error: Option<PreviewError>,
}

impl App {
    fn new(options: PreviewOptions) -> Self {
        let hotspots = if options.hotspots {
            demo_hotspots()
        } else {
            Vec::new()
        };
        let size = Vec2::new(options.width as f32, options.height as f32);
        Self {
            options,
            window: None,
            renderer: None,
            site: None,
            frames: FrameLoop::new(),
            tracker: PointerTracker::new(hotspots),
            mesh: Mesh::new(size),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PreviewError> {
        let window_attrs = Window::default_attributes()
            .with_title("glowfield preview")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.width,
                self.options.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let renderer = pollster::block_on(Renderer::new(window.clone()))?;

        let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
        let size = Vec2::new(logical.width, logical.height);
        let site = Rc::new(RefCell::new(build_site(&self.options, size, Instant::now())));
        self.frames.add(site.clone());
        self.mesh.set_viewport(size);

        log::info!("preview window open at {}x{} (logical px)", size.x, size.y);
        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.site = Some(site);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.frames.tick(Instant::now());

        let (Some(site), Some(renderer)) = (&self.site, &mut self.renderer) else {
            return;
        };
        build_mesh(&site.borrow(), self.tracker.hotspots(), &mut self.mesh);

        match renderer.render(self.mesh.vertices()) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory; closing preview");
                event_loop.exit();
            }
            Err(e) => log::warn!("render error: {:?}", e),
        }

        if let Some(window) = &self.window {
            let time = self.frames.time();
            if time.frame() % TITLE_EVERY == 0 {
                window.set_title(&format!("glowfield preview - {:.0} fps", time.fps()));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let scale_factor = self
            .window
            .as_ref()
            .map(|w| w.scale_factor())
            .unwrap_or(1.0);

        if let Some(site) = &self.site {
            for pointer in self.tracker.handle_window_event(&event, scale_factor) {
                site.borrow_mut().on_pointer(pointer);
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.frames.token().cancel();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.frames.token().cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
                let logical = physical_size.to_logical::<f32>(scale_factor);
                let size = Vec2::new(logical.width, logical.height);
                self.mesh.set_viewport(size);
                if let Some(site) = &self.site {
                    let mut site = site.borrow_mut();
                    if let Some(particles) = site.particles_mut() {
                        particles.surface_mut().set_display_size(size.x, size.y);
                    }
                    site.on_resize(Instant::now(), size.x);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_run() {
        let options = PreviewOptions {
            seed: Some(3),
            ..Default::default()
        };
        let report = run_headless(&options, 30);
        assert_eq!(report.frames, 30);
        assert_eq!(report.particles, 80);
        assert!(report.vertices > 0);
    }

    #[test]
    fn test_headless_narrow_window() {
        let options = PreviewOptions {
            width: 480,
            height: 800,
            seed: Some(3),
            ..Default::default()
        };
        assert_eq!(run_headless(&options, 1).particles, 40);
    }

    #[test]
    fn test_mesh_includes_hotspots_and_glow() {
        let options = PreviewOptions::default();
        let size = Vec2::new(1280.0, 720.0);
        let site = build_site(&options, size, Instant::now());
        let mut mesh = Mesh::new(size);

        build_mesh(&site, &demo_hotspots(), &mut mesh);
        let with_hotspots = mesh.vertices().len();
        build_mesh(&site, &[], &mut mesh);
        assert_eq!(with_hotspots - mesh.vertices().len(), 4 * 6);
    }
}
