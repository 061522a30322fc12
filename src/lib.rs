//! # glowfield
//!
//! The animated background and page behaviour of the dp!h3r0x CTF site.
//!
//! Two layers animate every frame:
//!
//! - a **particle field**: drifting dots on a canvas, bouncing off its
//!   edges, with faint links drawn between any two closer than a fixed
//!   distance ([`field`]);
//! - a **cursor glow**: a soft marker that eases after the pointer and
//!   stretches with its speed ([`cursor`]).
//!
//! Around them sit the smaller page modules ([`page`]): the typed headline,
//! navbar state, mobile menu, scroll reveal, competition filter, footer year
//! and stat counters.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glowfield::prelude::*;
//!
//! let site = SiteBuilder::new(SiteConfig::default())
//!     .with_surface(MemorySurface::new(1280.0, 720.0))
//!     .with_glow(MemoryGlow::new())
//!     .attach(&MemoryDocument::new(), &MemoryViewport::new(1280.0, 720.0), Instant::now());
//!
//! let mut frames = FrameLoop::new();
//! frames.add(site);
//! frames.run(&mut ManualClock::new(Instant::now(), Duration::from_millis(16)).with_limit(60));
//! ```
//!
//! ## Hosts
//!
//! Everything above is written against small host traits:
//!
//! | Concern | Trait | In-memory | Browser (`wasm32`) |
//! |---------|-------|-----------|--------------------|
//! | Canvas | [`canvas::RenderSurface`] | [`canvas::MemorySurface`] | `web::CanvasSurface` |
//! | Glow element | [`style::GlowElement`] | [`style::MemoryGlow`] | `web::GlowStyle` |
//! | Page elements | [`dom::Document`] | [`dom::MemoryDocument`] | `web::WebDocument` |
//! | Window | [`dom::Viewport`] | [`dom::MemoryViewport`] | `web::WebViewport` |
//!
//! On native targets the `preview` module renders the in-memory hosts in a
//! winit window with wgpu.
//!
//! ## Timing
//!
//! There are no callbacks or threads. A [`scheduler::FrameLoop`] ticks every
//! [`scheduler::Animated`] component once per frame, and timers (resize
//! debounce, typing delays, counter intervals) are values polled with the
//! frame's timestamp.

pub mod canvas;
pub mod color;
pub mod config;
pub mod cursor;
pub mod dom;
pub mod error;
pub mod field;
pub mod input;
pub mod page;
pub mod particle;
pub mod scheduler;
pub mod site;
pub mod style;
pub mod time;

#[cfg(not(target_arch = "wasm32"))]
pub mod preview;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use color::Rgba;
pub use config::SiteConfig;
pub use cursor::{CursorGlow, CursorLayer};
pub use field::{ParticleField, ParticleLayer};
pub use glam::Vec2;
pub use particle::Particle;
pub use site::{Site, SiteBuilder, Watch};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glowfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas2d, DrawList, MemorySurface, RenderSurface};
    pub use crate::color::Rgba;
    pub use crate::config::{
        CounterConfig, CursorConfig, FieldConfig, NavConfig, RevealConfig, SiteConfig,
        TypingConfig,
    };
    pub use crate::cursor::{CursorGlow, CursorLayer};
    pub use crate::dom::{
        Document, Element, MemoryDocument, MemoryElement, MemoryViewport, Viewport,
    };
    pub use crate::field::{ParticleField, ParticleLayer};
    pub use crate::input::{PointerEvent, PointerTracker, Rect};
    pub use crate::scheduler::{Animated, CancelToken, FrameContext, FrameLoop, ManualClock};
    pub use crate::site::{Site, SiteBuilder, Watch};
    pub use crate::style::{GlowElement, MemoryGlow};
    pub use crate::time::Time;
    pub use crate::Vec2;
    pub use web_time::{Duration, Instant};
}
