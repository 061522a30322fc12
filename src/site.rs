//! Site builder and event dispatch.
//!
//! [`Site`] owns every layer and page module for one page. Hosts build it
//! once, hand it to a [`FrameLoop`](crate::scheduler::FrameLoop) (usually
//! behind an `Rc<RefCell<_>>` so event handlers can reach it too) and
//! forward their events to the `on_*` methods.
//!
//! # Example
//!
//! ```ignore
//! use glowfield::prelude::*;
//!
//! let site = SiteBuilder::new(SiteConfig::default())
//!     .with_surface(canvas)
//!     .with_glow(glow)
//!     .attach(&document, &viewport, Instant::now());
//!
//! let site = Rc::new(RefCell::new(site));
//! let mut frames = FrameLoop::new();
//! frames.add(site.clone());
//! ```

use glam::Vec2;
use web_time::Instant;

use crate::canvas::RenderSurface;
use crate::config::SiteConfig;
use crate::cursor::CursorLayer;
use crate::dom::{Document, Element, Viewport};
use crate::field::{ParticleField, ParticleLayer};
use crate::input::PointerEvent;
use crate::page::{
    set_footer_year, BackToTop, MobileMenu, Navbar, ScrollReveal, StatCounter, TypingEffect,
    YearFilter,
};
use crate::scheduler::{Animated, FrameContext};
use crate::style::GlowElement;

/// Collects the page's host handles, then attaches every module at once.
pub struct SiteBuilder<S, G> {
    config: SiteConfig,
    surface: Option<S>,
    glow: Option<G>,
    seed: Option<u64>,
}

impl<S: RenderSurface, G: GlowElement> SiteBuilder<S, G> {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            surface: None,
            glow: None,
            seed: None,
        }
    }

    /// The canvas behind the particle field.
    pub fn with_surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    /// The element the cursor glow is drawn with.
    pub fn with_glow(mut self, glow: G) -> Self {
        self.glow = Some(glow);
        self
    }

    /// Seed the particle field for reproducible layouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attach everything to `doc`. Missing elements disable their module,
    /// and so does an invalid config section (logged as a warning).
    ///
    /// Also runs the load-time work: the first navbar update and the
    /// footer year.
    pub fn attach<D, V>(self, doc: &D, viewport: &V, now: Instant) -> Site<S, G, D::Element>
    where
        D: Document,
        V: Viewport,
    {
        let config = self.config;
        let width = viewport.width() as f32;
        let size = Vec2::new(width, viewport.height() as f32);

        let surface = match config.field.validate() {
            Ok(()) => self.surface,
            Err(e) => {
                log::warn!("particle layer disabled: {}", e);
                None
            }
        };
        let field = match self.seed {
            Some(seed) => ParticleField::with_seed(config.field.clone(), seed),
            None => ParticleField::new(config.field.clone()),
        };
        let particles = ParticleLayer::attach_field(surface, width, field);

        let glow = match config.cursor.validate() {
            Ok(()) => self.glow,
            Err(e) => {
                log::warn!("cursor glow disabled: {}", e);
                None
            }
        };
        let cursor = CursorLayer::attach(glow, size, config.cursor.clone());

        let counter_config = match config.counter.validate() {
            Ok(()) => config.counter.clone(),
            Err(e) => {
                log::warn!("stat counters use default timing: {}", e);
                Default::default()
            }
        };

        let typing = TypingEffect::attach(doc.element_by_id("typingText"), config.typing.clone(), now);
        let navbar = Navbar::attach(doc, config.nav.clone());
        navbar.on_scroll(viewport.scroll_y());
        set_footer_year(doc);

        let site = Site {
            particles,
            cursor,
            typing,
            navbar,
            menu: MobileMenu::attach(doc),
            back_to_top: BackToTop::attach(doc),
            reveal: ScrollReveal::attach(doc, &config.reveal),
            filter: YearFilter::attach(doc),
            counters: StatCounter::attach(doc, counter_config),
        };
        log::info!(
            "site attached (particles: {}, cursor: {}, typing: {})",
            site.particles.is_some(),
            site.cursor.is_some(),
            site.typing.is_some()
        );
        site
    }
}

/// The two intersection observers a browser host runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    /// `.reveal` elements, at [`RevealConfig::threshold`](crate::config::RevealConfig::threshold).
    Reveal,
    /// `.stat-num` counters, at [`CounterConfig::threshold`](crate::config::CounterConfig::threshold).
    Counters,
}

/// Every layer and page module of one page.
pub struct Site<S: RenderSurface, G: GlowElement, E: Element> {
    particles: Option<ParticleLayer<S>>,
    cursor: Option<CursorLayer<G>>,
    typing: Option<TypingEffect<E>>,
    navbar: Navbar<E>,
    menu: Option<MobileMenu<E>>,
    back_to_top: Option<BackToTop<E>>,
    reveal: ScrollReveal<E>,
    filter: YearFilter<E>,
    counters: StatCounter<E>,
}

impl<S: RenderSurface, G: GlowElement, E: Element> Site<S, G, E> {
    pub fn particles(&self) -> Option<&ParticleLayer<S>> {
        self.particles.as_ref()
    }

    pub fn particles_mut(&mut self) -> Option<&mut ParticleLayer<S>> {
        self.particles.as_mut()
    }

    pub fn cursor(&self) -> Option<&CursorLayer<G>> {
        self.cursor.as_ref()
    }

    pub fn typing(&self) -> Option<&TypingEffect<E>> {
        self.typing.as_ref()
    }

    pub fn navbar(&self) -> &Navbar<E> {
        &self.navbar
    }

    pub fn menu(&self) -> Option<&MobileMenu<E>> {
        self.menu.as_ref()
    }

    pub fn reveal(&self) -> &ScrollReveal<E> {
        &self.reveal
    }

    pub fn filter(&self) -> &YearFilter<E> {
        &self.filter
    }

    pub fn counters(&self) -> &StatCounter<E> {
        &self.counters
    }

    /// Window resized to `viewport_width` CSS px.
    pub fn on_resize(&mut self, now: Instant, viewport_width: f32) {
        if let Some(particles) = &mut self.particles {
            particles.on_resize(now, viewport_width);
        }
    }

    pub fn on_pointer(&mut self, event: PointerEvent) {
        if let Some(cursor) = &mut self.cursor {
            cursor.handle(event);
        }
    }

    pub fn on_scroll(&self, scroll_y: f64) {
        self.navbar.on_scroll(scroll_y);
    }

    /// A click anywhere on the page, with `target` the element clicked.
    pub fn on_click<V: Viewport>(&mut self, target: &E, viewport: &V) {
        if let Some(menu) = &self.menu {
            menu.on_click(target);
        }
        if let Some(back) = &self.back_to_top {
            back.on_click(target, viewport);
        }
        self.filter.on_click(target);
    }

    /// An entry from one of the host's intersection observers.
    ///
    /// The observer was created with the module's threshold, so its
    /// `isIntersecting` flag is taken as-is.
    pub fn on_observer_entry(&mut self, watch: Watch, target: &E, intersecting: bool, now: Instant) {
        match watch {
            Watch::Reveal => {
                self.reveal.on_intersection(target, intersecting);
            }
            Watch::Counters => self.counters.on_intersection(target, intersecting, now),
        }
    }

    /// For hosts without observers: `ratio` is the visible fraction, and
    /// each module compares it with its own threshold.
    pub fn on_intersection(&mut self, target: &E, ratio: f64, now: Instant) {
        let visible = ratio > 0.0;
        let reveal = visible && ratio >= self.reveal.threshold();
        let count = visible && ratio >= self.counters.threshold();
        self.on_observer_entry(Watch::Reveal, target, reveal, now);
        self.on_observer_entry(Watch::Counters, target, count, now);
    }

    /// `true` while `target` still needs entries from `watch`'s observer.
    pub fn is_watching(&self, watch: Watch, target: &E) -> bool {
        match watch {
            Watch::Reveal => self.reveal.observed().contains(target),
            Watch::Counters => self.counters.waiting().any(|el| el == target),
        }
    }
}

impl<S: RenderSurface, G: GlowElement, E: Element> Animated for Site<S, G, E> {
    /// Particles first so the canvas is drawn before the glow moves over it.
    fn frame(&mut self, ctx: &FrameContext) {
        if let Some(particles) = &mut self.particles {
            particles.frame(ctx);
        }
        if let Some(cursor) = &mut self.cursor {
            cursor.frame(ctx);
        }
        if let Some(typing) = &mut self.typing {
            typing.frame(ctx);
        }
        self.filter.frame(ctx);
        self.counters.frame(ctx);
    }
}
