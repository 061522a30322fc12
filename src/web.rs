//! Browser binding.
//!
//! Implements the host traits on top of `web-sys` and wires the page's
//! events into a [`Site`]. From JavaScript:
//!
//! ```ignore
//! import init, { mount } from "./pkg/glowfield.js";
//!
//! await init();
//! const site = mount();          // or mount(JSON.stringify(overrides))
//! // site.stop() ends the animation loop.
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, ScrollBehavior,
    ScrollToOptions,
};
use web_time::Instant;

use crate::canvas::{Canvas2d, RenderSurface};
use crate::color::Rgba;
use crate::config::SiteConfig;
use crate::dom::{self, Document as _, Viewport as _};
use crate::input::PointerEvent;
use crate::scheduler::{CancelToken, FrameLoop};
use crate::site::{Site, SiteBuilder, Watch};
use crate::style::{GlowElement, GlowFill, Transform, TransformOp, Transition};

type WebSite = Site<CanvasSurface, GlowStyle, web_sys::Element>;

impl Canvas2d for CanvasRenderingContext2d {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        CanvasRenderingContext2d::clear_rect(self, x as f64, y as f64, width as f64, height as f64);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        CanvasRenderingContext2d::move_to(self, x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        CanvasRenderingContext2d::line_to(self, x as f64, y as f64);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        // Only fails for a negative radius, which the field never produces.
        let _ = CanvasRenderingContext2d::arc(
            self,
            x as f64,
            y as f64,
            radius as f64,
            start_angle as f64,
            end_angle as f64,
        );
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.set_fill_style_str(&color.to_string());
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.set_stroke_style_str(&color.to_string());
    }

    fn set_line_width(&mut self, width: f32) {
        CanvasRenderingContext2d::set_line_width(self, width as f64);
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }
}

/// The particle `<canvas>` and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` unless `el` is a canvas with a 2D context.
    pub fn from_element(el: web_sys::Element) -> Option<Self> {
        let canvas = el.dyn_into::<HtmlCanvasElement>().ok()?;
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, context })
    }
}

impl RenderSurface for CanvasSurface {
    type Context = CanvasRenderingContext2d;

    fn display_size(&self) -> Vec2 {
        Vec2::new(
            self.canvas.offset_width() as f32,
            self.canvas.offset_height() as f32,
        )
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn context(&mut self) -> &mut CanvasRenderingContext2d {
        &mut self.context
    }
}

/// The cursor glow element, styled through its inline style.
pub struct GlowStyle(pub HtmlElement);

impl GlowStyle {
    fn set(&self, property: &str, value: &str) {
        let _ = self.0.style().set_property(property, value);
    }
}

impl GlowElement for GlowStyle {
    fn set_transform(&mut self, transform: &Transform) {
        self.set("transform", &transform.to_string());
    }

    fn append_transform(&mut self, op: TransformOp) {
        let current = self
            .0
            .style()
            .get_property_value("transform")
            .unwrap_or_default();
        self.set("transform", &format!("{} {}", current, op));
    }

    fn set_background(&mut self, fill: &GlowFill) {
        self.set("background", &fill.to_string());
    }

    fn set_transition(&mut self, transition: &Transition) {
        self.set("transition", &transition.to_string());
    }
}

impl dom::Element for web_sys::Element {
    fn add_class(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.class_list().remove_1(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = web_sys::Element::set_attribute(self, name, value);
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(el) = self.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        let _ = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
    }

    fn offset_top(&self) -> f64 {
        self.dyn_ref::<HtmlElement>()
            .map(|el| el.offset_top() as f64)
            .unwrap_or(0.0)
    }

    fn contains(&self, other: &Self) -> bool {
        web_sys::Node::contains(self, Some(other.as_ref()))
    }
}

/// The page's `document`.
pub struct WebDocument(pub web_sys::Document);

impl dom::Document for WebDocument {
    type Element = web_sys::Element;

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.0.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<web_sys::Element> {
        let Ok(list) = self.0.query_selector_all(selector) else {
            log::warn!("invalid selector: {}", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect()
    }
}

/// The page's `window`.
#[derive(Clone)]
pub struct WebViewport(pub web_sys::Window);

impl dom::Viewport for WebViewport {
    fn width(&self) -> f64 {
        self.0
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn height(&self) -> f64 {
        self.0
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        self.0.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.0.scroll_to_with_scroll_to_options(&options);
    }
}

/// Handle to a mounted site.
#[wasm_bindgen]
pub struct SiteHandle {
    token: CancelToken,
}

#[wasm_bindgen]
impl SiteHandle {
    /// Stop the animation loop. Event handlers stay attached.
    pub fn stop(&self) {
        self.token.cancel();
    }
}

/// Attach every module to the current page and start animating.
///
/// `config_json` may override any part of the default configuration.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<SiteHandle, JsValue> {
    console_error_panic_hook::set_once();

    let config = match config_json {
        Some(json) => SiteConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => SiteConfig::default(),
    };
    let window = web_sys::window().ok_or("no window")?;
    let document = WebDocument(window.document().ok_or("no document")?);
    let viewport = WebViewport(window.clone());

    let mut builder = SiteBuilder::new(config.clone());
    if let Some(surface) = document
        .element_by_id("particleCanvas")
        .and_then(CanvasSurface::from_element)
    {
        builder = builder.with_surface(surface);
    }
    if let Some(glow) = document
        .element_by_id("cursorGlow")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        builder = builder.with_glow(GlowStyle(glow));
    }
    let site: Rc<RefCell<WebSite>> =
        Rc::new(RefCell::new(builder.attach(&document, &viewport, Instant::now())));

    attach_listeners(&site, &document, &viewport, &config)?;
    let reveal: Vec<web_sys::Element> = site.borrow().reveal().observed().to_vec();
    let threshold = site.borrow().reveal().threshold();
    observe(&site, Watch::Reveal, &reveal, threshold)?;
    let counters: Vec<web_sys::Element> = site.borrow().counters().waiting().cloned().collect();
    let threshold = site.borrow().counters().threshold();
    observe(&site, Watch::Counters, &counters, threshold)?;

    let mut frames = FrameLoop::new();
    frames.add(site);
    let token = frames.token();
    start_animation(frames)?;
    Ok(SiteHandle { token })
}

fn listen<A>(target: &EventTarget, event: &str, handler: impl FnMut(A) + 'static) -> Result<(), JsValue>
where
    A: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(A)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Handlers live as long as the page.
    closure.forget();
    Ok(())
}

fn attach_listeners(
    site: &Rc<RefCell<WebSite>>,
    document: &WebDocument,
    viewport: &WebViewport,
    config: &SiteConfig,
) -> Result<(), JsValue> {
    let window: &EventTarget = viewport.0.as_ref();

    let (s, v) = (site.clone(), viewport.clone());
    listen(window, "resize", move |_: web_sys::Event| {
        s.borrow_mut().on_resize(Instant::now(), v.width() as f32);
    })?;

    let (s, v) = (site.clone(), viewport.clone());
    listen(window, "scroll", move |_: web_sys::Event| {
        s.borrow().on_scroll(v.scroll_y());
    })?;

    let s = site.clone();
    listen(window, "mousemove", move |e: MouseEvent| {
        let position = Vec2::new(e.client_x() as f32, e.client_y() as f32);
        s.borrow_mut().on_pointer(PointerEvent::Move(position));
    })?;

    let s = site.clone();
    listen(window, "mousedown", move |_: MouseEvent| {
        s.borrow_mut().on_pointer(PointerEvent::Down);
    })?;

    let s = site.clone();
    listen(window, "mouseup", move |_: MouseEvent| {
        s.borrow_mut().on_pointer(PointerEvent::Up);
    })?;

    for el in document.query_all(&config.cursor.interactive_selector) {
        let s = site.clone();
        listen(&el, "mouseenter", move |_: MouseEvent| {
            s.borrow_mut().on_pointer(PointerEvent::HoverEnter);
        })?;
        let s = site.clone();
        listen(&el, "mouseleave", move |_: MouseEvent| {
            s.borrow_mut().on_pointer(PointerEvent::HoverLeave);
        })?;
    }

    let (s, v) = (site.clone(), viewport.clone());
    listen(document.0.as_ref(), "click", move |e: web_sys::Event| {
        let Some(target) = e.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
            return;
        };
        s.borrow_mut().on_click(&target, &v);
    })?;

    Ok(())
}

/// Report intersections of `targets` to the site, at `threshold`.
fn observe(
    site: &Rc<RefCell<WebSite>>,
    watch: Watch,
    targets: &[web_sys::Element],
    threshold: f64,
) -> Result<(), JsValue> {
    if targets.is_empty() {
        return Ok(());
    }
    let s = site.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let now = Instant::now();
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let mut site = s.borrow_mut();
                site.on_observer_entry(watch, &target, entry.is_intersecting(), now);
                if !site.is_watching(watch, &target) {
                    observer.unobserve(&target);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    for target in targets {
        observer.observe(target);
    }
    Ok(())
}

/// Drive `frames` from `requestAnimationFrame` until its token is cancelled.
fn start_animation(mut frames: FrameLoop<'static>) -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();

    *callback.borrow_mut() = Some(Closure::new(move || {
        if !frames.tick(Instant::now()) {
            log::debug!("animation stopped");
            // Drop our own closure to end the chain.
            let _ = next.borrow_mut().take();
            return;
        }
        if let Some(closure) = next.borrow().as_ref() {
            let _ = request_animation_frame(closure);
        }
    }));

    let started = match callback.borrow().as_ref() {
        Some(closure) => request_animation_frame(closure).map(|_| ()),
        None => Ok(()),
    };
    started
}

fn request_animation_frame(closure: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or("no window")?
        .request_animation_frame(closure.as_ref().unchecked_ref())
}
