//! Integration tests: a whole page driven through the frame loop.
//!
//! The page is built in memory with the same ids and classes the live site
//! uses, then run with a manual clock so every timer is deterministic.

use std::cell::RefCell;
use std::rc::Rc;

use glowfield::canvas::Shape;
use glowfield::prelude::*;

type TestSite = Site<MemorySurface, MemoryGlow, MemoryElement>;

const FRAME: Duration = Duration::from_micros(16_667);

struct Page {
    doc: MemoryDocument,
    typing: MemoryElement,
    navbar: MemoryElement,
    hamburger: MemoryElement,
    nav_links: MemoryElement,
    team_link: MemoryElement,
    back_to_top: MemoryElement,
    filter_2024: MemoryElement,
    rows: Vec<MemoryElement>,
    cards: Vec<MemoryElement>,
    stat: MemoryElement,
    footer_year: MemoryElement,
}

fn page() -> Page {
    let doc = MemoryDocument::new();

    let typing = MemoryElement::new("span").with_id("typingText");
    let hamburger = MemoryElement::new("button").with_id("hamburger");
    let team_link = MemoryElement::new("a")
        .with_class("nav-link")
        .with_attr("href", "#team");
    let nav_links = MemoryElement::new("ul")
        .with_id("navLinks")
        .with_child(
            MemoryElement::new("li").with_child(
                MemoryElement::new("a")
                    .with_class("nav-link")
                    .with_attr("href", "#about"),
            ),
        )
        .with_child(MemoryElement::new("li").with_child(team_link.clone()));
    let navbar = MemoryElement::new("nav")
        .with_id("navbar")
        .with_child(hamburger.clone())
        .with_child(nav_links.clone());
    doc.append(navbar.clone());

    doc.append(
        MemoryElement::new("section")
            .with_id("hero")
            .with_child(MemoryElement::new("h1").with_child(typing.clone())),
    );

    let stat = MemoryElement::new("span").with_class("stat-num").with_text("25+");
    doc.append(
        MemoryElement::new("section")
            .with_id("about")
            .with_offset_top(700.0)
            .with_child(MemoryElement::new("div").with_class("about-text"))
            .with_child(stat.clone()),
    );

    let cards: Vec<MemoryElement> = (0..3)
        .map(|_| MemoryElement::new("div").with_class("member-card"))
        .collect();
    let mut team = MemoryElement::new("section")
        .with_id("team")
        .with_offset_top(1500.0);
    for card in &cards {
        team = team.with_child(card.clone());
    }
    doc.append(team);

    let filter_all = MemoryElement::new("button")
        .with_class("filter-btn active")
        .with_attr("data-filter", "all");
    let filter_2024 = MemoryElement::new("button")
        .with_class("filter-btn")
        .with_attr("data-filter", "2024");
    let rows: Vec<MemoryElement> = ["2024", "2025"]
        .iter()
        .map(|y| MemoryElement::new("tr").with_attr("data-year", y))
        .collect();
    let mut tbody = MemoryElement::new("tbody");
    for row in &rows {
        tbody = tbody.with_child(row.clone());
    }
    doc.append(
        MemoryElement::new("section")
            .with_id("competitions")
            .with_offset_top(2400.0)
            .with_child(
                MemoryElement::new("div")
                    .with_class("filter-bar")
                    .with_child(filter_all)
                    .with_child(filter_2024.clone()),
            )
            .with_child(
                MemoryElement::new("div").with_class("table-wrap").with_child(
                    MemoryElement::new("table")
                        .with_class("comp-table")
                        .with_child(tbody),
                ),
            ),
    );

    let back_to_top = MemoryElement::new("button").with_id("backToTop");
    let footer_year = MemoryElement::new("span").with_id("footerYear");
    doc.append(back_to_top.clone());
    doc.append(MemoryElement::new("footer").with_child(footer_year.clone()));

    Page {
        doc,
        typing,
        navbar,
        hamburger,
        nav_links,
        team_link,
        back_to_top,
        filter_2024,
        rows,
        cards,
        stat,
        footer_year,
    }
}

fn build(page: &Page, viewport: &MemoryViewport, now: Instant) -> TestSite {
    SiteBuilder::new(SiteConfig::default())
        .with_surface(MemorySurface::new(viewport.width() as f32, viewport.height() as f32))
        .with_glow(MemoryGlow::new())
        .with_seed(11)
        .attach(&page.doc, viewport, now)
}

#[test]
fn test_particle_count_follows_viewport_width() {
    let p = page();
    let now = Instant::now();

    let narrow = build(&p, &MemoryViewport::new(500.0, 900.0), now);
    assert_eq!(narrow.particles().unwrap().field().particles().len(), 40);

    let wide = build(&p, &MemoryViewport::new(1200.0, 800.0), now);
    assert_eq!(wide.particles().unwrap().field().particles().len(), 80);
}

#[test]
fn test_particles_stay_near_bounds() {
    let p = page();
    let viewport = MemoryViewport::new(800.0, 600.0);
    let start = Instant::now();
    let site = Rc::new(RefCell::new(build(&p, &viewport, start)));

    let mut frames = FrameLoop::new();
    frames.add(site.clone());
    frames.run(&mut ManualClock::new(start, FRAME).with_limit(600));

    let site = site.borrow();
    let field = site.particles().unwrap().field();
    let slack = field.config().max_step() + 1e-3;
    for particle in field.particles() {
        let pos = particle.position;
        assert!(pos.x >= -slack && pos.x <= 800.0 + slack, "x out of range: {}", pos.x);
        assert!(pos.y >= -slack && pos.y <= 600.0 + slack, "y out of range: {}", pos.y);
    }
}

#[test]
fn test_frame_draws_links_then_particles() {
    let p = page();
    let viewport = MemoryViewport::new(1200.0, 800.0);
    let start = Instant::now();
    let mut site = build(&p, &viewport, start);
    // Links are drawn from positions before this frame's step.
    let links = site.particles().unwrap().field().links().count();

    site.frame(&FrameContext {
        now: start + FRAME,
        delta: FRAME.as_secs_f32(),
        frame: 1,
    });

    let layer = site.particles().unwrap();
    let shapes = layer.surface().draw_list().shapes();
    let first_circle = shapes
        .iter()
        .position(|s| matches!(s, Shape::Circle { .. }))
        .unwrap();
    assert!(shapes[first_circle..]
        .iter()
        .all(|s| matches!(s, Shape::Circle { .. })));
    assert_eq!(shapes.len() - first_circle, 80);
    assert_eq!(first_circle, links);
}

#[test]
fn test_link_alpha_at_65px() {
    let mut field = ParticleField::with_seed(FieldConfig::default(), 1);
    field.rebuild(Vec2::new(400.0, 400.0), 1200.0);
    assert!((field.link_alpha(65.0).unwrap() - 0.06).abs() < 1e-6);
    assert_eq!(field.link_alpha(130.0), None);
}

#[test]
fn test_resize_burst_rebuilds_once() {
    let p = page();
    let viewport = MemoryViewport::new(1200.0, 800.0);
    let start = Instant::now();
    let site = Rc::new(RefCell::new(build(&p, &viewport, start)));

    let mut frames = FrameLoop::new();
    frames.add(site.clone());

    // Ten resize events 15ms apart, ending narrow.
    let mut now = start;
    for i in 0..10 {
        now = start + Duration::from_millis(15 * i);
        site.borrow_mut().on_resize(now, 1200.0 - 70.0 * i as f32);
        frames.tick(now);
    }
    let last = now;
    assert_eq!(site.borrow().particles().unwrap().rebuilds(), 1);

    frames.tick(last + Duration::from_millis(199));
    assert_eq!(site.borrow().particles().unwrap().rebuilds(), 1);

    frames.tick(last + Duration::from_millis(200));
    frames.tick(last + Duration::from_millis(400));
    let site = site.borrow();
    let layer = site.particles().unwrap();
    assert_eq!(layer.rebuilds(), 2);
    // 1200 - 630 = 570 px is narrow.
    assert_eq!(layer.field().particles().len(), 40);
}

#[test]
fn test_cursor_follows_pointer() {
    let p = page();
    let viewport = MemoryViewport::new(1000.0, 800.0);
    let start = Instant::now();
    let site = Rc::new(RefCell::new(build(&p, &viewport, start)));
    let target = Vec2::new(100.0, 700.0);
    site.borrow_mut().on_pointer(PointerEvent::Move(target));

    let mut frames = FrameLoop::new();
    frames.add(site.clone());
    frames.run(&mut ManualClock::new(start, FRAME).with_limit(60));

    let site = site.borrow();
    let cursor = site.cursor().unwrap();
    assert!(cursor.cursor().position().distance(target) < 0.1);
    let css = cursor.glow().transform_css();
    assert!(css.starts_with("translate("));
    assert!(css.contains("translate(-50%, -50%)"));
}

#[test]
fn test_hover_feedback_lasts_one_frame() {
    let p = page();
    let viewport = MemoryViewport::new(1000.0, 800.0);
    let start = Instant::now();
    let mut site = build(&p, &viewport, start);
    let ctx = FrameContext {
        now: start + FRAME,
        delta: FRAME.as_secs_f32(),
        frame: 1,
    };

    site.frame(&ctx);
    site.on_pointer(PointerEvent::HoverEnter);
    assert!(site.cursor().unwrap().glow().transform_css().ends_with("scale(1.8)"));
    site.frame(&ctx);
    assert!(!site.cursor().unwrap().glow().transform_css().contains("scale(1.8)"));
}

#[test]
fn test_typing_runs_on_frame_clock() {
    let p = page();
    let viewport = MemoryViewport::new(1200.0, 800.0);
    let start = Instant::now();
    let site = Rc::new(RefCell::new(build(&p, &viewport, start)));

    let mut frames = FrameLoop::new();
    frames.add(site.clone());

    // Just under a second: nothing typed yet.
    frames.run(&mut ManualClock::new(start, FRAME).with_limit(59));
    assert_eq!(p.typing.text(), "");

    // Two more seconds: 1 char at 1000ms, then one every 80ms.
    frames.run(&mut ManualClock::new(start + FRAME * 59, FRAME).with_limit(120));
    let typed = p.typing.text();
    assert!(typed.starts_with("Capture"));
    assert!(typed.len() >= 20 && typed.len() <= 26, "typed {:?}", typed);
}

#[test]
fn test_scroll_updates_navbar() {
    let p = page();
    let viewport = MemoryViewport::new(1200.0, 800.0);
    let site = build(&p, &viewport, Instant::now());
    assert!(!p.navbar.has_class("scrolled"));

    site.on_scroll(1450.0);
    assert!(p.navbar.has_class("scrolled"));
    assert!(p.team_link.has_class("active"));
    assert!(p.back_to_top.has_class("visible"));
}

#[test]
fn test_clicks() {
    let p = page();
    let viewport = MemoryViewport::new(400.0, 800.0);
    viewport.set_scroll_y(3000.0);
    let mut site = build(&p, &viewport, Instant::now());

    site.on_click(&p.hamburger, &viewport);
    assert!(p.nav_links.has_class("open"));
    assert_eq!(p.hamburger.attribute("aria-expanded").as_deref(), Some("true"));

    site.on_click(&p.team_link, &viewport);
    assert!(!p.nav_links.has_class("open"));

    site.on_click(&p.filter_2024, &viewport);
    assert!(p.filter_2024.has_class("active"));
    assert_eq!(p.rows[1].style("display").as_deref(), Some("none"));
    assert_eq!(p.rows[0].style("opacity").as_deref(), Some("0"));

    site.on_click(&p.back_to_top, &viewport);
    assert_eq!(viewport.scroll_requests(), 1);
    assert_eq!(viewport.scroll_y(), 0.0);
}

#[test]
fn test_reveal_and_counter() {
    let p = page();
    let viewport = MemoryViewport::new(1200.0, 800.0);
    let start = Instant::now();
    let site = Rc::new(RefCell::new(build(&p, &viewport, start)));

    assert!(p.cards[0].has_class("reveal"));
    assert!(p.cards[2].has_class("reveal-delay-2"));

    site.borrow_mut().on_intersection(&p.cards[1], 0.3, start);
    assert!(p.cards[1].has_class("visible"));
    assert!(!p.cards[0].has_class("visible"));

    site.borrow_mut().on_intersection(&p.stat, 1.0, start);
    let mut frames = FrameLoop::new();
    frames.add(site.clone());
    // 25 in steps of 1, every 35ms: done within a second.
    frames.run(&mut ManualClock::new(start, FRAME).with_limit(60));
    assert_eq!(p.stat.text(), "25+");
    assert_eq!(site.borrow().counters().running(), 0);
}

#[test]
fn test_footer_year_written_at_attach() {
    let p = page();
    let _site = build(&p, &MemoryViewport::new(1200.0, 800.0), Instant::now());
    let year: i32 = p.footer_year.text().parse().unwrap();
    assert!(year >= 2024);
}

#[test]
fn test_config_overrides() {
    let config = SiteConfig::from_json(
        r#"{ "field": { "wide_count": 12 }, "typing": { "phrases": ["hi"] } }"#,
    )
    .unwrap();
    let p = page();
    let viewport = MemoryViewport::new(1200.0, 800.0);
    let start = Instant::now();
    let mut site: TestSite = SiteBuilder::new(config)
        .with_surface(MemorySurface::new(1200.0, 800.0))
        .attach(&p.doc, &viewport, start);

    assert_eq!(site.particles().unwrap().field().particles().len(), 12);
    assert!(site.cursor().is_none());

    site.frame(&FrameContext {
        now: start + Duration::from_millis(1000),
        delta: 1.0,
        frame: 1,
    });
    assert_eq!(p.typing.text(), "h");
}

#[test]
fn test_cancel_stops_frames() {
    let p = page();
    let viewport = MemoryViewport::new(1200.0, 800.0);
    let start = Instant::now();
    let site = build(&p, &viewport, start);

    let mut frames = FrameLoop::new();
    frames.add(site);
    let token = frames.token();
    assert!(frames.tick(start + FRAME));
    token.cancel();
    assert!(!frames.tick(start + FRAME * 2));
    assert_eq!(frames.run(&mut ManualClock::new(start, FRAME)), 0);
}
