//! Navbar scroll state and active-section highlighting.

use crate::config::NavConfig;
use crate::dom::{Document, Element};

/// Scroll-driven classes on the navbar, its links and the back-to-top button.
pub struct Navbar<E: Element> {
    navbar: Option<E>,
    links: Vec<E>,
    sections: Vec<E>,
    back_to_top: Option<E>,
    config: NavConfig,
}

impl<E: Element> Navbar<E> {
    /// Look up `#navbar`, `.nav-link`, `section[id]` and `#backToTop`.
    ///
    /// Whatever is missing is simply skipped on scroll.
    pub fn attach<D>(doc: &D, config: NavConfig) -> Self
    where
        D: Document<Element = E>,
    {
        Self {
            navbar: doc.element_by_id("navbar"),
            links: doc.query_all(".nav-link"),
            sections: doc.query_all("section[id]"),
            back_to_top: doc.element_by_id("backToTop"),
            config,
        }
    }

    /// Id of the last section whose top (less the offset) is above `scroll_y`.
    pub fn current_section(&self, scroll_y: f64) -> Option<String> {
        self.sections
            .iter()
            .filter(|s| scroll_y >= s.offset_top() - self.config.section_offset)
            .last()
            .and_then(|s| s.id())
    }

    /// Update every scroll-dependent class. Also run once at load.
    pub fn on_scroll(&self, scroll_y: f64) {
        if let Some(navbar) = &self.navbar {
            navbar.toggle_class("scrolled", scroll_y > self.config.scrolled_after);
        }

        let current = self.current_section(scroll_y).unwrap_or_default();
        for link in &self.links {
            // A link with no href is never active.
            let active = link
                .attribute("href")
                .is_some_and(|href| href.get(1..).unwrap_or("") == current);
            link.toggle_class("active", active);
        }

        if let Some(button) = &self.back_to_top {
            button.toggle_class("visible", scroll_y > self.config.back_to_top_after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, MemoryElement};

    fn page() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.append(
            MemoryElement::new("nav")
                .with_id("navbar")
                .with_child(
                    MemoryElement::new("a")
                        .with_class("nav-link")
                        .with_attr("href", "#about"),
                )
                .with_child(
                    MemoryElement::new("a")
                        .with_class("nav-link")
                        .with_attr("href", "#team"),
                ),
        );
        doc.append(MemoryElement::new("section").with_id("about").with_offset_top(100.0));
        doc.append(MemoryElement::new("section").with_id("team").with_offset_top(900.0));
        doc.append(MemoryElement::new("button").with_id("backToTop"));
        doc
    }

    fn link(doc: &MemoryDocument, href: &str) -> MemoryElement {
        doc.query_all(&format!("a[href=\"{}\"]", href))
            .pop()
            .unwrap()
    }

    #[test]
    fn test_top_of_page() {
        let doc = page();
        let nav = Navbar::attach(&doc, NavConfig::default());
        nav.on_scroll(0.0);

        let navbar = doc.element_by_id("navbar").unwrap();
        assert!(!navbar.has_class("scrolled"));
        assert!(!link(&doc, "#about").has_class("active"));
        assert!(!doc.element_by_id("backToTop").unwrap().has_class("visible"));
    }

    #[test]
    fn test_scrolled_thresholds() {
        let doc = page();
        let nav = Navbar::attach(&doc, NavConfig::default());
        let navbar = doc.element_by_id("navbar").unwrap();
        let button = doc.element_by_id("backToTop").unwrap();

        nav.on_scroll(40.0);
        assert!(!navbar.has_class("scrolled"));
        nav.on_scroll(41.0);
        assert!(navbar.has_class("scrolled"));

        nav.on_scroll(300.0);
        assert!(!button.has_class("visible"));
        nav.on_scroll(301.0);
        assert!(button.has_class("visible"));
    }

    #[test]
    fn test_active_section_uses_offset() {
        let doc = page();
        let nav = Navbar::attach(&doc, NavConfig::default());

        assert_eq!(nav.current_section(9.0), None);
        assert_eq!(nav.current_section(10.0).as_deref(), Some("about"));
        assert_eq!(nav.current_section(809.0).as_deref(), Some("about"));
        assert_eq!(nav.current_section(810.0).as_deref(), Some("team"));

        nav.on_scroll(850.0);
        assert!(!link(&doc, "#about").has_class("active"));
        assert!(link(&doc, "#team").has_class("active"));
    }

    #[test]
    fn test_missing_elements_are_skipped() {
        let doc = MemoryDocument::new();
        let nav = Navbar::attach(&doc, NavConfig::default());
        nav.on_scroll(1000.0);
        assert_eq!(nav.current_section(1000.0), None);
    }
}
