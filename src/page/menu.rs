//! Mobile hamburger menu.

use crate::dom::{Document, Element};

/// The hamburger button and the nav list it opens.
pub struct MobileMenu<E: Element> {
    button: E,
    nav: E,
    links: Vec<E>,
}

impl<E: Element> MobileMenu<E> {
    /// Bind to `#hamburger` and `#navLinks`. Returns `None` unless both exist.
    pub fn attach<D>(doc: &D) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let (Some(button), Some(nav)) = (doc.element_by_id("hamburger"), doc.element_by_id("navLinks"))
        else {
            log::debug!("no hamburger menu on this page");
            return None;
        };
        Some(Self {
            button,
            nav,
            links: doc.query_all(".nav-link"),
        })
    }

    pub fn is_open(&self) -> bool {
        self.nav.has_class("open")
    }

    /// Hamburger clicked. Returns the new open state.
    pub fn toggle(&self) -> bool {
        let open = !self.is_open();
        self.set_open(open);
        open
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    fn set_open(&self, open: bool) {
        self.nav.toggle_class("open", open);
        self.button.toggle_class("open", open);
        self.button
            .set_attribute("aria-expanded", if open { "true" } else { "false" });
    }

    /// Route a click on `target` the way the page's listeners would see it:
    /// the button toggles, a nav link closes, anything outside both closes.
    pub fn on_click(&self, target: &E) {
        if self.button.contains(target) {
            self.toggle();
            return;
        }
        if self.links.iter().any(|link| link.contains(target)) {
            self.close();
            return;
        }
        if !self.nav.contains(target) {
            self.close();
        }
    }
}
