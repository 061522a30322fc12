//! Back-to-top button.
//!
//! Visibility is handled by [`Navbar`](super::navbar::Navbar) on scroll;
//! this only reacts to clicks.

use crate::dom::{Document, Element, Viewport};

pub struct BackToTop<E: Element> {
    button: E,
}

impl<E: Element> BackToTop<E> {
    /// Bind to `#backToTop`, if present.
    pub fn attach<D>(doc: &D) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        doc.element_by_id("backToTop").map(|button| Self { button })
    }

    pub fn button(&self) -> &E {
        &self.button
    }

    /// Scroll to the top if the click landed on the button.
    /// Returns whether it did.
    pub fn on_click<V: Viewport>(&self, target: &E, viewport: &V) -> bool {
        if self.button.contains(target) {
            viewport.scroll_to_top();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, MemoryElement, MemoryViewport};

    #[test]
    fn test_click_scrolls_to_top() {
        let doc = MemoryDocument::new();
        let button = MemoryElement::new("button").with_id("backToTop");
        let elsewhere = MemoryElement::new("p");
        doc.append(button.clone());
        doc.append(elsewhere.clone());

        let viewport = MemoryViewport::new(1200.0, 800.0);
        viewport.set_scroll_y(2400.0);
        let back = BackToTop::attach(&doc).unwrap();

        assert!(!back.on_click(&elsewhere, &viewport));
        assert_eq!(viewport.scroll_requests(), 0);

        assert!(back.on_click(&button, &viewport));
        assert_eq!(viewport.scroll_requests(), 1);
        assert_eq!(viewport.scroll_y(), 0.0);
    }

    #[test]
    fn test_missing_button() {
        assert!(BackToTop::attach(&MemoryDocument::new()).is_none());
    }
}
