//! Competition table year filter.

use crate::dom::{Document, Element};
use crate::scheduler::{Animated, FrameContext};

/// Filter buttons over the competition table rows.
///
/// Rows that become visible start transparent and fade in from the next
/// animation frame on.
pub struct YearFilter<E: Element> {
    buttons: Vec<E>,
    rows: Vec<E>,
    fading: Vec<E>,
}

impl<E: Element> YearFilter<E> {
    pub fn attach<D>(doc: &D) -> Self
    where
        D: Document<Element = E>,
    {
        Self {
            buttons: doc.query_all(".filter-btn"),
            rows: doc.query_all(".comp-table tbody tr"),
            fading: Vec::new(),
        }
    }

    pub fn buttons(&self) -> &[E] {
        &self.buttons
    }

    /// Rows waiting for their fade to start.
    pub fn pending_fades(&self) -> usize {
        self.fading.len()
    }

    /// Activate `button` and show the rows it selects.
    pub fn select(&mut self, button: &E) {
        for b in &self.buttons {
            b.remove_class("active");
        }
        button.add_class("active");

        let filter = button.data("filter");
        for row in &self.rows {
            if filter.as_deref() == Some("all") || row.data("year") == filter {
                row.set_style("display", "");
                row.set_style("opacity", "0");
                row.set_style("transition", "opacity 0.3s ease");
                if !self.fading.contains(row) {
                    self.fading.push(row.clone());
                }
            } else {
                row.set_style("display", "none");
            }
        }
    }

    /// If the click landed on a filter button, select it. Returns whether it did.
    pub fn on_click(&mut self, target: &E) -> bool {
        let Some(button) = self.buttons.iter().find(|b| b.contains(target)).cloned() else {
            return false;
        };
        self.select(&button);
        true
    }
}

impl<E: Element> Animated for YearFilter<E> {
    fn frame(&mut self, _ctx: &FrameContext) {
        for row in self.fading.drain(..) {
            row.set_style("opacity", "1");
        }
    }
}
