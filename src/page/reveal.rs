//! Fade-in of content blocks as they scroll into view.
//!
//! Elements matching the configured selectors get `reveal` (plus a stagger
//! class for siblings of the same kind). The host reports intersections; the
//! first one adds `visible` and the element is no longer watched.

use crate::config::RevealConfig;
use crate::dom::{Document, Element};

pub struct ScrollReveal<E: Element> {
    observed: Vec<E>,
    threshold: f64,
}

impl<E: Element> ScrollReveal<E> {
    /// Tag the targets and start observing every `.reveal` element.
    pub fn attach<D>(doc: &D, config: &RevealConfig) -> Self
    where
        D: Document<Element = E>,
    {
        for selector in &config.selectors {
            for (i, el) in doc.query_all(selector).iter().enumerate() {
                el.add_class("reveal");
                if i > 0 {
                    el.add_class(&format!("reveal-delay-{}", i.min(config.max_stagger)));
                }
            }
        }
        let observed = doc.query_all(".reveal");
        log::debug!("observing {} reveal targets", observed.len());
        Self {
            observed,
            threshold: config.threshold,
        }
    }

    /// Visible fraction at which hosts should report an intersection.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Elements still waiting to be revealed.
    pub fn observed(&self) -> &[E] {
        &self.observed
    }

    /// An observed element's intersection state changed. Returns `true` if
    /// this revealed it.
    pub fn on_intersection(&mut self, target: &E, intersecting: bool) -> bool {
        if !intersecting {
            return false;
        }
        let Some(index) = self.observed.iter().position(|el| el == target) else {
            return false;
        };
        let el = self.observed.remove(index);
        el.add_class("visible");
        true
    }
}
