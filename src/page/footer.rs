//! Footer copyright year.

use chrono::Datelike;

use crate::dom::{Document, Element};

/// Write the current local year into `#footerYear`, if present.
pub fn set_footer_year<D: Document>(doc: &D) {
    write_year(doc, chrono::Local::now().year());
}

/// Write `year` into `#footerYear`. Returns whether the element exists.
pub fn write_year<D: Document>(doc: &D, year: i32) -> bool {
    match doc.element_by_id("footerYear") {
        Some(el) => {
            el.set_text(&year.to_string());
            true
        }
        None => false,
    }
}
