//! Host document abstraction for the page modules.
//!
//! The page modules only ever toggle classes, set text, attributes and
//! inline styles, and read a few layout numbers. [`Element`], [`Document`]
//! and [`Viewport`] cover exactly that. Element handles are cheap clones
//! with interior mutability, the same as DOM nodes.
//!
//! [`MemoryDocument`] is a small in-memory tree with a CSS selector subset
//! (type, `.class`, `#id`, `[attr]`, `[attr=value]`, descendant combinator
//! and `,` groups), enough to run every module without a browser.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// A handle to a page element.
///
/// Equality is identity: two handles are equal when they refer to the same
/// node.
pub trait Element: Clone + PartialEq {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    /// Add or remove `class` depending on `on`.
    fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    /// `data-*` attribute, e.g. `data("year")` reads `data-year`.
    fn data(&self, key: &str) -> Option<String> {
        self.attribute(&format!("data-{}", key))
    }

    fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// Set one inline style property. An empty value removes it.
    fn set_style(&self, property: &str, value: &str);

    /// Distance from the top of the document, in px.
    fn offset_top(&self) -> f64;

    /// `true` if `other` is this element or one of its descendants.
    fn contains(&self, other: &Self) -> bool;
}

/// Element lookup.
pub trait Document {
    type Element: Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
}

/// Window-level state.
pub trait Viewport {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn scroll_y(&self) -> f64;
    /// Smoothly scroll back to the top of the page.
    fn scroll_to_top(&self);
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    offset_top: f64,
    parent: Weak<RefCell<Node>>,
    children: Vec<MemoryElement>,
}

/// An element of a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryElement(Rc<RefCell<Node>>);

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl MemoryElement {
    /// A detached element with the given tag name.
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        })))
    }

    pub fn with_id(self, id: &str) -> Self {
        self.set_attribute("id", id);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        for c in class.split_whitespace() {
            self.add_class(c);
        }
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_offset_top(self, top: f64) -> Self {
        self.0.borrow_mut().offset_top = top;
        self
    }

    /// Append `child` and return `self`, for building trees inline.
    pub fn with_child(self, child: MemoryElement) -> Self {
        self.append(child);
        self
    }

    pub fn append(&self, child: MemoryElement) {
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child);
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    /// Inline style property, if set.
    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().style.get(property).cloned()
    }

    pub fn parent(&self) -> Option<MemoryElement> {
        self.0.borrow().parent.upgrade().map(MemoryElement)
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.0.borrow().children.clone()
    }

    /// This element and all descendants, pre-order.
    fn walk(&self, out: &mut Vec<MemoryElement>) {
        out.push(self.clone());
        for child in self.0.borrow().children.iter() {
            child.walk(out);
        }
    }

    fn matches_compound(&self, compound: &Compound) -> bool {
        let node = self.0.borrow();
        if let Some(tag) = &compound.tag {
            if node.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if node.attributes.get("id") != Some(id) {
                return false;
            }
        }
        if !compound.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        compound.attributes.iter().all(|(name, value)| match value {
            Some(v) => node.attributes.get(name) == Some(v),
            None => node.attributes.contains_key(name),
        })
    }

    fn matches(&self, selector: &[Compound]) -> bool {
        let Some((last, ancestors)) = selector.split_last() else {
            return false;
        };
        if !self.matches_compound(last) {
            return false;
        }
        // Match the remaining compounds against ancestors, right to left.
        let mut remaining = ancestors;
        let mut current = self.parent();
        while let Some((wanted, rest)) = remaining.split_last() {
            loop {
                let Some(el) = current else {
                    return false;
                };
                current = el.parent();
                if el.matches_compound(wanted) {
                    break;
                }
            }
            remaining = rest;
        }
        true
    }
}

impl Element for MemoryElement {
    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        if value.is_empty() {
            node.style.remove(property);
        } else {
            node.style.insert(property.to_string(), value.to_string());
        }
    }

    fn offset_top(&self) -> f64 {
        self.0.borrow().offset_top
    }

    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(el) = current {
            if el == *self {
                return true;
            }
            current = el.parent();
        }
        false
    }
}

/// One compound selector, e.g. `tr.active[data-year]`.
#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

/// Parse `a, button, .magnetic` into groups of descendant chains.
/// Unsupported syntax yields `None`.
fn parse_selector(selector: &str) -> Option<Vec<Vec<Compound>>> {
    selector
        .split(',')
        .map(|group| {
            let chain: Option<Vec<Compound>> =
                group.split_whitespace().map(parse_compound).collect();
            chain.filter(|c| !c.is_empty())
        })
        .collect()
}

fn parse_compound(text: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = text;

    let tag_len = rest
        .find(|c: char| c == '.' || c == '#' || c == '[')
        .unwrap_or(rest.len());
    if tag_len > 0 {
        let tag = &rest[..tag_len];
        if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '*') {
            return None;
        }
        if tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];
    }

    while let Some(first) = rest.chars().next() {
        match first {
            '.' | '#' => {
                let body = &rest[1..];
                let end = body
                    .find(|c: char| c == '.' || c == '#' || c == '[')
                    .unwrap_or(body.len());
                if end == 0 {
                    return None;
                }
                let name = body[..end].to_string();
                if first == '.' {
                    compound.classes.push(name);
                } else {
                    compound.id = Some(name);
                }
                rest = &body[end..];
            }
            '[' => {
                let close = rest.find(']')?;
                let inner = &rest[1..close];
                let attr = match inner.split_once('=') {
                    Some((name, value)) => (
                        name.trim().to_string(),
                        Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()),
                    ),
                    None => (inner.trim().to_string(), None),
                };
                if attr.0.is_empty() {
                    return None;
                }
                compound.attributes.push(attr);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }
    Some(compound)
}

/// An in-memory [`Document`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    root: MemoryElement,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            root: MemoryElement::new("body"),
        }
    }

    /// The `body` element everything hangs off.
    pub fn body(&self) -> &MemoryElement {
        &self.root
    }

    pub fn append(&self, child: MemoryElement) {
        self.root.append(child);
    }

    fn all(&self) -> Vec<MemoryElement> {
        let mut out = Vec::new();
        self.root.walk(&mut out);
        out
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.all()
            .into_iter()
            .find(|el| el.attribute("id").as_deref() == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<MemoryElement> {
        let Some(groups) = parse_selector(selector) else {
            log::warn!("unsupported selector: {}", selector);
            return Vec::new();
        };
        self.all()
            .into_iter()
            .filter(|el| groups.iter().any(|chain| el.matches(chain)))
            .collect()
    }
}

/// An in-memory [`Viewport`].
#[derive(Debug)]
pub struct MemoryViewport {
    width: Cell<f64>,
    height: Cell<f64>,
    scroll_y: Cell<f64>,
    scroll_requests: Cell<u32>,
}

impl MemoryViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Cell::new(width),
            height: Cell::new(height),
            scroll_y: Cell::new(0.0),
            scroll_requests: Cell::new(0),
        }
    }

    pub fn set_size(&self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
    }

    pub fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    /// How many times [`Viewport::scroll_to_top`] was called.
    pub fn scroll_requests(&self) -> u32 {
        self.scroll_requests.get()
    }
}

impl Viewport for MemoryViewport {
    fn width(&self) -> f64 {
        self.width.get()
    }

    fn height(&self) -> f64 {
        self.height.get()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to_top(&self) {
        self.scroll_requests.set(self.scroll_requests.get() + 1);
        self.scroll_y.set(0.0);
    }
}

impl<V: Viewport + ?Sized> Viewport for &V {
    fn width(&self) -> f64 {
        (**self).width()
    }

    fn height(&self) -> f64 {
        (**self).height()
    }

    fn scroll_y(&self) -> f64 {
        (**self).scroll_y()
    }

    fn scroll_to_top(&self) {
        (**self).scroll_to_top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_doc() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.append(
            MemoryElement::new("table").with_class("comp-table").with_child(
                MemoryElement::new("tbody")
                    .with_child(MemoryElement::new("tr").with_attr("data-year", "2024"))
                    .with_child(MemoryElement::new("tr").with_attr("data-year", "2025")),
            ),
        );
        doc.append(
            MemoryElement::new("table")
                .with_child(MemoryElement::new("tbody").with_child(MemoryElement::new("tr"))),
        );
        doc
    }

    #[test]
    fn test_descendant_selector() {
        let doc = table_doc();
        let rows = doc.query_all(".comp-table tbody tr");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].data("year").as_deref(), Some("2024"));
        assert_eq!(doc.query_all("tr").len(), 3);
    }

    #[test]
    fn test_attribute_selectors() {
        let doc = table_doc();
        assert_eq!(doc.query_all("tr[data-year]").len(), 2);
        assert_eq!(doc.query_all("tr[data-year=\"2025\"]").len(), 1);
    }

    #[test]
    fn test_group_selector_keeps_document_order() {
        let doc = MemoryDocument::new();
        doc.append(MemoryElement::new("button").with_id("b"));
        doc.append(MemoryElement::new("a").with_id("a"));
        doc.append(MemoryElement::new("div").with_class("magnetic card").with_id("m"));
        doc.append(MemoryElement::new("div").with_id("plain"));

        let ids: Vec<String> = doc
            .query_all("a, button, .magnetic")
            .iter()
            .filter_map(|e| e.id())
            .collect();
        assert_eq!(ids, vec!["b", "a", "m"]);
    }

    #[test]
    fn test_unsupported_selector_matches_nothing() {
        let doc = table_doc();
        assert!(doc.query_all("tr > td").is_empty());
        assert!(doc.query_all("").is_empty());
    }

    #[test]
    fn test_contains() {
        let inner = MemoryElement::new("span");
        let outer = MemoryElement::new("div").with_child(inner.clone());
        let other = MemoryElement::new("div");
        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&other));
    }

    #[test]
    fn test_class_and_style_ops() {
        let el = MemoryElement::new("div");
        el.toggle_class("open", true);
        el.add_class("open");
        assert_eq!(el.classes(), vec!["open"]);
        el.toggle_class("open", false);
        assert!(!el.has_class("open"));

        el.set_style("display", "none");
        assert_eq!(el.style("display").as_deref(), Some("none"));
        el.set_style("display", "");
        assert_eq!(el.style("display"), None);
    }
}
