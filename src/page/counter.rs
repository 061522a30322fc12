//! Stat counters that count up when they scroll into view.
//!
//! The element's own text is the target: `"12+"` counts 0, 1, ... 12 and
//! keeps the `+`. Everything except ASCII digits is kept as the suffix, so
//! `"1,200"` counts to 1 with suffix `","`, as on the live page.

use web_time::{Duration, Instant};

use crate::config::CounterConfig;
use crate::dom::{Document, Element};
use crate::scheduler::{Animated, FrameContext, Interval};

/// Leading integer of `text`, like `parseInt(text, 10)`: optional leading
/// whitespace and sign, then digits.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Counting,
    Done,
}

struct Counter<E> {
    el: E,
    phase: Phase,
    target: i64,
    step: i64,
    value: i64,
    suffix: String,
    interval: Interval,
}

/// All `.stat-num` counters on the page.
pub struct StatCounter<E: Element> {
    counters: Vec<Counter<E>>,
    config: CounterConfig,
}

impl<E: Element> StatCounter<E> {
    pub fn attach<D>(doc: &D, config: CounterConfig) -> Self
    where
        D: Document<Element = E>,
    {
        let period = Duration::from_millis(config.interval_ms);
        let counters = doc
            .query_all(".stat-num")
            .into_iter()
            .map(|el| Counter {
                el,
                phase: Phase::Waiting,
                target: 0,
                step: 0,
                value: 0,
                suffix: String::new(),
                interval: Interval::new(period),
            })
            .collect();
        Self { counters, config }
    }

    /// Visible fraction at which hosts should report an intersection.
    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Counters not yet started.
    pub fn waiting(&self) -> impl Iterator<Item = &E> {
        self.counters
            .iter()
            .filter(|c| c.phase == Phase::Waiting)
            .map(|c| &c.el)
    }

    /// Number of counters still ticking.
    pub fn running(&self) -> usize {
        self.counters
            .iter()
            .filter(|c| c.phase == Phase::Counting)
            .count()
    }

    /// A counter's intersection state changed. The first intersection
    /// starts it; text without a leading integer is left alone.
    pub fn on_intersection(&mut self, target: &E, intersecting: bool, now: Instant) {
        if !intersecting {
            return;
        }
        let steps = i64::from(self.config.steps.max(1));
        let Some(counter) = self
            .counters
            .iter_mut()
            .find(|c| c.phase == Phase::Waiting && c.el == *target)
        else {
            return;
        };

        let text = counter.el.text();
        let Some(value) = parse_leading_int(&text) else {
            log::debug!("stat counter text {:?} has no number; skipping", text);
            counter.phase = Phase::Done;
            return;
        };
        counter.target = value;
        counter.step = ((value as f64 / steps as f64).ceil() as i64).max(1);
        counter.suffix = text.chars().filter(|c| !c.is_ascii_digit()).collect();
        counter.value = 0;
        counter.phase = Phase::Counting;
        counter.interval.start(now);
    }
}

impl<E: Element> Animated for StatCounter<E> {
    fn frame(&mut self, ctx: &FrameContext) {
        for counter in &mut self.counters {
            if counter.phase != Phase::Counting || !counter.interval.poll(ctx.now) {
                continue;
            }
            counter.value = counter.value.saturating_add(counter.step);
            if counter.value >= counter.target {
                counter.value = counter.target;
                counter.interval.stop();
                counter.phase = Phase::Done;
            }
            counter
                .el
                .set_text(&format!("{}{}", counter.value, counter.suffix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, MemoryElement};

    const MS: Duration = Duration::from_millis(1);

    fn ctx(now: Instant) -> FrameContext {
        FrameContext {
            now,
            delta: 0.016,
            frame: 1,
        }
    }

    fn stat(doc: &MemoryDocument, text: &str) -> MemoryElement {
        let el = MemoryElement::new("span").with_class("stat-num").with_text(text);
        doc.append(el.clone());
        el
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12+"), Some(12));
        assert_eq!(parse_leading_int("  7 wins"), Some(7));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("1,200"), Some(1));
        assert_eq!(parse_leading_int("Top 3"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_counts_up_to_target() {
        let start = Instant::now();
        let doc = MemoryDocument::new();
        let el = stat(&doc, "100+");
        let mut counters = StatCounter::attach(&doc, CounterConfig::default());

        counters.on_intersection(&el, true, start);
        assert_eq!(counters.running(), 1);

        // ceil(100 / 40) = 3 per tick.
        counters.frame(&ctx(start + 35 * MS));
        assert_eq!(el.text(), "3+");
        counters.frame(&ctx(start + 50 * MS));
        assert_eq!(el.text(), "3+");
        counters.frame(&ctx(start + 70 * MS));
        assert_eq!(el.text(), "6+");

        let mut t = start + 70 * MS;
        for _ in 0..40 {
            t += 35 * MS;
            counters.frame(&ctx(t));
        }
        assert_eq!(el.text(), "100+");
        assert_eq!(counters.running(), 0);
    }

    #[test]
    fn test_starts_once() {
        let start = Instant::now();
        let doc = MemoryDocument::new();
        let el = stat(&doc, "8");
        let mut counters = StatCounter::attach(&doc, CounterConfig::default());

        counters.on_intersection(&el, true, start);
        // Step is 1; eight ticks finish it.
        let mut t = start;
        for _ in 0..8 {
            t += 35 * MS;
            counters.frame(&ctx(t));
        }
        assert_eq!(el.text(), "8");

        // Scrolling back into view does not restart it.
        counters.on_intersection(&el, true, t);
        assert_eq!(counters.running(), 0);
        assert_eq!(counters.waiting().count(), 0);
    }

    #[test]
    fn test_not_intersecting_does_nothing() {
        let doc = MemoryDocument::new();
        let el = stat(&doc, "50");
        let mut counters = StatCounter::attach(&doc, CounterConfig::default());
        counters.on_intersection(&el, false, Instant::now());
        assert_eq!(counters.waiting().count(), 1);
    }

    #[test]
    fn test_text_without_number_untouched() {
        let start = Instant::now();
        let doc = MemoryDocument::new();
        let el = stat(&doc, "Top 3");
        let mut counters = StatCounter::attach(&doc, CounterConfig::default());

        counters.on_intersection(&el, true, start);
        counters.frame(&ctx(start + 100 * MS));
        assert_eq!(el.text(), "Top 3");
        assert_eq!(counters.running(), 0);
    }

    #[test]
    fn test_zero_target_finishes_on_first_tick() {
        let start = Instant::now();
        let doc = MemoryDocument::new();
        let el = stat(&doc, "0%");
        let mut counters = StatCounter::attach(&doc, CounterConfig::default());

        counters.on_intersection(&el, true, start);
        counters.frame(&ctx(start + 35 * MS));
        assert_eq!(el.text(), "0%");
        assert_eq!(counters.running(), 0);
    }

    #[test]
    fn test_huge_target_stops_at_target() {
        let start = Instant::now();
        let doc = MemoryDocument::new();
        let el = stat(&doc, "9223372036854775807");
        let mut counters = StatCounter::attach(&doc, CounterConfig::default());

        counters.on_intersection(&el, true, start);
        let mut t = start;
        for _ in 0..45 {
            t += 35 * MS;
            counters.frame(&ctx(t));
        }
        assert_eq!(el.text(), i64::MAX.to_string());
        assert_eq!(counters.running(), 0);
    }
}
