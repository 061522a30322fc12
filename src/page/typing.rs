//! The typed headline.
//!
//! Types a phrase one character at a time, holds it, deletes it, then moves
//! on to the next phrase, forever.

use web_time::{Duration, Instant};

use crate::config::TypingConfig;
use crate::dom::Element;
use crate::scheduler::{Animated, DelayedTask, FrameContext};

/// Typing/deleting state for the headline element.
pub struct TypingEffect<E: Element> {
    target: E,
    phrases: Vec<Vec<char>>,
    phrase: usize,
    chars: usize,
    deleting: bool,
    next: DelayedTask,
    config: TypingConfig,
}

impl<E: Element> TypingEffect<E> {
    /// Bind to the headline element. The first step runs `start_delay_ms`
    /// after `now`.
    ///
    /// Returns `None` when the element is missing or there is nothing to type.
    pub fn attach(target: Option<E>, config: TypingConfig, now: Instant) -> Option<Self> {
        let Some(target) = target else {
            log::debug!("no typing element; typing effect disabled");
            return None;
        };
        if config.phrases.is_empty() {
            log::debug!("no phrases configured; typing effect disabled");
            return None;
        }
        let phrases = config.phrases.iter().map(|p| p.chars().collect()).collect();
        let mut next = DelayedTask::new();
        next.schedule_after(now, Duration::from_millis(config.start_delay_ms));
        Some(Self {
            target,
            phrases,
            phrase: 0,
            chars: 0,
            deleting: false,
            next,
            config,
        })
    }

    /// Index of the phrase being typed or deleted.
    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Characters currently shown.
    pub fn visible_chars(&self) -> usize {
        self.chars
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// When the next step is due.
    pub fn next_step(&self) -> Option<Instant> {
        self.next.deadline()
    }

    /// Type or delete one character and return the delay before the next step.
    pub fn step(&mut self) -> Duration {
        let phrase = &self.phrases[self.phrase];
        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
        } else {
            self.chars = (self.chars + 1).min(phrase.len());
        }
        let text: String = phrase[..self.chars].iter().collect();
        self.target.set_text(&text);

        let config = &self.config;
        let mut delay = if self.deleting {
            config.delete_delay_ms
        } else {
            config.type_delay_ms
        };

        if !self.deleting && self.chars == phrase.len() {
            delay = config.hold_delay_ms;
            self.deleting = true;
        } else if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
            delay = config.next_phrase_delay_ms;
        }
        Duration::from_millis(delay)
    }
}

impl<E: Element> Animated for TypingEffect<E> {
    fn frame(&mut self, ctx: &FrameContext) {
        if self.next.poll(ctx.now) {
            let delay = self.step();
            self.next.schedule_after(ctx.now, delay);
        }
    }
}
