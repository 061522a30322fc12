//! Frame loop and timers.
//!
//! Everything on the page runs on one thread, driven by the host's frame
//! callback. Timers are not separate callbacks: each one is a small value
//! polled with the frame's timestamp, so a module owns its timers the same
//! way it owns the rest of its state.
//!
//! # Example
//!
//! ```ignore
//! use glowfield::scheduler::{FrameLoop, ManualClock};
//!
//! let mut frames = FrameLoop::new();
//! frames.add(particle_layer);
//! frames.add(cursor_layer);
//!
//! let token = frames.token();
//! // ... later, from teardown code:
//! token.cancel();
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use web_time::{Duration, Instant};

use crate::time::Time;

/// Shared stop flag for a [`FrameLoop`].
///
/// Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A one-shot task due at some instant.
///
/// Polling with a time at or past the deadline fires it exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelayedTask {
    deadline: Option<Instant>,
}

impl DelayedTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) for `deadline`.
    pub fn schedule(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn schedule_after(&mut self, now: Instant, delay: Duration) {
        self.schedule(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Runs an action only after triggers have stopped for `quiet`.
///
/// Each trigger cancels the pending run and schedules a new one.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    quiet: Duration,
    task: DelayedTask,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            task: DelayedTask::new(),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn trigger(&mut self, now: Instant) {
        self.task.cancel();
        self.task.schedule_after(now, self.quiet);
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_pending()
    }

    /// `true` when the quiet period after the last trigger has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.task.poll(now)
    }
}

/// A repeating timer on a fixed cadence.
///
/// Missed periods are skipped rather than replayed in a burst.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Start ticking; the first tick is one period from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next {
            return false;
        }
        let mut following = next + self.period;
        if following <= now {
            following = now + self.period;
        }
        self.next = Some(following);
        true
    }
}

/// Timing information handed to every [`Animated`] component.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub now: Instant,
    /// Time since the previous frame in seconds.
    pub delta: f32,
    /// Frames since the loop started (the first frame is 1).
    pub frame: u64,
}

/// Something that does work on every animation frame.
pub trait Animated {
    fn frame(&mut self, ctx: &FrameContext);
}

impl<T: Animated + ?Sized> Animated for Box<T> {
    fn frame(&mut self, ctx: &FrameContext) {
        (**self).frame(ctx)
    }
}

impl<T: Animated + ?Sized> Animated for &mut T {
    fn frame(&mut self, ctx: &FrameContext) {
        (**self).frame(ctx)
    }
}

/// Shared components: the loop ticks them while event handlers keep a
/// handle to the same value.
impl<T: Animated + ?Sized> Animated for Rc<RefCell<T>> {
    fn frame(&mut self, ctx: &FrameContext) {
        self.borrow_mut().frame(ctx)
    }
}

/// Source of frame timestamps.
///
/// Returning `None` means the host is gone and the loop should end.
pub trait FrameClock {
    fn next_frame(&mut self) -> Option<Instant>;
}

/// A clock advanced by a fixed step per frame, without waiting.
///
/// Used for tests and headless runs.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Instant,
    step: Duration,
    remaining: Option<u64>,
}

impl ManualClock {
    pub fn new(start: Instant, step: Duration) -> Self {
        Self {
            now: start,
            step,
            remaining: None,
        }
    }

    /// Stop after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    pub fn now(&self) -> Instant {
        self.now
    }
}

impl FrameClock for ManualClock {
    fn next_frame(&mut self) -> Option<Instant> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        self.now += self.step;
        Some(self.now)
    }
}

/// The page's perpetual animation tick, made stoppable.
///
/// Components are ticked in the order they were added.
pub struct FrameLoop<'a> {
    layers: Vec<Box<dyn Animated + 'a>>,
    token: CancelToken,
    time: Time,
}

impl<'a> Default for FrameLoop<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FrameLoop<'a> {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            token: CancelToken::new(),
            time: Time::new(),
        }
    }

    pub fn add(&mut self, layer: impl Animated + 'a) {
        self.layers.push(Box::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Handle that stops the loop when cancelled.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Run one frame at `now`. Returns `false` (and does nothing) once cancelled.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        let (_, delta) = self.time.update_at(now);
        let ctx = FrameContext {
            now,
            delta,
            frame: self.time.frame(),
        };
        for layer in &mut self.layers {
            layer.frame(&ctx);
        }
        true
    }

    /// Tick on every frame from `clock` until cancelled or the clock ends.
    ///
    /// Returns the number of frames run.
    pub fn run<C: FrameClock>(&mut self, clock: &mut C) -> u64 {
        let mut frames = 0;
        while !self.token.is_cancelled() {
            let Some(now) = clock.next_frame() else {
                break;
            };
            if self.tick(now) {
                frames += 1;
            }
        }
        log::debug!("frame loop stopped after {} frames", frames);
        frames
    }
}
