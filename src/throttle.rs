//! Leading/trailing throttle for bursty event streams.
//!
//! [`ThrottleState`] decides, for each incoming call, whether it runs now,
//! is deferred to the end of the current window, or is dropped. It owns no
//! timer: the host event loop reads [`ThrottleState::deadline`] and calls
//! [`ThrottleState::fire_at`] once it passes. [`Throttled`] bundles the
//! state with a callback for the common case.
//!
//! # Semantics
//!
//! - A call with no reference point, or at least `wait` after it, runs
//!   immediately (the leading edge) and becomes the new reference point.
//! - A call inside the window stores its arguments (latest wins) and, if no
//!   timer is pending, schedules one for `reference + wait` (the trailing
//!   edge). A pending timer is never moved.
//! - `leading = false` seeds the reference point on the first call of a
//!   burst, so that call is deferred instead of run.
//! - `trailing = false` drops deferred calls.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use zenfill::throttle::{ThrottleConfig, Throttled};
//!
//! let mut calls = Vec::new();
//! let mut t = Throttled::new(ThrottleConfig::default(), |n: u32| {
//!     calls.push(n);
//!     n
//! });
//!
//! let base = Instant::now();
//! assert_eq!(t.call_at(1, base), Some(&1));
//! assert_eq!(t.call_at(2, base + Duration::from_millis(30)), Some(&1));
//! assert_eq!(t.fire_at(base + Duration::from_millis(100)), Some(&2));
//! drop(t);
//! assert_eq!(calls, [1, 2]);
//! ```

use std::time::{Duration, Instant};

use tracing::trace;

/// Default throttle window.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(100);

#[inline]
fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier).unwrap_or(Duration::ZERO)
}

/// Throttle window and edge configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThrottleConfig {
    /// Minimum spacing between invocations.
    pub wait: Duration,
    /// Run the first call of a burst immediately.
    pub leading: bool,
    /// Run the last deferred call at the end of the window.
    pub trailing: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            wait: DEFAULT_WAIT,
            leading: true,
            trailing: true,
        }
    }
}

impl ThrottleConfig {
    /// Default edges with a custom window.
    pub fn with_wait(wait: Duration) -> Self {
        Self {
            wait,
            ..Self::default()
        }
    }

    /// Set whether the first call of a burst runs immediately.
    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Set whether the last deferred call runs at the end of the window.
    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }
}

/// Outcome of a single throttled call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThrottleDecision<A> {
    /// Run the callback now with these arguments.
    Invoke(A),
    /// Arguments stored; a trailing run is due at `deadline`.
    Deferred {
        /// When the pending trailing run becomes due.
        deadline: Instant,
    },
    /// Call dropped (inside the window with trailing runs disabled).
    Suppressed,
}

/// Decision state for one throttled function.
#[derive(Clone, Debug)]
pub struct ThrottleState<A> {
    config: ThrottleConfig,
    /// Reference point of the current window.
    previous: Option<Instant>,
    /// The single pending timer slot.
    deadline: Option<Instant>,
    /// Arguments of the most recent deferred call.
    pending: Option<A>,
}

impl<A> ThrottleState<A> {
    /// A fresh state with no window open.
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            previous: None,
            deadline: None,
            pending: None,
        }
    }

    /// Window and edge configuration.
    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    /// Register a call at `now`.
    pub fn call_at(&mut self, args: A, now: Instant) -> ThrottleDecision<A> {
        if self.previous.is_none() && !self.config.leading {
            self.previous = Some(now);
        }

        let due = match self.previous {
            None => true,
            Some(prev) => duration_since_or_zero(now, prev) >= self.config.wait,
        };

        if due {
            self.deadline = None;
            self.pending = None;
            self.previous = Some(now);
            trace!("throttle: leading invoke");
            return ThrottleDecision::Invoke(args);
        }

        if !self.config.trailing {
            trace!("throttle: suppressed");
            return ThrottleDecision::Suppressed;
        }

        let deadline = match self.deadline {
            Some(deadline) => deadline,
            None => {
                // `previous` is always set on this path.
                let Some(deadline) = self.previous.unwrap_or(now).checked_add(self.config.wait)
                else {
                    // The window outlasts any representable instant.
                    trace!("throttle: window never closes, suppressed");
                    return ThrottleDecision::Suppressed;
                };
                self.deadline = Some(deadline);
                deadline
            }
        };
        // Latest arguments win; the timer stays where it is.
        self.pending = Some(args);
        trace!(?deadline, "throttle: deferred");
        ThrottleDecision::Deferred { deadline }
    }

    /// Release the pending arguments if the timer is due at `now`.
    ///
    /// Returns `None` when nothing is pending or the deadline has not yet
    /// passed.
    pub fn fire_at(&mut self, now: Instant) -> Option<A> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.previous = if self.config.leading { Some(now) } else { None };
        let args = self.pending.take();
        if args.is_some() {
            trace!("throttle: trailing invoke");
        }
        args
    }

    /// When the pending trailing run is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the pending trailing run, zero when overdue.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Whether a trailing run is scheduled.
    pub fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop the pending run and forget the current window.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
        self.previous = None;
    }
}

/// A callback wrapped with a [`ThrottleState`].
///
/// Calls return the result of the most recent actual invocation, which may
/// be stale (or `None` before the first one).
pub struct Throttled<A, R, F>
where
    F: FnMut(A) -> R,
{
    state: ThrottleState<A>,
    callback: F,
    last: Option<R>,
}

impl<A, R, F> Throttled<A, R, F>
where
    F: FnMut(A) -> R,
{
    /// Wrap `callback` with a fresh throttle.
    pub fn new(config: ThrottleConfig, callback: F) -> Self {
        Self {
            state: ThrottleState::new(config),
            callback,
            last: None,
        }
    }

    /// Call through the throttle using the current time.
    pub fn call(&mut self, args: A) -> Option<&R> {
        self.call_at(args, Instant::now())
    }

    /// Call through the throttle at a specific time.
    pub fn call_at(&mut self, args: A, now: Instant) -> Option<&R> {
        if let ThrottleDecision::Invoke(args) = self.state.call_at(args, now) {
            self.last = Some((self.callback)(args));
        }
        self.last.as_ref()
    }

    /// Run the pending trailing call if due, using the current time.
    pub fn fire(&mut self) -> Option<&R> {
        self.fire_at(Instant::now())
    }

    /// Run the pending trailing call if due at `now`.
    pub fn fire_at(&mut self, now: Instant) -> Option<&R> {
        if let Some(args) = self.state.fire_at(now) {
            self.last = Some((self.callback)(args));
        }
        self.last.as_ref()
    }

    /// Result of the most recent invocation.
    pub fn last_result(&self) -> Option<&R> {
        self.last.as_ref()
    }

    /// When the pending trailing call is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.state.deadline()
    }

    /// Drop the pending call and forget the current window.
    pub fn cancel(&mut self) {
        self.state.cancel();
    }

    /// The underlying decision state.
    pub fn state(&self) -> &ThrottleState<A> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Drive a throttle through calls at the given offsets, firing timers in
    /// between as an event loop would. Returns `(time, args)` per invocation.
    fn run(config: ThrottleConfig, calls: &[u64], until: u64) -> Vec<(u64, u64)> {
        let base = Instant::now();
        let mut state = ThrottleState::new(config);
        let mut invoked = Vec::new();
        for t in 0..=until {
            let now = base + ms(t);
            if let Some(args) = state.fire_at(now) {
                invoked.push((t, args));
            }
            if calls.contains(&t)
                && let ThrottleDecision::Invoke(args) = state.call_at(t, now)
            {
                invoked.push((t, args));
            }
        }
        invoked
    }

    #[test]
    fn leading_then_trailing_with_latest_args() {
        let invoked = run(ThrottleConfig::default(), &[0, 30, 60, 90], 150);
        assert_eq!(invoked, [(0, 0), (100, 90)]);
    }

    #[test]
    fn call_after_trailing_opens_new_window() {
        let invoked = run(ThrottleConfig::default(), &[0, 30, 60, 90, 120], 250);
        // 120 lands inside the window that started with the trailing run at 100.
        assert_eq!(invoked, [(0, 0), (100, 90), (200, 120)]);
    }

    #[test]
    fn spaced_calls_all_lead() {
        let invoked = run(ThrottleConfig::default(), &[0, 100, 250], 300);
        assert_eq!(invoked, [(0, 0), (100, 100), (250, 250)]);
    }

    #[test]
    fn no_leading_runs_once_at_window_end() {
        let config = ThrottleConfig::default().leading(false);
        let invoked = run(config, &[10, 20, 50, 80], 200);
        assert_eq!(invoked, [(110, 80)]);
    }

    #[test]
    fn no_trailing_drops_deferred_calls() {
        let config = ThrottleConfig::default().trailing(false);
        let invoked = run(config, &[0, 30, 60, 90, 120], 200);
        assert_eq!(invoked, [(0, 0), (120, 120)]);
    }

    #[test]
    fn pending_timer_is_not_rescheduled() {
        let base = Instant::now();
        let mut state = ThrottleState::new(ThrottleConfig::default());
        assert_eq!(state.call_at("a", base), ThrottleDecision::Invoke("a"));
        let first = state.call_at("b", base + ms(10));
        let second = state.call_at("c", base + ms(70));
        assert_eq!(first, ThrottleDecision::Deferred { deadline: base + ms(100) });
        assert_eq!(second, first);
        assert_eq!(state.time_until_fire(base + ms(70)), Some(ms(30)));
    }

    #[test]
    fn early_fire_is_ignored() {
        let base = Instant::now();
        let mut state = ThrottleState::new(ThrottleConfig::default());
        state.call_at(1, base);
        state.call_at(2, base + ms(10));
        assert_eq!(state.fire_at(base + ms(99)), None);
        assert!(state.has_pending());
        assert_eq!(state.fire_at(base + ms(100)), Some(2));
        assert!(!state.has_pending());
    }

    #[test]
    fn late_leading_call_clears_timer() {
        // The host missed the timer; the next call past the window runs now.
        let base = Instant::now();
        let mut state = ThrottleState::new(ThrottleConfig::default());
        state.call_at(1, base);
        state.call_at(2, base + ms(10));
        assert_eq!(state.call_at(3, base + ms(150)), ThrottleDecision::Invoke(3));
        assert_eq!(state.deadline(), None);
        assert_eq!(state.fire_at(base + ms(300)), None);
    }

    #[test]
    fn cancel_forgets_window() {
        let base = Instant::now();
        let mut state = ThrottleState::new(ThrottleConfig::default());
        state.call_at(1, base);
        state.call_at(2, base + ms(10));
        state.cancel();
        assert!(!state.has_pending());
        assert_eq!(state.call_at(3, base + ms(20)), ThrottleDecision::Invoke(3));
    }

    #[test]
    fn zero_wait_always_invokes() {
        let invoked = run(ThrottleConfig::with_wait(Duration::ZERO), &[0, 1, 2], 5);
        assert_eq!(invoked, [(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn unbounded_wait_suppresses_instead_of_overflowing() {
        let base = Instant::now();
        let mut state = ThrottleState::new(ThrottleConfig::with_wait(Duration::MAX));
        assert_eq!(state.call_at(1, base), ThrottleDecision::Invoke(1));
        assert_eq!(state.call_at(2, base + ms(1)), ThrottleDecision::Suppressed);
        assert!(!state.has_pending());
        assert_eq!(state.deadline(), None);
        assert_eq!(state.fire_at(base + ms(1000)), None);
    }

    #[test]
    fn throttled_returns_stale_result() {
        let base = Instant::now();
        let mut count = 0;
        let mut t = Throttled::new(ThrottleConfig::default(), |n: u32| {
            count += 1;
            n * 10
        });
        assert_eq!(t.last_result(), None);
        assert_eq!(t.call_at(1, base), Some(&10));
        assert_eq!(t.call_at(2, base + ms(50)), Some(&10));
        assert_eq!(t.fire_at(base + ms(100)), Some(&20));
        drop(t);
        assert_eq!(count, 2);
    }
}
