/// Time-based view state: input debouncing and the minimum loading window
///
/// Both are plain state machines over explicit `Instant`s. The runtime
/// advances them with `Action::Tick`, so nothing here owns a timer task and
/// dropping the state cancels everything.
use std::time::{Duration, Instant};

/// Default quiet period before typed filter text is applied
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default minimum time the loading skeleton stays up
pub const DEFAULT_MIN_LOADING: Duration = Duration::from_millis(500);

/// A value whose edits only take effect after a quiet period
///
/// Every `input` restarts the quiet period; `poll` applies the latest input
/// once the period has elapsed without further input.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    applied: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            applied: initial,
            pending: None,
            delay,
        }
    }

    /// Record a keystroke-level edit made at `now`
    pub fn input(&mut self, value: T, now: Instant) {
        if value == self.applied {
            self.pending = None;
        } else {
            self.pending = Some((value, now + self.delay));
        }
    }

    /// Apply the pending value if its quiet period is over
    ///
    /// Returns true when the applied value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {
                if let Some((value, _)) = self.pending.take() {
                    self.applied = value;
                }
                true
            }
            _ => false,
        }
    }

    /// The value filters are computed from
    pub fn applied(&self) -> &T {
        &self.applied
    }

    /// The value the input box shows (pending edit, else applied)
    pub fn current(&self) -> &T {
        self.pending
            .as_ref()
            .map(|(value, _)| value)
            .unwrap_or(&self.applied)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Set both the applied value and the input without waiting
    pub fn reset(&mut self, value: T) {
        self.applied = value;
        self.pending = None;
    }
}

/// Flat minimum display time for the loading skeleton
///
/// The window is not tied to any request: once started it stays active for
/// `min` regardless of when data arrives.
#[derive(Debug, Clone)]
pub struct LoadingWindow {
    until: Option<Instant>,
    min: Duration,
}

impl LoadingWindow {
    pub fn new(min: Duration) -> Self {
        Self { until: None, min }
    }

    /// (Re)start the window; a restart replaces the previous deadline
    pub fn start(&mut self, now: Instant) {
        self.until = Some(now + self.min);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Drop an expired deadline; returns true when the window just closed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.until = None;
    }
}

impl Default for LoadingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LOADING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debounce_applies_after_quiet_period_only() {
        let t0 = Instant::now();
        let mut search = Debounced::new(String::new(), ms(500));

        search.input("DG".to_string(), t0);
        assert!(search.is_pending());
        assert_eq!(search.current(), "DG");
        assert_eq!(search.applied(), "");

        assert!(!search.poll(t0 + ms(499)));
        assert_eq!(search.applied(), "");

        assert!(search.poll(t0 + ms(500)));
        assert_eq!(search.applied(), "DG");
        assert!(!search.is_pending());
    }

    #[test]
    fn test_debounce_restarts_on_every_keystroke() {
        let t0 = Instant::now();
        let mut search = Debounced::new(String::new(), ms(500));

        search.input("D".to_string(), t0);
        search.input("DG".to_string(), t0 + ms(400));
        assert!(!search.poll(t0 + ms(800)));
        assert!(search.poll(t0 + ms(900)));
        assert_eq!(search.applied(), "DG");
    }

    #[test]
    fn test_debounce_back_to_applied_value_cancels() {
        let t0 = Instant::now();
        let mut value = Debounced::new(Some(5.0), ms(500));
        value.input(Some(6.0), t0);
        value.input(Some(5.0), t0 + ms(10));
        assert!(!value.is_pending());
        assert!(!value.poll(t0 + ms(1000)));
    }

    #[test]
    fn test_loading_window_is_flat_minimum() {
        let t0 = Instant::now();
        let mut window = LoadingWindow::new(ms(500));
        assert!(!window.is_active(t0));

        window.start(t0);
        assert!(window.is_active(t0 + ms(499)));
        assert!(!window.poll(t0 + ms(499)));
        assert!(!window.is_active(t0 + ms(500)));
        assert!(window.poll(t0 + ms(500)));
        assert!(!window.poll(t0 + ms(600)));
    }

    #[test]
    fn test_loading_window_cancel() {
        let t0 = Instant::now();
        let mut window = LoadingWindow::default();
        window.start(t0);
        window.cancel();
        assert!(!window.is_active(t0));
    }
}
