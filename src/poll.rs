/// Bounded polling and the clock it runs on
use gloo_timers::future::TimeoutFuture;
use thiserror::Error;

/// Source of time and cooperative sleeping
#[allow(async_fn_in_trait)]
pub trait Clock {
    /// Milliseconds since some fixed origin
    fn now_ms(&self) -> f64;
    async fn sleep(&self, ms: u32);
}

/// Browser clock backed by `Date.now()` and `setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

/// Interval and deadline of a bounded poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval_ms: u32,
    pub timeout_ms: u32,
}

#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("gave up after {elapsed_ms}ms")]
pub struct PollTimeout {
    pub elapsed_ms: f64,
}

/// Probe until it yields a value or the deadline passes.
///
/// The probe runs immediately, then once per interval. Returns the value
/// together with the elapsed time in milliseconds.
pub async fn poll_until<C, T, F>(clock: &C, config: PollConfig, mut probe: F) -> Result<(T, f64), PollTimeout>
where
    C: Clock,
    F: FnMut() -> Option<T>,
{
    let started = clock.now_ms();
    loop {
        let elapsed_ms = clock.now_ms() - started;
        if let Some(found) = probe() {
            return Ok((found, elapsed_ms));
        }
        if elapsed_ms >= f64::from(config.timeout_ms) {
            return Err(PollTimeout { elapsed_ms });
        }
        clock.sleep(config.interval_ms).await;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use std::cell::{Cell, RefCell};

    /// Clock that only advances when slept on
    #[derive(Debug, Default)]
    pub struct ManualClock {
        now: Cell<f64>,
        sleeps: RefCell<Vec<u32>>,
    }

    impl ManualClock {
        pub fn new() -> ManualClock {
            ManualClock::default()
        }

        pub fn sleeps(&self) -> Vec<u32> {
            self.sleeps.borrow().clone()
        }

        pub fn elapsed(&self) -> f64 {
            self.now.get()
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> f64 {
            self.now.get()
        }

        async fn sleep(&self, ms: u32) {
            self.sleeps.borrow_mut().push(ms);
            self.now.set(self.now.get() + f64::from(ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;
    use futures::executor::block_on;

    const CONFIG: PollConfig = PollConfig {
        interval_ms: 200,
        timeout_ms: 1000,
    };

    #[test]
    fn test_found_immediately() {
        let clock = ManualClock::new();

        let (value, elapsed) = block_on(poll_until(&clock, CONFIG, || Some(7))).unwrap();

        assert_eq!(value, 7);
        assert_eq!(elapsed, 0.0);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_found_after_a_few_intervals() {
        let clock = ManualClock::new();
        let mut attempts = 0;

        let (value, elapsed) = block_on(poll_until(&clock, CONFIG, || {
            attempts += 1;
            (attempts == 3).then_some("button")
        }))
        .unwrap();

        assert_eq!(value, "button");
        assert_eq!(elapsed, 400.0);
        assert_eq!(clock.sleeps(), vec![200, 200]);
    }

    #[test]
    fn test_times_out() {
        let clock = ManualClock::new();
        let mut attempts = 0;

        let result = block_on(poll_until(&clock, CONFIG, || {
            attempts += 1;
            None::<()>
        }));

        assert_eq!(result, Err(PollTimeout { elapsed_ms: 1000.0 }));
        // probes at 0, 200, 400, 600, 800, 1000
        assert_eq!(attempts, 6);
    }
}
