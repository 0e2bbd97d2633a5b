use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::RateLimitError;
use crate::error::Result;

/// Fixed window rate limiter with hard resets at window boundaries
///
/// The fixed window algorithm divides time into fixed-size windows and allows
/// a maximum number of grants within each window. A background task resets
/// the pool to full capacity at every window boundary; consumed permits never
/// trickle back between boundaries.
pub struct FixedWindow {
    /// State shared with the replenishment task
    shared: Arc<Shared>,

    /// Handle to the replenishment task, aborted on drop
    replenisher: JoinHandle<()>,
}

struct Shared {
    /// Permits still available in the current window
    permits: Mutex<u32>,

    /// Wakes parked acquirers after a window reset
    reset: Notify,

    /// Maximum grants allowed per window
    capacity: u32,
}

impl FixedWindow {
    /// Create a new fixed window rate limiter
    ///
    /// Spawns the replenishment task as a side effect, so this must be
    /// called from within a Tokio runtime. The task is torn down when the
    /// limiter is dropped or [`shutdown`](Self::shutdown) is called.
    pub fn new(capacity: u32, window: Duration) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        assert!(!window.is_zero(), "Window duration must be greater than 0");

        let shared = Arc::new(Shared { permits: Mutex::new(capacity), reset: Notify::new(), capacity });
        let replenisher = tokio::spawn(replenish_loop(Arc::clone(&shared), window));

        Self { shared, replenisher }
    }

    /// Create a fixed window limiter with per-second capacity
    pub fn per_second(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(1))
    }

    /// Create a fixed window limiter with per-minute capacity
    pub fn per_minute(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    /// Create a builder for configuring a fixed window limiter
    pub fn builder() -> FixedWindowBuilder {
        FixedWindowBuilder::new()
    }

    /// Wait until a permit is available, then consume it
    ///
    /// Never fails and has no deadline: an exhausted window shows up as
    /// delay until the next reset, not as an error. Safe to call from any
    /// number of concurrent tasks; wake order among waiters is unspecified.
    pub async fn acquire(&self) {
        loop {
            // Register for the next reset before checking the pool so a
            // reset landing between the check and the await still wakes us.
            let notified = self.shared.reset.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.try_acquire().is_ok() {
                return;
            }

            notified.await;
        }
    }

    /// Consume a permit without blocking
    pub fn try_acquire(&self) -> Result<()> {
        let mut permits = self.shared.permits.lock();

        if *permits == 0 {
            return Err(RateLimitError::Exceeded);
        }

        *permits -= 1;
        Ok(())
    }

    /// Get the number of permits left in the current window
    pub fn available(&self) -> u32 {
        *self.shared.permits.lock()
    }

    /// Get the maximum grants per window
    pub fn capacity(&self) -> u32 {
        self.shared.capacity
    }

    /// Stop the replenishment task
    ///
    /// Permits already in the pool remain consumable, but no further resets
    /// occur. Idempotent; also performed on drop.
    pub fn shutdown(&self) {
        self.replenisher.abort();
    }
}

impl Drop for FixedWindow {
    fn drop(&mut self) {
        self.replenisher.abort();
    }
}

/// Reset the pool to full capacity at every window boundary
async fn replenish_loop(shared: Arc<Shared>, window: Duration) {
    let mut ticks = tokio::time::interval(window);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick completes immediately; consume it so the initial
    // window runs on the permits seeded at construction.
    ticks.tick().await;

    loop {
        ticks.tick().await;

        // Unconditional reset, not an incremental top-up. A no-op when the
        // pool is untouched; releases every parked waiter when exhausted.
        *shared.permits.lock() = shared.capacity;
        shared.reset.notify_waiters();
    }
}

/// Builder for configuring a fixed window rate limiter
pub struct FixedWindowBuilder {
    capacity: Option<u32>,
    window: Option<Duration>,
}

impl FixedWindowBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { capacity: None, window: None }
    }

    /// Set the capacity (max grants per window)
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the window duration
    pub fn window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    /// Set window to 1 second
    pub fn per_second(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self.window = Some(Duration::from_secs(1));
        self
    }

    /// Set window to 1 minute
    pub fn per_minute(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self.window = Some(Duration::from_secs(60));
        self
    }

    /// Build the fixed window limiter
    ///
    /// # Errors
    /// Returns `InvalidConfig` if capacity or window is missing or zero
    pub fn build(self) -> Result<FixedWindow> {
        let capacity = self.capacity.ok_or(RateLimitError::InvalidConfig("capacity must be set"))?;
        let window = self.window.ok_or(RateLimitError::InvalidConfig("window must be set"))?;

        if capacity == 0 {
            return Err(RateLimitError::InvalidConfig("capacity must be greater than 0"));
        }
        if window.is_zero() {
            return Err(RateLimitError::InvalidConfig("window must be greater than 0"));
        }

        Ok(FixedWindow::new(capacity, window))
    }
}

impl Default for FixedWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
