//! A coalescing timer for bursty input.
//!
//! A [`Debouncer`] owns one logical timer. Every call to
//! [`Debouncer::schedule`] arms a fresh tick tagged with a new value; the tick
//! of an earlier schedule still arrives but carries an outdated tag and is
//! ignored. Only the tick of the last schedule in a burst is reported as
//! elapsed, one full window after that last schedule.
//!
//! ```rust
//! use maillog_browser::debounce::Debouncer;
//! use std::time::Duration;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(1000));
//! let _first = debouncer.schedule();
//! let _second = debouncer.schedule(); // supersedes the first
//! assert!(debouncer.pending());
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Quiescence window of the list refetch.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1000);

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Delivered when a scheduled window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceMsg {
    /// The debouncer that armed the tick.
    pub id: i64,
    /// Schedule generation the tick belongs to.
    pub tag: u64,
}

/// Single live coalescing timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    id: i64,
    tag: u64,
    armed: bool,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            id: next_id(),
            tag: 0,
            armed: false,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Tag of the most recent schedule.
    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True while a scheduled window has not yet elapsed or been cancelled.
    pub fn pending(&self) -> bool {
        self.armed
    }

    /// Arms the timer, replacing any window still running.
    pub fn schedule(&mut self) -> Cmd {
        self.tag = self.tag.wrapping_add(1);
        self.armed = true;
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.window, move |_| Box::new(DebounceMsg { id, tag }) as Msg)
    }

    /// Disarms the timer. A tick already on its way is ignored.
    pub fn cancel(&mut self) {
        if self.armed {
            self.tag = self.tag.wrapping_add(1);
            self.armed = false;
        }
    }

    /// Returns true exactly once per burst: when `msg` is the tick of the
    /// live schedule. Ticks of other debouncers and superseded ticks return
    /// false.
    pub fn update(&mut self, msg: &Msg) -> bool {
        match msg.downcast_ref::<DebounceMsg>() {
            Some(tick) => self.elapsed(tick),
            None => false,
        }
    }

    fn elapsed(&mut self, tick: &DebounceMsg) -> bool {
        if tick.id != self.id || tick.tag != self.tag || !self.armed {
            return false;
        }
        self.armed = false;
        true
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
