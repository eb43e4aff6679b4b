//! Indeterminate activity indicator shown while a page is being fetched.
//!
//! The spinner only ticks between [`Model::start`] and [`Model::stop`].
//! Ticks carry the spinner's id and a tag; stopping bumps the tag so the
//! tick already in flight is dropped instead of keeping the animation alive.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Animation frames and their rate.
#[derive(Debug, Clone)]
pub struct Spinner {
    pub frames: Vec<String>,
    pub fps: Duration,
}

pub static DOT: Lazy<Spinner> = Lazy::new(|| Spinner {
    frames: ["⣾ ", "⣽ ", "⣻ ", "⢿ ", "⡿ ", "⣟ ", "⣯ ", "⣷ "]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    fps: Duration::from_millis(100),
});

pub static LINE: Lazy<Spinner> = Lazy::new(|| Spinner {
    frames: ["|", "/", "-", "\\"].iter().map(|s| s.to_string()).collect(),
    fps: Duration::from_millis(100),
});

/// Advances the spinner by one frame.
#[derive(Debug, Clone, Copy)]
pub struct TickMsg {
    pub id: i64,
    tag: u64,
}

#[derive(Debug)]
pub struct Model {
    pub spinner: Spinner,
    pub style: Style,
    frame: usize,
    id: i64,
    tag: u64,
    spinning: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Self {
            spinner: DOT.clone(),
            style: Style::new().foreground(AdaptiveColor {
                Light: "#8E8E8E",
                Dark: "#747373",
            }),
            frame: 0,
            id: next_id(),
            tag: 0,
            spinning: false,
        }
    }

    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn spinning(&self) -> bool {
        self.spinning
    }

    /// Starts the animation. Returns `None` if it is already running.
    pub fn start(&mut self) -> Option<Cmd> {
        if self.spinning {
            return None;
        }
        self.spinning = true;
        self.tag = self.tag.wrapping_add(1);
        Some(self.tick())
    }

    /// Stops the animation and rewinds to the first frame.
    pub fn stop(&mut self) {
        if self.spinning {
            self.spinning = false;
            self.tag = self.tag.wrapping_add(1);
            self.frame = 0;
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.spinner.fps, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<TickMsg>()?;
        if !self.spinning || tick.id != self.id || tick.tag != self.tag {
            return None;
        }
        self.frame = (self.frame + 1) % self.spinner.frames.len().max(1);
        self.tag = self.tag.wrapping_add(1);
        Some(self.tick())
    }

    /// Current frame, or nothing when stopped.
    pub fn view(&self) -> String {
        if !self.spinning {
            return String::new();
        }
        match self.spinner.frames.get(self.frame) {
            Some(frame) => self.style.render(frame),
            None => String::new(),
        }
    }
}
