//! Previous/next pager for server-side pagination.
//!
//! The widget holds no state of its own beyond what it was last synced with:
//! the current page, the page count, and the reset epoch of the list those
//! values came from. It renders `Page X of Y` between two controls and emits
//! a [`PageRequestMsg`] when one of them is used. A control whose target
//! would fall outside `1..=page_count` is inert and emits nothing.
//!
//! ```rust
//! use maillog_browser::paginator::{Model, PageState};
//!
//! let mut pager = Model::new();
//! pager.sync(PageState { current_page: 2, page_count: 3 }, 0);
//! assert_eq!(pager.view_plain(), "‹ prev  Page 2 of 3  next ›");
//! assert_eq!(pager.next_request().map(|r| r.page), Some(3));
//! ```

use crate::key::{self, Binding, KeyMap as KeyMapTrait};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;
use std::time::Duration;

/// Page position of the list, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub page_count: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_count: 1,
        }
    }
}

/// Request to show another page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequestMsg {
    /// Target page, within `1..=page_count` of the state it came from.
    pub page: u32,
    /// Reset epoch of the list state the pager was showing.
    pub epoch: u64,
}

/// Key bindings of the pager.
#[derive(Debug, Clone)]
pub struct PaginatorKeyMap {
    pub prev_page: Binding,
    pub next_page: Binding,
}

impl Default for PaginatorKeyMap {
    fn default() -> Self {
        Self {
            prev_page: Binding::new(vec![KeyCode::PageUp, KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h", "prev page"),
            next_page: Binding::new(vec![
                KeyCode::PageDown,
                KeyCode::Right,
                KeyCode::Char('l'),
            ])
            .with_help("→/l", "next page"),
        }
    }
}

impl KeyMapTrait for PaginatorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev_page, &self.next_page]
    }
}

/// Styles of the pager controls.
#[derive(Debug, Clone)]
pub struct Styles {
    pub active: Style,
    pub inert: Style,
    pub label: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            active: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            inert: Style::new().foreground(AdaptiveColor {
                Light: "#DDDADA",
                Dark: "#3C3C3C",
            }),
            label: Style::new().bold(true),
        }
    }
}

/// The pager widget.
#[derive(Debug, Clone)]
pub struct Model {
    state: PageState,
    epoch: u64,
    pub keymap: PaginatorKeyMap,
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            state: PageState::default(),
            epoch: 0,
            keymap: PaginatorKeyMap::default(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// A pager showing page 1 of 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts the list's page position. A page count of zero is shown as 1.
    pub fn sync(&mut self, state: PageState, epoch: u64) {
        self.state = PageState {
            current_page: state.current_page.max(1),
            page_count: state.page_count.max(1),
        };
        self.epoch = epoch;
        self.keymap.prev_page.set_enabled(self.has_prev());
        self.keymap.next_page.set_enabled(self.has_next());
    }

    /// Page position last synced.
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Current page, 1-based.
    pub fn page(&self) -> u32 {
        self.state.current_page
    }

    /// Total pages, at least 1.
    pub fn page_count(&self) -> u32 {
        self.state.page_count
    }

    /// Whether the previous control is active.
    pub fn has_prev(&self) -> bool {
        self.state.current_page > 1
    }

    /// Whether the next control is active.
    pub fn has_next(&self) -> bool {
        self.state.current_page < self.state.page_count
    }

    /// Request the previous control would emit, if it is active. When the
    /// page count shrank below the current page, this targets the last page.
    pub fn prev_request(&self) -> Option<PageRequestMsg> {
        self.has_prev().then(|| PageRequestMsg {
            page: (self.state.current_page - 1).min(self.state.page_count),
            epoch: self.epoch,
        })
    }

    /// Request the next control would emit, if it is active.
    pub fn next_request(&self) -> Option<PageRequestMsg> {
        self.has_next().then(|| PageRequestMsg {
            page: self.state.current_page + 1,
            epoch: self.epoch,
        })
    }

    /// Command emitting the previous page request, if any.
    pub fn prev_page(&self) -> Option<Cmd> {
        self.prev_request().map(emit)
    }

    /// Command emitting the next page request, if any.
    pub fn next_page(&self) -> Option<Cmd> {
        self.next_request().map(emit)
    }

    /// Handles the pager keys. The page itself only changes once the list
    /// has fetched it and synced the pager again.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.keymap.next_page.matches(key_msg) {
            self.next_page()
        } else if self.keymap.prev_page.matches(key_msg) {
            self.prev_page()
        } else {
            None
        }
    }

    /// Unstyled rendering, `‹ prev  Page X of Y  next ›`.
    pub fn view_plain(&self) -> String {
        format!("‹ prev  {}  next ›", self.label())
    }

    /// Styled rendering of the controls and label.
    pub fn view(&self) -> String {
        let control = |active: bool, text: &str| {
            if active {
                self.styles.active.clone().render(text)
            } else {
                self.styles.inert.clone().render(text)
            }
        };
        format!(
            "{}  {}  {}",
            control(self.has_prev(), "‹ prev"),
            self.styles.label.clone().render(&self.label()),
            control(self.has_next(), "next ›"),
        )
    }

    fn label(&self) -> String {
        format!(
            "Page {} of {}",
            self.state.current_page, self.state.page_count
        )
    }
}

fn emit(request: PageRequestMsg) -> Cmd {
    bubbletea_tick(Duration::from_nanos(1), move |_| Box::new(request) as Msg)
}
