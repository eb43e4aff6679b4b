//! Key bindings of the browser screens.

use crate::key::{Binding, KeyMap};
use crossterm::event::{KeyCode, KeyModifiers};

/// Bindings while browsing the record table.
#[derive(Debug, Clone)]
pub struct BrowseKeyMap {
    pub cursor_up: Binding,
    pub cursor_down: Binding,
    pub search: Binding,
    pub cycle_field: Binding,
    pub cycle_status: Binding,
    pub open_detail: Binding,
    pub settings: Binding,
    pub refresh: Binding,
    pub copy_id: Binding,
    pub help: Binding,
    pub quit: Binding,
}

impl Default for BrowseKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')]).with_help("↑/k", "up"),
            cursor_down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "down"),
            search: Binding::new(vec![KeyCode::Char('/')]).with_help("/", "search"),
            cycle_field: Binding::new(vec![KeyCode::Char('f'), KeyCode::Tab])
                .with_help("f", "search field"),
            cycle_status: Binding::new(vec![KeyCode::Char('t')]).with_help("t", "status"),
            open_detail: Binding::new(vec![KeyCode::Enter]).with_help("enter", "details"),
            settings: Binding::new(vec![KeyCode::Char('s')]).with_help("s", "settings"),
            refresh: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reload"),
            copy_id: Binding::new(vec![KeyCode::Char('y')]).with_help("y", "copy id"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "more"),
            quit: Binding::new(vec![KeyCode::Char('q')])
                .with_chord(KeyCode::Char('c'), KeyModifiers::CONTROL)
                .with_help("q", "quit"),
        }
    }
}

impl KeyMap for BrowseKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.search,
            &self.cycle_field,
            &self.cycle_status,
            &self.open_detail,
            &self.settings,
            &self.help,
            &self.quit,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.cursor_up, &self.cursor_down, &self.open_detail],
            vec![&self.search, &self.cycle_field, &self.cycle_status],
            vec![&self.settings, &self.refresh, &self.copy_id],
            vec![&self.help, &self.quit],
        ]
    }
}

/// Bindings of the single-line inputs (search box, settings dialog).
#[derive(Debug, Clone)]
pub struct InputKeyMap {
    pub accept: Binding,
    pub cancel: Binding,
    pub delete_back: Binding,
    pub clear: Binding,
    pub cycle_field: Binding,
}

impl Default for InputKeyMap {
    fn default() -> Self {
        Self {
            accept: Binding::new(vec![KeyCode::Enter]).with_help("enter", "done"),
            cancel: Binding::new(vec![KeyCode::Esc]).with_help("esc", "cancel"),
            delete_back: Binding::new(vec![KeyCode::Backspace]),
            clear: Binding::new(vec![])
                .with_chord(KeyCode::Char('u'), KeyModifiers::CONTROL)
                .with_help("ctrl+u", "clear"),
            cycle_field: Binding::new(vec![KeyCode::Tab]).with_help("tab", "search field"),
        }
    }
}

impl KeyMap for InputKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.accept, &self.cancel, &self.clear, &self.cycle_field]
    }
}

/// Bindings of the record detail pane.
#[derive(Debug, Clone)]
pub struct DetailKeyMap {
    pub close: Binding,
    pub copy_id: Binding,
}

impl Default for DetailKeyMap {
    fn default() -> Self {
        Self {
            close: Binding::new(vec![KeyCode::Esc, KeyCode::Enter, KeyCode::Char('q')])
                .with_help("esc", "close"),
            copy_id: Binding::new(vec![KeyCode::Char('y')]).with_help("y", "copy id"),
        }
    }
}

impl KeyMap for DetailKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.close, &self.copy_id]
    }
}
