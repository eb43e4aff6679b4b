//! The terminal front end.
//!
//! [`App`] is the top-level bubbletea model. It owns the settings store, the
//! list controller, the pager and the loading spinner, translates key presses
//! into controller operations and renders the result. All paging and fetch
//! decisions stay in [`ListController`]; the app only keeps view state
//! (cursor, input buffers, transient notices).

mod keys;
mod style;
mod view;

#[cfg(test)]
mod tests;

pub use keys::{BrowseKeyMap, DetailKeyMap, InputKeyMap};
pub use style::AppStyles;

use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use once_cell::sync::OnceCell;
use std::time::Duration;

use crate::api::EmailApi;
use crate::config::Config;
use crate::controller::ListController;
use crate::email::EmailRecord;
use crate::paginator;
use crate::settings::{
    FileBackend, MemoryBackend, SettingsLoadedMsg, SettingsSavedMsg, SettingsStore,
};
use crate::spinner;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Installs the configuration the next [`App::init`] starts from.
///
/// Only the first call has an effect; without one the app runs on
/// [`Config::default`].
pub fn configure(config: Config) {
    if CONFIG.set(config).is_err() {
        log::warn!("Configuration already installed; keeping the first one");
    }
}

/// Longest page size the settings dialog accepts, in digits.
const PAGE_SIZE_DIGITS: usize = 4;

/// What the keyboard currently drives.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    Search,
    Settings { input: String },
    Detail(Box<EmailRecord>),
}

/// Result of copying a record id to the system clipboard.
#[derive(Debug, Clone)]
pub struct CopiedMsg(pub Result<String, String>);

/// Carries the first finished half of a [`join`]ed pair of commands together
/// with the half still running.
pub struct JoinedMsg {
    msg: Option<Msg>,
    rest: Cmd,
}

/// Runs two commands concurrently. The message of whichever finishes first
/// is delivered right away; the other one follows when it is done.
pub fn join(first: Cmd, second: Cmd) -> Cmd {
    Box::pin(async move {
        let mut first = tokio::spawn(first);
        let mut second = tokio::spawn(second);
        let (msg, pending) = tokio::select! {
            done = &mut first => (done.ok().flatten(), second),
            done = &mut second => (done.ok().flatten(), first),
        };
        let rest: Cmd = Box::pin(async move { pending.await.ok().flatten() });
        Some(Box::new(JoinedMsg { msg, rest }) as Msg)
    })
}

fn merge(cmd: Option<Cmd>, other: Option<Cmd>) -> Option<Cmd> {
    match (cmd, other) {
        (Some(a), Some(b)) => Some(join(a, b)),
        (a, b) => a.or(b),
    }
}

pub struct App {
    pub(crate) settings: SettingsStore,
    pub(crate) list: ListController,
    pub(crate) pager: paginator::Model,
    pub(crate) spinner: spinner::Model,
    pub(crate) mode: Mode,
    pub(crate) cursor: usize,
    pub(crate) notice: Option<String>,
    pub(crate) full_help: bool,
    pub(crate) width: usize,
    pub(crate) height: usize,

    pub browse_keys: BrowseKeyMap,
    pub input_keys: InputKeyMap,
    pub detail_keys: DetailKeyMap,
    pub styles: AppStyles,
}

impl App {
    /// Builds the app and the command that loads the stored settings, which
    /// in turn triggers the first fetch.
    pub fn new(api: EmailApi, settings: SettingsStore, debounce: Duration) -> (Self, Cmd) {
        let mut app = Self {
            settings,
            list: ListController::new(api, debounce),
            pager: paginator::Model::new(),
            spinner: spinner::Model::new(),
            mode: Mode::Browse,
            cursor: 0,
            notice: None,
            full_help: false,
            width: 0,
            height: 0,
            browse_keys: BrowseKeyMap::default(),
            input_keys: InputKeyMap::default(),
            detail_keys: DetailKeyMap::default(),
            styles: AppStyles::default(),
        };
        let cmd = app.settings.init();
        (app, cmd)
    }

    pub fn from_config(config: &Config) -> (Self, Cmd) {
        let api = match EmailApi::new(config.base_url.clone(), config.timeout) {
            Ok(api) => api,
            Err(e) => {
                log::warn!("HTTP client setup failed ({}); using defaults", e);
                EmailApi::with_client(reqwest::Client::new(), config.base_url.clone())
            }
        };
        let store = match &config.settings_path {
            Some(path) => SettingsStore::new(FileBackend::new(path)),
            None => SettingsStore::new(MemoryBackend::new()),
        };
        log::info!("Browsing {}", config.base_url);
        Self::new(api, store, config.debounce)
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Record under the cursor.
    pub fn selected(&self) -> Option<&EmailRecord> {
        self.list.records().get(self.cursor)
    }

    fn handle_key(&mut self, msg: &Msg, key: &KeyMsg) -> Option<Cmd> {
        if key.key == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(bubbletea_rs::quit());
        }
        match self.mode {
            Mode::Browse => self.browse_key(msg, key),
            Mode::Search => self.search_key(key),
            Mode::Settings { .. } => self.settings_key(key),
            Mode::Detail(_) => self.detail_key(key),
        }
    }

    fn browse_key(&mut self, msg: &Msg, key: &KeyMsg) -> Option<Cmd> {
        let keys = &self.browse_keys;
        if keys.quit.matches(key) {
            return Some(bubbletea_rs::quit());
        }
        if keys.cursor_up.matches(key) {
            self.cursor = self.cursor.saturating_sub(1);
            return None;
        }
        if keys.cursor_down.matches(key) {
            self.cursor += 1;
            return None;
        }
        if keys.search.matches(key) {
            self.mode = Mode::Search;
            return None;
        }
        if keys.cycle_field.matches(key) {
            let next = self.list.filter().search_field.next();
            return self.list.set_search_field(next);
        }
        if keys.cycle_status.matches(key) {
            let next = self.list.filter().status.next();
            return self.list.set_status_filter(next);
        }
        if keys.open_detail.matches(key) {
            if let Some(record) = self.selected().cloned() {
                self.mode = Mode::Detail(Box::new(record));
            }
            return None;
        }
        if keys.settings.matches(key) {
            self.mode = Mode::Settings {
                input: self.list.settings().page_size.to_string(),
            };
            return None;
        }
        if keys.refresh.matches(key) {
            return self.list.refresh();
        }
        if keys.copy_id.matches(key) {
            return self.copy_selected_id();
        }
        if keys.help.matches(key) {
            self.full_help = !self.full_help;
            return None;
        }
        self.pager.update(msg)
    }

    fn search_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        let keys = &self.input_keys;
        if keys.accept.matches(key) || keys.cancel.matches(key) {
            self.mode = Mode::Browse;
            return None;
        }
        if keys.clear.matches(key) {
            return self.list.set_search_value("");
        }
        if keys.cycle_field.matches(key) {
            let next = self.list.filter().search_field.next();
            return self.list.set_search_field(next);
        }
        if keys.delete_back.matches(key) {
            let mut value = self.list.filter().search_value.clone();
            value.pop();
            return self.list.set_search_value(value);
        }
        match typed_char(key) {
            Some(c) => {
                let mut value = self.list.filter().search_value.clone();
                value.push(c);
                self.list.set_search_value(value)
            }
            None => None,
        }
    }

    fn settings_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        let Mode::Settings { input } = &mut self.mode else {
            return None;
        };
        let keys = &self.input_keys;
        if keys.cancel.matches(key) {
            self.mode = Mode::Browse;
            return None;
        }
        if keys.accept.matches(key) {
            let pending = std::mem::take(input);
            self.mode = Mode::Browse;
            return Some(self.settings.submit(&pending));
        }
        if keys.clear.matches(key) {
            input.clear();
            return None;
        }
        if keys.delete_back.matches(key) {
            input.pop();
            return None;
        }
        if let Some(c) = typed_char(key) {
            if c.is_ascii_digit() && input.len() < PAGE_SIZE_DIGITS {
                input.push(c);
            }
        }
        None
    }

    fn detail_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if self.detail_keys.copy_id.matches(key) {
            return self.copy_selected_id();
        }
        if self.detail_keys.close.matches(key) {
            self.mode = Mode::Browse;
        }
        None
    }

    fn copy_selected_id(&mut self) -> Option<Cmd> {
        let id = match &self.mode {
            Mode::Detail(record) => record.id(),
            _ => self.selected().and_then(EmailRecord::id),
        };
        match id {
            Some(id) => Some(copy_to_clipboard(id)),
            None => {
                self.notice = Some("Nothing to copy".to_string());
                None
            }
        }
    }

    /// Brings the pager, spinner and cursor in line with the controller.
    fn sync(&mut self, cmd: Option<Cmd>) -> Option<Cmd> {
        self.pager
            .sync(self.list.page_state(), self.list.reset_epoch());

        let rows = self.list.records().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));

        if self.list.loading() {
            merge(cmd, self.spinner.start())
        } else {
            self.spinner.stop();
            cmd
        }
    }
}

/// Printable character of a key press without control or alt held.
fn typed_char(key: &KeyMsg) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.key {
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

fn copy_to_clipboard(text: String) -> Cmd {
    bubbletea_tick(Duration::from_nanos(1), move |_| {
        #[cfg(feature = "clipboard-support")]
        {
            use clipboard::{ClipboardContext, ClipboardProvider};
            let text = text.clone();
            let res: Result<String, String> = (|| {
                let mut ctx: ClipboardContext = ClipboardProvider::new()
                    .map_err(|e| format!("Failed to open clipboard: {}", e))?;
                ctx.set_contents(text.clone())
                    .map_err(|e| format!("Failed to write clipboard: {}", e))?;
                Ok(text)
            })();
            Box::new(CopiedMsg(res)) as Msg
        }
        #[cfg(not(feature = "clipboard-support"))]
        {
            let _ = &text;
            Box::new(CopiedMsg(Err("Clipboard support not enabled".to_string()))) as Msg
        }
    })
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let config = CONFIG.get().cloned().unwrap_or_default();
        let (app, cmd) = App::from_config(&config);
        (app, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match msg.downcast::<JoinedMsg>() {
            Ok(joined) => {
                let JoinedMsg { msg, rest } = *joined;
                let cmd = msg.and_then(|msg| self.update(msg));
                return merge(cmd, Some(rest));
            }
            Err(msg) => msg,
        };

        if let Some(size) = msg.downcast_ref::<bubbletea_rs::WindowSizeMsg>() {
            self.width = size.width as usize;
            self.height = size.height as usize;
            return None;
        }
        if msg.downcast_ref::<spinner::TickMsg>().is_some() {
            return self.spinner.update(&msg);
        }
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            self.notice = None;
            let cmd = self.handle_key(&msg, key);
            return self.sync(cmd);
        }
        if let Some(CopiedMsg(result)) = msg.downcast_ref::<CopiedMsg>() {
            self.notice = Some(match result {
                Ok(text) => format!("Copied {}", text),
                Err(e) => {
                    log::warn!("{}", e);
                    e.clone()
                }
            });
            return None;
        }
        if let Some(SettingsLoadedMsg(settings)) = msg.downcast_ref::<SettingsLoadedMsg>() {
            self.notice = Some(format!("Page size {}", settings.page_size));
        }
        if let Some(SettingsSavedMsg(settings)) = msg.downcast_ref::<SettingsSavedMsg>() {
            self.notice = Some(format!("Saved page size {}", settings.page_size));
        }

        let cmd = self.list.update(msg);
        self.sync(cmd)
    }

    fn view(&self) -> String {
        self.render()
    }
}
