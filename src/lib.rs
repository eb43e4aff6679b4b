#![doc(html_root_url = "https://docs.rs/maillog-browser/")]

//! # maillog-browser
//!
//! A terminal browser for mail delivery logs. Records come from a paginated
//! query endpoint (`GET <base>?<field>=<value>&page=N&limit=M`) and are shown
//! in a filterable, paged table built on [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! The interesting part is the list state machine in [`controller`]:
//!
//! - Filter edits reset paging to page 1 and schedule a **debounced** refetch,
//!   so a burst of keystrokes issues one request for the final filter.
//! - Page requests fetch immediately.
//! - A page-size change from the settings dialog refetches the current page
//!   with the new limit.
//! - Every fetch carries a sequence number and only the latest one is applied.
//!
//! Everything around it follows the Elm architecture: components expose
//! `update()` returning an optional [`Cmd`](bubbletea_rs::Cmd) and a `view()`
//! rendering a string, and the top-level [`app::App`] wires them together.
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`filter`] | Search field, search value and status filter |
//! | [`email`] | Mail log records and the response envelope |
//! | [`api`] | Query URL building and the HTTP client |
//! | [`debounce`] | Single coalescing timer |
//! | [`settings`] | Persisted page size |
//! | [`paginator`] | Prev/next pager |
//! | [`controller`] | The list state machine |
//! | [`spinner`] | Loading indicator |
//! | [`app`] | Top-level model, keys and views |
//!
//! ## Driving the list without a terminal
//!
//! ```rust
//! use maillog_browser::prelude::*;
//! use std::time::Duration;
//!
//! let api = EmailApi::new(
//!     "http://localhost:5000/api/emails".parse().unwrap(),
//!     Duration::from_secs(5),
//! )
//! .unwrap();
//! let mut list = ListController::new(api, Duration::from_millis(1000));
//!
//! let _cmd = list.on_settings_loaded(Settings::default());
//! let _cmd = list.set_status_filter(StatusFilter::Code("bounced".into()));
//! assert_eq!(list.page_state().current_page, 1);
//! assert_eq!(
//!     list.current_query().pairs(),
//!     vec![
//!         ("status.code".to_string(), "bounced".to_string()),
//!         ("page".to_string(), "1".to_string()),
//!         ("limit".to_string(), "20".to_string()),
//!     ]
//! );
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod email;
pub mod error;
pub mod filter;
pub mod key;
pub mod paginator;
pub mod settings;
pub mod spinner;

pub use api::{EmailApi, PageQuery};
pub use app::App;
pub use config::{CliArgs, Config};
pub use controller::{FetchCompletedMsg, ListController};
pub use debounce::{DebounceMsg, Debouncer};
pub use email::{EmailRecord, FetchResult};
pub use error::{ConfigError, FetchError, SettingsError};
pub use filter::{FilterState, SearchField, StatusFilter};
pub use key::{Binding, KeyMap};
pub use paginator::{Model as Paginator, PageRequestMsg, PageState};
pub use settings::{
    FileBackend, MemoryBackend, Settings, SettingsBackend, SettingsLoadedMsg, SettingsSavedMsg,
    SettingsStore,
};
pub use spinner::Model as Spinner;

/// Everything needed to drive the list from your own code.
pub mod prelude {
    pub use crate::api::{EmailApi, PageQuery};
    pub use crate::app::App;
    pub use crate::controller::{FetchCompletedMsg, ListController};
    pub use crate::debounce::{DebounceMsg, Debouncer};
    pub use crate::email::{EmailRecord, FetchResult};
    pub use crate::error::FetchError;
    pub use crate::filter::{FilterState, SearchField, StatusFilter};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::paginator::{PageRequestMsg, PageState};
    pub use crate::settings::{
        MemoryBackend, Settings, SettingsLoadedMsg, SettingsSavedMsg, SettingsStore,
    };
}
