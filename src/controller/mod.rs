//! The list controller: filter state, paging and the fetch pipeline.
//!
//! [`ListController`] owns everything the record list shows and decides when
//! to ask the query endpoint for a page. It reacts to three kinds of input:
//!
//! - **Filter edits** ([`set_search_value`](ListController::set_search_value),
//!   [`set_search_field`](ListController::set_search_field),
//!   [`set_status_filter`](ListController::set_status_filter)) reset paging to
//!   page 1 and schedule a debounced refetch. A burst of edits produces one
//!   fetch, one window after the last edit, for the state as of that moment.
//! - **Page requests** from the pager fetch immediately, without debounce.
//! - **Settings notifications** adopt the new page size and schedule a
//!   debounced refetch when it changed, or on the very first load.
//!
//! Every fetch is tagged with an increasing sequence number. A completion
//! whose sequence number is not the latest issued is dropped, so a slow
//! response can never overwrite the result of a later request.
//!
//! # Driving the controller
//!
//! ```rust,no_run
//! use maillog_browser::api::EmailApi;
//! use maillog_browser::controller::ListController;
//! use maillog_browser::settings::{Settings, SettingsLoadedMsg};
//! use std::time::Duration;
//!
//! let api = EmailApi::new(
//!     "http://localhost:5000/api/emails".parse().unwrap(),
//!     Duration::from_secs(10),
//! )
//! .unwrap();
//! let mut list = ListController::new(api, Duration::from_millis(1000));
//!
//! // Settings arrive first; this schedules the initial fetch.
//! let _cmd = list.update(Box::new(SettingsLoadedMsg(Settings::default())));
//!
//! // Typing restarts the debounce window each time.
//! let _cmd = list.set_search_value("bounced@x.com");
//! ```

use bubbletea_rs::{Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::api::{EmailApi, PageQuery};
use crate::debounce::{DebounceMsg, Debouncer};
use crate::email::{EmailRecord, FetchResult};
use crate::error::FetchError;
use crate::filter::{FilterState, SearchField, StatusFilter};
use crate::paginator::{PageRequestMsg, PageState};
use crate::settings::{Settings, SettingsLoadedMsg, SettingsSavedMsg};

#[cfg(test)]
mod tests;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Outcome of one issued fetch.
#[derive(Debug)]
pub struct FetchCompletedMsg {
    /// Controller that issued the fetch.
    pub id: i64,
    /// Sequence number the fetch was issued with.
    pub seq: u64,
    pub result: Result<FetchResult, FetchError>,
}

/// State machine behind the record list.
#[derive(Debug)]
pub struct ListController {
    id: i64,
    api: EmailApi,

    filter: FilterState,
    page: PageState,
    // Bumped by every programmatic page reset; page requests made against an
    // older epoch are dropped.
    reset_epoch: u64,

    settings: Settings,
    settings_loaded: bool,

    records: Vec<EmailRecord>,
    loading: bool,
    error: Option<String>,

    debounce: Debouncer,
    fetch_seq: u64,
    last_query: Option<PageQuery>,
}

impl ListController {
    /// Creates an idle controller. Nothing is fetched until settings load.
    pub fn new(api: EmailApi, debounce_window: Duration) -> Self {
        Self {
            id: next_id(),
            api,
            filter: FilterState::default(),
            page: PageState::default(),
            reset_epoch: 0,
            settings: Settings::default(),
            settings_loaded: false,
            records: Vec::new(),
            loading: false,
            error: None,
            debounce: Debouncer::new(debounce_window),
            fetch_seq: 0,
            last_query: None,
        }
    }

    /// Identifier stamped on this controller's fetch completions.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current filter bar state.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Page position as of the latest applied fetch or page reset.
    pub fn page_state(&self) -> PageState {
        self.page
    }

    /// Number of programmatic page resets so far.
    pub fn reset_epoch(&self) -> u64 {
        self.reset_epoch
    }

    /// Settings snapshot last adopted from the store.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Records of the latest successful fetch.
    pub fn records(&self) -> &[EmailRecord] {
        &self.records
    }

    /// True while the latest issued fetch is outstanding.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Description of the latest failed fetch, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The shared refetch timer.
    pub fn debouncer(&self) -> &Debouncer {
        &self.debounce
    }

    /// Query of the most recently issued fetch.
    pub fn last_query(&self) -> Option<&PageQuery> {
        self.last_query.as_ref()
    }

    /// Number of fetches issued so far, which is also the latest sequence
    /// number.
    pub fn fetches_issued(&self) -> u64 {
        self.fetch_seq
    }

    /// Query for the current filter, page and page size.
    pub fn current_query(&self) -> PageQuery {
        PageQuery {
            filter: self.filter.effective_filter(),
            page: self.page.current_page,
            limit: self.settings.page_size,
        }
    }

    /// Replaces the search text. A change resets paging and restarts the
    /// debounce window.
    pub fn set_search_value(&mut self, value: impl Into<String>) -> Option<Cmd> {
        let value = value.into();
        if value == self.filter.search_value {
            return None;
        }
        self.filter.search_value = value;
        Some(self.filter_changed())
    }

    /// Changing the field only matters once there is a value to match.
    pub fn set_search_field(&mut self, field: SearchField) -> Option<Cmd> {
        if field == self.filter.search_field {
            return None;
        }
        self.filter.search_field = field;
        if self.filter.search_value.is_empty() {
            return None;
        }
        Some(self.filter_changed())
    }

    /// Replaces the status filter, with the same effect as a search edit.
    pub fn set_status_filter(&mut self, status: StatusFilter) -> Option<Cmd> {
        if status == self.filter.status {
            return None;
        }
        self.filter.status = status;
        Some(self.filter_changed())
    }

    /// Shows page `page` right away. Requests for page 0 or the page already
    /// shown are ignored, as is anything before the settings are loaded.
    /// The fetch covers any pending debounced refetch, which is cancelled.
    pub fn request_page(&mut self, page: u32) -> Option<Cmd> {
        if page == 0 || page == self.page.current_page {
            return None;
        }
        self.page.current_page = page;
        if !self.settings_loaded {
            return None;
        }
        self.debounce.cancel();
        Some(self.fetch())
    }

    /// Refetches the current page immediately.
    pub fn refresh(&mut self) -> Option<Cmd> {
        if !self.settings_loaded {
            return None;
        }
        self.debounce.cancel();
        Some(self.fetch())
    }

    /// Adopts the stored settings; the first load always schedules a fetch.
    pub fn on_settings_loaded(&mut self, settings: Settings) -> Option<Cmd> {
        self.adopt_settings(settings)
    }

    /// Adopts saved settings, refetching only when the page size changed.
    pub fn on_settings_saved(&mut self, settings: Settings) -> Option<Cmd> {
        self.adopt_settings(settings)
    }

    /// Routes settings notifications, page requests, debounce ticks and
    /// fetch completions. Other messages are ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(SettingsLoadedMsg(settings)) = msg.downcast_ref::<SettingsLoadedMsg>() {
            return self.on_settings_loaded(*settings);
        }
        if let Some(SettingsSavedMsg(settings)) = msg.downcast_ref::<SettingsSavedMsg>() {
            return self.on_settings_saved(*settings);
        }
        if let Some(request) = msg.downcast_ref::<PageRequestMsg>() {
            if request.epoch != self.reset_epoch {
                log::debug!(
                    "Dropping request for page {} made before a page reset",
                    request.page
                );
                return None;
            }
            return self.request_page(request.page);
        }
        if msg.downcast_ref::<DebounceMsg>().is_some() {
            if !self.debounce.update(&msg) {
                return None;
            }
            if !self.settings_loaded {
                // The loaded notification schedules the first fetch itself.
                return None;
            }
            return Some(self.fetch());
        }
        if let Ok(done) = msg.downcast::<FetchCompletedMsg>() {
            self.complete(*done);
        }
        None
    }

    fn adopt_settings(&mut self, settings: Settings) -> Option<Cmd> {
        let changed = settings.page_size != self.settings.page_size;
        let first = !self.settings_loaded;
        log::info!(
            "Page size {} -> {}",
            self.settings.page_size,
            settings.page_size
        );
        self.settings = settings;
        self.settings_loaded = true;
        if changed || first {
            Some(self.debounce.schedule())
        } else {
            None
        }
    }

    fn filter_changed(&mut self) -> Cmd {
        self.reset_page();
        self.debounce.schedule()
    }

    fn reset_page(&mut self) {
        self.reset_epoch += 1;
        self.page = PageState::default();
    }

    fn fetch(&mut self) -> Cmd {
        self.fetch_seq += 1;
        self.loading = true;

        let query = self.current_query();
        self.last_query = Some(query.clone());
        log::debug!("Fetch #{} {:?}", self.fetch_seq, query);

        let api = self.api.clone();
        let id = self.id;
        let seq = self.fetch_seq;
        Box::pin(async move {
            let result = api.fetch_page(&query).await;
            Some(Box::new(FetchCompletedMsg { id, seq, result }) as Msg)
        })
    }

    fn complete(&mut self, done: FetchCompletedMsg) {
        if done.id != self.id {
            return;
        }
        if done.seq != self.fetch_seq {
            log::debug!(
                "Discarding stale response #{} (latest #{})",
                done.seq,
                self.fetch_seq
            );
            return;
        }
        self.loading = false;
        match done.result {
            Ok(page) => {
                self.records = page.records;
                self.page.page_count = page.page_count.max(1);
                self.error = None;
            }
            Err(e) => {
                log::warn!("Fetch #{} failed: {}", done.seq, e);
                self.error = Some(e.to_string());
            }
        }
    }
}
