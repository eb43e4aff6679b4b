//! Tests for the list controller.
//!
//! Commands are never executed here. Timer expiry and fetch completion are
//! simulated by delivering the messages those commands would produce.

use super::*;
use crate::email::EmailRecord;
use serde_json::json;
use url::Url;

fn controller() -> ListController {
    let api = EmailApi::new(
        Url::parse("http://127.0.0.1:9/api/emails").unwrap(),
        Duration::from_secs(1),
    )
    .unwrap();
    ListController::new(api, Duration::from_millis(1000))
}

/// Delivers the tick of the live debounce schedule.
fn elapse(c: &mut ListController) -> Option<Cmd> {
    let tick = DebounceMsg {
        id: c.debouncer().id(),
        tag: c.debouncer().tag(),
    };
    c.update(Box::new(tick))
}

fn stale_tick(c: &ListController, tag: u64) -> Msg {
    Box::new(DebounceMsg {
        id: c.debouncer().id(),
        tag,
    })
}

fn records(ids: &[&str]) -> Vec<EmailRecord> {
    ids.iter()
        .map(|id| serde_json::from_value(json!({ "id": id })).unwrap())
        .collect()
}

fn complete(c: &mut ListController, seq: u64, result: Result<FetchResult, FetchError>) {
    let msg = FetchCompletedMsg {
        id: c.id(),
        seq,
        result,
    };
    assert!(c.update(Box::new(msg)).is_none());
}

fn ok_page(ids: &[&str], page_count: u32) -> Result<FetchResult, FetchError> {
    Ok(FetchResult {
        records: records(ids),
        page_count,
    })
}

fn server_error() -> Result<FetchResult, FetchError> {
    Err(FetchError::Status {
        status: 500,
        detail: Some("database unavailable".into()),
    })
}

/// Controller with default settings loaded and the first fetch answered.
fn ready() -> ListController {
    let mut c = controller();
    assert!(c.on_settings_loaded(Settings::default()).is_some());
    assert!(elapse(&mut c).is_some());
    complete(&mut c, 1, ok_page(&["A", "B"], 1));
    c
}

/// Controller showing page `page` of `count`.
fn on_page(page: u32, count: u32) -> ListController {
    let mut c = ready();
    complete_page_count(&mut c, count);
    for p in 2..=page {
        assert!(c.request_page(p).is_some());
        let seq = c.fetches_issued();
        complete(&mut c, seq, ok_page(&["X"], count));
    }
    assert_eq!(
        c.page_state(),
        PageState {
            current_page: page,
            page_count: count
        }
    );
    c
}

fn complete_page_count(c: &mut ListController, count: u32) {
    assert!(c.refresh().is_some());
    let seq = c.fetches_issued();
    complete(c, seq, ok_page(&["A"], count));
}

#[test]
fn test_initial_state() {
    let c = controller();
    assert_eq!(c.page_state(), PageState::default());
    assert!(c.records().is_empty());
    assert!(!c.loading());
    assert_eq!(c.error(), None);
    assert_eq!(c.settings().page_size, 20);
    assert_eq!(c.fetches_issued(), 0);
}

#[test]
fn test_first_fetch_waits_for_settings() {
    let mut c = controller();
    assert!(c.set_search_value("E553").is_some());
    assert!(elapse(&mut c).is_none());
    assert!(c.request_page(2).is_none());
    assert!(c.refresh().is_none());
    assert_eq!(c.fetches_issued(), 0);
}

#[test]
fn test_settings_loaded_schedules_first_fetch() {
    let mut c = controller();
    let cmd = c.update(Box::new(SettingsLoadedMsg(Settings::default())));
    assert!(cmd.is_some());
    assert!(c.debouncer().pending());
    assert_eq!(c.fetches_issued(), 0);

    assert!(elapse(&mut c).is_some());
    assert_eq!(c.fetches_issued(), 1);
    assert!(c.loading());
}

#[test]
fn test_unfiltered_query() {
    let mut c = controller();
    let _ = c.on_settings_loaded(Settings::default());
    let _ = elapse(&mut c);

    let query = c.last_query().unwrap();
    assert!(query.filter.is_empty());
    assert_eq!(query.page, 1);
    assert_eq!(query.limit, 20);
    let url = query.url(&Url::parse("http://h/api/emails").unwrap());
    assert_eq!(url.query(), Some("page=1&limit=20"));
}

#[test]
fn test_burst_of_edits_fetches_once_with_last_state() {
    let mut c = ready();
    let before = c.fetches_issued();

    assert!(c.set_search_value("b").is_some());
    let first_tag = c.debouncer().tag();
    assert!(c.set_search_value("bounced@x.com").is_some());
    let second_tag = c.debouncer().tag();
    assert!(c.set_search_field(SearchField::MailTo).is_some());

    // Windows of the earlier edits were restarted and never fire.
    assert!(c.update(stale_tick(&c, first_tag)).is_none());
    assert!(c.update(stale_tick(&c, second_tag)).is_none());
    assert_eq!(c.fetches_issued(), before);

    assert!(elapse(&mut c).is_some());
    assert_eq!(c.fetches_issued(), before + 1);
    assert_eq!(
        c.last_query().unwrap().filter,
        vec![("mail_to".to_string(), "bounced@x.com".to_string())]
    );

    // Nothing else is pending.
    assert!(elapse(&mut c).is_none());
    assert_eq!(c.fetches_issued(), before + 1);
}

#[test]
fn test_filter_change_resets_page_before_fetch() {
    let mut c = on_page(3, 5);
    let epoch = c.reset_epoch();

    assert!(c
        .set_status_filter(StatusFilter::Code("bounced".into()))
        .is_some());
    assert_eq!(c.page_state(), PageState::default());
    assert_eq!(c.reset_epoch(), epoch + 1);

    let _ = elapse(&mut c);
    let query = c.last_query().unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(
        query.filter,
        vec![("status.code".to_string(), "bounced".to_string())]
    );
}

#[test]
fn test_field_change_without_value_does_nothing() {
    let mut c = on_page(2, 4);
    assert!(c.set_search_field(SearchField::MailFrom).is_none());
    assert_eq!(c.filter().search_field, SearchField::MailFrom);
    assert_eq!(c.page_state().current_page, 2);
    assert!(!c.debouncer().pending());
}

#[test]
fn test_unchanged_values_do_nothing() {
    let mut c = ready();
    assert!(c.set_search_value("").is_none());
    assert!(c.set_status_filter(StatusFilter::Any).is_none());
    assert!(c.set_search_field(SearchField::Id).is_none());
    assert!(!c.debouncer().pending());
}

#[test]
fn test_clearing_search_value_refetches() {
    let mut c = ready();
    let _ = c.set_search_value("E553");
    let _ = elapse(&mut c);
    assert!(c.set_search_value("").is_some());
    let _ = elapse(&mut c);
    assert!(c.last_query().unwrap().filter.is_empty());
}

#[test]
fn test_page_request_fetches_immediately() {
    let mut c = ready();
    complete_page_count(&mut c, 5);
    let before = c.fetches_issued();

    let request = PageRequestMsg {
        page: 2,
        epoch: c.reset_epoch(),
    };
    assert!(c.update(Box::new(request)).is_some());
    assert_eq!(c.fetches_issued(), before + 1);
    assert_eq!(c.page_state().current_page, 2);
    assert_eq!(c.last_query().unwrap().page, 2);
    assert!(!c.debouncer().pending());
}

#[test]
fn test_page_request_from_before_reset_is_suppressed() {
    let mut c = on_page(2, 5);
    let stale = PageRequestMsg {
        page: 3,
        epoch: c.reset_epoch(),
    };
    let _ = c.set_search_value("x");
    let before = c.fetches_issued();

    assert!(c.update(Box::new(stale)).is_none());
    assert_eq!(c.page_state().current_page, 1);
    assert_eq!(c.fetches_issued(), before);
}

#[test]
fn test_request_same_or_zero_page_ignored() {
    let mut c = on_page(2, 3);
    assert!(c.request_page(2).is_none());
    assert!(c.request_page(0).is_none());
}

#[test]
fn test_stale_response_does_not_overwrite_newer() {
    let mut c = ready();
    complete_page_count(&mut c, 5);

    let _ = c.request_page(2);
    let seq_a = c.fetches_issued();
    let _ = c.request_page(3);
    let seq_b = c.fetches_issued();

    complete(&mut c, seq_b, ok_page(&["B1", "B2"], 5));
    assert!(!c.loading());
    complete(&mut c, seq_a, ok_page(&["A1"], 9));

    let ids: Vec<_> = c.records().iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["B1", "B2"]);
    assert_eq!(c.page_state().page_count, 5);
    assert_eq!(c.page_state().current_page, 3);
}

#[test]
fn test_stale_failure_is_ignored_too() {
    let mut c = ready();
    let _ = c.refresh();
    let seq_a = c.fetches_issued();
    let _ = c.refresh();
    let seq_b = c.fetches_issued();

    complete(&mut c, seq_a, server_error());
    assert!(c.loading());
    assert_eq!(c.error(), None);
    complete(&mut c, seq_b, ok_page(&["B"], 1));
    assert!(!c.loading());
}

#[test]
fn test_failure_keeps_previous_page() {
    let mut c = ready();
    complete_page_count(&mut c, 4);
    let records_before = c.records().to_vec();

    let _ = c.refresh();
    assert!(c.loading());
    let seq = c.fetches_issued();
    complete(&mut c, seq, server_error());

    assert!(!c.loading());
    assert_eq!(c.records(), records_before.as_slice());
    assert_eq!(c.page_state().page_count, 4);
    assert!(c.error().unwrap().contains("database unavailable"));

    // The next successful fetch clears the error.
    let _ = c.refresh();
    let seq = c.fetches_issued();
    complete(&mut c, seq, ok_page(&["C"], 4));
    assert_eq!(c.error(), None);
}

#[test]
fn test_zero_page_count_stored_as_one() {
    let mut c = ready();
    let _ = c.refresh();
    let seq = c.fetches_issued();
    complete(&mut c, seq, ok_page(&[], 0));
    assert_eq!(c.page_state().page_count, 1);
}

#[test]
fn test_page_size_change_refetches_same_page() {
    let mut c = on_page(3, 5);

    let cmd = c.update(Box::new(SettingsSavedMsg(Settings { page_size: 50 })));
    assert!(cmd.is_some());
    assert_eq!(c.settings().page_size, 50);
    assert_eq!(c.page_state().current_page, 3);

    assert!(elapse(&mut c).is_some());
    let query = c.last_query().unwrap();
    assert_eq!(query.limit, 50);
    assert_eq!(query.page, 3);
}

#[test]
fn test_page_request_replaces_pending_page_size_refetch() {
    let mut c = on_page(3, 5);
    let before = c.fetches_issued();

    assert!(c
        .update(Box::new(SettingsSavedMsg(Settings { page_size: 50 })))
        .is_some());
    let request = PageRequestMsg {
        page: 4,
        epoch: c.reset_epoch(),
    };
    assert!(c.update(Box::new(request)).is_some());
    assert!(!c.debouncer().pending());
    assert!(elapse(&mut c).is_none());

    assert_eq!(c.fetches_issued(), before + 1);
    let query = c.last_query().unwrap();
    assert_eq!((query.page, query.limit), (4, 50));
}

#[test]
fn test_unchanged_page_size_does_not_refetch() {
    let mut c = ready();
    assert!(c.on_settings_saved(Settings { page_size: 20 }).is_none());
    assert!(!c.debouncer().pending());
}

#[test]
fn test_settings_and_filter_edits_share_one_window() {
    let mut c = ready();
    let before = c.fetches_issued();
    let _ = c.set_search_value("abc");
    let _ = c.on_settings_saved(Settings { page_size: 10 });
    assert!(elapse(&mut c).is_some());
    assert_eq!(c.fetches_issued(), before + 1);
    let query = c.last_query().unwrap();
    assert_eq!(query.limit, 10);
    assert_eq!(query.filter.len(), 1);
}

#[test]
fn test_refresh_cancels_pending_window() {
    let mut c = ready();
    let _ = c.set_search_value("abc");
    assert!(c.refresh().is_some());
    assert!(!c.debouncer().pending());
    assert!(elapse(&mut c).is_none());
}

#[test]
fn test_messages_for_other_controllers_ignored() {
    let mut c = ready();
    let mut other = controller();
    let _ = other.on_settings_loaded(Settings::default());

    let _ = c.refresh();
    let seq = c.fetches_issued();
    let foreign = FetchCompletedMsg {
        id: other.id(),
        seq,
        result: ok_page(&["Z"], 9),
    };
    assert!(c.update(Box::new(foreign)).is_none());
    assert!(c.loading());

    let foreign_tick = DebounceMsg {
        id: other.debouncer().id(),
        tag: other.debouncer().tag(),
    };
    assert!(c.update(Box::new(foreign_tick)).is_none());
    assert!(elapse(&mut other).is_some());
}

#[tokio::test(start_paused = true)]
async fn test_field_change_restarts_full_window() {
    let mut c = ready();
    let before = c.fetches_issued();
    let start = tokio::time::Instant::now();

    let first = tokio::spawn(c.set_search_value("bounced@x.com").unwrap());
    tokio::time::sleep(Duration::from_millis(200)).await;
    let second = tokio::spawn(c.set_search_field(SearchField::MailTo).unwrap());

    let superseded = first.await.unwrap().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert!(start.elapsed() < Duration::from_millis(1200));
    assert!(c.update(superseded).is_none());
    assert_eq!(c.fetches_issued(), before);

    let tick = second.await.unwrap().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1200));
    assert!(c.update(tick).is_some());
    assert_eq!(c.fetches_issued(), before + 1);
    assert_eq!(
        c.last_query().unwrap().filter,
        vec![("mail_to".to_string(), "bounced@x.com".to_string())]
    );
}
