use super::*;
use crate::controller::FetchCompletedMsg;
use crate::debounce::DebounceMsg;
use crate::email::FetchResult;
use crate::error::FetchError;
use crate::filter::{SearchField, StatusFilter};
use crate::settings::Settings;
use serde_json::json;
use url::Url;

fn app_with(store: SettingsStore) -> App {
    let api = EmailApi::new(
        Url::parse("http://127.0.0.1:9/api/emails").unwrap(),
        Duration::from_secs(1),
    )
    .unwrap();
    let (app, _cmd) = App::new(api, store, Duration::from_millis(1000));
    app
}

fn app() -> App {
    app_with(SettingsStore::new(MemoryBackend::new()))
}

fn press(app: &mut App, code: KeyCode) -> Option<Cmd> {
    app.update(Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    }))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Loads settings, lets the debounce window pass and answers the fetch.
fn loaded(app: &mut App, ids: &[&str], page_count: u32) {
    assert!(app
        .update(Box::new(SettingsLoadedMsg(Settings::default())))
        .is_some());
    let tick = DebounceMsg {
        id: app.list().debouncer().id(),
        tag: app.list().debouncer().tag(),
    };
    assert!(app.update(Box::new(tick)).is_some());
    assert!(app.spinner.spinning());

    let records = ids
        .iter()
        .map(|id| serde_json::from_value(json!({ "id": id, "mail_to": "a@x.com" })).unwrap())
        .collect();
    answer(app, Ok(FetchResult { records, page_count }));
}

fn answer(app: &mut App, result: Result<FetchResult, FetchError>) {
    let done = FetchCompletedMsg {
        id: app.list().id(),
        seq: app.list().fetches_issued(),
        result,
    };
    assert!(app.update(Box::new(done)).is_none());
}

#[test]
fn test_typing_edits_search_on_every_key() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.mode(), &Mode::Search);

    type_text(&mut app, "bob");
    assert_eq!(app.list().filter().search_value, "bob");
    assert!(app.list().debouncer().pending());

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.list().filter().search_value, "bo");

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode(), &Mode::Browse);
    assert_eq!(app.list().filter().search_value, "bo");
}

#[test]
fn test_ctrl_u_clears_search() {
    let mut app = app();
    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "x@y");
    app.update(Box::new(KeyMsg {
        key: KeyCode::Char('u'),
        modifiers: KeyModifiers::CONTROL,
    }));
    assert_eq!(app.list().filter().search_value, "");
}

#[test]
fn test_browse_keys_cycle_field_and_status() {
    let mut app = app();
    press(&mut app, KeyCode::Char('f'));
    assert_eq!(app.list().filter().search_field, SearchField::MailTo);

    press(&mut app, KeyCode::Char('t'));
    assert_eq!(
        app.list().filter().status,
        StatusFilter::Code("sent".into())
    );
}

#[test]
fn test_settings_dialog_saves_page_size() {
    let mut app = app();
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(
        app.mode(),
        &Mode::Settings {
            input: "20".into()
        }
    );

    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    type_text(&mut app, "5x0");
    assert_eq!(
        app.mode(),
        &Mode::Settings {
            input: "50".into()
        }
    );

    assert!(press(&mut app, KeyCode::Enter).is_some());
    assert_eq!(app.mode(), &Mode::Browse);
    assert_eq!(app.settings.settings().page_size, 50);
}

#[test]
fn test_settings_dialog_escape_discards_input() {
    let mut app = app();
    press(&mut app, KeyCode::Char('s'));
    type_text(&mut app, "99");
    assert!(press(&mut app, KeyCode::Esc).is_none());
    assert_eq!(app.mode(), &Mode::Browse);
    assert_eq!(app.settings.settings().page_size, 20);
}

#[test]
fn test_cursor_stays_within_records() {
    let mut app = app();
    loaded(&mut app, &["A", "B"], 1);
    assert!(!app.spinner.spinning());

    for _ in 0..5 {
        press(&mut app, KeyCode::Down);
    }
    assert_eq!(app.cursor(), 1);
    assert_eq!(app.selected().and_then(EmailRecord::id).as_deref(), Some("B"));

    press(&mut app, KeyCode::Up);
    assert_eq!(app.cursor(), 0);
}

#[test]
fn test_enter_opens_and_closes_detail() {
    let mut app = app();
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode(), &Mode::Browse);

    loaded(&mut app, &["A"], 1);
    press(&mut app, KeyCode::Enter);
    assert!(matches!(app.mode(), Mode::Detail(r) if r.id().as_deref() == Some("A")));
    assert!(app.view().contains("a@x.com"));

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode(), &Mode::Browse);
}

#[test]
fn test_pager_keys_request_pages() {
    let mut app = app();
    loaded(&mut app, &["A"], 3);
    assert_eq!(app.pager.page_count(), 3);

    assert!(press(&mut app, KeyCode::Left).is_none());
    assert!(press(&mut app, KeyCode::Right).is_some());
}

#[test]
fn test_view_shows_paging_and_errors() {
    let mut app = app();
    let view = app.view();
    assert!(view.contains("Page 1 of 1"));
    assert!(view.contains("No records"));

    loaded(&mut app, &["A"], 4);
    assert!(app.view().contains("Page 1 of 4"));

    press(&mut app, KeyCode::Char('r'));
    answer(
        &mut app,
        Err(FetchError::Status {
            status: 502,
            detail: None,
        }),
    );
    let view = app.view();
    assert!(view.contains("server returned 502"));
    assert!(view.contains("a@x.com"));
}

#[test]
fn test_settings_notices() {
    let mut app = app();
    app.update(Box::new(SettingsLoadedMsg(Settings { page_size: 30 })));
    assert_eq!(app.notice(), Some("Page size 30"));
    app.update(Box::new(SettingsSavedMsg(Settings { page_size: 40 })));
    assert_eq!(app.notice(), Some("Saved page size 40"));
    assert_eq!(app.list().settings().page_size, 40);
}

#[tokio::test]
async fn test_join_delivers_both_messages() {
    let fast = bubbletea_tick(Duration::from_millis(1), |_| Box::new(1u8) as Msg);
    let slow = bubbletea_tick(Duration::from_millis(30), |_| Box::new(2u8) as Msg);

    let first = join(slow, fast).await.unwrap();
    let JoinedMsg { msg, rest } = *first.downcast::<JoinedMsg>().ok().unwrap();
    assert_eq!(msg.unwrap().downcast_ref::<u8>(), Some(&1));

    let second = rest.await.unwrap();
    assert_eq!(second.downcast_ref::<u8>(), Some(&2));
}
