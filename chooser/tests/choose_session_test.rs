// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Whole sessions, driven through an [`InputDispatcher`] by a mock input stream and
//! drawn on an [`OffscreenBuffer`] with a mock output device.

use std::{sync::Arc, time::Duration};

use chrono::{TimeZone, Utc};
use crossterm::event::KeyCode;
use r3bl_chooser::{BucketEntry, ChooseError, CrosstermEventResult, DispatchOptions,
                   InlineVec, InputDevice, InputDeviceExtMock, InputDispatcher, Item,
                   ObjectAction, ObjectEntry, ObjectKind, OffscreenBuffer, OutputDevice,
                   OutputDeviceExt, RenderSurface, SafeRenderSurface, Selector, Size,
                   StatusLine, StdMutex, StdoutMock, TracingConfig, action_menu,
                   key_press, key_presses_for_text};
use smallvec::smallvec;
use tracing_core::LevelFilter;

const DELAY: Duration = Duration::from_millis(10);

const FRUITS: [&str; 3] = ["apple", "banana", "cherry"];

struct Fixture {
    buffer: Arc<StdMutex<OffscreenBuffer>>,
    stdout_mock: StdoutMock,
    selector: Selector,
    dispatcher: InputDispatcher,
}

/// Header row, status row, and `size.row_height - 2` rows for items.
fn spawn_fixture(size: Size, events: InlineVec<CrosstermEventResult>) -> Fixture {
    let (output_device, stdout_mock) = OutputDevice::new_mock();
    let buffer = Arc::new(StdMutex::new(OffscreenBuffer::new(size, output_device)));
    let surface: SafeRenderSurface = buffer.clone();
    let status_line = StatusLine::new(1, surface.clone());
    let selector = Selector::new(2, surface.clone(), status_line.clone());

    let dispatcher = InputDispatcher::spawn(
        InputDevice::new_mock_with_delay(events, DELAY),
        surface,
        status_line,
        DispatchOptions::default(),
    );
    dispatcher.register(selector.route());

    Fixture {
        buffer,
        stdout_mock,
        selector,
        dispatcher,
    }
}

fn row_text(fixture: &Fixture, row_index: usize) -> String {
    fixture
        .buffer
        .lock()
        .unwrap()
        .row_text(row_index)
        .trim_end()
        .to_string()
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_page_down_twice_then_commit() {
    let fixture = spawn_fixture(
        Size::new(40, 4),
        smallvec![
            key_press(KeyCode::Down),
            key_press(KeyCode::Down),
            key_press(KeyCode::Enter),
        ],
    );

    let result = fixture.selector.choose(&FRUITS).await;
    pretty_assertions::assert_eq!(result.unwrap(), 2);

    pretty_assertions::assert_eq!(row_text(&fixture, 2), "cherry");
    pretty_assertions::assert_eq!(row_text(&fixture, 3), "");
    assert!(row_text(&fixture, 0).ends_with("(Total 3: 2 of 2)"));
    assert!(
        fixture
            .stdout_mock
            .get_copy_of_buffer_as_string_strip_ansi()
            .contains("cherry")
    );

    fixture.dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_filter_narrows_list_and_maps_back_to_original_index() {
    let mut events = key_presses_for_text("an");
    events.push(key_press(KeyCode::Enter));
    let fixture = spawn_fixture(Size::new(40, 4), events);

    let result = fixture.selector.choose(&FRUITS).await;
    pretty_assertions::assert_eq!(result.unwrap(), 1);
    pretty_assertions::assert_eq!(row_text(&fixture, 1), "Filter query> an");
    pretty_assertions::assert_eq!(row_text(&fixture, 2), "banana");

    fixture.dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_esc_cancels_with_filter_typed() {
    let mut events = key_presses_for_text("ch");
    events.push(key_press(KeyCode::Esc));
    let fixture = spawn_fixture(Size::new(40, 4), events);

    let result = fixture.selector.choose(&FRUITS).await;
    assert!(matches!(result, Err(ChooseError::Interrupted)));

    fixture.dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_concurrent_sessions_run_one_after_the_other() {
    let fixture = spawn_fixture(
        Size::new(40, 6),
        smallvec![
            key_press(KeyCode::Enter),
            key_press(KeyCode::Down),
            key_press(KeyCode::Enter),
        ],
    );

    let (first, second) = tokio::join!(
        fixture.selector.choose(&FRUITS),
        fixture.selector.choose(&FRUITS)
    );
    let mut results = vec![first.unwrap(), second.unwrap()];
    results.sort_unstable();
    pretty_assertions::assert_eq!(results, vec![0, 1]);

    fixture.dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_mixed_item_variants_in_one_list() {
    let last_modified = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let items: Vec<Box<dyn Item>> = vec![
        Box::new(ObjectEntry::new_parent()),
        Box::new(ObjectEntry {
            key: "logs".to_string(),
            size: 0,
            last_modified,
            kind: ObjectKind::Directory,
        }),
        Box::new(ObjectEntry {
            key: "readme.md".to_string(),
            size: 42,
            last_modified,
            kind: ObjectKind::File,
        }),
        Box::new(BucketEntry::new("logs-archive")),
    ];

    let mut events = key_presses_for_text("logs");
    events.push(key_press(KeyCode::Down));
    events.push(key_press(KeyCode::Enter));
    let fixture = spawn_fixture(Size::new(80, 6), events);

    let result = fixture.selector.choose(&items).await;
    pretty_assertions::assert_eq!(result.unwrap(), 3);

    assert!(row_text(&fixture, 2).ends_with("logs/"));
    pretty_assertions::assert_eq!(row_text(&fixture, 3), "[Bucket] logs-archive");
    pretty_assertions::assert_eq!(row_text(&fixture, 4), "");

    fixture.dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_action_menu_choice() {
    let menu = action_menu("text/plain");
    let fixture = spawn_fixture(
        Size::new(40, 6),
        smallvec![
            key_press(KeyCode::Up),
            key_press(KeyCode::Enter),
        ],
    );

    let index = fixture.selector.choose(&menu).await.unwrap();
    pretty_assertions::assert_eq!(menu[index].action, ObjectAction::Download);

    fixture.dispatcher.shutdown().await.unwrap();
}

#[tokio::test]
#[allow(clippy::needless_return)]
async fn test_session_logs_through_injected_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("session.log").to_str().unwrap().to_string();
    let dispatch = TracingConfig::new_file(file_path.clone(), LevelFilter::DEBUG)
        .try_create_dispatch()
        .unwrap();

    let Fixture {
        selector,
        dispatcher,
        ..
    } = spawn_fixture(Size::new(40, 4), smallvec![key_press(KeyCode::Enter)]);
    let selector = selector.with_log_dispatch(dispatch);

    pretty_assertions::assert_eq!(selector.choose(&FRUITS).await.unwrap(), 0);
    dispatcher.shutdown().await.unwrap();

    let contents = std::fs::read_to_string(&file_path).unwrap();
    assert!(contents.contains("Session started"));
    assert!(contents.contains("Session committed"));
}
