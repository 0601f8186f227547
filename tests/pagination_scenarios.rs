mod support;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use artworks_table::{App, Config, Fetcher};
use crossterm::event::KeyCode;

use support::{artwork, ids, mounted, page_of, StubCatalog, WAIT};

fn press(app: &mut App, keys: &[KeyCode]) {
    for &key in keys {
        let exit = app.handle_key(key).unwrap();
        assert!(!exit, "{key:?} unexpectedly quit");
    }
}

#[test]
fn mount_shows_first_page_with_previous_disabled() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 3)));
    let app = mounted(stub.clone());

    assert_eq!(app.page_label(), "Page 1");
    assert!(!app.can_go_back());
    assert_eq!(app.loaded_page(), Some(1));
    assert_eq!(app.records(), page_of(1, 3).as_slice());
    assert_eq!(app.visible_records().len(), 3);
    assert_eq!(stub.requested(), vec![1]);
}

#[test]
fn next_loads_second_page_and_enables_previous() {
    let stub = Arc::new(
        StubCatalog::new()
            .with_page(1, page_of(1, 3))
            .with_page(2, page_of(2, 2)),
    );
    let mut app = mounted(stub.clone());

    press(&mut app, &[KeyCode::Char('n')]);
    assert_eq!(app.page_label(), "Page 2");
    assert!(app.can_go_back());
    assert!(app.settle(WAIT));

    assert_eq!(app.loaded_page(), Some(2));
    assert_eq!(app.records(), page_of(2, 2).as_slice());
    assert_eq!(stub.requested(), vec![1, 2]);
}

#[test]
fn previous_from_second_page_refetches_first() {
    let stub = Arc::new(
        StubCatalog::new()
            .with_page(1, page_of(1, 3))
            .with_page(2, page_of(2, 2)),
    );
    let mut app = mounted(stub.clone());
    press(&mut app, &[KeyCode::Char('n')]);
    assert!(app.settle(WAIT));

    press(&mut app, &[KeyCode::Char('p')]);
    assert_eq!(app.page(), 1);
    assert!(!app.can_go_back());
    assert!(app.settle(WAIT));

    assert_eq!(app.records(), page_of(1, 3).as_slice());
    assert_eq!(stub.requested(), vec![1, 2, 1]);
}

#[test]
fn previous_on_first_page_does_nothing() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 3)));
    let mut app = mounted(stub.clone());

    press(&mut app, &[KeyCode::Char('p'), KeyCode::Char('[')]);
    assert_eq!(app.page(), 1);
    assert!(!app.is_loading());
    assert!(!app.settle(Duration::from_millis(200)));
    assert_eq!(stub.requested(), vec![1]);
    assert_eq!(app.records(), page_of(1, 3).as_slice());
}

#[test]
fn selection_is_kept_until_the_next_batch_binds() {
    let stub = Arc::new(
        StubCatalog::new()
            .with_page(1, page_of(1, 3))
            .with_page(2, page_of(2, 2)),
    );
    let release_page_two = stub.gate(2);
    let mut app = mounted(stub.clone());

    press(
        &mut app,
        &[KeyCode::Char(' '), KeyCode::Down, KeyCode::Char(' ')],
    );
    assert_eq!(ids(&app.selected_records()), vec!["1000", "1001"]);

    press(&mut app, &[KeyCode::Char('n')]);
    assert_eq!(ids(&app.selected_records()), vec!["1000", "1001"]);

    release_page_two.send(()).unwrap();
    assert!(app.settle(WAIT));
    assert!(app.selected_records().is_empty());
    assert_eq!(app.records(), page_of(2, 2).as_slice());
}

#[test]
fn stale_response_never_overwrites_newer_page() {
    let stub = Arc::new(
        StubCatalog::new()
            .with_page(1, page_of(1, 3))
            .with_page(2, page_of(2, 2))
            .with_page(3, page_of(3, 4)),
    );
    let release_two = stub.gate(2);
    let release_three = stub.gate(3);
    let mut app = mounted(stub.clone());

    press(&mut app, &[KeyCode::Char('n'), KeyCode::Char('n')]);
    assert_eq!(app.page(), 3);

    release_three.send(()).unwrap();
    assert!(app.settle(WAIT));
    assert_eq!(app.loaded_page(), Some(3));

    release_two.send(()).unwrap();
    assert!(!app.settle(Duration::from_millis(300)));
    app.on_tick();

    assert_eq!(app.loaded_page(), Some(3));
    assert_eq!(app.records(), page_of(3, 4).as_slice());
    assert_eq!(app.page_label(), "Page 3");
}

#[test]
fn failed_fetch_keeps_previous_batch_and_target_page() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 3)));
    stub.fail_page(2, 503);
    let mut app = mounted(stub.clone());

    press(&mut app, &[KeyCode::Char('n')]);
    assert!(app.settle(WAIT));

    assert_eq!(app.page(), 2);
    assert_eq!(app.loaded_page(), Some(1));
    assert_eq!(app.records(), page_of(1, 3).as_slice());
    let status = app.status_text().unwrap();
    assert!(status.contains("HTTP 503"), "{status}");
    assert!(status.contains("Still showing page 1"), "{status}");

    stub.heal_page(2);
    press(&mut app, &[KeyCode::Char('r')]);
    assert!(app.settle(WAIT));
    assert_eq!(app.loaded_page(), Some(2));
    assert!(app.records().is_empty());
    assert_eq!(stub.requested(), vec![1, 2, 2]);
}

#[test]
fn empty_page_is_a_valid_state() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 3)));
    let mut app = mounted(stub);

    press(&mut app, &[KeyCode::Char('n')]);
    assert!(app.settle(WAIT));
    assert_eq!(app.loaded_page(), Some(2));
    assert!(app.records().is_empty());
    assert!(app.can_go_back());

    press(&mut app, &[KeyCode::Char('n')]);
    assert_eq!(app.page(), 3);
}

#[test]
fn jump_dialog_moves_to_typed_page() {
    let stub = Arc::new(
        StubCatalog::new()
            .with_page(1, page_of(1, 3))
            .with_page(40, page_of(40, 1)),
    );
    let mut app = mounted(stub.clone());

    press(
        &mut app,
        &[
            KeyCode::Char('g'),
            KeyCode::Char('0'),
            KeyCode::Enter,
            KeyCode::Backspace,
            KeyCode::Char('4'),
            KeyCode::Char('x'),
            KeyCode::Char('0'),
            KeyCode::Enter,
        ],
    );
    assert_eq!(app.page(), 40);
    assert!(app.settle(WAIT));
    assert_eq!(app.records(), page_of(40, 1).as_slice());
    assert_eq!(stub.requested(), vec![1, 40]);
}

#[test]
fn title_filter_narrows_rows_without_touching_selection() {
    let stub = Arc::new(StubCatalog::new().with_page(
        1,
        vec![
            artwork(1, "Nighthawks"),
            artwork(2, "The Bedroom"),
            artwork(3, "Night Fishing"),
        ],
    ));
    let mut app = mounted(stub);

    press(&mut app, &[KeyCode::Down, KeyCode::Char(' ')]);
    press(
        &mut app,
        &[
            KeyCode::Char('/'),
            KeyCode::Char('n'),
            KeyCode::Char('i'),
            KeyCode::Char('g'),
            KeyCode::Enter,
        ],
    );

    assert_eq!(app.grid().filter(), Some("nig"));
    assert_eq!(ids(&app.visible_records()), vec!["1", "3"]);
    assert_eq!(ids(&app.selected_records()), vec!["2"]);

    press(&mut app, &[KeyCode::Esc]);
    assert_eq!(app.grid().filter(), None);
    assert_eq!(app.visible_records().len(), 3);
}

#[test]
fn select_all_covers_every_row_in_batch() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 12)));
    let mut app = mounted(stub);

    press(&mut app, &[KeyCode::Char('a')]);
    assert_eq!(app.selected_records().len(), 12);
    press(&mut app, &[KeyCode::Char('a')]);
    assert!(app.selected_records().is_empty());
}

#[test]
fn grid_paginator_is_independent_of_remote_pages() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 12)));
    let mut app = mounted(stub.clone());
    assert_eq!(app.grid().rows_per_page(), 20);
    assert_eq!(app.visible_records().len(), 12);

    press(&mut app, &[KeyCode::Char('z')]);
    assert_eq!(app.grid().rows_per_page(), 5);
    assert_eq!(app.visible_records().len(), 5);

    press(&mut app, &[KeyCode::Right, KeyCode::Right]);
    assert_eq!(app.grid().page(), 2);
    assert_eq!(app.visible_records().len(), 2);

    assert_eq!(app.page(), 1);
    assert_eq!(stub.requested(), vec![1]);
}

#[test]
fn enter_opens_title_link_and_i_opens_image() {
    let stub = Arc::new(StubCatalog::new().with_page(1, vec![artwork(27992, "La Grande Jatte")]));
    let opened = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&opened);

    let mut app = App::new(Fetcher::new(stub), &Config::default()).with_link_opener(move |url| {
        sink.borrow_mut().push(url.to_string());
        Ok(())
    });
    assert!(app.settle(WAIT));

    press(&mut app, &[KeyCode::Enter, KeyCode::Char('i')]);
    assert_eq!(
        *opened.borrow(),
        vec![
            "https://api.artic.edu/api/v1/artworks/27992".to_string(),
            "https://www.artic.edu/iiif/2/img-27992/full/843,/0/default.jpg".to_string(),
        ]
    );
    assert_eq!(app.status_text(), Some("Opened image \"La Grande Jatte\"."));
}

#[test]
fn browser_failure_is_reported_in_status() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 1)));
    let mut app = App::new(Fetcher::new(stub), &Config::default())
        .with_link_opener(|_| Err(io::Error::new(io::ErrorKind::NotFound, "no browser")));
    assert!(app.settle(WAIT));

    press(&mut app, &[KeyCode::Char('o')]);
    assert_eq!(app.status_text(), Some("Failed to open link: no browser"));
}

#[test]
fn quit_keys_exit() {
    let stub = Arc::new(StubCatalog::new().with_page(1, page_of(1, 1)));
    let mut app = mounted(stub);
    assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    assert!(app.handle_key(KeyCode::Esc).unwrap());
}

#[test]
fn page_index_never_drops_below_one() {
    let stub = Arc::new(StubCatalog::new());
    let mut app = mounted(stub);
    let keys = [
        KeyCode::Char('p'),
        KeyCode::Char('n'),
        KeyCode::Char('p'),
        KeyCode::Char('p'),
        KeyCode::Char('n'),
        KeyCode::Char('n'),
        KeyCode::Char('p'),
        KeyCode::Char('p'),
        KeyCode::Char('p'),
    ];
    for key in keys {
        press(&mut app, &[key]);
        assert!(app.page() >= 1);
        assert_eq!(app.can_go_back(), app.page() != 1);
    }
}
