use super::*;

#[test]
fn next_and_prev_wrap_around() {
    let mut app = App::new();
    app.next(3);
    app.next(3);
    assert_eq!(app.selected, 2);
    app.next(3);
    assert_eq!(app.selected, 0);
    app.prev(3);
    assert_eq!(app.selected, 2);
}

#[test]
fn navigation_on_an_empty_catalog_stays_at_zero() {
    let mut app = App::new();
    app.next(0);
    app.prev(0);
    app.select_last(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn catalog_loaded_keeps_the_cursor_in_range() {
    let mut app = App::new();
    app.select_last(10);
    assert_eq!(app.selected, 9);

    app.catalog_loaded(4);
    assert_eq!(app.selected, 3);
    assert_eq!(app.catalog, CatalogStatus::Ready);

    app.catalog_loaded(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn catalog_failure_is_recorded_for_the_retry_hint() {
    let mut app = App::new();
    assert_eq!(app.catalog, CatalogStatus::Loading);

    app.catalog_failed("catalog responded with status 500".into());
    assert_eq!(
        app.catalog,
        CatalogStatus::Failed("catalog responded with status 500".into())
    );
}

#[test]
fn status_line_can_be_set_and_cleared() {
    let mut app = App::new();
    app.set_status("muted");
    assert_eq!(app.status.as_deref(), Some("muted"));
    app.clear_status();
    assert_eq!(app.status, None);
}
