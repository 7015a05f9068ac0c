//! Behavioural tests for the board session.

use super::*;
use crate::domain::Theme;
use crate::schedule::demo_schedule;

fn t(s: &str) -> DepartureTime {
    DepartureTime::parse_hhmm(s).unwrap()
}

fn dep(time: &str, number: &str, dest: &str) -> Departure {
    Departure::new(t(time), number, dest)
}

fn with_rows(rows: Vec<Departure>) -> PageInit {
    PageInit {
        raw_departures: Some(rows),
        ..PageInit::default()
    }
}

fn three() -> Vec<Departure> {
    vec![
        dep("09:00", "12", "A"),
        dep("09:05", "7", "B"),
        dep("09:10", "12", "C"),
    ]
}

fn many(n: usize) -> Vec<Departure> {
    (0..n)
        .map(|i| dep(&format!("10:{i:02}"), "1", "X"))
        .collect()
}

#[test]
fn new_page_gets_defaults_and_selection() {
    let mut session = BoardSession::new();
    let id = session.add_page(None).unwrap();

    let page = session.page(&id).unwrap();
    assert_eq!(page.stop_name, crate::domain::PLACEHOLDER_STOP_NAME);
    assert_eq!(page.theme, Theme::Color);
    assert!(id.is_temporary());
    assert_eq!(session.selected(), Some(&id));
    assert_eq!(session.derived_rows(&id), Some(&[][..]));
}

#[test]
fn minted_ids_are_unique() {
    let mut session = BoardSession::new();
    let a = session.add_page(None).unwrap();
    let b = session.add_page(None).unwrap();
    assert_ne!(a, b);
}

#[test]
fn explicit_duplicate_id_rejected() {
    let mut session = BoardSession::new();
    let init = PageInit {
        id: Some(PageId::new("tt-1")),
        ..PageInit::default()
    };
    session.add_page(Some(init.clone())).unwrap();
    assert_eq!(
        session.add_page(Some(init)),
        Err(BoardError::DuplicateId("tt-1".into()))
    );
    assert_eq!(session.page_count(), 1);
}

#[test]
fn unfiltered_rows_are_first_eleven() {
    let mut session = BoardSession::new();
    let raw = many(15);
    let id = session.add_page(Some(with_rows(raw.clone()))).unwrap();

    assert_eq!(session.rows_or_empty(&id), &raw[..DISPLAY_CAP]);
}

#[test]
fn rows_never_exceed_cap() {
    let mut session = BoardSession::new();
    let a = session.add_page(Some(with_rows(many(30)))).unwrap();
    let b = session.add_page(Some(with_rows(many(3)))).unwrap();
    session.set_time_filter("10:01").unwrap();

    for id in [&a, &b] {
        assert!(session.rows_or_empty(id).len() <= DISPLAY_CAP);
    }
}

#[test]
fn recompute_is_idempotent() {
    let mut session = BoardSession::new();
    session.add_page(Some(with_rows(three()))).unwrap();
    session.add_filter("12", None);
    session.set_time_filter("09:05").unwrap();

    let before = session.derived().clone();
    session.recompute_all();
    assert_eq!(session.derived(), &before);
    session.recompute_all();
    assert_eq!(session.derived(), &before);
}

#[test]
fn direction_filter_excludes_other_destination() {
    let mut session = BoardSession::new();
    let id = session.add_page(Some(with_rows(three()))).unwrap();
    session.add_filter("12", Some("A".into()));

    assert_eq!(session.rows_or_empty(&id), &[dep("09:00", "12", "A")]);
}

#[test]
fn multiple_filters_or_together() {
    let mut session = BoardSession::new();
    let id = session.add_page(Some(with_rows(three()))).unwrap();
    session.add_filter("12", None);
    session.add_filter("7", None);

    assert_eq!(session.rows_or_empty(&id), three().as_slice());
}

#[test]
fn time_floor_inclusive() {
    let mut session = BoardSession::new();
    let id = session
        .add_page(Some(with_rows(vec![
            dep("08:59", "1", "X"),
            dep("09:00", "1", "X"),
            dep("09:01", "1", "X"),
        ])))
        .unwrap();
    session.set_time_filter("09:00").unwrap();

    let times: Vec<String> = session
        .rows_or_empty(&id)
        .iter()
        .map(|d| d.time.to_string())
        .collect();
    assert_eq!(times, vec!["09:00", "09:01"]);
}

#[test]
fn twelfth_row_truncated_before_filtering() {
    let mut session = BoardSession::new();
    let mut raw = many(11);
    raw.push(dep("11:00", "42", "Only Match"));
    let id = session.add_page(Some(with_rows(raw))).unwrap();

    session.add_filter("42", None);
    assert!(session.rows_or_empty(&id).is_empty());
}

#[test]
fn removed_page_never_reappears() {
    let mut session = BoardSession::new();
    let keep = session.add_page(Some(with_rows(three()))).unwrap();
    let gone = session.add_page(Some(with_rows(three()))).unwrap();

    session.remove_page(&gone).unwrap();
    assert!(session.derived_rows(&gone).is_none());

    session.add_filter("7", None);
    session.set_time_filter("09:00").unwrap();
    session.recompute_all();
    assert!(session.derived_rows(&gone).is_none());
    assert!(!session.derived().contains_key(&gone));
    assert!(session.derived_rows(&keep).is_some());
}

#[test]
fn removing_selected_clears_selection() {
    let mut session = BoardSession::new();
    let a = session.add_page(None).unwrap();
    let b = session.add_page(None).unwrap();
    assert_eq!(session.selected(), Some(&b));

    session.remove_page(&a).unwrap();
    assert_eq!(session.selected(), Some(&b));

    session.remove_page(&b).unwrap();
    assert_eq!(session.selected(), None);
}

#[test]
fn update_with_rows_derives_immediately() {
    let mut session = BoardSession::new();
    let id = session.add_page(None).unwrap();
    session.add_filter("12", None);

    session
        .update_page(&id, PagePatch::departures(three()))
        .unwrap();

    assert_eq!(
        session.rows_or_empty(&id),
        &[dep("09:00", "12", "A"), dep("09:10", "12", "C")]
    );
}

#[test]
fn update_theme_keeps_rows() {
    let mut session = BoardSession::new();
    let id = session.add_page(Some(with_rows(three()))).unwrap();
    session.update_page(&id, PagePatch::theme(Theme::Bw)).unwrap();

    assert_eq!(session.page(&id).unwrap().theme, Theme::Bw);
    assert_eq!(session.rows_or_empty(&id), three().as_slice());
}

#[test]
fn unknown_ids_report_not_found() {
    let mut session = BoardSession::new();
    let ghost = PageId::new("ghost");

    assert_eq!(
        session.remove_page(&ghost).unwrap_err(),
        BoardError::page_not_found("ghost")
    );
    assert!(session.update_page(&ghost, PagePatch::default()).is_err());
    assert!(session.select(Some(&ghost)).is_err());
    assert!(session.remove_filter(&FilterId::new("nope")).is_err());
    assert!(session
        .update_filter(&FilterId::new("nope"), FilterPatch::default())
        .is_err());
}

#[test]
fn replace_all_resets_derived_rows() {
    let mut session = BoardSession::new();
    let old = session.add_page(Some(with_rows(three()))).unwrap();

    let loaded = vec![
        Page::from_init(PageId::new("tt-1"), with_rows(many(2))),
        Page::from_init(PageId::new("tt-2"), PageInit::default()),
    ];
    session.replace_all_pages(loaded);

    assert!(session.derived_rows(&old).is_none());
    assert_eq!(session.selected(), None);
    assert_eq!(session.derived().len(), 2);
    assert_eq!(session.rows_or_empty(&PageId::new("tt-1")).len(), 2);
    assert_eq!(session.rows_or_empty(&PageId::new("tt-2")).len(), 0);
}

#[test]
fn replace_all_keeps_surviving_selection() {
    let mut session = BoardSession::with_pages(vec![Page::from_init(
        PageId::new("tt-1"),
        PageInit::default(),
    )]);
    session.select(Some(&PageId::new("tt-1"))).unwrap();

    session.replace_all_pages(vec![
        Page::from_init(PageId::new("tt-1"), PageInit::default()),
        Page::from_init(PageId::new("tt-9"), PageInit::default()),
    ]);
    assert_eq!(session.selected(), Some(&PageId::new("tt-1")));
}

#[test]
fn target_page_prefers_selection_then_last() {
    let mut session = BoardSession::new();
    assert_eq!(session.target_page(), None);

    let a = session.add_page(None).unwrap();
    let b = session.add_page(None).unwrap();
    session.select(Some(&a)).unwrap();
    assert_eq!(session.target_page(), Some(&a));

    session.select(None).unwrap();
    assert_eq!(session.target_page(), Some(&b));
}

#[test]
fn filter_direction_set_later() {
    let mut session = BoardSession::new();
    let id = session.add_page(Some(with_rows(three()))).unwrap();
    let f = session.add_filter("12", None);
    assert_eq!(session.rows_or_empty(&id).len(), 2);

    session
        .update_filter(&f, FilterPatch::direction(Some("C".into())))
        .unwrap();
    assert_eq!(session.rows_or_empty(&id), &[dep("09:10", "12", "C")]);

    session.remove_filter(&f).unwrap();
    assert_eq!(session.rows_or_empty(&id), three().as_slice());
}

#[test]
fn bad_time_floor_keeps_previous() {
    let mut session = BoardSession::new();
    let id = session.add_page(Some(with_rows(three()))).unwrap();
    session.set_time_filter("09:05").unwrap();

    assert!(session.set_time_filter("9 o'clock").is_err());
    assert_eq!(session.time_floor(), Some(t("09:05")));
    assert_eq!(session.rows_or_empty(&id).len(), 2);
}

#[test]
fn clear_filters_restores_rows() {
    let mut session = BoardSession::new();
    let id = session.add_page(Some(with_rows(three()))).unwrap();
    session.add_filter("7", None);
    session.set_time_filter("09:06").unwrap();
    assert!(session.rows_or_empty(&id).is_empty());

    session.clear_filters();
    assert_eq!(session.rows_or_empty(&id), three().as_slice());
}

#[test]
fn can_add_page_follows_plan() {
    let mut session = BoardSession::new();
    for _ in 0..3 {
        assert!(session.can_add_page(Plan::Free));
        session.add_page(None).unwrap();
    }
    assert!(!session.can_add_page(Plan::Free));
    assert!(session.can_add_page(Plan::Premium));
}

#[test]
fn default_demo_scenario() {
    let mut session = BoardSession::new();
    let p1 = session
        .add_page(Some(with_rows(demo_schedule("default"))))
        .unwrap();
    assert_eq!(session.rows_or_empty(&p1).len(), 9);
    assert_eq!(session.rows_or_empty(&p1), demo_schedule("default").as_slice());

    session.add_filter("12", None);
    let rows = session.rows_or_empty(&p1);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|d| d.bus_number == "12"));

    session.set_time_filter("10:00").unwrap();
    let rows = session.rows_or_empty(&p1);
    assert_eq!(rows, &[dep("10:00", "12", "Central Station")]);
}
