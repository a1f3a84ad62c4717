use std::io::Cursor;

use chrono::NaiveDate;

use divelog::{
    core::{store::StoreError, table::Column},
    export::delimited::CsvExport,
    geocode::{GeocodeOutcome, StaticGeocoder},
    photo::{PhotoFormat, PhotoStatus},
    profile::ProfileError,
    session::{
        events::SessionEvent,
        form::DiveForm,
        handle::{DiveSession, LocationPolicy, SessionConfig, SessionError, Unresolved},
    },
    types::Coordinates,
};

const BLUE_HOLE: Coordinates = Coordinates {
    latitude: 17.316,
    longitude: -87.5347,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).expect("valid date")
}

fn geocoder() -> StaticGeocoder {
    StaticGeocoder::new().with_place("Blue Hole", BLUE_HOLE)
}

fn session(policy: LocationPolicy) -> DiveSession {
    let config = SessionConfig {
        location_policy: policy,
        ..SessionConfig::default()
    };
    DiveSession::new(config, Some(Box::new(geocoder())))
}

fn png_bytes() -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(3, 2);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).expect("encode png");
    out.into_inner()
}

#[test]
fn resolved_location_is_verified_with_geocoded_coordinates() {
    let mut s = session(LocationPolicy::AllowUnverified);
    let idx = s
        .submit(DiveForm::new(day(1)).with_location("  blue hole ").with_depth(40.0, 38))
        .unwrap();

    let rec = s.log().get(idx).unwrap();
    assert!(rec.location_verified);
    assert_eq!(rec.coordinates, BLUE_HOLE);
    assert_eq!(rec.location, "blue hole");

    assert_eq!(
        s.drain_events(),
        vec![
            SessionEvent::LocationChecked {
                location: "blue hole".to_string(),
                outcome: GeocodeOutcome::Resolved(BLUE_HOLE),
            },
            SessionEvent::DiveLogged { index: 0, verified: true },
        ]
    );
    assert!(s.drain_events().is_empty());
}

#[test]
fn manual_coordinates_are_kept_but_not_verified() {
    let mut s = session(LocationPolicy::RequireResolved);
    let mut form = DiveForm::new(day(1)).with_location("Blue Hole").with_depth(30.0, 40);
    form.coordinates = Some(Coordinates::new(17.0, -87.0));

    let idx = s.submit(form).unwrap();
    let rec = s.log().get(idx).unwrap();
    assert!(!rec.location_verified);
    assert_eq!(rec.coordinates, Coordinates::new(17.0, -87.0));

    let mut same = DiveForm::new(day(2)).with_location("Blue Hole").with_depth(30.0, 40);
    same.coordinates = Some(BLUE_HOLE);
    let idx = s.submit(same).unwrap();
    let rec = s.log().get(idx).unwrap();
    assert!(rec.location_verified);
    assert_eq!(rec.coordinates, BLUE_HOLE);

    for rec in s.log().iter().filter(|r| r.location_verified) {
        assert_eq!(rec.coordinates, BLUE_HOLE);
    }
}

#[test]
fn unknown_location_is_kept_unverified_by_default() {
    let mut s = session(LocationPolicy::default());
    let idx = s
        .submit(DiveForm::new(day(2)).with_location("Nowhere Reef").with_depth(10.0, 30))
        .unwrap();

    let rec = s.log().get(idx).unwrap();
    assert!(!rec.location_verified);
    assert!(rec.coordinates.is_sentinel());
    assert!(matches!(
        s.drain_events().as_slice(),
        [
            SessionEvent::LocationChecked { outcome: GeocodeOutcome::NotFound, .. },
            SessionEvent::DiveLogged { index: 0, verified: false },
        ]
    ));
}

#[test]
fn strict_policy_rejects_unresolved_unless_accepted() {
    let mut s = session(LocationPolicy::RequireResolved);

    let err = s
        .submit(DiveForm::new(day(3)).with_location("Nowhere Reef").with_depth(10.0, 30))
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::LocationUnresolved { reason: Unresolved::NotFound, .. }
    ));
    assert!(s.log().is_empty());

    let err = s.submit(DiveForm::new(day(3)).with_depth(10.0, 30)).unwrap_err();
    assert!(matches!(
        err,
        SessionError::LocationUnresolved { reason: Unresolved::Blank, .. }
    ));

    let mut form = DiveForm::new(day(3)).with_location("Nowhere Reef").with_depth(10.0, 30);
    form.accept_unverified = true;
    let idx = s.submit(form).unwrap();
    assert!(!s.log().get(idx).unwrap().location_verified);
}

#[test]
fn blank_location_skips_the_geocoder() {
    let mut s = session(LocationPolicy::AllowUnverified);
    s.submit(DiveForm::new(day(4)).with_depth(5.0, 20)).unwrap();

    assert_eq!(
        s.drain_events(),
        vec![SessionEvent::DiveLogged { index: 0, verified: false }]
    );
    assert_eq!(s.summary().favorite_location, "-");
}

#[test]
fn offline_or_missing_geocoder_reports_unavailable() {
    let mut offline = geocoder();
    offline.set_offline(true);
    let mut s = DiveSession::new(
        SessionConfig {
            location_policy: LocationPolicy::RequireResolved,
            ..SessionConfig::default()
        },
        Some(Box::new(offline)),
    );
    let err = s
        .submit(DiveForm::new(day(5)).with_location("Blue Hole").with_depth(20.0, 30))
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::LocationUnresolved { reason: Unresolved::Unavailable, .. }
    ));

    let mut bare = DiveSession::new(SessionConfig::default(), None);
    let idx = bare
        .submit(DiveForm::new(day(5)).with_location("Blue Hole").with_depth(20.0, 30))
        .unwrap();
    assert!(!bare.log().get(idx).unwrap().location_verified);
}

#[test]
fn closures_can_act_as_geocoders() {
    let lookup = |place: &str| {
        if place == "Cenote" {
            GeocodeOutcome::Resolved(Coordinates::new(20.5, -87.2))
        } else {
            GeocodeOutcome::NotFound
        }
    };
    let mut s = DiveSession::new(SessionConfig::default(), Some(Box::new(lookup)));
    let idx = s
        .submit(DiveForm::new(day(6)).with_location("Cenote").with_depth(15.0, 50))
        .unwrap();
    assert!(s.log().get(idx).unwrap().location_verified);
}

#[test]
fn invalid_depth_is_a_store_error() {
    let mut s = session(LocationPolicy::AllowUnverified);
    let err = s
        .submit(DiveForm::new(day(7)).with_location("Blue Hole").with_depth(-5.0, 30))
        .unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::InvalidRecord(_))));
    assert!(s.log().is_empty());
}

#[test]
fn photos_are_checked_on_submit_and_listed_in_gallery() {
    let mut s = session(LocationPolicy::AllowUnverified);

    let mut corrupt = DiveForm::new(day(8)).with_location("Blue Hole").with_depth(20.0, 30);
    corrupt.photo = Some(b"definitely not an image".to_vec());
    assert!(matches!(s.submit(corrupt), Err(SessionError::CorruptPhoto { .. })));
    assert!(s.log().is_empty());
    assert!(s.drain_events().is_empty());

    let mut good = DiveForm::new(day(8)).with_location("Blue Hole").with_depth(20.0, 30);
    good.photo = Some(png_bytes());
    let with_photo = s.submit(good).unwrap();

    let mut empty = DiveForm::new(day(9)).with_location("Blue Hole").with_depth(18.0, 30);
    empty.photo = Some(Vec::new());
    let without_photo = s.submit(empty).unwrap();
    assert!(s.log().get(without_photo).unwrap().photo.is_none());

    let gallery = s.gallery();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].index, with_photo);
    assert_eq!(gallery[0].location, "Blue Hole");
    assert_eq!(
        gallery[0].status,
        PhotoStatus::Decoded { format: PhotoFormat::Png, width: 3, height: 2 }
    );

    let table = s.table(true);
    assert!(table[0].get(Column::Image).is_some());
    assert!(s.table(false)[0].get(Column::Image).is_none());
}

#[test]
fn delete_records_event_and_rejects_bad_index() {
    let mut s = session(LocationPolicy::AllowUnverified);
    s.submit(DiveForm::new(day(1)).with_location("A").with_depth(10.0, 30)).unwrap();
    s.submit(DiveForm::new(day(2)).with_location("B").with_depth(11.0, 30)).unwrap();
    s.drain_events();

    let removed = s.delete(0).unwrap();
    assert_eq!(removed.location, "A");
    assert_eq!(s.log().get(0).unwrap().location, "B");
    assert_eq!(s.drain_events(), vec![SessionEvent::DiveDeleted { index: 0 }]);

    assert!(matches!(
        s.delete(5),
        Err(SessionError::Store(StoreError::IndexOutOfRange { index: 5, len: 1 }))
    ));
    assert!(s.drain_events().is_empty());
}

#[test]
fn import_into_empty_session_replaces_columns() {
    let mut s = session(LocationPolicy::AllowUnverified);
    let outcome = s.import_sources([
        ("first.csv", "Date,Location,Depth (m)\n2024-01-01,Reef A,18\n2024-01-03,Reef A,30\n".as_bytes()),
        ("broken.csv", "Date\nsoon\n".as_bytes()),
        ("second.csv", "Location,Depth (m),Date,Duration (min)\nReef B,12,2024-01-02,40\n".as_bytes()),
    ]);

    assert_eq!(outcome.dives, 3);
    assert_eq!(outcome.imported.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(s.columns().contains_all(&[Column::Date, Column::Location, Column::Depth]));
    assert!(!s.columns().contains(Column::Duration));
    assert!(!s.columns().contains(Column::Latitude));

    let events = s.drain_events();
    assert_eq!(
        events,
        vec![
            SessionEvent::SourceImported { source: "first.csv".into(), dives: 2 },
            SessionEvent::SourceImported { source: "second.csv".into(), dives: 1 },
            SessionEvent::SourceFailed {
                source: "broken.csv".into(),
                message: outcome.failures[0].error.to_string(),
            },
        ]
    );

    let summary = s.summary();
    assert_eq!(summary.average_depth_m, Some(20.0));
    assert_eq!(summary.favorite_location, "Reef A");

    let dash = s.dashboard();
    assert_eq!(dash.total_dives, 3);
    assert_eq!(dash.total_duration_min, None);
    assert_eq!(dash.deepest_m, Some(30.0));
    assert_eq!(dash.favorite_location.as_deref(), Some("Reef A"));
    assert!(dash.map.is_none());
    let chart: Vec<f64> = dash.depth_chart.unwrap().iter().map(|p| p.depth_m).collect();
    assert_eq!(chart, vec![18.0, 12.0, 30.0]);
}

#[test]
fn import_into_populated_session_intersects_columns() {
    let mut s = session(LocationPolicy::AllowUnverified);
    s.submit(DiveForm::new(day(1)).with_location("Blue Hole").with_depth(40.0, 38))
        .unwrap();
    assert_eq!(s.columns().len(), Column::ALL.len());

    s.import_sources([("depths.csv", "Depth (m)\n10\n".as_bytes())]);
    assert_eq!(s.log().len(), 2);
    assert_eq!(s.columns().len(), 1);
    assert!(s.columns().contains(Column::Depth));

    let dash = s.dashboard();
    assert_eq!(dash.deepest_m, Some(40.0));
    assert!(dash.favorite_location.is_none());
    assert!(dash.depth_chart.is_none());
}

#[test]
fn failed_only_import_leaves_columns_untouched() {
    let mut s = session(LocationPolicy::AllowUnverified);
    let outcome = s.import_sources([("bad.csv", "Depth (m)\nx\n".as_bytes())]);
    assert_eq!(outcome.dives, 0);
    assert_eq!(s.columns().len(), Column::ALL.len());
}

#[test]
fn dashboard_map_only_shows_resolved_points() {
    let mut s = session(LocationPolicy::AllowUnverified);
    s.submit(DiveForm::new(day(1)).with_location("Blue Hole").with_depth(40.0, 38))
        .unwrap();
    s.submit(DiveForm::new(day(2)).with_location("Nowhere").with_depth(9.0, 30))
        .unwrap();

    let map = s.dashboard().map.unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map[0].location, "Blue Hole");
    assert!(map[0].verified);
}

#[test]
fn empty_session_dashboard_has_no_chart() {
    let s = DiveSession::new(SessionConfig::default(), None);
    let dash = s.dashboard();
    assert_eq!(dash.total_dives, 0);
    assert_eq!(dash.total_duration_min, Some(0));
    assert_eq!(dash.average_depth_m, None);
    assert_eq!(dash.favorite_location.as_deref(), Some("-"));
    assert!(dash.depth_chart.is_none());
    assert_eq!(dash.map, Some(Vec::new()));
}

#[test]
fn profile_loading_is_independent_of_the_log() {
    let s = DiveSession::new(SessionConfig::default(), None);
    let profile = s.load_profile("Time,Depth\n3,10\n1,5\n2,8\n".as_bytes()).unwrap();
    assert_eq!(profile.max_depth(), Some(10.0));
    assert!(s.log().is_empty());

    let err = s.load_profile("Time\n1\n".as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Profile(ProfileError::MissingColumns { .. })
    ));
}

#[test]
fn export_writes_current_log_order() {
    let mut s = session(LocationPolicy::AllowUnverified);
    s.submit(DiveForm::new(day(3)).with_location("Later").with_depth(10.0, 30)).unwrap();
    s.submit(DiveForm::new(day(1)).with_location("Earlier").with_depth(10.0, 30)).unwrap();

    let mut sink = CsvExport::new(Vec::new());
    assert_eq!(s.export(&mut sink).unwrap(), 2);
    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let locations: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split(',').nth(2).unwrap())
        .collect();
    assert_eq!(locations, vec!["Later", "Earlier"]);

    let ordered: Vec<&str> = s.chronological().iter().map(|r| r.location.as_str()).collect();
    assert_eq!(ordered, vec!["Earlier", "Later"]);
}

#[test]
fn config_parses_from_json_with_defaults() {
    let config = SessionConfig::from_json_str(r#"{"location_policy":"require_resolved"}"#).unwrap();
    assert_eq!(config.location_policy, LocationPolicy::RequireResolved);
    assert_eq!(config.top_locations, 5);

    let config = SessionConfig::from_json_str(r#"{"top_locations":2}"#).unwrap();
    assert_eq!(config.location_policy, LocationPolicy::AllowUnverified);

    let mut s = DiveSession::new(config, None);
    for loc in ["A", "B", "C"] {
        s.submit(DiveForm::new(day(1)).with_location(loc).with_depth(5.0, 10)).unwrap();
    }
    assert_eq!(s.summary().top_locations.len(), 2);

    assert!(SessionConfig::from_json_str(r#"{"location_policy":"sometimes"}"#).is_err());
}

#[test]
fn emptied_log_regains_every_column() {
    let mut s = session(LocationPolicy::AllowUnverified);
    s.import_sources([("sites.csv", "Location\nReef\n".as_bytes())]);
    assert_eq!(s.columns().len(), 1);
    assert!(s.dashboard().deepest_m.is_none());

    s.delete(0).unwrap();
    assert_eq!(s.columns().len(), Column::ALL.len());

    s.submit(DiveForm::new(day(1)).with_location("Blue Hole").with_depth(30.0, 40))
        .unwrap();
    let dash = s.dashboard();
    assert_eq!(dash.deepest_m, Some(30.0));
    assert_eq!(dash.total_duration_min, Some(40));
    assert_eq!(dash.depth_chart.map(|c| c.len()), Some(1));
}

#[test]
fn form_entry_after_partial_delete_keeps_narrowed_columns() {
    let mut s = session(LocationPolicy::AllowUnverified);
    s.import_sources([("sites.csv", "Location\nReef\nWall\n".as_bytes())]);
    s.delete(0).unwrap();
    s.submit(DiveForm::new(day(1)).with_location("Blue Hole").with_depth(30.0, 40))
        .unwrap();

    assert_eq!(s.columns().len(), 1);
    assert!(s.dashboard().deepest_m.is_none());
}
