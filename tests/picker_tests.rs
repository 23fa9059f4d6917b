//! Integration tests driving the picker the way a host UI would, with the
//! provider replaced by in-memory fakes and the async runtime replaced by a
//! queue the test drains by hand.

mod common;

use common::{mount, ready_picker, settle, FakeProvider};
use location_picker::{
    Error, EventHandled, GeocodeResponse, GeocodeStatus, InteractiveView, LatLng, LocationPicker,
    MapEvent, PickerConfig, PickerView, PlaceResult, Point, Readiness,
};
use std::sync::{atomic::Ordering, Arc};

fn interactive(picker: &LocationPicker) -> InteractiveView {
    match picker.view() {
        PickerView::Interactive(view) => view,
        PickerView::Placeholder => panic!("picker is still loading"),
    }
}

fn assert_close(actual: LatLng, expected: LatLng) {
    assert!(
        (actual.lat - expected.lat).abs() < 1e-9 && (actual.lng - expected.lng).abs() < 1e-9,
        "{actual} != {expected}"
    );
}

fn canberra() -> LatLng {
    LatLng::new(-35.2809, 149.13)
}

#[test]
fn test_placeholder_until_provider_loads() {
    let (mut picker, spawner) = mount(Arc::new(FakeProvider::new()), PickerConfig::default());

    assert_eq!(picker.readiness(), Readiness::Loading);
    assert_eq!(picker.view(), PickerView::Placeholder);
    assert_eq!(picker.selection(), None);
    assert_eq!(picker.address(), None);
    assert!(picker.has_pending_work());

    // Nothing is wired up yet
    assert_eq!(
        picker.handle_map_click(LatLng::new(1.0, 2.0)),
        EventHandled::NotHandled
    );
    assert_eq!(
        picker.handle_place_selected(&PlaceResult::at(LatLng::new(1.0, 2.0))),
        EventHandled::NotHandled
    );
    assert_eq!(picker.set_query("Syd"), EventHandled::NotHandled);
    assert_eq!(spawner.pending(), 1);

    settle(&mut picker, &spawner);

    let view = interactive(&picker);
    assert_close(view.camera_center, canberra());
    assert_eq!(view.zoom, 15.0);
    assert_close(view.marker.position(), canberra());
    assert_eq!(view.address, "");
    assert!(view.suggestions.is_empty());
    assert!(!picker.has_pending_work());
}

#[test]
fn test_load_failure_keeps_placeholder() {
    let (mut picker, spawner) = mount(
        Arc::new(FakeProvider::failing_to_load()),
        PickerConfig::default(),
    );

    spawner.run_all();
    assert!(!picker.poll());

    assert_eq!(picker.readiness(), Readiness::Loading);
    assert_eq!(picker.view(), PickerView::Placeholder);
    assert_eq!(
        picker.handle_map_click(LatLng::new(1.0, 2.0)),
        EventHandled::NotHandled
    );
}

#[test]
fn test_mount_uses_configured_center() {
    let config = PickerConfig {
        default_center: LatLng::new(51.5074, -0.1278),
        initial_zoom: 11.0,
        ..PickerConfig::default()
    };
    let (mut picker, spawner) = mount(Arc::new(FakeProvider::new()), config);
    settle(&mut picker, &spawner);

    let view = interactive(&picker);
    assert_close(view.camera_center, LatLng::new(51.5074, -0.1278));
    assert_eq!(view.zoom, 11.0);
}

#[test]
fn test_click_moves_marker_and_camera_before_geocoding() {
    let provider = Arc::new(FakeProvider::new());
    let (mut picker, spawner) = ready_picker(provider);
    let clicked = LatLng::new(-35.30, 149.10);

    assert_eq!(picker.handle_map_click(clicked), EventHandled::Handled);

    // Synchronous part: selection, marker and camera agree immediately
    let view = interactive(&picker);
    assert_close(picker.selection().unwrap().position, clicked);
    assert_close(view.marker.position(), clicked);
    assert_close(view.camera_center, clicked);
    assert_eq!(view.zoom, 15.0);
    assert_eq!(view.address, "");
    assert!(picker.has_pending_work());

    settle(&mut picker, &spawner);

    assert_eq!(picker.address(), Some("1 Example St, Canberra"));
    assert!(!picker.has_pending_work());
}

#[test]
fn test_click_keeps_current_zoom() {
    let (mut picker, _spawner) = ready_picker(Arc::new(FakeProvider::new()));

    picker.zoom_camera(12.0, None);
    picker.handle_map_click(LatLng::new(-35.30, 149.10));

    assert_eq!(interactive(&picker).zoom, 12.0);
}

#[test]
fn test_failed_geocode_shows_coordinates() {
    let provider = Arc::new(FakeProvider::answering(|_| {
        Ok(GeocodeResponse::failed(GeocodeStatus::ZeroResults))
    }));
    let (mut picker, spawner) = ready_picker(provider);

    picker.handle_map_click(LatLng::new(-35.3, 149.1));
    settle(&mut picker, &spawner);

    assert_eq!(picker.address(), Some("-35.3, 149.1"));
}

#[test]
fn test_geocode_error_shows_coordinates() {
    let provider = Arc::new(FakeProvider::answering(|_| {
        Err(Error::Provider {
            status: "REQUEST_DENIED".to_string(),
            message: "bad key".to_string(),
        })
    }));
    let (mut picker, spawner) = ready_picker(provider);

    picker.handle_map_click(LatLng::new(12.5, -7.25));
    settle(&mut picker, &spawner);

    assert_eq!(picker.address(), Some("12.5, -7.25"));
}

#[test]
fn test_ok_without_results_shows_coordinates() {
    let provider = Arc::new(FakeProvider::answering(|_| Ok(GeocodeResponse::ok(Vec::new()))));
    let (mut picker, spawner) = ready_picker(provider);

    picker.handle_map_click(LatLng::new(0.5, 0.25));
    settle(&mut picker, &spawner);

    assert_eq!(picker.address(), Some("0.5, 0.25"));
}

#[test]
fn test_geocoder_created_once() {
    let provider = Arc::new(FakeProvider::new());
    let (mut picker, spawner) = ready_picker(provider.clone());

    assert_eq!(provider.geocoders_created.load(Ordering::SeqCst), 0);

    for i in 0..3 {
        picker.handle_map_click(LatLng::new(-35.0 - i as f64 * 0.01, 149.0));
        settle(&mut picker, &spawner);
    }

    assert_eq!(provider.geocoders_created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stale_geocode_reply_is_discarded() {
    let provider = Arc::new(FakeProvider::answering(|at| {
        Ok(GeocodeResponse::ok(vec![
            PlaceResult::at(at).with_address(format!("near {}", at))
        ]))
    }));
    let (mut picker, spawner) = ready_picker(provider);
    let first = LatLng::new(-35.1, 149.1);
    let second = LatLng::new(-35.2, 149.2);

    picker.handle_map_click(first);
    picker.handle_map_click(second);
    assert_eq!(spawner.pending(), 2);

    // The second click resolves first, then the first one straggles in
    spawner.run(1);
    picker.poll();
    assert_eq!(picker.address(), Some("near -35.2, 149.2"));

    spawner.run(0);
    assert!(!picker.poll());
    assert_eq!(picker.address(), Some("near -35.2, 149.2"));
    assert_close(picker.selection().unwrap().position, second);
}

#[test]
fn test_place_with_geometry_recenters_at_selection_zoom() {
    let (mut picker, _spawner) = ready_picker(Arc::new(FakeProvider::new()));
    let sydney = LatLng::new(-33.87, 151.21);

    picker.zoom_camera(9.0, None);
    assert_eq!(
        picker.handle_place_selected(&PlaceResult::at(sydney)),
        EventHandled::Handled
    );

    let view = interactive(&picker);
    assert_close(view.camera_center, sydney);
    assert_eq!(view.zoom, 15.0);
    assert_close(view.marker.position(), sydney);
    assert_close(picker.selection().unwrap().position, sydney);
    assert_eq!(picker.selection().unwrap().revision, 1);
}

#[test]
fn test_polar_click_keeps_marker_and_camera_together() {
    let (mut picker, _spawner) = ready_picker(Arc::new(FakeProvider::new()));
    let clicked = LatLng::new(88.0, 10.0);

    picker.handle_map_click(clicked);

    let view = interactive(&picker);
    assert_close(picker.selection().unwrap().position, clicked);
    assert_close(view.marker.position(), clicked);
    assert_close(view.camera_center, clicked);
}

#[test]
fn test_polar_place_keeps_marker_and_camera_together() {
    let (mut picker, _spawner) = ready_picker(Arc::new(FakeProvider::new()));
    let station = LatLng::new(-89.0, 139.27);

    picker.handle_place_selected(&PlaceResult::at(station));

    let view = interactive(&picker);
    assert_close(view.marker.position(), station);
    assert_close(view.camera_center, station);
    assert_eq!(view.zoom, 15.0);
}

#[test]
fn test_place_without_geometry_changes_nothing() {
    let (mut picker, _spawner) = ready_picker(Arc::new(FakeProvider::new()));
    let before = interactive(&picker);

    let place = PlaceResult {
        name: Some("Somewhere vague".to_string()),
        ..PlaceResult::default()
    };
    assert_eq!(picker.handle_place_selected(&place), EventHandled::Handled);

    assert_eq!(interactive(&picker), before);
    assert_eq!(picker.selection().unwrap().revision, 0);
}

#[test]
fn test_search_selection_discards_pending_geocode() {
    let (mut picker, spawner) = ready_picker(Arc::new(FakeProvider::new()));

    picker.handle_map_click(LatLng::new(-35.3, 149.1));
    picker.handle_place_selected(&PlaceResult::at(LatLng::new(-33.87, 151.21)));
    settle(&mut picker, &spawner);

    // The click's address would now describe the wrong point
    assert_eq!(picker.address(), Some(""));
    assert_close(
        picker.selection().unwrap().position,
        LatLng::new(-33.87, 151.21),
    );
}

#[test]
fn test_typing_fetches_suggestions_for_latest_query() {
    let provider = Arc::new(FakeProvider::new());
    let (mut picker, spawner) = ready_picker(provider.clone());

    assert_eq!(picker.set_query("S"), EventHandled::Handled);
    assert_eq!(picker.set_query("Sydney"), EventHandled::Handled);
    assert_eq!(picker.address(), Some("Sydney"));
    settle(&mut picker, &spawner);

    let view = interactive(&picker);
    assert_eq!(view.suggestions.len(), 2);
    assert_eq!(view.suggestions[0].description, "Sydney NSW, Australia");
    assert_eq!(provider.autocompletes_created.load(Ordering::SeqCst), 1);

    // Clearing the field clears the list without a request
    picker.set_query("   ");
    assert_eq!(spawner.pending(), 0);
    assert!(interactive(&picker).suggestions.is_empty());
}

#[test]
fn test_picking_a_suggestion_commits_the_place() {
    let (mut picker, spawner) = ready_picker(Arc::new(FakeProvider::new()));

    picker.set_query("Sydney");
    settle(&mut picker, &spawner);
    assert_eq!(picker.select_suggestion(0), EventHandled::Handled);

    let view = interactive(&picker);
    assert_eq!(view.address, "Sydney NSW, Australia");
    assert!(view.suggestions.is_empty());

    settle(&mut picker, &spawner);

    let view = interactive(&picker);
    assert_close(view.camera_center, LatLng::new(-33.87, 151.21));
    assert_eq!(view.zoom, 15.0);
    assert_close(view.marker.position(), LatLng::new(-33.87, 151.21));
    assert_eq!(view.address, "Sydney NSW, Australia");
}

#[test]
fn test_suggestion_without_geometry_is_ignored() {
    let (mut picker, spawner) = ready_picker(Arc::new(FakeProvider::new()));

    picker.set_query("Blue");
    settle(&mut picker, &spawner);
    picker.select_suggestion(1);
    settle(&mut picker, &spawner);

    assert_close(picker.selection().unwrap().position, canberra());
    assert_eq!(picker.select_suggestion(5), EventHandled::NotHandled);
}

#[test]
fn test_click_after_picking_suggestion_wins() {
    let (mut picker, spawner) = ready_picker(Arc::new(FakeProvider::new()));
    let clicked = LatLng::new(-35.3, 149.1);

    picker.set_query("Sydney");
    settle(&mut picker, &spawner);
    picker.select_suggestion(0);
    picker.handle_map_click(clicked);
    settle(&mut picker, &spawner);

    assert_close(picker.selection().unwrap().position, clicked);
    assert_eq!(picker.address(), Some("1 Example St, Canberra"));
}

#[test]
fn test_gestures_move_camera_but_not_selection() {
    let (mut picker, _spawner) = ready_picker(Arc::new(FakeProvider::new()));

    assert_eq!(
        picker.handle_map_event(MapEvent::Drag {
            delta: Point::new(120.0, -40.0),
        }),
        EventHandled::Handled
    );
    assert_eq!(
        picker.handle_map_event(MapEvent::Scroll {
            delta: -2.0,
            position: Point::new(400.0, 300.0),
        }),
        EventHandled::Handled
    );

    let view = interactive(&picker);
    assert!((view.camera_center.lng - canberra().lng).abs() > 1e-6);
    assert_eq!(view.zoom, 13.0);
    assert_close(view.marker.position(), canberra());
    assert_close(picker.selection().unwrap().position, canberra());
    assert_eq!(picker.selection().unwrap().revision, 0);
}

#[test]
fn test_gestures_can_be_disabled() {
    let mut config = PickerConfig::default();
    config.map_options.gestures = false;
    let (mut picker, spawner) = mount(Arc::new(FakeProvider::new()), config);
    settle(&mut picker, &spawner);

    assert_eq!(
        picker.pan_camera_by(Point::new(50.0, 50.0)),
        EventHandled::NotHandled
    );
    assert_eq!(picker.zoom_camera(3.0, None), EventHandled::NotHandled);

    // Clicks still select
    let clicked = LatLng::new(-35.3, 149.1);
    assert_eq!(
        picker.handle_map_event(MapEvent::Click {
            lat_lng: clicked,
            pixel: Point::new(10.0, 10.0),
        }),
        EventHandled::Handled
    );
    assert_close(picker.selection().unwrap().position, clicked);
}

#[test]
fn test_unmount_with_work_in_flight() {
    let (mut picker, spawner) = ready_picker(Arc::new(FakeProvider::new()));

    picker.handle_map_click(LatLng::new(-35.3, 149.1));
    picker.set_query("Syd");
    picker.unmount();
    assert_eq!(spawner.cancelled(), 2);

    // Replies for a torn-down picker go nowhere
    spawner.run_all();
    assert_eq!(spawner.pending(), 0);
}

#[test]
fn test_task_that_dies_without_replying_is_not_pending() {
    let (mut picker, spawner) = ready_picker(Arc::new(FakeProvider::new()));

    picker.handle_map_click(LatLng::new(-35.3, 149.1));
    assert!(picker.has_pending_work());

    spawner.abandon(0);

    assert!(!picker.has_pending_work());
    assert!(!picker.poll());
    // The field keeps its previous contents
    assert_eq!(picker.address(), Some(""));
}

#[test]
fn test_finished_reply_counts_as_pending_until_polled() {
    let (mut picker, spawner) = ready_picker(Arc::new(FakeProvider::new()));

    picker.handle_map_click(LatLng::new(-35.3, 149.1));
    spawner.run_all();

    assert!(picker.has_pending_work());
    assert!(picker.poll());
    assert!(!picker.has_pending_work());
}
