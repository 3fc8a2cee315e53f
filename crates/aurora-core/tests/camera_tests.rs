// Integration tests for the camera view state machine.

use aurora_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// 0.25 is exact in binary, so 8 ticks land on the 2 s duration exactly.
const DT: f32 = 0.25;

fn counter() -> (Rc<Cell<u32>>, ArrivalCallback) {
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    (calls, Box::new(move |_: ViewName| c.set(c.get() + 1)))
}

#[test]
fn starts_settled_on_initial_view() {
    let cam = ViewController::new(ViewName::Space);
    assert_eq!(cam.current_view(), Some(ViewName::Space));
    assert_eq!(cam.pose(), ViewName::Space.pose());
    assert!(!cam.is_transitioning());
    assert_eq!(cam.duration(), TRANSITION_DURATION_SEC);
}

#[test]
fn callback_fires_once_on_arrival_and_not_before() {
    let mut cam = ViewController::new(ViewName::Space);
    let arrived: Rc<RefCell<Vec<ViewName>>> = Rc::new(RefCell::new(Vec::new()));
    let log = arrived.clone();
    cam.transition_to(
        ViewName::NorthPole,
        Some(Box::new(move |v: ViewName| log.borrow_mut().push(v))),
    );
    assert_eq!(cam.current_view(), None);
    assert_eq!(cam.target_view(), Some(ViewName::NorthPole));

    for _ in 0..7 {
        cam.tick(DT);
        assert!(arrived.borrow().is_empty());
        assert!(cam.progress().is_some_and(|p| p < 1.0));
    }
    cam.tick(DT);
    assert_eq!(arrived.borrow().as_slice(), &[ViewName::NorthPole]);
    assert_eq!(cam.current_view(), Some(ViewName::NorthPole));
    assert_eq!(cam.pose(), ViewName::NorthPole.pose());

    for _ in 0..10 {
        cam.tick(DT);
    }
    assert_eq!(arrived.borrow().len(), 1);
}

#[test]
fn pose_moves_monotonically_toward_destination() {
    let mut cam = ViewController::new(ViewName::Space);
    let dest = ViewName::SouthPole.pose();
    cam.transition_to(ViewName::SouthPole, None);
    let mut last = cam.pose().eye.distance(dest.eye);
    for _ in 0..8 {
        cam.tick(DT);
        let d = cam.pose().eye.distance(dest.eye);
        assert!(d <= last + 1e-5, "moved away: {d} > {last}");
        last = d;
    }
    assert!(last < 1e-5);
}

#[test]
fn superseded_transition_drops_its_callback() {
    let mut cam = ViewController::new(ViewName::Space);
    let (first, cb1) = counter();
    let (second, cb2) = counter();
    cam.transition_to(ViewName::NorthPole, Some(cb1));
    for _ in 0..4 {
        cam.tick(DT);
    }
    let mid = cam.pose();

    cam.transition_to(ViewName::SouthPole, Some(cb2));
    // restarts from the mid-flight pose, not from a view
    assert_eq!(cam.pose(), mid);
    assert_eq!(cam.progress(), Some(0.0));
    for _ in 0..7 {
        cam.tick(DT);
    }
    assert_eq!(second.get(), 0);
    cam.tick(DT);
    assert_eq!(second.get(), 1);
    assert_eq!(first.get(), 0);
    assert_eq!(cam.current_view(), Some(ViewName::SouthPole));

    for _ in 0..8 {
        cam.tick(DT);
    }
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn transition_to_current_view_still_reports_arrival() {
    let mut cam = ViewController::new(ViewName::Space);
    let (calls, cb) = counter();
    cam.transition_to(ViewName::Space, Some(cb));
    for _ in 0..8 {
        cam.tick(DT);
    }
    assert_eq!(calls.get(), 1);
    assert_eq!(cam.pose(), ViewName::Space.pose());
}

#[test]
fn idle_tick_changes_nothing() {
    let mut cam = ViewController::new(ViewName::NorthPole);
    let before = cam.pose();
    for dt in [DT, 1.0, 0.0, f32::NAN] {
        cam.tick(dt);
    }
    assert_eq!(cam.pose(), before);
    assert_eq!(cam.current_view(), Some(ViewName::NorthPole));
    assert_eq!(cam.progress(), None);
}

#[test]
fn garbage_dt_does_not_advance_transition() {
    let mut cam = ViewController::new(ViewName::Space);
    cam.transition_to(ViewName::NorthPole, None);
    cam.tick(f32::NAN);
    cam.tick(-3.0);
    assert_eq!(cam.progress(), Some(0.0));
    assert!(cam.pose().eye.is_finite());
}

#[test]
fn snap_cancels_transition_without_callback() {
    let mut cam = ViewController::new(ViewName::Space);
    let (calls, cb) = counter();
    cam.transition_to(ViewName::NorthPole, Some(cb));
    cam.tick(DT);
    cam.snap_to(ViewName::SouthPole);
    assert_eq!(cam.current_view(), Some(ViewName::SouthPole));
    assert_eq!(cam.pose(), ViewName::SouthPole.pose());
    for _ in 0..16 {
        cam.tick(DT);
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn custom_duration_is_honoured() {
    let mut cam = ViewController::new(ViewName::Space).with_duration(0.5);
    let (calls, cb) = counter();
    cam.transition_to(ViewName::NorthPole, Some(cb));
    cam.tick(DT);
    assert_eq!(calls.get(), 0);
    cam.tick(DT);
    assert_eq!(calls.get(), 1);
}

#[test]
fn callback_waits_for_the_full_duration() {
    let mut cam = ViewController::new(ViewName::Space).with_duration(1.0);
    let (calls, cb) = counter();
    cam.transition_to(ViewName::NorthPole, Some(cb));
    cam.tick(1.0 - 5e-5);
    assert_eq!(calls.get(), 0);
    assert!(cam.is_transitioning());
    assert_eq!(cam.current_view(), None);
    cam.tick(1e-3);
    assert_eq!(calls.get(), 1);
    assert_eq!(cam.current_view(), Some(ViewName::NorthPole));
    assert_eq!(cam.pose(), ViewName::NorthPole.pose());
}

#[test]
fn view_names_parse_console_aliases() {
    assert_eq!("north".parse::<ViewName>(), Ok(ViewName::NorthPole));
    assert_eq!("southPole".parse::<ViewName>(), Ok(ViewName::SouthPole));
    let err = "mars".parse::<ViewName>().unwrap_err();
    assert_eq!(err.to_string(), "unknown camera view `mars`");
}

#[test]
fn projection_and_view_matrices_are_finite() {
    for v in ViewName::ALL {
        let pose = v.pose();
        assert!(pose.view_matrix().is_finite());
        assert!(pose.projection_matrix(16.0 / 9.0).is_finite());
        assert!(pose.projection_matrix(0.0).is_finite());
    }
}
