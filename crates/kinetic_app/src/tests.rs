//! End-to-end tests for the wired application

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use kinetic_core::FetchRequest;
use serde_json::{json, Value};

use kinetic_animation::AnimationDriver;

use crate::prelude::*;

struct Scene {
    app: App,
    left: NodeId,
    right: NodeId,
    start: Instant,
}

/// Two side-by-side panels in a 400x200 body
fn scene(config: AppConfig) -> Scene {
    let mut app = App::with_config(config);
    let doc = app.document_mut();
    let body = doc.create_root("body", Rect::new(0.0, 0.0, 400.0, 200.0));
    let left = doc
        .append_child(body, "left", Rect::new(0.0, 0.0, 200.0, 200.0))
        .unwrap();
    let right = doc
        .append_child(body, "right", Rect::new(200.0, 0.0, 200.0, 200.0))
        .unwrap();
    Scene {
        app,
        left,
        right,
        start: Instant::now(),
    }
}

fn touch(phase: TouchPhase, id: u64, x: f32, y: f32, at: Instant) -> Event {
    Event::Input {
        event: InputEvent::Touch(TouchBatch::new(phase, [TouchPoint::new(id, x, y)])),
        at,
    }
}

fn record(app: &mut App) -> Rc<RefCell<Vec<(GestureKind, Option<NodeId>)>>> {
    let seen: Rc<RefCell<Vec<(GestureKind, Option<NodeId>)>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    app.on_gesture(move |n: &GestureNotification| {
        seen_clone.borrow_mut().push((n.kind, n.event.target));
    });
    seen
}

// ============================================================================
// Gestures
// ============================================================================

#[test]
fn test_touch_drag_across_panels() {
    let mut s = scene(AppConfig::default());
    let seen = record(&mut s.app);
    let t = s.start;

    s.app
        .run(&[
            touch(TouchPhase::Start, 1, 50.0, 50.0, t),
            touch(TouchPhase::Move, 1, 250.0, 50.0, t),
            touch(TouchPhase::End, 1, 250.0, 50.0, t),
        ])
        .unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            (GestureKind::Down, Some(s.left)),
            (GestureKind::Over, Some(s.left)),
            (GestureKind::Move, Some(s.right)),
            (GestureKind::Out, Some(s.left)),
            (GestureKind::Over, Some(s.right)),
            (GestureKind::Up, Some(s.right)),
            (GestureKind::Out, Some(s.right)),
        ]
    );
}

#[test]
fn test_malformed_input_is_dropped() {
    let mut s = scene(AppConfig::default());
    let seen = record(&mut s.app);

    let empty = Event::Input {
        event: InputEvent::Touch(TouchBatch::new(TouchPhase::Start, Vec::<TouchPoint>::new())),
        at: s.start,
    };
    assert_eq!(s.app.handle_event(&empty).unwrap(), EventResponse::Ignored);
    assert!(seen.borrow().is_empty());

    s.app
        .handle_event(&touch(TouchPhase::Start, 1, 50.0, 50.0, s.start))
        .unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_frames_restore_mouse_mode_after_idle() {
    let mut s = scene(AppConfig::from_toml_str("[gesture]\nreset_delay_ms = 100").unwrap());
    let t = s.start;

    s.app
        .run(&[
            touch(TouchPhase::Start, 1, 50.0, 50.0, t),
            touch(TouchPhase::End, 1, 50.0, 50.0, t),
        ])
        .unwrap();
    assert!(s.app.needs_frame());
    assert_eq!(s.app.next_deadline(), Some(t + Duration::from_millis(100)));

    s.app
        .handle_event(&Event::Frame(t + Duration::from_millis(50)))
        .unwrap();
    assert_eq!(s.app.gestures().mode(), InputMode::Touch);

    s.app
        .handle_event(&Event::Frame(t + Duration::from_millis(100)))
        .unwrap();
    assert_eq!(s.app.gestures().mode(), InputMode::Mouse);
    assert!(!s.app.needs_frame());
}

#[test]
fn test_compat_mouseup_restores_mouse_mode() {
    let mut s = scene(AppConfig::default());
    let seen = record(&mut s.app);
    let t = s.start;

    s.app
        .run(&[
            touch(TouchPhase::Start, 1, 50.0, 50.0, t),
            touch(TouchPhase::End, 1, 50.0, 50.0, t),
            Event::Input {
                event: InputEvent::Mouse(MouseEvent::ButtonPressed {
                    button: MouseButton::Left,
                    x: 50.0,
                    y: 50.0,
                }),
                at: t,
            },
            Event::Input {
                event: InputEvent::Mouse(MouseEvent::ButtonReleased {
                    button: MouseButton::Left,
                    x: 50.0,
                    y: 50.0,
                }),
                at: t,
            },
        ])
        .unwrap();

    // the compatibility press/release produced nothing
    assert_eq!(seen.borrow().len(), 4);
    assert_eq!(s.app.gestures().mode(), InputMode::Mouse);

    let press = Event::Input {
        event: InputEvent::Mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x: 250.0,
            y: 50.0,
        }),
        at: t,
    };
    s.app.handle_event(&press).unwrap();
    assert_eq!(
        seen.borrow()[4..],
        [
            (GestureKind::Down, Some(s.right)),
            (GestureKind::Over, Some(s.right)),
        ]
    );
}

#[test]
fn test_removed_gesture_listener_is_silent() {
    let mut s = scene(AppConfig::default());
    let seen = record(&mut s.app);
    let count = Rc::new(RefCell::new(0));
    let count_clone = Rc::clone(&count);
    let id = s.app.on_gesture(move |_: &GestureNotification| {
        *count_clone.borrow_mut() += 1;
    });

    s.app
        .handle_event(&touch(TouchPhase::Start, 1, 50.0, 50.0, s.start))
        .unwrap();
    assert_eq!(*count.borrow(), 2);

    assert!(s.app.remove_gesture_listener(id));
    assert!(!s.app.remove_gesture_listener(id));
    s.app
        .handle_event(&touch(TouchPhase::End, 1, 50.0, 50.0, s.start))
        .unwrap();
    assert_eq!(*count.borrow(), 2);
    assert_eq!(seen.borrow().len(), 4);
}

#[test]
fn test_fixed_viewport_from_config() {
    let config = AppConfig::from_toml_str("[gesture]\nfixed_viewport = true").unwrap();
    let mut s = scene(config);
    let t = s.start;

    s.app
        .handle_event(&touch(TouchPhase::Start, 1, 50.0, 50.0, t))
        .unwrap();
    let response = s
        .app
        .handle_event(&touch(TouchPhase::Move, 1, 60.0, 50.0, t))
        .unwrap();
    assert_eq!(response, EventResponse::PreventDefault);

    // an untracked finger does not ask for anything
    let response = s
        .app
        .handle_event(&touch(TouchPhase::Move, 2, 60.0, 50.0, t))
        .unwrap();
    assert_eq!(response, EventResponse::Ignored);
}

// ============================================================================
// Animation
// ============================================================================

fn slide() -> KeyframeSpec {
    KeyframeSpec::from_json(
        r#"{
            "keyFrame": {
                "0": {"left": 0, "opacity": 0},
                "50%": {"left": 50, "opacity": 1},
                "100": {"left": 100, "opacity": 1}
            },
            "duration": 1000
        }"#,
    )
    .unwrap()
}

#[test]
fn test_animation_runs_on_frames() {
    let mut s = scene(AppConfig::default());
    let t = s.start;
    let done: Rc<RefCell<Vec<SequenceContext>>> = Rc::new(RefCell::new(Vec::new()));
    let done_clone = Rc::clone(&done);

    let id = s
        .app
        .animate(
            s.left,
            slide(),
            t,
            Some(Box::new(move |ctx: &SequenceContext| {
                done_clone.borrow_mut().push(ctx.clone());
            })),
        )
        .unwrap();

    s.app.handle_event(&Event::Frame(t)).unwrap();
    s.app
        .handle_event(&Event::Frame(t + Duration::from_millis(250)))
        .unwrap();
    let left = s.app.pose(s.left).unwrap().get("left").unwrap();
    assert!((left - 25.0).abs() < 1e-3);

    s.app
        .handle_event(&Event::Frame(t + Duration::from_millis(500)))
        .unwrap();
    let completed = s.app.frame(t + Duration::from_millis(1000)).unwrap();

    assert_eq!(completed, vec![id]);
    let done = done.borrow();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].node, s.left);
    assert_eq!(done[0].pose.get("left"), Some(100.0));
    assert!(!s.app.needs_frame());
}

#[test]
fn test_reverse_through_app() {
    let mut s = scene(AppConfig::default());
    let t = s.start;

    assert!(!s.app.reverse(s.left, t));

    s.app
        .add_character(s.left, Pose::new().with("left", 0.0).with("opacity", 0.0));
    s.app.animate(s.left, slide(), t, None).unwrap();
    s.app.frame(t).unwrap();
    s.app.frame(t + Duration::from_millis(250)).unwrap();

    assert!(s.app.reverse(s.left, t + Duration::from_millis(400)));
    let character = {
        let id = s.app.driver().find(s.left).unwrap();
        s.app.driver().character(id).unwrap().clone()
    };
    assert!((character.duration_ms() - 400.0).abs() < 1e-3);
    assert_eq!(character.target().get("left"), Some(0.0));

    assert!(s.app.frame(t + Duration::from_millis(600)).unwrap().is_empty());
    let completed = s.app.frame(t + Duration::from_millis(900)).unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(s.app.pose(s.left).unwrap().get("left"), Some(0.0));
}

#[test]
fn test_animation_after_idle_gap_keeps_step_timing() {
    let mut s = scene(AppConfig::default());
    let t = s.start;
    s.app.frame(t).unwrap();

    let later = t + Duration::from_secs(10);
    s.app.animate(s.left, slide(), later, None).unwrap();
    assert!(s
        .app
        .frame(later + Duration::from_millis(16))
        .unwrap()
        .is_empty());

    // 16ms into the 500ms step from 0 to 50
    let left = s.app.pose(s.left).unwrap().get("left").unwrap();
    assert!((left - 1.6).abs() < 1e-3, "left = {}", left);
}

#[test]
fn test_next_frame_paced_by_target_fps() {
    let mut s = scene(AppConfig::from_toml_str("[animation]\ntarget_fps = 100").unwrap());
    let t = s.start;
    let interval = s.app.driver().frame_interval();
    assert_eq!(interval, Duration::from_millis(10));
    assert_eq!(s.app.next_frame_at(t), None);

    s.app.animate(s.left, slide(), t, None).unwrap();
    s.app.frame(t).unwrap();
    assert_eq!(s.app.next_frame_at(t), Some(t + interval));

    s.app.frame(t + Duration::from_millis(500)).unwrap();
    s.app.frame(t + Duration::from_millis(1000)).unwrap();
    assert_eq!(s.app.next_frame_at(t + Duration::from_millis(1000)), None);
}

#[test]
fn test_next_frame_waits_for_gesture_reset() {
    let mut s = scene(AppConfig::from_toml_str("[gesture]\nreset_delay_ms = 100").unwrap());
    let t = s.start;

    s.app
        .run(&[
            touch(TouchPhase::Start, 1, 50.0, 50.0, t),
            touch(TouchPhase::End, 1, 50.0, 50.0, t),
        ])
        .unwrap();
    let deadline = t + Duration::from_millis(100);
    assert_eq!(s.app.next_frame_at(t), Some(deadline));

    // a running animation asks for the earlier frame
    s.app.animate(s.left, slide(), t, None).unwrap();
    s.app.frame(t).unwrap();
    assert_eq!(
        s.app.next_frame_at(t),
        Some(t + s.app.driver().frame_interval())
    );
}

#[test]
fn test_invalid_keyframes_surface_as_errors() {
    let mut s = scene(AppConfig::default());
    let spec = KeyframeSpec::new(-5.0).at(0.0, Pose::new());
    let err = s.app.animate(s.left, spec, s.start, None).unwrap_err();
    assert!(matches!(err, AppError::Animation(_)));
}

// ============================================================================
// Stores
// ============================================================================

#[test]
fn test_store_fetch_merges_and_notifies() {
    let mut s = scene(AppConfig::from_toml_str("[store]\nsource = \"inbox\"").unwrap());
    let mut store = s.app.create_store();
    assert!(store.id().is_some());
    assert_eq!(store.source(), "inbox");

    let seen: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    s.app
        .listen(&mut store, move |data: &Value| {
            seen_clone.borrow_mut().push(data.clone())
        })
        .unwrap();

    store.add(json!({"user": {"name": "ada", "unread": 1}}));

    let mut source = |request: &FetchRequest| -> std::result::Result<Value, StoreError> {
        assert_eq!(request.source, "inbox");
        Ok(json!({"user": {"unread": 3}, "threads": [1, 2]}))
    };
    s.app.fetch(&mut store, &mut source).unwrap();

    let expected = json!({"user": {"name": "ada", "unread": 3}, "threads": [1, 2]});
    assert_eq!(store.data(), &expected);
    assert_eq!(*seen.borrow(), vec![expected]);
}

#[test]
fn test_store_fetch_failure_keeps_data() {
    let mut s = scene(AppConfig::default());
    let mut store = s.app.create_store();
    store.add(json!({"a": 1}));

    let mut source = |_: &FetchRequest| -> std::result::Result<Value, StoreError> {
        Err(StoreError::Source("offline".into()))
    };
    let err = s.app.fetch(&mut store, &mut source).unwrap_err();

    assert!(matches!(err, AppError::Store(StoreError::Source(_))));
    assert_eq!(store.data(), &json!({"a": 1}));
}

#[test]
fn test_replace_mode_store() {
    let mut s = scene(AppConfig::default());
    let mut store = s.app.create_store_with(StoreConfig {
        merge_root: false,
        ..StoreConfig::default()
    });
    store.add(json!({"a": 1}));
    store.add(json!({"b": 2}));
    assert_eq!(store.data(), &json!({"b": 2}));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_app_from_config_file() {
    let path = std::env::temp_dir().join(format!("kinetic-app-test-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[platform]\nnative_point_resolution = false\n\n[animation]\ntarget_fps = 60\n",
    )
    .unwrap();

    let app = App::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(app.driver().target_fps(), 60);
    assert_eq!(
        app.gestures().resolver().strategy(),
        kinetic_gesture::TargetStrategy::Traverse
    );
}

#[test]
fn test_missing_config_file_is_config_error() {
    let path = std::env::temp_dir().join("kinetic-app-test-does-not-exist.toml");
    let err = App::from_path(&path).unwrap_err();
    assert!(matches!(err, AppError::Config(message) if message.contains("No configuration found")));
}
