//! Integration tests for the pointer provider lifecycle.
//!
//! # Purpose
//!
//! These tests drive a provider created through the [`ProviderRegistry`] the
//! same way a host framework does, with a [`MockWindowHost`] standing in for
//! the Win32 window.  They verify:
//!
//! - A full pen stroke (hover in, touch down, move, lift, hover out) arrives
//!   as exactly one `begin`, the updates, and one `end`, all with one uid.
//! - Messages the provider does not own still reach the original procedure.
//! - Lifecycle edge cases: double start, stop with undelivered events, and
//!   restart.
//!
//! # Message flow
//!
//! ```text
//! host.send(WM_POINTER*) ──► PointerInterceptor ──► EventQueue
//!                                                      │
//! provider.update(dispatch) ◄── UpdateDispatcher ◄─────┘
//! ```

use wm_pointer::application::intercept_messages::{InterceptorOptions, WindowMessage};
use wm_pointer::application::provider::{
    register_pointer_provider, MessageHook, MotionEventProvider, ProviderError, PROVIDER_NAME,
};
use wm_pointer::application::registry::ProviderRegistry;
use wm_pointer::infrastructure::message_hook::mock::MockWindowHost;
use wm_pointer_core::message::codes::{
    pack_lparam, QUERYSYSTEMGESTURE_REPLY, WM_POINTERDOWN, WM_POINTERENTER, WM_POINTERLEAVE,
    WM_POINTERUP, WM_POINTERUPDATE, WM_TABLET_QUERYSYSTEMGESTURE,
};
use wm_pointer_core::{ClientRect, EventKind, PenInfo, PointerUid};

const PEN_ID: u32 = 1;
const WM_SIZE: u32 = 0x0005;

/// Everything the host framework would see for one dispatched event.
#[derive(Debug, Clone, PartialEq)]
struct Seen {
    kind: EventKind,
    uid: PointerUid,
    pos: (f64, f64),
    pressure: u32,
}

fn make_host() -> MockWindowHost {
    let host = MockWindowHost::new();
    host.set_client_rect(Some(ClientRect {
        left: 100,
        top: 50,
        width: 800,
        height: 600,
    }));
    host.set_pen_info(
        PEN_ID,
        PenInfo {
            pressure: 300,
            ..PenInfo::default()
        },
    );
    host
}

fn make_provider(
    host: &MockWindowHost,
    options: InterceptorOptions,
) -> Box<dyn MotionEventProvider> {
    let mut registry = ProviderRegistry::new();
    let factory_host = host.clone();
    register_pointer_provider(&mut registry, options, move || {
        Ok(Box::new(factory_host.clone()) as Box<dyn MessageHook>)
    })
    .expect("register");
    registry.create(PROVIDER_NAME, "pen").expect("create")
}

fn pen(code: u32, screen_x: i32, screen_y: i32) -> WindowMessage {
    WindowMessage::new(code, PEN_ID as usize, pack_lparam(screen_x, screen_y))
}

fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
    assert!(
        (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

fn drain(provider: &mut dyn MotionEventProvider) -> Vec<Seen> {
    let mut seen = Vec::new();
    provider.update(&mut |kind, pointer| {
        seen.push(Seen {
            kind,
            uid: pointer.uid(),
            pos: pointer.pos(),
            pressure: pointer.pressure(),
        })
    });
    seen
}

// ── Stroke tests ──────────────────────────────────────────────────────────────

/// Hover-in plus touch-down yields one begin; lift plus hover-out one end.
#[test]
fn test_full_stroke_dispatches_begin_updates_end_with_one_uid() {
    // Arrange
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().expect("start");

    // Act: client origin is (100, 50), so screen (500, 200) is client (400, 150)
    host.send(pen(WM_POINTERENTER, 500, 200));
    host.send(pen(WM_POINTERDOWN, 500, 200));
    host.send(pen(WM_POINTERUPDATE, 580, 260));
    host.send(pen(WM_POINTERUPDATE, 660, 320));
    host.send(pen(WM_POINTERUP, 660, 320));
    host.send(pen(WM_POINTERLEAVE, 660, 320));
    let seen = drain(provider.as_mut());

    // Assert
    let kinds: Vec<EventKind> = seen.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Begin,
            EventKind::Update,
            EventKind::Update,
            EventKind::End
        ]
    );
    assert!(seen.iter().all(|s| s.uid == PointerUid(1)));
    assert_eq!(seen[0].pos, (0.5, 0.75));
    assert_close(seen[1].pos, (0.6, 0.65));
    assert!(seen.iter().all(|s| s.pressure == 300));
}

/// Events are dispatched in arrival order across several update calls.
#[test]
fn test_events_split_across_frames_keep_order() {
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    host.send(pen(WM_POINTERDOWN, 100, 50));
    let first = drain(provider.as_mut());
    host.send(pen(WM_POINTERUPDATE, 180, 110));
    host.send(pen(WM_POINTERUP, 180, 110));
    let second = drain(provider.as_mut());

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind, EventKind::Begin);
    assert_eq!(first[0].pos, (0.0, 1.0));
    assert_eq!(
        second.iter().map(|s| s.kind).collect::<Vec<_>>(),
        vec![EventKind::Update, EventKind::End]
    );
}

/// Two strokes get consecutive uids.
#[test]
fn test_second_stroke_gets_next_uid() {
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    for _ in 0..2 {
        host.send(pen(WM_POINTERDOWN, 300, 300));
        host.send(pen(WM_POINTERUP, 300, 300));
    }
    let seen = drain(provider.as_mut());

    let uids: Vec<PointerUid> = seen.iter().map(|s| s.uid).collect();
    assert_eq!(
        uids,
        vec![PointerUid(1), PointerUid(1), PointerUid(2), PointerUid(2)]
    );
}

/// A stroke whose end is lost must not swallow the next stroke.
#[test]
fn test_stroke_after_lost_end_gets_its_own_begin_and_uid() {
    // Arrange
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    // Act: the window is minimised while the pen lifts, so the up is dropped
    host.send(pen(WM_POINTERDOWN, 110, 60));
    host.set_client_rect(Some(ClientRect::with_size(0, 0)));
    host.send(pen(WM_POINTERUP, 110, 60));
    host.set_client_rect(Some(ClientRect {
        left: 100,
        top: 50,
        width: 800,
        height: 600,
    }));
    host.send(pen(WM_POINTERDOWN, 500, 350));
    host.send(pen(WM_POINTERUPDATE, 510, 360));
    host.send(pen(WM_POINTERUP, 510, 360));
    let seen = drain(provider.as_mut());

    // Assert
    let events: Vec<(EventKind, PointerUid)> = seen.iter().map(|s| (s.kind, s.uid)).collect();
    assert_eq!(
        events,
        vec![
            (EventKind::Begin, PointerUid(1)),
            (EventKind::Begin, PointerUid(2)),
            (EventKind::Update, PointerUid(2)),
            (EventKind::End, PointerUid(2)),
        ]
    );
    assert_eq!(seen[1].pos, (0.5, 0.5));
}

/// An update with no preceding contact is never dispatched.
#[test]
fn test_stray_update_without_contact_is_not_dispatched() {
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    host.send(pen(WM_POINTERUPDATE, 300, 300));
    host.send(pen(WM_POINTERUP, 300, 300));
    let seen = drain(provider.as_mut());

    assert!(seen.is_empty());
}

/// A pointer whose pen info cannot be read is skipped entirely.
#[test]
fn test_non_pen_pointer_is_skipped() {
    let host = make_host();
    host.remove_pen_info(PEN_ID);
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    let result = host.send(pen(WM_POINTERDOWN, 300, 300));
    let seen = drain(provider.as_mut());

    assert_eq!(result, 0);
    assert!(seen.is_empty());
}

/// Without a client area there is nothing to normalise against.
#[test]
fn test_missing_client_rect_drops_events() {
    let host = make_host();
    host.set_client_rect(None);
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    host.send(pen(WM_POINTERDOWN, 300, 300));

    assert!(drain(provider.as_mut()).is_empty());
}

// ── Forwarding tests ──────────────────────────────────────────────────────────

#[test]
fn test_non_pointer_messages_reach_original_procedure() {
    // Arrange
    let host = make_host();
    host.set_original_result(42);
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    // Act
    let result = host.send(WindowMessage::new(WM_SIZE, 0, pack_lparam(800, 600)));

    // Assert
    assert_eq!(result, 42);
    assert_eq!(
        host.forwarded(),
        vec![WindowMessage::new(WM_SIZE, 0, pack_lparam(800, 600))]
    );
}

#[test]
fn test_gesture_query_is_answered_when_enabled() {
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    let result = host.send(WindowMessage::new(WM_TABLET_QUERYSYSTEMGESTURE, 0, 0));

    assert_eq!(result, QUERYSYSTEMGESTURE_REPLY);
    assert!(host.forwarded().is_empty());
}

#[test]
fn test_gesture_query_is_forwarded_when_disabled() {
    let host = make_host();
    host.set_original_result(5);
    let mut provider = make_provider(
        &host,
        InterceptorOptions {
            disable_system_gestures: false,
        },
    );
    provider.start().unwrap();

    let result = host.send(WindowMessage::new(WM_TABLET_QUERYSYSTEMGESTURE, 0, 0));

    assert_eq!(result, 5);
    assert_eq!(host.forwarded().len(), 1);
}

// ── Lifecycle tests ───────────────────────────────────────────────────────────

#[test]
fn test_second_provider_on_same_window_fails_to_start() {
    let host = make_host();
    let mut first = make_provider(&host, InterceptorOptions::default());
    let mut second = make_provider(&host, InterceptorOptions::default());
    first.start().expect("first start");

    let result = second.start();

    assert!(matches!(result, Err(ProviderError::Hook(_))));
}

#[test]
fn test_start_twice_fails() {
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();

    assert!(matches!(provider.start(), Err(ProviderError::AlreadyStarted)));
}

/// Events queued before `stop` are discarded; the next session starts clean.
#[test]
fn test_stop_discards_undelivered_events_and_restart_works() {
    // Arrange
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();
    host.send(pen(WM_POINTERDOWN, 300, 300));
    host.send(pen(WM_POINTERUPDATE, 310, 310));

    // Act
    provider.stop().expect("stop");
    let after_stop = drain(provider.as_mut());
    provider.start().expect("restart");
    host.send(pen(WM_POINTERDOWN, 300, 300));
    let after_restart = drain(provider.as_mut());

    // Assert
    assert!(after_stop.is_empty());
    assert_eq!(after_restart.len(), 1);
    assert_eq!(after_restart[0].kind, EventKind::Begin);
    // The discarded stroke never got a uid
    assert_eq!(after_restart[0].uid, PointerUid(1));
}

#[test]
fn test_messages_after_stop_reach_original_procedure() {
    let host = make_host();
    let mut provider = make_provider(&host, InterceptorOptions::default());
    provider.start().unwrap();
    provider.stop().unwrap();

    host.send(pen(WM_POINTERDOWN, 300, 300));

    assert!(!host.is_installed());
    assert_eq!(host.forwarded().len(), 1);
}
