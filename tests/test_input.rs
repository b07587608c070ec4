use std::path::Path;

use crossterm::event::{KeyCode, KeyEventKind};

use starwave::config::{parse_key, KeyBindings};
use starwave::input::{KeyTracker, HOLD_WINDOW};

// ── Held-key tracking ────────────────────────────────────────────────────────

#[test]
fn pressed_key_is_held_within_the_window() {
    let mut t = KeyTracker::new();
    t.begin_frame();
    t.record(KeyCode::Left, KeyEventKind::Press);
    assert!(t.is_held(&KeyCode::Left));

    for _ in 0..HOLD_WINDOW {
        t.begin_frame();
    }
    assert!(t.is_held(&KeyCode::Left)); // last frame inside the window

    t.begin_frame();
    assert!(!t.is_held(&KeyCode::Left)); // expired
}

#[test]
fn repeat_refreshes_the_hold() {
    let mut t = KeyTracker::new();
    t.begin_frame();
    t.record(KeyCode::Char(' '), KeyEventKind::Press);

    for _ in 0..3 {
        t.begin_frame();
    }
    t.record(KeyCode::Char(' '), KeyEventKind::Repeat);

    for _ in 0..HOLD_WINDOW {
        t.begin_frame();
    }
    assert!(t.is_held(&KeyCode::Char(' ')));
}

#[test]
fn release_clears_immediately() {
    let mut t = KeyTracker::new();
    t.begin_frame();
    t.record(KeyCode::Right, KeyEventKind::Press);
    t.record(KeyCode::Right, KeyEventKind::Release);
    assert!(!t.is_held(&KeyCode::Right));
}

#[test]
fn snapshot_reflects_bound_keys() {
    let bindings = KeyBindings::default().resolve();
    let mut t = KeyTracker::new();
    t.begin_frame();
    t.record(KeyCode::Left, KeyEventKind::Press);
    t.record(KeyCode::Char(' '), KeyEventKind::Press);

    let input = t.snapshot(&bindings);
    assert!(input.left);
    assert!(input.fire);
    assert!(!input.right);
    assert!(!input.up);
    assert!(!input.down);
}

#[test]
fn snapshot_honours_rebound_keys() {
    let keys = KeyBindings {
        left: "a".to_string(),
        right: "d".to_string(),
        ..KeyBindings::default()
    };
    let bindings = keys.resolve();
    assert_eq!(bindings.left, KeyCode::Char('a'));

    let mut t = KeyTracker::new();
    t.begin_frame();
    t.record(KeyCode::Char('a'), KeyEventKind::Press);

    let input = t.snapshot(&bindings);
    assert!(input.left);
    assert!(!input.right);
}

// ── Key-binding config ───────────────────────────────────────────────────────

#[test]
fn parse_key_accepts_names_and_single_chars() {
    assert_eq!(parse_key("left"), Some(KeyCode::Left));
    assert_eq!(parse_key("Right"), Some(KeyCode::Right));
    assert_eq!(parse_key(" up "), Some(KeyCode::Up));
    assert_eq!(parse_key("space"), Some(KeyCode::Char(' ')));
    assert_eq!(parse_key("enter"), Some(KeyCode::Enter));
    assert_eq!(parse_key("z"), Some(KeyCode::Char('z')));

    assert_eq!(parse_key("ctrl+x"), None);
    assert_eq!(parse_key(""), None);
}

#[test]
fn default_bindings_are_arrows_and_space() {
    let b = KeyBindings::default().resolve();
    assert_eq!(b.left, KeyCode::Left);
    assert_eq!(b.right, KeyCode::Right);
    assert_eq!(b.up, KeyCode::Up);
    assert_eq!(b.down, KeyCode::Down);
    assert_eq!(b.fire, KeyCode::Char(' '));
}

#[test]
fn partial_config_fills_missing_fields_with_defaults() {
    let keys: KeyBindings =
        serde_json::from_str(r#"{ "left": "a", "fire": "enter" }"#).unwrap();
    assert_eq!(keys.left, "a");
    assert_eq!(keys.right, "right");

    let b = keys.resolve();
    assert_eq!(b.left, KeyCode::Char('a'));
    assert_eq!(b.fire, KeyCode::Enter);
}

#[test]
fn unparseable_name_falls_back_to_the_slot_default() {
    let keys = KeyBindings {
        fire: "control-space".to_string(),
        ..KeyBindings::default()
    };
    assert_eq!(keys.resolve().fire, KeyCode::Char(' '));
}

#[test]
fn missing_config_file_yields_defaults() {
    let keys = KeyBindings::load(Path::new("definitely/not/here/keys.json"));
    assert_eq!(keys, KeyBindings::default());
}
