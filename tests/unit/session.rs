use super::*;
use crate::transition::{accessor::Lifecycle, ease::Ease};
use serde_json::json;

fn step(value: f64) -> Step {
    serde_json::from_value(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": value, "shape": {"kind": "circle", "r": value}}
    ]}]}))
    .unwrap()
}

#[test]
fn empty_session_has_no_frame() {
    let session = AnimationSession::default();
    assert!(session.frame(0.5).is_none());
    assert!(session.tree().is_none());
    assert!(!session.is_animating(0.0, &Playback::default()));
}

#[test]
fn advance_chains_transitions() {
    let mut session = AnimationSession::new(StoryOptions::default()).unwrap();
    session.advance(&step(1.0)).unwrap();
    let tree = session.advance(&step(2.0)).unwrap();
    let x = &tree.groups[0].children[0].transition;
    assert_eq!(x.state, Lifecycle::Update);
    assert_eq!(x.from.value, 1.0);
    assert_eq!(session.generation(), 2);

    let frame = session.frame(0.5).unwrap();
    assert_eq!(frame.groups[0].children[0].snapshot.value, 1.5);
}

#[test]
fn invalid_step_leaves_session_untouched() {
    let mut session = AnimationSession::new(StoryOptions::default()).unwrap();
    session.advance(&step(1.0)).unwrap();
    assert!(session.advance(&step(-1.0)).is_err());
    assert_eq!(session.generation(), 1);
    assert_eq!(session.frame(1.0).unwrap().groups[0].children[0].snapshot.value, 1.0);
}

#[test]
fn reset_makes_the_next_step_enter() {
    let mut session = AnimationSession::new(StoryOptions::default()).unwrap();
    session.advance(&step(1.0)).unwrap();
    session.reset();
    assert!(session.frame(1.0).is_none());
    let tree = session.advance(&step(2.0)).unwrap();
    assert_eq!(tree.groups[0].children[0].state(), Lifecycle::Enter);
}

#[test]
fn frame_at_maps_elapsed_time() {
    let playback = Playback::new(100.0, Ease::Linear).unwrap();
    let session =
        AnimationSession::morph(StoryOptions::default(), &step(2.0), &step(4.0)).unwrap();
    let frame = session.frame_at(25.0, &playback).unwrap();
    assert_eq!(frame.t, 0.25);
    assert_eq!(frame.groups[0].children[0].snapshot.value, 2.5);
    assert!(session.is_animating(25.0, &playback));
    assert!(!session.is_animating(100.0, &playback));
}

#[test]
fn rejects_bad_options() {
    let options = StoryOptions {
        duration_ms: -1.0,
        ..StoryOptions::default()
    };
    assert!(AnimationSession::new(options).is_err());
}

#[test]
fn double_teleport_claim_is_refused_before_composing() {
    let mut session = AnimationSession::new(StoryOptions::default()).unwrap();
    session.advance(&step(5.0)).unwrap();
    let split: Step = serde_json::from_value(json!({"groups": [
        {"key": "B", "data": [{"key": "x", "value": 8, "shape": {"kind": "circle", "r": 1}, "teleportFrom": "A:x"}]},
        {"key": "C", "data": [{"key": "x", "value": 8, "shape": {"kind": "circle", "r": 1}, "teleportFrom": "A:x"}]}
    ]}))
    .unwrap();
    assert!(session.advance(&split).is_err());
    assert_eq!(session.generation(), 1);
    let keys: Vec<_> = session.tree().unwrap().groups.iter().map(|g| g.key()).collect();
    assert_eq!(keys, vec!["A"]);
}
