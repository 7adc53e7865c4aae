//! Animation Action Tests
//!
//! Tests for:
//! - Loop modes (Once, Repeat, Forever) and their playback events
//! - Clamp-on-finish behavior
//! - Fade-in / fade-out weight interpolation
//! - Zero-length synthetic clips

use std::sync::Arc;

use vulpine::animation::action::{AnimationAction, LoopMode, PlaybackEvent};
use vulpine::animation::clip::AnimationClip;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_clip(duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        "test",
        vec!["root".to_owned()],
        duration,
    ))
}

// ============================================================================
// Loop Modes
// ============================================================================

#[test]
fn once_finishes_and_deactivates() {
    let mut action = AnimationAction::new(make_clip(2.0));
    action.loop_mode = LoopMode::Once;
    action.play();

    let events = action.update(3.0);
    assert_eq!(events.as_slice(), &[PlaybackEvent::Finished]);
    assert!(!action.enabled, "unclamped Once should deactivate");
    assert!(approx(action.time, 0.0), "unclamped Once rewinds");
}

#[test]
fn once_clamped_holds_end_pose() {
    let mut action = AnimationAction::new(make_clip(2.0));
    action.loop_mode = LoopMode::Once;
    action.clamp_when_finished = true;
    action.play();

    let events = action.update(2.5);
    assert_eq!(events.as_slice(), &[PlaybackEvent::Finished]);
    assert!(action.enabled, "clamped Once stays enabled");
    assert!(action.paused, "clamped Once pauses at the end");
    assert!(approx(action.time, 2.0), "clamped Once holds the end pose");
}

#[test]
fn once_finishes_only_once() {
    let mut action = AnimationAction::new(make_clip(1.0));
    action.loop_mode = LoopMode::Once;
    action.clamp_when_finished = true;
    action.play();

    assert_eq!(action.update(1.5).len(), 1);
    assert!(action.update(1.0).is_empty(), "no events while holding pose");
}

#[test]
fn forever_wraps_and_reports_loops() {
    let mut action = AnimationAction::new(make_clip(1.0));
    action.play();

    let events = action.update(2.5);
    assert_eq!(
        events.as_slice(),
        &[PlaybackEvent::Looped, PlaybackEvent::Looped],
        "a large dt crosses several loop boundaries"
    );
    assert!(approx(action.time, 0.5), "got {}", action.time);
}

#[test]
fn repeat_loops_then_finishes() {
    let mut action = AnimationAction::new(make_clip(1.0));
    action.loop_mode = LoopMode::Repeat(3);
    action.clamp_when_finished = true;
    action.play();

    assert_eq!(action.update(1.2).as_slice(), &[PlaybackEvent::Looped]);
    assert_eq!(action.update(1.0).as_slice(), &[PlaybackEvent::Looped]);
    assert_eq!(action.update(1.0).as_slice(), &[PlaybackEvent::Finished]);
    assert!(action.paused);
}

#[test]
fn zero_duration_finishes_immediately() {
    let mut action = AnimationAction::new(Arc::new(AnimationClip::empty("hold_mainhand:empty")));
    action.loop_mode = LoopMode::Once;
    action.clamp_when_finished = true;
    action.play();

    assert_eq!(action.update(0.016).as_slice(), &[PlaybackEvent::Finished]);
    assert!(action.enabled && action.paused);
}

// ============================================================================
// Play / Stop State
// ============================================================================

#[test]
fn play_restarts_from_zero() {
    let mut action = AnimationAction::new(make_clip(2.0));
    action.play();
    action.update(0.7);
    assert!(approx(action.time, 0.7));

    action.play();
    assert!(approx(action.time, 0.0), "play() restarts the clip");
}

#[test]
fn stopped_action_does_not_advance() {
    let mut action = AnimationAction::new(make_clip(2.0));
    action.play();
    action.stop();

    assert!(action.update(1.0).is_empty());
    assert!(approx(action.time, 0.0));
}

// ============================================================================
// Fades
// ============================================================================

#[test]
fn fade_in_ramps_weight_to_one() {
    let mut action = AnimationAction::new(make_clip(10.0));
    action.play();
    action.fade_in(0.5);
    assert!(approx(action.weight(), 0.0), "fade-in starts at zero weight");

    action.update(0.25);
    assert!(approx(action.weight(), 0.5), "got {}", action.weight());

    action.update(0.5);
    assert!(approx(action.weight(), 1.0));
}

#[test]
fn fade_out_ramps_from_current_weight() {
    let mut action = AnimationAction::new(make_clip(10.0));
    action.play();
    action.fade_in(1.0);
    action.update(0.5); // weight 0.5
    action.fade_out(0.5);

    action.update(0.25);
    assert!(approx(action.weight(), 0.25), "got {}", action.weight());

    action.update(0.5);
    assert!(approx(action.weight(), 0.0));
}

#[test]
fn fade_advances_while_clamped() {
    // A finished, clamped action must still be able to fade out.
    let mut action = AnimationAction::new(make_clip(1.0));
    action.loop_mode = LoopMode::Once;
    action.clamp_when_finished = true;
    action.play();
    action.update(1.5);
    assert!(action.paused);

    action.fade_out(0.5);
    action.update(0.25);
    assert!(approx(action.weight(), 0.5), "got {}", action.weight());
}
