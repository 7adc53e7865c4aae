//! Animation Layering Tests
//!
//! Tests for:
//! - Tier classification from clip names
//! - Track-based conflict detection
//! - Auto-start of ambient tiers at registration
//! - Conflict stops and Parallel immunity
//! - Self-healing resume of interrupted PreParallel animations

use std::sync::Arc;

use vulpine::animation::clip::AnimationClip;
use vulpine::animation::layering::Tier;
use vulpine::{AnimationManager, LoopMode, MixerEvent, VulpineError};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn clip(name: &str, tracks: &[&str], duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        name,
        tracks.iter().map(|t| (*t).to_owned()).collect(),
        duration,
    ))
}

/// idle and pre_parallel1 fight over the `root` track; parallel1 animates
/// an unrelated track.
fn make_manager() -> AnimationManager {
    AnimationManager::new(vec![
        clip("idle", &["root"], 2.0),
        clip("pre_parallel1", &["root"], 1.0),
        clip("parallel1", &["tail_track"], 1.0),
    ])
    .unwrap()
}

// ============================================================================
// Tier Classification
// ============================================================================

#[test]
fn classify_tiers_from_names() {
    assert_eq!(Tier::classify("parallel1"), Tier::Parallel);
    assert_eq!(Tier::classify("parallel12"), Tier::Parallel);
    assert_eq!(Tier::classify("pre_parallel1"), Tier::PreParallel);
    assert_eq!(Tier::classify("pre_parallel42"), Tier::PreParallel);
    assert_eq!(Tier::classify("ear"), Tier::PreParallel);
    assert_eq!(Tier::classify("blink"), Tier::PreParallel);
    assert_eq!(Tier::classify("tail"), Tier::PreParallel);
}

#[test]
fn classify_rejects_malformed_names() {
    // A bare prefix or a non-numeric suffix is an ordinary clip.
    assert_eq!(Tier::classify("parallel"), Tier::Normal);
    assert_eq!(Tier::classify("parallelx"), Tier::Normal);
    assert_eq!(Tier::classify("pre_parallel"), Tier::Normal);
    assert_eq!(Tier::classify("idle"), Tier::Normal);
    assert_eq!(Tier::classify("ears"), Tier::Normal);
}

// ============================================================================
// Conflict Detection
// ============================================================================

#[test]
fn conflict_is_shared_track_and_symmetric() {
    let a = clip("a", &["root", "tail_track"], 1.0);
    let b = clip("b", &["tail_track"], 1.0);
    let c = clip("c", &["arm"], 1.0);

    assert!(a.conflicts_with(&b));
    assert!(b.conflicts_with(&a), "conflict must be symmetric");
    assert!(!a.conflicts_with(&c));
    assert!(!c.conflicts_with(&b));
}

#[test]
fn trackless_clips_never_conflict() {
    let empty = Arc::new(AnimationClip::empty("hold_mainhand:empty"));
    let a = clip("a", &["root"], 1.0);
    assert!(!empty.conflicts_with(&a));
    assert!(!a.conflicts_with(&empty));
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn duplicate_clip_name_is_rejected() {
    let result = AnimationManager::new(vec![
        clip("idle", &["root"], 2.0),
        clip("idle", &["arm"], 1.0),
    ]);
    assert!(matches!(result, Err(VulpineError::DuplicateClip(name)) if name == "idle"));
}

#[test]
fn ambient_tiers_start_at_registration() {
    let manager = make_manager();

    let parallel = manager.get("parallel1").unwrap();
    let pre = manager.get("pre_parallel1").unwrap();
    let idle = manager.get("idle").unwrap();

    assert!(manager.action(parallel).unwrap().is_running());
    assert!(manager.action(pre).unwrap().is_running());
    assert!(!manager.action(idle).unwrap().enabled, "Normal clips wait for play()");
}

#[test]
fn unknown_clip_lookup() {
    let mut manager = make_manager();
    assert!(manager.get("nope").is_none());
    assert!(matches!(
        manager.play("nope"),
        Err(VulpineError::ClipNotFound(name)) if name == "nope"
    ));
    assert!(manager.play_or_warn("nope").is_none());
}

// ============================================================================
// Conflict Resolution on Play
// ============================================================================

#[test]
fn play_stops_conflicting_pre_parallel() {
    let mut manager = make_manager();
    let pre = manager.get("pre_parallel1").unwrap();

    manager.play("idle").unwrap();

    assert!(!manager.action(pre).unwrap().enabled);
    let idle = manager.get("idle").unwrap();
    assert!(manager.action(idle).unwrap().is_running());
}

#[test]
fn parallel_tier_is_immune_to_conflicts() {
    let mut manager = AnimationManager::new(vec![
        clip("brush", &["tail_track"], 1.0),
        clip("parallel1", &["tail_track"], 1.0),
    ])
    .unwrap();
    let parallel = manager.get("parallel1").unwrap();

    manager.play("brush").unwrap();

    assert!(
        manager.action(parallel).unwrap().is_running(),
        "a conflicting foreground clip must not stop a Parallel layer"
    );
}

#[test]
fn play_restarts_running_clip() {
    let mut manager = make_manager();
    let idle = manager.play("idle").unwrap();
    manager.update(0.7);
    assert!(approx(manager.action(idle).unwrap().time, 0.7));

    manager.play("idle").unwrap();
    assert!(approx(manager.action(idle).unwrap().time, 0.0));
}

// ============================================================================
// Self-Healing Resume
// ============================================================================

#[test]
fn interrupted_pre_parallel_resumes_after_target_finishes() {
    let mut manager = make_manager();
    let pre = manager.get("pre_parallel1").unwrap();

    let idle = manager.play("idle").unwrap();
    manager.action_mut(idle).unwrap().loop_mode = LoopMode::Once;
    assert!(!manager.action(pre).unwrap().enabled);

    // Still mid-playthrough: nothing resumes.
    manager.update(1.0);
    assert!(!manager.action(pre).unwrap().enabled);

    // Crossing the end fires Finished and the resume runs the same frame,
    // starting the fade-in from zero weight.
    manager.update(1.5);
    let resumed = manager.action(pre).unwrap();
    assert!(resumed.is_running());
    assert!(approx(resumed.weight(), 0.0));

    // Half the default 0.5 s fade.
    manager.update(0.25);
    assert!(approx(manager.action(pre).unwrap().weight(), 0.5));

    manager.update(0.5);
    assert!(approx(manager.action(pre).unwrap().weight(), 1.0));
}

// ============================================================================
// Frame Events
// ============================================================================

#[test]
fn update_surfaces_loop_events() {
    let mut manager = make_manager();
    let parallel = manager.get("parallel1").unwrap();

    manager.update(1.2); // parallel1 has a 1.0 s Forever loop
    assert!(manager.events().contains(&MixerEvent::Looped(parallel)));

    manager.update(0.1);
    assert!(manager.events().is_empty(), "events are cleared every frame");
}
