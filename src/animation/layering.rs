//! Tier-based animation layering and conflict resolution.
//!
//! Every clip is classified once at registration:
//!
//! - `Parallel` (`parallel<N>`) — always-on ambient layers. Never stopped by
//!   [`AnimationManager::play`].
//! - `PreParallel` (`pre_parallel<N>`, or the fixed names `ear` / `blink` /
//!   `tail`) — ambient secondary motions. A conflicting foreground animation
//!   stops them, and they are replayed automatically once it finishes.
//! - `Normal` — everything else.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SecondaryMap;
use smallvec::SmallVec;

use crate::animation::action::{AnimationAction, LoopMode};
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::{ActionKey, AnimationMixer, MixerEvent};
use crate::animation::waiters::{self, Command, WaitId, WaitKind, WaitPoll, WaitQueue};
use crate::errors::{Result, VulpineError};

/// Fade-in length used when an interrupted ambient animation resumes.
pub const DEFAULT_FADE_TIME: f32 = 0.5;

/// Priority classification of a clip, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Parallel,
    PreParallel,
    Normal,
}

impl Tier {
    #[must_use]
    pub fn classify(name: &str) -> Tier {
        if matches!(name, "ear" | "blink" | "tail") || indexed(name, "pre_parallel") {
            Tier::PreParallel
        } else if indexed(name, "parallel") {
            Tier::Parallel
        } else {
            Tier::Normal
        }
    }
}

/// `<prefix><digits>` with at least one digit.
fn indexed(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Registry and layer engine for one character's actions.
///
/// Owns the mixer, the name→action map, the per-action tier table and the
/// pending wait queue. All mutation funnels through [`Self::update`], called
/// once per render frame.
#[derive(Debug, Default)]
pub struct AnimationManager {
    mixer: AnimationMixer,
    by_name: FxHashMap<String, ActionKey>,
    tiers: SecondaryMap<ActionKey, Tier>,
    waits: WaitQueue,
    /// Resolved tickets not yet observed. Entries exist only for waits
    /// whose [`WaitId`] was handed to a caller, and [`Self::wait_done`]
    /// removes them, so the set stays bounded by outstanding tickets.
    completed_waits: FxHashSet<WaitId>,
}

impl AnimationManager {
    /// Registers every clip and starts the ambient tiers: all `Parallel`
    /// actions are started raw in reverse registration order, then all
    /// `PreParallel` actions are started through [`Self::play`] so their own
    /// conflict-stop logic runs even during initialization.
    pub fn new(clips: Vec<Arc<AnimationClip>>) -> Result<Self> {
        let mut manager = Self::default();
        let mut parallels = Vec::new();
        let mut pre_parallels = Vec::new();

        for clip in clips {
            if manager.by_name.contains_key(&clip.name) {
                return Err(VulpineError::DuplicateClip(clip.name.clone()));
            }
            let tier = Tier::classify(&clip.name);
            let name = clip.name.clone();
            let key = manager.mixer.add_action(AnimationAction::new(clip));
            manager.by_name.insert(name, key);
            manager.tiers.insert(key, tier);
            match tier {
                Tier::Parallel => parallels.push(key),
                Tier::PreParallel => pre_parallels.push(key),
                Tier::Normal => {}
            }
        }

        for &key in parallels.iter().rev() {
            if let Some(action) = manager.mixer.get_mut(key) {
                action.play();
            }
        }
        for &key in pre_parallels.iter().rev() {
            manager.play_key(key);
        }

        Ok(manager)
    }

    /// Looks up an action by clip name. No mutation, never fails.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ActionKey> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn action(&self, key: ActionKey) -> Option<&AnimationAction> {
        self.mixer.get(key)
    }

    pub fn action_mut(&mut self, key: ActionKey) -> Option<&mut AnimationAction> {
        self.mixer.get_mut(key)
    }

    #[must_use]
    pub fn tier(&self, key: ActionKey) -> Option<Tier> {
        self.tiers.get(key).copied()
    }

    /// Plays `name`, stopping every conflicting non-`Parallel` action first.
    ///
    /// Stopped `PreParallel` actions are replayed automatically (with a
    /// [`DEFAULT_FADE_TIME`] fade-in) once the target action finishes.
    /// Calling `play` for a clip that is already running restarts it.
    pub fn play(&mut self, name: &str) -> Result<ActionKey> {
        let key = self
            .get(name)
            .ok_or_else(|| VulpineError::ClipNotFound(name.to_owned()))?;
        self.play_key(key);
        Ok(key)
    }

    /// Log-and-ignore variant of [`Self::play`] for transient runtime
    /// callers: a missing clip must not take down the frame loop.
    pub fn play_or_warn(&mut self, name: &str) -> Option<ActionKey> {
        match self.play(name) {
            Ok(key) => Some(key),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }

    fn play_key(&mut self, target: ActionKey) {
        let Some(target_clip) = self.mixer.get(target).map(|a| a.clip().clone()) else {
            return;
        };

        let mut interrupted: SmallVec<[ActionKey; 4]> = SmallVec::new();
        let keys: SmallVec<[ActionKey; 16]> = self.mixer.keys().collect();
        for key in keys {
            if key == target {
                continue;
            }
            let tier = self.tiers.get(key).copied().unwrap_or(Tier::Normal);
            if tier == Tier::Parallel {
                continue;
            }
            let Some(action) = self.mixer.get_mut(key) else {
                continue;
            };
            if action.clip().conflicts_with(&target_clip) {
                action.stop();
                if tier == Tier::PreParallel {
                    action.clamp_when_finished = true;
                    interrupted.push(key);
                }
            }
        }

        if !interrupted.is_empty() {
            self.waits.schedule(
                WaitKind::Finished(target),
                Command::Resume {
                    actions: interrupted,
                    fade: DEFAULT_FADE_TIME,
                },
            );
        }

        if let Some(action) = self.mixer.get_mut(target) {
            action.play();
        }
    }

    /// Configures and plays a one-shot: `Once` (or `Repeat(loops)` for
    /// `loops > 1`), clamped at the end pose, with a fade-in.
    pub fn play_clamped(&mut self, name: &str, loops: u32, fade: f32) -> Result<ActionKey> {
        let key = self.play(name)?;
        if let Some(action) = self.mixer.get_mut(key) {
            action.clamp_when_finished = true;
            action.loop_mode = if loops > 1 {
                LoopMode::Repeat(loops)
            } else {
                LoopMode::Once
            };
            action.fade_in(fade);
        }
        Ok(key)
    }

    /// Starts a fade-out and stops the action once its weight settles at 0.
    pub fn fade_out_stop(&mut self, key: ActionKey, fade: f32) {
        if let Some(action) = self.mixer.get_mut(key) {
            action.fade_out(fade);
        }
        self.waits
            .schedule(WaitKind::weight_settled(key, 0.0), Command::Stop(key));
    }

    // ========================================================================
    // Wait primitives
    // ========================================================================

    /// Resolves on the action's next `Finished` event.
    pub fn wait_finished(&mut self, key: ActionKey) -> WaitId {
        self.waits
            .schedule_tracked(WaitKind::Finished(key), Command::None)
    }

    /// Resolves after the action loops `loops` more times.
    pub fn wait_loop_count(&mut self, key: ActionKey, loops: u32) -> WaitId {
        self.waits.schedule_tracked(
            WaitKind::LoopCount {
                action: key,
                remaining: loops,
            },
            Command::None,
        )
    }

    /// Resolves once the action's weight holds at `target` (0 or 1) for two
    /// consecutive frames. May never resolve if the poll budget runs out.
    pub fn wait_weight_settled(&mut self, key: ActionKey, target: f32) -> WaitId {
        self.waits
            .schedule_tracked(WaitKind::weight_settled(key, target), Command::None)
    }

    /// Whether a previously scheduled wait has resolved. Consumes the
    /// ticket: returns `true` exactly once per resolved wait.
    #[must_use]
    pub fn wait_done(&mut self, id: WaitId) -> bool {
        self.completed_waits.remove(&id)
    }

    /// Resolved tickets not yet observed through [`Self::wait_done`].
    #[must_use]
    pub fn completed_wait_count(&self) -> usize {
        self.completed_waits.len()
    }

    pub(crate) fn schedule(&mut self, kind: WaitKind, command: Command) -> WaitId {
        self.waits.schedule_tracked(kind, command)
    }

    pub(crate) fn schedule_untracked(&mut self, kind: WaitKind, command: Command) {
        self.waits.schedule(kind, command);
    }

    // ========================================================================
    // Frame update
    // ========================================================================

    /// Advances every action by `dt`, then polls pending waits against the
    /// freshly advanced state. Continuations that complete this frame always
    /// observe post-advance time and weights.
    pub fn update(&mut self, dt: f32) {
        self.mixer.update(dt);
        self.poll_waits();
    }

    /// This frame's playback events (valid until the next [`Self::update`]).
    #[must_use]
    pub fn events(&self) -> &[MixerEvent] {
        self.mixer.events()
    }

    fn poll_waits(&mut self) {
        if self.waits.is_empty() {
            return;
        }
        let events: SmallVec<[MixerEvent; 8]> = self.mixer.events().iter().copied().collect();

        // Waits scheduled by completion commands land in the queue after the
        // sweep and are first polled next frame.
        let mut pending = std::mem::take(&mut self.waits.pending);
        let mut fired = Vec::new();
        pending.retain_mut(|wait| match waiters::poll_wait(&self.mixer, wait, &events) {
            WaitPoll::Pending => true,
            WaitPoll::Done => {
                fired.push((wait.id, wait.tracked, std::mem::take(&mut wait.command)));
                false
            }
            WaitPoll::Abandoned => false,
        });
        pending.append(&mut self.waits.pending);
        self.waits.pending = pending;

        for (id, tracked, command) in fired {
            if tracked {
                self.completed_waits.insert(id);
            }
            self.run_command(command);
        }
    }

    fn run_command(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::Resume { actions, fade } => {
                for key in actions {
                    if let Some(action) = self.mixer.get_mut(key) {
                        log::debug!("resuming interrupted animation {:?}", action.clip().name);
                        action.play();
                        action.fade_in(fade);
                    }
                }
            }
            Command::Stop(key) => {
                if let Some(action) = self.mixer.get_mut(key) {
                    action.stop();
                }
            }
            Command::FadeOutStop { action, fade } => {
                self.fade_out_stop(action, fade);
            }
        }
    }
}
