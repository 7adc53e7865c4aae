//! Frame-polled wait primitives.
//!
//! All higher-level sequencing (fade-out → stop, self-healing resume after a
//! conflicting animation ends, prop equip/unequip) is expressed through these
//! waits; there is no other timer mechanism. A wait is a cooperative entry
//! stepped inside the manager's per-frame update, and its completion runs a
//! data-driven [`Command`] against the manager — no callbacks, no listener
//! registration, no async runtime.
//!
//! Waits cannot be cancelled. A `WeightSettled` wait whose poll budget runs
//! out is dropped without ever resolving; this mirrors the accepted liveness
//! gap of the original design and is not surfaced as an error.

use smallvec::SmallVec;

use crate::animation::action::AnimationAction;
use crate::animation::mixer::{ActionKey, AnimationMixer, MixerEvent};

/// Weight comparison tolerance for fade settling.
pub const SETTLE_TOLERANCE: f32 = 0.01;
/// Poll budget for fade settling; one poll happens per frame.
pub const SETTLE_MAX_POLLS: u32 = 1000;
/// Consecutive in-tolerance polls required before a fade counts as settled,
/// guarding against a single-frame transient crossing of the target.
const SETTLE_STABLE_POLLS: u8 = 2;

/// Opaque ticket for a scheduled wait. Callers may keep it to query
/// completion, or drop it fire-and-forget without affecting the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaitId(pub(crate) u64);

/// What a pending wait is waiting for.
#[derive(Debug, Clone)]
pub(crate) enum WaitKind {
    /// The next `Finished` event whose source is exactly this action.
    Finished(ActionKey),
    /// The n-th `Looped` event for this action, counted from scheduling.
    LoopCount { action: ActionKey, remaining: u32 },
    /// The action's blend weight holding at `target` (0 or 1) within
    /// tolerance for two consecutive frames.
    WeightSettled {
        action: ActionKey,
        target: f32,
        tolerance: f32,
        polls_left: u32,
        stable: u8,
    },
}

/// Continuation executed by the manager when a wait resolves.
#[derive(Debug, Clone, Default)]
pub(crate) enum Command {
    #[default]
    None,
    /// Replay the given actions with a fade-in (self-healing resume).
    Resume {
        actions: SmallVec<[ActionKey; 4]>,
        fade: f32,
    },
    /// Stop the action outright.
    Stop(ActionKey),
    /// Start a fade-out, then stop once the weight settles at zero.
    FadeOutStop { action: ActionKey, fade: f32 },
}

#[derive(Debug)]
pub(crate) struct Wait {
    pub id: WaitId,
    pub kind: WaitKind,
    pub command: Command,
    /// The ticket was handed to a caller, so completion must be recorded
    /// for `wait_done`. Internal fire-and-forget waits leave no trace.
    pub tracked: bool,
}

/// One polling step's verdict for a pending wait.
pub(crate) enum WaitPoll {
    Pending,
    Done,
    /// Poll budget exhausted or the action vanished: drop silently, never
    /// resolving.
    Abandoned,
}

#[derive(Debug, Default)]
pub(crate) struct WaitQueue {
    pub pending: Vec<Wait>,
    next_id: u64,
}

impl WaitQueue {
    /// Internal fire-and-forget wait; its completion is not recorded.
    pub fn schedule(&mut self, kind: WaitKind, command: Command) -> WaitId {
        self.push(kind, command, false)
    }

    /// Wait whose ticket is handed to a caller; its completion is recorded
    /// until observed through `wait_done`.
    pub fn schedule_tracked(&mut self, kind: WaitKind, command: Command) -> WaitId {
        self.push(kind, command, true)
    }

    fn push(&mut self, kind: WaitKind, command: Command, tracked: bool) -> WaitId {
        let id = WaitId(self.next_id);
        self.next_id += 1;
        self.pending.push(Wait {
            id,
            kind,
            command,
            tracked,
        });
        id
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Steps one wait against this frame's events and the current mixer state.
pub(crate) fn poll_wait(mixer: &AnimationMixer, wait: &mut Wait, events: &[MixerEvent]) -> WaitPoll {
    match &mut wait.kind {
        WaitKind::Finished(action) => {
            if events.contains(&MixerEvent::Finished(*action)) {
                WaitPoll::Done
            } else {
                WaitPoll::Pending
            }
        }
        WaitKind::LoopCount { action, remaining } => {
            let wraps = events
                .iter()
                .filter(|e| **e == MixerEvent::Looped(*action))
                .count() as u32;
            if wraps >= *remaining {
                WaitPoll::Done
            } else {
                *remaining -= wraps;
                WaitPoll::Pending
            }
        }
        WaitKind::WeightSettled {
            action,
            target,
            tolerance,
            polls_left,
            stable,
        } => {
            if *polls_left == 0 {
                return WaitPoll::Abandoned;
            }
            *polls_left -= 1;
            let Some(weight) = mixer.get(*action).map(AnimationAction::weight) else {
                return WaitPoll::Abandoned;
            };
            if (weight - *target).abs() <= *tolerance {
                *stable += 1;
                if *stable >= SETTLE_STABLE_POLLS {
                    return WaitPoll::Done;
                }
            } else {
                *stable = 0;
            }
            WaitPoll::Pending
        }
    }
}

impl WaitKind {
    pub fn weight_settled(action: ActionKey, target: f32) -> Self {
        WaitKind::WeightSettled {
            action,
            target,
            tolerance: SETTLE_TOLERANCE,
            polls_left: SETTLE_MAX_POLLS,
            stable: 0,
        }
    }
}
