use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{AnimationAction, PlaybackEvent};

new_key_type! {
    /// Stable handle for one action within a mixer.
    pub struct ActionKey;
}

/// Per-frame playback notification, keyed by action identity.
///
/// These are the "finished" / "loop" signals the wait primitives are built
/// on; they are valid for exactly one frame and cleared by the next
/// [`AnimationMixer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerEvent {
    Finished(ActionKey),
    Looped(ActionKey),
}

/// Owns every [`AnimationAction`] of one character and advances them all
/// once per frame.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: SlotMap<ActionKey, AnimationAction>,
    events: Vec<MixerEvent>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: AnimationAction) -> ActionKey {
        self.actions.insert(action)
    }

    #[must_use]
    pub fn get(&self, key: ActionKey) -> Option<&AnimationAction> {
        self.actions.get(key)
    }

    pub fn get_mut(&mut self, key: ActionKey) -> Option<&mut AnimationAction> {
        self.actions.get_mut(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ActionKey> + '_ {
        self.actions.keys()
    }

    /// Advances every action by `dt` and records this frame's playback
    /// events. Must be called exactly once per render frame, with
    /// monotonic, non-negative deltas.
    pub fn update(&mut self, dt: f32) {
        self.events.clear();
        for (key, action) in &mut self.actions {
            for event in action.update(dt) {
                self.events.push(match event {
                    PlaybackEvent::Finished => MixerEvent::Finished(key),
                    PlaybackEvent::Looped => MixerEvent::Looped(key),
                });
            }
        }
    }

    /// The playback events emitted by the most recent [`Self::update`].
    #[must_use]
    pub fn events(&self) -> &[MixerEvent] {
        &self.events
    }
}
