//! Per-hand hold slots and equippable props.
//!
//! A slot owns the "currently attached prop" reference directly and performs
//! the attach/detach itself; the scene-graph parenting under the hand's
//! locator node is the host's job, driven by the slot state. Only the hold
//! *animation* is asynchronous: attaching fades the hold pose in, detaching
//! fades it out and stops it once the weight settles. The prop reference
//! itself always changes immediately.

use std::f32::consts::PI;

use glam::{EulerRot, Quat, Vec3};

use crate::animation::action::LoopMode;
use crate::animation::layering::AnimationManager;
use crate::character::NodeId;
use crate::errors::{Result, VulpineError};

/// Fade length for hold-in / hold-out transitions.
pub const HOLD_FADE_TIME: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Main,
    Off,
}

/// An equippable prop: its hold pose per hand, optional hand-specific action
/// variants, and the local mount transform under the hand locator.
///
/// Props are plain data descriptors; one prop can only be held in one slot
/// at a time because attaching moves it into the slot.
#[derive(Debug, Clone)]
pub struct Prop {
    pub kind: String,
    hold_main: String,
    hold_off: String,
    swing_main: Option<String>,
    swing_off: Option<String>,
    eat_main: Option<String>,
    eat_off: Option<String>,
    /// Local rotation applied by the host when parenting under the locator.
    pub mount_rotation: Quat,
    /// Local offset applied by the host when parenting under the locator.
    pub mount_offset: Vec3,
}

impl Prop {
    /// A prop holding with the given hold-animation family
    /// (`hold_mainhand:<family>` / `hold_offhand:<family>`) and the default
    /// swing variants.
    #[must_use]
    pub fn with_hold_family(kind: impl Into<String>, family: &str) -> Self {
        Self {
            kind: kind.into(),
            hold_main: format!("hold_mainhand:{family}"),
            hold_off: format!("hold_offhand:{family}"),
            swing_main: Some("swing_hand".to_owned()),
            swing_off: Some("use_offhand".to_owned()),
            eat_main: None,
            eat_off: None,
            mount_rotation: Quat::IDENTITY,
            mount_offset: Vec3::ZERO,
        }
    }

    /// A sword: dedicated main-hand swing, no off-hand swing at all.
    #[must_use]
    pub fn sword() -> Self {
        let mut prop = Self::with_hold_family("sword", "sword");
        prop.swing_main = Some("swing:sword".to_owned());
        prop.swing_off = None;
        prop.mount_rotation = Quat::from_euler(EulerRot::XYZ, PI * 1.4, PI * 0.5, 0.0);
        prop
    }

    /// A torch, held with the axe-family grip.
    #[must_use]
    pub fn torch() -> Self {
        Self::with_hold_family("torch", "axe")
    }

    /// An apple: empty-hand grip plus per-hand eat animations.
    #[must_use]
    pub fn apple() -> Self {
        let mut prop = Self::with_hold_family("apple", "empty");
        prop.eat_main = Some("use_mainhand:eat".to_owned());
        prop.eat_off = Some("use_offhand:eat".to_owned());
        prop
    }

    #[must_use]
    pub fn hold_clip(&self, hand: Hand) -> &str {
        match hand {
            Hand::Main => &self.hold_main,
            Hand::Off => &self.hold_off,
        }
    }

    pub fn swing_clip(&self, hand: Hand) -> Result<&str> {
        let clip = match hand {
            Hand::Main => self.swing_main.as_deref(),
            Hand::Off => self.swing_off.as_deref(),
        };
        clip.ok_or(VulpineError::UnsupportedOperation(
            "prop cannot swing in this hand",
        ))
    }

    pub fn eat_clip(&self, hand: Hand) -> Result<&str> {
        let clip = match hand {
            Hand::Main => self.eat_main.as_deref(),
            Hand::Off => self.eat_off.as_deref(),
        };
        clip.ok_or(VulpineError::UnsupportedOperation("prop is not edible"))
    }
}

/// One hand's attachment point. Holds at most one prop.
#[derive(Debug)]
pub struct HoldSlot {
    hand: Hand,
    locator: NodeId,
    prop: Option<Prop>,
}

impl HoldSlot {
    #[must_use]
    pub(crate) fn new(hand: Hand, locator: NodeId) -> Self {
        Self {
            hand,
            locator,
            prop: None,
        }
    }

    #[must_use]
    pub fn hand(&self) -> Hand {
        self.hand
    }

    /// The locator node this slot parents props under.
    #[must_use]
    pub fn locator(&self) -> NodeId {
        self.locator
    }

    #[must_use]
    pub fn held(&self) -> Option<&Prop> {
        self.prop.as_ref()
    }

    /// Equips `prop`, swapping out (and fading out) whatever was held.
    pub(crate) fn attach(&mut self, manager: &mut AnimationManager, prop: Prop) {
        if self.prop.is_some() {
            self.detach(manager);
        }
        // A missing hold clip degrades to an unanimated grip.
        let clip = prop.hold_clip(self.hand).to_owned();
        if let Err(err) = manager.play_clamped(&clip, 1, HOLD_FADE_TIME) {
            log::warn!("{err}");
        }
        self.prop = Some(prop);
    }

    /// Unequips the held prop, if any, returning it. The prop leaves the
    /// slot immediately; only the hold animation's fade-out is deferred.
    pub(crate) fn detach(&mut self, manager: &mut AnimationManager) -> Option<Prop> {
        let prop = self.prop.take()?;
        if let Some(key) = manager.get(prop.hold_clip(self.hand)) {
            manager.fade_out_stop(key, HOLD_FADE_TIME);
        }
        Some(prop)
    }

    /// Plays a hand-specific one-shot variant looked up from the held prop.
    pub(crate) fn play_variant(
        &self,
        manager: &mut AnimationManager,
        pick: impl Fn(&Prop, Hand) -> Result<&str>,
    ) -> Result<()> {
        let prop = self
            .prop
            .as_ref()
            .ok_or(VulpineError::UnsupportedOperation("no prop held"))?;
        let clip = pick(prop, self.hand)?.to_owned();
        let key = manager.play(&clip)?;
        if let Some(action) = manager.action_mut(key) {
            action.loop_mode = LoopMode::Once;
            action.clamp_when_finished = true;
        }
        Ok(())
    }
}
