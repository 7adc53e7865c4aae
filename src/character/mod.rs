//! Character composition root: rig locators, hold slots, the animation
//! manager and the behavior scheduler behind one `update(dt)` entry point.

pub mod hold;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::clip::AnimationClip;
use crate::animation::layering::AnimationManager;
use crate::animation::waiters::{Command, WaitId, WaitKind};
use crate::behavior::{BehaviorScheduler, TaskDef};
use crate::errors::{Result, VulpineError};

pub use hold::{HOLD_FADE_TIME, Hand, HoldSlot, Prop};

/// Locator the head look-at collaborator drives.
pub const HEAD_LOCATOR: &str = "Head";
/// Locator the main-hand hold slot parents props under.
pub const MAIN_HAND_LOCATOR: &str = "RightHandLocator";
/// Locator the off-hand hold slot parents props under.
pub const OFF_HAND_LOCATOR: &str = "LeftHandLocator";

/// Opaque scene-node handle supplied by the host's scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Named locator table extracted from the loaded model by the asset layer.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    locators: FxHashMap<String, NodeId>,
}

impl Rig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_locator(mut self, name: impl Into<String>, node: NodeId) -> Self {
        self.locators.insert(name.into(), node);
        self
    }

    #[must_use]
    pub fn locator(&self, name: &str) -> Option<NodeId> {
        self.locators.get(name).copied()
    }

    fn require(&self, name: &str) -> Result<NodeId> {
        self.locator(name)
            .ok_or_else(|| VulpineError::LocatorNotFound(name.to_owned()))
    }
}

/// One rigged character instance.
///
/// All state is rebuilt from the clip list at construction; nothing is
/// persisted. The host render loop calls [`Character::update`] once per
/// frame, which advances animation time and ticks the behavior scheduler.
pub struct Character {
    manager: AnimationManager,
    scheduler: BehaviorScheduler,
    head: NodeId,
    main_hand: HoldSlot,
    off_hand: HoldSlot,
}

impl Character {
    /// Builds a character from its rig and clip list.
    ///
    /// Fails when a required locator (`Head`, `RightHandLocator`,
    /// `LeftHandLocator`) is missing or a clip name is registered twice.
    /// Synthetic empty-hand hold clips are appended before registration so
    /// bare-handed props always have a grip pose to reference.
    pub fn new(rig: &Rig, mut clips: Vec<Arc<AnimationClip>>) -> Result<Self> {
        let head = rig.require(HEAD_LOCATOR)?;
        let main_hand = rig.require(MAIN_HAND_LOCATOR)?;
        let off_hand = rig.require(OFF_HAND_LOCATOR)?;

        clips.push(Arc::new(AnimationClip::empty("hold_mainhand:empty")));
        clips.push(Arc::new(AnimationClip::empty("hold_offhand:empty")));

        Ok(Self {
            manager: AnimationManager::new(clips)?,
            scheduler: BehaviorScheduler::new(TaskDef::standard_set()),
            head,
            main_hand: HoldSlot::new(Hand::Main, main_hand),
            off_hand: HoldSlot::new(Hand::Off, off_hand),
        })
    }

    /// Advances animation time by `dt` seconds and ticks the behavior
    /// scheduler. Call exactly once per render frame.
    pub fn update(&mut self, dt: f32) {
        self.manager.update(dt);
        self.scheduler.update(dt, &mut self.manager);
    }

    #[must_use]
    pub fn animations(&self) -> &AnimationManager {
        &self.manager
    }

    pub fn animations_mut(&mut self) -> &mut AnimationManager {
        &mut self.manager
    }

    #[must_use]
    pub fn scheduler(&self) -> &BehaviorScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut BehaviorScheduler {
        &mut self.scheduler
    }

    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    #[must_use]
    pub fn slot(&self, hand: Hand) -> &HoldSlot {
        match hand {
            Hand::Main => &self.main_hand,
            Hand::Off => &self.off_hand,
        }
    }

    /// Equips `prop` in the given hand, swapping out whatever was held.
    pub fn attach(&mut self, hand: Hand, prop: Prop) {
        let Self {
            manager,
            main_hand,
            off_hand,
            ..
        } = self;
        match hand {
            Hand::Main => main_hand.attach(manager, prop),
            Hand::Off => off_hand.attach(manager, prop),
        }
    }

    /// Unequips the given hand, returning the prop that was held.
    pub fn detach(&mut self, hand: Hand) -> Option<Prop> {
        let Self {
            manager,
            main_hand,
            off_hand,
            ..
        } = self;
        match hand {
            Hand::Main => main_hand.detach(manager),
            Hand::Off => off_hand.detach(manager),
        }
    }

    /// Swings the held prop. Fails when nothing is held or the prop does not
    /// support swinging with that hand.
    pub fn swing(&mut self, hand: Hand) -> Result<()> {
        let Self {
            manager,
            main_hand,
            off_hand,
            ..
        } = self;
        match hand {
            Hand::Main => main_hand.play_variant(manager, Prop::swing_clip),
            Hand::Off => off_hand.play_variant(manager, Prop::swing_clip),
        }
    }

    /// Eats the held prop, if it is edible in that hand.
    pub fn eat(&mut self, hand: Hand) -> Result<()> {
        let Self {
            manager,
            main_hand,
            off_hand,
            ..
        } = self;
        match hand {
            Hand::Main => main_hand.play_variant(manager, Prop::eat_clip),
            Hand::Off => off_hand.play_variant(manager, Prop::eat_clip),
        }
    }

    /// Scripted one-shot: plays `name` clamped for `loops` iterations with a
    /// fade-in, then fades it back out and stops it once it finishes. The
    /// returned ticket resolves when the initial play-through ends; callers
    /// may ignore it.
    pub fn perform(&mut self, name: &str, loops: u32, fade: f32) -> Result<WaitId> {
        let key = self.manager.play_clamped(name, loops, fade)?;
        Ok(self.manager.schedule(
            WaitKind::Finished(key),
            Command::FadeOutStop { action: key, fade },
        ))
    }
}
