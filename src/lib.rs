#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Vulpine drives a rigged, skinned character: it layers dozens of named
//! animation clips into a conflict-free motion stream and autonomously picks
//! idle behaviors over time.
//!
//! The crate has no rendering, windowing or asset I/O surface. The host loads
//! clips, builds a [`Rig`] from its scene graph, constructs a [`Character`]
//! and calls [`Character::update`] once per render frame.

pub mod animation;
pub mod behavior;
pub mod character;
pub mod errors;

pub use animation::{
    ActionKey, AnimationAction, AnimationClip, AnimationManager, AnimationMixer, LoopMode,
    MixerEvent, Tier, WaitId,
};
pub use behavior::{BehaviorScheduler, TaskDef, TaskKind};
pub use character::{Character, Hand, NodeId, Prop, Rig};
pub use errors::{Result, VulpineError};
