pub mod action;
pub mod clip;
pub mod layering;
pub mod mixer;
pub mod waiters;

pub use action::{AnimationAction, LoopMode, PlaybackEvent};
pub use clip::AnimationClip;
pub use layering::{AnimationManager, Tier, DEFAULT_FADE_TIME};
pub use mixer::{ActionKey, AnimationMixer, MixerEvent};
pub use waiters::WaitId;
