use std::sync::Arc;

use smallvec::SmallVec;

use crate::animation::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play through once, then finish.
    Once,
    /// Play the given number of iterations, then finish.
    Repeat(u32),
    /// Loop indefinitely; never finishes on its own.
    Forever,
}

/// Playback transition observed during a single `update` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The clip wrapped around one loop iteration.
    Looped,
    /// The action reached its natural end (`Once`, or the last `Repeat`
    /// iteration). Fires at most once per play-through.
    Finished,
}

/// Linear blend-weight interpolant driven by action updates.
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// Mutable runtime playback handle, bound 1:1 to a clip within one character.
///
/// Advancing time, loop handling and the weight interpolant all happen in
/// [`AnimationAction::update`], called once per frame by the mixer.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    /// Hold the end pose after finishing instead of deactivating.
    pub clamp_when_finished: bool,
    /// Finished but still holding its pose (clamp) — no longer advancing.
    pub paused: bool,
    /// Started and contributing to the mix.
    pub enabled: bool,

    weight: f32,
    fade: Option<Fade>,
    completed_loops: u32,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Forever,
            clamp_when_finished: false,
            paused: false,
            enabled: false,
            weight: 1.0,
            fade: None,
            completed_loops: 0,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Current blend weight in `[0, 1]`.
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused
    }

    /// Starts (or restarts) playback from the beginning at full weight.
    pub fn play(&mut self) {
        self.enabled = true;
        self.paused = false;
        self.time = 0.0;
        self.completed_loops = 0;
        self.weight = 1.0;
        self.fade = None;
    }

    /// Stops playback immediately and rewinds.
    pub fn stop(&mut self) {
        self.enabled = false;
        self.paused = false;
        self.time = 0.0;
        self.completed_loops = 0;
        self.fade = None;
    }

    /// Ramps the weight from 0 to 1 over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) {
        self.weight = 0.0;
        self.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            elapsed: 0.0,
            duration,
        });
    }

    /// Ramps the weight from its current value to 0 over `duration` seconds.
    pub fn fade_out(&mut self, duration: f32) {
        self.fade = Some(Fade {
            from: self.weight,
            to: 0.0,
            elapsed: 0.0,
            duration,
        });
    }

    /// Advances time and the fade interpolant, returning the playback
    /// transitions crossed this step. A large `dt` can cross several loop
    /// boundaries at once.
    pub fn update(&mut self, dt: f32) -> SmallVec<[PlaybackEvent; 2]> {
        let mut events = SmallVec::new();
        if !self.enabled {
            return events;
        }

        // The fade interpolant keeps running while the action holds a
        // clamped end pose, so a fade-out of a finished action still settles.
        self.advance_fade(dt);

        if self.paused {
            return events;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            // Zero-length synthetic clips finish on their first update.
            match self.loop_mode {
                LoopMode::Once | LoopMode::Repeat(_) => {
                    self.finish(duration, &mut events);
                }
                LoopMode::Forever => {}
            }
            return events;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Forever => {
                while self.time >= duration {
                    self.time -= duration;
                    events.push(PlaybackEvent::Looped);
                }
                while self.time < 0.0 {
                    self.time += duration;
                    events.push(PlaybackEvent::Looped);
                }
            }
            LoopMode::Once => {
                if self.time >= duration || self.time < 0.0 {
                    self.finish(duration, &mut events);
                }
            }
            LoopMode::Repeat(n) => {
                while self.time >= duration {
                    self.time -= duration;
                    self.completed_loops += 1;
                    if self.completed_loops >= n {
                        self.finish(duration, &mut events);
                        break;
                    }
                    events.push(PlaybackEvent::Looped);
                }
            }
        }

        events
    }

    fn finish(&mut self, duration: f32, events: &mut SmallVec<[PlaybackEvent; 2]>) {
        self.paused = true;
        if self.clamp_when_finished {
            self.time = duration.max(0.0);
        } else {
            self.enabled = false;
            self.time = 0.0;
        }
        events.push(PlaybackEvent::Finished);
    }

    fn advance_fade(&mut self, dt: f32) {
        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            if fade.elapsed >= fade.duration || fade.duration <= 0.0 {
                self.weight = fade.to;
                self.fade = None;
            } else {
                let t = fade.elapsed / fade.duration;
                self.weight = fade.from + (fade.to - fade.from) * t;
            }
        }
    }
}
