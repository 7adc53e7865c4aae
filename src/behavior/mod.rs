//! Mood-weighted random behavior scheduling.
//!
//! Every [`SCHEDULE_INTERVAL`] seconds of accumulated frame time the
//! scheduler re-draws one task from the currently eligible set, weighted by
//! each task's base weight. Eligibility is gated by a mood scalar in
//! `[0, 100]` that random-walks ±5 on every scheduling decision.
//!
//! Tasks are stateless data descriptors dispatched by [`TaskKind`]; only the
//! single active-task reference persists between ticks.

use rand::rngs::{StdRng, SysRng};
use rand::{RngExt, SeedableRng};
use smallvec::SmallVec;

use crate::animation::action::LoopMode;
use crate::animation::layering::AnimationManager;
use crate::animation::waiters::{Command, WaitKind};

/// Seconds of real time between scheduling decisions.
pub const SCHEDULE_INTERVAL: f32 = 60.0;
/// Fade length for task animation cross-fades.
pub const TASK_FADE_TIME: f32 = 0.3;
/// Largest mood step per scheduling decision.
const MOOD_STEP: f32 = 5.0;

/// What triggering a task does.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    /// Do nothing this interval.
    Wait,
    /// Fade the clip in; it loops until the next task replaces it.
    Play { clip: String },
    /// Play the clip a fixed number of iterations, clamped, then fade it out
    /// on its own once it finishes.
    PlayRepeat { clip: String, loops: u32 },
}

/// Stateless behavior-task definition. Definitions are data: the built-in
/// table is [`TaskDef::standard_set`], and hosts may supply their own.
#[derive(Debug, Clone)]
pub struct TaskDef {
    pub name: String,
    /// Unnormalized selection weight; must be > 0.
    pub base_weight: f32,
    /// Inclusive mood eligibility range.
    pub mood_range: [f32; 2],
    pub kind: TaskKind,
}

impl TaskDef {
    #[must_use]
    pub fn new(name: impl Into<String>, base_weight: f32, mood_range: [f32; 2], kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            base_weight,
            mood_range,
            kind,
        }
    }

    /// The built-in idle behavior table.
    #[must_use]
    pub fn standard_set() -> Vec<TaskDef> {
        vec![
            TaskDef::new("wait", 0.8, [0.0, 100.0], TaskKind::Wait),
            TaskDef::new(
                "game_win",
                0.4,
                [50.0, 100.0],
                TaskKind::Play {
                    clip: "game_win".to_owned(),
                },
            ),
            TaskDef::new(
                "game_lost",
                0.3,
                [0.0, 50.0],
                TaskKind::Play {
                    clip: "game_lost".to_owned(),
                },
            ),
            TaskDef::new(
                "picnic",
                0.6,
                [30.0, 100.0],
                TaskKind::Play {
                    clip: "picnic".to_owned(),
                },
            ),
            TaskDef::new(
                "brush",
                0.2,
                [50.0, 100.0],
                TaskKind::PlayRepeat {
                    clip: "use_mainhand$minecraft:brush".to_owned(),
                    loops: 5,
                },
            ),
        ]
    }
}

#[derive(Debug)]
struct ActiveTask {
    name: String,
    kind: TaskKind,
}

/// Periodic weighted-random selector over behavior tasks.
pub struct BehaviorScheduler {
    tasks: Vec<TaskDef>,
    active: Option<ActiveTask>,
    mood: f32,
    elapsed: f32,
    interval: f32,
    transitions: u64,
    rng: StdRng,
}

impl BehaviorScheduler {
    #[must_use]
    pub fn new(tasks: Vec<TaskDef>) -> Self {
        Self {
            tasks,
            active: None,
            mood: 80.0,
            elapsed: 0.0,
            interval: SCHEDULE_INTERVAL,
            transitions: 0,
            rng: StdRng::try_from_rng(&mut SysRng).unwrap(),
        }
    }

    /// Deterministic RNG for reproducible selection (tests, replays).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_interval(mut self, seconds: f32) -> Self {
        self.interval = seconds;
        self
    }

    /// Current mood in `[0, 100]`.
    #[must_use]
    pub fn mood(&self) -> f32 {
        self.mood
    }

    pub fn set_mood(&mut self, mood: f32) {
        self.mood = mood.clamp(0.0, 100.0);
    }

    /// Name of the currently active task, if any.
    #[must_use]
    pub fn active_task(&self) -> Option<&str> {
        self.active.as_ref().map(|task| task.name.as_str())
    }

    /// Number of task transitions since construction. A re-draw of the
    /// already active task is not a transition.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Stops the active task and forces a fresh decision on the next tick.
    pub fn reset(&mut self, manager: &mut AnimationManager) {
        if let Some(task) = self.active.take() {
            stop_task(&task, manager);
        }
        self.elapsed = 0.0;
    }

    /// Per-frame tick. Cheap no-op until the scheduling interval has
    /// elapsed, then runs one weighted-random decision.
    pub fn update(&mut self, dt: f32, manager: &mut AnimationManager) {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return;
        }
        self.elapsed = 0.0;
        self.tick(manager);
    }

    fn tick(&mut self, manager: &mut AnimationManager) {
        let eligible: SmallVec<[usize; 8]> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| {
                self.mood >= task.mood_range[0] && self.mood <= task.mood_range[1]
            })
            .map(|(index, _)| index)
            .collect();
        let total: f32 = eligible.iter().map(|&i| self.tasks[i].base_weight).sum();

        if total > 0.0 {
            let roll = self.rng.random_range(0.0..1.0f32) * total;
            let mut accumulated = 0.0;
            for &index in &eligible {
                accumulated += self.tasks[index].base_weight;
                if roll < accumulated {
                    self.select(index, manager);
                    break;
                }
            }
        }

        self.mood = (self.mood + self.rng.random_range(-MOOD_STEP..=MOOD_STEP)).clamp(0.0, 100.0);
        log::debug!(
            "behavior tick: mood {:.1}, active {:?}",
            self.mood,
            self.active_task()
        );
    }

    fn select(&mut self, index: usize, manager: &mut AnimationManager) {
        // Re-drawing the active task keeps it running untouched.
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.name == self.tasks[index].name)
        {
            return;
        }
        if let Some(previous) = self.active.take() {
            stop_task(&previous, manager);
        }
        let task = self.tasks[index].clone();
        trigger_task(&task, manager);
        self.active = Some(ActiveTask {
            name: task.name,
            kind: task.kind,
        });
        self.transitions += 1;
    }
}

/// The outgoing fade-out and the incoming fade-in deliberately overlap,
/// producing a cross-fade between consecutive tasks.
fn trigger_task(task: &TaskDef, manager: &mut AnimationManager) {
    match &task.kind {
        TaskKind::Wait => {}
        TaskKind::Play { clip } => {
            if let Some(key) = manager.play_or_warn(clip)
                && let Some(action) = manager.action_mut(key)
            {
                action.fade_in(TASK_FADE_TIME);
            }
        }
        TaskKind::PlayRepeat { clip, loops } => {
            if let Some(key) = manager.play_or_warn(clip) {
                if let Some(action) = manager.action_mut(key) {
                    action.clamp_when_finished = true;
                    action.loop_mode = LoopMode::Repeat(*loops);
                    action.fade_in(TASK_FADE_TIME);
                }
                manager.schedule_untracked(
                    WaitKind::Finished(key),
                    Command::FadeOutStop {
                        action: key,
                        fade: TASK_FADE_TIME,
                    },
                );
            }
        }
    }
}

fn stop_task(task: &ActiveTask, manager: &mut AnimationManager) {
    match &task.kind {
        TaskKind::Wait => {}
        TaskKind::Play { clip } | TaskKind::PlayRepeat { clip, .. } => {
            if let Some(key) = manager.get(clip) {
                manager.fade_out_stop(key, TASK_FADE_TIME);
            }
        }
    }
}
