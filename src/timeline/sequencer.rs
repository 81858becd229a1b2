//! The cycle state machine.
//!
//! A cycle is collapse -> vertex pulse -> explode -> center pulse. The sequencer owns the
//! animated [`Stage`], advances the active phase on each host tick, fires lifecycle
//! events on natural phase completion, and decides after every cycle whether to go again
//! or stop based on the repeat limit.

use std::time::Duration;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Size, Speed},
        error::{RectAnimError, RectAnimResult},
    },
    geometry::layout::VertexLayout,
    timeline::{
        events::{AnimationEvent, AnimationListener, EventSink},
        phase::{CycleTiming, Phase, PhaseBuilder, Stage},
        pulse::AlphaState,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SequencerState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
}

/// What the host platform can do, resolved once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HostCaps {
    /// `true` when a run can be frozen and resumed; otherwise `stop()` cancels.
    pub supports_pause: bool,
}

impl Default for HostCaps {
    fn default() -> Self {
        Self {
            supports_pause: true,
        }
    }
}

/// Repeat bookkeeping. `repeat_limit == 0` repeats forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleState {
    pub repeat_limit: u32,
    pub repeated_cycles: u64,
}

impl CycleState {
    fn may_continue(&self) -> bool {
        self.repeat_limit == 0 || self.repeated_cycles < u64::from(self.repeat_limit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequencerConfig {
    pub timing: CycleTiming,
    /// Corner inset in pixels (the dot width).
    pub inset: u32,
    pub repeat_limit: u32,
    pub run_on_resize: bool,
    pub caps: HostCaps,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            timing: CycleTiming::default(),
            inset: 20,
            repeat_limit: 0,
            run_on_resize: true,
            caps: HostCaps::default(),
        }
    }
}

#[derive(Debug)]
pub struct Sequencer {
    caps: HostCaps,
    timing: CycleTiming,
    inset: u32,
    layout: Option<VertexLayout>,
    stage: Stage,
    cycle: CycleState,
    state: SequencerState,
    phases: Vec<Phase>,
    cursor: usize,
    elapsed: Duration,
    run_on_resize: bool,
    start_pending: bool,
    events: EventSink,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            caps: config.caps,
            timing: config.timing,
            inset: config.inset,
            layout: None,
            stage: Stage::default(),
            cycle: CycleState {
                repeat_limit: config.repeat_limit,
                repeated_cycles: 0,
            },
            state: SequencerState::Idle,
            phases: Vec::new(),
            cursor: 0,
            elapsed: Duration::ZERO,
            run_on_resize: config.run_on_resize,
            start_pending: false,
            events: EventSink::default(),
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SequencerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == SequencerState::Paused
    }

    pub fn caps(&self) -> HostCaps {
        self.caps
    }

    pub fn cycle(&self) -> CycleState {
        self.cycle
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn layout(&self) -> Option<&VertexLayout> {
        self.layout.as_ref()
    }

    pub fn timing(&self) -> CycleTiming {
        self.timing
    }

    /// The phase currently advancing, if any.
    pub fn current_phase(&self) -> Option<&Phase> {
        match self.state {
            SequencerState::Running | SequencerState::Paused => self.phases.get(self.cursor),
            SequencerState::Idle | SequencerState::Stopped => None,
        }
    }

    /// Local time inside the current phase.
    pub fn phase_elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn run_on_resize(&self) -> bool {
        self.run_on_resize
    }

    pub fn set_run_on_resize(&mut self, run: bool) {
        self.run_on_resize = run;
    }

    /// Takes effect from the next cycle; the phase in flight keeps its duration.
    pub fn set_speed(&mut self, speed: Speed) {
        self.timing.phase_duration = speed.phase_duration();
    }

    pub fn set_stagger(&mut self, stagger: Duration) {
        self.timing.stagger = stagger;
    }

    pub fn set_ease(&mut self, ease: Ease) {
        self.timing.ease = ease;
    }

    pub fn set_repeat_limit(&mut self, limit: u32) {
        self.cycle.repeat_limit = limit;
    }

    /// Used for paths computed on the next resize.
    pub fn set_inset(&mut self, inset: u32) {
        self.inset = inset;
    }

    pub fn inset(&self) -> u32 {
        self.inset
    }

    pub fn set_listener(&mut self, listener: impl AnimationListener + 'static) {
        self.events.set(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.events.clear();
    }

    /// Starts a run, resumes a paused one, or does nothing if one is already running.
    #[tracing::instrument(level = "debug", skip(self), fields(state = ?self.state))]
    pub fn start(&mut self) {
        match self.state {
            SequencerState::Running => {
                tracing::debug!("start ignored: already running");
            }
            SequencerState::Paused => self.resume(),
            SequencerState::Idle | SequencerState::Stopped => {
                if self.layout.is_none() {
                    tracing::debug!("start deferred until the surface has an extent");
                    self.start_pending = true;
                    return;
                }
                self.begin_fresh();
            }
        }
    }

    /// Pauses where supported, otherwise cancels. Either way a later resize will not
    /// auto-restart the run.
    pub fn stop(&mut self) {
        self.run_on_resize = false;
        self.start_pending = false;
        if self.caps.supports_pause {
            // Cannot fail: pause support was just checked.
            let _ = self.pause();
        } else {
            self.cancel();
        }
    }

    /// Freezes positions and alphas in place. No event fires.
    pub fn pause(&mut self) -> RectAnimResult<()> {
        if !self.caps.supports_pause {
            return Err(RectAnimError::unsupported(
                "pause requires a host that supports pause/resume",
            ));
        }
        if self.state == SequencerState::Running {
            tracing::debug!(elapsed = ?self.elapsed, cursor = self.cursor, "paused");
            self.state = SequencerState::Paused;
        }
        Ok(())
    }

    /// Continues from the frozen state without recomputing paths. No event fires.
    pub fn resume(&mut self) {
        if self.state == SequencerState::Paused {
            tracing::debug!(elapsed = ?self.elapsed, cursor = self.cursor, "resumed");
            self.state = SequencerState::Running;
        }
    }

    /// Hard stop: drops in-flight phases, resets the cycle counter and fires `Stopped`.
    pub fn cancel(&mut self) {
        match self.state {
            SequencerState::Running | SequencerState::Paused => {
                self.phases.clear();
                self.cursor = 0;
                self.elapsed = Duration::ZERO;
                self.cycle.repeated_cycles = 0;
                self.state = SequencerState::Stopped;
                tracing::debug!("cancelled");
                self.events.emit(AnimationEvent::Stopped);
            }
            SequencerState::Idle | SequencerState::Stopped => {}
        }
    }

    /// Recomputes center and vertex paths for a new surface extent.
    ///
    /// An empty surface clears the geometry and ends any run (back to `Idle`). With
    /// run-on-resize set, a non-empty resize starts the sequence from the top; if that
    /// interrupts a running cycle, the interrupted cycle is counted. A paused run is
    /// never restarted.
    #[tracing::instrument(level = "debug", skip(self), fields(state = ?self.state))]
    pub fn resize(&mut self, size: Size) {
        let Some(layout) = VertexLayout::compute(size, self.inset) else {
            tracing::debug!(?size, "surface has no extent; geometry cleared");
            self.cancel();
            self.layout = None;
            self.stage = Stage::default();
            self.state = SequencerState::Idle;
            return;
        };
        tracing::debug!(
            width = size.width,
            height = size.height,
            center = %layout.center,
            inset = layout.inset,
            "layout computed"
        );
        self.layout = Some(layout);

        let active = matches!(
            self.state,
            SequencerState::Running | SequencerState::Paused
        );
        if active {
            // A paused run stays frozen; like a run without restart, it picks up the new
            // paths next cycle.
            if self.run_on_resize && self.state == SequencerState::Running {
                self.cycle.repeated_cycles += 1;
                self.begin_run();
            }
        } else if self.run_on_resize || self.start_pending {
            self.begin_fresh();
        } else {
            self.install_layout();
        }
    }

    /// Advances the clock by `dt`. Returns whether a phase is still active, i.e. whether
    /// the host should keep requesting frames.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.state != SequencerState::Running {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);

        loop {
            let Some(phase) = self.phases.get(self.cursor) else {
                self.complete_cycle();
                break;
            };
            phase.apply(self.elapsed, &mut self.stage);
            let length = phase.length();
            if self.elapsed < length {
                tracing::trace!(
                    phase = ?phase.kind(),
                    elapsed = ?self.elapsed,
                    ?length,
                    "tick"
                );
                break;
            }

            let event = phase.completion_event();
            self.elapsed -= length;
            self.cursor += 1;
            if let Some(event) = event {
                self.events.emit(event);
            }
            if self.cursor == self.phases.len() {
                // A restarted cycle begins on the next tick.
                self.complete_cycle();
                break;
            }
        }

        self.state == SequencerState::Running
    }

    fn complete_cycle(&mut self) {
        self.cycle.repeated_cycles += 1;
        if self.cycle.may_continue() {
            tracing::debug!(
                repeated_cycles = self.cycle.repeated_cycles,
                repeat_limit = self.cycle.repeat_limit,
                "cycle complete; restarting"
            );
            self.rebuild_cycle();
        } else {
            tracing::debug!(
                repeated_cycles = self.cycle.repeated_cycles,
                repeat_limit = self.cycle.repeat_limit,
                "repeat limit reached; stopping"
            );
            self.phases.clear();
            self.cursor = 0;
            self.elapsed = Duration::ZERO;
            self.state = SequencerState::Stopped;
            self.run_on_resize = false;
            self.events.emit(AnimationEvent::Stopped);
        }
    }

    /// New run from `Idle`/`Stopped`. A run that previously hit its limit starts counting
    /// again from zero.
    fn begin_fresh(&mut self) {
        if self.state == SequencerState::Stopped {
            self.cycle.repeated_cycles = 0;
        }
        self.begin_run();
    }

    fn begin_run(&mut self) {
        if self.layout.is_none() {
            return;
        }
        self.start_pending = false;
        self.rebuild_cycle();
        self.stage.alpha = AlphaState::default();
        self.state = SequencerState::Running;
        tracing::debug!(
            repeated_cycles = self.cycle.repeated_cycles,
            repeat_limit = self.cycle.repeat_limit,
            phase_duration = ?self.timing.phase_duration,
            "run started"
        );
        self.events.emit(AnimationEvent::Started);
    }

    fn rebuild_cycle(&mut self) {
        self.install_layout();
        self.phases = PhaseBuilder::new(self.timing).cycle(&mut self.stage.vertices);
        self.cursor = 0;
        self.elapsed = Duration::ZERO;
    }

    fn install_layout(&mut self) {
        if let Some(layout) = &self.layout {
            self.stage.center = layout.center;
            self.stage.vertices = layout.vertices.to_vec();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sequencer.rs"]
mod tests;
