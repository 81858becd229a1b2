use std::time::Duration;

use crate::{
    animation::{ease::Ease, keyframes::Segment},
    foundation::core::{Point, Speed},
    geometry::vertex::Vertex,
    timeline::{
        events::AnimationEvent,
        pulse::{AlphaState, AlphaTarget, Pulse},
    },
};

/// Default gap between consecutive vertices' motion starts.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(200);

/// Timing shared by every phase of one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleTiming {
    pub phase_duration: Duration,
    pub stagger: Duration,
    pub ease: Ease,
}

impl CycleTiming {
    pub fn new(speed: Speed) -> Self {
        Self {
            phase_duration: speed.phase_duration(),
            stagger: DEFAULT_STAGGER,
            ease: Ease::Linear,
        }
    }
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self::new(Speed::NORMAL)
    }
}

/// Everything the animation writes and the renderer reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stage {
    pub center: Point,
    pub vertices: Vec<Vertex>,
    pub alpha: AlphaState,
}

/// Concurrent vertex motions. Finishes when the latest-starting vertex arrives.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    tracks: Vec<(usize, Segment<Point>)>,
}

impl Motion {
    pub fn tracks(&self) -> &[(usize, Segment<Point>)] {
        &self.tracks
    }

    pub fn length(&self) -> Duration {
        self.tracks
            .iter()
            .map(|(_, seg)| seg.end())
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn apply(&self, elapsed: Duration, vertices: &mut [Vertex]) {
        for (idx, seg) in &self.tracks {
            let Some(vertex) = vertices.get_mut(*idx) else {
                continue;
            };
            if let Some(point) = seg.sample_at(elapsed) {
                vertex.set_current(point);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    Collapse,
    VertexPulse,
    Explode,
    CenterPulse,
}

/// One step of a cycle. Phases run strictly one after another.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Collapse(Motion),
    Pulse(Pulse),
    Explode(Motion),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Collapse(_) => PhaseKind::Collapse,
            Self::Pulse(p) => match p.target {
                AlphaTarget::Dots => PhaseKind::VertexPulse,
                AlphaTarget::Center => PhaseKind::CenterPulse,
            },
            Self::Explode(_) => PhaseKind::Explode,
        }
    }

    pub fn length(&self) -> Duration {
        match self {
            Self::Collapse(m) | Self::Explode(m) => m.length(),
            Self::Pulse(p) => p.length(),
        }
    }

    /// Writes this phase's values at local time `elapsed` into `stage`.
    pub fn apply(&self, elapsed: Duration, stage: &mut Stage) {
        match self {
            Self::Collapse(m) | Self::Explode(m) => m.apply(elapsed, &mut stage.vertices),
            Self::Pulse(p) => p.apply(elapsed, &mut stage.alpha),
        }
    }

    /// Event fired when the phase runs to its end. Cancellation never fires it.
    pub fn completion_event(&self) -> Option<AnimationEvent> {
        match self {
            Self::Collapse(_) => Some(AnimationEvent::Collapsed),
            Self::Explode(_) => Some(AnimationEvent::Exploded),
            Self::Pulse(_) => None,
        }
    }
}

/// Composes the per-cycle timeline from the vertices' motions.
pub struct PhaseBuilder {
    timing: CycleTiming,
}

impl PhaseBuilder {
    pub fn new(timing: CycleTiming) -> Self {
        Self { timing }
    }

    /// Staggers start delays: vertex `i` waits `i * stagger`.
    pub fn assign_delays(&self, vertices: &mut [Vertex]) {
        for (i, vertex) in vertices.iter_mut().enumerate() {
            let factor = u32::try_from(i).unwrap_or(u32::MAX);
            vertex.set_start_delay(self.timing.stagger.saturating_mul(factor));
        }
    }

    pub fn collapse(&self, vertices: &[Vertex]) -> Phase {
        Phase::Collapse(self.motion(vertices, Vertex::anim_to))
    }

    pub fn explode(&self, vertices: &[Vertex]) -> Phase {
        Phase::Explode(self.motion(vertices, Vertex::anim_from))
    }

    pub fn vertex_pulse(&self) -> Phase {
        Phase::Pulse(Pulse::new(
            AlphaTarget::Dots,
            self.timing.phase_duration,
            self.timing.ease,
        ))
    }

    pub fn center_pulse(&self) -> Phase {
        Phase::Pulse(Pulse::new(
            AlphaTarget::Center,
            self.timing.phase_duration,
            self.timing.ease,
        ))
    }

    /// collapse -> vertex pulse -> explode -> center pulse.
    pub fn cycle(&self, vertices: &mut [Vertex]) -> Vec<Phase> {
        self.assign_delays(vertices);
        vec![
            self.collapse(vertices),
            self.vertex_pulse(),
            self.explode(vertices),
            self.center_pulse(),
        ]
    }

    fn motion(&self, vertices: &[Vertex], make: fn(&Vertex, Duration) -> Segment<Point>) -> Motion {
        let tracks = vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.path().is_empty())
            .map(|(i, v)| {
                (
                    i,
                    make(v, self.timing.phase_duration).with_ease(self.timing.ease),
                )
            })
            .collect();
        Motion { tracks }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/phase.rs"]
mod tests;
