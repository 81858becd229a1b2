use std::time::Duration;

use crate::animation::{
    ease::Ease,
    keyframes::{Keyframes, Segment},
};

/// Vertex dots: two shallow dips to 155 and back, ending opaque.
pub const DOT_ALPHA_KEYS: [u8; 7] = [255, 0, 155, 0, 155, 0, 255];

/// Center dot: inverse phase, starting and ending transparent.
pub const CENTER_ALPHA_KEYS: [u8; 7] = [0, 255, 0, 255, 0, 255, 0];

/// Opacity values read by the renderer every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlphaState {
    pub center: u8,
    pub dots: u8,
}

impl Default for AlphaState {
    fn default() -> Self {
        Self {
            center: CENTER_ALPHA_KEYS[0],
            dots: DOT_ALPHA_KEYS[0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaTarget {
    Center,
    Dots,
}

/// One opacity timeline. Pulses last twice as long as a geometric phase and fire no
/// event when they finish.
#[derive(Clone, Debug, PartialEq)]
pub struct Pulse {
    pub target: AlphaTarget,
    pub segment: Segment<u8>,
}

impl Pulse {
    pub fn new(target: AlphaTarget, phase_duration: Duration, ease: Ease) -> Self {
        let keys = match target {
            AlphaTarget::Center => CENTER_ALPHA_KEYS,
            AlphaTarget::Dots => DOT_ALPHA_KEYS,
        };
        Self {
            target,
            segment: Segment::new(Keyframes::new(keys.to_vec()), phase_duration.saturating_mul(2))
                .with_ease(ease),
        }
    }

    pub fn length(&self) -> Duration {
        self.segment.end()
    }

    pub fn apply(&self, elapsed: Duration, alpha: &mut AlphaState) {
        let Some(value) = self.segment.sample_at(elapsed) else {
            return;
        };
        match self.target {
            AlphaTarget::Center => alpha.center = value,
            AlphaTarget::Dots => alpha.dots = value,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/pulse.rs"]
mod tests;
