use std::time::Duration;

use crate::{animation::ease::Ease, foundation::core::Point};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

// Integer evaluation truncates toward zero, like an int property animator.
impl Lerp for i32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (f64::from(b - a) * t) as i32
    }
}

impl Lerp for u8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let v = i32::lerp(&i32::from(*a), &i32::from(*b), t);
        v.clamp(0, 255) as u8
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(i32::lerp(&a.x, &b.x, t), i32::lerp(&a.y, &b.y, t))
    }
}

const KEY_SNAP_EPSILON: f64 = 1e-9;

/// Values visited in order, spread evenly over normalized progress `0..=1`.
///
/// With `n` keys, key `i` sits at progress `i / (n - 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes<T> {
    values: Vec<T>,
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `None` only when there are no keys.
    pub fn sample(&self, progress: f64) -> Option<T> {
        match self.values.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            values => {
                let spans = values.len() - 1;
                let mut scaled = progress.clamp(0.0, 1.0) * spans as f64;
                // Land exactly on a key when rounding error leaves us a hair short of it,
                // otherwise integer truncation would report the previous value.
                if (scaled - scaled.round()).abs() < KEY_SNAP_EPSILON {
                    scaled = scaled.round();
                }
                let idx = (scaled.floor() as usize).min(spans - 1);
                let local = scaled - idx as f64;
                Some(T::lerp(&values[idx], &values[idx + 1], local))
            }
        }
    }
}

/// A keyframe run placed on a local clock: it waits `delay`, then plays over `duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment<T> {
    pub keys: Keyframes<T>,
    pub delay: Duration,
    pub duration: Duration,
    pub ease: Ease,
}

impl<T> Segment<T>
where
    T: Lerp + Clone,
{
    pub fn new(keys: Keyframes<T>, duration: Duration) -> Self {
        Self {
            keys,
            delay: Duration::ZERO,
            duration,
            ease: Ease::Linear,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Local time at which the segment has written its final value.
    pub fn end(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Eased progress at `elapsed`, `None` while still inside the start delay.
    pub fn progress_at(&self, elapsed: Duration) -> Option<f64> {
        if elapsed < self.delay {
            return None;
        }
        let played = elapsed - self.delay;
        let raw = if self.duration.is_zero() {
            1.0
        } else {
            (played.as_nanos() as f64 / self.duration.as_nanos() as f64).min(1.0)
        };
        Some(self.ease.apply(raw))
    }

    /// Value at `elapsed`. `None` means the segment has not started (or has no keys), so
    /// the animated property keeps whatever value it already holds.
    pub fn sample_at(&self, elapsed: Duration) -> Option<T> {
        self.progress_at(elapsed)
            .and_then(|progress| self.keys.sample(progress))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
