use std::time::Duration;

use crate::{
    animation::keyframes::{Keyframes, Segment},
    foundation::core::Point,
};

/// Ordered waypoints a vertex travels through. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexPath {
    points: Vec<Point>,
}

impl VertexPath {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Waypoints in travel order for the outward ("from") motion.
    pub fn reversed(&self) -> Vec<Point> {
        self.points.iter().rev().copied().collect()
    }
}

/// One animated corner: its path, where it is right now, and how long its motion waits
/// before starting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
    path: VertexPath,
    current: Point,
    start_delay: Duration,
}

impl Vertex {
    pub fn new(points: Vec<Point>) -> Self {
        let path = VertexPath::new(points);
        let current = path.first().unwrap_or_default();
        Self {
            path,
            current,
            start_delay: Duration::ZERO,
        }
    }

    pub fn path(&self) -> &VertexPath {
        &self.path
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn x(&self) -> i32 {
        self.current.x
    }

    pub fn y(&self) -> i32 {
        self.current.y
    }

    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    pub fn set_start_delay(&mut self, delay: Duration) -> &mut Self {
        self.start_delay = delay;
        self
    }

    /// Only the active motion segment moves a vertex.
    pub(crate) fn set_current(&mut self, point: Point) {
        self.current.set(point);
    }

    /// Inward motion: corner, midpoint, center.
    pub fn anim_to(&self, duration: Duration) -> Segment<Point> {
        Segment::new(Keyframes::new(self.path.points().to_vec()), duration)
            .with_delay(self.start_delay)
    }

    /// Outward motion over the reversed path: center, midpoint, corner.
    pub fn anim_from(&self, duration: Duration) -> Segment<Point> {
        Segment::new(Keyframes::new(self.path.reversed()), duration).with_delay(self.start_delay)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/vertex.rs"]
mod tests;
