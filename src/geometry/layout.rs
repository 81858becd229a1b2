use crate::{
    foundation::core::{Point, Size},
    geometry::vertex::Vertex,
};

/// Which corner a vertex starts from, in the order vertices are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    LeftUp,
    LeftBottom,
    RightBottom,
    RightUp,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::LeftUp,
        Corner::LeftBottom,
        Corner::RightBottom,
        Corner::RightUp,
    ];
}

/// Vertex paths derived from the surface extent.
///
/// Each vertex runs corner -> adjacent edge midpoint -> center. Corners and midpoints are
/// inset from the edges by `inset` (the dot width), so dots never clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    pub size: Size,
    pub inset: i32,
    pub center: Point,
    pub vertices: [Vertex; 4],
}

impl VertexLayout {
    /// `None` for a surface without extent; there is nothing meaningful to animate.
    pub fn compute(size: Size, inset: u32) -> Option<Self> {
        if size.is_empty() {
            return None;
        }
        let w = i32::try_from(size.width).unwrap_or(i32::MAX);
        let h = i32::try_from(size.height).unwrap_or(i32::MAX);
        let r = i32::try_from(inset).unwrap_or(i32::MAX);
        let center = size.center();

        let left_up = Point::new(r, r);
        let left_bottom = Point::new(r, h - r);
        let right_up = Point::new(w - r, r);
        let right_bottom = Point::new(w - r, h - r);

        let left = Point::new(r, center.y);
        let bottom = Point::new(center.x, h - r);
        let right = Point::new(w - r, center.y);
        let up = Point::new(center.x, r);

        Some(Self {
            size,
            inset: r,
            center,
            vertices: [
                Vertex::new(vec![left_up, left, center]),
                Vertex::new(vec![left_bottom, bottom, center]),
                Vertex::new(vec![right_bottom, right, center]),
                Vertex::new(vec![right_up, up, center]),
            ],
        })
    }

    pub fn vertex(&self, corner: Corner) -> &Vertex {
        &self.vertices[corner as usize]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/layout.rs"]
mod tests;
