//! Backend-neutral description of one frame.
//!
//! A [`Scene`] is built from the animated [`Stage`] plus the visual style: the six
//! vertex-to-vertex lines first, then the center figure, then one dot per vertex.

use crate::{
    assets::decode::PreparedImage,
    foundation::{
        core::{Rgba8, Size},
        error::{RectAnimError, RectAnimResult},
    },
    timeline::phase::Stage,
};

/// How vertex and center dots are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotFigure {
    /// Lines only.
    None,
    Rectangle,
    #[default]
    Circle,
    Image,
}

/// Legacy attribute indices: 0 none, 1 rectangle, 2 circle, 3 image.
impl TryFrom<i32> for DotFigure {
    type Error = RectAnimError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Rectangle),
            2 => Ok(Self::Circle),
            3 => Ok(Self::Image),
            other => Err(RectAnimError::validation(format!(
                "unknown dot figure index {other} (expected 0..=3)"
            ))),
        }
    }
}

impl From<DotFigure> for i32 {
    fn from(value: DotFigure) -> Self {
        match value {
            DotFigure::None => 0,
            DotFigure::Rectangle => 1,
            DotFigure::Circle => 2,
            DotFigure::Image => 3,
        }
    }
}

/// Visual parameters the scene builder reads. Changes take effect on the next build.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStyle {
    pub background: Rgba8,
    pub line_color: Rgba8,
    pub line_width: u32,
    pub dot_color: Rgba8,
    pub dot_figure: DotFigure,
    /// Half-extent of vertex dots. The center figure is twice as large.
    pub dot_width: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DotShape {
    Rect,
    Circle,
    Image(PreparedImage),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Line {
        from: kurbo::Point,
        to: kurbo::Point,
        width: f64,
        color: Rgba8,
    },
    /// A square of side `2 * half_extent` (or the circle inscribed in it) centred on
    /// `center`. `color` already carries the animated alpha; image dots use `opacity`.
    Dot {
        center: kurbo::Point,
        half_extent: f64,
        shape: DotShape,
        color: Rgba8,
        opacity: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub size: Size,
    pub background: Rgba8,
    pub ops: Vec<DrawOp>,
}

impl Scene {
    pub fn build(
        size: Size,
        stage: &Stage,
        style: &SceneStyle,
        dots_image: Option<&PreparedImage>,
    ) -> RectAnimResult<Self> {
        let mut ops = Vec::new();

        let points: Vec<kurbo::Point> = stage
            .vertices
            .iter()
            .map(|v| v.current().to_kurbo())
            .collect();
        for (i, from) in points.iter().enumerate() {
            for to in &points[i + 1..] {
                ops.push(DrawOp::Line {
                    from: *from,
                    to: *to,
                    width: f64::from(style.line_width),
                    color: style.line_color,
                });
            }
        }

        let shape = match style.dot_figure {
            DotFigure::None => None,
            DotFigure::Rectangle => Some(DotShape::Rect),
            DotFigure::Circle => Some(DotShape::Circle),
            DotFigure::Image => {
                let image = dots_image.ok_or_else(|| {
                    RectAnimError::validation("dot figure is image but no dots image is set")
                })?;
                Some(DotShape::Image(image.clone()))
            }
        };

        if let Some(shape) = shape {
            if !stage.vertices.is_empty() {
                let r = f64::from(style.dot_width);
                ops.push(dot(
                    stage.center.to_kurbo(),
                    2.0 * r,
                    &shape,
                    style.dot_color,
                    stage.alpha.center,
                ));
                for p in &points {
                    ops.push(dot(*p, r, &shape, style.dot_color, stage.alpha.dots));
                }
            }
        }

        Ok(Self {
            size,
            background: style.background,
            ops,
        })
    }
}

fn dot(
    center: kurbo::Point,
    half_extent: f64,
    shape: &DotShape,
    color: Rgba8,
    alpha: u8,
) -> DrawOp {
    DrawOp::Dot {
        center,
        half_extent,
        shape: shape.clone(),
        color: color.with_alpha(alpha),
        opacity: f32::from(alpha) / 255.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
