use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::decode::PreparedImage,
    foundation::error::{RectAnimError, RectAnimResult},
    render::{
        backend::{FrameRGBA, RenderBackend, RenderSettings},
        scene::{DotShape, DrawOp, Scene},
    },
};

/// Circle flattening tolerance in pixels.
const CIRCLE_TOLERANCE: f64 = 0.1;

pub struct CpuBackend {
    settings: RenderSettings,
    /// Paint for the last dots image, kept with the buffer it was built from.
    image_cache: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
    pixmap: Option<vello_cpu::Pixmap>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            image_cache: None,
            pixmap: None,
        }
    }

    fn ensure_pixmap(&mut self, width: u16, height: u16) -> &mut vello_cpu::Pixmap {
        let reuse = self
            .pixmap
            .as_ref()
            .is_some_and(|p| p.width() == width && p.height() == height);
        if !reuse {
            self.pixmap = None;
        }
        self.pixmap
            .get_or_insert_with(|| vello_cpu::Pixmap::new(width, height))
    }

    fn image_paint_for(&mut self, image: &PreparedImage) -> RectAnimResult<vello_cpu::Image> {
        if let Some((pixels, paint)) = &self.image_cache {
            if Arc::ptr_eq(pixels, &image.rgba8_premul) {
                return Ok(paint.clone());
            }
        }

        let pixmap = image_premul_bytes_to_pixmap(
            image.rgba8_premul.as_slice(),
            image.width,
            image.height,
        )?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.image_cache = Some((image.rgba8_premul.clone(), paint.clone()));
        Ok(paint)
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(level = "trace", skip_all, fields(ops = scene.ops.len()))]
    fn render_scene(&mut self, scene: &Scene) -> RectAnimResult<FrameRGBA> {
        let width: u16 = scene
            .size
            .width
            .try_into()
            .map_err(|_| RectAnimError::render("surface width exceeds u16"))?;
        let height: u16 = scene
            .size
            .height
            .try_into()
            .map_err(|_| RectAnimError::render("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(RectAnimError::render("cannot render an empty surface"));
        }

        let [r, g, b, a] = self.settings.clear_rgba.unwrap_or([
            scene.background.r,
            scene.background.g,
            scene.background.b,
            scene.background.a,
        ]);

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
        for op in &scene.ops {
            draw_op(self, &mut ctx, op)?;
        }
        ctx.flush();

        let pixmap = self.ensure_pixmap(width, height);
        clear_pixmap(pixmap);
        ctx.render_to_pixmap(pixmap);

        Ok(FrameRGBA {
            width: scene.size.width,
            height: scene.size.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn draw_op(
    backend: &mut CpuBackend,
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
) -> RectAnimResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::Line {
            from,
            to,
            width,
            color,
        } => {
            let Some(quad) = line_quad(point_to_cpu(*from), point_to_cpu(*to), *width) else {
                return Ok(());
            };
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            ctx.fill_path(&quad);
            Ok(())
        }
        DrawOp::Dot {
            center,
            half_extent,
            shape,
            color,
            opacity,
        } => {
            if *half_extent <= 0.0 || *opacity <= 0.0 {
                return Ok(());
            }
            let c = point_to_cpu(*center);
            let r = *half_extent;
            match shape {
                DotShape::Rect => {
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        color.r, color.g, color.b, color.a,
                    ));
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        c.x - r,
                        c.y - r,
                        c.x + r,
                        c.y + r,
                    ));
                }
                DotShape::Circle => {
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        color.r, color.g, color.b, color.a,
                    ));
                    let path = vello_cpu::kurbo::Circle::new(c, r).to_path(CIRCLE_TOLERANCE);
                    ctx.fill_path(&path);
                }
                DotShape::Image(image) => {
                    let paint = backend.image_paint_for(image)?;
                    let (w, h) = (f64::from(image.width), f64::from(image.height));
                    if w <= 0.0 || h <= 0.0 {
                        return Ok(());
                    }
                    // Stretch the image into the dot's bounding square.
                    let transform = vello_cpu::kurbo::Affine::translate((c.x - r, c.y - r))
                        * vello_cpu::kurbo::Affine::scale_non_uniform(2.0 * r / w, 2.0 * r / h);
                    ctx.set_transform(transform);
                    ctx.set_paint(paint);
                    if *opacity < 1.0 {
                        ctx.push_opacity_layer(*opacity);
                    }
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
                    if *opacity < 1.0 {
                        ctx.pop_layer();
                    }
                }
            }
            Ok(())
        }
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

/// Thick line as a filled quad with butt ends. `None` for degenerate lines.
fn line_quad(
    from: vello_cpu::kurbo::Point,
    to: vello_cpu::kurbo::Point,
    width: f64,
) -> Option<vello_cpu::kurbo::BezPath> {
    let d = to - from;
    let len = d.hypot();
    if len <= f64::EPSILON || width <= 0.0 {
        return None;
    }
    let n = vello_cpu::kurbo::Vec2::new(-d.y, d.x) * (0.5 * width / len);

    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(from + n);
    path.line_to(to + n);
    path.line_to(to - n);
    path.line_to(from - n);
    path.close_path();
    Some(path)
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> RectAnimResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RectAnimError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RectAnimError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(RectAnimError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
