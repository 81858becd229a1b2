//! Host-facing view: owns a [`Sequencer`], the visual configuration and a frame
//! requester, and turns surface callbacks and ticks into animation steps.

use std::time::Duration;

use crate::{
    animation::ease::Ease,
    assets::decode::PreparedImage,
    foundation::{
        core::{Point, Rgba8, Size, Speed},
        error::RectAnimResult,
    },
    render::scene::{DotFigure, Scene},
    timeline::{
        events::AnimationListener,
        phase::Stage,
        pulse::AlphaState,
        sequencer::{HostCaps, Sequencer, SequencerState},
    },
    view::config::ViewConfig,
};

/// Asks the host to redraw. Called whenever visible state changes.
pub trait FrameRequester {
    fn request_frame(&mut self);
}

impl<F> FrameRequester for F
where
    F: FnMut(),
{
    fn request_frame(&mut self) {
        self()
    }
}

/// Requester for headless hosts: remembers that a redraw is owed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCounter {
    pub requested: u64,
    pub pending: bool,
}

impl FrameCounter {
    /// Clears the pending flag, returning whether a frame was owed.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameRequester for FrameCounter {
    fn request_frame(&mut self) {
        self.requested += 1;
        self.pending = true;
    }
}

/// Plain copy of everything a renderer reads for one frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub state: SequencerState,
    pub center: Point,
    pub vertices: Vec<Point>,
    pub alpha: AlphaState,
}

#[derive(Debug)]
pub struct RectAnimView<R> {
    config: ViewConfig,
    sequencer: Sequencer,
    dots_image: Option<PreparedImage>,
    size: Size,
    requester: R,
}

impl<R: FrameRequester> RectAnimView<R> {
    /// Validates `config` and decodes its dots image, if any.
    pub fn new(config: ViewConfig, caps: HostCaps, requester: R) -> RectAnimResult<Self> {
        config.validate()?;
        let dots_image = config.load_dots_image()?;
        let sequencer = Sequencer::new(config.sequencer_config(caps));
        Ok(Self {
            config,
            sequencer,
            dots_image,
            size: Size::default(),
            requester,
        })
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn stage(&self) -> &Stage {
        self.sequencer.stage()
    }

    pub fn snapshot(&self) -> Snapshot {
        let stage = self.sequencer.stage();
        Snapshot {
            state: self.sequencer.state(),
            center: stage.center,
            vertices: stage.vertices.iter().map(|v| v.current()).collect(),
            alpha: stage.alpha,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn speed(&self) -> Speed {
        self.config.speed
    }

    pub fn line_color(&self) -> Rgba8 {
        self.config.line_color
    }

    pub fn line_width(&self) -> u32 {
        self.config.line_width
    }

    pub fn dot_figure(&self) -> DotFigure {
        self.config.dot_figure
    }

    pub fn dot_width(&self) -> u32 {
        self.config.dot_width
    }

    pub fn dot_color(&self) -> Rgba8 {
        self.config.dot_color
    }

    pub fn repeat_count(&self) -> u32 {
        self.config.repeat_count
    }

    pub fn run_on_resize(&self) -> bool {
        self.sequencer.run_on_resize()
    }

    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.is_running()
    }

    pub fn requester(&self) -> &R {
        &self.requester
    }

    pub fn requester_mut(&mut self) -> &mut R {
        &mut self.requester
    }

    pub fn set_listener(&mut self, listener: impl AnimationListener + 'static) {
        self.sequencer.set_listener(listener);
    }

    pub fn clear_listener(&mut self) {
        self.sequencer.clear_listener();
    }

    pub fn start(&mut self) {
        self.sequencer.start();
        self.refresh();
    }

    pub fn stop(&mut self) {
        self.sequencer.stop();
        self.refresh();
    }

    pub fn pause(&mut self) -> RectAnimResult<()> {
        self.sequencer.pause()
    }

    pub fn resume(&mut self) {
        self.sequencer.resume();
        self.refresh();
    }

    pub fn cancel(&mut self) {
        self.sequencer.cancel();
        self.refresh();
    }

    /// Host clock callback. Requests a frame for every tick that moved the animation,
    /// including the one that ended it.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let was_running = self.sequencer.is_running();
        let running = self.sequencer.advance(dt);
        if was_running {
            self.requester.request_frame();
        }
        running
    }

    /// Surface extent changed. Unchanged sizes are ignored.
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        let size = Size::new(width, height);
        if size == self.size {
            return;
        }
        self.size = size;
        self.sequencer.resize(size);
        self.refresh();
    }

    /// Applies from the next cycle.
    pub fn set_speed(&mut self, speed: f64) -> RectAnimResult<()> {
        let speed = Speed::new(speed)?;
        self.config.speed = speed;
        self.sequencer.set_speed(speed);
        Ok(())
    }

    pub fn set_stagger(&mut self, stagger: Duration) {
        self.config.stagger_ms = u64::try_from(stagger.as_millis()).unwrap_or(u64::MAX);
        self.sequencer.set_stagger(stagger);
    }

    pub fn set_easing(&mut self, ease: Ease) {
        self.config.easing = ease;
        self.sequencer.set_ease(ease);
    }

    pub fn set_line_color(&mut self, color: Rgba8) {
        self.config.line_color = color;
        self.refresh();
    }

    /// Zero is clamped to one pixel.
    pub fn set_line_width(&mut self, width: u32) {
        self.config.line_width = width.max(1);
        self.refresh();
    }

    pub fn set_dot_figure(&mut self, figure: DotFigure) {
        self.config.dot_figure = figure;
        self.refresh();
    }

    /// Dot size changes immediately; the corner inset follows on the next resize.
    pub fn set_dot_width(&mut self, width: u32) {
        self.config.dot_width = width;
        self.sequencer.set_inset(width);
        self.refresh();
    }

    pub fn set_dot_color(&mut self, color: Rgba8) {
        self.config.dot_color = color;
        self.refresh();
    }

    pub fn set_dots_image(&mut self, image: Option<PreparedImage>) {
        self.dots_image = image;
        self.refresh();
    }

    pub fn dots_image(&self) -> Option<&PreparedImage> {
        self.dots_image.as_ref()
    }

    pub fn set_repeat_count(&mut self, count: u32) {
        self.config.repeat_count = count;
        self.sequencer.set_repeat_limit(count);
    }

    pub fn set_run_on_resize(&mut self, run: bool) {
        self.config.run_on_resize = run;
        self.sequencer.set_run_on_resize(run);
    }

    /// Draw list for the current stage.
    pub fn scene(&self) -> RectAnimResult<Scene> {
        Scene::build(
            self.size,
            self.sequencer.stage(),
            &self.config.scene_style(),
            self.dots_image.as_ref(),
        )
    }

    fn refresh(&mut self) {
        self.requester.request_frame();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/adapter.rs"]
mod tests;
