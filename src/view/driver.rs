use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use crate::{
    foundation::{
        core::{Fps, Size},
        error::RectAnimResult,
    },
    render::backend::{FrameRGBA, RenderBackend},
    timeline::{events::AnimationEvent, sequencer::HostCaps},
    view::{
        adapter::{FrameCounter, RectAnimView},
        config::ViewConfig,
    },
};

/// Event stamped with the clock time of the tick that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: AnimationEvent,
}

/// Fixed-rate clock for hosts without a display: CLI renders and tests.
///
/// Frame `n` sits at `n * den / num` seconds. Tick deltas are taken between exact frame
/// times so rounding never accumulates.
#[derive(Debug)]
pub struct HeadlessDriver {
    view: RectAnimView<FrameCounter>,
    fps: Fps,
    frame: u64,
    clock: Rc<Cell<Duration>>,
    events: Rc<RefCell<Vec<TimedEvent>>>,
}

impl HeadlessDriver {
    /// Builds the view, attaches an event recorder and delivers the initial surface size.
    pub fn new(config: ViewConfig, caps: HostCaps, size: Size, fps: Fps) -> RectAnimResult<Self> {
        let mut view = RectAnimView::new(config, caps, FrameCounter::default())?;

        let clock = Rc::new(Cell::new(Duration::ZERO));
        let events = Rc::new(RefCell::new(Vec::new()));
        let (c, e) = (clock.clone(), events.clone());
        view.set_listener(move |event: AnimationEvent| {
            e.borrow_mut().push(TimedEvent {
                at_ms: duration_ms(c.get()),
                event,
            });
        });
        view.on_surface_resized(size.width, size.height);

        Ok(Self {
            view,
            fps,
            frame: 0,
            clock,
            events,
        })
    }

    pub fn view(&self) -> &RectAnimView<FrameCounter> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RectAnimView<FrameCounter> {
        &mut self.view
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn now(&self) -> Duration {
        self.time_of(self.frame)
    }

    /// Advances one frame. Returns whether the animation is still running.
    pub fn step(&mut self) -> bool {
        let dt = self.time_of(self.frame + 1) - self.time_of(self.frame);
        self.frame += 1;
        self.clock.set(self.now());
        self.view.tick(dt)
    }

    /// Steps until `until` (inclusive of the frame at that time) or until the animation
    /// stops, whichever comes first.
    pub fn run_until(&mut self, until: Duration) {
        while self.time_of(self.frame + 1) <= until && self.step() {}
    }

    /// Whether a redraw was requested since the last call.
    pub fn take_frame_request(&mut self) -> bool {
        self.view.requester_mut().take_pending()
    }

    pub fn render(&self, backend: &mut dyn RenderBackend) -> RectAnimResult<FrameRGBA> {
        let scene = self.view.scene()?;
        backend.render_scene(&scene)
    }

    pub fn events(&self) -> Vec<TimedEvent> {
        self.events.borrow().clone()
    }

    fn time_of(&self, frame: u64) -> Duration {
        let nanos = u128::from(frame) * u128::from(self.fps.den) * 1_000_000_000
            / u128::from(self.fps.num);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/view/driver.rs"]
mod tests;
