//! Tick-driven "rect" loading animation.
//!
//! Four vertices start near the corners of a surface, collapse to its center, pulse,
//! explode back out and pulse again, forever or for a fixed number of cycles. The engine
//! is host-agnostic: a host feeds surface sizes and clock ticks into a [`RectAnimView`],
//! listens for [`AnimationEvent`]s, and draws the [`Scene`] it produces, either itself or
//! through the bundled CPU renderer.
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod timeline;
pub mod view;

pub use animation::{
    ease::Ease,
    keyframes::{Keyframes, Lerp, Segment},
};
pub use assets::decode::{PreparedImage, decode_image, load_image};
pub use foundation::{
    core::{Fps, Point, Rgba8, Size, Speed},
    error::{RectAnimError, RectAnimResult},
};
pub use geometry::{
    layout::{Corner, VertexLayout},
    vertex::{Vertex, VertexPath},
};
pub use render::{
    backend::{BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend},
    cpu::CpuBackend,
    scene::{DotFigure, DotShape, DrawOp, Scene, SceneStyle},
};
pub use timeline::{
    events::{AnimationEvent, AnimationListener},
    phase::{CycleTiming, Phase, PhaseKind, Stage},
    pulse::AlphaState,
    sequencer::{HostCaps, Sequencer, SequencerConfig, SequencerState},
};
pub use view::{
    adapter::{FrameCounter, FrameRequester, RectAnimView, Snapshot},
    config::ViewConfig,
    driver::{HeadlessDriver, TimedEvent},
};
