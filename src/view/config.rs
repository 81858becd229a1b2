use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::{
    animation::ease::Ease,
    assets::decode::{PreparedImage, load_image},
    foundation::{
        core::{Rgba8, Speed},
        error::{RectAnimError, RectAnimResult},
    },
    render::scene::{DotFigure, SceneStyle},
    timeline::{
        phase::{CycleTiming, DEFAULT_STAGGER},
        sequencer::{HostCaps, SequencerConfig},
    },
};

/// Typed view configuration, normally supplied once at construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub line_color: Rgba8,
    pub dot_color: Rgba8,
    /// Clear colour for rendered frames.
    pub background: Rgba8,
    /// Phase duration is `1000 ms / speed`.
    pub speed: Speed,
    pub dot_figure: DotFigure,
    /// Dot half-extent in pixels; also the corner inset of every path.
    pub dot_width: u32,
    pub line_width: u32,
    /// Number of cycles to run; 0 repeats forever.
    pub repeat_count: u32,
    pub stagger_ms: u64,
    pub run_on_resize: bool,
    pub easing: Ease,
    /// Image drawn by [`DotFigure::Image`]. Relative paths resolve against the config file.
    pub dots_image: Option<PathBuf>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            line_color: Rgba8::BLACK,
            dot_color: Rgba8::BLUE,
            background: Rgba8::WHITE,
            speed: Speed::NORMAL,
            dot_figure: DotFigure::Circle,
            dot_width: 20,
            line_width: 2,
            repeat_count: 0,
            stagger_ms: DEFAULT_STAGGER.as_millis() as u64,
            run_on_resize: true,
            easing: Ease::Linear,
            dots_image: None,
        }
    }
}

impl ViewConfig {
    pub fn from_json_str(json: &str) -> RectAnimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: &Path) -> RectAnimResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut config = Self::from_json_str(&text)?;
        if let (Some(image), Some(dir)) = (config.dots_image.as_mut(), path.parent()) {
            if image.is_relative() {
                *image = dir.join(&*image);
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> RectAnimResult<()> {
        // Speed is validated on construction; re-check in case of a hand-built value.
        Speed::new(self.speed.get())?;
        if self.line_width == 0 {
            return Err(RectAnimError::validation("line_width must be > 0"));
        }
        Ok(())
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn timing(&self) -> CycleTiming {
        CycleTiming {
            phase_duration: self.speed.phase_duration(),
            stagger: self.stagger(),
            ease: self.easing,
        }
    }

    pub fn sequencer_config(&self, caps: HostCaps) -> SequencerConfig {
        SequencerConfig {
            timing: self.timing(),
            inset: self.dot_width,
            repeat_limit: self.repeat_count,
            run_on_resize: self.run_on_resize,
            caps,
        }
    }

    pub fn scene_style(&self) -> SceneStyle {
        SceneStyle {
            background: self.background,
            line_color: self.line_color,
            line_width: self.line_width,
            dot_color: self.dot_color,
            dot_figure: self.dot_figure,
            dot_width: self.dot_width,
        }
    }

    /// Decodes `dots_image` if one is configured.
    pub fn load_dots_image(&self) -> RectAnimResult<Option<PreparedImage>> {
        self.dots_image.as_deref().map(load_image).transpose()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/config.rs"]
mod tests;
