//! Render requests and the decode → fit → compose → render pipeline

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::canvas::{Canvas, Output};
use crate::compositor::{compose, ComposeOptions, FrameSequence, RestorePolicy};
use crate::errors::{Result, TpixError};
use crate::fit::{fit_dimensions, FitInput, DEFAULT_ANIMATED_WIDTH};
use crate::renderer::render;
use crate::source::Source;

/// Everything one rendering run needs
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    source: PathBuf,
    export: Option<PathBuf>,
    loop_count: u32,
    delay_multiplier: f64,
    user_width: Option<u32>,
    animated_width: u32,
    restore: RestorePolicy,
}

impl RenderRequest {
    /// Live rendering of `source`, looping once at the recorded speed
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            export: None,
            loop_count: 1,
            delay_multiplier: 1.0,
            user_width: None,
            animated_width: DEFAULT_ANIMATED_WIDTH,
            restore: RestorePolicy::Snapshot,
        }
    }

    /// Write a shell script instead of painting; an empty path keeps live mode
    pub fn with_export(mut self, path: Option<PathBuf>) -> Self {
        self.export = path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// 0 renders only the first frame of an animation
    pub fn with_loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = loop_count;
        self
    }

    pub fn with_delay_multiplier(mut self, multiplier: f64) -> Self {
        self.delay_multiplier = multiplier;
        self
    }

    /// 0 means fit to the terminal
    pub fn with_width(mut self, width: u32) -> Self {
        self.user_width = (width > 0).then_some(width);
        self
    }

    pub fn with_animated_width(mut self, columns: u32) -> Self {
        self.animated_width = columns;
        self
    }

    pub fn with_restore_policy(mut self, restore: RestorePolicy) -> Self {
        self.restore = restore;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn export(&self) -> Option<&Path> {
        self.export.as_deref()
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    pub fn delay_multiplier(&self) -> f64 {
        self.delay_multiplier
    }

    pub fn user_width(&self) -> Option<u32> {
        self.user_width
    }

    pub fn validate(&self) -> Result<()> {
        if !self.delay_multiplier.is_finite() || self.delay_multiplier < 0.0 {
            return Err(TpixError::InvalidRequest(format!(
                "delay multiplier must be a non-negative number, got {}",
                self.delay_multiplier
            )));
        }
        if self.animated_width == 0 {
            return Err(TpixError::InvalidRequest(
                "animated width must be at least one column".to_string(),
            ));
        }
        Ok(())
    }

    /// Decode, fit and composite the source into playable frames
    pub fn prepare<F>(&self, terminal_size: F) -> Result<FrameSequence>
    where
        F: FnOnce() -> io::Result<(u32, u32)>,
    {
        self.validate()?;

        let source = Source::load(&self.source, self.loop_count == 0)?;
        let (source_width, source_height) = source.dimensions();
        let fitted = fit_dimensions(
            &FitInput {
                source_width,
                source_height,
                user_width: self.user_width,
                animate: source.is_animated() && self.loop_count > 0,
                animated_width: self.animated_width,
            },
            terminal_size,
        )?;

        compose(
            &source,
            fitted,
            &ComposeOptions {
                loop_count: self.loop_count,
                delay_multiplier: self.delay_multiplier,
                restore: self.restore,
            },
        )
    }

    /// Prepare the frames and play them into `canvas`
    pub fn render_to<C, F>(&self, canvas: &mut C, terminal_size: F) -> Result<()>
    where
        C: Canvas + ?Sized,
        F: FnOnce() -> io::Result<(u32, u32)>,
    {
        let sequence = self.prepare(terminal_size)?;
        render(&sequence, canvas)
    }

    /// Full run. The export file is only created once all frames decoded.
    pub fn run<F>(&self, terminal_size: F) -> Result<()>
    where
        F: FnOnce() -> io::Result<(u32, u32)>,
    {
        let sequence = self.prepare(terminal_size)?;
        let mut output = Output::select(self.export())?;
        render(&sequence, &mut output)?;
        info!(
            frames = sequence.frames().len(),
            loops = sequence.loop_count(),
            "render complete"
        );
        Ok(())
    }
}
