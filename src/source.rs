//! Decoding of still and animated sources
//!
//! PNG and JPEG go through `image`; GIF is read with the `gif` crate so the
//! raw sub-frames (offset, disposal, delay) stay available for compositing.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, info};

use crate::errors::{Result, TpixError};

/// How the screen is prepared after a sub-frame was shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposal {
    /// No instruction; the frame stays on screen
    #[default]
    Unspecified,
    /// Leave the frame and remember the screen as the restore point
    None,
    /// Clear the screen to transparent
    Background,
    /// Return to the last restore point
    Previous,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(method: gif::DisposalMethod) -> Self {
        match method {
            gif::DisposalMethod::Any => Disposal::Unspecified,
            gif::DisposalMethod::Keep => Disposal::None,
            gif::DisposalMethod::Background => Disposal::Background,
            gif::DisposalMethod::Previous => Disposal::Previous,
        }
    }
}

/// One raw GIF image block with its placement on the logical screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubFrame {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub delay_ms: u32,
    pub disposal: Disposal,
    /// Straight RGBA, `width * height * 4` bytes; alpha 0 marks transparency
    pub pixels: Vec<u8>,
}

impl SubFrame {
    /// RGBA of the pixel at frame-local coordinates
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// A decoded image
#[derive(Debug, Clone)]
pub enum Source {
    Still(RgbaImage),
    Animated {
        width: u32,
        height: u32,
        frames: Vec<SubFrame>,
    },
}

impl Source {
    /// Read and decode `path`. With `first_frame_only`, GIF decoding stops
    /// after the first sub-frame.
    pub fn load(path: &Path, first_frame_only: bool) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| TpixError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, path, first_frame_only)
    }

    /// Decode an in-memory image; `path` is only used in errors
    pub fn from_bytes(bytes: &[u8], path: &Path, first_frame_only: bool) -> Result<Self> {
        let decode_err = |source| TpixError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let format = image::guess_format(bytes).map_err(decode_err)?;
        info!(?format, path = %path.display(), "decoding image");

        if format == ImageFormat::Gif {
            return decode_gif(bytes, path, first_frame_only);
        }

        let image = image::load_from_memory_with_format(bytes, format).map_err(decode_err)?;
        Ok(Source::Still(image.to_rgba8()))
    }

    /// Logical screen size in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Source::Still(image) => image.dimensions(),
            Source::Animated { width, height, .. } => (*width, *height),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Source::Animated { .. })
    }
}

fn decode_gif(bytes: &[u8], path: &Path, first_frame_only: bool) -> Result<Source> {
    let gif_err = |source| TpixError::GifDecode {
        path: path.to_path_buf(),
        source,
    };

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(Cursor::new(bytes)).map_err(gif_err)?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());

    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().map_err(gif_err)? {
        frames.push(SubFrame {
            left: u32::from(frame.left),
            top: u32::from(frame.top),
            width: u32::from(frame.width),
            height: u32::from(frame.height),
            // GIF delays are in hundredths of a second
            delay_ms: u32::from(frame.delay) * 10,
            disposal: frame.dispose.into(),
            pixels: frame.buffer.to_vec(),
        });
        if first_frame_only {
            break;
        }
    }

    if frames.is_empty() {
        return Err(TpixError::NoFrames {
            path: path.to_path_buf(),
        });
    }

    debug!(width, height, frames = frames.len(), "decoded GIF");
    Ok(Source::Animated {
        width,
        height,
        frames,
    })
}
