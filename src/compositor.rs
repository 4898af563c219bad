//! Frame compositing and quantization
//!
//! Animated sources are replayed onto one working RGBA canvas at native
//! resolution. After each sub-frame the canvas is downscaled, quantized to
//! the terminal palette and stored; then the sub-frame's disposal prepares
//! the canvas for the next one.

use image::imageops::{self, FilterType};
use image::{Rgb as RgbPixel, RgbImage, RgbaImage};
use tracing::{debug, info};

use crate::errors::{Result, TpixError};
use crate::fit::Fitted;
use crate::palette::{Rgb, PALETTE};
use crate::source::{Disposal, Source, SubFrame};

/// How restore-to-previous treats the recorded restore point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestorePolicy {
    /// The restore point is an independent copy of the canvas
    #[default]
    Snapshot,
    /// The restore point follows the live canvas, so restoring never
    /// changes anything. Reproduces scripts exported by older releases.
    Alias,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeOptions {
    pub loop_count: u32,
    pub delay_multiplier: f64,
    pub restore: RestorePolicy,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            loop_count: 1,
            delay_multiplier: 1.0,
            restore: RestorePolicy::Snapshot,
        }
    }
}

/// A quantized picture: palette indices, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    delay_ms: u64,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Palette index at (x, y)
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pause after this frame, before the next one is shown
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

/// The immutable result of compositing: all frames share one size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    width: u32,
    height: u32,
    loop_count: u32,
}

impl FrameSequence {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// How many times the renderer plays the whole sequence
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Terminal rows one frame occupies
    pub fn rows(&self) -> u32 {
        self.height / 2
    }
}

/// Turn a decoded source into the frames the renderer plays.
///
/// An odd `fitted.height` is trimmed to the even height below it, since
/// every terminal row carries two pixel rows.
pub fn compose(
    source: &Source,
    fitted: Fitted,
    options: &ComposeOptions,
) -> Result<FrameSequence> {
    let fitted = Fitted {
        width: fitted.width,
        height: fitted.height & !1,
    };
    let quantizer = Quantizer {
        fitted,
        delay_multiplier: options.delay_multiplier,
    };

    let (frames, loop_count) = match source {
        Source::Still(image) => (vec![quantizer.frame(image, 0)], 1),
        Source::Animated {
            width,
            height,
            frames,
        } => match frames.first() {
            Some(first) if options.loop_count == 0 => {
                let mut canvas = RgbaImage::new(*width, *height);
                draw_over(&mut canvas, first);
                (vec![quantizer.frame(&canvas, first.delay_ms)], 1)
            }
            None => return Err(TpixError::EmptyAnimation),
            Some(_) => {
                let frames = replay(*width, *height, frames, options.restore, &quantizer);
                (frames, options.loop_count)
            }
        },
    };

    info!(
        frames = frames.len(),
        width = fitted.width,
        height = fitted.height,
        loop_count,
        "composed frame sequence"
    );

    Ok(FrameSequence {
        frames,
        width: fitted.width,
        height: fitted.height,
        loop_count,
    })
}

fn replay(
    width: u32,
    height: u32,
    subframes: &[SubFrame],
    policy: RestorePolicy,
    quantizer: &Quantizer,
) -> Vec<Frame> {
    let mut canvas = RgbaImage::new(width, height);
    let mut restore_point: Option<RgbaImage> = None;
    let mut frames = Vec::with_capacity(subframes.len());

    for (i, sub) in subframes.iter().enumerate() {
        draw_over(&mut canvas, sub);
        frames.push(quantizer.frame(&canvas, sub.delay_ms));

        debug!(frame = i, disposal = ?sub.disposal, "applying disposal");
        match sub.disposal {
            Disposal::Unspecified => {}
            Disposal::None => {
                if policy == RestorePolicy::Snapshot {
                    restore_point = Some(canvas.clone());
                }
            }
            Disposal::Background => {
                canvas = RgbaImage::new(width, height);
                if policy == RestorePolicy::Snapshot {
                    restore_point = Some(canvas.clone());
                }
            }
            Disposal::Previous => {
                if let Some(previous) = &restore_point {
                    canvas.clone_from(previous);
                }
            }
        }
    }

    frames
}

/// Alpha-over with binary transparency: opaque pixels replace, transparent
/// ones leave the canvas untouched. Pixels outside the screen are clipped.
fn draw_over(canvas: &mut RgbaImage, sub: &SubFrame) {
    let (screen_w, screen_h) = canvas.dimensions();

    for y in 0..sub.height {
        let global_y = sub.top + y;
        if global_y >= screen_h {
            break;
        }
        for x in 0..sub.width {
            let global_x = sub.left + x;
            if global_x >= screen_w {
                break;
            }
            match sub.pixel(x, y) {
                Some(px) if px[3] != 0 => canvas.put_pixel(global_x, global_y, image::Rgba(px)),
                _ => {}
            }
        }
    }
}

struct Quantizer {
    fitted: Fitted,
    delay_multiplier: f64,
}

impl Quantizer {
    fn frame(&self, image: &RgbaImage, delay_ms: u32) -> Frame {
        let Fitted { width, height } = self.fitted;
        let delay_ms = (f64::from(delay_ms) * self.delay_multiplier).ceil() as u64;

        if width == 0 || height == 0 {
            return Frame {
                width,
                height,
                pixels: Vec::new(),
                delay_ms,
            };
        }

        let scaled = imageops::resize(&premultiply(image), width, height, FilterType::Lanczos3);
        let pixels = scaled
            .pixels()
            .map(|RgbPixel([r, g, b])| PALETTE.nearest(Rgb::new(*r, *g, *b)))
            .collect();

        Frame {
            width,
            height,
            pixels,
            delay_ms,
        }
    }
}

fn premultiply(image: &RgbaImage) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let Rgb { r, g, b } = Rgb::from_rgba_premultiplied(image.get_pixel(x, y).0);
        RgbPixel([r, g, b])
    })
}
