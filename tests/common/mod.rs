//! Shared fixtures for integration tests
//!
//! Images are generated on the fly so every expected script can be worked
//! out by hand: fixtures only use colors that sit exactly on palette entries.

#![allow(dead_code)]

use std::borrow::Cow;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub use tempfile::TempDir;

/// Global GIF palette: black, red, green, blue
pub const GIF_PALETTE: [u8; 12] = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];

/// GIF palette slots
pub const BLACK: u8 = 0;
pub const RED: u8 = 1;
pub const GREEN: u8 = 2;
pub const BLUE: u8 = 3;

/// Terminal palette indices of the same colors
pub const T_BLACK: u8 = 0;
pub const T_RED: u8 = 9;
pub const T_GREEN: u8 = 10;
pub const T_BLUE: u8 = 12;

/// One GIF image block
pub struct GifFrame {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub indices: Vec<u8>,
    pub dispose: gif::DisposalMethod,
    pub transparent: Option<u8>,
    /// Hundredths of a second
    pub delay: u16,
}

impl GifFrame {
    pub fn full(size: u16, color: u8, dispose: gif::DisposalMethod) -> Self {
        Self {
            left: 0,
            top: 0,
            width: size,
            indices: vec![color; usize::from(size) * usize::from(size)],
            dispose,
            transparent: None,
            delay: 10,
        }
    }

    pub fn patch(left: u16, top: u16, color: u8, dispose: gif::DisposalMethod) -> Self {
        Self {
            left,
            top,
            width: 1,
            indices: vec![color],
            dispose,
            transparent: None,
            delay: 10,
        }
    }
}

/// Encode an animated GIF with a `width` x `height` logical screen
pub fn write_gif(path: &Path, width: u16, height: u16, frames: &[GifFrame]) {
    let file = File::create(path).expect("create gif");
    let mut encoder = gif::Encoder::new(file, width, height, &GIF_PALETTE).expect("gif encoder");
    for f in frames {
        let mut frame = gif::Frame::default();
        frame.left = f.left;
        frame.top = f.top;
        frame.width = f.width;
        frame.height = (f.indices.len() / usize::from(f.width)) as u16;
        frame.dispose = f.dispose;
        frame.transparent = f.transparent;
        frame.delay = f.delay;
        frame.buffer = Cow::Borrowed(&f.indices);
        encoder.write_frame(&frame).expect("write gif frame");
    }
}

/// Save a solid-color PNG
pub fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    image::RgbaImage::from_pixel(width, height, image::Rgba(rgba))
        .save(path)
        .expect("write png");
}

/// Save a solid-color baseline JPEG
pub fn write_jpeg(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .expect("write jpeg");
}

/// A terminal too large to ever force a downscale
pub fn huge_terminal() -> io::Result<(u32, u32)> {
    Ok((u32::MAX, u32::MAX))
}

pub fn fixture(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Escape text of one half-block cell
pub fn cell(top: u8, bottom: u8) -> String {
    format!("\x1b[48;5;{top}m\x1b[38;5;{bottom}m▄\x1b[0m")
}

/// One 2x2 frame (row-major palette indices) as it appears in a script
pub fn block_2x2(grid: [u8; 4]) -> String {
    format!("{}{}\n", cell(grid[0], grid[2]), cell(grid[1], grid[3]))
}

/// The script exported for a sequence of 2x2 frames played once
pub fn script_2x2(grids: &[[u8; 4]], delay_ms: u64) -> String {
    let mut script = String::from("echo -n '");
    for (i, grid) in grids.iter().enumerate() {
        if i > 0 {
            script.push_str("'\ntput cuu1\necho -n ''\n");
            script.push_str(&format!("sleep {}\n", delay_ms as f64 / 1000.0));
            script.push_str("echo -n '");
        }
        script.push_str(&block_2x2(*grid));
    }
    script.push('\'');
    script
}

/// The script exported for solid-color frames of `cols` x `rows` cells.
/// `colors` holds one palette index per frame; the sequence is played
/// `loops` times with `delay_ms` between consecutive frames.
pub fn solid_script(
    cols: usize,
    rows: usize,
    colors: &[u8],
    loops: usize,
    delay_ms: u64,
) -> String {
    let mut script = String::from("echo -n '");
    let shown = colors.iter().cycle().take(colors.len() * loops);
    for (i, &color) in shown.enumerate() {
        if i > 0 {
            script.push_str("'\n");
            script.push_str(&"tput cuu1\n".repeat(rows));
            script.push_str("echo -n ''\n");
            script.push_str(&format!("sleep {}\n", delay_ms as f64 / 1000.0));
            script.push_str("echo -n '");
        }
        let row = format!("{}\n", cell(color, color).repeat(cols));
        script.push_str(&row.repeat(rows));
    }
    script.push('\'');
    script
}
