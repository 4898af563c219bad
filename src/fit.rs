//! Fitting source dimensions to the terminal
//!
//! Two image rows share one terminal row (half-block rendering), so the
//! usable pixel height is `rows * 2 - 1`; the last row is left for the prompt.

use std::io;

use tracing::debug;

use crate::errors::{Result, TpixError};

/// Column budget for animations when no width is given
pub const DEFAULT_ANIMATED_WIDTH: u32 = 40;

/// Query the controlling terminal as (columns, rows)
pub fn terminal_size() -> io::Result<(u32, u32)> {
    crossterm::terminal::size().map(|(cols, rows)| (u32::from(cols), u32::from(rows)))
}

/// Everything the fitter needs besides the terminal size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitInput {
    pub source_width: u32,
    pub source_height: u32,
    /// Explicit target width; disables auto-fit
    pub user_width: Option<u32>,
    /// The source will actually animate (GIF with a loop count above zero)
    pub animate: bool,
    /// Column clamp used for animations
    pub animated_width: u32,
}

/// Target pixel size; `height` is always even
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fitted {
    pub width: u32,
    pub height: u32,
}

impl Fitted {
    /// Terminal rows one frame occupies
    pub fn rows(&self) -> u32 {
        self.height / 2
    }
}

/// Compute the fitted size. `terminal_size` is only called when auto-fit is
/// needed, and its failure is returned as [`TpixError::TerminalSize`].
pub fn fit_dimensions<F>(input: &FitInput, terminal_size: F) -> Result<Fitted>
where
    F: FnOnce() -> io::Result<(u32, u32)>,
{
    let (sw, sh) = (input.source_width, input.source_height);
    if sw == 0 || sh == 0 {
        return Ok(Fitted { width: 0, height: 0 });
    }

    let scale = if let Some(width) = input.user_width {
        f64::from(width) / f64::from(sw)
    } else {
        let (cols, rows) = terminal_size().map_err(TpixError::TerminalSize)?;
        let cols = if input.animate { input.animated_width } else { cols };
        let rows_px = (u64::from(rows) * 2).saturating_sub(1);
        debug!(cols, rows, rows_px, "auto-fit terminal area");

        if u64::from(cols) < u64::from(sw) || rows_px < u64::from(sh) {
            let scale_w = f64::from(cols) / f64::from(sw);
            let scale_h = rows_px as f64 / f64::from(sh);
            scale_w.min(scale_h)
        } else {
            1.0
        }
    };

    let width = (scale * f64::from(sw)).floor() as u32;
    let mut height = (scale * f64::from(sh)).floor() as u32;
    if height % 2 != 0 {
        height -= 1;
    }

    debug!(sw, sh, scale, width, height, "fitted image");
    Ok(Fitted { width, height })
}
