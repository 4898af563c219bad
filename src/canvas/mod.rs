//! # Canvas - where rendered frames go
//!
//! Both sinks receive the same stream of operations from the renderer:
//!
//! ```text
//!                 ┌─────────────────────────┐
//!                 │        Renderer         │
//!                 │ paint/new_line/line_up/ │
//!                 │     sleep/close         │
//!                 └───────────┬─────────────┘
//!                             │
//!                 ┌───────────┴───────────┐
//!                 ▼                       ▼
//!          ┌─────────────┐         ┌─────────────┐
//!          │ Interactive │         │   Script    │
//!          │ escape codes│         │ echo / tput │
//!          │  real sleep │         │   / sleep   │
//!          └─────────────┘         └─────────────┘
//! ```
//!
//! Every cell is a lower half block (▄): the background carries the top
//! pixel, the foreground the bottom one. The lower block is used because
//! terminals with an odd cell height shift the upper block down a line.

mod interactive;
mod script;

use std::fs::File;
use std::io::{BufWriter, Stdout};
use std::path::Path;

use tracing::debug;

use crate::errors::Result;

pub use interactive::InteractiveCanvas;
pub use script::ScriptCanvas;

/// Glyph drawn in every cell
pub const LOWER_HALF_BLOCK: char = '▄';

/// Output sink for rendered frames
pub trait Canvas {
    /// Emit one cell: background = palette[top], foreground = palette[bottom]
    fn paint(&mut self, top: u8, bottom: u8) -> Result<()>;

    /// End the current row
    fn new_line(&mut self) -> Result<()>;

    /// Move the cursor up `count` rows so the next frame overwrites this one
    fn line_up(&mut self, count: u32) -> Result<()>;

    /// Pause before the next frame
    fn sleep(&mut self, delay_ms: u64) -> Result<()>;

    /// Flush and release the sink
    fn close(&mut self) -> Result<()>;
}

/// Append the escape text of one half-block cell
pub fn push_cell(buf: &mut String, top: u8, bottom: u8) {
    buf.push_str(&format!(
        "\x1b[48;5;{top}m\x1b[38;5;{bottom}m{LOWER_HALF_BLOCK}\x1b[0m"
    ));
}

/// The sink chosen for a run
pub enum Output {
    Interactive(InteractiveCanvas<Stdout>),
    Script(ScriptCanvas<BufWriter<File>>),
}

impl Output {
    /// Script export when `export` is given, the live terminal otherwise
    pub fn select(export: Option<&Path>) -> Result<Self> {
        match export {
            Some(path) => {
                debug!(path = %path.display(), "exporting to shell script");
                Ok(Output::Script(ScriptCanvas::create(path)?))
            }
            None => {
                debug!("rendering to terminal");
                Ok(Output::Interactive(InteractiveCanvas::stdout()))
            }
        }
    }
}

impl Canvas for Output {
    fn paint(&mut self, top: u8, bottom: u8) -> Result<()> {
        match self {
            Output::Interactive(c) => c.paint(top, bottom),
            Output::Script(c) => c.paint(top, bottom),
        }
    }

    fn new_line(&mut self) -> Result<()> {
        match self {
            Output::Interactive(c) => c.new_line(),
            Output::Script(c) => c.new_line(),
        }
    }

    fn line_up(&mut self, count: u32) -> Result<()> {
        match self {
            Output::Interactive(c) => c.line_up(count),
            Output::Script(c) => c.line_up(count),
        }
    }

    fn sleep(&mut self, delay_ms: u64) -> Result<()> {
        match self {
            Output::Interactive(c) => c.sleep(delay_ms),
            Output::Script(c) => c.sleep(delay_ms),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self {
            Output::Interactive(c) => c.close(),
            Output::Script(c) => {
                c.close()?;
                c.get_ref().get_ref().sync_all()?;
                Ok(())
            }
        }
    }
}
