//! Shell script export sink
//!
//! The script alternates between `echo -n '...'` blocks carrying the cell
//! text and plain command lines (`tput cuu1`, `sleep`):
//!
//! ```text
//! echo -n '<cells and newlines>'
//! tput cuu1
//! echo -n ''
//! sleep 0.1
//! echo -n '<cells and newlines>'
//! ```
//!
//! Output is a pure function of the operations received.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::{push_cell, Canvas};
use crate::errors::{Result, TpixError};

const OPEN_ECHO: &str = "echo -n '";
const CLOSE_ECHO: &str = "'\n";
const CURSOR_UP: &str = "tput cuu1\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EchoState {
    /// Inside a single-quoted echo argument; cell text may be written
    Inside,
    /// Between echo blocks; command lines may be written
    Outside,
}

/// Writes a replayable POSIX shell script
#[derive(Debug)]
pub struct ScriptCanvas<W: Write> {
    out: W,
    state: EchoState,
}

impl ScriptCanvas<BufWriter<File>> {
    /// Create `path` from scratch as an executable script
    pub fn create(path: &Path) -> Result<Self> {
        let export_err = |source| TpixError::Export {
            path: path.to_path_buf(),
            source,
        };

        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(export_err(e)),
            _ => {}
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o755);
        }
        let file = options.open(path).map_err(export_err)?;
        debug!(path = %path.display(), "created export script");

        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> ScriptCanvas<W> {
    /// Start a script on `out`; the first echo block is opened immediately
    pub fn new(out: W) -> Result<Self> {
        let mut canvas = Self {
            out,
            state: EchoState::Outside,
        };
        canvas.open_echo()?;
        Ok(canvas)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn open_echo(&mut self) -> io::Result<()> {
        if self.state == EchoState::Outside {
            self.out.write_all(OPEN_ECHO.as_bytes())?;
            self.state = EchoState::Inside;
        }
        Ok(())
    }

    fn close_echo(&mut self) -> io::Result<()> {
        if self.state == EchoState::Inside {
            self.out.write_all(CLOSE_ECHO.as_bytes())?;
            self.state = EchoState::Outside;
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        self.open_echo()?;
        self.out.write_all(text.as_bytes())
    }

    fn command(&mut self, line: &str) -> io::Result<()> {
        self.close_echo()?;
        self.out.write_all(line.as_bytes())
    }
}

impl<W: Write> Canvas for ScriptCanvas<W> {
    fn paint(&mut self, top: u8, bottom: u8) -> Result<()> {
        let mut cell = String::new();
        push_cell(&mut cell, top, bottom);
        Ok(self.text(&cell)?)
    }

    fn new_line(&mut self) -> Result<()> {
        Ok(self.text("\n")?)
    }

    fn line_up(&mut self, count: u32) -> Result<()> {
        self.close_echo()?;
        for _ in 0..count {
            self.command(CURSOR_UP)?;
        }
        self.open_echo()?;
        Ok(())
    }

    fn sleep(&mut self, delay_ms: u64) -> Result<()> {
        let seconds = delay_ms as f64 / 1000.0;
        self.command(&format!("sleep {seconds}\n"))?;
        self.open_echo()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.state == EchoState::Inside {
            self.out.write_all(b"'")?;
            self.state = EchoState::Outside;
        }
        self.out.flush()?;
        Ok(())
    }
}
