//! Live terminal sink
//!
//! Cells are buffered in memory and written out in one go whenever the
//! cursor has to move, so a frame appears at once instead of cell by cell.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveUp;
use crossterm::queue;

use super::{push_cell, Canvas};
use crate::errors::Result;

/// Paints straight to a terminal, with real cursor movement and real delays
#[derive(Debug)]
pub struct InteractiveCanvas<W: Write> {
    out: W,
    buffer: String,
}

impl InteractiveCanvas<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> InteractiveCanvas<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: String::new(),
        }
    }

    /// Text painted since the last flush
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.out.write_all(self.buffer.as_bytes())?;
        self.buffer.clear();
        Ok(())
    }
}

impl<W: Write> Canvas for InteractiveCanvas<W> {
    fn paint(&mut self, top: u8, bottom: u8) -> Result<()> {
        push_cell(&mut self.buffer, top, bottom);
        Ok(())
    }

    fn new_line(&mut self) -> Result<()> {
        self.buffer.push('\n');
        Ok(())
    }

    fn line_up(&mut self, count: u32) -> Result<()> {
        self.flush_buffer()?;
        for _ in 0..count {
            queue!(self.out, MoveUp(1))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn sleep(&mut self, delay_ms: u64) -> Result<()> {
        thread::sleep(Duration::from_millis(delay_ms));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.flush_buffer()?;
        self.out.flush()?;
        Ok(())
    }
}
