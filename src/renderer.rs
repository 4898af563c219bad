//! Plays a frame sequence into a canvas

use tracing::debug;

use crate::canvas::Canvas;
use crate::compositor::{Frame, FrameSequence};
use crate::errors::Result;

/// Paint every frame `loop_count` times, then close the canvas.
///
/// A frame's delay is the pause *after* it: before each frame except the
/// very first, the cursor returns to the top of the previous frame and the
/// previous frame's delay elapses. Any canvas error aborts the run.
pub fn render<C: Canvas + ?Sized>(sequence: &FrameSequence, canvas: &mut C) -> Result<()> {
    let mut previous_delay: Option<u64> = None;

    for iteration in 0..sequence.loop_count() {
        debug!(iteration, "starting loop");
        for frame in sequence.frames() {
            if let Some(delay) = previous_delay {
                canvas.line_up(sequence.rows())?;
                canvas.sleep(delay)?;
            }
            paint_frame(frame, canvas)?;
            previous_delay = Some(frame.delay_ms());
        }
    }

    canvas.close()
}

fn paint_frame<C: Canvas + ?Sized>(frame: &Frame, canvas: &mut C) -> Result<()> {
    for y in (0..frame.height()).step_by(2) {
        for x in 0..frame.width() {
            canvas.paint(frame.index(x, y), frame.index(x, y + 1))?;
        }
        canvas.new_line()?;
    }
    Ok(())
}
