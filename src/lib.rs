//! # tpix
//!
//! Renders PNG, JPEG and GIF images inside a terminal using half-block cells
//! and the 256-color palette. Animated GIFs are composited frame by frame and
//! either played live or exported to a shell script that replays them later.
//!
//! ```no_run
//! use tpix::{fit, RenderRequest};
//!
//! RenderRequest::new("logo.gif")
//!     .with_loop_count(2)
//!     .with_export(Some("logo.sh".into()))
//!     .run(fit::terminal_size)?;
//! # Ok::<(), tpix::TpixError>(())
//! ```

pub mod canvas;
pub mod compositor;
pub mod config;
pub mod errors;
pub mod fit;
pub mod palette;
pub mod renderer;
pub mod request;
pub mod source;

pub use canvas::{Canvas, InteractiveCanvas, Output, ScriptCanvas};
pub use compositor::{compose, ComposeOptions, Frame, FrameSequence, RestorePolicy};
pub use errors::{Result, TpixError};
pub use fit::{fit_dimensions, FitInput, Fitted};
pub use palette::{Palette, Rgb, PALETTE};
pub use renderer::render;
pub use request::RenderRequest;
pub use source::{Disposal, Source, SubFrame};
