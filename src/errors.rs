use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding, fitting or rendering an image
#[derive(Error, Debug)]
pub enum TpixError {
    /// The source image could not be read from disk
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source is not a supported image or its data is corrupt
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The animated source could not be decoded frame by frame
    #[error("Failed to decode GIF frames of {path}: {source}")]
    GifDecode {
        path: PathBuf,
        #[source]
        source: gif::DecodingError,
    },

    /// The animated source contains no image data
    #[error("{path} contains no frames")]
    NoFrames { path: PathBuf },

    /// An animated source reached the compositor without any sub-frames
    #[error("Animated source has no frames to composite")]
    EmptyAnimation,

    /// The terminal size was needed for auto-fit but could not be queried
    #[error("Failed to query terminal size (pass --width to skip auto-fit): {0}")]
    TerminalSize(#[source] io::Error),

    /// The export script could not be created
    #[error("Failed to create export file {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output sink failed after rendering started
    #[error("Write error: {0}")]
    Write(#[from] io::Error),

    /// The render request failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The configuration file exists but is unusable
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

/// Type alias for Result with `TpixError`
pub type Result<T> = std::result::Result<T, TpixError>;
