use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use tpix::config::load_config;
use tpix::{fit, RenderRequest, RestorePolicy, PALETTE};

/// Image viewer for terminal emulators. Supports PNG, JPEG and GIF.
///
/// Images can be written to a shell script to be rendered later, for
/// instance to show a logo at login. GIFs are animated and limited to a
/// 40 column width by default. Smaller terminal fonts give finer output.
#[derive(Parser, Debug)]
#[command(name = "tpix", version, about, long_about = None)]
#[command(after_help = "Examples:\n  tpix car.png\n  tpix logo.gif\n  tpix -l 2 wheel.gif\n  tpix -o motd.sh logo.png")]
struct Args {
    /// Image to display
    #[arg(required_unless_present = "palette")]
    file: Option<PathBuf>,

    /// Target width; the height follows the aspect ratio. Useful over SSH
    /// where terminal resizes are not reported. 0 fits the terminal
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// Export the image to a shell script instead of drawing it
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Times to play a GIF; 0 renders the first frame only
    #[arg(short = 'l', long = "loops")]
    loops: Option<u32>,

    /// Multiplier for GIF frame delays (2 plays at half speed)
    #[arg(short = 'd', long = "delay")]
    delay: Option<f64>,

    /// Reproduce the restore-to-previous handling of older exports
    #[arg(long)]
    legacy_restore: bool,

    /// Show the 256 palette colors and exit
    #[arg(long)]
    palette: bool,

    /// Log progress to stderr
    #[arg(long)]
    verbose: bool,

    /// Log debug details to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else if args.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    // stdout carries the image, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if args.palette {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(PALETTE.swatch().as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let config = load_config()?;
    let Some(file) = args.file else {
        anyhow::bail!("no image file given");
    };

    let restore = if args.legacy_restore {
        RestorePolicy::Alias
    } else {
        config.restore_policy()
    };

    let request = RenderRequest::new(file)
        .with_export(args.output)
        .with_loop_count(args.loops.unwrap_or(config.loop_count))
        .with_delay_multiplier(args.delay.unwrap_or(config.delay_multiplier))
        .with_width(args.width.unwrap_or(0))
        .with_animated_width(config.animated_width)
        .with_restore_policy(restore);

    tracing::debug!(?request, "starting render");

    request
        .run(fit::terminal_size)
        .with_context(|| format!("cannot render {}", request.source().display()))?;

    Ok(())
}
