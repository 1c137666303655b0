// ============================================================================
// TextureCombiner CLI — headless grid export via command-line arguments
// ============================================================================
//
// Usage examples:
//   TextureCombiner --top-left a.png --bottom-right b.png --output grid.png
//   TextureCombiner --top-left a.png --copy top-left:bottom-right -o grid.png
//   TextureCombiner --top-left a.png -W 1024 -H 512 -o grid.png --verbose
//
// No GUI is opened in CLI mode. Everything runs synchronously through the
// same session the window uses.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use texture_combiner::{GridSlot, Session};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// TextureCombiner headless exporter.
///
/// Place PNG images in the four grid cells and write the combined PNG — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "TextureCombiner",
    about = "Combine up to four PNG images into one 2x2 transparent PNG",
    long_about = "Tile up to four PNG images into the quadrants of a single\n\
                  transparent PNG. Each image is nearest-neighbor scaled to fill\n\
                  its quadrant exactly; empty cells stay transparent.\n\n\
                  Example:\n  \
                  TextureCombiner --top-left a.png --bottom-right b.png -o grid.png"
)]
pub struct CliArgs {
    /// Image for the top-left cell.
    #[arg(long, value_name = "FILE.png")]
    pub top_left: Option<PathBuf>,

    /// Image for the top-right cell.
    #[arg(long, value_name = "FILE.png")]
    pub top_right: Option<PathBuf>,

    /// Image for the bottom-left cell.
    #[arg(long, value_name = "FILE.png")]
    pub bottom_left: Option<PathBuf>,

    /// Image for the bottom-right cell.
    #[arg(long, value_name = "FILE.png")]
    pub bottom_right: Option<PathBuf>,

    /// Copy one cell into another after loading, e.g. "top-left:bottom-right"
    /// or "0:3". May be repeated; applied in order.
    #[arg(long, value_name = "FROM:TO", value_parser = parse_copy)]
    pub copy: Vec<(GridSlot, GridSlot)>,

    /// Output width in pixels.
    #[arg(short = 'W', long, default_value = "2048")]
    pub width: String,

    /// Output height in pixels.
    #[arg(short = 'H', long, default_value = "2048")]
    pub height: String,

    /// Output PNG path.
    #[arg(short, long, required = true, value_name = "FILE.png")]
    pub output: PathBuf,

    /// Print per-step details and timing.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process arguments.
    /// Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        wants_cli(std::env::args().skip(1))
    }

    fn inputs(&self) -> [(GridSlot, Option<&Path>); 4] {
        [
            (GridSlot::TopLeft, self.top_left.as_deref()),
            (GridSlot::TopRight, self.top_right.as_deref()),
            (GridSlot::BottomLeft, self.bottom_left.as_deref()),
            (GridSlot::BottomRight, self.bottom_right.as_deref()),
        ]
    }
}

/// `--output`/`-o` in any spelling clap accepts (`-oFILE`, `-o=FILE`,
/// `--output=FILE`), or a help request.
fn wants_cli<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().any(|a| {
        let a = a.as_ref();
        a == "--output"
            || a.starts_with("--output=")
            || a.starts_with("-o")
            || a == "--help"
            || a == "-h"
    })
}

fn parse_copy(s: &str) -> Result<(GridSlot, GridSlot), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{}'", s))?;
    Ok((from.parse()?, to.parse()?))
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the export and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    let start = Instant::now();
    match run_inner(&args) {
        Ok(path) => {
            if args.verbose {
                println!(
                    "  → {} ({:.0}ms)",
                    path.display(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &CliArgs) -> Result<PathBuf, String> {
    let mut session = Session::new();
    session.width_text = args.width.clone();
    session.height_text = args.height.clone();

    // Validate the size before touching any input file.
    let size = session.export_size().map_err(|e| e.detailed())?;

    for (slot, path) in args.inputs() {
        let Some(path) = path else { continue };
        // Named explicitly, so a non-PNG path is an error here, not a silent skip.
        session.drop_file(slot, path).map_err(|e| e.detailed())?;
        if args.verbose {
            println!("[{}] {}", slot, path.display());
        }
    }

    for &(from, to) in &args.copy {
        if !session.select_copy_source(from) {
            return Err(format!("cannot copy from empty {} cell", from));
        }
        session
            .paste_from_source(to)
            .map_err(|e| e.detailed())?;
        if args.verbose {
            println!("  copied {} → {}", from, to);
        }
    }

    if args.verbose {
        println!(
            "  composing {}x{} from {} image(s)",
            size.width(),
            size.height(),
            session.slots().populated()
        );
    }

    session.export_to(&args.output).map_err(|e| e.detailed())
}
