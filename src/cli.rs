// ============================================================================
// telesticker CLI — headless batch editing via command-line arguments
// ============================================================================
//
// Usage examples:
//   telesticker --input photo.png --output sticker.png
//   telesticker -i photo.jpg --rotate right --crop 10,10,200,200 -o out.png
//   telesticker -i *.jpg --brightness 120 --output-dir processed/
//   telesticker -i logo.png --text "hello" --text-at 20,20 --bold -o out.png
//
// Edits run through the same EditingSession the interactive dialog uses;
// output is always PNG at most 512 px on the longest edge.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use image::Rgba;

use crate::components::tools::{PointerInput, Tool};
use crate::ops::adjust::AdjustmentKind;
use crate::record::{ImageSource, StickerRecord};
use crate::session::EditingSession;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// telesticker headless image editor.
///
/// Crop, rotate, flip, adjust and caption sticker images without a GUI.
#[derive(Parser, Debug)]
#[command(
    name = "telesticker",
    about = "telesticker headless sticker image editor",
    long_about = "Apply sticker edits to image files without opening a GUI.\n\
                  Images larger than 512 px on either edge are scaled down\n\
                  first, matching the interactive editor. Output is PNG.\n\n\
                  Example:\n  \
                  telesticker --input photo.png --rotate right --output out.png\n  \
                  telesticker -i *.jpg --brightness 120 --output-dir out/"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "*.png", "shots/*.jpg").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output file path. Only valid for single-file input.
    /// For batch input use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    /// Files are written here with the original stem and a .png extension.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Brightness, 0-200 (100 = unchanged).
    #[arg(long, value_name = "0-200")]
    pub brightness: Option<i32>,

    /// Contrast, 0-200 (100 = unchanged).
    #[arg(long, value_name = "0-200")]
    pub contrast: Option<i32>,

    /// Saturation, 0-200 (100 = unchanged).
    #[arg(long, value_name = "0-200")]
    pub saturation: Option<i32>,

    /// Crop rectangle as "x,y,w,h" in post-fit pixels. Minimum 5x5.
    #[arg(long, value_name = "X,Y,W,H")]
    pub crop: Option<String>,

    /// Rotate 90 degrees. May be given multiple times.
    #[arg(long, value_name = "left|right")]
    pub rotate: Vec<String>,

    /// Mirror the image. May be given multiple times.
    #[arg(long, value_name = "h|v")]
    pub flip: Vec<String>,

    /// Text to stamp onto the image.
    #[arg(long, value_name = "STRING")]
    pub text: Option<String>,

    /// Top-left anchor of the text stamp as "x,y". Defaults to 16,16.
    #[arg(long, value_name = "X,Y")]
    pub text_at: Option<String>,

    /// Text size in pixels.
    #[arg(long, default_value_t = 32.0, value_name = "PX")]
    pub text_size: f32,

    /// Text color as "#rrggbb".
    #[arg(long, default_value = "#ffffff", value_name = "#RRGGBB")]
    pub text_color: String,

    /// Bold text.
    #[arg(long)]
    pub bold: bool,

    /// Italic text.
    #[arg(long)]
    pub italic: bool,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    // Resolve glob patterns / literal paths → concrete PathBufs
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    // Multiple inputs require --output-dir, not --output
    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    // Validate edit arguments once, up front
    let plan = match EditPlan::from_args(&args) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Create output directory if specified
    if let Some(dir) = &args.output_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!(
            "error: could not create output directory '{}': {}",
            dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let output_path = match build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
        ) {
            Some(p) => p,
            None => {
                eprintln!(
                    "  error: cannot determine output path for '{}'.",
                    input_path.display()
                );
                any_failure = true;
                continue;
            }
        };

        match run_one(input_path, &output_path, &plan) {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ============================================================================
// Edit plan — validated arguments shared across all inputs
// ============================================================================

enum RotateDir {
    Left,
    Right,
}

enum FlipAxis {
    Horizontal,
    Vertical,
}

struct TextStamp {
    text: String,
    at: (f32, f32),
    size: f32,
    color: Rgba<u8>,
    bold: bool,
    italic: bool,
}

struct EditPlan {
    brightness: Option<i32>,
    contrast: Option<i32>,
    saturation: Option<i32>,
    crop: Option<(f32, f32, f32, f32)>,
    rotates: Vec<RotateDir>,
    flips: Vec<FlipAxis>,
    text: Option<TextStamp>,
}

impl EditPlan {
    fn from_args(args: &CliArgs) -> Result<Self, String> {
        let crop = match &args.crop {
            Some(spec) => {
                let parts = parse_numbers(spec, 4)
                    .ok_or_else(|| format!("invalid --crop '{spec}', expected x,y,w,h"))?;
                if parts[2] < 5.0 || parts[3] < 5.0 {
                    return Err(format!("crop region must be at least 5x5, got '{spec}'"));
                }
                Some((parts[0], parts[1], parts[2], parts[3]))
            }
            None => None,
        };

        let mut rotates = Vec::new();
        for dir in &args.rotate {
            rotates.push(match dir.to_lowercase().as_str() {
                "left" | "ccw" => RotateDir::Left,
                "right" | "cw" => RotateDir::Right,
                other => return Err(format!("invalid --rotate '{other}', expected left|right")),
            });
        }

        let mut flips = Vec::new();
        for axis in &args.flip {
            flips.push(match axis.to_lowercase().as_str() {
                "h" | "horizontal" => FlipAxis::Horizontal,
                "v" | "vertical" => FlipAxis::Vertical,
                other => return Err(format!("invalid --flip '{other}', expected h|v")),
            });
        }

        let text = match &args.text {
            Some(text) => {
                if text.trim().is_empty() {
                    return Err("--text must not be empty".to_string());
                }
                let at = match &args.text_at {
                    Some(spec) => {
                        let parts = parse_numbers(spec, 2)
                            .ok_or_else(|| format!("invalid --text-at '{spec}', expected x,y"))?;
                        (parts[0], parts[1])
                    }
                    None => (16.0, 16.0),
                };
                Some(TextStamp {
                    text: text.clone(),
                    at,
                    size: args.text_size,
                    color: parse_hex_color(&args.text_color)
                        .ok_or_else(|| format!("invalid --text-color '{}'", args.text_color))?,
                    bold: args.bold,
                    italic: args.italic,
                })
            }
            None => None,
        };

        for (name, value) in [
            ("brightness", args.brightness),
            ("contrast", args.contrast),
            ("saturation", args.saturation),
        ] {
            if let Some(v) = value
                && !(0..=200).contains(&v)
            {
                return Err(format!("--{name} must be in 0..=200, got {v}"));
            }
        }

        Ok(Self {
            brightness: args.brightness,
            contrast: args.contrast,
            saturation: args.saturation,
            crop,
            rotates,
            flips,
            text,
        })
    }
}

// ============================================================================
// Per-file processing pipeline
// ============================================================================

fn run_one(input: &Path, output: &Path, plan: &EditPlan) -> Result<(), String> {
    // -- Step 1: Load ----------------------------------------------------
    let record = StickerRecord::image(
        input.to_string_lossy().into_owned(),
        ImageSource::Path(input.to_path_buf()),
    );
    let mut session = EditingSession::open(&record);
    if !session.is_ready() {
        return Err(format!("load failed: '{}'", input.display()));
    }

    // -- Step 2: Adjustments (first, then baked so later ops see them) ----
    if let Some(v) = plan.brightness {
        session.set_adjustment(AdjustmentKind::Brightness, v);
    }
    if let Some(v) = plan.contrast {
        session.set_adjustment(AdjustmentKind::Contrast, v);
    }
    if let Some(v) = plan.saturation {
        session.set_adjustment(AdjustmentKind::Saturation, v);
    }
    session.commit_adjustments();

    // -- Step 3: Geometry ------------------------------------------------
    if let Some((x, y, w, h)) = plan.crop {
        let before = session.history_len();
        session.set_tool(Tool::Crop);
        session.pointer_event(PointerInput::down(x, y));
        session.pointer_event(PointerInput::moved(x + w, y + h));
        session.pointer_event(PointerInput::up(x + w, y + h));
        if session.history_len() == before {
            return Err(format!(
                "crop {},{},{},{} does not fit inside the image",
                x, y, w, h
            ));
        }
    }

    for dir in &plan.rotates {
        match dir {
            RotateDir::Left => session.rotate_left(),
            RotateDir::Right => session.rotate_right(),
        }
    }
    for axis in &plan.flips {
        match axis {
            FlipAxis::Horizontal => session.flip_horizontal(),
            FlipAxis::Vertical => session.flip_vertical(),
        }
    }

    // -- Step 4: Text ------------------------------------------------------
    if let Some(stamp) = &plan.text {
        let before = session.history_len();
        {
            let text = &mut session.options_mut().text;
            text.text = stamp.text.clone();
            text.size = stamp.size;
            text.color = stamp.color;
            text.bold = stamp.bold;
            text.italic = stamp.italic;
        }
        session.set_tool(Tool::Text);
        session.pointer_event(PointerInput::down(stamp.at.0, stamp.at.1));
        if session.history_len() == before {
            return Err("text stamping failed (no usable system font?)".to_string());
        }
    }

    // -- Step 5: Save ------------------------------------------------------
    let png = session.save().map_err(|e| format!("save failed: {e}"))?;
    std::fs::write(output, png)
        .map_err(|e| format!("could not write '{}': {e}", output.display()))?;

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            // Literal path — use directly
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-file input)
/// 2. `--output-dir` (batch directory, derives filename from input stem)
/// 3. Fallback: same directory as input, same stem, `.png` extension
///    (appends `_out` to the stem if it would collide with the input path)
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    let stem = input.file_stem()?.to_string_lossy().into_owned();

    if let Some(dir) = output_dir {
        return Some(dir.join(format!("{}.png", stem)));
    }

    let parent = input.parent().unwrap_or(Path::new("."));
    let candidate = parent.join(format!("{}.png", stem));

    // Avoid silent overwrite of the input
    if candidate == input {
        Some(parent.join(format!("{}_out.png", stem)))
    } else {
        Some(candidate)
    }
}

/// Parse exactly `count` comma-separated numbers ("10,20" or "1, 2, 3, 4").
fn parse_numbers(spec: &str, count: usize) -> Option<Vec<f32>> {
    let parts: Vec<f32> = spec
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    (parts.len() == count && parts.iter().all(|v| v.is_finite() && *v >= 0.0)).then_some(parts)
}

/// Parse "#rrggbb" (leading '#' optional) into an opaque color.
fn parse_hex_color(spec: &str) -> Option<Rgba<u8>> {
    let hex = spec.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba([r, g, b, 255]))
}
