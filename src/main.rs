use clap::{ArgAction, Parser, Subcommand};
use retouch::config::{self, EditorConfig};
use retouch::filters::{EDIT_OPTIONS, FILTER_OPTIONS};
use retouch::naming::{is_valid_image_mime, mime_for_path};
use retouch::output;
use retouch::session::{EditOperation, EditSession, bind_shortcuts};
use retouch::shortcuts::{KeyChord, KeyEvent, KeyboardShortcuts};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retouch")]
#[command(about = "Raster image editor: adjustments, geometry, filters and export")]
#[command(long_about = "\
Raster image editor: adjustments, geometry, filters and export

Edits are applied in order. Each one is recorded in the undo history, and
key chords passed with --keys are replayed afterwards through the shortcut
table (undo, redo, reset, enhance by default).

Operations:
  brightness=PCT     100 = unchanged
  contrast=V         -255..255, 0 = unchanged
  saturation=PCT     100 = unchanged, 0 = greyscale
  sharpen
  enhance
  resize=SCALE       uniform scale factor, e.g. 0.5
  rotate=DEG         clockwise, corners are clipped
  crop=X,Y,W,H
  filter=ID          see 'retouch filters'

Example:
  retouch edit photo.jpg --op brightness=120 --op filter=vintage --keys ctrl+z

Run 'retouch gen-config' to generate a documented retouch.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./retouch.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Flags for the edit command.
#[derive(clap::Args)]
struct EditArgs {
    /// Image to edit (PNG, JPEG or WebP)
    input: PathBuf,

    /// Edit operation, repeatable, applied in order
    #[arg(long = "op", value_name = "OP")]
    ops: Vec<EditOperation>,

    /// Key chord to replay after the operations, repeatable
    #[arg(long = "keys", value_name = "CHORD")]
    keys: Vec<KeyChord>,

    /// Directory the export is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Export file name prefix (overrides config)
    #[arg(long)]
    prefix: Option<String>,

    /// Compression level 0.1-1.0 (overrides config)
    #[arg(long)]
    level: Option<f32>,

    /// Export lossless PNG instead of JPEG
    #[arg(long)]
    no_compress: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Apply edits to an image and export it
    Edit(EditArgs),
    /// List filter presets
    Filters {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List edit operations
    Operations,
    /// Print a stock retouch.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Edit(args) => {
            let mut editor_config = load_editor_config(cli.config.as_deref())?;
            apply_overrides(&mut editor_config, &args)?;
            run_edit(&args, &editor_config)?;
        }
        Command::Filters { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(FILTER_OPTIONS)?);
            } else {
                output::print_filter_catalog(FILTER_OPTIONS);
            }
        }
        Command::Operations => output::print_edit_options(EDIT_OPTIONS),
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_editor_config(path: Option<&Path>) -> Result<EditorConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn apply_overrides(
    editor_config: &mut EditorConfig,
    args: &EditArgs,
) -> Result<(), config::ConfigError> {
    if let Some(prefix) = &args.prefix {
        editor_config.export.file_prefix = prefix.clone();
    }
    if let Some(level) = args.level {
        editor_config.compression.level = level;
    }
    if args.no_compress {
        editor_config.compression.auto_compress = false;
    }
    editor_config.validate()
}

fn run_edit(args: &EditArgs, editor_config: &EditorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mime = mime_for_path(&args.input).unwrap_or("application/octet-stream");
    if !is_valid_image_mime(mime) {
        return Err(format!("{} is not an image ({mime})", args.input.display()).into());
    }
    let image = image::open(&args.input)?.to_rgba8();
    info!(input = %args.input.display(), mime, "loaded image");

    let session = Rc::new(RefCell::new(EditSession::new(image, editor_config)?));
    for op in &args.ops {
        session.borrow_mut().apply(op)?;
    }

    if !args.keys.is_empty() {
        let mut shortcuts = KeyboardShortcuts::new();
        bind_shortcuts(&session, &editor_config.shortcuts.bindings()?, &mut shortcuts);
        for chord in &args.keys {
            let mut event = KeyEvent::from_chord(chord);
            if !shortcuts.handle_key_event(&mut event) {
                warn!(%chord, "no shortcut bound");
            }
        }
    }

    let session = session.borrow();
    let encoded = session.export()?;
    std::fs::create_dir_all(&args.out_dir)?;
    let path = args.out_dir.join(session.export_file_name(&encoded));
    std::fs::write(&path, &encoded.bytes)?;
    output::print_session_summary(&session, &encoded, Some(&path));
    Ok(())
}
