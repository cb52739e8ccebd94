use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use photomark::{
    FONTS, FontBook, PlacementUpdate, Position, SettingsAction, TextField, WatermarkKind,
    WatermarkSettings,
};

#[derive(Parser, Debug)]
#[command(name = "photomark", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watermark an image and write the result in the same format.
    Apply(ApplyArgs),
    /// Print the default settings JSON.
    Defaults,
    /// List font families available for text watermarks.
    Fonts(FontArgs),
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Extra font file to register (repeatable).
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Register every font file in this directory.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Skip scanning the platform font directories.
    #[arg(long)]
    no_system_fonts: bool,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Image to watermark.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Settings JSON; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path. Defaults to `watermarked-<name>` next to the input.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override the text content (switches to a text watermark).
    #[arg(long)]
    text: Option<String>,

    /// Override the placement, e.g. `center`, `bottom-right`, `tile`.
    #[arg(long)]
    position: Option<String>,

    #[command(flatten)]
    fonts: FontArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Defaults => cmd_defaults(),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_fonts(args: &FontArgs) -> anyhow::Result<FontBook> {
    let mut book = if args.no_system_fonts {
        FontBook::new()
    } else {
        FontBook::system()
    };
    for path in &args.fonts {
        book.register_file(path)
            .with_context(|| format!("register font '{}'", path.display()))?;
    }
    if let Some(dir) = &args.font_dir {
        book.register_dir(dir)
            .with_context(|| format!("register fonts in '{}'", dir.display()))?;
    }
    Ok(book)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let (mut settings, assets_root) = match &args.config {
        Some(path) => {
            let settings = WatermarkSettings::from_json_path(path)
                .with_context(|| format!("load settings '{}'", path.display()))?;
            let root = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            (settings, root)
        }
        None => (WatermarkSettings::default(), PathBuf::from(".")),
    };

    if let Some(text) = args.text {
        settings = settings
            .reduce(SettingsAction::SetKind(WatermarkKind::Text))
            .reduce(SettingsAction::SetText(TextField::Content(text)));
    }
    if let Some(name) = &args.position {
        let position = Position::from_name(name);
        if position == Position::Unknown {
            tracing::warn!(position = %name, "unknown position, watermark anchors at the origin");
        }
        settings = settings.reduce(SettingsAction::SetPosition(PlacementUpdate::Mode(position)));
    }

    let mut fonts = if settings.kind == WatermarkKind::Text {
        load_fonts(&args.fonts)?
    } else {
        FontBook::new()
    };

    let base_bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let rendered = photomark::render_watermarked(&base_bytes, &settings, &assets_root, &mut fonts)
        .with_context(|| format!("watermark '{}'", args.in_path.display()))?;

    let out = match args.out {
        Some(out) => out,
        None => {
            let name = photomark::download_name(&args.in_path.to_string_lossy());
            args.in_path.with_file_name(name)
        }
    };
    rendered
        .save(&out)
        .with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    println!("{}", WatermarkSettings::default().to_json_pretty()?);
    Ok(())
}

fn cmd_fonts(args: FontArgs) -> anyhow::Result<()> {
    let book = load_fonts(&args)?;
    if book.is_empty() {
        eprintln!("no fonts found; pass --font or --font-dir");
    }
    for family in book.families() {
        let marker = if FONTS.iter().any(|f| f.eq_ignore_ascii_case(family)) {
            "*"
        } else {
            " "
        };
        println!("{marker} {family}");
    }
    Ok(())
}
