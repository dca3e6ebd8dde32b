use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "brandcard", version)]
struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card from an options JSON file.
    Render(RenderArgs),
    /// Render many cards in parallel.
    Batch(BatchArgs),
    /// Print the computed label lines and logo slots as JSON without rendering.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Card options JSON.
    options: PathBuf,

    /// Output path, overriding `save_path`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory relative asset paths resolve against (defaults to the options file's directory).
    #[arg(long)]
    root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Card options JSON files.
    #[arg(required = true)]
    options: Vec<PathBuf>,

    /// Worker thread count (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Card options JSON.
    options: PathBuf,
}

#[derive(serde::Serialize)]
struct LayoutReport {
    canvas: brandcard::CanvasSize,
    text: brandcard::TextLayout,
    logos: Vec<brandcard::LogoSlot>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn assets_root(options_path: &Path) -> &Path {
    options_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn load_options(path: &Path, root: Option<&Path>) -> anyhow::Result<brandcard::RenderOptions> {
    let opts = brandcard::CardOptions::from_path(path)?;
    let root = root.unwrap_or_else(|| assets_root(path));
    let resolved = opts
        .resolve(root)
        .with_context(|| format!("resolve options '{}'", path.display()))?;
    Ok(resolved)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut opts = load_options(&args.options, args.root.as_deref())?;
    if let Some(out) = args.out {
        opts.output = out;
    }

    let written = brandcard::render_card_to_file(&opts)
        .with_context(|| format!("render '{}'", args.options.display()))?;
    eprintln!("wrote {}", written.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let jobs = args
        .options
        .iter()
        .map(|p| load_options(p, None))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let threading = brandcard::BatchThreading {
        threads: args.threads,
    };
    let results = brandcard::render_batch(&jobs, &threading)?;

    let mut failed = 0usize;
    for (path, result) in args.options.iter().zip(results) {
        match result {
            Ok(written) => eprintln!("wrote {}", written.display()),
            Err(e) => {
                failed += 1;
                eprintln!("error: {}: {e:#}", path.display());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} cards failed", args.options.len());
    }
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let opts = load_options(&args.options, None)?;
    let report = LayoutReport {
        canvas: opts.canvas,
        text: brandcard::layout_label(&opts.label, opts.canvas, opts.font_size),
        logos: brandcard::layout_logos(opts.logos.len(), opts.canvas),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize layout report")?
    );
    Ok(())
}
