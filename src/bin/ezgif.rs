//! CLI binary for ezgif-convert.
//!
//! A thin shim over the library crate that maps CLI flags to requests and
//! prints the result URL.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ezgif_convert::{
    convert, download_result, lookup, overlay, render, ClientConfig, ConversionRequest, EzgifError,
    Frame, ImageFile, Operation, OverlayRequest, RenderKind, RenderRequest,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # List every supported operation
  ezgif list

  # Convert a remote animated WebP to MP4
  ezgif convert webp-mp4 --url https://example.com/anim.webp

  # Resize a local GIF and save the result
  ezgif convert resize --file cat.gif -p width=320 -o cat-small.gif

  # Put a logo in the corner of an image
  ezgif overlay --file photo.png --overlay logo.png --x 10 --y 10

  # Build a GIF from frames; the second frame shows for 1 second
  ezgif render a.png b.png:100 c.png --delay 20 -o out.gif

ENVIRONMENT VARIABLES:
  EZGIF_BASE_URL   Site root (default https://ezgif.com)
  EZGIF_TIMEOUT    Per-request timeout in seconds
  RUST_LOG         Overrides the log filter set by -v / -q
"#;

/// Convert images and videos with ezgif.com from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "ezgif",
    version,
    about = "Convert images and videos with ezgif.com",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Site root every operation path is joined onto.
    #[arg(long, global = true, env = "EZGIF_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "EZGIF_TIMEOUT")]
    timeout: Option<u64>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "EZGIF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, global = true, env = "EZGIF_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the supported operations.
    List {
        /// Print the full operation table as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run one conversion.
    Convert {
        /// Operation id, e.g. webp-mp4 (see `ezgif list`).
        operation: String,

        #[command(flatten)]
        source: Source,

        /// Operation parameter as key=value; repeatable.
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        #[command(flatten)]
        output: Output,
    },
    /// Place an overlay image on top of a base image.
    Overlay {
        #[command(flatten)]
        source: Source,

        /// Overlay image file.
        #[arg(long)]
        overlay: PathBuf,

        /// Horizontal offset in pixels.
        #[arg(long, allow_negative_numbers = true)]
        x: Option<i64>,

        /// Vertical offset in pixels.
        #[arg(long, allow_negative_numbers = true)]
        y: Option<i64>,

        #[command(flatten)]
        output: Output,
    },
    /// Assemble an animation from frame files.
    Render {
        /// Frame files in order, each optionally suffixed with `:DELAY`.
        #[arg(required = true, value_parser = parse_frame)]
        frames: Vec<(PathBuf, Option<u32>)>,

        /// Output format: gif, webp or apng.
        #[arg(long, default_value = "gif")]
        kind: String,

        /// Default frame delay in hundredths of a second.
        #[arg(long, default_value_t = 20)]
        delay: u32,

        /// Loop count (0 loops forever).
        #[arg(long = "loop", default_value_t = 0)]
        loop_count: u32,

        #[command(flatten)]
        output: Output,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Source {
    /// Local file to upload.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Remote file for the site to fetch.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args, Debug)]
struct Output {
    /// Download the result to this file instead of only printing its URL.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Exit code for a request the site was never asked to process.
const EXIT_INVALID_REQUEST: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", red("error:"), err);
        let code = exit_code(&err);
        if code == EXIT_INVALID_REQUEST {
            eprintln!(
                "{}",
                dim("hint: the request was rejected before upload; check the operation, source and -p params (see `ezgif list`)")
            );
        }
        std::process::exit(code);
    }
}

/// 2 when any cause is a validation error, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> i32 {
    let invalid = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<EzgifError>())
        .any(EzgifError::is_validation);
    if invalid {
        EXIT_INVALID_REQUEST
    } else {
        1
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let show_progress = !cli.quiet && !cli.verbose;

    match cli.command {
        Command::List { json } => {
            if json {
                let specs: Vec<_> = Operation::ALL.iter().map(|op| op.spec()).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&specs).context("Failed to serialise operations")?
                );
            } else {
                for op in Operation::ALL {
                    let spec = op.spec();
                    let mut line = format!("{:<12} {}", spec.id, dim(spec.path));
                    if !spec.required.is_empty() {
                        line.push_str(&format!("  required: {}", spec.required.join(", ")));
                    }
                    if !spec.either.is_empty() {
                        line.push_str(&format!("  one of: {}", spec.either.join(", ")));
                    }
                    println!("{line}");
                }
            }
        }
        Command::Convert {
            operation,
            source,
            params,
            output,
        } => {
            let operation = lookup(&operation)?.operation;
            let mut request = ConversionRequest::new(operation);
            (request.file, request.filename, request.url) = read_source(&source).await?;
            request.params.extend(params);

            let url = with_spinner(show_progress, operation.id(), convert(request, &config))
                .await
                .context("Conversion failed")?;
            finish(&url, &output, &config, cli.quiet).await?;
        }
        Command::Overlay {
            source,
            overlay: overlay_path,
            x,
            y,
            output,
        } => {
            let (file, filename, url) = read_source(&source).await?;
            let request = OverlayRequest {
                file,
                filename,
                url,
                overlay: read_image(&overlay_path).await?,
                x,
                y,
            };
            let url = with_spinner(show_progress, "overlay", overlay(request, &config))
                .await
                .context("Overlay failed")?;
            finish(&url, &output, &config, cli.quiet).await?;
        }
        Command::Render {
            frames,
            kind,
            delay,
            loop_count,
            output,
        } => {
            let kind: RenderKind = kind.parse()?;
            let mut loaded = Vec::with_capacity(frames.len());
            for (path, frame_delay) in &frames {
                let image = read_image(path).await?;
                let mut frame = Frame::new(image.data, image.filename);
                frame.delay = *frame_delay;
                loaded.push(frame);
            }
            let request = RenderRequest::new(kind, loaded)
                .delay(delay)
                .loop_count(loop_count);
            let url = with_spinner(show_progress, "render", render(request, &config))
                .await
                .context("Render failed")?;
            finish(&url, &output, &config, cli.quiet).await?;
        }
    }

    Ok(())
}

/// Map global flags to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder();
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    builder.build().context("Invalid configuration")
}

type SourceParts = (Option<Vec<u8>>, Option<String>, Option<String>);

async fn read_source(source: &Source) -> Result<SourceParts> {
    match (&source.file, &source.url) {
        (Some(path), _) => {
            let image = read_image(path).await?;
            Ok((Some(image.data), Some(image.filename), None))
        }
        (None, url) => Ok((None, None, url.clone())),
    }
}

async fn read_image(path: &Path) -> Result<ImageFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(ImageFile::new(data, filename))
}

/// Run `work` behind a spinner on stderr.
async fn with_spinner<T>(show: bool, label: &str, work: impl Future<Output = T>) -> T {
    if !show {
        return work.await;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix(label.to_string());
    bar.set_message("waiting for ezgif…");
    bar.enable_steady_tick(Duration::from_millis(80));
    let out = work.await;
    bar.finish_and_clear();
    out
}

/// Print the result URL and optionally download it.
async fn finish(url: &str, output: &Output, config: &ClientConfig, quiet: bool) -> Result<()> {
    println!("{url}");
    if let Some(ref path) = output.output {
        let bytes = download_result(url, path, config)
            .await
            .context("Download failed")?;
        if !quiet {
            eprintln!(
                "{} {} bytes  →  {}",
                green("✔"),
                bytes,
                bold(&path.display().to_string())
            );
        }
    }
    Ok(())
}

/// Parse `key=value`.
fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}

/// Parse `path` or `path:delay`.
fn parse_frame(s: &str) -> Result<(PathBuf, Option<u32>), String> {
    if let Some((path, delay)) = s.rsplit_once(':') {
        if let Ok(delay) = delay.parse::<u32>() {
            if path.is_empty() {
                return Err(format!("missing frame path in {s:?}"));
            }
            return Ok((PathBuf::from(path), Some(delay)));
        }
    }
    Ok((PathBuf::from(s), None))
}
