//! CLI binary for content-pdf.
//!
//! A thin shim over the library: `serve` runs the HTTP API, `convert` runs
//! the whole pipeline once and writes a PDF, `models` prints the catalog.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use content_pdf::server::{self, AppState};
use content_pdf::{
    convert_to_file, list_models, Action, ChromiumRenderer, ContentInput, ConvertRequest,
    EnhancerConfig, ModelDispatcher, ModelId, PipelineProgressCallback, ProcessingOptions,
    RenderOptions, Stage,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// One spinner that follows the pipeline stage by stage and leaves a log
/// line behind for each finished stage.
struct SpinnerProgress {
    bar: ProgressBar,
    stage_start: std::sync::Mutex<Instant>,
}

impl SpinnerProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self {
            bar,
            stage_start: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn stage_elapsed(&self) -> String {
        let secs = self
            .stage_start
            .lock()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        dim(&format!("{secs:.1}s"))
    }
}

impl PipelineProgressCallback for SpinnerProgress {
    fn on_stage_start(&self, stage: Stage) {
        if let Ok(mut t) = self.stage_start.lock() {
            *t = Instant::now();
        }
        self.bar.set_prefix(stage.label());
        self.bar.set_message("…");
    }

    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        self.bar.println(format!(
            "  {} {:<8} {}  {}",
            green("✓"),
            stage.to_string(),
            detail,
            self.stage_elapsed()
        ));
        if stage == Stage::Write {
            self.bar.finish_and_clear();
        }
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        let msg = if error.chars().count() > 100 {
            format!("{}…", error.chars().take(99).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} {:<8} {}  {}",
            red("✗"),
            stage.to_string(),
            red(&msg),
            self.stage_elapsed()
        ));
        self.bar.finish_and_clear();
    }
}

/// Silent variant used with `--quiet` or `--json`.
struct QuietProgress;

impl PipelineProgressCallback for QuietProgress {}

// ── Arguments ────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise an article into a PDF in the current directory
  content-pdf convert --url https://blog.rust-lang.org/2024/ --model claude

  # Fact-check pasted text with citations, keep the original as an appendix
  content-pdf convert --text-file notes.txt --action validate --citations --include-original -o report.pdf

  # Run the HTTP API for the web front-end
  content-pdf serve --port 3000

  # Which models can be used with the current keys?
  content-pdf models

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY      Google Generative Language key (Gemini models)
  OPENAI_API_KEY      OpenAI key (model "openai")
  ANTHROPIC_API_KEY   Anthropic key (model "claude")
  CHROME_BIN          Chrome/Chromium executable used for PDF rendering
  RUST_LOG            Log filter, e.g. content_pdf=debug

  A .env file in the working directory is read on start-up.
"#;

/// Extract articles, enhance them with hosted LLMs, and render PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "content-pdf",
    version,
    about = "Extract articles, enhance them with hosted LLMs, and render PDFs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CONTENT_PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CONTENT_PDF_QUIET")]
    quiet: bool,

    /// Chrome/Chromium executable for rendering.
    #[arg(long, global = true, env = "CHROME_BIN")]
    chrome: Option<PathBuf>,

    /// Page download timeout in seconds.
    #[arg(long, global = true, env = "CONTENT_PDF_FETCH_TIMEOUT", default_value_t = 30)]
    fetch_timeout: u64,

    /// Model API call timeout in seconds.
    #[arg(long, global = true, env = "CONTENT_PDF_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Run the whole pipeline once and write a PDF.
    Convert(ConvertArgs),
    /// List models and whether their provider is configured.
    Models {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "CONTENT_PDF_HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, env = "CONTENT_PDF_PORT", default_value_t = 3000)]
    port: u16,
}

#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["url", "text", "text_file"])))]
struct ConvertArgs {
    /// Article URL to fetch.
    #[arg(long)]
    url: Option<String>,

    /// Text to enhance, used as-is.
    #[arg(long)]
    text: Option<String>,

    /// Read the text to enhance from a file.
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Model id: gemini-2.0-flash-exp, gemini-1.5-flash-latest, gemini-1.5-flash, openai, claude.
    #[arg(short, long, env = "CONTENT_PDF_MODEL", default_value = "gemini-2.0-flash-exp",
          value_parser = parse_model)]
    model: ModelId,

    /// What the model should do with the content.
    #[arg(short, long, value_enum, default_value = "summarize")]
    action: ActionArg,

    /// Append the original content to the PDF.
    #[arg(long)]
    include_original: bool,

    /// Generate citations (validate action only).
    #[arg(long)]
    citations: bool,

    /// Leave out the table of contents.
    #[arg(long)]
    no_toc: bool,

    /// Leave out the citations section.
    #[arg(long)]
    no_citations: bool,

    /// Output file or directory. Default: `<title>-enhanced.pdf` here.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the enhanced content as JSON on stdout after writing the PDF.
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ActionArg {
    Summarize,
    Expand,
    Validate,
}

impl From<ActionArg> for Action {
    fn from(v: ActionArg) -> Self {
        match v {
            ActionArg::Summarize => Action::Summarize,
            ActionArg::Expand => Action::Expand,
            ActionArg::Validate => Action::Validate,
        }
    }
}

fn parse_model(s: &str) -> Result<ModelId, String> {
    s.parse::<ModelId>().map_err(|e| e.to_string())
}

// ── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // The spinner gives all the feedback `convert` needs; keep INFO logs for `serve`.
    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet || matches!(cli.command, Command::Convert(_) | Command::Models { .. }) {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    match cli.command {
        Command::Serve(ref args) => run_serve(args, config).await,
        Command::Convert(ref args) => run_convert(args, &config, cli.quiet).await,
        Command::Models { json } => run_models(&config, json),
    }
}

fn build_config(cli: &Cli) -> Result<EnhancerConfig> {
    let mut builder = EnhancerConfig::from_env()
        .into_builder()
        .fetch_timeout_secs(cli.fetch_timeout)
        .api_timeout_secs(cli.api_timeout);
    if let Some(ref chrome) = cli.chrome {
        builder = builder.chrome_executable(chrome);
    }
    builder.build().context("Invalid configuration")
}

async fn run_serve(args: &ServeArgs, config: EnhancerConfig) -> Result<()> {
    let addr = format!("{}:{}", args.host, args.port);
    let state = AppState::new(config).context("Failed to initialise server state")?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    server::serve(listener, state).await.context("Server error")
}

async fn run_convert(args: &ConvertArgs, config: &EnhancerConfig, quiet: bool) -> Result<()> {
    let input = if let Some(ref path) = args.text_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ContentInput::text(text)
    } else if let Some(ref text) = args.text {
        ContentInput::text(text.clone())
    } else {
        ContentInput::url(args.url.clone().unwrap_or_default())
    };

    let mut options = ProcessingOptions::new(args.model, args.action.into());
    options.include_original = args.include_original;
    options.generate_citations = args.citations;

    let request = ConvertRequest {
        input,
        options,
        render_options: RenderOptions {
            include_table_of_contents: !args.no_toc,
            include_citations: !args.no_citations,
            include_original: args.include_original,
        },
        output: args.output.clone(),
    };

    let dispatcher = ModelDispatcher::new(config).context("Failed to initialise providers")?;
    if !dispatcher.is_available(args.model) {
        eprintln!(
            "{} {} is not configured; set {}",
            red("✘"),
            args.model.provider(),
            args.model.provider().env_var()
        );
    }
    let renderer = ChromiumRenderer::from_config(config);

    let show_progress = !quiet && !args.json;
    let spinner;
    let progress: &dyn PipelineProgressCallback = if show_progress {
        eprintln!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{} with {}", request.options.action, request.options.model))
        );
        spinner = SpinnerProgress::new();
        &spinner
    } else {
        &QuietProgress
    };

    let summary = convert_to_file(&request, config, &dispatcher, &renderer, progress)
        .await
        .context("Conversion failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary.content)
                .context("Failed to serialise enhanced content")?
        );
    }
    if !quiet {
        eprintln!(
            "{}  {}  {}  →  {}",
            green("✔"),
            dim(&format!("{} KB", summary.pdf_bytes.div_ceil(1024))),
            dim(&format!("{} min read", summary.reading_time_minutes)),
            bold(&summary.output_path.display().to_string()),
        );
    }
    Ok(())
}

fn run_models(config: &EnhancerConfig, json: bool) -> Result<()> {
    let listing = list_models(config);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&listing).context("Failed to serialise models")?
        );
        return Ok(());
    }

    for m in &listing.models {
        let status = if m.available {
            green(m.status)
        } else {
            red(m.status)
        };
        println!(
            "{} {:<26} {:<10} {:<18} {}",
            if m.is_default { cyan("*") } else { " ".into() },
            m.id.as_str(),
            m.provider,
            status,
            dim(&m.description)
        );
    }
    Ok(())
}
