//! Command-line interface for chatlog-viewer.
//!
//! Provides scriptable access to exported chat threads with
//! four core commands:
//! - `show`: Render the merged timeline
//! - `search`: Filter and highlight messages
//! - `participants`: List everyone who took part
//! - `interactive`: Line-oriented search loop with debounced evaluation

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::render::{JsonRenderer, Renderer, TextRenderer};
use crate::search::SearchMode;
use crate::session::{ImportPolicy, SessionOptions};
use crate::view::{ConversationView, ViewOptions};

/// Browse and search exported chat threads.
#[derive(Debug, Parser)]
#[command(name = "chatview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "CHATVIEW_OUTPUT")]
    pub output: OutputFormat,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true, env = "CHATVIEW_JSON")]
    pub json: bool,

    /// Sender name to treat as yourself.
    #[arg(short = 'u', long, global = true, env = "CHATVIEW_CURRENT_USER")]
    pub current_user: Option<String>,

    /// Stop at the first file that fails to load.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Disable colored output.
    #[arg(long, global = true, env = "CHATVIEW_NO_COLOR")]
    pub no_color: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "CHATVIEW_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "CHATVIEW_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "CHATVIEW_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Search mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchModeArg {
    /// Content and sender name.
    Text,
    /// Dates only.
    Date,
    /// Text and dates.
    Both,
}

impl From<SearchModeArg> for SearchMode {
    fn from(arg: SearchModeArg) -> Self {
        match arg {
            SearchModeArg::Text => Self::Text,
            SearchModeArg::Date => Self::Date,
            SearchModeArg::Both => Self::Both,
        }
    }
}

impl Cli {
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the merged timeline of one or more thread files.
    #[command(alias = "cat")]
    Show(ShowArgs),

    /// Search messages by text and/or date.
    #[command(alias = "s", alias = "find")]
    Search(SearchArgs),

    /// List participants across the loaded threads.
    #[command(alias = "who")]
    Participants(ParticipantsArgs),

    /// Search interactively, one query per line on stdin.
    #[command(alias = "i")]
    Interactive(InteractiveArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the show command.
#[derive(Debug, Clone, clap::Args)]
pub struct ShowArgs {
    /// Thread files or directories to load.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the search command.
#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Search query (case-insensitive).
    pub query: String,

    /// Thread files or directories to load.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Which fields to match (default from config).
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<SearchModeArg>,

    /// Move the current match this many steps (negative goes backwards).
    #[arg(long = "match", allow_negative_numbers = true, default_value = "0")]
    pub step: i64,
}

/// Arguments for the participants command.
#[derive(Debug, Clone, clap::Args)]
pub struct ParticipantsArgs {
    /// Thread files or directories to load.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the interactive command.
#[derive(Debug, Clone, clap::Args)]
pub struct InteractiveArgs {
    /// Thread files or directories to load.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Which fields to match (default from config).
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<SearchModeArg>,

    /// Quiet period before a query runs, in milliseconds.
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "chatview", &mut io::stdout());
}

/// Effective settings: the config file with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Merged configuration.
    pub config: Config,
    /// Output format.
    pub output: OutputFormat,
    /// Whether to style text output.
    pub color: bool,
}

impl AppContext {
    /// Build the context for `cli` on top of `config`.
    #[must_use]
    pub fn new(cli: &Cli, mut config: Config) -> Self {
        if let Some(user) = &cli.current_user {
            config.viewer.current_user = Some(user.clone());
        }
        if cli.strict {
            config.import.policy = ImportPolicy::Abort;
        }
        if cli.no_color {
            config.display.color = false;
        }
        let color = config.display.color && console::colors_enabled();

        Self {
            config,
            output: cli.effective_output(),
            color,
        }
    }

    /// Session options for imports.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        self.config.session_options()
    }

    /// View options for rendering.
    #[must_use]
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            current_user: self.config.viewer.current_user.clone(),
        }
    }

    /// Resolve a mode argument against the configured default.
    #[must_use]
    pub fn mode(&self, arg: Option<SearchModeArg>) -> SearchMode {
        arg.map_or(self.config.viewer.default_mode, SearchMode::from)
    }

    /// Write `view` in the selected output format.
    pub fn render<W: Write>(&self, view: &ConversationView, writer: &mut W) -> Result<()> {
        match self.output {
            OutputFormat::Json => JsonRenderer::new(true).render(view, writer),
            OutputFormat::Text => TextRenderer::new()
                .with_color(self.color)
                .with_thread_titles(self.config.display.show_thread_titles)
                .render(view, writer),
        }
    }
}

/// Initialize the tracing subscriber.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Load the config file named on the command line, or the default one.
///
/// An explicit path must load; a broken default file only produces a warning.
fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Ignoring config file: {e}");
            Config::default()
        })),
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    if let Commands::Completions(args) = &cli.command {
        generate_completions(args.shell);
        return Ok(());
    }

    let ctx = AppContext::new(&cli, load_config(&cli)?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| crate::error::ViewerError::io("starting async runtime", e))?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Show(args) => commands::show::run(&ctx, args).await,
            Commands::Search(args) => commands::search::run(&ctx, args).await,
            Commands::Participants(args) => commands::participants::run(&ctx, args).await,
            Commands::Interactive(args) => commands::interactive::run(&ctx, args).await,
            Commands::Completions(_) => Ok(()),
        }
    })
}
