//! Cognify CLI
//!
//! Terminal front end for the Cognify reel feed: onboarding, the home screen
//! quick picks, the reel feed with quizzes, and the profile screen.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use cognify_feed::{
    complete_onboarding, format_count, load_quick_picks, reset_progress, BuiltinCatalog, Config,
    ContentItem, ContentSource, FeedController, FeedError, FeedSession, FeedView,
    JsonFileCatalog, JsonFileStore, MediaKind, ProgressStore, Quiz, QuizInteraction, XpState,
    PREFERENCES_MISSING_MESSAGE,
};
use cognify_report::{json::JsonGenerator, MarkdownGenerator, ProfileReport, QuizRecord, XpSnapshot};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

/// File name of the Markdown profile report.
const MARKDOWN_REPORT_FILE: &str = "cognify-report.md";

/// File name of the JSON profile report.
const JSON_REPORT_FILE: &str = "cognify-report.json";

/// Characters of a reel description shown on quick pick cards and reports.
const SHORT_DESCRIPTION_CHARS: usize = 60;

/// Cognify - learn in short reels
///
/// Browse short educational reels, answer their quick quizzes, and level up.
#[derive(Parser, Debug)]
#[command(name = "cognify")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: cognify.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Path to the progress file (overrides stateFile from the config)
    #[arg(long, value_name = "FILE", global = true)]
    state_file: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tell Cognify what to call you
    Onboard {
        /// Your name (prompted for when omitted)
        #[arg(long)]
        name: Option<String>,
    },
    /// Show today's quick picks
    Home,
    /// Browse reels and take quizzes
    Reels,
    /// Show your name and progress report
    Profile {
        /// Write Markdown and JSON reports to the output directory
        #[arg(long)]
        write: bool,

        /// Output directory for reports (overrides outputDir from the config)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<String>,
    },
    /// Clear your name, quiz progress and XP
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(ref state_file) = args.state_file {
        config.state_file.clone_from(state_file);
    }
    if let Command::Profile {
        output_dir: Some(ref dir),
        ..
    } = args.command
    {
        config.output_dir.clone_from(dir);
    }
    config.validate()?;
    log_config(&config);

    let store = open_store(Path::new(&config.state_file))?;
    let mut terminal = Terminal::new();

    match args.command {
        Command::Onboard { name } => run_onboard(store, &mut terminal, name.as_deref()).await,
        Command::Home => run_home(&config, &store).await,
        Command::Reels => run_reels(&config, store, terminal).await,
        Command::Profile { write, .. } => run_profile(&config, &store, write).await,
        Command::Reset { yes } => run_reset(store, &mut terminal, yes).await,
    }
}

// ============================================================================
// Setup
// ============================================================================

/// Loads configuration from file or defaults.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

fn log_config(config: &Config) {
    tracing::debug!(
        state_file = %config.state_file,
        catalog = ?config.catalog,
        xp_per_correct_answer = config.xp_per_correct_answer,
        quick_picks = ?config.quick_picks,
        "Configuration loaded"
    );
}

fn open_store(path: &Path) -> anyhow::Result<JsonFileStore> {
    JsonFileStore::open(path).map_err(|e| anyhow::anyhow!("{e}"))
}

/// Picks the catalog named in the config, or the built-in one.
fn content_source(config: &Config) -> Box<dyn ContentSource> {
    match &config.catalog {
        Some(path) => Box::new(JsonFileCatalog::new(path)),
        None => Box::new(BuiltinCatalog::new(config.catalog_delay())),
    }
}

fn require_onboarded(store: &JsonFileStore) -> anyhow::Result<String> {
    match store.preferences() {
        Some(prefs) if store.onboarding_completed() => Ok(prefs.name.clone()),
        _ => anyhow::bail!(
            "You have not told Cognify your name yet.\n\nSuggestion: Run `cognify onboard` first"
        ),
    }
}

// ============================================================================
// Terminal input
// ============================================================================

/// Line-based terminal input, shared by the menus and the quiz.
struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Terminal {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `label` and reads one line; `None` at end of input.
    async fn prompt(&mut self, label: &str) -> std::io::Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        self.lines.next_line().await
    }
}

#[async_trait]
impl QuizInteraction for Terminal {
    async fn run(&mut self, quiz: &Quiz) -> cognify_feed::Result<bool> {
        println!();
        println!("Quick Quiz: {}", quiz.question_text);
        for (i, option) in quiz.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option.text);
        }

        loop {
            let line = self
                .prompt("Your answer (number, or c to close): ")
                .await?
                .ok_or_else(|| FeedError::quiz_aborted("input closed"))?;
            let line = line.trim();
            if line.eq_ignore_ascii_case("c") {
                return Err(FeedError::quiz_aborted("closed by learner"));
            }

            let chosen = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| quiz.option_at(i));
            let Some(option) = chosen else {
                println!("Please pick a number between 1 and {}.", quiz.options.len());
                continue;
            };

            let correct = quiz.is_correct(&option.id);
            if correct {
                println!("Correct! +XP");
            } else if let Some(answer) = quiz.options.iter().find(|o| quiz.is_correct(&o.id)) {
                println!("Not quite. The answer was: {}", answer.text);
            }
            return Ok(correct);
        }
    }
}

// ============================================================================
// Onboarding
// ============================================================================

async fn run_onboard(
    mut store: JsonFileStore,
    terminal: &mut Terminal,
    name: Option<&str>,
) -> anyhow::Result<()> {
    println!("Welcome to Cognify");
    println!("What should we call you?");

    let prefs = if let Some(name) = name {
        complete_onboarding(&mut store, name).map_err(|e| anyhow::anyhow!("{e}"))?
    } else {
        loop {
            let Some(line) = terminal.prompt("Enter your name: ").await? else {
                anyhow::bail!("No name entered");
            };
            match complete_onboarding(&mut store, &line) {
                Ok(prefs) => break prefs,
                Err(FeedError::NameRequired) => println!("{}", FeedError::NameRequired),
                Err(e) => return Err(anyhow::anyhow!("{e}")),
            }
        }
    };

    println!("Nice to meet you, {}! Run `cognify reels` to start learning.", prefs.name);
    Ok(())
}

// ============================================================================
// Home
// ============================================================================

async fn run_home(config: &Config, store: &JsonFileStore) -> anyhow::Result<()> {
    let name = require_onboarded(store)?;
    println!("Cognify");
    println!("Welcome back, {name}!");
    println!();
    println!("Today's quick picks:");

    match load_quick_picks(content_source(config).as_ref(), &config.quick_picks).await {
        Ok(picks) => {
            for item in &picks {
                println!(
                    "  [{}] {}",
                    item.badge().unwrap_or("Reel"),
                    item.short_description(SHORT_DESCRIPTION_CHARS)
                );
            }
        }
        Err(message) => println!("{message}"),
    }
    Ok(())
}

// ============================================================================
// Reels
// ============================================================================

async fn run_reels(config: &Config, store: JsonFileStore, terminal: Terminal) -> anyhow::Result<()> {
    require_onboarded(&store)?;

    let controller = FeedController::new(store, config);
    let mut session = FeedSession::new(content_source(config), controller, terminal);

    println!("Loading reels...");
    session.load().await?;

    loop {
        render_view(&session.controller_mut().view(Utc::now()));

        let Some(line) = session
            .interaction_mut()
            .prompt("[q]uiz  [n]ext  [r]efresh  e[x]it > ")
            .await?
        else {
            break;
        };

        let result = match line.trim() {
            "q" => session.take_quiz().await.map(|_| ()),
            "n" | "" => session.swipe(),
            "r" => session.refresh(),
            "x" => break,
            other => {
                println!("Unknown command '{other}'");
                Ok(())
            }
        };

        if let Err(e) = result {
            if e.is_fatal() {
                return Err(e.into());
            }
            tracing::debug!(error = %e, "Feed action rejected");
            println!("{}", e.status_message());
        }
    }

    let xp = session.controller().xp();
    println!("See you soon! You are level {} ({} XP).", xp.level, xp.current_xp);
    Ok(())
}

fn render_view(view: &FeedView<'_>) {
    println!();
    if let Some(notice) = view.notice {
        println!("*** {} ***", notice.message);
    }
    println!(
        "Level {}  [{}/{} XP]",
        view.xp.level, view.xp.current_xp, view.xp.xp_to_next_level
    );
    if let Some(message) = view.status.message() {
        println!("{message}");
    }

    let Some(reel) = &view.reel else {
        return;
    };
    let item = reel.item;
    tracing::trace!(key = %reel.key, "Rendering reel");

    println!("------------------------------------------------------------");
    if reel.quiz_passed {
        println!("[Quiz Passed]");
    }
    println!("{}  ({})", media_line(item), item.badge().unwrap_or("Reel"));
    println!("@{}", item.author.name);
    println!("{}", item.description);
    println!(
        "likes {}  comments {}",
        format_count(item.likes),
        format_count(item.comments)
    );
    if reel.quiz_available {
        println!("> Take Quick Quiz (q)");
    }
    println!("------------------------------------------------------------");
}

fn media_line(item: &ContentItem) -> String {
    match item.kind {
        MediaKind::Video if item.is_embed() => format!("[embedded video] {}", item.source_url),
        MediaKind::Video => format!("[video] {}", item.source_url),
        MediaKind::Image => format!("[image] {}", item.source_url),
    }
}

// ============================================================================
// Profile
// ============================================================================

async fn run_profile(config: &Config, store: &JsonFileStore, write: bool) -> anyhow::Result<()> {
    let Some(prefs) = store.preferences() else {
        println!("{PREFERENCES_MISSING_MESSAGE}");
        return Ok(());
    };
    println!("Name: {}", prefs.name);
    println!("Your registered name.");
    println!();

    // Titles are a nicety; a missing catalog only drops them.
    let catalog = content_source(config)
        .fetch_catalog()
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Report will not include reel titles");
            Vec::new()
        });

    let report = build_report(config, &prefs.name, store, &catalog)?;
    print!("{}", MarkdownGenerator::new(&report).generate());

    if write {
        write_reports(&report, Path::new(&config.output_dir))?;
    }
    Ok(())
}

fn build_report<S: ProgressStore>(
    config: &Config,
    name: &str,
    store: &S,
    catalog: &[ContentItem],
) -> anyhow::Result<ProfileReport> {
    let xp = store
        .xp_state()
        .unwrap_or_else(|| XpState::initial(config.initial_xp_to_next_level));

    let quizzes = store
        .quiz_progress()
        .iter()
        .map(|(content_id, entry)| {
            let record = QuizRecord::at_time(
                entry.answered_at,
                content_id,
                &entry.quiz_id,
                entry.correctly_answered,
            );
            match catalog.iter().find(|item| item.id == content_id) {
                Some(item) => record.with_title(item.short_description(SHORT_DESCRIPTION_CHARS)),
                None => record,
            }
        })
        .collect();

    ProfileReport::builder()
        .learner_name(name)
        .xp(XpSnapshot {
            level: xp.level,
            current_xp: xp.current_xp,
            xp_to_next_level: xp.xp_to_next_level,
        })
        .quizzes(quizzes)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build report: {e}"))
}

fn write_reports(report: &ProfileReport, output_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(output_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create output directory: {e}\n\nPath: {}",
            output_dir.display()
        )
    })?;

    let markdown_path: PathBuf = output_dir.join(MARKDOWN_REPORT_FILE);
    std::fs::write(&markdown_path, MarkdownGenerator::new(report).generate())?;

    let json_path = output_dir.join(JSON_REPORT_FILE);
    JsonGenerator::new(report).write_to_file(&json_path, true)?;

    println!();
    println!("Reports written:");
    println!("  Markdown: {}", markdown_path.display());
    println!("  JSON: {}", json_path.display());
    tracing::info!(dir = %output_dir.display(), "Profile reports written");
    Ok(())
}

// ============================================================================
// Reset
// ============================================================================

async fn run_reset(mut store: JsonFileStore, terminal: &mut Terminal, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let answer = terminal
            .prompt(
                "Are you sure you want to reset all your progress? This action cannot be undone. [y/N] ",
            )
            .await?
            .unwrap_or_default();
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Nothing was changed.");
            return Ok(());
        }
    }

    reset_progress(&mut store).map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("Progress has been reset.");
    Ok(())
}
