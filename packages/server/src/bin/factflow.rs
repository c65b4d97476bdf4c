// FactFlow command line: interactive prompt, one-shot check and web server

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input};
use fake_news_model::{ModelArtifacts, Prediction};
use factflow_core::{
    render, server::build_app, ClaimPipeline, Config, ConfigOverrides, EvidenceOutcome,
    PipelineError, Presenter, RetrieverBackend, Session, SummarizerBackend, EMPTY_INPUT_WARNING,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "factflow")]
#[command(about = "Fake news detection with supporting evidence summaries")]
#[command(version)]
struct Cli {
    /// Classifier artifact (overrides FACTFLOW_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Vectorizer artifact (overrides FACTFLOW_VECTORIZER_PATH)
    #[arg(long, global = true)]
    vectorizer: Option<PathBuf>,

    /// Evidence search backend: tavily or duckduckgo
    #[arg(long, global = true)]
    retriever: Option<RetrieverBackend>,

    /// Evidence summarizer: openai or extractive
    #[arg(long, global = true)]
    summarizer: Option<SummarizerBackend>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze claims interactively (default)
    Repl,

    /// Analyze one claim and exit
    Check {
        /// Claim text
        text: Option<String>,

        /// Read the claim from stdin
        #[arg(long, conflicts_with = "text")]
        stdin: bool,

        /// Print the analysis report as JSON
        #[arg(long)]
        json: bool,

        /// Print the analysis as Markdown
        #[arg(long, conflicts_with = "json")]
        markdown: bool,
    },

    /// Serve the web interface and JSON API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging (stderr, so stdout stays clean for --json)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,factflow_core=debug,evidence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env().context("Failed to load configuration")?;
    config.apply_overrides(ConfigOverrides {
        model_path: cli.model.clone(),
        vectorizer_path: cli.vectorizer.clone(),
        retriever: cli.retriever,
        summarizer: cli.summarizer,
    });
    config.validate().context("Invalid configuration")?;

    let pipeline = Arc::new(build_pipeline(&config)?);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => run_repl(pipeline).await,
        Commands::Check {
            text,
            stdin,
            json,
            markdown,
        } => {
            let text = match (text, stdin) {
                (Some(text), _) => text,
                (None, true) => read_stdin()?,
                (None, false) => anyhow::bail!("Provide the claim text or use --stdin"),
            };
            let format = match (json, markdown) {
                (true, _) => CheckFormat::Json,
                (_, true) => CheckFormat::Markdown,
                _ => CheckFormat::Terminal,
            };
            run_check(pipeline, &text, format).await
        }
        Commands::Serve { port } => {
            serve(pipeline, port.unwrap_or(config.port)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_pipeline(config: &Config) -> Result<ClaimPipeline> {
    let artifacts = ModelArtifacts::load(&config.artifact_paths())
        .context("Failed to load model artifacts")?;
    let retriever = config.build_retriever()?;
    let summarizer = config.build_summarizer()?;

    tracing::info!(
        retriever = retriever.name(),
        summarizer = summarizer.name(),
        "Pipeline ready"
    );

    Ok(ClaimPipeline::new(Arc::new(artifacts), retriever, summarizer)
        .with_evidence_timeout(config.evidence_timeout()))
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read claim from stdin")?;
    Ok(text)
}

async fn run_repl(pipeline: Arc<ClaimPipeline>) -> Result<ExitCode> {
    let term = Term::stdout();
    print_banner(&term)?;

    let mut session = Session::new(pipeline);
    let mut presenter = TerminalPresenter::default();
    session.start(&mut presenter);

    loop {
        let input: String = match Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter a news claim or article (\"exit\" to quit)")
            .allow_empty(true)
            .interact_text_on(&term)
        {
            Ok(input) => input,
            // Ctrl-D or the terminal went away
            Err(_) => break,
        };

        if matches!(input.trim(), "exit" | "quit") {
            break;
        }

        if let Err(e) = session.submit(&input, &mut presenter).await {
            presenter.clear_spinner();
            println!("{}", format!("❌ {}", e).bright_red());
        }
    }

    println!("{}", "👋 Goodbye!".bright_blue());
    Ok(ExitCode::SUCCESS)
}

#[derive(Clone, Copy)]
enum CheckFormat {
    Terminal,
    Json,
    Markdown,
}

async fn run_check(pipeline: Arc<ClaimPipeline>, text: &str, format: CheckFormat) -> Result<ExitCode> {
    match format {
        CheckFormat::Json => {
            return match pipeline.analyze(text).await {
                Ok(report) => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("{}", serde_json::json!({ "error": e.to_string() }));
                    Ok(ExitCode::FAILURE)
                }
            };
        }
        CheckFormat::Markdown => {
            return match pipeline.analyze(text).await {
                Ok(report) => {
                    println!("{}", render::report_markdown(&report));
                    Ok(ExitCode::SUCCESS)
                }
                Err(PipelineError::EmptyInput) => {
                    eprintln!("{}", format!("⚠️  {}", EMPTY_INPUT_WARNING).yellow());
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            };
        }
        CheckFormat::Terminal => {}
    }

    let mut session = Session::new(pipeline);
    let mut presenter = TerminalPresenter::default();
    match session.submit(text, &mut presenter).await {
        Ok(Some(_)) => Ok(ExitCode::SUCCESS),
        // Blank input, the warning has been shown
        Ok(None) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}

async fn serve(pipeline: Arc<ClaimPipeline>, port: u16) -> Result<()> {
    let app = build_app(pipeline);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Web interface: http://localhost:{}/", port);
    tracing::info!("Health check: http://localhost:{}/health", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn print_banner(term: &Term) -> Result<()> {
    term.write_line(&format!(
        "{}",
        "🧠 FactFlow — Fake News Detection + Evidence Summarizer"
            .bright_cyan()
            .bold()
    ))?;
    term.write_line(&format!("{}", "Paste a claim and press Enter to analyze.".dimmed()))?;
    term.write_line("")?;
    Ok(())
}

/// Terminal output for a session, with a spinner while evidence loads.
#[derive(Default)]
struct TerminalPresenter {
    spinner: Option<ProgressBar>,
}

impl TerminalPresenter {
    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Presenter for TerminalPresenter {
    fn show_warning(&mut self, message: &str) {
        println!("{}", format!("⚠️  {}", message).yellow());
    }

    fn show_prediction(&mut self, prediction: &Prediction) {
        println!();
        println!("{}", render::prediction_terminal(prediction));
    }

    fn retrieving(&mut self) {
        self.spinner = Some(create_spinner("Retrieving supporting evidence..."));
    }

    fn show_evidence(&mut self, evidence: &EvidenceOutcome) {
        self.clear_spinner();
        println!();
        println!("{}", "🔍 Supporting Evidence".bold());
        print!("{}", render::evidence_terminal(evidence));
        println!();
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
