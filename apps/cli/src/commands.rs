//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use domainqa_adapters::{AdapterRegistry, DomainAdapter};
use domainqa_core::{
    AnswerService, DEFAULT_DRAFT_CONFIDENCE, Draft, DraftAnswerService, ProgressReporter,
    answer_batch_nonempty, answer_question,
};
use domainqa_shared::{
    AppConfig, PipelineConfig, QuestionContext, SearchResult, init_config, load_config,
    load_config_from,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// domainqa: domain-aware question answering.
#[derive(Parser)]
#[command(
    name = "domainqa",
    version,
    about = "Route questions to domain adapters and review answers for domain-specific quality.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.domainqa/domainqa.toml.
    #[arg(long, global = true, env = "DOMAINQA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List registered domain adapters and their knowledge counts.
    Domains,

    /// Show which adapter handles a question.
    Classify {
        question: String,

        /// Explicit domain tag.
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Print the normalized question.
    Preprocess {
        question: String,

        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Print the system prompt built for a question.
    Prompt {
        question: String,

        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Suggest related questions.
    Suggest {
        question: String,

        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Run a draft answer through the full pipeline and print the outcome as JSON.
    Review {
        #[arg(short, long)]
        question: String,

        #[arg(short, long)]
        answer: String,

        /// Base confidence of the draft.
        #[arg(short, long, default_value_t = DEFAULT_DRAFT_CONFIDENCE)]
        confidence: f64,

        /// JSON file holding an array of retrieved knowledge snippets.
        #[arg(short, long)]
        knowledge: Option<PathBuf>,

        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Review many drafts from a JSON Lines file, printing one outcome per line.
    Batch {
        /// Input file: one `{"question": ..., "answer": ...}` object per line.
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum questions in flight (overrides `defaults.batch_concurrency`).
        #[arg(long)]
        concurrency: Option<u32>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "domainqa=info",
        1 => "domainqa=debug",
        _ => "domainqa=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Domains => cmd_domains(config_path.as_deref()),
        Command::Classify { question, domain } => {
            cmd_classify(config_path.as_deref(), &question, domain)
        }
        Command::Preprocess { question, domain } => {
            let ctx = context(&question, domain);
            with_adapter(config_path.as_deref(), &ctx, |adapter| {
                println!("{}", adapter.preprocess_question(&ctx.question));
            })
        }
        Command::Prompt { question, domain } => {
            let ctx = context(&question, domain);
            with_adapter(config_path.as_deref(), &ctx, |adapter| {
                println!("{}", adapter.build_system_prompt(&ctx.question));
            })
        }
        Command::Suggest { question, domain } => {
            let ctx = context(&question, domain);
            with_adapter(config_path.as_deref(), &ctx, |adapter| {
                for related in adapter.suggest_related_questions(&ctx.question) {
                    println!("{related}");
                }
            })
        }
        Command::Review {
            question,
            answer,
            confidence,
            knowledge,
            domain,
        } => {
            let draft = Draft {
                answer,
                confidence,
                knowledge: match knowledge {
                    Some(path) => read_knowledge(&path)?,
                    None => Vec::new(),
                },
            };
            cmd_review(config_path.as_deref(), context(&question, domain), draft).await
        }
        Command::Batch { input, concurrency } => {
            cmd_batch(config_path.as_deref(), &input, concurrency).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

// ---------------------------------------------------------------------------
// Shared setup
// ---------------------------------------------------------------------------

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn build_registry(config: &AppConfig) -> Result<AdapterRegistry> {
    let registry = AdapterRegistry::from_config(&config.adapters)?
        .with_default_domain(config.defaults.default_domain.clone());
    info!(adapters = ?registry.names(), "adapter registry ready");
    Ok(registry)
}

fn context(question: &str, domain: Option<String>) -> QuestionContext {
    let ctx = QuestionContext::new(question);
    match domain {
        Some(d) => ctx.with_domain(d),
        None => ctx,
    }
}

/// Select the adapter for `ctx` and hand it to `f`.
fn with_adapter(
    config_path: Option<&Path>,
    ctx: &QuestionContext,
    f: impl FnOnce(&dyn DomainAdapter),
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = build_registry(&config)?;
    let adapter = registry.select(ctx)?;
    f(adapter);
    Ok(())
}

fn read_knowledge(path: &Path) -> Result<Vec<SearchResult>> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read knowledge file {}", path.display()))?;
    let knowledge = serde_json::from_str(&content)
        .wrap_err_with(|| format!("invalid knowledge file {}", path.display()))?;
    Ok(knowledge)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_domains(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = build_registry(&config)?;

    println!(
        "  {:<10} {:>8} {:>6} {:>10} {:>8}",
        "DOMAIN", "CONCEPTS", "TERMS", "QUESTIONS", "SOURCES"
    );
    for info in registry.domains() {
        println!(
            "  {:<10} {:>8} {:>6} {:>10} {:>8}",
            info.domain_name,
            info.key_concepts_count,
            info.terminology_count,
            info.common_questions_count,
            info.expert_sources_count
        );
    }
    Ok(())
}

fn cmd_classify(config_path: Option<&Path>, question: &str, domain: Option<String>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = build_registry(&config)?;
    let report = classify_report(&registry, &context(question, domain))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Selected domain plus whatever labels that adapter derives from the question.
fn classify_report(
    registry: &AdapterRegistry,
    ctx: &QuestionContext,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let adapter = registry.select(ctx)?;
    let mut report = serde_json::Map::new();
    report.insert("domain".into(), adapter.name().into());
    report.extend(adapter.classify(&ctx.question));
    Ok(report)
}

async fn cmd_review(config_path: Option<&Path>, ctx: QuestionContext, draft: Draft) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = build_registry(&config)?;
    let pipeline = PipelineConfig::from(&config);

    let mut service = DraftAnswerService::new();
    service.insert(ctx.id.clone(), draft);

    let reporter = CliProgress::new();
    let result = answer_question(&registry, &service, &ctx, &pipeline, &reporter).await;
    reporter.finish();

    let outcome = result?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// One line of a batch input file.
#[derive(Deserialize)]
struct BatchLine {
    #[serde(flatten)]
    context: QuestionContext,
    #[serde(flatten)]
    draft: Draft,
}

async fn cmd_batch(
    config_path: Option<&Path>,
    input: &Path,
    concurrency: Option<u32>,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = Arc::new(build_registry(&config)?);
    let mut pipeline = PipelineConfig::from(&config);
    if let Some(n) = concurrency {
        if n == 0 {
            return Err(eyre!("--concurrency must be at least 1"));
        }
        pipeline.batch_concurrency = n;
    }

    let content = std::fs::read_to_string(input)
        .wrap_err_with(|| format!("cannot read batch file {}", input.display()))?;

    let mut service = DraftAnswerService::new();
    let mut contexts = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed: BatchLine = serde_json::from_str(line)
            .map_err(|e| eyre!("{}:{}: {e}", input.display(), i + 1))?;
        service.insert(parsed.context.id.clone(), parsed.draft);
        contexts.push(parsed.context);
    }

    info!(questions = contexts.len(), input = %input.display(), "running batch");

    let service: Arc<dyn AnswerService> = Arc::new(service);
    let reporter = CliProgress::new();
    let result = answer_batch_nonempty(registry, service, contexts, &pipeline, &reporter).await;
    reporter.finish();

    for outcome in result? {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid progress template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn question_done(&self, domain: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Answered [{current}/{total}] ({domain})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_review() {
        let cli = Cli::try_parse_from([
            "domainqa",
            "review",
            "--question",
            "What is a fever?",
            "--answer",
            "A raised body temperature.",
            "--confidence",
            "0.7",
        ])
        .unwrap();
        match cli.command {
            Command::Review {
                question,
                confidence,
                knowledge,
                domain,
                ..
            } => {
                assert_eq!(question, "What is a fever?");
                assert_eq!(confidence, 0.7);
                assert!(knowledge.is_none());
                assert!(domain.is_none());
            }
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn cli_rejects_bad_log_format() {
        assert!(Cli::try_parse_from(["domainqa", "--log-format", "xml", "domains"]).is_err());
    }

    #[test]
    fn batch_line_parses_context_and_draft() {
        let line: BatchLine = serde_json::from_str(
            r#"{"question": "Is the flu contagious?", "domain": "medical",
                "answer": "Yes.", "confidence": 0.4}"#,
        )
        .unwrap();
        assert_eq!(line.context.question, "Is the flu contagious?");
        assert_eq!(line.context.domain.as_deref(), Some("medical"));
        assert_eq!(line.draft.answer, "Yes.");
        assert_eq!(line.draft.confidence, 0.4);
        assert!(line.draft.knowledge.is_empty());
    }

    #[test]
    fn classify_report_uses_selected_adapter() {
        let registry = AdapterRegistry::new().unwrap();

        let urgent = context("Is chest pain an emergency?", None);
        let report = classify_report(&registry, &urgent).unwrap();
        assert_eq!(report["domain"], "medical");
        assert_eq!(report["topic"], "cardiovascular");
        assert_eq!(report["emergency"], true);

        let paint = context("Which paint works best?", None);
        let report = classify_report(&registry, &paint).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report["domain"], "general");

        let tagged = context("I have a fever", Some("general".into()));
        assert!(!classify_report(&registry, &tagged).unwrap().contains_key("topic"));
    }

    #[test]
    fn context_applies_domain_tag() {
        assert_eq!(context("q", Some("general".into())).domain.as_deref(), Some("general"));
        assert!(context("q", None).domain.is_none());
    }
}
