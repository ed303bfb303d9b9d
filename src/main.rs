//! PersonaInsight command line
//!
//! - `train <corpus.csv>`: fit vocabulary and model, write artifacts
//! - `analyze <texts.txt> [--json]`: score one text per line and summarize
//! - `demo`: analyze a fixed set of sample texts
//!
//! `analyze` and `demo` load artifacts from the configured directory, training
//! from `training.corpus_path` first when none exist.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use persona_insight::analysis::AnalysisReport;
use persona_insight::corpus::LabeledCorpus;
use persona_insight::model::TrainingHistory;
use persona_insight::source::{LineFileSource, RawText, TextSource};
use persona_insight::{ArtifactBundle, ModelHandle, OceanAnalyzer, PersonaConfig, Trainer};

const DEMO_TEXTS: [&str; 9] = [
    "I absolutely love this new product! Best purchase ever!",
    "This is the worst experience ever. Never buying again.",
    "Just received my order and it isn't exactly what I wanted!",
    "Terrible customer service, completely disappointed.",
    "I prefer spending time alone with a good book rather than going to parties.",
    "I always plan everything in advance and stick to my schedule.",
    "I'm always thinking about new ideas and love exploring different possibilities.",
    "I try to consider everyone's feelings before making decisions.",
    "Sometimes I worry too much about what could go wrong in situations.",
];

/// Upper bound on lines read by `analyze`.
const MAX_INPUT_TEXTS: usize = 10_000;

// ──────────────────────────────────────────────────────────────────────────────
// COMMANDS
// ──────────────────────────────────────────────────────────────────────────────

enum Command {
    Train { corpus: PathBuf },
    Analyze { input: PathBuf, json: bool },
    Demo,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        match args.first().map(String::as_str) {
            Some("train") => {
                let corpus = args.get(1).context("usage: persona_insight train <corpus.csv>")?;
                Ok(Command::Train {
                    corpus: PathBuf::from(corpus),
                })
            }
            Some("analyze") => {
                let input = args
                    .get(1)
                    .context("usage: persona_insight analyze <texts.txt> [--json]")?;
                Ok(Command::Analyze {
                    input: PathBuf::from(input),
                    json: args[2..].iter().any(|a| a == "--json"),
                })
            }
            Some("demo") | None => Ok(Command::Demo),
            Some(other) => bail!("unknown command '{}' (expected train, analyze or demo)", other),
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("persona_insight=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let config = PersonaConfig::from_env().context("Failed to load configuration")?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match Command::parse(&args)? {
        Command::Train { corpus } => {
            let (bundle, history) = train_from(&corpus, &config).await?;
            bundle
                .save(&config.artifacts.dir)
                .with_context(|| format!("Failed to save artifacts to {}", config.artifacts.dir.display()))?;
            info!("Artifacts written to {}", config.artifacts.dir.display());
            print_history(&history);
        }
        Command::Analyze { input, json } => {
            let mut source = LineFileSource::new(&input);
            let texts = source
                .fetch("local", MAX_INPUT_TEXTS)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let report = run_analysis(&config, &texts).await?;
            if json {
                let record = report.to_record(input.display().to_string());
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_report(&report);
            }
        }
        Command::Demo => {
            let texts: Vec<RawText> = DEMO_TEXTS.iter().map(|t| RawText::new(*t)).collect();
            let report = run_analysis(&config, &texts).await?;
            print_report(&report);
        }
    }

    Ok(())
}

// ──────────────────────────────────────────────────────────────────────────────
// HELPERS
// ──────────────────────────────────────────────────────────────────────────────

async fn train_from(corpus_path: &Path, config: &PersonaConfig) -> Result<(ArtifactBundle, TrainingHistory)> {
    let corpus = LabeledCorpus::load_csv(corpus_path)
        .with_context(|| format!("Failed to load corpus {}", corpus_path.display()))?;
    info!("Training on {} labeled texts", corpus.len());

    let trainer = Arc::new(Trainer::new(config.training.clone()));
    let outcome = trainer.train_bundle_task(corpus, config.clone()).await?;
    Ok(outcome)
}

/// Loaded artifacts, or freshly trained ones when none exist yet.
async fn ensure_model(handle: &ModelHandle, config: &PersonaConfig) -> Result<Arc<ArtifactBundle>> {
    if handle.load(&config.artifacts.dir) {
        info!("Using pre-trained model from {}", config.artifacts.dir.display());
    } else {
        let Some(corpus) = config.training.corpus_path.as_deref() else {
            bail!(
                "no usable artifacts in {} and no training corpus configured (set PERSONA_CORPUS)",
                config.artifacts.dir.display()
            );
        };
        warn!("Model not found. Training a new one from {}", corpus.display());
        let (bundle, history) = train_from(corpus, config).await?;
        print_history(&history);
        if let Err(e) = bundle.save(&config.artifacts.dir) {
            warn!("Could not persist artifacts: {}", e);
        }
        handle.install(bundle);
    }
    handle.current().context("model handle is empty after loading")
}

async fn run_analysis(config: &PersonaConfig, texts: &[RawText]) -> Result<AnalysisReport> {
    let handle = ModelHandle::new();
    let bundle = ensure_model(&handle, config).await?;
    let analyzer = OceanAnalyzer::from_bundle(bundle).with_normalization(config.encoder.normalize_input);
    Ok(analyzer.report(texts)?)
}

fn print_history(history: &TrainingHistory) {
    for m in &history.epochs {
        match m.validation_loss {
            Some(v) => println!("epoch {:>3}  loss {:.4}  val_loss {:.4}", m.epoch, m.train_loss, v),
            None => println!("epoch {:>3}  loss {:.4}", m.epoch, m.train_loss),
        }
    }
}

fn print_report(report: &AnalysisReport) {
    println!("\nIndividual Analysis Results:");
    for result in &report.results {
        println!("\nText: {}", result.text);
        println!("OCEAN Traits:");
        for (t, score) in result.scores.iter() {
            println!("  {}: {:.2}", capitalize(t.name()), score);
        }
    }

    if let Some(average) = &report.average {
        println!("\n\nAverage OCEAN Scores Across All Texts:");
        for (t, score) in average.scores.iter() {
            println!("  {}: {:.2}", capitalize(t.name()), score);
        }
    }

    println!("\n\n{}", "═".repeat(53));
    println!("PERSONALITY PROFILE SUMMARY");
    println!("{}", "═".repeat(53));
    println!("{}", report.summary);
    println!("{}", "═".repeat(53));
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
