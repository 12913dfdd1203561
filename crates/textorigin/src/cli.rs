//! Command line interface for the `textorigin` binary.

use std::borrow::Cow;
use std::io::Read as _;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};

use crate::{AttributionSource, Detector, DetectorConfig, PredictionResult};

#[derive(Parser)]
#[command(name = "textorigin")]
#[command(version, about = "Classify text origin: human, AI or LLM-rewritten", long_about = None)]
pub struct Cli {
    /// Text to analyze (if not provided, reads from stdin)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read text from file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Batch process texts (one per line)
    #[arg(short, long, value_name = "PATH", conflicts_with_all = ["text", "file"])]
    batch: Option<PathBuf>,

    /// Batch process from JSON array
    #[arg(long, value_name = "PATH", conflicts_with_all = ["text", "file", "batch"])]
    batch_json: Option<PathBuf>,

    /// Directory holding the fitted model artifacts
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "TEXTORIGIN_ARTIFACTS_DIR",
        default_value = "model_artifacts"
    )]
    artifacts: PathBuf,

    /// Window the input and majority-vote the verdict (long documents)
    #[arg(long, conflicts_with_all = ["batch", "batch_json"])]
    chunked: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Minimum top-class probability before a verdict is committed
    #[arg(long, value_name = "FLOAT")]
    min_confidence: Option<f64>,

    /// Minimum lead over the runner-up before a verdict is committed
    #[arg(long, value_name = "FLOAT")]
    min_margin: Option<f64>,

    /// Quiet mode (minimal output)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode (detailed output)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    /// Output just the verdict label
    Label,
    /// Output the full result as JSON
    Json,
    /// Human-readable output with confidence and attribution (default)
    Human,
}

#[derive(Clone, Copy)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

enum InputSource {
    Single(String),
    Batch(Vec<String>),
}

pub fn run(cli: &Cli) -> Result<()> {
    init_tracing(cli);

    let verbosity = match (cli.quiet, cli.verbose) {
        (true, _) => Verbosity::Quiet,
        (_, true) => Verbosity::Verbose,
        _ => Verbosity::Normal,
    };

    let input_source = determine_input_source(cli)?;

    let detector = Detector::from_artifacts(&cli.artifacts)
        .with_context(|| {
            format!(
                "Failed to load model artifacts from {}",
                cli.artifacts.display()
            )
        })?
        .with_config(policy_config(cli));

    if matches!(verbosity, Verbosity::Verbose) {
        let info = detector.artifact_info();
        eprintln!("Loaded {}", info.model);
        eprintln!(
            "Vocabulary: {} terms, {} features, classes: {}",
            info.vocabulary_size,
            info.n_features,
            info.classes.join(", ")
        );
    }

    match input_source {
        InputSource::Single(text) => {
            let result = process_single(&detector, &text, cli, verbosity);
            output_result(&result, cli, verbosity)?;
        }
        InputSource::Batch(texts) => {
            let results = process_batch(&detector, &texts, cli, verbosity);
            output_batch_results(&results, cli, verbosity)?;
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn policy_config(cli: &Cli) -> DetectorConfig {
    let mut config = DetectorConfig::default();
    if let Some(floor) = cli.min_confidence {
        config = config.with_confidence_floor(floor);
    }
    if let Some(floor) = cli.min_margin {
        config = config.with_margin_floor(floor);
    }
    config
}

/// Determine input source from CLI args
fn determine_input_source(cli: &Cli) -> Result<InputSource> {
    // Priority: text arg > file > batch > batch_json > stdin
    if let Some(text) = &cli.text {
        return Ok(InputSource::Single(text.clone()));
    }

    if let Some(path) = &cli.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        return Ok(InputSource::Single(text));
    }

    if let Some(path) = &cli.batch {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
        let texts: Vec<String> = contents.lines().map(String::from).collect();
        return Ok(InputSource::Batch(texts));
    }

    if let Some(path) = &cli.batch_json {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON batch file: {}", path.display()))?;
        let texts: Vec<String> =
            serde_json::from_str(&contents).with_context(|| "Failed to parse JSON array")?;
        return Ok(InputSource::Batch(texts));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(InputSource::Single(buffer))
}

fn process_single(
    detector: &Detector,
    text: &str,
    cli: &Cli,
    verbosity: Verbosity,
) -> PredictionResult {
    let start = matches!(verbosity, Verbosity::Verbose).then(Instant::now);

    let result = if cli.chunked {
        detector.classify_long(text)
    } else {
        detector.classify(text)
    };

    if let Some(start_time) = start {
        eprintln!("Inference time: {:?}", start_time.elapsed());
    }

    result
}

fn process_batch(
    detector: &Detector,
    texts: &[String],
    cli: &Cli,
    verbosity: Verbosity,
) -> Vec<PredictionResult> {
    let show_progress = matches!(verbosity, Verbosity::Normal | Verbosity::Verbose)
        && texts.len() > 10
        && !matches!(cli.format, OutputFormat::Json);

    let start = matches!(verbosity, Verbosity::Verbose).then(Instant::now);

    let results = if show_progress {
        let pb = progress_bar_setup(texts.len(), "Classifying");
        texts
            .iter()
            .progress_with(pb)
            .map(|text| detector.classify(text))
            .collect()
    } else {
        detector.classify_batch(texts)
    };

    if let Some(start_time) = start {
        eprintln!("Classified {} texts in {:?}", texts.len(), start_time.elapsed());
    }

    results
}

fn progress_bar_setup(len: usize, message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}

/// Output single result based on format
fn output_result(result: &PredictionResult, cli: &Cli, verbosity: Verbosity) -> Result<()> {
    match cli.format {
        OutputFormat::Label => {
            println!("{}", result.label);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(result)?);
        }
        OutputFormat::Human => {
            print_human(result, verbosity);
        }
    }
    Ok(())
}

fn print_human(result: &PredictionResult, verbosity: Verbosity) {
    println!("Verdict: {}", result.label);
    println!("Confidence: {:.1}%", result.confidence * 100.0);

    if !result.attribution.is_empty() {
        let source = match result.attribution_source {
            AttributionSource::Model => "model",
            AttributionSource::Fallback => "fallback",
            AttributionSource::Suppressed => "suppressed",
        };
        println!("Top tokens ({source}):");
        for entry in &result.attribution {
            println!("  {:<18} {:+.4}", entry.token, entry.impact);
        }
    }

    if matches!(verbosity, Verbosity::Verbose) {
        if let Some(profile) = &result.stylometry {
            println!("Stylometry:");
            for (name, value) in profile.named_values() {
                println!("  {name:<22} {value:>10.4}");
            }
        }
    }
}

/// Output batch results
fn output_batch_results(
    results: &[PredictionResult],
    cli: &Cli,
    verbosity: Verbosity,
) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            // JSON array for batch mode
            println!("{}", serde_json::to_string(results)?);
        }
        _ => {
            for result in results {
                output_result(result, cli, verbosity)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_overrides_feed_the_config() {
        let cli = Cli::parse_from([
            "textorigin",
            "--min-confidence",
            "0.8",
            "--min-margin",
            "0.2",
            "some text",
        ]);
        let config = policy_config(&cli);
        assert!((config.confidence_floor - 0.8).abs() < 1e-12);
        assert!((config.margin_floor - 0.2).abs() < 1e-12);
    }

    #[test]
    fn defaults_keep_the_stock_policy() {
        let cli = Cli::parse_from(["textorigin", "hello"]);
        let config = policy_config(&cli);
        assert_eq!(config, DetectorConfig::default());
    }
}
