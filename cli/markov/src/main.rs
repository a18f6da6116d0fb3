//! Markov CLI: evaluate, inspect and edit probabilistic graphical models.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::advise::Symptoms;
use config::MarkovConfig;

#[derive(Parser)]
#[command(name = "markov", version, about = "Probabilistic graphical models")]
struct Cli {
    /// Model document (overrides [model] file in markov.toml)
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Log filter (overrides [logging] level in markov.toml and RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Advice for a heart-failure patient's symptoms
    Advise {
        /// Orthopnea grade (GRADE_0..GRADE_3 or 0..3)
        #[arg(long)]
        orthopnea: Option<String>,
        /// Cough grade
        #[arg(long)]
        cough: Option<String>,
        /// Edema grade
        #[arg(long)]
        edema: Option<String>,
        /// Dizziness grade
        #[arg(long)]
        dizziness: Option<String>,
        /// Syncope category (NONE, PRESYNCOPE, SYNCOPE)
        #[arg(long)]
        syncope: Option<String>,
        /// Read a JSON request body from this file instead ("-" for stdin)
        #[arg(long, conflicts_with_all = ["orthopnea", "cough", "edema", "dizziness", "syncope"])]
        request: Option<PathBuf>,
    },
    /// Optimal strategy of an influence diagram given findings
    Evaluate {
        /// Findings as VARIABLE=STATE
        findings: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Network summary and constraint report
    Inspect,
    /// Posterior distribution of a chance variable
    Posterior {
        /// Variable to query
        variable: String,
        /// Findings as VARIABLE=STATE
        findings: Vec<String>,
    },
    /// Invert a directed link and save the model
    InvertLink {
        parent: String,
        child: String,
        /// Where to write the edited model (default: overwrite the input)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Rewrite a model at the current or the legacy format version
    Convert {
        /// Output file
        #[arg(long)]
        output: PathBuf,
        /// Write the legacy format
        #[arg(long)]
        legacy: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let (config, config_dir) = match MarkovConfig::find_and_load(&cwd)? {
        Some((config, dir)) => (config, dir),
        None => (MarkovConfig::default(), cwd),
    };
    init_logging(cli.log_level.as_deref().or(config.log_level()));
    let model = resolve_model(cli.model, &config, &config_dir)?;

    match cli.command {
        Commands::Advise {
            orthopnea,
            cough,
            edema,
            dizziness,
            syncope,
            request,
        } => {
            let symptoms = Symptoms {
                orthopnea,
                cough,
                edema,
                dizziness,
                syncope,
            };
            let body = request.as_deref().map(read_request).transpose()?;
            commands::advise::run(&model, &symptoms, body.as_deref())
        }
        Commands::Evaluate { findings, json } => commands::evaluate::run(&model, &findings, json),
        Commands::Inspect => commands::inspect::run(&model, config.model.name.as_deref()),
        Commands::Posterior { variable, findings } => {
            commands::posterior::run(&model, &variable, &findings)
        }
        Commands::InvertLink {
            parent,
            child,
            output,
        } => commands::invert_link::run(&model, &parent, &child, output.as_deref()),
        Commands::Convert { output, legacy } => commands::convert::run(&model, &output, legacy),
    }
}

/// `--log-level`, then the config file, then `RUST_LOG`, then `warn`.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_model(
    flag: Option<PathBuf>,
    config: &MarkovConfig,
    config_dir: &Path,
) -> anyhow::Result<PathBuf> {
    match flag.or_else(|| config.model_path(config_dir)) {
        Some(path) => Ok(path),
        None => anyhow::bail!("no model given (pass --model or set [model] file in markov.toml)"),
    }
}

fn read_request(path: &Path) -> anyhow::Result<String> {
    use anyhow::Context;
    use std::io::Read;

    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("reading request from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    const MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/aid-hf.json");

    fn symptoms(grade: &str, syncope: &str) -> Symptoms {
        Symptoms {
            orthopnea: Some(grade.to_string()),
            cough: Some(grade.to_string()),
            edema: Some(grade.to_string()),
            dizziness: Some(grade.to_string()),
            syncope: Some(syncope.to_string()),
        }
    }

    #[test]
    fn advise_from_arguments_and_from_a_request_body() {
        let model = Path::new(MODEL);
        assert_eq!(
            commands::advise::advice(model, &symptoms("0", "NONE"), None).unwrap(),
            "No action needed. Continue your current treatment."
        );
        let body = r#"{"orthopnea": "GRADE_2", "cough": "GRADE_1", "edema": "GRADE_0",
                       "dizziness": "GRADE_3", "syncope": "PRESYNCOPE"}"#;
        assert_eq!(
            commands::advise::advice(model, &Symptoms::default(), Some(body)).unwrap(),
            "Contact your heart failure nurse within 24 hours."
        );
    }

    #[test]
    fn advise_reports_missing_symptoms() {
        let err = commands::advise::advice(Path::new(MODEL), &Symptoms::default(), None)
            .unwrap_err();
        assert!(err.to_string().contains("syncope must not be null"));
    }

    #[test]
    fn evaluate_renders_strategy_policy_and_utility() {
        let findings: Vec<String> = [
            "Orthopnea=3",
            "Cough=3",
            "Edema=3",
            "Dizziness=3",
            "Syncope=syncope",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let result = commands::evaluate::evaluate(Path::new(MODEL), &findings).unwrap();
        let report = commands::evaluate::render(&result).unwrap();
        assert!(report.contains("Advice = Contact your heart failure nurse today."));
        assert!(report.contains("policy(Advice)"));
        assert!(report.contains("Expected utility:"));
    }

    #[test]
    fn inspect_reports_a_consistent_model() {
        let loaded = commands::load_model(Path::new(MODEL), Some("AID-HF")).unwrap();
        let report = commands::inspect::render(&loaded).unwrap();
        assert!(report.starts_with("Network: AID-HF (InfluenceDiagram)"));
        assert!(report.contains("Nodes: 8 (6 chance, 1 decision, 1 utility)"));
        assert!(report.contains("All constraints satisfied."));
    }

    #[test]
    fn invert_then_convert_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let edited = dir.path().join("edited.json");
        let legacy = dir.path().join("legacy.json");

        commands::invert_link::run(
            Path::new(MODEL),
            "HeartFailureStatus",
            "Cough",
            Some(edited.as_path()),
        )
        .unwrap();
        let loaded = commands::load_model(&edited, None).unwrap();
        assert!(loaded.network.link("Cough", "HeartFailureStatus", true).is_some());
        assert!(loaded.network.link("HeartFailureStatus", "Cough", true).is_none());

        commands::convert::run(&edited, &legacy, true).unwrap();
        let reloaded = commands::load_model(&legacy, None).unwrap();
        assert_eq!(reloaded.format_version.to_string(), "0.2.0");
        assert_eq!(reloaded.network.links(), loaded.network.links());
    }

    #[test]
    fn model_flag_wins_over_config() {
        let config = MarkovConfig::default();
        let err = resolve_model(None, &config, Path::new("/")).unwrap_err();
        assert!(err.to_string().contains("no model given"));
        assert_eq!(
            resolve_model(Some(PathBuf::from("m.json")), &config, Path::new("/")).unwrap(),
            PathBuf::from("m.json")
        );
    }
}
