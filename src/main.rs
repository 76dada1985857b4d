//! Bot detection command-line tool for Zentinel
//!
//! Classifies a User-Agent, a request fixture or a header map and prints the
//! result as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zentinel_bot_detect::{
    ai, api, browser, BotDetectConfig, BotDetector, Gate, GateDecision, RequestSnapshot,
};

#[derive(Parser, Debug)]
#[command(name = "zentinel-bot-detect")]
#[command(author, version, about = "Bot detection and browser identification for Zentinel")]
struct Args {
    /// Path to configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a User-Agent string and identify its browser
    UserAgent {
        user_agent: String,
    },

    /// Classify a request fixture (JSON or YAML)
    Request {
        file: PathBuf,

        /// Run only the user-agent and missing-headers detectors
        #[arg(long)]
        quick: bool,
    },

    /// Classify a header map fixture (JSON or YAML, name to list of values)
    Headers {
        file: PathBuf,
    },
}

fn init_logging(json: bool, level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr; stdout carries the JSON result
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Read a JSON or YAML fixture, chosen by extension.
fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(value)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, &args.log_level);

    let config = match &args.config {
        Some(path) => BotDetectConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BotDetectConfig::default(),
    };
    debug!(?config, "Configuration loaded");

    let output = match args.command {
        Command::UserAgent { user_agent } => classify_user_agent(&config, &user_agent),
        Command::Request { file, quick } => {
            let request: RequestSnapshot = read_fixture(&file)?;
            classify_request(&config, &request, quick)?
        }
        Command::Headers { file } => {
            let headers: HashMap<String, Vec<String>> = read_fixture(&file)?;
            let detector = BotDetector::from_config(&config.detection);
            json!({ "verdict": detector.analyze_headers(&headers) })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn classify_user_agent(config: &BotDetectConfig, user_agent: &str) -> serde_json::Value {
    let info = browser::parse_user_agent(user_agent);
    json!({
        "bot_kind": api::is_bot_user_agent(user_agent),
        "ai_agent": ai::detect_ai_agent(user_agent),
        "browser": browser_json(&info, config),
    })
}

fn classify_request(
    config: &BotDetectConfig,
    request: &RequestSnapshot,
    quick: bool,
) -> Result<serde_json::Value> {
    let info = browser::parse_request(request);

    if quick {
        let detector = BotDetector::from_config(&config.detection);
        return Ok(json!({
            "verdict": detector.quick_check(request)?,
            "browser": browser_json(&info, config),
        }));
    }

    let gate = Gate::from_config(config);
    let decision = gate.check(request);

    let action = match &decision {
        GateDecision::Skip => json!({ "action": "skip" }),
        GateDecision::Allow { .. } => json!({ "action": "allow" }),
        GateDecision::Block { status, message, .. } => json!({
            "action": "block",
            "status": status,
            "message": message,
        }),
    };

    Ok(json!({
        "detection": decision.detection(),
        "gate": action,
        "headers": decision.headers(),
        "browser": browser_json(&info, config),
    }))
}

fn browser_json(info: &browser::BrowserInfo, config: &BotDetectConfig) -> serde_json::Value {
    json!({
        "info": info,
        "family": info.family(),
        "major_version": info.major_version(),
        "mobile": info.is_mobile(),
        "supported": info.is_supported(&config.browser.min_versions),
    })
}
