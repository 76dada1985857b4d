//! Configuration types for bot detection.

use crate::browser::BrowserName;
use crate::error::ConfigError;
use crate::verdict::BotKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotDetectConfig {
    /// Which detectors run and their thresholds
    pub detection: DetectionConfig,

    /// What to do with a verdict
    pub gate: GateConfig,

    /// Browser support policy
    pub browser: BrowserConfig,
}

impl BotDetectConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject internally inconsistent settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.detection.thresholds;
        if t.min_header_count > t.max_header_count {
            return Err(ConfigError::Invalid(format!(
                "min_header_count ({}) exceeds max_header_count ({})",
                t.min_header_count, t.max_header_count
            )));
        }
        if t.max_missing_common == 0 {
            return Err(ConfigError::Invalid(
                "max_missing_common must be at least 1".to_string(),
            ));
        }
        if !(100..=599).contains(&self.gate.blocked_status_code) {
            return Err(ConfigError::Invalid(format!(
                "blocked_status_code {} is not an HTTP status",
                self.gate.blocked_status_code
            )));
        }
        Ok(())
    }
}

/// Detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Enable User-Agent signature matching
    pub user_agent: bool,

    /// Enable automation header detection
    pub headers: bool,

    /// Enable header ordering check
    pub header_order: bool,

    /// Enable header count check
    pub header_count: bool,

    /// Enable missing common headers check
    pub missing_headers: bool,

    /// Enable empty content negotiation check
    pub accept_headers: bool,

    /// Enable Connection header check
    pub connection: bool,

    /// Enable GET-with-body check
    pub content_length: bool,

    pub thresholds: HeaderThresholds,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            user_agent: true,
            headers: true,
            header_order: true,
            header_count: true,
            missing_headers: true,
            accept_headers: true,
            connection: true,
            content_length: true,
            thresholds: HeaderThresholds::default(),
        }
    }
}

/// Thresholds for the header detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderThresholds {
    /// Fewer distinct headers than this is a bot
    pub min_header_count: usize,

    /// More distinct headers than this is a bot
    pub max_header_count: usize,

    /// This many missing common headers is a bot
    pub max_missing_common: usize,

    /// Fewer distinct header names than this is a bot
    pub min_distinct_headers: usize,
}

impl Default for HeaderThresholds {
    fn default() -> Self {
        Self {
            min_header_count: 3,
            max_header_count: 30,
            max_missing_common: 4,
            min_distinct_headers: 2,
        }
    }
}

/// Request gating settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Block requests classified as bots
    pub block_bots: bool,

    /// Status code for blocked requests
    pub blocked_status_code: u16,

    /// Body for blocked requests
    pub blocked_message: String,

    /// Path prefixes that bypass detection
    pub skip_paths: Vec<String>,

    /// Bot kinds that are never blocked
    pub allowed_kinds: Vec<BotKind>,

    /// Let requests through when attribute collection fails
    pub fail_open: bool,

    /// Attach X-Bot-* headers to decisions
    pub verdict_headers: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            block_bots: false,
            blocked_status_code: 403,
            blocked_message: "Bot traffic is not allowed".to_string(),
            skip_paths: vec![],
            allowed_kinds: vec![],
            fail_open: true,
            verdict_headers: true,
        }
    }
}

/// Browser support policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Minimum supported version per browser; unlisted browsers are
    /// unsupported
    pub min_versions: HashMap<BrowserName, String>,
}
