//! Request gating.
//!
//! Turns a detection into an allow/block decision for the HTTP layer. The
//! gate never touches the transport: it returns the status, body and
//! response headers to apply.

use crate::attributes::RequestSource;
use crate::config::{BotDetectConfig, GateConfig};
use crate::engine::{BotDetector, Detection};
use crate::verdict::Verdict;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const HEADER_BOT_DETECTED: &str = "X-Bot-Detected";
pub const HEADER_BOT_KIND: &str = "X-Bot-Kind";

/// What the HTTP layer should do with a request.
#[derive(Debug, Clone)]
pub enum GateDecision {
    /// Path is exempt; detection did not run
    Skip,

    /// Let the request through
    Allow {
        /// `None` when collection failed and the gate is fail-open
        detection: Option<Detection>,
        headers: Vec<(String, String)>,
    },

    /// Reject the request
    Block {
        status: u16,
        message: String,
        /// `None` when collection failed and the gate is fail-closed
        detection: Option<Detection>,
        headers: Vec<(String, String)>,
    },
}

impl GateDecision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, GateDecision::Block { .. })
    }

    /// Detection result, if detection ran and succeeded.
    pub fn detection(&self) -> Option<&Detection> {
        match self {
            GateDecision::Skip => None,
            GateDecision::Allow { detection, .. } | GateDecision::Block { detection, .. } => {
                detection.as_ref()
            }
        }
    }

    /// Response headers to attach.
    pub fn headers(&self) -> &[(String, String)] {
        match self {
            GateDecision::Skip => &[],
            GateDecision::Allow { headers, .. } | GateDecision::Block { headers, .. } => headers,
        }
    }
}

/// Detection plus blocking policy.
#[derive(Debug, Clone)]
pub struct Gate {
    config: GateConfig,
    detector: Arc<BotDetector>,
}

impl Gate {
    pub fn new(config: GateConfig, detector: Arc<BotDetector>) -> Self {
        Self { config, detector }
    }

    /// Build the engine and gate from a full configuration.
    pub fn from_config(config: &BotDetectConfig) -> Self {
        Self::new(
            config.gate.clone(),
            Arc::new(BotDetector::from_config(&config.detection)),
        )
    }

    pub fn detector(&self) -> &Arc<BotDetector> {
        &self.detector
    }

    /// Decide what to do with a request.
    pub fn check(&self, request: &dyn RequestSource) -> GateDecision {
        let path = request.path();
        if self.is_skipped(path) {
            debug!(path, "Path exempt from bot detection");
            return GateDecision::Skip;
        }

        let detection = match self.detector.detect_request(request) {
            Ok(detection) => detection,
            Err(e) => {
                warn!(error = %e, path, fail_open = self.config.fail_open, "Bot detection failed");
                return if self.config.fail_open {
                    GateDecision::Allow {
                        detection: None,
                        headers: vec![],
                    }
                } else {
                    GateDecision::Block {
                        status: self.config.blocked_status_code,
                        message: self.config.blocked_message.clone(),
                        detection: None,
                        headers: vec![],
                    }
                };
            }
        };

        let headers = self.verdict_headers(&detection.verdict);

        if self.should_block(&detection.verdict) {
            info!(
                path,
                kind = %detection.verdict.kind().unwrap_or_default(),
                decided_by = detection.decided_by.as_deref().unwrap_or("-"),
                "Blocking bot request"
            );
            GateDecision::Block {
                status: self.config.blocked_status_code,
                message: self.config.blocked_message.clone(),
                detection: Some(detection),
                headers,
            }
        } else {
            GateDecision::Allow {
                detection: Some(detection),
                headers,
            }
        }
    }

    fn is_skipped(&self, path: &str) -> bool {
        self.config
            .skip_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn should_block(&self, verdict: &Verdict) -> bool {
        if !self.config.block_bots || !verdict.is_bot() {
            return false;
        }
        verdict
            .kind()
            .map_or(true, |kind| !self.config.allowed_kinds.contains(&kind))
    }

    /// X-Bot-* headers for a verdict.
    fn verdict_headers(&self, verdict: &Verdict) -> Vec<(String, String)> {
        if !self.config.verdict_headers {
            return vec![];
        }

        let mut headers = vec![(
            HEADER_BOT_DETECTED.to_string(),
            verdict.is_bot().to_string(),
        )];
        if let Some(kind) = verdict.kind() {
            headers.push((HEADER_BOT_KIND.to_string(), kind.as_str().to_string()));
        }
        headers
    }
}
