//! User-Agent signature detector.
//!
//! Classifies the User-Agent in two passes:
//! - Named signatures (AI agents, automation tools, CLI clients, crawlers)
//! - Suspicious non-browser patterns, reported as unclassified bots

use super::Detector;
use crate::attributes::{AttributeBag, Outcome};
use crate::taxonomy::{match_signature, match_suspicious};
use crate::verdict::{BotKind, Verdict};
use tracing::trace;

/// Classify a User-Agent string.
///
/// Returns `None` when the string looks like a browser.
pub fn classify_user_agent(ua: &str) -> Option<BotKind> {
    let ua_lower = ua.to_lowercase();

    if let Some(kind) = match_signature(&ua_lower) {
        return Some(kind);
    }

    match_suspicious(&ua_lower).map(|pattern| {
        trace!(pattern, "suspicious user agent");
        BotKind::Unknown
    })
}

/// User-Agent analyzer detector.
///
/// An absent User-Agent is left to the missing-headers detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAgentDetector;

impl UserAgentDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for UserAgentDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        match &attrs.user_agent {
            Outcome::Present(ua) => classify_user_agent(ua).map(Verdict::bot),
            Outcome::Absent(_) => None,
        }
    }
}
