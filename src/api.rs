//! Convenience functions over a shared default engine.

use crate::attributes::{AttributeBag, RequestSnapshot, RequestSource};
use crate::detectors::{classify_user_agent, DetectorRegistry};
use crate::engine::BotDetector;
use crate::error::DetectError;
use crate::verdict::{BotKind, Verdict};
use std::collections::HashMap;
use std::sync::LazyLock;

static DEFAULT_DETECTOR: LazyLock<BotDetector> = LazyLock::new(BotDetector::new);

/// The shared engine with the built-in detectors.
pub fn default_detector() -> &'static BotDetector {
    &DEFAULT_DETECTOR
}

/// Classify a request with the built-in detectors.
pub fn detect(request: &dyn RequestSource) -> Result<Verdict, DetectError> {
    DEFAULT_DETECTOR.detect(request)
}

/// Classify a request with the built-in detectors plus `custom`.
pub fn detect_with_detectors(
    request: &dyn RequestSource,
    custom: &DetectorRegistry,
) -> Result<Verdict, DetectError> {
    BotDetector::with_detectors(custom).detect(request)
}

/// Classify using only the user-agent and missing-headers detectors.
pub fn quick_check(request: &dyn RequestSource) -> Result<Verdict, DetectError> {
    DEFAULT_DETECTOR.quick_check(request)
}

/// Classify a bare header map with the header detectors.
pub fn analyze_headers(headers: &HashMap<String, Vec<String>>) -> Verdict {
    DEFAULT_DETECTOR.analyze_headers(headers)
}

/// Bot kind for a user agent, judged by its signatures alone.
pub fn is_bot_user_agent(user_agent: &str) -> Option<BotKind> {
    classify_user_agent(user_agent)
}

/// Classify a request that carries nothing but a User-Agent header.
pub fn detect_user_agent(user_agent: &str) -> Verdict {
    let request = RequestSnapshot::new("GET", "/").with_header("User-Agent", user_agent);
    let attrs = AttributeBag::collect(&request);
    DEFAULT_DETECTOR.resolve(&attrs).verdict
}
