//! Header analysis detectors.
//!
//! Analyzes request headers for bot indicators:
//! - Automation tool markers
//! - Too few or too many headers
//! - Missing common browser headers
//! - No content negotiation at all
//! - Degenerate header ordering

use super::Detector;
use crate::attributes::{AttributeBag, Outcome};
use crate::taxonomy::AUTOMATION_HEADERS;
use crate::verdict::Verdict;

/// Flags requests carrying headers set by automation or debugging tools.
#[derive(Debug, Clone)]
pub struct AutomationHeaderDetector {
    headers: Vec<String>,
}

impl AutomationHeaderDetector {
    pub fn new() -> Self {
        Self {
            headers: AUTOMATION_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl Default for AutomationHeaderDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for AutomationHeaderDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        let headers = attrs.headers.value()?;
        self.headers
            .iter()
            .any(|name| headers.contains_key(name))
            .then(Verdict::unclassified)
    }
}

/// Flags requests with an implausible number of distinct headers.
#[derive(Debug, Clone, Copy)]
pub struct HeaderCountDetector {
    /// Fewer headers than this is too sparse for a browser
    pub min: usize,
    /// More headers than this is anomalously verbose
    pub max: usize,
}

impl HeaderCountDetector {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Default for HeaderCountDetector {
    fn default() -> Self {
        Self::new(3, 30)
    }
}

impl Detector for HeaderCountDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        let count = *attrs.header_count.value()?;
        (count < self.min || count > self.max).then(Verdict::unclassified)
    }
}

/// Flags requests missing the User-Agent or most of the common headers.
#[derive(Debug, Clone, Copy)]
pub struct MissingHeadersDetector {
    /// Number of missing common headers that marks a bot
    pub threshold: usize,
}

impl MissingHeadersDetector {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }
}

impl Default for MissingHeadersDetector {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Detector for MissingHeadersDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        let missing = attrs.missing_common_headers.value()?;

        // No User-Agent at all is enough on its own
        if missing.iter().any(|h| h.eq_ignore_ascii_case("user-agent")) {
            return Some(Verdict::unclassified());
        }

        (missing.len() >= self.threshold).then(Verdict::unclassified)
    }
}

/// Flags requests where Accept, Accept-Language and Accept-Encoding are all
/// empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptHeadersDetector;

impl Detector for AcceptHeadersDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        let all_empty = [&attrs.accept, &attrs.accept_language, &attrs.accept_encoding]
            .iter()
            .all(|h| h.as_str().is_empty());
        all_empty.then(Verdict::unclassified)
    }
}

/// Flags requests with almost no distinct header names.
#[derive(Debug, Clone, Copy)]
pub struct HeaderOrderDetector {
    pub min_distinct: usize,
}

impl HeaderOrderDetector {
    pub fn new(min_distinct: usize) -> Self {
        Self { min_distinct }
    }
}

impl Default for HeaderOrderDetector {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Detector for HeaderOrderDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        match &attrs.header_order {
            Outcome::Present(order) => (order.len() < self.min_distinct).then(Verdict::unclassified),
            Outcome::Absent(_) => None,
        }
    }
}
