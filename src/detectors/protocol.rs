//! Protocol-level anomaly detectors.

use super::Detector;
use crate::attributes::AttributeBag;
use crate::taxonomy::SUSPICIOUS_CONNECTION_TOKENS;
use crate::verdict::Verdict;

/// Flags Connection headers carrying upgrade or TE tokens.
///
/// Matching is by substring on the lowercased value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionDetector;

impl Detector for ConnectionDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        let connection = attrs.connection.value()?.to_lowercase();
        SUSPICIOUS_CONNECTION_TOKENS
            .iter()
            .any(|token| connection.contains(token))
            .then(Verdict::unclassified)
    }
}

/// Flags GET requests that declare a body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLengthDetector;

impl Detector for ContentLengthDetector {
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        let length = *attrs.content_length.value()?;
        let method = attrs.method.value()?;
        (method.eq_ignore_ascii_case("GET") && length > 0).then(Verdict::unclassified)
    }
}
