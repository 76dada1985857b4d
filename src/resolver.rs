//! Verdict resolution.
//!
//! Every registered detector runs against the same bag. Among the bot
//! verdicts, the one with the highest [`Precedence`] wins; ties go to the
//! detector registered first.

use crate::attributes::AttributeBag;
use crate::detectors::{names, DetectorRegistry};
use crate::verdict::Verdict;
use serde::Serialize;
use tracing::debug;

/// Rank of a bot verdict.
///
/// Ordered by specificity first, then source authority. Only a specific
/// verdict from the user-agent detector is authoritative, so the order is:
///
/// 1. unclassified, from any detector
/// 2. specific, from any other detector
/// 3. specific, from the user-agent detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Precedence {
    pub specific: bool,
    pub authoritative: bool,
}

impl Precedence {
    /// Rank a verdict produced by the named detector.
    pub fn of(detector: &str, verdict: &Verdict) -> Self {
        let specific = verdict.is_specific();
        Self {
            specific,
            authoritative: specific && detector == names::USER_AGENT,
        }
    }
}

/// What one detector reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectorSignal {
    pub detector: String,
    /// `None` when the detector had no opinion
    pub verdict: Option<Verdict>,
}

/// Per-detector results of one run, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalBreakdown {
    pub signals: Vec<DetectorSignal>,
}

impl SignalBreakdown {
    /// Detectors that reported a bot.
    pub fn fired(&self) -> impl Iterator<Item = &DetectorSignal> {
        self.signals
            .iter()
            .filter(|s| s.verdict.is_some_and(|v| v.is_bot()))
    }

    /// Verdict reported by the named detector.
    pub fn get(&self, detector: &str) -> Option<&DetectorSignal> {
        self.signals.iter().find(|s| s.detector == detector)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Result of resolving a bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub verdict: Verdict,
    pub signals: SignalBreakdown,
    /// Detector whose verdict was selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

/// Run every detector in `registry` against `attrs` and select one verdict.
pub fn resolve(registry: &DetectorRegistry, attrs: &AttributeBag) -> Resolution {
    let mut signals = Vec::with_capacity(registry.len());
    let mut best: Option<(Precedence, Verdict, &str)> = None;

    for (name, detector) in registry.iter() {
        let verdict = detector.detect(attrs);

        if let Some(v) = verdict.filter(Verdict::is_bot) {
            debug!(detector = name, kind = %v.kind().unwrap_or_default(), "Detector fired");

            let rank = Precedence::of(name, &v);
            if best.map_or(true, |(current, _, _)| rank > current) {
                best = Some((rank, v, name));
            }
        }

        signals.push(DetectorSignal {
            detector: name.to_string(),
            verdict,
        });
    }

    let (verdict, decided_by) = match best {
        Some((_, v, name)) => (v, Some(name.to_string())),
        None => (Verdict::human(), None),
    };

    debug!(
        bot = verdict.is_bot(),
        kind = ?verdict.kind(),
        decided_by = decided_by.as_deref().unwrap_or("-"),
        "Verdict resolved"
    );

    Resolution {
        verdict,
        signals: SignalBreakdown { signals },
        decided_by,
    }
}
