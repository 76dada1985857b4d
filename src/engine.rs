//! Detection engine.
//!
//! [`BotDetector`] owns a collector and a detector registry. The registry is
//! held as an immutable snapshot behind an [`ArcSwap`]: a detection run loads
//! one snapshot and iterates it, while `add_detector`/`remove_detector`
//! publish a modified copy. Runs in flight keep the snapshot they started
//! with.

use crate::attributes::{AttributeBag, Collector, DefaultCollector, RequestSource};
use crate::config::DetectionConfig;
use crate::detectors::{Detector, DetectorRegistry};
use crate::error::DetectError;
use crate::resolver::{self, Resolution, SignalBreakdown};
use crate::verdict::Verdict;
use arc_swap::ArcSwap;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Everything one detection run produced.
///
/// Handed to downstream request-handling stages in place of request-scoped
/// context slots.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub verdict: Verdict,
    pub attributes: Arc<AttributeBag>,
    pub signals: SignalBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

/// Bot detection engine.
pub struct BotDetector {
    collector: Arc<dyn Collector>,
    registry: ArcSwap<DetectorRegistry>,
}

impl BotDetector {
    /// Create an engine with all built-in detectors.
    pub fn new() -> Self {
        Self::with_registry(DetectorRegistry::defaults())
    }

    /// Create an engine with the built-in detectors plus `custom`, which
    /// overrides built-ins of the same name.
    pub fn with_detectors(custom: &DetectorRegistry) -> Self {
        let mut registry = DetectorRegistry::defaults();
        registry.merge(custom);
        Self::with_registry(registry)
    }

    /// Create an engine with the detectors enabled in `config`.
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::with_registry(DetectorRegistry::from_config(config))
    }

    /// Create an engine that runs exactly the given registry.
    pub fn with_registry(registry: DetectorRegistry) -> Self {
        Self {
            collector: Arc::new(DefaultCollector),
            registry: ArcSwap::from_pointee(registry),
        }
    }

    /// Replace the attribute collector.
    pub fn with_collector(mut self, collector: impl Collector + 'static) -> Self {
        self.collector = Arc::new(collector);
        self
    }

    /// Collect the attribute bag for a request.
    pub fn collect(&self, request: &dyn RequestSource) -> Result<AttributeBag, DetectError> {
        self.collector.collect(request)
    }

    /// Classify a request.
    pub fn detect(&self, request: &dyn RequestSource) -> Result<Verdict, DetectError> {
        let attrs = self.collect(request)?;
        Ok(self.resolve(&attrs).verdict)
    }

    /// Classify a request and keep the bag and per-detector signals.
    pub fn detect_request(&self, request: &dyn RequestSource) -> Result<Detection, DetectError> {
        let attrs = self.collect(request)?;
        let Resolution {
            verdict,
            signals,
            decided_by,
        } = self.resolve(&attrs);

        Ok(Detection {
            verdict,
            attributes: Arc::new(attrs),
            signals,
            decided_by,
        })
    }

    /// Run the current detectors against an already collected bag.
    pub fn resolve(&self, attrs: &AttributeBag) -> Resolution {
        let registry = self.registry.load();
        resolver::resolve(&registry, attrs)
    }

    /// Register a detector, replacing any detector with the same name.
    pub fn add_detector(&self, name: &str, detector: impl Detector + 'static) {
        let detector: Arc<dyn Detector> = Arc::new(detector);
        self.registry.rcu(|current| {
            let mut next = DetectorRegistry::clone(current);
            next.insert_arc(name, Arc::clone(&detector));
            next
        });
        trace!(detector = name, "Detector registered");
    }

    /// Remove a detector by name. Returns false if no such detector exists.
    pub fn remove_detector(&self, name: &str) -> bool {
        let mut removed = false;
        self.registry.rcu(|current| {
            let mut next = DetectorRegistry::clone(current);
            removed = next.remove(name).is_some();
            next
        });
        trace!(detector = name, removed, "Detector removal");
        removed
    }

    /// Names of the registered detectors, in run order.
    pub fn detector_names(&self) -> Vec<String> {
        self.registry.load().names()
    }

    /// Current registry snapshot.
    pub fn registry(&self) -> Arc<DetectorRegistry> {
        self.registry.load_full()
    }

    /// Classify using only the user-agent and missing-headers detectors.
    pub fn quick_check(&self, request: &dyn RequestSource) -> Result<Verdict, DetectError> {
        let attrs = self.collect(request)?;
        Ok(resolver::resolve(&DetectorRegistry::quick(), &attrs).verdict)
    }

    /// Classify a bare header map using only the header detectors.
    pub fn analyze_headers(&self, headers: &HashMap<String, Vec<String>>) -> Verdict {
        let attrs = AttributeBag::from_headers(headers);
        resolver::resolve(&DetectorRegistry::header_family(), &attrs).verdict
    }
}

impl Default for BotDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BotDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotDetector")
            .field("detectors", &self.detector_names())
            .finish_non_exhaustive()
    }
}
