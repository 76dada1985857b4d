//! Name-keyed detector registry.
//!
//! Entries keep insertion order, which is also the order detectors run and
//! the order the resolver breaks ties in. Re-registering a name replaces the
//! detector in place.

use super::names;
use super::{
    AcceptHeadersDetector, AutomationHeaderDetector, ConnectionDetector, ContentLengthDetector,
    Detector, HeaderCountDetector, HeaderOrderDetector, MissingHeadersDetector, UserAgentDetector,
};
use crate::config::DetectionConfig;
use std::fmt;
use std::sync::Arc;

/// Ordered set of named detectors.
#[derive(Clone, Default)]
pub struct DetectorRegistry {
    entries: Vec<(String, Arc<dyn Detector>)>,
}

impl DetectorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in detectors with default thresholds.
    pub fn defaults() -> Self {
        Self::from_config(&DetectionConfig::default())
    }

    /// Built-in detectors enabled by the configuration.
    pub fn from_config(config: &DetectionConfig) -> Self {
        let t = &config.thresholds;
        let mut registry = Self::new();

        if config.user_agent {
            registry.insert(names::USER_AGENT, UserAgentDetector::new());
        }
        if config.headers {
            registry.insert(names::HEADERS, AutomationHeaderDetector::new());
        }
        if config.header_count {
            registry.insert(
                names::HEADER_COUNT,
                HeaderCountDetector::new(t.min_header_count, t.max_header_count),
            );
        }
        if config.missing_headers {
            registry.insert(
                names::MISSING_HEADERS,
                MissingHeadersDetector::new(t.max_missing_common),
            );
        }
        if config.accept_headers {
            registry.insert(names::ACCEPT_HEADERS, AcceptHeadersDetector);
        }
        if config.connection {
            registry.insert(names::CONNECTION, ConnectionDetector);
        }
        if config.content_length {
            registry.insert(names::CONTENT_LENGTH, ContentLengthDetector);
        }
        if config.header_order {
            registry.insert(
                names::HEADER_ORDER,
                HeaderOrderDetector::new(t.min_distinct_headers),
            );
        }

        registry
    }

    /// The user-agent and missing-headers detectors only.
    pub fn quick() -> Self {
        let mut registry = Self::new();
        registry.insert(names::USER_AGENT, UserAgentDetector::new());
        registry.insert(names::MISSING_HEADERS, MissingHeadersDetector::default());
        registry
    }

    /// Detectors that look only at headers.
    pub fn header_family() -> Self {
        let mut registry = Self::new();
        registry.insert(names::HEADERS, AutomationHeaderDetector::new());
        registry.insert(names::HEADER_COUNT, HeaderCountDetector::default());
        registry.insert(names::MISSING_HEADERS, MissingHeadersDetector::default());
        registry.insert(names::ACCEPT_HEADERS, AcceptHeadersDetector);
        registry.insert(names::CONNECTION, ConnectionDetector);
        registry
    }

    /// Register a detector, replacing any detector with the same name.
    ///
    /// Returns the replaced detector.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        detector: impl Detector + 'static,
    ) -> Option<Arc<dyn Detector>> {
        self.insert_arc(name, Arc::new(detector))
    }

    /// Register an already shared detector.
    pub fn insert_arc(
        &mut self,
        name: impl Into<String>,
        detector: Arc<dyn Detector>,
    ) -> Option<Arc<dyn Detector>> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, detector)),
            None => {
                self.entries.push((name, detector));
                None
            }
        }
    }

    /// Remove a detector by name.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Detector>> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Merge another registry over this one; same names are overridden.
    pub fn merge(&mut self, other: &DetectorRegistry) {
        for (name, detector) in &other.entries {
            self.insert_arc(name.clone(), Arc::clone(detector));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Detector>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Detector names in run order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Iterate over `(name, detector)` in run order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Detector)> + '_ {
        self.entries.iter().map(|(n, d)| (n.as_str(), d.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(n, _)| n))
            .finish()
    }
}
