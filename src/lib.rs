//! Bot Detection for Zentinel
//!
//! Classifies HTTP requests as human or automated and identifies the browser
//! behind human traffic.
//!
//! # Features
//!
//! - Request attributes collected once into an immutable bag
//! - Independent detectors over User-Agent signatures, header anomalies and
//!   protocol anomalies, extensible by name
//! - Deterministic verdict resolution with per-detector signal breakdown
//! - AI agent identification (GPTBot, ChatGPT, Claude, ...)
//! - Browser name, version, family and support checks
//!
//! # Example
//!
//! ```
//! use zentinel_bot_detect::{BotDetector, BotKind, RequestSnapshot};
//!
//! let detector = BotDetector::new();
//! let request = RequestSnapshot::new("GET", "/").with_header("User-Agent", "curl/7.68.0");
//!
//! let verdict = detector.detect(&request).unwrap();
//! assert!(verdict.is_bot());
//! assert_eq!(verdict.kind(), Some(BotKind::Curl));
//! ```

pub mod ai;
pub mod api;
pub mod attributes;
pub mod browser;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod taxonomy;
pub mod verdict;

pub use ai::{AiAgentInfo, AiAgentKind};
pub use attributes::{
    AbsenceReason, AttributeBag, Collector, DefaultCollector, Outcome, RequestSnapshot,
    RequestSource,
};
pub use browser::{BrowserFamily, BrowserInfo, BrowserName};
pub use config::BotDetectConfig;
pub use detectors::{Detector, DetectorRegistry};
pub use engine::{BotDetector, Detection};
pub use error::{ConfigError, DetectError};
pub use gate::{Gate, GateDecision};
pub use resolver::{Precedence, Resolution, SignalBreakdown};
pub use verdict::{BotKind, KindFamily, Verdict};
