//! Bot detection modules.
//!
//! Each detector examines the [`AttributeBag`] and either votes "bot" with a
//! [`Verdict`] or abstains. Detectors are pure: they hold no per-request state
//! and never fail, so they can run in any order.

pub mod headers;
pub mod protocol;
pub mod registry;
pub mod user_agent;

pub use headers::{
    AcceptHeadersDetector, AutomationHeaderDetector, HeaderCountDetector, HeaderOrderDetector,
    MissingHeadersDetector,
};
pub use protocol::{ConnectionDetector, ContentLengthDetector};
pub use registry::DetectorRegistry;
pub use user_agent::{classify_user_agent, UserAgentDetector};

use crate::attributes::AttributeBag;
use crate::verdict::Verdict;

/// Names of the built-in detectors.
pub mod names {
    pub const USER_AGENT: &str = "user_agent";
    pub const HEADERS: &str = "headers";
    pub const HEADER_COUNT: &str = "header_count";
    pub const MISSING_HEADERS: &str = "missing_headers";
    pub const ACCEPT_HEADERS: &str = "accept_headers";
    pub const CONNECTION: &str = "connection";
    pub const CONTENT_LENGTH: &str = "content_length";
    pub const HEADER_ORDER: &str = "header_order";
}

/// Trait for bot detectors.
///
/// Returning `None` or a human verdict both mean "no opinion". Any plain
/// function or closure with the right signature is a detector.
pub trait Detector: Send + Sync {
    /// Analyze the attributes and return a verdict, if any.
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict>;
}

impl<F> Detector for F
where
    F: Fn(&AttributeBag) -> Option<Verdict> + Send + Sync,
{
    fn detect(&self, attrs: &AttributeBag) -> Option<Verdict> {
        self(attrs)
    }
}
