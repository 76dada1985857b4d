//! Request attribute collection.
//!
//! A request is read once into an immutable [`AttributeBag`]. Every attribute
//! is wrapped in an [`Outcome`] so detectors can tell "header not sent" apart
//! from "header sent with an empty value".

use crate::error::DetectError;
use crate::taxonomy::COMMON_HEADERS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header multimap with lowercase keys.
pub type HeaderMap = HashMap<String, Vec<String>>;

/// Read-only view of an HTTP request.
///
/// Header lookups are case-insensitive.
pub trait RequestSource {
    /// All values of a header, in the order received.
    fn header_values(&self, name: &str) -> Vec<&str>;

    /// All header name/value pairs, in the order received.
    fn header_pairs(&self) -> Vec<(&str, &str)>;

    fn method(&self) -> &str;

    fn path(&self) -> &str;

    fn query(&self) -> &str;

    fn remote_addr(&self) -> &str;

    /// Declared body length, if the transport knows it.
    fn content_length(&self) -> Option<u64>;

    /// First value of a header.
    fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }
}

/// Owned request snapshot, usable as a [`RequestSource`] and loadable from
/// JSON or YAML fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSnapshot {
    pub method: String,
    pub path: String,
    pub query: String,
    pub remote_addr: String,
    /// Headers in the order received
    pub headers: Vec<(String, String)>,
    pub content_length: Option<u64>,
}

impl RequestSnapshot {
    /// Create a snapshot for the given method and path with no headers.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = addr.into();
        self
    }

    pub fn with_content_length(mut self, len: u64) -> Self {
        self.content_length = Some(len);
        self
    }
}

impl RequestSource for RequestSnapshot {
    fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn header_pairs(&self) -> Vec<(&str, &str)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> &str {
        &self.query
    }

    fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}

/// Why an attribute has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceReason {
    /// The header was not sent
    Missing,
    /// The header was sent with an empty value
    Empty,
    /// The source cannot supply this attribute
    Unavailable,
    /// The value could not be interpreted
    Malformed(String),
}

/// A collected attribute: present with a value, or absent with a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Present(T),
    Absent(AbsenceReason),
}

impl<T> Outcome<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Outcome::Present(_))
    }

    /// The value, if present.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Present(v) => Some(v),
            Outcome::Absent(_) => None,
        }
    }

    /// The absence reason, if absent.
    pub fn reason(&self) -> Option<&AbsenceReason> {
        match self {
            Outcome::Present(_) => None,
            Outcome::Absent(reason) => Some(reason),
        }
    }
}

impl Outcome<String> {
    /// The value, or the empty string when absent.
    pub fn as_str(&self) -> &str {
        self.value().map(String::as_str).unwrap_or("")
    }
}

/// Immutable snapshot of the request attributes detectors look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeBag {
    pub user_agent: Outcome<String>,
    pub forwarded_for: Outcome<String>,
    pub real_ip: Outcome<String>,
    pub accept_language: Outcome<String>,
    pub accept_encoding: Outcome<String>,
    pub accept_charset: Outcome<String>,
    pub accept: Outcome<String>,
    pub connection: Outcome<String>,
    pub cache_control: Outcome<String>,
    pub upgrade_insecure: Outcome<bool>,
    pub do_not_track: Outcome<String>,
    pub headers: Outcome<HeaderMap>,
    pub content_length: Outcome<u64>,
    pub method: Outcome<String>,
    pub path: Outcome<String>,
    pub query: Outcome<String>,
    pub remote_addr: Outcome<String>,
    /// Distinct header names in the order first seen
    pub header_order: Outcome<Vec<String>>,
    /// Number of distinct header names
    pub header_count: Outcome<usize>,
    /// Entries of [`COMMON_HEADERS`] with no non-empty value
    pub missing_common_headers: Outcome<Vec<String>>,
}

impl AttributeBag {
    /// Collect all attributes from a request. Never fails.
    pub fn collect(request: &dyn RequestSource) -> Self {
        let pairs = request.header_pairs();
        let mut bag = Self::from_header_pairs(&pairs);

        bag.method = Outcome::Present(request.method().to_string());
        bag.path = Outcome::Present(request.path().to_string());
        bag.query = Outcome::Present(request.query().to_string());
        bag.remote_addr = Outcome::Present(request.remote_addr().to_string());
        bag.content_length = match request.content_length() {
            Some(len) => Outcome::Present(len),
            None => content_length_header(request),
        };
        bag
    }

    /// Build a bag from a bare header map.
    ///
    /// Request line and connection attributes are marked unavailable. Names
    /// are visited in sorted order so the header order is deterministic.
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Self {
        let mut names: Vec<&String> = headers.keys().collect();
        names.sort();

        let pairs: Vec<(&str, &str)> = names
            .into_iter()
            .flat_map(|name| {
                headers[name]
                    .iter()
                    .map(move |value| (name.as_str(), value.as_str()))
            })
            .collect();

        Self::from_header_pairs(&pairs)
    }

    fn from_header_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut headers: HeaderMap = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for (name, value) in pairs {
            let key = name.to_ascii_lowercase();
            if !headers.contains_key(&key) {
                order.push((*name).to_string());
            }
            headers.entry(key).or_default().push((*value).to_string());
        }

        let first = |name: &str| -> Option<&str> {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(String::as_str)
        };
        let text = |name: &str| Outcome::Present(first(name).unwrap_or("").to_string());

        let user_agent = match first("user-agent") {
            None => Outcome::Absent(AbsenceReason::Missing),
            Some("") => Outcome::Absent(AbsenceReason::Empty),
            Some(ua) => Outcome::Present(ua.to_string()),
        };

        let missing: Vec<String> = COMMON_HEADERS
            .iter()
            .filter(|name| first(&name.to_ascii_lowercase()).map_or(true, str::is_empty))
            .map(|name| name.to_string())
            .collect();

        Self {
            user_agent,
            forwarded_for: text("x-forwarded-for"),
            real_ip: text("x-real-ip"),
            accept_language: text("accept-language"),
            accept_encoding: text("accept-encoding"),
            accept_charset: text("accept-charset"),
            accept: text("accept"),
            connection: text("connection"),
            cache_control: text("cache-control"),
            upgrade_insecure: Outcome::Present(first("upgrade-insecure-requests") == Some("1")),
            do_not_track: text("dnt"),
            content_length: Outcome::Absent(AbsenceReason::Unavailable),
            method: Outcome::Absent(AbsenceReason::Unavailable),
            path: Outcome::Absent(AbsenceReason::Unavailable),
            query: Outcome::Absent(AbsenceReason::Unavailable),
            remote_addr: Outcome::Absent(AbsenceReason::Unavailable),
            header_count: Outcome::Present(order.len()),
            header_order: Outcome::Present(order),
            missing_common_headers: Outcome::Present(missing),
            headers: Outcome::Present(headers),
        }
    }

    /// Returns true if the header was sent, regardless of its value.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .value()
            .is_some_and(|h| h.contains_key(&name.to_ascii_lowercase()))
    }
}

fn content_length_header(request: &dyn RequestSource) -> Outcome<u64> {
    match request.header("content-length") {
        None => Outcome::Absent(AbsenceReason::Missing),
        Some(raw) => match raw.trim().parse() {
            Ok(len) => Outcome::Present(len),
            Err(_) => Outcome::Absent(AbsenceReason::Malformed(raw.to_string())),
        },
    }
}

/// Turns a request into an [`AttributeBag`].
///
/// The error channel exists for custom collectors; [`DefaultCollector`]
/// never fails.
pub trait Collector: Send + Sync {
    fn collect(&self, request: &dyn RequestSource) -> Result<AttributeBag, DetectError>;
}

/// Collector that reads the request headers and request line.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCollector;

impl Collector for DefaultCollector {
    fn collect(&self, request: &dyn RequestSource) -> Result<AttributeBag, DetectError> {
        Ok(AttributeBag::collect(request))
    }
}
