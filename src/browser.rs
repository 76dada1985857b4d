//! Browser identification from the User-Agent.
//!
//! Runs independently of the detector pipeline, but reuses the user-agent
//! signatures as a gate: a bot user agent never gets a browser identity.
//!
//! Patterns are tried most specific first. Chromium rebrands embed `Chrome/`
//! and almost everything embeds `Safari/`, so Edge and the rebrands come
//! before Chrome, Chrome before Firefox and Safari, and Internet Explorer
//! last.

use crate::attributes::RequestSource;
use crate::detectors::classify_user_agent;
use crate::verdict::BotKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Browser identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserName {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    Ie,
    Yandex,
    Vivaldi,
    Brave,
    Samsung,
    #[serde(rename = "ucbrowser")]
    UcBrowser,
    #[default]
    Unknown,
}

impl BrowserName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserName::Chrome => "chrome",
            BrowserName::Firefox => "firefox",
            BrowserName::Safari => "safari",
            BrowserName::Edge => "edge",
            BrowserName::Opera => "opera",
            BrowserName::Ie => "ie",
            BrowserName::Yandex => "yandex",
            BrowserName::Vivaldi => "vivaldi",
            BrowserName::Brave => "brave",
            BrowserName::Samsung => "samsung",
            BrowserName::UcBrowser => "ucbrowser",
            BrowserName::Unknown => "unknown",
        }
    }

    /// Rendering engine family.
    pub fn family(&self) -> BrowserFamily {
        match self {
            BrowserName::Chrome
            | BrowserName::Edge
            | BrowserName::Yandex
            | BrowserName::Vivaldi
            | BrowserName::Brave
            | BrowserName::Samsung
            | BrowserName::UcBrowser => BrowserFamily::Chromium,
            BrowserName::Firefox => BrowserFamily::Gecko,
            BrowserName::Safari => BrowserFamily::Webkit,
            BrowserName::Opera => BrowserFamily::Opera,
            BrowserName::Ie => BrowserFamily::Trident,
            BrowserName::Unknown => BrowserFamily::Unknown,
        }
    }
}

impl fmt::Display for BrowserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering engine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFamily {
    Chromium,
    Gecko,
    Webkit,
    Opera,
    Trident,
    Unknown,
}

impl BrowserFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserFamily::Chromium => "chromium",
            BrowserFamily::Gecko => "gecko",
            BrowserFamily::Webkit => "webkit",
            BrowserFamily::Opera => "opera",
            BrowserFamily::Trident => "trident",
            BrowserFamily::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versioned browser patterns, matched against the lowercased User-Agent.
/// The first capture group is the version.
static BROWSER_PATTERNS: LazyLock<Vec<(BrowserName, Regex)>> = LazyLock::new(|| {
    const VERSION: &str = r"([0-9]+(?:\.[0-9]+)*)";
    let pattern = |name, re: &str| (name, Regex::new(&re.replace("{v}", VERSION)).unwrap());
    vec![
        // Edge, including Android and iOS variants
        pattern(BrowserName::Edge, r"edg(?:e|a|ios)?/{v}"),
        // Chromium rebrands
        pattern(BrowserName::Yandex, r"yabrowser/{v}"),
        pattern(BrowserName::Vivaldi, r"vivaldi/{v}"),
        pattern(BrowserName::Brave, r"brave/{v}"),
        pattern(BrowserName::Samsung, r"samsungbrowser/{v}"),
        pattern(BrowserName::UcBrowser, r"ucbrowser/{v}"),
        pattern(BrowserName::Opera, r"(?:opera|opr)/{v}"),
        pattern(BrowserName::Opera, r"version/{v}.*opera"),
        pattern(BrowserName::Chrome, r"chrome/{v}"),
        pattern(BrowserName::Chrome, r"chromium/{v}"),
        pattern(BrowserName::Firefox, r"firefox/{v}"),
        // Firefox for iOS
        pattern(BrowserName::Firefox, r"fxios/{v}"),
        pattern(BrowserName::Safari, r"version/{v}.*safari"),
        // Mobile Safari without a Version token
        pattern(BrowserName::Safari, r"mobile/[0-9a-z]+.*safari/{v}"),
        pattern(BrowserName::Ie, r"msie {v}"),
        // IE 11 dropped the MSIE token
        pattern(BrowserName::Ie, r"trident/.*rv:{v}"),
    ]
});

/// Bare engine tokens tried when no versioned pattern matches.
const FALLBACK_TOKENS: &[(BrowserName, &str)] = &[
    (BrowserName::Safari, "safari"),
    (BrowserName::Chrome, "chrome"),
    (BrowserName::Firefox, "firefox"),
    (BrowserName::Opera, "opera"),
    (BrowserName::Edge, "edge"),
];

const MOBILE_INDICATORS: &[&str] = &[
    "mobile",
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "windows phone",
    "palm",
    "symbian",
];

/// Browser identity parsed from a User-Agent.
///
/// Either a browser name and version, or a bot kind; never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserInfo {
    name: BrowserName,
    version: String,
    raw_user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bot_kind: Option<BotKind>,
}

impl BrowserInfo {
    fn browser(name: BrowserName, version: String, raw: &str) -> Self {
        Self {
            name,
            version,
            raw_user_agent: raw.to_string(),
            bot_kind: None,
        }
    }

    fn bot(kind: BotKind, raw: &str) -> Self {
        Self {
            name: BrowserName::Unknown,
            version: String::new(),
            raw_user_agent: raw.to_string(),
            bot_kind: Some(kind),
        }
    }

    pub fn name(&self) -> BrowserName {
        self.name
    }

    /// Full version string, empty if unknown.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The User-Agent as given.
    pub fn raw_user_agent(&self) -> &str {
        &self.raw_user_agent
    }

    pub fn is_bot(&self) -> bool {
        self.bot_kind.is_some()
    }

    pub fn bot_kind(&self) -> Option<BotKind> {
        self.bot_kind
    }

    pub fn family(&self) -> BrowserFamily {
        self.name.family()
    }

    /// Returns true if the User-Agent names a mobile device or OS.
    pub fn is_mobile(&self) -> bool {
        let ua = self.raw_user_agent.to_lowercase();
        MOBILE_INDICATORS.iter().any(|token| ua.contains(token))
    }

    /// First dot-separated segment of the version.
    pub fn major_version(&self) -> &str {
        self.version.split('.').next().unwrap_or("")
    }

    /// Returns true if the version meets the listed minimum for this
    /// browser. Bots and unlisted browsers are never supported.
    pub fn is_supported(&self, min_versions: &HashMap<BrowserName, String>) -> bool {
        if self.is_bot() {
            return false;
        }
        min_versions
            .get(&self.name)
            .is_some_and(|min| compare_versions(&self.version, min) != Ordering::Less)
    }
}

/// Parse a User-Agent string.
pub fn parse_user_agent(user_agent: &str) -> BrowserInfo {
    let ua = user_agent.trim();
    if ua.is_empty() {
        return BrowserInfo::browser(BrowserName::Unknown, String::new(), user_agent);
    }

    if let Some(kind) = classify_user_agent(ua) {
        return BrowserInfo::bot(kind, user_agent);
    }

    let (name, version) = parse_name_and_version(&ua.to_lowercase());
    BrowserInfo::browser(name, version, user_agent)
}

/// Parse the User-Agent header of a request.
pub fn parse_request(request: &dyn RequestSource) -> BrowserInfo {
    parse_user_agent(request.header("user-agent").unwrap_or(""))
}

fn parse_name_and_version(ua_lower: &str) -> (BrowserName, String) {
    for (name, re) in BROWSER_PATTERNS.iter() {
        if let Some(version) = re.captures(ua_lower).and_then(|c| c.get(1)) {
            return (*name, version.as_str().to_string());
        }
    }

    FALLBACK_TOKENS
        .iter()
        .find(|(_, token)| ua_lower.contains(token))
        .map_or((BrowserName::Unknown, String::new()), |(name, _)| {
            (*name, String::new())
        })
}

/// Compare two dotted version strings segment by segment.
///
/// Non-digits are stripped from each segment and an empty segment counts as
/// zero; the shorter version is padded with zeros. The empty string sorts
/// before every non-empty version.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let left: Vec<&str> = a.split('.').collect();
    let right: Vec<&str> = b.split('.').collect();
    let len = left.len().max(right.len());

    (0..len)
        .map(|i| {
            compare_segments(
                left.get(i).copied().unwrap_or(""),
                right.get(i).copied().unwrap_or(""),
            )
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Numeric comparison without parsing, so arbitrarily long segments work.
fn compare_segments(a: &str, b: &str) -> Ordering {
    let a = significant_digits(a);
    let b = significant_digits(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(&b))
}

fn significant_digits(segment: &str) -> String {
    segment
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .collect()
}
