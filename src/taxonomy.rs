//! Static pattern catalogs.
//!
//! Signature groups are ordered most specific first; the first group with a
//! matching pattern decides the kind. Broad substrings such as `"bot"` sit at
//! the end so they cannot shadow named agents.

use crate::verdict::BotKind;
use regex::Regex;
use std::sync::LazyLock;

/// A bot kind and the lowercase substrings that identify it.
#[derive(Debug, Clone, Copy)]
pub struct SignatureGroup {
    pub kind: BotKind,
    pub patterns: &'static [&'static str],
}

const fn group(kind: BotKind, patterns: &'static [&'static str]) -> SignatureGroup {
    SignatureGroup { kind, patterns }
}

/// User-Agent signature groups in precedence order.
pub static USER_AGENT_SIGNATURES: &[SignatureGroup] = &[
    // AI agents
    group(BotKind::GptBot, &["gptbot", "gpt-bot"]),
    group(BotKind::ChatGpt, &["chatgpt-user", "chatgpt", "openai-chatgpt"]),
    group(BotKind::OpenAi, &["openai", "openai-bot", "openai-crawler"]),
    group(BotKind::Claude, &["claude-web", "claude", "anthropic"]),
    group(
        BotKind::AiAgent,
        &[
            "ai-agent",
            "aiagent",
            "ai_agent",
            "artificial intelligence",
            "language model",
            "llm",
            "gpt-",
            "claude-",
            "bard",
            "gemini-pro",
        ],
    ),
    // Automation frameworks; compound names before the engines they embed
    group(BotKind::Phantomas, &["phantomas"]),
    group(BotKind::PhantomJs, &["phantomjs"]),
    group(BotKind::SlimerJs, &["slimerjs"]),
    group(BotKind::NightmareJs, &["nightmarejs", "nightmare/"]),
    group(BotKind::CoachJs, &["coachjs"]),
    group(BotKind::Awesomium, &["awesomium"]),
    group(BotKind::CefSharp, &["cefsharp"]),
    group(BotKind::FMiner, &["fminer"]),
    group(BotKind::Sequentum, &["sequentum"]),
    group(BotKind::WebDriverIo, &["webdriverio"]),
    group(BotKind::Selenium, &["selenium", "webdriver"]),
    group(BotKind::Electron, &["electron"]),
    group(BotKind::HeadlessChrome, &["headlesschrome", "headless"]),
    group(BotKind::Playwright, &["playwright"]),
    group(BotKind::Puppeteer, &["puppeteer"]),
    // Command-line clients
    group(BotKind::Curl, &["curl/"]),
    group(BotKind::Wget, &["wget/"]),
    // Search engine crawlers
    group(
        BotKind::Crawler,
        &[
            "googlebot",
            "bingbot",
            "slurp",
            "duckduckbot",
            "baiduspider",
            "yandexbot",
            "applebot",
        ],
    ),
    // Generic bots
    group(BotKind::Bot, &["bot", "crawler", "spider", "scraper"]),
];

/// User-Agents that name no bot but are still not browsers: empty or
/// whitespace-only strings, a bare `Mozilla/x.0` token, and the default
/// agents of scripting-language HTTP libraries.
pub static SUSPICIOUS_USER_AGENTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"^\s*$").unwrap(), "blank"),
        (Regex::new(r"mozilla/[45]\.0$").unwrap(), "bare_mozilla"),
        (Regex::new(r"python").unwrap(), "python"),
        (Regex::new(r"java").unwrap(), "java"),
        (Regex::new(r"go-http-client").unwrap(), "go_http_client"),
        (Regex::new(r"libwww-perl").unwrap(), "libwww_perl"),
        (Regex::new(r"httpclient").unwrap(), "httpclient"),
        (Regex::new(r"okhttp").unwrap(), "okhttp"),
        (Regex::new(r"requests").unwrap(), "requests"),
        (Regex::new(r"urllib").unwrap(), "urllib"),
    ]
});

/// Headers whose presence reveals automation or proxy tooling: the XHR
/// marker, DevTools network emulation, the data-saver proxy and prefetch
/// intent.
pub const AUTOMATION_HEADERS: &[&str] = &[
    "x-requested-with",
    "x-devtools-emulate-network-conditions-client-id",
    "chrome-proxy",
    "purpose",
];

/// Headers every mainstream browser sends.
pub const COMMON_HEADERS: &[&str] = &[
    "Accept",
    "Accept-Language",
    "Accept-Encoding",
    "Connection",
    "User-Agent",
];

/// Connection header tokens browsers do not send on page loads.
pub const SUSPICIOUS_CONNECTION_TOKENS: &[&str] = &["upgrade", "te"];

/// Find the first signature group matching a lowercased User-Agent.
pub fn match_signature(ua_lower: &str) -> Option<BotKind> {
    USER_AGENT_SIGNATURES
        .iter()
        .find(|group| group.patterns.iter().any(|p| ua_lower.contains(p)))
        .map(|group| group.kind)
}

/// Name of the first suspicious pattern matching a lowercased User-Agent.
pub fn match_suspicious(ua_lower: &str) -> Option<&'static str> {
    SUSPICIOUS_USER_AGENTS
        .iter()
        .find(|(pattern, _)| pattern.is_match(ua_lower))
        .map(|(_, name)| *name)
}
