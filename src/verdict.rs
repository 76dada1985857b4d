//! Bot classification types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bot kind classification.
///
/// `Unknown` is the unclassified kind: the request looks automated but no
/// detector could say what it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    // Headless browsers and automation frameworks
    Awesomium,
    Cef,
    #[serde(rename = "cefsharp")]
    CefSharp,
    #[serde(rename = "coachjs")]
    CoachJs,
    Electron,
    #[serde(rename = "fminer")]
    FMiner,
    Geb,
    #[serde(rename = "nightmarejs")]
    NightmareJs,
    Phantomas,
    #[serde(rename = "phantomjs")]
    PhantomJs,
    Rhino,
    Selenium,
    Sequentum,
    #[serde(rename = "slimerjs")]
    SlimerJs,
    #[serde(rename = "webdriverio")]
    WebDriverIo,
    #[serde(rename = "webdriver")]
    WebDriver,
    HeadlessChrome,
    Playwright,
    Puppeteer,

    // Command-line HTTP clients
    Curl,
    Wget,

    // Crawlers
    Bot,
    Crawler,
    Spider,

    // AI agents
    /// AI crawler collecting training data (GPTBot)
    #[serde(rename = "gptbot")]
    GptBot,
    /// Conversational assistant browsing on behalf of a user (ChatGPT)
    #[serde(rename = "chatgpt")]
    ChatGpt,
    /// Generic OpenAI operator bot
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic assistant
    Claude,
    /// Unattributed AI agent or language-model client
    AiAgent,

    #[default]
    Unknown,
}

/// Coarse grouping of [`BotKind`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFamily {
    Automation,
    CommandLine,
    Crawler,
    AiAgent,
    Unclassified,
}

impl BotKind {
    /// Returns the kind as a stable string for headers and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            BotKind::Awesomium => "awesomium",
            BotKind::Cef => "cef",
            BotKind::CefSharp => "cefsharp",
            BotKind::CoachJs => "coachjs",
            BotKind::Electron => "electron",
            BotKind::FMiner => "fminer",
            BotKind::Geb => "geb",
            BotKind::NightmareJs => "nightmarejs",
            BotKind::Phantomas => "phantomas",
            BotKind::PhantomJs => "phantomjs",
            BotKind::Rhino => "rhino",
            BotKind::Selenium => "selenium",
            BotKind::Sequentum => "sequentum",
            BotKind::SlimerJs => "slimerjs",
            BotKind::WebDriverIo => "webdriverio",
            BotKind::WebDriver => "webdriver",
            BotKind::HeadlessChrome => "headless_chrome",
            BotKind::Playwright => "playwright",
            BotKind::Puppeteer => "puppeteer",
            BotKind::Curl => "curl",
            BotKind::Wget => "wget",
            BotKind::Bot => "bot",
            BotKind::Crawler => "crawler",
            BotKind::Spider => "spider",
            BotKind::GptBot => "gptbot",
            BotKind::ChatGpt => "chatgpt",
            BotKind::OpenAi => "openai",
            BotKind::Claude => "claude",
            BotKind::AiAgent => "ai_agent",
            BotKind::Unknown => "unknown",
        }
    }

    /// Returns the family this kind belongs to.
    pub fn family(&self) -> KindFamily {
        match self {
            BotKind::Curl | BotKind::Wget => KindFamily::CommandLine,
            BotKind::Bot | BotKind::Crawler | BotKind::Spider => KindFamily::Crawler,
            BotKind::GptBot
            | BotKind::ChatGpt
            | BotKind::OpenAi
            | BotKind::Claude
            | BotKind::AiAgent => KindFamily::AiAgent,
            BotKind::Unknown => KindFamily::Unclassified,
            _ => KindFamily::Automation,
        }
    }

    /// Returns true for anything other than the unclassified kind.
    pub fn is_specific(&self) -> bool {
        *self != BotKind::Unknown
    }

    /// Returns true if this is one of the AI agent kinds.
    pub fn is_ai_agent(&self) -> bool {
        self.family() == KindFamily::AiAgent
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a detection.
///
/// A verdict either says "human" or carries exactly one [`BotKind`]; a human
/// verdict with a kind cannot be built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Verdict {
    bot: bool,
    #[serde(rename = "botKind", skip_serializing_if = "Option::is_none")]
    kind: Option<BotKind>,
}

impl Verdict {
    /// A verdict that the request is not automated.
    pub const fn human() -> Self {
        Self {
            bot: false,
            kind: None,
        }
    }

    /// A bot verdict with the given kind.
    pub const fn bot(kind: BotKind) -> Self {
        Self {
            bot: true,
            kind: Some(kind),
        }
    }

    /// A bot verdict with no specific classification.
    pub const fn unclassified() -> Self {
        Self::bot(BotKind::Unknown)
    }

    pub fn is_bot(&self) -> bool {
        self.bot
    }

    /// The bot kind, `None` for human verdicts.
    pub fn kind(&self) -> Option<BotKind> {
        self.kind
    }

    /// Returns true for a bot verdict with a specific kind.
    pub fn is_specific(&self) -> bool {
        self.kind.is_some_and(|k| k.is_specific())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "bot ({})", kind),
            None => f.write_str("human"),
        }
    }
}
