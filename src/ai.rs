//! AI agent identification.
//!
//! A thin view over the user-agent signatures restricted to the AI kinds.

use crate::api;
use crate::attributes::RequestSource;
use crate::detectors::classify_user_agent;
use crate::error::DetectError;
use crate::verdict::{BotKind, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The AI subset of [`BotKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiAgentKind {
    #[serde(rename = "gptbot")]
    GptBot,
    #[serde(rename = "chatgpt")]
    ChatGpt,
    #[serde(rename = "openai")]
    OpenAi,
    Claude,
    AiAgent,
}

impl AiAgentKind {
    /// Narrow a bot kind to the AI subset.
    pub fn from_bot_kind(kind: BotKind) -> Option<Self> {
        match kind {
            BotKind::GptBot => Some(AiAgentKind::GptBot),
            BotKind::ChatGpt => Some(AiAgentKind::ChatGpt),
            BotKind::OpenAi => Some(AiAgentKind::OpenAi),
            BotKind::Claude => Some(AiAgentKind::Claude),
            BotKind::AiAgent => Some(AiAgentKind::AiAgent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        BotKind::from(*self).as_str()
    }

    /// ChatGPT browsing or the generic OpenAI operator.
    pub fn is_chatgpt(&self) -> bool {
        matches!(self, AiAgentKind::ChatGpt | AiAgentKind::OpenAi)
    }

    /// Any OpenAI agent, including the training crawler.
    pub fn is_openai(&self) -> bool {
        matches!(
            self,
            AiAgentKind::GptBot | AiAgentKind::ChatGpt | AiAgentKind::OpenAi
        )
    }
}

impl From<AiAgentKind> for BotKind {
    fn from(kind: AiAgentKind) -> Self {
        match kind {
            AiAgentKind::GptBot => BotKind::GptBot,
            AiAgentKind::ChatGpt => BotKind::ChatGpt,
            AiAgentKind::OpenAi => BotKind::OpenAi,
            AiAgentKind::Claude => BotKind::Claude,
            AiAgentKind::AiAgent => BotKind::AiAgent,
        }
    }
}

impl fmt::Display for AiAgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI agent kind for a user agent, if it is one.
pub fn detect_ai_agent(user_agent: &str) -> Option<AiAgentKind> {
    classify_user_agent(user_agent).and_then(AiAgentKind::from_bot_kind)
}

/// Returns true if the user agent belongs to an AI agent.
pub fn is_ai_agent(user_agent: &str) -> bool {
    detect_ai_agent(user_agent).is_some()
}

/// Returns true for ChatGPT browsing or generic OpenAI agents.
pub fn is_chatgpt(user_agent: &str) -> bool {
    detect_ai_agent(user_agent).is_some_and(|k| k.is_chatgpt())
}

/// Returns true for any OpenAI agent.
pub fn is_openai_bot(user_agent: &str) -> bool {
    detect_ai_agent(user_agent).is_some_and(|k| k.is_openai())
}

/// AI agent kind for a request's User-Agent header.
pub fn ai_agent_from_request(request: &dyn RequestSource) -> Option<AiAgentKind> {
    request.header("user-agent").and_then(detect_ai_agent)
}

/// AI classification alongside the full detection verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AiAgentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AiAgentKind>,
    pub verdict: Verdict,
}

impl AiAgentInfo {
    pub fn is_ai_agent(&self) -> bool {
        self.agent.is_some()
    }
}

/// Classify the request's User-Agent as an AI agent and run full detection.
pub fn ai_agent_info(request: &dyn RequestSource) -> Result<AiAgentInfo, DetectError> {
    Ok(AiAgentInfo {
        agent: ai_agent_from_request(request),
        verdict: api::detect(request)?,
    })
}
