//! News submission constants shared across crates.

use serde::{Deserialize, Serialize};

/// Where a news submission entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsOrigin {
    Plugin,
    Chatbot,
    Mobile,
}

impl NewsOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsOrigin::Plugin => "plugin",
            NewsOrigin::Chatbot => "chatbot",
            NewsOrigin::Mobile => "mobile",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "plugin" => Some(NewsOrigin::Plugin),
            "chatbot" => Some(NewsOrigin::Chatbot),
            "mobile" => Some(NewsOrigin::Mobile),
            _ => None,
        }
    }
}

/// Outcome of processing a news draft. Drafts are never deleted, so
/// the result doubles as the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingResult {
    Assigned,
    Duplicate,
}

impl ProcessingResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingResult::Assigned => "assigned",
            ProcessingResult::Duplicate => "duplicate",
        }
    }
}
