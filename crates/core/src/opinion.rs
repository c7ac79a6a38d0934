//! Opinion shape validation.
//!
//! Every opinion arrives with a declared type (verdict, duplicate, or
//! spam) and exactly one field group may carry values for that type.
//! Validation runs before anything is persisted and produces a fully
//! normalized [`OpinionFields`] with every out-of-group field reset to
//! its default, so a later edit can never leak values from a previous
//! opinion shape.

use serde::{Deserialize, Serialize};

use crate::types::DbId;
use crate::verdict::Verdict;

/// Which concrete opinion a judge leaves, selected by their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpinionKind {
    FactChecker,
    Expert,
}

impl OpinionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpinionKind::FactChecker => "fact_checker",
            OpinionKind::Expert => "expert",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fact_checker" => Some(OpinionKind::FactChecker),
            "expert" => Some(OpinionKind::Expert),
            _ => None,
        }
    }
}

/// The declared shape of a submitted opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpinionType {
    Verdict,
    Duplicate,
    Spam,
}

/// Raw opinion submission as received from a judge.
#[derive(Debug, Clone, Deserialize)]
pub struct OpinionInput {
    #[serde(rename = "type")]
    pub opinion_type: OpinionType,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub confirmation_sources: Option<String>,
    pub verdict: Option<Verdict>,
    pub is_duplicate: Option<bool>,
    pub duplicate_reference: Option<DbId>,
}

/// Normalized, persistable opinion fields. Exactly one field group is
/// populated; everything else holds its column default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpinionFields {
    pub title: String,
    pub comment: String,
    pub confirmation_sources: String,
    pub verdict: Option<Verdict>,
    pub is_duplicate: bool,
    pub duplicate_reference: Option<DbId>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OpinionError {
    #[error("Missing additional parameters: {0:?}")]
    MissingFields(Vec<&'static str>),

    #[error("Redundant fields: {0:?}")]
    RedundantFields(Vec<&'static str>),

    /// Spam must be submitted via the dedicated spam opinion type, not
    /// mixed with full verdict fields.
    #[error("A spam verdict cannot be submitted as a verdict opinion")]
    SpamVerdictForVerdictType,
}

impl OpinionError {
    /// Stable machine-readable code surfaced at the API boundary.
    pub fn code(&self) -> &'static str {
        match self {
            OpinionError::MissingFields(_) => "missing_fields",
            OpinionError::RedundantFields(_) => "redundant_fields",
            OpinionError::SpamVerdictForVerdictType => "spam_verdict_for_verdict_opinion_type",
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

impl OpinionInput {
    /// Validate the field combination for the declared opinion type and
    /// return the normalized fields.
    pub fn validate(self) -> Result<OpinionFields, OpinionError> {
        match self.opinion_type {
            OpinionType::Verdict => self.validate_verdict(),
            OpinionType::Duplicate => self.validate_duplicate(),
            OpinionType::Spam => self.validate_spam(),
        }
    }

    fn validate_verdict(self) -> Result<OpinionFields, OpinionError> {
        let mut missing = Vec::new();
        if is_blank(&self.title) {
            missing.push("title");
        }
        if is_blank(&self.confirmation_sources) {
            missing.push("confirmation_sources");
        }
        if is_blank(&self.comment) {
            missing.push("comment");
        }
        if self.verdict.is_none() {
            missing.push("verdict");
        }
        if !missing.is_empty() {
            return Err(OpinionError::MissingFields(missing));
        }

        if self.verdict == Some(Verdict::Spam) {
            return Err(OpinionError::SpamVerdictForVerdictType);
        }

        let mut redundant = Vec::new();
        if self.is_duplicate == Some(true) {
            redundant.push("is_duplicate");
        }
        if self.duplicate_reference.is_some() {
            redundant.push("duplicate_reference");
        }
        if !redundant.is_empty() {
            return Err(OpinionError::RedundantFields(redundant));
        }

        Ok(OpinionFields {
            title: self.title.unwrap_or_default(),
            comment: self.comment.unwrap_or_default(),
            confirmation_sources: self.confirmation_sources.unwrap_or_default(),
            verdict: self.verdict,
            is_duplicate: false,
            duplicate_reference: None,
        })
    }

    fn validate_duplicate(self) -> Result<OpinionFields, OpinionError> {
        if self.duplicate_reference.is_none() {
            return Err(OpinionError::MissingFields(vec!["duplicate_reference"]));
        }

        let mut redundant = Vec::new();
        if !is_blank(&self.title) {
            redundant.push("title");
        }
        if !is_blank(&self.comment) {
            redundant.push("comment");
        }
        if !is_blank(&self.confirmation_sources) {
            redundant.push("confirmation_sources");
        }
        if self.verdict.is_some() {
            redundant.push("verdict");
        }
        if !redundant.is_empty() {
            return Err(OpinionError::RedundantFields(redundant));
        }

        Ok(OpinionFields {
            title: String::new(),
            comment: String::new(),
            confirmation_sources: String::new(),
            verdict: None,
            is_duplicate: true,
            duplicate_reference: self.duplicate_reference,
        })
    }

    fn validate_spam(self) -> Result<OpinionFields, OpinionError> {
        let mut redundant = Vec::new();
        if !is_blank(&self.title) {
            redundant.push("title");
        }
        if !is_blank(&self.comment) {
            redundant.push("comment");
        }
        if !is_blank(&self.confirmation_sources) {
            redundant.push("confirmation_sources");
        }
        if self.verdict.is_some() && self.verdict != Some(Verdict::Spam) {
            redundant.push("verdict");
        }
        if self.is_duplicate == Some(true) {
            redundant.push("is_duplicate");
        }
        if self.duplicate_reference.is_some() {
            redundant.push("duplicate_reference");
        }
        if !redundant.is_empty() {
            return Err(OpinionError::RedundantFields(redundant));
        }

        Ok(OpinionFields {
            title: String::new(),
            comment: String::new(),
            confirmation_sources: String::new(),
            verdict: Some(Verdict::Spam),
            is_duplicate: false,
            duplicate_reference: None,
        })
    }
}
