//! User roles and the promotion state machine.
//!
//! Role changes are restricted to a fixed promotable set; admin and
//! base_user are excluded from promotion pathways entirely. Promotions
//! carry side effects (domain reset, assignment cleanup) that the
//! caller applies transactionally from the returned
//! [`PromotionEffects`].

use serde::{Deserialize, Serialize};

use crate::opinion::OpinionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    BaseUser,
    FactChecker,
    Specialist,
    Expert,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::BaseUser => "base_user",
            UserRole::FactChecker => "fact_checker",
            UserRole::Specialist => "specialist",
            UserRole::Expert => "expert",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "base_user" => Some(UserRole::BaseUser),
            "fact_checker" => Some(UserRole::FactChecker),
            "specialist" => Some(UserRole::Specialist),
            "expert" => Some(UserRole::Expert),
            "moderator" => Some(UserRole::Moderator),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Which opinion subtype this role leaves, if it may opine at all.
    pub fn opinion_kind(&self) -> Option<OpinionKind> {
        match self {
            UserRole::FactChecker => Some(OpinionKind::FactChecker),
            UserRole::Expert | UserRole::Specialist | UserRole::Moderator => {
                Some(OpinionKind::Expert)
            }
            UserRole::BaseUser | UserRole::Admin => None,
        }
    }

    /// Roles that can appear on either side of a promotion.
    pub fn is_promotable(&self) -> bool {
        matches!(
            self,
            UserRole::FactChecker | UserRole::Specialist | UserRole::Expert | UserRole::Moderator
        )
    }
}

/// The promotable role set, for error messages.
pub const PROMOTABLE_ROLES: [UserRole; 4] = [
    UserRole::FactChecker,
    UserRole::Specialist,
    UserRole::Expert,
    UserRole::Moderator,
];

/// Side effects the caller must apply when committing a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionEffects {
    /// Clear the user's domain (leaving the specialist role).
    pub clear_domain: bool,
    /// Delete the user's news assignments (a moderator does not carry
    /// fact-checking assignments).
    pub drop_assignments: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromotionError {
    #[error("Cannot promote from or to roles outside {PROMOTABLE_ROLES:?}")]
    RoleNotPromotable,

    #[error("Cannot promote to the specialist role without a domain")]
    MissingDomainForSpecialist,

    #[error("Cannot assign a domain to users who are not specialists")]
    DomainForNonSpecialist,
}

impl PromotionError {
    pub fn code(&self) -> &'static str {
        match self {
            PromotionError::RoleNotPromotable => "updating_role_not_dedicated_for_promotion",
            PromotionError::MissingDomainForSpecialist => {
                "promote_to_specialist_without_provided_domain"
            }
            PromotionError::DomainForNonSpecialist => "assign_domain_to_non_specialist",
        }
    }
}

/// Validate a role promotion and compute its side effects.
///
/// `domain_provided` reflects whether the request carries a domain for
/// the target role.
pub fn validate_promotion(
    current: UserRole,
    target: UserRole,
    domain_provided: bool,
) -> Result<PromotionEffects, PromotionError> {
    if !current.is_promotable() || !target.is_promotable() {
        return Err(PromotionError::RoleNotPromotable);
    }

    if target == UserRole::Specialist && !domain_provided {
        return Err(PromotionError::MissingDomainForSpecialist);
    }
    if target != UserRole::Specialist && domain_provided {
        return Err(PromotionError::DomainForNonSpecialist);
    }

    Ok(PromotionEffects {
        clear_domain: current == UserRole::Specialist && target != UserRole::Specialist,
        drop_assignments: target == UserRole::Moderator,
    })
}
