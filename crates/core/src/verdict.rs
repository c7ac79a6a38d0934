//! Verdict aggregation rules.
//!
//! Pure functions over the set of opinions attached to a news item.
//! The repository layer fetches the opinions; everything here operates
//! on in-memory [`OpinionFacts`] so the rules are unit-testable
//! without a database.
//!
//! The ordering of the rules is load-bearing: an expert verdict always
//! short-circuits fact-checker tallying, and dispute detection runs
//! before the single-verdict quorum check.

use serde::{Deserialize, Serialize};

/// A verdict assigned by a single judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    True,
    False,
    Spam,
    Unidentified,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::Spam => "spam",
            Verdict::Unidentified => "unidentified",
        }
    }

    /// Parse a stored verdict string. Empty or unknown values map to `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "true" => Some(Verdict::True),
            "false" => Some(Verdict::False),
            "spam" => Some(Verdict::Spam),
            "unidentified" => Some(Verdict::Unidentified),
            _ => None,
        }
    }
}

/// The resolved, aggregate verdict for a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentVerdict {
    NoVerdict,
    True,
    False,
    Spam,
    Unidentified,
    Dispute,
    /// Coarse "confirmation pending" state used by the status view.
    Awaiting,
}

impl From<Verdict> for CurrentVerdict {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::True => CurrentVerdict::True,
            Verdict::False => CurrentVerdict::False,
            Verdict::Spam => CurrentVerdict::Spam,
            Verdict::Unidentified => CurrentVerdict::Unidentified,
        }
    }
}

impl CurrentVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentVerdict::NoVerdict => "no_verdict",
            CurrentVerdict::True => "true",
            CurrentVerdict::False => "false",
            CurrentVerdict::Spam => "spam",
            CurrentVerdict::Unidentified => "unidentified",
            CurrentVerdict::Dispute => "dispute",
            CurrentVerdict::Awaiting => "awaiting",
        }
    }
}

/// The aggregation-relevant slice of a single opinion.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpinionFacts {
    pub verdict: Option<Verdict>,
    pub is_duplicate: bool,
}

/// Quorum: matching fact-checker verdicts needed to resolve without
/// expert intervention.
pub const VERDICT_QUORUM: usize = 2;

/// Per-verdict tallies over a set of fact-checker opinions.
#[derive(Debug, Default)]
struct Tally {
    true_count: usize,
    false_count: usize,
    unidentified_count: usize,
    spam_count: usize,
}

fn tally(checkers: &[OpinionFacts]) -> Tally {
    let mut t = Tally::default();
    for facts in checkers {
        match facts.verdict {
            Some(Verdict::True) => t.true_count += 1,
            Some(Verdict::False) => t.false_count += 1,
            Some(Verdict::Unidentified) => t.unidentified_count += 1,
            Some(Verdict::Spam) => t.spam_count += 1,
            None => {}
        }
    }
    t
}

/// Resolve the current verdict for a news item.
///
/// 1. A non-empty expert verdict wins verbatim.
/// 2. Conflicting fact-checker verdicts produce [`CurrentVerdict::Dispute`].
/// 3. Otherwise the first verdict reaching quorum (checked in the order
///    true, false, unidentified, spam) wins.
/// 4. Otherwise `NoVerdict`.
pub fn current_verdict(expert: Option<&OpinionFacts>, checkers: &[OpinionFacts]) -> CurrentVerdict {
    if let Some(v) = expert.and_then(|e| e.verdict) {
        return v.into();
    }

    let t = tally(checkers);

    let dispute = (t.true_count >= 1 && t.false_count >= 1)
        || (t.spam_count == 1 && (t.false_count >= 1 || t.true_count >= 1))
        || (t.unidentified_count >= 1
            && (t.false_count >= 1 || t.true_count >= 1 || t.spam_count == 1));
    if dispute {
        return CurrentVerdict::Dispute;
    }

    if t.true_count >= VERDICT_QUORUM {
        CurrentVerdict::True
    } else if t.false_count >= VERDICT_QUORUM {
        CurrentVerdict::False
    } else if t.unidentified_count >= VERDICT_QUORUM {
        CurrentVerdict::Unidentified
    } else if t.spam_count >= VERDICT_QUORUM {
        CurrentVerdict::Spam
    } else {
        CurrentVerdict::NoVerdict
    }
}

/// Coarse verdict status for the "confirmation pending" view.
///
/// Expert verdict wins verbatim; otherwise any fact-checker opinion at
/// all means the news is awaiting confirmation.
pub fn verdict_status(expert: Option<&OpinionFacts>, checkers: &[OpinionFacts]) -> CurrentVerdict {
    if let Some(v) = expert.and_then(|e| e.verdict) {
        return v.into();
    }
    if checkers.is_empty() {
        CurrentVerdict::NoVerdict
    } else {
        CurrentVerdict::Awaiting
    }
}

/// Whether the news is fully verdicted.
///
/// True only for {true, false, unidentified}. Spam and dispute do NOT
/// count: they must not fire the new-verdict event nor notify the
/// reporter.
pub fn is_with_verdict(expert: Option<&OpinionFacts>, checkers: &[OpinionFacts]) -> bool {
    matches!(
        current_verdict(expert, checkers),
        CurrentVerdict::True | CurrentVerdict::False | CurrentVerdict::Unidentified
    )
}

/// Aggregate duplicate flag.
///
/// An existing expert opinion is authoritative whichever way its flag
/// points; otherwise two fact-checker duplicate flags are required.
pub fn is_duplicate(expert: Option<&OpinionFacts>, checkers: &[OpinionFacts]) -> bool {
    if let Some(e) = expert {
        return e.is_duplicate;
    }
    checkers.iter().filter(|f| f.is_duplicate).count() >= 2
}

/// Aggregate spam flag: one expert spam verdict, or two fact-checker
/// spam verdicts.
pub fn is_spam(expert: Option<&OpinionFacts>, checkers: &[OpinionFacts]) -> bool {
    if expert.and_then(|e| e.verdict) == Some(Verdict::Spam) {
        return true;
    }
    checkers
        .iter()
        .filter(|f| f.verdict == Some(Verdict::Spam))
        .count()
        >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(verdict: Verdict) -> OpinionFacts {
        OpinionFacts {
            verdict: Some(verdict),
            is_duplicate: false,
        }
    }

    fn duplicate() -> OpinionFacts {
        OpinionFacts {
            verdict: None,
            is_duplicate: true,
        }
    }

    // -----------------------------------------------------------------------
    // Expert override
    // -----------------------------------------------------------------------

    #[test]
    fn expert_verdict_wins_over_any_tally() {
        let checkers = vec![with(Verdict::True), with(Verdict::True), with(Verdict::True)];
        assert_eq!(
            current_verdict(Some(&with(Verdict::False)), &checkers),
            CurrentVerdict::False
        );
    }

    #[test]
    fn expert_spam_verdict_returned_verbatim() {
        assert_eq!(
            current_verdict(Some(&with(Verdict::Spam)), &[]),
            CurrentVerdict::Spam
        );
    }

    #[test]
    fn expert_opinion_without_verdict_falls_through_to_tally() {
        let expert = OpinionFacts::default();
        let checkers = vec![with(Verdict::True), with(Verdict::True)];
        assert_eq!(
            current_verdict(Some(&expert), &checkers),
            CurrentVerdict::True
        );
    }

    // -----------------------------------------------------------------------
    // Quorum
    // -----------------------------------------------------------------------

    #[test]
    fn two_true_opinions_resolve_true() {
        let checkers = vec![with(Verdict::True), with(Verdict::True)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::True);
    }

    #[test]
    fn two_false_opinions_resolve_false() {
        let checkers = vec![with(Verdict::False), with(Verdict::False)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::False);
    }

    #[test]
    fn two_unidentified_opinions_resolve_unidentified() {
        let checkers = vec![with(Verdict::Unidentified), with(Verdict::Unidentified)];
        assert_eq!(
            current_verdict(None, &checkers),
            CurrentVerdict::Unidentified
        );
    }

    #[test]
    fn two_spam_opinions_resolve_spam() {
        let checkers = vec![with(Verdict::Spam), with(Verdict::Spam)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Spam);
    }

    #[test]
    fn single_opinion_is_no_verdict() {
        assert_eq!(
            current_verdict(None, &[with(Verdict::True)]),
            CurrentVerdict::NoVerdict
        );
    }

    #[test]
    fn single_spam_alone_is_no_verdict() {
        assert_eq!(
            current_verdict(None, &[with(Verdict::Spam)]),
            CurrentVerdict::NoVerdict
        );
    }

    #[test]
    fn no_opinions_is_no_verdict() {
        assert_eq!(current_verdict(None, &[]), CurrentVerdict::NoVerdict);
    }

    // -----------------------------------------------------------------------
    // Dispute detection
    // -----------------------------------------------------------------------

    #[test]
    fn true_plus_false_is_dispute() {
        let checkers = vec![with(Verdict::True), with(Verdict::False)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Dispute);
    }

    #[test]
    fn one_spam_plus_one_true_is_dispute() {
        let checkers = vec![with(Verdict::Spam), with(Verdict::True)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Dispute);
    }

    #[test]
    fn one_spam_plus_one_false_is_dispute() {
        let checkers = vec![with(Verdict::Spam), with(Verdict::False)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Dispute);
    }

    #[test]
    fn unidentified_plus_true_is_dispute() {
        let checkers = vec![with(Verdict::Unidentified), with(Verdict::True)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Dispute);
    }

    #[test]
    fn unidentified_plus_single_spam_is_dispute() {
        let checkers = vec![with(Verdict::Unidentified), with(Verdict::Spam)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Dispute);
    }

    #[test]
    fn dispute_checked_before_quorum() {
        // Two trues would reach quorum, but the lone false disputes them.
        let checkers = vec![with(Verdict::True), with(Verdict::True), with(Verdict::False)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Dispute);
    }

    #[test]
    fn two_spam_plus_true_resolves_spam() {
        // The spam dispute arm requires exactly one spam opinion; two
        // spam opinions skip it and reach quorum instead.
        let checkers = vec![with(Verdict::Spam), with(Verdict::Spam), with(Verdict::True)];
        assert_eq!(current_verdict(None, &checkers), CurrentVerdict::Spam);
    }

    // -----------------------------------------------------------------------
    // Awaiting status
    // -----------------------------------------------------------------------

    #[test]
    fn status_is_awaiting_with_any_fact_checker_opinion() {
        assert_eq!(
            verdict_status(None, &[with(Verdict::True)]),
            CurrentVerdict::Awaiting
        );
    }

    #[test]
    fn status_is_no_verdict_without_opinions() {
        assert_eq!(verdict_status(None, &[]), CurrentVerdict::NoVerdict);
    }

    #[test]
    fn status_uses_expert_verdict_when_present() {
        assert_eq!(
            verdict_status(Some(&with(Verdict::True)), &[]),
            CurrentVerdict::True
        );
    }

    // -----------------------------------------------------------------------
    // is_with_verdict
    // -----------------------------------------------------------------------

    #[test]
    fn with_verdict_true_for_resolved_verdicts() {
        for v in [Verdict::True, Verdict::False, Verdict::Unidentified] {
            assert!(is_with_verdict(Some(&with(v)), &[]));
        }
    }

    #[test]
    fn with_verdict_false_for_spam_dispute_and_none() {
        assert!(!is_with_verdict(Some(&with(Verdict::Spam)), &[]));
        assert!(!is_with_verdict(
            None,
            &[with(Verdict::True), with(Verdict::False)]
        ));
        assert!(!is_with_verdict(None, &[]));
    }

    // -----------------------------------------------------------------------
    // Duplicate / spam flags
    // -----------------------------------------------------------------------

    #[test]
    fn expert_duplicate_flag_is_authoritative_both_ways() {
        let fc_duplicates = vec![duplicate(), duplicate(), duplicate()];
        let expert_not_duplicate = OpinionFacts::default();
        assert!(!is_duplicate(Some(&expert_not_duplicate), &fc_duplicates));
        assert!(is_duplicate(Some(&duplicate()), &[]));
    }

    #[test]
    fn two_fact_checker_duplicates_required_without_expert() {
        assert!(!is_duplicate(None, &[duplicate()]));
        assert!(is_duplicate(None, &[duplicate(), duplicate()]));
    }

    #[test]
    fn spam_flag_from_expert_or_fact_checker_quorum() {
        assert!(is_spam(Some(&with(Verdict::Spam)), &[]));
        assert!(!is_spam(None, &[with(Verdict::Spam)]));
        assert!(is_spam(None, &[with(Verdict::Spam), with(Verdict::Spam)]));
    }
}
