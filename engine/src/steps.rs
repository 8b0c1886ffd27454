//! Resolution of which required step a provider round-trip satisfies.

use crate::EngineError;
use fangate_types::{Provider, RequiredStep, StepAction};
use std::collections::BTreeSet;

/// Pick the required step a `(provider, action)` pair verifies for a gate,
/// given what the submission has already completed.
///
/// `Follow` can satisfy both follow slots on gates that require two; the
/// first unverified one wins. Errors distinguish "this gate never asks for
/// that" from "that step is already done".
pub fn resolve_step(
    required: &BTreeSet<RequiredStep>,
    verified: &BTreeSet<RequiredStep>,
    provider: Provider,
    action: StepAction,
) -> Result<RequiredStep, EngineError> {
    let candidates: &[RequiredStep] = match action {
        StepAction::Repost => &[RequiredStep::SocialRepost],
        StepAction::Connect => &[RequiredStep::StreamingConnect],
        StepAction::Follow => &[RequiredStep::SocialFollow, RequiredStep::SecondSocialFollow],
    };

    let asked: Vec<RequiredStep> = candidates
        .iter()
        .copied()
        .filter(|s| required.contains(s))
        .collect();
    if asked.is_empty() {
        return Err(EngineError::NoMatchingStep { provider, action });
    }

    match asked.iter().copied().find(|s| !verified.contains(s)) {
        Some(step) => Ok(step),
        // All matching slots are done; report the last one.
        None => Err(EngineError::StepAlreadyVerified { step: asked[asked.len() - 1] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(steps: &[RequiredStep]) -> BTreeSet<RequiredStep> {
        steps.iter().copied().collect()
    }

    #[test]
    fn repost_resolves_to_social_repost() {
        let req = required(&[RequiredStep::Email, RequiredStep::SocialRepost]);
        let step = resolve_step(&req, &required(&[RequiredStep::Email]),
            Provider::SoundCloud, StepAction::Repost).unwrap();
        assert_eq!(step, RequiredStep::SocialRepost);
    }

    #[test]
    fn action_not_required_by_gate() {
        let req = required(&[RequiredStep::Email, RequiredStep::SocialRepost]);
        let err = resolve_step(&req, &required(&[RequiredStep::Email]),
            Provider::Spotify, StepAction::Connect);
        assert!(matches!(err, Err(EngineError::NoMatchingStep { .. })));
    }

    #[test]
    fn second_follow_fills_after_first() {
        let req = required(&[
            RequiredStep::Email,
            RequiredStep::SocialFollow,
            RequiredStep::SecondSocialFollow,
        ]);
        let verified = required(&[RequiredStep::Email, RequiredStep::SocialFollow]);
        let step = resolve_step(&req, &verified, Provider::Instagram, StepAction::Follow).unwrap();
        assert_eq!(step, RequiredStep::SecondSocialFollow);
    }

    #[test]
    fn both_follows_done_is_already_verified() {
        let req = required(&[
            RequiredStep::Email,
            RequiredStep::SocialFollow,
            RequiredStep::SecondSocialFollow,
        ]);
        let verified = req.clone();
        let err = resolve_step(&req, &verified, Provider::Instagram, StepAction::Follow);
        assert!(matches!(
            err,
            Err(EngineError::StepAlreadyVerified { step: RequiredStep::SecondSocialFollow })
        ));
    }

    #[test]
    fn single_follow_gate_rejects_second_follow() {
        let req = required(&[RequiredStep::Email, RequiredStep::SocialFollow]);
        let verified = req.clone();
        let err = resolve_step(&req, &verified, Provider::Instagram, StepAction::Follow);
        assert!(matches!(
            err,
            Err(EngineError::StepAlreadyVerified { step: RequiredStep::SocialFollow })
        ));
    }
}
