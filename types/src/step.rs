//! Verification steps, providers, and the actions that satisfy them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One verification requirement a gate can impose on a visitor.
///
/// `Email` is always part of a gate's required set and is satisfied by the
/// initial submit; the rest are completed through third-party round-trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredStep {
    Email,
    SocialRepost,
    SocialFollow,
    StreamingConnect,
    SecondSocialFollow,
}

impl RequiredStep {
    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredStep::Email => "email",
            RequiredStep::SocialRepost => "social_repost",
            RequiredStep::SocialFollow => "social_follow",
            RequiredStep::StreamingConnect => "streaming_connect",
            RequiredStep::SecondSocialFollow => "second_social_follow",
        }
    }

    /// Whether this step is completed through a provider round-trip.
    pub fn needs_handshake(&self) -> bool {
        !matches!(self, RequiredStep::Email)
    }
}

impl fmt::Display for RequiredStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A third-party platform a verification round-trip goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[serde(rename = "soundcloud")]
    SoundCloud,
    Spotify,
    Instagram,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::SoundCloud => "soundcloud",
            Provider::Spotify => "spotify",
            Provider::Instagram => "instagram",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the visitor is asked to do on the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Repost,
    Follow,
    Connect,
}

impl StepAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepAction::Repost => "repost",
            StepAction::Follow => "follow",
            StepAction::Connect => "connect",
        }
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
