//! Points ledger vocabulary: action tags, amounts, history entries and balances.
//!
//! Award actions form a closed set. Parameterised actions embed their
//! provider, platform or reward in the rendered tag, e.g.
//! `SOCIAL_LINK_TWITTER` or `REDEMPTION_coupon`. Tags are case-sensitive on
//! the wire; providers and platforms are always rendered uppercase.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

const PROFILE_UPDATE: &str = "PROFILE_UPDATE";
const DOCUMENT_VALIDATION: &str = "DOCUMENT_VALIDATION";
const SOCIAL_LINK_PREFIX: &str = "SOCIAL_LINK_";
const ESPORTS_VALIDATION_PREFIX: &str = "ESPORTS_VALIDATION_";
const REDEMPTION_PREFIX: &str = "REDEMPTION_";

/// Maximum length of a reward identifier.
pub const REWARD_ID_MAX: usize = 64;

/// Validation errors raised while building ledger values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointsValidationError {
    /// Point amounts must be strictly positive.
    #[error("points must be a positive integer")]
    NonPositivePoints,
    /// Reward identifiers must not be blank.
    #[error("reward id must not be empty")]
    EmptyRewardId,
    /// Reward identifiers must not contain whitespace.
    #[error("reward id must not contain whitespace")]
    RewardIdWhitespace,
    /// Reward identifiers are bounded in length.
    #[error("reward id must be at most {max} characters")]
    RewardIdTooLong { max: usize },
    /// The action tag matched no known action.
    #[error("unknown action tag: {value}")]
    UnknownAction { value: String },
    /// The social provider is not supported.
    #[error("unsupported social provider: {value}")]
    UnknownSocialProvider { value: String },
    /// The e-sports platform is not supported.
    #[error("unsupported e-sports platform: {value}")]
    UnknownEsportsPlatform { value: String },
}

/// Social networks a fan can link to their account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Twitter,
    Instagram,
    Facebook,
    Twitch,
    Discord,
}

impl SocialProvider {
    /// Every supported provider, in display order.
    pub const ALL: [Self; 5] = [
        Self::Twitter,
        Self::Instagram,
        Self::Facebook,
        Self::Twitch,
        Self::Discord,
    ];

    /// Lowercase name used in request payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Twitch => "twitch",
            Self::Discord => "discord",
        }
    }

    /// Uppercase code embedded in action tags.
    pub fn code(self) -> &'static str {
        match self {
            Self::Twitter => "TWITTER",
            Self::Instagram => "INSTAGRAM",
            Self::Facebook => "FACEBOOK",
            Self::Twitch => "TWITCH",
            Self::Discord => "DISCORD",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|provider| provider.code() == code)
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialProvider {
    type Err = PointsValidationError;

    /// Parse a provider name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == normalised)
            .ok_or_else(|| PointsValidationError::UnknownSocialProvider {
                value: s.to_owned(),
            })
    }
}

/// E-sports platforms whose public profiles can be validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsportsPlatform {
    #[serde(rename = "leagueoflegends")]
    LeagueOfLegends,
    #[serde(rename = "rainbowsix")]
    RainbowSix,
    Steam,
    Valorant,
    #[serde(rename = "gamersclub")]
    GamersClub,
    Cs2,
}

impl EsportsPlatform {
    /// Every supported platform, in display order.
    pub const ALL: [Self; 6] = [
        Self::LeagueOfLegends,
        Self::RainbowSix,
        Self::Steam,
        Self::Valorant,
        Self::GamersClub,
        Self::Cs2,
    ];

    /// Lowercase name used in request payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeagueOfLegends => "leagueoflegends",
            Self::RainbowSix => "rainbowsix",
            Self::Steam => "steam",
            Self::Valorant => "valorant",
            Self::GamersClub => "gamersclub",
            Self::Cs2 => "cs2",
        }
    }

    /// Uppercase code embedded in action tags.
    pub fn code(self) -> &'static str {
        match self {
            Self::LeagueOfLegends => "LEAGUEOFLEGENDS",
            Self::RainbowSix => "RAINBOWSIX",
            Self::Steam => "STEAM",
            Self::Valorant => "VALORANT",
            Self::GamersClub => "GAMERSCLUB",
            Self::Cs2 => "CS2",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|platform| platform.code() == code)
    }
}

impl fmt::Display for EsportsPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EsportsPlatform {
    type Err = PointsValidationError;

    /// Parse a platform name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == normalised)
            .ok_or_else(|| PointsValidationError::UnknownEsportsPlatform {
                value: s.to_owned(),
            })
    }
}

/// Identifier of a catalogue reward. The catalogue itself lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RewardId(String);

impl RewardId {
    /// Validate and construct a reward identifier.
    ///
    /// # Examples
    /// ```
    /// use fanclub::domain::RewardId;
    ///
    /// assert!(RewardId::new("Sticker").is_ok());
    /// assert!(RewardId::new("two words").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, PointsValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PointsValidationError::EmptyRewardId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(PointsValidationError::RewardIdWhitespace);
        }
        if id.chars().count() > REWARD_ID_MAX {
            return Err(PointsValidationError::RewardIdTooLong { max: REWARD_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for RewardId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RewardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of point-affecting actions.
///
/// Every variant except [`ActionTag::Redemption`] is award-class and may be
/// rewarded at most once per user.
///
/// # Examples
/// ```
/// use fanclub::domain::{ActionTag, SocialProvider};
///
/// let tag = ActionTag::SocialLink(SocialProvider::Twitter);
/// assert_eq!(tag.to_string(), "SOCIAL_LINK_TWITTER");
/// assert_eq!("SOCIAL_LINK_TWITTER".parse::<ActionTag>(), Ok(tag));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActionTag {
    /// Significant profile fields were completed.
    ProfileUpdate,
    /// An identity document passed validation.
    DocumentValidation,
    /// A social account was linked.
    SocialLink(SocialProvider),
    /// An e-sports profile passed validation.
    EsportsValidation(EsportsPlatform),
    /// Points were spent on a reward.
    Redemption(RewardId),
}

impl ActionTag {
    /// Whether the tag is subject to the once-per-user rule.
    pub fn is_award(&self) -> bool {
        !matches!(self, Self::Redemption(_))
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileUpdate => f.write_str(PROFILE_UPDATE),
            Self::DocumentValidation => f.write_str(DOCUMENT_VALIDATION),
            Self::SocialLink(provider) => write!(f, "{SOCIAL_LINK_PREFIX}{}", provider.code()),
            Self::EsportsValidation(platform) => {
                write!(f, "{ESPORTS_VALIDATION_PREFIX}{}", platform.code())
            }
            Self::Redemption(reward) => write!(f, "{REDEMPTION_PREFIX}{reward}"),
        }
    }
}

impl FromStr for ActionTag {
    type Err = PointsValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || PointsValidationError::UnknownAction {
            value: s.to_owned(),
        };

        match s {
            PROFILE_UPDATE => return Ok(Self::ProfileUpdate),
            DOCUMENT_VALIDATION => return Ok(Self::DocumentValidation),
            _ => {}
        }

        if let Some(code) = s.strip_prefix(SOCIAL_LINK_PREFIX) {
            return SocialProvider::from_code(code)
                .map(Self::SocialLink)
                .ok_or_else(unknown);
        }
        if let Some(code) = s.strip_prefix(ESPORTS_VALIDATION_PREFIX) {
            return EsportsPlatform::from_code(code)
                .map(Self::EsportsValidation)
                .ok_or_else(unknown);
        }
        if let Some(reward) = s.strip_prefix(REDEMPTION_PREFIX) {
            return RewardId::new(reward).map(Self::Redemption);
        }
        Err(unknown())
    }
}

impl From<ActionTag> for String {
    fn from(value: ActionTag) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ActionTag {
    type Error = PointsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Strictly positive number of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointAmount(u32);

impl PointAmount {
    /// Amount granted by every built-in award.
    pub const STANDARD: Self = Self(10);

    /// Validate and construct an amount.
    pub fn new(points: u32) -> Result<Self, PointsValidationError> {
        if points == 0 {
            return Err(PointsValidationError::NonPositivePoints);
        }
        Ok(Self(points))
    }

    /// Validate a signed amount coming from an external payload.
    pub fn from_signed(points: i64) -> Result<Self, PointsValidationError> {
        u32::try_from(points)
            .map_err(|_| PointsValidationError::NonPositivePoints)
            .and_then(Self::new)
    }

    /// Raw amount.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Amount as a ledger delta for awards.
    pub fn as_credit(self) -> i64 {
        i64::from(self.0)
    }

    /// Amount as a ledger delta for redemptions.
    pub fn as_debit(self) -> i64 {
        -i64::from(self.0)
    }
}

/// One immutable point-affecting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointHistoryEntry {
    pub id: Uuid,
    pub user_id: UserId,
    /// Signed delta: positive for awards, negative for redemptions.
    pub points: i64,
    pub action: ActionTag,
    pub created_at: DateTime<Utc>,
}

impl PointHistoryEntry {
    /// Build an award entry.
    pub fn award(
        user_id: UserId,
        action: ActionTag,
        points: PointAmount,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            points: points.as_credit(),
            action,
            created_at,
        }
    }

    /// Build a redemption entry for `reward`.
    pub fn redemption(
        user_id: UserId,
        reward: RewardId,
        points: PointAmount,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            points: points.as_debit(),
            action: ActionTag::Redemption(reward),
            created_at,
        }
    }
}

/// Balance and history for a user, newest entry first.
///
/// ## Invariants
/// - `points` equals the sum of `history` deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPoints {
    points: i64,
    #[serde(rename = "pointsHistory")]
    history: Vec<PointHistoryEntry>,
}

impl UserPoints {
    /// Build from history, ordering newest-first and recomputing the balance.
    pub fn from_history(mut history: Vec<PointHistoryEntry>) -> Self {
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let points = balance_of(&history);
        Self { points, history }
    }

    /// Current balance.
    pub fn points(&self) -> i64 {
        self.points
    }

    /// History ordered newest-first.
    pub fn history(&self) -> &[PointHistoryEntry] {
        &self.history
    }

    /// Consume into `(points, history)`.
    pub fn into_parts(self) -> (i64, Vec<PointHistoryEntry>) {
        (self.points, self.history)
    }
}

/// Sum of ledger deltas.
pub fn balance_of(history: &[PointHistoryEntry]) -> i64 {
    history.iter().map(|entry| entry.points).sum()
}

/// Result of an award request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwardOutcome {
    /// A new entry was recorded.
    Awarded {
        entry: PointHistoryEntry,
        balance: i64,
    },
    /// The action had already been rewarded; nothing changed.
    AlreadyAwarded,
}

impl AwardOutcome {
    /// Whether this call recorded a new entry.
    pub fn is_awarded(&self) -> bool {
        matches!(self, Self::Awarded { .. })
    }
}
