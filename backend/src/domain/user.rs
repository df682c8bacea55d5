//! Fan account data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EsportsPlatform, SocialProvider};

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    InvalidEmail,
    EmptyField { field: &'static str },
    FieldTooLong { field: &'static str, max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum length for a fan's name.
pub const NAME_MAX: usize = 120;
/// Maximum length for free-text profile fields.
pub const PROFILE_TEXT_MAX: usize = 2000;
/// Maximum length for the national identity number.
pub const NATIONAL_ID_MAX: usize = 32;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validate a trimmed required text value with a length ceiling.
fn bounded_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyField { field });
    }
    if trimmed.chars().count() > max {
        return Err(UserValidationError::FieldTooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Fan's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a name; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email address, stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_ascii_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text profile attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub interests: Option<String>,
    pub activities: Option<String>,
    pub events: Option<String>,
    pub purchases: Option<String>,
}

/// Linked social-provider identifiers keyed by provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccounts {
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitch: Option<String>,
    pub discord: Option<String>,
}

impl SocialAccounts {
    /// Identifier linked for `provider`, if any.
    pub fn get(&self, provider: SocialProvider) -> Option<&str> {
        match provider {
            SocialProvider::Twitter => self.twitter.as_deref(),
            SocialProvider::Instagram => self.instagram.as_deref(),
            SocialProvider::Facebook => self.facebook.as_deref(),
            SocialProvider::Twitch => self.twitch.as_deref(),
            SocialProvider::Discord => self.discord.as_deref(),
        }
    }

    /// Set or clear the identifier for `provider`.
    pub fn set(&mut self, provider: SocialProvider, social_id: Option<String>) {
        let slot = match provider {
            SocialProvider::Twitter => &mut self.twitter,
            SocialProvider::Instagram => &mut self.instagram,
            SocialProvider::Facebook => &mut self.facebook,
            SocialProvider::Twitch => &mut self.twitch,
            SocialProvider::Discord => &mut self.discord,
        };
        *slot = social_id;
    }
}

/// Validated e-sports profile URLs keyed by platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsportsProfiles {
    pub lol: Option<String>,
    pub rainbow_six: Option<String>,
    pub steam: Option<String>,
    pub valorant: Option<String>,
    pub gamersclub: Option<String>,
    pub cs2: Option<String>,
}

impl EsportsProfiles {
    /// Profile URL stored for `platform`, if any.
    pub fn get(&self, platform: EsportsPlatform) -> Option<&str> {
        match platform {
            EsportsPlatform::LeagueOfLegends => self.lol.as_deref(),
            EsportsPlatform::RainbowSix => self.rainbow_six.as_deref(),
            EsportsPlatform::Steam => self.steam.as_deref(),
            EsportsPlatform::Valorant => self.valorant.as_deref(),
            EsportsPlatform::GamersClub => self.gamersclub.as_deref(),
            EsportsPlatform::Cs2 => self.cs2.as_deref(),
        }
    }

    /// Store the profile URL for `platform`.
    pub fn set(&mut self, platform: EsportsPlatform, url: String) {
        let slot = match platform {
            EsportsPlatform::LeagueOfLegends => &mut self.lol,
            EsportsPlatform::RainbowSix => &mut self.rainbow_six,
            EsportsPlatform::Steam => &mut self.steam,
            EsportsPlatform::Valorant => &mut self.valorant,
            EsportsPlatform::GamersClub => &mut self.gamersclub,
            EsportsPlatform::Cs2 => &mut self.cs2,
        };
        *slot = Some(url);
    }
}

/// Application user.
///
/// ## Invariants
/// - `points` mirrors the sum of the user's ledger history; readers that need
///   an authoritative balance use the ledger instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: Email,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub social_accounts: SocialAccounts,
    pub esports_profiles: EsportsProfiles,
    pub has_accepted_terms: bool,
    pub points: i64,
}

impl User {
    /// Build a freshly registered user with an empty profile.
    pub fn new(id: UserId, name: UserName, email: Email) -> Self {
        Self {
            id,
            name,
            email,
            profile: UserProfile::default(),
            social_accounts: SocialAccounts::default(),
            esports_profiles: EsportsProfiles::default(),
            has_accepted_terms: false,
            points: 0,
        }
    }
}

/// Partial profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<UserName>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub interests: Option<String>,
    pub activities: Option<String>,
    pub events: Option<String>,
    pub purchases: Option<String>,
}

/// Raw, unvalidated profile fields as received from an adapter.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatchInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub interests: Option<String>,
    pub activities: Option<String>,
    pub events: Option<String>,
    pub purchases: Option<String>,
}

impl ProfilePatch {
    /// Validate raw inputs field by field.
    pub fn try_from_input(input: ProfilePatchInput) -> Result<Self, UserValidationError> {
        let text = |value: Option<String>, field| {
            value
                .map(|raw| bounded_text(&raw, field, PROFILE_TEXT_MAX))
                .transpose()
        };
        Ok(Self {
            name: input.name.map(UserName::new).transpose()?,
            address: text(input.address, "address")?,
            national_id: input
                .national_id
                .map(|raw| bounded_text(&raw, "nationalId", NATIONAL_ID_MAX))
                .transpose()?,
            interests: text(input.interests, "interests")?,
            activities: text(input.activities, "activities")?,
            events: text(input.events, "events")?,
            purchases: text(input.purchases, "purchases")?,
        })
    }

    /// Whether the patch touches a field that earns the profile award.
    pub fn earns_profile_award(&self) -> bool {
        self.address.is_some()
            || self.national_id.is_some()
            || self.interests.is_some()
            || self.activities.is_some()
    }

    /// Apply the patch to `user` in place.
    pub fn apply_to(self, user: &mut User) {
        let Self {
            name,
            address,
            national_id,
            interests,
            activities,
            events,
            purchases,
        } = self;
        if let Some(name) = name {
            user.name = name;
        }
        let profile = &mut user.profile;
        for (slot, value) in [
            (&mut profile.address, address),
            (&mut profile.national_id, national_id),
            (&mut profile.interests, interests),
            (&mut profile.activities, activities),
            (&mut profile.events, events),
            (&mut profile.purchases, purchases),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn sample_user() -> User {
        User::new(
            UserId::random(),
            UserName::new("Ada Lovelace").expect("name"),
            Email::new("ada@example.com").expect("email"),
        )
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("ADA@Example.com", true)]
    #[case("no-at-sign", false)]
    #[case("two@@example.com", false)]
    fn email_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(Email::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn email_is_lowercased() {
        let email = Email::new(" Fan@Example.COM ").expect("valid email");
        assert_eq!(email.as_ref(), "fan@example.com");
    }

    #[rstest]
    #[case(ProfilePatchInput { address: Some("Rua A, 1".into()), ..Default::default() }, true)]
    #[case(ProfilePatchInput { national_id: Some("123.456.789-09".into()), ..Default::default() }, true)]
    #[case(ProfilePatchInput { interests: Some("cs2".into()), ..Default::default() }, true)]
    #[case(ProfilePatchInput { activities: Some("watch parties".into()), ..Default::default() }, true)]
    #[case(ProfilePatchInput { events: Some("major".into()), ..Default::default() }, false)]
    #[case(ProfilePatchInput { name: Some("New Name".into()), ..Default::default() }, false)]
    fn award_qualifying_fields(#[case] input: ProfilePatchInput, #[case] expected: bool) {
        let patch = ProfilePatch::try_from_input(input).expect("valid patch");
        assert_eq!(patch.earns_profile_award(), expected);
    }

    #[rstest]
    fn blank_fields_are_rejected() {
        let input = ProfilePatchInput {
            address: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(
            ProfilePatch::try_from_input(input),
            Err(UserValidationError::EmptyField { field: "address" })
        );
    }

    #[rstest]
    fn apply_only_overwrites_supplied_fields() {
        let mut user = sample_user();
        user.profile.events = Some("old".into());
        let patch = ProfilePatch::try_from_input(ProfilePatchInput {
            address: Some(" Rua B, 2 ".into()),
            ..Default::default()
        })
        .expect("valid patch");

        patch.apply_to(&mut user);

        assert_eq!(user.profile.address.as_deref(), Some("Rua B, 2"));
        assert_eq!(user.profile.events.as_deref(), Some("old"));
        assert_eq!(user.name.as_ref(), "Ada Lovelace");
    }

    #[rstest]
    fn social_accounts_set_and_clear() {
        let mut accounts = SocialAccounts::default();
        accounts.set(SocialProvider::Twitch, Some("tw-1".into()));
        assert_eq!(accounts.get(SocialProvider::Twitch), Some("tw-1"));
        accounts.set(SocialProvider::Twitch, None);
        assert_eq!(accounts.get(SocialProvider::Twitch), None);
    }
}
