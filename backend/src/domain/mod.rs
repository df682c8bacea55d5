//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed fan-engagement model and the services
//! that implement the driving ports. The points ledger is the core; every
//! other service awards points only through [`ports::PointsLedgerCommand`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - ActionTag, PointAmount, PointHistoryEntry, UserPoints: ledger vocabulary.
//! - User and its value types; Document and submissions.
//! - Services: PointsLedgerService, ProfileService, SocialAccountsService,
//!   EsportsValidationService, DocumentService, FixtureLoginService,
//!   RegistrationService.

mod account_support;
pub mod auth;
pub mod document;
mod document_service;
pub mod error;
mod esports_validation_service;
mod login;
pub mod points;
mod points_ledger_service;
pub mod ports;
mod profile_service;
mod registration_service;
mod social_accounts_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::document::{
    DOCUMENT_EXTENSIONS, DOCUMENT_MAX_BYTES, Document, DocumentKind, DocumentStatus,
    DocumentSubmission, DocumentValidationError,
};
pub use self::document_service::DocumentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::esports_validation_service::{EsportsValidationService, VERIFIER_FAILURE_MESSAGE};
pub use self::login::{FIXTURE_USER_ID, FixtureLoginService};
pub use self::points::{
    ActionTag, AwardOutcome, EsportsPlatform, PointAmount, PointHistoryEntry,
    PointsValidationError, REWARD_ID_MAX, RewardId, SocialProvider, UserPoints, balance_of,
};
pub use self::points_ledger_service::{INSUFFICIENT_POINTS_MESSAGE, PointsLedgerService};
pub use self::profile_service::{ProfileService, TERMS_REQUIRED_MESSAGE};
pub use self::registration_service::RegistrationService;
pub use self::social_accounts_service::SocialAccountsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, EsportsProfiles, ProfilePatch, ProfilePatchInput, SocialAccounts, User, UserId,
    UserName, UserProfile, UserValidationError,
};
