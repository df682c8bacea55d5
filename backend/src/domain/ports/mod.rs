//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod document_classifier;
mod document_repository;
mod documents_command;
mod esports_profile_verifier;
mod esports_validation_command;
mod login_service;
mod points_ledger_command;
mod points_ledger_query;
mod points_ledger_repository;
mod profile_command;
mod profile_query;
mod registration_command;
mod social_accounts_command;
mod user_repository;

#[cfg(test)]
pub use document_classifier::MockDocumentClassifier;
pub use document_classifier::{DocumentClassifier, DocumentClassifierError};
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{DocumentRepository, DocumentRepositoryError};
#[cfg(test)]
pub use documents_command::{MockDocumentsCommand, MockDocumentsQuery};
pub use documents_command::{DocumentSubmissionOutcome, DocumentsCommand, DocumentsQuery};
#[cfg(test)]
pub use esports_profile_verifier::MockEsportsProfileVerifier;
pub use esports_profile_verifier::{
    EsportsProfileVerifier, EsportsProfileVerifierError, ProfileVerdict,
};
#[cfg(test)]
pub use esports_validation_command::MockEsportsValidationCommand;
pub use esports_validation_command::{EsportsValidationCommand, EsportsValidationOutcome};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use points_ledger_command::MockPointsLedgerCommand;
pub use points_ledger_command::PointsLedgerCommand;
#[cfg(test)]
pub use points_ledger_query::MockPointsLedgerQuery;
pub use points_ledger_query::PointsLedgerQuery;
#[cfg(test)]
pub use points_ledger_repository::MockPointsLedgerRepository;
pub use points_ledger_repository::{
    AppendAward, AppendRedemption, PointsLedgerRepository, PointsLedgerRepositoryError,
};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::{ProfileCommand, ProfileUpdateOutcome};
#[cfg(test)]
pub use profile_query::{MockProfileQuery, MockTermsGate};
pub use profile_query::{ProfileQuery, TermsGate};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
#[cfg(test)]
pub use social_accounts_command::MockSocialAccountsCommand;
pub use social_accounts_command::{SocialAccountsCommand, SocialLinkOutcome};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
